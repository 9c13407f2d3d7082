//! Configuration for signature field authoring.

use crate::signatures::{SignatureFilter, SignatureSubFilter};
use crate::writer::form_fields::SignatureFieldFlags;

/// Defaults stamped onto every signature field a document creates.
#[derive(Debug, Clone)]
pub struct SignatureFieldConfig {
    /// Partial field name (`T`)
    pub field_name: String,

    /// Signature handler (`Filter`)
    pub filter: SignatureFilter,

    /// Handler submethod (`SubFilter`)
    pub sub_filter: SignatureSubFilter,

    /// Field flags (`Ff`)
    pub flags: SignatureFieldFlags,
}

impl Default for SignatureFieldConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl SignatureFieldConfig {
    /// Create new configuration with defaults.
    pub fn new() -> Self {
        Self {
            field_name: "Signature1".to_string(),
            filter: SignatureFilter::AdobePpkLite,
            sub_filter: SignatureSubFilter::Pkcs7Detached,
            flags: SignatureFieldFlags::default_signature(),
        }
    }

    /// Set the default field name.
    pub fn with_field_name(mut self, name: impl Into<String>) -> Self {
        self.field_name = name.into();
        self
    }

    /// Set the signature handler.
    pub fn with_filter(mut self, filter: SignatureFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Set the handler submethod.
    pub fn with_sub_filter(mut self, sub_filter: SignatureSubFilter) -> Self {
        self.sub_filter = sub_filter;
        self
    }

    /// Set the field flags.
    pub fn with_flags(mut self, flags: SignatureFieldFlags) -> Self {
        self.flags = flags;
        self
    }
}
