//! AcroForm builder for signed documents.
//!
//! Implements the document-level AcroForm dictionary per ISO 32000-1:2008 Section 12.7.2.
//!
//! The AcroForm dictionary is stored in the document catalog and lists every
//! signature field together with the document's signature flags.

use crate::dictionary::Dictionary;
use crate::object::{Object, ObjectRef};

/// SigFlags bit 1: the document contains at least one signature field.
pub const SIG_FLAG_SIGNATURES_EXIST: u32 = 1;
/// SigFlags bit 2: the document shall be saved with incremental updates.
pub const SIG_FLAG_APPEND_ONLY: u32 = 2;

/// Builder for the document-level AcroForm dictionary.
#[derive(Debug, Clone, Default)]
pub struct AcroFormBuilder {
    /// Field object references
    fields: Vec<ObjectRef>,
    /// Signature flags
    sig_flags: Option<u32>,
}

impl AcroFormBuilder {
    /// Create a new AcroForm builder.
    ///
    /// `NeedAppearances` is never written: signature widgets carry their own
    /// appearance streams.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add field references.
    pub fn add_fields(&mut self, fields: impl IntoIterator<Item = ObjectRef>) {
        self.fields.extend(fields);
    }

    /// Mark document as containing signatures.
    pub fn signatures_exist(mut self) -> Self {
        let flags = self.sig_flags.unwrap_or(0);
        self.sig_flags = Some(flags | SIG_FLAG_SIGNATURES_EXIST);
        self
    }

    /// Mark document as append-only (for signed documents).
    pub fn append_only(mut self) -> Self {
        let flags = self.sig_flags.unwrap_or(0);
        self.sig_flags = Some(flags | SIG_FLAG_APPEND_ONLY);
        self
    }

    /// Build the AcroForm dictionary.
    pub fn build(&self) -> Dictionary {
        let mut dict = Dictionary::new();

        let fields: Vec<Object> = self.fields.iter().map(|r| Object::Reference(*r)).collect();
        dict.set("Fields", Object::Array(fields));

        if let Some(flags) = self.sig_flags {
            dict.set_integer("SigFlags", i64::from(flags));
        }

        dict
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_acroform() {
        let dict = AcroFormBuilder::new().build();
        assert_eq!(dict.get_array("Fields").unwrap().map(Vec::len), Some(0));
        assert!(!dict.contains_key("NeedAppearances"));
        assert!(!dict.contains_key("SigFlags"));
    }

    #[test]
    fn test_signature_flags() {
        let mut builder = AcroFormBuilder::new().signatures_exist().append_only();
        builder.add_fields([ObjectRef::new(4, 0), ObjectRef::new(6, 0)]);
        let dict = builder.build();

        assert_eq!(dict.get_integer("SigFlags").unwrap(), Some(3));
        assert_eq!(
            dict.get_array("Fields").unwrap(),
            Some(&vec![
                Object::Reference(ObjectRef::new(4, 0)),
                Object::Reference(ObjectRef::new(6, 0))
            ])
        );
    }
}
