//! Field flags for signature form fields.
//!
//! Implements field flags per ISO 32000-1:2008 Section 12.7.3 (Field Flags).
//! Signature fields define no type-specific flags of their own, so the set
//! is the common flags plus the lock bit written by signing tools.

use bitflags::bitflags;

bitflags! {
    /// Flags stored under the field's `Ff` key.
    ///
    /// Per PDF spec Table 221 (Field flags common to all field types).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct SignatureFieldFlags: u32 {
        /// Bit 1: Field is read-only; user cannot change the value
        const READ_ONLY = 1 << 0;

        /// Bit 2: Field is required; must have a value before submit
        const REQUIRED = 1 << 1;

        /// Bit 3: Field should not be exported by submit-form action
        const NO_EXPORT = 1 << 2;

        /// Bit 8: Field is locked against changes to its type
        const LOCKED = 1 << 7;
    }
}

impl SignatureFieldFlags {
    /// Flags written on a newly created signature field (`Ff 132`).
    pub fn default_signature() -> Self {
        Self::NO_EXPORT | Self::LOCKED
    }

    /// Value for the `Ff` entry. Unknown bits are kept.
    pub fn to_ff(self) -> i64 {
        i64::from(self.bits())
    }

    /// Parse an `Ff` entry, keeping bits this type does not name.
    pub fn from_ff(value: i64) -> Self {
        Self::from_bits_retain(value as u32)
    }
}

impl Default for SignatureFieldFlags {
    fn default() -> Self {
        Self::default_signature()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_signature_flags() {
        let flags = SignatureFieldFlags::default_signature();
        assert_eq!(flags.bits(), 132);
        assert!(flags.contains(SignatureFieldFlags::NO_EXPORT));
        assert!(flags.contains(SignatureFieldFlags::LOCKED));
        assert!(!flags.contains(SignatureFieldFlags::READ_ONLY));
    }

    #[test]
    fn test_ff_keeps_unknown_bits() {
        let flags = SignatureFieldFlags::from_ff(132 | (1 << 20));
        assert_eq!(flags.to_ff(), 132 | (1 << 20));
    }

    #[test]
    fn test_combined_flags() {
        let flags = SignatureFieldFlags::READ_ONLY | SignatureFieldFlags::REQUIRED;
        assert_eq!(flags.to_ff(), 3);
    }
}
