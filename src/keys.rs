//! Key schemas for the dictionaries this crate authors.
//!
//! Each entity describes its keys once: the expected value type and whether
//! the key is required, optional, or defaults to an empty nested dictionary
//! on first mutable access. [`Dictionary`](crate::dictionary::Dictionary)
//! consults the schema at its typed accessors.
//!
//! Key descriptions follow ISO 32000-1:2008 Table 252 (signature dictionary),
//! Table 220 (field dictionary) and Table 164 (annotation dictionary).

use crate::object::Object;

/// Value type expected under a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyType {
    /// Name object
    Name,
    /// Byte string
    String,
    /// Text string (PDFDocEncoding or UTF-16BE)
    TextString,
    /// Integer
    Integer,
    /// Integer or real
    Real,
    /// Date string (`D:YYYYMMDDHHmmSSOHH'mm'`)
    Date,
    /// Four-number array
    Rectangle,
    /// Array of any objects
    Array,
    /// Nested dictionary
    Dictionary,
    /// Indirect reference
    Reference,
}

impl KeyType {
    /// Human-readable name used in errors.
    pub fn type_name(&self) -> &'static str {
        match self {
            KeyType::Name => "Name",
            KeyType::String => "String",
            KeyType::TextString => "TextString",
            KeyType::Integer => "Integer",
            KeyType::Real => "Real",
            KeyType::Date => "Date",
            KeyType::Rectangle => "Rectangle",
            KeyType::Array => "Array",
            KeyType::Dictionary => "Dictionary",
            KeyType::Reference => "Reference",
        }
    }

    /// Whether `obj` is an acceptable value for this key type.
    ///
    /// Indirect references are accepted for every type; they are resolved
    /// against the reference table, not here.
    pub fn accepts(&self, obj: &Object) -> bool {
        if matches!(obj, Object::Reference(_)) {
            return true;
        }
        match self {
            KeyType::Name => matches!(obj, Object::Name(_)),
            KeyType::String | KeyType::TextString | KeyType::Date => {
                matches!(obj, Object::String(_))
            },
            KeyType::Integer => matches!(obj, Object::Integer(_)),
            KeyType::Real => matches!(obj, Object::Integer(_) | Object::Real(_)),
            KeyType::Rectangle => match obj {
                Object::Array(items) => {
                    items.len() == 4 && items.iter().all(|o| o.as_number().is_some())
                },
                _ => false,
            },
            KeyType::Array => matches!(obj, Object::Array(_)),
            KeyType::Dictionary => matches!(obj, Object::Dictionary(_)),
            KeyType::Reference => false,
        }
    }
}

/// Whether a key must be present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    /// Reading the key while absent is an error
    Required,
    /// Reading the key while absent yields nothing
    Optional,
    /// Mutable access while absent creates an empty nested dictionary
    DefaultDictionary,
}

/// Schema entry for one key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyInfo {
    /// Key name without the leading slash
    pub key: &'static str,
    /// Expected value type
    pub kind: KeyType,
    /// Required/optional/default policy
    pub presence: Presence,
}

impl KeyInfo {
    const fn new(key: &'static str, kind: KeyType, presence: Presence) -> Self {
        Self {
            key,
            kind,
            presence,
        }
    }
}

/// Schema for one kind of dictionary.
#[derive(Debug, PartialEq, Eq)]
pub struct DictionaryMeta {
    /// Display name of the entity
    pub name: &'static str,
    /// Declared keys
    pub keys: &'static [KeyInfo],
}

impl DictionaryMeta {
    /// Look up the declaration for `key`.
    pub fn key(&self, key: &str) -> Option<&KeyInfo> {
        self.keys.iter().find(|info| info.key == key)
    }
}

/// Keys of the signature value dictionary (the field's `V`).
pub mod signature_value {
    use super::{DictionaryMeta, KeyInfo, KeyType, Presence};

    /// (Optional) Type of dictionary; `Sig` when present
    pub const TYPE: &str = "Type";
    /// (Required) Signature handler name, e.g. `Adobe.PPKLite`
    pub const FILTER: &str = "Filter";
    /// (Optional) Handler submethod, e.g. `adbe.pkcs7.detached`
    pub const SUB_FILTER: &str = "SubFilter";
    /// (Required) Pairs of (offset, length) covered by the digest
    pub const BYTE_RANGE: &str = "ByteRange";
    /// (Required) The encrypted signature token
    pub const CONTENTS: &str = "Contents";
    /// (Optional) Name of the signer
    pub const NAME: &str = "Name";
    /// (Optional) Time of signing
    pub const M: &str = "M";
    /// (Optional) Host name or physical location of signing
    pub const LOCATION: &str = "Location";
    /// (Optional) Reason for signing
    pub const REASON: &str = "Reason";
    /// (Optional) Signer contact information
    pub const CONTACT_INFO: &str = "ContactInfo";

    /// Schema of the signature value dictionary.
    pub static META: DictionaryMeta = DictionaryMeta {
        name: "SignatureValue",
        keys: &[
            KeyInfo::new(TYPE, KeyType::Name, Presence::Optional),
            KeyInfo::new(FILTER, KeyType::Name, Presence::Required),
            KeyInfo::new(SUB_FILTER, KeyType::Name, Presence::Optional),
            KeyInfo::new(BYTE_RANGE, KeyType::Array, Presence::Required),
            KeyInfo::new(CONTENTS, KeyType::String, Presence::Required),
            KeyInfo::new(NAME, KeyType::TextString, Presence::Optional),
            KeyInfo::new(M, KeyType::Date, Presence::Optional),
            KeyInfo::new(LOCATION, KeyType::TextString, Presence::Optional),
            KeyInfo::new(REASON, KeyType::TextString, Presence::Optional),
            KeyInfo::new(CONTACT_INFO, KeyType::TextString, Presence::Optional),
        ],
    };
}

/// Keys of a merged signature field / widget annotation dictionary.
pub mod field {
    use super::{DictionaryMeta, KeyInfo, KeyType, Presence};

    /// Field type (`Sig`)
    pub const FT: &str = "FT";
    /// Partial field name
    pub const T: &str = "T";
    /// Field flags
    pub const FF: &str = "Ff";
    /// Default resources
    pub const DR: &str = "DR";
    /// Field value; for signature fields a reference to the signature value
    pub const V: &str = "V";
    /// Annotation type (`Annot`)
    pub const TYPE: &str = "Type";
    /// Annotation subtype (`Widget`)
    pub const SUBTYPE: &str = "Subtype";
    /// Page the widget sits on
    pub const P: &str = "P";
    /// Placement rectangle
    pub const RECT: &str = "Rect";
    /// Appearance dictionary
    pub const AP: &str = "AP";
    /// Normal appearance entry inside `AP`
    pub const AP_N: &str = "N";

    /// Schema of the signature field dictionary.
    pub static META: DictionaryMeta = DictionaryMeta {
        name: "SignatureField",
        keys: &[
            KeyInfo::new(FT, KeyType::Name, Presence::Required),
            KeyInfo::new(T, KeyType::TextString, Presence::Optional),
            KeyInfo::new(FF, KeyType::Integer, Presence::Optional),
            KeyInfo::new(DR, KeyType::Dictionary, Presence::DefaultDictionary),
            KeyInfo::new(V, KeyType::Dictionary, Presence::DefaultDictionary),
            KeyInfo::new(TYPE, KeyType::Name, Presence::Optional),
            KeyInfo::new(SUBTYPE, KeyType::Name, Presence::Required),
            KeyInfo::new(P, KeyType::Reference, Presence::Optional),
            KeyInfo::new(RECT, KeyType::Rectangle, Presence::Required),
            KeyInfo::new(AP, KeyType::Dictionary, Presence::DefaultDictionary),
        ],
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::ObjectRef;

    #[test]
    fn test_meta_lookup() {
        let info = signature_value::META.key("Filter").unwrap();
        assert_eq!(info.kind, KeyType::Name);
        assert_eq!(info.presence, Presence::Required);
        assert!(signature_value::META.key("Bogus").is_none());
    }

    #[test]
    fn test_rectangle_accepts_four_numbers() {
        let ok = Object::Array(vec![
            Object::Integer(0),
            Object::Real(1.5),
            Object::Integer(2),
            Object::Integer(3),
        ]);
        assert!(KeyType::Rectangle.accepts(&ok));
        assert!(!KeyType::Rectangle.accepts(&Object::Array(vec![Object::Integer(1)])));
    }

    #[test]
    fn test_references_accepted_for_any_type() {
        let r = Object::Reference(ObjectRef::new(1, 0));
        assert!(KeyType::Dictionary.accepts(&r));
        assert!(KeyType::Name.accepts(&r));
    }

    #[test]
    fn test_field_defaults_declared() {
        assert_eq!(field::META.key("AP").unwrap().presence, Presence::DefaultDictionary);
        assert_eq!(field::META.key("V").unwrap().presence, Presence::DefaultDictionary);
        assert_eq!(field::META.key("Rect").unwrap().presence, Presence::Required);
    }
}
