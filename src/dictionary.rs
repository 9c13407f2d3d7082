//! Ordered PDF dictionaries with a typed accessor layer.
//!
//! A [`Dictionary`] keeps its entries in insertion order and carries an
//! instance identity (shared by clones) plus the document that created it.
//! When a [`DictionaryMeta`] schema is attached, reads honour the declared
//! required/optional policy and typed getters check the stored value type.
//!
//! # Lazy defaults
//!
//! [`Dictionary::get`] is a pure read. Mutable access through
//! [`Dictionary::get_dictionary_mut`] or [`Dictionary::get_or_create`]
//! creates and attaches the missing value as a side effect. A nested
//! dictionary created this way inherits the owning document but is **not**
//! registered in the reference table; registration is up to the caller.

use crate::error::{Error, Result};
use crate::geometry::Rect;
use crate::keys::{DictionaryMeta, KeyType, Presence};
use crate::object::{DocumentId, InstanceId, Object, ObjectRef};
use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, Offset, TimeZone, Timelike};
use indexmap::IndexMap;
use std::cell::Cell;
use std::rc::Rc;

/// An ordered name → object map.
///
/// Clones share the instance identity and the owner slot: once any copy is
/// registered with a document, every copy belongs to that document.
#[derive(Debug, Clone)]
pub struct Dictionary {
    instance: InstanceId,
    owner: Rc<Cell<Option<DocumentId>>>,
    meta: Option<&'static DictionaryMeta>,
    entries: IndexMap<String, Object>,
}

impl PartialEq for Dictionary {
    /// Dictionaries compare by contents, not identity.
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl Default for Dictionary {
    fn default() -> Self {
        Self::new()
    }
}

impl Dictionary {
    /// Create an empty dictionary not tied to any document.
    pub fn new() -> Self {
        Self {
            instance: InstanceId::next(),
            owner: Rc::new(Cell::new(None)),
            meta: None,
            entries: IndexMap::new(),
        }
    }

    /// Create an empty dictionary described by `meta`.
    pub fn with_meta(meta: &'static DictionaryMeta) -> Self {
        Self {
            meta: Some(meta),
            ..Self::new()
        }
    }

    pub(crate) fn new_owned(owner: DocumentId, meta: Option<&'static DictionaryMeta>) -> Self {
        Self {
            owner: Rc::new(Cell::new(Some(owner))),
            meta,
            ..Self::new()
        }
    }

    /// Empty dictionary in the same document as `self`, with a fresh identity.
    fn child(&self) -> Self {
        Self {
            owner: Rc::new(Cell::new(self.owner())),
            ..Self::new()
        }
    }

    /// Instance identity of this dictionary.
    pub fn instance(&self) -> InstanceId {
        self.instance
    }

    /// Document that created this dictionary, if any.
    pub fn owner(&self) -> Option<DocumentId> {
        self.owner.get()
    }

    /// Claim this instance, and every clone of it, for `owner`.
    pub(crate) fn adopt(&self, owner: DocumentId) {
        self.owner.set(Some(owner));
    }

    /// Attached schema, if any.
    pub fn meta(&self) -> Option<&'static DictionaryMeta> {
        self.meta
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the dictionary has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether `key` is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Values in insertion order.
    pub fn values(&self) -> impl Iterator<Item = &Object> {
        self.entries.values()
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Object)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Store `value` under `key`, returning the previous value.
    ///
    /// Overwriting keeps the key's original position; new keys go last.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Object>) -> Option<Object> {
        self.entries.insert(key.into(), value.into())
    }

    /// Stored value without any schema policy.
    pub fn get_raw(&self, key: &str) -> Option<&Object> {
        self.entries.get(key)
    }

    /// Mutable stored value without any schema policy.
    pub fn get_raw_mut(&mut self, key: &str) -> Option<&mut Object> {
        self.entries.get_mut(key)
    }

    /// Read `key`.
    ///
    /// Returns `Ok(None)` for absent optional keys and absent keys that
    /// default to a nested dictionary (a pure read never creates anything).
    /// Fails with [`Error::MissingRequiredKey`] when the schema marks the key
    /// required and it is absent.
    pub fn get(&self, key: &str) -> Result<Option<&Object>> {
        match self.entries.get(key) {
            Some(value) => Ok(Some(value)),
            None => match self.presence(key) {
                Some(Presence::Required) => Err(Error::MissingRequiredKey {
                    key: key.to_string(),
                }),
                _ => Ok(None),
            },
        }
    }

    /// Return the value under `key`, first storing `default()` if absent.
    ///
    /// This is a read that may write. An existing value is never replaced.
    pub fn get_or_create(&mut self, key: &str, default: impl FnOnce() -> Object) -> &mut Object {
        self.entries.entry(key.to_string()).or_insert_with(|| {
            log::trace!("Creating default value for /{}", key);
            default()
        })
    }

    /// Nested dictionary under `key`, creating and attaching an empty one if
    /// absent.
    ///
    /// With a schema attached, only keys declared [`Presence::DefaultDictionary`]
    /// are created. An absent key fails with [`Error::MissingRequiredKey`] if
    /// declared required and [`Error::NoDefaultValue`] if optional. Undeclared
    /// keys fail with [`Error::UndeclaredKey`]. Without a schema any absent
    /// key is created.
    ///
    /// The created dictionary belongs to the same document but is not
    /// registered. Fails with [`Error::InvalidObjectType`] if the key holds a
    /// non-dictionary value (including an indirect reference, which must be
    /// resolved through the reference table) or is declared with another type.
    pub fn get_dictionary_mut(&mut self, key: &str) -> Result<&mut Dictionary> {
        if let Some(meta) = self.meta {
            let info = meta.key(key).ok_or_else(|| Error::UndeclaredKey {
                key: key.to_string(),
                dictionary: meta.name,
            })?;
            if info.kind != KeyType::Dictionary {
                return Err(Error::InvalidObjectType {
                    key: key.to_string(),
                    expected: KeyType::Dictionary.type_name().to_string(),
                    found: info.kind.type_name().to_string(),
                });
            }
            if !self.entries.contains_key(key) {
                match info.presence {
                    Presence::DefaultDictionary => {},
                    Presence::Required => {
                        return Err(Error::MissingRequiredKey {
                            key: key.to_string(),
                        })
                    },
                    Presence::Optional => {
                        return Err(Error::NoDefaultValue {
                            key: key.to_string(),
                        })
                    },
                }
            }
        }
        let child = self.child();
        match self.get_or_create(key, || Object::Dictionary(child)) {
            Object::Dictionary(dict) => Ok(dict),
            other => Err(type_error(key, "Dictionary", other)),
        }
    }

    /// Nested dictionary under `key` without creating it.
    pub fn get_dictionary(&self, key: &str) -> Result<Option<&Dictionary>> {
        match self.get(key)? {
            None => Ok(None),
            Some(Object::Dictionary(dict)) => Ok(Some(dict)),
            Some(other) => Err(type_error(key, "Dictionary", other)),
        }
    }

    /// Name value under `key`.
    pub fn get_name(&self, key: &str) -> Result<Option<&str>> {
        match self.get(key)? {
            None => Ok(None),
            Some(Object::Name(name)) => Ok(Some(name)),
            Some(other) => Err(type_error(key, "Name", other)),
        }
    }

    /// Store a name value.
    pub fn set_name(&mut self, key: &str, name: impl Into<String>) {
        self.set(key, Object::Name(name.into()));
    }

    /// Raw byte string under `key`.
    pub fn get_bytes(&self, key: &str) -> Result<Option<&[u8]>> {
        match self.get(key)? {
            None => Ok(None),
            Some(Object::String(bytes)) => Ok(Some(bytes)),
            Some(other) => Err(type_error(key, "String", other)),
        }
    }

    /// Text string under `key`, decoded from PDFDocEncoding or UTF-16BE.
    pub fn get_text(&self, key: &str) -> Result<Option<String>> {
        Ok(self.get_bytes(key)?.map(decode_text_string))
    }

    /// Store a text string.
    pub fn set_text(&mut self, key: &str, text: &str) {
        self.set(key, Object::String(encode_text_string(text)));
    }

    /// Integer value under `key`.
    pub fn get_integer(&self, key: &str) -> Result<Option<i64>> {
        match self.get(key)? {
            None => Ok(None),
            Some(Object::Integer(i)) => Ok(Some(*i)),
            Some(other) => Err(type_error(key, "Integer", other)),
        }
    }

    /// Store an integer value.
    pub fn set_integer(&mut self, key: &str, value: i64) {
        self.set(key, Object::Integer(value));
    }

    /// Numeric value under `key` (integer or real).
    pub fn get_real(&self, key: &str) -> Result<Option<f64>> {
        match self.get(key)? {
            None => Ok(None),
            Some(obj) => obj
                .as_number()
                .map(Some)
                .ok_or_else(|| type_error(key, "Real", obj)),
        }
    }

    /// Date value under `key`.
    pub fn get_date(&self, key: &str) -> Result<Option<DateTime<FixedOffset>>> {
        match self.get_bytes(key)? {
            None => Ok(None),
            Some(bytes) => parse_pdf_date(bytes).map(Some).ok_or_else(|| Error::InvalidObjectType {
                key: key.to_string(),
                expected: "Date".to_string(),
                found: String::from_utf8_lossy(bytes).into_owned(),
            }),
        }
    }

    /// Store a date value.
    pub fn set_date<Tz: TimeZone>(&mut self, key: &str, date: &DateTime<Tz>) {
        self.set(key, Object::String(format_pdf_date(date).into_bytes()));
    }

    /// Rectangle value under `key`.
    pub fn get_rectangle(&self, key: &str) -> Result<Option<Rect>> {
        match self.get(key)? {
            None => Ok(None),
            Some(obj) => Rect::from_object(obj)
                .map(Some)
                .ok_or_else(|| type_error(key, "Rectangle", obj)),
        }
    }

    /// Store a rectangle value.
    pub fn set_rectangle(&mut self, key: &str, rect: Rect) {
        self.set(key, rect.to_object());
    }

    /// Array value under `key`.
    pub fn get_array(&self, key: &str) -> Result<Option<&Vec<Object>>> {
        match self.get(key)? {
            None => Ok(None),
            Some(Object::Array(items)) => Ok(Some(items)),
            Some(other) => Err(type_error(key, "Array", other)),
        }
    }

    /// Indirect reference under `key`.
    pub fn get_reference(&self, key: &str) -> Result<Option<ObjectRef>> {
        match self.get(key)? {
            None => Ok(None),
            Some(Object::Reference(r)) => Ok(Some(*r)),
            Some(other) => Err(type_error(key, "Reference", other)),
        }
    }

    /// Check every declared key that is present against its declared type.
    pub fn validate(&self) -> Result<()> {
        let Some(meta) = self.meta else {
            return Ok(());
        };
        for info in meta.keys {
            if let Some(value) = self.entries.get(info.key) {
                if !info.kind.accepts(value) {
                    return Err(type_error(info.key, info.kind.type_name(), value));
                }
            }
        }
        Ok(())
    }

    fn presence(&self, key: &str) -> Option<Presence> {
        self.meta.and_then(|m| m.key(key)).map(|info| info.presence)
    }
}

fn type_error(key: &str, expected: &str, found: &Object) -> Error {
    Error::InvalidObjectType {
        key: key.to_string(),
        expected: expected.to_string(),
        found: found.type_name().to_string(),
    }
}

/// Encode a text string: ASCII is stored as-is, anything else as UTF-16BE
/// with a byte order mark (ISO 32000-1:2008 Section 7.9.2.2).
pub fn encode_text_string(text: &str) -> Vec<u8> {
    if text.is_ascii() {
        return text.as_bytes().to_vec();
    }
    let mut bytes = Vec::with_capacity(2 + text.len() * 2);
    bytes.extend_from_slice(&[0xFE, 0xFF]);
    for unit in text.encode_utf16() {
        bytes.extend_from_slice(&unit.to_be_bytes());
    }
    bytes
}

/// Decode a text string written by [`encode_text_string`] or by another
/// producer using UTF-16BE or a Latin-1 compatible single-byte encoding.
pub fn decode_text_string(bytes: &[u8]) -> String {
    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let units: Vec<u16> = bytes[2..]
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect();
        return String::from_utf16_lossy(&units);
    }
    bytes.iter().map(|&b| b as char).collect()
}

/// Format a date as `D:YYYYMMDDHHmmSS+HH'mm'`.
pub fn format_pdf_date<Tz: TimeZone>(date: &DateTime<Tz>) -> String {
    let offset_secs = date.offset().fix().local_minus_utc();
    let sign = if offset_secs < 0 { '-' } else { '+' };
    let abs = offset_secs.unsigned_abs();
    format!(
        "D:{:04}{:02}{:02}{:02}{:02}{:02}{}{:02}'{:02}'",
        date.year(),
        date.month(),
        date.day(),
        date.hour(),
        date.minute(),
        date.second(),
        sign,
        abs / 3600,
        (abs % 3600) / 60
    )
}

/// Parse a PDF date string. Missing trailing fields take their defaults
/// (month/day 1, time 0, UTC).
pub fn parse_pdf_date(bytes: &[u8]) -> Option<DateTime<FixedOffset>> {
    let text = std::str::from_utf8(bytes).ok()?;
    let text = text.strip_prefix("D:").unwrap_or(text);
    let digits_len = text.bytes().take_while(u8::is_ascii_digit).count();
    if digits_len < 4 {
        return None;
    }
    let (digits, tz) = text.split_at(digits_len);

    let field = |start: usize, len: usize, default: u32| -> Option<u32> {
        match digits.get(start..start + len) {
            Some(s) => s.parse().ok(),
            None => Some(default),
        }
    };
    let year = digits.get(0..4)?.parse::<i32>().ok()?;
    let month = field(4, 2, 1)?;
    let day = field(6, 2, 1)?;
    let hour = field(8, 2, 0)?;
    let minute = field(10, 2, 0)?;
    let second = field(12, 2, 0)?;

    let offset = parse_pdf_offset(tz)?;
    let naive = NaiveDate::from_ymd_opt(year, month, day)?.and_hms_opt(hour, minute, second)?;
    offset.from_local_datetime(&naive).single()
}

fn parse_pdf_offset(tz: &str) -> Option<FixedOffset> {
    let mut chars = tz.chars();
    let sign = match chars.next() {
        None | Some('Z') => return FixedOffset::east_opt(0),
        Some('+') => 1,
        Some('-') => -1,
        Some(_) => return None,
    };
    let rest: String = chars.filter(|c| c.is_ascii_digit()).collect();
    let hours: i32 = rest.get(0..2).unwrap_or("0").parse().ok()?;
    let minutes: i32 = rest.get(2..4).unwrap_or("0").parse().ok()?;
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::{field, signature_value, KeyInfo};

    #[test]
    fn test_set_preserves_insertion_order() {
        let mut dict = Dictionary::new();
        dict.set("B", Object::Integer(1));
        dict.set("A", Object::Integer(2));
        dict.set("B", Object::Integer(3));

        let keys: Vec<_> = dict.keys().collect();
        assert_eq!(keys, vec!["B", "A"]);
        assert_eq!(dict.get_raw("B"), Some(&Object::Integer(3)));
    }

    #[test]
    fn test_required_key_missing() {
        let dict = Dictionary::with_meta(&signature_value::META);
        let err = dict.get("Filter").unwrap_err();
        assert!(matches!(err, Error::MissingRequiredKey { ref key } if key == "Filter"));
    }

    #[test]
    fn test_optional_key_missing_is_none() {
        let dict = Dictionary::with_meta(&signature_value::META);
        assert!(dict.get("Reason").unwrap().is_none());
        assert!(dict.get_text("Reason").unwrap().is_none());
    }

    #[test]
    fn test_pure_get_does_not_create_default() {
        let dict = Dictionary::with_meta(&field::META);
        assert!(dict.get("AP").unwrap().is_none());
        assert!(!dict.contains_key("AP"));
    }

    #[test]
    fn test_get_dictionary_mut_creates_and_attaches() {
        let mut dict = Dictionary::with_meta(&field::META);
        let parent_owner = dict.owner();
        let created_instance = {
            let ap = dict.get_dictionary_mut("AP").unwrap();
            assert!(ap.is_empty());
            assert_eq!(ap.owner(), parent_owner);
            ap.instance()
        };
        assert!(dict.contains_key("AP"));
        assert_ne!(created_instance, dict.instance());

        // Second access returns the same nested dictionary
        let again = dict.get_dictionary_mut("AP").unwrap().instance();
        assert_eq!(again, created_instance);
    }

    #[test]
    fn test_get_dictionary_mut_keeps_existing_value() {
        let mut dict = Dictionary::new();
        let mut ap = Dictionary::new();
        ap.set("N", ObjectRef::new(5, 0));
        dict.set("AP", ap);

        let nested = dict.get_dictionary_mut("AP").unwrap();
        assert_eq!(nested.get_raw("N"), Some(&Object::Reference(ObjectRef::new(5, 0))));
    }

    #[test]
    fn test_get_dictionary_mut_rejects_other_types() {
        let mut dict = Dictionary::new();
        dict.set("V", ObjectRef::new(2, 0));
        let err = dict.get_dictionary_mut("V").unwrap_err();
        assert!(matches!(err, Error::InvalidObjectType { .. }));
        // The reference is untouched
        assert_eq!(dict.get_raw("V"), Some(&Object::Reference(ObjectRef::new(2, 0))));
    }

    #[test]
    fn test_get_dictionary_mut_rejects_declared_non_dictionary() {
        let mut dict = Dictionary::with_meta(&field::META);
        assert!(dict.get_dictionary_mut("Rect").is_err());
        assert!(!dict.contains_key("Rect"));
    }

    static NESTED: DictionaryMeta = DictionaryMeta {
        name: "Nested",
        keys: &[
            KeyInfo {
                key: "Req",
                kind: KeyType::Dictionary,
                presence: Presence::Required,
            },
            KeyInfo {
                key: "Opt",
                kind: KeyType::Dictionary,
                presence: Presence::Optional,
            },
            KeyInfo {
                key: "Def",
                kind: KeyType::Dictionary,
                presence: Presence::DefaultDictionary,
            },
        ],
    };

    #[test]
    fn test_get_dictionary_mut_creates_only_default_keys() {
        let mut dict = Dictionary::with_meta(&NESTED);
        assert!(dict.get_dictionary_mut("Def").unwrap().is_empty());
        assert!(dict.contains_key("Def"));
    }

    #[test]
    fn test_get_dictionary_mut_required_absent() {
        let mut dict = Dictionary::with_meta(&NESTED);
        assert!(matches!(
            dict.get_dictionary_mut("Req"),
            Err(Error::MissingRequiredKey { ref key }) if key == "Req"
        ));
        assert!(dict.is_empty());

        dict.set("Req", Dictionary::new());
        assert!(dict.get_dictionary_mut("Req").is_ok());
    }

    #[test]
    fn test_get_dictionary_mut_optional_absent() {
        let mut dict = Dictionary::with_meta(&NESTED);
        assert!(matches!(
            dict.get_dictionary_mut("Opt"),
            Err(Error::NoDefaultValue { .. })
        ));
        assert!(!dict.contains_key("Opt"));

        dict.set("Opt", Dictionary::new());
        assert!(dict.get_dictionary_mut("Opt").is_ok());
    }

    #[test]
    fn test_get_dictionary_mut_undeclared_key() {
        let mut dict = Dictionary::with_meta(&signature_value::META);
        assert!(matches!(
            dict.get_dictionary_mut("Undeclared"),
            Err(Error::UndeclaredKey { dictionary: "SignatureValue", .. })
        ));
        assert!(!dict.contains_key("Undeclared"));

        // Without a schema any key may default
        let mut plain = Dictionary::new();
        assert!(plain.get_dictionary_mut("Undeclared").is_ok());
    }

    #[test]
    fn test_clones_share_owner() {
        let dict = Dictionary::new();
        let copy = dict.clone();
        let owner = DocumentId::next();
        dict.adopt(owner);
        assert_eq!(copy.owner(), Some(owner));
        assert_eq!(Dictionary::new().owner(), None);
    }

    #[test]
    fn test_get_or_create_keeps_existing() {
        let mut dict = Dictionary::new();
        dict.set("Ff", Object::Integer(132));
        let value = dict.get_or_create("Ff", || Object::Integer(0));
        assert_eq!(*value, Object::Integer(132));
    }

    #[test]
    fn test_typed_getter_type_mismatch() {
        let mut dict = Dictionary::new();
        dict.set_name("Reason", "NotAString");
        let err = dict.get_text("Reason").unwrap_err();
        assert!(matches!(err, Error::InvalidObjectType { ref expected, .. } if expected == "String"));
    }

    #[test]
    fn test_text_string_round_trip() {
        for text in ["Approved", "", "Köln", "署名", "emoji 🙂"] {
            let mut dict = Dictionary::new();
            dict.set_text("Reason", text);
            assert_eq!(dict.get_text("Reason").unwrap().as_deref(), Some(text));
        }
    }

    #[test]
    fn test_non_ascii_uses_utf16_bom() {
        let bytes = encode_text_string("é");
        assert_eq!(bytes, vec![0xFE, 0xFF, 0x00, 0xE9]);
    }

    #[test]
    fn test_date_round_trip() {
        let offset = FixedOffset::east_opt(2 * 3600).unwrap();
        let date = offset.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap();

        let mut dict = Dictionary::new();
        dict.set_date("M", &date);
        assert_eq!(dict.get_raw("M"), Some(&Object::string("D:20240309140507+02'00'")));
        assert_eq!(dict.get_date("M").unwrap(), Some(date));
    }

    #[test]
    fn test_parse_partial_and_negative_dates() {
        let d = parse_pdf_date(b"D:2023").unwrap();
        assert_eq!((d.year(), d.month(), d.day()), (2023, 1, 1));

        let d = parse_pdf_date(b"D:20231231235959-05'30'").unwrap();
        assert_eq!(d.offset().local_minus_utc(), -(5 * 3600 + 30 * 60));

        let d = parse_pdf_date(b"D:20231231235959Z").unwrap();
        assert_eq!(d.offset().local_minus_utc(), 0);

        assert!(parse_pdf_date(b"yesterday").is_none());
    }

    #[test]
    fn test_rectangle_accessor() {
        let mut dict = Dictionary::with_meta(&field::META);
        assert!(matches!(
            dict.get_rectangle("Rect"),
            Err(Error::MissingRequiredKey { .. })
        ));
        dict.set_rectangle("Rect", Rect::new(1.0, 2.0, 3.0, 4.0));
        assert_eq!(dict.get_rectangle("Rect").unwrap(), Some(Rect::new(1.0, 2.0, 3.0, 4.0)));
    }

    #[test]
    fn test_validate_reports_wrong_type() {
        let mut dict = Dictionary::with_meta(&signature_value::META);
        dict.set_name("Filter", "Adobe.PPKLite");
        assert!(dict.validate().is_ok());
        dict.set("Filter", Object::Integer(1));
        assert!(dict.validate().is_err());
    }

    #[test]
    fn test_equality_ignores_identity() {
        let mut a = Dictionary::new();
        let mut b = Dictionary::new();
        a.set_integer("X", 1);
        b.set_integer("X", 1);
        assert_ne!(a.instance(), b.instance());
        assert_eq!(a, b);
    }
}
