//! PDF object serialization.
//!
//! Serializes PDF objects to their byte representation according to
//! PDF specification ISO 32000-1:2008. Dictionaries are written in
//! insertion order so output follows the order entries were authored in.

use crate::dictionary::Dictionary;
use crate::error::Result;
use crate::object::{Object, Stream};
use std::io::Write;
use std::ops::Range;

/// Byte span of one top-level dictionary value inside serialized output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackedSpan {
    /// Dictionary key whose value was tracked
    pub key: String,
    /// Span of the value, relative to the start of the returned buffer
    pub span: Range<usize>,
}

/// Serializer for PDF objects.
///
/// Converts PDF Object types to their byte representation following
/// the PDF specification syntax rules.
#[derive(Debug, Clone, Default)]
pub struct ObjectSerializer {
    /// Whether to use compact formatting (minimal whitespace)
    compact: bool,
}

impl ObjectSerializer {
    /// Create a new object serializer with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a compact serializer (minimal whitespace).
    pub fn compact() -> Self {
        Self { compact: true }
    }

    /// Serialize an object to bytes.
    pub fn serialize(&self, obj: &Object) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        self.write_object(&mut buf, obj)?;
        Ok(buf)
    }

    /// Serialize an object to a string (for debugging).
    pub fn serialize_to_string(&self, obj: &Object) -> String {
        self.serialize(obj)
            .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
            .unwrap_or_default()
    }

    /// Serialize an indirect object definition.
    ///
    /// Format: `{id} {gen} obj\n{object}\nendobj\n`
    pub fn serialize_indirect(&self, id: u32, gen: u16, obj: &Object) -> Result<Vec<u8>> {
        let (buf, _) = self.serialize_indirect_tracked(id, gen, obj, &[])?;
        Ok(buf)
    }

    /// Serialize an indirect object and report where the values of `keys`
    /// landed, for a top-level dictionary (or stream dictionary).
    ///
    /// Keys that are absent are simply not reported.
    pub fn serialize_indirect_tracked(
        &self,
        id: u32,
        gen: u16,
        obj: &Object,
        keys: &[&str],
    ) -> Result<(Vec<u8>, Vec<TrackedSpan>)> {
        let mut buf = Vec::new();
        let mut spans = Vec::new();
        writeln!(buf, "{} {} obj", id, gen)?;
        match obj {
            Object::Dictionary(dict) => self.write_dictionary_tracked(&mut buf, dict, keys, &mut spans)?,
            Object::Stream(stream) => {
                let dict = Self::dict_with_length(stream);
                self.write_dictionary_tracked(&mut buf, &dict, keys, &mut spans)?;
                self.write_stream_body(&mut buf, &stream.data)?;
            },
            other => self.write_object(&mut buf, other)?,
        }
        write!(buf, "\nendobj\n")?;
        Ok((buf, spans))
    }

    /// Write an object to a buffer.
    fn write_object<W: Write>(&self, w: &mut W, obj: &Object) -> std::io::Result<()> {
        match obj {
            Object::Null => write!(w, "null"),
            Object::Boolean(b) => write!(w, "{}", if *b { "true" } else { "false" }),
            Object::Integer(i) => write!(w, "{}", i),
            Object::Real(r) => self.write_real(w, *r),
            Object::String(s) => self.write_string(w, s),
            Object::Name(n) => self.write_name(w, n),
            Object::Array(arr) => self.write_array(w, arr),
            Object::Dictionary(dict) => self.write_dictionary(w, dict),
            Object::Stream(stream) => self.write_stream(w, stream),
            Object::Reference(r) => write!(w, "{} {} R", r.id, r.gen),
        }
    }

    /// Write a real number.
    ///
    /// Uses the shortest decimal that reads back as the same `f64`, so a
    /// rectangle's coordinates (and its visibility) survive the round trip.
    /// `Display` for floats never uses exponent notation, which PDF forbids.
    fn write_real<W: Write>(&self, w: &mut W, value: f64) -> std::io::Result<()> {
        if value == 0.0 || !value.is_finite() {
            write!(w, "0")
        } else {
            write!(w, "{}", value)
        }
    }

    /// Write a PDF string.
    ///
    /// Uses literal string syntax `(...)` with proper escaping,
    /// or hex string syntax `<...>` for binary data.
    fn write_string<W: Write>(&self, w: &mut W, data: &[u8]) -> std::io::Result<()> {
        let is_printable = data
            .iter()
            .all(|&b| b == b'\n' || b == b'\r' || b == b'\t' || (0x20..=0x7E).contains(&b));

        if is_printable {
            write!(w, "(")?;
            for &byte in data {
                match byte {
                    b'(' => write!(w, "\\(")?,
                    b')' => write!(w, "\\)")?,
                    b'\\' => write!(w, "\\\\")?,
                    b'\n' => write!(w, "\\n")?,
                    b'\r' => write!(w, "\\r")?,
                    b'\t' => write!(w, "\\t")?,
                    _ => w.write_all(&[byte])?,
                }
            }
            write!(w, ")")
        } else {
            write!(w, "<")?;
            for byte in data {
                write!(w, "{:02X}", byte)?;
            }
            write!(w, ">")
        }
    }

    /// Write a PDF name.
    ///
    /// Names start with `/` and escape special characters with `#xx`.
    fn write_name<W: Write>(&self, w: &mut W, name: &str) -> std::io::Result<()> {
        write!(w, "/")?;
        for byte in name.bytes() {
            match byte {
                b'!'
                | b'"'
                | b'$'..=b'&'
                | b'\''..=b'.'
                | b'0'..=b'9'
                | b';'
                | b'<'
                | b'>'
                | b'?'
                | b'@'
                | b'A'..=b'Z'
                | b'^'..=b'z'
                | b'|'
                | b'~' => {
                    w.write_all(&[byte])?;
                },
                _ => {
                    write!(w, "#{:02X}", byte)?;
                },
            }
        }
        Ok(())
    }

    /// Write a PDF array.
    fn write_array<W: Write>(&self, w: &mut W, arr: &[Object]) -> std::io::Result<()> {
        write!(w, "[")?;
        for (i, obj) in arr.iter().enumerate() {
            if i > 0 {
                write!(w, " ")?;
            }
            self.write_object(w, obj)?;
        }
        write!(w, "]")
    }

    /// Write a PDF dictionary.
    fn write_dictionary<W: Write>(&self, w: &mut W, dict: &Dictionary) -> std::io::Result<()> {
        write!(w, "<<")?;
        for (key, value) in dict.iter() {
            self.write_entry_prefix(w, key)?;
            self.write_object(w, value)?;
        }
        self.write_dictionary_close(w, dict)
    }

    /// Write a dictionary, recording the spans of selected values.
    fn write_dictionary_tracked(
        &self,
        buf: &mut Vec<u8>,
        dict: &Dictionary,
        keys: &[&str],
        spans: &mut Vec<TrackedSpan>,
    ) -> std::io::Result<()> {
        write!(buf, "<<")?;
        for (key, value) in dict.iter() {
            self.write_entry_prefix(buf, key)?;
            let start = buf.len();
            self.write_object(buf, value)?;
            if keys.contains(&key) {
                spans.push(TrackedSpan {
                    key: key.to_string(),
                    span: start..buf.len(),
                });
            }
        }
        self.write_dictionary_close(buf, dict)
    }

    fn write_entry_prefix<W: Write>(&self, w: &mut W, key: &str) -> std::io::Result<()> {
        if !self.compact {
            write!(w, "\n  ")?;
        }
        self.write_name(w, key)?;
        write!(w, " ")
    }

    fn write_dictionary_close<W: Write>(&self, w: &mut W, dict: &Dictionary) -> std::io::Result<()> {
        if !self.compact && !dict.is_empty() {
            writeln!(w)?;
        }
        write!(w, ">>")
    }

    /// Write a PDF stream.
    fn write_stream<W: Write>(&self, w: &mut W, stream: &Stream) -> std::io::Result<()> {
        self.write_dictionary(w, &Self::dict_with_length(stream))?;
        self.write_stream_body(w, &stream.data)
    }

    fn write_stream_body<W: Write>(&self, w: &mut W, data: &[u8]) -> std::io::Result<()> {
        write!(w, "\nstream\n")?;
        w.write_all(data)?;
        write!(w, "\nendstream")
    }

    /// Stream dictionary with `Length` matching the data actually written.
    fn dict_with_length(stream: &Stream) -> Dictionary {
        let mut dict = stream.dict.clone();
        dict.set("Length", Object::Integer(stream.data.len() as i64));
        dict
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::ObjectRef;

    #[test]
    fn test_serialize_scalars() {
        let s = ObjectSerializer::new();
        assert_eq!(s.serialize_to_string(&Object::Null), "null");
        assert_eq!(s.serialize_to_string(&Object::Boolean(true)), "true");
        assert_eq!(s.serialize_to_string(&Object::Integer(-123)), "-123");
    }

    #[test]
    fn test_serialize_real() {
        let s = ObjectSerializer::new();
        assert_eq!(s.serialize_to_string(&Object::Real(3.14258)), "3.14258");
        assert_eq!(s.serialize_to_string(&Object::Real(1.0)), "1");
        assert_eq!(s.serialize_to_string(&Object::Real(0.5)), "0.5");
        assert_eq!(s.serialize_to_string(&Object::Real(-0.0)), "0");
        assert_eq!(s.serialize_to_string(&Object::Real(1e-7)), "0.0000001");
        assert_eq!(s.serialize_to_string(&Object::Real(100.123456789)), "100.123456789");
    }

    #[test]
    fn test_serialize_string() {
        let s = ObjectSerializer::new();
        assert_eq!(s.serialize_to_string(&Object::String(b"Hello".to_vec())), "(Hello)");
        assert_eq!(
            s.serialize_to_string(&Object::String(b"Test (parens)".to_vec())),
            "(Test \\(parens\\))"
        );
    }

    #[test]
    fn test_serialize_hex_string() {
        let s = ObjectSerializer::new();
        assert_eq!(s.serialize_to_string(&Object::String(vec![0x00, 0xFF, 0x80])), "<00FF80>");
    }

    #[test]
    fn test_serialize_name_with_special_chars() {
        let s = ObjectSerializer::new();
        assert_eq!(s.serialize_to_string(&Object::name("Adobe.PPKLite")), "/Adobe.PPKLite");
        assert_eq!(
            s.serialize_to_string(&Object::name("Name With Space")),
            "/Name#20With#20Space"
        );
    }

    #[test]
    fn test_dictionary_keeps_insertion_order() {
        let s = ObjectSerializer::compact();
        let mut dict = Dictionary::new();
        dict.set_name("Type", "Sig");
        dict.set_name("Filter", "Adobe.PPKLite");
        dict.set("Count", Object::Integer(1));
        assert_eq!(
            s.serialize_to_string(&Object::Dictionary(dict)),
            "<</Type /Sig/Filter /Adobe.PPKLite/Count 1>>"
        );
    }

    #[test]
    fn test_serialize_reference() {
        let s = ObjectSerializer::new();
        let r = Object::Reference(ObjectRef::new(10, 0));
        assert_eq!(s.serialize_to_string(&r), "10 0 R");
    }

    #[test]
    fn test_serialize_indirect() {
        let s = ObjectSerializer::new();
        let bytes = s.serialize_indirect(1, 0, &Object::Integer(42)).unwrap();
        assert_eq!(bytes, b"1 0 obj\n42\nendobj\n");
    }

    #[test]
    fn test_serialize_stream_sets_length() {
        let s = ObjectSerializer::compact();
        let mut dict = Dictionary::new();
        dict.set("Length", Object::Integer(999));
        let stream = Object::Stream(Stream::new(dict, &b"stream data"[..]));

        let result = s.serialize_to_string(&stream);
        assert!(result.contains("/Length 11"));
        assert!(result.contains("stream\nstream data\nendstream"));
    }

    #[test]
    fn test_tracked_spans() {
        let s = ObjectSerializer::compact();
        let mut dict = Dictionary::new();
        dict.set_name("Type", "Sig");
        dict.set("Contents", Object::String(vec![0; 2]));
        let (bytes, spans) = s
            .serialize_indirect_tracked(3, 0, &Object::Dictionary(dict), &["Contents", "ByteRange"])
            .unwrap();

        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].key, "Contents");
        assert_eq!(&bytes[spans[0].span.clone()], b"<0000>");
    }
}
