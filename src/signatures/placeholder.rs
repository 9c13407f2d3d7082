//! Reserved signature slots in a saved document.

use super::byterange::ByteRangeCalculator;
use crate::error::Result;
use crate::object::ObjectRef;
use std::ops::Range;

/// Location of one signature's reserved `Contents` in saved bytes.
///
/// Produced by the writer for every signature value dictionary that had no
/// `Contents` of its own. The `ByteRange` in the file already describes
/// `contents`; an external signer digests [`signed_bytes`](Self::signed_bytes)
/// and writes its token back with [`embed`](Self::embed).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignaturePlaceholder {
    /// Partial name of the owning field
    pub field_name: String,
    /// Identity of the signature value dictionary
    pub value_ref: ObjectRef,
    /// Span of the hex string, angle brackets included
    pub contents: Range<usize>,
    /// Span of the ByteRange array, padding included
    pub byte_range_span: Range<usize>,
    /// ByteRange written into the file
    pub byte_range: [i64; 4],
}

impl SignaturePlaceholder {
    /// Raw bytes the hex string can hold.
    pub fn capacity(&self) -> usize {
        self.calculator().capacity()
    }

    /// Bytes covered by the ByteRange, in order.
    pub fn signed_bytes(&self, pdf: &[u8]) -> Result<Vec<u8>> {
        ByteRangeCalculator::validate_byte_range(&self.byte_range, pdf.len())?;
        ByteRangeCalculator::extract_signed_bytes(pdf, &self.byte_range)
    }

    /// Write `token` into the reserved span.
    ///
    /// The token is hex-encoded and zero-padded, so the file length and
    /// the ByteRange stay valid.
    pub fn embed(&self, pdf: &mut [u8], token: &[u8]) -> Result<()> {
        self.calculator().insert_signature(pdf, self.contents.start, token)?;
        log::debug!(
            "Embedded {} byte signature into field '{}'",
            token.len(),
            self.field_name
        );
        Ok(())
    }

    fn calculator(&self) -> ByteRangeCalculator {
        ByteRangeCalculator::with_placeholder_size(self.contents.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn placeholder() -> (Vec<u8>, SignaturePlaceholder) {
        // "HEAD<000000>TAIL": contents at 4..12
        let pdf = b"HEAD<000000>TAIL".to_vec();
        let p = SignaturePlaceholder {
            field_name: "Signature1".to_string(),
            value_ref: ObjectRef::new(3, 0),
            contents: 4..12,
            byte_range_span: 0..0,
            byte_range: [0, 4, 12, 4],
        };
        (pdf, p)
    }

    #[test]
    fn test_signed_bytes_skip_contents() {
        let (pdf, p) = placeholder();
        assert_eq!(p.signed_bytes(&pdf).unwrap(), b"HEADTAIL");
        assert_eq!(p.capacity(), 3);
    }

    #[test]
    fn test_embed_preserves_length() {
        let (mut pdf, p) = placeholder();
        p.embed(&mut pdf, &[0x01, 0xFF]).unwrap();
        assert_eq!(&pdf, b"HEAD<01FF00>TAIL");
        assert_eq!(p.signed_bytes(&pdf).unwrap(), b"HEADTAIL");
    }

    #[test]
    fn test_embed_too_large() {
        let (mut pdf, p) = placeholder();
        let err = p.embed(&mut pdf, &[0; 4]).unwrap_err();
        assert!(matches!(err, Error::PlaceholderTooSmall { .. }));
    }
}
