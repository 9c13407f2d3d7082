//! Signature value metadata and the Contents/ByteRange placeholder protocol.
//!
//! This crate does not compute digests or build PKCS#7 tokens. It reserves
//! room for them: when a document is saved, every signature value
//! dictionary without an explicit `Contents` gets a zero-filled hex string
//! of a configured size and a fixed-width `ByteRange`. After the file is
//! assembled the writer fills in the real ByteRange and hands back a
//! [`SignaturePlaceholder`] per field so an external signer can
//!
//! 1. read the digest input with [`SignaturePlaceholder::signed_bytes`], and
//! 2. write its token with [`SignaturePlaceholder::embed`].
//!
//! ## PDF Specification Reference
//!
//! - ISO 32000-1:2008 Section 12.8 - Digital Signatures

mod byterange;
mod placeholder;
mod types;

pub(crate) use byterange::BYTE_RANGE_PLACEHOLDER;
pub use byterange::ByteRangeCalculator;
pub use placeholder::SignaturePlaceholder;
pub use types::{SignatureFilter, SignatureSubFilter};
