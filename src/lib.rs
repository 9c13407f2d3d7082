// Allow some clippy lints that are too pedantic for this project
#![allow(clippy::too_many_arguments)]
#![allow(clippy::should_implement_trait)]
#![allow(clippy::new_without_default)]
// Allow unused for tests
#![cfg_attr(test, allow(dead_code))]
#![cfg_attr(test, allow(unused_variables))]

//! # PDF Signature Fields
//!
//! Authoring-side support for PDF digital signature fields: a mutable PDF
//! object graph, an indirect reference table, signature fields with lazily
//! rendered appearances, and reserved `Contents`/`ByteRange` slots for an
//! external signer.
//!
//! ## Core Features
//!
//! - **Object graph**: ordered dictionaries with typed keys, pure reads and
//!   explicit lazy creation of nested dictionaries
//! - **Indirect references**: identity-keyed registration, idempotent per
//!   instance, with cross-document and dangling reference detection
//! - **Signature fields**: merged field/widget dictionaries with a
//!   separately registered signature value (ISO 32000-1:2008 §12.7.4.5)
//! - **Deferred appearances**: a two-phase finalization pass renders visible
//!   fields through a caller-supplied handler at save time
//! - **Signing placeholders**: the writer reserves the token and reports the
//!   byte range to digest (ISO 32000-1:2008 §12.8)
//!
//! ## Quick Start
//!
//! ```ignore
//! use pdf_sigfield::{Document, Rect};
//! use pdf_sigfield::writer::DefaultSignatureAppearance;
//! use std::rc::Rc;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut doc = Document::new();
//! doc.add_letter_page()?;
//! let id = doc.add_signature_field()?;
//!
//! let mut field = doc.signature_field_mut(id)?;
//! field.set_reason("Approved")?;
//! field.set_rectangle(Rect::new(72.0, 72.0, 272.0, 122.0))?;
//! field.set_appearance_handler(Rc::new(DefaultSignatureAppearance::new().with_reason("Approved")))?;
//!
//! let mut saved = doc.save()?;
//! let placeholder = saved.placeholders[0].clone();
//! let to_sign = placeholder.signed_bytes(&saved.bytes)?;
//! let token = external_signer(&to_sign);
//! placeholder.embed(&mut saved.bytes, &token)?;
//! # Ok(())
//! # }
//! ```
//!
//! ## License
//!
//! Licensed under either of:
//!
//! * Apache License, Version 2.0 ([LICENSE-APACHE](LICENSE-APACHE) or <http://www.apache.org/licenses/LICENSE-2.0>)
//! * MIT license ([LICENSE-MIT](LICENSE-MIT) or <http://opensource.org/licenses/MIT>)
//!
//! at your option.

#![warn(missing_docs)]

// Error handling
pub mod error;

// Object graph
pub mod dictionary;
pub mod keys;
pub mod object;
pub mod xref;

// Geometry
pub mod geometry;

// Authoring
pub mod config;
pub mod document;
pub mod finalize;

// Signature placeholders and metadata
pub mod signatures;

// PDF writing/creation
pub mod writer;

// Re-exports
pub use config::SignatureFieldConfig;
pub use dictionary::Dictionary;
pub use document::Document;
pub use error::{Error, Result};
pub use finalize::{FinalizationPass, FinalizationReport, PrepareForSave, Prepared};
pub use geometry::Rect;
pub use object::{Object, ObjectRef};
pub use signatures::{ByteRangeCalculator, SignatureFilter, SignaturePlaceholder, SignatureSubFilter};
pub use writer::form_fields::{
    DefaultSignatureAppearance, SignatureAppearanceHandler, SignatureFieldFlags, SignatureFieldId,
    SignatureFieldMut, SignatureFieldRef,
};
pub use writer::{PdfWriter, PdfWriterConfig, SavedDocument};
pub use xref::IndirectReferenceTable;

// Version info
/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
