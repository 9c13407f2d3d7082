//! PDF writing module.
//!
//! ## Architecture
//!
//! ```text
//! Document (IndirectReferenceTable + pages + signature fields)
//!     ↓
//! [FinalizationPass] (appearance streams via AppearanceStreamBuilder)
//!     ↓
//! [PdfWriter] (catalog, AcroForm, xref, trailer, signature placeholders)
//!     ↓
//! [ObjectSerializer] (serializes PDF objects)
//!     ↓
//! SavedDocument { bytes, placeholders }
//! ```
//!
//! ## Drawing an appearance
//!
//! ```ignore
//! use pdf_sigfield::writer::{AppearanceStreamBuilder, ContentStreamBuilder};
//! use pdf_sigfield::geometry::Rect;
//!
//! let mut builder = AppearanceStreamBuilder::for_widget(Rect::new(72.0, 72.0, 272.0, 122.0));
//! builder
//!     .surface()
//!     .begin_text()
//!     .set_font("Helvetica", 10.0)
//!     .text("Approved", 4.0, 20.0)
//!     .end_text();
//! let stream = builder.finish()?;
//! ```

mod acroform;
mod appearance_stream;
mod content_stream;
pub mod form_fields;
mod object_serializer;
mod pdf_writer;

pub use acroform::{AcroFormBuilder, SIG_FLAG_APPEND_ONLY, SIG_FLAG_SIGNATURES_EXIST};
pub use appearance_stream::AppearanceStreamBuilder;
pub use content_stream::{ContentStreamBuilder, ContentStreamOp};
pub use form_fields::{
    DefaultSignatureAppearance, SignatureAppearanceHandler, SignatureFieldFlags, SignatureFieldId,
    SignatureFieldMut, SignatureFieldRef,
};
pub use object_serializer::{ObjectSerializer, TrackedSpan};
pub use pdf_writer::{PdfWriter, PdfWriterConfig, SavedDocument};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_module_exports() {
        let _serializer = ObjectSerializer::new();
        let _builder = ContentStreamBuilder::new();
        let _writer = PdfWriter::new();
    }
}
