//! Signature form fields for PDF generation.
//!
//! Signature fields are interactive form fields of type `Sig`
//! (ISO 32000-1:2008 Section 12.7.4.5). Each field is a merged field/widget
//! annotation whose `V` refers to a signature value dictionary that an
//! external signer later fills in.
//!
//! # Example
//!
//! ```ignore
//! use pdf_sigfield::document::Document;
//! use pdf_sigfield::geometry::Rect;
//! use pdf_sigfield::writer::form_fields::DefaultSignatureAppearance;
//! use std::rc::Rc;
//!
//! let mut doc = Document::new();
//! doc.add_letter_page()?;
//! let id = doc.add_signature_field()?;
//!
//! let mut field = doc.signature_field_mut(id)?;
//! field.set_rectangle(Rect::new(72.0, 72.0, 272.0, 122.0))?;
//! field.set_reason("Approved")?;
//! field.set_appearance_handler(Rc::new(
//!     DefaultSignatureAppearance::new().with_reason("Approved"),
//! ))?;
//! ```

mod field_flags;
mod signature_field;

pub use field_flags::SignatureFieldFlags;
pub use signature_field::{
    DefaultSignatureAppearance, SignatureAppearanceHandler, SignatureField, SignatureFieldId,
    SignatureFieldMut, SignatureFieldRef,
};
