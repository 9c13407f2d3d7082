//! PDF document model for authoring.
//!
//! A [`Document`] owns the [`IndirectReferenceTable`], the page tree and
//! the signature fields created in it. It is the only place new, owned
//! dictionaries come from, and the only way to reach a field for reading
//! or mutation.
//!
//! # Example
//!
//! ```no_run
//! use pdf_sigfield::document::Document;
//!
//! let mut doc = Document::new();
//! doc.add_letter_page()?;
//! let id = doc.add_signature_field()?;
//! doc.signature_field_mut(id)?.set_reason("Approved")?;
//!
//! let saved = doc.save_to_file("signed.pdf")?;
//! println!("{} placeholder(s)", saved.placeholders.len());
//! # Ok::<(), pdf_sigfield::error::Error>(())
//! ```

use crate::config::SignatureFieldConfig;
use crate::dictionary::Dictionary;
use crate::error::{Error, Result};
use crate::finalize::{FinalizationPass, FinalizationReport};
use crate::geometry::Rect;
use crate::object::{DocumentId, Object, ObjectRef};
use crate::writer::form_fields::{SignatureField, SignatureFieldId, SignatureFieldMut, SignatureFieldRef};
use crate::writer::{PdfWriter, PdfWriterConfig, SavedDocument};
use crate::xref::IndirectReferenceTable;
use std::path::Path;

/// A PDF document under construction.
#[derive(Debug)]
pub struct Document {
    id: DocumentId,
    objects: IndirectReferenceTable,
    pages_root: ObjectRef,
    pages: Vec<ObjectRef>,
    fields: Vec<SignatureField>,
    config: SignatureFieldConfig,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create an empty document with default field configuration.
    pub fn new() -> Self {
        Self::with_config(SignatureFieldConfig::default())
    }

    /// Create an empty document with custom field configuration.
    pub fn with_config(config: SignatureFieldConfig) -> Self {
        let id = DocumentId::next();
        let mut objects = IndirectReferenceTable::new(id);

        let mut root = Dictionary::new_owned(id, None);
        root.set_name("Type", "Pages");
        root.set("Kids", Object::Array(Vec::new()));
        root.set_integer("Count", 0);
        // Cannot fail: the table is empty and the root holds no references
        let pages_root = objects.register(root).unwrap_or(ObjectRef::new(1, 0));

        log::debug!("Created document {} (page tree {})", id.get(), pages_root);
        Self {
            id,
            objects,
            pages_root,
            pages: Vec::new(),
            fields: Vec::new(),
            config,
        }
    }

    /// Identity of this document.
    pub fn id(&self) -> DocumentId {
        self.id
    }

    /// Field defaults used by [`add_signature_field`](Self::add_signature_field).
    pub fn config(&self) -> &SignatureFieldConfig {
        &self.config
    }

    /// The reference table.
    pub fn objects(&self) -> &IndirectReferenceTable {
        &self.objects
    }

    /// Mutable reference table, for registering caller-built objects.
    pub fn objects_mut(&mut self) -> &mut IndirectReferenceTable {
        &mut self.objects
    }

    /// A new dictionary owned by this document. It is not registered.
    pub fn create_dictionary(&self) -> Dictionary {
        Dictionary::new_owned(self.id, None)
    }

    /// Root of the page tree.
    pub fn pages_root(&self) -> ObjectRef {
        self.pages_root
    }

    /// Pages in order.
    pub fn pages(&self) -> &[ObjectRef] {
        &self.pages
    }

    /// Append a page of `width` x `height` points.
    pub fn add_page(&mut self, width: f64, height: f64) -> Result<ObjectRef> {
        let mut page = self.create_dictionary();
        page.set_name("Type", "Page");
        page.set("Parent", self.pages_root);
        page.set_rectangle("MediaBox", Rect::new(0.0, 0.0, width, height));
        page.set("Resources", self.create_dictionary());
        let page_ref = self.objects.register(page)?;

        self.pages.push(page_ref);
        let kids = self.pages.iter().map(|r| Object::Reference(*r)).collect();
        let root = self.objects.dictionary_mut(self.pages_root)?;
        root.set("Kids", Object::Array(kids));
        root.set_integer("Count", self.pages.len() as i64);

        log::debug!("Added page {} ({}x{})", page_ref, width, height);
        Ok(page_ref)
    }

    /// Append a US Letter page (612 x 792).
    pub fn add_letter_page(&mut self) -> Result<ObjectRef> {
        self.add_page(612.0, 792.0)
    }

    /// Append an A4 page (595 x 842).
    pub fn add_a4_page(&mut self) -> Result<ObjectRef> {
        self.add_page(595.0, 842.0)
    }

    /// Create a signature field on the first page.
    ///
    /// The field and its signature value are registered immediately and
    /// the field is appended to the page's `Annots`. Fails with
    /// [`Error::NoPages`] if the document has no page yet.
    pub fn add_signature_field(&mut self) -> Result<SignatureFieldId> {
        let page = *self.pages.first().ok_or(Error::NoPages)?;

        // Annots must accept the field before anything is registered
        match self.objects.dictionary(page)?.get_raw("Annots") {
            None | Some(Object::Array(_)) => {},
            Some(other) => {
                return Err(Error::InvalidObjectType {
                    key: "Annots".to_string(),
                    expected: "Array".to_string(),
                    found: other.type_name().to_string(),
                })
            },
        }

        let field = SignatureField::create(&mut self.objects, page, &self.config)?;
        let annot = Object::Reference(field.field_ref());
        if let Object::Array(annots) = self
            .objects
            .dictionary_mut(page)?
            .get_or_create("Annots", || Object::Array(Vec::new()))
        {
            annots.push(annot);
        }

        let id = SignatureFieldId(self.fields.len());
        self.fields.push(field);
        Ok(id)
    }

    /// Read-only view of a field.
    pub fn signature_field(&self, id: SignatureFieldId) -> Result<SignatureFieldRef<'_>> {
        let field = self.fields.get(id.0).ok_or(Error::UnknownField(id.0))?;
        Ok(SignatureFieldRef::new(id, field, &self.objects))
    }

    /// Mutable view of a field.
    pub fn signature_field_mut(&mut self, id: SignatureFieldId) -> Result<SignatureFieldMut<'_>> {
        let field = self.fields.get_mut(id.0).ok_or(Error::UnknownField(id.0))?;
        Ok(SignatureFieldMut::new(id, field, &mut self.objects))
    }

    /// Handles of all fields in creation order.
    pub fn signature_field_ids(&self) -> Vec<SignatureFieldId> {
        (0..self.fields.len()).map(SignatureFieldId).collect()
    }

    /// Views of all fields in creation order.
    pub fn signature_fields(&self) -> impl Iterator<Item = SignatureFieldRef<'_>> + '_ {
        self.fields
            .iter()
            .enumerate()
            .map(move |(i, field)| SignatureFieldRef::new(SignatureFieldId(i), field, &self.objects))
    }

    /// First field whose name (`T`) is `name`.
    pub fn find_signature_field(&self, name: &str) -> Option<SignatureFieldId> {
        self.signature_fields()
            .find(|f| f.name().ok().flatten().as_deref() == Some(name))
            .map(|f| f.id())
    }

    /// Run the finalization pass over every field.
    ///
    /// Fields that are already finalized are skipped. On error no field is
    /// finalized and no appearance stream is registered.
    pub fn finalize(&mut self) -> Result<FinalizationReport> {
        FinalizationPass::new().run(&mut self.fields, &mut self.objects)
    }

    /// Finalize and serialize with the default writer configuration.
    pub fn save(&mut self) -> Result<SavedDocument> {
        self.save_with_config(PdfWriterConfig::default())
    }

    /// Finalize and serialize with `config`.
    pub fn save_with_config(&mut self, config: PdfWriterConfig) -> Result<SavedDocument> {
        self.finalize()?;
        PdfWriter::with_config(config).write(self)
    }

    /// Finalize, serialize and write to `path`.
    pub fn save_to_file(&mut self, path: impl AsRef<Path>) -> Result<SavedDocument> {
        let saved = self.save()?;
        saved.write_to(path)?;
        Ok(saved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_document_has_page_tree() {
        let doc = Document::new();
        let root = doc.objects().dictionary(doc.pages_root()).unwrap();
        assert_eq!(root.get_name("Type").unwrap(), Some("Pages"));
        assert_eq!(root.get_integer("Count").unwrap(), Some(0));
        assert!(doc.pages().is_empty());
    }

    #[test]
    fn test_add_page_updates_kids() {
        let mut doc = Document::new();
        let first = doc.add_letter_page().unwrap();
        let second = doc.add_a4_page().unwrap();

        let root = doc.objects().dictionary(doc.pages_root()).unwrap();
        assert_eq!(root.get_integer("Count").unwrap(), Some(2));
        let kids: Vec<_> = root
            .get_array("Kids")
            .unwrap()
            .unwrap()
            .iter()
            .filter_map(Object::as_reference)
            .collect();
        assert_eq!(kids, vec![first, second]);

        let page = doc.objects().dictionary(second).unwrap();
        assert_eq!(page.get_rectangle("MediaBox").unwrap(), Some(Rect::new(0.0, 0.0, 595.0, 842.0)));
    }

    #[test]
    fn test_signature_field_needs_a_page() {
        let mut doc = Document::new();
        assert!(matches!(doc.add_signature_field(), Err(Error::NoPages)));
        assert_eq!(doc.objects().len(), 1);
    }

    #[test]
    fn test_field_added_to_first_page_annots() {
        let mut doc = Document::new();
        let page = doc.add_letter_page().unwrap();
        doc.add_letter_page().unwrap();
        let id = doc.add_signature_field().unwrap();

        let field_ref = doc.signature_field(id).unwrap().field_ref();
        let annots = doc.objects().dictionary(page).unwrap().get_array("Annots").unwrap().unwrap();
        assert_eq!(annots, &vec![Object::Reference(field_ref)]);
        assert_eq!(
            doc.objects().dictionary(field_ref).unwrap().get_reference("P").unwrap(),
            Some(page)
        );
    }

    #[test]
    fn test_bad_annots_registers_nothing() {
        let mut doc = Document::new();
        let page = doc.add_letter_page().unwrap();
        doc.objects_mut().dictionary_mut(page).unwrap().set("Annots", Object::Integer(1));
        let before = doc.objects().len();

        assert!(matches!(doc.add_signature_field(), Err(Error::InvalidObjectType { .. })));
        assert_eq!(doc.objects().len(), before);
        assert!(doc.signature_field_ids().is_empty());
    }

    #[test]
    fn test_config_drives_field_defaults() {
        let config = SignatureFieldConfig::new().with_field_name("Approver");
        let mut doc = Document::with_config(config);
        doc.add_letter_page().unwrap();
        let id = doc.add_signature_field().unwrap();

        assert_eq!(doc.find_signature_field("Approver"), Some(id));
        assert_eq!(doc.find_signature_field("Signature1"), None);
    }

    #[test]
    fn test_unknown_field() {
        let mut doc = Document::new();
        assert!(matches!(
            doc.signature_field(SignatureFieldId(3)),
            Err(Error::UnknownField(3))
        ));
        assert!(doc.signature_field_mut(SignatureFieldId(0)).is_err());
    }

    #[test]
    fn test_created_dictionary_is_owned() {
        let doc = Document::new();
        assert_eq!(doc.create_dictionary().owner(), Some(doc.id()));
    }
}
