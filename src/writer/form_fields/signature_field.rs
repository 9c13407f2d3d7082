//! Signature form fields.
//!
//! A signature field is a merged field/widget dictionary (`FT Sig`,
//! `Subtype Widget`) whose `V` entry refers to a separately registered
//! signature value dictionary. The field stores:
//!
//! - where it sits (`Rect`), from which visibility is derived,
//! - an optional caller-supplied [`SignatureAppearanceHandler`],
//! - whether it has been finalized.
//!
//! Fields live inside a [`Document`](crate::document::Document) and are
//! reached through [`SignatureFieldRef`] / [`SignatureFieldMut`] views,
//! which pair the field with the document's reference table.
//!
//! PDF Spec: ISO 32000-1:2008, Section 12.7.4.5 (Signature Fields)

use super::field_flags::SignatureFieldFlags;
use crate::config::SignatureFieldConfig;
use crate::dictionary::Dictionary;
use crate::error::{Error, RenderError, Result};
use crate::finalize::{PrepareForSave, Prepared};
use crate::geometry::Rect;
use crate::keys::{field, signature_value};
use crate::object::{Object, ObjectRef, Stream};
use crate::writer::appearance_stream::AppearanceStreamBuilder;
use crate::writer::content_stream::ContentStreamBuilder;
use crate::xref::IndirectReferenceTable;
use chrono::{DateTime, FixedOffset, Local, TimeZone};
use std::fmt;
use std::rc::Rc;

/// Renders the visible appearance of a signature field.
///
/// `rect` is the field rectangle translated to the appearance stream's own
/// coordinate space: its lower-left corner is (0, 0). The handler is called
/// at most once per save.
pub trait SignatureAppearanceHandler {
    /// Draw into `surface`.
    fn draw_appearance(
        &self,
        surface: &mut ContentStreamBuilder,
        rect: Rect,
    ) -> std::result::Result<(), RenderError>;
}

impl<F> SignatureAppearanceHandler for F
where
    F: Fn(&mut ContentStreamBuilder, Rect) -> std::result::Result<(), RenderError>,
{
    fn draw_appearance(
        &self,
        surface: &mut ContentStreamBuilder,
        rect: Rect,
    ) -> std::result::Result<(), RenderError> {
        self(surface, rect)
    }
}

/// A plain text appearance: a thin border and up to four lines of text.
#[derive(Debug, Clone, Default)]
pub struct DefaultSignatureAppearance {
    signer: Option<String>,
    reason: Option<String>,
    location: Option<String>,
    date: Option<String>,
    font_size: Option<f32>,
}

impl DefaultSignatureAppearance {
    /// Create an appearance with no text lines.
    pub fn new() -> Self {
        Self::default()
    }

    /// Show "Signed by: ..." line.
    pub fn with_signer(mut self, signer: impl Into<String>) -> Self {
        self.signer = Some(signer.into());
        self
    }

    /// Show "Reason: ..." line.
    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Show "Location: ..." line.
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Show "Date: ..." line.
    pub fn with_date<Tz: TimeZone>(mut self, date: &DateTime<Tz>) -> Self
    where
        Tz::Offset: fmt::Display,
    {
        self.date = Some(date.format("%Y-%m-%d %H:%M:%S %z").to_string());
        self
    }

    /// Fix the font size instead of fitting the lines to the height.
    pub fn with_font_size(mut self, size: f32) -> Self {
        self.font_size = Some(size);
        self
    }

    fn lines(&self) -> Vec<String> {
        [
            ("Signed by", &self.signer),
            ("Reason", &self.reason),
            ("Location", &self.location),
            ("Date", &self.date),
        ]
        .into_iter()
        .filter_map(|(label, value)| value.as_ref().map(|v| format!("{}: {}", label, v)))
        .collect()
    }
}

impl SignatureAppearanceHandler for DefaultSignatureAppearance {
    fn draw_appearance(
        &self,
        surface: &mut ContentStreamBuilder,
        rect: Rect,
    ) -> std::result::Result<(), RenderError> {
        let width = rect.width() as f32;
        let height = rect.height() as f32;

        surface
            .save_state()
            .set_line_width(1.0)
            .set_stroke_gray(0.0)
            .rect(0.5, 0.5, (width - 1.0).max(0.0), (height - 1.0).max(0.0))
            .stroke()
            .restore_state();

        let lines = self.lines();
        if lines.is_empty() {
            return Ok(());
        }

        let padding = 2.0;
        let size = self
            .font_size
            .unwrap_or_else(|| ((height - 2.0 * padding) / (lines.len() as f32 * 1.2)).clamp(4.0, 12.0));
        let leading = size * 1.2;

        surface.save_state().clip_rect(0.0, 0.0, width, height).set_fill_gray(0.0);
        surface
            .begin_text()
            .set_font("Helvetica", size)
            .set_leading(leading)
            .move_text(padding, height - padding - size);
        for (i, line) in lines.iter().enumerate() {
            if i > 0 {
                surface.next_line();
            }
            surface.show_text(line);
        }
        surface.end_text().restore_state();
        Ok(())
    }
}

/// Handle to a signature field within its document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SignatureFieldId(pub(crate) usize);

impl SignatureFieldId {
    /// Position of the field in creation order.
    pub fn index(&self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FieldState {
    Unfinalized,
    Finalized,
}

/// Authoring state of one signature field.
///
/// The dictionaries themselves live in the reference table; this holds the
/// field's identity plus the state that is not part of the PDF object.
pub struct SignatureField {
    field_ref: ObjectRef,
    visible: bool,
    handler: Option<Rc<dyn SignatureAppearanceHandler>>,
    state: FieldState,
}

impl fmt::Debug for SignatureField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignatureField")
            .field("field_ref", &self.field_ref)
            .field("visible", &self.visible)
            .field("has_handler", &self.handler.is_some())
            .field("state", &self.state)
            .finish()
    }
}

impl SignatureField {
    /// Create the signature value and field dictionaries and register both.
    ///
    /// The value dictionary is registered first so the field's `V` can
    /// refer to it. The field starts with an all-zero `Rect` (invisible).
    pub(crate) fn create(
        objects: &mut IndirectReferenceTable,
        page: ObjectRef,
        config: &SignatureFieldConfig,
    ) -> Result<Self> {
        let document = objects.document();

        let mut value = Dictionary::new_owned(document, Some(&signature_value::META));
        value.set_name(signature_value::TYPE, "Sig");
        value.set_name(signature_value::FILTER, config.filter.as_pdf_name());
        value.set_name(signature_value::SUB_FILTER, config.sub_filter.as_pdf_name());
        value.set_date(signature_value::M, &Local::now());
        let value_ref = objects.register(value)?;

        let mut dict = Dictionary::new_owned(document, Some(&field::META));
        dict.set_name(field::FT, "Sig");
        dict.set_text(field::T, &config.field_name);
        dict.set_integer(field::FF, config.flags.to_ff());
        dict.set(field::DR, Dictionary::new_owned(document, None));
        dict.set_name(field::TYPE, "Annot");
        dict.set_name(field::SUBTYPE, "Widget");
        dict.set(field::P, page);
        dict.set_rectangle(field::RECT, Rect::zero());
        dict.set(field::V, value_ref);
        let field_ref = objects.register(dict)?;

        log::debug!(
            "Created signature field '{}' as {} (value {})",
            config.field_name,
            field_ref,
            value_ref
        );

        Ok(Self {
            field_ref,
            visible: false,
            handler: None,
            state: FieldState::Unfinalized,
        })
    }

    /// Identity of the field dictionary.
    pub fn field_ref(&self) -> ObjectRef {
        self.field_ref
    }

    /// Whether the field's rectangle is non-degenerate.
    pub fn visible(&self) -> bool {
        self.visible
    }

    /// Whether the field has been finalized.
    pub fn is_finalized(&self) -> bool {
        self.state == FieldState::Finalized
    }

    /// Name for diagnostics: `T` if readable, otherwise the identity.
    fn display_name(&self, objects: &IndirectReferenceTable) -> String {
        objects
            .dictionary(self.field_ref)
            .ok()
            .and_then(|d| d.get_text(field::T).ok().flatten())
            .unwrap_or_else(|| self.field_ref.to_string())
    }

    /// Render the appearance for a visible field into a detached stream.
    fn render(&self, objects: &IndirectReferenceTable) -> Result<Stream> {
        let Some(handler) = self.handler.as_ref() else {
            return Err(Error::MissingAppearanceHandler {
                field: self.display_name(objects),
            });
        };
        let dict = objects.dictionary(self.field_ref)?;
        let rect = dict
            .get_rectangle(field::RECT)?
            .ok_or_else(|| Error::MissingRequiredKey {
                key: field::RECT.to_string(),
            })?;

        // AP must be writable before anything is drawn
        match dict.get_raw(field::AP) {
            None | Some(Object::Dictionary(_)) => {},
            Some(Object::Reference(r)) => {
                objects.dictionary(*r)?;
            },
            Some(other) => {
                return Err(Error::InvalidObjectType {
                    key: field::AP.to_string(),
                    expected: "Dictionary".to_string(),
                    found: other.type_name().to_string(),
                })
            },
        }

        let mut builder = AppearanceStreamBuilder::for_widget(rect);
        let local = builder.bbox();
        handler
            .draw_appearance(builder.surface(), local)
            .map_err(Error::RenderFailure)?;
        builder.finish()
    }

    /// Point `AP.N` at `stream_ref`, creating `AP` if absent.
    fn attach_appearance(&self, objects: &mut IndirectReferenceTable, stream_ref: ObjectRef) -> Result<()> {
        let ap_target = objects
            .dictionary(self.field_ref)?
            .get_raw(field::AP)
            .and_then(Object::as_reference);
        let ap = match ap_target {
            Some(r) => objects.dictionary_mut(r)?,
            None => objects
                .dictionary_mut(self.field_ref)?
                .get_dictionary_mut(field::AP)?,
        };
        ap.set(field::AP_N, stream_ref);
        Ok(())
    }
}

impl PrepareForSave for SignatureField {
    fn prepare(&self, objects: &IndirectReferenceTable) -> Result<Prepared> {
        if self.is_finalized() {
            log::debug!("Field {} already finalized; skipping", self.field_ref);
            return Ok(Prepared::AlreadyFinalized);
        }
        if !self.visible {
            log::debug!("Field {} is invisible; no appearance stream", self.field_ref);
            return Ok(Prepared::Invisible);
        }
        self.render(objects).map(Prepared::Appearance)
    }

    fn commit(&mut self, objects: &mut IndirectReferenceTable, prepared: Prepared) -> Result<Option<ObjectRef>> {
        let created = match prepared {
            Prepared::AlreadyFinalized => return Ok(None),
            Prepared::Invisible => None,
            Prepared::Appearance(stream) => {
                let stream_ref = objects.register_stream(stream)?;
                self.attach_appearance(objects, stream_ref)?;
                log::debug!("Field {} appearance is {}", self.field_ref, stream_ref);
                Some(stream_ref)
            },
        };
        self.state = FieldState::Finalized;
        Ok(created)
    }
}

/// Read-only view of a signature field.
#[derive(Debug, Clone, Copy)]
pub struct SignatureFieldRef<'a> {
    id: SignatureFieldId,
    field: &'a SignatureField,
    objects: &'a IndirectReferenceTable,
}

impl<'a> SignatureFieldRef<'a> {
    pub(crate) fn new(
        id: SignatureFieldId,
        field: &'a SignatureField,
        objects: &'a IndirectReferenceTable,
    ) -> Self {
        Self { id, field, objects }
    }

    /// Handle of this field.
    pub fn id(&self) -> SignatureFieldId {
        self.id
    }

    /// Identity of the field dictionary.
    pub fn field_ref(&self) -> ObjectRef {
        self.field.field_ref
    }

    /// The field dictionary.
    pub fn dictionary(&self) -> Result<&'a Dictionary> {
        self.objects.dictionary(self.field.field_ref)
    }

    /// Identity of the signature value dictionary, if `V` is a reference.
    pub fn value_ref(&self) -> Result<Option<ObjectRef>> {
        Ok(self
            .dictionary()?
            .get_raw(field::V)
            .and_then(Object::as_reference))
    }

    /// The signature value dictionary, without creating it.
    pub fn value(&self) -> Result<Option<&'a Dictionary>> {
        let dict = self.dictionary()?;
        match dict.get_raw(field::V) {
            None => Ok(None),
            Some(Object::Reference(r)) => self.objects.dictionary(*r).map(Some),
            Some(_) => dict.get_dictionary(field::V),
        }
    }

    fn value_text(&self, key: &str) -> Result<Option<String>> {
        match self.value()? {
            Some(value) => value.get_text(key),
            None => Ok(None),
        }
    }

    fn required_value(&self, key: &str) -> Result<&'a Object> {
        self.value()?
            .and_then(|value| value.get_raw(key))
            .ok_or_else(|| Error::MissingRequiredKey { key: key.to_string() })
    }

    /// Partial field name (`T`).
    pub fn name(&self) -> Result<Option<String>> {
        self.dictionary()?.get_text(field::T)
    }

    /// Field flags (`Ff`); absent means no flags.
    pub fn flags(&self) -> Result<SignatureFieldFlags> {
        Ok(self
            .dictionary()?
            .get_integer(field::FF)?
            .map(SignatureFieldFlags::from_ff)
            .unwrap_or_else(SignatureFieldFlags::empty))
    }

    /// Placement rectangle.
    pub fn rectangle(&self) -> Result<Rect> {
        self.dictionary()?
            .get_rectangle(field::RECT)?
            .ok_or_else(|| Error::MissingRequiredKey {
                key: field::RECT.to_string(),
            })
    }

    /// Whether the field will get an appearance stream.
    pub fn visible(&self) -> bool {
        self.field.visible
    }

    /// Whether the field has been finalized.
    pub fn is_finalized(&self) -> bool {
        self.field.is_finalized()
    }

    /// Whether an appearance handler is attached.
    pub fn has_appearance_handler(&self) -> bool {
        self.field.handler.is_some()
    }

    /// Reference held in `AP.N`, if any.
    pub fn normal_appearance(&self) -> Result<Option<ObjectRef>> {
        let dict = self.dictionary()?;
        let ap = match dict.get_raw(field::AP) {
            None => return Ok(None),
            Some(Object::Reference(r)) => self.objects.dictionary(*r)?,
            Some(_) => match dict.get_dictionary(field::AP)? {
                Some(ap) => ap,
                None => return Ok(None),
            },
        };
        Ok(ap.get_raw(field::AP_N).and_then(Object::as_reference))
    }

    /// Reason for signing.
    pub fn reason(&self) -> Result<Option<String>> {
        self.value_text(signature_value::REASON)
    }

    /// Location of signing.
    pub fn location(&self) -> Result<Option<String>> {
        self.value_text(signature_value::LOCATION)
    }

    /// Name of the signer.
    pub fn signer_name(&self) -> Result<Option<String>> {
        self.value_text(signature_value::NAME)
    }

    /// Signer contact information.
    pub fn contact_info(&self) -> Result<Option<String>> {
        self.value_text(signature_value::CONTACT_INFO)
    }

    /// Signing time (`M`).
    pub fn signing_time(&self) -> Result<Option<DateTime<FixedOffset>>> {
        match self.value()? {
            Some(value) => value.get_date(signature_value::M),
            None => Ok(None),
        }
    }

    /// Signature handler name (`Filter`).
    pub fn filter(&self) -> Result<String> {
        self.required_value(signature_value::FILTER)?
            .as_name()
            .map(str::to_string)
            .ok_or_else(|| Error::InvalidObjectType {
                key: signature_value::FILTER.to_string(),
                expected: "Name".to_string(),
                found: "Other".to_string(),
            })
    }

    /// Signature token (`Contents`).
    ///
    /// Fails with [`Error::MissingRequiredKey`] until a token is set; the
    /// writer reserves space for it when saving.
    pub fn contents(&self) -> Result<Vec<u8>> {
        let obj = self.required_value(signature_value::CONTENTS)?;
        obj.as_string()
            .map(<[u8]>::to_vec)
            .ok_or_else(|| Error::InvalidObjectType {
                key: signature_value::CONTENTS.to_string(),
                expected: "String".to_string(),
                found: obj.type_name().to_string(),
            })
    }

    /// Digest byte range (`ByteRange`) as a flat list of offset/length pairs.
    pub fn byte_range(&self) -> Result<Vec<i64>> {
        let obj = self.required_value(signature_value::BYTE_RANGE)?;
        let invalid = || Error::InvalidObjectType {
            key: signature_value::BYTE_RANGE.to_string(),
            expected: "Array of Integer".to_string(),
            found: obj.type_name().to_string(),
        };
        obj.as_array()
            .ok_or_else(invalid)?
            .iter()
            .map(|item| item.as_integer().ok_or_else(invalid))
            .collect()
    }
}

/// Mutable view of a signature field.
///
/// Every setter fails with [`Error::FieldFinalized`] once the field has been
/// finalized; the object graph is then input to serialization only.
pub struct SignatureFieldMut<'a> {
    id: SignatureFieldId,
    field: &'a mut SignatureField,
    objects: &'a mut IndirectReferenceTable,
}

impl<'a> SignatureFieldMut<'a> {
    pub(crate) fn new(
        id: SignatureFieldId,
        field: &'a mut SignatureField,
        objects: &'a mut IndirectReferenceTable,
    ) -> Self {
        Self { id, field, objects }
    }

    /// Read-only view of the same field.
    pub fn view(&self) -> SignatureFieldRef<'_> {
        SignatureFieldRef::new(self.id, &*self.field, &*self.objects)
    }

    /// Handle of this field.
    pub fn id(&self) -> SignatureFieldId {
        self.id
    }

    /// Whether the field will get an appearance stream.
    pub fn visible(&self) -> bool {
        self.field.visible
    }

    /// Whether the field has been finalized.
    pub fn is_finalized(&self) -> bool {
        self.field.is_finalized()
    }

    /// Reason for signing.
    pub fn reason(&self) -> Result<Option<String>> {
        self.view().reason()
    }

    /// Location of signing.
    pub fn location(&self) -> Result<Option<String>> {
        self.view().location()
    }

    /// Placement rectangle.
    pub fn rectangle(&self) -> Result<Rect> {
        self.view().rectangle()
    }

    fn ensure_mutable(&self) -> Result<()> {
        if self.field.is_finalized() {
            return Err(Error::FieldFinalized {
                field: self.field.display_name(&*self.objects),
            });
        }
        Ok(())
    }

    fn field_dict_mut(&mut self) -> Result<&mut Dictionary> {
        self.objects.dictionary_mut(self.field.field_ref)
    }

    /// The signature value dictionary, creating an inline one if `V` is
    /// absent.
    ///
    /// A registered value dictionary is reached through the reference table.
    pub fn value_mut(&mut self) -> Result<&mut Dictionary> {
        self.ensure_mutable()?;
        let field_ref = self.field.field_ref;
        let target = self
            .objects
            .dictionary(field_ref)?
            .get_raw(field::V)
            .and_then(Object::as_reference);
        match target {
            Some(r) => self.objects.dictionary_mut(r),
            None => self.objects.dictionary_mut(field_ref)?.get_dictionary_mut(field::V),
        }
    }

    /// Set the reason for signing.
    pub fn set_reason(&mut self, reason: &str) -> Result<()> {
        self.value_mut()?.set_text(signature_value::REASON, reason);
        Ok(())
    }

    /// Set the location of signing.
    pub fn set_location(&mut self, location: &str) -> Result<()> {
        self.value_mut()?.set_text(signature_value::LOCATION, location);
        Ok(())
    }

    /// Set the signer's name.
    pub fn set_signer_name(&mut self, name: &str) -> Result<()> {
        self.value_mut()?.set_text(signature_value::NAME, name);
        Ok(())
    }

    /// Set the signer's contact information.
    pub fn set_contact_info(&mut self, info: &str) -> Result<()> {
        self.value_mut()?.set_text(signature_value::CONTACT_INFO, info);
        Ok(())
    }

    /// Set the signing time.
    pub fn set_signing_time<Tz: TimeZone>(&mut self, time: &DateTime<Tz>) -> Result<()> {
        self.value_mut()?.set_date(signature_value::M, time);
        Ok(())
    }

    /// Store a signature token. The writer then reserves nothing for it.
    pub fn set_contents(&mut self, token: impl Into<Vec<u8>>) -> Result<()> {
        self.value_mut()?
            .set(signature_value::CONTENTS, Object::String(token.into()));
        Ok(())
    }

    /// Store a byte range as offset/length pairs.
    pub fn set_byte_range(&mut self, range: &[i64]) -> Result<()> {
        let items = range.iter().map(|v| Object::Integer(*v)).collect();
        self.value_mut()?
            .set(signature_value::BYTE_RANGE, Object::Array(items));
        Ok(())
    }

    /// Set the placement rectangle and recompute visibility.
    pub fn set_rectangle(&mut self, rect: Rect) -> Result<()> {
        self.ensure_mutable()?;
        self.field_dict_mut()?.set_rectangle(field::RECT, rect);
        self.field.visible = !rect.is_degenerate();
        log::trace!(
            "Field {} rect set; visible = {}",
            self.field.field_ref,
            self.field.visible
        );
        Ok(())
    }

    /// Set the partial field name (`T`).
    pub fn set_name(&mut self, name: &str) -> Result<()> {
        self.ensure_mutable()?;
        self.field_dict_mut()?.set_text(field::T, name);
        Ok(())
    }

    /// Set the field flags (`Ff`).
    pub fn set_flags(&mut self, flags: SignatureFieldFlags) -> Result<()> {
        self.ensure_mutable()?;
        self.field_dict_mut()?.set_integer(field::FF, flags.to_ff());
        Ok(())
    }

    /// Attach the renderer used for a visible field's appearance.
    ///
    /// The caller keeps its own handle; the field only holds a shared one.
    pub fn set_appearance_handler(&mut self, handler: Rc<dyn SignatureAppearanceHandler>) -> Result<()> {
        self.ensure_mutable()?;
        self.field.handler = Some(handler);
        Ok(())
    }

    /// Detach the appearance handler.
    pub fn clear_appearance_handler(&mut self) -> Result<()> {
        self.ensure_mutable()?;
        self.field.handler = None;
        Ok(())
    }

    /// Finalize this field alone.
    ///
    /// Renders and attaches the appearance of a visible field. A second call
    /// is a no-op returning `Ok(None)`.
    pub fn finalize(&mut self) -> Result<Option<ObjectRef>> {
        let prepared = self.field.prepare(&*self.objects)?;
        self.field.commit(&mut *self.objects, prepared)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::DocumentId;
    use std::cell::Cell;

    fn setup() -> (IndirectReferenceTable, SignatureField) {
        let mut objects = IndirectReferenceTable::new(DocumentId::next());
        let page = objects.register(Dictionary::new()).unwrap();
        let field = SignatureField::create(&mut objects, page, &SignatureFieldConfig::default()).unwrap();
        (objects, field)
    }

    #[test]
    fn test_create_registers_value_then_field() {
        let (objects, field) = setup();
        assert_eq!(objects.len(), 3);
        let view = SignatureFieldRef::new(SignatureFieldId(0), &field, &objects);

        let value_ref = view.value_ref().unwrap().unwrap();
        assert!(value_ref < field.field_ref());

        let dict = view.dictionary().unwrap();
        assert_eq!(dict.get_name("FT").unwrap(), Some("Sig"));
        assert_eq!(dict.get_integer("Ff").unwrap(), Some(132));
        assert_eq!(dict.get_name("Subtype").unwrap(), Some("Widget"));
        assert_eq!(view.filter().unwrap(), "Adobe.PPKLite");
        assert!(view.signing_time().unwrap().is_some());
        assert!(!view.visible());
    }

    #[test]
    fn test_contents_missing_until_set() {
        let (mut objects, mut field) = setup();
        {
            let view = SignatureFieldRef::new(SignatureFieldId(0), &field, &objects);
            assert!(matches!(view.contents(), Err(Error::MissingRequiredKey { .. })));
        }
        let mut sig = SignatureFieldMut::new(SignatureFieldId(0), &mut field, &mut objects);
        sig.set_contents(vec![1, 2, 3]).unwrap();
        sig.set_byte_range(&[0, 10, 20, 30]).unwrap();
        assert_eq!(sig.view().contents().unwrap(), vec![1, 2, 3]);
        assert_eq!(sig.view().byte_range().unwrap(), vec![0, 10, 20, 30]);
    }

    #[test]
    fn test_closure_handler_gets_local_rect() {
        let (mut objects, mut field) = setup();
        let seen = Rc::new(Cell::new(None));
        let seen_in_handler = Rc::clone(&seen);
        let handler = move |_: &mut ContentStreamBuilder, rect: Rect| -> std::result::Result<(), RenderError> {
            seen_in_handler.set(Some(rect));
            Ok(())
        };

        let mut sig = SignatureFieldMut::new(SignatureFieldId(0), &mut field, &mut objects);
        sig.set_rectangle(Rect::new(10.0, 20.0, 110.0, 70.0)).unwrap();
        sig.set_appearance_handler(Rc::new(handler)).unwrap();
        let stream_ref = sig.finalize().unwrap();

        assert!(stream_ref.is_some());
        assert_eq!(seen.get(), Some(Rect::new(0.0, 0.0, 100.0, 50.0)));
        assert_eq!(sig.view().normal_appearance().unwrap(), stream_ref);
    }

    #[test]
    fn test_default_appearance_draws_lines() {
        let appearance = DefaultSignatureAppearance::new()
            .with_signer("Jane Roe")
            .with_reason("Approved");
        let mut surface = ContentStreamBuilder::new();
        appearance
            .draw_appearance(&mut surface, Rect::new(0.0, 0.0, 200.0, 50.0))
            .unwrap();
        let content = String::from_utf8(surface.build().unwrap()).unwrap();

        assert!(content.contains("re\nS"));
        assert!(content.contains("(Signed by: Jane Roe) Tj"));
        assert!(content.contains("(Reason: Approved) Tj"));
        assert!(content.contains("T*\n(Reason: Approved) Tj"));
        assert_eq!(surface.fonts_used(), ["Helvetica"]);
    }

    #[test]
    fn test_default_appearance_without_text() {
        let mut surface = ContentStreamBuilder::new();
        DefaultSignatureAppearance::new()
            .draw_appearance(&mut surface, Rect::new(0.0, 0.0, 20.0, 10.0))
            .unwrap();
        assert!(surface.fonts_used().is_empty());
        assert!(!surface.is_empty());
    }

    #[test]
    fn test_ap_of_wrong_type_fails_before_rendering() {
        let (mut objects, mut field) = setup();
        objects
            .dictionary_mut(field.field_ref())
            .unwrap()
            .set("AP", Object::Integer(7));

        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        let handler = move |_: &mut ContentStreamBuilder, _: Rect| -> std::result::Result<(), RenderError> {
            counter.set(counter.get() + 1);
            Ok(())
        };
        let mut sig = SignatureFieldMut::new(SignatureFieldId(0), &mut field, &mut objects);
        sig.set_rectangle(Rect::new(0.0, 0.0, 10.0, 10.0)).unwrap();
        sig.set_appearance_handler(Rc::new(handler)).unwrap();

        assert!(matches!(sig.finalize(), Err(Error::InvalidObjectType { .. })));
        assert_eq!(calls.get(), 0);
        assert!(!sig.is_finalized());
    }
}
