//! PDF document writer.
//!
//! Assembles a complete PDF from a document's reference table: header,
//! every registered object in identity order, the catalog, the `AcroForm`
//! and an info dictionary, then the xref table and trailer.
//!
//! Signature value dictionaries that have no `Contents` yet are written
//! with a reserved, zero-filled `Contents` and a fixed-width `ByteRange`.
//! Once the whole file is assembled the real ByteRange is patched in and a
//! [`SignaturePlaceholder`] is returned for each of them.

use super::acroform::AcroFormBuilder;
use super::object_serializer::{ObjectSerializer, TrackedSpan};
use crate::dictionary::Dictionary;
use crate::document::Document;
use crate::error::{Error, Result};
use crate::keys::signature_value;
use crate::object::{Object, ObjectRef};
use crate::signatures::{ByteRangeCalculator, SignaturePlaceholder, BYTE_RANGE_PLACEHOLDER};
use chrono::Local;
use std::collections::{BTreeMap, HashMap};
use std::io::Write;
use std::ops::Range;
use std::path::Path;

/// Configuration for PDF generation.
#[derive(Debug, Clone)]
pub struct PdfWriterConfig {
    /// PDF version (e.g., "1.7")
    pub version: String,
    /// Whether to use compact formatting (minimal whitespace)
    pub compact: bool,
    /// Producer recorded in the info dictionary
    pub producer: Option<String>,
    /// Bytes reserved for each signature token
    pub signature_contents_size: usize,
}

impl Default for PdfWriterConfig {
    fn default() -> Self {
        Self {
            version: "1.7".to_string(),
            compact: true,
            producer: Some(format!("pdf_sigfield {}", env!("CARGO_PKG_VERSION"))),
            signature_contents_size: 8192,
        }
    }
}

impl PdfWriterConfig {
    /// Set the PDF version written in the header.
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Enable or disable compact formatting.
    pub fn with_compact(mut self, compact: bool) -> Self {
        self.compact = compact;
        self
    }

    /// Set the producer, or `None` to omit it.
    pub fn with_producer(mut self, producer: Option<String>) -> Self {
        self.producer = producer;
        self
    }

    /// Set the number of bytes reserved for each signature token.
    pub fn with_signature_contents_size(mut self, size: usize) -> Self {
        self.signature_contents_size = size;
        self
    }
}

/// Bytes of a saved document plus its reserved signature slots.
#[derive(Debug, Clone)]
pub struct SavedDocument {
    /// The complete file
    pub bytes: Vec<u8>,
    /// One entry per signature value written with a reserved `Contents`
    pub placeholders: Vec<SignaturePlaceholder>,
}

impl SavedDocument {
    /// Placeholder of the field named `field_name`.
    pub fn placeholder(&self, field_name: &str) -> Option<&SignaturePlaceholder> {
        self.placeholders.iter().find(|p| p.field_name == field_name)
    }

    /// Write the bytes to `path`.
    pub fn write_to(&self, path: impl AsRef<Path>) -> Result<()> {
        std::fs::write(path, &self.bytes)?;
        Ok(())
    }

    /// Take the bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

/// Signature value being written with reserved space.
struct PendingSignature {
    field_name: String,
    value_ref: ObjectRef,
    contents: Range<usize>,
    byte_range_span: Range<usize>,
}

/// PDF writer for a finalized [`Document`].
#[derive(Debug, Clone, Default)]
pub struct PdfWriter {
    config: PdfWriterConfig,
}

impl PdfWriter {
    /// Create a writer with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a writer with custom configuration.
    pub fn with_config(config: PdfWriterConfig) -> Self {
        Self { config }
    }

    /// Writer configuration.
    pub fn config(&self) -> &PdfWriterConfig {
        &self.config
    }

    /// Serialize `document`.
    ///
    /// Does not run finalization; [`Document::save`] does both. Fails with
    /// [`Error::DanglingReference`] before producing any bytes if a
    /// registered object refers to something that was never registered.
    pub fn write(&self, document: &Document) -> Result<SavedDocument> {
        let objects = document.objects();
        objects.check_references()?;

        let serializer = if self.config.compact {
            ObjectSerializer::compact()
        } else {
            ObjectSerializer::new()
        };

        let mut field_refs = Vec::new();
        let mut reserved: HashMap<ObjectRef, String> = HashMap::new();
        for field in document.signature_fields() {
            field_refs.push(field.field_ref());
            let Some(value_ref) = field.value_ref()? else {
                continue;
            };
            if !objects.dictionary(value_ref)?.contains_key(signature_value::CONTENTS) {
                let name = field.name()?.unwrap_or_else(|| field.field_ref().to_string());
                reserved.insert(value_ref, name);
            }
        }

        let mut next_id = objects.next_id();
        let mut alloc = || {
            let id = next_id;
            next_id += 1;
            ObjectRef::new(id, 0)
        };
        let acroform_ref = (!field_refs.is_empty()).then(&mut alloc);
        let catalog_ref = alloc();
        let info_ref = alloc();
        let size = next_id;

        let mut output = Vec::new();
        let mut xref_offsets: BTreeMap<u32, (usize, u16)> = BTreeMap::new();
        let mut pending = Vec::new();

        // PDF Header
        writeln!(output, "%PDF-{}", self.config.version)?;
        // Binary marker (recommended for binary content)
        output.extend_from_slice(b"%\xE2\xE3\xCF\xD3\n");

        for (obj_ref, obj) in objects.iter() {
            let base = output.len();
            xref_offsets.insert(obj_ref.id, (base, obj_ref.gen));

            let Some(field_name) = reserved.get(&obj_ref) else {
                output.extend_from_slice(&serializer.serialize_indirect(obj_ref.id, obj_ref.gen, obj)?);
                continue;
            };

            let value = self.with_reserved_slots(obj, obj_ref)?;
            let (bytes, spans) = serializer.serialize_indirect_tracked(
                obj_ref.id,
                obj_ref.gen,
                &Object::Dictionary(value),
                &[signature_value::CONTENTS, signature_value::BYTE_RANGE],
            )?;
            pending.push(PendingSignature {
                field_name: field_name.clone(),
                value_ref: obj_ref,
                contents: Self::span_of(&spans, signature_value::CONTENTS, base)?,
                byte_range_span: Self::span_of(&spans, signature_value::BYTE_RANGE, base)?,
            });
            output.extend_from_slice(&bytes);
        }

        if let Some(acroform_ref) = acroform_ref {
            let mut acroform = AcroFormBuilder::new().signatures_exist().append_only();
            acroform.add_fields(field_refs.iter().copied());
            xref_offsets.insert(acroform_ref.id, (output.len(), 0));
            output.extend_from_slice(&serializer.serialize_indirect(
                acroform_ref.id,
                0,
                &Object::Dictionary(acroform.build()),
            )?);
        }

        let mut catalog = Dictionary::new();
        catalog.set_name("Type", "Catalog");
        catalog.set("Pages", document.pages_root());
        if let Some(acroform_ref) = acroform_ref {
            catalog.set("AcroForm", acroform_ref);
        }
        xref_offsets.insert(catalog_ref.id, (output.len(), 0));
        output.extend_from_slice(&serializer.serialize_indirect(
            catalog_ref.id,
            0,
            &Object::Dictionary(catalog),
        )?);

        let mut info = Dictionary::new();
        if let Some(producer) = &self.config.producer {
            info.set_text("Producer", producer);
        }
        info.set_date("CreationDate", &Local::now());
        xref_offsets.insert(info_ref.id, (output.len(), 0));
        output.extend_from_slice(&serializer.serialize_indirect(info_ref.id, 0, &Object::Dictionary(info))?);

        // Write xref table
        let xref_start = output.len();
        writeln!(output, "xref")?;
        writeln!(output, "0 {}", size)?;

        // Object 0 is always free
        writeln!(output, "0000000000 65535 f ")?;
        for id in 1..size {
            match xref_offsets.get(&id) {
                Some((offset, gen)) => writeln!(output, "{:010} {:05} n ", offset, gen)?,
                None => writeln!(output, "0000000000 00000 f ")?,
            }
        }

        // Write trailer
        let mut trailer = Dictionary::new();
        trailer.set_integer("Size", i64::from(size));
        trailer.set("Root", catalog_ref);
        trailer.set("Info", info_ref);

        writeln!(output, "trailer")?;
        output.extend_from_slice(&serializer.serialize(&Object::Dictionary(trailer))?);
        writeln!(output)?;
        writeln!(output, "startxref")?;
        writeln!(output, "{}", xref_start)?;
        write!(output, "%%EOF")?;

        let placeholders = pending
            .into_iter()
            .map(|p| Self::patch_byte_range(&mut output, p))
            .collect::<Result<Vec<_>>>()?;

        log::debug!(
            "Wrote {} bytes: {} objects, {} signature placeholder(s)",
            output.len(),
            size - 1,
            placeholders.len()
        );
        Ok(SavedDocument {
            bytes: output,
            placeholders,
        })
    }

    /// Copy of a signature value with reserved `Contents` and `ByteRange`.
    ///
    /// The registered dictionary is left untouched.
    fn with_reserved_slots(&self, obj: &Object, obj_ref: ObjectRef) -> Result<Dictionary> {
        let mut value = obj.as_dict().cloned().ok_or_else(|| Error::InvalidObjectType {
            key: obj_ref.to_string(),
            expected: "Dictionary".to_string(),
            found: obj.type_name().to_string(),
        })?;
        if value.contains_key(signature_value::BYTE_RANGE) {
            log::warn!(
                "Signature value {} has a ByteRange but no Contents; ByteRange is recomputed",
                obj_ref
            );
        }
        value.set(
            signature_value::CONTENTS,
            Object::String(vec![0; self.config.signature_contents_size]),
        );
        value.set(
            signature_value::BYTE_RANGE,
            Object::Array(BYTE_RANGE_PLACEHOLDER.iter().map(|v| Object::Integer(*v)).collect()),
        );
        Ok(value)
    }

    fn span_of(spans: &[TrackedSpan], key: &str, base: usize) -> Result<Range<usize>> {
        spans
            .iter()
            .find(|s| s.key == key)
            .map(|s| base + s.span.start..base + s.span.end)
            .ok_or_else(|| Error::InvalidByteRange(format!("no span recorded for {}", key)))
    }

    /// Fill in the real ByteRange for one reserved signature.
    fn patch_byte_range(output: &mut [u8], pending: PendingSignature) -> Result<SignaturePlaceholder> {
        let calculator = ByteRangeCalculator::with_placeholder_size(pending.contents.len());
        let byte_range = calculator.calculate_byte_range(output.len(), pending.contents.start);
        let text = ByteRangeCalculator::format_byte_range_padded(&byte_range, pending.byte_range_span.len())?;
        output[pending.byte_range_span.clone()].copy_from_slice(text.as_bytes());

        log::trace!(
            "Signature '{}' ByteRange {}",
            pending.field_name,
            ByteRangeCalculator::format_byte_range(&byte_range)
        );
        Ok(SignaturePlaceholder {
            field_name: pending.field_name,
            value_ref: pending.value_ref,
            contents: pending.contents,
            byte_range_span: pending.byte_range_span,
            byte_range,
        })
    }
}
