//! Appearance stream generation for signature widgets.
//!
//! PDF Spec: ISO 32000-1:2008, Section 12.5.5 (Appearance Streams)
//!
//! An appearance stream is a Form XObject that defines the visual appearance
//! of an annotation. The builder hands out a [`ContentStreamBuilder`] as the
//! drawing surface; [`AppearanceStreamBuilder::finish`] consumes the builder,
//! so nothing can be drawn once the stream exists.

use super::content_stream::ContentStreamBuilder;
use crate::dictionary::Dictionary;
use crate::error::Result;
use crate::geometry::Rect;
use crate::object::Stream;

/// The standard 14 font names that need no embedding.
const STANDARD_FONTS: &[&str] = &[
    "Helvetica",
    "Helvetica-Bold",
    "Helvetica-Oblique",
    "Helvetica-BoldOblique",
    "Times-Roman",
    "Times-Bold",
    "Times-Italic",
    "Times-BoldItalic",
    "Courier",
    "Courier-Bold",
    "Courier-Oblique",
    "Courier-BoldOblique",
    "Symbol",
    "ZapfDingbats",
];

/// Builder for a Form XObject appearance stream.
#[derive(Debug)]
pub struct AppearanceStreamBuilder {
    /// Bounding box for the appearance, in form space
    bbox: Rect,
    /// Drawing surface
    surface: ContentStreamBuilder,
}

impl AppearanceStreamBuilder {
    /// Create a new appearance stream builder with the given bounding box.
    pub fn new(bbox: Rect) -> Self {
        Self {
            bbox,
            surface: ContentStreamBuilder::new(),
        }
    }

    /// Builder sized to a widget placed at `rect`, with its origin at (0,0).
    pub fn for_widget(rect: Rect) -> Self {
        Self::new(rect.to_local())
    }

    /// Get the bounding box.
    pub fn bbox(&self) -> Rect {
        self.bbox
    }

    /// The drawing surface.
    pub fn surface(&mut self) -> &mut ContentStreamBuilder {
        &mut self.surface
    }

    /// Finish drawing and produce the Form XObject.
    ///
    /// Fonts selected on the surface by standard name are declared in the
    /// stream's `Resources` as unembedded Type1 fonts.
    pub fn finish(self) -> Result<Stream> {
        let content = self.surface.build()?;

        let mut dict = Dictionary::new();
        dict.set_name("Type", "XObject");
        dict.set_name("Subtype", "Form");
        dict.set_integer("FormType", 1);
        dict.set_rectangle("BBox", self.bbox);

        let mut fonts = Dictionary::new();
        for name in self.surface.fonts_used() {
            if STANDARD_FONTS.contains(&name.as_str()) {
                fonts.set(name.as_str(), standard_font(name));
            } else {
                log::warn!("Font /{} is not a standard font; leaving it undeclared", name);
            }
        }
        let mut resources = Dictionary::new();
        if !fonts.is_empty() {
            resources.set("Font", fonts);
        }
        dict.set("Resources", resources);

        dict.set_integer("Length", content.len() as i64);
        log::trace!("Finished appearance stream: {} bytes", content.len());

        Ok(Stream::new(dict, content))
    }
}

fn standard_font(base_font: &str) -> Dictionary {
    let mut font = Dictionary::new();
    font.set_name("Type", "Font");
    font.set_name("Subtype", "Type1");
    font.set_name("BaseFont", base_font);
    if base_font != "Symbol" && base_font != "ZapfDingbats" {
        font.set_name("Encoding", "WinAnsiEncoding");
    }
    font
}
