//! Geometric primitives for annotation placement.
//!
//! PDF rectangles are stored as two corner points in default user space,
//! `[x1 y1 x2 y2]`, per ISO 32000-1:2008 Section 7.9.5.

use crate::object::Object;

/// A width/height pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Size {
    /// Horizontal extent
    pub width: f64,
    /// Vertical extent
    pub height: f64,
}

impl Size {
    /// Create a new size.
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// A rectangle given by two corner points.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    /// X coordinate of the first corner
    pub x1: f64,
    /// Y coordinate of the first corner
    pub y1: f64,
    /// X coordinate of the second corner
    pub x2: f64,
    /// Y coordinate of the second corner
    pub y2: f64,
}

impl Rect {
    /// Create a new rectangle from two corner points.
    ///
    /// # Examples
    ///
    /// ```
    /// use pdf_sigfield::geometry::Rect;
    ///
    /// let rect = Rect::new(100.0, 100.0, 300.0, 150.0);
    /// assert_eq!(rect.width(), 200.0);
    /// assert_eq!(rect.height(), 50.0);
    /// ```
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Create a rectangle from an origin and dimensions.
    pub fn from_origin_size(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::new(x, y, x + width, y + height)
    }

    /// The all-zero placeholder rectangle used for invisible signatures.
    pub fn zero() -> Self {
        Self::default()
    }

    /// Horizontal extent (always non-negative).
    pub fn width(&self) -> f64 {
        (self.x2 - self.x1).abs()
    }

    /// Vertical extent (always non-negative).
    pub fn height(&self) -> f64 {
        (self.y2 - self.y1).abs()
    }

    /// Width and height together.
    pub fn size(&self) -> Size {
        Size::new(self.width(), self.height())
    }

    /// True iff `x1 + x2 + y1 + y2` is exactly zero.
    ///
    /// The comparison is exact: the all-zero rectangle is the convention for
    /// an invisible signature, and nearly-zero rectangles are still placed.
    ///
    /// ```
    /// use pdf_sigfield::geometry::Rect;
    ///
    /// assert!(Rect::zero().is_degenerate());
    /// assert!(!Rect::new(0.0, 0.0, 1e-300, 0.0).is_degenerate());
    /// ```
    pub fn is_degenerate(&self) -> bool {
        self.x1 + self.x2 + self.y1 + self.y2 == 0.0
    }

    /// The same rectangle translated to the origin, as seen from inside an
    /// appearance stream.
    pub fn to_local(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width(), self.height())
    }

    /// Encode as a PDF array `[x1 y1 x2 y2]`.
    pub fn to_object(&self) -> Object {
        Object::Array(vec![
            Object::Real(self.x1),
            Object::Real(self.y1),
            Object::Real(self.x2),
            Object::Real(self.y2),
        ])
    }

    /// Decode a PDF array of four numbers.
    pub fn from_object(obj: &Object) -> Option<Rect> {
        let items = obj.as_array()?;
        if items.len() != 4 {
            return None;
        }
        Some(Rect::new(
            items[0].as_number()?,
            items[1].as_number()?,
            items[2].as_number()?,
            items[3].as_number()?,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_dimensions() {
        let rect = Rect::new(100.0, 100.0, 300.0, 150.0);
        assert_eq!(rect.size(), Size::new(200.0, 50.0));
    }

    #[test]
    fn test_rect_dimensions_with_swapped_corners() {
        let rect = Rect::new(300.0, 150.0, 100.0, 100.0);
        assert_eq!(rect.width(), 200.0);
        assert_eq!(rect.height(), 50.0);
    }

    #[test]
    fn test_degenerate_is_exact_sum() {
        assert!(Rect::zero().is_degenerate());
        // Corners cancel out: still degenerate by the sum rule
        assert!(Rect::new(-10.0, 5.0, 10.0, -5.0).is_degenerate());
        assert!(!Rect::new(0.0, 0.0, f64::MIN_POSITIVE, 0.0).is_degenerate());
    }

    #[test]
    fn test_to_local() {
        let local = Rect::new(100.0, 100.0, 300.0, 150.0).to_local();
        assert_eq!(local, Rect::new(0.0, 0.0, 200.0, 50.0));
    }

    #[test]
    fn test_object_round_trip() {
        let rect = Rect::new(1.0, 2.5, 3.0, 4.0);
        assert_eq!(Rect::from_object(&rect.to_object()), Some(rect));
    }

    #[test]
    fn test_from_object_accepts_integers() {
        let obj = Object::Array(vec![
            Object::Integer(0),
            Object::Integer(0),
            Object::Integer(612),
            Object::Integer(792),
        ]);
        assert_eq!(Rect::from_object(&obj), Some(Rect::new(0.0, 0.0, 612.0, 792.0)));
        assert_eq!(Rect::from_object(&Object::Integer(1)), None);
    }
}
