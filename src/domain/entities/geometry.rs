//! Plain geometry used by layout and transitions.
//!
//! Coordinates are logical points in the gallery container's space. The
//! terminal host treats one point as one cell.

/// A point in container coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    /// Horizontal position.
    pub x: f64,
    /// Vertical position.
    pub y: f64,
}

impl Point {
    /// Creates a point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A width/height pair.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    /// Width in points.
    pub width: f64,
    /// Height in points.
    pub height: f64,
}

impl Size {
    /// The empty size.
    pub const ZERO: Self = Self::new(0.0, 0.0);

    /// Creates a size.
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Returns true when either dimension is not strictly positive.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Width divided by height, `None` for an empty size.
    #[must_use]
    pub fn aspect_ratio(&self) -> Option<f64> {
        if self.is_empty() {
            None
        } else {
            Some(self.width / self.height)
        }
    }
}

impl From<(u32, u32)> for Size {
    fn from((width, height): (u32, u32)) -> Self {
        Self::new(f64::from(width), f64::from(height))
    }
}

/// An axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    /// Top-left corner.
    pub origin: Point,
    /// Extent.
    pub size: Size,
}

impl Rect {
    /// The empty rectangle at the origin.
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0, 0.0);

    /// Creates a rectangle from its components.
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            origin: Point::new(x, y),
            size: Size::new(width, height),
        }
    }

    /// Left edge.
    #[must_use]
    pub const fn x(&self) -> f64 {
        self.origin.x
    }

    /// Top edge.
    #[must_use]
    pub const fn y(&self) -> f64 {
        self.origin.y
    }

    /// Width.
    #[must_use]
    pub const fn width(&self) -> f64 {
        self.size.width
    }

    /// Height.
    #[must_use]
    pub const fn height(&self) -> f64 {
        self.size.height
    }

    /// Center point.
    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(
            self.origin.x + self.size.width / 2.0,
            self.origin.y + self.size.height / 2.0,
        )
    }

    /// Largest rectangle with the aspect ratio of `content` that fits inside
    /// `self`, centered. An empty `content` yields `self` unchanged.
    #[must_use]
    pub fn aspect_fit(&self, content: Size) -> Self {
        let Some(ratio) = content.aspect_ratio() else {
            return *self;
        };
        if self.size.is_empty() {
            return Self {
                origin: self.center(),
                size: Size::ZERO,
            };
        }

        let (width, height) = if self.size.width / self.size.height > ratio {
            (self.size.height * ratio, self.size.height)
        } else {
            (self.size.width, self.size.width / ratio)
        };
        let center = self.center();
        Self::new(center.x - width / 2.0, center.y - height / 2.0, width, height)
    }

    /// Linear interpolation between two rectangles.
    #[must_use]
    pub fn lerp(&self, to: &Self, t: f64) -> Self {
        Self::new(
            lerp(self.origin.x, to.origin.x, t),
            lerp(self.origin.y, to.origin.y, t),
            lerp(self.size.width, to.size.width, t),
            lerp(self.size.height, to.size.height, t),
        )
    }

    /// Approximate equality, used to compare animated layouts.
    #[must_use]
    pub fn approx_eq(&self, other: &Self) -> bool {
        const EPSILON: f64 = 1e-6;
        (self.origin.x - other.origin.x).abs() < EPSILON
            && (self.origin.y - other.origin.y).abs() < EPSILON
            && (self.size.width - other.size.width).abs() < EPSILON
            && (self.size.height - other.size.height).abs() < EPSILON
    }
}

/// Linear interpolation between two scalars.
#[must_use]
pub fn lerp(from: f64, to: f64, t: f64) -> f64 {
    from + (to - from) * t
}

/// Maps the gallery content onto the frame of a source view: the content is
/// scaled into the source bounds preserving its aspect ratio and centered.
///
/// Falls back to the source view's own image size as the aspect hint and
/// then to the plain source frame.
#[must_use]
pub fn destination_frame_for_source_frame(
    source_frame: Rect,
    content_size: Size,
    source_image_size: Option<Size>,
) -> Rect {
    if !content_size.is_empty() {
        return source_frame.aspect_fit(content_size);
    }
    match source_image_size {
        Some(size) if !size.is_empty() => source_frame.aspect_fit(size),
        _ => source_frame,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(Size::new(200.0, 100.0), Rect::new(0.0, 25.0, 100.0, 50.0) ; "wide_content")]
    #[test_case(Size::new(100.0, 200.0), Rect::new(25.0, 0.0, 50.0, 100.0) ; "tall_content")]
    #[test_case(Size::new(10.0, 10.0), Rect::new(0.0, 0.0, 100.0, 100.0) ; "square_content")]
    #[test_case(Size::ZERO, Rect::new(0.0, 0.0, 100.0, 100.0) ; "empty_content")]
    fn test_aspect_fit(content: Size, expected: Rect) {
        let bounds = Rect::new(0.0, 0.0, 100.0, 100.0);
        assert!(bounds.aspect_fit(content).approx_eq(&expected));
    }

    #[test]
    fn test_lerp_endpoints_and_midpoint() {
        let a = Rect::new(0.0, 0.0, 100.0, 100.0);
        let b = Rect::new(10.0, 20.0, 30.0, 40.0);

        assert!(a.lerp(&b, 0.0).approx_eq(&a));
        assert!(a.lerp(&b, 1.0).approx_eq(&b));
        assert!(a.lerp(&b, 0.5).approx_eq(&Rect::new(5.0, 10.0, 65.0, 70.0)));
    }

    #[test]
    fn test_destination_frame_prefers_content_aspect() {
        let source = Rect::new(10.0, 10.0, 40.0, 40.0);
        let frame = destination_frame_for_source_frame(
            source,
            Size::new(400.0, 200.0),
            Some(Size::new(1.0, 4.0)),
        );
        assert!(frame.approx_eq(&Rect::new(10.0, 20.0, 40.0, 20.0)));
    }

    #[test]
    fn test_destination_frame_falls_back_to_source() {
        let source = Rect::new(1.0, 2.0, 3.0, 4.0);
        assert_eq!(
            destination_frame_for_source_frame(source, Size::ZERO, None),
            source
        );
    }
}
