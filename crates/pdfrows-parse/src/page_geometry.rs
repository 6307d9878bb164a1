//! Page rotation and the initial transformation matrix.
//!
//! Content streams draw in PDF user space. The interpreter starts every page
//! with a CTM that moves the media box origin to `(0, 0)` and applies the
//! page's `/Rotate`, so that everything it reports is in upright page space
//! with a bottom-left origin. Flipping to top-left is then `height - y`.

use pdfrows_core::{BBox, Ctm};

/// Upright page frame derived from the media box and `/Rotate`.
///
/// The media box is stored the way the backend reads it: `x0`/`x1` are the
/// horizontal bounds and `top`/`bottom` hold the raw lower and upper `y`
/// values of the PDF array.
///
/// ```
/// use pdfrows_core::BBox;
/// use pdfrows_parse::page_geometry::PageGeometry;
///
/// let geo = PageGeometry::new(BBox::new(0.0, 0.0, 612.0, 792.0), 90);
/// assert_eq!(geo.width(), 792.0);
/// assert_eq!(geo.height(), 612.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct PageGeometry {
    rotation: i32,
    x0: f64,
    y0: f64,
    x1: f64,
    y1: f64,
}

impl PageGeometry {
    /// `rotation` is normalized to 0, 90, 180 or 270. Values that are not a
    /// multiple of 90 are treated as 0.
    pub fn new(media_box: BBox, rotation: i32) -> Self {
        let rotation = match rotation.rem_euclid(360) {
            r @ (90 | 180 | 270) => r,
            _ => 0,
        };
        Self {
            rotation,
            x0: media_box.x0.min(media_box.x1),
            y0: media_box.top.min(media_box.bottom),
            x1: media_box.x0.max(media_box.x1),
            y1: media_box.top.max(media_box.bottom),
        }
    }

    /// Upright page width.
    pub fn width(&self) -> f64 {
        match self.rotation {
            90 | 270 => self.y1 - self.y0,
            _ => self.x1 - self.x0,
        }
    }

    /// Upright page height.
    pub fn height(&self) -> f64 {
        match self.rotation {
            90 | 270 => self.x1 - self.x0,
            _ => self.y1 - self.y0,
        }
    }

    pub fn rotation(&self) -> i32 {
        self.rotation
    }

    /// CTM installed before the page's content stream runs.
    pub fn initial_ctm(&self) -> Ctm {
        let (x0, y0, x1, y1) = (self.x0, self.y0, self.x1, self.y1);
        match self.rotation {
            90 => Ctm::new(0.0, -1.0, 1.0, 0.0, -y0, x1),
            180 => Ctm::new(-1.0, 0.0, 0.0, -1.0, x1, y1),
            270 => Ctm::new(0.0, 1.0, -1.0, 0.0, y1, -x0),
            _ => Ctm::new(1.0, 0.0, 0.0, 1.0, -x0, -y0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pdfrows_core::Point;

    const LETTER: BBox = BBox {
        x0: 0.0,
        top: 0.0,
        x1: 612.0,
        bottom: 792.0,
    };

    fn assert_point(actual: Point, x: f64, y: f64) {
        assert!(
            (actual.x - x).abs() < 1e-9 && (actual.y - y).abs() < 1e-9,
            "expected ({x}, {y}), got ({}, {})",
            actual.x,
            actual.y
        );
    }

    #[test]
    fn rotate_0_dimensions_and_identity() {
        let geo = PageGeometry::new(LETTER, 0);
        assert_eq!((geo.width(), geo.height()), (612.0, 792.0));
        assert_eq!(geo.initial_ctm(), Ctm::identity());
    }

    #[test]
    fn rotate_0_offsets_media_box_origin() {
        let geo = PageGeometry::new(BBox::new(100.0, 50.0, 400.0, 450.0), 0);
        assert_eq!((geo.width(), geo.height()), (300.0, 400.0));
        assert_point(geo.initial_ctm().transform_point(Point::new(100.0, 50.0)), 0.0, 0.0);
    }

    #[test]
    fn rotate_90_dimensions_and_mapping() {
        let geo = PageGeometry::new(LETTER, 90);
        assert_eq!((geo.width(), geo.height()), (792.0, 612.0));
        let ctm = geo.initial_ctm();
        // Native bottom-left becomes the upright top-left.
        assert_point(ctm.transform_point(Point::new(0.0, 0.0)), 0.0, 612.0);
        assert_point(ctm.transform_point(Point::new(612.0, 0.0)), 0.0, 0.0);
        assert_point(ctm.transform_point(Point::new(612.0, 792.0)), 792.0, 0.0);
    }

    #[test]
    fn rotate_180_flips_both_axes() {
        let ctm = PageGeometry::new(LETTER, 180).initial_ctm();
        assert_point(ctm.transform_point(Point::new(72.0, 720.0)), 540.0, 72.0);
    }

    #[test]
    fn rotate_270_dimensions_and_mapping() {
        let geo = PageGeometry::new(LETTER, 270);
        assert_eq!((geo.width(), geo.height()), (792.0, 612.0));
        let ctm = geo.initial_ctm();
        assert_point(ctm.transform_point(Point::new(0.0, 0.0)), 792.0, 0.0);
        assert_point(ctm.transform_point(Point::new(0.0, 792.0)), 0.0, 0.0);
    }

    #[test]
    fn negative_and_odd_rotations_normalize() {
        assert_eq!(PageGeometry::new(LETTER, -90).rotation(), 270);
        assert_eq!(PageGeometry::new(LETTER, 450).rotation(), 90);
        assert_eq!(PageGeometry::new(LETTER, 45).rotation(), 0);
    }

    #[test]
    fn reversed_media_box_is_normalized() {
        let geo = PageGeometry::new(BBox::new(612.0, 792.0, 0.0, 0.0), 0);
        assert_eq!((geo.width(), geo.height()), (612.0, 792.0));
    }
}
