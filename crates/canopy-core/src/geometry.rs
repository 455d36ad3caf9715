#![forbid(unsafe_code)]

//! Row geometry supplied by the rendering layer.

/// Pointer position within one rendered row.
///
/// `pointer_y` is relative to the top edge of the row, so `0.0` is the top
/// and `height` is the bottom. Units are whatever the renderer uses (pixels,
/// cells, points); only ratios matter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RowGeometry {
    /// Height of the row.
    pub height: f32,
    /// Pointer offset from the top of the row.
    pub pointer_y: f32,
}

impl RowGeometry {
    /// Create a geometry sample.
    #[must_use]
    pub const fn new(height: f32, pointer_y: f32) -> Self {
        Self { height, pointer_y }
    }

    /// Geometry for a pointer at `fraction` of the row height (`0.5` = center).
    #[must_use]
    pub fn at_fraction(height: f32, fraction: f32) -> Self {
        Self {
            height,
            pointer_y: height * fraction,
        }
    }

    /// Pointer position as a fraction of the row height.
    ///
    /// Returns `None` for degenerate rows (zero, negative or NaN height).
    #[must_use]
    pub fn fraction(&self) -> Option<f32> {
        if self.height > 0.0 {
            Some(self.pointer_y / self.height)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fraction_of_center_is_half() {
        let g = RowGeometry::new(20.0, 10.0);
        assert_eq!(g.fraction(), Some(0.5));
    }

    #[test]
    fn at_fraction_scales_height() {
        let g = RowGeometry::at_fraction(16.0, 0.25);
        assert_eq!(g.pointer_y, 4.0);
    }

    #[test]
    fn degenerate_rows_have_no_fraction() {
        assert_eq!(RowGeometry::new(0.0, 0.0).fraction(), None);
        assert_eq!(RowGeometry::new(f32::NAN, 1.0).fraction(), None);
    }
}
