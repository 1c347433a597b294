use glam::Vec3;

/// Axis-aligned box around a set of decoded positions.
///
/// A box built from zero points is *empty*: `min` is +inf and `max` is -inf on
/// every axis. Check [`BoundingBox::is_empty`] before using the extents; an
/// empty box is not a zero-size box at the origin.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct BoundingBox {
    pub min: Vec3,
    pub max: Vec3,
}

impl BoundingBox {
    pub const EMPTY: BoundingBox = BoundingBox {
        min: Vec3::INFINITY,
        max: Vec3::NEG_INFINITY,
    };

    /// Builds a box over `positions`, read as records of `component_count`
    /// floats. Missing y/z components count as 0; components past the third
    /// are ignored.
    pub fn from_positions(positions: &[f32], component_count: usize) -> Self {
        let mut b = Self::EMPTY;
        if component_count == 0 {
            return b;
        }
        for record in positions.chunks_exact(component_count) {
            let y = record.get(1).copied().unwrap_or(0.0);
            let z = record.get(2).copied().unwrap_or(0.0);
            b.include(Vec3::new(record[0], y, z));
        }
        b
    }

    #[inline]
    pub fn include(&mut self, p: Vec3) {
        self.min = self.min.min(p);
        self.max = self.max.max(p);
    }

    /// True when no point has been included (`min > max` on some axis).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.min.cmpgt(self.max).any()
    }

    #[inline]
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    #[inline]
    pub fn extent(&self) -> Vec3 {
        self.max - self.min
    }

    /// Radius of the sphere through the box corners, centred on `center()`.
    #[inline]
    pub fn radius(&self) -> f32 {
        self.extent().length() * 0.5
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::EMPTY
    }
}

/// Bounds of a decoded position attribute. See [`BoundingBox::from_positions`].
#[inline]
pub fn bounds(positions: &[f32], component_count: usize) -> BoundingBox {
    BoundingBox::from_positions(positions, component_count)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn three_component_bounds() {
        let pos = [0.0, 0.0, 0.0, 1.0, 2.0, 3.0, -1.0, 5.0, 0.0];
        let b = bounds(&pos, 3);
        assert_eq!(b.min, Vec3::new(-1.0, 0.0, 0.0));
        assert_eq!(b.max, Vec3::new(1.0, 5.0, 3.0));
        assert!(!b.is_empty());
    }

    #[test]
    fn all_negative_data_keeps_negative_max() {
        // A smallest-positive max sentinel would wrongly report max = 1e-38 here.
        let b = bounds(&[-4.0, -3.0, -2.0, -1.0], 2);
        assert_eq!(b.max, Vec3::new(-2.0, -1.0, 0.0));
        assert_eq!(b.min, Vec3::new(-4.0, -3.0, 0.0));
    }

    #[test]
    fn two_components_default_z_to_zero() {
        let b = bounds(&[1.0, 2.0, 3.0, 4.0], 2);
        assert_eq!(b.min.z, 0.0);
        assert_eq!(b.max.z, 0.0);
    }

    #[test]
    fn empty_input_is_detectably_empty() {
        let b = bounds(&[], 3);
        assert!(b.is_empty());
        assert!(b.min.x > b.max.x);
        assert_eq!(b, BoundingBox::EMPTY);
    }

    #[test]
    fn zero_components_yield_empty() {
        assert!(bounds(&[1.0, 2.0], 0).is_empty());
    }

    #[test]
    fn single_point_is_not_empty() {
        let b = bounds(&[2.0, 2.0, 2.0], 3);
        assert!(!b.is_empty());
        assert_eq!(b.extent(), Vec3::ZERO);
        assert_eq!(b.center(), Vec3::splat(2.0));
    }
}
