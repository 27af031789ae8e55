//! Common types and traits for box and product geometry.
//!
//! Products and boxes are both described by a (height, width, length) triple.
//! This module holds the triple type and the trait abstraction that both
//! sides of a fit check share.

/// Represents a dimension triple (height, width, length).
///
/// # Examples
/// ```
/// use order_packer::types::Vec3;
///
/// let dims = Vec3::new(30.0, 10.0, 20.0);
/// assert_eq!(dims.sorted_ascending(), Vec3::new(10.0, 20.0, 30.0));
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    /// Creates a new triple.
    ///
    /// # Parameters
    /// * `x` - Height
    /// * `y` - Width
    /// * `z` - Length
    #[inline]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Product of all components.
    #[inline]
    pub fn volume(&self) -> f64 {
        self.x * self.y * self.z
    }

    /// Returns the components sorted ascending.
    ///
    /// Sorting discards orientation: two triples compared after sorting match
    /// whenever one can be rotated onto the other along the axes.
    #[inline]
    pub fn sorted_ascending(&self) -> Self {
        let mut values = [self.x, self.y, self.z];
        values.sort_by(f64::total_cmp);
        Self::new(values[0], values[1], values[2])
    }

    /// Checks if the vector fits within another vector (component-wise <=).
    #[inline]
    pub fn fits_within(&self, container: &Self) -> bool {
        self.x <= container.x && self.y <= container.y && self.z <= container.z
    }
}

/// Trait for anything with a (height, width, length) extent.
///
/// Implemented by products, box templates and box instances so the fit
/// evaluator can compare them without caring which is which.
pub trait Dimensional {
    /// Returns the dimensions of the object.
    fn dimensions(&self) -> Vec3;

    /// Calculates the volume.
    fn volume(&self) -> f64 {
        self.dimensions().volume()
    }

    /// Dimensions sorted ascending.
    fn sorted_dimensions(&self) -> Vec3 {
        self.dimensions().sorted_ascending()
    }

    /// Checks whether this object fits inside `other` in some axis-aligned
    /// orientation, i.e. sorted triple against sorted triple.
    fn fits_rotated_in(&self, other: &impl Dimensional) -> bool {
        self.sorted_dimensions()
            .fits_within(&other.sorted_dimensions())
    }
}
