//! Fit checks between products and boxes.
//!
//! Only necessary conditions are checked: remaining volume and per-axis
//! bounds after sorting. No placement coordinates are computed, so passing
//! does not prove that several products can share a box without overlap.

use crate::model::{BoxInstance, Product};
use crate::types::Dimensional;

/// Checks whether `product` can be added to the current contents of `target`.
///
/// # Parameters
/// * `product` - The product to add
/// * `target` - Box with the products already assigned to it
///
/// # Returns
/// `true` if the product fits the remaining volume and, in some axis-aligned
/// orientation, the box's dimensions
pub fn can_fit(product: &Product, target: &BoxInstance) -> bool {
    if product.volume() > target.remaining_volume() {
        return false;
    }

    product.fits_rotated_in(target)
}
