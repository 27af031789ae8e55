//! Box sizes available for packing.

use crate::model::BoxTemplate;

/// Compiled-in box catalog. Read-only, so workers share it without locking.
pub static BOX_CATALOG: [BoxTemplate; 3] = [
    BoxTemplate::new(1, 30.0, 40.0, 80.0),
    BoxTemplate::new(2, 50.0, 50.0, 40.0),
    BoxTemplate::new(3, 50.0, 80.0, 60.0),
];

/// Returns the catalog in its fixed order.
pub fn catalog() -> &'static [BoxTemplate] {
    &BOX_CATALOG
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_ids_are_unique() {
        let mut ids: Vec<u32> = catalog().iter().map(|tpl| tpl.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), catalog().len());
    }
}
