//! Packing logic for a single order.
//!
//! Implements a First-Fit-Decreasing heuristic:
//! - Products are sorted by descending volume (stable for equal volumes)
//! - Each product goes into the first already opened box that can take it
//! - Otherwise the smallest catalog box that can hold it alone is opened
//!
//! Large products claim space first, which keeps fragmentation lower than
//! arbitrary or ascending order. The result is not guaranteed to use the
//! minimum number of boxes.

use std::cmp::Ordering;

use crate::catalog::catalog;
use crate::geometry::can_fit;
use crate::model::{BoxInstance, BoxTemplate, Order, PackingResponse, Product};
use crate::types::Dimensional;

/// Picks the smallest box (by volume) of the compiled-in catalog that can hold
/// `product` on its own.
///
/// # Returns
/// A fresh, empty `BoxInstance`, or `None` if no catalog box is large enough
pub fn select_best_box(product: &Product) -> Option<BoxInstance> {
    select_best_box_from(catalog(), product)
}

/// Like `select_best_box`, but over an explicit list of templates.
///
/// Ties on volume go to the template listed first.
pub fn select_best_box_from(templates: &[BoxTemplate], product: &Product) -> Option<BoxInstance> {
    let mut best: Option<BoxInstance> = None;

    for template in templates {
        let candidate = template.instantiate();
        if !can_fit(product, &candidate) {
            continue;
        }

        // strict comparison keeps the earliest template on equal volume
        let better = match &best {
            Some(current) => candidate.volume() < current.volume(),
            None => true,
        };
        if better {
            best = Some(candidate);
        }
    }

    best
}

/// Packs one order into boxes of the compiled-in catalog.
///
/// # Parameters
/// * `order` - The order to pack
///
/// # Returns
/// `PackingResponse` with the opened boxes in opening order and any products
/// that fit no catalog box
pub fn pack_order(order: &Order) -> PackingResponse {
    pack_order_with_catalog(order, catalog())
}

/// Packs one order using the given box templates.
pub fn pack_order_with_catalog(order: &Order, templates: &[BoxTemplate]) -> PackingResponse {
    // sort_by is stable, so equal volumes keep their input order
    let mut products = order.products.clone();
    products.sort_by(|a, b| b.volume().partial_cmp(&a.volume()).unwrap_or(Ordering::Equal));

    let mut boxes: Vec<BoxInstance> = Vec::new();
    let mut excluded: Vec<Product> = Vec::new();

    for product in products {
        if let Some(target) = boxes.iter_mut().find(|b| can_fit(&product, b)) {
            target.assign(product);
            continue;
        }

        match select_best_box_from(templates, &product) {
            Some(mut new_box) => {
                new_box.assign(product);
                boxes.push(new_box);
            }
            None => {
                log::debug!(
                    "Order {}: product '{}' fits no box and is excluded",
                    order.id,
                    product.id
                );
                excluded.push(product);
            }
        }
    }

    PackingResponse {
        order_id: order.id.clone(),
        boxes,
        excluded,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::OrderId;

    fn product(id: &str, dims: (f64, f64, f64)) -> Product {
        Product::new(id, dims).unwrap()
    }

    fn order(id: i64, products: Vec<Product>) -> Order {
        Order::new(OrderId::Number(id), products)
    }

    fn assert_box_invariants(response: &PackingResponse) {
        for packed in &response.boxes {
            assert!(
                packed.used_volume() <= packed.volume(),
                "Box {} holds {} of {} volume",
                packed.id,
                packed.used_volume(),
                packed.volume()
            );
            for p in &packed.products {
                assert!(
                    p.fits_rotated_in(packed),
                    "Product {} does not fit box {} dimensionally",
                    p.id,
                    packed.id
                );
            }
        }
    }

    fn box_contents(response: &PackingResponse) -> Vec<(u32, Vec<String>)> {
        response
            .boxes
            .iter()
            .map(|b| (b.id, b.products.iter().map(|p| p.id.clone()).collect()))
            .collect()
    }

    #[test]
    fn small_product_joins_open_box() {
        let order = order(
            1,
            vec![
                product("P1", (20.0, 30.0, 70.0)),
                product("P2", (10.0, 10.0, 10.0)),
            ],
        );

        let response = pack_order(&order);
        assert_eq!(response.order_id, OrderId::Number(1));
        assert_eq!(response.box_count(), 1);
        assert_eq!(response.boxes[0].id, 1);
        assert_eq!(
            box_contents(&response),
            vec![(1, vec!["P1".to_string(), "P2".to_string()])]
        );
        assert!(response.is_complete());
    }

    #[test]
    fn selects_smallest_fitting_box() {
        // 40 on the shortest side rules out box 1 (30x40x80)
        let p = product("P", (45.0, 45.0, 40.0));
        let chosen = select_best_box(&p).expect("a box must fit");
        assert_eq!(chosen.id, 2);
        assert!(chosen.products.is_empty());
    }

    #[test]
    fn only_largest_box_fits() {
        let p = product("Wide", (50.0, 70.0, 55.0));
        assert_eq!(select_best_box(&p).map(|b| b.id), Some(3));
    }

    #[test]
    fn no_box_for_oversized_product() {
        assert!(select_best_box(&product("Huge", (100.0, 100.0, 100.0))).is_none());
    }

    #[test]
    fn equal_volume_tie_goes_to_first_template() {
        let templates = [
            BoxTemplate::new(7, 10.0, 20.0, 30.0),
            BoxTemplate::new(8, 30.0, 20.0, 10.0),
        ];
        let chosen = select_best_box_from(&templates, &product("P", (5.0, 5.0, 5.0)));
        assert_eq!(chosen.map(|b| b.id), Some(7));

        let reversed = [templates[1], templates[0]];
        let chosen = select_best_box_from(&reversed, &product("P", (5.0, 5.0, 5.0)));
        assert_eq!(chosen.map(|b| b.id), Some(8));
    }

    #[test]
    fn oversized_product_is_excluded_not_boxed() {
        let order = Order::new("big", vec![product("Huge", (100.0, 100.0, 100.0))]);
        let response = pack_order(&order);
        assert!(response.boxes.is_empty());
        assert_eq!(response.excluded_count(), 1);
        assert_eq!(response.excluded[0].id, "Huge");
    }

    #[test]
    fn exclusion_does_not_affect_other_products() {
        let order = order(
            5,
            vec![
                product("Huge", (100.0, 100.0, 100.0)),
                product("Small", (10.0, 10.0, 10.0)),
            ],
        );
        let response = pack_order(&order);
        assert_eq!(box_contents(&response), vec![(1, vec!["Small".to_string()])]);
        assert_eq!(response.excluded_count(), 1);
    }

    #[test]
    fn empty_order_yields_no_boxes() {
        let response = pack_order(&order(9, Vec::new()));
        assert!(response.boxes.is_empty());
        assert!(response.excluded.is_empty());
    }

    #[test]
    fn products_packed_largest_first() {
        let order = order(
            2,
            vec![
                product("Small", (10.0, 10.0, 10.0)),
                product("Large", (30.0, 40.0, 80.0)),
            ],
        );
        let response = pack_order(&order);
        // Large fills box 1 completely, so Small opens a second box
        assert_eq!(
            box_contents(&response),
            vec![
                (1, vec!["Large".to_string()]),
                (1, vec!["Small".to_string()])
            ]
        );
    }

    #[test]
    fn equal_volumes_keep_input_order() {
        let order = order(
            3,
            vec![
                product("A", (10.0, 20.0, 30.0)),
                product("B", (30.0, 20.0, 10.0)),
                product("C", (20.0, 30.0, 10.0)),
            ],
        );
        let response = pack_order(&order);
        assert_eq!(
            box_contents(&response),
            vec![(
                1,
                vec!["A".to_string(), "B".to_string(), "C".to_string()]
            )]
        );
    }

    #[test]
    fn many_products_respect_invariants() {
        let mut products = Vec::new();
        for i in 0..40 {
            let h = 5.0 + (i % 7) as f64 * 6.0;
            let w = 8.0 + (i % 5) as f64 * 9.0;
            let l = 10.0 + (i % 3) as f64 * 20.0;
            products.push(product(&format!("P{i}"), (h, w, l)));
        }
        let response = pack_order(&order(4, products));
        assert_box_invariants(&response);

        let packed: usize = response.boxes.iter().map(|b| b.products.len()).sum();
        assert_eq!(packed + response.excluded_count(), 40);
    }

    #[test]
    fn packing_is_deterministic() {
        let order = order(
            6,
            vec![
                product("A", (20.0, 20.0, 20.0)),
                product("B", (20.0, 20.0, 20.0)),
                product("C", (40.0, 40.0, 40.0)),
                product("D", (25.0, 30.0, 35.0)),
                product("E", (20.0, 20.0, 20.0)),
            ],
        );
        let first = pack_order(&order);
        for _ in 0..5 {
            assert_eq!(box_contents(&pack_order(&order)), box_contents(&first));
        }
    }
}
