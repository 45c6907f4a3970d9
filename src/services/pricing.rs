use crate::models::{basket::Basket, catalog::Catalog, totals::Totals};

/// Orders with a subtotal up to this amount pay a delivery fee.
pub const FREE_DELIVERY_THRESHOLD: f64 = 1000.0;
pub const DELIVERY_RATE: f64 = 0.10;

/// Delivery is charged on non-empty orders up to the threshold, waived above.
pub fn delivery_fee(subtotal: f64) -> f64 {
    if subtotal > 0.0 && subtotal <= FREE_DELIVERY_THRESHOLD {
        subtotal * DELIVERY_RATE
    } else {
        0.0
    }
}

/// Totals for a basket snapshot. Orphaned entries count for nothing.
pub fn compute_totals(basket: &Basket, catalog: &Catalog) -> Totals {
    let (items, subtotal) = basket
        .items()
        .iter()
        .filter_map(|item| {
            catalog
                .find_option(&item.product_id, &item.option_key)
                .map(|option| (item.units, option.price * f64::from(item.units)))
        })
        .fold((0u32, 0.0f64), |(items, subtotal), (units, cost)| {
            (items.saturating_add(units), subtotal + cost)
        });

    let delivery = delivery_fee(subtotal);
    Totals {
        items,
        subtotal,
        delivery,
        final_total: subtotal + delivery,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::basket::LineItem;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_delivery_fee_boundaries() {
        assert_close(delivery_fee(500.0), 50.0);
        assert_close(delivery_fee(1000.0), 100.0);
        assert_close(delivery_fee(1000.01), 0.0);
        assert_close(delivery_fee(0.0), 0.0);
    }

    #[test]
    fn test_compute_totals_small_order_pays_delivery() {
        let catalog = Catalog::default_catalog();
        let basket = Basket::from_items(vec![
            LineItem::new("headphones", "wired", 2),
            LineItem::new("headphones", "anc", 1),
        ]);

        let totals = compute_totals(&basket, &catalog);
        assert_eq!(totals.items, 3);
        assert_close(totals.subtotal, 380.0);
        assert_close(totals.delivery, 38.0);
        assert_close(totals.final_total, 418.0);
    }

    #[test]
    fn test_compute_totals_skips_orphans() {
        let catalog = Catalog::default_catalog();
        let basket = Basket::from_items(vec![
            LineItem::new("phone", "64", 1),
            LineItem::new("phone", "512", 7),
            LineItem::new("tablet", "base", 3),
        ]);

        let totals = compute_totals(&basket, &catalog);
        assert_eq!(totals.items, 1);
        assert_close(totals.subtotal, 600.0);
        assert_close(totals.delivery, 60.0);
    }

    #[test]
    fn test_compute_totals_is_idempotent() {
        let catalog = Catalog::default_catalog();
        let basket = Basket::from_items(vec![
            LineItem::new("laptop", "i5", 1),
            LineItem::new("headphones", "bt", 3),
        ]);

        assert_eq!(compute_totals(&basket, &catalog), compute_totals(&basket, &catalog));
    }

    #[test]
    fn test_empty_basket_has_no_fee() {
        let totals = compute_totals(&Basket::new(), &Catalog::default_catalog());
        assert_eq!(totals, Totals::default());
        assert!(totals.is_empty());
    }

    #[test]
    fn test_fractional_prices_stay_unrounded() {
        let catalog = Catalog::new(vec![crate::models::catalog::Product::new(
            "cable",
            "Cable",
            vec![crate::models::catalog::ProductOption::new("usb", "USB-C", 3.333, "")],
        )]);
        let basket = Basket::from_items(vec![LineItem::new("cable", "usb", 3)]);

        let totals = compute_totals(&basket, &catalog);
        assert_close(totals.subtotal, 9.999);
        assert_close(totals.delivery, 0.9999);
    }
}
