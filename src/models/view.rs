use serde::Serialize;

use crate::models::{basket::Basket, catalog::Catalog};

/// One displayable basket line. `index` is the entry's position in the stored
/// basket and is what removal consumes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BasketRow {
    pub index: usize,
    pub product_name: String,
    pub option_label: String,
    pub units: u32,
    pub unit_price: f64,
    pub line_cost: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BasketView {
    pub rows: Vec<BasketRow>,
    pub total_items: u32,
    pub subtotal: f64,
    /// Stays `None` (shown as "-") until a checkout produces a final total.
    pub final_total: Option<f64>,
}

impl BasketView {
    /// Projects the basket onto the catalog, skipping orphaned entries.
    pub fn project(basket: &Basket, catalog: &Catalog) -> Self {
        let mut view = BasketView::default();

        for (index, item) in basket.items().iter().enumerate() {
            let (Some(product), Some(option)) = (
                catalog.find_product(&item.product_id),
                catalog.find_option(&item.product_id, &item.option_key),
            ) else {
                continue;
            };

            let line_cost = option.price * f64::from(item.units);
            view.total_items = view.total_items.saturating_add(item.units);
            view.subtotal += line_cost;
            view.rows.push(BasketRow {
                index,
                product_name: product.name.clone(),
                option_label: option.label.clone(),
                units: item.units,
                unit_price: option.price,
                line_cost,
            });
        }

        view
    }

    pub fn with_final_total(mut self, final_total: f64) -> Self {
        self.final_total = Some(final_total);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::basket::LineItem;

    #[test]
    fn test_project_skips_orphans_but_keeps_stored_positions() {
        let catalog = Catalog::default_catalog();
        let basket = Basket::from_items(vec![
            LineItem::new("tablet", "x", 4),
            LineItem::new("laptop", "i7", 1),
            LineItem::new("phone", "999", 2),
            LineItem::new("headphones", "bt", 2),
        ]);

        let view = BasketView::project(&basket, &catalog);

        assert_eq!(view.rows.len(), 2);
        assert_eq!(view.rows[0].index, 1);
        assert_eq!(view.rows[0].product_name, "Laptop");
        assert_eq!(view.rows[1].index, 3);
        assert_eq!(view.rows[1].line_cost, 280.0);
        assert_eq!(view.total_items, 3);
        assert_eq!(view.subtotal, 1380.0);
        assert_eq!(view.final_total, None);
    }

    #[test]
    fn test_project_empty_basket() {
        let view = BasketView::project(&Basket::new(), &Catalog::default_catalog());
        assert!(view.is_empty());
        assert_eq!(view.total_items, 0);
        assert_eq!(view.subtotal, 0.0);
    }
}
