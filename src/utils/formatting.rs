use console::style;
use tabled::{settings::{Alignment, Style}, Table, Tabled};

use crate::models::{
    catalog::{Catalog, Product, ProductOption},
    totals::Totals,
    view::BasketView,
};

/// Shown in place of the final total until a checkout has produced one.
pub const FINAL_TOTAL_PLACEHOLDER: &str = "-";

#[derive(Tabled)]
struct BasketTableRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "Product")]
    product: String,
    #[tabled(rename = "Option")]
    option: String,
    #[tabled(rename = "Units")]
    units: u32,
    #[tabled(rename = "Unit Price")]
    unit_price: String,
    #[tabled(rename = "Cost")]
    cost: String,
}

#[derive(Tabled)]
struct CatalogTableRow {
    #[tabled(rename = "Product")]
    product: String,
    #[tabled(rename = "Option")]
    option: String,
    #[tabled(rename = "Label")]
    label: String,
    #[tabled(rename = "Price")]
    price: String,
}

pub fn format_money(amount: f64) -> String {
    format!("${:.2}", amount)
}

/// Whole amounts print without cents, the way prices are listed.
pub fn format_price(amount: f64) -> String {
    if amount.fract() == 0.0 {
        format!("${}", amount)
    } else {
        format_money(amount)
    }
}

pub fn format_basket_table(view: &BasketView) -> String {
    if view.is_empty() {
        return String::new();
    }

    let rows: Vec<BasketTableRow> = view
        .rows
        .iter()
        .map(|row| BasketTableRow {
            index: row.index,
            product: row.product_name.clone(),
            option: row.option_label.clone(),
            units: row.units,
            unit_price: format_price(row.unit_price),
            cost: format_price(row.line_cost),
        })
        .collect();

    let mut table = Table::new(rows);
    table.with(Style::rounded()).with(Alignment::left());

    table.to_string()
}

pub fn format_basket_summary(view: &BasketView) -> String {
    let final_total = view
        .final_total
        .map(format_money)
        .unwrap_or_else(|| FINAL_TOTAL_PLACEHOLDER.to_string());

    let mut output = String::new();
    output.push_str(&format!("{}: {}\n", style("Total items").bold(), view.total_items));
    output.push_str(&format!(
        "{}: {}\n",
        style("Subtotal").bold(),
        style(format_money(view.subtotal)).green()
    ));
    output.push_str(&format!("{}: {}\n", style("Final total").bold(), final_total));
    output
}

pub fn format_catalog_table(catalog: &Catalog) -> String {
    let rows: Vec<CatalogTableRow> = catalog
        .products()
        .flat_map(|product| {
            product.options.iter().map(move |option| CatalogTableRow {
                product: product.id.clone(),
                option: option.key.clone(),
                label: option.label.clone(),
                price: format_price(option.price),
            })
        })
        .collect();

    let mut table = Table::new(rows);
    table.with(Style::rounded()).with(Alignment::left());

    table.to_string()
}

/// Price and description of the selected option of a product.
pub fn format_option_detail(product: &Product, option: &ProductOption) -> String {
    let mut output = String::new();

    output.push_str(&format!("{}: {}\n", style("Product").bold(), style(&product.name).cyan()));
    output.push_str(&format!("{}: {}\n", style("Option").bold(), option.label));
    output.push_str(&format!(
        "{}: {}\n",
        style("Price").bold(),
        style(format_price(option.price)).green()
    ));
    output.push_str(&format!("{}: {}\n", style("Description").bold(), style(&option.desc).dim()));

    output
}

/// Checkout summary shown before the accept/decline decision.
pub fn format_checkout_summary(totals: &Totals) -> String {
    format!(
        "Items: {}\nSubtotal: {}\nDelivery: {}\n\nFINAL TOTAL: {}",
        totals.items,
        format_money(totals.subtotal),
        format_money(totals.delivery),
        format_money(totals.final_total),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::basket::{Basket, LineItem};

    #[test]
    fn test_money_rounds_only_for_display() {
        assert_eq!(format_money(9.999), "$10.00");
        assert_eq!(format_money(0.0), "$0.00");
        assert_eq!(format_price(1100.0), "$1100");
        assert_eq!(format_price(3.5), "$3.50");
    }

    #[test]
    fn test_checkout_summary_lists_all_amounts() {
        let totals = Totals {
            items: 1,
            subtotal: 600.0,
            delivery: 60.0,
            final_total: 660.0,
        };

        assert_eq!(
            format_checkout_summary(&totals),
            "Items: 1\nSubtotal: $600.00\nDelivery: $60.00\n\nFINAL TOTAL: $660.00"
        );
    }

    #[test]
    fn test_basket_table_contains_rows() {
        let catalog = Catalog::default_catalog();
        let basket = Basket::from_items(vec![LineItem::new("phone", "128", 2)]);
        let table = format_basket_table(&BasketView::project(&basket, &catalog));

        assert!(table.contains("Phone"));
        assert!(table.contains("128GB"));
        assert!(table.contains("$1500"));
    }

    #[test]
    fn test_empty_basket_table_is_blank() {
        assert!(format_basket_table(&BasketView::default()).is_empty());
    }

    #[test]
    fn test_summary_uses_placeholder_until_checkout() {
        console::set_colors_enabled(false);
        let view = BasketView::default();
        assert!(format_basket_summary(&view).contains("Final total: -"));

        let view = view.with_final_total(660.0);
        assert!(format_basket_summary(&view).contains("Final total: $660.00"));
    }
}
