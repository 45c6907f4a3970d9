use serde::Serialize;

/// Order totals derived from a basket snapshot. Never persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Totals {
    pub items: u32,
    pub subtotal: f64,
    pub delivery: f64,
    pub final_total: f64,
}

impl Totals {
    pub fn is_empty(&self) -> bool {
        self.items == 0
    }
}
