use serde::{Deserialize, Serialize};

/// One selected product option plus a quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub product_id: String,
    pub option_key: String,
    pub units: u32,
}

impl LineItem {
    pub fn new(product_id: &str, option_key: &str, units: u32) -> Self {
        Self {
            product_id: product_id.to_string(),
            option_key: option_key.to_string(),
            units,
        }
    }

    pub fn matches(&self, product_id: &str, option_key: &str) -> bool {
        self.product_id == product_id && self.option_key == option_key
    }
}

// custom error
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BasketError {
    #[error("Units must be at least 1.")]
    InvalidUnits,
    #[error("Units exceed the maximum of {} per line.", u32::MAX)]
    TooManyUnits,
}

/// Narrows a user-supplied count to a unit quantity.
pub fn units_from_count(count: i64) -> Result<u32, BasketError> {
    if count < 1 {
        return Err(BasketError::InvalidUnits);
    }
    u32::try_from(count).map_err(|_| BasketError::TooManyUnits)
}

/// Ordered line items; insertion order is display order.
///
/// Serialized as a bare JSON array so the stored value is exactly the list of
/// `{productId, optionKey, units}` records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Basket {
    items: Vec<LineItem>,
}

impl Basket {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_items(items: Vec<LineItem>) -> Self {
        Self { items }
    }

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Adds `units` to the entry for `(product_id, option_key)`, appending a
    /// new entry when there is none. The basket is left untouched on error.
    pub fn add_or_increment(
        &mut self,
        product_id: &str,
        option_key: &str,
        units: u32,
    ) -> Result<(), BasketError> {
        if units < 1 {
            return Err(BasketError::InvalidUnits);
        }

        match self.items.iter_mut().find(|i| i.matches(product_id, option_key)) {
            Some(existing) => {
                existing.units = existing
                    .units
                    .checked_add(units)
                    .ok_or(BasketError::TooManyUnits)?;
            }
            None => self.items.push(LineItem::new(product_id, option_key, units)),
        }
        Ok(())
    }

    /// Removes the entry at `index`. Returns the removed item, or `None` when
    /// the index is stale or out of range (no-op).
    pub fn remove_at(&mut self, index: usize) -> Option<LineItem> {
        if index < self.items.len() {
            Some(self.items.remove(index))
        } else {
            None
        }
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}
