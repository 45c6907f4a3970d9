use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::{
    models::basket::{Basket, BasketError, LineItem},
    storage::{KeyValueStore, StorageError},
};

pub const DEFAULT_BASKET_KEY: &str = "basket";

#[derive(Error, Debug)]
pub enum BasketStoreError {
    #[error(transparent)]
    Basket(#[from] BasketError),

    #[error("Failed to persist basket: {0}")]
    Storage(#[from] StorageError),
}

/// Reads and writes the basket under a single key of the injected store.
/// Every operation loads the full basket, mutates it and writes it back.
pub struct BasketStore {
    store: Arc<dyn KeyValueStore>,
    key: String,
}

impl BasketStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self::with_key(store, DEFAULT_BASKET_KEY)
    }

    pub fn with_key(store: Arc<dyn KeyValueStore>, key: &str) -> Self {
        Self {
            store,
            key: key.to_string(),
        }
    }

    /// Absent, unreadable or malformed content all yield an empty basket.
    pub fn load(&self) -> Basket {
        let raw = match self.store.get(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Basket::new(),
            Err(e) => {
                warn!("Could not read basket, starting empty: {}", e);
                return Basket::new();
            }
        };

        match serde_json::from_str::<Basket>(&raw) {
            Ok(basket) => {
                debug!("Loaded basket with {} entries", basket.len());
                basket
            }
            Err(e) => {
                warn!("Stored basket is malformed, treating as empty: {}", e);
                Basket::new()
            }
        }
    }

    pub fn save(&self, basket: &Basket) -> Result<(), BasketStoreError> {
        let raw = serde_json::to_string(basket).map_err(StorageError::from)?;
        self.store.set(&self.key, &raw)?;
        debug!("Saved basket with {} entries", basket.len());
        Ok(())
    }

    pub fn add_or_increment(
        &self,
        product_id: &str,
        option_key: &str,
        units: u32,
    ) -> Result<Basket, BasketStoreError> {
        let mut basket = self.load();
        basket.add_or_increment(product_id, option_key, units)?;
        self.save(&basket)?;

        info!("Added {} x {}/{} to basket", units, product_id, option_key);
        Ok(basket)
    }

    /// Removes the entry at `index` of the current stored order. A stale or
    /// out-of-range index leaves the basket as it is.
    pub fn remove_at(&self, index: usize) -> Result<(Basket, Option<LineItem>), BasketStoreError> {
        let mut basket = self.load();
        let removed = basket.remove_at(index);

        match &removed {
            Some(item) => {
                self.save(&basket)?;
                info!("Removed {}/{} from basket", item.product_id, item.option_key);
            }
            None => warn!(
                "Ignoring removal of index {} from basket of {} entries",
                index,
                basket.len()
            ),
        }

        Ok((basket, removed))
    }

    pub fn clear(&self) -> Result<(), BasketStoreError> {
        self.save(&Basket::new())?;
        info!("Basket cleared");
        Ok(())
    }
}
