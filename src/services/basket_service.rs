use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

use crate::{
    models::{
        basket::{Basket, LineItem},
        catalog::Catalog,
        totals::Totals,
        view::BasketView,
    },
    services::{
        basket_store::{BasketStore, BasketStoreError},
        pricing::compute_totals,
    },
};

pub const ADDED_TO_BASKET: &str = "Added to basket!";

#[derive(Error, Debug)]
pub enum BasketServiceError {
    #[error("Unknown product '{product_id}'")]
    UnknownProduct { product_id: String },

    #[error("Product '{product_id}' has no option '{option_key}'")]
    UnknownOption {
        product_id: String,
        option_key: String,
    },

    #[error(transparent)]
    Store(#[from] BasketStoreError),
}

/// Catalog-aware basket operations used by the front-end.
pub struct BasketService {
    store: Arc<BasketStore>,
    catalog: Arc<Catalog>,
}

impl BasketService {
    pub fn new(store: Arc<BasketStore>, catalog: Arc<Catalog>) -> Self {
        Self { store, catalog }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Adds units of a product option. With no option given the product's
    /// first option is used, as a freshly shown product card would.
    pub fn add_item(
        &self,
        product_id: &str,
        option_key: Option<&str>,
        units: u32,
    ) -> Result<Basket, BasketServiceError> {
        let product = self.catalog.find_product(product_id).ok_or_else(|| {
            warn!("Rejected add of unknown product '{}'", product_id);
            BasketServiceError::UnknownProduct {
                product_id: product_id.to_string(),
            }
        })?;

        let option = match option_key {
            Some(key) => product.find_option(key),
            None => product.default_option(),
        }
        .ok_or_else(|| BasketServiceError::UnknownOption {
            product_id: product_id.to_string(),
            option_key: option_key.unwrap_or_default().to_string(),
        })?;

        Ok(self.store.add_or_increment(&product.id, &option.key, units)?)
    }

    pub fn remove_item(&self, index: usize) -> Result<Option<LineItem>, BasketServiceError> {
        let (_, removed) = self.store.remove_at(index)?;
        Ok(removed)
    }

    pub fn empty(&self) -> Result<(), BasketServiceError> {
        self.store.clear()?;
        info!("Basket emptied on request");
        Ok(())
    }

    pub fn view(&self) -> BasketView {
        BasketView::project(&self.store.load(), &self.catalog)
    }

    pub fn totals(&self) -> Totals {
        compute_totals(&self.store.load(), &self.catalog)
    }
}
