pub mod basket_service;
pub mod basket_store;
pub mod checkout;
pub mod pricing;

pub use basket_service::*;
pub use basket_store::*;
pub use checkout::*;
pub use pricing::*;
