pub mod basket;
pub mod catalog;
pub mod forms;
pub mod totals;
pub mod view;

pub use basket::*;
pub use catalog::*;
pub use forms::*;
pub use totals::*;
pub use view::*;
