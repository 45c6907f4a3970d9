use clap::{Parser, Subcommand, ValueEnum};

use crate::models::forms::PaymentMethod as ModelPaymentMethod;

#[derive(Parser)]
#[command(name = "basket-cli")]
#[command(about = "A small shop: browse the catalog, fill a basket and check out")]
#[command(version = "0.1.0")]
pub struct Args {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Key/value store file path
    #[arg(short, long, global = true)]
    pub store: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Browse products and their options
    Catalog {
        #[command(subcommand)]
        command: CatalogCommands,
    },
    /// Basket management commands
    Basket {
        #[command(subcommand)]
        command: BasketCommands,
    },
    /// Send the contact form
    Contact {
        /// First name (letters only)
        #[arg(long, default_value = "")]
        name: String,
        /// Surname (letters only)
        #[arg(long, default_value = "")]
        surname: String,
        /// Message
        #[arg(long, default_value = "")]
        comments: String,
    },
    /// Pay for the basket
    Checkout {
        /// Payment method
        #[arg(short, long)]
        method: Option<PaymentMethod>,
        /// Name on card, given once per field (4 fields)
        #[arg(long = "card")]
        name_on_card: Vec<String>,
        /// Expiry month (1-12)
        #[arg(long)]
        exp_month: Option<u32>,
        /// Expiry year, e.g. 2027
        #[arg(long)]
        exp_year: Option<i32>,
        /// Card security code
        #[arg(long, default_value = "")]
        cvv: String,
        /// Accept the payment without prompting
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
pub enum CatalogCommands {
    /// List every product option with its price
    List,
    /// Show price and description of a product option
    Show {
        /// Product id
        product: String,
        /// Option key (defaults to the product's first option)
        #[arg(short, long)]
        option: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum BasketCommands {
    /// Add a product option to the basket
    Add {
        /// Product id
        product: String,
        /// Option key (defaults to the product's first option)
        #[arg(short, long)]
        option: Option<String>,
        /// Number of units
        #[arg(short, long, default_value_t = 1, allow_negative_numbers = true)]
        units: i64,
    },
    /// Show the basket
    Show,
    /// Remove the line at the position shown by `basket show`
    Remove {
        /// Line position
        index: usize,
    },
    /// Empty the basket
    Empty,
}

#[derive(Clone, ValueEnum)]
pub enum PaymentMethod {
    Card,
    Paypal,
    BankTransfer,
}

impl From<PaymentMethod> for ModelPaymentMethod {
    fn from(method: PaymentMethod) -> Self {
        match method {
            PaymentMethod::Card => ModelPaymentMethod::Card,
            PaymentMethod::Paypal => ModelPaymentMethod::Paypal,
            PaymentMethod::BankTransfer => ModelPaymentMethod::BankTransfer,
        }
    }
}
