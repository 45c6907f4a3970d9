use std::sync::Arc;
use anyhow::Result;
use console::{style, Emoji};
use dialoguer::{theme::ColorfulTheme, Confirm};

use tracing::{error, info, warn};

use crate::{
    cli::args::*,
    models::{
        basket::units_from_count,
        catalog::Catalog,
        forms::{ContactForm, PaymentForm, YearMonth},
        totals::Totals,
        view::BasketView,
    },
    services::{
        BasketService, BasketServiceError, BasketStore, BasketStoreError, CheckoutOutcome,
        CheckoutSession, ConfirmationPrompt, FixedAnswer, ADDED_TO_BASKET,
    },
    storage::FileKeyValueStore,
    utils::{
        config::Config,
        formatting::{
            format_basket_summary, format_basket_table, format_catalog_table,
            format_checkout_summary, format_option_detail,
        },
        validation::{validate_contact, CONTACT_ACCEPTED},
    },
};

static CHECKMARK: Emoji<'_, '_> = Emoji("✅ ", "");
static CROSS: Emoji<'_, '_> = Emoji("❌ ", "");
static INFO: Emoji<'_, '_> = Emoji("ℹ️ ", "");
static CART: Emoji<'_, '_> = Emoji("🛒 ", "");

/// Asks on the terminal whether to accept the payment.
struct TerminalPrompt;

impl ConfirmationPrompt for TerminalPrompt {
    fn confirm(&self, totals: &Totals) -> anyhow::Result<bool> {
        println!("{}", format_checkout_summary(totals));
        let accepted = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt("Accept payment?")
            .default(false)
            .interact()?;
        Ok(accepted)
    }
}

pub struct CliApp {
    basket_service: Arc<BasketService>,
    store: Arc<BasketStore>,
    catalog: Arc<Catalog>,
}

impl CliApp {
    pub fn new(config: &Config) -> Self {
        let kv_store = Arc::new(FileKeyValueStore::new(&config.store_path));
        let store = Arc::new(BasketStore::with_key(kv_store, &config.storage_key));
        let catalog = Arc::new(Catalog::default_catalog());
        let basket_service = Arc::new(BasketService::new(store.clone(), catalog.clone()));

        Self {
            basket_service,
            store,
            catalog,
        }
    }

    pub fn run(&self, args: Args) -> Result<()> {
        match args.command {
            Commands::Catalog { command } => self.handle_catalog_command(command),
            Commands::Basket { command } => self.handle_basket_command(command),
            Commands::Contact { name, surname, comments } => {
                self.handle_contact(&name, &surname, &comments)
            }
            Commands::Checkout { method, name_on_card, exp_month, exp_year, cvv, yes } => {
                let form = PaymentForm {
                    method: method.map(Into::into),
                    name_on_card,
                    exp_month,
                    exp_year,
                    cvv,
                };
                self.handle_checkout(form, yes)
            }
        }
    }

    // Catalog Commands
    fn handle_catalog_command(&self, command: CatalogCommands) -> Result<()> {
        match command {
            CatalogCommands::List => {
                println!("{} {}", CART, style("Catalog").bold().cyan());
                println!("{}", format_catalog_table(&self.catalog));
            }
            CatalogCommands::Show { product, option } => {
                let Some(found) = self.catalog.find_product(&product) else {
                    println!("{} Unknown product '{}'", CROSS, style(&product).red());
                    return Ok(());
                };
                let selected = match option.as_deref() {
                    Some(key) => found.find_option(key),
                    None => found.default_option(),
                };
                match selected {
                    Some(selected) => print!("{}", format_option_detail(found, selected)),
                    None => println!(
                        "{} '{}' has no option '{}'",
                        CROSS,
                        found.name,
                        style(option.unwrap_or_default()).red()
                    ),
                }
            }
        }
        Ok(())
    }

    // Basket Commands
    fn handle_basket_command(&self, command: BasketCommands) -> Result<()> {
        match command {
            BasketCommands::Add { product, option, units } => {
                self.handle_add(&product, option.as_deref(), units)?
            }
            BasketCommands::Show => {}
            BasketCommands::Remove { index } => self.handle_remove(index)?,
            BasketCommands::Empty => {
                self.basket_service.empty()?;
                println!("{} Basket emptied", CHECKMARK);
            }
        }

        self.render_basket(self.basket_service.view());
        Ok(())
    }

    fn handle_add(&self, product: &str, option: Option<&str>, units: i64) -> Result<()> {
        let units = match units_from_count(units) {
            Ok(units) => units,
            Err(e) => {
                println!("{} {}", CROSS, style(e).red());
                return Ok(());
            }
        };

        match self.basket_service.add_item(product, option, units) {
            Ok(_) => {
                println!("{} {}", CHECKMARK, ADDED_TO_BASKET);
            }
            Err(BasketServiceError::Store(BasketStoreError::Basket(e))) => {
                println!("{} {}", CROSS, style(e).red());
            }
            Err(e @ (BasketServiceError::UnknownProduct { .. }
            | BasketServiceError::UnknownOption { .. })) => {
                println!("{} {}", CROSS, style(&e).red());
                warn!("Add to basket rejected: {}", e);
            }
            Err(e) => {
                error!("Failed to add to basket: {}", e);
                return Err(e.into());
            }
        }
        Ok(())
    }

    fn handle_remove(&self, index: usize) -> Result<()> {
        match self.basket_service.remove_item(index)? {
            Some(item) => {
                println!("{} Removed {} / {}", CHECKMARK, item.product_id, item.option_key);
            }
            None => {
                println!("{} No basket line at position {}", INFO, index);
            }
        }
        Ok(())
    }

    fn render_basket(&self, view: BasketView) {
        println!("{} {}", CART, style("Basket").bold().cyan());
        if view.is_empty() {
            println!("{} Your basket is empty", INFO);
        } else {
            println!("{}", format_basket_table(&view));
        }
        print!("{}", format_basket_summary(&view));
    }

    // Contact form
    fn handle_contact(&self, name: &str, surname: &str, comments: &str) -> Result<()> {
        let form = ContactForm::new(name, surname, comments);
        match validate_contact(&form) {
            Ok(()) => {
                println!("{} {}", CHECKMARK, CONTACT_ACCEPTED);
                info!("Contact form accepted");
            }
            Err(reason) => {
                println!("{} {}", CROSS, style(&reason).red());
            }
        }
        Ok(())
    }

    // Checkout
    fn handle_checkout(&self, form: PaymentForm, yes: bool) -> Result<()> {
        let mut session = CheckoutSession::new(self.store.clone(), self.catalog.clone());
        let now = YearMonth::current();

        let outcome = if yes {
            session.run(&form, now, &FixedAnswer(true))?
        } else {
            session.run(&form, now, &TerminalPrompt)?
        };

        match &outcome {
            CheckoutOutcome::Rejected(reason) => {
                println!("{} {}", CROSS, style(reason).red());
                return Ok(());
            }
            CheckoutOutcome::Confirmed(totals) | CheckoutOutcome::Withdrawn(totals) => {
                if yes {
                    println!("{}", format_checkout_summary(totals));
                }
            }
        }

        match &outcome {
            CheckoutOutcome::Confirmed(_) => println!("{} {}", CHECKMARK, outcome.message()),
            _ => println!("{} {}", INFO, outcome.message()),
        }

        let mut view = self.basket_service.view();
        if let Some(final_total) = outcome.final_total() {
            view = view.with_final_total(final_total);
        }
        self.render_basket(view);
        Ok(())
    }
}
