use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::{
    models::{catalog::Catalog, forms::{PaymentForm, YearMonth}, totals::Totals},
    services::{
        basket_store::{BasketStore, BasketStoreError},
        pricing::compute_totals,
    },
    utils::validation::{validate_payment, PaymentRejection},
};

pub const PURCHASE_CONFIRMED: &str = "Thank you for your purchase!";
pub const PURCHASE_WITHDRAWN: &str = "Application withdrawn.";

/// Accept/decline decision for the totals shown at checkout.
pub trait ConfirmationPrompt {
    fn confirm(&self, totals: &Totals) -> anyhow::Result<bool>;
}

/// Always answers the same way; used for non-interactive runs and tests.
pub struct FixedAnswer(pub bool);

impl ConfirmationPrompt for FixedAnswer {
    fn confirm(&self, _totals: &Totals) -> anyhow::Result<bool> {
        Ok(self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CheckoutState {
    Idle,
    AwaitingPaymentValidation,
    Rejected(PaymentRejection),
    TotalsDisplayed(Totals),
    Confirmed(Totals),
    Withdrawn(Totals),
}

impl CheckoutState {
    fn name(&self) -> &'static str {
        match self {
            CheckoutState::Idle => "idle",
            CheckoutState::AwaitingPaymentValidation => "awaiting payment validation",
            CheckoutState::Rejected(_) => "rejected",
            CheckoutState::TotalsDisplayed(_) => "totals displayed",
            CheckoutState::Confirmed(_) => "confirmed",
            CheckoutState::Withdrawn(_) => "withdrawn",
        }
    }
}

/// Where a finished checkout ended up. The session is back in `Idle` for all
/// three.
#[derive(Debug, Clone, PartialEq)]
pub enum CheckoutOutcome {
    Rejected(PaymentRejection),
    Confirmed(Totals),
    Withdrawn(Totals),
}

impl CheckoutOutcome {
    pub fn message(&self) -> String {
        match self {
            CheckoutOutcome::Rejected(reason) => reason.to_string(),
            CheckoutOutcome::Confirmed(_) => PURCHASE_CONFIRMED.to_string(),
            CheckoutOutcome::Withdrawn(_) => PURCHASE_WITHDRAWN.to_string(),
        }
    }

    /// Final total left on display after the checkout. A confirmed purchase
    /// empties the basket, which resets the display to the placeholder.
    pub fn final_total(&self) -> Option<f64> {
        match self {
            CheckoutOutcome::Withdrawn(t) => Some(t.final_total),
            CheckoutOutcome::Rejected(_) | CheckoutOutcome::Confirmed(_) => None,
        }
    }
}

#[derive(Error, Debug)]
pub enum CheckoutError {
    #[error("Cannot {action} while checkout is {state}")]
    InvalidTransition {
        action: &'static str,
        state: &'static str,
    },

    #[error(transparent)]
    Prompt(#[from] anyhow::Error),

    #[error(transparent)]
    Store(#[from] BasketStoreError),
}

/// Drives one checkout at a time through validation, totals display and the
/// accept/decline decision.
pub struct CheckoutSession {
    store: Arc<BasketStore>,
    catalog: Arc<Catalog>,
    state: CheckoutState,
}

impl CheckoutSession {
    pub fn new(store: Arc<BasketStore>, catalog: Arc<Catalog>) -> Self {
        Self {
            store,
            catalog,
            state: CheckoutState::Idle,
        }
    }

    pub fn state(&self) -> &CheckoutState {
        &self.state
    }

    fn invalid(&self, action: &'static str) -> CheckoutError {
        CheckoutError::InvalidTransition {
            action,
            state: self.state.name(),
        }
    }

    /// Idle -> AwaitingPaymentValidation -> Rejected | TotalsDisplayed.
    /// A rejection drops straight back to Idle without computing totals.
    pub fn submit(
        &mut self,
        form: &PaymentForm,
        now: YearMonth,
    ) -> Result<CheckoutState, CheckoutError> {
        if self.state != CheckoutState::Idle {
            return Err(self.invalid("submit a payment form"));
        }
        self.state = CheckoutState::AwaitingPaymentValidation;

        let basket = self.store.load();
        if let Err(reason) = validate_payment(form, &basket, now) {
            warn!("Payment form rejected: {}", reason);
            self.state = CheckoutState::Idle;
            return Ok(CheckoutState::Rejected(reason));
        }

        let totals = compute_totals(&basket, &self.catalog);
        debug!("Checkout totals: {:?}", totals);
        self.state = CheckoutState::TotalsDisplayed(totals);
        Ok(self.state.clone())
    }

    /// TotalsDisplayed -> Confirmed: clears the basket and returns to Idle.
    pub fn confirm(&mut self) -> Result<CheckoutState, CheckoutError> {
        let CheckoutState::TotalsDisplayed(totals) = self.state else {
            return Err(self.invalid("confirm"));
        };

        if let Err(e) = self.store.clear() {
            self.state = CheckoutState::Idle;
            return Err(e.into());
        }
        self.state = CheckoutState::Idle;
        info!("Purchase confirmed, final total {:.2}", totals.final_total);
        Ok(CheckoutState::Confirmed(totals))
    }

    /// TotalsDisplayed -> Withdrawn: returns to Idle, basket untouched.
    pub fn withdraw(&mut self) -> Result<CheckoutState, CheckoutError> {
        let CheckoutState::TotalsDisplayed(totals) = self.state else {
            return Err(self.invalid("withdraw"));
        };

        self.state = CheckoutState::Idle;
        info!("Purchase withdrawn");
        Ok(CheckoutState::Withdrawn(totals))
    }

    /// Runs a whole checkout, asking `prompt` once totals are known.
    pub fn run(
        &mut self,
        form: &PaymentForm,
        now: YearMonth,
        prompt: &dyn ConfirmationPrompt,
    ) -> Result<CheckoutOutcome, CheckoutError> {
        let totals = match self.submit(form, now)? {
            CheckoutState::Rejected(reason) => return Ok(CheckoutOutcome::Rejected(reason)),
            CheckoutState::TotalsDisplayed(totals) => totals,
            _ => return Err(self.invalid("display totals")),
        };

        let accepted = match prompt.confirm(&totals) {
            Ok(accepted) => accepted,
            Err(e) => {
                self.state = CheckoutState::Idle;
                return Err(CheckoutError::Prompt(e));
            }
        };

        let outcome = if accepted { self.confirm()? } else { self.withdraw()? };
        match outcome {
            CheckoutState::Confirmed(t) => Ok(CheckoutOutcome::Confirmed(t)),
            CheckoutState::Withdrawn(t) => Ok(CheckoutOutcome::Withdrawn(t)),
            _ => Err(self.invalid("finish")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::forms::PaymentMethod,
        storage::{KeyValueStore, MemoryKeyValueStore, StorageError},
    };

    /// Serves a fixed basket but refuses every write.
    struct ReadOnlyStore;

    impl KeyValueStore for ReadOnlyStore {
        fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Ok(Some(r#"[{"productId":"phone","optionKey":"64","units":1}]"#.to_string()))
        }

        fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Poisoned)
        }
    }

    const NOW: YearMonth = YearMonth { year: 2026, month: 10 };

    fn session() -> (CheckoutSession, Arc<BasketStore>) {
        let store = Arc::new(BasketStore::new(Arc::new(MemoryKeyValueStore::new())));
        let catalog = Arc::new(Catalog::default_catalog());
        (CheckoutSession::new(store.clone(), catalog), store)
    }

    fn valid_form() -> PaymentForm {
        PaymentForm::new()
            .method(PaymentMethod::Paypal)
            .name_on_card(["JANE", "Q", "PUBLIC", "SR"])
            .expiry(1, 2030)
            .cvv("999")
    }

    #[test]
    fn test_rejection_returns_to_idle() {
        let (mut session, _) = session();

        let state = session.submit(&valid_form(), NOW).unwrap();
        assert_eq!(state, CheckoutState::Rejected(PaymentRejection::EmptyBasket));
        assert_eq!(session.state(), &CheckoutState::Idle);
    }

    #[test]
    fn test_confirm_clears_basket() {
        let (mut session, store) = session();
        store.add_or_increment("headphones", "bt", 2).unwrap();

        let state = session.submit(&valid_form(), NOW).unwrap();
        assert!(matches!(state, CheckoutState::TotalsDisplayed(t) if t.items == 2));

        let state = session.confirm().unwrap();
        assert!(matches!(state, CheckoutState::Confirmed(_)));
        assert_eq!(session.state(), &CheckoutState::Idle);
        assert!(store.load().is_empty());
    }

    #[test]
    fn test_withdraw_keeps_basket() {
        let (mut session, store) = session();
        store.add_or_increment("phone", "256", 1).unwrap();

        let outcome = session.run(&valid_form(), NOW, &FixedAnswer(false)).unwrap();
        assert_eq!(outcome.message(), PURCHASE_WITHDRAWN);
        let final_total = outcome.final_total().unwrap();
        assert!((final_total - 990.0).abs() < 1e-9);
        assert_eq!(store.load().len(), 1);
        assert_eq!(session.state(), &CheckoutState::Idle);
    }

    #[test]
    fn test_confirm_without_totals_is_invalid() {
        let (mut session, _) = session();

        assert!(matches!(
            session.confirm(),
            Err(CheckoutError::InvalidTransition { action: "confirm", state: "idle" })
        ));
        assert!(session.withdraw().is_err());
    }

    #[test]
    fn test_submit_twice_is_invalid() {
        let (mut session, store) = session();
        store.add_or_increment("phone", "64", 1).unwrap();

        session.submit(&valid_form(), NOW).unwrap();
        assert!(matches!(
            session.submit(&valid_form(), NOW),
            Err(CheckoutError::InvalidTransition { .. })
        ));
    }

    #[test]
    fn test_failed_clear_returns_to_idle() {
        let store = Arc::new(BasketStore::new(Arc::new(ReadOnlyStore)));
        let mut session = CheckoutSession::new(store, Arc::new(Catalog::default_catalog()));

        let result = session.run(&valid_form(), NOW, &FixedAnswer(true));
        assert!(matches!(result, Err(CheckoutError::Store(_))));
        assert_eq!(session.state(), &CheckoutState::Idle);

        let state = session.submit(&valid_form(), NOW).unwrap();
        assert!(matches!(state, CheckoutState::TotalsDisplayed(_)));
    }

    #[test]
    fn test_final_total_only_kept_after_withdrawal() {
        let totals = Totals {
            items: 1,
            subtotal: 600.0,
            delivery: 60.0,
            final_total: 660.0,
        };

        assert_eq!(CheckoutOutcome::Confirmed(totals).final_total(), None);
        assert_eq!(CheckoutOutcome::Withdrawn(totals).final_total(), Some(660.0));
        assert_eq!(
            CheckoutOutcome::Rejected(PaymentRejection::EmptyBasket).final_total(),
            None
        );
    }
}
