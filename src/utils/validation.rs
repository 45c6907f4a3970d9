use thiserror::Error;
use validator::Validate;

use crate::models::{
    basket::Basket,
    forms::{
        ContactForm, PaymentForm, YearMonth, CVV_REGEX, NAME_ON_CARD_FIELDS, NAME_ON_CARD_MAX_LEN,
    },
};

pub const CONTACT_ACCEPTED: &str = "Message sent. Thank you!";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ContactRejection {
    #[error("Please fill all contact fields.")]
    MissingField,
    #[error("Name and Surname must contain only letters (A-Z).")]
    InvalidCharacters,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PaymentRejection {
    #[error("Select a payment method.")]
    MissingMethod,
    #[error("Fill all 4 'Name on Card' fields.")]
    MissingNameOnCard,
    #[error("Each 'Name on Card' field must be max 15 characters.")]
    NameOnCardTooLong,
    #[error("Select expire month and year.")]
    MissingExpiry,
    #[error("Application withdrawn: Card is expired.")]
    CardExpired,
    #[error("CVV must be exactly 3 digits.")]
    InvalidCvv,
    #[error("Your basket is empty.")]
    EmptyBasket,
}

/// Checks the contact form. Missing fields take precedence over bad
/// characters. Touches no stored state.
pub fn validate_contact(form: &ContactForm) -> Result<(), ContactRejection> {
    let errors = match form.validate() {
        Ok(()) => return Ok(()),
        Err(errors) => errors,
    };

    let missing = errors
        .field_errors()
        .values()
        .flat_map(|errs| errs.iter())
        .any(|e| e.code == "length");

    if missing {
        Err(ContactRejection::MissingField)
    } else {
        Err(ContactRejection::InvalidCharacters)
    }
}

/// Checks the payment form in a fixed order; the first failing rule wins.
/// The basket is only inspected once every form field has passed.
pub fn validate_payment(
    form: &PaymentForm,
    basket: &Basket,
    now: YearMonth,
) -> Result<(), PaymentRejection> {
    if form.method.is_none() {
        return Err(PaymentRejection::MissingMethod);
    }

    check_name_on_card(&form.name_on_card)?;

    let expiry = match (form.exp_month, form.exp_year) {
        (Some(month), Some(year)) if month > 0 && year > 0 => YearMonth::new(year, month),
        _ => return Err(PaymentRejection::MissingExpiry),
    };
    if expiry < now {
        return Err(PaymentRejection::CardExpired);
    }

    if !CVV_REGEX.is_match(form.cvv.trim()) {
        return Err(PaymentRejection::InvalidCvv);
    }

    if basket.is_empty() {
        return Err(PaymentRejection::EmptyBasket);
    }

    Ok(())
}

fn check_name_on_card(fields: &[String]) -> Result<(), PaymentRejection> {
    let trimmed: Vec<&str> = fields.iter().map(|f| f.trim()).collect();

    if trimmed.len() != NAME_ON_CARD_FIELDS || trimmed.iter().any(|f| f.is_empty()) {
        return Err(PaymentRejection::MissingNameOnCard);
    }
    if trimmed.iter().any(|f| f.chars().count() > NAME_ON_CARD_MAX_LEN) {
        return Err(PaymentRejection::NameOnCardTooLong);
    }
    Ok(())
}
