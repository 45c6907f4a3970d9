use chrono::{Datelike, NaiveDate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use validator::Validate;

lazy_static::lazy_static! {
    pub static ref LETTERS_REGEX: Regex = Regex::new(r"^[A-Za-z]+$").unwrap();
    pub static ref CVV_REGEX: Regex = Regex::new(r"^[0-9]{3}$").unwrap();
}

pub const NAME_ON_CARD_FIELDS: usize = 4;
pub const NAME_ON_CARD_MAX_LEN: usize = 15;

/// Contact form input. Fields are trimmed on construction.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct ContactForm {
    #[validate(length(min = 1, message = "Name is required"))]
    #[validate(regex(path = "LETTERS_REGEX", message = "Name must contain only letters"))]
    pub name: String,

    #[validate(length(min = 1, message = "Surname is required"))]
    #[validate(regex(path = "LETTERS_REGEX", message = "Surname must contain only letters"))]
    pub surname: String,

    #[validate(length(min = 1, message = "Comments are required"))]
    pub comments: String,
}

impl ContactForm {
    pub fn new(name: &str, surname: &str, comments: &str) -> Self {
        Self {
            name: name.trim().to_string(),
            surname: surname.trim().to_string(),
            comments: comments.trim().to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PaymentMethod {
    Card,
    Paypal,
    BankTransfer,
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaymentMethod::Card => write!(f, "card"),
            PaymentMethod::Paypal => write!(f, "paypal"),
            PaymentMethod::BankTransfer => write!(f, "bank transfer"),
        }
    }
}

/// Raw payment form as submitted. Missing selections are `None`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PaymentForm {
    pub method: Option<PaymentMethod>,
    pub name_on_card: Vec<String>,
    pub exp_month: Option<u32>,
    pub exp_year: Option<i32>,
    pub cvv: String,
}

impl PaymentForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn method(mut self, method: PaymentMethod) -> Self {
        self.method = Some(method);
        self
    }

    pub fn name_on_card<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.name_on_card = fields.into_iter().map(Into::into).collect();
        self
    }

    pub fn expiry(mut self, month: u32, year: i32) -> Self {
        self.exp_month = Some(month);
        self.exp_year = Some(year);
        self
    }

    pub fn cvv(mut self, cvv: &str) -> Self {
        self.cvv = cvv.to_string();
        self
    }
}

/// Calendar month used as "now" for card expiry checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Self {
        Self { year, month }
    }

    pub fn current() -> Self {
        Self::from_date(chrono::Local::now().date_naive())
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self::new(date.year(), date.month())
    }

    pub fn previous(self) -> Self {
        if self.month <= 1 {
            Self::new(self.year - 1, 12)
        } else {
            Self::new(self.year, self.month - 1)
        }
    }
}
