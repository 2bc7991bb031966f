use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::domain::test_cards::{TestCardOutcome, TestCardTable};

/// Card networks the payment form offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, schemars::JsonSchema)]
pub enum CardType {
    Visa,
    MasterCard,
    Amex,
    Discover,
}

impl CardType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Visa => "Visa",
            Self::MasterCard => "MasterCard",
            Self::Amex => "Amex",
            Self::Discover => "Discover",
        }
    }

    /// Whether a normalized card number starts with one of this network's
    /// issuer prefixes.
    pub fn matches_prefix(self, number: &str) -> bool {
        let two = leading(number, 2);
        let three = leading(number, 3);
        match self {
            Self::Visa => number.starts_with('4'),
            Self::MasterCard => two.is_some_and(|p| (51..=55).contains(&p) || (22..=27).contains(&p)),
            Self::Amex => two.is_some_and(|p| p == 34 || p == 37),
            Self::Discover => {
                number.starts_with("6011")
                    || two == Some(65)
                    || three.is_some_and(|p| (644..=649).contains(&p))
            }
        }
    }
}

fn leading(number: &str, len: usize) -> Option<u32> {
    number.get(..len)?.parse().ok()
}

impl std::str::FromStr for CardType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace(' ', "").as_str() {
            "visa" => Ok(Self::Visa),
            "mastercard" => Ok(Self::MasterCard),
            "amex" | "americanexpress" => Ok(Self::Amex),
            "discover" => Ok(Self::Discover),
            other => Err(format!("unsupported card type '{other}'")),
        }
    }
}

impl std::fmt::Display for CardType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeclineReason {
    Expired,
    InvalidExpiry,
    InsufficientFunds,
    ProcessingError,
    StolenCard,
    CvvIncorrect,
    TypeMismatch,
    InvalidNumber,
    NumberTypeMismatch,
    IncompleteForm,
}

impl DeclineReason {
    pub fn message(self) -> &'static str {
        match self {
            Self::Expired => "Card expired",
            Self::InvalidExpiry => "Invalid expiration date, expected MM/YY",
            Self::InsufficientFunds => "Insufficient funds",
            Self::ProcessingError => "Processing error, please try again",
            Self::StolenCard => "Card reported as stolen",
            Self::CvvIncorrect => "CVV incorrect",
            Self::TypeMismatch => "Card type does not match this card",
            Self::InvalidNumber => "Invalid card number",
            Self::NumberTypeMismatch => "Card number does not match the selected card type",
            Self::IncompleteForm => "Please complete every payment field and accept the terms",
        }
    }
}

impl std::fmt::Display for DeclineReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardValidationResult {
    pub valid: bool,
    pub reason: Option<DeclineReason>,
}

impl CardValidationResult {
    pub fn accepted() -> Self {
        Self {
            valid: true,
            reason: None,
        }
    }

    pub fn declined(reason: DeclineReason) -> Self {
        Self {
            valid: false,
            reason: Some(reason),
        }
    }

    pub fn message(&self) -> &'static str {
        self.reason.map_or("Payment accepted", DeclineReason::message)
    }
}

/// Card details for a single submission. Never persisted; `Debug` masks the
/// number and hides the CVV so it is safe in log lines.
#[derive(Clone, PartialEq, Eq)]
pub struct PaymentCard {
    pub number: String,
    pub holder_name: String,
    pub expiry: String,
    pub cvv: String,
    pub declared_type: CardType,
}

impl PaymentCard {
    pub fn normalized_number(&self) -> String {
        normalize_number(&self.number)
    }

    /// Last four characters of the normalized number. Counts characters,
    /// not bytes, so arbitrary user input is safe to mask.
    pub fn last_four(&self) -> String {
        let chars: Vec<char> = self.normalized_number().chars().collect();
        chars[chars.len().saturating_sub(4)..].iter().collect()
    }
}

impl std::fmt::Debug for PaymentCard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaymentCard")
            .field("number", &format_args!("****{}", self.last_four()))
            .field("holder_name", &self.holder_name)
            .field("expiry", &self.expiry)
            .field("cvv", &"***")
            .field("declared_type", &self.declared_type)
            .finish()
    }
}

/// Strip the separators people type into card numbers.
pub fn normalize_number(number: &str) -> String {
    number
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .collect()
}

/// Mod-10 checksum. Anything that is not a non-empty digit string fails.
pub fn luhn_valid(number: &str) -> bool {
    if number.is_empty() {
        return false;
    }
    let mut sum = 0;
    for (i, c) in number.chars().rev().enumerate() {
        let Some(mut d) = c.to_digit(10) else {
            return false;
        };
        if i % 2 == 1 {
            d *= 2;
            if d > 9 {
                d -= 9;
            }
        }
        sum += d;
    }
    sum % 10 == 0
}

/// Card expiration month, as printed `MM/YY`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Expiry {
    pub year: i32,
    pub month: u32,
}

impl Expiry {
    pub fn parse(value: &str) -> Option<Self> {
        let (mm, yy) = value.split_once('/')?;
        if mm.len() != 2 || yy.len() != 2 {
            return None;
        }
        if !mm.bytes().chain(yy.bytes()).all(|b| b.is_ascii_digit()) {
            return None;
        }
        let month: u32 = mm.parse().ok()?;
        let year: i32 = yy.parse().ok()?;
        if !(1..=12).contains(&month) {
            return None;
        }
        Some(Self {
            year: 2000 + year,
            month,
        })
    }

    /// Cards stay valid through the whole printed month.
    pub fn is_expired_on(self, today: NaiveDate) -> bool {
        (self.year, self.month) < (today.year(), today.month())
    }
}

/// Local card check standing in for a payment processor.
#[derive(Debug, Clone)]
pub struct CardValidator {
    table: TestCardTable,
}

impl Default for CardValidator {
    fn default() -> Self {
        Self::new(TestCardTable::sandbox())
    }
}

impl CardValidator {
    pub fn new(table: TestCardTable) -> Self {
        Self { table }
    }

    /// Checks run in order and the first failure wins: expiry, the test-card
    /// tables, the Luhn checksum, then the issuer prefix.
    pub fn validate(&self, card: &PaymentCard, today: NaiveDate) -> CardValidationResult {
        let Some(expiry) = Expiry::parse(card.expiry.trim()) else {
            return CardValidationResult::declined(DeclineReason::InvalidExpiry);
        };
        if expiry.is_expired_on(today) {
            return CardValidationResult::declined(DeclineReason::Expired);
        }

        let number = card.normalized_number();
        match self.table.lookup(&number) {
            Some(TestCardOutcome::Decline(reason)) => {
                return CardValidationResult::declined(reason);
            }
            Some(TestCardOutcome::Accept { card_type, cvv }) => {
                if card.declared_type != card_type {
                    return CardValidationResult::declined(DeclineReason::TypeMismatch);
                }
                if card.cvv.trim() != cvv {
                    return CardValidationResult::declined(DeclineReason::CvvIncorrect);
                }
                return CardValidationResult::accepted();
            }
            None => {}
        }

        if !luhn_valid(&number) {
            return CardValidationResult::declined(DeclineReason::InvalidNumber);
        }
        if !card.declared_type.matches_prefix(&number) {
            return CardValidationResult::declined(DeclineReason::NumberTypeMismatch);
        }
        CardValidationResult::accepted()
    }
}
