use serde::{Deserialize, Serialize};

use crate::domain::card::{CardType, CardValidationResult, DeclineReason, PaymentCard, normalize_number};

/// A payment form field that blocks submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormField {
    CardType,
    CardNumber,
    HolderName,
    Expiry,
    Cvv,
    Terms,
}

impl FormField {
    pub fn hint(self) -> &'static str {
        match self {
            Self::CardType => "select a card type",
            Self::CardNumber => "card number must be at least 15 digits, digits only",
            Self::HolderName => "cardholder name is required",
            Self::Expiry => "expiration date must be MM/YY",
            Self::Cvv => "CVV must have at least 3 digits",
            Self::Terms => "the terms and conditions must be accepted",
        }
    }
}

/// Raw payment form input, before any field is trusted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaymentForm {
    pub card_type: Option<CardType>,
    pub number: String,
    pub holder_name: String,
    pub expiry: String,
    pub cvv: String,
    pub terms_accepted: bool,
}

impl PaymentForm {
    pub fn missing_fields(&self) -> Vec<FormField> {
        let mut missing = Vec::new();
        if self.card_type.is_none() {
            missing.push(FormField::CardType);
        }
        let number = normalize_number(&self.number);
        if number.len() < 15 || !number.bytes().all(|b| b.is_ascii_digit()) {
            missing.push(FormField::CardNumber);
        }
        if self.holder_name.trim().is_empty() {
            missing.push(FormField::HolderName);
        }
        if self.expiry.trim().chars().count() != 5 {
            missing.push(FormField::Expiry);
        }
        if self.cvv.trim().chars().count() < 3 {
            missing.push(FormField::Cvv);
        }
        if !self.terms_accepted {
            missing.push(FormField::Terms);
        }
        missing
    }

    /// Turn a complete form into a card ready for the gateway. An incomplete
    /// form never reaches the gateway.
    pub fn into_card(self) -> Result<PaymentCard, IncompleteForm> {
        let missing = self.missing_fields();
        match self.card_type {
            Some(declared_type) if missing.is_empty() => Ok(PaymentCard {
                number: self.number,
                holder_name: self.holder_name.trim().to_string(),
                expiry: self.expiry.trim().to_string(),
                cvv: self.cvv.trim().to_string(),
                declared_type,
            }),
            _ => Err(IncompleteForm { missing }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncompleteForm {
    pub missing: Vec<FormField>,
}

impl IncompleteForm {
    pub fn result(&self) -> CardValidationResult {
        CardValidationResult::declined(DeclineReason::IncompleteForm)
    }
}

impl std::fmt::Display for IncompleteForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", DeclineReason::IncompleteForm.message())?;
        for field in &self.missing {
            write!(f, "\n- {}", field.hint())?;
        }
        Ok(())
    }
}
