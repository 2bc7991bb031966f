use std::collections::HashMap;

use crate::domain::card::{CardType, DeclineReason};

/// Sandbox numbers that always decline, with the reason they decline.
pub const SANDBOX_DECLINED: &[(&str, DeclineReason)] = &[
    ("4000000000000002", DeclineReason::InsufficientFunds),
    ("4000000000000119", DeclineReason::ProcessingError),
    ("4000000000009979", DeclineReason::StolenCard),
];

/// Sandbox numbers that succeed when presented with the right type and CVV.
pub const SANDBOX_ACCEPTED: &[(&str, CardType, &str)] = &[
    ("4111111111111111", CardType::Visa, "123"),
    ("5555555555554444", CardType::MasterCard, "123"),
    ("378282246310005", CardType::Amex, "1234"),
    ("6011111111111117", CardType::Discover, "123"),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TestCardOutcome {
    Decline(DeclineReason),
    Accept { card_type: CardType, cvv: String },
}

/// Fixed card numbers with predetermined outcomes, keyed by the normalized
/// number. Declines take precedence when a number is in both tables.
#[derive(Debug, Clone, Default)]
pub struct TestCardTable {
    declined: HashMap<String, DeclineReason>,
    accepted: HashMap<String, (CardType, String)>,
}

impl TestCardTable {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn sandbox() -> Self {
        let mut table = Self::empty();
        for &(number, reason) in SANDBOX_DECLINED {
            table = table.with_declined(number, reason);
        }
        for &(number, card_type, cvv) in SANDBOX_ACCEPTED {
            table = table.with_accepted(number, card_type, cvv);
        }
        table
    }

    #[must_use]
    pub fn with_declined(mut self, number: &str, reason: DeclineReason) -> Self {
        self.declined
            .insert(crate::domain::card::normalize_number(number), reason);
        self
    }

    #[must_use]
    pub fn with_accepted(mut self, number: &str, card_type: CardType, cvv: &str) -> Self {
        self.accepted.insert(
            crate::domain::card::normalize_number(number),
            (card_type, cvv.to_string()),
        );
        self
    }

    pub fn lookup(&self, normalized: &str) -> Option<TestCardOutcome> {
        if let Some(&reason) = self.declined.get(normalized) {
            return Some(TestCardOutcome::Decline(reason));
        }
        self.accepted
            .get(normalized)
            .map(|(card_type, cvv)| TestCardOutcome::Accept {
                card_type: *card_type,
                cvv: cvv.clone(),
            })
    }

    pub fn len(&self) -> usize {
        self.declined.len() + self.accepted.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::card::luhn_valid;

    #[test]
    fn sandbox_contents() {
        let table = TestCardTable::sandbox();
        assert_eq!(table.len(), SANDBOX_DECLINED.len() + SANDBOX_ACCEPTED.len());
        assert_eq!(
            table.lookup("4000000000000002"),
            Some(TestCardOutcome::Decline(DeclineReason::InsufficientFunds))
        );
        assert_eq!(
            table.lookup("378282246310005"),
            Some(TestCardOutcome::Accept {
                card_type: CardType::Amex,
                cvv: "1234".into()
            })
        );
        assert_eq!(table.lookup("4242424242424242"), None);
    }

    #[test]
    fn sandbox_numbers_pass_luhn() {
        for (number, _) in SANDBOX_DECLINED {
            assert!(luhn_valid(number), "{number}");
        }
        for (number, card_type, _) in SANDBOX_ACCEPTED {
            assert!(luhn_valid(number), "{number}");
            assert!(card_type.matches_prefix(number), "{number}");
        }
    }

    #[test]
    fn decline_wins_over_accept() {
        let table = TestCardTable::empty()
            .with_accepted("4242 4242 4242 4242", CardType::Visa, "123")
            .with_declined("4242424242424242", DeclineReason::StolenCard);
        assert_eq!(
            table.lookup("4242424242424242"),
            Some(TestCardOutcome::Decline(DeclineReason::StolenCard))
        );
    }

    #[test]
    fn empty_table() {
        let table = TestCardTable::empty();
        assert!(table.is_empty());
        assert!(table.lookup("4111111111111111").is_none());
    }
}
