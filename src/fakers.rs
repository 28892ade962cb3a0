// 🎲 Fake Data - plausible payloads for seeded users and operations

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::gateway::schema::{CreateUserRequest, OperationStatus};

const FIRST_NAMES: &[&str] = &[
    "Alice", "Boris", "Carmen", "Dmitri", "Elena", "Farid", "Grace", "Hugo", "Irina", "Jonas",
];

const LAST_NAMES: &[&str] = &[
    "Andersen", "Bauer", "Castillo", "Dubois", "Evans", "Fischer", "Garcia", "Hansen",
    "Ivanova", "Jensen",
];

const MIDDLE_NAMES: &[&str] = &["Lee", "Marie", "Noel", "Olav", "Paul", "Rose", "Sage", "Theo"];

/// Purchase categories the gateway accepts
pub const CATEGORIES: &[&str] = &[
    "gas",
    "taxi",
    "tolls",
    "water",
    "beauty",
    "mobile",
    "travel",
    "clothing",
    "supermarkets",
    "restaurants",
    "electricity",
    "entertainment",
];

/// Random value source for fixture payloads
pub struct Fake {
    rng: StdRng,
}

impl Fake {
    pub fn new() -> Self {
        Fake {
            rng: StdRng::from_entropy(),
        }
    }

    /// Deterministic generator (same seed, same sequence)
    pub fn seeded(seed: u64) -> Self {
        Fake {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Unique email: the UUID part keeps repeated builds collision-free
    pub fn email(&mut self) -> String {
        format!("user.{}@example.com", uuid::Uuid::new_v4().simple())
    }

    pub fn first_name(&mut self) -> String {
        pick(&mut self.rng, FIRST_NAMES)
    }

    pub fn last_name(&mut self) -> String {
        pick(&mut self.rng, LAST_NAMES)
    }

    pub fn middle_name(&mut self) -> String {
        pick(&mut self.rng, MIDDLE_NAMES)
    }

    pub fn phone_number(&mut self) -> String {
        format!("+1{:010}", self.rng.gen_range(2_000_000_000u64..9_999_999_999))
    }

    /// Amount in [1.00, 1000.00] with two decimals
    pub fn amount(&mut self) -> f64 {
        let cents: u32 = self.rng.gen_range(100..=100_000);
        cents as f64 / 100.0
    }

    pub fn category(&mut self) -> String {
        pick(&mut self.rng, CATEGORIES)
    }

    pub fn operation_status(&mut self) -> OperationStatus {
        *OperationStatus::ALL
            .choose(&mut self.rng)
            .unwrap_or(&OperationStatus::Completed)
    }

    /// 16 digits, grouped as printed on a card
    pub fn card_number(&mut self) -> String {
        (0..4)
            .map(|_| format!("{:04}", self.rng.gen_range(0..10_000)))
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn digits(&mut self, len: usize) -> String {
        (0..len)
            .map(|_| char::from(b'0' + self.rng.gen_range(0..10u8)))
            .collect()
    }

    pub fn index(&mut self, len: usize) -> usize {
        self.rng.gen_range(0..len)
    }

    pub fn create_user_request(&mut self) -> CreateUserRequest {
        CreateUserRequest {
            email: self.email(),
            last_name: self.last_name(),
            first_name: self.first_name(),
            middle_name: self.middle_name(),
            phone_number: self.phone_number(),
        }
    }
}

impl Default for Fake {
    fn default() -> Self {
        Self::new()
    }
}

fn pick(rng: &mut StdRng, values: &[&str]) -> String {
    values.choose(rng).copied().unwrap_or_default().to_string()
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_amount_range_and_precision() {
        let mut fake = Fake::seeded(7);
        for _ in 0..500 {
            let amount = fake.amount();
            assert!((1.0..=1000.0).contains(&amount));
            let cents = amount * 100.0;
            assert!((cents - cents.round()).abs() < 1e-6);
        }
    }

    #[test]
    fn test_emails_are_unique() {
        let mut fake = Fake::seeded(1);
        let a = fake.email();
        let b = fake.email();
        assert_ne!(a, b);
        assert!(a.ends_with("@example.com"));
    }

    #[test]
    fn test_seeded_generators_repeat() {
        let mut a = Fake::seeded(42);
        let mut b = Fake::seeded(42);
        assert_eq!(a.first_name(), b.first_name());
        assert_eq!(a.amount(), b.amount());
        assert_eq!(a.category(), b.category());
    }

    #[test]
    fn test_card_number_shape() {
        let mut fake = Fake::seeded(3);
        let number = fake.card_number();
        assert_eq!(number.len(), 19);
        assert_eq!(number.split(' ').count(), 4);
        assert_eq!(fake.digits(3).len(), 3);
    }

    #[test]
    fn test_category_from_list() {
        let mut fake = Fake::seeded(9);
        let category = fake.category();
        assert!(CATEGORIES.contains(&category.as_str()));
    }
}
