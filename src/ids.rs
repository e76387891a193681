//! Human-readable identifier generation.
//!
//! User IDs and order numbers share the `PREFIX-dddddd-YYYY` shape: a fixed
//! prefix, six random decimal digits and the current year. Generation is
//! behind a trait so services can check uniqueness and retry, and tests can
//! substitute a deterministic sequence.

use chrono::{Datelike, Utc};
use rand::Rng;

pub const USER_ID_PREFIX: &str = "USR";
pub const ORDER_NUMBER_PREFIX: &str = "ORD";

/// How many times a caller should regenerate before giving up on finding an
/// unused identifier.
pub const MAX_ID_ATTEMPTS: usize = 10;

pub trait IdGenerator: Send + Sync {
    /// Produces one candidate identifier. Uniqueness is the caller's
    /// responsibility (check-and-retry against the store).
    fn generate(&self, prefix: &str) -> String;
}

/// Production generator: thread-local RNG plus the system clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomIdGenerator;

impl IdGenerator for RandomIdGenerator {
    fn generate(&self, prefix: &str) -> String {
        let digits = rand::thread_rng().gen_range(100_000..1_000_000);
        format!("{}-{}-{}", prefix, digits, Utc::now().year())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_have_the_expected_shape() {
        let generator = RandomIdGenerator;
        let id = generator.generate(ORDER_NUMBER_PREFIX);

        let parts: Vec<&str> = id.split('-').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "ORD");
        assert_eq!(parts[1].len(), 6);
        assert!(parts[1].chars().all(|c| c.is_ascii_digit()));
        assert_eq!(parts[2], Utc::now().year().to_string());
    }

    struct FixedIdGenerator(&'static str);

    impl IdGenerator for FixedIdGenerator {
        fn generate(&self, prefix: &str) -> String {
            format!("{}-{}", prefix, self.0)
        }
    }

    #[test]
    fn generator_is_substitutable_behind_the_trait() {
        let generator: &dyn IdGenerator = &FixedIdGenerator("111111-2025");
        assert_eq!(generator.generate("ORD"), "ORD-111111-2025");
    }

    #[test]
    fn six_digit_segment_never_has_a_leading_zero_dropped() {
        let generator = RandomIdGenerator;
        for _ in 0..100 {
            let id = generator.generate(USER_ID_PREFIX);
            let digits = id.split('-').nth(1).unwrap();
            let value: u32 = digits.parse().unwrap();
            assert!((100_000..1_000_000).contains(&value));
        }
    }
}
