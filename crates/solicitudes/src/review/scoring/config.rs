use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub const DEFAULT_REVIEW_THRESHOLD: u8 = 80;
pub const DEFAULT_HIGH_AMOUNT_THRESHOLD: i64 = 100_000;
pub const DEFAULT_EXPIRY_WARNING_DAYS: u32 = 30;

/// Tunable thresholds for the scorers. Risk tier boundaries are not configurable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Document scores below this ask for a new version of the file.
    pub review_threshold: u8,
    /// Requested amounts above this earn a lower solvency score.
    pub high_amount_threshold: Decimal,
    /// Documents expiring within this many days are reported as about to expire.
    pub expiry_warning_days: u32,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            review_threshold: DEFAULT_REVIEW_THRESHOLD,
            high_amount_threshold: Decimal::from(DEFAULT_HIGH_AMOUNT_THRESHOLD),
            expiry_warning_days: DEFAULT_EXPIRY_WARNING_DAYS,
        }
    }
}
