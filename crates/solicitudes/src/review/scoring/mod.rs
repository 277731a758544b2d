//! Check-based scoring shared by the document quality and application completeness scorers,
//! plus the advisory approval-support scorer.
//!
//! Each scorer evaluates a fixed set of named boolean checks against one record, reduces them
//! to a 0-100 score and maps the score onto a [`RiskTier`].

mod applications;
mod approval;
mod config;
mod documents;

pub use applications::{application_checks, ApplicationCheck, ApplicationScorer};
pub use approval::{
    ApprovalCriteria, ApprovalSupport, ApprovalSupportScorer, Recommendation,
    HUMAN_DECISION_NOTICE,
};
pub use config::ScoringConfig;
pub use documents::{document_checks, DocumentCheck, DocumentQualityScorer};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Risk band derived from a completeness or quality score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskTier {
    Bajo,
    Medio,
    Alto,
    Critico,
}

impl RiskTier {
    /// Lower bounds are inclusive: 90 is `bajo`, 89 is `medio`.
    pub const fn from_score(score: u8) -> Self {
        match score {
            90..=u8::MAX => RiskTier::Bajo,
            70..=89 => RiskTier::Medio,
            50..=69 => RiskTier::Alto,
            _ => RiskTier::Critico,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            RiskTier::Bajo => "bajo",
            RiskTier::Medio => "medio",
            RiskTier::Alto => "alto",
            RiskTier::Critico => "critico",
        }
    }

    pub const fn requires_manual_review(self) -> bool {
        matches!(self, RiskTier::Alto | RiskTier::Critico)
    }
}

/// A named boolean check with the messages shown when it fails.
pub trait Check: Copy {
    fn label(self) -> &'static str;
    fn problem(self) -> &'static str;
    fn recommendation(self) -> Option<&'static str>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckOutcome<C> {
    pub check: C,
    pub passed: bool,
}

impl<C> CheckOutcome<C> {
    pub fn new(check: C, passed: bool) -> Self {
        Self { check, passed }
    }
}

/// Scoring snapshot for a single record. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult<C> {
    pub record_id: i64,
    pub checks: Vec<CheckOutcome<C>>,
    pub score: u8,
    pub nivel_riesgo: RiskTier,
    pub problemas: Vec<String>,
    pub recomendaciones: Vec<String>,
    pub requiere_revision_manual: bool,
    pub evaluado_en: DateTime<Utc>,
}

impl<C: Check> ValidationResult<C> {
    pub fn passed(&self, check: C) -> Option<bool>
    where
        C: PartialEq,
    {
        self.checks
            .iter()
            .find(|outcome| outcome.check == check)
            .map(|outcome| outcome.passed)
    }

    pub fn failed_checks(&self) -> impl Iterator<Item = C> + '_ {
        self.checks
            .iter()
            .filter(|outcome| !outcome.passed)
            .map(|outcome| outcome.check)
    }
}

/// `round(100 * part / whole)` with halves rounded up; zero when `whole` is zero.
pub fn rounded_percentage(part: usize, whole: usize) -> u8 {
    if whole == 0 {
        return 0;
    }
    let part = part.min(whole) as u64;
    let whole = whole as u64;
    ((200 * part + whole) / (2 * whole)) as u8
}

pub fn score_checks<C>(outcomes: &[CheckOutcome<C>]) -> u8 {
    let passed = outcomes.iter().filter(|outcome| outcome.passed).count();
    rounded_percentage(passed, outcomes.len())
}

/// Turns evaluated checks into a result; `leading` recommendations come before the per-check ones.
pub(crate) fn build_result<C: Check>(
    record_id: i64,
    checks: Vec<CheckOutcome<C>>,
    leading: Vec<String>,
    evaluado_en: DateTime<Utc>,
) -> ValidationResult<C> {
    let score = score_checks(&checks);
    let nivel_riesgo = RiskTier::from_score(score);

    let failed: Vec<C> = checks
        .iter()
        .filter(|outcome| !outcome.passed)
        .map(|outcome| outcome.check)
        .collect();

    let problemas = failed
        .iter()
        .map(|check| check.problem().to_string())
        .collect();

    let mut recomendaciones = leading;
    for recommendation in failed.iter().filter_map(|check| check.recommendation()) {
        if !recomendaciones.iter().any(|existing| existing == recommendation) {
            recomendaciones.push(recommendation.to_string());
        }
    }

    ValidationResult {
        record_id,
        checks,
        score,
        nivel_riesgo,
        problemas,
        recomendaciones,
        requiere_revision_manual: nivel_riesgo.requires_manual_review(),
        evaluado_en,
    }
}
