use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::domain::ValidationError;

pub const MIN_SCORE: u8 = 1;
pub const MAX_SCORE: u8 = 5;
/// Multiplier mapping a 1..=5 weighted average onto 20..=100.
const SCALE: f64 = 20.0;
const WEIGHT_TOLERANCE: f64 = 1e-6;

/// Criterion name to reviewer score.
pub type RubricScores = BTreeMap<String, u8>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RubricCriterion {
    pub key: String,
    pub weight: f64,
}

/// Fixed weight table used by reviewers; weights sum to 1.0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rubric {
    criteria: Vec<RubricCriterion>,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RubricError {
    #[error("rubric has no criteria")]
    Empty,
    #[error("criterion '{0}' is declared more than once")]
    DuplicateCriterion(String),
    #[error("criterion '{criterion}' has invalid weight {weight}")]
    InvalidWeight { criterion: String, weight: f64 },
    #[error("rubric weights sum to {sum}, expected 1.0")]
    WeightsDoNotSumToOne { sum: f64 },
}

impl Rubric {
    pub fn new(criteria: Vec<RubricCriterion>) -> Result<Self, RubricError> {
        if criteria.is_empty() {
            return Err(RubricError::Empty);
        }
        for (index, criterion) in criteria.iter().enumerate() {
            if criteria[..index]
                .iter()
                .any(|earlier| earlier.key == criterion.key)
            {
                return Err(RubricError::DuplicateCriterion(criterion.key.clone()));
            }
            if !criterion.weight.is_finite() || criterion.weight < 0.0 {
                return Err(RubricError::InvalidWeight {
                    criterion: criterion.key.clone(),
                    weight: criterion.weight,
                });
            }
        }

        let sum: f64 = criteria.iter().map(|criterion| criterion.weight).sum();
        if (sum - 1.0).abs() > WEIGHT_TOLERANCE {
            return Err(RubricError::WeightsDoNotSumToOne { sum });
        }

        Ok(Self { criteria })
    }

    /// Reviewer rubric for SAMRIDH applications.
    pub fn samridh() -> Self {
        let criteria = [
            ("team", 0.20),
            ("market", 0.25),
            ("innovation", 0.25),
            ("scalability", 0.20),
            ("documentation", 0.10),
        ]
        .into_iter()
        .map(|(key, weight)| RubricCriterion {
            key: key.to_string(),
            weight,
        })
        .collect();
        Self { criteria }
    }

    pub fn criteria(&self) -> &[RubricCriterion] {
        &self.criteria
    }

    pub fn weight(&self, criterion: &str) -> Option<f64> {
        self.criteria
            .iter()
            .find(|entry| entry.key == criterion)
            .map(|entry| entry.weight)
    }

    /// Every criterion at the midpoint score.
    pub fn neutral_scores(&self) -> RubricScores {
        self.criteria
            .iter()
            .map(|criterion| (criterion.key.clone(), 3))
            .collect()
    }

    /// Unrounded total in 20.0..=100.0.
    pub fn weighted_total(&self, scores: &RubricScores) -> Result<f64, ValidationError> {
        if let Some(unknown) = scores.keys().find(|key| self.weight(key).is_none()) {
            return Err(ValidationError::UnknownField {
                field: unknown.clone(),
            });
        }

        let mut total = 0.0;
        for criterion in &self.criteria {
            let score = *scores
                .get(&criterion.key)
                .ok_or_else(|| ValidationError::Missing {
                    field: criterion.key.clone(),
                })?;
            if !(MIN_SCORE..=MAX_SCORE).contains(&score) {
                return Err(ValidationError::OutOfRange {
                    field: criterion.key.clone(),
                    value: f64::from(score),
                    min: f64::from(MIN_SCORE),
                    max: f64::from(MAX_SCORE),
                });
            }
            total += f64::from(score) * criterion.weight;
        }

        Ok(total * SCALE)
    }

    pub fn total(&self, scores: &RubricScores) -> Result<u8, ValidationError> {
        let total = self.weighted_total(scores)?;
        Ok(total.round().clamp(0.0, 100.0) as u8)
    }
}

/// Clamps raw slider input into the accepted score range.
pub fn clamp_score(raw: i64) -> u8 {
    raw.clamp(i64::from(MIN_SCORE), i64::from(MAX_SCORE)) as u8
}
