use serde::{Deserialize, Serialize};

/// Scoring policy for one scheme: questions, points, thresholds and the
/// rule applied while questions are still unanswered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EligibilityPolicy {
    pub questions: Vec<EligibilityQuestion>,
    pub scoring: ScoringRule,
    pub completion: CompletionRule,
    pub labels: VerdictLabels,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EligibilityQuestion {
    pub key: String,
    pub label: String,
    #[serde(flatten)]
    pub kind: QuestionKind,
}

impl EligibilityQuestion {
    pub fn yes_no(key: &str, label: &str, points: u8) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            kind: QuestionKind::YesNo { points },
        }
    }

    /// Any option other than `neutral` counts as affirmative.
    pub fn category(key: &str, label: &str, options: &[&str], neutral: &str, points: u8) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            kind: QuestionKind::Category {
                options: options.iter().map(|option| option.to_string()).collect(),
                neutral: neutral.to_string(),
                points,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum QuestionKind {
    YesNo {
        points: u8,
    },
    Category {
        options: Vec<String>,
        neutral: String,
        points: u8,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum ScoringRule {
    /// Sum of awarded points, capped at 100.
    Points { eligible_at: u8, borderline_at: u8 },
    /// Count of affirmative answers; no borderline tier.
    YesCount { eligible_at: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletionRule {
    /// Unanswered questions contribute nothing; a partial set is incomplete
    /// unless its score is already eligible.
    ScorePartial,
    /// Any unanswered question blocks the verdict.
    RequireAll,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerdictLabels {
    pub eligible: String,
    pub borderline: String,
    pub ineligible: String,
    pub incomplete: String,
}

impl EligibilityPolicy {
    pub fn validate(&self) -> Result<(), PolicyError> {
        if self.questions.is_empty() {
            return Err(PolicyError::NoQuestions);
        }

        for (index, question) in self.questions.iter().enumerate() {
            if self.questions[..index]
                .iter()
                .any(|earlier| earlier.key == question.key)
            {
                return Err(PolicyError::DuplicateQuestion(question.key.clone()));
            }
            if let QuestionKind::Category {
                options, neutral, ..
            } = &question.kind
            {
                if !options.contains(neutral) {
                    return Err(PolicyError::NeutralOptionMissing {
                        question: question.key.clone(),
                        neutral: neutral.clone(),
                    });
                }
            }
        }

        match self.scoring {
            ScoringRule::Points {
                eligible_at,
                borderline_at,
            } => {
                if eligible_at > 100 || borderline_at > eligible_at {
                    return Err(PolicyError::InvalidThresholds {
                        eligible_at: u32::from(eligible_at),
                        borderline_at: u32::from(borderline_at),
                    });
                }
            }
            ScoringRule::YesCount { eligible_at } => {
                if eligible_at == 0 || eligible_at > self.questions.len() {
                    return Err(PolicyError::InvalidThresholds {
                        eligible_at: eligible_at as u32,
                        borderline_at: 0,
                    });
                }
            }
        }

        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PolicyError {
    #[error("eligibility policy has no questions")]
    NoQuestions,
    #[error("question '{0}' is declared more than once")]
    DuplicateQuestion(String),
    #[error("question '{question}' lists no '{neutral}' option")]
    NeutralOptionMissing { question: String, neutral: String },
    #[error("invalid thresholds (eligible at {eligible_at}, borderline at {borderline_at})")]
    InvalidThresholds { eligible_at: u32, borderline_at: u32 },
}
