mod config;
mod policy;
mod rules;

pub use config::{
    CompletionRule, EligibilityPolicy, EligibilityQuestion, PolicyError, QuestionKind,
    ScoringRule, VerdictLabels,
};
pub use policy::Verdict;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::domain::ValidationError;
use policy::{decide_verdict, score_from};

/// A yes/no flag or one of a question's enumerated options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    Flag(bool),
    Choice(String),
}

/// Question key to answer; `None` and absent keys both mean unanswered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EligibilityAnswers(BTreeMap<String, Option<AnswerValue>>);

impl EligibilityAnswers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn flag(mut self, key: &str, value: bool) -> Self {
        self.set(key, Some(AnswerValue::Flag(value)));
        self
    }

    pub fn choice(mut self, key: &str, value: &str) -> Self {
        self.set(key, Some(AnswerValue::Choice(value.to_string())));
        self
    }

    pub fn set(&mut self, key: &str, value: Option<AnswerValue>) {
        self.0.insert(key.to_string(), value);
    }

    pub fn clear(&mut self, key: &str) {
        self.0.insert(key.to_string(), None);
    }

    pub fn get(&self, key: &str) -> Option<&AnswerValue> {
        self.0.get(key).and_then(Option::as_ref)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&AnswerValue>)> {
        self.0
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_ref()))
    }
}

/// Pure evaluator applying one scheme's policy to an answer set.
#[derive(Debug, Clone)]
pub struct EligibilityEngine {
    policy: EligibilityPolicy,
}

impl EligibilityEngine {
    pub fn new(policy: EligibilityPolicy) -> Result<Self, PolicyError> {
        policy.validate()?;
        Ok(Self { policy })
    }

    pub fn policy(&self) -> &EligibilityPolicy {
        &self.policy
    }

    pub fn evaluate(
        &self,
        answers: &EligibilityAnswers,
    ) -> Result<EligibilityOutcome, ValidationError> {
        let (components, signals) = rules::score_answers(&self.policy, answers)?;
        let score = score_from(&self.policy, &signals);
        let verdict = decide_verdict(&self.policy, score, &signals);

        Ok(EligibilityOutcome {
            score,
            verdict,
            verdict_label: verdict.display(&self.policy).to_string(),
            can_apply: verdict == Verdict::Eligible,
            answered: signals.answered,
            total: signals.total,
            affirmative: signals.affirmative,
            components,
        })
    }
}

/// Per-question contribution so the result can be explained.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreComponent {
    pub question: String,
    pub answered: bool,
    pub points: u8,
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EligibilityOutcome {
    pub score: u8,
    pub verdict: Verdict,
    pub verdict_label: String,
    pub can_apply: bool,
    pub answered: usize,
    pub total: usize,
    pub affirmative: usize,
    pub components: Vec<ScoreComponent>,
}
