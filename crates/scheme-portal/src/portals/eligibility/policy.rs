use serde::{Deserialize, Serialize};

use super::config::{CompletionRule, EligibilityPolicy, ScoringRule};
use super::rules::ScoreSignals;

/// Categorical outcome derived from the score via fixed thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Ineligible,
    Borderline,
    Eligible,
    Incomplete,
}

impl Verdict {
    pub const fn label(self) -> &'static str {
        match self {
            Verdict::Ineligible => "ineligible",
            Verdict::Borderline => "borderline",
            Verdict::Eligible => "eligible",
            Verdict::Incomplete => "incomplete",
        }
    }

    pub fn display<'a>(self, policy: &'a EligibilityPolicy) -> &'a str {
        match self {
            Verdict::Ineligible => &policy.labels.ineligible,
            Verdict::Borderline => &policy.labels.borderline,
            Verdict::Eligible => &policy.labels.eligible,
            Verdict::Incomplete => &policy.labels.incomplete,
        }
    }
}

pub(crate) fn score_from(policy: &EligibilityPolicy, signals: &ScoreSignals) -> u8 {
    match policy.scoring {
        ScoringRule::Points { .. } => signals.points.min(100) as u8,
        ScoringRule::YesCount { .. } => {
            if signals.total == 0 {
                return 0;
            }
            let ratio = signals.affirmative as f64 / signals.total as f64;
            (ratio * 100.0).round().min(100.0) as u8
        }
    }
}

fn tier(policy: &EligibilityPolicy, score: u8, signals: &ScoreSignals) -> Verdict {
    match policy.scoring {
        ScoringRule::Points {
            eligible_at,
            borderline_at,
        } => {
            if score >= eligible_at {
                Verdict::Eligible
            } else if score >= borderline_at {
                Verdict::Borderline
            } else {
                Verdict::Ineligible
            }
        }
        ScoringRule::YesCount { eligible_at } => {
            if signals.affirmative >= eligible_at {
                Verdict::Eligible
            } else {
                Verdict::Ineligible
            }
        }
    }
}

pub(crate) fn decide_verdict(
    policy: &EligibilityPolicy,
    score: u8,
    signals: &ScoreSignals,
) -> Verdict {
    let tier = tier(policy, score, signals);
    if signals.complete() {
        return tier;
    }

    match policy.completion {
        CompletionRule::RequireAll => Verdict::Incomplete,
        // Answers only add points, so an eligible partial score cannot drop.
        CompletionRule::ScorePartial if tier == Verdict::Eligible => Verdict::Eligible,
        CompletionRule::ScorePartial => Verdict::Incomplete,
    }
}
