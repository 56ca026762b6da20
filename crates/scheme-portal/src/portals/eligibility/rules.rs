use super::super::domain::ValidationError;
use super::config::{EligibilityPolicy, QuestionKind};
use super::{AnswerValue, EligibilityAnswers, ScoreComponent};

pub(crate) struct ScoreSignals {
    pub points: u32,
    pub affirmative: usize,
    pub answered: usize,
    pub total: usize,
}

impl ScoreSignals {
    pub fn complete(&self) -> bool {
        self.answered == self.total
    }
}

fn check_known_keys(
    policy: &EligibilityPolicy,
    answers: &EligibilityAnswers,
) -> Result<(), ValidationError> {
    for (key, _) in answers.iter() {
        if !policy.questions.iter().any(|question| question.key == key) {
            return Err(ValidationError::UnknownField {
                field: key.to_string(),
            });
        }
    }
    Ok(())
}

pub(crate) fn score_answers(
    policy: &EligibilityPolicy,
    answers: &EligibilityAnswers,
) -> Result<(Vec<ScoreComponent>, ScoreSignals), ValidationError> {
    check_known_keys(policy, answers)?;

    let mut components = Vec::with_capacity(policy.questions.len());
    let mut points: u32 = 0;
    let mut affirmative = 0;
    let mut answered = 0;

    for question in &policy.questions {
        let answer = answers.get(&question.key);

        let (awarded, is_affirmative, notes) = match (&question.kind, answer) {
            (_, None) => (0, false, "unanswered".to_string()),
            (QuestionKind::YesNo { points }, Some(AnswerValue::Flag(flag))) => {
                if *flag {
                    (*points, true, "yes".to_string())
                } else {
                    (0, false, "no".to_string())
                }
            }
            (
                QuestionKind::Category {
                    options,
                    neutral,
                    points,
                },
                Some(AnswerValue::Choice(choice)),
            ) => {
                if !options.contains(choice) {
                    return Err(ValidationError::UnknownOption {
                        field: question.key.clone(),
                        value: choice.clone(),
                    });
                }
                if choice == neutral {
                    (0, false, format!("{choice} scores nothing"))
                } else {
                    (*points, true, format!("{choice} qualifies"))
                }
            }
            (QuestionKind::YesNo { .. }, Some(AnswerValue::Choice(_))) => {
                return Err(ValidationError::WrongType {
                    field: question.key.clone(),
                    expected: "yes/no",
                    found: "option",
                });
            }
            (QuestionKind::Category { .. }, Some(AnswerValue::Flag(_))) => {
                return Err(ValidationError::WrongType {
                    field: question.key.clone(),
                    expected: "option",
                    found: "yes/no",
                });
            }
        };

        if answer.is_some() {
            answered += 1;
        }
        if is_affirmative {
            affirmative += 1;
        }
        points += u32::from(awarded);

        components.push(ScoreComponent {
            question: question.key.clone(),
            answered: answer.is_some(),
            points: awarded,
            notes,
        });
    }

    let signals = ScoreSignals {
        points,
        affirmative,
        answered,
        total: policy.questions.len(),
    };

    Ok((components, signals))
}
