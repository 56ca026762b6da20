use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Scheme workspaces served by the portal shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchemeId {
    Samridh,
    Genesis,
}

impl SchemeId {
    pub const fn ordered() -> [Self; 2] {
        [Self::Samridh, Self::Genesis]
    }

    pub const fn slug(self) -> &'static str {
        match self {
            Self::Samridh => "samridh",
            Self::Genesis => "genesis",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Samridh => "SAMRIDH",
            Self::Genesis => "GENESIS",
        }
    }
}

impl fmt::Display for SchemeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for SchemeId {
    type Err = ValidationError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "samridh" => Ok(Self::Samridh),
            "genesis" => Ok(Self::Genesis),
            _ => Err(ValidationError::UnknownScheme(raw.to_string())),
        }
    }
}

/// Persona selected in the shell header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Applicant,
    Reviewer,
    Admin,
}

impl Role {
    pub const fn ordered() -> [Self; 3] {
        [Self::Applicant, Self::Reviewer, Self::Admin]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Applicant => "Applicant",
            Self::Reviewer => "Reviewer",
            Self::Admin => "Admin",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub const fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}

/// Navigation entry; `required_role` hides the tab from everyone else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TabSpec {
    pub key: &'static str,
    pub label: &'static str,
    pub required_role: Option<Role>,
}

impl TabSpec {
    pub const fn open(key: &'static str, label: &'static str) -> Self {
        Self {
            key,
            label,
            required_role: None,
        }
    }

    pub const fn restricted(key: &'static str, label: &'static str, role: Role) -> Self {
        Self {
            key,
            label,
            required_role: Some(role),
        }
    }

    pub fn visible_to(&self, role: Role) -> bool {
        self.required_role.map_or(true, |required| required == role)
    }
}

/// Single value captured by the application form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Number(f64),
    Text(String),
    Files(Vec<String>),
}

impl FieldValue {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    const fn type_name(&self) -> &'static str {
        match self {
            Self::Number(_) => "number",
            Self::Text(_) => "text",
            Self::Files(_) => "file list",
        }
    }
}

/// In-progress application record, persisted verbatim as a JSON object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApplicationDraft {
    fields: BTreeMap<String, FieldValue>,
}

impl ApplicationDraft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: FieldValue) -> Self {
        self.fields.insert(key.into(), value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.fields.get(key)
    }

    pub fn text(&self, key: &str) -> Option<&str> {
        match self.fields.get(key) {
            Some(FieldValue::Text(value)) => Some(value.as_str()),
            _ => None,
        }
    }

    pub fn number(&self, key: &str) -> Option<f64> {
        match self.fields.get(key) {
            Some(FieldValue::Number(value)) => Some(*value),
            _ => None,
        }
    }

    pub fn files(&self, key: &str) -> &[String] {
        match self.fields.get(key) {
            Some(FieldValue::Files(files)) => files,
            _ => &[],
        }
    }

    pub(crate) fn insert(&mut self, key: impl Into<String>, value: FieldValue) {
        self.fields.insert(key.into(), value);
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(key, value)| (key.as_str(), value))
    }
}

/// Input kind for a form field; drives boundary validation only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldKind {
    Text,
    LongText,
    Number,
    Currency,
    Choice { options: Vec<&'static str> },
    Files,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldSpec {
    pub key: &'static str,
    pub label: &'static str,
    #[serde(flatten)]
    pub kind: FieldKind,
}

impl FieldSpec {
    pub const fn new(key: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self { key, label, kind }
    }

    /// Blank text is accepted; numbers must be finite and non-negative.
    pub fn validate(&self, value: &FieldValue) -> Result<(), ValidationError> {
        match (&self.kind, value) {
            (FieldKind::Text | FieldKind::LongText, FieldValue::Text(_)) => Ok(()),
            (FieldKind::Choice { options }, FieldValue::Text(choice)) => {
                if choice.is_empty() || options.iter().any(|option| option == choice) {
                    Ok(())
                } else {
                    Err(ValidationError::UnknownOption {
                        field: self.key.to_string(),
                        value: choice.clone(),
                    })
                }
            }
            (FieldKind::Number | FieldKind::Currency, FieldValue::Number(number)) => {
                if number.is_finite() && *number >= 0.0 {
                    Ok(())
                } else {
                    Err(ValidationError::OutOfRange {
                        field: self.key.to_string(),
                        value: *number,
                        min: 0.0,
                        max: f64::MAX,
                    })
                }
            }
            (FieldKind::Files, FieldValue::Files(files)) => {
                match files.iter().find(|name| name.trim().is_empty()) {
                    Some(_) => Err(ValidationError::Missing {
                        field: format!("{} filename", self.key),
                    }),
                    None => Ok(()),
                }
            }
            (kind, other) => Err(ValidationError::WrongType {
                field: self.key.to_string(),
                expected: kind.expected(),
                found: other.type_name(),
            }),
        }
    }
}

impl FieldKind {
    const fn expected(&self) -> &'static str {
        match self {
            Self::Text | Self::LongText | Self::Choice { .. } => "text",
            Self::Number | Self::Currency => "number",
            Self::Files => "file list",
        }
    }
}

/// One page of the multi-step application form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormStep {
    pub key: &'static str,
    pub label: &'static str,
    pub fields: Vec<FieldSpec>,
}

/// Named position in the externally advanced application workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Stage {
    pub key: &'static str,
    pub label: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MilestoneStatus {
    NotStarted,
    Pending,
    InReview,
    Completed,
}

impl MilestoneStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::NotStarted => "Not Started",
            Self::Pending => "Pending",
            Self::InReview => "In Review",
            Self::Completed => "Completed",
        }
    }
}

/// Post-award deliverable shown alongside the stage tracker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Milestone {
    pub title: String,
    pub due: NaiveDate,
    pub status: MilestoneStatus,
}

/// Queue entry shown in the reviewer console.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewRecord {
    pub id: String,
    pub organization: String,
    pub state: String,
    pub sector: String,
    pub stage: String,
}

/// Identifier handed back by the submission collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ApplicationId(pub String);

impl fmt::Display for ApplicationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Input rejected at the portal boundary.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("unknown scheme '{0}'")]
    UnknownScheme(String),
    #[error("unknown field '{field}'")]
    UnknownField { field: String },
    #[error("field '{field}' is required")]
    Missing { field: String },
    #[error("field '{field}' expects {expected}, found {found}")]
    WrongType {
        field: String,
        expected: &'static str,
        found: &'static str,
    },
    #[error("field '{field}' value {value} is outside {min}..={max}")]
    OutOfRange {
        field: String,
        value: f64,
        min: f64,
        max: f64,
    },
    #[error("'{value}' is not an accepted option for '{field}'")]
    UnknownOption { field: String, value: String },
}
