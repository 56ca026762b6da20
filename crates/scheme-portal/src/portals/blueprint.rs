use std::time::Duration;

use chrono::NaiveDate;
use serde::Serialize;

use super::dashboard::DashboardSnapshot;
use super::domain::{
    ApplicationDraft, FieldKind, FieldSpec, FieldValue, FormStep, Milestone, MilestoneStatus,
    ReviewRecord, Role, SchemeId, Stage, TabSpec, ValidationError,
};
use super::eligibility::{
    CompletionRule, EligibilityPolicy, EligibilityQuestion, ScoringRule, VerdictLabels,
};
use super::rubric::Rubric;

/// Static definition of one scheme portal: navigation, form, stages,
/// eligibility policy, rubric and demo data.
#[derive(Debug, Clone)]
pub struct PortalBlueprint {
    pub scheme: SchemeId,
    pub title: &'static str,
    pub storage_key: &'static str,
    pub notice_ttl: Duration,
    pub submission_notice: &'static str,
    pub draft_saved_notice: &'static str,
    pub roles: Vec<Role>,
    pub tabs: Vec<TabSpec>,
    pub steps: Vec<FormStep>,
    pub stages: Vec<Stage>,
    pub eligibility: EligibilityPolicy,
    pub rubric: Option<Rubric>,
    pub review_queue: Vec<ReviewRecord>,
    pub milestones: Vec<Milestone>,
    pub challenge_tracks: Vec<&'static str>,
    pub dashboard: DashboardSnapshot,
}

const fn stage(key: &'static str, label: &'static str) -> Stage {
    Stage { key, label }
}

const fn text(key: &'static str, label: &'static str) -> FieldSpec {
    FieldSpec::new(key, label, FieldKind::Text)
}

const fn long_text(key: &'static str, label: &'static str) -> FieldSpec {
    FieldSpec::new(key, label, FieldKind::LongText)
}

fn milestone(
    title: &str,
    (year, month, day): (i32, u32, u32),
    status: MilestoneStatus,
) -> Option<Milestone> {
    NaiveDate::from_ymd_opt(year, month, day).map(|due| Milestone {
        title: title.to_string(),
        due,
        status,
    })
}

fn review_record(
    id: &str,
    organization: &str,
    state: &str,
    sector: &str,
    stage: &str,
) -> ReviewRecord {
    ReviewRecord {
        id: id.to_string(),
        organization: organization.to_string(),
        state: state.to_string(),
        sector: sector.to_string(),
        stage: stage.to_string(),
    }
}

impl PortalBlueprint {
    pub fn for_scheme(scheme: SchemeId) -> Self {
        match scheme {
            SchemeId::Samridh => Self::samridh(),
            SchemeId::Genesis => Self::genesis(),
        }
    }

    /// Accelerator scheme: role-gated tabs, seven-step form, yes-count
    /// eligibility that requires every answer.
    pub fn samridh() -> Self {
        let steps = vec![
            FormStep {
                key: "org",
                label: "Organization",
                fields: vec![
                    text("orgName", "Organization Name"),
                    text("cin", "CIN"),
                    text("state", "State"),
                    text("website", "Website"),
                    text("dpiit", "DPIIT No."),
                ],
            },
            FormStep {
                key: "team",
                label: "Team",
                fields: vec![
                    FieldSpec::new("teamSize", "Team Size", FieldKind::Number),
                    long_text("founders", "Founders (names, roles)"),
                    long_text("advisors", "Advisors / Mentors"),
                ],
            },
            FormStep {
                key: "product",
                label: "Product",
                fields: vec![
                    text("productName", "Product Name"),
                    long_text("problem", "Problem Statement"),
                    long_text("solution", "Solution Overview"),
                    long_text("ip", "IP / Patents / Licenses"),
                ],
            },
            FormStep {
                key: "traction",
                label: "Traction",
                fields: vec![
                    FieldSpec::new(
                        "tractionUsers",
                        "Users / Deployments (last 12m)",
                        FieldKind::Number,
                    ),
                    long_text("pilots", "Pilots / POCs"),
                    long_text("partners", "Partners / Clients"),
                ],
            },
            FormStep {
                key: "financials",
                label: "Financials",
                fields: vec![
                    FieldSpec::new("askAmount", "Funding Ask (₹)", FieldKind::Currency),
                    FieldSpec::new("coFunding", "Co-funding (₹)", FieldKind::Currency),
                    FieldSpec::new("revenue12m", "Revenue (last 12m, ₹)", FieldKind::Currency),
                ],
            },
            FormStep {
                key: "docs",
                label: "Documents",
                fields: vec![FieldSpec::new("documents", "Documents", FieldKind::Files)],
            },
            FormStep {
                key: "review",
                label: "Review & Submit",
                fields: Vec::new(),
            },
        ];

        let eligibility = EligibilityPolicy {
            questions: vec![
                EligibilityQuestion::yes_no(
                    "incorporated",
                    "Is your startup incorporated in India?",
                    20,
                ),
                EligibilityQuestion::yes_no("dpiit", "Do you have valid DPIIT recognition?", 20),
                EligibilityQuestion::yes_no(
                    "ip",
                    "Do you hold or control relevant IP / licenses?",
                    20,
                ),
                EligibilityQuestion::yes_no(
                    "revenue",
                    "Do you have revenue or pilots in the last 12 months?",
                    20,
                ),
                EligibilityQuestion::yes_no(
                    "accelerator",
                    "Are you willing to join an accelerator cohort for 6 months?",
                    20,
                ),
            ],
            scoring: ScoringRule::YesCount { eligible_at: 4 },
            completion: CompletionRule::RequireAll,
            labels: VerdictLabels {
                eligible: "You are eligible to apply.".to_string(),
                borderline: "Not eligible yet.".to_string(),
                ineligible: "Not eligible yet.".to_string(),
                incomplete: "Answer all questions".to_string(),
            },
        };

        let milestones = [
            milestone("Onboarding Docs", (2025, 10, 20), MilestoneStatus::Pending),
            milestone("Pilot Signed", (2025, 11, 5), MilestoneStatus::InReview),
            milestone("Quarterly Report Q1", (2026, 1, 15), MilestoneStatus::NotStarted),
        ]
        .into_iter()
        .flatten()
        .collect();

        Self {
            scheme: SchemeId::Samridh,
            title: "SAMRIDH — MeitY Startup Hub",
            storage_key: "samridh_draft",
            notice_ttl: Duration::from_millis(3000),
            submission_notice:
                "Application submitted successfully. You can track status in the Track tab.",
            draft_saved_notice: "Draft saved.",
            roles: Role::ordered().to_vec(),
            tabs: vec![
                TabSpec::open("overview", "Overview"),
                TabSpec::open("eligibility", "Eligibility"),
                TabSpec::open("apply", "Apply"),
                TabSpec::open("track", "Track"),
                TabSpec::restricted("review", "Review", Role::Reviewer),
                TabSpec::restricted("admin", "Admin", Role::Admin),
                TabSpec::open("dashboard", "Dashboard"),
            ],
            steps,
            stages: vec![
                stage("submitted", "Submitted"),
                stage("screening", "Screening"),
                stage("due_diligence", "Due Diligence"),
                stage("committee", "Committee"),
                stage("awarded", "Awarded"),
                stage("onboarded", "Onboarded"),
            ],
            eligibility,
            rubric: Some(Rubric::samridh()),
            review_queue: vec![
                review_record("APP-1001", "Agnika Tech", "KA", "HealthTech", "screening"),
                review_record("APP-1002", "Vyom IoT", "MH", "IoT", "screening"),
                review_record("APP-1003", "NexGrid", "DL", "GridTech", "due_diligence"),
            ],
            milestones,
            challenge_tracks: Vec::new(),
            dashboard: DashboardSnapshot::samridh(),
        }
    }

    /// Grants and challenges scheme: single-page form, points-based
    /// eligibility that scores partial answers.
    pub fn genesis() -> Self {
        let challenge_tracks = vec![
            "Digital Public Goods",
            "AI for Governance",
            "Inclusive Tech",
            "Sustainable Cities",
        ];

        let steps = vec![FormStep {
            key: "application",
            label: "Application Form",
            fields: vec![
                text("orgName", "Organization Name"),
                text("contact", "Contact Person"),
                text("email", "Email"),
                text("website", "Website"),
                FieldSpec::new(
                    "challengeTrack",
                    "Challenge Track",
                    FieldKind::Choice {
                        options: challenge_tracks.clone(),
                    },
                ),
                long_text("problemStatement", "Problem Statement (what are you solving?)"),
                long_text("solution", "Solution & Impact"),
                long_text("team", "Team (founders, roles)"),
                FieldSpec::new("docs", "Documents", FieldKind::Files),
            ],
        }];

        let eligibility = EligibilityPolicy {
            questions: vec![
                EligibilityQuestion::yes_no("incorporated", "Incorporated entity in India?", 30),
                EligibilityQuestion::yes_no("dpiit", "DPIIT recognition?", 20),
                EligibilityQuestion::category(
                    "revenue",
                    "Revenue in the last 12 months",
                    &["none", "<50L", "50L-1Cr", ">1Cr"],
                    "none",
                    20,
                ),
                EligibilityQuestion::category(
                    "ipStatus",
                    "IP status",
                    &["none", "filed", "granted"],
                    "none",
                    30,
                ),
            ],
            scoring: ScoringRule::Points {
                eligible_at: 60,
                borderline_at: 40,
            },
            completion: CompletionRule::ScorePartial,
            labels: VerdictLabels {
                eligible: "Likely Eligible".to_string(),
                borderline: "Borderline – needs mentor review".to_string(),
                ineligible: "Currently Ineligible".to_string(),
                incomplete: "Answer the remaining questions".to_string(),
            },
        };

        Self {
            scheme: SchemeId::Genesis,
            title: "GENESIS — MeitY Startup Hub",
            storage_key: "genesis_draft",
            notice_ttl: Duration::from_millis(2500),
            submission_notice: "Application submitted (demo). Connect to /api/applications next.",
            draft_saved_notice: "Draft saved locally.",
            roles: vec![Role::Applicant],
            tabs: vec![
                TabSpec::open("overview", "Overview"),
                TabSpec::open("eligibility", "Eligibility"),
                TabSpec::open("challenges", "Challenge Tracks"),
                TabSpec::open("apply", "Apply"),
                TabSpec::open("track", "Track"),
                TabSpec::open("mentors", "Mentors"),
                TabSpec::open("resources", "Resources"),
                TabSpec::open("dashboard", "Dashboard"),
            ],
            steps,
            stages: vec![
                stage("received", "Received"),
                stage("screening", "Screening"),
                stage("mentor_review", "Mentor Review"),
                stage("committee", "Committee"),
                stage("pilot_grant", "Pilot Grant"),
            ],
            eligibility,
            rubric: None,
            review_queue: Vec::new(),
            milestones: Vec::new(),
            challenge_tracks,
            dashboard: DashboardSnapshot::genesis(),
        }
    }

    pub fn field(&self, key: &str) -> Option<&FieldSpec> {
        self.steps
            .iter()
            .flat_map(|step| step.fields.iter())
            .find(|field| field.key == key)
    }

    pub fn validate_field(&self, key: &str, value: &FieldValue) -> Result<(), ValidationError> {
        let spec = self.field(key).ok_or_else(|| ValidationError::UnknownField {
            field: key.to_string(),
        })?;
        spec.validate(value)
    }

    /// Type and range checks only; blank fields are allowed.
    pub fn validate_draft(&self, draft: &ApplicationDraft) -> Result<(), ValidationError> {
        draft
            .iter()
            .try_for_each(|(key, value)| self.validate_field(key, value))
    }

    pub fn summary(&self) -> BlueprintSummary<'_> {
        BlueprintSummary {
            scheme: self.scheme,
            title: self.title,
            storage_key: self.storage_key,
            notice_ttl_ms: self.notice_ttl.as_millis() as u64,
            roles: &self.roles,
            tabs: &self.tabs,
            steps: &self.steps,
            stages: &self.stages,
            eligibility: &self.eligibility,
            rubric: self.rubric.as_ref(),
            challenge_tracks: &self.challenge_tracks,
        }
    }
}

/// Client-facing description of a portal.
#[derive(Debug, Serialize)]
pub struct BlueprintSummary<'a> {
    pub scheme: SchemeId,
    pub title: &'static str,
    pub storage_key: &'static str,
    pub notice_ttl_ms: u64,
    pub roles: &'a [Role],
    pub tabs: &'a [TabSpec],
    pub steps: &'a [FormStep],
    pub stages: &'a [Stage],
    pub eligibility: &'a EligibilityPolicy,
    pub rubric: Option<&'a Rubric>,
    pub challenge_tracks: &'a [&'static str],
}
