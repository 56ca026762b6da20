use std::sync::Arc;

use tracing::debug;

use super::blueprint::PortalBlueprint;
use super::collaborators::SubmissionReceipt;
use super::domain::{FieldValue, Role, TabSpec, Theme};
use super::draft::{DraftForm, DraftStore, FormError};
use super::eligibility::{EligibilityOutcome, Verdict};
use super::notice::{Notice, NoticeBoard};

pub const OVERVIEW_TAB: &str = "overview";
pub const APPLY_TAB: &str = "apply";
pub const TRACK_TAB: &str = "track";
const CHALLENGE_TRACK_FIELD: &str = "challengeTrack";

#[derive(Debug, thiserror::Error)]
pub enum ShellError {
    #[error("unknown tab '{0}'")]
    UnknownTab(String),
    #[error("tab '{tab}' is not available to the {role:?} role")]
    TabHidden { tab: String, role: Role },
    #[error("role {0:?} is not offered by this portal")]
    UnsupportedRole(Role),
    #[error("applications open only to eligible applicants (verdict: {0:?})")]
    NotEligible(Verdict),
    #[error("'{0}' is not an open challenge track")]
    UnknownTrack(String),
    #[error(transparent)]
    Form(#[from] FormError),
}

/// Cross-cutting UI state of one portal instance: active tab, role, theme
/// and the transient notice.
#[derive(Debug)]
pub struct TabShell {
    blueprint: Arc<PortalBlueprint>,
    role: Role,
    theme: Theme,
    active: &'static str,
    submission: Option<SubmissionReceipt>,
    notices: NoticeBoard,
}

impl TabShell {
    pub fn new(blueprint: Arc<PortalBlueprint>) -> Self {
        let notices = NoticeBoard::new(blueprint.notice_ttl);
        Self {
            blueprint,
            role: Role::Applicant,
            theme: Theme::default(),
            active: OVERVIEW_TAB,
            submission: None,
            notices,
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn active_tab(&self) -> &'static str {
        self.active
    }

    pub fn submission(&self) -> Option<&SubmissionReceipt> {
        self.submission.as_ref()
    }

    pub fn notice(&self) -> Option<Notice> {
        self.notices.current()
    }

    pub fn visible_tabs(&self) -> Vec<&TabSpec> {
        self.blueprint
            .tabs
            .iter()
            .filter(|tab| tab.visible_to(self.role))
            .collect()
    }

    pub fn select_tab(&mut self, key: &str) -> Result<(), ShellError> {
        let tab = self
            .blueprint
            .tabs
            .iter()
            .find(|tab| tab.key == key)
            .ok_or_else(|| ShellError::UnknownTab(key.to_string()))?;
        if !tab.visible_to(self.role) {
            return Err(ShellError::TabHidden {
                tab: key.to_string(),
                role: self.role,
            });
        }
        self.active = tab.key;
        Ok(())
    }

    /// Switches persona; a tab the new role cannot see falls back to overview.
    pub fn set_role(&mut self, role: Role) -> Result<(), ShellError> {
        if !self.blueprint.roles.contains(&role) {
            return Err(ShellError::UnsupportedRole(role));
        }
        self.role = role;

        let still_visible = self
            .blueprint
            .tabs
            .iter()
            .any(|tab| tab.key == self.active && tab.visible_to(role));
        if !still_visible {
            debug!(tab = self.active, ?role, "active tab hidden, returning to overview");
            self.active = OVERVIEW_TAB;
        }
        Ok(())
    }

    pub fn toggle_theme(&mut self) -> Theme {
        self.theme = self.theme.toggled();
        self.theme
    }

    /// "Start application" from the eligibility result.
    pub fn start_application(&mut self, outcome: &EligibilityOutcome) -> Result<(), ShellError> {
        if !outcome.can_apply {
            return Err(ShellError::NotEligible(outcome.verdict));
        }
        self.select_tab(APPLY_TAB)
    }

    /// Picks a challenge track for the draft and opens the form.
    pub fn choose_challenge<S>(
        &mut self,
        track: &str,
        form: &mut DraftForm<S>,
    ) -> Result<(), ShellError>
    where
        S: DraftStore,
    {
        if !self.blueprint.challenge_tracks.iter().any(|open| *open == track) {
            return Err(ShellError::UnknownTrack(track.to_string()));
        }
        form.set_field(CHALLENGE_TRACK_FIELD, FieldValue::text(track))?;
        self.select_tab(APPLY_TAB)
    }

    pub fn post_notice(&mut self, message: impl Into<String>) -> u64 {
        self.notices.post(message)
    }

    pub fn announce_draft_saved(&mut self) -> u64 {
        self.notices.post(self.blueprint.draft_saved_notice)
    }

    /// Marks the portal as submitted, moves to tracking and announces it.
    pub fn record_submission(&mut self, receipt: SubmissionReceipt) {
        self.submission = Some(receipt);
        self.active = TRACK_TAB;
        self.notices.post(self.blueprint.submission_notice);
    }
}
