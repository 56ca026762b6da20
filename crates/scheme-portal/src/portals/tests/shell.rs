use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;

use super::common::*;
use crate::portals::{
    ApplicationId, DraftForm, EligibilityEngine, MemoryDraftStore, PortalBlueprint, Role,
    SchemeId, ShellError, SubmissionReceipt, TabShell, Theme,
};

fn shell(blueprint: PortalBlueprint) -> TabShell {
    TabShell::new(Arc::new(blueprint))
}

fn tab_keys(shell: &TabShell) -> Vec<&'static str> {
    shell.visible_tabs().iter().map(|tab| tab.key).collect()
}

#[test]
fn applicant_does_not_see_reviewer_or_admin_tabs() {
    let mut shell = shell(PortalBlueprint::samridh());

    assert_eq!(shell.active_tab(), "overview");
    assert_eq!(
        tab_keys(&shell),
        vec!["overview", "eligibility", "apply", "track", "dashboard"]
    );
    assert!(matches!(
        shell.select_tab("review"),
        Err(ShellError::TabHidden { role: Role::Applicant, .. })
    ));
    assert!(matches!(
        shell.select_tab("mentors"),
        Err(ShellError::UnknownTab(_))
    ));
}

#[test]
fn role_change_hiding_active_tab_falls_back_to_overview() {
    let mut shell = shell(PortalBlueprint::samridh());
    shell.set_role(Role::Reviewer).expect("reviewer offered");
    assert!(tab_keys(&shell).contains(&"review"));
    assert!(!tab_keys(&shell).contains(&"admin"));
    shell.select_tab("review").expect("reviewer sees review");

    shell.set_role(Role::Admin).expect("admin offered");
    assert_eq!(shell.active_tab(), "overview");

    shell.select_tab("track").expect("track is open");
    shell.set_role(Role::Applicant).expect("applicant offered");
    assert_eq!(shell.active_tab(), "track");
}

#[test]
fn genesis_offers_only_the_applicant_role() {
    let mut shell = shell(PortalBlueprint::genesis());
    assert_eq!(shell.visible_tabs().len(), 8);
    assert!(matches!(
        shell.set_role(Role::Admin),
        Err(ShellError::UnsupportedRole(Role::Admin))
    ));
    assert_eq!(shell.role(), Role::Applicant);
}

#[test]
fn theme_toggles_between_light_and_dark() {
    let mut shell = shell(PortalBlueprint::genesis());
    assert_eq!(shell.theme(), Theme::Light);
    assert_eq!(shell.toggle_theme(), Theme::Dark);
    assert_eq!(shell.toggle_theme(), Theme::Light);
}

#[test]
fn only_eligible_outcomes_start_an_application() {
    let engine = EligibilityEngine::new(PortalBlueprint::samridh().eligibility)
        .expect("policy valid");
    let mut shell = shell(PortalBlueprint::samridh());

    let not_yet = engine.evaluate(&samridh_answers(3)).expect("answers valid");
    assert!(matches!(
        shell.start_application(&not_yet),
        Err(ShellError::NotEligible(_))
    ));
    assert_eq!(shell.active_tab(), "overview");

    let eligible = engine.evaluate(&samridh_answers(5)).expect("answers valid");
    shell.start_application(&eligible).expect("eligible applicant");
    assert_eq!(shell.active_tab(), "apply");
}

#[test]
fn recording_a_submission_moves_to_track_with_notice() {
    let mut shell = shell(PortalBlueprint::samridh());
    shell.record_submission(SubmissionReceipt {
        application_id: ApplicationId("APP-2001".to_string()),
        scheme: SchemeId::Samridh,
        submitted_at: Utc::now(),
    });

    assert_eq!(shell.active_tab(), "track");
    assert_eq!(
        shell.submission().map(|receipt| receipt.application_id.0.as_str()),
        Some("APP-2001")
    );
    assert_eq!(
        shell.notice().map(|notice| notice.message),
        Some(
            "Application submitted successfully. You can track status in the Track tab."
                .to_string()
        )
    );
}

#[test]
fn choosing_a_challenge_prefills_the_draft() {
    let blueprint = Arc::new(PortalBlueprint::genesis());
    let mut shell = TabShell::new(Arc::clone(&blueprint));
    let (mut form, _) = DraftForm::open(blueprint, Arc::new(MemoryDraftStore::default()));

    shell
        .choose_challenge("Sustainable Cities", &mut form)
        .expect("track is open");
    assert_eq!(shell.active_tab(), "apply");
    assert_eq!(form.record().text("challengeTrack"), Some("Sustainable Cities"));

    assert!(matches!(
        shell.choose_challenge("Deep Space", &mut form),
        Err(ShellError::UnknownTrack(_))
    ));
}

#[tokio::test(start_paused = true)]
async fn notices_expire_after_the_portal_delay() {
    let mut shell = shell(PortalBlueprint::genesis());
    shell.announce_draft_saved();
    assert_eq!(
        shell.notice().map(|notice| notice.message),
        Some("Draft saved locally.".to_string())
    );

    tokio::time::sleep(Duration::from_millis(2400)).await;
    assert!(shell.notice().is_some());

    tokio::time::sleep(Duration::from_millis(200)).await;
    assert!(shell.notice().is_none());
}
