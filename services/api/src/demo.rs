use crate::infra::{FixedStatusSource, InMemoryApplicationRegistry};
use clap::Args;
use scheme_portal::error::AppError;
use scheme_portal::portals::{
    DraftStore, EligibilityAnswers, FieldKind, FieldValue, MemoryDraftStore, PortalService,
    PortalServiceError, ReviewConsole, ReviewDecision, ReviewEntry, ReviewError, SchemeId,
    StatusSource, SubmissionSink,
};
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Limit the walkthrough to one scheme (samridh or genesis)
    #[arg(long)]
    pub(crate) scheme: Option<SchemeId>,
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let registry = Arc::new(InMemoryApplicationRegistry::default());
    let service = PortalService::new(
        Arc::new(MemoryDraftStore::default()),
        Arc::clone(&registry),
        Arc::new(FixedStatusSource::demo()),
    )?;

    let schemes = match args.scheme {
        Some(scheme) => vec![scheme],
        None => SchemeId::ordered().to_vec(),
    };

    println!("Scheme portal demo");
    for scheme in schemes {
        demo_portal(&service, scheme)?;
    }

    println!("\nRegistered applications:");
    for (receipt, draft) in registry.received() {
        println!(
            "  {} ({}, {} fields)",
            receipt.application_id,
            receipt.scheme,
            draft.len()
        );
    }
    Ok(())
}

fn sample_answers(scheme: SchemeId) -> EligibilityAnswers {
    match scheme {
        SchemeId::Samridh => EligibilityAnswers::new()
            .flag("incorporated", true)
            .flag("dpiit", true)
            .flag("ip", true)
            .flag("revenue", true)
            .flag("accelerator", false),
        SchemeId::Genesis => EligibilityAnswers::new()
            .flag("incorporated", true)
            .flag("dpiit", true)
            .choice("revenue", "<50L")
            .choice("ipStatus", "filed"),
    }
}

fn sample_fields(scheme: SchemeId) -> Vec<(&'static str, FieldValue)> {
    match scheme {
        SchemeId::Samridh => vec![
            ("orgName", FieldValue::text("Agnika Tech Pvt Ltd")),
            ("state", FieldValue::text("Karnataka")),
            ("teamSize", FieldValue::Number(14.0)),
            ("productName", FieldValue::text("Agnika Vitals")),
            ("tractionUsers", FieldValue::Number(3200.0)),
            ("askAmount", FieldValue::Number(4_000_000.0)),
            ("coFunding", FieldValue::Number(1_000_000.0)),
        ],
        SchemeId::Genesis => vec![
            ("orgName", FieldValue::text("Sarvam Civic Labs")),
            ("contact", FieldValue::text("Meera Iyer")),
            ("email", FieldValue::text("meera@sarvamcivic.in")),
            (
                "problemStatement",
                FieldValue::text("Grievance redressal in urban local bodies is slow"),
            ),
        ],
    }
}

fn demo_portal<S, K, T>(
    service: &PortalService<S, K, T>,
    scheme: SchemeId,
) -> Result<(), AppError>
where
    S: DraftStore + 'static,
    K: SubmissionSink + 'static,
    T: StatusSource + 'static,
{
    let blueprint = service.blueprint(scheme)?;
    let mut shell = service.open_shell(scheme)?;

    println!("\n== {} ==", blueprint.title);
    let tabs: Vec<&str> = shell.visible_tabs().iter().map(|tab| tab.label).collect();
    println!("Tabs: {}", tabs.join(" | "));

    let outcome = service.evaluate(scheme, &sample_answers(scheme))?;
    println!(
        "Eligibility: {} (score {}/100, {} of {} answered)",
        outcome.verdict_label, outcome.score, outcome.answered, outcome.total
    );
    if let Err(err) = shell.start_application(&outcome) {
        println!("Cannot apply yet: {err}");
        return Ok(());
    }

    let (mut form, warning) = service.open_form(scheme)?;
    if let Some(warning) = warning {
        println!("Stored draft ignored: {warning}");
    }
    if let Some(track) = blueprint.challenge_tracks.get(1) {
        match shell.choose_challenge(track, &mut form) {
            Ok(()) => println!("Challenge track: {track}"),
            Err(err) => println!("Challenge track not set: {err}"),
        }
    }
    for (key, value) in sample_fields(scheme) {
        form.set_field(key, value).map_err(PortalServiceError::from)?;
    }
    let uploads = blueprint
        .steps
        .iter()
        .flat_map(|step| step.fields.iter())
        .find(|field| field.kind == FieldKind::Files);
    if let Some(field) = uploads {
        form.add_document(field.key, "pitch-deck.pdf")
            .map_err(PortalServiceError::from)?;
    }
    form.save_draft().map_err(PortalServiceError::from)?;
    shell.announce_draft_saved();
    if let Some(notice) = shell.notice() {
        println!("Notice: {}", notice.message);
    }

    let mut visited = Vec::new();
    loop {
        if let Some(step) = form.current_step() {
            visited.push(step.label);
        }
        if form.is_last_step() {
            break;
        }
        form.next();
    }
    println!("Form steps: {}", visited.join(" -> "));

    let receipt = service
        .submit_form(&mut form)?
        .ok_or(PortalServiceError::NotSupported {
            scheme,
            feature: "submission before the final step",
        })?;
    println!(
        "Submitted {} at {}",
        receipt.application_id,
        receipt.submitted_at.format("%Y-%m-%d %H:%M UTC")
    );
    shell.record_submission(receipt);
    if let Some(notice) = shell.notice() {
        println!("Notice: {}", notice.message);
    }

    let status = service.status(scheme)?;
    println!("Status ({}):", status.current_stage);
    for marker in &status.stages {
        let mark = if marker.current {
            ">"
        } else if marker.reached {
            "x"
        } else {
            " "
        };
        println!("  [{mark}] {}", marker.label);
    }
    for milestone in &status.milestones {
        println!(
            "  milestone: {} due {} ({})",
            milestone.title,
            milestone.due,
            milestone.status.label()
        );
    }

    if blueprint.rubric.is_some() {
        let mut console = service.review_console(scheme)?;
        let entry = shortlist_sample(&mut console).map_err(PortalServiceError::from)?;
        println!(
            "Review: {} {} with {}/100",
            entry.record.organization,
            ReviewDecision::Shortlisted.label(),
            entry.saved_total.unwrap_or_default()
        );
    }

    let dashboard = service.dashboard(scheme)?;
    let kpis: Vec<String> = dashboard
        .kpis
        .iter()
        .map(|kpi| format!("{} {}", kpi.title, kpi.value))
        .collect();
    println!("Dashboard: {}", kpis.join(", "));
    for series in &dashboard.series {
        if let Some(peak) = series.peak() {
            println!("  {}: peak {} ({})", series.name, peak.label, peak.value);
        }
    }

    Ok(())
}

fn shortlist_sample(console: &mut ReviewConsole) -> Result<&ReviewEntry, ReviewError> {
    console.select("APP-1001")?;
    console.set_score("team", 4)?;
    console.set_score("market", 4)?;
    console.set_score("innovation", 5)?;
    console.decide(ReviewDecision::Shortlisted)
}
