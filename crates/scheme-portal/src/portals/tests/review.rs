use crate::portals::{
    PortalBlueprint, ReviewConsole, ReviewDecision, ReviewError, Rubric, ValidationError,
};

fn console() -> ReviewConsole {
    let blueprint = PortalBlueprint::samridh();
    ReviewConsole::new(Rubric::samridh(), blueprint.review_queue).expect("queue not empty")
}

#[test]
fn queue_starts_at_neutral_scores() {
    let console = console();
    let ids: Vec<&str> = console
        .queue()
        .iter()
        .map(|entry| entry.record.id.as_str())
        .collect();
    assert_eq!(ids, vec!["APP-1001", "APP-1002", "APP-1003"]);
    assert_eq!(console.active().record.organization, "Agnika Tech");
    assert_eq!(console.total().expect("neutral scores valid"), 60);
}

#[test]
fn slider_input_is_clamped_into_range() {
    let mut console = console();
    assert_eq!(console.set_score("team", 9).expect("known criterion"), 5);
    assert_eq!(console.set_score("market", -2).expect("known criterion"), 1);
    assert!(matches!(
        console.set_score("charisma", 4),
        Err(ReviewError::Validation(ValidationError::UnknownField { .. }))
    ));

    // team 5 * .2 + market 1 * .25 + 3 * (.25 + .2 + .1) = 2.9
    assert_eq!(console.total().expect("scores valid"), 58);
}

#[test]
fn decisions_are_recorded_per_application() {
    let mut console = console();
    console.select("APP-1003").expect("in queue");
    for criterion in ["team", "market", "innovation", "scalability", "documentation"] {
        console.set_score(criterion, 5).expect("known criterion");
    }
    let entry = console
        .decide(ReviewDecision::Shortlisted)
        .expect("decision recorded");
    assert_eq!(entry.saved_total, Some(100));
    assert_eq!(entry.decision, Some(ReviewDecision::Shortlisted));

    console.select("APP-1002").expect("in queue");
    console.decide(ReviewDecision::Rejected).expect("decision recorded");

    let shortlisted: Vec<&str> = console
        .shortlisted()
        .map(|entry| entry.record.organization.as_str())
        .collect();
    assert_eq!(shortlisted, vec!["NexGrid"]);
    assert_eq!(console.queue()[0].decision, None);
}

#[test]
fn unknown_applications_and_empty_queues_are_rejected() {
    let mut console = console();
    assert!(matches!(
        console.select("APP-9999"),
        Err(ReviewError::UnknownApplication(_))
    ));
    assert_eq!(console.active().record.id, "APP-1001");

    assert!(matches!(
        ReviewConsole::new(Rubric::samridh(), Vec::new()),
        Err(ReviewError::EmptyQueue)
    ));
}
