use crate::demo::{run_demo, DemoArgs};
use crate::infra::{parse_answer, parse_score};
use crate::server;
use clap::{Args, Parser, Subcommand};
use scheme_portal::error::AppError;
use scheme_portal::portals::{
    clamp_score, AnswerValue, EligibilityAnswers, EligibilityEngine, PortalBlueprint,
    PortalServiceError, RubricScores, SchemeId, ValidationError, MAX_SCORE, MIN_SCORE,
};

#[derive(Parser, Debug)]
#[command(
    name = "Scheme Portal",
    about = "Run and explore the SAMRIDH and GENESIS application portals from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Score eligibility answers against a scheme's policy
    Eligibility(EligibilityArgs),
    /// Compute the weighted reviewer rubric total
    Rubric(RubricArgs),
    /// Walk through both portals end to end
    Demo(DemoArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

#[derive(Args, Debug)]
pub(crate) struct EligibilityArgs {
    /// Scheme whose policy applies (samridh or genesis)
    #[arg(long)]
    pub(crate) scheme: SchemeId,
    /// Answer as key=value; yes/no values become flags, others are options
    #[arg(long = "answer", value_parser = parse_answer)]
    pub(crate) answers: Vec<(String, AnswerValue)>,
}

#[derive(Args, Debug)]
pub(crate) struct RubricArgs {
    /// Criterion score as key=value; unspecified criteria score 3
    #[arg(long = "score", value_parser = parse_score)]
    pub(crate) scores: Vec<(String, i64)>,
    /// Clamp scores into range instead of rejecting them
    #[arg(long)]
    pub(crate) clamp: bool,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Eligibility(args) => run_eligibility(args),
        Command::Rubric(args) => run_rubric(args),
        Command::Demo(args) => run_demo(args),
    }
}

fn run_eligibility(args: EligibilityArgs) -> Result<(), AppError> {
    let blueprint = PortalBlueprint::for_scheme(args.scheme);
    let engine = EligibilityEngine::new(blueprint.eligibility).map_err(PortalServiceError::from)?;

    let mut answers = EligibilityAnswers::new();
    for (key, value) in args.answers {
        answers.set(&key, Some(value));
    }
    let outcome = engine
        .evaluate(&answers)
        .map_err(PortalServiceError::from)?;

    println!("{} eligibility", args.scheme.label());
    for component in &outcome.components {
        println!(
            "  {:<14} {:>3} pts  {}",
            component.question, component.points, component.notes
        );
    }
    println!(
        "Score {}/100 ({} of {} answered, {} affirmative)",
        outcome.score, outcome.answered, outcome.total, outcome.affirmative
    );
    println!("Verdict: {} [{}]", outcome.verdict_label, outcome.verdict.label());
    if outcome.can_apply {
        println!("You can start an application.");
    }
    Ok(())
}

fn run_rubric(args: RubricArgs) -> Result<(), AppError> {
    let rubric = PortalBlueprint::samridh()
        .rubric
        .ok_or(PortalServiceError::NotSupported {
            scheme: SchemeId::Samridh,
            feature: "rubric",
        })?;

    let mut scores: RubricScores = rubric.neutral_scores();
    for (criterion, raw) in args.scores {
        let score = if args.clamp {
            clamp_score(raw)
        } else {
            u8::try_from(raw)
                .ok()
                .filter(|score| (MIN_SCORE..=MAX_SCORE).contains(score))
                .ok_or_else(|| ValidationError::OutOfRange {
                    field: criterion.clone(),
                    value: raw as f64,
                    min: f64::from(MIN_SCORE),
                    max: f64::from(MAX_SCORE),
                })
                .map_err(PortalServiceError::from)?
        };
        scores.insert(criterion, score);
    }

    let total = rubric.total(&scores).map_err(PortalServiceError::from)?;
    for criterion in rubric.criteria() {
        let score = scores.get(&criterion.key).copied().unwrap_or_default();
        println!(
            "  {:<14} {}  (weight {:.2})",
            criterion.key, score, criterion.weight
        );
    }
    println!("Weighted total: {total}/100");
    Ok(())
}
