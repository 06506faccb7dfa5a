use clap::{Args, ValueEnum};
use lead_intent::config::AppConfig;
use lead_intent::error::AppError;
use lead_intent::scoring::{
    classifier_from_config, leads_from_path, results_to_csv, Offer, ScoringError,
    ScoringOrchestrator, ScoringReport,
};
use lead_intent::telemetry;
use std::path::{Path, PathBuf};
use tracing::info;

const NAME_WIDTH: usize = 22;
const ROLE_WIDTH: usize = 24;
const COMPANY_WIDTH: usize = 18;
const REASONING_WIDTH: usize = 60;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    #[default]
    Table,
    Json,
    Csv,
}

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// Lead CSV with name, role, company, industry, location and linkedin_bio columns
    #[arg(long)]
    pub(crate) leads: PathBuf,
    /// Offer JSON with name, value_props and ideal_use_cases
    #[arg(long)]
    pub(crate) offer: PathBuf,
    /// Output format for the scored batch
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub(crate) format: OutputFormat,
    /// Override SCORING_MAX_CONCURRENCY for this run
    #[arg(long)]
    pub(crate) concurrency: Option<usize>,
}

pub(crate) async fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let offer = load_offer(&args.offer)?;
    let leads = leads_from_path(&args.leads)?;
    let classifier = classifier_from_config(&config.classifier)?
        .ok_or(ScoringError::ClassifierNotConfigured)?;

    let concurrency = args
        .concurrency
        .unwrap_or(config.scoring.max_concurrency);
    info!(
        leads = leads.len(),
        offer = %offer.name,
        concurrency,
        "scoring lead file"
    );

    let report = ScoringOrchestrator::new(classifier)
        .with_concurrency(concurrency)
        .run_batch(&leads, &offer)
        .await?;

    print!("{}", render(&report, args.format)?);
    Ok(())
}

pub(crate) fn load_offer(path: &Path) -> Result<Offer, AppError> {
    let raw = std::fs::read_to_string(path)?;
    let offer: Offer = serde_json::from_str(&raw)?;
    offer.validate()?;
    Ok(offer)
}

pub(crate) fn render(report: &ScoringReport, format: OutputFormat) -> Result<String, AppError> {
    match format {
        OutputFormat::Table => Ok(render_table(report)),
        OutputFormat::Json => {
            let mut rendered = serde_json::to_string_pretty(report)?;
            rendered.push('\n');
            Ok(rendered)
        }
        OutputFormat::Csv => Ok(results_to_csv(&report.results)?),
    }
}

fn render_table(report: &ScoringReport) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{:>3}  {:<NAME_WIDTH$}  {:<ROLE_WIDTH$}  {:<COMPANY_WIDTH$}  {:<6}  {:>5}  {}\n",
        "#", "Name", "Role", "Company", "Intent", "Score", "Reasoning"
    ));

    for (index, lead) in report.results.iter().enumerate() {
        let marker = if lead.error { " !" } else { "" };
        out.push_str(&format!(
            "{:>3}  {:<NAME_WIDTH$}  {:<ROLE_WIDTH$}  {:<COMPANY_WIDTH$}  {:<6}  {:>5}  {}{}\n",
            index + 1,
            clip(&lead.name, NAME_WIDTH),
            clip(&lead.role, ROLE_WIDTH),
            clip(&lead.company, COMPANY_WIDTH),
            lead.intent.label(),
            lead.score,
            clip(&lead.reasoning, REASONING_WIDTH),
            marker,
        ));
    }

    let summary = &report.summary;
    out.push_str(&format!(
        "\nTotal: {}  High: {}  Medium: {}  Low: {}  Average score: {}\n",
        summary.total, summary.high, summary.medium, summary.low, summary.average_score
    ));
    out
}

fn clip(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        return value.to_string();
    }
    let mut clipped: String = value.chars().take(width.saturating_sub(3)).collect();
    clipped.push_str("...");
    clipped
}
