use crate::infra::InMemoryScoreStore;
use clap::Args;
use std::path::PathBuf;
use zakat_priority::config::AppConfig;
use zakat_priority::error::AppError;
use zakat_priority::scoring::{
    ApplicationId, ScoreResult, ScoreStore, ScoringEngine, ScoringInput, SnapshotImporter,
};

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// JSON file holding one application snapshot
    #[arg(long)]
    pub(crate) input: PathBuf,
    /// Application identifier recorded on the result
    #[arg(long, default_value = "adhoc")]
    pub(crate) application_id: String,
}

#[derive(Args, Debug)]
pub(crate) struct BatchArgs {
    /// CSV export of the joined applications query
    #[arg(long)]
    pub(crate) csv: PathBuf,
    /// Only print the first N applications by priority
    #[arg(long)]
    pub(crate) limit: Option<usize>,
}

pub(crate) fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let raw = std::fs::read_to_string(&args.input)?;
    let input: ScoringInput = serde_json::from_str(&raw)?;

    let engine = ScoringEngine::new(config.scoring);
    let result = engine.score(&ApplicationId(args.application_id), &input);

    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

pub(crate) fn run_batch(args: BatchArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let snapshots = SnapshotImporter::from_path(&args.csv)?;
    let engine = ScoringEngine::new(config.scoring);

    let store = InMemoryScoreStore::default();
    for (id, input) in &snapshots {
        store
            .upsert(engine.score(id, input))
            .map_err(|err| AppError::Scoring(err.into()))?;
    }

    let rows = store
        .ranked(args.limit.unwrap_or(snapshots.len()))
        .map_err(|err| AppError::Scoring(err.into()))?;

    println!("Priority queue ({} application(s))", rows.len());
    for stored in &rows {
        println!("{}", render_row(&stored.result));
    }
    Ok(())
}

fn render_row(result: &ScoreResult) -> String {
    format!(
        "{:<16} total {:>3}  financial {:>2}  household {:>2}  circumstances {:>2}  {}",
        result.application_id.0,
        result.total_priority_score,
        result.financial_score,
        result.household_score,
        result.circumstances_score,
        result.system_recommendation.label()
    )
}
