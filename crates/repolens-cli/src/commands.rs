//! Foreground runs of the pipeline entry points.

use chrono::Utc;
use repolens_pipeline::{AnalyzeOutcome, Services, TickOutcome, TickReport};

pub(crate) async fn run_migrate(pool: &sqlx::PgPool) -> anyhow::Result<()> {
    let applied = repolens_db::run_migrations(pool).await?;
    println!("migrations applied: {applied}");
    Ok(())
}

/// # Errors
///
/// Fails when the tick could not run at all: no workflow template or no
/// topics. Per-candidate failures are only logged.
pub(crate) async fn run_tick(services: &Services) -> anyhow::Result<()> {
    match services.ingestor.run_batch_tick().await {
        TickOutcome::Completed(report) => {
            println!("{}", describe_tick(&report));
            Ok(())
        }
        TickOutcome::ImagesUnavailable => {
            anyhow::bail!("image workflow not loaded; check COMFYUI_WORKFLOW_PATH")
        }
        TickOutcome::NoTopics => anyhow::bail!("no discovery topics configured"),
    }
}

pub(crate) async fn run_analyze(services: &Services, url: &str) -> anyhow::Result<()> {
    let outcome = services.ingestor.analyze_url(url).await?;
    println!("{}", describe_analysis(&outcome));
    Ok(())
}

pub(crate) async fn run_regenerate(services: &Services, id: i64) -> anyhow::Result<()> {
    let image_url = services.ingestor.regenerate_image(id).await?;
    println!("profile {id}: {image_url}");
    Ok(())
}

/// Unlike the scheduled sweep, storage errors are returned.
pub(crate) async fn run_sweep(services: &Services) -> anyhow::Result<()> {
    let deleted = services.sweeper.sweep_at(Utc::now()).await?;
    println!("profiles deleted: {deleted}");
    Ok(())
}

pub(crate) fn describe_tick(report: &TickReport) -> String {
    format!(
        "{} page {}: {} discovered, {} prepared, {} stored",
        report.topic, report.page, report.discovered, report.prepared, report.stored
    )
}

pub(crate) fn describe_analysis(outcome: &AnalyzeOutcome) -> String {
    match outcome {
        AnalyzeOutcome::Stored {
            repo_full_name,
            image_url: Some(url),
        } => format!("{repo_full_name}: stored with image {url}"),
        AnalyzeOutcome::Stored {
            repo_full_name,
            image_url: None,
        } => format!("{repo_full_name}: stored without image"),
        AnalyzeOutcome::AlreadyStored { repo_full_name } => {
            format!("{repo_full_name}: already stored")
        }
        AnalyzeOutcome::NoReadme { repo_full_name } => format!("{repo_full_name}: no README"),
        AnalyzeOutcome::NoAnalysis { repo_full_name } => {
            format!("{repo_full_name}: summarizer returned nothing")
        }
    }
}
