//! Recurring ingestion and retention jobs.

use std::sync::Arc;

use repolens_core::AppConfig;
use repolens_pipeline::{Ingestor, RetentionSweeper, Services, TickOutcome};
use tokio_cron_scheduler::{Job, JobScheduler, JobSchedulerError};

/// Builds and starts the scheduler with the batch ingest tick and the
/// retention sweep.
///
/// The returned handle must be kept alive for the lifetime of the process;
/// dropping it shuts down all jobs.
///
/// # Errors
///
/// Returns [`JobSchedulerError`] if a cron expression does not parse or the
/// scheduler fails to start.
pub async fn build_scheduler(
    services: &Services,
    config: &AppConfig,
) -> Result<JobScheduler, JobSchedulerError> {
    let scheduler = JobScheduler::new().await?;

    scheduler
        .add(ingest_job(Arc::clone(&services.ingestor), &config.ingest_cron)?)
        .await?;
    scheduler
        .add(retention_job(Arc::clone(&services.sweeper), &config.retention_cron)?)
        .await?;

    scheduler.start().await?;
    tracing::info!(
        ingest = %config.ingest_cron,
        retention = %config.retention_cron,
        "scheduler: jobs registered"
    );
    Ok(scheduler)
}

/// One batch tick per firing. Ticks are not serialized against each other.
fn ingest_job(ingestor: Arc<Ingestor>, schedule: &str) -> Result<Job, JobSchedulerError> {
    Job::new_async(schedule, move |_uuid, _lock| {
        let ingestor = Arc::clone(&ingestor);

        Box::pin(async move {
            match ingestor.run_batch_tick().await {
                TickOutcome::Completed(report) => tracing::info!(
                    topic = %report.topic,
                    page = report.page,
                    discovered = report.discovered,
                    stored = report.stored,
                    "scheduler: ingest tick complete"
                ),
                TickOutcome::NoTopics => tracing::warn!("scheduler: no topics configured"),
                TickOutcome::ImagesUnavailable => {}
            }
        })
    })
}

fn retention_job(sweeper: Arc<RetentionSweeper>, schedule: &str) -> Result<Job, JobSchedulerError> {
    Job::new_async(schedule, move |_uuid, _lock| {
        let sweeper = Arc::clone(&sweeper);

        Box::pin(async move {
            sweeper.run().await;
        })
    })
}
