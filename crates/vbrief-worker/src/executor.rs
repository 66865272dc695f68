//! Queue-draining worker loop.
//!
//! A single consumer drains the queue in passes. Each pass snapshots the
//! queue, runs every eligible job through the processor, and commits the
//! survivors in one write; jobs enqueued while the pass ran are preserved
//! by the commit. Failed jobs pick up backoff bookkeeping and, once out of
//! attempts, move to the dead-letter file.

use chrono::Utc;
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use vbrief_models::Job;
use vbrief_queue::JobQueue;

use crate::config::WorkerConfig;
use crate::error::{WorkerError, WorkerResult};
use crate::processor::JobProcessor;
use crate::retry::RetryPolicy;

/// Single-consumer worker loop.
pub struct WorkerLoop {
    config: WorkerConfig,
    queue: JobQueue,
    processor: JobProcessor,
    retry: RetryPolicy,
    shutdown: watch::Sender<bool>,
}

impl WorkerLoop {
    /// Create a new worker loop over `queue`.
    pub fn new(config: WorkerConfig, queue: JobQueue, processor: JobProcessor) -> Self {
        let retry = config.retry_policy();
        let (shutdown, _) = watch::channel(false);

        Self {
            config,
            queue,
            processor,
            retry,
            shutdown,
        }
    }

    /// Signal shutdown. The job in flight finishes its round and the pass
    /// commits before the loop stops.
    pub fn shutdown(&self) {
        let _ = self.shutdown.send(true);
    }

    fn shutdown_requested(&self) -> bool {
        *self.shutdown.borrow()
    }

    /// Run until shutdown is signalled.
    pub async fn run(&self) -> WorkerResult<()> {
        info!(
            queue = %self.queue.queue_path().display(),
            poll_secs = self.config.poll_interval.as_secs(),
            max_attempts = self.retry.max_attempts,
            "starting worker loop"
        );

        let mut shutdown_rx = self.shutdown.subscribe();

        loop {
            if *shutdown_rx.borrow() {
                info!("shutdown signal received, stopping worker");
                break;
            }

            let idle = match self.run_pass().await {
                Ok(attempted) => attempted == 0,
                Err(e) => {
                    error!(error = %e, "queue pass failed");
                    true
                }
            };

            // A draining pass loops straight into the next tick; an idle
            // tick waits out the poll interval.
            if idle {
                tokio::select! {
                    _ = shutdown_rx.changed() => {}
                    _ = tokio::time::sleep(self.config.poll_interval) => {}
                }
            }
        }

        info!("worker loop stopped");
        Ok(())
    }

    /// Run one drain pass. Returns the number of jobs attempted.
    pub async fn run_pass(&self) -> WorkerResult<usize> {
        let snapshot = self.queue.load()?;
        if snapshot.is_empty() {
            return Ok(0);
        }

        let now = Utc::now();
        if !snapshot.iter().any(|job| job.is_eligible(now)) {
            debug!(queued = snapshot.len(), "no eligible jobs, waiting");
            return Ok(0);
        }

        info!(queued = snapshot.len(), "draining queue");

        let mut survivors: Vec<Job> = Vec::new();
        let mut attempted = 0;

        for job in &snapshot {
            if !job.is_eligible(now) || self.shutdown_requested() {
                survivors.push(job.clone());
                continue;
            }

            attempted += 1;
            info!(url = %job.url, attempts = job.attempts, "processing job");

            match self.processor.process(job).await {
                Ok(video_id) => {
                    info!(url = %job.url, video_id = %video_id, "job completed");
                }
                Err(e) => {
                    if let Some(survivor) = self.handle_failure(job, &e) {
                        survivors.push(survivor);
                    }
                }
            }
        }

        self.queue.commit_pass(&snapshot, survivors)?;
        Ok(attempted)
    }

    /// Record a failed round. Returns the survivor to keep queued, or
    /// `None` when the job moved to the dead-letter file.
    fn handle_failure(&self, job: &Job, error: &WorkerError) -> Option<Job> {
        let now = Utc::now();
        let failed = job
            .clone()
            .after_failure(self.retry.next_attempt_at(now, job.attempts));

        if self.retry.is_exhausted(failed.attempts) {
            error!(
                url = %failed.url,
                attempts = failed.attempts,
                stage = error.stage(),
                error = %error,
                "job out of attempts, moving to dead letter file"
            );
            let url = failed.url.clone();
            if let Err(dl_err) = self.queue.dead_letter(failed.clone(), &error.to_string()) {
                // A job we cannot park stays queued rather than vanishing.
                error!(url = %url, error = %dl_err, "dead-letter write failed, keeping job queued");
                return Some(failed);
            }
            None
        } else {
            warn!(
                url = %failed.url,
                attempts = failed.attempts,
                stage = error.stage(),
                error = %error,
                next_attempt_at = ?failed.next_attempt_at,
                "job failed, will retry"
            );
            Some(failed)
        }
    }
}
