//! Single-job processing round.
//!
//! One round turns a queued URL into a persisted report and a delivered
//! notification. Stages run strictly in order and a round has no partial
//! credit: any stage failure fails the whole round, and a retry starts over
//! from the first stage.

use std::time::Duration;

use tracing::debug;

use vbrief_models::{extract_video_id, Job, Report, VideoId};
use vbrief_notify::{Notifier, TelegramNotifier};
use vbrief_reports::ReportStore;
use vbrief_summarizer::{question_prompt, summary_prompt, SummaryClient};
use vbrief_transcript::{SourceChain, TimedTextSource};

use crate::config::WorkerConfig;
use crate::error::{WorkerError, WorkerResult};

/// Runs the summarization round for one job.
pub struct JobProcessor {
    transcripts: SourceChain,
    summarizer: SummaryClient,
    reports: ReportStore,
    notifier: Box<dyn Notifier>,
}

impl JobProcessor {
    pub fn new(
        transcripts: SourceChain,
        summarizer: SummaryClient,
        reports: ReportStore,
        notifier: Box<dyn Notifier>,
    ) -> Self {
        Self {
            transcripts,
            summarizer,
            reports,
            notifier,
        }
    }

    /// Build a processor with environment-backed collaborators.
    ///
    /// The caption chain tries manually-authored tracks before
    /// speech-recognition tracks, each in the configured language order.
    pub fn from_config(config: &WorkerConfig) -> WorkerResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| WorkerError::config_error(format!("HTTP client build failed: {e}")))?;
        let transcripts = SourceChain::new(
            vec![
                Box::new(TimedTextSource::manual(
                    client.clone(),
                    config.timedtext_url.clone(),
                )),
                Box::new(TimedTextSource::auto_generated(
                    client,
                    config.timedtext_url.clone(),
                )),
            ],
            config.languages(),
        );

        Ok(Self {
            transcripts,
            summarizer: SummaryClient::from_env()?,
            reports: ReportStore::from_env()?,
            notifier: Box::new(TelegramNotifier::from_env()?),
        })
    }

    /// Run one round for `job`. Returns the derived video ID on success.
    pub async fn process(&self, job: &Job) -> WorkerResult<VideoId> {
        let video_id = extract_video_id(&job.url)?;
        debug!(url = %job.url, video_id = %video_id, "video id derived");

        let transcript = self.transcripts.fetch(&video_id).await?;
        let text = transcript.full_text();
        debug!(
            video_id = %video_id,
            segments = transcript.segments.len(),
            chars = text.chars().count(),
            "transcript acquired"
        );

        let prompt = match &job.query {
            Some(question) => question_prompt(&text, question),
            None => summary_prompt(&text),
        };

        let summary = self.summarizer.summarize(&prompt).await?;
        debug!(video_id = %video_id, chars = summary.chars().count(), "summary produced");

        let report = Report::new(&job.url, summary);
        self.reports.persist(&video_id, &report)?;

        self.notifier.notify(&job.url, &report.summary).await?;

        Ok(video_id)
    }
}
