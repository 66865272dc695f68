//! Report files on local disk.
//!
//! One JSON file per video, named `<video_id>.json`. Writes replace the
//! whole file atomically, so re-processing a video is last-write-wins and a
//! reader never sees a torn report.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{debug, warn};

use vbrief_models::{Report, VideoId};

use crate::error::ReportResult;

/// Report store configuration.
#[derive(Debug, Clone)]
pub struct ReportsConfig {
    /// Directory holding the report files.
    pub reports_dir: PathBuf,
}

impl Default for ReportsConfig {
    fn default() -> Self {
        Self {
            reports_dir: PathBuf::from("reports"),
        }
    }
}

impl ReportsConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self {
            reports_dir: std::env::var("REPORTS_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("reports")),
        }
    }
}

/// Directory-backed report store.
#[derive(Debug, Clone)]
pub struct ReportStore {
    dir: PathBuf,
}

impl ReportStore {
    /// Create a store over the configured directory, creating it if
    /// missing.
    pub fn new(config: ReportsConfig) -> ReportResult<Self> {
        fs::create_dir_all(&config.reports_dir)?;
        Ok(Self {
            dir: config.reports_dir,
        })
    }

    /// Create from environment variables.
    pub fn from_env() -> ReportResult<Self> {
        Self::new(ReportsConfig::from_env())
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the report file for a video.
    pub fn path_for(&self, video_id: &VideoId) -> PathBuf {
        self.dir.join(format!("{video_id}.json"))
    }

    /// Write the report for a video, replacing any previous one.
    pub fn persist(&self, video_id: &VideoId, report: &Report) -> ReportResult<()> {
        let target = self.path_for(video_id);

        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        serde_json::to_writer_pretty(&mut tmp, report)?;
        tmp.flush()?;
        tmp.as_file_mut().sync_all()?;
        tmp.persist(&target)?;

        debug!(video_id = %video_id, path = %target.display(), "report persisted");
        Ok(())
    }

    /// Read one report. Missing or unparseable files read as `None`;
    /// corruption is logged, not propagated.
    pub fn load(&self, video_id: &VideoId) -> Option<Report> {
        let path = self.path_for(video_id);
        read_report(&path)
    }

    /// All parseable reports, sorted by video ID for stable listings.
    pub fn list(&self) -> ReportResult<Vec<(VideoId, Report)>> {
        let mut reports = Vec::new();

        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            if let Some(report) = read_report(&path) {
                reports.push((VideoId::from(stem), report));
            }
        }

        reports.sort_by(|(a, _), (b, _)| a.as_str().cmp(b.as_str()));
        Ok(reports)
    }

    /// Remove one report. Returns whether a file was deleted.
    pub fn delete(&self, video_id: &VideoId) -> ReportResult<bool> {
        match fs::remove_file(self.path_for(video_id)) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

fn read_report(path: &Path) -> Option<Report> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "failed to open report file, skipping");
            return None;
        }
    };

    match serde_json::from_reader(file) {
        Ok(report) => Some(report),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "unparseable report file, skipping");
            None
        }
    }
}
