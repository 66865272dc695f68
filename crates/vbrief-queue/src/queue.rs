//! File-backed job queue.
//!
//! The queue is a JSON array in a single file, read and written whole.
//! Writers lock a sidecar `.lock` file for the entire read-modify-write, so
//! producers in separate processes cannot interleave; writes go through a
//! temp file and an atomic rename, so a partially-written queue is never
//! observable. Dead letters live in their own file with the same
//! discipline.

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use fs2::FileExt;
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use vbrief_models::{DeadLetter, Job};

use crate::error::QueueResult;

/// Queue configuration.
#[derive(Debug, Clone)]
pub struct QueueConfig {
    /// Path of the queue file.
    pub queue_path: PathBuf,
    /// Path of the dead-letter file.
    pub dead_letter_path: PathBuf,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            queue_path: PathBuf::from("queue.json"),
            dead_letter_path: PathBuf::from("dead_letter.json"),
        }
    }
}

impl QueueConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self {
            queue_path: std::env::var("QUEUE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("queue.json")),
            dead_letter_path: std::env::var("DEAD_LETTER_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("dead_letter.json")),
        }
    }
}

/// Advisory exclusive lock on a sidecar file, released on drop.
struct FileLock {
    file: File,
}

impl FileLock {
    /// Block until the lock is held.
    fn acquire(path: &Path) -> QueueResult<Self> {
        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .truncate(false)
            .open(path)?;
        file.lock_exclusive()?;
        Ok(Self { file })
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        let _ = self.file.unlock();
    }
}

/// File-backed FIFO job queue.
///
/// Clones of this handle (or instances in other processes pointing at the
/// same paths) share state through the files alone.
#[derive(Debug, Clone)]
pub struct JobQueue {
    config: QueueConfig,
}

impl JobQueue {
    /// Create a queue over the configured files, creating parent
    /// directories as needed.
    pub fn new(config: QueueConfig) -> QueueResult<Self> {
        ensure_parent_dir(&config.queue_path)?;
        ensure_parent_dir(&config.dead_letter_path)?;
        Ok(Self { config })
    }

    /// Create from environment variables.
    pub fn from_env() -> QueueResult<Self> {
        Self::new(QueueConfig::from_env())
    }

    pub fn queue_path(&self) -> &Path {
        &self.config.queue_path
    }

    /// Read the current queue.
    ///
    /// A missing, empty, or unparseable file reads as an empty queue;
    /// corruption is logged and recovered from, never propagated.
    pub fn load(&self) -> QueueResult<Vec<Job>> {
        let _lock = self.lock_queue()?;
        Ok(self.read_jobs())
    }

    /// Overwrite the queue with exactly these jobs.
    pub fn save(&self, jobs: &[Job]) -> QueueResult<()> {
        let _lock = self.lock_queue()?;
        self.write_jobs(jobs)
    }

    /// Append a fresh job for `url` unless that exact URL is already
    /// queued. Returns whether an insertion happened.
    pub fn enqueue(&self, url: impl Into<String>) -> QueueResult<bool> {
        self.enqueue_job(Job::new(url))
    }

    /// Append `job` unless its URL is already queued.
    ///
    /// The lock is held across the whole read-modify-write, so concurrent
    /// producers racing on the same URL still yield a single entry.
    pub fn enqueue_job(&self, job: Job) -> QueueResult<bool> {
        let _lock = self.lock_queue()?;
        let mut jobs = self.read_jobs();

        if jobs.iter().any(|queued| queued.url == job.url) {
            debug!(url = %job.url, "url already queued, skipping");
            return Ok(false);
        }

        let url = job.url.clone();
        jobs.push(job);
        self.write_jobs(&jobs)?;
        info!(url = %url, "enqueued");
        Ok(true)
    }

    /// Commit the outcome of one drain pass.
    ///
    /// `snapshot` is what the pass was drained from, `survivors` is what it
    /// left over (retries and not-yet-eligible jobs, in pass order). Jobs
    /// that appeared in the file during the pass are kept after the
    /// survivors instead of being overwritten away. Returns the committed
    /// queue.
    pub fn commit_pass(&self, snapshot: &[Job], survivors: Vec<Job>) -> QueueResult<Vec<Job>> {
        let _lock = self.lock_queue()?;
        let current = self.read_jobs();

        let mut merged = survivors;
        for job in current {
            let in_snapshot = snapshot.iter().any(|s| s.url == job.url);
            let in_merged = merged.iter().any(|m| m.url == job.url);
            if !in_snapshot && !in_merged {
                debug!(url = %job.url, "keeping job enqueued mid-pass");
                merged.push(job);
            }
        }

        self.write_jobs(&merged)?;
        Ok(merged)
    }

    /// Park a job that exhausted its attempts.
    pub fn dead_letter(&self, job: Job, error: &str) -> QueueResult<()> {
        let _lock = FileLock::acquire(&lock_path_for(&self.config.dead_letter_path))?;
        let mut letters = self.read_dead_letters();

        warn!(url = %job.url, attempts = job.attempts, error, "dead-lettering job");
        letters.push(DeadLetter::new(job, error));
        write_json_atomic(&self.config.dead_letter_path, &letters)?;
        Ok(())
    }

    /// Read the dead-letter store.
    pub fn dead_letters(&self) -> QueueResult<Vec<DeadLetter>> {
        let _lock = FileLock::acquire(&lock_path_for(&self.config.dead_letter_path))?;
        Ok(self.read_dead_letters())
    }

    /// Current queue length.
    pub fn len(&self) -> QueueResult<usize> {
        Ok(self.load()?.len())
    }

    pub fn is_empty(&self) -> QueueResult<bool> {
        Ok(self.load()?.is_empty())
    }

    fn lock_queue(&self) -> QueueResult<FileLock> {
        FileLock::acquire(&lock_path_for(&self.config.queue_path))
    }

    /// Read jobs without taking the lock; callers hold it already.
    fn read_jobs(&self) -> Vec<Job> {
        read_json_or_empty(&self.config.queue_path, "queue")
    }

    /// Write jobs without taking the lock; callers hold it already.
    fn write_jobs(&self, jobs: &[Job]) -> QueueResult<()> {
        write_json_atomic(&self.config.queue_path, &jobs)
    }

    fn read_dead_letters(&self) -> Vec<DeadLetter> {
        read_json_or_empty(&self.config.dead_letter_path, "dead-letter")
    }
}

fn lock_path_for(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".lock");
    path.with_file_name(name)
}

fn ensure_parent_dir(path: &Path) -> QueueResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}

/// Parent directory for temp files, so the final rename stays on one
/// filesystem.
fn temp_dir_for(path: &Path) -> &Path {
    path.parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."))
}

fn read_json_or_empty<T: serde::de::DeserializeOwned>(path: &Path, what: &str) -> Vec<T> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Vec::new(),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "failed to read {what} file, treating as empty");
            return Vec::new();
        }
    };

    if raw.trim().is_empty() {
        return Vec::new();
    }

    match serde_json::from_str(&raw) {
        Ok(items) => items,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "corrupt {what} file, treating as empty");
            Vec::new()
        }
    }
}

fn write_json_atomic<T: serde::Serialize>(path: &Path, value: &T) -> QueueResult<()> {
    let mut tmp = NamedTempFile::new_in(temp_dir_for(path))?;
    serde_json::to_writer_pretty(&mut tmp, value)?;
    tmp.flush()?;
    tmp.as_file_mut().sync_all()?;
    tmp.persist(path)?;
    Ok(())
}
