//! Per-video report files on local disk.

pub mod error;
pub mod store;

pub use error::{ReportError, ReportResult};
pub use store::{ReportStore, ReportsConfig};
