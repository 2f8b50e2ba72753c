pub mod download_worker;
pub mod progress;

pub use download_worker::{CancelHandle, DownloadEvent, DownloadOutcome, DownloadTask};
