pub mod models;
pub mod ytdlp;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;

pub use models::{FetchJob, RawProgress};
pub use ytdlp::{FetchConfig, YtDlpFetcher};

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("I/O error talking to the downloader: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Process(String),
}

pub type Result<T> = std::result::Result<T, FetchError>;

/// Boundary to the external media-fetch collaborator. An implementation
/// performs retrieval and transcoding synchronously from the caller's point
/// of view, pushing raw progress records through `progress` along the way.
#[async_trait]
pub trait MediaFetcher: Send + Sync {
    async fn fetch(&self, job: FetchJob, progress: mpsc::Sender<RawProgress>) -> Result<()>;
}
