use std::path::PathBuf;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tokio::sync::mpsc;

use super::models::{FetchJob, RawProgress};
use super::{FetchError, MediaFetcher, Result};

// One JSON object per progress tick on stdout, prefixed so it can't be
// mistaken for regular yt-dlp output.
const PROGRESS_TEMPLATE: &str =
    r#"download:{"status":"%(progress.status)s","percent":"%(progress._percent_str)s"}"#;

/// Locations of the two external binaries the fetcher shells out to.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub ytdlp_path: PathBuf,
    /// Directory holding the transcoding binary, passed through via
    /// `--ffmpeg-location`.
    pub ffmpeg_location: PathBuf,
}

impl Default for FetchConfig {
    fn default() -> Self {
        let ytdlp = if cfg!(target_os = "windows") {
            "yt-dlp.exe"
        } else {
            "yt-dlp"
        };
        let ffmpeg = if cfg!(target_os = "windows") {
            r"C:\ffmpeg\bin"
        } else {
            "/usr/bin"
        };

        Self {
            ytdlp_path: PathBuf::from(ytdlp),
            ffmpeg_location: PathBuf::from(ffmpeg),
        }
    }
}

/// Fetcher backed by the yt-dlp binary. Retrieval, format negotiation and
/// muxing all happen inside the child process.
pub struct YtDlpFetcher {
    config: FetchConfig,
}

impl YtDlpFetcher {
    pub fn new(config: FetchConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl MediaFetcher for YtDlpFetcher {
    async fn fetch(&self, job: FetchJob, progress: mpsc::Sender<RawProgress>) -> Result<()> {
        tracing::info!(url = %job.url, selector = %job.format_selector, "spawning yt-dlp");

        let mut child = Command::new(&self.config.ytdlp_path)
            .arg("-f")
            .arg(&job.format_selector)
            .arg("--ffmpeg-location")
            .arg(&self.config.ffmpeg_location)
            .arg("--no-playlist")
            .arg("--newline")
            .arg("--progress-template")
            .arg(PROGRESS_TEMPLATE)
            .arg("-o")
            .arg(&job.output_template)
            .arg(&job.url)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| FetchError::Process("downloader produced no output stream".into()))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| FetchError::Process("downloader produced no error stream".into()))?;

        // Drain stderr concurrently so a chatty child can't fill the pipe
        // and stall.
        let stderr_task = tokio::spawn(async move {
            let mut diagnostics = String::new();
            let mut lines = BufReader::new(stderr).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                if !diagnostics.is_empty() {
                    diagnostics.push('\n');
                }
                diagnostics.push_str(&line);
            }
            diagnostics
        });

        let mut lines = BufReader::new(stdout).lines();
        while let Some(line) = lines.next_line().await? {
            if let Some(record) = parse_progress_line(&line) {
                let _ = progress.send(record).await;
            }
        }

        let status = child.wait().await?;
        let diagnostics = stderr_task.await.unwrap_or_default();

        if !status.success() {
            let message = if diagnostics.trim().is_empty() {
                format!("downloader exited with {status}")
            } else {
                diagnostics.trim().to_string()
            };
            tracing::warn!(%status, "yt-dlp failed");
            return Err(FetchError::Process(message));
        }

        Ok(())
    }
}

fn parse_progress_line(line: &str) -> Option<RawProgress> {
    let payload = line.trim().strip_prefix("download:")?;
    serde_json::from_str(payload).ok()
}
