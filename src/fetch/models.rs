use std::path::PathBuf;

use serde::Deserialize;

use crate::domain::{DownloadRequest, OutputKind};

/// One unit of work for the fetcher.
#[derive(Debug, Clone)]
pub struct FetchJob {
    pub url: String,
    /// Full output path; may still contain `%(...)s` placeholders that the
    /// fetcher resolves from remote metadata.
    pub output_template: PathBuf,
    pub format_selector: String,
}

impl FetchJob {
    /// Builds the collaborator's work order for a validated request.
    ///
    /// Audio asks for the best m4a track with an mp3 fallback; video asks for
    /// the best mp4 stream at exactly the requested height plus matching
    /// audio, falling back to the best combined mp4.
    pub fn for_request(request: &DownloadRequest, output_template: PathBuf) -> Self {
        let format_selector = match (request.kind, request.quality) {
            (OutputKind::VideoWithAudio, Some(q)) => format!(
                "bestvideo[height={}][ext=mp4]+bestaudio[ext=m4a]/best[ext=mp4]",
                q.0
            ),
            _ => "bestaudio[ext=m4a]/best[ext=mp3]".to_string(),
        };

        Self {
            url: request.url.clone(),
            output_template,
            format_selector,
        }
    }
}

/// Raw progress record as printed by the external binary, one JSON object
/// per line: `{"status":"downloading","percent":" 42.3%"}` while data flows,
/// then `{"status":"finished","percent":"100%"}`.
#[derive(Debug, Clone, Deserialize)]
pub struct RawProgress {
    pub status: String,
    #[serde(default)]
    pub percent: String,
}
