use std::fmt;

use url::Url;

use crate::domain::AppError;

/// What the user asked for: a bare audio track or a full video.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputKind {
    AudioOnly,
    VideoWithAudio,
}

impl OutputKind {
    pub const ALL: [OutputKind; 2] = [OutputKind::AudioOnly, OutputKind::VideoWithAudio];
}

impl fmt::Display for OutputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputKind::AudioOnly => write!(f, "m4a (audio only)"),
            OutputKind::VideoWithAudio => write!(f, "mp4"),
        }
    }
}

/// Vertical resolution hint for video downloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution(pub u32);

impl Resolution {
    pub const ALL: [Resolution; 6] = [
        Resolution(144),
        Resolution(240),
        Resolution(360),
        Resolution(480),
        Resolution(720),
        Resolution(1080),
    ];
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}p", self.0)
    }
}

/// A validated download order. Immutable once handed to a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadRequest {
    pub url: String,
    pub kind: OutputKind,
    pub quality: Option<Resolution>,
}

impl DownloadRequest {
    /// Validates the form input. A quality hint is required for video and
    /// dropped for audio.
    pub fn new(
        url: &str,
        kind: OutputKind,
        quality: Option<Resolution>,
    ) -> Result<Self, AppError> {
        let url = url.trim();
        if url.is_empty() {
            return Err(AppError::EmptyUrl);
        }
        match Url::parse(url) {
            Ok(parsed) if parsed.scheme() == "http" || parsed.scheme() == "https" => {}
            _ => return Err(AppError::InvalidUrl),
        }

        let quality = match kind {
            OutputKind::AudioOnly => None,
            OutputKind::VideoWithAudio => Some(quality.ok_or(AppError::MissingQuality)?),
        };

        Ok(Self {
            url: url.to_string(),
            kind,
            quality,
        })
    }

    /// Output filename template, with `%(title)s`/`%(ext)s` left for the
    /// fetcher to resolve from remote metadata.
    pub fn output_filename(&self) -> String {
        match (self.kind, self.quality) {
            (OutputKind::VideoWithAudio, Some(q)) => format!("[{}p] %(title)s.%(ext)s", q.0),
            _ => "%(title)s.%(ext)s".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn audio_request_ignores_quality() {
        let req = DownloadRequest::new(
            "https://example.com/video",
            OutputKind::AudioOnly,
            Some(Resolution(720)),
        )
        .unwrap();
        assert_eq!(req.quality, None);
        assert_eq!(req.output_filename(), "%(title)s.%(ext)s");
    }

    #[test]
    fn audio_request_needs_no_quality() {
        let req = DownloadRequest::new("https://example.com/video", OutputKind::AudioOnly, None);
        assert!(req.is_ok());
    }

    #[test]
    fn video_request_requires_quality() {
        let err = DownloadRequest::new("https://example.com/video", OutputKind::VideoWithAudio, None)
            .unwrap_err();
        assert_eq!(err, AppError::MissingQuality);
    }

    #[test]
    fn video_filename_embeds_quality() {
        let req = DownloadRequest::new(
            "https://example.com/video",
            OutputKind::VideoWithAudio,
            Some(Resolution(720)),
        )
        .unwrap();
        assert_eq!(req.output_filename(), "[720p] %(title)s.%(ext)s");
    }

    #[test]
    fn empty_url_rejected() {
        let err = DownloadRequest::new("   ", OutputKind::AudioOnly, None).unwrap_err();
        assert_eq!(err, AppError::EmptyUrl);
    }

    #[test]
    fn non_http_url_rejected() {
        let err = DownloadRequest::new("ftp://example.com/v", OutputKind::AudioOnly, None)
            .unwrap_err();
        assert_eq!(err, AppError::InvalidUrl);
        let err = DownloadRequest::new("not a url", OutputKind::AudioOnly, None).unwrap_err();
        assert_eq!(err, AppError::InvalidUrl);
    }
}
