use std::path::PathBuf;
use std::sync::Arc;

use futures::StreamExt;
use iced::Task;

use crate::application::{CancelHandle, DownloadEvent, DownloadOutcome, DownloadTask};
use crate::domain::DownloadRequest;
use crate::fetch::{FetchConfig, MediaFetcher, YtDlpFetcher};
use crate::ui::{DownloadMessage, DownloadView};
use crate::utils;

pub struct DownloadApp {
    view: DownloadView,
    fetch_config: FetchConfig,
    fetcher: Arc<YtDlpFetcher>,
    // Handle to the single active task, if any
    active: Option<CancelHandle>,
}

impl Default for DownloadApp {
    fn default() -> Self {
        Self::new()
    }
}

impl DownloadApp {
    pub fn new() -> Self {
        let fetch_config = FetchConfig::default();
        let fetcher = Arc::new(YtDlpFetcher::new(fetch_config.clone()));
        let view = DownloadView {
            ffmpeg_location: fetch_config.ffmpeg_location.display().to_string(),
            ..Default::default()
        };

        Self {
            view,
            fetch_config,
            fetcher,
            active: None,
        }
    }
}

#[derive(Debug, Clone)]
pub enum Message {
    Ui(DownloadMessage),
    Worker(DownloadEvent),
    FfmpegLocationPicked(Option<PathBuf>),
}

pub fn update(app: &mut DownloadApp, message: Message) -> Task<Message> {
    match message {
        Message::Ui(ui_msg) => {
            app.view.update(ui_msg.clone());

            match ui_msg {
                DownloadMessage::DownloadPressed => return start_download(app),
                DownloadMessage::CancelPressed => {
                    if let Some(handle) = &app.active {
                        handle.cancel();
                        app.view.status_message =
                            "Canceling after the current transfer...".to_string();
                    }
                }
                DownloadMessage::BrowseFfmpegPressed => {
                    return Task::perform(
                        async {
                            rfd::AsyncFileDialog::new()
                                .pick_folder()
                                .await
                                .map(|handle| handle.path().to_path_buf())
                        },
                        Message::FfmpegLocationPicked,
                    );
                }
                _ => {}
            }
        }
        Message::Worker(DownloadEvent::Progress(pct)) => {
            app.view.progress = pct;
            app.view.status_message = format!("Downloading: {pct}%");
        }
        Message::Worker(DownloadEvent::Finished(outcome)) => {
            // Terminal event; its stream ends here, so this reset runs once.
            app.active = None;
            app.view.is_downloading = false;
            app.view.progress = 0;
            app.view.status_message = match outcome {
                DownloadOutcome::Completed => "Download complete!".to_string(),
                DownloadOutcome::Canceled => "Download canceled.".to_string(),
                DownloadOutcome::AlreadyExists => "File already exists!".to_string(),
                DownloadOutcome::Failed(message) => format!("Error: {message}"),
            };
        }
        Message::FfmpegLocationPicked(Some(path)) => {
            app.view.ffmpeg_location = path.display().to_string();
            app.fetch_config.ffmpeg_location = path;
            app.fetcher = Arc::new(YtDlpFetcher::new(app.fetch_config.clone()));
        }
        Message::FfmpegLocationPicked(None) => {}
    }
    Task::none()
}

fn start_download(app: &mut DownloadApp) -> Task<Message> {
    // One task at a time; the button is disabled while one runs, this is the
    // backstop.
    if app.active.is_some() {
        return Task::none();
    }

    let request =
        match DownloadRequest::new(&app.view.url, app.view.kind, Some(app.view.quality)) {
            Ok(request) => request,
            Err(e) => {
                app.view.status_message = e.to_string();
                return Task::none();
            }
        };

    let task = DownloadTask::new(request);
    app.active = Some(task.cancel_handle());
    app.view.is_downloading = true;
    app.view.progress = 0;
    app.view.status_message = "Starting download...".to_string();

    let fetcher: Arc<dyn MediaFetcher> = app.fetcher.clone();
    let stream = task.spawn(fetcher, utils::downloads_dir());
    Task::stream(stream.map(Message::Worker))
}

pub fn view(app: &DownloadApp) -> iced::Element<'_, Message> {
    app.view.view().map(Message::Ui)
}
