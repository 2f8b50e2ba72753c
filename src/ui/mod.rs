use iced::widget::{button, column, pick_list, progress_bar, row, text, text_input, Space};
use iced::{Element, Length};

use crate::domain::{OutputKind, Resolution};

/// Main view state
pub struct DownloadView {
    pub url: String,
    pub kind: OutputKind,
    pub quality: Resolution,
    pub progress: u8,
    pub status_message: String,
    pub is_downloading: bool,
    pub ffmpeg_location: String,
}

impl Default for DownloadView {
    fn default() -> Self {
        Self {
            url: String::new(),
            kind: OutputKind::AudioOnly,
            quality: Resolution(720),
            progress: 0,
            status_message: "Paste a video link to download".to_string(),
            is_downloading: false,
            ffmpeg_location: String::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub enum DownloadMessage {
    UrlChanged(String),
    KindSelected(OutputKind),
    QualitySelected(Resolution),
    DownloadPressed,
    CancelPressed,
    BrowseFfmpegPressed,
}

impl DownloadView {
    pub fn update(&mut self, message: DownloadMessage) {
        match message {
            DownloadMessage::UrlChanged(url) => {
                self.url = url;
            }
            DownloadMessage::KindSelected(kind) => {
                self.kind = kind;
            }
            DownloadMessage::QualitySelected(quality) => {
                self.quality = quality;
            }
            // Handled by the app
            DownloadMessage::DownloadPressed
            | DownloadMessage::CancelPressed
            | DownloadMessage::BrowseFfmpegPressed => {}
        }
    }

    pub fn view(&self) -> Element<'_, DownloadMessage> {
        let mut form = column![
            text("Video Downloader").size(32),
            Space::new().height(Length::Fixed(20.0)),
            text_input("Paste a video link...", &self.url)
                .on_input(DownloadMessage::UrlChanged)
                .padding(10),
            Space::new().height(Length::Fixed(10.0)),
            pick_list(
                OutputKind::ALL,
                Some(self.kind),
                DownloadMessage::KindSelected
            ),
        ];

        // The resolution choice only applies to video downloads.
        if self.kind == OutputKind::VideoWithAudio {
            form = form.push(pick_list(
                Resolution::ALL,
                Some(self.quality),
                DownloadMessage::QualitySelected,
            ));
        }

        form = form
            .push(Space::new().height(Length::Fixed(10.0)))
            .push(
                row![
                    button("Download")
                        .on_press_maybe(
                            (!self.is_downloading).then_some(DownloadMessage::DownloadPressed)
                        )
                        .padding([10, 20]),
                    button("Cancel")
                        .on_press_maybe(
                            self.is_downloading.then_some(DownloadMessage::CancelPressed)
                        )
                        .padding([10, 20]),
                ]
                .spacing(10),
            )
            .push(progress_bar(0.0..=100.0, f32::from(self.progress)))
            .push(text(&self.status_message).size(14))
            .push(Space::new().height(Length::Fixed(10.0)))
            .push(
                row![
                    text(format!("ffmpeg: {}", self.ffmpeg_location)).size(12),
                    button("Browse…").on_press(DownloadMessage::BrowseFfmpegPressed),
                ]
                .spacing(10),
            );

        form.padding(20).spacing(10).into()
    }
}
