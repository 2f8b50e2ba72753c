mod app;
mod application;
mod domain;
mod fetch;
mod ui;
mod utils;

fn main() -> iced::Result {
    tracing_subscriber::fmt::init();

    iced::application(app::DownloadApp::default, app::update, app::view)
        .title("Video Downloader")
        .run()
}
