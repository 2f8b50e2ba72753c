use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AppError {
    #[error("Please enter a video link")]
    EmptyUrl,

    #[error("That doesn't look like a valid link")]
    InvalidUrl,

    #[error("Pick a resolution for video downloads")]
    MissingQuality,
}
