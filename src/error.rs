use thiserror::Error;

/// Failure kinds surfaced by the downloader.
#[derive(Debug, Error)]
pub enum SubDlError {
    #[error("You chose a non-existing release: {0}")]
    InvalidSelection(String),

    #[error("No releases in {0}.")]
    NoReleases(String),

    #[error("No subtitles found for {0}.")]
    NoSubtitles(String),

    #[error("{0} not installed or not found in PATH.")]
    PlayerNotFound(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("HTTP error {status} for {url}")]
    HttpStatus { status: u16, url: String },

    #[error("Could not parse page: {0}")]
    Parse(String),

    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("Archive contains no subtitle file")]
    EmptyArchive,

    #[error("{operation} '{path}': {source}")]
    Io {
        operation: &'static str,
        path: String,
        source: std::io::Error,
    },

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl SubDlError {
    pub fn io(operation: &'static str, path: &std::path::Path, source: std::io::Error) -> Self {
        SubDlError::Io {
            operation,
            path: path.display().to_string(),
            source,
        }
    }

    /// Errors that end the current release but leave the rest of the batch runnable.
    pub fn is_release_local(&self) -> bool {
        matches!(
            self,
            SubDlError::NoSubtitles(_)
                | SubDlError::Network(_)
                | SubDlError::HttpStatus { .. }
                | SubDlError::Parse(_)
                | SubDlError::Archive(_)
                | SubDlError::EmptyArchive
        )
    }
}

pub type Result<T> = std::result::Result<T, SubDlError>;
