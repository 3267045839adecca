use thiserror::Error;

/// Failure to retrieve a single playlist candidate
#[derive(Debug, Error, Clone, PartialEq)]
pub enum FetchError {
    /// Server answered with a non-success status
    #[error("Server returned {status} for {url}")]
    Http { url: String, status: u16 },

    /// Request never completed (DNS, TLS, timeout, ...)
    #[error("Request to {url} failed: {message}")]
    Request { url: String, message: String },

    /// Local playlist could not be read
    #[error("Unable to open playlist {path}: {message}")]
    Io { path: String, message: String },
}

impl FetchError {
    /// Identifier of the candidate that failed
    pub fn source_id(&self) -> &str {
        match self {
            FetchError::Http { url, .. } | FetchError::Request { url, .. } => url,
            FetchError::Io { path, .. } => path,
        }
    }

    pub fn diagnostics(&self) -> String {
        match self {
            FetchError::Http { url, status } => {
                format!("Server Error\nURL: {}\nStatus: {}\nSuggestion: Check the playlist URL or try again later", url, status)
            }
            FetchError::Request { url, message } => {
                format!("Request Failed\nURL: {}\nError: {}\nSuggestion: Check your internet connection", url, message)
            }
            FetchError::Io { path, message } => {
                format!("File Error\nPath: {}\nError: {}\nSuggestion: Verify the file exists and is readable", path, message)
            }
        }
    }
}

/// Outcome of a failed playlist resolution
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PlaylistError {
    /// Every candidate was tried once and none could be fetched
    #[error("{}", exhausted_message(.last))]
    Exhausted {
        attempts: usize,
        last: Option<FetchError>,
    },

    /// Cancellation fired before the next candidate was tried
    #[error("Playlist loading cancelled after {attempted} attempt(s)")]
    Cancelled { attempted: usize },
}

impl PlaylistError {
    pub fn diagnostics(&self) -> String {
        match self {
            PlaylistError::Exhausted { attempts, last: Some(err) } => {
                format!("All {} playlist source(s) failed\n{}", attempts, err.diagnostics())
            }
            PlaylistError::Exhausted { attempts, last: None } => {
                format!("Failed to load playlist\nSources tried: {}\nSuggestion: Add a playlist URL", attempts)
            }
            PlaylistError::Cancelled { attempted } => {
                format!("Loading Cancelled\nSources tried: {}", attempted)
            }
        }
    }
}

fn exhausted_message(last: &Option<FetchError>) -> String {
    match last {
        Some(err) => err.to_string(),
        None => "failed to load playlist".to_string(),
    }
}

/// Failure to read or write the preferences file
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("No configuration directory available on this platform")]
    NoConfigDir,

    #[error("Config I/O error at {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Config file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}
