use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::api::PlaylistFetcher;
use crate::errors::{FetchError, PlaylistError};
use crate::models::Channel;
use crate::parser;

/// Public mirrors tried when the active playlist cannot be loaded
pub const DEFAULT_PLAYLIST_URLS: [&str; 2] = [
    "https://iptv-org.github.io/iptv/index.m3u",
    "https://raw.githubusercontent.com/iptv-org/iptv/master/index.m3u",
];

pub fn default_fallbacks() -> Vec<String> {
    DEFAULT_PLAYLIST_URLS.iter().map(|s| s.to_string()).collect()
}

/// Primary first (unless blank), then fallbacks, dropping exact duplicates.
pub fn candidate_order(primary: &str, fallbacks: &[String]) -> Vec<String> {
    let mut order: Vec<String> = Vec::with_capacity(fallbacks.len() + 1);
    let primary = (!primary.trim().is_empty()).then_some(primary);

    for candidate in primary.into_iter().chain(fallbacks.iter().map(String::as_str)) {
        if !order.iter().any(|c| c == candidate) {
            order.push(candidate.to_string());
        }
    }
    order
}

/// Loads a playlist from the first candidate source that can be fetched.
///
/// Candidates are tried strictly one after another, each exactly once.
pub struct PlaylistResolver<F> {
    fetcher: F,
    fallbacks: Vec<String>,
}

impl<F: PlaylistFetcher> PlaylistResolver<F> {
    pub fn new(fetcher: F, fallbacks: Vec<String>) -> Self {
        Self { fetcher, fallbacks }
    }

    /// Resolver using the public mirrors as fallbacks
    pub fn with_default_fallbacks(fetcher: F) -> Self {
        Self::new(fetcher, default_fallbacks())
    }

    pub fn fallbacks(&self) -> &[String] {
        &self.fallbacks
    }

    pub fn candidates(&self, primary: &str) -> Vec<String> {
        candidate_order(primary, &self.fallbacks)
    }

    /// Fetch and parse the first reachable candidate.
    ///
    /// The token is checked before every attempt; an in-flight fetch is not interrupted.
    pub async fn resolve(
        &self,
        primary: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<Channel>, PlaylistError> {
        let candidates = self.candidates(primary);
        let mut last_error: Option<FetchError> = None;

        for (attempted, candidate) in candidates.iter().enumerate() {
            if cancel.is_cancelled() {
                info!(attempted, "playlist resolution cancelled");
                return Err(PlaylistError::Cancelled { attempted });
            }

            info!(candidate = %candidate, "fetching playlist");
            match self.fetcher.fetch(candidate).await {
                Ok(content) => {
                    let channels = parser::parse(&content);
                    info!(candidate = %candidate, channels = channels.len(), "playlist loaded");
                    return Ok(channels);
                }
                Err(e) => {
                    warn!(candidate = %candidate, error = %e, "playlist source failed");
                    last_error = Some(e);
                }
            }
        }

        Err(PlaylistError::Exhausted {
            attempts: candidates.len(),
            last: last_error,
        })
    }
}
