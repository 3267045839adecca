use std::time::Duration;

use async_trait::async_trait;

use crate::errors::FetchError;

const USER_AGENT: &str = "deck-iptv";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Capability that turns a playlist identifier into raw playlist text.
///
/// The resolver never performs I/O itself; everything goes through this.
#[async_trait]
pub trait PlaylistFetcher: Send + Sync {
    async fn fetch(&self, identifier: &str) -> Result<String, FetchError>;
}

/// Fetches playlists over HTTP(S)
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpFetcher {
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self { client }
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PlaylistFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let request_error = |e: reqwest::Error| FetchError::Request {
            url: url.to_string(),
            message: e.to_string(),
        };

        let resp = self.client.get(url).send().await.map_err(request_error)?;
        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Http {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        resp.text().await.map_err(request_error)
    }
}

/// Reads playlists from the local filesystem
#[derive(Debug, Clone, Default)]
pub struct FileFetcher;

#[async_trait]
impl PlaylistFetcher for FileFetcher {
    async fn fetch(&self, path: &str) -> Result<String, FetchError> {
        tokio::fs::read_to_string(path)
            .await
            .map_err(|e| FetchError::Io {
                path: path.to_string(),
                message: e.to_string(),
            })
    }
}

/// Routes `http`/`https` identifiers to [`HttpFetcher`] and everything else to [`FileFetcher`]
#[derive(Debug, Clone, Default)]
pub struct SourceFetcher {
    http: HttpFetcher,
    file: FileFetcher,
}

impl SourceFetcher {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Whether an identifier names a remote playlist
pub fn is_remote(identifier: &str) -> bool {
    identifier
        .get(..4)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("http"))
}

#[async_trait]
impl PlaylistFetcher for SourceFetcher {
    async fn fetch(&self, identifier: &str) -> Result<String, FetchError> {
        if is_remote(identifier) {
            self.http.fetch(identifier).await
        } else {
            self.file.fetch(identifier).await
        }
    }
}

/// M3U download URL of an Xtream Codes account
pub fn xtream_playlist_url(base_url: &str, username: &str, password: &str) -> String {
    let base_url = base_url.strip_suffix('/').unwrap_or(base_url);
    format!(
        "{}/get.php?username={}&password={}&type=m3u",
        base_url, username, password
    )
}
