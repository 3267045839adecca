use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

use crate::api::xtream_playlist_url;
use crate::errors::ConfigError;
use crate::models::{Channel, PlaylistEntry, PlaylistKind};
use crate::resolver::default_fallbacks;

/// How many playlists `recent_playlists` returns
pub const RECENT_PLAYLIST_LIMIT: usize = 5;

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct ParentalSettings {
    pub enabled: bool,
    pub pin: Option<String>,
}

/// Last channel the user played, restored on start-up
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct LastPlayed {
    pub name: String,
    pub url: String,
    pub logo: Option<String>,
}

impl LastPlayed {
    pub fn to_channel(&self) -> Channel {
        Channel {
            logo_url: self.logo.clone(),
            ..Channel::new(self.name.clone(), self.url.clone())
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub playlists: Vec<PlaylistEntry>,
    #[serde(default)]
    pub active_playlist_id: Option<String>,
    /// Stream URLs
    #[serde(default)]
    pub favorites: HashSet<String>,
    /// Stream URLs
    #[serde(default)]
    pub hidden_channels: HashSet<String>,
    #[serde(default)]
    pub show_hidden: bool,
    #[serde(default)]
    pub parental: ParentalSettings,
    #[serde(default)]
    pub autoplay_last: bool,
    #[serde(default)]
    pub use_external_player: bool,
    #[serde(default)]
    pub start_on_boot: bool,
    #[serde(default)]
    pub disclaimer_accepted: bool,
    #[serde(default)]
    pub last_played: Option<LastPlayed>,
    #[serde(default = "default_fallbacks")]
    pub fallback_playlists: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            playlists: Vec::new(),
            active_playlist_id: None,
            favorites: HashSet::new(),
            hidden_channels: HashSet::new(),
            show_hidden: false,
            parental: ParentalSettings::default(),
            autoplay_last: false,
            use_external_player: false,
            start_on_boot: false,
            disclaimer_accepted: false,
            last_played: None,
            fallback_playlists: default_fallbacks(),
        }
    }
}

fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

impl AppConfig {
    /// Default location: `<config dir>/deck-iptv/config.json`
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        ProjectDirs::from("com", "deck", "deck-iptv")
            .map(|dirs| dirs.config_dir().join("config.json"))
            .ok_or(ConfigError::NoConfigDir)
    }

    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::default_path()?)
    }

    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::default_path()?)
    }

    /// Missing file means a fresh install; anything unreadable is an error.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(AppConfig::default());
        }
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let io_error = |source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        };
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).map_err(io_error)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content).map_err(io_error)
    }

    fn push_playlist(&mut self, name: String, kind: PlaylistKind, url: String) -> &PlaylistEntry {
        let entry = PlaylistEntry {
            id: uuid::Uuid::new_v4().to_string(),
            name,
            kind,
            url,
            created_at: now_millis(),
            last_used_at: None,
        };
        self.active_playlist_id = Some(entry.id.clone());
        self.playlists.push(entry);
        &self.playlists[self.playlists.len() - 1]
    }

    /// Register a playlist URL (or local path) and make it active
    pub fn add_playlist_url(&mut self, name: Option<&str>, url: &str) -> &PlaylistEntry {
        let name = name
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or("Playlist")
            .to_string();
        let kind = if crate::api::is_remote(url) {
            PlaylistKind::Url
        } else {
            PlaylistKind::File
        };
        self.push_playlist(name, kind, url.to_string())
    }

    /// Register an Xtream Codes account through its M3U endpoint and make it active
    pub fn add_playlist_xtream(
        &mut self,
        name: Option<&str>,
        base_url: &str,
        username: &str,
        password: &str,
    ) -> &PlaylistEntry {
        let name = name
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or("Xtream")
            .to_string();
        let url = xtream_playlist_url(base_url, username, password);
        self.push_playlist(name, PlaylistKind::Xtream, url)
    }

    pub fn touch_playlist(&mut self, id: &str) {
        let now = now_millis();
        if let Some(entry) = self.playlists.iter_mut().find(|p| p.id == id) {
            entry.last_used_at = Some(now);
        }
    }

    /// Returns false when no playlist has that id
    pub fn set_active_playlist(&mut self, id: Option<&str>) -> bool {
        match id {
            Some(id) => {
                if !self.playlists.iter().any(|p| p.id == id) {
                    return false;
                }
                self.active_playlist_id = Some(id.to_string());
                self.touch_playlist(id);
                true
            }
            None => {
                self.active_playlist_id = None;
                true
            }
        }
    }

    pub fn active_playlist(&self) -> Option<&PlaylistEntry> {
        let id = self.active_playlist_id.as_deref()?;
        self.playlists.iter().find(|p| p.id == id)
    }

    /// URL of the active playlist, else the first fallback mirror
    pub fn active_playlist_url(&self) -> String {
        self.active_playlist()
            .map(|p| p.url.clone())
            .or_else(|| self.fallback_playlists.first().cloned())
            .unwrap_or_default()
    }

    pub fn recent_playlists(&self) -> Vec<&PlaylistEntry> {
        let mut recent: Vec<&PlaylistEntry> = self.playlists.iter().collect();
        recent.sort_by_key(|p| std::cmp::Reverse(p.recency()));
        recent.truncate(RECENT_PLAYLIST_LIMIT);
        recent
    }

    /// Returns true when the URL is a favorite afterwards
    pub fn toggle_favorite(&mut self, stream_url: &str) -> bool {
        if self.favorites.remove(stream_url) {
            false
        } else {
            self.favorites.insert(stream_url.to_string());
            true
        }
    }

    pub fn hide_channel(&mut self, stream_url: &str) {
        self.hidden_channels.insert(stream_url.to_string());
    }

    pub fn unhide_all(&mut self) {
        self.hidden_channels.clear();
    }

    pub fn set_show_hidden(&mut self, enabled: bool) {
        self.show_hidden = enabled;
    }

    pub fn set_autoplay_last(&mut self, enabled: bool) {
        self.autoplay_last = enabled;
    }

    pub fn set_use_external_player(&mut self, enabled: bool) {
        self.use_external_player = enabled;
    }

    pub fn set_start_on_boot(&mut self, enabled: bool) {
        self.start_on_boot = enabled;
    }

    pub fn enable_parental(&mut self, pin: &str) {
        self.disable_parental();
        self.parental.enabled = true;
        self.parental.pin = Some(pin.to_string());
    }

    pub fn disable_parental(&mut self) {
        self.parental.enabled = false;
        if let Some(mut old) = self.parental.pin.take() {
            old.zeroize();
        }
    }

    pub fn set_last_played(&mut self, channel: &Channel) {
        self.last_played = Some(LastPlayed {
            name: channel.name.clone(),
            url: channel.stream_url.clone(),
            logo: channel.logo_url.clone(),
        });
        if let Some(id) = self.active_playlist_id.clone() {
            self.touch_playlist(&id);
        }
    }

    pub fn accept_disclaimer(&mut self) {
        self.disclaimer_accepted = true;
    }
}
