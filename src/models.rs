use serde::{Deserialize, Serialize};

/// One playable entry from an M3U playlist.
///
/// `stream_url` is the identity key: favorites, hidden channels and recents
/// all refer to a channel by it.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Channel {
    pub name: String,
    pub stream_url: String,
    pub logo_url: Option<String>,
    /// May hold several groups separated by `;`, `,` or `|`
    pub group_title: Option<String>,
    /// Same multi-value convention as `group_title`
    pub country: Option<String>,
    pub language: Option<String>,
    pub tvg_id: Option<String>,
    pub tvg_name: Option<String>,
}

impl Channel {
    /// Build a bare channel from a name and URL (used for last-played restore)
    pub fn new(name: impl Into<String>, stream_url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            stream_url: stream_url.into(),
            ..Default::default()
        }
    }

    /// Two channels are the same channel when their stream URLs match.
    pub fn same_channel(&self, other: &Channel) -> bool {
        self.stream_url == other.stream_url
    }
}

/// Facet dimension of a category
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CategoryType {
    Group,
    Country,
}

impl CategoryType {
    pub fn display_name(&self) -> &'static str {
        match self {
            CategoryType::Group => "Group",
            CategoryType::Country => "Country",
        }
    }

    /// Token used when a channel has no value for this facet
    pub fn fallback_token(&self) -> &'static str {
        match self {
            CategoryType::Group => "Undefined",
            CategoryType::Country => "Unknown",
        }
    }

    /// The multi-value channel field this facet is derived from
    pub fn field<'a>(&self, channel: &'a Channel) -> Option<&'a str> {
        match self {
            CategoryType::Group => channel.group_title.as_deref(),
            CategoryType::Country => channel.country.as_deref(),
        }
    }
}

impl std::fmt::Display for CategoryType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// A single group or country token with the number of channels carrying it.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct CategoryItem {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: CategoryType,
    pub count: usize,
}

impl CategoryItem {
    pub fn new(name: impl Into<String>, kind: CategoryType, count: usize) -> Self {
        Self {
            name: name.into(),
            kind,
            count,
        }
    }

    pub fn group(name: impl Into<String>) -> Self {
        Self::new(name, CategoryType::Group, 0)
    }

    pub fn country(name: impl Into<String>) -> Self {
        Self::new(name, CategoryType::Country, 0)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum PlaylistKind {
    Url,
    File,
    Xtream,
}

/// A playlist the user has registered
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PlaylistEntry {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: PlaylistKind,
    pub url: String,
    /// Unix milliseconds
    pub created_at: i64,
    #[serde(default)]
    pub last_used_at: Option<i64>,
}

impl PlaylistEntry {
    /// Timestamp used to rank recently used playlists
    pub fn recency(&self) -> i64 {
        self.last_used_at.unwrap_or(self.created_at)
    }
}
