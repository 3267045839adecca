//! Derived view state for a channel list screen.
//!
//! [`ChannelBrowser`] holds the loaded channels plus the user's filter inputs
//! and recomputes every derived list whenever one of them changes.

use std::collections::HashSet;

use tracing::debug;
use zeroize::Zeroizing;

use crate::categories::build_categories;
use crate::config::AppConfig;
use crate::filter::{favorite_channels, filter_categories, FilterState};
use crate::models::{CategoryItem, Channel};

/// Maximum number of recently played channels kept
pub const RECENT_CHANNEL_LIMIT: usize = 10;

/// PIN gate in front of the channel list
#[derive(Debug, Default)]
pub struct ParentalLock {
    enabled: bool,
    pin: Option<Zeroizing<String>>,
    unlocked: bool,
}

impl ParentalLock {
    /// An enabled lock starts locked; a disabled one is always open.
    pub fn new(enabled: bool, pin: Option<&str>) -> Self {
        Self {
            enabled,
            pin: pin.map(|p| Zeroizing::new(p.to_string())),
            unlocked: !enabled,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_unlocked(&self) -> bool {
        !self.enabled || self.unlocked
    }

    /// Unlocks only on an exact PIN match
    pub fn unlock(&mut self, pin: &str) -> bool {
        if let Some(stored) = &self.pin {
            if stored.as_str() == pin {
                self.unlocked = true;
            }
        }
        self.is_unlocked()
    }

    pub fn lock(&mut self) {
        self.unlocked = false;
    }
}

#[derive(Debug, Default)]
pub struct ChannelBrowser {
    channels: Vec<Channel>,
    categories: Vec<CategoryItem>,
    filter: FilterState,
    favorite_ids: HashSet<String>,

    filtered_channels: Vec<Channel>,
    filtered_categories: Vec<CategoryItem>,
    favorite_channels: Vec<Channel>,
    recent_channels: Vec<Channel>,

    pub parental: ParentalLock,
}

impl ChannelBrowser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed favorites, hidden channels and the parental lock from saved preferences
    pub fn from_config(config: &AppConfig) -> Self {
        let mut browser = Self {
            favorite_ids: config.favorites.clone(),
            filter: FilterState {
                show_hidden: config.show_hidden,
                hidden_ids: config.hidden_channels.clone(),
                ..FilterState::default()
            },
            parental: ParentalLock::new(config.parental.enabled, config.parental.pin.as_deref()),
            ..Self::default()
        };
        browser.recompute();
        browser
    }

    /// Replace the channel list wholesale
    pub fn load_channels(&mut self, channels: Vec<Channel>) {
        self.categories = build_categories(&channels);
        self.channels = channels;
        self.recompute();
    }

    /// Apply a text search. Clears the selected category.
    pub fn set_query(&mut self, query: &str) {
        self.filter.query = query.to_string();
        self.filter.category = None;
        self.recompute();
    }

    /// Select (or clear) a category. Clears the text search.
    pub fn select_category(&mut self, category: Option<CategoryItem>) {
        self.filter.query.clear();
        self.filter.category = category;
        self.recompute();
    }

    pub fn set_show_hidden(&mut self, show_hidden: bool) {
        self.filter.show_hidden = show_hidden;
        self.recompute();
    }

    pub fn set_hidden_ids(&mut self, hidden_ids: HashSet<String>) {
        self.filter.hidden_ids = hidden_ids;
        self.recompute();
    }

    pub fn hide_channel(&mut self, channel: &Channel) {
        self.filter.hidden_ids.insert(channel.stream_url.clone());
        self.recompute();
    }

    pub fn unhide_all(&mut self) {
        self.filter.hidden_ids.clear();
        self.recompute();
    }

    pub fn set_favorite_ids(&mut self, favorite_ids: HashSet<String>) {
        self.favorite_ids = favorite_ids;
        self.recompute();
    }

    /// Returns true when the channel is a favorite afterwards
    pub fn toggle_favorite(&mut self, channel: &Channel) -> bool {
        let now_favorite = if self.favorite_ids.remove(&channel.stream_url) {
            false
        } else {
            self.favorite_ids.insert(channel.stream_url.clone());
            true
        };
        self.recompute();
        now_favorite
    }

    /// Move the channel to the front of the recents list
    pub fn on_channel_played(&mut self, channel: &Channel) {
        self.recent_channels.retain(|c| !c.same_channel(channel));
        self.recent_channels.insert(0, channel.clone());
        self.recent_channels.truncate(RECENT_CHANNEL_LIMIT);
    }

    fn recompute(&mut self) {
        self.filtered_channels = self.filter.apply(&self.channels);
        self.filtered_categories = filter_categories(&self.categories, &self.filter.query);
        self.favorite_channels = favorite_channels(&self.channels, &self.favorite_ids);

        debug!(
            channels = self.channels.len(),
            visible = self.filtered_channels.len(),
            categories = self.filtered_categories.len(),
            favorites = self.favorite_channels.len(),
            "recomputed channel view"
        );
    }

    pub fn channels(&self) -> &[Channel] {
        &self.channels
    }

    pub fn categories(&self) -> &[CategoryItem] {
        &self.categories
    }

    pub fn filtered_channels(&self) -> &[Channel] {
        &self.filtered_channels
    }

    pub fn filtered_categories(&self) -> &[CategoryItem] {
        &self.filtered_categories
    }

    pub fn favorite_channels(&self) -> &[Channel] {
        &self.favorite_channels
    }

    pub fn favorite_ids(&self) -> &HashSet<String> {
        &self.favorite_ids
    }

    pub fn recent_channels(&self) -> &[Channel] {
        &self.recent_channels
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub fn is_favorite(&self, channel: &Channel) -> bool {
        self.favorite_ids.contains(&channel.stream_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CategoryType;

    fn channel(name: &str, url: &str, group: &str) -> Channel {
        Channel {
            group_title: Some(group.to_string()),
            ..Channel::new(name, url)
        }
    }

    fn loaded() -> ChannelBrowser {
        let mut browser = ChannelBrowser::new();
        browser.load_channels(vec![
            channel("News 24", "u1", "News"),
            channel("Kids Fun", "u2", "Kids"),
            channel("World News", "u3", "News;World"),
        ]);
        browser
    }

    fn urls(channels: &[Channel]) -> Vec<&str> {
        channels.iter().map(|c| c.stream_url.as_str()).collect()
    }

    #[test]
    fn test_load_builds_categories() {
        let browser = loaded();
        assert_eq!(browser.filtered_channels().len(), 3);
        let news = browser
            .categories()
            .iter()
            .find(|c| c.name == "News" && c.kind == CategoryType::Group)
            .unwrap();
        assert_eq!(news.count, 2);
        assert_eq!(browser.filtered_categories(), browser.categories());
    }

    #[test]
    fn test_query_clears_category_and_vice_versa() {
        let mut browser = loaded();
        browser.select_category(Some(CategoryItem::group("Kids")));
        assert_eq!(urls(browser.filtered_channels()), vec!["u2"]);

        browser.set_query("news");
        assert!(browser.filter().category.is_none());
        assert_eq!(urls(browser.filtered_channels()), vec!["u1", "u3"]);
        assert!(browser
            .filtered_categories()
            .iter()
            .all(|c| c.name.to_lowercase().contains("news")));

        browser.select_category(Some(CategoryItem::group("World")));
        assert!(browser.filter().query.is_empty());
        assert_eq!(urls(browser.filtered_channels()), vec!["u3"]);
    }

    #[test]
    fn test_hide_and_show_hidden() {
        let mut browser = loaded();
        let kids = browser.channels()[1].clone();
        browser.hide_channel(&kids);
        assert_eq!(urls(browser.filtered_channels()), vec!["u1", "u3"]);
        browser.set_show_hidden(true);
        assert_eq!(urls(browser.filtered_channels()), vec!["u1", "u2", "u3"]);
        browser.set_show_hidden(false);
        browser.unhide_all();
        assert_eq!(browser.filtered_channels().len(), 3);
    }

    #[test]
    fn test_set_hidden_ids_replaces_set() {
        let mut browser = loaded();
        let kids = browser.channels()[1].clone();
        browser.hide_channel(&kids);
        browser.set_hidden_ids(["u1".to_string(), "u3".to_string()].into_iter().collect());
        assert_eq!(urls(browser.filtered_channels()), vec!["u2"]);
        assert!(browser.filter().hidden_ids.contains("u1"));
        assert!(!browser.filter().hidden_ids.contains("u2"));
    }

    #[test]
    fn test_is_favorite_tracks_toggle() {
        let mut browser = loaded();
        let news = browser.channels()[0].clone();
        assert!(!browser.is_favorite(&news));
        browser.toggle_favorite(&news);
        assert!(browser.is_favorite(&news));
        assert!(browser.favorite_ids().contains("u1"));
        browser.toggle_favorite(&news);
        assert!(!browser.is_favorite(&news));
    }

    #[test]
    fn test_favorites_follow_full_list() {
        let mut browser = loaded();
        let world = browser.channels()[2].clone();
        assert!(browser.toggle_favorite(&world));
        browser.set_query("kids");
        assert_eq!(urls(browser.favorite_channels()), vec!["u3"]);
        assert!(!browser.toggle_favorite(&world));
        assert!(browser.favorite_channels().is_empty());
    }

    #[test]
    fn test_reload_replaces_channels() {
        let mut browser = loaded();
        browser.set_favorite_ids(["u9".to_string()].into_iter().collect());
        browser.load_channels(vec![channel("Other", "u9", "Misc")]);
        assert_eq!(browser.channels().len(), 1);
        assert_eq!(urls(browser.favorite_channels()), vec!["u9"]);
    }

    #[test]
    fn test_recents() {
        let mut browser = ChannelBrowser::new();
        for i in 0..12 {
            browser.on_channel_played(&Channel::new(format!("C{}", i), format!("u{}", i)));
        }
        browser.on_channel_played(&Channel::new("again", "u5"));
        let recents = browser.recent_channels();
        assert_eq!(recents.len(), RECENT_CHANNEL_LIMIT);
        assert_eq!(recents[0].stream_url, "u5");
        assert_eq!(recents[1].stream_url, "u11");
        assert_eq!(recents.iter().filter(|c| c.stream_url == "u5").count(), 1);
    }

    #[test]
    fn test_parental_lock() {
        let mut lock = ParentalLock::new(true, Some("0000"));
        assert!(!lock.is_unlocked());
        assert!(!lock.unlock("1111"));
        assert!(lock.unlock("0000"));
        lock.lock();
        assert!(!lock.is_unlocked());

        let open = ParentalLock::new(false, None);
        assert!(open.is_unlocked());
    }

    #[test]
    fn test_from_config() {
        let mut config = AppConfig::default();
        config.hide_channel("u1");
        config.toggle_favorite("u2");
        config.enable_parental("42");
        let mut browser = ChannelBrowser::from_config(&config);
        browser.load_channels(loaded().channels().to_vec());
        assert_eq!(urls(browser.filtered_channels()), vec!["u2", "u3"]);
        assert_eq!(urls(browser.favorite_channels()), vec!["u2"]);
        assert!(browser.parental.is_enabled());
        assert!(!browser.parental.is_unlocked());
    }
}
