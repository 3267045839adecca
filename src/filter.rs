use std::collections::HashSet;

use crate::categories::channel_tokens;
use crate::models::{CategoryItem, Channel};

/// Inputs of the channel filter, owned by the caller
#[derive(Debug, Clone, Default)]
pub struct FilterState {
    pub query: String,
    pub category: Option<CategoryItem>,
    pub show_hidden: bool,
    pub hidden_ids: HashSet<String>,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(&self, channels: &[Channel]) -> Vec<Channel> {
        filter_channels(
            channels,
            &self.query,
            self.category.as_ref(),
            self.show_hidden,
            &self.hidden_ids,
        )
    }
}

/// Lowercased, trimmed query, or `None` when the query is blank
fn normalized_query(query: &str) -> Option<String> {
    let trimmed = query.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_lowercase())
}

fn contains_ci(field: Option<&str>, needle: &str) -> bool {
    field.is_some_and(|f| f.to_lowercase().contains(needle))
}

/// Whether a channel's name, group, country or language contains the lowercased query
pub fn matches_query(channel: &Channel, query: &str) -> bool {
    contains_ci(Some(&channel.name), query)
        || contains_ci(channel.group_title.as_deref(), query)
        || contains_ci(channel.country.as_deref(), query)
        || contains_ci(channel.language.as_deref(), query)
}

/// Token-exact, case-insensitive category membership
pub fn matches_category(channel: &Channel, category: &CategoryItem) -> bool {
    let wanted = category.name.to_lowercase();
    channel_tokens(channel, category.kind)
        .into_iter()
        .any(|token| token.to_lowercase() == wanted)
}

/// Filter channels by text query, then category, then hidden set.
///
/// Each stage only sees what the previous stage kept. With a blank query, no
/// category and an empty hidden set the input comes back unchanged.
pub fn filter_channels(
    channels: &[Channel],
    query: &str,
    category: Option<&CategoryItem>,
    show_hidden: bool,
    hidden_ids: &HashSet<String>,
) -> Vec<Channel> {
    let query = normalized_query(query);

    channels
        .iter()
        .filter(|ch| query.as_deref().map_or(true, |q| matches_query(ch, q)))
        .filter(|ch| category.map_or(true, |cat| matches_category(ch, cat)))
        .filter(|ch| show_hidden || !hidden_ids.contains(&ch.stream_url))
        .cloned()
        .collect()
}

/// Keep categories whose name contains the query; a blank query keeps all.
pub fn filter_categories(categories: &[CategoryItem], query: &str) -> Vec<CategoryItem> {
    match normalized_query(query) {
        None => categories.to_vec(),
        Some(q) => categories
            .iter()
            .filter(|c| c.name.to_lowercase().contains(&q))
            .cloned()
            .collect(),
    }
}

/// Channels whose stream URL is a favorite, in list order
pub fn favorite_channels(channels: &[Channel], favorite_ids: &HashSet<String>) -> Vec<Channel> {
    channels
        .iter()
        .filter(|ch| favorite_ids.contains(&ch.stream_url))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CategoryType;

    fn ch(name: &str, url: &str, group: Option<&str>, country: Option<&str>) -> Channel {
        Channel {
            name: name.to_string(),
            stream_url: url.to_string(),
            group_title: group.map(str::to_string),
            country: country.map(str::to_string),
            ..Default::default()
        }
    }

    fn sample() -> Vec<Channel> {
        vec![
            ch("BBC One", "u1", Some("News;General"), Some("UK")),
            ch("ESPN", "u2", Some("Sports"), Some("US")),
            ch("Sport1", "u3", Some("Sport"), Some("DE")),
            Channel {
                language: Some("French".to_string()),
                ..ch("TF1", "u4", None, None)
            },
        ]
    }

    fn urls(channels: &[Channel]) -> Vec<&str> {
        channels.iter().map(|c| c.stream_url.as_str()).collect()
    }

    #[test]
    fn test_identity_filter() {
        let channels = sample();
        let out = filter_channels(&channels, "", None, false, &HashSet::new());
        assert_eq!(urls(&out), urls(&channels));
    }

    #[test]
    fn test_query_matches_any_field() {
        let channels = sample();
        let none = HashSet::new();
        assert_eq!(urls(&filter_channels(&channels, "  bbc ", None, false, &none)), vec!["u1"]);
        assert_eq!(urls(&filter_channels(&channels, "NEWS", None, false, &none)), vec!["u1"]);
        assert_eq!(urls(&filter_channels(&channels, "us", None, false, &none)), vec!["u2"]);
        assert_eq!(urls(&filter_channels(&channels, "french", None, false, &none)), vec!["u4"]);
        let sport = filter_channels(&channels, "sport", None, false, &none);
        assert_eq!(urls(&sport), vec!["u2", "u3"]);
    }

    #[test]
    fn test_category_is_token_exact() {
        let channels = sample();
        let none = HashSet::new();
        let sports = CategoryItem::group("sports");
        assert_eq!(urls(&filter_channels(&channels, "", Some(&sports), false, &none)), vec!["u2"]);
        let sport = CategoryItem::group("Sport");
        assert_eq!(urls(&filter_channels(&channels, "", Some(&sport), false, &none)), vec!["u3"]);
        let general = CategoryItem::group("general");
        assert_eq!(urls(&filter_channels(&channels, "", Some(&general), false, &none)), vec!["u1"]);
    }

    #[test]
    fn test_category_fallback_tokens() {
        let channels = sample();
        let none = HashSet::new();
        let undefined = CategoryItem::group("Undefined");
        let out = filter_channels(&channels, "", Some(&undefined), false, &none);
        assert_eq!(urls(&out), vec!["u4"]);
        let unknown = CategoryItem::country("unknown");
        assert_eq!(urls(&filter_channels(&channels, "", Some(&unknown), false, &none)), vec!["u4"]);
    }

    #[test]
    fn test_category_uses_matching_field() {
        let channels = sample();
        // "UK" is a country token, never a group token
        let uk_group = CategoryItem::new("UK", CategoryType::Group, 1);
        assert!(filter_channels(&channels, "", Some(&uk_group), false, &HashSet::new()).is_empty());
        let uk_country = CategoryItem::new("UK", CategoryType::Country, 1);
        let out = filter_channels(&channels, "", Some(&uk_country), false, &HashSet::new());
        assert_eq!(urls(&out), vec!["u1"]);
    }

    #[test]
    fn test_hidden_channels() {
        let channels = sample();
        let hidden: HashSet<String> = ["u2".to_string()].into_iter().collect();
        let visible = filter_channels(&channels, "", None, false, &hidden);
        assert_eq!(urls(&visible), vec!["u1", "u3", "u4"]);
        let everything = filter_channels(&channels, "", None, true, &hidden);
        assert_eq!(urls(&everything), vec!["u1", "u2", "u3", "u4"]);
    }

    #[test]
    fn test_filter_is_idempotent() {
        let channels = sample();
        let hidden: HashSet<String> = ["u3".to_string()].into_iter().collect();
        let state = FilterState {
            query: "sport".to_string(),
            hidden_ids: hidden,
            ..FilterState::new()
        };
        let once = state.apply(&channels);
        let twice = state.apply(&once);
        assert_eq!(urls(&once), urls(&twice));
        assert_eq!(urls(&once), vec!["u2"]);
    }

    #[test]
    fn test_filter_categories() {
        let cats = vec![
            CategoryItem::new("News", CategoryType::Group, 3),
            CategoryItem::new("Sports", CategoryType::Group, 2),
            CategoryItem::new("US", CategoryType::Country, 1),
        ];
        assert_eq!(filter_categories(&cats, "   "), cats);
        let out = filter_categories(&cats, " S ");
        assert_eq!(out.len(), 3);
        let out = filter_categories(&cats, "SPO");
        assert_eq!(out, vec![CategoryItem::new("Sports", CategoryType::Group, 2)]);
    }

    #[test]
    fn test_favorite_channels() {
        let channels = sample();
        let favs: HashSet<String> = ["u4".to_string(), "u1".to_string(), "missing".to_string()]
            .into_iter()
            .collect();
        assert_eq!(urls(&favorite_channels(&channels, &favs)), vec!["u1", "u4"]);
    }
}
