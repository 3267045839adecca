use std::collections::HashMap;

use crate::models::{CategoryItem, CategoryType, Channel};

/// Separators accepted between values of a multi-value field
pub const VALUE_SEPARATORS: [char; 3] = [';', ',', '|'];

/// Split a multi-value field into trimmed, non-empty tokens.
///
/// An absent or all-blank field yields the facet's fallback token
/// (`"Undefined"` for groups, `"Unknown"` for countries). The category
/// builder and the category filter both go through here so they always agree.
pub fn split_values(value: Option<&str>, kind: CategoryType) -> Vec<&str> {
    let tokens: Vec<&str> = value
        .map(|v| {
            v.split(VALUE_SEPARATORS)
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .collect()
        })
        .unwrap_or_default();

    if tokens.is_empty() {
        vec![kind.fallback_token()]
    } else {
        tokens
    }
}

/// Tokens of `channel` for the given facet
pub fn channel_tokens(channel: &Channel, kind: CategoryType) -> Vec<&str> {
    split_values(kind.field(channel), kind)
}

/// Count tokens of one facet, keeping the order in which each was first seen
fn count_tokens(channels: &[Channel], kind: CategoryType) -> Vec<(&str, usize)> {
    let mut counts: Vec<(&str, usize)> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for channel in channels {
        for token in channel_tokens(channel, kind) {
            match index.get(token) {
                Some(&i) => counts[i].1 += 1,
                None => {
                    index.insert(token, counts.len());
                    counts.push((token, 1));
                }
            }
        }
    }
    counts
}

/// Derive group and country categories with per-token channel counts.
///
/// A channel listing two groups counts once toward each. The result is
/// sorted by lowercase name with groups and countries interleaved. The sort
/// is stable: on equal lowercase names groups stay ahead of countries, and
/// within one facet the spelling seen first in the playlist comes first.
pub fn build_categories(channels: &[Channel]) -> Vec<CategoryItem> {
    let groups = count_tokens(channels, CategoryType::Group);
    let countries = count_tokens(channels, CategoryType::Country);

    let mut items: Vec<CategoryItem> = groups
        .into_iter()
        .map(|(name, count)| CategoryItem::new(name, CategoryType::Group, count))
        .chain(
            countries
                .into_iter()
                .map(|(name, count)| CategoryItem::new(name, CategoryType::Country, count)),
        )
        .collect();

    items.sort_by_cached_key(|item| item.name.to_lowercase());
    items
}
