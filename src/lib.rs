pub mod api;
pub mod browser;
pub mod categories;
pub mod config;
pub mod errors;
pub mod filter;
pub mod models;
pub mod parser;
pub mod resolver;

pub use categories::build_categories;
pub use filter::{filter_categories, filter_channels};
pub use models::{CategoryItem, CategoryType, Channel};
pub use parser::parse;

#[cfg(test)]
mod tests {
    use crate::browser::ChannelBrowser;
    use crate::config::AppConfig;

    #[test]
    fn test_browser_new_is_empty() {
        let browser = ChannelBrowser::new();
        assert!(browser.filtered_channels().is_empty());
        assert!(browser.parental.is_unlocked());
    }

    #[test]
    fn test_pipeline_from_text() {
        let mut config = AppConfig::default();
        config.hide_channel("http://s/2.ts");

        let channels = crate::parse(
            "#EXTM3U\n#EXTINF:-1 group-title=\"Music\",Hits\nhttp://s/1.ts\n#EXTINF:-1 group-title=\"Music\",Oldies\nhttp://s/2.ts\n",
        );
        let mut browser = ChannelBrowser::from_config(&config);
        browser.load_channels(channels);

        assert_eq!(browser.filtered_channels().len(), 1);
        assert_eq!(browser.categories()[0].count, 2);
    }
}
