use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use deck_iptv::api::SourceFetcher;
use deck_iptv::browser::ChannelBrowser;
use deck_iptv::config::AppConfig;
use deck_iptv::errors::PlaylistError;
use deck_iptv::models::{CategoryItem, Channel};
use deck_iptv::resolver::PlaylistResolver;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Log level for deck_iptv (overridden by RUST_LOG)
    #[arg(long, default_value = "warn", global = true)]
    log_level: String,

    /// Use this config file instead of the platform default
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Args, Debug)]
struct Source {
    /// Playlist URL or local path (defaults to the active playlist)
    #[arg(short, long)]
    playlist: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List channels after search, category and hidden filtering
    Channels {
        #[command(flatten)]
        source: Source,
        #[arg(short, long, default_value = "")]
        query: String,
        #[arg(long, conflicts_with_all = ["country", "query"])]
        group: Option<String>,
        #[arg(long, conflicts_with = "query")]
        country: Option<String>,
        #[arg(long)]
        show_hidden: bool,
        #[arg(long)]
        json: bool,
    },
    /// List group and country categories with channel counts
    Categories {
        #[command(flatten)]
        source: Source,
        #[arg(short, long, default_value = "")]
        query: String,
        #[arg(long)]
        json: bool,
    },
    /// List favorite channels present in the playlist
    Favorites {
        #[command(flatten)]
        source: Source,
    },
    /// Toggle a channel (by stream URL) in favorites
    Favorite { url: String },
    /// Hide a channel by stream URL
    Hide { url: String },
    /// Clear the hidden channel list
    UnhideAll,
    /// Show or change saved preferences
    Settings {
        /// Include hidden channels in listings
        #[arg(long)]
        show_hidden: Option<bool>,
        /// Resume the last played channel on start-up
        #[arg(long)]
        autoplay_last: Option<bool>,
        #[arg(long)]
        external_player: Option<bool>,
        #[arg(long)]
        start_on_boot: Option<bool>,
        /// Lock the channel list behind this PIN
        #[arg(long, conflicts_with = "no_parental")]
        parental_pin: Option<String>,
        #[arg(long)]
        no_parental: bool,
        #[arg(long)]
        accept_disclaimer: bool,
    },
    /// Manage saved playlists
    #[command(subcommand)]
    Playlist(PlaylistCommand),
}

#[derive(Subcommand, Debug)]
enum PlaylistCommand {
    /// Save a playlist URL or path and make it active
    Add {
        url: String,
        #[arg(short, long)]
        name: Option<String>,
    },
    /// Save an Xtream Codes account and make it active
    Xtream {
        base_url: String,
        username: String,
        password: String,
        #[arg(short, long)]
        name: Option<String>,
    },
    /// Make a saved playlist active
    Use { id: String },
    /// Show saved playlists
    List {
        /// Only the most recently used ones
        #[arg(long)]
        recent: bool,
    },
}

fn init_logging(level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("deck_iptv={}", level).into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

struct Store {
    path: PathBuf,
    config: AppConfig,
}

impl Store {
    fn open(path: Option<PathBuf>) -> anyhow::Result<Self> {
        let path = match path {
            Some(p) => p,
            None => AppConfig::default_path()?,
        };
        let config = AppConfig::load_from(&path)
            .with_context(|| format!("loading config from {}", path.display()))?;
        Ok(Self { path, config })
    }

    fn save(&self) -> anyhow::Result<()> {
        self.config.save_to(&self.path)?;
        Ok(())
    }
}

/// Surface a failed resolution as its diagnostics text, reported once
fn load_failure(err: PlaylistError) -> anyhow::Error {
    anyhow::anyhow!(err.diagnostics())
}

async fn load_browser(config: &AppConfig, source: &Source) -> anyhow::Result<ChannelBrowser> {
    let primary = source
        .playlist
        .clone()
        .unwrap_or_else(|| config.active_playlist_url());
    let resolver = PlaylistResolver::new(SourceFetcher::new(), config.fallback_playlists.clone());

    let cancel = CancellationToken::new();
    let ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            ctrl_c.cancel();
        }
    });

    let channels = resolver
        .resolve(&primary, &cancel)
        .await
        .map_err(load_failure)?;

    let mut browser = ChannelBrowser::from_config(config);
    browser.load_channels(channels);
    Ok(browser)
}

fn print_channels(channels: &[Channel], json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(channels)?);
        return Ok(());
    }
    for ch in channels {
        println!(
            "{}\t{}\t{}",
            ch.name,
            ch.group_title.as_deref().unwrap_or("-"),
            ch.stream_url
        );
    }
    Ok(())
}

fn print_categories(categories: &[CategoryItem], json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(categories)?);
        return Ok(());
    }
    for cat in categories {
        println!("{}\t{}\t{}", cat.name, cat.kind, cat.count);
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    let mut store = Store::open(cli.config)?;

    match cli.command {
        Command::Channels {
            source,
            query,
            group,
            country,
            show_hidden,
            json,
        } => {
            let mut browser = load_browser(&store.config, &source).await?;
            if show_hidden {
                browser.set_show_hidden(true);
            }
            if let Some(name) = group {
                browser.select_category(Some(CategoryItem::group(name)));
            } else if let Some(name) = country {
                browser.select_category(Some(CategoryItem::country(name)));
            } else {
                browser.set_query(&query);
            }
            print_channels(browser.filtered_channels(), json)?;
        }
        Command::Categories {
            source,
            query,
            json,
        } => {
            let mut browser = load_browser(&store.config, &source).await?;
            browser.set_query(&query);
            print_categories(browser.filtered_categories(), json)?;
        }
        Command::Favorites { source } => {
            let browser = load_browser(&store.config, &source).await?;
            print_channels(browser.favorite_channels(), false)?;
        }
        Command::Favorite { url } => {
            let added = store.config.toggle_favorite(&url);
            store.save()?;
            println!("{} {}", if added { "Added" } else { "Removed" }, url);
        }
        Command::Hide { url } => {
            store.config.hide_channel(&url);
            store.save()?;
            println!("Hidden {}", url);
        }
        Command::UnhideAll => {
            store.config.unhide_all();
            store.save()?;
            println!("All channels visible");
        }
        Command::Settings {
            show_hidden,
            autoplay_last,
            external_player,
            start_on_boot,
            parental_pin,
            no_parental,
            accept_disclaimer,
        } => {
            let config = &mut store.config;
            if let Some(v) = show_hidden {
                config.set_show_hidden(v);
            }
            if let Some(v) = autoplay_last {
                config.set_autoplay_last(v);
            }
            if let Some(v) = external_player {
                config.set_use_external_player(v);
            }
            if let Some(v) = start_on_boot {
                config.set_start_on_boot(v);
            }
            if let Some(pin) = parental_pin {
                config.enable_parental(&pin);
            } else if no_parental {
                config.disable_parental();
            }
            if accept_disclaimer {
                config.accept_disclaimer();
            }
            store.save()?;

            let config = &store.config;
            println!("show_hidden\t{}", config.show_hidden);
            println!("autoplay_last\t{}", config.autoplay_last);
            println!("external_player\t{}", config.use_external_player);
            println!("start_on_boot\t{}", config.start_on_boot);
            println!("parental_lock\t{}", config.parental.enabled);
            println!("disclaimer_accepted\t{}", config.disclaimer_accepted);
        }
        Command::Playlist(cmd) => match cmd {
            PlaylistCommand::Add { url, name } => {
                let id = store.config.add_playlist_url(name.as_deref(), &url).id.clone();
                store.save()?;
                println!("Saved playlist {}", id);
            }
            PlaylistCommand::Xtream {
                base_url,
                username,
                password,
                name,
            } => {
                let id = store
                    .config
                    .add_playlist_xtream(name.as_deref(), &base_url, &username, &password)
                    .id
                    .clone();
                store.save()?;
                println!("Saved playlist {}", id);
            }
            PlaylistCommand::Use { id } => {
                if !store.config.set_active_playlist(Some(&id)) {
                    anyhow::bail!("no saved playlist with id {}", id);
                }
                store.save()?;
                println!("Active playlist {}", id);
            }
            PlaylistCommand::List { recent } => {
                let active = store.config.active_playlist_id.as_deref();
                let playlists = if recent {
                    store.config.recent_playlists()
                } else {
                    store.config.playlists.iter().collect()
                };
                for p in playlists {
                    let marker = if Some(p.id.as_str()) == active { "*" } else { " " };
                    println!("{} {}\t{}\t{}", marker, p.id, p.name, p.url);
                }
            }
        },
    }

    Ok(())
}
