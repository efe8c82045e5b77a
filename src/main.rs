use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};
use vegan_places::config::Config;
use vegan_places::contact::{self, EmailJs, SubscriberStore, Suggestion};
use vegan_places::directory::{Directory, ViewState};
use vegan_places::export;
use vegan_places::hours_label;
use vegan_places::i18n::Language;
use vegan_places::location::{AddressResolver, OverrideTable};
use vegan_places::schedule;
use vegan_places::server;
use vegan_places::source::Source;

/// Vegan places in Israel: list, map and structured data from a venues CSV.
///
/// Examples:
///   vegan-places list --search cafe --open-now
///   vegan-places --lang en map
///   vegan-places resolve "דיזינגוף 120, תל אביב"
///   vegan-places hours "Sun-Thu 09:00-17:00; Fri 09:00-13:00" --at 2026-10-16T12:00
///   vegan-places serve --port 8080
#[derive(Parser)]
#[command(name = "vegan-places", version, about, long_about = None)]
struct Cli {
    /// Config file. Defaults to ~/.vegan-places/config.json when present.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Venues CSV (path or http(s) URL).
    #[arg(long, global = true)]
    data: Option<String>,

    /// Address overrides JSON (path or http(s) URL).
    #[arg(long, global = true)]
    overrides: Option<String>,

    /// Display language: he or en.
    #[arg(long, global = true)]
    lang: Option<Language>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Grouped venue list
    List {
        /// Case-insensitive match on name or address
        #[arg(short, long)]
        search: Option<String>,

        /// Only venues open right now
        #[arg(long)]
        open_now: bool,

        /// Mark every region and city as expanded
        #[arg(long)]
        expanded: bool,

        /// Evaluate open/closed at this local time (YYYY-MM-DDTHH:MM)
        #[arg(long, value_parser = parse_time)]
        at: Option<chrono::NaiveDateTime>,
    },
    /// Map markers and viewport
    Map {
        /// Seed for the city-centroid jitter
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Resolve one address to a coordinate
    Resolve {
        address: String,

        /// Seed for the city-centroid jitter
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Parse an opening-hours string
    Hours {
        text: String,

        /// Local time to evaluate (YYYY-MM-DDTHH:MM)
        #[arg(long, value_parser = parse_time)]
        at: Option<chrono::NaiveDateTime>,
    },
    /// schema.org JSON-LD for all venues
    Export {
        /// Print the meta description instead
        #[arg(long)]
        meta: bool,
    },
    /// Send a venue suggestion
    Suggest {
        #[arg(long)]
        name: String,
        #[arg(long)]
        address: String,
        #[arg(long, default_value = "")]
        link: String,
    },
    /// Subscribe to updates
    Subscribe {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
    },
    /// Run the HTTP API
    Serve {
        #[arg(long)]
        host: Option<String>,
        #[arg(long, short)]
        port: Option<u16>,
    },
}

fn parse_time(s: &str) -> Result<chrono::NaiveDateTime, String> {
    schedule::parse_local_time(s).ok_or_else(|| format!("Invalid time '{}'. Use YYYY-MM-DDTHH:MM.", s))
}

fn main() -> anyhow::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let cli = Cli::parse();
    let config = load_config(&cli)?;
    let lang = config.language;

    match cli.command {
        Commands::List { search, open_now, expanded, at } => {
            let directory = Directory::load(&config.data, lang)?;
            let state = ViewState {
                language: lang,
                search: search.unwrap_or_default(),
                open_only: open_now,
                expanded,
            };
            let board = directory.status_board(at.unwrap_or_else(schedule::local_now));
            print_json(&directory.list_view(&state, &board))?;
        }
        Commands::Map { seed } => {
            let directory = Directory::load(&config.data, lang)?;
            let mut resolver = resolver_for(&config, seed);
            print_json(&directory.map_view(lang, &mut resolver))?;
        }
        Commands::Resolve { address, seed } => {
            let mut resolver = resolver_for(&config, seed);
            let resolved = resolver.resolve(&address);
            info!(source = %resolved.source, "{}", resolved.coordinate);
            print_json(&resolved)?;
        }
        Commands::Hours { text, at } => {
            let at = at.unwrap_or_else(schedule::local_now);
            let parsed = schedule::parse_schedule(&text);
            let raw = Some(text.as_str()).filter(|t| !t.trim().is_empty());
            print_json(&serde_json::json!({
                "schedule": parsed,
                "condensed": parsed.as_ref().map(|s| hours_label::condensed_weekly(s, lang)),
                "today": hours_label::day_label(parsed.as_ref(), raw, chrono::Datelike::weekday(&at), lang),
                "tooltip": hours_label::full_week(parsed.as_ref(), raw, lang),
                "open_now": schedule::is_open_at(parsed.as_ref(), at),
                "at": at,
            }))?;
        }
        Commands::Export { meta } => {
            let directory = Directory::load(&config.data, lang)?;
            if meta {
                println!("{}", export::meta_description(directory.venues(), lang));
            } else {
                let mut resolver = resolver_for(&config, None);
                let list = export::structured_data(directory.venues(), &mut resolver)
                    .context("no venues to export")?;
                print_json(&list)?;
            }
        }
        Commands::Suggest { name, address, link } => {
            let mailer = EmailJs::new(config.emailjs.clone());
            let suggestion = Suggestion { name, address, link };
            match contact::send_suggestion(&mailer, &suggestion) {
                Ok(()) => println!("{}", lang.messages().suggestion_sent),
                Err(e) => anyhow::bail!("{} ({})", e.user_message(lang), e),
            }
        }
        Commands::Subscribe { name, email } => {
            let mailer = EmailJs::new(config.emailjs.clone());
            let mut store = SubscriberStore::load_from(config.subscribers_path());
            match contact::subscribe(&mut store, &mailer, &name, &email) {
                Ok(outcome) => println!("{}", outcome.user_message(lang)),
                Err(e) => anyhow::bail!("{} ({})", e.user_message(lang), e),
            }
        }
        Commands::Serve { host, port } => {
            let mut config = config;
            if let Some(host) = host {
                config.host = host;
            }
            if let Some(port) = port {
                config.port = port;
            }
            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(server::start(config))?;
        }
    }

    Ok(())
}

/// Config file, then command-line overrides.
fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    if let Some(data) = &cli.data {
        config.data = Source::parse(data);
    }
    if let Some(overrides) = &cli.overrides {
        config.overrides = Source::parse(overrides);
    }
    if let Some(lang) = cli.lang {
        config.language = lang;
    }
    Ok(config)
}

fn resolver_for(config: &Config, seed: Option<u64>) -> AddressResolver {
    let resolver = match seed {
        Some(seed) => AddressResolver::seeded(seed),
        None => AddressResolver::new(),
    };
    match OverrideTable::load(&config.overrides) {
        Some(table) => resolver.with_overrides(table),
        None => resolver,
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
