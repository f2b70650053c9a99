use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use deck_meta::calculate::deck::DeckMetric;
use deck_meta::calculate::filter::FilterOptions;
use deck_meta::config::AppConfig;
use deck_meta::models::{is_sentinel_deck, parse_date, FilterSpec};
use deck_meta::parse_positions;
use deck_meta::report::{self, ReportOptions};
use deck_meta::storage::load_records;

#[derive(Parser)]
#[command(name = "deck-meta")]
#[command(about = "Card-game tournament meta statistics")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "./deck-meta.toml")]
    config: PathBuf,

    /// Dataset path (.jsonl or .json), overrides the config
    #[arg(long)]
    data: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error), overrides the config
    #[arg(long)]
    log_level: Option<String>,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,

    /// Print single-line JSON
    #[arg(long)]
    compact: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum SortArg {
    Meta,
    WinRate,
    Top8,
    Count,
}

impl From<SortArg> for DeckMetric {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Meta => DeckMetric::MetaShare,
            SortArg::WinRate => DeckMetric::WinRate,
            SortArg::Top8 => DeckMetric::Top8Conversion,
            SortArg::Count => DeckMetric::Count,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// List the events, players, decks and dates available for filtering
    Options {
        /// Restrict the event list to these types
        #[arg(long = "event-type")]
        event_types: Vec<String>,
    },

    /// Report on a single event
    Event {
        /// Event name
        #[arg(long)]
        name: String,

        #[arg(long)]
        rank_min: Option<u32>,

        #[arg(long)]
        rank_max: Option<u32>,

        /// Deck ranking metric
        #[arg(long, value_enum, default_value = "meta")]
        sort: SortArg,

        /// Ranked positions to keep (e.g., "10" or "5-15")
        #[arg(long)]
        top: Option<String>,
    },

    /// Report on every event in a date range
    Range {
        /// Start date (YYYY-MM-DD)
        #[arg(long)]
        from: String,

        /// End date (YYYY-MM-DD)
        #[arg(long)]
        to: String,

        /// Event types to include (default from config)
        #[arg(long = "event-type")]
        event_types: Vec<String>,

        #[arg(long)]
        rank_min: Option<u32>,

        #[arg(long)]
        rank_max: Option<u32>,

        /// Deck ranking metric
        #[arg(long, value_enum, default_value = "meta")]
        sort: SortArg,

        /// Ranked positions to keep (e.g., "10" or "5-15")
        #[arg(long)]
        top: Option<String>,
    },

    /// Track one deck across dates
    Evolution {
        /// Deck name
        #[arg(long)]
        deck: String,

        #[arg(long)]
        from: Option<String>,

        #[arg(long)]
        to: Option<String>,

        #[arg(long = "event-type")]
        event_types: Vec<String>,
    },

    /// Report on one player's history
    Player {
        /// Player name (exact match)
        #[arg(long)]
        name: String,

        #[arg(long)]
        from: Option<String>,

        #[arg(long)]
        to: Option<String>,

        #[arg(long = "event-type")]
        event_types: Vec<String>,

        /// Only chart win rates for this deck
        #[arg(long)]
        deck: Option<String>,
    },

    /// Average win rate per player
    Leaderboard {
        #[arg(long)]
        from: Option<String>,

        #[arg(long)]
        to: Option<String>,

        #[arg(long = "event-type")]
        event_types: Vec<String>,

        /// Ranked positions to keep (e.g., "10" or "5-15")
        #[arg(long)]
        top: Option<String>,
    },
}

fn parse_optional_date(value: Option<&str>, flag: &str) -> Result<Option<NaiveDate>> {
    value
        .map(|s| parse_date(s).with_context(|| format!("Invalid --{}", flag)))
        .transpose()
}

fn event_types_or_default(event_types: Vec<String>, config: &AppConfig) -> Vec<String> {
    if event_types.is_empty() {
        config.dashboard.default_event_types.clone()
    } else {
        event_types
    }
}

fn report_options(
    config: &AppConfig,
    sort: DeckMetric,
    top: Option<&str>,
) -> Result<ReportOptions> {
    let positions = match top {
        Some(s) => Some(
            parse_positions(s)
                .with_context(|| format!("Invalid --top (expected N or A-B): {}", s))?,
        ),
        None => None,
    };
    Ok(ReportOptions {
        sort,
        positions,
        precision: config.dashboard.percent_precision,
    })
}

fn validated(filter: FilterSpec) -> Result<FilterSpec> {
    filter.validate().context("Invalid filter")?;
    Ok(filter)
}

fn print_json<T: Serialize>(value: &T, compact: bool) -> Result<()> {
    let out = if compact {
        serde_json::to_string(value)?
    } else {
        serde_json::to_string_pretty(value)?
    };
    println!("{}", out);
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::load_or_default(&cli.config)
        .with_context(|| format!("Failed to load config from {:?}", cli.config))?;

    // Initialize tracing; RUST_LOG wins over flags and config
    let level = cli.log_level.as_deref().unwrap_or(&config.log_level);
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    let registry = tracing_subscriber::registry().with(filter);
    if cli.json_logs {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    tracing::info!("Starting deck-meta v{}", env!("CARGO_PKG_VERSION"));

    for deck in config
        .dashboard
        .sentinel_decks
        .iter()
        .filter(|d| !is_sentinel_deck(d))
    {
        tracing::warn!(
            "Configured sentinel deck {:?} is not recognised and will be counted as a deck",
            deck
        );
    }

    let data_file = cli.data.clone().unwrap_or_else(|| config.data_file.clone());
    let records = load_records(&data_file)
        .with_context(|| format!("Failed to load dataset from {:?}", data_file))?;

    match cli.command {
        Commands::Options { event_types } => {
            let options = FilterOptions::from_records(&records, &event_types);
            print_json(&options, cli.compact)?;
        }

        Commands::Event {
            name,
            rank_min,
            rank_max,
            sort,
            top,
        } => {
            let filter =
                validated(FilterSpec::for_event(name).with_rank_range(rank_min, rank_max))?;
            let options = report_options(&config, sort.into(), top.as_deref())?;
            print_json(&report::event_report(&records, &filter, &options), cli.compact)?;
        }

        Commands::Range {
            from,
            to,
            event_types,
            rank_min,
            rank_max,
            sort,
            top,
        } => {
            let start = parse_date(&from).context("Invalid --from")?;
            let end = parse_date(&to).context("Invalid --to")?;
            let filter = validated(
                FilterSpec::new()
                    .with_date_range(Some(start), Some(end))
                    .with_event_types(event_types_or_default(event_types, &config))
                    .with_rank_range(rank_min, rank_max),
            )?;
            let options = report_options(&config, sort.into(), top.as_deref())?;
            print_json(&report::range_report(&records, &filter, &options), cli.compact)?;
        }

        Commands::Evolution {
            deck,
            from,
            to,
            event_types,
        } => {
            let filter = validated(
                FilterSpec::new()
                    .with_date_range(
                        parse_optional_date(from.as_deref(), "from")?,
                        parse_optional_date(to.as_deref(), "to")?,
                    )
                    .with_event_types(event_types_or_default(event_types, &config)),
            )?;
            print_json(&report::evolution_report(&records, &filter, &deck), cli.compact)?;
        }

        Commands::Player {
            name,
            from,
            to,
            event_types,
            deck,
        } => {
            let filter = validated(
                FilterSpec::for_player(name)
                    .with_date_range(
                        parse_optional_date(from.as_deref(), "from")?,
                        parse_optional_date(to.as_deref(), "to")?,
                    )
                    .with_event_types(event_types_or_default(event_types, &config)),
            )?;
            print_json(
                &report::player_report(&records, &filter, deck.as_deref()),
                cli.compact,
            )?;
        }

        Commands::Leaderboard {
            from,
            to,
            event_types,
            top,
        } => {
            let filter = validated(
                FilterSpec::new()
                    .with_date_range(
                        parse_optional_date(from.as_deref(), "from")?,
                        parse_optional_date(to.as_deref(), "to")?,
                    )
                    .with_event_types(event_types_or_default(event_types, &config)),
            )?;
            let options = report_options(&config, DeckMetric::MetaShare, top.as_deref())?;
            print_json(&report::leaderboard_report(&records, &filter, &options), cli.compact)?;
        }
    }

    Ok(())
}
