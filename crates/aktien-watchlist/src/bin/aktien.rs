//! Interactive stock watchlist
//!
//! # Usage
//!
//! ```bash
//! # Persistent watchlist in ./watchlist.db
//! cargo run --bin aktien
//!
//! # Session-only list of at most five tickers, descriptions in English
//! cargo run --bin aktien -- --memory --capacity 5 --lang en
//! ```

use aktien_watchlist::api::{GoogleTranslateClient, YahooFinanceClient};
use aktien_watchlist::engine::{AppState, EngineSettings, Services, handle};
use aktien_watchlist::interface::{CliFormatter, Command};
use aktien_watchlist::watchlist::{MemoryStore, SqliteStore, WatchlistStore};
use aktien_watchlist::{CachedTranslator, HistoryPeriod, Language, StorageMode, WatchlistConfig};
use clap::Parser;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "aktien",
    version,
    about = "Stock ticker watchlist with quotes and translated company profiles"
)]
struct Args {
    /// Keep the watchlist in memory for this session only
    #[arg(long)]
    memory: bool,

    /// SQLite database file
    #[arg(long, value_name = "PATH")]
    db: Option<PathBuf>,

    /// Maximum number of tickers in memory mode
    #[arg(long)]
    capacity: Option<usize>,

    /// Target language for company descriptions (de, en, fr, ...)
    #[arg(long, value_name = "CODE")]
    lang: Option<String>,

    /// Price history window (1mo, 3mo, 6mo, 1y, 2y, 5y, ytd, max)
    #[arg(long)]
    period: Option<HistoryPeriod>,

    /// Remove tickers the quote source does not know
    #[arg(long)]
    purge_invalid: bool,

    /// ASCII output without symbols or charts
    #[arg(long)]
    plain: bool,
}

fn print_banner() {
    println!(
        r"
╔══════════════════════════════════════════════════════════════╗
║                      Aktien Watchlist                        ║
║                                                              ║
║  Commands:                                                   ║
║    <ticker> | /add <ticker>  - Aktie hinzufügen (Add)        ║
║    /remove <ticker>          - Aktie entfernen (Remove)      ║
║    /view <ticker>            - Details (Chart, profile)      ║
║    /help                     - Hilfe (Help)                  ║
║    /exit                     - Beenden (Exit)                ║
╚══════════════════════════════════════════════════════════════╝
"
    );
}

fn load_config(args: &Args) -> anyhow::Result<WatchlistConfig> {
    let mut builder = WatchlistConfig::builder();
    if args.memory {
        builder = builder.storage(StorageMode::Memory);
    }
    if let Some(path) = &args.db {
        builder = builder.database_path(path.clone());
    }
    if let Some(capacity) = args.capacity {
        builder = builder.capacity(capacity);
    }
    if let Some(lang) = &args.lang {
        builder = builder.target_language(Language::from_code(lang));
    }
    if let Some(period) = args.period {
        builder = builder.history_period(period);
    }
    if args.purge_invalid {
        builder = builder.purge_invalid(true);
    }

    Ok(builder.with_env()?.build()?)
}

async fn open_store(config: &WatchlistConfig) -> anyhow::Result<Box<dyn WatchlistStore>> {
    let store: Box<dyn WatchlistStore> = match config.storage {
        StorageMode::Memory => Box::new(MemoryStore::new(config.capacity)),
        StorageMode::Sqlite => Box::new(SqliteStore::open(&config.database_path).await?),
    };
    Ok(store)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    aktien_utils::init_tracing_with_default("warn,aktien_watchlist=info");

    let args = Args::parse();
    let config = load_config(&args)?;

    print_banner();

    println!("Configuration:");
    match config.storage {
        StorageMode::Memory => {
            println!("  Storage: memory (max {} tickers)", config.capacity);
        }
        StorageMode::Sqlite => {
            println!("  Storage: sqlite ({})", config.database_path.display());
        }
    }
    println!("  Language: {}", config.target_language);
    println!("  History: {}", config.history_period);
    println!();

    let lookup = YahooFinanceClient::new(config.request_timeout, config.rate_limit_per_minute)?;
    let translator = CachedTranslator::new(
        GoogleTranslateClient::new(config.request_timeout)?,
        config.translation_cache_ttl,
    );
    let settings = EngineSettings::from(&config);
    let services = Services {
        lookup: &lookup,
        translator: &translator,
        settings: &settings,
    };
    let formatter = if args.plain {
        CliFormatter::plain()
    } else {
        CliFormatter::new()
    };

    let mut state = AppState::new(open_store(&config).await?);
    let (next, view) = handle(state, Command::List, &services).await;
    state = next;
    println!("{}\n", formatter.format_view(&view));

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("aktien> ");
        stdout.flush()?;

        let mut input = String::new();
        match stdin.lock().read_line(&mut input) {
            Ok(0) => {
                // EOF
                println!("\nAuf Wiedersehen!");
                break;
            }
            Ok(_) => {}
            Err(e) => {
                eprintln!("Error reading input: {e}");
                continue;
            }
        }

        let input = input.trim();
        if input.is_empty() {
            continue;
        }

        let command = match Command::parse(input) {
            Ok(command) => command,
            Err(e) => {
                eprintln!("{}\n", formatter.format_error(&e.to_string()));
                continue;
            }
        };

        let (next, view) = handle(state, command, &services).await;
        state = next;
        println!("{}\n", formatter.format_view(&view));

        if view.exit {
            break;
        }
    }

    Ok(())
}
