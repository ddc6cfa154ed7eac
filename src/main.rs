//! Command-line client for the restaurant recommendation API.
//!
//! Click history is kept in the platform data directory unless `--db` or
//! `--ephemeral` is given.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use restaurant_recommender::app::App;
use restaurant_recommender::platform;
use restaurant_recommender::types::history::ClickHistory;
use restaurant_recommender::types::panel::Panel;
use restaurant_recommender::types::restaurant::{Restaurant, RestaurantId, SearchForm};

/// How long pending click notifications may delay exit.
const NOTIFY_GRACE: Duration = Duration::from_secs(2);

#[derive(Parser, Debug)]
#[command(name = "restaurant-recommender")]
#[command(author, version, about = "Restaurant recommendations seeded by your recent clicks")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// SQLite file holding the click history
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Settings file (defaults to the platform config directory)
    #[arg(long, global = true)]
    config: Option<String>,

    /// Keep click history in memory only
    #[arg(long, global = true)]
    ephemeral: bool,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Enable debug logs
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Search restaurants by cuisine, price range and minimum rating
    Search {
        #[arg(short, long, default_value = "")]
        cuisine: String,
        /// e.g. "$", "$$", "$$$"
        #[arg(short, long, default_value = "")]
        price_range: String,
        /// Minimum rating 1-5; empty or unparsable means 3.5
        #[arg(short, long, default_value = "")]
        rating: String,
    },
    /// Restaurants similar to the most recently clicked one
    Home,
    /// Show one restaurant's details
    Show { id: Option<String> },
    /// Record a click on a restaurant
    Click { id: i64 },
    /// Show the recent-clicks history
    History {
        /// Forget all recorded clicks
        #[arg(long)]
        clear: bool,
    },
}

fn init_tracing(verbose: bool) -> Result<()> {
    let level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.parse()?))
        .init();
    Ok(())
}

fn print_card(r: &Restaurant) {
    println!("#{} {}", r.id, r.name);
    println!(
        "    {} · {} (avg ${}/person) · {} ⭐ ({} reviews)",
        r.cuisine, r.price_range, r.avg_price_per_person, r.rating, r.review_count
    );
    println!("    {} · {}", r.city, r.popular_hours);
}

fn print_panel(panel: &Panel) {
    match panel {
        Panel::Results { title, restaurants } => {
            if let Some(title) = title {
                println!("{}", title);
                println!();
            }
            if restaurants.is_empty() {
                println!("No restaurants found.");
            }
            for r in restaurants {
                print_card(r);
            }
        }
        Panel::Detail { restaurant } => {
            print_card(restaurant);
            if let Some(address) = &restaurant.address {
                println!("    {}, {}", address, restaurant.city);
            }
            if let Some(website) = &restaurant.website {
                println!("    {}", website);
            }
        }
        Panel::Info { message } => println!("{}", message),
        Panel::Error { message } => eprintln!("{}", message),
    }
}

fn print_history(history: &ClickHistory, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string(history)?);
    } else if history.is_empty() {
        println!("No clicks recorded.");
    } else {
        let ids: Vec<String> = history.iter().map(RestaurantId::to_string).collect();
        println!("{} (most recent last)", ids.join(", "));
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose)?;

    let initialized = if cli.ephemeral {
        App::ephemeral(cli.config.clone())
    } else {
        let db = cli.db.clone().unwrap_or_else(platform::default_database_path);
        debug!(db = %db.display(), "using click history database");
        App::new(&db.to_string_lossy(), cli.config.clone())
    };
    let mut app = initialized.map_err(|e| anyhow!("failed to initialize: {}", e))?;

    let output = run(&mut app, cli.command).await;
    app.flush_notifications(NOTIFY_GRACE).await;

    let panel = match output? {
        Output::History(history) => return print_history(&history, cli.json),
        Output::Panel(panel) => panel,
    };

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&panel)?);
    } else {
        print_panel(&panel);
    }
    if panel.is_error() {
        std::process::exit(1);
    }
    Ok(())
}

enum Output {
    Panel(Panel),
    History(ClickHistory),
}

async fn run(app: &mut App, command: Commands) -> Result<Output> {
    let panel = match command {
        Commands::Search {
            cuisine,
            price_range,
            rating,
        } => {
            let form = SearchForm {
                cuisine,
                price_range,
                rating,
            };
            app.service().search(&form).await
        }
        Commands::Home => app.service().home_recommendations().await,
        Commands::Show { id } => app.service().restaurant_details(id.as_deref()).await,
        Commands::Click { id } => {
            let history = app.service_mut().select_restaurant(RestaurantId(id));
            return Ok(Output::History(history));
        }
        Commands::History { clear } => {
            if clear {
                app.service_mut()
                    .clear_history()
                    .map_err(|e| anyhow!("failed to clear history: {}", e))?;
            }
            return Ok(Output::History(app.service().history()));
        }
    };
    Ok(Output::Panel(panel))
}
