mod app;
mod config;
mod debounce;
mod lookup;
mod render;
mod tui;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use app::location::{LocationSync, PageUrl};
use app::App;
use lookup::{GitHubLookup, UserLookup};

/// octofind — looks up a GitHub user by login and shows their public
/// profile. Without arguments it starts an interactive screen that
/// debounces typed input; with a login it does a single lookup and prints
/// the profile card.
#[derive(Parser, Debug)]
#[command(name = "octofind", version, about)]
struct Cli {
    /// Look up this login once and print the card instead of starting the
    /// interactive screen.
    login: Option<String>,

    /// Path to a config file (defaults to .octofind.toml in the current
    /// directory).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the debounce delay in milliseconds.
    #[arg(long)]
    debounce_ms: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => config::Config::load_from(path)?,
        None => config::Config::load()?,
    };

    let lookup: Arc<dyn UserLookup> =
        Arc::new(GitHubLookup::new(config.api_url(), config.github_token())?);
    let page = PageUrl::new(reqwest::Url::parse(config.page_url())?);

    if let Some(login) = &cli.login {
        return lookup_once(login, lookup.as_ref(), page).await;
    }

    let delay_ms = cli.debounce_ms.unwrap_or_else(|| config.debounce_ms());
    info!(delay_ms, "starting interactive screen");
    let widget = App::new(Duration::from_millis(delay_ms), Box::new(page));
    tui::run(widget, lookup).await?;
    Ok(())
}

/// One-shot mode: fetch, print the card and the synced page URL, exit
/// non-zero with the user-facing message on failure.
async fn lookup_once(
    login: &str,
    lookup: &dyn UserLookup,
    mut page: PageUrl,
) -> Result<(), Box<dyn std::error::Error>> {
    info!(login, "one-shot lookup");
    match lookup.fetch_profile(login).await {
        Ok(profile) => {
            page.set_login_param(&profile.login);
            for line in render::card(&profile) {
                println!("{line}");
            }
            println!();
            println!("{}", page.href());
            Ok(())
        }
        Err(e) => {
            tracing::debug!(error = %e, "one-shot lookup failed");
            eprintln!("{}", e.user_message());
            std::process::exit(1);
        }
    }
}
