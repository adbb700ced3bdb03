mod cli;
mod config;
mod domain;
mod error;
mod infra;
mod media;
mod workflows;

use anyhow::Result;
use clap::Parser;
use log::debug;

use cli::Cli;
use infra::subscene::SubsceneClient;
use media::player;
use workflows::matcher::{MatchOptions, RankOrder};
use workflows::prompt::{Prompt, Terminal};
use workflows::{scanner, session};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut terminal = Terminal::new()?;

    let config_path = config::get_config_path();
    debug!("Using config path: {}", config_path.display());
    let config = config::load_or_create(&config_path, cli.config, &mut terminal)?;

    println!("Checking media directory: {}", config.media_dir.display());
    let releases = scanner::scan(&config.media_dir)?;
    scanner::print_releases(&releases);

    let chosen = if releases.len() == 1 {
        &releases[..]
    } else {
        let choice = terminal.ask("Choose a release: ")?;
        scanner::choose(&releases, &choice)?
    };

    let options = MatchOptions {
        language: config.language.clone(),
        auto: cli.auto,
        order: if cli.best_first {
            RankOrder::BestFirst
        } else {
            RankOrder::Listing
        },
    };

    let client = SubsceneClient::new()?;
    let saved = session::run_batch(&client, chosen, &options, &mut terminal)?;
    debug!("Saved {} subtitle(s)", saved.len());

    if let [release] = chosen {
        if player::should_watch(cli.watch, &release.path, release.is_dir, chosen.len()) {
            player::launch(&config.player, &release.path)?;
        }
    }

    println!("Done.");
    Ok(())
}
