// Entrypoint for the CLI application.
// - Keeps `main` small: load config, connect to MongoDB, hand the store
//   to the menu and run one command.
// - Returns `anyhow::Result` so fatal errors end the process with a
//   non-zero status and the error chain on stderr.

use anyhow::Context;
use sales_crud::config::Config;
use sales_crud::input::{LineConsole, TermConsole};
use sales_crud::menu;
use sales_crud::store::MongoStore;
use std::io::IsTerminal;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    let config = Config::load().context("Failed to load configuration")?;

    // Logs go to stderr so they don't interleave with the prompts.
    tracing_subscriber::registry()
        .with(EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let store = MongoStore::connect(&config).context("Could not connect to the database")?;

    if std::io::stdin().is_terminal() {
        menu::run(&store, &mut TermConsole)
    } else {
        menu::run(&store, &mut LineConsole::stdio())
    }
}
