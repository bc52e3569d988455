use anyhow::Result;
use chrono::Local;
use clap::Parser;
use tracing::level_filters::LevelFilter;

use thyme::{app, cli, db, event, logging, tui};

fn main() -> Result<()> {
    let cli_opts = cli::Cli::parse();
    let db_path = cli_opts.db.clone().unwrap_or_else(db::default_db_path);
    logging::enable_logging(
        &db::data_dir(),
        cli_opts.verbose.then_some(LevelFilter::DEBUG),
    )?;
    let conn = db::init(&db_path)?;
    if let Some(command) = cli_opts.command {
        return cli::run(command, &conn);
    }

    let mut app = app::App::new(conn, Local::now().date_naive());
    let mut terminal = tui::init()?;
    let result = event::run(&mut app, &mut terminal);

    tui::restore()?;

    result
}
