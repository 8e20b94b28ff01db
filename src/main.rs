//! Binary entry point: parse flags, then either convert a CSV export or open
//! favorites storage, start the catalog load and drive the TUI.
use anyhow::Context;
use clap::Parser;
use tracing::{info, warn};

use karaoke_songbook::config::{db_path, log_dir, CliArgs, Command};
use karaoke_songbook::logging::{init_file_logging, init_stderr_logging};
use karaoke_songbook::transform::convert_file;
use karaoke_songbook::{open_repository, run_app, spawn_load, App, SearchModel};

fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();

    if let Some(Command::Convert { input, output }) = &args.command {
        init_stderr_logging()?;
        let summary = convert_file(input, output)
            .with_context(|| format!("failed to convert {}", input.display()))?;
        println!(
            "Kept {} of {} songs, written to {}",
            summary.kept_rows,
            summary.total_rows,
            output.display()
        );
        return Ok(());
    }

    // An unusable data directory costs logging and saved favorites, never the
    // session. The TUI owns the terminal, so there is no stderr fallback.
    let data_dir = args.data_dir();
    let _guard = match &data_dir {
        Ok(dir) => init_file_logging(&log_dir(dir)).ok(),
        Err(_) => None,
    };
    match &data_dir {
        Ok(dir) => info!(source = %args.source, data_dir = %dir.display(), "starting songbook"),
        Err(err) => warn!(source = %args.source, error = %err, "starting songbook without a data directory"),
    }

    let db = data_dir.as_ref().ok().map(|dir| db_path(dir));
    let repository = open_repository(db.as_deref());

    let model = SearchModel::new(repository, args.page_size).with_pagination(args.paginate);
    let loader = spawn_load(args.source.clone());
    let mut app = App::new(model, loader);
    run_app(&mut app)
}
