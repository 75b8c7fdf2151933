//! CLI smoke entry point.
//!
//! # Responsibility
//! - Compose a workspace from `LESSONBOOK_*` settings and load it.
//! - Print the sorted roster with the nearest upcoming lesson marked.

use chrono::Local;
use futures::executor::block_on;
use lessonbook_core::db::open_db;
use lessonbook_core::{core_version, init_logging, BackendMode, CoreConfig, Holder, Workspace};
use std::error::Error;
use std::process::ExitCode;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("lessonbook: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let config = CoreConfig::from_env()?;
    if let Some(log_dir) = &config.log_dir {
        init_logging(config.log_level, log_dir)?;
    }

    let conn = match (config.backend, &config.db_path) {
        (BackendMode::Live, Some(path)) => Some(open_db(path)?),
        _ => None,
    };
    let workspace = Workspace::compose(config.backend, conn.as_ref())?;
    let loaded = block_on(workspace.load(&config.owner_id))?;

    let now = Local::now().naive_local();
    let roster = workspace.roster(now);

    println!(
        "lessonbook_core version={} backend={} records={}",
        core_version(),
        config.backend.as_str(),
        loaded
    );
    for (index, holder) in roster.active().iter().enumerate() {
        let marker = if roster.nearest_index() == Some(index) { '>' } else { ' ' };
        println!("{marker} {}", describe(holder));
    }
    if !roster.inactive().is_empty() {
        println!("archived:");
        for holder in roster.inactive() {
            println!("  {}", describe(holder));
        }
    }
    Ok(())
}

fn describe(holder: &Holder) -> String {
    let schedule = holder.schedule();
    match (schedule.weekday, schedule.start_time) {
        (Some(weekday), Some(start)) => {
            format!("{:<10} {} {}", weekday.label(), start, holder.display_name())
        }
        _ => format!("{:<16} {}", "-", holder.display_name()),
    }
}
