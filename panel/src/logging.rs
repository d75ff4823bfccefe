use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use env_logger::{Env, Target};

/// Where log records go
pub enum LogTarget<'a> {
    /// Append to a file; the terminal belongs to the UI
    File(&'a Path),
    Stderr,
}

/// Set up `env_logger`, honouring `RUST_LOG` (default level `info`)
pub fn init(target: LogTarget<'_>) -> Result<()> {
    let mut builder = env_logger::Builder::from_env(Env::default().default_filter_or("info"));

    builder.format(|buf, record| {
        let datetime = chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
        let thread_id = std::thread::current().id();
        writeln!(
            buf,
            "[{} {:?}] {:<5} {}: {}",
            datetime,
            thread_id,
            record.level(),
            record.target(),
            record.args()
        )
    });

    match target {
        LogTarget::File(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            builder.target(Target::Pipe(Box::new(file)));
        }
        LogTarget::Stderr => {
            builder.target(Target::Stderr);
        }
    }

    builder.try_init().context("Failed to initialize logger")
}
