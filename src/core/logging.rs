//! Logging initialization
//!
//! Sets up combined console + file logging so the bot can be watched live
//! and audited after the fact on the hosting platform.

use anyhow::Result;
use simplelog::*;
use std::fs::File;

/// Set up the global logger, writing to the terminal and to `log_file_path`.
///
/// The log file is truncated on every start; the hosting platform keeps
/// history. Fails if the file cannot be created or a logger is already
/// installed, so call this once, first thing in `main`.
pub fn init_logger(log_file_path: &str) -> Result<()> {
    let log_file = File::create(log_file_path).map_err(|e| anyhow::anyhow!("Failed to create log file: {}", e))?;

    CombinedLogger::init(vec![
        TermLogger::new(
            LevelFilter::Info,
            Config::default(),
            TerminalMode::Mixed,
            ColorChoice::Auto,
        ),
        WriteLogger::new(LevelFilter::Info, Config::default(), log_file),
    ])
    .map_err(|e| anyhow::anyhow!("Failed to initialize logger: {}", e))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_logger_creates_log_file() {
        let dir = std::env::temp_dir().join("tokgrab_log_test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("test.log");

        // No other test installs a global logger, so the first init succeeds.
        init_logger(path.to_str().unwrap()).unwrap();
        assert!(path.exists());
    }
}
