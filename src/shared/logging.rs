//! Process-wide logging, configured once by the entry point
use anyhow::{anyhow, Result};
use env_logger::{Builder, Target};
use log::LevelFilter;
use std::fs::File;
use std::path::PathBuf;

#[derive(Clone, Debug)]
pub struct LoggingConfig {
    pub level: LevelFilter,
    // log to this file instead of stderr
    pub log_file: Option<PathBuf>,
    // per-module overrides, e.g. ("pdbtbx", Warn)
    pub module_levels: Vec<(String, LevelFilter)>,
}

impl Default for LoggingConfig {
    fn default() -> LoggingConfig {
        LoggingConfig {
            level: LevelFilter::Info,
            log_file: None,
            module_levels: vec![("pdbtbx".to_string(), LevelFilter::Error)],
        }
    }
}

impl LoggingConfig {
    pub fn with_level(mut self, level: LevelFilter) -> LoggingConfig {
        self.level = level;
        self
    }

    pub fn with_file(mut self, log_file: PathBuf) -> LoggingConfig {
        self.log_file = Some(log_file);
        self
    }

    pub fn builder(&self) -> Result<Builder> {
        let mut builder = Builder::new();
        builder.filter_level(self.level).format_timestamp_secs();
        for (module, level) in &self.module_levels {
            builder.filter_module(module, *level);
        }
        if let Some(path) = &self.log_file {
            let file = File::create(path)
                .map_err(|e| anyhow!("Unable to create log file {}: {}", path.display(), e))?;
            builder.target(Target::Pipe(Box::new(file)));
        }
        Ok(builder)
    }

    /// Install the logger. Fails if a logger is already installed.
    pub fn init(&self) -> Result<()> {
        self.builder()?
            .try_init()
            .map_err(|e| anyhow!("Logger already initialized: {}", e))
    }
}
