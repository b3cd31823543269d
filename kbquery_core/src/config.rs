use crate::error::InitializationError;
use log::LevelFilter;
use once_cell::sync::OnceCell;
use std::{fs::OpenOptions, path::PathBuf, str::FromStr};

const DEFAULT_KB_FILE: &str = "prolog_kb.pl";

static CONF: OnceCell<Config> = OnceCell::new();
static LOGGER: OnceCell<()> = OnceCell::new();

/// Settings read from the `KBQUERY_*` environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Knowledge base consulted by the evaluator and shown to the user.
    pub kb_file: PathBuf,
    pub log_level: LevelFilter,
    /// When set the log is appended to this file instead of stderr.
    pub log_file: Option<PathBuf>,
}

impl Config {
    /// Process-wide configuration, loaded from the environment on first use.
    pub fn get() -> Result<&'static Config, InitializationError> {
        CONF.get_or_try_init(Config::load)
    }

    pub fn load() -> Result<Config, InitializationError> {
        let mut settings = config::Config::new();
        settings.merge(config::Environment::with_prefix("KBQUERY"))?;
        Ok(Config::from_settings(&settings))
    }

    pub(crate) fn from_settings(settings: &config::Config) -> Config {
        let kb_file = settings
            .get_str("kb_file")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_KB_FILE));

        let log_level = settings
            .get_str("log_level")
            .ok()
            .map(|l| LevelFilter::from_str(&l).unwrap_or(LevelFilter::Debug))
            .unwrap_or(LevelFilter::Info);

        let log_file = settings.get_str("log_file").ok().map(PathBuf::from);

        Config {
            kb_file,
            log_level,
            log_file,
        }
    }
}

/// Install the global logger. Only the first call has any effect.
pub fn init_logger(conf: &Config) {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::builder();
        builder
            .format_module_path(true)
            .format_timestamp_millis()
            .filter(None, conf.log_level);

        let mut file_err = None;
        match conf.log_file.as_ref().map(|path| {
            OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|err| (path, err))
        }) {
            Some(Ok(file)) => {
                builder.target(env_logger::Target::Pipe(Box::new(file)));
            }
            Some(Err(err)) => {
                builder.target(env_logger::Target::Stderr);
                file_err = Some(err);
            }
            None => {
                builder.target(env_logger::Target::Stderr);
            }
        }
        let _ = builder.try_init();

        if let Some((path, err)) = file_err {
            log::warn!("cannot open log file {}: {}", path.display(), err);
        }
    });
}
