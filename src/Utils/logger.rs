//! Logger initialisation for the calculator: terminal output plus an optional log file, both at the
//! level chosen in `CalcConfig`. Only the first initialisation in a process takes effect.
use chrono::Local;
use simplelog::*;
use std::fs::File;

use crate::Utils::config::CalcConfig;

/// `<prefix>_<date>_<time>.txt`
pub fn timestamped_log_name(prefix: &str) -> String {
    let date_and_time = Local::now().format("%Y-%m-%d_%H-%M-%S");
    format!("{}_{}.txt", prefix, date_and_time)
}

/// Resolves the configured log file name; `"auto"` becomes a timestamped name.
pub fn log_file_name(config: &CalcConfig) -> Option<String> {
    config.log_file.as_deref().map(|name| {
        if name == "auto" {
            timestamped_log_name("calc_log")
        } else {
            name.to_string()
        }
    })
}

/// Installs the global logger. Returns false if a logger was already installed or nothing was
/// configured to log to.
pub fn init_logger(config: &CalcConfig) -> bool {
    let level = config.log_level;
    let mut loggers: Vec<Box<dyn SharedLogger>> = Vec::new();

    if config.log_to_console {
        loggers.push(TermLogger::new(
            level,
            Config::default(),
            TerminalMode::Mixed,
            ColorChoice::Auto,
        ));
    }
    if let Some(filename) = log_file_name(config) {
        match File::create(&filename) {
            Ok(file) => loggers.push(WriteLogger::new(level, Config::default(), file)),
            Err(e) => eprintln!("cannot create log file {}: {}", filename, e),
        }
    }
    if loggers.is_empty() {
        return false;
    }
    CombinedLogger::init(loggers).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timestamped_log_name() {
        let name = timestamped_log_name("calc_log");
        assert!(name.starts_with("calc_log_"));
        assert!(name.ends_with(".txt"));
        // calc_log_YYYY-mm-dd_HH-MM-SS.txt
        assert_eq!(name.len(), "calc_log_".len() + 19 + ".txt".len());
    }

    #[test]
    fn test_log_file_name() {
        let config = CalcConfig::default();
        assert_eq!(log_file_name(&config), None);
        let config = CalcConfig::default().with_log_file(Some("my.log"));
        assert_eq!(log_file_name(&config).as_deref(), Some("my.log"));
        let config = CalcConfig::default().with_log_file(Some("auto"));
        assert!(log_file_name(&config).unwrap().starts_with("calc_log_"));
    }

    #[test]
    fn test_init_logger_with_nothing_to_log_to() {
        let mut config = CalcConfig::default();
        config.log_to_console = false;
        assert!(!init_logger(&config));
    }

    #[test]
    fn test_second_init_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("calc.log");
        let config = CalcConfig::default()
            .with_log_level(log::LevelFilter::Warn)
            .with_log_file(path.to_str());
        // whichever test installs the logger first wins, the second call is always rejected
        let _ = init_logger(&config);
        assert!(!init_logger(&config));
    }
}
