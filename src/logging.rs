//! Journal logging setup (`journalctl --user -t spark -f`).

use log::{Level, LevelFilter, Log, Metadata, Record};
use systemd_journal_logger::JournalLog;

use crate::config::SparkConfig;

/// Spark targets pass at Info, or Debug when the toggle is on. Everything else at Warn.
pub fn level_enabled(target: &str, level: Level, debug: bool) -> bool {
    let max = if !target.starts_with("spark") {
        LevelFilter::Warn
    } else if debug {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    level <= max
}

struct FilteredJournal {
    inner: JournalLog,
}

impl Log for FilteredJournal {
    fn enabled(&self, metadata: &Metadata) -> bool {
        level_enabled(metadata.target(), metadata.level(), crate::debug_logging())
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            self.inner.log(record);
        }
    }

    fn flush(&self) {
        self.inner.flush();
    }
}

/// Install the journal logger with the config's debug toggle. Call once at startup.
pub fn init(config: &SparkConfig) -> crate::Result<()> {
    let journal = JournalLog::new()?.with_syslog_identifier("spark".to_string());

    crate::set_debug_logging(config.debug_logging);

    log::set_boxed_logger(Box::new(FilteredJournal { inner: journal }))
        .map_err(|e| crate::Error::Logger(e.to_string()))?;
    // The filter does the real work; let every record reach it.
    log::set_max_level(LevelFilter::Debug);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spark_targets_log_info_and_above() {
        assert!(level_enabled("spark::application", Level::Info, false));
        assert!(level_enabled("spark", Level::Error, false));
        assert!(!level_enabled("spark::ai", Level::Debug, false));
    }

    #[test]
    fn debug_toggle_opens_spark_debug_only() {
        assert!(level_enabled("spark::ai", Level::Debug, true));
        assert!(!level_enabled("spark::ai", Level::Trace, true));
        assert!(!level_enabled("reqwest::connect", Level::Debug, true));
        assert!(!level_enabled("hyper", Level::Info, true));
    }

    #[test]
    fn other_targets_log_warn_and_above() {
        assert!(level_enabled("reqwest", Level::Warn, false));
        assert!(level_enabled("hyper", Level::Error, false));
        assert!(!level_enabled("hyper", Level::Info, false));
    }
}
