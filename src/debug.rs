//! Logging bridge for icon-lens.
//!
//! Routes every `log::info!()` / `log::debug!()` etc. to a log file so the
//! CLI's stdout stays clean for results:
//!
//! - `/tmp/icon_lens_debug.log` on Unix/macOS
//! - `%TEMP%\icon_lens_debug.log` on Windows
//!
//! When `RUST_LOG` is set, records are mirrored to stderr as well.
//! Level precedence: `--log-level` flag, then `RUST_LOG`, then the config
//! file's `log_level` (applied once the config is loaded).

use parking_lot::Mutex;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::sync::OnceLock;
use std::time::{SystemTime, UNIX_EPOCH};

use log::{LevelFilter, Log, Metadata, Record};

/// Where the active level came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LevelSource {
    Cli,
    Env,
    Default,
}

struct LogBridge {
    file: Mutex<Option<File>>,
    mirror_stderr: bool,
    source: LevelSource,
}

impl Log for LogBridge {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = format!(
            "[{}] [{:<5}] [{}] {}\n",
            get_timestamp(),
            record.level(),
            record.target(),
            record.args()
        );

        if let Some(file) = self.file.lock().as_mut() {
            let _ = file.write_all(line.as_bytes());
        }
        if self.mirror_stderr {
            eprint!("{line}");
        }
    }

    fn flush(&self) {
        if let Some(file) = self.file.lock().as_mut() {
            let _ = file.flush();
        }
    }
}

static BRIDGE: OnceLock<LogBridge> = OnceLock::new();

fn get_timestamp() -> String {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    format!("{}.{:06}", now.as_secs(), now.subsec_micros())
}

/// Path of the debug log file.
pub fn log_path() -> PathBuf {
    #[cfg(unix)]
    let path = PathBuf::from("/tmp/icon_lens_debug.log");
    #[cfg(not(unix))]
    let path = std::env::temp_dir().join("icon_lens_debug.log");
    path
}

/// Level requested through `RUST_LOG`.
///
/// Accepts a bare level (`debug`) or directives (`icon_lens=debug,ureq=warn`),
/// in which case the most verbose level mentioned wins.
fn parse_rust_log(value: &str) -> Option<LevelFilter> {
    value
        .split(',')
        .filter_map(|directive| {
            let level = directive.rsplit('=').next()?;
            level.trim().parse::<LevelFilter>().ok()
        })
        .max()
}

/// Install the log bridge. Safe to call more than once; later calls are no-ops.
pub fn init_log_bridge(cli_level: Option<LevelFilter>) {
    let env_value = std::env::var("RUST_LOG").ok();
    let env_level = env_value.as_deref().and_then(parse_rust_log);

    let (level, source) = match (cli_level, env_level) {
        (Some(level), _) => (level, LevelSource::Cli),
        (None, Some(level)) => (level, LevelSource::Env),
        (None, None) => (LevelFilter::Info, LevelSource::Default),
    };

    let bridge = BRIDGE.get_or_init(|| {
        let file = if level == LevelFilter::Off {
            None
        } else {
            // Silently run without a file if it cannot be opened
            OpenOptions::new()
                .write(true)
                .truncate(true)
                .create(true)
                .open(log_path())
                .ok()
        };
        LogBridge {
            file: Mutex::new(file),
            mirror_stderr: env_value.is_some(),
            source,
        }
    });

    if log::set_logger(bridge).is_ok() {
        log::set_max_level(level);
        log::info!(
            "icon-lens {} log started (level={}, source={:?})",
            env!("CARGO_PKG_VERSION"),
            level,
            source
        );
    }
}

/// Apply the config file's level unless the CLI or `RUST_LOG` already chose one.
pub fn apply_config_level(level: LevelFilter) {
    let Some(bridge) = BRIDGE.get() else {
        return;
    };
    if bridge.source == LevelSource::Default {
        log::set_max_level(level);
        log::debug!("Log level set from config: {}", level);
    }
}
