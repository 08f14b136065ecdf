//! Subcommand implementations for the CLI host.

use std::path::Path;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use icon_lens_config::{Config, FileWatcher};

use super::{Cli, Commands};
use crate::activation::{Activation, check_activation};
use crate::controller::{HostEvent, RefreshController, RefreshReport};
use crate::debug;
use crate::host::{RecordingSurface, SourceDocument};
use crate::loader::FontLoader;
use crate::session::Session;

/// Longest sleep between checks of the watchers and the scheduler.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Debounce for the document watcher; the scheduler applies the real debounce.
const DOCUMENT_WATCH_DEBOUNCE_MS: u64 = 20;

/// Debounce for the config watcher, covering editors that save in steps.
const CONFIG_WATCH_DEBOUNCE_MS: u64 = 200;

/// Run the parsed command line, returning the exit code.
pub fn run(cli: Cli) -> Result<i32> {
    let config_path = cli.config.clone().unwrap_or_else(Config::config_path);
    let config = Config::load_from(&config_path)
        .with_context(|| format!("Failed to load configuration from {}", config_path.display()))?;
    debug::apply_config_level(config.log_level.to_level_filter());

    let workspace = match &cli.workspace {
        Some(dir) => dir.clone(),
        None => std::env::current_dir().context("Failed to determine current directory")?,
    };

    match cli.command {
        Commands::Scan { file, json } => {
            if !gate(&config, &workspace) {
                return Ok(0);
            }
            scan(config, &file, json)
        }
        Commands::Watch { file, exit_after } => {
            if !gate(&config, &workspace) {
                return Ok(0);
            }
            watch(config, &config_path, &file, exit_after)
        }
        Commands::Render { icons } => render(config, &icons),
        Commands::Complete { prefix } => {
            if !gate(&config, &workspace) {
                return Ok(0);
            }
            complete(config, &prefix)
        }
        Commands::List => list(config),
    }
}

/// Print why the engine is inactive and return whether it may run.
fn gate(config: &Config, workspace: &Path) -> bool {
    match check_activation(config, workspace) {
        Activation::Active => true,
        Activation::Inactive(reason) => {
            println!("icon-lens inactive: {reason}");
            false
        }
    }
}

fn new_controller(config: Config) -> RefreshController<RecordingSurface> {
    RefreshController::new(
        Session::new(config),
        FontLoader::http(),
        RecordingSurface::new(),
    )
}

fn open_document(file: &Path) -> Result<SourceDocument> {
    SourceDocument::open(file).with_context(|| format!("Failed to read {}", file.display()))
}

fn print_report(report: &RefreshReport, json: bool) -> Result<()> {
    if json {
        let text =
            serde_json::to_string_pretty(report).context("Failed to serialize refresh report")?;
        println!("{text}");
        return Ok(());
    }

    for group in &report.groups {
        for range in &group.ranges {
            println!("{}:{}-{} {}", range.line, range.start, range.end, group.name);
        }
    }
    for name in &report.skipped {
        println!("skipped {name}");
    }
    Ok(())
}

fn scan(config: Config, file: &Path, json: bool) -> Result<i32> {
    let document = open_document(file)?;
    let mut controller = new_controller(config);
    let now = Instant::now();
    controller.activate(Some(document), now);

    let report = controller.poll(now).unwrap_or_default();
    print_report(&report, json)?;
    controller.shutdown();
    Ok(0)
}

fn watch(config: Config, config_path: &Path, file: &Path, exit_after: Option<f64>) -> Result<i32> {
    let document = open_document(file)?;
    let document_watcher = FileWatcher::new(file, DOCUMENT_WATCH_DEBOUNCE_MS)?;
    let config_watcher = match FileWatcher::new(config_path, CONFIG_WATCH_DEBOUNCE_MS) {
        Ok(watcher) => Some(watcher),
        Err(e) => {
            log::warn!("Config hot reload unavailable: {:#}", e);
            None
        }
    };

    let exit_at = exit_after.map(|secs| Instant::now() + Duration::from_secs_f64(secs.max(0.0)));
    let mut controller = new_controller(config);
    controller.activate(Some(document), Instant::now());

    loop {
        let now = Instant::now();
        if exit_at.is_some_and(|at| now >= at) {
            log::info!("Exit timer elapsed");
            break;
        }

        if document_watcher.drain() {
            match SourceDocument::open(file) {
                Ok(document) => controller.handle_event(HostEvent::DocumentEdited(document), now),
                Err(e) => log::warn!("Failed to re-read {}: {}", file.display(), e),
            }
        }

        if let Some(watcher) = &config_watcher
            && watcher.drain()
        {
            match Config::load_from(config_path) {
                Ok(config) => {
                    debug::apply_config_level(config.log_level.to_level_filter());
                    controller.handle_event(HostEvent::ConfigurationChanged(config), now);
                }
                Err(e) => log::warn!("Ignoring invalid configuration change: {:#}", e),
            }
        }

        if let Some(report) = controller.poll(Instant::now()) {
            print_report(&report, false)?;
        }

        let sleep = controller
            .next_deadline()
            .map(|due| due.saturating_duration_since(Instant::now()))
            .unwrap_or(POLL_INTERVAL)
            .min(POLL_INTERVAL);
        std::thread::sleep(sleep);
    }

    controller.shutdown();
    Ok(0)
}

/// Session with the configured font loaded; a load failure is reported but not fatal.
fn loaded_session(config: Config) -> Session {
    let mut session = Session::new(config);
    if let Err(e) = session.load_font(&FontLoader::http()) {
        log::error!("Icon font load failed: {}", e);
        eprintln!("icon-lens: warning: {e}");
    }
    session
}

fn render(config: Config, icons: &[String]) -> Result<i32> {
    let session = loaded_session(config);
    let mut unavailable = 0;
    for icon in icons {
        match session.rasterize(icon) {
            Ok(path) => println!("{icon}\t{}", path.display()),
            Err(e) => {
                log::debug!("Render of {} unavailable: {}", icon, e);
                println!("{icon}\tunavailable ({e})");
                unavailable += 1;
            }
        }
    }
    Ok(if unavailable == 0 { 0 } else { 1 })
}

fn complete(config: Config, prefix: &str) -> Result<i32> {
    let mut controller = new_controller(config);
    controller.activate(None, Instant::now());

    let Some(items) = controller.complete(prefix) else {
        println!("no completions: prefix must end with \"{}\"", crate::completion::TRIGGER_TOKEN);
        return Ok(0);
    };
    for item in &items {
        println!(
            "{}\t{}\t{}",
            item.label,
            item.insert_text,
            item.documentation.as_deref().unwrap_or("")
        );
    }
    controller.shutdown();
    Ok(0)
}

fn list(config: Config) -> Result<i32> {
    let mut session = Session::new(config);
    session
        .load_font(&FontLoader::http())
        .map_err(|e| anyhow::anyhow!("Failed to load icon font: {e}"))?;

    let Some(font) = session.font() else {
        return Ok(1);
    };
    for (name, codepoint) in font.codepoints().iter() {
        println!("{name}\tU+{codepoint:04X}");
    }
    Ok(0)
}
