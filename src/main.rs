use clap::Parser;
use icon_lens::cli::{self, Cli};

fn main() {
    // Parse arguments first so --log-level can configure logging
    let cli = Cli::parse();

    // Route log::info!() etc. to /tmp/icon_lens_debug.log, mirrored to stderr when RUST_LOG is set.
    // CLI --log-level takes precedence, then RUST_LOG, then config (applied after the config loads).
    icon_lens::debug::init_log_bridge(cli.log_level.map(|l| l.to_level_filter()));

    log::info!("Starting icon-lens {}", icon_lens::VERSION);

    let code = cli::process_cli(cli);
    std::process::exit(code);
}
