use clap::Parser;
use simplelog::{ConfigBuilder, WriteLogger};
use std::fs::File;

use waypost::core::HostPolicy;
use waypost::core::config::{self, CliOverrides, WaypostConfig};

#[derive(Parser)]
#[command(name = "waypost", about = "Destination-based screen and dialog navigation demo")]
struct Args {
    /// What to do when a modal opens while another is showing
    #[arg(long, value_enum)]
    host_policy: Option<HostPolicy>,

    /// Fail when a screen is routed somewhere no target serves it
    #[arg(long)]
    strict: bool,

    /// Log file path (default: waypost.log)
    #[arg(long)]
    log_file: Option<String>,

    /// Log level: off, error, warn, info, debug, trace
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();

    let loaded = config::load_config();
    let defaults = WaypostConfig::default();
    let file_config = match &loaded {
        Ok((config, _)) => config,
        Err(_) => &defaults,
    };
    let resolved = config::resolve(
        file_config,
        &CliOverrides {
            host_policy: args.host_policy,
            strict: args.strict,
            log_file: args.log_file,
            log_level: args.log_level,
        },
    );

    // File logger: the terminal belongs to the UI
    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();
    match File::create(&resolved.log_file) {
        Ok(log_file) => {
            if let Err(e) = WriteLogger::init(resolved.log_level, log_config, log_file) {
                eprintln!("Failed to initialize logger: {e}");
            }
        }
        Err(e) => eprintln!(
            "Failed to create log file {}: {e}",
            resolved.log_file.display()
        ),
    }

    // Config loading ran before the logger existed
    match &loaded {
        Ok((_, source)) => log::info!("Config: {source}"),
        Err(e) => {
            eprintln!("Ignoring config file: {e}");
            log::warn!("Ignoring config file: {e}");
        }
    }
    for warning in &resolved.warnings {
        log::warn!("{warning}");
    }

    log::info!("Waypost starting up with policy: {:?}", resolved.policy);

    waypost::tui::run(resolved)
}
