use tracing::{error, info};

use cloudvault::{Config, DriveService};

fn main() {
    // Load configuration
    let config = match Config::load("config.toml") {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config.toml: {e}");
            eprintln!("Using default configuration.");
            Config::default()
        }
    };

    // Initialize logging
    if let Err(e) = cloudvault::logging::init(&config.logging) {
        eprintln!("Failed to initialize logging: {e}");
        // Fall back to console-only logging
        cloudvault::logging::init_console_only(&config.logging.level);
    }

    info!("CloudVault - personal cloud drive");

    let drive = match DriveService::new(&config) {
        Ok(drive) => drive,
        Err(e) => {
            error!("Failed to initialize drive: {e}");
            std::process::exit(1);
        }
    };

    let root = drive.session();
    info!(
        root = %drive.current_path(root.cursor()),
        users = drive.users().len(),
        timezone = %config.display.timezone,
        "Drive ready"
    );
}
