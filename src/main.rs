use anyhow::Result;
use clap::Parser;
use tracing::{error, info};

use bloomcam::{BloomcamConfig, BloomcamOrchestrator, StartupMode};

#[derive(Parser, Debug)]
#[command(name = "bloomcam")]
#[command(about = "Smile-gated bloom trigger engine driven by a polled camera expression detector")]
#[command(version)]
#[command(long_about = "Watches a camera feed through an expression detector polled on a fixed \
cadence and fires a one-shot bloom reveal the first time a smile crosses the trigger threshold. \
The demo binary runs against synthetic camera and detector sources; use --keyboard to drive the \
enable gesture and simulated smiles from the terminal.")]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "bloomcam.toml", help = "Path to TOML configuration file")]
    config: String,

    /// Enable debug logging (most verbose)
    #[arg(short, long, help = "Enable debug level logging")]
    debug: bool,

    /// Enable verbose logging (info level)
    #[arg(short, long, help = "Enable verbose info level logging")]
    verbose: bool,

    /// Enable quiet mode (errors only)
    #[arg(short, long, help = "Enable quiet mode - only log errors")]
    quiet: bool,

    /// Validate configuration and exit
    #[arg(long, help = "Validate configuration file and exit without starting the system")]
    validate_config: bool,

    /// Print default configuration and exit
    #[arg(long, help = "Print default configuration in TOML format and exit")]
    print_config: bool,

    /// Dry run mode - initialize but don't start components
    #[arg(long, help = "Perform dry run - bootstrap the detector but don't start polling")]
    dry_run: bool,

    /// Override log format (json, pretty, compact)
    #[arg(long, value_name = "FORMAT", help = "Log output format: json, pretty, or compact")]
    log_format: Option<String>,

    /// Start the camera immediately instead of waiting for the enable gesture
    #[arg(long, help = "Use the immediate startup mode, skipping the enable gesture and hint")]
    immediate: bool,

    /// Enable keyboard input for the enable gesture and simulated smiles
    #[arg(long, help = "Enable keyboard input: ENTER enables, SPACE simulates a smile, q quits")]
    keyboard: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Handle special modes that don't require full initialization
    if args.print_config {
        print_default_config();
        return Ok(());
    }

    // Initialize logging
    init_logging(&args)?;

    info!("Starting bloomcam v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration file: {}", args.config);

    // Load and validate configuration
    let mut config = match BloomcamConfig::load_from_file(&args.config) {
        Ok(config) => {
            info!("Configuration loaded successfully from: {}", args.config);
            config
        }
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    // Validate configuration if requested
    if args.validate_config {
        match config.validate() {
            Ok(()) => {
                info!("Configuration validation successful");
                println!("✓ Configuration is valid");
                return Ok(());
            }
            Err(e) => {
                error!("Configuration validation failed: {}", e);
                eprintln!("✗ Configuration validation failed: {}", e);
                std::process::exit(1);
            }
        }
    }

    config.validate().map_err(|e| {
        error!("Invalid configuration: {}", e);
        anyhow::anyhow!(e)
    })?;

    if args.immediate {
        info!("Startup mode overridden to immediate");
        config.ui.startup = StartupMode::Immediate;
    }

    info!("Bloomcam configuration loaded and validated");

    // Create the orchestrator over the synthetic demo sources
    let mut orchestrator = BloomcamOrchestrator::new(config);
    orchestrator.set_keyboard_enabled(args.keyboard);

    // Initialize all components; a detector bootstrap failure is fatal and
    // surfaced exactly once
    if let Err(e) = orchestrator.initialize().await {
        error!("Failed to initialize system: {}", e);
        eprintln!("✗ Bloomcam could not start: {}", e);
        std::process::exit(1);
    }

    // Handle dry run mode
    if args.dry_run {
        info!("Dry run mode - components initialized but not started");
        println!("✓ Dry run completed successfully - all components initialized");
        return Ok(());
    }

    // Start according to the configured startup mode
    orchestrator.start().await.map_err(|e| {
        error!("Failed to start system: {}", e);
        e
    })?;

    // Run the main application loop with signal handling
    let exit_code = orchestrator.run().await.map_err(|e| {
        error!("System error during execution: {}", e);
        e
    })?;

    info!("Bloomcam exited with code: {}", exit_code);

    std::process::exit(exit_code);
}

fn init_logging(args: &Args) -> Result<()> {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

    // Determine log level based on flags
    let log_level = if args.debug {
        "debug"
    } else if args.verbose {
        "info"
    } else if args.quiet {
        "error"
    } else {
        "warn"
    };

    // Create environment filter
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("bloomcam={}", log_level)));

    // Configure format based on options
    let fmt_layer = match args.log_format.as_deref() {
        Some("json") => fmt::layer()
            .json()
            .with_target(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true)
            .boxed(),
        Some("compact") => fmt::layer()
            .compact()
            .with_target(false)
            .with_thread_ids(false)
            .with_file(false)
            .with_line_number(false)
            .boxed(),
        Some("pretty") | None => fmt::layer()
            .pretty()
            .with_target(true)
            .with_thread_ids(args.debug)
            .with_file(args.debug)
            .with_line_number(args.debug)
            .boxed(),
        Some(format) => {
            eprintln!("Warning: Unknown log format '{}', using default", format);
            fmt::layer()
                .with_target(true)
                .with_thread_ids(args.debug)
                .with_file(args.debug)
                .with_line_number(args.debug)
                .boxed()
        }
    };

    // Initialize subscriber
    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(env_filter)
        .init();

    Ok(())
}

/// Print default configuration in TOML format
fn print_default_config() {
    println!("# Bloomcam Configuration File");
    println!("# This is the default configuration with all available options");
    println!();

    let default_config = r#"[detector]
# Polling period for detection cycles, in milliseconds
poll_interval_ms = 100
# Detector variant: "tiny" (fast) or "full"
variant = "tiny"
# Face localization confidence threshold (not the smile threshold)
score_threshold = 0.5

[trigger]
# Minimum happiness score that qualifies as a smile (strict comparison)
smile_threshold = 0.5

[audio]
# Playback volume for the background track (0.0 - 1.0)
volume = 0.5
# Whether the background track loops
looped = true
# Label of the background track asset
track = "bg-music"

[ui]
# Startup strategy: "gesture" (enable button, overlay, hint) or "immediate"
startup = "gesture"
# Fade duration before the permission overlay is detached, in milliseconds
overlay_fade_ms = 500
# Fade duration before the smile hint is detached, in milliseconds
hint_fade_ms = 500
# Delay after the enable gesture before the smile hint is revealed, in milliseconds
hint_reveal_delay_ms = 600

[system]
# Event bus capacity
event_bus_capacity = 100
"#;

    println!("{}", default_config);
}
