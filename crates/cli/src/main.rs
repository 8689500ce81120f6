//! Board orchestrator CLI.
//!
//! This binary drives one platform composition per invocation. It performs:
//! 1. **Compose:** Read a JSON board description, attach every requested peripheral
//!    in a fixed order, and write the platform description for code generation.
//! 2. **Profiles:** List the video modes the framebuffer accepts.

use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use linsoc_core::config::{Config, PeripheralConfig};
use linsoc_core::soc::devices::VIDEO_TIMINGS;
use linsoc_core::soc::{PlatformDescription, Session};
use linsoc_core::CompositionError;

#[derive(Parser, Debug)]
#[command(
    name = "linsoc",
    author,
    version,
    about = "Linux-capable SoC composer",
    long_about = "Compose a Linux-capable SoC on top of a base platform and write its description.\n\nExamples:\n  linsoc compose boards/arty.json --board arty\n  linsoc compose boards/arty.json --stdout\n  linsoc profiles"
)]
struct Cli {
    /// Log at debug level (overridden by RUST_LOG).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Compose a platform from a board description.
    Compose {
        /// Board description (JSON).
        config: PathBuf,

        /// Board name; selects the default output directory. Defaults to the file stem.
        #[arg(short, long)]
        board: Option<String>,

        /// Output path (default: build/<board>/csr.json).
        #[arg(short, long, conflicts_with = "stdout")]
        output: Option<PathBuf>,

        /// Print the description instead of writing it.
        #[arg(long)]
        stdout: bool,
    },

    /// List the framebuffer video modes.
    Profiles,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Compose {
            config,
            board,
            output,
            stdout,
        } => cmd_compose(&config, board, output, stdout),
        Commands::Profiles => {
            cmd_profiles();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let fallback = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Composes the platform described by `config_path` and hands it off.
///
/// # Arguments
///
/// * `config_path` - Board description file.
/// * `board` - Board name; the file stem when `None`.
/// * `output` - Explicit output path.
/// * `stdout` - Print instead of writing a file.
fn cmd_compose(
    config_path: &Path,
    board: Option<String>,
    output: Option<PathBuf>,
    stdout: bool,
) -> Result<(), CompositionError> {
    let config = Config::load(config_path)?;
    tracing::debug!(path = %config_path.display(), pads = config.pads.len(), "board description loaded");
    let mut session = Session::from_config(&config)?;
    attach(&mut session, &config.peripherals)?;
    let description = session.describe();

    if stdout {
        println!("{}", description.to_json_pretty()?);
        return Ok(());
    }

    let board = board.unwrap_or_else(|| board_name(config_path));
    let path = output.unwrap_or_else(|| PlatformDescription::default_path(&board));
    description.write_json(&path)?;
    println!(
        "[*] {board}: {} peripherals, {} CSR banks, {} constants -> {}",
        description.peripherals.len(),
        description.csr_indices.len(),
        description.constants.len(),
        path.display()
    );
    Ok(())
}

/// Attaches the requested peripherals.
///
/// The order is fixed. Boot finalization runs last so it sees the flash.
fn attach(session: &mut Session, wanted: &PeripheralConfig) -> Result<(), CompositionError> {
    if wanted.spiflash {
        let _ = session.add_spi_flash()?;
    }
    if wanted.leds {
        let _ = session.add_leds()?;
    }
    if wanted.rgb_led {
        let _ = session.add_rgb_led()?;
    }
    if wanted.switches {
        let _ = session.add_switches()?;
    }
    if let Some(spi) = wanted.spi {
        let _ = session.add_spi(spi.data_width, spi.spi_clk_freq)?;
    }
    for &index in &wanted.i2c {
        let _ = session.add_i2c(index)?;
    }
    if wanted.xadc {
        let _ = session.add_xadc()?;
    }
    if let Some(mode) = &wanted.framebuffer {
        let _ = session.add_framebuffer(mode)?;
    }
    if wanted.icap_bitstream {
        let _ = session.add_icap_bitstream()?;
    }
    if let Some(eth) = &wanted.ethernet {
        let _ = session.configure_ethernet(&eth.local_ip, &eth.remote_ip)?;
    }
    if wanted.boot {
        let _ = session.configure_boot()?;
    }
    Ok(())
}

fn board_name(config_path: &Path) -> String {
    config_path
        .file_stem()
        .map_or_else(|| "board".to_string(), |s| s.to_string_lossy().into_owned())
}

fn cmd_profiles() {
    println!("{:<16} {:>12} {:>11} {:>11}", "MODE", "PIX_CLK_MHZ", "H_TOTAL", "V_TOTAL");
    for (name, timing) in VIDEO_TIMINGS {
        println!(
            "{name:<16} {:>12.2} {:>11} {:>11}",
            timing.pix_clk / 1e6,
            timing.h_total(),
            timing.v_total()
        );
    }
}
