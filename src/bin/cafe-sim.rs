//! Host simulator.
//!
//! Runs the firmware dispatch loop against a simulated board, with stdin as
//! the serial RX line and stdout as TX.  Logs go to stderr (`RUST_LOG`).
//!
//! ```text
//! $ printf 'S2.5\nX3\n' | cafe-sim [config.json] [--empty sugar,water]
//! SUCCESS: Sugar command received: 2.50s
//! {"sugar":"High","water":"High",...}
//! ...
//! ```

use std::path::{Path, PathBuf};
use std::process;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::Parser;
use log::info;

use cafe_dispenser::adapters::serial_sink::SerialEventSink;
use cafe_dispenser::adapters::sim::SimBoard;
use cafe_dispenser::adapters::time::MonotonicClock;
use cafe_dispenser::drivers::watchdog::Watchdog;
use cafe_dispenser::products::{PRODUCTS, StockSource};
use cafe_dispenser::serial::LineReader;
use cafe_dispenser::serial::stdio::{StdinTransport, StdoutTransport};
use cafe_dispenser::{DispenserConfig, DispenserService};

#[derive(Parser, Debug)]
#[command(
    name = "cafe-sim",
    version,
    about = "Dispenser firmware on a simulated board, driven over stdin/stdout"
)]
struct Args {
    /// JSON configuration file; built-in defaults when omitted.
    config: Option<PathBuf>,

    /// Telemetry keys of hoppers to start empty (e.g. `sugar,water`).
    #[arg(long, value_delimiter = ',')]
    empty: Vec<String>,
}

fn load_config(path: Option<&Path>) -> Result<DispenserConfig> {
    let Some(path) = path else {
        return Ok(DispenserConfig::default());
    };
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let config = DispenserConfig::from_json(&json)
        .with_context(|| format!("parsing {}", path.display()))?;
    info!("config loaded from {}", path.display());
    Ok(config)
}

/// Fill every hopper and the tank, then empty the ones named on the
/// command line by telemetry key.
fn stock_board(board: &SimBoard, empty: &[String]) -> Result<()> {
    board.set_all_stock(true);
    board.set_tank(true);
    for key in empty {
        let key = key.trim().to_ascii_lowercase();
        let spec = PRODUCTS
            .iter()
            .find(|s| s.telemetry_key == key)
            .with_context(|| format!("unknown product {key:?}"))?;
        match spec.stock {
            Some(StockSource::Laser(sensor)) => board.set_stock(sensor, false),
            Some(StockSource::Tank) => board.set_tank(false),
            None => bail!("{} has no stock sensor", spec.name),
        }
    }
    Ok(())
}

fn run() -> Result<()> {
    let args = Args::parse();
    let config = load_config(args.config.as_deref())?;

    let board = SimBoard::new();
    stock_board(&board, &args.empty)?;

    let mut app = DispenserService::new(&config);
    let mut hw = board.hardware(app.registry().rest_angles());
    hw.enable_stock_sensors()?;

    let watchdog = Watchdog::new(config.watchdog_timeout_ms);
    let clock = MonotonicClock::new();
    let mut source = LineReader::new(StdinTransport::spawn()?);
    let mut sink = SerialEventSink::new(StdoutTransport);

    app.start(&mut hw, &mut sink);
    info!("simulator ready, reading commands from stdin");

    loop {
        app.tick(clock.uptime_ms(), &mut hw, &mut source, &mut sink);
        watchdog.feed();

        // Lines that arrived together with EOF are still in the reader;
        // run them and the operation in flight before exiting.
        if source.is_exhausted() && !app.is_executing() {
            break;
        }
        std::thread::sleep(Duration::from_millis(1));
    }

    let stats = app.stats();
    info!(
        "simulator done: {} admitted, {} rejected, {} completed, {} dropped",
        stats.admitted, stats.rejected, stats.completed, stats.dropped
    );
    Ok(())
}

fn main() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .try_init();

    if let Err(err) = run() {
        eprintln!("error: {err}");
        for cause in err.chain().skip(1) {
            eprintln!("  caused by: {cause}");
        }
        process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cafe_dispenser::app::ports::SensorPort;
    use cafe_dispenser::products::{ServoId, StockSensorId};
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Args::command().debug_assert();
    }

    #[test]
    fn empty_takes_a_comma_list() {
        let args =
            Args::try_parse_from(["cafe-sim", "--empty", "sugar,water", "cafe.json"]).unwrap();
        assert_eq!(args.config.as_deref(), Some(Path::new("cafe.json")));
        assert_eq!(args.empty, ["sugar", "water"]);
    }

    #[test]
    fn no_arguments_means_defaults() {
        let args = Args::try_parse_from(["cafe-sim"]).unwrap();
        assert!(args.config.is_none());
        assert!(args.empty.is_empty());
    }

    #[test]
    fn unknown_flag_is_rejected() {
        assert!(Args::try_parse_from(["cafe-sim", "--full"]).is_err());
    }

    #[test]
    fn empty_hopper_names_are_case_insensitive() {
        let board = SimBoard::new();
        stock_board(&board, &["Sugar".into(), " water".into()]).unwrap();
        let mut hw = board.hardware([0; ServoId::COUNT]);
        hw.enable_stock_sensors().unwrap();
        assert_eq!(hw.stock_present(StockSensorId::Sugar), Ok(false));
        assert_eq!(hw.stock_present(StockSensorId::Coffee), Ok(true));
        assert_eq!(hw.tank_has_liquid(), Ok(false));

        assert!(stock_board(&board, &["cup".into()]).is_err());
        assert!(stock_board(&board, &["tea".into()]).is_err());
    }
}
