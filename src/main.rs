use anyhow::Context;
use clap::{Parser, Subcommand};
use mepsan_rs::constants::{DEFAULT_BAUDRATE, DEFAULT_REPLAY_DELAY_MS, DEFAULT_SERIAL_PORT, UNIT_PRICE_SAR};
use mepsan_rs::protocol::{ByteSource, ReplaySource, SerialConfig, SerialSource};
use mepsan_rs::report::{render_summary, report_path_for};
use mepsan_rs::{
    decode_dump, init_logger, log_error, log_info, run_live, DecodeReport, DecoderConfig,
    IncrementMode, PumpMonitor, StreamDecoder,
};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "mepsan-cli")]
#[command(about = "Decoder for the Mepsan fuel pump serial protocol")]
struct Cli {
    /// Unit price reported with fueling records (SAR per liter)
    #[arg(long, global = true, default_value_t = UNIT_PRICE_SAR)]
    unit_price: f64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode a captured hex dump into a JSON report
    Decode {
        input: PathBuf,
        /// Report path (defaults to <input>_decoded.json)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Print the human-readable fueling summary instead of the JSON
        #[arg(long)]
        summary: bool,
        /// Compute increments per pump instead of across all pumps
        #[arg(long)]
        per_pump: bool,
    },
    /// Replay a capture line by line as if it were live
    Simulate {
        input: PathBuf,
        #[arg(long, default_value_t = DEFAULT_REPLAY_DELAY_MS)]
        delay_ms: u64,
    },
    /// Monitor a live pump link
    Listen {
        #[arg(short, long, default_value = DEFAULT_SERIAL_PORT)]
        port: String,
        #[arg(short, long, default_value_t = DEFAULT_BAUDRATE)]
        baudrate: u32,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logger();

    let cli = Cli::parse();
    let config = DecoderConfig {
        unit_price: cli.unit_price,
        ..DecoderConfig::default()
    };

    match cli.command {
        Commands::Decode { input, output, summary, per_pump } => {
            let raw = std::fs::read_to_string(&input)
                .with_context(|| format!("cannot read {}", input.display()))?;
            let records = decode_dump(&raw, &config)
                .with_context(|| format!("cannot parse {}", input.display()))?;

            if summary {
                print!("{}", render_summary(&records, config.unit_price));
                return Ok(());
            }

            let mode = if per_pump { IncrementMode::PerPump } else { IncrementMode::Global };
            let report = DecodeReport::from_records(input.display().to_string(), records, &config, mode);
            let output = output.unwrap_or_else(|| report_path_for(&input));
            report
                .write_to(&output)
                .with_context(|| format!("cannot write {}", output.display()))?;
            println!("{}", report.to_json_pretty()?);
        }
        Commands::Simulate { input, delay_ms } => {
            let raw = std::fs::read_to_string(&input)
                .with_context(|| format!("cannot read {}", input.display()))?;
            println!("FUEL PUMP PROTOCOL DECODER - SIMULATION MODE");
            println!("Reading from: {}\n", input.display());
            let mut source = ReplaySource::new(&raw, Duration::from_millis(delay_ms));
            monitor(&mut source, config).await?;
            println!("\nSimulation complete");
        }
        Commands::Listen { port, baudrate } => {
            let serial = SerialConfig { baudrate, ..SerialConfig::default() };
            let mut source = SerialSource::open(&port, &serial)
                .with_context(|| format!("could not open serial port {port}"))?;
            println!("FUEL PUMP PROTOCOL DECODER - LIVE MODE");
            println!("Listening on {port} at {baudrate} baud\n");
            monitor(&mut source, config).await?;
            log_info("Port closed");
        }
    }

    Ok(())
}

/// Print fueling events until the source ends or Ctrl-C is pressed.
async fn monitor<S: ByteSource>(source: &mut S, config: DecoderConfig) -> anyhow::Result<()> {
    let mut decoder = StreamDecoder::with_config(config);
    let mut pumps = PumpMonitor::new();

    tokio::select! {
        result = run_live(source, &mut decoder, &mut pumps, |event| println!("\n{event}")) => {
            if let Err(e) = result {
                log_error(&format!("Monitoring stopped: {e}"));
                return Err(e.into());
            }
        }
        _ = tokio::signal::ctrl_c() => {
            println!("\nStopped by user.");
        }
    }
    Ok(())
}
