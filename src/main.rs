//! rpsgen - Test packet generator for the Rock-Paper-Scissors UDP protocol
//!
//! Builds the full synthetic packet matrix (games x opcodes x sub-options)
//! and fires it at an RPS server under development.

mod config;
mod matrix;
mod net;
mod protocol;

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use config::Config;
use matrix::MatrixSpec;
use net::{SendConfig, Sender};
use protocol::{decode, encode_packet, Opcode};

/// rpsgen - RPS protocol test packet generator
#[derive(Parser)]
#[command(name = "rpsgen")]
#[command(version = "0.1.0")]
#[command(about = "Generate and send RPS protocol test packets", long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the test matrix and send it over UDP
    Send {
        /// Destination host (overrides config)
        #[arg(short, long)]
        target: Option<String>,

        /// Destination port (overrides config)
        #[arg(short, long)]
        port: Option<u16>,

        /// Pause between datagrams in milliseconds
        #[arg(long)]
        pause_ms: Option<u64>,

        /// Print the packets instead of sending them
        #[arg(long)]
        dry_run: bool,
    },

    /// Print the generated test matrix as hex
    Matrix,

    /// Encode a single packet and print it as hex
    Encode {
        /// Opcode byte (1=INIT 2=MOVE 3=RESULT 4=ACK 5=ERROR)
        #[arg(short, long)]
        opcode: u8,

        /// Game ID
        #[arg(short, long, default_value_t = 0x1234)]
        game_id: u16,

        /// Sub-option (required for MOVE/RESULT)
        #[arg(short, long)]
        sub_option: Option<u8>,
    },

    /// Decode a 12-byte packet given as hex
    Decode {
        /// Packet bytes, e.g. "01 02 12 34 00 00 00 3c 00 00 00 02"
        hex: String,
    },

    /// Show current configuration
    Config {
        /// Generate sample configuration
        #[arg(long)]
        generate: bool,

        /// Output path for generated config
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    // Load configuration
    let config = if let Some(config_path) = &cli.config {
        Config::load(config_path)?
    } else {
        Config::load_default().unwrap_or_default()
    };

    match cli.command {
        Commands::Send {
            target,
            port,
            pause_ms,
            dry_run,
        } => {
            run_send(config, target, port, pause_ms, dry_run).await?;
        }
        Commands::Matrix => {
            run_matrix(&config);
        }
        Commands::Encode {
            opcode,
            game_id,
            sub_option,
        } => {
            let wire = protocol::encode(
                config.protocol.version,
                opcode,
                game_id,
                config.protocol.ttl,
                sub_option,
            )?;
            println!("{}", hex_string(&wire));
        }
        Commands::Decode { hex } => {
            run_decode(&hex)?;
        }
        Commands::Config { generate, output } => {
            if generate {
                let sample = config::generate_sample_config();
                if let Some(path) = output {
                    std::fs::write(&path, &sample)?;
                    println!("Configuration written to: {}", path.display());
                } else {
                    println!("{}", sample);
                }
            } else {
                println!("{}", toml::to_string_pretty(&config)?);
            }
        }
    }

    Ok(())
}

/// Build the matrix spec from config
fn matrix_spec(config: &Config) -> MatrixSpec {
    MatrixSpec {
        version: config.protocol.version,
        ttl: config.protocol.ttl,
        game_ids: config.matrix.game_ids.clone(),
        opcodes: Opcode::ALL.iter().map(|op| *op as u8).collect(),
    }
}

/// Generate the matrix and transmit it
async fn run_send(
    mut config: Config,
    target: Option<String>,
    port: Option<u16>,
    pause_ms: Option<u64>,
    dry_run: bool,
) -> anyhow::Result<()> {
    if let Some(host) = target {
        config.target.host = host;
    }
    if let Some(port) = port {
        config.target.port = port;
    }
    if let Some(pause) = pause_ms {
        config.send.pause_ms = pause;
    }

    let spec = matrix_spec(&config);
    let packets = matrix::generate(&spec);

    tracing::info!(
        "generated {} packets ({} games x canonical opcode set)",
        packets.len(),
        spec.game_ids.len()
    );

    if dry_run {
        for packet in &packets {
            println!("{}  {}", hex_string(&encode_packet(packet)), packet.describe());
        }
        return Ok(());
    }

    let addr = config.target.socket_addr()?;
    let mut send_config = SendConfig::new(addr);
    if config.send.pause_ms > 0 {
        send_config = send_config.with_pause(Duration::from_millis(config.send.pause_ms));
    }

    let sender = Sender::connect(send_config).await?;
    let sent = sender.send_all(&packets).await?;
    println!("Sent {} packets to {}", sent, addr);

    Ok(())
}

/// Print the generated matrix with decoded field summaries
fn run_matrix(config: &Config) {
    let packets = matrix::generate(&matrix_spec(config));

    println!("Test matrix ({} packets):\n", packets.len());
    for (i, packet) in packets.iter().enumerate() {
        println!(
            "{:3}  {}  {}",
            i + 1,
            hex_string(&encode_packet(packet)),
            packet.describe()
        );
    }
}

/// Decode a hex string and print every field
fn run_decode(hex: &str) -> anyhow::Result<()> {
    let bytes = parse_hex(hex)?;
    let packet = decode(&bytes)?;

    println!("Version : {}", packet.header.version);
    println!(
        "Opcode  : {} ({:#04x})",
        packet.header.opcode.name(),
        packet.header.opcode as u8
    );
    println!("Game ID : {:#06x}", packet.header.game_id);
    println!("TTL     : {}", packet.header.ttl);
    match packet.payload {
        protocol::Payload::Padding => println!("Payload : padding"),
        protocol::Payload::Move(m) => println!("Payload : move = {} ({})", m.name(), m as u8),
        protocol::Payload::Result(o) => println!("Payload : result = {} ({})", o.name(), o as u8),
        protocol::Payload::End => println!("Payload : error message \"END!\""),
    }

    Ok(())
}

/// Render bytes as space-separated uppercase hex
fn hex_string(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{:02X}", b))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Parse hex input, tolerating spaces and colons between byte pairs
fn parse_hex(input: &str) -> anyhow::Result<Vec<u8>> {
    let mut digits = Vec::new();
    for c in input.chars() {
        if c.is_whitespace() || c == ':' {
            continue;
        }
        let digit = c
            .to_digit(16)
            .ok_or_else(|| anyhow::anyhow!("invalid hex digit: {:?}", c))?;
        digits.push(digit as u8);
    }

    if digits.len() % 2 != 0 {
        anyhow::bail!("odd number of hex digits");
    }

    Ok(digits.chunks(2).map(|pair| (pair[0] << 4) | pair[1]).collect())
}
