//! Command-line client for the cipher service.
//!
//! ```text
//! cipherwire -e "hello world"    # prints: ifmmp xpsme
//! cipherwire -d "ifmmp xpsme"    # prints: hello world
//! ```

use std::error::Error;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use cipherwire::{Client, Command, ExchangeConfig};
use clap::{ArgGroup, Parser};
use tracing_subscriber::EnvFilter;

/// Encode or decode text with a remote Caesar cipher service.
#[derive(Parser, Debug)]
#[command(name = "cipherwire", version, about)]
#[command(group(ArgGroup::new("operation").required(true).args(["encode", "decode"])))]
struct Cli {
    /// Text to encode.
    #[arg(short = 'e', long, value_name = "TEXT")]
    encode: Option<String>,

    /// Text to decode.
    #[arg(short = 'd', long, value_name = "TEXT")]
    decode: Option<String>,

    /// JSON configuration file; flags below override its values.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Service address (host:port).
    #[arg(long)]
    addr: Option<String>,

    /// Value of the Host header.
    #[arg(long)]
    host: Option<String>,

    /// Largest response header accepted, in bytes.
    #[arg(long)]
    peek_capacity: Option<usize>,

    /// Largest response body accepted, in bytes.
    #[arg(long)]
    max_content_length: Option<usize>,

    /// Deadline for the whole exchange, in milliseconds.
    #[arg(long)]
    timeout_ms: Option<u64>,
}

impl Cli {
    fn command(&self) -> Command {
        match (&self.encode, &self.decode) {
            (Some(text), _) => Command::encode(text.as_str()),
            (None, Some(text)) => Command::decode(text.as_str()),
            // clap enforces exactly one of the group.
            (None, None) => unreachable!("operation group is required"),
        }
    }

    fn exchange_config(&self) -> Result<ExchangeConfig, Box<dyn Error>> {
        let mut config = match &self.config {
            Some(path) => ExchangeConfig::from_json_file(path)?,
            None => ExchangeConfig::default(),
        };

        if let Some(addr) = &self.addr {
            config.address = addr.clone();
        }
        if let Some(host) = &self.host {
            config.host = host.clone();
        }
        if let Some(capacity) = self.peek_capacity {
            config.peek_capacity = capacity;
        }
        if let Some(max) = self.max_content_length {
            config.max_content_length = max;
        }
        if let Some(ms) = self.timeout_ms {
            config.timeout_ms = Some(ms);
        }

        Ok(config)
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let config = cli.exchange_config()?;
    let client = Client::builder().config(config).build()?;

    let command = cli.command();
    tracing::debug!(command = %command, "sending");
    let body = client.exchange(&command).await?;

    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{}", String::from_utf8_lossy(&body))?;
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            let mut source = e.source();
            while let Some(cause) = source {
                eprintln!("  caused by: {}", cause);
                source = cause.source();
            }
            ExitCode::FAILURE
        }
    }
}
