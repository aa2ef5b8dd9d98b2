// SPDX-License-Identifier: MIT
// Copyright (c) 2026 LogWatch contributors

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! `logwatchctl` — a one-shot control frame sender: connect, send the
//! requested control frames in order, disconnect.

use clap::Parser;
use logwatch_core::{ControlMessage, Register};
use logwatch_daemon::encode_frame;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;

#[derive(Parser)]
#[command(name = "logwatchctl", version, about = "LogWatch one-shot control client")]
struct Cli {
    #[arg(long = "host", default_value = "127.0.0.1")]
    host: String,

    #[arg(long = "port", default_value_t = 2207)]
    port: u16,

    /// Set a marker, optionally named.
    #[arg(long = "marker", num_args = 0..=1, default_missing_value = "")]
    marker: Option<String>,

    /// Send data to an endpoint's stdin: `--stdin REGISTER DATA`.
    #[arg(long = "stdin", value_names = ["REGISTER", "DATA"], num_args = 2)]
    stdin: Vec<String>,

    /// Stop every running endpoint.
    #[arg(long = "stop-all")]
    stop_all: bool,

    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbosity: u8) {
    use tracing_subscriber::EnvFilter;

    let level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

fn parse_register(value: &str) -> Option<Register> {
    let mut chars = value.chars();
    let first = chars.next()?;
    if chars.next().is_some() {
        return None;
    }
    Some(Register(first))
}

fn build_frames(cli: &Cli) -> Result<Vec<ControlMessage>, String> {
    let mut frames = Vec::new();

    if let Some(name) = &cli.marker {
        frames.push(ControlMessage::SetMarker { name: name.clone() });
    }

    for pair in cli.stdin.chunks_exact(2) {
        let [register, data] = pair else { continue };
        let register = parse_register(register).ok_or_else(|| format!("--stdin register must be a single character, got {register:?}"))?;
        frames.push(ControlMessage::SendStdin { endpoint_register: register, data: data.clone() });
    }

    if cli.stop_all {
        frames.push(ControlMessage::StopAll);
    }

    Ok(frames)
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let frames = match build_frames(&cli) {
        Ok(frames) => frames,
        Err(err) => {
            tracing::error!(%err, "invalid arguments");
            std::process::exit(1);
        }
    };

    if frames.is_empty() {
        tracing::error!("no control frames requested; pass --marker, --stdin, or --stop-all");
        std::process::exit(1);
    }

    let mut stream = match TcpStream::connect((cli.host.as_str(), cli.port)).await {
        Ok(stream) => stream,
        Err(err) => {
            tracing::error!(%err, host = %cli.host, port = cli.port, "failed to connect");
            std::process::exit(1);
        }
    };

    for frame in &frames {
        let encoded = match encode_frame(frame) {
            Ok(bytes) => bytes,
            Err(err) => {
                tracing::error!(%err, "failed to encode control frame");
                std::process::exit(1);
            }
        };
        if let Err(err) = stream.write_all(&encoded).await {
            tracing::error!(%err, "failed to send control frame");
            std::process::exit(1);
        }
    }

    if let Err(err) = stream.shutdown().await {
        tracing::warn!(%err, "error shutting down control connection");
    }
}

#[cfg(test)]
#[path = "main_tests.rs"]
mod tests;
