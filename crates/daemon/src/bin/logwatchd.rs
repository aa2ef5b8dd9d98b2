// SPDX-License-Identifier: MIT
// Copyright (c) 2026 LogWatch contributors

//! `logwatchd` — the LogWatch server: launches configured endpoints,
//! sequences their output, and serves it to viewers over the broadcast
//! bus.

use clap::Parser;
use logwatch_actions::ActionManager;
use logwatch_core::clock::SystemClock;
use logwatch_core::{replay, Config, EndpointDescriptor, EndpointKind, EventSeparationRule};
use logwatch_daemon::{bind_with_retry, run_bus, ServiceManager};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

#[derive(Parser)]
#[command(name = "logwatchd", version, about = "LogWatch observability server")]
struct Cli {
    /// Path to the YAML configuration file.
    config: std::path::PathBuf,

    /// Launch an extra register-less action: `-p NAME 'shell command'`.
    #[arg(short = 'p', long = "process", value_names = ["NAME", "COMMAND"], num_args = 2)]
    process: Vec<String>,

    /// Override the bus listener port from the config file.
    #[arg(short = 'P', long = "port")]
    port: Option<u16>,

    /// Keep running after every endpoint has finished.
    #[arg(short = 'a', long = "stay-active", value_name = "yes|no")]
    stay_active: Option<String>,

    /// Increase log verbosity (repeatable).
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbosity: u8) {
    use tracing_subscriber::EnvFilter;

    let level = match verbosity {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = match Config::load(&cli.config) {
        Ok(config) => config,
        Err(err) => {
            tracing::error!(%err, "failed to load configuration");
            std::process::exit(1);
        }
    };

    if let Some(port) = cli.port {
        config.server.socket_port = port;
    }
    if let Some(flag) = cli.stay_active.as_deref() {
        config.server.stay_active = matches!(flag, "yes" | "true");
    }

    for pair in cli.process.chunks_exact(2) {
        let [name, command] = pair else { continue };
        config.server.actions.push(EndpointDescriptor {
            register: None,
            name: name.clone(),
            kind: EndpointKind::Subprocess { command: command.clone() },
            separation: EventSeparationRule::default(),
            preconditions: HashMap::new(),
        });
    }

    let registers: HashMap<_, _> =
        config.server.endpoints.iter().filter_map(|e| e.register.map(|r| (r, e.name.clone()))).collect();

    let all_descriptors: Vec<EndpointDescriptor> =
        config.server.endpoints.iter().chain(config.server.actions.iter()).cloned().collect();

    let replay_capacity = config.server.late_joiners_buffer_size.unwrap_or(replay::DEFAULT_CAPACITY);
    let manager = ActionManager::new(all_descriptors);
    let service = Arc::new(Mutex::new(ServiceManager::new(manager, SystemClock, replay_capacity, registers)));

    let listener = match bind_with_retry(&config.server.socket_addr, config.server.socket_port).await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!(%err, "could not bind broadcast bus, giving up");
            std::process::exit(1);
        }
    };
    tracing::info!(addr = %config.server.socket_addr, port = config.server.socket_port, "bus listening");

    let bus_service = Arc::clone(&service);
    tokio::spawn(async move { run_bus(listener, bus_service).await });

    let mut sigterm = match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
        Ok(stream) => stream,
        Err(err) => {
            tracing::error!(%err, "failed to install SIGTERM handler");
            std::process::exit(1);
        }
    };

    let mut tick_interval = tokio::time::interval(Duration::from_millis(100));
    let mut keepalive_interval = tokio::time::interval(Duration::from_millis(400));
    let stay_active = config.server.stay_active;

    loop {
        tokio::select! {
            _ = tick_interval.tick() => {
                let more_work = service.lock().await.tick().await;
                if !more_work && !stay_active {
                    tracing::info!("all actions finished, shutting down");
                    break;
                }
            }
            _ = keepalive_interval.tick() => {
                service.lock().await.broadcast_keepalive();
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("received SIGINT, stopping endpoints");
                service.lock().await.stop_all();
            }
            _ = sigterm.recv() => {
                tracing::info!("received SIGTERM, stopping endpoints");
                service.lock().await.stop_all();
            }
        }
    }
}
