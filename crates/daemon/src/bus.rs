// SPDX-License-Identifier: MIT
// Copyright (c) 2026 LogWatch contributors

//! Broadcast Bus: the TCP listener viewers and `logwatchctl` connect to.
//!
//! One `tokio::spawn`ed task per accepted connection, split into
//! independent reader/writer halves. Every client is symmetric (it both
//! receives the broadcast stream and may send control frames), so each
//! gets a dedicated writer task draining its own `mpsc` outbound queue
//! rather than a single request/response cycle per connection.

use crate::codec::{decode_frame, FrameDecoder};
use crate::error::DaemonError;
use crate::service::ServiceManager;
use logwatch_core::{Clock, ControlMessage};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::{mpsc, Mutex};

const BIND_RETRY_INTERVAL: Duration = Duration::from_secs(5);
const BIND_RETRY_ATTEMPTS: u32 = 60;

/// Bind the listener socket, retrying on failure so an orderly restart
/// during a brief port-in-use window doesn't require a supervisor.
pub async fn bind_with_retry(addr: &str, port: u16) -> Result<TcpListener, DaemonError> {
    let target = format!("{addr}:{port}");
    let mut last_err = None;
    for attempt in 1..=BIND_RETRY_ATTEMPTS {
        match TcpListener::bind(&target).await {
            Ok(listener) => return Ok(listener),
            Err(err) => {
                tracing::warn!(attempt, %target, %err, "bind failed, retrying");
                last_err = Some(err);
                tokio::time::sleep(BIND_RETRY_INTERVAL).await;
            }
        }
    }
    Err(DaemonError::BindExhausted {
        addr: addr.to_string(),
        port,
        attempts: BIND_RETRY_ATTEMPTS,
        source: last_err.expect("loop ran at least once"),
    })
}

/// Accept connections until the listener itself errors out, spawning one
/// task per client and wiring it into the shared `ServiceManager`.
pub async fn run<C: Clock>(listener: TcpListener, service: Arc<Mutex<ServiceManager<C>>>) {
    let next_client_id = AtomicU64::new(1);
    loop {
        match listener.accept().await {
            Ok((stream, addr)) => {
                let client_id = next_client_id.fetch_add(1, Ordering::Relaxed);
                tracing::debug!(client_id, %addr, "viewer connected");
                let service = Arc::clone(&service);
                tokio::spawn(async move {
                    handle_client(client_id, stream, service).await;
                });
            }
            Err(err) => tracing::error!(%err, "accept error"),
        }
    }
}

async fn handle_client<C: Clock>(client_id: u64, stream: tokio::net::TcpStream, service: Arc<Mutex<ServiceManager<C>>>) {
    let (mut reader, mut writer) = stream.into_split();
    let (outbound_tx, mut outbound_rx) = mpsc::unbounded_channel::<Vec<u8>>();

    service.lock().await.register_client(client_id, outbound_tx);

    let writer_task = tokio::spawn(async move {
        while let Some(frame) = outbound_rx.recv().await {
            if writer.write_all(&frame).await.is_err() {
                break;
            }
        }
    });

    let mut decoder = FrameDecoder::new();
    let mut buf = [0u8; 4096];
    loop {
        let n = match reader.read(&mut buf).await {
            Ok(0) | Err(_) => break,
            Ok(n) => n,
        };
        for frame in decoder.push(&buf[..n]) {
            let message: ControlMessage = match decode_frame(&frame) {
                Ok(message) => message,
                Err(err) => {
                    tracing::warn!(client_id, %err, "dropping malformed control frame");
                    continue;
                }
            };
            dispatch(client_id, message, &service).await;
        }
    }

    service.lock().await.unregister_client(client_id);
    writer_task.abort();
    tracing::debug!(client_id, "viewer disconnected");
}

async fn dispatch<C: Clock>(client_id: u64, message: ControlMessage, service: &Arc<Mutex<ServiceManager<C>>>) {
    match message {
        ControlMessage::SetMarker { name } => {
            let name = if name.is_empty() { None } else { Some(name) };
            service.lock().await.set_marker(name);
        }
        ControlMessage::GetLateJoinRecords => {
            service.lock().await.send_late_join(client_id);
        }
        ControlMessage::SendStdin { endpoint_register, data } => {
            service.lock().await.send_stdin(endpoint_register, data);
        }
        ControlMessage::StopAll => {
            service.lock().await.stop_all();
        }
    }
}

#[cfg(test)]
#[path = "bus_tests.rs"]
mod tests;
