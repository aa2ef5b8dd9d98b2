// SPDX-License-Identifier: MIT
// Copyright (c) 2026 LogWatch contributors

//! The viewer's TCP client: a reader task that decodes the broadcast
//! stream into a queue the UI loop drains, and a writer half for
//! sending control frames (markers, stdin, stop-all).

use crate::error::ViewerError;
use logwatch_core::{ControlMessage, WireRecord};
use logwatch_daemon::{decode_frame, encode_frame, FrameDecoder};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::tcp::OwnedWriteHalf;
use tokio::net::TcpStream;
use tokio::sync::mpsc;

const CONNECT_RETRY_INTERVAL: Duration = Duration::from_secs(2);
const CONNECT_RETRY_ATTEMPTS: u32 = 10;

/// Connect with a bounded number of retries, mirroring the server's own
/// bind-with-retry discipline so a viewer started before its server
/// doesn't have to be relaunched by hand.
pub async fn connect_with_retry(host: &str, port: u16) -> Result<TcpStream, ViewerError> {
    let mut last_err = None;
    for _ in 0..CONNECT_RETRY_ATTEMPTS {
        match TcpStream::connect((host, port)).await {
            Ok(stream) => return Ok(stream),
            Err(err) => {
                last_err = Some(err);
                tokio::time::sleep(CONNECT_RETRY_INTERVAL).await;
            }
        }
    }
    Err(ViewerError::Connect {
        host: host.to_string(),
        port,
        source: last_err.unwrap_or_else(|| std::io::Error::other("no connection attempt made")),
    })
}

/// Sends control frames to the server half of an established connection.
pub struct ClientWriter {
    writer: OwnedWriteHalf,
}

impl ClientWriter {
    pub async fn send(&mut self, message: &ControlMessage) -> Result<(), ViewerError> {
        let frame = encode_frame(message).map_err(|source| ViewerError::Template(source.to_string()))?;
        self.writer.write_all(&frame).await.map_err(|source| ViewerError::Connect {
            host: "server".to_string(),
            port: 0,
            source,
        })
    }
}

/// Spawn the reader task and return the record queue plus a writer half.
/// The reader task exits (dropping the queue's sender) when the
/// connection closes; the UI loop observes this as the channel closing.
pub fn spawn(stream: TcpStream) -> (mpsc::UnboundedReceiver<WireRecord>, ClientWriter) {
    let (read_half, write_half) = stream.into_split();
    let (tx, rx) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        let mut read_half = read_half;
        let mut decoder = FrameDecoder::new();
        let mut buf = [0u8; 4096];
        loop {
            let n = match read_half.read(&mut buf).await {
                Ok(0) | Err(_) => break,
                Ok(n) => n,
            };
            for frame in decoder.push(&buf[..n]) {
                if let Ok(record) = decode_frame::<WireRecord>(&frame) {
                    if tx.send(record).is_err() {
                        return;
                    }
                }
            }
        }
    });

    (rx, ClientWriter { writer: write_half })
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
