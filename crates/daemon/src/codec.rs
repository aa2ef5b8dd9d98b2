// SPDX-License-Identifier: MIT
// Copyright (c) 2026 LogWatch contributors

//! NUL-terminated JSON framing: every record and control message is a
//! JSON document followed by a single `\0` delimiter byte.

use serde::Serialize;
use serde::de::DeserializeOwned;

pub fn encode_frame<T: Serialize>(value: &T) -> Result<Vec<u8>, serde_json::Error> {
    let mut bytes = serde_json::to_vec(value)?;
    bytes.push(0);
    Ok(bytes)
}

pub fn decode_frame<T: DeserializeOwned>(frame: &[u8]) -> Result<T, serde_json::Error> {
    serde_json::from_slice(frame)
}

/// Accumulates partial reads and yields complete, NUL-delimited frames
/// (with the delimiter stripped).
#[derive(Debug, Default)]
pub struct FrameDecoder {
    buffer: Vec<u8>,
}

impl FrameDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, bytes: &[u8]) -> Vec<Vec<u8>> {
        self.buffer.extend_from_slice(bytes);
        let mut frames = Vec::new();
        while let Some(pos) = self.buffer.iter().position(|&b| b == 0) {
            let frame: Vec<u8> = self.buffer.drain(..=pos).collect();
            frames.push(frame[..frame.len() - 1].to_vec());
        }
        frames
    }
}
