// SPDX-License-Identifier: MIT
// Copyright (c) 2026 LogWatch contributors

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DaemonError {
    #[error("failed to bind {addr}:{port} after {attempts} attempts: {source}")]
    BindExhausted { addr: String, port: u16, attempts: u32, #[source] source: std::io::Error },
}
