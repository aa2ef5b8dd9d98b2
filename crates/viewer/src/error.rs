// SPDX-License-Identifier: MIT
// Copyright (c) 2026 LogWatch contributors

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ViewerError {
    #[error("failed to connect to {host}:{port}: {source}")]
    Connect { host: String, port: u16, #[source] source: std::io::Error },
    #[error("template error: {0}")]
    Template(String),
}
