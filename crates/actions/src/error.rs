// SPDX-License-Identifier: MIT
// Copyright (c) 2026 LogWatch contributors

#[derive(Debug, thiserror::Error)]
pub enum EndpointError {
    #[error("failed to launch endpoint {name}: {source}")]
    Spawn { name: String, #[source] source: std::io::Error },
    #[error("endpoint {name} produced no {stream} pipe")]
    MissingPipe { name: String, stream: &'static str },
}
