// SPDX-License-Identifier: MIT
// Copyright (c) 2026 LogWatch contributors

//! YAML configuration schema: a `server` section is mandatory, a
//! `views` section is optional and keyed by view name.

use crate::endpoint::EndpointDescriptor;
use crate::register::Register;
use crate::style::ColorPair;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read configuration file {path}: {source}")]
    Io { path: String, #[source] source: std::io::Error },
    #[error("failed to parse configuration file {path}: {source}")]
    Yaml { path: String, #[source] source: serde_yaml::Error },
    #[error("configuration file does not have a \"server\" section")]
    MissingServerSection,
}

fn default_socket_addr() -> String {
    "127.0.0.1".to_string()
}

fn default_socket_port() -> u16 {
    2207
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_socket_addr", rename = "socket-addr")]
    pub socket_addr: String,
    #[serde(default = "default_socket_port", rename = "socket-port")]
    pub socket_port: u16,
    #[serde(default, rename = "late-joiners-buffer-size")]
    pub late_joiners_buffer_size: Option<usize>,
    #[serde(default, rename = "stay-active")]
    pub stay_active: bool,
    #[serde(default)]
    pub endpoints: Vec<EndpointDescriptor>,
    #[serde(default)]
    pub actions: Vec<EndpointDescriptor>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            socket_addr: default_socket_addr(),
            socket_port: default_socket_port(),
            late_joiners_buffer_size: None,
            stay_active: false,
            endpoints: Vec::new(),
            actions: Vec::new(),
        }
    }
}

/// One entry of a view's `styles:` list: a color pair applied to either
/// an endpoint name or a watch name (the viewer decides which, since
/// that's a viewer-local namespace).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StyleTarget {
    pub target: String,
    #[serde(flatten)]
    pub pair: ColorPair,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandBinding {
    pub register: Register,
    pub command: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewConfig {
    #[serde(default)]
    pub host: Option<String>,
    #[serde(default, rename = "server-port")]
    pub server_port: Option<u16>,
    #[serde(default, rename = "line-format")]
    pub line_format: Option<String>,
    #[serde(default, rename = "continued-line-format")]
    pub continued_line_format: Option<String>,
    #[serde(default, rename = "max-held-lines")]
    pub max_held_lines: Option<usize>,
    #[serde(default, rename = "default-endpoint")]
    pub default_endpoint: Option<String>,
    /// Deprecated alias for `show: filtered`; the viewer config loader
    /// folds this into `show` when `show` is absent.
    #[serde(default)]
    pub filtered: Option<bool>,
    /// Raw `show:` filter tokens; the viewer compiles these into its own
    /// filter predicate, since the AST is viewer-local.
    #[serde(default)]
    pub show: Vec<String>,
    #[serde(default)]
    pub styles: Vec<StyleTarget>,
    #[serde(default)]
    pub commands: Vec<CommandBinding>,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            host: None,
            server_port: None,
            line_format: None,
            continued_line_format: None,
            max_held_lines: None,
            default_endpoint: None,
            filtered: None,
            show: Vec::new(),
            styles: Vec::new(),
            commands: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    #[serde(default)]
    pub views: HashMap<String, ViewConfig>,
}

impl Config {
    /// Parse a configuration document. The top-level `server` key is
    /// mandatory; `views` is optional since a bare server-only config is
    /// valid.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let raw: serde_yaml::Value =
            serde_yaml::from_str(yaml).map_err(|source| ConfigError::Yaml { path: "<string>".into(), source })?;
        if raw.get("server").is_none() {
            return Err(ConfigError::MissingServerSection);
        }
        serde_yaml::from_value(raw).map_err(|source| ConfigError::Yaml { path: "<string>".into(), source })
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|source| ConfigError::Io { path: path.display().to_string(), source })?;
        Self::parse(&text).map_err(|err| match err {
            ConfigError::Yaml { source, .. } => ConfigError::Yaml { path: path.display().to_string(), source },
            other => other,
        })
    }

    pub fn view(&self, name: &str) -> Option<&ViewConfig> {
        self.views.get(name)
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
