// SPDX-License-Identifier: MIT
// Copyright (c) 2026 LogWatch contributors

//! `logwatchview` — the LogWatch terminal viewer: connects to a named
//! view's server, renders its broadcast stream, and drives the
//! interactive-mode command language against a raw terminal.

use clap::Parser;
use logwatch_core::{ColorPair, Config, ControlMessage, Key, Register, Style, ViewConfig, WireRecord};
use logwatch_viewer::{
    connect_with_retry, first_match, poll_key, render, spawn_client, Command, DropPolicy, Evaluated, HoldBuffer,
    Keymap, RawTerminalGuard, RenderContext, ShowMode, StyleBook, Template, Watch,
};
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::mpsc;

#[derive(Parser)]
#[command(name = "logwatchview", version, about = "LogWatch terminal viewer")]
struct Cli {
    /// Path to the YAML configuration file.
    config: std::path::PathBuf,

    /// Name of the `views` entry to connect as.
    #[arg(long = "view")]
    view: String,

    /// Override the view's configured host.
    #[arg(long = "host")]
    host: Option<String>,

    /// Override the view's configured server port.
    #[arg(long = "port")]
    port: Option<u16>,

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

struct ViewerState {
    registers: HashMap<Register, String>,
    default_endpoint: Option<Register>,
    show_modes: HashMap<Register, ShowMode>,
    watches: Vec<Watch>,
    command_registers: HashMap<Register, String>,
    paused: bool,
    hold_buffer: HoldBuffer,
    style_book: StyleBook,
    line_format: Template,
    status: String,
}

impl ViewerState {
    fn new(view: &ViewConfig, registers: HashMap<Register, String>) -> Self {
        let mut style_book = StyleBook::default();
        for target in &view.styles {
            if let Some(&register) = registers.keys().find(|r| registers.get(r).map(|n| n == &target.target).unwrap_or(false)) {
                style_book.watches.insert(register, target.pair);
            } else {
                let mut style = Style::new();
                style.set("default", target.pair);
                style_book.endpoints.insert(target.target.clone(), style);
            }
        }

        let default_endpoint = view
            .default_endpoint
            .as_ref()
            .and_then(|name| registers.iter().find(|(_, n)| *n == name).map(|(r, _)| *r));

        let line_format = Template::compile(
            view.line_format.as_deref().unwrap_or("{format:endpoint}[{endpoint:<12}] {data}{format:reset}"),
        )
        .unwrap_or_else(|_| Template::passthrough());

        Self {
            registers,
            default_endpoint,
            show_modes: HashMap::new(),
            watches: Vec::new(),
            command_registers: HashMap::new(),
            paused: false,
            hold_buffer: HoldBuffer::new(view.max_held_lines.unwrap_or(logwatch_viewer::hold_buffer::DEFAULT_CAPACITY)),
            style_book,
            line_format,
            status: String::new(),
        }
    }

    fn show_mode_for(&self, endpoint: &str) -> ShowMode {
        let register = self.registers.iter().find(|(_, name)| name.as_str() == endpoint).map(|(r, _)| *r);
        register.and_then(|r| self.show_modes.get(&r).copied()).unwrap_or(ShowMode::All)
    }

    fn render_or_hold(&mut self, record: WireRecord) {
        if self.paused {
            self.hold_buffer.push(record);
            return;
        }
        self.draw(&record);
    }

    fn draw(&self, record: &WireRecord) {
        let WireRecord::Data { endpoint, fd, data, .. } = record else {
            if let WireRecord::Marker { name, .. } = record {
                println!("--- marker: {name} ---\r");
            }
            return;
        };
        let show_mode = self.show_mode_for(endpoint);
        if matches!(show_mode, ShowMode::None) {
            return;
        }
        let fd_tag = match fd {
            logwatch_core::Fd::Stdout => "stdout",
            logwatch_core::Fd::Stderr => "stderr",
            logwatch_core::Fd::Stdin => "stdin",
        };
        let matched = first_match(&self.watches, data);
        if matches!(show_mode, ShowMode::Filtered) && matched.is_none() {
            return;
        }
        let rendered_data = matched.and_then(|watch| watch.apply(data)).unwrap_or_else(|| data.clone());
        let ctx = RenderContext {
            endpoint: Some(endpoint.clone()),
            fd: Some(fd_tag.to_string()),
            matched_watch: matched.map(|w| w.register),
        };
        let mut fields = HashMap::new();
        fields.insert("endpoint".to_string(), endpoint.clone());
        fields.insert("fd".to_string(), fd_tag.to_string());
        fields.insert("data".to_string(), rendered_data);
        println!("{}\r", render(&self.line_format, &fields, &self.style_book, &ctx));
    }

    fn drain_hold_buffer(&mut self) {
        let records = self.hold_buffer.drain();
        for record in records {
            self.draw(&record);
        }
    }

    fn first_unused_register(&self) -> Register {
        ('a'..='z').map(Register).find(|r| !self.watches.iter().any(|w| &w.register == r)).unwrap_or(Register('z'))
    }
}

fn spawn_key_reader() -> mpsc::UnboundedReceiver<Key> {
    let (tx, rx) = mpsc::unbounded_channel();
    std::thread::spawn(move || loop {
        match poll_key(Duration::from_millis(100)) {
            Ok(Some(key)) => {
                if tx.send(key).is_err() {
                    break;
                }
            }
            Ok(None) => continue,
            Err(_) => break,
        }
    });
    rx
}

/// Read one line of free text from the key channel; `None` on `<ESC>`.
async fn read_line(keys: &mut mpsc::UnboundedReceiver<Key>) -> Option<String> {
    let mut buf = String::new();
    while let Some(key) = keys.recv().await {
        match key {
            Key::Enter => return Some(buf),
            Key::Esc => return None,
            Key::Backspace => {
                buf.pop();
            }
            Key::Char(c) => buf.push(c),
            _ => {}
        }
    }
    None
}

async fn prompt_watch_fields(keys: &mut mpsc::UnboundedReceiver<Key>) -> Option<[String; 4]> {
    let mut fields = [String::new(), String::new(), String::new(), String::new()];
    let labels = ["regex", "replacement", "bg-color", "fg-color"];
    let mut index = 0usize;
    loop {
        let Some(key) = keys.recv().await else { return None };
        match key {
            Key::Esc => return None,
            Key::Enter => {
                if index + 1 == labels.len() {
                    return Some(fields);
                }
                index += 1;
            }
            Key::Up => index = index.saturating_sub(1),
            Key::Down => index = (index + 1).min(labels.len() - 1),
            Key::Backspace => {
                fields[index].pop();
            }
            Key::Char(c) => fields[index].push(c),
            _ => {}
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = match Config::load(&cli.config) {
        Ok(config) => config,
        Err(err) => {
            tracing::error!(%err, "failed to load configuration");
            std::process::exit(1);
        }
    };
    let view = config.view(&cli.view).cloned().unwrap_or_default();

    let host = cli.host.or_else(|| view.host.clone()).unwrap_or_else(|| "127.0.0.1".to_string());
    let port = cli.port.or(view.server_port).unwrap_or(2207);

    let registers: HashMap<Register, String> =
        config.server.endpoints.iter().filter_map(|e| e.register.map(|r| (r, e.name.clone()))).collect();

    let stream = match connect_with_retry(&host, port).await {
        Ok(stream) => stream,
        Err(err) => {
            tracing::error!(%err, "could not connect to server");
            std::process::exit(1);
        }
    };
    let (mut records, mut writer) = spawn_client(stream);

    let _raw_guard = match RawTerminalGuard::enable() {
        Ok(guard) => guard,
        Err(err) => {
            tracing::error!(%err, "failed to enable raw terminal mode");
            std::process::exit(1);
        }
    };

    let mut keys = spawn_key_reader();
    let mut keymap = Keymap::new();
    let mut state = ViewerState::new(&view, registers);

    loop {
        tokio::select! {
            maybe_record = records.recv() => {
                match maybe_record {
                    Some(record) => state.render_or_hold(record),
                    None => {
                        state.status = "connection closed by server".to_string();
                        break;
                    }
                }
            }
            maybe_key = keys.recv() => {
                let Some(key) = maybe_key else { break };
                let Some(Evaluated { command, .. }) = keymap.feed(key) else { continue };
                match command {
                    Command::Pause => state.paused = true,
                    Command::AnalysisPause => {
                        state.paused = true;
                        state.hold_buffer.set_policy(DropPolicy::DropNewest);
                    }
                    Command::Resume => {
                        state.paused = false;
                        state.drain_hold_buffer();
                    }
                    Command::Quit => break,
                    Command::SetMarker => {
                        let _ = writer.send(&ControlMessage::SetMarker { name: String::new() }).await;
                    }
                    Command::CreateWatch => {
                        let register = state.first_unused_register();
                        if let Some(fields) = prompt_watch_fields(&mut keys).await {
                            install_watch(&mut state, register, fields);
                        }
                    }
                    Command::EditWatch(register) => {
                        if let Some(fields) = prompt_watch_fields(&mut keys).await {
                            if fields[0].is_empty() {
                                state.watches.retain(|w| w.register != register);
                            } else {
                                install_watch(&mut state, register, fields);
                            }
                        }
                    }
                    Command::DisableWatch(register) => {
                        if let Some(watch) = state.watches.iter_mut().find(|w| w.register == register) {
                            watch.enabled = false;
                        }
                    }
                    Command::EnableWatch(register) => {
                        if let Some(watch) = state.watches.iter_mut().find(|w| w.register == register) {
                            watch.enabled = true;
                        }
                    }
                    Command::DeleteWatch(register) => {
                        state.watches.retain(|w| w.register != register);
                    }
                    Command::SendStdin { .. } => {
                        if let Some(register) = state.default_endpoint {
                            if let Some(text) = read_line(&mut keys).await {
                                let _ = writer.send(&ControlMessage::SendStdin { endpoint_register: register, data: text }).await;
                            }
                        } else {
                            state.status = "no default endpoint set".to_string();
                        }
                    }
                    Command::SetDefaultEndpoint(register) => state.default_endpoint = Some(register),
                    Command::SetShowMode(register, mode) => {
                        state.show_modes.insert(register, mode);
                    }
                    Command::InjectStdin { register, .. } => {
                        if let Some(text) = read_line(&mut keys).await {
                            let _ = writer.send(&ControlMessage::SendStdin { endpoint_register: register, data: text }).await;
                        }
                    }
                    Command::SetCommandRegister(register) => {
                        if let Some(text) = read_line(&mut keys).await {
                            state.command_registers.insert(register, text);
                        }
                    }
                    Command::SendStoredCommand { register, interactive } => {
                        let stored = state.command_registers.get(&register).cloned();
                        let Some(stored) = stored else {
                            state.status = format!("command register {register} is empty");
                            continue;
                        };
                        let text = if interactive { read_line(&mut keys).await.unwrap_or(stored) } else { stored };
                        if let Some(register) = state.default_endpoint {
                            let _ = writer.send(&ControlMessage::SendStdin { endpoint_register: register, data: text }).await;
                        }
                    }
                    Command::ListCommandRegisters => {
                        let names: Vec<String> =
                            state.command_registers.keys().map(|r| r.to_string()).collect();
                        state.status = format!("command registers: {}", names.join(", "));
                    }
                    Command::ToggleGlobalFiltered => {
                        for register in state.registers.keys().copied().collect::<Vec<_>>() {
                            let current = state.show_modes.get(&register).copied().unwrap_or(ShowMode::All);
                            let next = if matches!(current, ShowMode::Filtered) { ShowMode::All } else { ShowMode::Filtered };
                            state.show_modes.insert(register, next);
                        }
                    }
                }
                if !state.status.is_empty() {
                    println!("-- {} --\r", state.status);
                    state.status.clear();
                }
            }
        }
    }
}

fn install_watch(state: &mut ViewerState, register: Register, fields: [String; 4]) {
    let [pattern, replacement, bg, fg] = fields;
    let mut watch = Watch::new(register, pattern);
    if !watch.is_valid() {
        state.status = format!("invalid regex for watch {register}");
        return;
    }
    if !replacement.is_empty() {
        watch.replacement = Some(replacement);
    }
    let bg_color = logwatch_core::Color::resolve(&bg);
    let fg_color = logwatch_core::Color::resolve(&fg);
    state.style_book.watches.insert(register, ColorPair::new(bg_color, fg_color));
    state.watches.retain(|w| w.register != register);
    state.watches.push(watch);
}
