//! Shared scaffolding for the end-to-end specs: a disposable config
//! directory, a background `logwatchd` handle, and small TCP helpers
//! for driving the wire protocol directly.

use std::io::{Read, Write};
use std::net::TcpStream;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::time::{Duration, Instant};

pub const SPEC_WAIT_MAX_MS: u64 = 5000;

pub struct Workspace {
    dir: tempfile::TempDir,
}

impl Workspace {
    pub fn empty() -> Self {
        Self { dir: tempfile::tempdir().expect("create temp workspace") }
    }

    pub fn write_config(&self, yaml: &str) -> PathBuf {
        let path = self.dir.path().join("logwatch.yaml");
        std::fs::write(&path, yaml).expect("write config file");
        path
    }
}

pub struct DaemonHandle {
    child: Child,
    pub port: u16,
}

impl Drop for DaemonHandle {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

impl DaemonHandle {
    /// Non-blocking poll of the child's exit status, for tests that
    /// drive the server into shutting itself down.
    pub fn try_wait(&mut self) -> std::io::Result<Option<std::process::ExitStatus>> {
        self.child.try_wait()
    }
}

/// Bind an ephemeral port and immediately release it; good enough for a
/// short-lived test daemon to claim before another test grabs it.
pub fn free_port() -> u16 {
    std::net::TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port").local_addr().expect("local addr").port()
}

pub fn start_daemon(config_path: &Path, port: u16) -> DaemonHandle {
    let child = Command::new(assert_cmd::cargo::cargo_bin("logwatchd"))
        .arg(config_path)
        .arg("--port")
        .arg(port.to_string())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .expect("spawn logwatchd");
    DaemonHandle { child, port }
}

pub fn run_ctl(port: u16, args: &[&str]) {
    let status = Command::new(assert_cmd::cargo::cargo_bin("logwatchctl"))
        .arg("--port")
        .arg(port.to_string())
        .args(args)
        .status()
        .expect("spawn logwatchctl");
    assert!(status.success(), "logwatchctl exited with {status}");
}

pub fn wait_for(max_ms: u64, mut predicate: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + Duration::from_millis(max_ms);
    loop {
        if predicate() {
            return true;
        }
        if Instant::now() >= deadline {
            return false;
        }
        std::thread::sleep(Duration::from_millis(50));
    }
}

pub fn connect_with_retry(port: u16) -> TcpStream {
    let deadline = Instant::now() + Duration::from_secs(5);
    loop {
        match TcpStream::connect(("127.0.0.1", port)) {
            Ok(stream) => return stream,
            Err(err) if Instant::now() < deadline => {
                let _ = err;
                std::thread::sleep(Duration::from_millis(50));
            }
            Err(err) => panic!("could not connect to daemon on port {port}: {err}"),
        }
    }
}

pub fn read_frame(stream: &mut TcpStream) -> serde_json::Value {
    let mut buf = Vec::new();
    let mut byte = [0u8; 1];
    loop {
        stream.read_exact(&mut byte).expect("read a frame byte");
        if byte[0] == 0 {
            break;
        }
        buf.push(byte[0]);
    }
    serde_json::from_slice(&buf).expect("parse frame as json")
}

pub fn send_json(stream: &mut TcpStream, value: &serde_json::Value) {
    let mut bytes = serde_json::to_vec(value).expect("encode frame");
    bytes.push(0);
    stream.write_all(&bytes).expect("write frame");
}
