use super::*;
use crate::endpoint::EndpointKind;

#[test]
fn parses_minimal_server_section() {
    let yaml = r#"
server:
  socket-port: 9000
  endpoints:
    - register: "0"
      name: Shell
      type: subprocess
      command: "bash"
"#;
    let config = Config::parse(yaml).unwrap();
    assert_eq!(config.server.socket_port, 9000);
    assert_eq!(config.server.socket_addr, "127.0.0.1");
    assert_eq!(config.server.endpoints.len(), 1);
    match &config.server.endpoints[0].kind {
        EndpointKind::Subprocess { command } => assert_eq!(command, "bash"),
        _ => panic!("wrong kind"),
    }
}

#[test]
fn missing_server_section_is_an_error() {
    let err = Config::parse("views: {}").unwrap_err();
    assert!(matches!(err, ConfigError::MissingServerSection));
}

#[test]
fn views_are_keyed_by_name() {
    let yaml = r#"
server:
  socket-port: 2207
views:
  main:
    host: "127.0.0.1"
    server-port: 2207
    max-held-lines: 500
    styles:
      - target: Shell
        background: -1
        foreground: green
"#;
    let config = Config::parse(yaml).unwrap();
    let view = config.view("main").unwrap();
    assert_eq!(view.max_held_lines, Some(500));
    assert_eq!(view.styles[0].target, "Shell");
}

#[test]
fn defaults_apply_when_server_section_is_empty() {
    let config = Config::parse("server: {}").unwrap();
    assert_eq!(config.server.socket_port, 2207);
    assert!(!config.server.stay_active);
    assert!(config.server.endpoints.is_empty());
}
