//! S4 — Stdin injection: a `send-stdin` control frame reaches the
//! child's stdin and the injection itself is observable as a `fd:stdin`
//! record before the child's own echo arrives on `fd:stdout`.

use crate::prelude::*;
use serde_json::json;

#[test]
fn send_stdin_round_trips_through_the_child() {
    let workspace = Workspace::empty();
    let port = free_port();
    let config = workspace.write_config(&format!(
        r#"
server:
  socket-port: {port}
  endpoints:
    - register: "0"
      name: E
      type: subprocess
      command: "cat"
"#
    ));
    let _daemon = start_daemon(&config, port);

    let mut stream = connect_with_retry(port);
    send_json(&mut stream, &json!({"type": "send-stdin", "endpoint-register": "0", "data": "ping\n"}));

    let mut saw_stdin = false;
    let mut saw_stdout = false;
    while !(saw_stdin && saw_stdout) {
        let frame = read_frame(&mut stream);
        if frame["type"] != "data" {
            continue;
        }
        match frame["fd"].as_str() {
            Some("stdin") => {
                assert_eq!(frame["data"], "ping");
                saw_stdin = true;
            }
            Some("stdout") => {
                assert_eq!(frame["data"], "ping");
                saw_stdout = true;
            }
            _ => {}
        }
    }
}
