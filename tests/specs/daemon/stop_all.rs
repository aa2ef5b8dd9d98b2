//! S6 — Stop-all: a `stop-all` control frame terminates a whole fleet of
//! running endpoints and the server exits on its own once every action
//! reaches a terminal state.

use crate::prelude::*;
use serde_json::json;

#[test]
fn stop_all_terminates_the_fleet_and_the_server_exits() {
    let workspace = Workspace::empty();
    let port = free_port();
    let config = workspace.write_config(&format!(
        r#"
server:
  socket-port: {port}
  endpoints:
    - register: "0"
      name: A
      type: subprocess
      command: "sleep 30"
    - register: "1"
      name: B
      type: subprocess
      command: "sleep 30"
    - register: "2"
      name: C
      type: subprocess
      command: "sleep 30"
"#
    ));
    let mut daemon = start_daemon(&config, port);

    let mut stream = connect_with_retry(port);
    send_json(&mut stream, &json!({"type": "stop-all"}));

    let exited = wait_for(SPEC_WAIT_MAX_MS, || matches!(daemon.try_wait(), Ok(Some(_))));
    assert!(exited, "server did not exit after stop-all drained the fleet");
}
