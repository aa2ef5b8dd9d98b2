//! S2 — Fan-out: two viewers connected before emission observe the
//! identical broadcast frame for a single event.

use crate::prelude::*;

fn next_data_frame(stream: &mut std::net::TcpStream) -> serde_json::Value {
    loop {
        let frame = read_frame(stream);
        if frame["type"] == "data" {
            return frame;
        }
    }
}

#[test]
fn two_viewers_see_the_same_data_frame() {
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
      command: "sleep 0.3; echo hello"
"#
    ));
    let _daemon = start_daemon(&config, port);

    let mut first = connect_with_retry(port);
    let mut second = connect_with_retry(port);

    let first_frame = next_data_frame(&mut first);
    let second_frame = next_data_frame(&mut second);

    assert_eq!(first_frame, second_frame);
    assert_eq!(first_frame["data"], "hello");
    assert_eq!(first_frame["endpoint"], "E");
    assert_eq!(first_frame["fd"], "stdout");
}
