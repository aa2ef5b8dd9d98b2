//! S1 — Late-join replay: a viewer that connects after a ten-line
//! endpoint has already finished still sees the last five lines, via
//! the bounded replay buffer.

use crate::prelude::*;
use serde_json::json;
use std::time::Duration;

#[test]
fn late_joiner_replays_the_last_five_of_ten_lines() {
    let workspace = Workspace::empty();
    let port = free_port();
    let config = workspace.write_config(&format!(
        r#"
server:
  socket-port: {port}
  late-joiners-buffer-size: 5
  stay-active: true
  endpoints:
    - register: "0"
      name: E
      type: subprocess
      command: "for i in 0 1 2 3 4 5 6 7 8 9; do echo L$i; done"
"#
    ));
    let _daemon = start_daemon(&config, port);

    // Give the endpoint time to run to completion before anyone connects.
    std::thread::sleep(Duration::from_secs(1));

    let mut stream = connect_with_retry(port);
    send_json(&mut stream, &json!({"type": "get-late-join-records"}));

    let mut seqs = Vec::new();
    let mut datas = Vec::new();
    while seqs.len() < 5 {
        let frame = read_frame(&mut stream);
        if frame["type"] == "data" {
            seqs.push(frame["seq"].as_u64().expect("seq is a number"));
            datas.push(frame["data"].as_str().expect("data is a string").to_string());
        }
    }

    assert_eq!(seqs, vec![5, 6, 7, 8, 9]);
    assert_eq!(datas, vec!["L5", "L6", "L7", "L8", "L9"]);
}
