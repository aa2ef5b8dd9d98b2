use super::*;
use logwatch_core::clock::FakeClock;
use tokio::sync::mpsc;

fn manager() -> ActionManager {
    ActionManager::new(Vec::new())
}

fn recv_all(rx: &mut mpsc::UnboundedReceiver<Vec<u8>>) -> Vec<WireRecord> {
    let mut out = Vec::new();
    while let Ok(frame) = rx.try_recv() {
        let record: WireRecord = serde_json::from_slice(&frame[..frame.len()]).unwrap();
        out.push(record);
    }
    out
}

#[test]
fn broadcast_data_stamps_monotonic_seq_and_current_time() {
    let clock = FakeClock::new("2026-08-01", "10:00:00");
    let mut svc = ServiceManager::new(manager(), clock, 16, HashMap::new());
    let (tx, mut rx) = mpsc::unbounded_channel();
    svc.register_client(1, tx);

    svc.broadcast_data("Shell".into(), logwatch_core::Fd::Stdout, "hello".into());
    svc.broadcast_data("Shell".into(), logwatch_core::Fd::Stdout, "world".into());

    let records = recv_all(&mut rx);
    let seqs: Vec<u64> = records.iter().filter_map(|r| r.seq()).collect();
    assert_eq!(seqs, vec![0, 1]);
}

#[test]
fn marker_without_name_gets_monotonic_default_name() {
    let clock = FakeClock::new("2026-08-01", "10:00:00");
    let mut svc = ServiceManager::new(manager(), clock, 16, HashMap::new());
    let (tx, mut rx) = mpsc::unbounded_channel();
    svc.register_client(1, tx);

    svc.set_marker(None);
    svc.set_marker(Some(String::new()));
    svc.set_marker(Some("Checkpoint".into()));

    let records = recv_all(&mut rx);
    let names: Vec<String> = records
        .into_iter()
        .filter_map(|r| match r {
            WireRecord::Marker { name, .. } => Some(name),
            _ => None,
        })
        .collect();
    assert_eq!(names, vec!["MARKER 1", "MARKER 2", "Checkpoint"]);
}

#[test]
fn keepalive_is_broadcast_but_not_retained_for_late_join() {
    let clock = FakeClock::new("2026-08-01", "10:00:00");
    let mut svc = ServiceManager::new(manager(), clock, 16, HashMap::new());
    let (tx, mut rx) = mpsc::unbounded_channel();
    svc.register_client(1, tx);

    svc.broadcast_keepalive();
    assert_eq!(recv_all(&mut rx).len(), 1);

    svc.send_late_join(1);
    assert!(recv_all(&mut rx).is_empty());
}

#[test]
fn late_join_replays_retained_records_in_order() {
    let clock = FakeClock::new("2026-08-01", "10:00:00");
    let mut svc = ServiceManager::new(manager(), clock, 16, HashMap::new());
    svc.broadcast_data("Shell".into(), logwatch_core::Fd::Stdout, "a".into());
    svc.broadcast_data("Shell".into(), logwatch_core::Fd::Stdout, "b".into());

    let (tx, mut rx) = mpsc::unbounded_channel();
    svc.register_client(7, tx);
    svc.send_late_join(7);

    let records = recv_all(&mut rx);
    let data: Vec<String> = records
        .into_iter()
        .filter_map(|r| match r {
            WireRecord::Data { data, .. } => Some(data),
            _ => None,
        })
        .collect();
    assert_eq!(data, vec!["a", "b"]);
}

#[test]
fn send_stdin_to_unknown_register_is_silently_ignored() {
    let clock = FakeClock::new("2026-08-01", "10:00:00");
    let mut svc = ServiceManager::new(manager(), clock, 16, HashMap::new());
    // No panic, no effect.
    svc.send_stdin(Register('9'), "ping".into());
}

#[test]
fn dropped_client_is_pruned_on_next_broadcast() {
    let clock = FakeClock::new("2026-08-01", "10:00:00");
    let mut svc = ServiceManager::new(manager(), clock, 16, HashMap::new());
    let (tx, rx) = mpsc::unbounded_channel();
    svc.register_client(1, tx);
    drop(rx);

    svc.broadcast_data("Shell".into(), logwatch_core::Fd::Stdout, "x".into());
    // Second broadcast shouldn't panic even though the client is gone.
    svc.broadcast_data("Shell".into(), logwatch_core::Fd::Stdout, "y".into());
}
