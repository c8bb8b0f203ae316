use nms_telemetry::{new_request_ids, record_probe, record_transition_offline};

#[test]
fn request_ids_non_empty() {
    let ids = new_request_ids();
    assert!(!ids.request_id.is_empty());
    assert!(!ids.trace_id.is_empty());
}

#[test]
fn metrics_accumulate() {
    record_probe();
    record_probe();
    record_transition_offline();
    let snapshot = nms_telemetry::metrics().snapshot();
    assert!(snapshot.probes_total >= 2);
    assert!(snapshot.transitions_offline >= 1);
}
