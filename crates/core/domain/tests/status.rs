use domain::{DeviceRecord, DeviceStatus, Liveness, NotificationLevel};

fn sample_record() -> DeviceRecord {
    DeviceRecord {
        device_id: "dev-1".to_string(),
        name: "core-sw1".to_string(),
        ip: "10.0.0.1".to_string(),
        model: "S5720".to_string(),
        location: "HQ".to_string(),
        device_type: "switch".to_string(),
    }
}

#[test]
fn status_builds_from_record() {
    let status = DeviceStatus::from_record(&sample_record(), Liveness::Offline);

    assert_eq!(status.device_id, "dev-1");
    assert_eq!(status.name, "core-sw1");
    assert_eq!(status.location, "HQ");
    assert_eq!(status.liveness, Liveness::Offline);
}

#[test]
fn level_round_trips_through_str() {
    for level in [
        NotificationLevel::Error,
        NotificationLevel::Warning,
        NotificationLevel::Success,
        NotificationLevel::Normal,
    ] {
        assert_eq!(NotificationLevel::parse(level.as_str()), level);
    }
    // 未知等级按 normal 处理
    assert_eq!(NotificationLevel::parse("bogus"), NotificationLevel::Normal);
}
