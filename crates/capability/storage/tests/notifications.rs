//! 通知事件流内存实现的集成测试
//!
//! 覆盖：幂等已读标记、过滤、分页稳定性与未读聚合。

use domain::NotificationLevel;
use nms_storage::{
    InMemoryNotificationStore, NewNotification, NotificationFilter, NotificationStore, ReadState,
};

fn event(content: &str, level: NotificationLevel, location: Option<&str>) -> NewNotification {
    NewNotification {
        content: content.to_string(),
        level,
        device_id: None,
        location: location.map(str::to_string),
    }
}

#[tokio::test]
async fn mark_read_is_idempotent() {
    let store = InMemoryNotificationStore::new();
    let id = store
        .insert(event("device offline", NotificationLevel::Error, Some("HQ")))
        .await
        .unwrap();

    assert!(store.mark_read(&id, "user-1").await.unwrap());
    // 第二次标记不改变已读集合
    assert!(!store.mark_read(&id, "user-1").await.unwrap());
    // 不存在的事件返回 false
    assert!(!store.mark_read("missing", "user-1").await.unwrap());

    let (records, _) = store
        .list(&NotificationFilter::default(), "user-1", 0, 10)
        .await
        .unwrap();
    assert_eq!(records[0].read_by, vec!["user-1".to_string()]);
}

#[tokio::test]
async fn list_filters_combine_with_and() {
    let store = InMemoryNotificationStore::new();
    store
        .insert(event("Device A Offline", NotificationLevel::Error, Some("HQ")))
        .await
        .unwrap();
    store
        .insert(event("device b online", NotificationLevel::Success, Some("HQ")))
        .await
        .unwrap();
    store
        .insert(event("device c offline", NotificationLevel::Error, Some("Lab")))
        .await
        .unwrap();

    // 内容子串不区分大小写
    let filter = NotificationFilter {
        content: Some("OFFLINE".to_string()),
        ..Default::default()
    };
    let (_, total) = store.list(&filter, "user-1", 0, 10).await.unwrap();
    assert_eq!(total, 2);

    // 内容 + 位置组合
    let filter = NotificationFilter {
        content: Some("offline".to_string()),
        location: Some("HQ".to_string()),
        ..Default::default()
    };
    let (records, total) = store.list(&filter, "user-1", 0, 10).await.unwrap();
    assert_eq!(total, 1);
    assert_eq!(records[0].content, "Device A Offline");

    // 空设备集合意味着无匹配，而不是不过滤
    let filter = NotificationFilter {
        device_ids: Some(Vec::new()),
        ..Default::default()
    };
    let (_, total) = store.list(&filter, "user-1", 0, 10).await.unwrap();
    assert_eq!(total, 0);
}

#[tokio::test]
async fn pagination_concatenates_without_gaps() {
    let store = InMemoryNotificationStore::new();
    for seq in 0..7 {
        store
            .insert(event(
                &format!("event {}", seq),
                NotificationLevel::Normal,
                None,
            ))
            .await
            .unwrap();
    }

    let filter = NotificationFilter::default();
    let (all, total) = store.list(&filter, "user-1", 0, 100).await.unwrap();
    assert_eq!(total, 7);

    let mut paged = Vec::new();
    for page in 0..4 {
        let (chunk, chunk_total) = store.list(&filter, "user-1", page * 2, 2).await.unwrap();
        assert_eq!(chunk_total, 7);
        paged.extend(chunk);
    }
    let all_ids: Vec<&str> = all.iter().map(|record| record.id.as_str()).collect();
    let paged_ids: Vec<&str> = paged.iter().map(|record| record.id.as_str()).collect();
    assert_eq!(all_ids, paged_ids);
}

#[tokio::test]
async fn same_millisecond_events_list_newest_first() {
    let store = InMemoryNotificationStore::new();
    // 连发写入通常落在同一毫秒（状态翻转就是这种节奏），
    // 排序必须按写入顺序裁决平局，而不是随机的 UUID
    let mut inserted = Vec::new();
    for seq in 0..5 {
        let id = store
            .insert(event(
                &format!("burst {}", seq),
                NotificationLevel::Error,
                None,
            ))
            .await
            .unwrap();
        inserted.push(id);
    }

    let (records, _) = store
        .list(&NotificationFilter::default(), "user-1", 0, 10)
        .await
        .unwrap();
    let listed: Vec<&str> = records.iter().map(|record| record.id.as_str()).collect();
    let expected: Vec<&str> = inserted.iter().rev().map(String::as_str).collect();
    assert_eq!(listed, expected);
}

#[tokio::test]
async fn mark_read_where_touches_only_matching_unread() {
    let store = InMemoryNotificationStore::new();
    let read_id = store
        .insert(event("old alarm", NotificationLevel::Error, Some("HQ")))
        .await
        .unwrap();
    store
        .insert(event("new alarm", NotificationLevel::Error, Some("HQ")))
        .await
        .unwrap();
    store
        .insert(event("notice", NotificationLevel::Normal, Some("HQ")))
        .await
        .unwrap();
    store.mark_read(&read_id, "user-1").await.unwrap();

    let filter = NotificationFilter {
        level: Some(NotificationLevel::Error),
        ..Default::default()
    };
    // 已读的那条不再计数
    assert_eq!(store.mark_read_where(&filter, "user-1").await.unwrap(), 1);
    assert_eq!(store.mark_read_where(&filter, "user-1").await.unwrap(), 0);

    let unread_filter = NotificationFilter {
        read_state: ReadState::Unread,
        ..Default::default()
    };
    let (_, remaining) = store.list(&unread_filter, "user-1", 0, 10).await.unwrap();
    assert_eq!(remaining, 1);
}

#[tokio::test]
async fn unread_aggregates_group_and_zero() {
    let store = InMemoryNotificationStore::new();

    // 零未读返回全零而不是错误
    let counts = store.unread_by_level("user-1").await.unwrap();
    assert_eq!(counts.total, 0);
    assert_eq!(counts.error, 0);

    store
        .insert(event("down", NotificationLevel::Error, Some("HQ")))
        .await
        .unwrap();
    store
        .insert(event("up", NotificationLevel::Success, Some("HQ")))
        .await
        .unwrap();
    store
        .insert(event("down", NotificationLevel::Error, Some("Lab")))
        .await
        .unwrap();
    // 无位置的事件不参与位置分组
    store
        .insert(event("note", NotificationLevel::Normal, None))
        .await
        .unwrap();

    let counts = store.unread_by_level("user-1").await.unwrap();
    assert_eq!(counts.error, 2);
    assert_eq!(counts.success, 1);
    assert_eq!(counts.normal, 1);
    assert_eq!(counts.total, 4);

    let grouped = store.unread_by_location("user-1").await.unwrap();
    assert_eq!(grouped.len(), 2);
    assert_eq!(grouped.get("HQ").unwrap().total, 2);
    assert_eq!(grouped.get("HQ").unwrap().error, 1);
    assert_eq!(grouped.get("Lab").unwrap().error, 1);

    // 另一个用户读过不影响本用户的未读
    let (records, _) = store
        .list(&NotificationFilter::default(), "user-2", 0, 10)
        .await
        .unwrap();
    store.mark_read(&records[0].id, "user-2").await.unwrap();
    assert_eq!(store.unread_by_level("user-1").await.unwrap().total, 4);
    assert_eq!(store.unread_by_level("user-2").await.unwrap().total, 3);
}
