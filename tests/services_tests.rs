mod common;

use std::time::Duration;

use serde_json::json;
use tokio::sync::watch;

use common::MockTransport;
use prediction_client::api::group::{
    CREATE_GROUP_PATH, GET_GROUP_PATH, INVITE_MEMBER_PATH, LEAVE_GROUP_PATH, LIST_GROUPS_PATH,
};
use prediction_client::api::notification::{
    NOTIFICATION_LIST_PATH, NOTIFICATION_MARK_PATH, NOTIFICATION_UNREAD_COUNT_PATH,
};
use prediction_client::api::prediction::GET_PREDICTIONS_PATH;
use prediction_client::models::{NotificationStatus, Prediction};
use prediction_client::services::{
    run_live_poller, run_notification_poller, ClanDirectory, NotificationInbox,
};

#[tokio::test]
async fn mark_read_refetches_instead_of_patching() {
    let mock = MockTransport::new();
    mock.ok(
        NOTIFICATION_LIST_PATH,
        json!({ "notifications": [
            { "messageId": "m1", "title": "Won", "status": "UNREAD" },
            { "messageId": "m2", "title": "Lost", "status": "UNREAD" }
        ] }),
    );
    mock.ok(
        NOTIFICATION_LIST_PATH,
        json!({ "notifications": [
            { "messageId": "m1", "title": "Won", "status": "READ" },
            { "messageId": "m2", "title": "Lost", "status": "UNREAD" }
        ] }),
    );
    mock.ok(NOTIFICATION_MARK_PATH, json!({}));
    mock.ok(NOTIFICATION_UNREAD_COUNT_PATH, json!({ "count": 1 }));
    let client = common::client(&mock);

    let mut inbox = NotificationInbox::new("u1");
    inbox.refresh(&client).await.unwrap();
    assert_eq!(inbox.unread().count(), 2);

    inbox.mark_read(&client, &["m1".to_string()]).await.unwrap();

    let mark = mock.requests_to(NOTIFICATION_MARK_PATH);
    assert_eq!(mark.len(), 1);
    let body = mark[0].body.clone().unwrap();
    assert_eq!(body["messageIds"], json!(["m1"]));
    assert_eq!(body["status"], json!("READ"));

    assert_eq!(mock.count(NOTIFICATION_LIST_PATH), 2);
    assert_eq!(inbox.unread().count(), 1);
    assert_eq!(
        inbox.cache().get("m1").unwrap().status,
        NotificationStatus::Read
    );
    assert!(!inbox.cache().needs_refresh());
    assert_eq!(inbox.last_unread_count(), Some(1));
}

#[tokio::test]
async fn failed_refetch_leaves_entries_stale() {
    let mock = MockTransport::new();
    mock.ok(
        NOTIFICATION_LIST_PATH,
        json!({ "notifications": [{ "messageId": "m1", "status": "UNREAD" }] }),
    );
    mock.json(NOTIFICATION_LIST_PATH, 500, json!({ "message": "down" }));
    mock.ok(NOTIFICATION_MARK_PATH, json!({}));
    let client = common::client(&mock);

    let mut inbox = NotificationInbox::new("u1");
    inbox.refresh(&client).await.unwrap();
    inbox.archive(&client, &["m1".to_string()]).await.unwrap();

    // Still the pre-mutation server copy, flagged for refetch
    assert_eq!(
        inbox.cache().get("m1").unwrap().status,
        NotificationStatus::Unread
    );
    assert!(inbox.cache().is_stale("m1"));
    assert!(inbox.cache().needs_refresh());
}

#[tokio::test]
async fn rejected_mutation_does_not_touch_the_cache() {
    let mock = MockTransport::new();
    mock.ok(
        NOTIFICATION_LIST_PATH,
        json!({ "notifications": [{ "messageId": "m1", "status": "UNREAD" }] }),
    );
    mock.json(NOTIFICATION_MARK_PATH, 403, json!({ "message": "forbidden" }));
    let client = common::client(&mock);

    let mut inbox = NotificationInbox::new("u1");
    inbox.refresh(&client).await.unwrap();
    let err = inbox
        .delete(&client, &["m1".to_string()])
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "forbidden");
    assert_eq!(mock.count(NOTIFICATION_LIST_PATH), 1);
    assert!(!inbox.cache().is_stale("m1"));
}

#[tokio::test]
async fn empty_selection_sends_nothing() {
    let mock = MockTransport::new();
    let client = common::client(&mock);

    let mut inbox = NotificationInbox::new("u1");
    inbox.mark_read(&client, &[]).await.unwrap();
    assert!(mock.requests().is_empty());
}

fn group(id: &str, members: &[&str]) -> serde_json::Value {
    let members: Vec<_> = members
        .iter()
        .map(|m| json!({ "userId": m, "displayName": m }))
        .collect();
    json!({ "groupId": id, "groupName": "Sharps", "members": members })
}

#[tokio::test]
async fn invite_refetches_the_group() {
    let mock = MockTransport::new();
    mock.ok(LIST_GROUPS_PATH, json!({ "groups": [group("g1", &["u1"])] }));
    mock.ok(INVITE_MEMBER_PATH, json!({}));
    mock.ok(GET_GROUP_PATH, json!({ "group": group("g1", &["u1", "u2"]) }));
    let client = common::client(&mock);

    let mut clans = ClanDirectory::new("u1");
    clans.refresh(&client).await.unwrap();
    assert!(!clans.get("g1").unwrap().has_member("u2"));

    clans.invite(&client, "g1", "u2").await.unwrap();

    let body = mock.requests_to(INVITE_MEMBER_PATH)[0].body.clone().unwrap();
    assert_eq!(body, json!({ "groupId": "g1", "userId": "u2" }));
    assert_eq!(mock.count(GET_GROUP_PATH), 1);
    assert!(clans.get("g1").unwrap().has_member("u2"));
    assert!(!clans.cache().is_stale("g1"));
}

#[tokio::test]
async fn create_reads_the_new_group_back() {
    let mock = MockTransport::new();
    mock.ok(CREATE_GROUP_PATH, json!({ "group": group("g7", &["u1"]) }));
    mock.ok(GET_GROUP_PATH, json!({ "group": group("g7", &["u1", "u3"]) }));
    let client = common::client(&mock);

    let mut clans = ClanDirectory::new("u1");
    let created = clans
        .create(&client, "Sharps", None, vec!["u3".into()])
        .await
        .unwrap();
    assert_eq!(created.unwrap().group_id, "g7");

    let body = mock.requests_to(CREATE_GROUP_PATH)[0].body.clone().unwrap();
    assert_eq!(body["groupName"], json!("Sharps"));
    assert_eq!(body["memberIds"], json!(["u3"]));

    // The cached copy is the refetched one
    assert_eq!(clans.get("g7").unwrap().members.len(), 2);
}

#[tokio::test]
async fn leave_refetches_the_list() {
    let mock = MockTransport::new();
    mock.ok(
        LIST_GROUPS_PATH,
        json!({ "groups": [group("g1", &["u1"]), group("g2", &["u1"])] }),
    );
    mock.ok(LIST_GROUPS_PATH, json!({ "groups": [group("g2", &["u1"])] }));
    mock.ok(LEAVE_GROUP_PATH, json!({}));
    let client = common::client(&mock);

    let mut clans = ClanDirectory::new("u1");
    clans.refresh(&client).await.unwrap();
    assert_eq!(clans.groups().count(), 2);

    clans.leave(&client, "g1").await.unwrap();
    assert_eq!(mock.count(LIST_GROUPS_PATH), 2);
    assert!(clans.get("g1").is_none());
    assert_eq!(clans.groups().count(), 1);
}

#[tokio::test]
async fn live_poller_publishes_and_survives_errors() {
    let mock = MockTransport::new();
    mock.json(GET_PREDICTIONS_PATH, 500, json!({ "message": "down" }));
    mock.ok(
        GET_PREDICTIONS_PATH,
        json!({ "predictions": [{ "predictionId": "p1", "status": "PREDICTION_STATUS_ACTIVE" }] }),
    );
    let client = common::client(&mock);

    let (tx, mut rx) = watch::channel(Vec::<Prediction>::new());
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let handle = tokio::spawn(run_live_poller(
        client,
        "u1".into(),
        Duration::from_millis(10),
        tx,
        shutdown_rx,
    ));

    tokio::time::timeout(Duration::from_secs(5), rx.changed())
        .await
        .expect("poller published in time")
        .unwrap();
    assert_eq!(rx.borrow().len(), 1);
    assert!(mock.count(GET_PREDICTIONS_PATH) >= 2);

    shutdown_tx.send(true).unwrap();
    tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .expect("poller stopped in time")
        .unwrap();
}

#[tokio::test]
async fn notification_poller_stops_on_shutdown() {
    let mock = MockTransport::new();
    mock.ok(NOTIFICATION_UNREAD_COUNT_PATH, json!({ "unreadCount": 4 }));
    let client = common::client(&mock);

    let (tx, mut rx) = watch::channel(0u64);
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let handle = tokio::spawn(run_notification_poller(
        client,
        "u1".into(),
        Duration::from_millis(10),
        tx,
        shutdown_rx,
    ));

    tokio::time::timeout(Duration::from_secs(5), rx.changed())
        .await
        .expect("poller published in time")
        .unwrap();
    assert_eq!(*rx.borrow(), 4);

    drop(shutdown_tx);
    tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .expect("poller stopped in time")
        .unwrap();
}

#[tokio::test]
async fn both_pollers_share_one_shutdown_signal() {
    let mock = MockTransport::new();
    mock.ok(GET_PREDICTIONS_PATH, json!({ "predictions": [] }));
    mock.ok(NOTIFICATION_UNREAD_COUNT_PATH, json!({ "unreadCount": 2 }));
    let client = common::client(&mock);

    let (live_tx, _live_rx) = watch::channel(Vec::<Prediction>::new());
    let (unread_tx, mut unread_rx) = watch::channel(0u64);
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let live = tokio::spawn(run_live_poller(
        client.clone(),
        "u1".into(),
        Duration::from_millis(10),
        live_tx,
        shutdown_rx.clone(),
    ));
    let notifications = tokio::spawn(run_notification_poller(
        client,
        "u1".into(),
        Duration::from_millis(10),
        unread_tx,
        shutdown_rx,
    ));

    tokio::time::timeout(Duration::from_secs(5), unread_rx.changed())
        .await
        .expect("unread count published in time")
        .unwrap();
    assert_eq!(*unread_rx.borrow(), 2);

    shutdown_tx.send(true).unwrap();
    for handle in [live, notifications] {
        tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .expect("poller stopped in time")
            .unwrap();
    }
}
