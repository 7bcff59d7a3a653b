mod common;

use chrono::{Duration, Utc};
use common::TestApp;
use memora_backend::background::run_nudge_scan;
use serde_json::json;

async fn invite(app: &TestApp, event_id: &str, uid: &str) {
    let res = app
        .post_json_as(
            &format!("/events/{}/participants", event_id),
            "owner-1",
            json!({"userId": uid}),
        )
        .await;
    assert_eq!(res.status(), 200);
}

#[tokio::test]
async fn test_nudge_one_hour_before_with_quick_links() {
    let app = TestApp::new().await;

    app.seed_user("owner-1", "Alice", Some("alice@example.com")).await;
    app.seed_user("guest-1", "Bob", Some("bob+test@example.com")).await;

    let now = Utc::now();
    let event = app.seed_event("owner-1", "Concert", now + Duration::minutes(60), &[]).await;
    invite(&app, &event.id, "guest-1").await;

    let before = app.email.total_sent();
    let stats = run_nudge_scan(&app.state, now).await.unwrap();

    assert_eq!(stats.windows_due, 1);
    assert_eq!(stats.sent, 1);
    assert_eq!(app.email.total_sent(), before + 1);

    let mails: Vec<_> = app
        .email
        .sent_to("bob+test@example.com")
        .into_iter()
        .filter(|m| m.subject.starts_with("Reminder:"))
        .collect();
    assert_eq!(mails.len(), 1);
    assert!(mails[0].subject.contains("starts in 1 hora"));

    // One-click links carry the url-encoded email, the event and the answer
    assert!(mails[0].body.contains("respond-invite-quick"));
    assert!(mails[0].body.contains("status=accepted"));
    assert!(mails[0].body.contains("status=rejected"));
    assert!(mails[0].body.contains("bob%2Btest%40example.com"));
    assert!(mails[0].body.contains(&event.id));
}

#[tokio::test]
async fn test_nudge_goes_to_pending_only() {
    let app = TestApp::new().await;

    app.seed_user("owner-1", "Alice", Some("alice@example.com")).await;
    app.seed_user("u-accepted", "Bo", Some("accepted@example.com")).await;
    app.seed_user("u-pending", "Cy", Some("pending@example.com")).await;

    let now = Utc::now();
    let event = app.seed_event("owner-1", "Concert", now + Duration::minutes(60), &[]).await;
    invite(&app, &event.id, "u-accepted").await;
    invite(&app, &event.id, "u-pending").await;
    app.post_json(
        "/invites/respond",
        json!({"uid": "u-accepted", "eventId": event.id, "status": "accepted"}),
    )
    .await;

    let stats = run_nudge_scan(&app.state, now).await.unwrap();

    assert_eq!(stats.attempted, 1);
    let nudges: Vec<_> = app
        .email
        .sent_to("pending@example.com")
        .into_iter()
        .filter(|m| m.subject.starts_with("Reminder:"))
        .collect();
    assert_eq!(nudges.len(), 1);

    // Neither the accepted participant nor the owner is nudged
    for recipient in ["accepted@example.com", "alice@example.com"] {
        let nudges: Vec<_> = app
            .email
            .sent_to(recipient)
            .into_iter()
            .filter(|m| m.subject.starts_with("Reminder:"))
            .collect();
        assert!(nudges.is_empty(), "{} should not be nudged", recipient);
    }
}

#[tokio::test]
async fn test_band_edges() {
    let app = TestApp::new().await;

    app.seed_user("owner-1", "Alice", Some("alice@example.com")).await;
    let now = Utc::now();

    for (uid, email, minutes) in [
        ("u-54", "u54@example.com", 54),
        ("u-56", "u56@example.com", 56),
        ("u-64", "u64@example.com", 64),
        ("u-66", "u66@example.com", 66),
    ] {
        app.seed_user(uid, uid, Some(email)).await;
        let event = app
            .seed_event("owner-1", &format!("Event {}", minutes), now + Duration::minutes(minutes), &[])
            .await;
        invite(&app, &event.id, uid).await;
    }

    let stats = run_nudge_scan(&app.state, now).await.unwrap();

    assert_eq!(stats.windows_due, 2, "only 56 and 64 minutes fall in the band");
    for (email, expected) in [
        ("u54@example.com", 0),
        ("u56@example.com", 1),
        ("u64@example.com", 1),
        ("u66@example.com", 0),
    ] {
        let nudges: Vec<_> = app
            .email
            .sent_to(email)
            .into_iter()
            .filter(|m| m.subject.starts_with("Reminder:"))
            .collect();
        assert_eq!(nudges.len(), expected, "wrong nudge count for {}", email);
    }
}

#[tokio::test]
async fn test_ten_minute_band() {
    let app = TestApp::new().await;

    app.seed_user("owner-1", "Alice", Some("alice@example.com")).await;
    app.seed_user("guest-1", "Bob", Some("bob@example.com")).await;

    let now = Utc::now();
    let event = app.seed_event("owner-1", "Soon", now + Duration::minutes(10), &[]).await;
    invite(&app, &event.id, "guest-1").await;

    run_nudge_scan(&app.state, now).await.unwrap();

    let nudges: Vec<_> = app
        .email
        .sent_to("bob@example.com")
        .into_iter()
        .filter(|m| m.subject.starts_with("Reminder:"))
        .collect();
    assert_eq!(nudges.len(), 1);
    assert!(nudges[0].subject.contains("starts in 10 min"));
}

#[tokio::test]
async fn test_overlapping_nudge_scans_send_once() {
    let app = TestApp::new().await;

    app.seed_user("owner-1", "Alice", Some("alice@example.com")).await;
    app.seed_user("guest-1", "Bob", Some("bob@example.com")).await;

    let now = Utc::now();
    let event = app.seed_event("owner-1", "Concert", now + Duration::minutes(60), &[]).await;
    invite(&app, &event.id, "guest-1").await;

    let first = run_nudge_scan(&app.state, now).await.unwrap();
    assert_eq!(first.sent, 1);

    let second = run_nudge_scan(&app.state, now).await.unwrap();
    assert_eq!(second.sent, 0);
    assert_eq!(second.windows_already_claimed, 1);
}

#[tokio::test]
async fn test_nudge_ignores_events_outside_both_bands() {
    let app = TestApp::new().await;

    app.seed_user("owner-1", "Alice", Some("alice@example.com")).await;
    app.seed_user("guest-1", "Bob", Some("bob@example.com")).await;

    let now = Utc::now();
    let event = app.seed_event("owner-1", "Far Away", now + Duration::minutes(30), &[]).await;
    invite(&app, &event.id, "guest-1").await;

    let stats = run_nudge_scan(&app.state, now).await.unwrap();

    assert_eq!(stats.windows_due, 0);
    assert_eq!(stats.attempted, 0);
}
