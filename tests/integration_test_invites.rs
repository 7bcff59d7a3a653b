mod common;

use chrono::Duration;
use common::{parse_body, TestApp};
use serde_json::json;

#[tokio::test]
async fn test_invite_creates_pending_participant_and_notifies() {
    let app = TestApp::new().await;

    app.seed_user("owner-1", "Alice", Some("alice@example.com")).await;
    app.seed_user("guest-1", "Bob", Some("bob@example.com")).await;
    let event = app.seed_event("owner-1", "Team Sync", app.in_minutes(60 * 48), &[]).await;

    let res = app
        .post_json_as(
            &format!("/events/{}/participants", event.id),
            "owner-1",
            json!({"userId": "guest-1"}),
        )
        .await;
    assert_eq!(res.status(), 200);

    let participant = app.state.participant_repo.find(&event.id, "guest-1").await.unwrap().unwrap();
    assert_eq!(participant.status, "pending");
    assert_eq!(participant.display_name, "Bob");
    assert!(participant.responded_at.is_none());

    // Best-effort notification went out to the invitee
    let mails = app.email.sent_to("bob@example.com");
    assert_eq!(mails.len(), 1);
    assert!(mails[0].subject.contains("Alice"));
    assert!(mails[0].subject.contains("Team Sync"));
}

#[tokio::test]
async fn test_respond_accept_sets_status_and_timestamps() {
    let app = TestApp::new().await;

    app.seed_user("owner-1", "Alice", Some("alice@example.com")).await;
    app.seed_user("guest-1", "Bob", Some("bob@example.com")).await;
    let event = app.seed_event("owner-1", "Dinner", app.in_minutes(60 * 24), &[]).await;

    app.post_json_as(
        &format!("/events/{}/participants", event.id),
        "owner-1",
        json!({"userId": "guest-1"}),
    )
    .await;

    let res = app
        .post_json(
            "/invites/respond",
            json!({"uid": "guest-1", "eventId": event.id, "status": "accepted"}),
        )
        .await;
    assert_eq!(res.status(), 200);
    let body = parse_body(res).await;
    assert_eq!(body["success"], true);

    let participant = app.state.participant_repo.find(&event.id, "guest-1").await.unwrap().unwrap();
    assert_eq!(participant.status, "accepted");
    let responded_at = participant.responded_at.expect("responded_at must be set");
    assert!(responded_at >= participant.invited_at);
}

#[tokio::test]
async fn test_respond_is_idempotent() {
    let app = TestApp::new().await;

    app.seed_user("owner-1", "Alice", None).await;
    app.seed_user("guest-1", "Bob", None).await;
    let event = app.seed_event("owner-1", "Dinner", app.in_minutes(60 * 24), &[]).await;

    app.post_json_as(
        &format!("/events/{}/participants", event.id),
        "owner-1",
        json!({"userId": "guest-1"}),
    )
    .await;

    let payload = json!({"uid": "guest-1", "eventId": event.id, "status": "accepted"});
    let first = app.post_json("/invites/respond", payload.clone()).await;
    assert_eq!(first.status(), 200);
    let after_first = app.state.participant_repo.find(&event.id, "guest-1").await.unwrap().unwrap();

    let second = app.post_json("/invites/respond", payload).await;
    assert_eq!(second.status(), 200);
    let after_second = app.state.participant_repo.find(&event.id, "guest-1").await.unwrap().unwrap();

    assert_eq!(after_second.status, "accepted");
    assert_eq!(after_first.responded_at, after_second.responded_at);
}

#[tokio::test]
async fn test_respond_with_invalid_status_leaves_state_unchanged() {
    let app = TestApp::new().await;

    app.seed_user("owner-1", "Alice", None).await;
    app.seed_user("guest-1", "Bob", None).await;
    let event = app.seed_event("owner-1", "Dinner", app.in_minutes(60 * 24), &[]).await;

    app.post_json_as(
        &format!("/events/{}/participants", event.id),
        "owner-1",
        json!({"userId": "guest-1"}),
    )
    .await;

    let res = app
        .post_json(
            "/invites/respond",
            json!({"uid": "guest-1", "eventId": event.id, "status": "maybe"}),
        )
        .await;
    assert_eq!(res.status(), 400);

    let participant = app.state.participant_repo.find(&event.id, "guest-1").await.unwrap().unwrap();
    assert_eq!(participant.status, "pending");
    assert!(participant.responded_at.is_none());
}

#[tokio::test]
async fn test_respond_for_unknown_participant_is_404() {
    let app = TestApp::new().await;

    app.seed_user("owner-1", "Alice", None).await;
    let event = app.seed_event("owner-1", "Dinner", app.in_minutes(60 * 24), &[]).await;

    let res = app
        .post_json(
            "/invites/respond",
            json!({"uid": "nobody", "eventId": event.id, "status": "accepted"}),
        )
        .await;
    assert_eq!(res.status(), 404);
}

#[tokio::test]
async fn test_three_response_paths_converge() {
    let app = TestApp::new().await;

    app.seed_user("owner-1", "Alice", Some("alice@example.com")).await;
    app.seed_user("u-app", "AppUser", Some("app@example.com")).await;
    app.seed_user("u-mail", "MailUser", Some("mail@example.com")).await;
    app.seed_user("u-token", "TokenUser", Some("token@example.com")).await;
    let event = app.seed_event("owner-1", "Workshop", app.in_minutes(60 * 24), &[]).await;

    for uid in ["u-app", "u-mail"] {
        app.post_json_as(
            &format!("/events/{}/participants", event.id),
            "owner-1",
            json!({"userId": uid}),
        )
        .await;
    }

    // Path 1: authenticated in-app response
    let res = app
        .post_json(
            "/invites/respond",
            json!({"uid": "u-app", "eventId": event.id, "status": "accepted"}),
        )
        .await;
    assert_eq!(res.status(), 200);

    // Path 2: one-click email response
    let res = app
        .post_json(
            "/respondInviteByEmail",
            json!({"email": "mail@example.com", "eventId": event.id, "status": "accepted"}),
        )
        .await;
    assert_eq!(res.status(), 200);
    let body = parse_body(res).await;
    assert_eq!(body["eventTitle"], "Workshop");

    // Path 3: tokenized invite acceptance
    let res = app
        .post_json_as(
            &format!("/events/{}/invites", event.id),
            "owner-1",
            json!({"email": "token@example.com"}),
        )
        .await;
    assert_eq!(res.status(), 200);
    let body = parse_body(res).await;
    let token = body["token"].as_str().unwrap().to_string();

    let res = app
        .post_json(
            "/invites/accept",
            json!({
                "token": token,
                "email": "token@example.com",
                "eventId": event.id,
                "uid": "u-token"
            }),
        )
        .await;
    assert_eq!(res.status(), 200);

    // All three end in the same stored state
    for uid in ["u-app", "u-mail", "u-token"] {
        let p = app.state.participant_repo.find(&event.id, uid).await.unwrap().unwrap();
        assert_eq!(p.status, "accepted", "path for {} diverged", uid);
        assert!(p.responded_at.is_some(), "responded_at missing for {}", uid);
    }

    // The token path also mirrors the invite record
    let invite = app.state.invite_repo.find_by_token(&token).await.unwrap().unwrap();
    assert_eq!(invite.status, "accepted");
}

#[tokio::test]
async fn test_respond_by_email_unknown_user_is_404() {
    let app = TestApp::new().await;

    app.seed_user("owner-1", "Alice", None).await;
    let event = app.seed_event("owner-1", "Dinner", app.in_minutes(60 * 24), &[]).await;

    let res = app
        .post_json(
            "/respondInviteByEmail",
            json!({"email": "ghost@example.com", "eventId": event.id, "status": "accepted"}),
        )
        .await;
    assert_eq!(res.status(), 404);
}

#[tokio::test]
async fn test_invite_by_email_requires_ownership_and_writes_nothing_on_denial() {
    let app = TestApp::new().await;

    app.seed_user("owner-1", "Alice", Some("alice@example.com")).await;
    app.seed_user("guest-1", "Bob", Some("bob@example.com")).await;
    let event = app.seed_event("owner-1", "Private Party", app.in_minutes(60 * 24), &[]).await;

    let res = app
        .post_json_as(
            &format!("/events/{}/invites", event.id),
            "guest-1",
            json!({"email": "mallory@example.com"}),
        )
        .await;
    assert_eq!(res.status(), 403);

    let invites = app.state.invite_repo.list_by_event(&event.id).await.unwrap();
    assert!(invites.is_empty(), "denied invite must not be persisted");
    assert_eq!(app.email.total_sent(), 0);
}

#[tokio::test]
async fn test_invite_by_email_persists_token_with_expiry_and_attaches_ics() {
    let app = TestApp::new().await;

    app.seed_user("owner-1", "Alice", Some("alice@example.com")).await;
    let event = app.seed_event("owner-1", "Birthday", app.in_minutes(60 * 24), &[]).await;

    let res = app
        .post_json_as(
            &format!("/events/{}/invites", event.id),
            "owner-1",
            json!({"email": "friend@example.com"}),
        )
        .await;
    assert_eq!(res.status(), 200);
    let body = parse_body(res).await;
    let token = body["token"].as_str().unwrap();
    assert_eq!(token.len(), 32);

    let invite = app.state.invite_repo.find_by_token(token).await.unwrap().unwrap();
    assert_eq!(invite.email, "friend@example.com");
    assert_eq!(invite.status, "pending");
    let horizon = invite.created_at + Duration::days(30);
    assert!((invite.expires_at - horizon).num_seconds().abs() < 5);

    let mails = app.email.sent_to("friend@example.com");
    assert_eq!(mails.len(), 1);
    assert!(mails[0].body.contains(token));
    assert!(mails[0].body.contains("accept-invite"));
    assert_eq!(mails[0].attachment.as_deref(), Some("invite.ics"));
}

#[tokio::test]
async fn test_reinvite_keeps_rejection_unless_forced() {
    let app = TestApp::new().await;

    app.seed_user("owner-1", "Alice", None).await;
    app.seed_user("guest-1", "Bob", None).await;
    let event = app.seed_event("owner-1", "Dinner", app.in_minutes(60 * 24), &[]).await;

    app.post_json_as(
        &format!("/events/{}/participants", event.id),
        "owner-1",
        json!({"userId": "guest-1"}),
    )
    .await;
    app.post_json(
        "/invites/respond",
        json!({"uid": "guest-1", "eventId": event.id, "status": "rejected"}),
    )
    .await;

    // Plain re-invite does not discard the rejection
    app.post_json_as(
        &format!("/events/{}/participants", event.id),
        "owner-1",
        json!({"userId": "guest-1"}),
    )
    .await;
    let p = app.state.participant_repo.find(&event.id, "guest-1").await.unwrap().unwrap();
    assert_eq!(p.status, "rejected");

    // Explicit reset puts them back to pending
    app.post_json_as(
        &format!("/events/{}/participants", event.id),
        "owner-1",
        json!({"userId": "guest-1", "forceReset": true}),
    )
    .await;
    let p = app.state.participant_repo.find(&event.id, "guest-1").await.unwrap().unwrap();
    assert_eq!(p.status, "pending");
}

#[tokio::test]
async fn test_pending_invites_listing() {
    let app = TestApp::new().await;

    app.seed_user("owner-1", "Alice", Some("alice@example.com")).await;
    app.seed_user("guest-1", "Bob", Some("bob@example.com")).await;
    let pending_event = app.seed_event("owner-1", "Pending One", app.in_minutes(60 * 24), &[]).await;
    let answered_event = app.seed_event("owner-1", "Answered One", app.in_minutes(60 * 48), &[]).await;

    for event_id in [&pending_event.id, &answered_event.id] {
        app.post_json_as(
            &format!("/events/{}/participants", event_id),
            "owner-1",
            json!({"userId": "guest-1"}),
        )
        .await;
    }
    app.post_json(
        "/invites/respond",
        json!({"uid": "guest-1", "eventId": answered_event.id, "status": "accepted"}),
    )
    .await;

    let res = app.get("/invites/my?uid=guest-1").await;
    assert_eq!(res.status(), 200);
    let body = parse_body(res).await;
    assert_eq!(body["invitesFound"], 1);
    assert_eq!(body["invites"][0]["eventTitle"], "Pending One");
    assert_eq!(body["invites"][0]["organizerName"], "Alice");
}
