// SPDX-FileCopyrightText: 2026 Ombud Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end conversation scenarios over a real SQLite store, with
//! recording stand-ins for the chat transport and the email mirror.

use std::collections::HashSet;
use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use ombud_core::traits::{Mailer, Messenger, RequestStore};
use ombud_core::types::{Button, ClientId, ContentKind, MediaRef, RequestId};
use ombud_core::OmbudError;
use ombud_dialog::{Destination, Destinations, Lifecycle, Stage};
use ombud_storage::SqliteStore;

const CLIENT: ClientId = ClientId(555);
const BRANCH_2_CHAT: i64 = 1002;
const HEAD_OFFICE_CHAT: i64 = 9000;

#[derive(Debug, Clone)]
struct SentText {
    chat_id: i64,
    text: String,
    buttons: Option<Vec<Button>>,
}

#[derive(Debug, Clone)]
struct SentMedia {
    chat_id: i64,
    items: Vec<MediaRef>,
}

#[derive(Default)]
struct RecordingMessenger {
    texts: Mutex<Vec<SentText>>,
    media: Mutex<Vec<SentMedia>>,
    failing_chats: Mutex<HashSet<i64>>,
}

impl RecordingMessenger {
    fn texts_to(&self, chat_id: i64) -> Vec<SentText> {
        self.texts
            .lock()
            .unwrap()
            .iter()
            .filter(|t| t.chat_id == chat_id)
            .cloned()
            .collect()
    }

    fn media_to(&self, chat_id: i64) -> Vec<SentMedia> {
        self.media
            .lock()
            .unwrap()
            .iter()
            .filter(|m| m.chat_id == chat_id)
            .cloned()
            .collect()
    }

    fn fail_chat(&self, chat_id: i64) {
        self.failing_chats.lock().unwrap().insert(chat_id);
    }
}

#[async_trait]
impl Messenger for RecordingMessenger {
    async fn send_text(
        &self,
        chat_id: i64,
        text: &str,
        buttons: Option<Vec<Button>>,
    ) -> Result<(), OmbudError> {
        if self.failing_chats.lock().unwrap().contains(&chat_id) {
            return Err(OmbudError::Delivery {
                message: format!("chat {chat_id} unreachable"),
                source: None,
            });
        }
        self.texts.lock().unwrap().push(SentText {
            chat_id,
            text: text.to_string(),
            buttons,
        });
        Ok(())
    }

    async fn send_media_group(&self, chat_id: i64, items: &[MediaRef]) -> Result<(), OmbudError> {
        if self.failing_chats.lock().unwrap().contains(&chat_id) {
            return Err(OmbudError::Delivery {
                message: format!("chat {chat_id} unreachable"),
                source: None,
            });
        }
        self.media.lock().unwrap().push(SentMedia {
            chat_id,
            items: items.to_vec(),
        });
        Ok(())
    }
}

#[derive(Default)]
struct RecordingMailer {
    sent: Mutex<Vec<(String, String, String)>>,
    failing: Mutex<bool>,
}

impl RecordingMailer {
    fn sent_to(&self, to: &str) -> Vec<(String, String, String)> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .filter(|(_, _, t)| t == to)
            .cloned()
            .collect()
    }

    fn fail_all(&self) {
        *self.failing.lock().unwrap() = true;
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(
        &self,
        subject: &str,
        body: &str,
        to: &str,
        _attachment: Option<&Path>,
    ) -> Result<(), OmbudError> {
        if *self.failing.lock().unwrap() {
            return Err(OmbudError::Delivery {
                message: "smtp relay unreachable".to_string(),
                source: None,
            });
        }
        self.sent
            .lock()
            .unwrap()
            .push((subject.to_string(), body.to_string(), to.to_string()));
        Ok(())
    }
}

struct Harness {
    lifecycle: Lifecycle,
    messenger: Arc<RecordingMessenger>,
    mailer: Arc<RecordingMailer>,
    store: Arc<SqliteStore>,
    _dir: tempfile::TempDir,
}

async fn setup() -> Harness {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("scenarios.db");
    let store = Arc::new(SqliteStore::open(db_path.to_str().unwrap()).await.unwrap());
    let messenger = Arc::new(RecordingMessenger::default());
    let mailer = Arc::new(RecordingMailer::default());
    let routes = Arc::new(Destinations::new(
        vec![
            Destination {
                name: "Branch 1".to_string(),
                chat_id: 1001,
                email: Some("branch1@example.com".to_string()),
            },
            Destination {
                name: "Branch 2".to_string(),
                chat_id: BRANCH_2_CHAT,
                email: Some("branch2@example.com".to_string()),
            },
        ],
        Destination {
            name: "Head Office".to_string(),
            chat_id: HEAD_OFFICE_CHAT,
            email: Some("office@example.com".to_string()),
        },
    ));
    let lifecycle = Lifecycle::new(
        store.clone(),
        messenger.clone(),
        mailer.clone(),
        routes,
    );
    Harness {
        lifecycle,
        messenger,
        mailer,
        store,
        _dir: dir,
    }
}

/// Walk a client up to an open draft and return its request id.
async fn open_draft(h: &Harness, branch: &str) -> RequestId {
    h.lifecycle.start(CLIENT).await.unwrap();
    h.lifecycle.begin_request(CLIENT).await.unwrap();
    h.lifecycle.choose_branch(CLIENT, branch).await.unwrap();
    match h.lifecycle.stage(CLIENT).await {
        Stage::CollectingContent { request_id, .. } => request_id,
        other => panic!("expected draft in progress, got {other}"),
    }
}

#[tokio::test]
async fn text_request_fans_out_to_branch_and_head_office() {
    let h = setup().await;
    let request_id = open_draft(&h, "Branch 2").await;

    h.lifecycle
        .receive_content(CLIENT, ContentKind::Text, "Hello")
        .await
        .unwrap();
    h.lifecycle.confirm(CLIENT, request_id).await.unwrap();

    // Exactly one notification per channel, each carrying the text.
    let branch_msgs: Vec<_> = h
        .messenger
        .texts_to(BRANCH_2_CHAT)
        .into_iter()
        .filter(|m| m.text.contains("Hello"))
        .collect();
    let office_msgs: Vec<_> = h
        .messenger
        .texts_to(HEAD_OFFICE_CHAT)
        .into_iter()
        .filter(|m| m.text.contains("Hello"))
        .collect();
    assert_eq!(branch_msgs.len(), 1);
    assert_eq!(office_msgs.len(), 1);

    // The branch copy carries the reply button; the duplicate does not.
    let buttons = branch_msgs[0].buttons.as_ref().unwrap();
    assert!(buttons[0].payload.starts_with("reply-to-client_555_"));
    assert!(office_msgs[0].buttons.is_none());

    // Both mirror addresses got an email.
    assert_eq!(h.mailer.sent_to("branch2@example.com").len(), 1);
    assert_eq!(h.mailer.sent_to("office@example.com").len(), 1);
}

#[tokio::test]
async fn head_office_request_is_not_double_sent() {
    let h = setup().await;
    let request_id = open_draft(&h, "Head Office").await;

    h.lifecycle
        .receive_content(CLIENT, ContentKind::Text, "Hello office")
        .await
        .unwrap();
    h.lifecycle.confirm(CLIENT, request_id).await.unwrap();

    let office_msgs: Vec<_> = h
        .messenger
        .texts_to(HEAD_OFFICE_CHAT)
        .into_iter()
        .filter(|m| m.text.contains("Hello office"))
        .collect();
    assert_eq!(office_msgs.len(), 1, "head office must receive exactly one copy");
    assert_eq!(h.mailer.sent_to("office@example.com").len(), 1);
}

#[tokio::test]
async fn media_only_request_groups_media_without_text_block() {
    let h = setup().await;
    let request_id = open_draft(&h, "Branch 2").await;

    h.lifecycle
        .receive_content(CLIENT, ContentKind::Photo, "file-photo-1")
        .await
        .unwrap();
    h.lifecycle
        .receive_content(CLIENT, ContentKind::Voice, "file-voice-1")
        .await
        .unwrap();

    // Stored order is submission order.
    let stored = h.store.get_request(request_id).await.unwrap().unwrap();
    let kinds: Vec<ContentKind> = stored.items.iter().map(|i| i.kind).collect();
    assert_eq!(kinds, vec![ContentKind::Photo, ContentKind::Voice]);

    h.lifecycle.confirm(CLIENT, request_id).await.unwrap();

    // Media arrives as an ordered group on both channels.
    let branch_media = h.messenger.media_to(BRANCH_2_CHAT);
    assert_eq!(branch_media.len(), 1);
    assert_eq!(branch_media[0].items[0].file_id, "file-photo-1");
    assert_eq!(branch_media[0].items[1].file_id, "file-voice-1");
    assert_eq!(h.messenger.media_to(HEAD_OFFICE_CHAT).len(), 1);

    // The notification text is the header only: no file ids, no
    // dangling empty text section.
    let notification = h
        .messenger
        .texts_to(BRANCH_2_CHAT)
        .into_iter()
        .find(|m| m.text.contains("New request"))
        .unwrap();
    assert!(!notification.text.contains("file-photo-1"));
    assert!(!notification.text.ends_with('\n'));
}

#[tokio::test]
async fn reply_cycle_closes_the_request() {
    let h = setup().await;
    let request_id = open_draft(&h, "Branch 2").await;
    h.lifecycle
        .receive_content(CLIENT, ContentKind::Text, "Hello")
        .await
        .unwrap();
    h.lifecycle.confirm(CLIENT, request_id).await.unwrap();

    let staff = ClientId(BRANCH_2_CHAT);
    h.lifecycle
        .begin_reply(staff, CLIENT, request_id)
        .await
        .unwrap();
    h.lifecycle
        .record_reply_text(staff, "Resolved")
        .await
        .unwrap();

    // The reply is durable before delivery.
    let stored = h.store.get_request(request_id).await.unwrap().unwrap();
    assert_eq!(stored.admin_response.as_deref(), Some("Resolved"));

    h.lifecycle
        .send_reply(staff, CLIENT, request_id)
        .await
        .unwrap();

    // Client got the reply; head office got chat and email mirrors.
    let client_msgs = h.messenger.texts_to(CLIENT.0);
    assert!(
        client_msgs
            .iter()
            .any(|m| m.text == "Reply from support: Resolved")
    );
    let office_mirror = h
        .messenger
        .texts_to(HEAD_OFFICE_CHAT)
        .into_iter()
        .filter(|m| m.text.contains("Resolved") && m.text.contains("delivered to client"))
        .count();
    assert_eq!(office_mirror, 1);
    assert!(
        h.mailer
            .sent_to("office@example.com")
            .iter()
            .any(|(subject, _, _)| subject.contains("Reply sent"))
    );

    // Staff conversation is back to idle.
    assert_eq!(h.lifecycle.stage(staff).await, Stage::Idle);
}

#[tokio::test]
async fn reply_confirm_without_recorded_reply_sends_nothing_to_client() {
    let h = setup().await;
    let request_id = open_draft(&h, "Branch 2").await;
    h.lifecycle
        .receive_content(CLIENT, ContentKind::Text, "Hello")
        .await
        .unwrap();
    h.lifecycle.confirm(CLIENT, request_id).await.unwrap();

    let client_msgs_before = h.messenger.texts_to(CLIENT.0).len();

    let staff = ClientId(BRANCH_2_CHAT);
    h.lifecycle
        .send_reply(staff, CLIENT, request_id)
        .await
        .unwrap();

    assert_eq!(
        h.messenger.texts_to(CLIENT.0).len(),
        client_msgs_before,
        "client must receive nothing"
    );
    assert!(
        h.messenger
            .texts_to(BRANCH_2_CHAT)
            .iter()
            .any(|m| m.text.contains("No reply has been recorded"))
    );
}

#[tokio::test]
async fn content_after_dispatch_is_refused_without_mutation() {
    let h = setup().await;
    let request_id = open_draft(&h, "Branch 2").await;
    h.lifecycle
        .receive_content(CLIENT, ContentKind::Text, "Hello")
        .await
        .unwrap();
    h.lifecycle.confirm(CLIENT, request_id).await.unwrap();

    h.lifecycle
        .receive_content(CLIENT, ContentKind::Text, "one more thing")
        .await
        .unwrap();

    let stored = h.store.get_request(request_id).await.unwrap().unwrap();
    assert_eq!(stored.items.len(), 1, "no item may be appended after dispatch");
    assert_eq!(h.lifecycle.stage(CLIENT).await, Stage::Idle);
    assert!(
        h.messenger
            .texts_to(CLIENT.0)
            .iter()
            .any(|m| m.text.contains("no request in progress")
                || m.text.contains("There is no request in progress"))
    );
}

#[tokio::test]
async fn repeated_confirm_dispatches_exactly_once() {
    let h = setup().await;
    let request_id = open_draft(&h, "Branch 2").await;
    h.lifecycle
        .receive_content(CLIENT, ContentKind::Text, "Hello")
        .await
        .unwrap();
    h.lifecycle.confirm(CLIENT, request_id).await.unwrap();
    h.lifecycle.confirm(CLIENT, request_id).await.unwrap();

    let branch_msgs = h
        .messenger
        .texts_to(BRANCH_2_CHAT)
        .into_iter()
        .filter(|m| m.text.contains("Hello"))
        .count();
    assert_eq!(branch_msgs, 1, "a stale confirm press must not re-dispatch");
}

#[tokio::test]
async fn edit_draft_clears_items_and_collects_again() {
    let h = setup().await;
    let request_id = open_draft(&h, "Branch 1").await;
    h.lifecycle
        .receive_content(CLIENT, ContentKind::Text, "first draft")
        .await
        .unwrap();

    h.lifecycle.edit_draft(CLIENT, request_id).await.unwrap();
    let stored = h.store.get_request(request_id).await.unwrap().unwrap();
    assert!(stored.items.is_empty());

    h.lifecycle
        .receive_content(CLIENT, ContentKind::Text, "second draft")
        .await
        .unwrap();
    let stored = h.store.get_request(request_id).await.unwrap().unwrap();
    assert_eq!(stored.items.len(), 1);
    assert_eq!(stored.items[0].content, "second draft");
}

#[tokio::test]
async fn add_more_keeps_existing_items() {
    let h = setup().await;
    let request_id = open_draft(&h, "Branch 1").await;
    h.lifecycle
        .receive_content(CLIENT, ContentKind::Text, "part one")
        .await
        .unwrap();

    h.lifecycle.add_more(CLIENT, request_id).await.unwrap();
    h.lifecycle
        .receive_content(CLIENT, ContentKind::Photo, "file-p1")
        .await
        .unwrap();

    let stored = h.store.get_request(request_id).await.unwrap().unwrap();
    assert_eq!(stored.items.len(), 2);
    assert_eq!(stored.items[0].content, "part one");
    assert_eq!(stored.items[1].content, "file-p1");
}

#[tokio::test]
async fn unknown_branch_is_rejected_without_creating_a_request() {
    let h = setup().await;
    h.lifecycle.start(CLIENT).await.unwrap();
    h.lifecycle.begin_request(CLIENT).await.unwrap();
    h.lifecycle
        .choose_branch(CLIENT, "Branch 9")
        .await
        .unwrap();

    assert_eq!(h.lifecycle.stage(CLIENT).await, Stage::ChoosingBranch);
    let all = h
        .store
        .fetch_requests_since("2000-01-01T00:00:00.000Z")
        .await
        .unwrap();
    assert!(all.is_empty(), "no request row may be created");
    assert!(
        h.messenger
            .texts_to(CLIENT.0)
            .iter()
            .any(|m| m.text.contains("not available"))
    );
}

#[tokio::test]
async fn email_failure_does_not_block_chat_delivery() {
    let h = setup().await;
    h.mailer.fail_all();

    let request_id = open_draft(&h, "Branch 2").await;
    h.lifecycle
        .receive_content(CLIENT, ContentKind::Text, "Hello")
        .await
        .unwrap();
    h.lifecycle.confirm(CLIENT, request_id).await.unwrap();

    assert!(
        h.messenger
            .texts_to(BRANCH_2_CHAT)
            .iter()
            .any(|m| m.text.contains("Hello")),
        "chat delivery must proceed despite the email failure"
    );
}

#[tokio::test]
async fn head_office_chat_failure_does_not_block_branch_delivery() {
    let h = setup().await;
    h.messenger.fail_chat(HEAD_OFFICE_CHAT);

    let request_id = open_draft(&h, "Branch 2").await;
    h.lifecycle
        .receive_content(CLIENT, ContentKind::Text, "Hello")
        .await
        .unwrap();
    h.lifecycle.confirm(CLIENT, request_id).await.unwrap();

    assert!(
        h.messenger
            .texts_to(BRANCH_2_CHAT)
            .iter()
            .any(|m| m.text.contains("Hello"))
    );
    // Email mirrors still go out independently.
    assert_eq!(h.mailer.sent_to("office@example.com").len(), 1);
}

#[tokio::test]
async fn staff_text_without_reply_context_gets_a_notice() {
    let h = setup().await;
    let staff = ClientId(BRANCH_2_CHAT);
    h.lifecycle
        .record_reply_text(staff, "stray message")
        .await
        .unwrap();
    assert!(
        h.messenger
            .texts_to(BRANCH_2_CHAT)
            .iter()
            .any(|m| m.text.contains("Could not determine"))
    );
}
