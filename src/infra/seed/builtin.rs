use anyhow::Result;

use crate::{
    domain::{
        call::{Call, CallDirection, CallStatus},
        chat::{ChannelLink, Chat, ChatKind, MuteSetting},
        ids::{CallId, ChatId, MessageId, UserId},
        message::{Attachment, AttachmentKind, DeliveryStatus, Message, MessageKind, ReplyPreview},
        store::SeedSnapshot,
        user::User,
    },
    infra::contracts::SeedSource,
};

const MINUTE_MS: i64 = 60_000;
const HOUR_MS: i64 = 60 * MINUTE_MS;
const DAY_MS: i64 = 24 * HOUR_MS;

/// Static demo fixtures, timestamped relative to `now_ms` so date headers
/// read "Today"/"Yesterday".
#[derive(Debug, Clone, Copy)]
pub struct BuiltinSeed {
    now_ms: i64,
}

impl BuiltinSeed {
    pub fn new(now_ms: i64) -> Self {
        Self { now_ms }
    }
}

impl SeedSource for BuiltinSeed {
    fn load(&self) -> Result<SeedSnapshot> {
        Ok(snapshot(self.now_ms))
    }
}

fn user(id: &str, name: &str, online: bool, phone: &str) -> User {
    let mut user = User::new(id, name).with_online(online);
    user.phone = Some(phone.to_owned());
    user
}

fn message(
    id: &str,
    chat_id: &str,
    sender: &str,
    content: &str,
    timestamp_ms: i64,
    status: DeliveryStatus,
) -> Message {
    let mut message = Message::text(
        MessageId::from(id),
        ChatId::from(chat_id),
        UserId::from(sender),
        content,
        timestamp_ms,
    );
    message.status = status;
    message
}

fn call(
    id: &str,
    user: &User,
    direction: CallDirection,
    status: CallStatus,
    timestamp_ms: i64,
) -> Call {
    Call {
        id: CallId::from(id),
        user_id: user.id.clone(),
        user_name: user.name.clone(),
        direction,
        status,
        timestamp_ms,
    }
}

fn snapshot(now: i64) -> SeedSnapshot {
    use DeliveryStatus::{Delivered, Read};

    let me = User::new("me", "You");
    let alice = user("alice", "Alice Johnson", true, "+1 555 0101");
    let bob = user("bob", "Bob Smith", false, "+44 7700 900123");
    let carol = user("carol", "Carol White", true, "+49 151 2345678");
    let david = user("david", "David Brown", false, "+33 6 12 34 56 78");
    let eve = user("eve", "Eve Davis", false, "+61 412 345 678");

    let mut bob_last_seen = bob.clone();
    bob_last_seen.last_seen_ms = Some(now - 2 * HOUR_MS);

    let mut saved = Chat::saved_messages(me.clone());
    saved.description = Some("Notes to self".to_owned());

    let mut alice_chat = Chat::new(
        ChatId::from("chat-alice"),
        ChatKind::Private,
        alice.name.clone(),
        vec![me.clone(), alice.clone()],
    );
    alice_chat.pinned = true;
    alice_chat.unread_count = 2;

    let bob_chat = Chat::new(
        ChatId::from("chat-bob"),
        ChatKind::Private,
        bob.name.clone(),
        vec![me.clone(), bob_last_seen],
    );

    let mut design = Chat::new(
        ChatId::from("group-design"),
        ChatKind::Group,
        "Design Team",
        vec![me.clone(), alice.clone(), carol.clone(), david.clone()],
    );
    design.unread_count = 5;

    let mut news = Chat::new(
        ChatId::from("channel-tech"),
        ChatKind::Channel,
        "Tech News",
        vec![me.clone(), carol.clone()],
    );
    news.description = Some("Daily digest of tech headlines".to_owned());
    news.link = Some(ChannelLink::Public {
        slug: "tech_news".to_owned(),
    });
    news.muted = Some(MuteSetting::Forever);
    news.unread_count = 128;

    let mut eve_chat = Chat::new(
        ChatId::from("chat-eve"),
        ChatKind::Private,
        eve.name.clone(),
        vec![me.clone(), eve.clone()],
    );
    eve_chat.archived = true;

    let mut photo = message(
        "bob-2",
        "chat-bob",
        "bob",
        "Look at this view",
        now - DAY_MS,
        Read,
    );
    photo.kind = MessageKind::Image;
    photo.attachments = vec![Attachment {
        id: "att-1".to_owned(),
        kind: AttachmentKind::Image,
        url: "https://picsum.photos/seed/mountain/800/600".to_owned(),
        name: Some("mountain.jpg".to_owned()),
        size_bytes: Some(245_760),
        duration_secs: None,
    }];
    photo.reactions = vec!["🔥".to_owned()];

    let mut spec_file = message(
        "design-3",
        "group-design",
        "david",
        "",
        now - 30 * MINUTE_MS,
        Read,
    );
    spec_file.kind = MessageKind::File;
    spec_file.attachments = vec![Attachment {
        id: "att-2".to_owned(),
        kind: AttachmentKind::File,
        url: "https://example.com/files/brand-guidelines.pdf".to_owned(),
        name: Some("brand-guidelines.pdf".to_owned()),
        size_bytes: Some(1_572_864),
        duration_secs: None,
    }];

    let mut reply = message(
        "alice-4",
        "chat-alice",
        "alice",
        "Sure, 7pm works!",
        now - 5 * MINUTE_MS,
        Read,
    );
    reply.reply_to = Some(ReplyPreview {
        message_id: MessageId::from("alice-3"),
        content: "Dinner tonight?".to_owned(),
        sender_name: "You".to_owned(),
    });

    let mut pinned_note = message(
        "saved-1",
        "saved-messages",
        "me",
        "Wi-Fi password: correct-horse-battery",
        now - 3 * DAY_MS,
        Read,
    );
    pinned_note.pinned = true;

    let mut edited = message(
        "design-2",
        "group-design",
        "carol",
        "Updated mockups are in the shared folder",
        now - 50 * MINUTE_MS,
        Read,
    );
    edited.edited_at_ms = Some(now - 45 * MINUTE_MS);

    let messages = vec![
        pinned_note,
        message("saved-2", "saved-messages", "me", "Buy milk", now - HOUR_MS, Read),
        message("alice-1", "chat-alice", "alice", "Hey! How are you?", now - DAY_MS - HOUR_MS, Read),
        message("alice-2", "chat-alice", "me", "Great, thanks! You?", now - DAY_MS - 50 * MINUTE_MS, Read),
        message("alice-3", "chat-alice", "me", "Dinner tonight?", now - 10 * MINUTE_MS, Read),
        reply,
        message("alice-5", "chat-alice", "alice", "I'll book a table", now - 4 * MINUTE_MS, Read),
        message("bob-1", "chat-bob", "me", "How was the hike?", now - DAY_MS - 2 * HOUR_MS, Read),
        photo,
        message("bob-3", "chat-bob", "me", "Wow, stunning!", now - 20 * MINUTE_MS, Delivered),
        message("design-1", "group-design", "alice", "Morning team!", now - HOUR_MS, Read),
        edited,
        spec_file,
        message("design-4", "group-design", "carol", "Please review before Friday", now - 29 * MINUTE_MS, Read),
        message("design-5", "group-design", "me", "On it", now - 25 * MINUTE_MS, Read),
        message("tech-1", "channel-tech", "carol", "Rust 1.90 is out", now - 3 * HOUR_MS, Read),
        message("eve-1", "chat-eve", "eve", "See you next year!", now - 40 * DAY_MS, Read),
    ];

    let calls = vec![
        call("call-1", &alice, CallDirection::Incoming, CallStatus::Answered, now - 35 * MINUTE_MS),
        call("call-2", &bob, CallDirection::Outgoing, CallStatus::Canceled, now - 3 * HOUR_MS),
        call("call-3", &carol, CallDirection::Incoming, CallStatus::Missed, now - DAY_MS - HOUR_MS),
        call("call-4", &david, CallDirection::Outgoing, CallStatus::Answered, now - 3 * DAY_MS),
        call("call-5", &eve, CallDirection::Incoming, CallStatus::Declined, now - 12 * DAY_MS),
    ];

    SeedSnapshot {
        me,
        contacts: vec![alice, bob, carol, david, eve],
        chats: vec![saved, alice_chat, bob_chat, design, news, eve_chat],
        messages,
        calls,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::store::ChatStore;

    const NOW: i64 = 1_771_063_200_000;

    #[test]
    fn builtin_fixtures_seed_a_consistent_store() {
        let snapshot = BuiltinSeed::new(NOW).load().expect("seed");

        let store = ChatStore::from_seed(snapshot);

        assert!(store.chats()[0].is_saved_messages());
        assert_eq!(store.chats().len(), 6);
        assert_eq!(
            store
                .chat(&ChatId::from("saved-messages"))
                .map(|chat| chat.pinned_message_ids.len()),
            Some(1)
        );
    }

    #[test]
    fn builtin_calls_reference_known_contacts() {
        let snapshot = BuiltinSeed::new(NOW).load().expect("seed");

        assert_eq!(snapshot.calls.len(), 5);
        for call in &snapshot.calls {
            assert!(snapshot.contacts.iter().any(|user| user.id == call.user_id));
        }
    }

    #[test]
    fn every_message_belongs_to_a_seeded_chat() {
        let snapshot = BuiltinSeed::new(NOW).load().expect("seed");

        for message in &snapshot.messages {
            assert!(
                snapshot.chats.iter().any(|chat| chat.id == message.chat_id),
                "{} has no chat",
                message.id
            );
        }
    }
}
