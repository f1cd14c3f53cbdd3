use std::{
    collections::{HashMap, HashSet},
    fs,
    path::PathBuf,
};

use anyhow::Result;
use serde::Deserialize;

use crate::{
    domain::{
        call::{Call, CallDirection, CallStatus},
        chat::{ChannelLink, Chat, ChatKind, MuteSetting},
        ids::{CallId, ChatId, MessageId, UserId},
        message::{Attachment, AttachmentKind, DeliveryStatus, Message, MessageKind, ReplyPreview},
        store::SeedSnapshot,
        user::User,
    },
    infra::{contracts::SeedSource, error::AppError},
};

/// Seed fixtures read from a TOML file.
#[derive(Debug, Clone)]
pub struct FileSeed {
    path: PathBuf,
}

impl FileSeed {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl SeedSource for FileSeed {
    fn load(&self) -> Result<SeedSnapshot> {
        let raw = fs::read_to_string(&self.path).map_err(|source| AppError::SeedRead {
            path: self.path.clone(),
            source,
        })?;
        let file: SeedFile = toml::from_str(&raw).map_err(|source| AppError::SeedParse {
            path: self.path.clone(),
            source,
        })?;

        let snapshot = file.into_snapshot()?;
        tracing::info!(
            path = %self.path.display(),
            chats = snapshot.chats.len(),
            messages = snapshot.messages.len(),
            "seed file loaded"
        );
        Ok(snapshot)
    }
}

#[derive(Debug, Deserialize)]
struct SeedFile {
    me: SeedUser,
    #[serde(default)]
    contacts: Vec<SeedUser>,
    #[serde(default)]
    chats: Vec<SeedChat>,
    #[serde(default)]
    messages: Vec<SeedMessage>,
    #[serde(default)]
    calls: Vec<SeedCall>,
}

#[derive(Debug, Deserialize)]
struct SeedUser {
    id: String,
    name: String,
    avatar: Option<String>,
    #[serde(default)]
    online: bool,
    last_seen_ms: Option<i64>,
    phone: Option<String>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
enum SeedChatKind {
    Private,
    Group,
    Channel,
}

#[derive(Debug, Deserialize)]
struct SeedChat {
    id: String,
    kind: SeedChatKind,
    name: String,
    avatar: Option<String>,
    participants: Vec<String>,
    #[serde(default)]
    unread_count: u32,
    #[serde(default)]
    pinned: bool,
    #[serde(default)]
    muted: bool,
    muted_until_ms: Option<i64>,
    #[serde(default)]
    archived: bool,
    description: Option<String>,
    public_slug: Option<String>,
    invite_token: Option<String>,
}

#[derive(Debug, Clone, Copy, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
enum SeedStatus {
    Sending,
    Sent,
    Delivered,
    #[default]
    Read,
}

#[derive(Debug, Clone, Copy, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
enum SeedMessageKind {
    #[default]
    Text,
    Image,
    Video,
    Voice,
    File,
    Sticker,
    System,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
enum SeedAttachmentKind {
    Image,
    Video,
    File,
    Voice,
}

#[derive(Debug, Deserialize)]
struct SeedAttachment {
    id: String,
    kind: SeedAttachmentKind,
    url: String,
    name: Option<String>,
    size_bytes: Option<u64>,
    duration_secs: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct SeedMessage {
    id: String,
    chat_id: String,
    sender_id: String,
    #[serde(default)]
    content: String,
    timestamp_ms: i64,
    #[serde(default)]
    status: SeedStatus,
    #[serde(default)]
    kind: SeedMessageKind,
    reply_to: Option<String>,
    #[serde(default)]
    attachments: Vec<SeedAttachment>,
    #[serde(default)]
    reactions: Vec<String>,
    edited_at_ms: Option<i64>,
    #[serde(default)]
    pinned: bool,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
enum SeedCallDirection {
    Incoming,
    Outgoing,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
enum SeedCallStatus {
    Answered,
    Missed,
    Declined,
    Canceled,
}

#[derive(Debug, Deserialize)]
struct SeedCall {
    /// Generated when absent.
    id: Option<String>,
    user_id: String,
    direction: SeedCallDirection,
    status: SeedCallStatus,
    timestamp_ms: i64,
}

impl SeedFile {
    fn into_snapshot(self) -> Result<SeedSnapshot, AppError> {
        let me = self.me.into_user();
        let contacts: Vec<User> = self.contacts.into_iter().map(SeedUser::into_user).collect();

        let mut users: HashMap<&str, &User> = HashMap::new();
        users.insert(me.id.as_str(), &me);
        for contact in &contacts {
            users.insert(contact.id.as_str(), contact);
        }

        let chats = self
            .chats
            .into_iter()
            .map(|chat| chat.into_chat(&users))
            .collect::<Result<Vec<_>, _>>()?;
        ensure_unique("chat", chats.iter().map(|chat| chat.id.as_str()))?;
        ensure_unique("message", self.messages.iter().map(|seed| seed.id.as_str()))?;

        let mut messages: Vec<Message> = Vec::with_capacity(self.messages.len());
        for seed in self.messages {
            let reply_to = seed.reply_to.clone();
            let mut message = seed.into_message();
            if let Some(reply_id) = reply_to {
                message.reply_to = Some(reply_preview(&reply_id, &messages, &chats, &me.id)?);
            }
            messages.push(message);
        }

        let calls = self
            .calls
            .into_iter()
            .map(|call| call.into_call(&users))
            .collect::<Result<Vec<_>, _>>()?;
        ensure_unique("call", calls.iter().map(|call| call.id.as_str()))?;

        Ok(SeedSnapshot {
            me,
            contacts,
            chats,
            messages,
            calls,
        })
    }
}

fn ensure_unique<'a>(what: &str, ids: impl Iterator<Item = &'a str>) -> Result<(), AppError> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(AppError::SeedInvalid {
                details: format!("duplicate {what} id `{id}`"),
            });
        }
    }
    Ok(())
}

/// Replies may only point at messages listed earlier in the file.
fn reply_preview(
    reply_id: &str,
    earlier: &[Message],
    chats: &[Chat],
    me: &UserId,
) -> Result<ReplyPreview, AppError> {
    let replied = earlier
        .iter()
        .find(|message| message.id.as_str() == reply_id)
        .ok_or_else(|| AppError::SeedInvalid {
            details: format!("reply_to `{reply_id}` does not precede the reply"),
        })?;
    let sender_name = chats
        .iter()
        .find(|chat| chat.id == replied.chat_id)
        .map(|chat| chat.sender_name(&replied.sender_id, me))
        .unwrap_or_else(|| "Unknown".to_owned());

    Ok(ReplyPreview {
        message_id: replied.id.clone(),
        content: replied.display_content(),
        sender_name,
    })
}

impl SeedUser {
    fn into_user(self) -> User {
        let mut user = User::new(self.id, self.name).with_online(self.online);
        user.avatar = self.avatar;
        user.last_seen_ms = self.last_seen_ms;
        user.phone = self.phone;
        user
    }
}

impl SeedChat {
    fn into_chat(self, users: &HashMap<&str, &User>) -> Result<Chat, AppError> {
        let participants = self
            .participants
            .iter()
            .map(|id| {
                users
                    .get(id.as_str())
                    .map(|user| (*user).clone())
                    .ok_or_else(|| AppError::SeedInvalid {
                        details: format!("chat `{}` lists unknown participant `{id}`", self.id),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let kind = match self.kind {
            SeedChatKind::Private => ChatKind::Private,
            SeedChatKind::Group => ChatKind::Group,
            SeedChatKind::Channel => ChatKind::Channel,
        };

        let mut chat = Chat::new(ChatId::new(self.id), kind, self.name, participants);
        chat.avatar = self.avatar;
        chat.unread_count = self.unread_count;
        chat.pinned = self.pinned;
        chat.archived = self.archived;
        chat.muted = match (self.muted_until_ms, self.muted) {
            (Some(until_ms), _) => Some(MuteSetting::Until(until_ms)),
            (None, true) => Some(MuteSetting::Forever),
            (None, false) => None,
        };
        chat.description = self.description;
        chat.link = match (self.public_slug, self.invite_token) {
            (Some(slug), _) => Some(ChannelLink::Public { slug }),
            (None, Some(invite_token)) => Some(ChannelLink::Private { invite_token }),
            (None, None) => None,
        };
        Ok(chat)
    }
}

impl SeedCall {
    fn into_call(self, users: &HashMap<&str, &User>) -> Result<Call, AppError> {
        let user = users
            .get(self.user_id.as_str())
            .ok_or_else(|| AppError::SeedInvalid {
                details: format!("call with unknown user `{}`", self.user_id),
            })?;

        Ok(Call {
            id: self.id.map(CallId::new).unwrap_or_else(CallId::generate),
            user_id: user.id.clone(),
            user_name: user.name.clone(),
            direction: match self.direction {
                SeedCallDirection::Incoming => CallDirection::Incoming,
                SeedCallDirection::Outgoing => CallDirection::Outgoing,
            },
            status: match self.status {
                SeedCallStatus::Answered => CallStatus::Answered,
                SeedCallStatus::Missed => CallStatus::Missed,
                SeedCallStatus::Declined => CallStatus::Declined,
                SeedCallStatus::Canceled => CallStatus::Canceled,
            },
            timestamp_ms: self.timestamp_ms,
        })
    }
}

impl SeedMessage {
    fn into_message(self) -> Message {
        let mut message = Message::text(
            MessageId::new(self.id),
            ChatId::new(self.chat_id),
            UserId::new(self.sender_id),
            self.content,
            self.timestamp_ms,
        );
        message.status = match self.status {
            SeedStatus::Sending => DeliveryStatus::Sending,
            SeedStatus::Sent => DeliveryStatus::Sent,
            SeedStatus::Delivered => DeliveryStatus::Delivered,
            SeedStatus::Read => DeliveryStatus::Read,
        };
        message.kind = match self.kind {
            SeedMessageKind::Text => MessageKind::Text,
            SeedMessageKind::Image => MessageKind::Image,
            SeedMessageKind::Video => MessageKind::Video,
            SeedMessageKind::Voice => MessageKind::Voice,
            SeedMessageKind::File => MessageKind::File,
            SeedMessageKind::Sticker => MessageKind::Sticker,
            SeedMessageKind::System => MessageKind::System,
        };
        message.attachments = self
            .attachments
            .into_iter()
            .map(|attachment| Attachment {
                id: attachment.id,
                kind: match attachment.kind {
                    SeedAttachmentKind::Image => AttachmentKind::Image,
                    SeedAttachmentKind::Video => AttachmentKind::Video,
                    SeedAttachmentKind::File => AttachmentKind::File,
                    SeedAttachmentKind::Voice => AttachmentKind::Voice,
                },
                url: attachment.url,
                name: attachment.name,
                size_bytes: attachment.size_bytes,
                duration_secs: attachment.duration_secs,
            })
            .collect();
        message.reactions = self.reactions;
        message.edited_at_ms = self.edited_at_ms;
        message.pinned = self.pinned;
        message
    }
}
