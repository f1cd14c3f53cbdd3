//! Read-only details of one chat for the info panel.

use super::{
    chat::{Chat, ChatKind},
    ids::{ChatId, UserId},
    message::{AttachmentKind, Message},
    user::User,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberRow {
    pub name: String,
    pub status: String,
}

/// Counts behind the Media/Files/Voice/Links tabs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SharedCounts {
    pub media: usize,
    pub files: usize,
    pub voice: usize,
    pub links: usize,
}

impl SharedCounts {
    fn of(messages: &[Message]) -> Self {
        let mut counts = Self::default();
        for message in messages {
            for attachment in &message.attachments {
                match attachment.kind {
                    AttachmentKind::Image | AttachmentKind::Video => counts.media += 1,
                    AttachmentKind::File => counts.files += 1,
                    AttachmentKind::Voice => counts.voice += 1,
                }
            }
            if message.content.contains("http://") || message.content.contains("https://") {
                counts.links += 1;
            }
        }
        counts
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatInfo {
    pub chat_id: ChatId,
    pub kind: ChatKind,
    pub name: String,
    pub subtitle: Option<String>,
    pub description: Option<String>,
    pub link: Option<String>,
    pub muted: bool,
    /// Empty for private chats.
    pub members: Vec<MemberRow>,
    pub shared: SharedCounts,
    /// Saved Messages offers no destructive action.
    pub deletable: bool,
}

impl ChatInfo {
    pub fn build(chat: &Chat, messages: &[Message], me: &UserId, now_ms: i64) -> Self {
        let subtitle = match chat.kind {
            ChatKind::Private if chat.is_saved_messages() => None,
            ChatKind::Private => chat.counterpart(me).map(presence),
            ChatKind::Group => Some(format!("{} members", chat.participants.len())),
            ChatKind::Channel => Some(format!("{} subscribers", chat.participants.len())),
        };

        let members = match chat.kind {
            ChatKind::Private => Vec::new(),
            ChatKind::Group | ChatKind::Channel => chat
                .participants
                .iter()
                .map(|user| MemberRow {
                    name: user.name.clone(),
                    status: if &user.id == me {
                        "you".to_owned()
                    } else {
                        presence(user)
                    },
                })
                .collect(),
        };

        Self {
            chat_id: chat.id.clone(),
            kind: chat.kind,
            name: chat.name.clone(),
            subtitle,
            description: chat.description.clone().filter(|text| !text.is_empty()),
            link: chat.link.as_ref().map(|link| link.url()),
            muted: chat.is_muted(now_ms),
            members,
            shared: SharedCounts::of(messages),
            deletable: !chat.is_saved_messages(),
        }
    }
}

fn presence(user: &User) -> String {
    if user.online {
        "online".to_owned()
    } else {
        "last seen recently".to_owned()
    }
}
