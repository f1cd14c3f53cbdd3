use super::{
    ids::{ChatId, MessageId, UserId},
    message::{DeliveryStatus, Message},
    user::User,
};

/// Id of the reserved note-to-self chat.
pub const SAVED_MESSAGES_CHAT_ID: &str = "saved-messages";
pub const SAVED_MESSAGES_TITLE: &str = "Saved Messages";

const CHANNEL_LINK_BASE: &str = "https://t.me/";

/// Kind of chat for rendering and simulation purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChatKind {
    /// Private 1-to-1 conversation with a user.
    #[default]
    Private,
    /// Group chat.
    Group,
    /// Broadcast channel.
    Channel,
}

impl ChatKind {
    pub fn as_label(self) -> &'static str {
        match self {
            Self::Private => "Private chat",
            Self::Group => "Group",
            Self::Channel => "Channel",
        }
    }

    /// Label of the destructive action offered for this kind of chat.
    pub fn delete_action_label(self) -> &'static str {
        match self {
            Self::Private => "Delete Chat",
            Self::Group => "Leave Group",
            Self::Channel => "Leave Channel",
        }
    }
}

/// How long notifications of a chat stay muted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MuteSetting {
    Until(i64),
    Forever,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MuteDuration {
    OneHour,
    FourHours,
    EightHours,
    OneDay,
    OneMonth,
    Forever,
}

impl MuteDuration {
    pub const ALL: [MuteDuration; 6] = [
        MuteDuration::OneHour,
        MuteDuration::FourHours,
        MuteDuration::EightHours,
        MuteDuration::OneDay,
        MuteDuration::OneMonth,
        MuteDuration::Forever,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::OneHour => "For 1 hour",
            Self::FourHours => "For 4 hours",
            Self::EightHours => "For 8 hours",
            Self::OneDay => "For 1 day",
            Self::OneMonth => "For 1 month",
            Self::Forever => "For always",
        }
    }

    pub fn setting_from(self, now_ms: i64) -> MuteSetting {
        const HOUR_MS: i64 = 60 * 60 * 1000;
        let span = match self {
            Self::OneHour => HOUR_MS,
            Self::FourHours => 4 * HOUR_MS,
            Self::EightHours => 8 * HOUR_MS,
            Self::OneDay => 24 * HOUR_MS,
            Self::OneMonth => 30 * 24 * HOUR_MS,
            Self::Forever => return MuteSetting::Forever,
        };
        MuteSetting::Until(now_ms.saturating_add(span))
    }
}

/// Public address of a channel: a chosen slug or a generated invite token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelLink {
    Public { slug: String },
    Private { invite_token: String },
}

impl ChannelLink {
    pub fn url(&self) -> String {
        match self {
            Self::Public { slug } => format!("{CHANNEL_LINK_BASE}{slug}"),
            Self::Private { invite_token } => format!("{CHANNEL_LINK_BASE}+{invite_token}"),
        }
    }

    pub fn is_public(&self) -> bool {
        matches!(self, Self::Public { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chat {
    pub id: ChatId,
    pub kind: ChatKind,
    pub name: String,
    pub avatar: Option<String>,
    /// First participant is the owner.
    pub participants: Vec<User>,
    pub last_message: Option<Message>,
    pub unread_count: u32,
    pub pinned: bool,
    pub muted: Option<MuteSetting>,
    pub archived: bool,
    pub typing: Vec<String>,
    pub pinned_message_ids: Vec<MessageId>,
    pub description: Option<String>,
    pub link: Option<ChannelLink>,
}

impl Chat {
    pub fn new(id: ChatId, kind: ChatKind, name: impl Into<String>, participants: Vec<User>) -> Self {
        Self {
            id,
            kind,
            name: name.into(),
            avatar: None,
            participants,
            last_message: None,
            unread_count: 0,
            pinned: false,
            muted: None,
            archived: false,
            typing: Vec::new(),
            pinned_message_ids: Vec::new(),
            description: None,
            link: None,
        }
    }

    pub fn saved_messages(me: User) -> Self {
        let mut chat = Self::new(
            ChatId::from(SAVED_MESSAGES_CHAT_ID),
            ChatKind::Private,
            SAVED_MESSAGES_TITLE,
            vec![me],
        );
        chat.pinned = true;
        chat
    }

    pub fn is_saved_messages(&self) -> bool {
        self.id.as_str() == SAVED_MESSAGES_CHAT_ID
    }

    pub fn is_muted(&self, now_ms: i64) -> bool {
        match self.muted {
            None => false,
            Some(MuteSetting::Forever) => true,
            Some(MuteSetting::Until(until_ms)) => now_ms < until_ms,
        }
    }

    pub fn participant(&self, user_id: &UserId) -> Option<&User> {
        self.participants.iter().find(|user| &user.id == user_id)
    }

    /// The other side of a private chat.
    pub fn counterpart(&self, me: &UserId) -> Option<&User> {
        if self.kind != ChatKind::Private {
            return None;
        }
        self.participants.iter().find(|user| &user.id != me)
    }

    pub fn has_participant(&self, user_id: &UserId) -> bool {
        self.participant(user_id).is_some()
    }

    /// Sender name as shown to the local user.
    pub fn sender_name(&self, sender_id: &UserId, me: &UserId) -> String {
        if sender_id == me {
            return "You".to_owned();
        }
        self.participant(sender_id)
            .map(|user| user.name.clone())
            .unwrap_or_else(|| "Unknown".to_owned())
    }

    pub fn summarize(&self, me: &UserId, now_ms: i64) -> ChatSummary {
        let last = self.last_message.as_ref();
        let is_outgoing = last.is_some_and(|message| &message.sender_id == me);

        ChatSummary {
            chat_id: self.id.clone(),
            title: self.name.clone(),
            unread_count: self.unread_count,
            last_message_preview: last.map(Message::display_content),
            last_message_unix_ms: last.map(|message| message.timestamp_ms),
            is_pinned: self.pinned,
            chat_kind: self.kind,
            last_message_sender: last
                .filter(|_| !is_outgoing)
                .and_then(|message| self.participant(&message.sender_id))
                .map(|user| user.name.clone()),
            is_online: self.counterpart(me).map(|user| user.online),
            outgoing_status: OutgoingStatus {
                is_outgoing,
                status: last.map(|message| message.status).unwrap_or_default(),
            },
            is_muted: self.is_muted(now_ms),
            is_archived: self.archived,
            typing: self.typing.clone(),
        }
    }
}

/// "Alice is typing..." / "Alice, Bob are typing..."; None when nobody types.
pub fn typing_label(names: &[String]) -> Option<String> {
    match names {
        [] => None,
        [name] => Some(format!("{name} is typing...")),
        names => Some(format!("{} are typing...", names.join(", "))),
    }
}

/// Delivery status of the last message when it was sent by the local user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OutgoingStatus {
    pub is_outgoing: bool,
    /// Only meaningful when `is_outgoing` is true.
    pub status: DeliveryStatus,
}

/// Read model of a chat for the chat list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatSummary {
    pub chat_id: ChatId,
    pub title: String,
    pub unread_count: u32,
    pub last_message_preview: Option<String>,
    pub last_message_unix_ms: Option<i64>,
    pub is_pinned: bool,
    pub chat_kind: ChatKind,
    /// Name of the sender of the last incoming message.
    pub last_message_sender: Option<String>,
    /// Whether the chat partner is online (private chats only).
    pub is_online: Option<bool>,
    pub outgoing_status: OutgoingStatus,
    pub is_muted: bool,
    pub is_archived: bool,
    pub typing: Vec<String>,
}
