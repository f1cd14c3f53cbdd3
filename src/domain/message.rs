use super::ids::{ChatId, MessageId, UserId};

/// Content kind of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MessageKind {
    #[default]
    Text,
    Image,
    Video,
    Voice,
    File,
    Sticker,
    System,
}

impl MessageKind {
    /// Returns a display label for non-text kinds, or None for plain text.
    pub fn display_label(&self) -> Option<&'static str> {
        match self {
            MessageKind::Text | MessageKind::System => None,
            MessageKind::Image => Some("[Photo]"),
            MessageKind::Video => Some("[Video]"),
            MessageKind::Voice => Some("[Voice]"),
            MessageKind::File => Some("[File]"),
            MessageKind::Sticker => Some("[Sticker]"),
        }
    }
}

/// Delivery status of a message. Ordered: a status only ever moves forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum DeliveryStatus {
    #[default]
    Sending,
    Sent,
    Delivered,
    Read,
}

impl DeliveryStatus {
    pub fn as_label(self) -> &'static str {
        match self {
            Self::Sending => "sending",
            Self::Sent => "sent",
            Self::Delivered => "delivered",
            Self::Read => "read",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachmentKind {
    Image,
    Video,
    File,
    Voice,
}

impl AttachmentKind {
    pub fn as_label(self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Video => "video",
            Self::File => "file",
            Self::Voice => "voice",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub id: String,
    pub kind: AttachmentKind,
    pub url: String,
    pub name: Option<String>,
    pub size_bytes: Option<u64>,
    pub duration_secs: Option<u32>,
}

impl Attachment {
    /// File name used when saving, falling back to `download.<kind>`.
    pub fn file_name(&self) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| format!("download.{}", self.kind.as_label()))
    }
}

/// Denormalized preview of the message being replied to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplyPreview {
    pub message_id: MessageId,
    pub content: String,
    pub sender_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub id: MessageId,
    pub chat_id: ChatId,
    pub sender_id: UserId,
    pub content: String,
    pub timestamp_ms: i64,
    pub status: DeliveryStatus,
    pub kind: MessageKind,
    pub reply_to: Option<ReplyPreview>,
    pub attachments: Vec<Attachment>,
    pub reactions: Vec<String>,
    pub edited_at_ms: Option<i64>,
    pub pinned: bool,
}

impl Message {
    pub fn text(
        id: MessageId,
        chat_id: ChatId,
        sender_id: UserId,
        content: impl Into<String>,
        timestamp_ms: i64,
    ) -> Self {
        Self {
            id,
            chat_id,
            sender_id,
            content: content.into(),
            timestamp_ms,
            status: DeliveryStatus::Sending,
            kind: MessageKind::Text,
            reply_to: None,
            attachments: Vec::new(),
            reactions: Vec::new(),
            edited_at_ms: None,
            pinned: false,
        }
    }

    pub fn is_edited(&self) -> bool {
        self.edited_at_ms.is_some()
    }

    /// Returns the display content: kind label + text, or just text for plain messages.
    pub fn display_content(&self) -> String {
        match (self.kind.display_label(), self.content.is_empty()) {
            (Some(label), true) => label.to_owned(),
            (Some(label), false) => format!("{} {}", label, self.content),
            (None, _) => self.content.clone(),
        }
    }

    /// Moves the status forward. Returns false (and leaves the status alone)
    /// when `next` would be a regression.
    pub fn advance_status(&mut self, next: DeliveryStatus) -> bool {
        if next <= self.status {
            return false;
        }
        self.status = next;
        true
    }

    /// Adds the emoji when absent, removes it when present.
    pub fn toggle_reaction(&mut self, emoji: &str) {
        if let Some(position) = self.reactions.iter().position(|r| r == emoji) {
            self.reactions.remove(position);
        } else {
            self.reactions.push(emoji.to_owned());
        }
    }

    pub fn has_attachment(&self, kind: AttachmentKind) -> bool {
        self.attachments.iter().any(|a| a.kind == kind)
    }

    pub fn first_attachment(&self, kind: AttachmentKind) -> Option<&Attachment> {
        self.attachments.iter().find(|a| a.kind == kind)
    }

    /// What a "copy" action puts on the clipboard: image url for images,
    /// file name for files, the text otherwise.
    pub fn clipboard_text(&self) -> Option<String> {
        if self.kind == MessageKind::Image || self.has_attachment(AttachmentKind::Image) {
            return self
                .first_attachment(AttachmentKind::Image)
                .map(|image| image.url.clone());
        }

        if self.kind == MessageKind::File || self.has_attachment(AttachmentKind::File) {
            return self
                .first_attachment(AttachmentKind::File)
                .and_then(|file| file.name.clone());
        }

        if self.content.is_empty() {
            None
        } else {
            Some(self.content.clone())
        }
    }
}
