use super::{ChatStore, StoreError};
use crate::domain::{
    chat::{ChannelLink, Chat, ChatKind},
    ids::{ChatId, UserId},
    user::User,
};

const CHANNEL_SLUG_MIN_LEN: usize = 5;
const CHANNEL_SLUG_MAX_LEN: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ContactDraft {
    pub first_name: String,
    pub last_name: String,
    pub country_code: String,
    pub phone: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GroupDraft {
    pub name: String,
    pub avatar: Option<String>,
    pub member_ids: Vec<UserId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelDraft {
    pub name: String,
    pub avatar: Option<String>,
    pub description: String,
    pub link: ChannelLink,
    pub member_ids: Vec<UserId>,
}

impl ChatStore {
    pub fn add_contact(&mut self, draft: ContactDraft) -> Result<User, StoreError> {
        let first_name = draft.first_name.trim();
        if first_name.is_empty() {
            return Err(StoreError::MissingName);
        }
        let country_code = draft.country_code.trim().trim_start_matches('+');
        if country_code.is_empty() || !country_code.chars().all(|ch| ch.is_ascii_digit()) {
            return Err(StoreError::InvalidCountryCode);
        }
        let phone = draft.phone.trim();
        if phone.is_empty() {
            return Err(StoreError::InvalidPhone);
        }

        let name = format!("{} {}", first_name, draft.last_name.trim())
            .trim()
            .to_owned();
        let mut user = User::new(UserId::generate(), name);
        user.phone = Some(format!("+{country_code} {phone}"));

        self.contacts.push(user.clone());
        tracing::info!(user_id = %user.id, "contact added");
        Ok(user)
    }

    /// Returns the private chat with the contact, creating it when missing.
    pub fn open_private_chat(&mut self, user_id: &UserId) -> Result<ChatId, StoreError> {
        if let Some(existing) = self
            .chats
            .iter()
            .find(|chat| chat.kind == ChatKind::Private && chat.has_participant(user_id))
        {
            return Ok(existing.id.clone());
        }

        let contact = self
            .contact(user_id)
            .cloned()
            .ok_or_else(|| StoreError::UnknownContact(user_id.clone()))?;

        let chat = Chat::new(
            ChatId::generate(),
            ChatKind::Private,
            contact.name.clone(),
            vec![self.me.clone(), contact],
        );
        Ok(self.insert_chat(chat))
    }

    pub fn create_group(&mut self, draft: GroupDraft) -> Result<ChatId, StoreError> {
        let name = draft.name.trim();
        if name.is_empty() {
            return Err(StoreError::MissingName);
        }
        if draft.member_ids.is_empty() {
            return Err(StoreError::MissingMembers);
        }

        let participants = self.participants_with_owner(&draft.member_ids)?;
        let mut chat = Chat::new(ChatId::generate(), ChatKind::Group, name, participants);
        chat.avatar = draft.avatar;

        tracing::info!(chat_id = %chat.id, members = draft.member_ids.len(), "group created");
        Ok(self.insert_chat(chat))
    }

    pub fn create_channel(&mut self, draft: ChannelDraft) -> Result<ChatId, StoreError> {
        let name = draft.name.trim();
        if name.is_empty() {
            return Err(StoreError::MissingName);
        }
        if draft.member_ids.is_empty() {
            return Err(StoreError::MissingMembers);
        }
        if let ChannelLink::Public { slug } = &draft.link {
            self.validate_public_slug(slug)?;
        }

        let participants = self.participants_with_owner(&draft.member_ids)?;
        let mut chat = Chat::new(ChatId::generate(), ChatKind::Channel, name, participants);
        chat.avatar = draft.avatar;
        let description = draft.description.trim();
        chat.description = (!description.is_empty()).then(|| description.to_owned());
        chat.link = Some(draft.link);

        tracing::info!(
            chat_id = %chat.id,
            public = chat.link.as_ref().is_some_and(ChannelLink::is_public),
            "channel created"
        );
        Ok(self.insert_chat(chat))
    }

    fn participants_with_owner(&self, member_ids: &[UserId]) -> Result<Vec<User>, StoreError> {
        let mut participants = vec![self.me.clone()];
        for member_id in member_ids {
            if participants.iter().any(|user| &user.id == member_id) {
                continue;
            }
            let member = self
                .contact(member_id)
                .cloned()
                .ok_or_else(|| StoreError::UnknownContact(member_id.clone()))?;
            participants.push(member);
        }
        Ok(participants)
    }

    fn validate_public_slug(&self, slug: &str) -> Result<(), StoreError> {
        let well_formed = (CHANNEL_SLUG_MIN_LEN..=CHANNEL_SLUG_MAX_LEN).contains(&slug.len())
            && slug
                .chars()
                .all(|ch| ch.is_ascii_alphanumeric() || ch == '_');
        if !well_formed {
            return Err(StoreError::InvalidChannelSlug(slug.to_owned()));
        }

        let taken = self.chats.iter().any(|chat| {
            matches!(&chat.link, Some(ChannelLink::Public { slug: existing })
                if existing.eq_ignore_ascii_case(slug))
        });
        if taken {
            return Err(StoreError::DuplicateChannelSlug(slug.to_owned()));
        }
        Ok(())
    }
}

/// Flag emoji for a calling code, used next to the add-contact phone field.
pub fn country_flag(code: &str) -> Option<&'static str> {
    let flag = match code.trim_start_matches('+') {
        "1" => "🇺🇸",
        "7" => "🇷🇺",
        "20" => "🇪🇬",
        "27" => "🇿🇦",
        "31" => "🇳🇱",
        "32" => "🇧🇪",
        "33" => "🇫🇷",
        "34" => "🇪🇸",
        "39" => "🇮🇹",
        "41" => "🇨🇭",
        "43" => "🇦🇹",
        "44" => "🇬🇧",
        "45" => "🇩🇰",
        "46" => "🇸🇪",
        "47" => "🇳🇴",
        "49" => "🇩🇪",
        "52" => "🇲🇽",
        "54" => "🇦🇷",
        "55" => "🇧🇷",
        "60" => "🇲🇾",
        "61" => "🇦🇺",
        "62" => "🇮🇩",
        "63" => "🇵🇭",
        "64" => "🇳🇿",
        "65" => "🇸🇬",
        "66" => "🇹🇭",
        "81" => "🇯🇵",
        "82" => "🇰🇷",
        "84" => "🇻🇳",
        "86" => "🇨🇳",
        "90" => "🇹🇷",
        "91" => "🇮🇳",
        "92" => "🇵🇰",
        "98" => "🇮🇷",
        "358" => "🇫🇮",
        "880" => "🇧🇩",
        "966" => "🇸🇦",
        "971" => "🇦🇪",
        _ => return None,
    };
    Some(flag)
}

#[cfg(test)]
mod tests {
    use super::super::test_fixtures::*;
    use super::*;

    fn contact_draft(first: &str, code: &str, phone: &str) -> ContactDraft {
        ContactDraft {
            first_name: first.to_owned(),
            last_name: "Doe".to_owned(),
            country_code: code.to_owned(),
            phone: phone.to_owned(),
        }
    }

    #[test]
    fn add_contact_validates_required_fields() {
        let mut store = store();

        assert_eq!(
            store.add_contact(contact_draft(" ", "1", "555")),
            Err(StoreError::MissingName)
        );
        assert_eq!(
            store.add_contact(contact_draft("Jane", "1a", "555")),
            Err(StoreError::InvalidCountryCode)
        );
        assert_eq!(
            store.add_contact(contact_draft("Jane", "44", "  ")),
            Err(StoreError::InvalidPhone)
        );
    }

    #[test]
    fn add_contact_builds_full_name_and_phone() {
        let mut store = store();

        let user = store
            .add_contact(contact_draft("Jane", "+44", "7700 900123"))
            .expect("contact");

        assert_eq!(user.name, "Jane Doe");
        assert_eq!(user.phone.as_deref(), Some("+44 7700 900123"));
        assert!(store.contact(&user.id).is_some());
    }

    #[test]
    fn open_private_chat_reuses_existing_chat() {
        let mut store = store();

        let chat_id = store
            .open_private_chat(&UserId::from("alice"))
            .expect("open");

        assert_eq!(chat_id, ChatId::from("alice-chat"));
        assert_eq!(store.chats().len(), 3);
    }

    #[test]
    fn open_private_chat_creates_chat_below_saved_messages() {
        let mut store = store();

        let chat_id = store.open_private_chat(&UserId::from("bob")).expect("open");

        assert_eq!(store.chats()[1].id, chat_id);
        let chat = store.chat(&chat_id).expect("chat");
        assert_eq!(chat.participants.len(), 2);
        assert_eq!(chat.participants[0].id, UserId::from("me"));
        store.assert_invariants();
    }

    #[test]
    fn open_private_chat_with_unknown_user_fails() {
        let mut store = store();

        assert_eq!(
            store.open_private_chat(&UserId::from("ghost")),
            Err(StoreError::UnknownContact(UserId::from("ghost")))
        );
    }

    #[test]
    fn group_needs_name_and_members() {
        let mut store = store();

        assert_eq!(
            store.create_group(GroupDraft {
                name: "  ".to_owned(),
                avatar: None,
                member_ids: vec![UserId::from("bob")],
            }),
            Err(StoreError::MissingName)
        );
        assert_eq!(
            store.create_group(GroupDraft {
                name: "Crew".to_owned(),
                avatar: None,
                member_ids: vec![],
            }),
            Err(StoreError::MissingMembers)
        );
    }

    #[test]
    fn group_participants_start_with_owner() {
        let mut store = store();

        let chat_id = store
            .create_group(GroupDraft {
                name: "Crew".to_owned(),
                avatar: None,
                member_ids: vec![UserId::from("bob"), UserId::from("alice")],
            })
            .expect("group");

        let chat = store.chat(&chat_id).expect("chat");
        let ids: Vec<&str> = chat.participants.iter().map(|u| u.id.as_str()).collect();
        assert_eq!(ids, vec!["me", "bob", "alice"]);
        assert_eq!(chat.kind, ChatKind::Group);
    }

    #[test]
    fn public_channel_slug_must_be_unique_and_well_formed() {
        let mut store = store();
        let draft = |slug: &str| ChannelDraft {
            name: "News".to_owned(),
            avatar: None,
            description: String::new(),
            link: ChannelLink::Public {
                slug: slug.to_owned(),
            },
            member_ids: vec![UserId::from("bob")],
        };

        store.create_channel(draft("rust_news")).expect("first channel");

        assert_eq!(
            store.create_channel(draft("Rust_News")),
            Err(StoreError::DuplicateChannelSlug("Rust_News".to_owned()))
        );
        assert_eq!(
            store.create_channel(draft("a b")),
            Err(StoreError::InvalidChannelSlug("a b".to_owned()))
        );
    }

    #[test]
    fn channel_needs_at_least_one_member() {
        let mut store = store();

        let result = store.create_channel(ChannelDraft {
            name: "Insiders".to_owned(),
            avatar: None,
            description: String::new(),
            link: ChannelLink::Private {
                invite_token: "AbCdEfGh12345678".to_owned(),
            },
            member_ids: vec![],
        });

        assert_eq!(result, Err(StoreError::MissingMembers));
        assert_eq!(store.chats().len(), 3);
    }

    #[test]
    fn private_channel_keeps_description_and_link() {
        let mut store = store();

        let chat_id = store
            .create_channel(ChannelDraft {
                name: "Insiders".to_owned(),
                avatar: None,
                description: "  invite only ".to_owned(),
                link: ChannelLink::Private {
                    invite_token: "AbCdEfGh12345678".to_owned(),
                },
                member_ids: vec![UserId::from("alice")],
            })
            .expect("channel");

        let chat = store.chat(&chat_id).expect("chat");
        assert_eq!(chat.description.as_deref(), Some("invite only"));
        assert_eq!(
            chat.link.as_ref().map(ChannelLink::url).as_deref(),
            Some("https://t.me/+AbCdEfGh12345678")
        );
        assert_eq!(chat.participants.len(), 2);
    }

    #[test]
    fn country_flag_known_and_unknown_codes() {
        assert_eq!(country_flag("44"), Some("🇬🇧"));
        assert_eq!(country_flag("+1"), Some("🇺🇸"));
        assert_eq!(country_flag("999"), None);
    }
}
