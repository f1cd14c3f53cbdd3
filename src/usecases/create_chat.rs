//! Turns the add-contact / new-group / new-channel forms into store calls.

use rand::{distributions::Alphanumeric, Rng};

use crate::domain::{
    chat::ChannelLink,
    ids::{ChatId, UserId},
    modal_state::{fields, FormKind, FormState},
    store::{ChannelDraft, ChatStore, ContactDraft, GroupDraft, StoreError},
    user::User,
};

const INVITE_TOKEN_LEN: usize = 16;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreateChatError {
    MissingName,
    MissingMembers,
    InvalidCountryCode,
    InvalidPhone,
    SlugTaken,
    InvalidSlug,
    UnknownContact,
    /// The form does not create this kind of entity.
    WrongForm,
}

impl CreateChatError {
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::MissingName => "A name is required",
            Self::MissingMembers => "Select at least one member",
            Self::InvalidCountryCode => "Country code must contain digits only",
            Self::InvalidPhone => "Phone number is required",
            Self::SlugTaken => "This link is already taken",
            Self::InvalidSlug => "Links are 5-32 letters, digits or underscores",
            Self::UnknownContact => "Contact no longer exists",
            Self::WrongForm => "Unsupported form",
        }
    }
}

pub fn add_contact(store: &mut ChatStore, form: &FormState) -> Result<User, CreateChatError> {
    if form.kind() != FormKind::AddContact {
        return Err(CreateChatError::WrongForm);
    }

    store
        .add_contact(ContactDraft {
            first_name: form.value(fields::CONTACT_FIRST_NAME),
            last_name: form.value(fields::CONTACT_LAST_NAME),
            country_code: form.value(fields::CONTACT_COUNTRY_CODE),
            phone: form.value(fields::CONTACT_PHONE),
        })
        .map_err(map_store_error)
}

/// First step of group/channel creation: the name is checked before the
/// member picker opens.
pub fn validate_details(form: &FormState) -> Result<(), CreateChatError> {
    let name_field = match form.kind() {
        FormKind::NewGroup => fields::GROUP_NAME,
        FormKind::NewChannel => fields::CHANNEL_NAME,
        FormKind::AddContact => return Err(CreateChatError::WrongForm),
    };
    if form.value(name_field).trim().is_empty() {
        return Err(CreateChatError::MissingName);
    }
    Ok(())
}

/// Creates the group or channel described by `form` with the picked members.
pub fn create_chat(
    store: &mut ChatStore,
    form: &FormState,
    member_ids: &[String],
) -> Result<ChatId, CreateChatError> {
    let member_ids: Vec<UserId> = member_ids.iter().map(|id| UserId::from(id.as_str())).collect();

    let created = match form.kind() {
        FormKind::NewGroup => store.create_group(GroupDraft {
            name: form.value(fields::GROUP_NAME),
            avatar: optional(form.value(fields::GROUP_AVATAR)),
            member_ids,
        }),
        FormKind::NewChannel => {
            let link = match optional(form.value(fields::CHANNEL_SLUG)) {
                Some(slug) => ChannelLink::Public { slug },
                None => ChannelLink::Private {
                    invite_token: generate_invite_token(),
                },
            };
            store.create_channel(ChannelDraft {
                name: form.value(fields::CHANNEL_NAME),
                avatar: optional(form.value(fields::CHANNEL_AVATAR)),
                description: form.value(fields::CHANNEL_DESCRIPTION),
                link,
                member_ids,
            })
        }
        FormKind::AddContact => return Err(CreateChatError::WrongForm),
    };

    created.map_err(map_store_error)
}

pub fn generate_invite_token() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(INVITE_TOKEN_LEN)
        .map(char::from)
        .collect()
}

fn optional(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}

fn map_store_error(error: StoreError) -> CreateChatError {
    match error {
        StoreError::MissingName => CreateChatError::MissingName,
        StoreError::MissingMembers => CreateChatError::MissingMembers,
        StoreError::InvalidCountryCode => CreateChatError::InvalidCountryCode,
        StoreError::InvalidPhone => CreateChatError::InvalidPhone,
        StoreError::DuplicateChannelSlug(_) => CreateChatError::SlugTaken,
        StoreError::InvalidChannelSlug(_) => CreateChatError::InvalidSlug,
        _ => CreateChatError::UnknownContact,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{chat::ChatKind, store::test_fixtures::store};

    fn form(kind: FormKind, values: &[&str]) -> FormState {
        let mut form = FormState::new(kind);
        for value in values {
            form.focused_field_mut().set_text(value);
            form.focus_next();
        }
        form
    }

    #[test]
    fn invite_tokens_are_sixteen_alphanumerics() {
        let token = generate_invite_token();

        assert_eq!(token.len(), INVITE_TOKEN_LEN);
        assert!(token.chars().all(|ch| ch.is_ascii_alphanumeric()));
    }

    #[test]
    fn add_contact_maps_form_fields() {
        let mut store = store();

        let user = add_contact(
            &mut store,
            &form(FormKind::AddContact, &["Jane", "", "49", "151 000"]),
        )
        .expect("contact");

        assert_eq!(user.name, "Jane");
        assert_eq!(user.phone.as_deref(), Some("+49 151 000"));
    }

    #[test]
    fn add_contact_reports_validation_errors() {
        let mut store = store();

        let result = add_contact(&mut store, &form(FormKind::AddContact, &["Jane", "", "x", "1"]));

        assert_eq!(result, Err(CreateChatError::InvalidCountryCode));
    }

    #[test]
    fn details_need_a_name() {
        assert_eq!(
            validate_details(&form(FormKind::NewGroup, &["  "])),
            Err(CreateChatError::MissingName)
        );
        assert_eq!(validate_details(&form(FormKind::NewChannel, &["News"])), Ok(()));
    }

    #[test]
    fn group_is_created_with_members() {
        let mut store = store();

        let chat_id = create_chat(
            &mut store,
            &form(FormKind::NewGroup, &["Crew", ""]),
            &["bob".to_owned()],
        )
        .expect("group");

        let chat = store.chat(&chat_id).expect("chat");
        assert_eq!(chat.kind, ChatKind::Group);
        assert_eq!(chat.avatar, None);
    }

    #[test]
    fn group_without_members_is_refused() {
        let mut store = store();

        let result = create_chat(&mut store, &form(FormKind::NewGroup, &["Crew"]), &[]);

        assert_eq!(result, Err(CreateChatError::MissingMembers));
    }

    #[test]
    fn channel_without_slug_gets_private_invite_link() {
        let mut store = store();

        let chat_id = create_chat(
            &mut store,
            &form(FormKind::NewChannel, &["Insiders", "team only", "", ""]),
            &["alice".to_owned()],
        )
        .expect("channel");

        let link = store.chat(&chat_id).and_then(|chat| chat.link.clone());
        assert!(matches!(link, Some(ChannelLink::Private { ref invite_token }) if invite_token.len() == 16));
    }

    #[test]
    fn channel_slug_errors_are_mapped() {
        let mut store = store();

        let result = create_chat(
            &mut store,
            &form(FormKind::NewChannel, &["News", "", "no"]),
            &["alice".to_owned()],
        );

        assert_eq!(result, Err(CreateChatError::InvalidSlug));
    }

    #[test]
    fn channel_without_members_is_refused() {
        let mut store = store();

        let result = create_chat(&mut store, &form(FormKind::NewChannel, &["News"]), &[]);

        assert_eq!(result, Err(CreateChatError::MissingMembers));
    }
}
