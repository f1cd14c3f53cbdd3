use crate::{
    domain::{
        chat::MuteDuration,
        chat_info::ChatInfo,
        events::KeyInput,
        ids::{ChatId, MessageId, UserId},
        modal_state::{
            ChatOption, FormKind, FormState, ModalState, PickerItem, PickerState, REACTION_EMOJIS,
        },
        shell_state::ActivePane,
    },
    infra::contracts::{ClipboardAdapter, ExternalOpener},
    simulation::{clock::Clock, replies::ReplyPicker},
    usecases::create_chat::{add_contact, create_chat, validate_details},
};

use super::DefaultShellOrchestrator;

/// Outcome of a key press inside a list picker.
enum PickerKey {
    Handled,
    Confirm,
    Cancel,
}

fn picker_key(picker: &mut PickerState, key: &KeyInput) -> PickerKey {
    if let Some(ch) = key.as_char() {
        picker.push_filter_char(ch);
        return PickerKey::Handled;
    }

    match key.key.as_str() {
        "enter" => return PickerKey::Confirm,
        "esc" => return PickerKey::Cancel,
        "down" => picker.select_next(),
        "up" => picker.select_previous(),
        "tab" => picker.toggle_current(),
        "backspace" => picker.pop_filter_char(),
        _ => {}
    }
    PickerKey::Handled
}

/// Text editing keys shared by every form field.
fn edit_form(form: &mut FormState, key: &KeyInput) {
    if let Some(ch) = key.as_char() {
        form.focused_field_mut().insert_char(ch);
        return;
    }

    match key.key.as_str() {
        "tab" | "down" => form.focus_next(),
        "backtab" | "up" => form.focus_previous(),
        "backspace" => form.focused_field_mut().delete_char_before(),
        "delete" => form.focused_field_mut().delete_char_at(),
        "left" => form.focused_field_mut().move_cursor_left(),
        "right" => form.focused_field_mut().move_cursor_right(),
        "home" => form.focused_field_mut().move_cursor_home(),
        "end" => form.focused_field_mut().move_cursor_end(),
        _ => {}
    }
}

impl<C, B, O, P> DefaultShellOrchestrator<C, B, O, P>
where
    C: Clock,
    B: ClipboardAdapter,
    O: ExternalOpener,
    P: ReplyPicker,
{
    /// The modal is taken out of the state while the key is handled and put
    /// back unless the key closed it.
    pub(super) fn handle_modal_key(&mut self, key: &KeyInput) {
        let Some(modal) = self.state.take_modal() else {
            return;
        };

        let next = match modal {
            ModalState::Contacts(picker) => self.contacts_key(picker, key),
            ModalState::Forward {
                source,
                message_ids,
                picker,
            } => self.forward_key(source, message_ids, picker, key),
            modal @ (ModalState::Reactions { .. }
            | ModalState::Mute { .. }
            | ModalState::ChatOptions { .. }) => self.option_key(modal, key),
            ModalState::ChatInfo(info) => self.chat_info_key(info, key),
            modal @ ModalState::Calls { .. } => self.calls_key(modal, key),
            ModalState::ConfirmDelete {
                chat_id,
                title,
                kind,
            } => match key.key.as_str() {
                "y" | "enter" => {
                    self.delete_chat(&chat_id);
                    None
                }
                "n" | "esc" => None,
                _ => Some(ModalState::ConfirmDelete {
                    chat_id,
                    title,
                    kind,
                }),
            },
            ModalState::Form(form) => self.form_key(form, key),
            ModalState::Members { form, picker } => self.members_key(form, picker, key),
        };

        if let Some(modal) = next {
            self.state.open_modal(modal);
        }
    }

    fn contacts_key(&mut self, mut picker: PickerState, key: &KeyInput) -> Option<ModalState> {
        match picker_key(&mut picker, key) {
            PickerKey::Handled => Some(ModalState::Contacts(picker)),
            PickerKey::Cancel => None,
            PickerKey::Confirm => {
                let user_id = UserId::from(picker.current()?.id.as_str());
                match self.store.open_private_chat(&user_id) {
                    Ok(chat_id) => self.open_chat(&chat_id),
                    Err(error) => self.report(error),
                }
                None
            }
        }
    }

    fn forward_key(
        &mut self,
        source: ChatId,
        message_ids: Vec<MessageId>,
        mut picker: PickerState,
        key: &KeyInput,
    ) -> Option<ModalState> {
        match picker_key(&mut picker, key) {
            PickerKey::Handled => Some(ModalState::Forward {
                source,
                message_ids,
                picker,
            }),
            PickerKey::Cancel => None,
            PickerKey::Confirm => {
                // Without explicit picks Enter forwards to the row under the cursor.
                let mut targets: Vec<ChatId> =
                    picker.chosen_ids().iter().map(|id| ChatId::from(id.as_str())).collect();
                if targets.is_empty() {
                    targets.extend(picker.current().map(|item| ChatId::from(item.id.as_str())));
                }
                if targets.is_empty() {
                    return None;
                }

                let now_ms = self.clock.now_ms();
                match self
                    .store
                    .forward_messages(&source, &message_ids, &targets, now_ms)
                {
                    Ok(_) => {
                        self.state.open_chat_mut().clear_marks();
                        self.refresh();
                        let noun = if targets.len() == 1 { "chat" } else { "chats" };
                        self.notify(format!("Forwarded to {} {noun}", targets.len()));
                    }
                    Err(error) => self.report(error),
                }
                None
            }
        }
    }

    fn option_key(&mut self, mut modal: ModalState, key: &KeyInput) -> Option<ModalState> {
        match key.key.as_str() {
            "down" | "right" | "j" | "l" | "tab" => modal.cycle_option(true),
            "up" | "left" | "k" | "h" | "backtab" => modal.cycle_option(false),
            "esc" => return None,
            "enter" => {
                self.apply_option(modal);
                return None;
            }
            _ => {}
        }
        Some(modal)
    }

    fn apply_option(&mut self, modal: ModalState) {
        let result = match modal {
            ModalState::Reactions {
                chat_id,
                message_id,
                selected,
            } => {
                let emoji = REACTION_EMOJIS[selected % REACTION_EMOJIS.len()];
                self.store.toggle_reaction(&chat_id, &message_id, emoji)
            }
            ModalState::Mute { chat_id, selected } => {
                let duration = MuteDuration::ALL[selected % MuteDuration::ALL.len()];
                let setting = duration.setting_from(self.clock.now_ms());
                let muted = self.store.set_mute(&chat_id, Some(setting));
                if muted.is_ok() {
                    self.notify(format!("Muted {}", duration.label().to_lowercase()));
                }
                muted
            }
            ModalState::ChatOptions {
                chat_id,
                items,
                selected,
            } => {
                if let Some(item) = items.get(selected) {
                    self.apply_chat_option(chat_id, item.option);
                }
                return;
            }
            _ => Ok(()),
        };

        match result {
            Ok(()) => self.refresh(),
            Err(error) => self.report(error),
        }
    }

    fn apply_chat_option(&mut self, chat_id: ChatId, option: ChatOption) {
        match option {
            ChatOption::ViewInfo => self.open_chat_info(chat_id),
            ChatOption::SearchMessages => {
                if self.state.open_chat().chat_id() != Some(&chat_id) {
                    self.open_chat(&chat_id);
                }
                self.state.start_search();
                self.state.set_active_pane(ActivePane::MessageSearch);
            }
            ChatOption::TogglePin => self.toggle_pin(chat_id),
            ChatOption::ToggleMute => self.toggle_mute(chat_id),
            ChatOption::ClearHistory => self.clear_history(chat_id),
            ChatOption::Delete => self.confirm_delete(chat_id),
        }
    }

    /// Mute and delete hand over to their own dialogs.
    fn chat_info_key(&mut self, info: ChatInfo, key: &KeyInput) -> Option<ModalState> {
        match key.key.as_str() {
            "esc" | "q" | "enter" => None,
            "m" => {
                let chat_id = info.chat_id.clone();
                self.toggle_mute(chat_id.clone());
                if self.state.modal().is_some() {
                    return None;
                }
                self.chat_info(&chat_id).map(ModalState::ChatInfo)
            }
            "d" if info.deletable => {
                self.confirm_delete(info.chat_id);
                None
            }
            _ => Some(ModalState::ChatInfo(info)),
        }
    }

    fn calls_key(&mut self, mut modal: ModalState, key: &KeyInput) -> Option<ModalState> {
        let ModalState::Calls { calls, selected } = &modal else {
            return None;
        };
        let selected = *selected;

        match key.key.as_str() {
            "esc" | "q" => return None,
            "down" | "j" => modal.cycle_option(true),
            "up" | "k" => modal.cycle_option(false),
            "d" | "delete" => {
                let Some(call_id) = calls.get(selected).map(|call| call.id.clone()) else {
                    return Some(modal);
                };
                match self.store.delete_call(&call_id) {
                    Ok(call) => {
                        tracing::debug!(call_id = %call.id, "call log entry deleted");
                        self.notify(format!("Call with {} deleted", call.user_name));
                    }
                    Err(error) => self.report(error),
                }
                return Some(self.calls_modal(selected));
            }
            "D" => {
                let cleared = self.store.clear_calls();
                tracing::debug!(cleared, "call log cleared");
                self.notify("Call log cleared");
                return Some(self.calls_modal(0));
            }
            _ => {}
        }
        Some(modal)
    }

    /// Fresh snapshot of the log with the cursor clamped to it.
    fn calls_modal(&self, selected: usize) -> ModalState {
        let calls = self.store.calls().to_vec();
        let selected = selected.min(calls.len().saturating_sub(1));
        ModalState::Calls { calls, selected }
    }

    fn delete_chat(&mut self, chat_id: &ChatId) {
        match self.store.delete_chat(chat_id) {
            Ok(chat) => {
                self.simulator.on_chat_emptied(chat_id);
                self.refresh();
                self.notify(format!("{} removed", chat.name));
            }
            Err(error) => self.report(error),
        }
    }

    fn form_key(&mut self, mut form: FormState, key: &KeyInput) -> Option<ModalState> {
        match key.key.as_str() {
            "esc" => return None,
            "enter" => return self.submit_form(form),
            _ => edit_form(&mut form, key),
        }
        Some(ModalState::Form(form))
    }

    fn submit_form(&mut self, form: FormState) -> Option<ModalState> {
        if form.kind() == FormKind::AddContact {
            return match add_contact(&mut self.store, &form) {
                Ok(user) => {
                    self.notify(format!("{} added to contacts", user.name));
                    None
                }
                Err(error) => {
                    self.notify(error.user_message());
                    Some(ModalState::Form(form))
                }
            };
        }

        if let Err(error) = validate_details(&form) {
            self.notify(error.user_message());
            return Some(ModalState::Form(form));
        }

        let items = self
            .store
            .contacts()
            .iter()
            .map(|user| PickerItem::new(user.id.as_str(), user.name.clone()))
            .collect();
        Some(ModalState::Members {
            form,
            picker: PickerState::multi(items),
        })
    }

    fn members_key(
        &mut self,
        form: FormState,
        mut picker: PickerState,
        key: &KeyInput,
    ) -> Option<ModalState> {
        match picker_key(&mut picker, key) {
            PickerKey::Handled => Some(ModalState::Members { form, picker }),
            PickerKey::Cancel => Some(ModalState::Form(form)),
            PickerKey::Confirm => match create_chat(&mut self.store, &form, picker.chosen_ids()) {
                Ok(chat_id) => {
                    self.open_chat(&chat_id);
                    let created = match form.kind() {
                        FormKind::NewChannel => "Channel created",
                        _ => "Group created",
                    };
                    self.notify(created);
                    None
                }
                Err(error) => {
                    self.notify(error.user_message());
                    Some(ModalState::Members { form, picker })
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        domain::{
            chat::{ChatKind, ChannelLink, MuteSetting},
            ids::{ChatId, MessageId},
            modal_state::ModalState,
            shell_state::ActivePane,
        },
        usecases::shell::test_support::Harness,
    };

    #[test]
    fn contact_picker_opens_private_chat() {
        let mut harness = Harness::new();
        harness.press("c");
        harness.type_text("bob");

        harness.press("enter");

        assert!(harness.state().modal().is_none());
        assert_eq!(harness.state().active_pane(), ActivePane::Messages);
        let chat = harness.state().open_chat().chat().expect("open chat");
        assert_eq!(chat.name, "Bob");
        assert_eq!(chat.kind, ChatKind::Private);
        assert_eq!(harness.store().chats()[1].id, chat.id);
    }

    #[test]
    fn contact_picker_reuses_existing_chat() {
        let mut harness = Harness::new();
        harness.press("c");
        harness.type_text("ali");

        harness.press("enter");

        assert_eq!(
            harness.state().open_chat().chat_id(),
            Some(&ChatId::from("alice-chat"))
        );
        assert_eq!(harness.store().chats().len(), 3);
    }

    #[test]
    fn marked_messages_forward_to_every_picked_chat() {
        let mut harness = Harness::new();
        harness.open_alice();
        harness.press("k");
        harness.press("v");
        harness.press("j");
        harness.press("v");
        assert_eq!(harness.notice(), Some("2 selected"));

        harness.press("f");
        assert!(matches!(
            harness.state().modal(),
            Some(ModalState::Forward { message_ids, .. }) if message_ids.len() == 2
        ));
        harness.type_text("team");
        harness.press("tab");
        for _ in 0.."team".len() {
            harness.press("backspace");
        }
        harness.type_text("saved");
        harness.press("tab");
        harness.press("enter");

        for chat_id in ["team", "saved-messages"] {
            let contents: Vec<String> = harness
                .store()
                .messages(&ChatId::from(chat_id))
                .iter()
                .rev()
                .take(2)
                .rev()
                .map(|message| message.content.clone())
                .collect();
            assert_eq!(contents, ["Hi there", "Hello!"], "{chat_id}");
        }
        assert_eq!(harness.notice(), Some("Forwarded to 2 chats"));
        assert!(!harness.state().open_chat().has_marks());
    }

    #[test]
    fn esc_clears_marks_before_closing_chat() {
        let mut harness = Harness::new();
        harness.open_alice();
        harness.press("v");

        harness.press("esc");

        assert!(!harness.state().open_chat().has_marks());
        assert_eq!(harness.state().active_pane(), ActivePane::Messages);
        harness.press("esc");
        assert_eq!(harness.state().open_chat().chat_id(), None);
    }

    #[test]
    fn forward_copies_message_to_picked_chat() {
        let mut harness = Harness::new();
        harness.open_alice();
        harness.press("f");
        harness.type_text("team");
        harness.press("tab");

        harness.press("enter");

        let team = harness
            .store()
            .chat(&ChatId::from("team"))
            .and_then(|chat| chat.last_message.clone())
            .expect("forwarded copy");
        assert_eq!(team.content, "Hello!");
        assert_ne!(team.id, MessageId::from("m2"));
        assert_eq!(harness.notice(), Some("Forwarded to 1 chat"));
    }

    #[test]
    fn reaction_picker_toggles_chosen_emoji() {
        let mut harness = Harness::new();
        harness.open_alice();
        harness.press("+");
        harness.press("right");

        harness.press("enter");

        let message = harness
            .store()
            .message(&ChatId::from("alice-chat"), &MessageId::from("m2"))
            .cloned()
            .expect("message");
        assert_eq!(message.reactions, vec!["👍".to_owned()]);
        assert!(harness.state().modal().is_none());
    }

    #[test]
    fn mute_picker_applies_selected_duration() {
        let mut harness = Harness::new();
        harness.press("j");
        harness.press("m");
        harness.press("up");

        harness.press("enter");

        let muted = harness
            .store()
            .chat(&ChatId::from("alice-chat"))
            .and_then(|chat| chat.muted);
        assert_eq!(muted, Some(MuteSetting::Forever));
    }

    #[test]
    fn confirming_delete_removes_chat() {
        let mut harness = Harness::new();
        harness.open_alice();
        harness.press("esc");
        harness.press("d");

        harness.press("enter");

        assert!(harness.store().chat(&ChatId::from("alice-chat")).is_none());
        assert_eq!(harness.notice(), Some("Alice removed"));
    }

    #[test]
    fn add_contact_form_creates_contact() {
        let mut harness = Harness::new();
        harness.press("C");
        harness.type_text("Jane");
        harness.press("tab");
        harness.type_text("Doe");
        harness.press("tab");
        harness.type_text("+44");
        harness.press("tab");
        harness.type_text("7700 900123");

        harness.press("enter");

        assert!(harness.state().modal().is_none());
        let jane = harness.store().contacts().last().cloned().expect("contact");
        assert_eq!(jane.name, "Jane Doe");
        assert_eq!(jane.phone.as_deref(), Some("+44 7700 900123"));
        assert_eq!(harness.notice(), Some("Jane Doe added to contacts"));
    }

    #[test]
    fn invalid_form_stays_open_with_notice() {
        let mut harness = Harness::new();
        harness.press("C");

        harness.press("enter");

        assert!(matches!(harness.state().modal(), Some(ModalState::Form(_))));
        assert_eq!(harness.notice(), Some("A name is required"));
    }

    #[test]
    fn group_flow_picks_members_and_opens_group() {
        let mut harness = Harness::new();
        harness.press("n");
        harness.type_text("Crew");
        harness.press("enter");
        assert!(matches!(harness.state().modal(), Some(ModalState::Members { .. })));

        harness.press("enter");
        assert_eq!(harness.notice(), Some("Select at least one member"));

        harness.press("tab");
        harness.press("enter");

        let chat = harness.state().open_chat().chat().expect("group");
        assert_eq!(chat.name, "Crew");
        assert_eq!(chat.kind, ChatKind::Group);
        let members: Vec<_> = chat.participants.iter().map(|user| user.id.as_str()).collect();
        assert_eq!(members, vec!["me", "alice"]);
        assert_eq!(harness.notice(), Some("Group created"));
    }

    #[test]
    fn channel_flow_uses_public_slug() {
        let mut harness = Harness::new();
        harness.press("N");
        harness.type_text("Rust News");
        harness.press("tab");
        harness.type_text("weekly digest");
        harness.press("tab");
        harness.type_text("rust_news");
        harness.press("enter");

        harness.press("enter");
        assert_eq!(harness.notice(), Some("Select at least one member"));

        harness.press("tab");
        harness.press("enter");

        let chat = harness.state().open_chat().chat().expect("channel");
        assert_eq!(chat.kind, ChatKind::Channel);
        assert_eq!(chat.description.as_deref(), Some("weekly digest"));
        assert_eq!(
            chat.link,
            Some(ChannelLink::Public {
                slug: "rust_news".to_owned()
            })
        );
    }

    #[test]
    fn esc_in_member_picker_returns_to_form() {
        let mut harness = Harness::new();
        harness.press("n");
        harness.type_text("Crew");
        harness.press("enter");

        harness.press("esc");

        assert!(matches!(
            harness.state().modal(),
            Some(ModalState::Form(form)) if form.value(0) == "Crew"
        ));
    }

    #[test]
    fn info_panel_mutes_and_unmutes_the_chat() {
        let mut harness = Harness::new();
        harness.press("j");

        harness.press("I");
        assert!(matches!(
            harness.state().modal(),
            Some(ModalState::ChatInfo(info))
                if info.name == "Alice" && info.subtitle.as_deref() == Some("online") && !info.muted
        ));

        harness.press("m");
        assert!(matches!(harness.state().modal(), Some(ModalState::Mute { .. })));
        harness.press("enter");

        harness.press("I");
        harness.press("m");
        assert!(matches!(
            harness.state().modal(),
            Some(ModalState::ChatInfo(info)) if !info.muted
        ));
        assert_eq!(harness.notice(), Some("Notifications enabled"));
        assert_eq!(
            harness.store().chat(&ChatId::from("alice-chat")).and_then(|chat| chat.muted),
            None
        );
    }

    #[test]
    fn info_panel_offers_leaving_a_group() {
        let mut harness = Harness::new();
        harness.press("j");
        harness.press("j");
        harness.press("I");

        harness.press("d");

        assert!(matches!(
            harness.state().modal(),
            Some(ModalState::ConfirmDelete { kind: ChatKind::Group, .. })
        ));
    }

    #[test]
    fn options_menu_pins_the_open_chat() {
        let mut harness = Harness::new();
        harness.open_alice();

        harness.press("O");
        harness.press("j");
        harness.press("j");
        harness.press("enter");

        assert!(harness.state().modal().is_none());
        assert_eq!(harness.notice(), Some("Chat pinned"));
        assert!(harness
            .store()
            .chat(&ChatId::from("alice-chat"))
            .is_some_and(|chat| chat.pinned));

        harness.press("O");
        assert!(matches!(
            harness.state().modal(),
            Some(ModalState::ChatOptions { items, .. }) if items[2].label == "Unpin Chat"
        ));
    }

    #[test]
    fn options_menu_starts_search_and_ends_with_delete() {
        let mut harness = Harness::new();
        harness.open_alice();

        harness.press("O");
        harness.press("j");
        harness.press("enter");
        assert_eq!(harness.state().active_pane(), ActivePane::MessageSearch);
        harness.press("esc");

        harness.press("O");
        harness.press("k");
        harness.press("enter");
        assert!(matches!(
            harness.state().modal(),
            Some(ModalState::ConfirmDelete { kind: ChatKind::Private, .. })
        ));
    }

    #[test]
    fn calls_log_deletes_entries() {
        let mut harness = Harness::new();

        harness.press("L");
        assert!(matches!(
            harness.state().modal(),
            Some(ModalState::Calls { calls, .. }) if calls.len() == 2
        ));

        harness.press("d");
        assert_eq!(harness.notice(), Some("Call with Alice deleted"));
        assert_eq!(harness.store().calls().len(), 1);
        assert!(matches!(
            harness.state().modal(),
            Some(ModalState::Calls { calls, selected: 0 }) if calls.len() == 1
        ));

        harness.press("D");
        assert!(harness.store().calls().is_empty());
        harness.press("esc");
        assert!(harness.state().modal().is_none());
    }
}
