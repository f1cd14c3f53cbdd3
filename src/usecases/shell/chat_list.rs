use crate::{
    domain::{
        events::KeyInput,
        ids::ChatId,
        modal_state::{FormKind, FormState, ModalState, PickerItem, PickerState},
        shell_state::ActivePane,
    },
    infra::contracts::{ClipboardAdapter, ExternalOpener},
    simulation::{clock::Clock, replies::ReplyPicker},
};

use super::DefaultShellOrchestrator;

impl<C, B, O, P> DefaultShellOrchestrator<C, B, O, P>
where
    C: Clock,
    B: ClipboardAdapter,
    O: ExternalOpener,
    P: ReplyPicker,
{
    pub(super) fn handle_chat_list_key(&mut self, key: &KeyInput) {
        match key.key.as_str() {
            _ if key.ctrl => {}
            "j" | "down" => self.state.chat_list_mut().select_next(),
            "k" | "up" => self.state.chat_list_mut().select_previous(),
            "enter" | "l" | "right" => {
                if let Some(chat_id) = self.selected_chat_id() {
                    self.open_chat(&chat_id);
                }
            }
            "q" => self.state.stop(),
            "/" => self.state.set_active_pane(ActivePane::ChatFilter),
            "a" => self.toggle_archived_view(),
            "esc" if self.state.show_archived() => self.toggle_archived_view(),
            "p" => self.with_selected(Self::toggle_pin),
            "m" => self.with_selected(Self::toggle_mute),
            "e" => self.with_selected(Self::toggle_archive),
            "r" => {
                if let Some(chat_id) = self.selected_chat_id() {
                    if let Err(error) = self.store.mark_as_read(&chat_id) {
                        self.report(error);
                    }
                    self.refresh_chat_list();
                }
            }
            "d" => self.with_selected(Self::confirm_delete),
            "x" => self.with_selected(Self::clear_history),
            "I" => self.with_selected(Self::open_chat_info),
            "L" => self.open_calls(),
            "c" => self.open_contacts(),
            "C" => self.state.open_modal(ModalState::Form(FormState::new(FormKind::AddContact))),
            "n" => self.state.open_modal(ModalState::Form(FormState::new(FormKind::NewGroup))),
            "N" => self.state.open_modal(ModalState::Form(FormState::new(FormKind::NewChannel))),
            _ => {}
        }
    }

    pub(super) fn handle_chat_filter_key(&mut self, key: &KeyInput) {
        if let Some(ch) = key.as_char() {
            self.state.chat_list_mut().push_filter_char(ch);
            self.refresh_chat_list();
            return;
        }

        match key.key.as_str() {
            "backspace" => {
                self.state.chat_list_mut().pop_filter_char();
                self.refresh_chat_list();
            }
            "down" => self.state.chat_list_mut().select_next(),
            "up" => self.state.chat_list_mut().select_previous(),
            "enter" => self.state.set_active_pane(ActivePane::ChatList),
            "esc" => {
                self.state.chat_list_mut().clear_filter();
                self.refresh_chat_list();
                self.state.set_active_pane(ActivePane::ChatList);
            }
            _ => {}
        }
    }

    fn selected_chat_id(&self) -> Option<ChatId> {
        self.state
            .chat_list()
            .selected_chat()
            .map(|chat| chat.chat_id.clone())
    }

    fn with_selected(&mut self, action: fn(&mut Self, ChatId)) {
        if let Some(chat_id) = self.selected_chat_id() {
            action(self, chat_id);
        }
    }

    fn toggle_archived_view(&mut self) {
        let show_archived = !self.state.show_archived();
        self.state.set_show_archived(show_archived);
        self.refresh_chat_list();
    }

    fn open_contacts(&mut self) {
        let items = self
            .store
            .contacts()
            .iter()
            .map(|user| {
                let detail = match (&user.phone, user.online) {
                    (_, true) => "online".to_owned(),
                    (Some(phone), false) => phone.clone(),
                    (None, false) => "last seen recently".to_owned(),
                };
                PickerItem::new(user.id.as_str(), user.name.clone()).with_detail(detail)
            })
            .collect();

        self.state
            .open_modal(ModalState::Contacts(PickerState::single(items)));
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        domain::{
            ids::ChatId,
            modal_state::{FormKind, ModalState},
            shell_state::ActivePane,
        },
        usecases::{contracts::ShellOrchestrator, shell::test_support::Harness},
    };

    fn titles(harness: &Harness) -> Vec<String> {
        harness
            .state()
            .chat_list()
            .chats()
            .iter()
            .map(|chat| chat.title.clone())
            .collect()
    }

    #[test]
    fn vim_keys_navigate_chat_list() {
        let mut harness = Harness::new();

        harness.press("j");
        assert_eq!(harness.state().chat_list().selected_index(), Some(1));

        harness.press("k");
        assert_eq!(harness.state().chat_list().selected_index(), Some(0));
    }

    #[test]
    fn enter_opens_selected_chat() {
        let mut harness = Harness::new();

        harness.open_alice();

        assert_eq!(harness.state().active_pane(), ActivePane::Messages);
        let open = harness.state().open_chat();
        assert_eq!(open.chat_id(), Some(&ChatId::from("alice-chat")));
        assert_eq!(open.selected_message().map(|m| m.id.as_str()), Some("m2"));
    }

    #[test]
    fn q_quits_from_chat_list() {
        let mut harness = Harness::new();

        harness.press("q");

        assert!(!harness.state().is_running());
    }

    #[test]
    fn filter_narrows_and_esc_restores() {
        let mut harness = Harness::new();

        harness.press("/");
        harness.type_text("tea");
        assert_eq!(titles(&harness), vec!["Team"]);
        assert_eq!(harness.state().active_pane(), ActivePane::ChatFilter);

        harness.press("esc");
        assert_eq!(titles(&harness).len(), 3);
        assert_eq!(harness.state().active_pane(), ActivePane::ChatList);
    }

    #[test]
    fn q_is_typed_into_filter() {
        let mut harness = Harness::new();

        harness.press("/");
        harness.press("q");

        assert!(harness.state().is_running());
        assert_eq!(harness.state().chat_list().filter(), "q");
    }

    #[test]
    fn pinning_moves_chat_to_pinned_section() {
        let mut harness = Harness::new();
        harness.press("j");
        harness.press("j");

        harness.press("p");

        assert_eq!(titles(&harness)[1], "Team");
        let pinned: Vec<bool> = harness
            .state()
            .chat_list()
            .chats()
            .iter()
            .map(|chat| chat.is_pinned)
            .collect();
        assert_eq!(pinned, vec![true, true, false]);
        assert_eq!(harness.notice(), Some("Chat pinned"));
    }

    #[test]
    fn archive_moves_chat_to_archive_view() {
        let mut harness = Harness::new();
        harness.press("j");

        harness.press("e");
        assert!(!titles(&harness).contains(&"Alice".to_owned()));

        harness.press("a");
        assert_eq!(titles(&harness), vec!["Alice"]);

        harness.press("esc");
        assert!(!harness.state().show_archived());
    }

    #[test]
    fn saved_messages_cannot_be_archived_or_deleted() {
        let mut harness = Harness::new();

        harness.press("e");
        assert_eq!(
            harness.notice(),
            Some("Saved Messages cannot be archived or deleted")
        );

        harness.press("d");
        assert!(harness.state().modal().is_none());
        assert_eq!(harness.notice(), Some("Saved Messages cannot be deleted"));
    }

    #[test]
    fn mute_opens_picker_and_second_press_unmutes() {
        let mut harness = Harness::new();
        harness.press("j");

        harness.press("m");
        assert!(matches!(harness.state().modal(), Some(ModalState::Mute { .. })));
        harness.press("enter");
        assert!(harness.state().chat_list().selected_chat().is_some_and(|chat| chat.is_muted));

        harness.press("m");
        assert!(harness.state().modal().is_none());
        assert!(harness.state().chat_list().selected_chat().is_some_and(|chat| !chat.is_muted));
    }

    #[test]
    fn clear_history_empties_chat() {
        let mut harness = Harness::new();
        harness.press("j");

        harness.press("x");

        assert!(harness.store().messages(&ChatId::from("alice-chat")).is_empty());
        assert_eq!(harness.notice(), Some("History cleared"));
    }

    #[test]
    fn delete_requires_confirmation() {
        let mut harness = Harness::new();
        harness.press("j");

        harness.press("d");
        harness.press("n");
        assert!(harness.shell.store().chat(&ChatId::from("alice-chat")).is_some());

        harness.press("d");
        harness.press("y");
        assert!(harness.shell.store().chat(&ChatId::from("alice-chat")).is_none());
        assert_eq!(titles(&harness).len(), 2);
    }

    #[test]
    fn creation_keys_open_forms() {
        let mut harness = Harness::new();

        harness.press("N");

        assert!(matches!(
            harness.state().modal(),
            Some(ModalState::Form(form)) if form.kind() == FormKind::NewChannel
        ));
    }
}
