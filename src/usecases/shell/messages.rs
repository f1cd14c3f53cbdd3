use crate::{
    domain::{
        events::KeyInput,
        message::Message,
        modal_state::{ModalState, PickerItem, PickerState},
        shell_state::{ActivePane, ComposeMode},
    },
    infra::contracts::{ClipboardAdapter, ExternalOpener},
    simulation::{clock::Clock, replies::ReplyPicker},
    usecases::send_message::{
        edit_message, send_message, EditMessageCommand, SendMessageCommand,
    },
};

use super::DefaultShellOrchestrator;

const CLIPBOARD_COPY_FAILED: &str = "CLIPBOARD_COPY_FAILED";
const ATTACHMENT_OPEN_FAILED: &str = "ATTACHMENT_OPEN_FAILED";

impl<C, B, O, P> DefaultShellOrchestrator<C, B, O, P>
where
    C: Clock,
    B: ClipboardAdapter,
    O: ExternalOpener,
    P: ReplyPicker,
{
    pub(super) fn handle_messages_key(&mut self, key: &KeyInput) {
        match key.key.as_str() {
            _ if key.ctrl => {}
            "j" | "down" => self.state.open_chat_mut().select_next(),
            "k" | "up" => self.state.open_chat_mut().select_previous(),
            "esc" if self.state.open_chat().has_marks() => {
                self.state.open_chat_mut().clear_marks();
                self.notify("Selection cleared");
            }
            "esc" | "h" | "left" => self.close_chat(),
            "v" => self.toggle_selected_mark(),
            "i" | "enter" => self.state.set_active_pane(ActivePane::MessageInput),
            "r" => self.start_reply(),
            "e" => self.start_edit(),
            "d" => self.delete_selected_message(),
            "y" => self.copy_selected_message(),
            "o" => self.open_selected_attachment(),
            "f" => self.start_forward(),
            "+" => self.start_reaction(),
            "p" => self.toggle_selected_message_pin(),
            "P" => self.jump_to_next_pinned(),
            "/" => {
                self.state.start_search();
                self.state.set_active_pane(ActivePane::MessageSearch);
            }
            "n" => self.step_search(true),
            "N" => self.step_search(false),
            "I" => {
                if let Some(chat_id) = self.state.open_chat().chat_id().cloned() {
                    self.open_chat_info(chat_id);
                }
            }
            "O" => {
                if let Some(chat_id) = self.state.open_chat().chat_id().cloned() {
                    self.open_chat_options(chat_id);
                }
            }
            _ => {}
        }
    }

    pub(super) fn handle_message_input_key(&mut self, key: &KeyInput) {
        if let Some(ch) = key.as_char() {
            if !self.state.message_input_mut().insert_char(ch) {
                self.notify("Message is too long");
            }
            return;
        }

        match key.key.as_str() {
            "enter" => self.submit_composer(),
            "esc" => self.cancel_composer(),
            "backspace" => self.state.message_input_mut().delete_char_before(),
            "delete" => self.state.message_input_mut().delete_char_at(),
            "left" => self.state.message_input_mut().move_cursor_left(),
            "right" => self.state.message_input_mut().move_cursor_right(),
            "home" => self.state.message_input_mut().move_cursor_home(),
            "end" => self.state.message_input_mut().move_cursor_end(),
            _ => {}
        }
    }

    pub(super) fn handle_message_search_key(&mut self, key: &KeyInput) {
        if let Some(ch) = key.as_char() {
            if let Some(search) = self.state.search_mut() {
                search.push_char(ch);
            }
            self.run_search();
            return;
        }

        match key.key.as_str() {
            "backspace" => {
                if let Some(search) = self.state.search_mut() {
                    search.pop_char();
                }
                self.run_search();
            }
            "down" | "tab" => self.step_search(true),
            "up" | "backtab" => self.step_search(false),
            "enter" => self.state.set_active_pane(ActivePane::Messages),
            "esc" => {
                self.state.close_search();
                self.state.set_active_pane(ActivePane::Messages);
            }
            _ => {}
        }
    }

    fn selected_message(&self) -> Option<Message> {
        self.state.open_chat().selected_message().cloned()
    }

    fn start_reply(&mut self) {
        let (Some(message), Some(chat)) = (self.selected_message(), self.state.open_chat().chat())
        else {
            return;
        };

        let mode = ComposeMode::Reply {
            message_id: message.id.clone(),
            preview: message.display_content(),
            sender_name: chat.sender_name(&message.sender_id, self.store.me_id()),
        };
        self.state.set_compose_mode(Some(mode));
        self.state.set_active_pane(ActivePane::MessageInput);
    }

    fn start_edit(&mut self) {
        let Some(message) = self.selected_message() else {
            return;
        };
        if &message.sender_id != self.store.me_id() {
            self.notify("You can only edit your own messages");
            return;
        }

        self.state.message_input_mut().set_text(&message.content);
        self.state.set_compose_mode(Some(ComposeMode::Edit {
            message_id: message.id,
        }));
        self.state.set_active_pane(ActivePane::MessageInput);
    }

    fn submit_composer(&mut self) {
        let Some(chat_id) = self.state.open_chat().chat_id().cloned() else {
            return;
        };
        let text = self.state.message_input().text();
        let now_ms = self.clock.now_ms();

        let result = match self.state.compose_mode().cloned() {
            Some(ComposeMode::Edit { message_id }) => edit_message(
                &mut self.store,
                EditMessageCommand {
                    chat_id,
                    message_id,
                    text,
                    now_ms,
                },
            ),
            mode => {
                let reply_to = match mode {
                    Some(ComposeMode::Reply { message_id, .. }) => Some(message_id),
                    _ => None,
                };
                send_message(
                    &mut self.store,
                    &mut self.simulator,
                    SendMessageCommand {
                        chat_id,
                        text,
                        reply_to,
                        now_ms,
                    },
                )
                .map(|_| ())
            }
        };

        match result {
            Ok(()) => {
                self.state.message_input_mut().clear();
                self.state.take_compose_mode();
                self.refresh();
            }
            Err(error) => self.notify(error.user_message()),
        }
    }

    fn cancel_composer(&mut self) {
        match self.state.take_compose_mode() {
            Some(ComposeMode::Edit { .. }) => self.state.message_input_mut().clear(),
            Some(ComposeMode::Reply { .. }) => {}
            None => self.state.set_active_pane(ActivePane::Messages),
        }
    }

    fn delete_selected_message(&mut self) {
        let (Some(chat_id), Some(message)) = (
            self.state.open_chat().chat_id().cloned(),
            self.selected_message(),
        ) else {
            return;
        };

        match self.store.delete_message(&chat_id, &message.id) {
            Ok(_) => {
                self.simulator.on_message_deleted(&chat_id, &message.id);
                let composing_on_deleted = match self.state.compose_mode() {
                    Some(ComposeMode::Edit { message_id } | ComposeMode::Reply { message_id, .. }) => {
                        message_id == &message.id
                    }
                    None => false,
                };
                if composing_on_deleted {
                    self.state.take_compose_mode();
                    self.state.message_input_mut().clear();
                }
                self.refresh();
                self.notify("Message deleted");
            }
            Err(error) => self.report(error),
        }
    }

    fn copy_selected_message(&mut self) {
        let Some(text) = self
            .selected_message()
            .and_then(|message| message.clipboard_text())
        else {
            return;
        };

        match self.clipboard.copy_text(&text) {
            Ok(()) => self.notify("Copied to clipboard"),
            Err(error) => tracing::warn!(
                code = CLIPBOARD_COPY_FAILED,
                error = %error,
                "failed to copy message"
            ),
        }
    }

    fn open_selected_attachment(&mut self) {
        let Some(url) = self
            .selected_message()
            .and_then(|message| message.attachments.first().map(|item| item.url.clone()))
        else {
            self.notify("No attachment to open");
            return;
        };

        if let Err(error) = self.opener.open(&url) {
            tracing::warn!(
                code = ATTACHMENT_OPEN_FAILED,
                url = %url,
                error = %error,
                "failed to open attachment"
            );
        }
    }

    fn toggle_selected_mark(&mut self) {
        if self.selected_message().is_none() {
            return;
        }
        self.state.open_chat_mut().toggle_mark();
        let count = self.state.open_chat().marked_ids().len();
        self.notify(format!("{count} selected"));
    }

    /// Forwards the marked messages, or the one under the cursor when none
    /// are marked.
    fn start_forward(&mut self) {
        let open_chat = self.state.open_chat();
        let Some(source) = open_chat.chat_id().cloned() else {
            return;
        };
        let message_ids = if open_chat.has_marks() {
            open_chat.marked_ids()
        } else {
            match self.selected_message() {
                Some(message) => vec![message.id],
                None => return,
            }
        };

        let items = self
            .store
            .chats()
            .iter()
            .map(|chat| {
                PickerItem::new(chat.id.as_str(), chat.name.clone()).with_detail(chat.kind.as_label())
            })
            .collect();

        self.state.open_modal(ModalState::Forward {
            source,
            message_ids,
            picker: PickerState::multi(items),
        });
    }

    fn start_reaction(&mut self) {
        let (Some(chat_id), Some(message)) = (
            self.state.open_chat().chat_id().cloned(),
            self.selected_message(),
        ) else {
            return;
        };

        self.state.open_modal(ModalState::Reactions {
            chat_id,
            message_id: message.id,
            selected: 0,
        });
    }

    fn toggle_selected_message_pin(&mut self) {
        let (Some(chat_id), Some(message)) = (
            self.state.open_chat().chat_id().cloned(),
            self.selected_message(),
        ) else {
            return;
        };

        match self.store.toggle_message_pin(&chat_id, &message.id) {
            Ok(pinned) => {
                self.refresh_open_chat();
                self.notify(if pinned {
                    "Message pinned"
                } else {
                    "Message unpinned"
                });
            }
            Err(error) => self.report(error),
        }
    }

    /// Cycles the cursor through the chat's pinned messages, newest pin first.
    fn jump_to_next_pinned(&mut self) {
        let Some(chat_id) = self.state.open_chat().chat_id().cloned() else {
            return;
        };
        let pinned: Vec<_> = self
            .store
            .pinned_messages(&chat_id)
            .into_iter()
            .rev()
            .map(|message| message.id.clone())
            .collect();
        if pinned.is_empty() {
            self.notify("No pinned messages");
            return;
        }

        let current = self.selected_message().map(|message| message.id);
        let next = current
            .and_then(|id| pinned.iter().position(|pinned_id| pinned_id == &id))
            .map_or(0, |index| (index + 1) % pinned.len());
        self.state.open_chat_mut().select_message_id(&pinned[next]);
    }

    fn run_search(&mut self) {
        let Some(chat_id) = self.state.open_chat().chat_id().cloned() else {
            return;
        };
        let Some(query) = self.state.search().map(|search| search.query().to_owned()) else {
            return;
        };

        let results = self
            .store
            .search_messages(&chat_id, &query)
            .into_iter()
            .map(|message| message.id.clone())
            .collect();

        let current = self.state.search_mut().and_then(|search| {
            search.set_results(results);
            search.current().cloned()
        });
        if let Some(message_id) = current {
            self.state.open_chat_mut().select_message_id(&message_id);
        }
    }

    fn step_search(&mut self, forward: bool) {
        let target = self.state.search_mut().and_then(|search| {
            let step = if forward {
                search.next()
            } else {
                search.previous()
            };
            step.cloned()
        });
        if let Some(message_id) = target {
            self.state.open_chat_mut().select_message_id(&message_id);
        }
    }
}
