//! Per-chat actions shared by the chat list, the info panel and the in-chat
//! options menu.

use crate::{
    domain::{
        chat_info::ChatInfo,
        ids::ChatId,
        modal_state::{chat_options, ModalState},
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
    pub(super) fn toggle_pin(&mut self, chat_id: ChatId) {
        match self.store.toggle_chat_pin(&chat_id) {
            Ok(pinned) => {
                self.refresh();
                self.state.chat_list_mut().select_chat_id(&chat_id);
                self.notify(if pinned { "Chat pinned" } else { "Chat unpinned" });
            }
            Err(error) => self.report(error),
        }
    }

    /// Muted chats are unmuted directly; others get the duration picker.
    pub(super) fn toggle_mute(&mut self, chat_id: ChatId) {
        let now_ms = self.clock.now_ms();
        let muted = self
            .store
            .chat(&chat_id)
            .is_some_and(|chat| chat.is_muted(now_ms));

        if !muted {
            self.state.open_modal(ModalState::Mute {
                chat_id,
                selected: 0,
            });
            return;
        }

        match self.store.set_mute(&chat_id, None) {
            Ok(()) => {
                self.refresh();
                self.notify("Notifications enabled");
            }
            Err(error) => self.report(error),
        }
    }

    pub(super) fn toggle_archive(&mut self, chat_id: ChatId) {
        match self.store.toggle_archive(&chat_id) {
            Ok(archived) => {
                self.refresh_chat_list();
                self.notify(if archived {
                    "Chat archived"
                } else {
                    "Chat moved out of the archive"
                });
            }
            Err(error) => self.report(error),
        }
    }

    pub(super) fn confirm_delete(&mut self, chat_id: ChatId) {
        let Some(chat) = self.store.chat(&chat_id) else {
            return;
        };
        if chat.is_saved_messages() {
            self.notify("Saved Messages cannot be deleted");
            return;
        }

        let modal = ModalState::ConfirmDelete {
            chat_id,
            title: chat.name.clone(),
            kind: chat.kind,
        };
        self.state.open_modal(modal);
    }

    pub(super) fn clear_history(&mut self, chat_id: ChatId) {
        match self.store.clear_history(&chat_id) {
            Ok(cleared) => {
                self.simulator.on_chat_emptied(&chat_id);
                tracing::info!(chat_id = %chat_id, cleared, "chat history cleared");
                self.refresh();
                self.notify("History cleared");
            }
            Err(error) => self.report(error),
        }
    }

    pub(super) fn chat_info(&self, chat_id: &ChatId) -> Option<ChatInfo> {
        let chat = self.store.chat(chat_id)?;
        Some(ChatInfo::build(
            chat,
            self.store.messages(chat_id),
            self.store.me_id(),
            self.clock.now_ms(),
        ))
    }

    pub(super) fn open_chat_info(&mut self, chat_id: ChatId) {
        if let Some(info) = self.chat_info(&chat_id) {
            self.state.open_modal(ModalState::ChatInfo(info));
        }
    }

    pub(super) fn open_chat_options(&mut self, chat_id: ChatId) {
        let Some(chat) = self.store.chat(&chat_id) else {
            return;
        };
        let items = chat_options(chat, self.clock.now_ms());
        self.state.open_modal(ModalState::ChatOptions {
            chat_id,
            items,
            selected: 0,
        });
    }

    pub(super) fn open_calls(&mut self) {
        self.state.open_modal(ModalState::Calls {
            calls: self.store.calls().to_vec(),
            selected: 0,
        });
    }
}
