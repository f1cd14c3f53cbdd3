//! Shell orchestrator: routes key presses and ticks to the chat store, the
//! delivery simulator and the UI state machines.

mod chat_actions;
mod chat_list;
mod messages;
mod modals;

use anyhow::Result;

use crate::{
    domain::{
        events::AppEvent,
        ids::ChatId,
        shell_state::{ActivePane, ShellState},
        store::{ChatStore, StoreError},
    },
    infra::contracts::{ClipboardAdapter, ExternalOpener},
    simulation::{
        clock::Clock,
        replies::{RandomReplyPicker, ReplyPicker},
        DeliverySimulator,
    },
    usecases::list_chats::{list_chats, ListChatsQuery},
};

use super::contracts::ShellOrchestrator;

pub struct DefaultShellOrchestrator<C, B, O, P = RandomReplyPicker>
where
    C: Clock,
    B: ClipboardAdapter,
    O: ExternalOpener,
    P: ReplyPicker,
{
    state: ShellState,
    store: ChatStore,
    simulator: DeliverySimulator<P>,
    clock: C,
    clipboard: B,
    opener: O,
}

impl<C, B, O, P> DefaultShellOrchestrator<C, B, O, P>
where
    C: Clock,
    B: ClipboardAdapter,
    O: ExternalOpener,
    P: ReplyPicker,
{
    pub fn new(
        store: ChatStore,
        simulator: DeliverySimulator<P>,
        clock: C,
        clipboard: B,
        opener: O,
    ) -> Self {
        let mut orchestrator = Self {
            state: ShellState::default(),
            store,
            simulator,
            clock,
            clipboard,
            opener,
        };
        orchestrator.refresh_chat_list();
        orchestrator
    }

    pub fn with_archived_view(mut self, show_archived: bool) -> Self {
        self.state.set_show_archived(show_archived);
        self.refresh_chat_list();
        self
    }

    fn on_tick(&mut self) {
        let now_ms = self.clock.now_ms();
        let open_chat = self.state.open_chat().chat_id().cloned();

        let changed = self
            .simulator
            .advance(&mut self.store, now_ms, open_chat.as_ref());
        if open_chat.is_some_and(|chat_id| changed.contains(&chat_id)) {
            self.refresh_open_chat();
        }

        // Mute expiry is time based, so the list is rebuilt on every tick.
        self.refresh_chat_list();
        self.state.expire_notice(now_ms);
    }

    fn refresh(&mut self) {
        self.refresh_open_chat();
        self.refresh_chat_list();
    }

    fn refresh_chat_list(&mut self) {
        let query = ListChatsQuery {
            filter: self.state.chat_list().filter().to_owned(),
            archived: self.state.show_archived(),
            now_ms: self.clock.now_ms(),
        };
        let output = list_chats(&self.store, &query);
        self.state.chat_list_mut().set_chats(output.chats);
    }

    /// Re-reads the open chat from the store; leaves it when it is gone.
    fn refresh_open_chat(&mut self) {
        let Some(chat_id) = self.state.open_chat().chat_id().cloned() else {
            return;
        };

        match self.store.chat(&chat_id) {
            Some(chat) => {
                let chat = chat.clone();
                let messages = self.store.messages(&chat_id).to_vec();
                self.state.open_chat_mut().refresh(chat, messages);
            }
            None => self.state.leave_chat(),
        }
    }

    fn open_chat(&mut self, chat_id: &ChatId) {
        if let Some(previous) = self.state.open_chat().chat_id().cloned() {
            if &previous != chat_id {
                self.simulator.on_chat_closed(&previous);
            }
        }

        if let Err(error) = self.store.select_chat(chat_id) {
            self.report(error);
            return;
        }
        let Some(chat) = self.store.chat(chat_id).cloned() else {
            return;
        };
        let messages = self.store.messages(chat_id).to_vec();

        self.state.leave_chat();
        self.state.open_chat_mut().open(chat, messages);
        self.state.set_active_pane(ActivePane::Messages);
        self.state.chat_list_mut().select_chat_id(chat_id);
        self.refresh_chat_list();
        tracing::debug!(chat_id = %chat_id, "chat opened");
    }

    fn close_chat(&mut self) {
        if let Some(chat_id) = self.state.open_chat().chat_id().cloned() {
            self.simulator.on_chat_closed(&chat_id);
        }
        self.state.leave_chat();
        self.refresh_chat_list();
    }

    fn notify(&mut self, text: impl Into<String>) {
        let now_ms = self.clock.now_ms();
        self.state.set_notice(text, now_ms);
    }

    fn report(&mut self, error: StoreError) {
        tracing::debug!(error = %error, "store operation rejected");
        let text = match error {
            StoreError::SavedMessagesProtected => {
                "Saved Messages cannot be archived or deleted".to_owned()
            }
            other => capitalize(&other.to_string()),
        };
        self.notify(text);
    }
}

impl<C, B, O, P> ShellOrchestrator for DefaultShellOrchestrator<C, B, O, P>
where
    C: Clock,
    B: ClipboardAdapter,
    O: ExternalOpener,
    P: ReplyPicker,
{
    fn state(&self) -> &ShellState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut ShellState {
        &mut self.state
    }

    fn store(&self) -> &ChatStore {
        &self.store
    }

    fn now_ms(&self) -> i64 {
        self.clock.now_ms()
    }

    fn handle_event(&mut self, event: AppEvent) -> Result<()> {
        match event {
            AppEvent::Tick => self.on_tick(),
            AppEvent::QuitRequested => self.state.stop(),
            AppEvent::InputKey(key) => {
                if self.state.modal().is_some() {
                    self.handle_modal_key(&key);
                    return Ok(());
                }

                match self.state.active_pane() {
                    ActivePane::ChatList => self.handle_chat_list_key(&key),
                    ActivePane::ChatFilter => self.handle_chat_filter_key(&key),
                    ActivePane::Messages => self.handle_messages_key(&key),
                    ActivePane::MessageInput => self.handle_message_input_key(&key),
                    ActivePane::MessageSearch => self.handle_message_search_key(&key),
                }
            }
        }

        Ok(())
    }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}


#[cfg(test)]
mod tests {
    use super::{test_support::*, *};
    use crate::domain::shell_state::NOTICE_TTL_MS;

    #[test]
    fn stops_on_quit_event() {
        let mut harness = Harness::new();

        harness
            .shell
            .handle_event(AppEvent::QuitRequested)
            .expect("event must be handled");

        assert!(!harness.state().is_running());
    }

    #[test]
    fn keeps_running_on_regular_key() {
        let mut harness = Harness::new();

        harness.press("z");

        assert!(harness.state().is_running());
    }

    #[test]
    fn starts_with_saved_messages_selected() {
        let harness = Harness::new();

        let list = harness.state().chat_list();
        assert_eq!(list.chats().len(), 3);
        assert_eq!(list.selected_index(), Some(0));
        assert_eq!(
            list.selected_chat().map(|chat| chat.chat_id.clone()),
            Some(harness.store().saved_messages_id())
        );
    }

    #[test]
    fn sent_message_walks_through_delivery_and_gets_reply() {
        let mut harness = Harness::new();
        harness.open_alice();
        harness.press("i");
        harness.type_text("ping");
        harness.press("enter");

        harness.tick_after(2_500);

        let open = harness.state().open_chat();
        let last = open.messages().last().expect("reply");
        assert_eq!(last.content, REPLY);
        assert_eq!(open.selected_message().map(|m| &m.id), Some(&last.id));
        let ping = &open.messages()[open.messages().len() - 2];
        assert_eq!(ping.content, "ping");
        assert_eq!(ping.status, crate::domain::message::DeliveryStatus::Read);
        assert_eq!(
            harness
                .state()
                .chat_list()
                .selected_chat()
                .map(|chat| chat.unread_count),
            Some(0)
        );
    }

    #[test]
    fn reply_in_closed_chat_shows_unread_badge() {
        let mut harness = Harness::new();
        harness.open_alice();
        harness.press("i");
        harness.type_text("ping");
        harness.press("enter");
        harness.press("esc");
        harness.press("esc");

        harness.tick_after(2_500);

        assert_eq!(harness.state().active_pane(), ActivePane::ChatList);
        let alice = harness
            .state()
            .chat_list()
            .chats()
            .iter()
            .find(|chat| chat.chat_id.as_str() == "alice-chat")
            .expect("alice chat");
        assert_eq!(alice.unread_count, 1);
    }

    #[test]
    fn notices_expire_on_tick() {
        let mut harness = Harness::new();
        harness.press("d");
        assert!(harness.notice().is_some());

        harness.tick_after(NOTICE_TTL_MS);

        assert_eq!(harness.notice(), None);
    }
}
