//! Simulated counterpart: delivery receipts, typing and canned replies.
//!
//! Sending arms a set of scheduled steps keyed by the message id. Each tick
//! of the event loop applies the steps that came due against the store.
//! Steps go through the store's monotonic status update, so a late or
//! reordered step never moves a status backwards.

pub mod clock;
pub mod replies;
pub mod scheduler;

use crate::{
    domain::{
        ids::{ChatId, MessageId},
        message::{DeliveryStatus, Message},
        store::{ChatStore, StoreError},
    },
    infra::config::SimulationConfig,
    usecases::contracts::DeliveryTracker,
};

use self::{
    replies::{RandomReplyPicker, ReplyPicker},
    scheduler::{DeliveryScheduler, ScheduledStep, StepAction},
};

const SIMULATION_STEP_SKIPPED: &str = "SIMULATION_STEP_SKIPPED";

pub struct DeliverySimulator<P: ReplyPicker = RandomReplyPicker> {
    config: SimulationConfig,
    scheduler: DeliveryScheduler,
    picker: P,
}

impl<P: ReplyPicker> DeliverySimulator<P> {
    pub fn new(config: SimulationConfig, picker: P) -> Self {
        Self {
            config,
            scheduler: DeliveryScheduler::default(),
            picker,
        }
    }

    pub fn pending_steps(&self) -> usize {
        self.scheduler.pending_len()
    }

    /// Arms receipts for a just-sent message, plus typing and a reply when
    /// the chat is a private chat with someone else.
    pub fn on_message_sent(&mut self, store: &ChatStore, message: &Message) {
        let sent_at = message.timestamp_ms;
        let chat_id = &message.chat_id;
        let at = |delay_ms: u64| sent_at.saturating_add(i64::try_from(delay_ms).unwrap_or(i64::MAX));

        self.scheduler.schedule(
            at(self.config.sent_delay_ms),
            chat_id.clone(),
            message.id.clone(),
            StepAction::MarkSent,
        );
        self.scheduler.schedule(
            at(self.config.delivered_delay_ms),
            chat_id.clone(),
            message.id.clone(),
            StepAction::MarkDelivered,
        );

        if !self.config.bot_replies {
            return;
        }
        let Some(counterpart) = store
            .chat(chat_id)
            .filter(|chat| !chat.is_saved_messages())
            .and_then(|chat| chat.counterpart(store.me_id()))
        else {
            return;
        };

        self.scheduler.schedule(
            at(self.config.typing_delay_ms),
            chat_id.clone(),
            message.id.clone(),
            StepAction::StartTyping {
                name: counterpart.name.clone(),
            },
        );
        self.scheduler.schedule(
            at(self.config.reply_delay_ms),
            chat_id.clone(),
            message.id.clone(),
            StepAction::Reply {
                counterpart: counterpart.id.clone(),
            },
        );
    }

    pub fn on_message_deleted(&mut self, chat_id: &ChatId, message_id: &MessageId) {
        let dropped = self.scheduler.cancel_message(chat_id, message_id);
        if dropped > 0 {
            tracing::debug!(chat_id = %chat_id, message_id = %message_id, dropped, "steps cancelled");
        }
    }

    /// The chat was deleted or its history cleared.
    pub fn on_chat_emptied(&mut self, chat_id: &ChatId) {
        let dropped = self.scheduler.cancel_chat(chat_id);
        if dropped > 0 {
            tracing::debug!(chat_id = %chat_id, dropped, "chat steps cancelled");
        }
    }

    pub fn on_chat_closed(&mut self, chat_id: &ChatId) {
        if self.config.cancel_on_close {
            self.on_chat_emptied(chat_id);
        }
    }

    /// Applies every step due at `now_ms`. Returns the chats that changed.
    pub fn advance(
        &mut self,
        store: &mut ChatStore,
        now_ms: i64,
        open_chat: Option<&ChatId>,
    ) -> Vec<ChatId> {
        let mut changed: Vec<ChatId> = Vec::new();
        if self
            .scheduler
            .next_due_ms()
            .map_or(true, |due_ms| due_ms > now_ms)
        {
            return changed;
        }

        for step in self.scheduler.take_due(now_ms) {
            let chat_is_open = open_chat == Some(&step.chat_id);
            match self.apply(store, &step, now_ms, chat_is_open) {
                Ok(()) => {
                    if !changed.contains(&step.chat_id) {
                        changed.push(step.chat_id.clone());
                    }
                }
                Err(error) => tracing::warn!(
                    code = SIMULATION_STEP_SKIPPED,
                    chat_id = %step.chat_id,
                    message_id = %step.message_id,
                    action = ?step.action,
                    error = %error,
                    "simulation step skipped"
                ),
            }
        }

        changed
    }

    fn apply(
        &mut self,
        store: &mut ChatStore,
        step: &ScheduledStep,
        now_ms: i64,
        chat_is_open: bool,
    ) -> Result<(), StoreError> {
        match &step.action {
            StepAction::MarkSent => {
                store.advance_status(&step.chat_id, &step.message_id, DeliveryStatus::Sent)?;
            }
            StepAction::MarkDelivered => {
                store.advance_status(&step.chat_id, &step.message_id, DeliveryStatus::Delivered)?;
            }
            StepAction::StartTyping { name } => {
                store.set_typing(&step.chat_id, vec![name.clone()])?;
            }
            StepAction::Reply { counterpart } => {
                store.advance_status(&step.chat_id, &step.message_id, DeliveryStatus::Read)?;
                store.set_typing(&step.chat_id, Vec::new())?;

                let mut reply = Message::text(
                    MessageId::generate(),
                    step.chat_id.clone(),
                    counterpart.clone(),
                    self.picker.pick(),
                    now_ms,
                );
                reply.status = DeliveryStatus::Read;
                store.receive_message(reply, chat_is_open)?;
                tracing::debug!(chat_id = %step.chat_id, "bot reply posted");
            }
        }
        Ok(())
    }
}

impl<P: ReplyPicker> DeliveryTracker for DeliverySimulator<P> {
    fn on_message_sent(&mut self, store: &ChatStore, message: &Message) {
        DeliverySimulator::on_message_sent(self, store, message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::store::test_fixtures::{store, NOW};
    use replies::FixedReplyPicker;

    const REPLY: &str = "Perfect! I'll take care of it.";

    fn simulator() -> DeliverySimulator<FixedReplyPicker> {
        DeliverySimulator::new(SimulationConfig::default(), FixedReplyPicker(REPLY))
    }

    fn status_of(store: &ChatStore, chat: &ChatId, id: &MessageId) -> Option<DeliveryStatus> {
        store.message(chat, id).map(|message| message.status)
    }

    #[test]
    fn private_chat_walks_through_full_sequence() {
        let mut store = store();
        let mut sim = simulator();
        let chat_id = ChatId::from("alice-chat");
        let sent = store.send_message(&chat_id, "ping", None, NOW).expect("send");
        sim.on_message_sent(&store, &sent);

        sim.advance(&mut store, NOW + 300, None);
        assert_eq!(status_of(&store, &chat_id, &sent.id), Some(DeliveryStatus::Sent));

        sim.advance(&mut store, NOW + 800, None);
        assert_eq!(status_of(&store, &chat_id, &sent.id), Some(DeliveryStatus::Delivered));

        sim.advance(&mut store, NOW + 1_000, None);
        assert_eq!(
            store.chat(&chat_id).map(|chat| chat.typing.clone()),
            Some(vec!["Alice".to_owned()])
        );

        let changed = sim.advance(&mut store, NOW + 2_500, Some(&chat_id));
        assert_eq!(changed, vec![chat_id.clone()]);
        assert_eq!(status_of(&store, &chat_id, &sent.id), Some(DeliveryStatus::Read));
        let chat = store.chat(&chat_id).expect("chat");
        assert!(chat.typing.is_empty());
        let last = chat.last_message.as_ref().expect("reply");
        assert_eq!(last.content, REPLY);
        assert_eq!(last.sender_id.as_str(), "alice");
        assert_eq!(last.status, DeliveryStatus::Read);
        assert_eq!(sim.pending_steps(), 0);
        store.assert_invariants();
    }

    #[test]
    fn one_late_tick_applies_all_steps_in_order() {
        let mut store = store();
        let mut sim = simulator();
        let chat_id = ChatId::from("alice-chat");
        let sent = store.send_message(&chat_id, "ping", None, NOW).expect("send");
        sim.on_message_sent(&store, &sent);

        sim.advance(&mut store, NOW + 10_000, None);

        assert_eq!(status_of(&store, &chat_id, &sent.id), Some(DeliveryStatus::Read));
        assert!(store.chat(&chat_id).is_some_and(|chat| chat.typing.is_empty()));
    }

    #[test]
    fn reply_in_background_chat_bumps_unread() {
        let mut store = store();
        let mut sim = simulator();
        let chat_id = ChatId::from("alice-chat");
        let sent = store.send_message(&chat_id, "ping", None, NOW).expect("send");
        sim.on_message_sent(&store, &sent);

        sim.advance(&mut store, NOW + 2_500, Some(&ChatId::from("team")));

        assert_eq!(store.chat(&chat_id).map(|chat| chat.unread_count), Some(1));
    }

    #[test]
    fn group_chats_only_get_receipts() {
        let mut store = store();
        let mut sim = simulator();
        let chat_id = ChatId::from("team");
        let sent = store.send_message(&chat_id, "hi all", None, NOW).expect("send");

        sim.on_message_sent(&store, &sent);

        assert_eq!(sim.pending_steps(), 2);
        sim.advance(&mut store, NOW + 5_000, None);
        assert_eq!(status_of(&store, &chat_id, &sent.id), Some(DeliveryStatus::Delivered));
    }

    #[test]
    fn saved_messages_get_no_reply() {
        let mut store = store();
        let mut sim = simulator();
        let chat_id = store.saved_messages_id();
        let sent = store.send_message(&chat_id, "note", None, NOW).expect("send");

        sim.on_message_sent(&store, &sent);

        assert_eq!(sim.pending_steps(), 2);
    }

    #[test]
    fn disabled_bot_replies_only_arm_receipts() {
        let mut store = store();
        let config = SimulationConfig {
            bot_replies: false,
            ..SimulationConfig::default()
        };
        let mut sim = DeliverySimulator::new(config, FixedReplyPicker(REPLY));
        let sent = store
            .send_message(&ChatId::from("alice-chat"), "ping", None, NOW)
            .expect("send");

        sim.on_message_sent(&store, &sent);

        assert_eq!(sim.pending_steps(), 2);
    }

    #[test]
    fn deleted_chat_never_changes_again() {
        let mut store = store();
        let mut sim = simulator();
        let chat_id = ChatId::from("alice-chat");
        let sent = store.send_message(&chat_id, "ping", None, NOW).expect("send");
        sim.on_message_sent(&store, &sent);

        store.delete_chat(&chat_id).expect("delete");
        sim.on_chat_emptied(&chat_id);
        let changed = sim.advance(&mut store, NOW + 10_000, None);

        assert!(changed.is_empty());
        assert_eq!(sim.pending_steps(), 0);
    }

    #[test]
    fn cleared_history_gets_no_reply() {
        let mut store = store();
        let mut sim = simulator();
        let chat_id = ChatId::from("alice-chat");
        let sent = store.send_message(&chat_id, "ping", None, NOW).expect("send");
        sim.on_message_sent(&store, &sent);

        store.clear_history(&chat_id).expect("clear");
        sim.on_chat_emptied(&chat_id);
        sim.advance(&mut store, NOW + 10_000, None);

        assert!(store.messages(&chat_id).is_empty());
    }

    #[test]
    fn deleting_message_cancels_its_steps() {
        let mut store = store();
        let mut sim = simulator();
        let chat_id = ChatId::from("alice-chat");
        let sent = store.send_message(&chat_id, "ping", None, NOW).expect("send");
        sim.on_message_sent(&store, &sent);

        store.delete_message(&chat_id, &sent.id).expect("delete");
        sim.on_message_deleted(&chat_id, &sent.id);

        assert_eq!(sim.pending_steps(), 0);
    }

    #[test]
    fn closing_chat_cancels_only_when_configured() {
        let mut store = store();
        let chat_id = ChatId::from("alice-chat");
        let sent = store.send_message(&chat_id, "ping", None, NOW).expect("send");

        let mut keep = simulator();
        keep.on_message_sent(&store, &sent);
        keep.on_chat_closed(&chat_id);
        assert_eq!(keep.pending_steps(), 4);

        let config = SimulationConfig {
            cancel_on_close: true,
            ..SimulationConfig::default()
        };
        let mut cancel = DeliverySimulator::new(config, FixedReplyPicker(REPLY));
        cancel.on_message_sent(&store, &sent);
        cancel.on_chat_closed(&chat_id);
        assert_eq!(cancel.pending_steps(), 0);
    }

    #[test]
    fn late_receipt_never_regresses_status() {
        let mut store = store();
        let mut sim = simulator();
        let chat_id = ChatId::from("alice-chat");
        let sent = store.send_message(&chat_id, "ping", None, NOW).expect("send");
        store
            .advance_status(&chat_id, &sent.id, DeliveryStatus::Read)
            .expect("advance");
        sim.on_message_sent(&store, &sent);

        sim.advance(&mut store, NOW + 800, None);

        assert_eq!(status_of(&store, &chat_id, &sent.id), Some(DeliveryStatus::Read));
    }
}
