use crate::domain::ids::{ChatId, MessageId, UserId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepAction {
    MarkSent,
    MarkDelivered,
    StartTyping { name: String },
    /// Mark the message read, stop typing and post a canned answer.
    Reply { counterpart: UserId },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledStep {
    pub due_ms: i64,
    pub chat_id: ChatId,
    pub message_id: MessageId,
    pub action: StepAction,
    seq: u64,
}

/// Pending simulation steps keyed by the message that armed them.
#[derive(Debug, Default)]
pub struct DeliveryScheduler {
    pending: Vec<ScheduledStep>,
    next_seq: u64,
}

impl DeliveryScheduler {
    pub fn schedule(
        &mut self,
        due_ms: i64,
        chat_id: ChatId,
        message_id: MessageId,
        action: StepAction,
    ) {
        self.pending.push(ScheduledStep {
            due_ms,
            chat_id,
            message_id,
            action,
            seq: self.next_seq,
        });
        self.next_seq += 1;
    }

    /// Removes and returns every step due at `now_ms`, earliest first; steps
    /// due at the same instant keep their scheduling order.
    pub fn take_due(&mut self, now_ms: i64) -> Vec<ScheduledStep> {
        let (mut due, pending): (Vec<_>, Vec<_>) = std::mem::take(&mut self.pending)
            .into_iter()
            .partition(|step| step.due_ms <= now_ms);
        self.pending = pending;
        due.sort_by_key(|step| (step.due_ms, step.seq));
        due
    }

    /// Returns how many steps were dropped.
    pub fn cancel_message(&mut self, chat_id: &ChatId, message_id: &MessageId) -> usize {
        self.cancel_where(|step| &step.chat_id == chat_id && &step.message_id == message_id)
    }

    pub fn cancel_chat(&mut self, chat_id: &ChatId) -> usize {
        self.cancel_where(|step| &step.chat_id == chat_id)
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn next_due_ms(&self) -> Option<i64> {
        self.pending.iter().map(|step| step.due_ms).min()
    }

    fn cancel_where(&mut self, predicate: impl Fn(&ScheduledStep) -> bool) -> usize {
        let before = self.pending.len();
        self.pending.retain(|step| !predicate(step));
        before - self.pending.len()
    }
}
