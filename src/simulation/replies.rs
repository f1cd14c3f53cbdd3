use rand::seq::SliceRandom;

/// Canned answers of the simulated counterpart.
pub const BOT_REPLIES: [&str; 8] = [
    "That's interesting! Tell me more.",
    "I understand. What do you think about that?",
    "Great point! Here's my perspective...",
    "Thanks for sharing! I'll get back to you shortly.",
    "Absolutely! Let's discuss this further.",
    "I'm not sure I follow. Could you explain?",
    "That makes sense. What's next?",
    "Perfect! I'll take care of it.",
];

pub trait ReplyPicker {
    fn pick(&mut self) -> &'static str;
}

/// Uniform choice over [`BOT_REPLIES`].
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomReplyPicker;

impl ReplyPicker for RandomReplyPicker {
    fn pick(&mut self) -> &'static str {
        BOT_REPLIES
            .choose(&mut rand::thread_rng())
            .copied()
            .unwrap_or(BOT_REPLIES[0])
    }
}

#[cfg(test)]
#[derive(Debug, Clone, Copy)]
pub struct FixedReplyPicker(pub &'static str);

#[cfg(test)]
impl ReplyPicker for FixedReplyPicker {
    fn pick(&mut self) -> &'static str {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_picker_stays_within_phrase_list() {
        let mut picker = RandomReplyPicker;

        for _ in 0..50 {
            assert!(BOT_REPLIES.contains(&picker.pick()));
        }
    }
}
