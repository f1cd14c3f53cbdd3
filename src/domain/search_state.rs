use super::ids::MessageId;

/// In-chat message search: query text plus a wrapping cursor over matches.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MessageSearchState {
    query: String,
    results: Vec<MessageId>,
    cursor: usize,
}

impl MessageSearchState {
    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn push_char(&mut self, ch: char) {
        self.query.push(ch);
    }

    pub fn pop_char(&mut self) {
        self.query.pop();
    }

    /// Replaces the matches after the query changed; the cursor restarts at
    /// the first match.
    pub fn set_results(&mut self, results: Vec<MessageId>) {
        self.results = results;
        self.cursor = 0;
    }

    pub fn current(&self) -> Option<&MessageId> {
        self.results.get(self.cursor)
    }

    /// "2/5"-style position, `None` without matches.
    pub fn position_label(&self) -> Option<String> {
        (!self.results.is_empty()).then(|| format!("{}/{}", self.cursor + 1, self.results.len()))
    }

    pub fn next(&mut self) -> Option<&MessageId> {
        if self.results.is_empty() {
            return None;
        }
        self.cursor = (self.cursor + 1) % self.results.len();
        self.current()
    }

    pub fn previous(&mut self) -> Option<&MessageId> {
        if self.results.is_empty() {
            return None;
        }
        self.cursor = (self.cursor + self.results.len() - 1) % self.results.len();
        self.current()
    }
}
