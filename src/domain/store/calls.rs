use super::{ChatStore, StoreError};
use crate::domain::{call::Call, ids::CallId};

impl ChatStore {
    /// Call log, newest first.
    pub fn calls(&self) -> &[Call] {
        &self.calls
    }

    pub fn delete_call(&mut self, call_id: &CallId) -> Result<Call, StoreError> {
        let index = self
            .calls
            .iter()
            .position(|call| &call.id == call_id)
            .ok_or_else(|| StoreError::CallNotFound(call_id.clone()))?;
        Ok(self.calls.remove(index))
    }

    /// Returns how many entries were removed.
    pub fn clear_calls(&mut self) -> usize {
        let cleared = self.calls.len();
        self.calls.clear();
        cleared
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_fixtures::store;
    use super::*;

    #[test]
    fn calls_are_listed_newest_first() {
        let store = store();

        let ids: Vec<&str> = store.calls().iter().map(|call| call.id.as_str()).collect();

        assert_eq!(ids, vec!["call-2", "call-1"]);
    }

    #[test]
    fn delete_removes_one_entry() {
        let mut store = store();

        let removed = store.delete_call(&CallId::from("call-2")).expect("known call");

        assert_eq!(removed.user_name, "Alice");
        assert_eq!(store.calls().len(), 1);
        assert_eq!(
            store.delete_call(&CallId::from("call-2")),
            Err(StoreError::CallNotFound(CallId::from("call-2")))
        );
    }

    #[test]
    fn clear_empties_the_log() {
        let mut store = store();

        assert_eq!(store.clear_calls(), 2);
        assert!(store.calls().is_empty());
    }
}
