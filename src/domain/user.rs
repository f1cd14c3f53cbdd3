use super::ids::UserId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub avatar: Option<String>,
    pub online: bool,
    pub last_seen_ms: Option<i64>,
    /// Present for contacts added by phone number.
    pub phone: Option<String>,
}

impl User {
    pub fn new(id: impl Into<UserId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            avatar: None,
            online: false,
            last_seen_ms: None,
            phone: None,
        }
    }

    pub fn with_online(mut self, online: bool) -> Self {
        self.online = online;
        self
    }

    /// One- or two-letter initials used where an avatar would be drawn.
    pub fn initials(&self) -> String {
        initials_of(&self.name)
    }
}

pub fn initials_of(name: &str) -> String {
    name.split_whitespace()
        .filter_map(|word| word.chars().next())
        .take(2)
        .flat_map(char::to_uppercase)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initials_take_first_letters_of_two_words() {
        assert_eq!(initials_of("alice cooper band"), "AC");
    }

    #[test]
    fn initials_of_single_word_is_one_letter() {
        assert_eq!(User::new("u", "Bob").initials(), "B");
    }

    #[test]
    fn initials_of_blank_name_is_empty() {
        assert_eq!(initials_of("   "), "");
    }
}
