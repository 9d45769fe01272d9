use crate::session::Turn;

/// In-memory transcript for one window session. Nothing is written to disk.
#[derive(Debug, Clone, Default)]
pub struct Conversation {
    turns: Vec<Turn>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    pub fn all(&self) -> &[Turn] {
        &self.turns
    }

    pub fn clear(&mut self) {
        self.turns.clear();
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::Conversation;
    use crate::session::{Role, Turn};

    #[test]
    fn append_keeps_insertion_order_and_duplicates() {
        let mut conversation = Conversation::new();
        conversation.append(Turn::user("same"));
        conversation.append(Turn::assistant("reply"));
        conversation.append(Turn::user("same"));

        let roles: Vec<Role> = conversation.all().iter().map(Turn::role).collect();
        assert_eq!(roles, vec![Role::User, Role::Assistant, Role::User]);
        assert_eq!(conversation.all()[0], conversation.all()[2]);
        assert_eq!(conversation.len(), 3);
    }

    #[test]
    fn clear_empties_any_size() {
        let mut conversation = Conversation::new();
        for index in 0..50 {
            conversation.append(Turn::user(format!("question {index}")));
        }
        conversation.clear();
        assert!(conversation.is_empty());
        assert!(conversation.all().is_empty());

        conversation.clear();
        assert_eq!(conversation.len(), 0);
    }
}
