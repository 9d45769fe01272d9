use serde::Serialize;

pub mod dispatch;
pub mod store;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One message in the conversation. Fields are fixed at construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Turn {
    role: Role,
    content: String,
}

impl Turn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn content(&self) -> &str {
        &self.content
    }
}

#[cfg(test)]
mod tests {
    use super::{Role, Turn};

    #[test]
    fn turn_serializes_with_lowercase_role() {
        let turn = Turn::assistant("hello");
        let json = serde_json::to_value(&turn).expect("turn should serialize");
        assert_eq!(json, serde_json::json!({"role": "assistant", "content": "hello"}));
        assert_eq!(Turn::user("hi").role(), Role::User);
    }
}
