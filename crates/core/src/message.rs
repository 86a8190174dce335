use serde::{Deserialize, Serialize};

/// Who produced an utterance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The human at the keyboard
    User,
    /// The remote chat service (replies, placeholders, network errors)
    #[default]
    System,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::System => "system",
        }
    }

    /// Map a free-form role string from the history endpoint.
    ///
    /// Only `user` is special; every other role renders on the system side.
    pub fn from_wire(role: &str) -> Self {
        if role.trim().eq_ignore_ascii_case("user") { Role::User } else { Role::System }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One rendered line of conversation. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Utterance {
    role: Role,
    content: String,
}

impl Utterance {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self { role, content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn content(&self) -> &str {
        &self.content
    }
}

/// Unsplit reply or history record, possibly packing several utterances
/// separated by the sentinel character.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawPayload {
    pub role: Role,
    pub content: String,
}

impl RawPayload {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self { role, content: content.into() }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }
}
