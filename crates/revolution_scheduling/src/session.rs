// File: crates/revolution_scheduling/src/session.rs

/// Source of the signed-in client's identity.
///
/// The form asks it again on every submit: the id cached in a draft may be
/// stale after a re-login.
#[cfg_attr(test, mockall::automock)]
pub trait AuthSession: Send + Sync {
    /// The current client id, or `None` when nobody is signed in.
    fn current_client_id(&self) -> Option<String>;
}

/// A session whose identity is fixed when it is created, e.g. from a request header.
#[derive(Debug, Clone, Default)]
pub struct StaticSession {
    client_id: Option<String>,
}

impl StaticSession {
    pub fn new(client_id: Option<String>) -> Self {
        // Blank ids are treated as signed out.
        let client_id = client_id.filter(|id| !id.trim().is_empty());
        Self { client_id }
    }

    pub fn anonymous() -> Self {
        Self::default()
    }
}

impl AuthSession for StaticSession {
    fn current_client_id(&self) -> Option<String> {
        self.client_id.clone()
    }
}
