//! User-scoped storage handles
//!
//! A [`UserStorage`] is a capability reference: it pairs a query (and through it
//! the end user's access token) with the agent asking for storage. It holds no
//! connection and performs no I/O. The storage service that resolves the handle
//! into a key-value store owns reads, writes and token checks.

use crate::protocol::AgentQuery;
use tracing::debug;

/// Handle scoping a persistent key-value store to one user and one agent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserStorage<'q> {
    query: &'q AgentQuery,
    agent_id: &'q str,
}

impl<'q> UserStorage<'q> {
    pub fn new(query: &'q AgentQuery, agent_id: &'q str) -> Self {
        Self { query, agent_id }
    }

    /// The query this handle was created from
    pub fn query(&self) -> &'q AgentQuery {
        self.query
    }

    /// The agent requesting storage
    pub fn agent_id(&self) -> &'q str {
        self.agent_id
    }

    /// Token identifying the user whose storage is addressed, if the query carried one
    pub fn access_token(&self) -> Option<&'q str> {
        self.query.access_token.as_deref()
    }
}

/// Build the storage handle for the user behind `query`, on behalf of `agent_id`
///
/// Nothing is validated or opened here; a missing or rejected token surfaces
/// when the storage service uses the handle.
///
/// # Examples
/// ```
/// use agent_schema::protocol::{AgentQuery, Message};
/// use agent_schema::storage::user_storage;
///
/// let query = AgentQuery::new(Message::new("hi")).with_access_token("tok");
/// let storage = user_storage(&query, "agent-1");
///
/// assert_eq!(storage.agent_id(), "agent-1");
/// assert_eq!(storage.access_token(), Some("tok"));
/// ```
pub fn user_storage<'q>(query: &'q AgentQuery, agent_id: &'q str) -> UserStorage<'q> {
    debug!(
        agent_id = %agent_id,
        has_access_token = query.access_token.is_some(),
        "Created user storage handle"
    );
    UserStorage::new(query, agent_id)
}
