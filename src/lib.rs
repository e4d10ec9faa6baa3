//! Agent Schema
//!
//! Typed message schema exchanged between an agent and the platform hosting it.
//!
//! # Overview
//!
//! - [`protocol::Embed`] - a typed reference (content type + URI) to a binary object
//! - [`protocol::Message`] - text plus named embeds
//! - [`protocol::AgentQuery`] - an inbound request with an optional user access token
//! - [`protocol::AgentResponse`] - an agent's reply
//! - [`storage::user_storage`] - a handle scoping key-value storage to the query's user
//!
//! Records are validated when built: in Rust through their constructors and
//! field types, at the JSON boundary through [`protocol::decode`].
//!
//! # Quick Start
//!
//! ```rust
//! use agent_schema::protocol::{decode, encode, AgentQuery};
//! use agent_schema::storage::user_storage;
//! use serde_json::json;
//!
//! let payload = json!({
//!     "message": {
//!         "text": "hello",
//!         "embeds": {"img": {"content_type": "image/png", "uri": "https://x/y.png"}}
//!     },
//!     "access_token": "tok"
//! });
//!
//! let query: AgentQuery = decode(&payload).unwrap();
//! assert_eq!(query.message.embeds["img"].content_type, "image/png");
//!
//! let storage = user_storage(&query, "agent-1");
//! assert_eq!(storage.access_token(), Some("tok"));
//!
//! assert_eq!(encode(&query).unwrap(), payload);
//! ```

pub mod config;
pub mod error;
pub mod observability;
pub mod protocol;
pub mod storage;

pub use config::{ConfigError, SchemaToolConfig};
pub use error::{PayloadError, SchemaResult, SchemaValidationError, Violation};
pub use protocol::*;
pub use storage::{user_storage, UserStorage};
