//! Message types exchanged between an agent and its hosting platform
//!
//! This module defines the records carried over the wire: the inbound
//! [`AgentQuery`], the outbound [`AgentResponse`], the [`Message`] both of them
//! wrap, and the [`Embed`] references a message may carry.
//!
//! Field types are enforced by the compiler. The one invariant the type system
//! cannot express on a plain `String`, a non-empty content type, lives in the
//! [`ContentType`] newtype, so every `Embed` in existence is valid.

use crate::error::{SchemaResult, SchemaValidationError};
use schemars::gen::SchemaGenerator;
use schemars::schema::Schema;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Content type of an embedded object, e.g. `"image/png"` or `"application/json"`
///
/// Always non-empty. Build one with [`ContentType::new`] or `TryFrom<String>`;
/// deserialization goes through the same check.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ContentType(String);

impl ContentType {
    pub fn new<S: Into<String>>(content_type: S) -> SchemaResult<Self> {
        let content_type = content_type.into();
        if content_type.is_empty() {
            return Err(SchemaValidationError::single(
                "/content_type",
                "a non-empty string",
                "empty string",
            ));
        }
        Ok(Self(content_type))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ContentType {
    type Error = SchemaValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ContentType> for String {
    fn from(value: ContentType) -> Self {
        value.0
    }
}

impl AsRef<str> for ContentType {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl PartialEq<str> for ContentType {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for ContentType {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl JsonSchema for ContentType {
    fn is_referenceable() -> bool {
        false
    }

    fn schema_name() -> String {
        "ContentType".to_string()
    }

    fn json_schema(gen: &mut SchemaGenerator) -> Schema {
        let mut schema = <String>::json_schema(gen).into_object();
        schema.string().min_length = Some(1);
        schema.into()
    }
}

/// A binary object attached to a [`Message`]
///
/// # Examples
/// ```
/// use agent_schema::protocol::Embed;
///
/// let embed = Embed::new("image/png", "https://example.com/cat.png").unwrap();
/// assert_eq!(embed.content_type, "image/png");
///
/// assert!(Embed::new("", "https://example.com/cat.png").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Embed {
    /// The MIME content type of the object
    pub content_type: ContentType,
    /// Location the object can be downloaded from
    pub uri: String,
}

impl Embed {
    /// Create an embed, rejecting an empty content type
    pub fn new<C, U>(content_type: C, uri: U) -> SchemaResult<Self>
    where
        C: Into<String>,
        U: Into<String>,
    {
        Ok(Self {
            content_type: ContentType::new(content_type)?,
            uri: uri.into(),
        })
    }
}

/// A single message sent to or from an agent
///
/// `embeds` defaults to an empty map, both for [`Message::new`] and when the
/// field is omitted from a serialized payload.
///
/// # Examples
/// ```
/// use agent_schema::protocol::{Embed, Message};
///
/// let message = Message::new("Here is the chart")
///     .with_embed("chart", Embed::new("image/png", "https://example.com/c.png").unwrap());
///
/// assert_eq!(message.embeds.len(), 1);
/// assert_eq!(message.embeds["chart"].uri, "https://example.com/c.png");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Message {
    /// Human-readable text of the message
    pub text: String,
    /// Embedded objects keyed by embed name
    #[serde(default)]
    pub embeds: BTreeMap<String, Embed>,
}

impl Message {
    pub fn new<S: Into<String>>(text: S) -> Self {
        Self {
            text: text.into(),
            embeds: BTreeMap::new(),
        }
    }

    /// Attach an embed, replacing any previous embed under the same key
    pub fn with_embed<K: Into<String>>(mut self, key: K, embed: Embed) -> Self {
        self.embeds.insert(key.into(), embed);
        self
    }
}

/// A standalone query sent to an agent
///
/// The access token identifies the end user the query was created for. Agents
/// that call other agents or platform services forward it unchanged so the
/// downstream call can be tied back to that user.
///
/// # Examples
/// ```
/// use agent_schema::protocol::{AgentQuery, Message};
///
/// let query = AgentQuery::new(Message::new("hi")).with_access_token("tok");
/// assert_eq!(query.access_token.as_deref(), Some("tok"));
///
/// let anonymous = AgentQuery::new(Message::new("hi"));
/// assert!(anonymous.access_token.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct AgentQuery {
    /// The contents of the query
    pub message: Message,
    /// Token of the user on whose behalf the query was made
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
}

impl AgentQuery {
    pub fn new(message: Message) -> Self {
        Self {
            message,
            access_token: None,
        }
    }

    pub fn with_access_token<S: Into<String>>(mut self, access_token: S) -> Self {
        self.access_token = Some(access_token.into());
        self
    }
}

/// A response message returned by an agent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct AgentResponse {
    /// The reply payload
    pub message: Message,
}

impl AgentResponse {
    pub fn new(message: Message) -> Self {
        Self { message }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn chart_embed() -> Embed {
        Embed::new("image/png", "https://example.com/chart.png").unwrap()
    }

    #[test]
    fn test_embed_serialization() {
        let embed = chart_embed();

        let json = serde_json::to_string(&embed).unwrap();
        let parsed: Embed = serde_json::from_str(&json).unwrap();

        assert_eq!(embed, parsed);
        assert_eq!(
            serde_json::to_value(&embed).unwrap(),
            json!({"content_type": "image/png", "uri": "https://example.com/chart.png"})
        );
    }

    #[test]
    fn test_embed_rejects_empty_content_type() {
        let error = Embed::new("", "https://example.com/x").unwrap_err();
        assert!(error.mentions("/content_type"));
    }

    #[test]
    fn test_empty_content_type_rejected_by_serde() {
        let result: Result<Embed, _> =
            serde_json::from_value(json!({"content_type": "", "uri": "https://x"}));
        assert!(result.is_err());
    }

    #[test]
    fn test_content_type_accessors() {
        let content_type = ContentType::new("application/json").unwrap();

        assert_eq!(content_type.as_str(), "application/json");
        assert_eq!(content_type.to_string(), "application/json");
        assert_eq!(content_type, "application/json");
        assert_eq!(String::from(content_type), "application/json");
    }

    #[test]
    fn test_message_embeds_default_to_empty() {
        let message = Message::new("hello");
        assert!(message.embeds.is_empty());

        let parsed: Message = serde_json::from_value(json!({"text": "hello"})).unwrap();
        assert!(parsed.embeds.is_empty());
        assert_eq!(parsed, message);
    }

    #[test]
    fn test_message_with_embeds_roundtrip() {
        let message = Message::new("two attachments")
            .with_embed("chart", chart_embed())
            .with_embed(
                "data",
                Embed::new("application/json", "https://example.com/data.json").unwrap(),
            );

        let json = serde_json::to_string(&message).unwrap();
        let parsed: Message = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed, message);
        assert_eq!(parsed.embeds["data"].content_type, "application/json");
        assert_eq!(parsed.embeds["chart"].uri, "https://example.com/chart.png");
    }

    #[test]
    fn test_with_embed_replaces_existing_key() {
        let message = Message::new("x")
            .with_embed("img", chart_embed())
            .with_embed("img", Embed::new("image/jpeg", "https://example.com/a.jpg").unwrap());

        assert_eq!(message.embeds.len(), 1);
        assert_eq!(message.embeds["img"].content_type, "image/jpeg");
    }

    #[test]
    fn test_query_without_token_omits_field() {
        let query = AgentQuery::new(Message::new("hi"));

        let value = serde_json::to_value(&query).unwrap();
        assert_eq!(value, json!({"message": {"text": "hi", "embeds": {}}}));
    }

    #[test]
    fn test_query_accepts_null_token() {
        let query: AgentQuery =
            serde_json::from_value(json!({"message": {"text": "hi"}, "access_token": null}))
                .unwrap();
        assert!(query.access_token.is_none());
    }

    #[test]
    fn test_query_requires_message() {
        let result: Result<AgentQuery, _> =
            serde_json::from_value(json!({"access_token": "tok"}));
        assert!(result.is_err());
    }

    #[test]
    fn test_response_serialization() {
        let response = AgentResponse::new(Message::new("done").with_embed("chart", chart_embed()));

        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["message"]["text"], "done");
        assert_eq!(value["message"]["embeds"]["chart"]["content_type"], "image/png");

        let parsed: AgentResponse = serde_json::from_value(value).unwrap();
        assert_eq!(parsed, response);
    }

    #[test]
    fn test_wire_field_names() {
        let query = AgentQuery::new(Message::new("hi").with_embed("img", chart_embed()))
            .with_access_token("tok");

        let json = serde_json::to_string(&query).unwrap();

        for field in ["text", "embeds", "content_type", "uri", "message", "access_token"] {
            assert!(json.contains(&format!("\"{field}\"")), "missing {field}");
        }
    }

    proptest! {
        #[test]
        fn embed_roundtrips(
            content_type in "[a-z]{1,12}/[a-z0-9.+-]{1,24}",
            uri in "\\PC*",
        ) {
            let embed = Embed::new(content_type, uri).unwrap();
            let json = serde_json::to_string(&embed).unwrap();
            let parsed: Embed = serde_json::from_str(&json).unwrap();
            prop_assert_eq!(parsed, embed);
        }

        #[test]
        fn content_type_accepts_any_non_empty_string(content_type in "\\PC{1,40}") {
            prop_assert!(ContentType::new(content_type).is_ok());
        }

        #[test]
        fn message_embeds_preserved(
            text in "\\PC*",
            keys in proptest::collection::btree_set("[a-z_]{1,10}", 0..6),
        ) {
            let message = keys.iter().fold(Message::new(text), |message, key| {
                message.with_embed(key.clone(), Embed::new("text/plain", format!("https://x/{key}")).unwrap())
            });

            let json = serde_json::to_string(&message).unwrap();
            let parsed: Message = serde_json::from_str(&json).unwrap();

            prop_assert_eq!(parsed.embeds.keys().cloned().collect::<Vec<_>>(), keys.into_iter().collect::<Vec<_>>());
            prop_assert_eq!(parsed, message);
        }
    }
}
