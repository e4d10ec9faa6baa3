//! Message schema exchanged between agents and the hosting platform
//!
//! [`messages`] holds the typed records; [`validation`] converts them to and
//! from untyped JSON at the transport boundary.

pub mod messages;
pub mod validation;

pub use messages::*;
pub use validation::{
    decode, decode_str, encode, encode_pretty, encode_string, json_schema, validator,
};
