//! Token model
//!
//! A [`Token`] is materialized from wire bytes and immutable. A
//! [`TokenBuilder`] is a token under construction that owns a signer. The
//! two never convert into each other, so a deserialized token cannot be
//! re-signed.

mod builder;
pub mod codec;
pub mod header;
#[allow(clippy::module_inception)]
mod token;

pub use builder::TokenBuilder;
pub use token::Token;
pub(crate) use token::split_signed_parts;
