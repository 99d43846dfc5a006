//! # jsontoken - Signed JSON Tokens
//!
//! **jsontoken** issues and verifies compact, signed JSON tokens: a header naming the signing
//! algorithm and key, a payload of claims, and a signature binding the two.
//!
//! ## Overview
//!
//! A token travels as `base64url(header).base64url(payload).base64url(signature)`. Verifying one
//! means deciding whether an untrusted string is well-formed, signed by a key its issuer
//! controls, valid at the current time, and acceptable to caller policy. **jsontoken** runs these
//! decisions as a fixed pipeline, available as a blocking [`TokenParser`] and a non-blocking
//! [`AsyncTokenParser`]:
//!
//! ```text
//! token string
//!     │ deserialize      (codec: segments, Base64URL, JSON, reserved claim types)
//!     ▼
//! Token
//!     │ alg header       ─▶ algorithm
//!     │ discovery        ─▶ provider ─▶ candidate verifiers for (iss, kid)
//!     │ signature        ─▶ any candidate accepts
//!     │ time window      ─▶ iat / exp with clock skew
//!     │ checkers         ─▶ all pass, first failure wins
//!     ▼
//! verified Token
//! ```
//!
//! ## Quick Start
//!
//! ```ignore
//! use jsontoken::*;
//! use std::sync::Arc;
//!
//! // Issue
//! let signer = HmacSha256Signer::new(b"secret".to_vec())
//!     .with_issuer("google.com")
//!     .with_key_id("key2");
//! let mut builder = TokenBuilder::new(Arc::new(signer));
//! builder.set_audience("http://www.google.com").set_expiration(now + 60);
//! let token_string = builder.serialize_and_sign()?;
//!
//! // Verify
//! let provider = StaticVerifierProvider::new()
//!     .with_key_verifier("google.com", "key2", Arc::new(HmacSha256Verifier::new(b"secret".to_vec())));
//! let parser = TokenParser::new(
//!     VerifierRegistry::new().with(SignatureAlgorithm::HS256, Arc::new(provider)),
//! )
//! .checker(AudienceChecker::new(["http://www.google.com"]));
//!
//! let token = parser.verify_and_deserialize(&token_string)?;
//! assert_eq!(token.issuer(), Some("google.com"));
//! ```
//!
//! ## Errors
//!
//! Failures come back as [`VerifyError`], which separates two families:
//!
//! - [`VerifyError::Invalid`]: the token is invalid. [`Error::code`] classifies it as one of
//!   [`ErrorCode`]: malformed token string, unsupported algorithm, no verifier, bad signature,
//!   policy failure, or unknown.
//! - [`VerifyError::Misuse`]: the caller handed the engine something that never came out of
//!   `deserialize`, such as a token without a signature or without an `alg` header. This is an
//!   integration bug, not a verdict on the token.
//!
//! ## Signing
//!
//! Only a [`TokenBuilder`] can be signed. A [`Token`] decoded from the wire has no signer and no
//! way to get one, so re-signing borrowed claims under a different key does not compile.
//!
//! ## Features
//!
//! - **HMAC** (always enabled): HS256
//! - **`rs256`** (default): RS256 through `aws-lc-rs`
//! - **`cache`** (default): [`CachingVerifierProvider`](discovery::CachingVerifierProvider), a
//!   `moka` cache in front of a non-blocking provider
//!
//! ## Security
//!
//! ### Timing Attack Protection
//!
//! HMAC signature verification uses constant-time comparison via the [`constant_time_eq`](https://crates.io/crates/constant_time_eq)
//! crate.
//!
//! ### Bounded Input
//!
//! Token length, decoded header and payload size, and `alg` / `kid` length are bounded before
//! any JSON is parsed. Clock skew is capped at 300 seconds.

// Core modules
pub mod error;
mod limits;
mod utils;

// Algorithm system
pub mod algorithm;

// Token model and claims
pub mod claims;
pub mod clock;
pub mod token;

// Discovery and policy
pub mod checker;
pub mod discovery;

// Engines
mod async_parser;
mod parser;
mod pipeline;

// ============================================================================
// PUBLIC API
// ============================================================================

pub use async_parser::AsyncTokenParser;
pub use parser::TokenParser;

pub use algorithm::hmac::{HmacSha256Signer, HmacSha256Verifier};
#[cfg(feature = "rs256")]
pub use algorithm::rsa::{RsaSha256Signer, RsaSha256Verifier};
pub use algorithm::{SignatureAlgorithm, Signer, Verifier, Verifiers};

pub use checker::{AudienceChecker, Checker, Checkers, IgnoreAudience};
pub use claims::{StandardClaims, TimeValidator};
pub use clock::{Clock, FixedClock, SystemClock};
pub use discovery::{
    AsyncVerifierProvider, AsyncVerifierProviders, AsyncVerifierRegistry, ImmediateProvider,
    StaticVerifierProvider, VerifierProvider, VerifierProviders, VerifierRegistry,
};
pub use error::{Error, ErrorCode, Result, UsageError, VerifyError};
pub use limits::{DEFAULT_CLOCK_SKEW_SECONDS, MAX_CLOCK_SKEW_SECONDS};
pub use token::{Token, TokenBuilder};
