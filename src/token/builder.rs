use crate::algorithm::Signer;
use crate::claims::{self, AUDIENCE, EXPIRATION, ISSUED_AT, ISSUER, StandardClaims};
use crate::error::Result;
use crate::token::{codec, header};
use crate::utils::base64url;
use miniserde::json::{Object, Value};
use std::sync::Arc;

/// A token under construction
///
/// Owns the signer whose identity it is issued under. The issuer claim is
/// taken from the signer when it has one; the key id goes into the header
/// at signing time.
#[derive(Clone)]
pub struct TokenBuilder {
    signer: Arc<dyn Signer>,
    token_type: Option<String>,
    payload: Object,
}

impl TokenBuilder {
    pub fn new(signer: Arc<dyn Signer>) -> Self {
        let mut payload = Object::new();
        if let Some(issuer) = signer.issuer() {
            payload.insert(ISSUER.to_string(), Value::String(issuer.to_string()));
        }

        Self {
            signer,
            token_type: None,
            payload,
        }
    }

    /// Set the `typ` header
    pub fn token_type(&mut self, token_type: impl Into<String>) -> &mut Self {
        self.token_type = Some(token_type.into());
        self
    }

    /// Set an application claim, replacing any previous value
    pub fn set_param(&mut self, name: impl Into<String>, value: Value) -> &mut Self {
        self.payload.insert(name.into(), value);
        self
    }

    pub fn set_audience(&mut self, audience: impl Into<String>) -> &mut Self {
        self.set_param(AUDIENCE, Value::String(audience.into()))
    }

    /// Set issued-at, in seconds since epoch
    pub fn set_issued_at(&mut self, seconds: i64) -> &mut Self {
        self.set_param(ISSUED_AT, claims::timestamp_value(seconds))
    }

    /// Set expiration, in seconds since epoch
    pub fn set_expiration(&mut self, seconds: i64) -> &mut Self {
        self.set_param(EXPIRATION, claims::timestamp_value(seconds))
    }

    pub fn payload(&self) -> &Object {
        &self.payload
    }

    /// Header the token will be signed with
    pub fn header(&self) -> Object {
        header::for_signer(self.signer.as_ref(), self.token_type.as_deref())
    }

    /// Sign the current claims and return the compact token string
    #[tracing::instrument(skip(self), fields(alg = %self.signer.algorithm()))]
    pub fn serialize_and_sign(&self) -> Result<String> {
        let signing_input = codec::signing_input(&self.header(), &self.payload);
        let signature = self.signer.sign(signing_input.as_bytes())?;

        tracing::debug!(
            kid = self.signer.key_id(),
            signature_len = signature.len(),
            "Signed token"
        );

        Ok(format!(
            "{signing_input}.{}",
            base64url::encode_bytes(signature)
        ))
    }
}

impl std::fmt::Debug for TokenBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenBuilder")
            .field("algorithm", &self.signer.algorithm())
            .field("key_id", &self.signer.key_id())
            .field("token_type", &self.token_type)
            .field("payload", &self.payload)
            .finish()
    }
}

impl StandardClaims for TokenBuilder {
    fn issuer(&self) -> Option<&str> {
        self.payload.issuer()
    }

    fn audience(&self) -> Option<&str> {
        self.payload.audience()
    }

    fn issued_at(&self) -> Option<i64> {
        self.payload.issued_at()
    }

    fn expiration(&self) -> Option<i64> {
        self.payload.expiration()
    }
}
