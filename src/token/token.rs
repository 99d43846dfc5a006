use crate::algorithm::SignatureAlgorithm;
use crate::claims::{self, StandardClaims};
use crate::error::{Error, UsageError, VerifyError};
use crate::token::header;
use miniserde::json::{Object, Value};

/// A token materialized from JSON
///
/// Holds the decoded header and payload and, when it came off the wire, the
/// exact compact string it was decoded from. Signature verification always
/// runs against that string, never a re-encoding.
#[derive(Debug, Clone)]
pub struct Token {
    header: Object,
    payload: Object,
    token_string: Option<String>,
}

impl Token {
    /// Create a token from JSON the caller already holds
    ///
    /// `token_string` should be the compact string `header` and `payload`
    /// were decoded from; without it the token cannot be verified.
    pub fn new(header: Object, payload: Object, token_string: Option<String>) -> Self {
        Self {
            header,
            payload,
            token_string,
        }
    }

    /// Create a token with an empty header and no token string
    pub fn from_payload(payload: Object) -> Self {
        Self::new(Object::new(), payload, None)
    }

    pub fn header(&self) -> &Object {
        &self.header
    }

    pub fn payload(&self) -> &Object {
        &self.payload
    }

    /// The compact string this token was decoded from
    pub fn token_string(&self) -> Option<&str> {
        self.token_string.as_deref()
    }

    /// Payload member by name, `None` when absent or `null`
    pub fn param(&self, name: &str) -> Option<&Value> {
        claims::get(&self.payload, name)
    }

    pub fn param_as_str(&self, name: &str) -> Option<&str> {
        claims::get_str(&self.payload, name)
    }

    pub fn param_as_i64(&self, name: &str) -> Option<i64> {
        claims::get_i64(&self.payload, name)
    }

    /// Key id (`kid` header)
    pub fn key_id(&self) -> Option<&str> {
        claims::get_str(&self.header, header::KEY_ID)
    }

    /// Token type (`typ` header)
    pub fn token_type(&self) -> Option<&str> {
        claims::get_str(&self.header, header::TYPE)
    }

    /// Signature algorithm named by the `alg` header
    ///
    /// A header without `alg` never came out of the codec and is reported as
    /// misuse; a name outside the supported set is an invalid token.
    pub fn signature_algorithm(&self) -> Result<SignatureAlgorithm, VerifyError> {
        match claims::get(&self.header, header::ALGORITHM) {
            None => Err(UsageError::AlgorithmMissing.into()),
            Some(Value::String(name)) => Ok(SignatureAlgorithm::from_str(name)?),
            Some(_) => Err(Error::ClaimInvalidType {
                claim: header::ALGORITHM,
                expected: "a string",
            }
            .into()),
        }
    }

    /// Split the token string into signing input and signature segment
    pub(crate) fn signed_parts(&self) -> Result<(&str, &str), UsageError> {
        let token_string = self
            .token_string
            .as_deref()
            .ok_or(UsageError::TokenStringMissing)?;
        split_signed_parts(token_string)
    }
}

/// Split `header.payload.signature` into `header.payload` and `signature`
///
/// Anything other than three segments with a non-empty signature means the
/// string carries no signature to check.
pub(crate) fn split_signed_parts(token_string: &str) -> Result<(&str, &str), UsageError> {
    let mut parts = token_string.split('.');
    let (Some(header_b64), Some(payload_b64), Some(signature_b64), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(UsageError::SignatureMissing);
    };

    if signature_b64.is_empty() {
        return Err(UsageError::SignatureMissing);
    }

    let signing_input = &token_string[..header_b64.len() + 1 + payload_b64.len()];
    Ok((signing_input, signature_b64))
}

impl StandardClaims for Token {
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
