//! Compact wire format: `base64url(header).base64url(payload).base64url(signature)`
//!
//! Decoding checks structure and reserved member types only. The signature
//! segment is kept verbatim inside the token string and may be empty; its
//! shape is a verification concern.

use crate::claims::{self, AUDIENCE, EXPIRATION, ISSUED_AT, ISSUER};
use crate::error::{Error, Result};
use crate::limits::{
    MAX_ALG_LENGTH, MAX_DECODED_HEADER_SIZE, MAX_DECODED_PAYLOAD_SIZE, MAX_KID_LENGTH,
    MAX_TOKEN_LENGTH,
};
use crate::token::{Token, header};
use crate::utils::base64url;
use crate::utils::bounds::validate_field_size;
use miniserde::json::{self, Object, Value};

/// Decode a compact token string
///
/// The returned token keeps `token_string` byte-for-byte.
pub fn decode(token_string: &str) -> Result<Token> {
    if token_string.len() > MAX_TOKEN_LENGTH {
        return Err(Error::TokenTooLarge {
            size: token_string.len(),
            max: MAX_TOKEN_LENGTH,
        });
    }

    let mut parts = token_string.split('.');
    let header_b64 = parts.next().ok_or(Error::FormatInvalid)?;
    let payload_b64 = parts.next().ok_or(Error::FormatInvalid)?;
    parts.next().ok_or(Error::FormatInvalid)?;
    if parts.next().is_some() {
        return Err(Error::FormatInvalid);
    }

    let header = decode_object(header_b64, "header", MAX_DECODED_HEADER_SIZE)?;
    check_header(&header)?;

    let payload = decode_object(payload_b64, "payload", MAX_DECODED_PAYLOAD_SIZE)?;
    check_payload(&payload)?;

    Ok(Token::new(header, payload, Some(token_string.to_string())))
}

/// Encode header, payload and signature into a compact token string
pub fn encode(header: &Object, payload: &Object, signature: &[u8]) -> String {
    let signing_input = signing_input(header, payload);
    format!("{signing_input}.{}", base64url::encode_bytes(signature))
}

/// `base64url(header).base64url(payload)`
pub(crate) fn signing_input(header: &Object, payload: &Object) -> String {
    format!(
        "{}.{}",
        base64url::encode_bytes(json::to_string(header)),
        base64url::encode_bytes(json::to_string(payload))
    )
}

fn decode_object(segment_b64: &str, segment: &'static str, max_size: usize) -> Result<Object> {
    let bytes = base64url::decode_bytes(segment_b64, max_size)?;
    let text =
        String::from_utf8(bytes).map_err(|source| Error::FormatInvalidUtf8 { segment, source })?;

    match json::from_str::<Value>(&text) {
        Ok(Value::Object(object)) => Ok(object),
        Ok(_) => Err(Error::FormatNotObject(segment)),
        Err(source) => Err(Error::FormatInvalidJson { segment, source }),
    }
}

fn check_header(header: &Object) -> Result<()> {
    if let Some(alg) = optional_str(header, header::ALGORITHM)? {
        validate_field_size(header::ALGORITHM, alg, MAX_ALG_LENGTH)?;
    }
    if let Some(kid) = optional_str(header, header::KEY_ID)? {
        validate_field_size(header::KEY_ID, kid, MAX_KID_LENGTH)?;
    }
    optional_str(header, header::TYPE)?;
    Ok(())
}

fn check_payload(payload: &Object) -> Result<()> {
    optional_str(payload, ISSUER)?;
    optional_str(payload, AUDIENCE)?;
    optional_i64(payload, ISSUED_AT)?;
    optional_i64(payload, EXPIRATION)?;
    Ok(())
}

fn optional_str<'a>(object: &'a Object, name: &'static str) -> Result<Option<&'a str>> {
    match claims::get(object, name) {
        None => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.as_str())),
        Some(_) => Err(Error::ClaimInvalidType {
            claim: name,
            expected: "a string",
        }),
    }
}

fn optional_i64(object: &Object, name: &'static str) -> Result<Option<i64>> {
    let invalid = || Error::ClaimInvalidType {
        claim: name,
        expected: "integer seconds since epoch",
    };
    match claims::get(object, name) {
        None => Ok(None),
        Some(Value::Number(number)) => claims::number_as_i64(number).map(Some).ok_or_else(invalid),
        Some(_) => Err(invalid()),
    }
}
