use crate::algorithm::Signer;
use miniserde::json::{Object, Value};

/// Algorithm header name
pub const ALGORITHM: &str = "alg";
/// Token type header name
pub const TYPE: &str = "typ";
/// Key id header name
pub const KEY_ID: &str = "kid";

/// Header for a token signed by `signer`
///
/// `kid` is only written when the signer carries a key id.
pub(crate) fn for_signer(signer: &dyn Signer, token_type: Option<&str>) -> Object {
    let mut header = Object::new();
    header.insert(
        ALGORITHM.to_string(),
        Value::String(signer.algorithm().as_str().to_string()),
    );
    if let Some(kid) = signer.key_id() {
        header.insert(KEY_ID.to_string(), Value::String(kid.to_string()));
    }
    if let Some(typ) = token_type {
        header.insert(TYPE.to_string(), Value::String(typ.to_string()));
    }
    header
}
