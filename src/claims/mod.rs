//! Reserved claims and their typed accessors
//!
//! Payloads are open JSON objects. The four reserved claims are read through
//! [`StandardClaims`]; everything else is an opaque application claim.

mod validator;

pub use validator::TimeValidator;

use miniserde::json::{Number, Object, Value};

/// Issuer claim name
pub const ISSUER: &str = "iss";
/// Audience claim name
pub const AUDIENCE: &str = "aud";
/// Issued-at claim name
pub const ISSUED_AT: &str = "iat";
/// Expiration claim name
pub const EXPIRATION: &str = "exp";

/// The `StandardClaims` trait defines the reserved payload claims.
///
/// A JSON `null` reads the same as an absent claim.
pub trait StandardClaims {
    /// Issuer (iss) - identifies the principal that issued the token
    fn issuer(&self) -> Option<&str>;
    /// Audience (aud) - identifies the recipient the token is intended for
    fn audience(&self) -> Option<&str>;
    /// Issued At (iat) - seconds since Unix epoch
    fn issued_at(&self) -> Option<i64>;
    /// Expiration Time (exp) - seconds since Unix epoch
    fn expiration(&self) -> Option<i64>;
}

impl StandardClaims for Object {
    fn issuer(&self) -> Option<&str> {
        get_str(self, ISSUER)
    }

    fn audience(&self) -> Option<&str> {
        get_str(self, AUDIENCE)
    }

    fn issued_at(&self) -> Option<i64> {
        get_i64(self, ISSUED_AT)
    }

    fn expiration(&self) -> Option<i64> {
        get_i64(self, EXPIRATION)
    }
}

/// Look up a member, treating `null` as absent
pub(crate) fn get<'a>(object: &'a Object, name: &str) -> Option<&'a Value> {
    match object.get(name) {
        None | Some(Value::Null) => None,
        Some(value) => Some(value),
    }
}

pub(crate) fn get_str<'a>(object: &'a Object, name: &str) -> Option<&'a str> {
    match get(object, name) {
        Some(Value::String(s)) => Some(s.as_str()),
        _ => None,
    }
}

pub(crate) fn get_i64(object: &Object, name: &str) -> Option<i64> {
    match get(object, name) {
        Some(Value::Number(number)) => number_as_i64(number),
        _ => None,
    }
}

/// Integer value of a JSON number, `None` for fractions and out-of-range values
pub(crate) fn number_as_i64(number: &Number) -> Option<i64> {
    match number {
        Number::U64(n) => i64::try_from(*n).ok(),
        Number::I64(n) => Some(*n),
        Number::F64(_) => None,
    }
}

/// JSON number for a timestamp
pub(crate) fn timestamp_value(seconds: i64) -> Value {
    match u64::try_from(seconds) {
        Ok(n) => Value::Number(Number::U64(n)),
        Err(_) => Value::Number(Number::I64(seconds)),
    }
}
