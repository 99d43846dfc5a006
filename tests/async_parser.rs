mod common;

use common::*;
use futures::executor::block_on;
#[cfg(feature = "cache")]
use jsontoken::discovery::CachingVerifierProvider;
use jsontoken::discovery::VerifierFuture;
use jsontoken::*;
use miniserde::json::Object;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

fn verify(parser: &AsyncTokenParser, token_string: &str) -> std::result::Result<Token, VerifyError> {
    block_on(parser.verify_and_deserialize(token_string))
}

fn code_of(parser: &AsyncTokenParser, token_string: &str) -> Option<ErrorCode> {
    verify(parser, token_string).unwrap_err().code()
}

// ============================================================================
// Outcomes
// ============================================================================

#[test]
fn test_verify_success() {
    let token = verify(&async_parser(), TOKEN_STRING).unwrap();
    assert_full_token(&token);
}

#[test]
fn test_verify_bad_signature() {
    assert_eq!(
        code_of(&async_parser(), TOKEN_STRING_BAD_SIG),
        Some(ErrorCode::BadSignature)
    );
    assert_eq!(
        code_of(&async_parser(), TOKEN_STRING_TAMPERED),
        Some(ErrorCode::BadSignature)
    );
}

#[test]
fn test_verify_unsupported_algorithm() {
    let parser = AsyncTokenParser::new(AsyncVerifierRegistry::new())
        .clock(FixedClock(NOW))
        .checker(IgnoreAudience);
    assert_eq!(
        code_of(&parser, TOKEN_STRING),
        Some(ErrorCode::UnsupportedAlgorithm)
    );
}

#[test]
fn test_verify_no_verifier() {
    let parser = AsyncTokenParser::new(async_registry(StaticVerifierProvider::new()))
        .clock(FixedClock(NOW))
        .checker(IgnoreAudience);
    assert_eq!(code_of(&parser, TOKEN_STRING), Some(ErrorCode::NoVerifier));
}

#[test]
fn test_verify_malformed() {
    assert_eq!(
        code_of(&async_parser(), TOKEN_STRING_2PARTS),
        Some(ErrorCode::MalformedTokenString)
    );
    assert_eq!(
        code_of(&async_parser(), TOKEN_STRING_CORRUPT_HEADER),
        Some(ErrorCode::MalformedTokenString)
    );
}

#[test]
fn test_verify_policy_failure() {
    let parser = async_parser();
    let expired = sign_with_times(None, Some(NOW - SKEW - 1));
    assert_eq!(code_of(&parser, &expired), Some(ErrorCode::PolicyFailure));

    let parser = parser.checker(AudienceChecker::new(["https://example.com"]));
    assert_eq!(code_of(&parser, TOKEN_STRING), Some(ErrorCode::PolicyFailure));
}

struct AlwaysFailChecker;

impl Checker for AlwaysFailChecker {
    fn check(&self, _token: &Token) -> Result<()> {
        Err(Error::unknown(std::io::Error::other("checker unavailable")))
    }
}

#[test]
fn test_verify_unknown_failure() {
    let parser = async_parser().checker(AlwaysFailChecker);
    let err = verify(&parser, TOKEN_STRING).unwrap_err();
    assert_eq!(err.code(), Some(ErrorCode::Unknown));
    assert!(std::error::Error::source(&err).is_some());
}

#[test]
fn test_verify_misuse_passes_through() {
    let token = Token::from_payload(Object::new());
    let result = block_on(async_parser().verify(token));
    assert!(matches!(
        result,
        Err(VerifyError::Misuse(UsageError::AlgorithmMissing))
    ));
}

#[test]
fn test_verify_empty_signature_is_misuse() {
    let token = Token::new(
        full_header(),
        full_payload(),
        Some(TOKEN_STRING_EMPTY_SIG.to_string()),
    );
    let result = block_on(async_parser().verify(token));
    assert!(matches!(
        result,
        Err(VerifyError::Misuse(UsageError::SignatureMissing))
    ));
}

#[test]
fn test_verify_returns_same_token() {
    let parser = async_parser();
    let token = parser.deserialize(TOKEN_STRING).unwrap();
    let verified = block_on(parser.verify(token)).unwrap();
    assert_eq!(verified.token_string(), Some(TOKEN_STRING));
}

#[test]
fn test_token_from_ruby() {
    let parser = AsyncTokenParser::new(async_registry(ruby_provider()))
        .clock(FixedClock(NOW))
        .checker(IgnoreAudience);
    let token = verify(&parser, TOKEN_FROM_RUBY).unwrap();
    assert_eq!(token.param_as_str("hello"), Some("world"));
}

#[test]
fn test_direct_helpers() {
    let parser = async_parser();
    let verifiers = vec![hmac_verifier()];

    assert_eq!(parser.signature_is_valid(TOKEN_STRING, &verifiers), Ok(true));
    assert_eq!(
        parser.signature_is_valid(TOKEN_STRING_BAD_SIG, &verifiers),
        Ok(false)
    );
    assert_eq!(
        parser.signature_is_valid(TOKEN_STRING_EMPTY_SIG, &verifiers),
        Err(UsageError::SignatureMissing)
    );

    let token = parser.deserialize(TOKEN_STRING).unwrap();
    assert!(parser.issued_at_is_valid(&token, NOW));
    assert!(parser.expiration_is_valid(&token, NOW));
    assert!(!parser.expiration_is_valid(&token, NOW + SKEW + 2));
}

// ============================================================================
// Agreement with the blocking engine
// ============================================================================

#[test]
fn test_engines_agree() {
    let blocking = parser();
    let non_blocking = async_parser();

    let vectors = [
        TOKEN_STRING.to_string(),
        TOKEN_STRING_UNSORTED_KEYS.to_string(),
        TOKEN_STRING_BAD_SIG.to_string(),
        TOKEN_STRING_TAMPERED.to_string(),
        TOKEN_STRING_2PARTS.to_string(),
        TOKEN_STRING_CORRUPT_HEADER.to_string(),
        TOKEN_FROM_RUBY.to_string(),
        sign_with_times(Some(NOW + SKEW + 1), None),
        sign_with_times(None, Some(NOW - SKEW - 1)),
        sign_with_times(Some(NOW), Some(NOW - 1)),
        sign_with_times(Some(NOW), Some(NOW + 1)),
    ];

    for vector in &vectors {
        let expected = blocking
            .verify_and_deserialize(vector)
            .map(|token| token.token_string().map(str::to_string))
            .map_err(|e| e.code());
        let actual = verify(&non_blocking, vector)
            .map(|token| token.token_string().map(str::to_string))
            .map_err(|e| e.code());
        assert_eq!(expected, actual, "{vector}");
    }
}

// ============================================================================
// Discovery
// ============================================================================

struct SlowProvider {
    inner: StaticVerifierProvider,
    calls: AtomicUsize,
}

impl AsyncVerifierProvider for SlowProvider {
    fn find_verifier<'a>(
        &'a self,
        issuer: Option<&'a str>,
        key_id: Option<&'a str>,
    ) -> VerifierFuture<'a> {
        Box::pin(async move {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(5)).await;
            AsyncVerifierProvider::find_verifier(&self.inner, issuer, key_id).await
        })
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_verification() {
    let provider = Arc::new(SlowProvider {
        inner: hmac_provider(),
        calls: AtomicUsize::new(0),
    });
    let parser = AsyncTokenParser::new(
        AsyncVerifierRegistry::new().with(SignatureAlgorithm::HS256, provider.clone()),
    )
    .clock(FixedClock(NOW))
    .checker(IgnoreAudience);

    let handles: Vec<_> = (0..32)
        .map(|i| {
            let parser = parser.clone();
            tokio::spawn(async move {
                let token_string = if i % 2 == 0 {
                    TOKEN_STRING
                } else {
                    TOKEN_STRING_BAD_SIG
                };
                parser
                    .verify_and_deserialize(token_string)
                    .await
                    .map_err(|e| e.code())
                    .map(|_| ())
            })
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        let outcome = handle.await.unwrap();
        if i % 2 == 0 {
            assert_eq!(outcome, Ok(()));
        } else {
            assert_eq!(outcome, Err(Some(ErrorCode::BadSignature)));
        }
    }
    assert_eq!(provider.calls.load(Ordering::SeqCst), 32);
}

#[cfg(feature = "cache")]
#[tokio::test]
async fn test_cached_discovery() {
    let slow = Arc::new(SlowProvider {
        inner: hmac_provider(),
        calls: AtomicUsize::new(0),
    });
    let cached = CachingVerifierProvider::new(slow.clone(), Duration::from_secs(60), 100);
    let parser = AsyncTokenParser::new(
        AsyncVerifierRegistry::new().with(SignatureAlgorithm::HS256, Arc::new(cached)),
    )
    .clock(FixedClock(NOW))
    .checker(IgnoreAudience);

    for _ in 0..3 {
        assert!(parser.verify_and_deserialize(TOKEN_STRING).await.is_ok());
    }
    assert_eq!(slow.calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_immediate_provider_adapter() {
    let parser = AsyncTokenParser::new(
        AsyncVerifierRegistry::new().with(
            SignatureAlgorithm::HS256,
            Arc::new(ImmediateProvider(hmac_provider())),
        ),
    )
    .clock(FixedClock(NOW))
    .checker(IgnoreAudience);

    assert!(verify(&parser, TOKEN_STRING).is_ok());
}
