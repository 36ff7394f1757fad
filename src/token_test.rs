use super::test_helpers::make_token;
use super::*;

// =============================================================================
// decode
// =============================================================================

#[test]
fn decode_reads_exp() {
    let claims = decode(&make_token(1_900_000_000)).unwrap();
    assert_eq!(claims.exp, 1_900_000_000);
}

#[test]
fn decode_empty_token() {
    assert_eq!(decode(""), Err(TokenError::Empty));
}

#[test]
fn decode_wrong_segment_count() {
    assert_eq!(decode("only.two"), Err(TokenError::Segments));
    assert_eq!(decode("a.b.c.d"), Err(TokenError::Segments));
    assert_eq!(decode("opaque-session-token"), Err(TokenError::Segments));
}

#[test]
fn decode_bad_base64_payload() {
    assert!(matches!(decode("h.!!!.s"), Err(TokenError::Base64(_))));
}

#[test]
fn decode_payload_without_exp() {
    let payload = URL_SAFE_NO_PAD.encode(br#"{"sub":"1"}"#);
    let token = format!("h.{payload}.s");
    assert!(matches!(decode(&token), Err(TokenError::Claims(_))));
}

#[test]
fn decode_accepts_padded_payload() {
    let payload = base64::engine::general_purpose::URL_SAFE.encode(br#"{"exp":10}"#);
    assert!(payload.ends_with('='));
    let claims = decode(&format!("h.{payload}.s")).unwrap();
    assert_eq!(claims.exp, 10);
}

// =============================================================================
// check_at
// =============================================================================

#[test]
fn check_at_future_exp_is_live() {
    let claims = check_at(&make_token(2_000), 1_999).unwrap();
    assert_eq!(claims.exp, 2_000);
}

#[test]
fn check_at_exp_equal_now_is_expired() {
    assert_eq!(check_at(&make_token(2_000), 2_000), Err(TokenError::Expired { exp: 2_000, now: 2_000 }));
}

#[test]
fn check_at_past_exp_is_expired() {
    assert!(matches!(check_at(&make_token(10), 2_000), Err(TokenError::Expired { .. })));
}

#[test]
fn now_epoch_secs_is_after_2020() {
    assert!(now_epoch_secs() > 1_577_836_800);
}
