use super::*;

fn reason(id: &str) -> Option<IdRejection> {
    validate_national_id(id).reason
}

// =============================================================================
// validate_national_id — accepted
// =============================================================================

#[test]
fn accepts_known_valid_id() {
    let result = validate_national_id("1710034065");
    assert!(result.valid);
    assert!(result.reason.is_none());
}

#[test]
fn accepts_zero_residue_check_digit() {
    // digits 0,1,0,2,0,3,0,4,0 sum to 10; residue 0 means check digit 0.
    assert!(validate_national_id("0102030400").valid);
}

#[test]
fn accepts_highest_province() {
    assert!(validate_national_id("2400000002").valid);
}

// =============================================================================
// validate_national_id — rejected
// =============================================================================

#[test]
fn rejects_checksum_mismatch() {
    let result = validate_national_id("1234567890");
    assert!(!result.valid);
    assert_eq!(result.reason, Some(IdRejection::ChecksumMismatch));
}

#[test]
fn every_wrong_check_digit_is_mismatch() {
    for last in (0..=9).filter(|d| *d != 5) {
        let id = format!("171003406{last}");
        assert_eq!(reason(&id), Some(IdRejection::ChecksumMismatch), "{id}");
    }
}

#[test]
fn rejects_embedded_space_as_charset() {
    assert_eq!(reason("99123456 78"), Some(IdRejection::BadCharset));
}

#[test]
fn rejects_non_digits() {
    assert_eq!(reason("17100340a5"), Some(IdRejection::BadCharset));
    assert_eq!(reason("171003406５"), Some(IdRejection::BadCharset));
    assert_eq!(reason("-171003406"), Some(IdRejection::BadCharset));
}

#[test]
fn rejects_wrong_length() {
    assert_eq!(reason(""), Some(IdRejection::BadLength));
    assert_eq!(reason("171003406"), Some(IdRejection::BadLength));
    assert_eq!(reason("17100340650"), Some(IdRejection::BadLength));
}

#[test]
fn rejects_out_of_range_province() {
    assert_eq!(reason("0012345678"), Some(IdRejection::BadProvince));
    assert_eq!(reason("2512345678"), Some(IdRejection::BadProvince));
    assert_eq!(reason("9912345678"), Some(IdRejection::BadProvince));
}

#[test]
fn rejects_type_digit_above_five() {
    assert_eq!(reason("1760000000"), Some(IdRejection::BadTypeDigit));
    assert_eq!(reason("1790000000"), Some(IdRejection::BadTypeDigit));
}

#[test]
fn rejection_codes() {
    assert_eq!(IdRejection::BadLength.code(), "bad-length");
    assert_eq!(IdRejection::BadCharset.code(), "bad-charset");
    assert_eq!(IdRejection::BadProvince.code(), "bad-province");
    assert_eq!(IdRejection::BadTypeDigit.code(), "bad-type-digit");
    assert_eq!(IdRejection::ChecksumMismatch.code(), "checksum-mismatch");
}

#[test]
fn message_describes_outcome() {
    assert_eq!(validate_national_id("1710034065").message(), "valid national ID");
    assert!(validate_national_id("2512345678").message().contains("province"));
}

// =============================================================================
// format_national_id
// =============================================================================

#[test]
fn format_inserts_dash_after_seven() {
    assert_eq!(format_national_id("1710034065"), "1710034-065");
}

#[test]
fn format_short_input_unchanged() {
    assert_eq!(format_national_id("1710034"), "1710034");
    assert_eq!(format_national_id(""), "");
}

#[test]
fn format_strips_separators_and_truncates() {
    assert_eq!(format_national_id("171 003-4065"), "1710034-065");
    assert_eq!(format_national_id("171003406599"), "1710034-065");
    assert_eq!(format_national_id("17100340"), "1710034-0");
}

// =============================================================================
// contact fields
// =============================================================================

#[test]
fn email_accepts_common_addresses() {
    assert!(validate_email("jperez@espe.edu.ec"));
    assert!(validate_email("first.last+tag@example.com"));
}

#[test]
fn email_rejects_malformed() {
    assert!(!validate_email("no-at-sign.com"));
    assert!(!validate_email("user@host"));
    assert!(!validate_email("user@host.c"));
    assert!(!validate_email(""));
}

#[test]
fn phone_optional_and_ten_digits() {
    assert!(validate_phone(""));
    assert!(!validate_phone("   "));
    assert!(validate_phone("0991234567"));
    assert!(validate_phone("099-123-4567"));
    assert!(!validate_phone("12345"));
    assert!(!validate_phone("09912345678"));
}
