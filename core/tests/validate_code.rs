//! Code validation tests, loose and strict variants.

use referral_core::{
    error::ApiError,
    service::{CodeValidation, ReferralService},
    store::ReferralStore,
};

fn service_with_code(address: &str, code: &str) -> ReferralService {
    let store = ReferralStore::in_memory().expect("open in-memory store");
    store.migrate().expect("apply migrations");
    let svc = ReferralService::new(store);
    svc.register_wallet(address, None).unwrap();
    svc.assign_code(address, code).unwrap();
    svc
}

/// A bound code validates and returns its record; an unknown one does not.
#[test]
fn bound_code_validates() {
    let svc = service_with_code("0xAAA", "friend1");

    match svc.validate_code("friend1").unwrap() {
        CodeValidation::Valid(records) => {
            assert_eq!(records.len(), 1);
            assert_eq!(records[0].address, "0xAAA");
            assert_eq!(records[0].referral_code.as_deref(), Some("friend1"));
        }
        CodeValidation::NotFound => panic!("friend1 should validate"),
    }

    assert_eq!(
        svc.validate_code("stranger").unwrap(),
        CodeValidation::NotFound
    );
}

/// Both variants match case-insensitively against the stored lower-case code.
#[test]
fn validation_is_case_insensitive() {
    let svc = service_with_code("0xAAA", "Friend1");

    assert!(matches!(
        svc.validate_code("FRIEND1").unwrap(),
        CodeValidation::Valid(_)
    ));
    assert!(matches!(
        svc.validate_code_strict("FrIeNd1").unwrap(),
        CodeValidation::Valid(_)
    ));
}

/// The strict variant rejects non-alphanumeric input before the store;
/// the loose variant just reports a miss.
#[test]
fn strict_variant_gates_format() {
    let svc = service_with_code("0xAAA", "friend1");

    let err = svc.validate_code_strict("not valid!").unwrap_err();
    assert!(
        matches!(err, ApiError::InvalidCodeFormat),
        "expected InvalidCodeFormat, got {err}"
    );

    assert_eq!(
        svc.validate_code("not valid!").unwrap(),
        CodeValidation::NotFound
    );
}

/// Strict validation of a single bound code returns exactly one record.
#[test]
fn strict_variant_returns_single_record() {
    let svc = service_with_code("0xAAA", "friend1");

    match svc.validate_code_strict("friend1").unwrap() {
        CodeValidation::Valid(records) => {
            assert_eq!(records.len(), 1);
            assert_eq!(records[0].address, "0xAAA");
        }
        CodeValidation::NotFound => panic!("friend1 should validate"),
    }
}
