use word2bits::ThresholdMode;

#[test]
fn test_signed_ternary_sign_convention() {
    let third = 1.0f32 / 3.0;
    for x in [f32::MIN, -1.0, -1e-30, 1e-30, 1.0, f32::MAX] {
        let expected = if x < 0.0 { -third } else { third };
        assert_eq!(ThresholdMode::SignedTernary.apply(x), expected);
    }
    assert_eq!(ThresholdMode::SignedTernary.apply(0.0), third);
}

#[test]
fn test_binary_bucket_zero_is_positive_low_bucket() {
    assert_eq!(ThresholdMode::BinaryBucket.apply(0.0), 0.25);
    assert_eq!(ThresholdMode::BinaryBucket.apply(-0.0), 0.25);
}

#[test]
fn test_mode_codes() {
    for code in 0u8..3 {
        assert_eq!(ThresholdMode::try_from(code).unwrap().code(), code);
    }
    assert!(ThresholdMode::try_from(3).is_err());
}
