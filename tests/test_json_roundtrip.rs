//! Format A round-trip: serialize, re-read, compare field by field.

use num_bigint::BigUint;
use poseidon_paramgen::{
    extract_parameter_set, CurveRegistry, ParameterRecord, SerializationError,
};

const DUMP: &str = "\
Params: n=255, t=3, alpha=5, M=128, R_F=8, R_P=56
Modulus = 28948022309329048855892746252171976963363056481941560715954676764349967630337
Number of S-boxes: 71
Number of round constants: 6
Round constants for GF(p): ['0x1a2b', '0x3c4d', '0x5e6f', '0x7081', '0x92a3', '0xb4c5']
MDS matrix: [['0x1', '0x2', '0x3'], ['0x4', '0x5', '0x6'], ['0x7', '0x8', '0x9']]
Result Algorithm 1: [True, 0]
Result Algorithm 2: [False]
";

#[test]
fn test_roundtrip_equality() {
    let set = extract_parameter_set(DUMP).unwrap();
    let curve_info = CurveRegistry::default().resolve("poseidon_params_pallas_t3.txt");
    let record = ParameterRecord::new(set.clone(), curve_info);

    let json = record.to_json_pretty().unwrap();
    let reread = ParameterRecord::from_json(&json).unwrap();

    assert_eq!(reread, record);

    // The recovered set equals the original, field for field.
    let recovered = reread.into_parameter_set();
    assert_eq!(recovered.metadata, set.metadata);
    assert_eq!(recovered.round_constants, set.round_constants);
    assert_eq!(recovered.mds_matrix, set.mds_matrix);
    assert_eq!(recovered.security_validation, set.security_validation);
}

#[test]
fn test_modulus_forms_denote_same_integer() {
    let set = extract_parameter_set(DUMP).unwrap();
    let record = ParameterRecord::new(set, CurveRegistry::default().resolve("pallas"));

    let json = record.to_json().unwrap();
    let reread = ParameterRecord::from_json(&json).unwrap();

    let decimal =
        BigUint::parse_bytes(reread.metadata.modulus.decimal.as_bytes(), 10).unwrap();
    let hex_digits = reread.metadata.modulus.hex.trim_start_matches("0x");
    let hex = BigUint::parse_bytes(hex_digits.as_bytes(), 16).unwrap();
    assert_eq!(decimal, hex);
}

#[test]
fn test_absent_optionals_survive_roundtrip() {
    let text = "Params: n=64, t=2, alpha=3, M=80, R_F=6, R_P=40\nModulus = 18446744073709551557\n";
    let set = extract_parameter_set(text).unwrap();
    let record = ParameterRecord::new(set, CurveRegistry::default().resolve("nothing"));

    let json = record.to_json_pretty().unwrap();
    assert!(json.contains("\"num_sboxes\": null"));
    assert!(json.contains("\"curve_name\": \"Unknown\""));

    let reread = ParameterRecord::from_json(&json).unwrap();
    assert_eq!(reread.metadata.num_sboxes, None);
    assert_eq!(reread.metadata.num_round_constants, None);
    assert!(reread.round_constants.is_empty());
    assert!(reread.mds_matrix.is_empty());
    assert!(reread.security_validation.is_empty());
}

#[test]
fn test_security_validation_order_is_stable() {
    let set = extract_parameter_set(DUMP).unwrap();
    let record = ParameterRecord::new(set, CurveRegistry::default().resolve("pallas"));

    let json = record.to_json().unwrap();
    let first = json.find("\"algorithm_1\"").unwrap();
    let second = json.find("\"algorithm_2\"").unwrap();
    assert!(first < second);
}

#[test]
fn test_corrupt_document_is_rejected() {
    assert!(matches!(
        ParameterRecord::from_json("{\"metadata\": {}}"),
        Err(SerializationError::JsonError(_))
    ));
}
