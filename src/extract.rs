//! Extraction of `ParameterSet` records from raw parameter dumps.
//!
//! The input is the free-form text printed by the reference parameter
//! generation tool. Two anchors are required and fatal when missing: the
//! `Params:` metadata line and the `Modulus =` line. Everything else is
//! best-effort; a missing block yields an explicitly empty or absent
//! field, never an error and never a silently substituted default.

use std::fmt;
use std::sync::OnceLock;

use indexmap::IndexMap;
use regex::Regex;

use crate::model::{AlgorithmResult, Modulus, ParameterMetadata, ParameterSet};
use crate::scan::{bracket_block, quoted_hex_literals, top_level_blocks};

const ROUND_CONSTANTS_LABEL: &str = "Round constants for GF(p):";
const MDS_MATRIX_LABEL: &str = "MDS matrix:";

/// Error raised when a required structural anchor is missing or invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractError {
    MalformedInput { reason: String },
}

impl ExtractError {
    fn malformed(reason: impl Into<String>) -> Self {
        ExtractError::MalformedInput {
            reason: reason.into(),
        }
    }
}

impl fmt::Display for ExtractError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractError::MalformedInput { reason } => {
                write!(f, "malformed parameter text: {}", reason)
            }
        }
    }
}

impl std::error::Error for ExtractError {}

fn params_line_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // The six keys are required in exactly this order.
    RE.get_or_init(|| {
        Regex::new(r"Params: n=(\d+), t=(\d+), alpha=(\d+), M=(\d+), R_F=(\d+), R_P=(\d+)")
            .expect("params line pattern")
    })
}

fn modulus_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"Modulus = (\d+)").expect("modulus pattern"))
}

fn prime_hex_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"Prime number: (0x[0-9a-fA-F]+)").expect("prime pattern"))
}

fn sbox_count_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"Number of S-boxes: (\d+)").expect("sbox count pattern"))
}

fn round_constant_count_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"Number of round constants: (\d+)").expect("constant count pattern")
    })
}

/// Parse raw parameter text into a `ParameterSet`.
///
/// # Errors
///
/// `ExtractError::MalformedInput` when the `Params:` line or the
/// `Modulus =` line is missing, out of key order, or fails integer
/// parsing, or when a `Prime number:` line contradicts the decimal
/// modulus. All other fields degrade to empty/absent on a miss.
pub fn extract_parameter_set(text: &str) -> Result<ParameterSet, ExtractError> {
    let metadata = extract_metadata(text)?;
    let round_constants = extract_round_constants(text);
    let mds_matrix = extract_mds_matrix(text);
    let security_validation = extract_security_validation(text);

    Ok(ParameterSet {
        metadata,
        round_constants,
        mds_matrix,
        security_validation,
    })
}

fn extract_metadata(text: &str) -> Result<ParameterMetadata, ExtractError> {
    let caps = params_line_re()
        .captures(text)
        .ok_or_else(|| ExtractError::malformed("missing or reordered Params declaration"))?;

    let field_size_bits = parse_capture(&caps[1], "n")?;
    let state_size = parse_capture(&caps[2], "t")?;
    let alpha = parse_capture(&caps[3], "alpha")?;
    let security_level = parse_capture(&caps[4], "M")?;
    let full_rounds = parse_capture(&caps[5], "R_F")?;
    let partial_rounds = parse_capture(&caps[6], "R_P")?;

    let modulus_caps = modulus_re()
        .captures(text)
        .ok_or_else(|| ExtractError::malformed("missing Modulus declaration"))?;
    let decimal = &modulus_caps[1];

    // The hex form is optional; derive it from the decimal value when
    // absent. When present, the two representations must agree.
    let modulus = match prime_hex_re().captures(text) {
        Some(hex_caps) => {
            Modulus::new(decimal, &hex_caps[1]).map_err(ExtractError::malformed)?
        }
        None => {
            tracing::debug!("no Prime number line, deriving hex modulus from decimal");
            Modulus::from_decimal(decimal).map_err(ExtractError::malformed)?
        }
    };

    let num_sboxes = optional_integer(text, sbox_count_re(), "S-box count");
    let num_round_constants = optional_integer(text, round_constant_count_re(), "constant count");

    Ok(ParameterMetadata {
        field_size_bits,
        state_size,
        alpha,
        security_level,
        full_rounds,
        partial_rounds,
        num_sboxes,
        num_round_constants,
        modulus,
    })
}

fn parse_capture<T: std::str::FromStr>(digits: &str, key: &str) -> Result<T, ExtractError> {
    digits
        .parse()
        .map_err(|_| ExtractError::malformed(format!("{}={} is out of range", key, digits)))
}

fn optional_integer<T: std::str::FromStr>(text: &str, re: &Regex, what: &str) -> Option<T> {
    let caps = re.captures(text)?;
    match caps[1].parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::debug!("{} {} is out of range, treating as absent", what, &caps[1]);
            None
        }
    }
}

/// The bracketed block following `label`, as its interior text.
///
/// Only whitespace may separate the label from the opening bracket. An
/// absent label or an unclosed block both yield `None`.
fn labeled_block<'a>(text: &'a str, label: &str) -> Option<&'a str> {
    let after = &text[text.find(label)? + label.len()..];
    let block_start = after.trim_start();
    bracket_block(block_start)
}

fn extract_round_constants(text: &str) -> Vec<String> {
    match labeled_block(text, ROUND_CONSTANTS_LABEL) {
        Some(interior) => quoted_hex_literals(interior),
        None => {
            tracing::debug!("round constants block not found");
            Vec::new()
        }
    }
}

fn extract_mds_matrix(text: &str) -> Vec<Vec<String>> {
    let interior = match labeled_block(text, MDS_MATRIX_LABEL) {
        Some(interior) => interior,
        None => {
            tracing::debug!("MDS matrix block not found");
            return Vec::new();
        }
    };

    // Rows that yield no literals are parsing noise, not legitimate
    // empty rows; a fully malformed matrix collapses to an empty one.
    top_level_blocks(interior)
        .into_iter()
        .map(|row| quoted_hex_literals(row))
        .filter(|row| !row.is_empty())
        .collect()
}

fn extract_security_validation(text: &str) -> IndexMap<String, AlgorithmResult> {
    let mut results = IndexMap::new();
    for algorithm in 1..=3u32 {
        let label = format!("Result Algorithm {}:", algorithm);
        let interior = match labeled_block(text, &label) {
            Some(interior) if !interior.trim().is_empty() => interior,
            _ => continue,
        };
        let result = if interior.contains("True") {
            AlgorithmResult::Passed(true)
        } else if interior.contains("False") {
            AlgorithmResult::Passed(false)
        } else {
            AlgorithmResult::Other(interior.trim().to_string())
        };
        results.insert(format!("algorithm_{}", algorithm), result);
    }
    results
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
Params: n=255, t=3, alpha=5, M=128, R_F=8, R_P=56
Modulus = 21888242871839275222246405745257275088548364400416034343698204186575808495617
Number of S-boxes: 80
Number of round constants: 192
Round constants for GF(p): ['0xabc', '0xdef']
MDS matrix: [['0x1', '0x2', '0x3'], ['0x4', '0x5', '0x6'], ['0x7', '0x8', '0x9']]
Result Algorithm 1: [True, 0]
Result Algorithm 2: [False]
Result Algorithm 3: [None, None]
";

    #[test]
    fn test_extract_metadata_values() {
        let set = extract_parameter_set(SAMPLE).unwrap();
        assert_eq!(set.metadata.field_size_bits, 255);
        assert_eq!(set.metadata.state_size, 3);
        assert_eq!(set.metadata.alpha, 5);
        assert_eq!(set.metadata.security_level, 128);
        assert_eq!(set.metadata.full_rounds, 8);
        assert_eq!(set.metadata.partial_rounds, 56);
        assert_eq!(set.total_rounds(), 64);
        assert_eq!(set.metadata.num_sboxes, Some(80));
        assert_eq!(set.metadata.num_round_constants, Some(192));
    }

    #[test]
    fn test_extract_round_constants_in_order() {
        let set = extract_parameter_set(SAMPLE).unwrap();
        assert_eq!(set.round_constants, vec!["0xabc", "0xdef"]);
    }

    #[test]
    fn test_extract_mds_matrix_rows() {
        let set = extract_parameter_set(SAMPLE).unwrap();
        assert_eq!(set.mds_matrix.len(), 3);
        assert_eq!(set.mds_matrix[0], vec!["0x1", "0x2", "0x3"]);
        assert_eq!(set.mds_matrix[2], vec!["0x7", "0x8", "0x9"]);
    }

    #[test]
    fn test_extract_security_validation() {
        let set = extract_parameter_set(SAMPLE).unwrap();
        assert_eq!(
            set.security_validation.get("algorithm_1"),
            Some(&AlgorithmResult::Passed(true))
        );
        assert_eq!(
            set.security_validation.get("algorithm_2"),
            Some(&AlgorithmResult::Passed(false))
        );
        assert_eq!(
            set.security_validation.get("algorithm_3"),
            Some(&AlgorithmResult::Other("None, None".to_string()))
        );
    }

    #[test]
    fn test_missing_params_line_is_fatal() {
        let err = extract_parameter_set("Modulus = 17\n").unwrap_err();
        assert!(matches!(err, ExtractError::MalformedInput { .. }));
    }

    #[test]
    fn test_missing_modulus_is_fatal() {
        let text = "Params: n=255, t=3, alpha=5, M=128, R_F=8, R_P=56\n";
        let err = extract_parameter_set(text).unwrap_err();
        assert!(err.to_string().contains("Modulus"));
    }

    #[test]
    fn test_reordered_params_keys_are_fatal() {
        let text = "Params: t=3, n=255, alpha=5, M=128, R_F=8, R_P=56\nModulus = 17\n";
        assert!(extract_parameter_set(text).is_err());
    }

    #[test]
    fn test_hex_modulus_derived_when_absent() {
        let text = "Params: n=255, t=3, alpha=5, M=128, R_F=8, R_P=56\nModulus = 255\n";
        let set = extract_parameter_set(text).unwrap();
        assert_eq!(set.metadata.modulus.hex, "0xff");
    }

    #[test]
    fn test_hex_modulus_kept_when_present() {
        let text = "Params: n=255, t=3, alpha=5, M=128, R_F=8, R_P=56\n\
                    Modulus = 255\nPrime number: 0xFF\n";
        let set = extract_parameter_set(text).unwrap();
        assert_eq!(set.metadata.modulus.hex, "0xff");
        assert_eq!(set.metadata.modulus.decimal, "255");
    }

    #[test]
    fn test_contradicting_hex_modulus_is_fatal() {
        let text = "Params: n=255, t=3, alpha=5, M=128, R_F=8, R_P=56\n\
                    Modulus = 255\nPrime number: 0xfe\n";
        assert!(extract_parameter_set(text).is_err());
    }

    #[test]
    fn test_optional_fields_absent() {
        let text = "Params: n=255, t=3, alpha=5, M=128, R_F=8, R_P=56\nModulus = 17\n";
        let set = extract_parameter_set(text).unwrap();
        assert_eq!(set.metadata.num_sboxes, None);
        assert_eq!(set.metadata.num_round_constants, None);
        assert!(set.round_constants.is_empty());
        assert!(set.mds_matrix.is_empty());
        assert!(set.security_validation.is_empty());
    }

    #[test]
    fn test_unclosed_constants_block_is_not_found() {
        let text = "Params: n=255, t=3, alpha=5, M=128, R_F=8, R_P=56\nModulus = 17\n\
                    Round constants for GF(p): ['0xabc', '0xdef'\n";
        let set = extract_parameter_set(text).unwrap();
        assert!(set.round_constants.is_empty());
    }

    #[test]
    fn test_multiline_constants_block() {
        let text = "Params: n=255, t=3, alpha=5, M=128, R_F=8, R_P=56\nModulus = 17\n\
                    Round constants for GF(p): ['0xabc',\n'0xdef',\n'0x123']\n";
        let set = extract_parameter_set(text).unwrap();
        assert_eq!(set.round_constants.len(), 3);
    }

    #[test]
    fn test_malformed_mds_rows_dropped() {
        let text = "Params: n=255, t=3, alpha=5, M=128, R_F=8, R_P=56\nModulus = 17\n\
                    MDS matrix: [['0x1', '0x2'], [garbage], ['0x3', '0x4']]\n";
        let set = extract_parameter_set(text).unwrap();
        assert_eq!(set.mds_matrix.len(), 2);
    }

    #[test]
    fn test_entirely_malformed_mds_collapses_to_empty() {
        let text = "Params: n=255, t=3, alpha=5, M=128, R_F=8, R_P=56\nModulus = 17\n\
                    MDS matrix: [[x], [y]]\n";
        let set = extract_parameter_set(text).unwrap();
        assert!(set.mds_matrix.is_empty());
    }
}
