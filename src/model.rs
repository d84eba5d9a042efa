//! Data model for extracted Poseidon parameter sets.
//!
//! A `ParameterSet` is the canonical record produced by extraction: the
//! metadata line, the field modulus in both representations, the round
//! constants, the MDS matrix, and any security-validation results found
//! in the source text. It is treated as immutable once extracted;
//! enrichment with curve information produces a new composite record
//! (see `serialization::ParameterRecord`) instead of mutating in place.

use indexmap::IndexMap;
use num_bigint::BigUint;
use serde::{Deserialize, Serialize};

/// Field modulus in decimal and hexadecimal form.
///
/// Both strings denote the same integer. The modulus is always carried as
/// a two-key object rather than a bare number: field primes exceed native
/// integer width and would lose precision in any numeric JSON encoding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modulus {
    /// Decimal representation, e.g. `"21888242871..."`.
    pub decimal: String,
    /// Lowercase `0x`-prefixed hexadecimal representation.
    pub hex: String,
}

impl Modulus {
    /// Build a modulus from its decimal form, deriving the hex form.
    pub fn from_decimal(decimal: &str) -> Result<Self, String> {
        let value = parse_decimal(decimal)?;
        Ok(Self {
            decimal: decimal.to_string(),
            hex: format!("{:#x}", value),
        })
    }

    /// Build a modulus from both forms, validating that they denote the
    /// same integer.
    pub fn new(decimal: &str, hex: &str) -> Result<Self, String> {
        let dec_value = parse_decimal(decimal)?;
        let hex_value = parse_hex(hex)?;
        if dec_value != hex_value {
            return Err(format!(
                "modulus representations disagree: decimal {} != hex {}",
                decimal, hex
            ));
        }
        Ok(Self {
            decimal: decimal.to_string(),
            hex: hex.to_lowercase(),
        })
    }

    /// The modulus as an arbitrary-precision integer.
    pub fn value(&self) -> Result<BigUint, String> {
        parse_decimal(&self.decimal)
    }
}

fn parse_decimal(decimal: &str) -> Result<BigUint, String> {
    BigUint::parse_bytes(decimal.as_bytes(), 10)
        .ok_or_else(|| format!("invalid decimal integer: {}", decimal))
}

fn parse_hex(hex: &str) -> Result<BigUint, String> {
    let digits = hex
        .strip_prefix("0x")
        .or_else(|| hex.strip_prefix("0X"))
        .ok_or_else(|| format!("hex modulus missing 0x prefix: {}", hex))?;
    BigUint::parse_bytes(digits.as_bytes(), 16)
        .ok_or_else(|| format!("invalid hex integer: {}", hex))
}

/// Result of a single security-validation algorithm.
///
/// The reference tool reports either a plain boolean or an opaque
/// expression (a residual value, `None`, ...). Opaque results are kept
/// verbatim; they serialize as JSON strings, booleans as JSON booleans.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AlgorithmResult {
    Passed(bool),
    Other(String),
}

/// Metadata extracted from the parameter declaration and modulus lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterMetadata {
    /// Bit length of the prime field (n).
    pub field_size_bits: u64,
    /// Width of the permutation state (t); also the MDS matrix dimension.
    pub state_size: usize,
    /// S-box exponent.
    pub alpha: u64,
    /// Target security level in bits (M).
    pub security_level: u64,
    pub full_rounds: usize,
    pub partial_rounds: usize,
    /// Declared S-box count, if the source text carried one.
    pub num_sboxes: Option<u64>,
    /// Declared round-constant count, if the source text carried one.
    /// When present it must equal the length of the extracted constants;
    /// generation enforces this.
    pub num_round_constants: Option<usize>,
    pub modulus: Modulus,
}

impl ParameterMetadata {
    /// Derived total round count. Never stored independently.
    pub fn total_rounds(&self) -> usize {
        self.full_rounds + self.partial_rounds
    }
}

/// Canonical record produced by extracting one parameter text dump.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterSet {
    pub metadata: ParameterMetadata,
    /// Hex-encoded round constants in round-major order of constant
    /// addition. Empty when the source text carried no constants block.
    pub round_constants: Vec<String>,
    /// Hex-encoded MDS matrix rows; row order and within-row order define
    /// the linear map. Empty when no matrix block was found.
    pub mds_matrix: Vec<Vec<String>>,
    /// Security-validation results keyed `algorithm_1` .. `algorithm_3`,
    /// in source order. Absent algorithms are absent from the map.
    pub security_validation: IndexMap<String, AlgorithmResult>,
}

impl ParameterSet {
    /// Derived total round count.
    pub fn total_rounds(&self) -> usize {
        self.metadata.total_rounds()
    }
}
