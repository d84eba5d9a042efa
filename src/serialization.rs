//! Structured serialization of enriched parameter records.
//!
//! Output format A: a `ParameterSet` plus its resolved `CurveInfo` as a
//! single nested JSON document with a stable key order: metadata block,
//! round constants, MDS matrix, security validation, curve info. The
//! metadata block carries the derived `total_rounds` field and the
//! modulus as a `{decimal, hex}` object.

use std::io::Write;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::curves::CurveInfo;
use crate::model::{AlgorithmResult, Modulus, ParameterMetadata, ParameterSet};

/// Error type for serialization operations
#[derive(Debug)]
pub enum SerializationError {
    JsonError(serde_json::Error),
    IoError(std::io::Error),
    /// A deserialized record violated a structural invariant.
    InconsistentRecord(String),
}

impl From<serde_json::Error> for SerializationError {
    fn from(err: serde_json::Error) -> Self {
        SerializationError::JsonError(err)
    }
}

impl From<std::io::Error> for SerializationError {
    fn from(err: std::io::Error) -> Self {
        SerializationError::IoError(err)
    }
}

impl std::fmt::Display for SerializationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SerializationError::JsonError(e) => write!(f, "JSON error: {}", e),
            SerializationError::IoError(e) => write!(f, "IO error: {}", e),
            SerializationError::InconsistentRecord(reason) => {
                write!(f, "inconsistent record: {}", reason)
            }
        }
    }
}

impl std::error::Error for SerializationError {}

/// Metadata block of the serialized record.
///
/// Mirrors `ParameterMetadata` with `total_rounds` materialized; field
/// declaration order is the JSON key order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordMetadata {
    pub field_size_bits: u64,
    pub state_size: usize,
    pub alpha: u64,
    pub security_level: u64,
    pub full_rounds: usize,
    pub partial_rounds: usize,
    pub total_rounds: usize,
    pub num_sboxes: Option<u64>,
    pub num_round_constants: Option<usize>,
    pub modulus: Modulus,
}

/// A `ParameterSet` enriched with curve information, ready for
/// archival/interchange.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterRecord {
    pub metadata: RecordMetadata,
    pub round_constants: Vec<String>,
    pub mds_matrix: Vec<Vec<String>>,
    pub security_validation: IndexMap<String, AlgorithmResult>,
    pub curve_info: CurveInfo,
}

impl ParameterRecord {
    /// Enrich a parameter set with curve info. The set itself is
    /// consumed; enrichment never mutates an extracted record in place.
    pub fn new(set: ParameterSet, curve_info: CurveInfo) -> Self {
        let total_rounds = set.metadata.total_rounds();
        let ParameterMetadata {
            field_size_bits,
            state_size,
            alpha,
            security_level,
            full_rounds,
            partial_rounds,
            num_sboxes,
            num_round_constants,
            modulus,
        } = set.metadata;

        Self {
            metadata: RecordMetadata {
                field_size_bits,
                state_size,
                alpha,
                security_level,
                full_rounds,
                partial_rounds,
                total_rounds,
                num_sboxes,
                num_round_constants,
                modulus,
            },
            round_constants: set.round_constants,
            mds_matrix: set.mds_matrix,
            security_validation: set.security_validation,
            curve_info,
        }
    }

    /// Serialize the record to a JSON string.
    pub fn to_json(&self) -> Result<String, SerializationError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Serialize the record to a pretty-printed JSON string.
    pub fn to_json_pretty(&self) -> Result<String, SerializationError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Read a record back from JSON, validating that the stored
    /// `total_rounds` matches its derivation.
    pub fn from_json(json: &str) -> Result<Self, SerializationError> {
        let record: Self = serde_json::from_str(json)?;
        let derived = record.metadata.full_rounds + record.metadata.partial_rounds;
        if record.metadata.total_rounds != derived {
            return Err(SerializationError::InconsistentRecord(format!(
                "total_rounds {} != full_rounds + partial_rounds ({})",
                record.metadata.total_rounds, derived
            )));
        }
        Ok(record)
    }

    /// Write the record as pretty-printed JSON.
    pub fn write_json<W: Write>(&self, mut writer: W) -> Result<(), SerializationError> {
        let json = self.to_json_pretty()?;
        writer.write_all(json.as_bytes())?;
        writer.write_all(b"\n")?;
        Ok(())
    }

    /// Recover the underlying `ParameterSet`, discarding the derived
    /// `total_rounds` field and the curve enrichment.
    pub fn into_parameter_set(self) -> ParameterSet {
        let RecordMetadata {
            field_size_bits,
            state_size,
            alpha,
            security_level,
            full_rounds,
            partial_rounds,
            total_rounds: _,
            num_sboxes,
            num_round_constants,
            modulus,
        } = self.metadata;

        ParameterSet {
            metadata: ParameterMetadata {
                field_size_bits,
                state_size,
                alpha,
                security_level,
                full_rounds,
                partial_rounds,
                num_sboxes,
                num_round_constants,
                modulus,
            },
            round_constants: self.round_constants,
            mds_matrix: self.mds_matrix,
            security_validation: self.security_validation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curves::CurveRegistry;
    use crate::extract::extract_parameter_set;

    fn sample_set() -> ParameterSet {
        let text = "\
Params: n=255, t=2, alpha=5, M=128, R_F=8, R_P=56
Modulus = 255
Round constants for GF(p): ['0xabc', '0xdef']
MDS matrix: [['0x1', '0x2'], ['0x3', '0x4']]
Result Algorithm 1: [True]
";
        extract_parameter_set(text).unwrap()
    }

    #[test]
    fn test_record_includes_total_rounds() {
        let record = ParameterRecord::new(sample_set(), CurveInfo::unknown());
        assert_eq!(record.metadata.total_rounds, 64);
    }

    #[test]
    fn test_top_level_key_order() {
        let record = ParameterRecord::new(sample_set(), CurveInfo::unknown());
        let json = record.to_json().unwrap();

        let metadata_at = json.find("\"metadata\"").unwrap();
        let constants_at = json.find("\"round_constants\"").unwrap();
        let mds_at = json.find("\"mds_matrix\"").unwrap();
        let security_at = json.find("\"security_validation\"").unwrap();
        let curve_at = json.find("\"curve_info\"").unwrap();

        assert!(metadata_at < constants_at);
        assert!(constants_at < mds_at);
        assert!(mds_at < security_at);
        assert!(security_at < curve_at);
    }

    #[test]
    fn test_modulus_is_two_key_object() {
        let record = ParameterRecord::new(sample_set(), CurveInfo::unknown());
        let json = record.to_json().unwrap();
        assert!(json.contains("\"modulus\":{\"decimal\":\"255\",\"hex\":\"0xff\"}"));
    }

    #[test]
    fn test_roundtrip_preserves_parameter_set() {
        let set = sample_set();
        let registry = CurveRegistry::default();
        let record = ParameterRecord::new(set.clone(), registry.resolve("bn254"));

        let json = record.to_json_pretty().unwrap();
        let reread = ParameterRecord::from_json(&json).unwrap();

        assert_eq!(reread, record);
        assert_eq!(reread.into_parameter_set(), set);
    }

    #[test]
    fn test_from_json_rejects_tampered_total_rounds() {
        let record = ParameterRecord::new(sample_set(), CurveInfo::unknown());
        let json = record.to_json().unwrap();
        let tampered = json.replace("\"total_rounds\":64", "\"total_rounds\":65");

        let err = ParameterRecord::from_json(&tampered).unwrap_err();
        assert!(matches!(err, SerializationError::InconsistentRecord(_)));
    }

    #[test]
    fn test_write_json_trailing_newline() {
        let record = ParameterRecord::new(sample_set(), CurveInfo::unknown());
        let mut buf = Vec::new();
        record.write_json(&mut buf).unwrap();
        assert!(buf.ends_with(b"\n"));
    }
}
