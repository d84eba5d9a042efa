//! # Poseidon parameter extraction, normalization, and generation.
//!
//! This crate converts the semi-structured text dumps produced by the
//! Poseidon reference parameter tool into two downstream artifacts: a
//! normalized JSON record for archival/interchange, and generated Rust
//! constant files consumed by a hashing library.
//!
//! ## Pipeline
//!
//! raw text → [`extract_parameter_set`] → [`ParameterSet`] →
//! (optionally) [`CurveRegistry::resolve`] enrichment →
//! [`ParameterRecord`] JSON or [`generate_constants`] Rust source.
//!
//! The crate only moves data: it guarantees that outputs are
//! syntactically well-formed and dimensionally consistent with the
//! declared parameters, not that the constants are cryptographically
//! sound.
//!
//! ## Example
//!
//! ```
//! use poseidon_paramgen::{extract_parameter_set, CurveRegistry, ParameterRecord};
//!
//! let text = "\
//! Params: n=255, t=2, alpha=5, M=128, R_F=8, R_P=56
//! Modulus = 255
//! Round constants for GF(p): ['0xabc', '0xdef']
//! MDS matrix: [['0x1', '0x2'], ['0x3', '0x4']]
//! ";
//!
//! let set = extract_parameter_set(text).unwrap();
//! assert_eq!(set.total_rounds(), 64);
//!
//! let curve = CurveRegistry::default().resolve("poseidon_params_bn254_t2.txt");
//! let record = ParameterRecord::new(set, curve);
//! let json = record.to_json_pretty().unwrap();
//! assert!(json.contains("\"curve_name\": \"BN254\""));
//! ```

// Core pipeline modules
pub mod extract;
pub mod model;
pub mod scan;

// Curve registry and generation configuration
pub mod curves;

// Output formats
pub mod codegen;
pub mod serialization;

// Runtime parameter bundle shared with generated code
pub mod runtime;

// Re-export key types
pub use codegen::{generate_constants, render_constants, ConstantsConfig, GenerationError};
pub use curves::{load_curve_configs, CurveConfig, CurveInfo, CurveRegistry, RegistryError};
pub use extract::{extract_parameter_set, ExtractError};
pub use model::{AlgorithmResult, Modulus, ParameterMetadata, ParameterSet};
pub use runtime::{FromHexStr, LazyParams, ParamsError, PoseidonParameters};
pub use serialization::{ParameterRecord, RecordMetadata, SerializationError};
