//! Rust constant-file generation from parameter sets.
//!
//! Output format B: a generated source file carrying the round counts as
//! integer constants, the round constants and MDS matrix as fixed-size
//! string-array constants, and one lazily-initialized parameter binding
//! that parses the hex constants into field elements on first access.
//!
//! Declared array lengths are a generation-time invariant: a mismatch
//! between a declared count and the actual data fails with
//! `GenerationError` before a single byte is written, never a silent
//! truncation. Callers that write files should render into a buffer via
//! `render_constants` and persist only on success, so no partial output
//! is ever left in place.

use std::fmt;
use std::io::Write;

use crate::codegen::utils::{binding_ident, escape_rust_string};
use crate::model::ParameterSet;

/// Default composite parameter type emitted into generated files.
pub const DEFAULT_PARAMS_TYPE: &str = "poseidon_paramgen::runtime::PoseidonParameters";

/// Configuration for constant-file generation.
#[derive(Debug, Clone)]
pub struct ConstantsConfig {
    /// Curve label used for the binding name and doc comments.
    pub curve_label: String,
    /// Fully qualified field element type, e.g. `ark_bn254::Fq`.
    pub element_type: String,
    /// Fully qualified composite parameter type. The generated binding
    /// is a `LazyLock` around this type.
    pub params_type: String,
}

impl ConstantsConfig {
    pub fn new(curve_label: impl Into<String>, element_type: impl Into<String>) -> Self {
        Self {
            curve_label: curve_label.into(),
            element_type: element_type.into(),
            params_type: DEFAULT_PARAMS_TYPE.to_string(),
        }
    }
}

/// Error raised when a parameter set is dimensionally inconsistent with
/// its own declarations.
#[derive(Debug)]
pub enum GenerationError {
    /// Declared round-constant count disagrees with the extracted data.
    RoundConstantCount { declared: usize, actual: usize },
    /// MDS row count differs from the state size.
    MdsRowCount { state_size: usize, rows: usize },
    /// An MDS row length differs from the state size.
    MdsRowLength {
        row: usize,
        state_size: usize,
        len: usize,
    },
    Io(std::io::Error),
}

impl From<std::io::Error> for GenerationError {
    fn from(err: std::io::Error) -> Self {
        GenerationError::Io(err)
    }
}

impl fmt::Display for GenerationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenerationError::RoundConstantCount { declared, actual } => write!(
                f,
                "round constant count mismatch: {} declared, {} extracted",
                declared, actual
            ),
            GenerationError::MdsRowCount { state_size, rows } => write!(
                f,
                "MDS matrix has {} rows, expected state size {}",
                rows, state_size
            ),
            GenerationError::MdsRowLength {
                row,
                state_size,
                len,
            } => write!(
                f,
                "MDS matrix row {} has {} elements, expected state size {}",
                row, len, state_size
            ),
            GenerationError::Io(e) => write!(f, "IO error: {}", e),
        }
    }
}

impl std::error::Error for GenerationError {}

/// Check declared-versus-actual consistency before any output exists.
fn validate(set: &ParameterSet) -> Result<(), GenerationError> {
    if let Some(declared) = set.metadata.num_round_constants {
        if declared != set.round_constants.len() {
            return Err(GenerationError::RoundConstantCount {
                declared,
                actual: set.round_constants.len(),
            });
        }
    }

    // An empty matrix is a legitimate extraction miss and generates
    // empty declarations; a non-empty one must be exactly t x t.
    if !set.mds_matrix.is_empty() {
        let state_size = set.metadata.state_size;
        if set.mds_matrix.len() != state_size {
            return Err(GenerationError::MdsRowCount {
                state_size,
                rows: set.mds_matrix.len(),
            });
        }
        for (row, elements) in set.mds_matrix.iter().enumerate() {
            if elements.len() != state_size {
                return Err(GenerationError::MdsRowLength {
                    row,
                    state_size,
                    len: elements.len(),
                });
            }
        }
    }

    Ok(())
}

/// Render the generated constant file to a string.
///
/// All validation happens before rendering starts, so a returned error
/// means nothing was produced.
pub fn render_constants(
    set: &ParameterSet,
    config: &ConstantsConfig,
) -> Result<String, GenerationError> {
    let mut buf = Vec::new();
    generate_constants(&mut buf, set, config)?;
    Ok(String::from_utf8(buf).expect("generated source is UTF-8"))
}

/// Write the generated constant file to `writer`.
///
/// Consistency invariants are checked before the first write; an
/// inconsistent set leaves the writer untouched.
pub fn generate_constants<W: Write>(
    writer: &mut W,
    set: &ParameterSet,
    config: &ConstantsConfig,
) -> Result<(), GenerationError> {
    validate(set)?;

    let curve = &config.curve_label;
    let metadata = &set.metadata;

    writeln!(
        writer,
        "// WARNING: This file is auto-generated by poseidon-paramgen."
    )?;
    writeln!(
        writer,
        "// Do not edit it manually; regenerate it from the parameter source text.\n"
    )?;
    writeln!(writer, "//! Poseidon parameters for the {} curve.", curve)?;
    writeln!(writer, "//!")?;
    writeln!(
        writer,
        "//! Extracted from the reference implementation output with t={}, alpha={}, M={}.",
        metadata.state_size, metadata.alpha, metadata.security_level
    )?;
    writeln!(writer)?;
    writeln!(writer, "use std::sync::LazyLock;")?;
    writeln!(writer)?;
    writeln!(writer, "use num_bigint::BigUint;")?;
    if let Some((import_path, _)) = config.params_type.rsplit_once("::") {
        writeln!(
            writer,
            "use {}::{};",
            import_path,
            params_type_name(config)
        )?;
    }
    writeln!(writer)?;

    writeln!(writer, "/// Number of full rounds")?;
    writeln!(
        writer,
        "pub const FULL_ROUNDS: usize = {};\n",
        metadata.full_rounds
    )?;
    writeln!(writer, "/// Number of partial rounds")?;
    writeln!(
        writer,
        "pub const PARTIAL_ROUNDS: usize = {};\n",
        metadata.partial_rounds
    )?;

    generate_round_constants(writer, set, curve)?;
    generate_mds_matrix(writer, set, curve)?;
    generate_lazy_binding(writer, set, config)?;

    Ok(())
}

fn params_type_name(config: &ConstantsConfig) -> &str {
    config
        .params_type
        .rsplit_once("::")
        .map(|(_, name)| name)
        .unwrap_or(config.params_type.as_str())
}

fn generate_round_constants<W: Write>(
    writer: &mut W,
    set: &ParameterSet,
    curve: &str,
) -> Result<(), GenerationError> {
    writeln!(writer, "/// Round constants for {}", curve)?;
    if set.round_constants.is_empty() {
        writeln!(writer, "const ROUND_CONSTANTS: [&str; 0] = [];\n")?;
        return Ok(());
    }

    writeln!(
        writer,
        "const ROUND_CONSTANTS: [&str; {}] = [",
        set.round_constants.len()
    )?;
    for constant in &set.round_constants {
        writeln!(writer, "    \"{}\",", escape_rust_string(constant))?;
    }
    writeln!(writer, "];\n")?;
    Ok(())
}

fn generate_mds_matrix<W: Write>(
    writer: &mut W,
    set: &ParameterSet,
    curve: &str,
) -> Result<(), GenerationError> {
    let state_size = set.metadata.state_size;

    writeln!(writer, "/// MDS matrix for {}", curve)?;
    if set.mds_matrix.is_empty() {
        writeln!(
            writer,
            "const MDS_MATRIX: [[&str; {}]; 0] = [];\n",
            state_size
        )?;
        return Ok(());
    }

    writeln!(
        writer,
        "const MDS_MATRIX: [[&str; {}]; {}] = [",
        state_size, state_size
    )?;
    for row in &set.mds_matrix {
        let elements: Vec<String> = row
            .iter()
            .map(|element| format!("\"{}\"", escape_rust_string(element)))
            .collect();
        writeln!(writer, "    [{}],", elements.join(", "))?;
    }
    writeln!(writer, "];\n")?;
    Ok(())
}

fn generate_lazy_binding<W: Write>(
    writer: &mut W,
    set: &ParameterSet,
    config: &ConstantsConfig,
) -> Result<(), GenerationError> {
    let binding = binding_ident(&config.curve_label);
    let element = &config.element_type;
    let params = params_type_name(config);
    let metadata = &set.metadata;

    writeln!(
        writer,
        "/// Poseidon parameters for {}, initialized on first access.",
        config.curve_label
    )?;
    writeln!(
        writer,
        "pub static {}: LazyLock<{}<{}>> = LazyLock::new(|| {{",
        binding, params, element
    )?;
    writeln!(writer, "    let ark = ROUND_CONSTANTS")?;
    writeln!(writer, "        .iter()")?;
    writeln!(writer, "        .map(|hex| {{")?;
    writeln!(
        writer,
        "            let digits = hex.trim_start_matches(\"0x\");"
    )?;
    writeln!(
        writer,
        "            let value = BigUint::parse_bytes(digits.as_bytes(), 16)"
    )?;
    writeln!(
        writer,
        "                .expect(\"generated round constant is valid hex\");"
    )?;
    writeln!(writer, "            {}::from(value)", element)?;
    writeln!(writer, "        }})")?;
    writeln!(writer, "        .collect();")?;
    writeln!(writer, "    let mds = MDS_MATRIX")?;
    writeln!(writer, "        .iter()")?;
    writeln!(writer, "        .map(|row| {{")?;
    writeln!(writer, "            row.iter()")?;
    writeln!(writer, "                .map(|hex| {{")?;
    writeln!(
        writer,
        "                    let digits = hex.trim_start_matches(\"0x\");"
    )?;
    writeln!(
        writer,
        "                    let value = BigUint::parse_bytes(digits.as_bytes(), 16)"
    )?;
    writeln!(
        writer,
        "                        .expect(\"generated MDS element is valid hex\");"
    )?;
    writeln!(writer, "                    {}::from(value)", element)?;
    writeln!(writer, "                }})")?;
    writeln!(writer, "                .collect()")?;
    writeln!(writer, "        }})")?;
    writeln!(writer, "        .collect();")?;
    writeln!(writer, "    {} {{", params)?;
    writeln!(writer, "        ark,")?;
    writeln!(writer, "        mds,")?;
    writeln!(writer, "        full_rounds: FULL_ROUNDS,")?;
    writeln!(writer, "        partial_rounds: PARTIAL_ROUNDS,")?;
    writeln!(writer, "        width: {},", metadata.state_size)?;
    writeln!(writer, "        alpha: {},", metadata.alpha)?;
    writeln!(writer, "    }}")?;
    writeln!(writer, "}});")?;
    Ok(())
}
