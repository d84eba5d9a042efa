//! Runtime parameter bundle shared with generated constant files.
//!
//! The generated constant files bind a lazily-initialized
//! `PoseidonParameters` value; this module provides that type, plus an
//! explicit initialize-once handle (`LazyParams`) for consumers that
//! hold an extracted `ParameterSet` rather than generated constants.
//! Initialization happens at most once under concurrent first access,
//! after which the bundle is immutable and freely shared.

use std::fmt;
use std::sync::OnceLock;

use num_bigint::BigUint;

use crate::model::ParameterSet;

/// Immutable Poseidon parameter bundle over a field element type.
///
/// Read-only after construction; sharing a reference between threads
/// needs no further synchronization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoseidonParameters<F> {
    /// Round constants in round-major order.
    pub ark: Vec<F>,
    /// MDS matrix rows.
    pub mds: Vec<Vec<F>>,
    pub full_rounds: usize,
    pub partial_rounds: usize,
    /// Permutation state width (t).
    pub width: usize,
    /// S-box exponent.
    pub alpha: u64,
}

/// Error captured when lazy initialization fails to parse a constant.
///
/// Clone because the captured result is shared with every caller of
/// `LazyParams::get`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamsError {
    InvalidHex {
        field: &'static str,
        index: usize,
        literal: String,
    },
}

impl fmt::Display for ParamsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamsError::InvalidHex {
                field,
                index,
                literal,
            } => write!(
                f,
                "invalid hex literal '{}' at {}[{}]",
                literal, field, index
            ),
        }
    }
}

impl std::error::Error for ParamsError {}

/// Parse a `0x`-prefixed, base-16 string into a field element type.
pub trait FromHexStr: Sized {
    /// Parse `hex` (with or without the `0x` prefix) as base-16.
    fn from_hex_str(hex: &str) -> Option<Self>;
}

fn hex_digits(hex: &str) -> &str {
    hex.strip_prefix("0x")
        .or_else(|| hex.strip_prefix("0X"))
        .unwrap_or(hex)
}

impl FromHexStr for BigUint {
    fn from_hex_str(hex: &str) -> Option<Self> {
        BigUint::parse_bytes(hex_digits(hex).as_bytes(), 16)
    }
}

impl FromHexStr for u64 {
    fn from_hex_str(hex: &str) -> Option<Self> {
        u64::from_str_radix(hex_digits(hex), 16).ok()
    }
}

impl FromHexStr for u128 {
    fn from_hex_str(hex: &str) -> Option<Self> {
        u128::from_str_radix(hex_digits(hex), 16).ok()
    }
}

/// Initialize-once handle around a parameter bundle.
///
/// Holds the hex-string constants of a `ParameterSet`; the first call to
/// `get` parses them into `F` and caches the result (success or
/// failure). Racing readers observe exactly one initialization.
pub struct LazyParams<F> {
    round_constants: Vec<String>,
    mds_matrix: Vec<Vec<String>>,
    full_rounds: usize,
    partial_rounds: usize,
    width: usize,
    alpha: u64,
    cell: OnceLock<Result<PoseidonParameters<F>, ParamsError>>,
}

impl<F: FromHexStr> LazyParams<F> {
    /// Capture the constants of an extracted parameter set.
    pub fn from_set(set: &ParameterSet) -> Self {
        Self {
            round_constants: set.round_constants.clone(),
            mds_matrix: set.mds_matrix.clone(),
            full_rounds: set.metadata.full_rounds,
            partial_rounds: set.metadata.partial_rounds,
            width: set.metadata.state_size,
            alpha: set.metadata.alpha,
            cell: OnceLock::new(),
        }
    }

    /// The parameter bundle, parsing the constants on first access.
    ///
    /// # Errors
    ///
    /// `ParamsError::InvalidHex` naming the first unparseable constant.
    /// The failure is captured once and returned to every caller.
    pub fn get(&self) -> Result<&PoseidonParameters<F>, ParamsError> {
        self.cell
            .get_or_init(|| self.build())
            .as_ref()
            .map_err(|e| e.clone())
    }

    fn build(&self) -> Result<PoseidonParameters<F>, ParamsError> {
        let mut ark = Vec::with_capacity(self.round_constants.len());
        for (index, literal) in self.round_constants.iter().enumerate() {
            let element = F::from_hex_str(literal).ok_or_else(|| ParamsError::InvalidHex {
                field: "round_constants",
                index,
                literal: literal.clone(),
            })?;
            ark.push(element);
        }

        let mut mds = Vec::with_capacity(self.mds_matrix.len());
        for (row_index, row) in self.mds_matrix.iter().enumerate() {
            let mut mds_row = Vec::with_capacity(row.len());
            for literal in row {
                let element = F::from_hex_str(literal).ok_or_else(|| ParamsError::InvalidHex {
                    field: "mds_matrix",
                    index: row_index,
                    literal: literal.clone(),
                })?;
                mds_row.push(element);
            }
            mds.push(mds_row);
        }

        Ok(PoseidonParameters {
            ark,
            mds,
            full_rounds: self.full_rounds,
            partial_rounds: self.partial_rounds,
            width: self.width,
            alpha: self.alpha,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::extract_parameter_set;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn sample_set() -> ParameterSet {
        let text = "\
Params: n=255, t=2, alpha=5, M=128, R_F=8, R_P=56
Modulus = 255
Round constants for GF(p): ['0xabc', '0xdef']
MDS matrix: [['0x1', '0x2'], ['0x3', '0x4']]
";
        extract_parameter_set(text).unwrap()
    }

    #[test]
    fn test_lazy_params_bundle() {
        let lazy: LazyParams<u64> = LazyParams::from_set(&sample_set());
        let params = lazy.get().unwrap();

        assert_eq!(params.ark, vec![0xabc, 0xdef]);
        assert_eq!(params.mds, vec![vec![1, 2], vec![3, 4]]);
        assert_eq!(params.full_rounds, 8);
        assert_eq!(params.partial_rounds, 56);
        assert_eq!(params.width, 2);
        assert_eq!(params.alpha, 5);
    }

    #[test]
    fn test_lazy_params_biguint() {
        let lazy: LazyParams<BigUint> = LazyParams::from_set(&sample_set());
        let params = lazy.get().unwrap();
        assert_eq!(params.ark[0], BigUint::from(0xabcu32));
    }

    #[test]
    fn test_invalid_hex_reported_to_every_caller() {
        let mut set = sample_set();
        set.round_constants[1] = "0xzz".to_string();

        let lazy: LazyParams<u64> = LazyParams::from_set(&set);
        let first = lazy.get().unwrap_err();
        let second = lazy.get().unwrap_err();
        assert_eq!(first, second);
        assert!(matches!(
            first,
            ParamsError::InvalidHex {
                field: "round_constants",
                index: 1,
                ..
            }
        ));
    }

    static PARSE_COUNT: AtomicUsize = AtomicUsize::new(0);

    #[derive(Debug, Clone, PartialEq, Eq)]
    struct Counting(u64);

    impl FromHexStr for Counting {
        fn from_hex_str(hex: &str) -> Option<Self> {
            PARSE_COUNT.fetch_add(1, Ordering::SeqCst);
            u64::from_hex_str(hex).map(Counting)
        }
    }

    #[test]
    fn test_initialization_is_exactly_once_under_races() {
        let set = sample_set();
        let literal_count = set.round_constants.len()
            + set.mds_matrix.iter().map(|row| row.len()).sum::<usize>();
        let lazy: Arc<LazyParams<Counting>> = Arc::new(LazyParams::from_set(&set));

        PARSE_COUNT.store(0, Ordering::SeqCst);

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let lazy = Arc::clone(&lazy);
                std::thread::spawn(move || {
                    let params = lazy.get().unwrap();
                    params.ark.len()
                })
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap(), 2);
        }

        // Every thread saw the same bundle; each literal parsed once.
        assert_eq!(PARSE_COUNT.load(Ordering::SeqCst), literal_count);
    }
}
