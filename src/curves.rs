//! Curve registry and resolution.
//!
//! Maps identifying labels (usually source file names) to descriptive
//! curve metadata, and loads per-curve generation configurations from
//! YAML. Resolution is total: labels that match no registry entry
//! resolve to an explicit "Unknown" sentinel, never an error.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Descriptive metadata about an algebraic curve.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurveInfo {
    pub curve_name: String,
    pub description: String,
    pub field_type: String,
    /// Known applications, in registry order.
    pub applications: Vec<String>,
}

impl CurveInfo {
    /// Sentinel record for labels matching no registry entry.
    pub fn unknown() -> Self {
        Self {
            curve_name: "Unknown".to_string(),
            description: "Unknown curve".to_string(),
            field_type: "unknown".to_string(),
            applications: Vec::new(),
        }
    }
}

/// Error raised when registering a registry key that would make
/// first-match resolution ambiguous.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    KeyCollision { new: String, existing: String },
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryError::KeyCollision { new, existing } => write!(
                f,
                "registry key '{}' collides with existing key '{}': one is a substring of the other",
                new, existing
            ),
        }
    }
}

impl std::error::Error for RegistryError {}

/// Ordered registry of known curves.
///
/// Resolution checks each key in registry order and the first key that
/// occurs as a substring of the lower-cased label wins. Registry order
/// is therefore part of the contract; `register` rejects keys that are
/// substrings of each other so first-match never becomes ambiguous.
#[derive(Debug, Clone)]
pub struct CurveRegistry {
    entries: Vec<(String, CurveInfo)>,
}

impl Default for CurveRegistry {
    fn default() -> Self {
        let entries = vec![
            (
                "bn254".to_string(),
                CurveInfo {
                    curve_name: "BN254".to_string(),
                    description:
                        "Barreto-Naehrig curve, most widely used in zkSNARK applications"
                            .to_string(),
                    field_type: "base_field".to_string(),
                    applications: vec![
                        "Ethereum".to_string(),
                        "Tornado Cash".to_string(),
                        "zkSNARKs".to_string(),
                    ],
                },
            ),
            (
                "bls12_381".to_string(),
                CurveInfo {
                    curve_name: "BLS12-381".to_string(),
                    description: "Barreto-Lynn-Scott curve, Ethereum 2.0 standard".to_string(),
                    field_type: "base_field".to_string(),
                    applications: vec![
                        "Ethereum 2.0".to_string(),
                        "Zcash Sapling".to_string(),
                        "BLS signatures".to_string(),
                    ],
                },
            ),
            (
                "bls12_377".to_string(),
                CurveInfo {
                    curve_name: "BLS12-377".to_string(),
                    description: "Barreto-Lynn-Scott curve, recursive proof friendly".to_string(),
                    field_type: "base_field".to_string(),
                    applications: vec![
                        "Celo".to_string(),
                        "recursive proofs with BW6-761".to_string(),
                    ],
                },
            ),
            (
                "pallas".to_string(),
                CurveInfo {
                    curve_name: "Pallas".to_string(),
                    description: "Pasta curve forming cycle with Vesta".to_string(),
                    field_type: "base_field".to_string(),
                    applications: vec![
                        "Mina Protocol".to_string(),
                        "recursive SNARKs".to_string(),
                    ],
                },
            ),
            (
                "vesta".to_string(),
                CurveInfo {
                    curve_name: "Vesta".to_string(),
                    description: "Pasta curve forming cycle with Pallas".to_string(),
                    field_type: "base_field".to_string(),
                    applications: vec![
                        "Mina Protocol".to_string(),
                        "recursive SNARKs".to_string(),
                    ],
                },
            ),
        ];
        Self { entries }
    }
}

impl CurveRegistry {
    /// Registry with no entries; every label resolves to the sentinel.
    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Resolve a label to curve metadata. Total: unmatched labels return
    /// the "Unknown" sentinel.
    pub fn resolve(&self, label: &str) -> CurveInfo {
        let lowered = label.to_lowercase();
        for (key, info) in &self.entries {
            if lowered.contains(key.as_str()) {
                return info.clone();
            }
        }
        CurveInfo::unknown()
    }

    /// Append an entry to the registry.
    ///
    /// # Errors
    ///
    /// `RegistryError::KeyCollision` when the new key is a substring of
    /// an existing key or vice versa, since either would make first-match
    /// resolution order-dependent in a surprising way.
    pub fn register(&mut self, key: &str, info: CurveInfo) -> Result<(), RegistryError> {
        let key = key.to_lowercase();
        for (existing, _) in &self.entries {
            if existing.contains(&key) || key.contains(existing.as_str()) {
                return Err(RegistryError::KeyCollision {
                    new: key,
                    existing: existing.clone(),
                });
            }
        }
        self.entries.push((key, info));
        Ok(())
    }

    /// Registry keys in resolution order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }
}

/// Per-curve generation configuration.
///
/// Drives the generation tooling: which prime to feed the reference
/// tool and which target field element type the generated constants
/// should parse into.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurveConfig {
    /// Lowercase curve label, e.g. `bn254`.
    pub name: String,
    /// Field prime as a `0x`-prefixed hex literal.
    pub prime: String,
    /// Field type name within the curve's arkworks crate, e.g. `Fq`.
    pub field_type: String,
    #[serde(default)]
    pub description: String,
}

impl CurveConfig {
    /// Fully qualified element type path, e.g. `ark_bn254::Fq`.
    pub fn element_type(&self) -> String {
        format!("ark_{}::{}", self.name, self.field_type)
    }
}

#[derive(Debug, Deserialize)]
struct CurveConfigFile {
    curves: Vec<CurveConfig>,
}

/// Load curve generation configurations from a YAML file.
pub fn load_curve_configs<P: AsRef<Path>>(path: P) -> Result<Vec<CurveConfig>, String> {
    let path = path.as_ref();

    let contents = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read curve config {}: {}", path.display(), e))?;

    let file: CurveConfigFile = serde_yaml::from_str(&contents)
        .map_err(|e| format!("Failed to parse curve config: {}", e))?;

    for config in &file.curves {
        validate_curve_config(config)?;
    }

    Ok(file.curves)
}

fn validate_curve_config(config: &CurveConfig) -> Result<(), String> {
    if config.name.is_empty() {
        return Err("Curve name cannot be empty".to_string());
    }
    if config.field_type.is_empty() {
        return Err(format!("Curve '{}' has an empty field type", config.name));
    }
    let digits = config
        .prime
        .strip_prefix("0x")
        .ok_or_else(|| format!("Curve '{}' prime must be 0x-prefixed hex", config.name))?;
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(format!("Curve '{}' prime is not valid hex", config.name));
    }
    Ok(())
}
