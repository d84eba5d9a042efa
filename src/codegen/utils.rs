//! Helper functions for constant-file generation.

/// Build the generated parameter binding identifier for a curve label:
/// non-alphanumeric characters become underscores, the rest is
/// upper-cased, and the `_PARAMS` suffix is appended.
///
/// `bn254` -> `BN254_PARAMS`, `bls12-381` -> `BLS12_381_PARAMS`.
pub fn binding_ident(label: &str) -> String {
    let mut ident: String = label
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_uppercase()
            } else {
                '_'
            }
        })
        .collect();
    if ident.chars().next().map_or(true, |c| c.is_ascii_digit()) {
        ident.insert(0, '_');
    }
    ident.push_str("_PARAMS");
    ident
}

/// Escape a string for use in a Rust string literal.
pub fn escape_rust_string(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}
