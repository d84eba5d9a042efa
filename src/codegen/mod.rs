//! Constant-file generation for parameter sets.

pub mod rust_codegen;
pub mod utils;

pub use rust_codegen::{
    generate_constants, render_constants, ConstantsConfig, GenerationError, DEFAULT_PARAMS_TYPE,
};
pub use utils::binding_ident;
