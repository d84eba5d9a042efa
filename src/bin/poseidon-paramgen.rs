//! poseidon-paramgen CLI - convert reference parameter dumps to JSON and
//! Rust constant files.
//!
//! Extraction failures abort only the affected input; batch runs report
//! them per file and continue. Generated output is rendered in memory
//! first, so a failure never leaves a partial file behind.

use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};

use poseidon_paramgen::codegen::DEFAULT_PARAMS_TYPE;
use poseidon_paramgen::{
    extract_parameter_set, load_curve_configs, render_constants, ConstantsConfig, CurveConfig,
    CurveRegistry, ParameterRecord,
};

#[derive(Parser)]
#[command(name = "poseidon-paramgen")]
#[command(version, about = "Poseidon parameter extraction and constant generation", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert parameter text dumps to structured JSON records
    Convert {
        /// Parameter text file, or a directory of poseidon_params_*.txt files
        #[arg(short, long)]
        input: PathBuf,

        /// Output directory for JSON records
        #[arg(short, long, default_value = ".")]
        output: PathBuf,
    },

    /// Generate a Rust constant file from a parameter text dump
    Generate {
        /// Parameter text file
        #[arg(short, long)]
        input: PathBuf,

        /// Curve label for the generated binding (detected from the file
        /// name via the curve config when omitted)
        #[arg(short, long)]
        curve: Option<String>,

        /// Fully qualified field element type, e.g. ark_bn254::Fq
        #[arg(short, long)]
        element_type: Option<String>,

        /// Fully qualified composite parameter type
        #[arg(long, default_value = DEFAULT_PARAMS_TYPE)]
        params_type: String,

        /// Path to the curve configuration YAML
        #[arg(long, default_value = "config/curves.yaml")]
        curves: PathBuf,

        /// Output directory for generated files
        #[arg(short, long, default_value = "src/parameters")]
        output: PathBuf,
    },

    /// Validate parameter text dumps without writing output
    Validate {
        /// Parameter text file, or a directory of poseidon_params_*.txt files
        #[arg(short, long)]
        input: PathBuf,
    },
}

fn main() {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Convert { input, output } => convert(input, output),
        Commands::Generate {
            input,
            curve,
            element_type,
            params_type,
            curves,
            output,
        } => generate(input, curve, element_type, params_type, curves, output),
        Commands::Validate { input } => validate(input),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

/// Collect input files: a single file as-is, a directory filtered to the
/// reference tool's poseidon_params_*.txt naming.
fn collect_inputs(input: &Path) -> Result<Vec<PathBuf>, String> {
    if input.is_file() {
        return Ok(vec![input.to_path_buf()]);
    }
    if !input.is_dir() {
        return Err(format!("Input not found: {}", input.display()));
    }

    let entries = fs::read_dir(input)
        .map_err(|e| format!("Failed to read directory {}: {}", input.display(), e))?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| format!("Failed to read directory entry: {}", e))?;
        let path = entry.path();
        let name = match path.file_name().and_then(|n| n.to_str()) {
            Some(name) => name,
            None => continue,
        };
        if name.starts_with("poseidon_params_") && name.ends_with(".txt") {
            files.push(path);
        }
    }
    files.sort();

    if files.is_empty() {
        return Err(format!(
            "No poseidon_params_*.txt files found in {}",
            input.display()
        ));
    }
    Ok(files)
}

/// Convert parameter text dumps to structured JSON records
fn convert(input: PathBuf, output: PathBuf) -> Result<(), String> {
    let files = collect_inputs(&input)?;
    println!("🔧 Converting {} parameter file(s)...", files.len());

    fs::create_dir_all(&output)
        .map_err(|e| format!("Failed to create output directory: {}", e))?;

    let registry = CurveRegistry::default();
    let mut failures = 0usize;

    for path in &files {
        match convert_one(path, &output, &registry) {
            Ok(json_path) => println!("  ✓ {} -> {}", path.display(), json_path.display()),
            Err(e) => {
                failures += 1;
                eprintln!("  ✗ {}: {}", path.display(), e);
            }
        }
    }

    if failures > 0 {
        println!(
            "⚠ Converted {} of {} files ({} failed)",
            files.len() - failures,
            files.len(),
            failures
        );
    } else {
        println!("✨ Conversion complete!");
    }
    Ok(())
}

fn convert_one(
    path: &Path,
    output_dir: &Path,
    registry: &CurveRegistry,
) -> Result<PathBuf, String> {
    let text =
        fs::read_to_string(path).map_err(|e| format!("Failed to read file: {}", e))?;

    let set = extract_parameter_set(&text).map_err(|e| e.to_string())?;

    let label = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default();
    let curve_info = registry.resolve(label);

    let record = ParameterRecord::new(set, curve_info);
    let json = record.to_json_pretty().map_err(|e| e.to_string())?;

    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("parameters");
    let json_path = output_dir.join(format!("{}.json", stem));

    // Rendered before this point; a write failure leaves no partial
    // record because the whole document goes down in one call.
    fs::write(&json_path, format!("{}\n", json))
        .map_err(|e| format!("Failed to write {}: {}", json_path.display(), e))?;

    Ok(json_path)
}

/// Generate a Rust constant file from a parameter text dump
fn generate(
    input: PathBuf,
    curve: Option<String>,
    element_type: Option<String>,
    params_type: String,
    curves: PathBuf,
    output: PathBuf,
) -> Result<(), String> {
    println!("🔧 Generating constants from {}...", input.display());

    let text = fs::read_to_string(&input)
        .map_err(|e| format!("Failed to read {}: {}", input.display(), e))?;
    let set = extract_parameter_set(&text).map_err(|e| e.to_string())?;
    println!(
        "  ✓ Extracted t={}, R_F={}, R_P={}, {} round constants",
        set.metadata.state_size,
        set.metadata.full_rounds,
        set.metadata.partial_rounds,
        set.round_constants.len()
    );

    let configs = if curves.exists() {
        load_curve_configs(&curves)?
    } else {
        tracing::debug!("no curve config at {}", curves.display());
        Vec::new()
    };

    let file_label = input
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default()
        .to_lowercase();
    let config = match &curve {
        Some(label) => configs.iter().find(|c| &c.name == label),
        None => detect_curve_config(&file_label, &configs),
    };

    let label = curve
        .or_else(|| config.map(|c| c.name.clone()))
        .ok_or_else(|| {
            "Could not detect the curve from the file name; pass --curve".to_string()
        })?;

    let element_type = element_type
        .or_else(|| config.map(|c| c.element_type()))
        .ok_or_else(|| {
            format!(
                "No element type configured for '{}'; pass --element-type",
                label
            )
        })?;

    let mut constants_config = ConstantsConfig::new(label.clone(), element_type);
    constants_config.params_type = params_type;

    // Render fully in memory; nothing is written if generation fails.
    let code = render_constants(&set, &constants_config).map_err(|e| e.to_string())?;

    fs::create_dir_all(&output)
        .map_err(|e| format!("Failed to create output directory: {}", e))?;
    let out_path = output.join(format!("{}.rs", label));
    fs::write(&out_path, code)
        .map_err(|e| format!("Failed to write {}: {}", out_path.display(), e))?;

    println!("  ✓ Generated {}", out_path.display());
    println!("✨ Generation complete!");
    Ok(())
}

fn detect_curve_config<'a>(
    file_label: &str,
    configs: &'a [CurveConfig],
) -> Option<&'a CurveConfig> {
    configs.iter().find(|c| file_label.contains(&c.name))
}

/// Validate parameter text dumps without writing output
fn validate(input: PathBuf) -> Result<(), String> {
    let files = collect_inputs(&input)?;
    println!("🔍 Validating {} parameter file(s)...", files.len());

    let mut failures = 0usize;
    for path in &files {
        let outcome = fs::read_to_string(path)
            .map_err(|e| format!("Failed to read file: {}", e))
            .and_then(|text| extract_parameter_set(&text).map_err(|e| e.to_string()));
        match outcome {
            Ok(set) => println!(
                "  ✓ {} (t={}, {} rounds)",
                path.display(),
                set.metadata.state_size,
                set.total_rounds()
            ),
            Err(e) => {
                failures += 1;
                eprintln!("  ✗ {}: {}", path.display(), e);
            }
        }
    }

    if failures > 0 {
        return Err(format!("{} of {} files failed validation", failures, files.len()));
    }
    println!("✅ All parameter files are valid!");
    Ok(())
}
