//! rqlmap code generation - generates `rqlmap::Record` impls from annotated
//! struct declarations at compile time.
//!
//! The main entry point is [`generate_from_sources`], which reads Rust source
//! files, picks up every struct whose fields carry persistence annotations,
//! and writes a source file with the cleaned structs, list aliases and
//! `Record` impls.

mod annotation;
mod generator;
mod record_gen;
pub mod sources;
pub mod type_utils;

pub use annotation::{ConfigWarning, ParsedRecord};

use std::error::Error;
use std::fs;
use std::path::Path;
use syn::ItemUse;

/// Settings for one generator run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateOptions {
    /// Name of the persistence annotation
    pub tag: String,
    /// Only these type names, when non-empty
    pub types: Vec<String>,
    /// Only type names starting with this prefix, when non-empty
    pub prefix: String,
    /// Emit impls and aliases only; the structs are declared elsewhere
    pub impls_only: bool,
    /// Named in the header of the generated file
    pub tool_name: String,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        GenerateOptions {
            tag: "sql".to_string(),
            types: Vec::new(),
            prefix: String::new(),
            impls_only: false,
            tool_name: "rqlmap-codegen".to_string(),
        }
    }
}

/// Generate record impls from Rust source files.
///
/// Reads every file in `paths`, generates code for the annotated structs and
/// writes it to `output`. This is intended to be called from a `build.rs`
/// build script.
///
/// # Example
///
/// ```no_run
/// // In build.rs:
/// let out = format!("{}/records.rs", std::env::var("OUT_DIR").unwrap());
/// rqlmap_codegen::generate_from_sources(&["schema/records.rs"], &out, &Default::default())
///     .unwrap();
/// ```
pub fn generate_from_sources<P: AsRef<Path>>(
    paths: &[P],
    output: impl AsRef<Path>,
    options: &GenerateOptions,
) -> Result<(), Box<dyn Error>> {
    let (records, uses) = load_sources(paths, options)?;
    if records.is_empty() {
        log::warn!("no annotated types found");
    }
    let code = render(&records, &uses, options)?;
    let output = output.as_ref();
    fs::write(output, code).map_err(|e| format!("writing {}: {}", output.display(), e))?;
    log::debug!("wrote {} record types to {}", records.len(), output.display());
    Ok(())
}

/// Generate record impls from a source string.
///
/// Like [`generate_from_sources`] but takes the source directly and returns
/// the generated code. Useful for testing.
pub fn generate_from_source_str(
    source: &str,
    options: &GenerateOptions,
) -> Result<String, Box<dyn Error>> {
    let file = syn::parse_file(source)?;
    let mut uses = Vec::new();
    generator::collect_uses(&file, &mut uses);
    let records = annotation::parse_file(&file, options);
    render(&records, &uses, options)
}

/// Parse the record types of a source string without generating anything.
pub fn parse_records(
    source: &str,
    options: &GenerateOptions,
) -> Result<Vec<ParsedRecord>, Box<dyn Error>> {
    let file = syn::parse_file(source)?;
    Ok(annotation::parse_file(&file, options))
}

/// Parse the record types of several source files.
pub fn parse_sources<P: AsRef<Path>>(
    paths: &[P],
    options: &GenerateOptions,
) -> Result<Vec<ParsedRecord>, Box<dyn Error>> {
    Ok(load_sources(paths, options)?.0)
}

fn load_sources<P: AsRef<Path>>(
    paths: &[P],
    options: &GenerateOptions,
) -> Result<(Vec<ParsedRecord>, Vec<ItemUse>), Box<dyn Error>> {
    let mut records: Vec<ParsedRecord> = Vec::new();
    let mut uses = Vec::new();
    for path in paths {
        let path = path.as_ref();
        let source =
            fs::read_to_string(path).map_err(|e| format!("reading {}: {}", path.display(), e))?;
        let file =
            syn::parse_file(&source).map_err(|e| format!("parsing {}: {}", path.display(), e))?;
        generator::collect_uses(&file, &mut uses);
        for record in annotation::parse_file(&file, options) {
            if records.iter().any(|r| r.schema.name == record.schema.name) {
                log::warn!(
                    "skipping type {} in {}: already declared",
                    record.schema.name,
                    path.display()
                );
                continue;
            }
            records.push(record);
        }
    }
    Ok((records, uses))
}

fn render(
    records: &[ParsedRecord],
    uses: &[ItemUse],
    options: &GenerateOptions,
) -> Result<String, Box<dyn Error>> {
    let tokens = generator::generate_all(records, uses, options)?;
    let formatted = generator::format_token_stream(&tokens, &generator::header(&options.tool_name))?;
    Ok(formatted)
}
