use clap::{Parser, ValueEnum};
use rqlmap::SchemaModel;
use rqlmap_codegen::sources::SourceSet;
use rqlmap_codegen::GenerateOptions;
use std::path::PathBuf;
use std::process;

/// rqlgen: generate rqlmap Record impls from annotated Rust structs
#[derive(Parser, Debug)]
#[command(name = "rqlgen", version, about)]
struct Cli {
    /// A single directory, or a list of source files (default: current directory)
    inputs: Vec<PathBuf>,

    /// Name of the field annotation holding the column name
    #[arg(long, default_value = "sql")]
    tag: String,

    /// Comma-separated list of type names (default: every annotated type)
    #[arg(long = "type", value_delimiter = ',')]
    types: Vec<String>,

    /// Only consider types whose name starts with this prefix
    #[arg(long, default_value = "")]
    prefix: String,

    /// Output file (default: db_generated.rs next to the inputs)
    #[arg(long, short)]
    output: Option<PathBuf>,

    /// Emit only impls and list aliases, not the structs
    #[arg(long)]
    impls_only: bool,

    /// Print the parsed schemas instead of generating code
    #[arg(long)]
    dump_schema: bool,

    /// Output format for --dump-schema
    #[arg(long, default_value = "yaml")]
    format: OutputFormat,

    /// Log what is being evaluated
    #[arg(long, short)]
    verbose: bool,
}

#[derive(Clone, Debug, ValueEnum)]
enum OutputFormat {
    Yaml,
    Json,
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    };
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .format_target(false)
        .init();

    if let Err(e) = run(cli) {
        log::error!("{e}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let options = GenerateOptions {
        tag: cli.tag.clone(),
        types: cli.types.clone(),
        prefix: cli.prefix.clone(),
        impls_only: cli.impls_only,
        tool_name: tool_name(),
    };
    let sources = SourceSet::discover(&cli.inputs, cli.output.as_deref())?;

    if cli.dump_schema {
        let records = rqlmap_codegen::parse_sources(&sources.files, &options)?;
        let schemas: Vec<&SchemaModel> = records.iter().map(|r| &r.schema).collect();
        print_output(&serde_json::to_value(&schemas)?, &cli.format)?;
        return Ok(());
    }

    let output = cli.output.unwrap_or_else(|| sources.default_output());
    rqlmap_codegen::generate_from_sources(&sources.files, &output, &options)?;
    log::debug!("generated {}", output.display());
    Ok(())
}

/// `'rqlgen <args>'`, recorded in the generated header.
fn tool_name() -> String {
    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.is_empty() {
        "'rqlgen'".to_string()
    } else {
        format!("'rqlgen {}'", args.join(" "))
    }
}

fn print_output(
    value: &serde_json::Value,
    format: &OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(value)?);
        }
        OutputFormat::Yaml => {
            print!("{}", serde_yaml::to_string(value)?);
        }
    }
    Ok(())
}
