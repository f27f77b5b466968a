//! Command-line interface for structgen.

use std::collections::BTreeSet;
use std::io::{self, Write};
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::Colorize;

use crate::config::Config;
use crate::error::GenError;
use crate::extract::Mode;
use crate::format::{self, FormatterKind};
use crate::naming::is_identifier;
use crate::output::{self, WriteMode};
use crate::parser::{self, WalkOptions};
use crate::pipeline::Generator;
use crate::render::RenderOptions;
use crate::scan::TypeFilter;

/// Exit codes.
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_ERROR: i32 = 2;

/// Generate Go interfaces and accessors from struct declarations.
///
/// structgen reads the Go package in a directory and either derives an
/// interface from each type's method set, or writes a getter and a setter
/// for every field of each struct.
#[derive(Parser)]
#[command(name = "structgen")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Log debug details to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Derive an interface from the method set of each type
    #[command(visible_alias = "extract-interface")]
    Interface(InterfaceArgs),
    /// Generate getters and setters for struct fields
    #[command(visible_alias = "getset")]
    Accessors(AccessorArgs),
}

/// What to print.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Formatted Go source
    #[default]
    Go,
    /// Extraction results as JSON
    Json,
}

/// Arguments shared by both commands.
#[derive(Args, Debug, Clone)]
pub struct CommonArgs {
    /// Directory of the Go package to read
    #[arg(default_value = ".")]
    pub dir: PathBuf,

    /// Comma separated type names to generate for (default: all)
    #[arg(short, long)]
    pub types: Option<String>,

    /// Path to config YAML file (default: auto-discover in DIR)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Formatter for generated code
    #[arg(long, value_enum)]
    pub formatter: Option<FormatterKind>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Go)]
    pub format: OutputFormat,

    /// Also read packages in subdirectories
    #[arg(short, long)]
    pub recursive: bool,

    /// Process packages in parallel
    #[arg(long)]
    pub parallel: bool,

    /// Read _test.go files too
    #[arg(long)]
    pub include_tests: bool,
}

/// Arguments for the interface command.
#[derive(Args, Debug, Clone)]
pub struct InterfaceArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Suffix appended to type names to name interfaces
    #[arg(short, long)]
    pub suffix: Option<String>,
}

/// Arguments for the accessors command.
#[derive(Args, Debug, Clone)]
pub struct AccessorArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Write <package>_getters_and_setters.go into the package directory
    #[arg(short, long)]
    pub write: bool,

    /// Leave the generation time out of the file header
    #[arg(long)]
    pub no_timestamp: bool,
}

/// Settings resolved from the config file and command-line flags.
struct Settings {
    config: Config,
    filter: TypeFilter,
    walk: WalkOptions,
    formatter: FormatterKind,
}

impl Settings {
    fn resolve(args: &CommonArgs) -> anyhow::Result<Self> {
        let (config, config_path) = Config::load(args.config.as_deref(), &args.dir)?;
        if let Some(path) = &config_path {
            tracing::debug!(path = %path.display(), "loaded config");
        }

        let filter = match &args.types {
            Some(list) => TypeFilter::parse(list)?,
            None => config.type_filter()?,
        };
        let walk = WalkOptions {
            recursive: args.recursive,
            include_test_files: args.include_tests || config.should_include_test_files(),
            excluded: config.excluded_globs()?,
        };
        let formatter = args.formatter.unwrap_or_else(|| config.formatter());

        Ok(Self {
            config,
            filter,
            walk,
            formatter,
        })
    }
}

/// Run the interface command, printing to stdout.
pub fn run_interface(args: &InterfaceArgs) -> anyhow::Result<i32> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    run_interface_to(args, &mut out)
}

/// Run the interface command, printing to `out`.
pub fn run_interface_to<W: Write>(args: &InterfaceArgs, out: &mut W) -> anyhow::Result<i32> {
    let settings = Settings::resolve(&args.common)?;
    let suffix = match &args.suffix {
        Some(suffix) => {
            if !suffix.is_empty() && !is_identifier(&format!("X{}", suffix)) {
                return Err(GenError::InvalidTarget(format!(
                    "suffix {:?} cannot be part of a type name",
                    suffix
                ))
                .into());
            }
            suffix.clone()
        }
        None => settings.config.interface_suffix().to_string(),
    };

    let generator = Generator::new(Mode::InterfaceExtraction)
        .filter(settings.filter.clone())
        .interface_suffix(suffix)
        .formatter(format::for_kind(settings.formatter))
        .parallel(args.common.parallel);

    run(&generator, &args.common, &settings, WriteMode::Stdout, out)
}

/// Run the accessors command, printing to stdout.
pub fn run_accessors(args: &AccessorArgs) -> anyhow::Result<i32> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    run_accessors_to(args, &mut out)
}

/// Run the accessors command, printing to `out`.
pub fn run_accessors_to<W: Write>(args: &AccessorArgs, out: &mut W) -> anyhow::Result<i32> {
    let settings = Settings::resolve(&args.common)?;
    let banner = settings.config.banner().to_string();
    let render = if args.no_timestamp || !settings.config.should_timestamp() {
        RenderOptions {
            banner,
            timestamp: None,
        }
    } else {
        RenderOptions::stamped(banner)
    };

    let generator = Generator::new(Mode::AccessorGeneration)
        .filter(settings.filter.clone())
        .render_options(render)
        .formatter(format::for_kind(settings.formatter))
        .parallel(args.common.parallel);

    let mode = if args.write {
        WriteMode::PackageFile
    } else {
        WriteMode::Stdout
    };
    run(&generator, &args.common, &settings, mode, out)
}

fn run<W: Write>(
    generator: &Generator,
    args: &CommonArgs,
    settings: &Settings,
    mode: WriteMode,
    out: &mut W,
) -> anyhow::Result<i32> {
    let packages = parser::load_packages(&args.dir, &settings.walk)?;
    if packages.is_empty() {
        tracing::warn!(dir = %args.dir.display(), "no Go files to read");
        return Ok(EXIT_SUCCESS);
    }
    tracing::info!(
        packages = packages.len(),
        mode = %generator.mode(),
        formatter = %settings.formatter,
        "generating"
    );

    let mut seen = BTreeSet::new();

    if args.format == OutputFormat::Json {
        if mode == WriteMode::PackageFile {
            tracing::warn!("--write has no effect with --format json");
        }
        let mut results = Vec::new();
        for result in generator.extract_all(packages) {
            let result = result?;
            seen.extend(result.extracted.type_names().into_iter().map(String::from));
            results.push(result);
        }
        output::write_json(&results, out)?;
    } else {
        let mut emitted = 0usize;
        for generated in generator.generate_all(packages) {
            if let Some(package_output) = generated? {
                seen.extend(package_output.types.iter().cloned());
                output::write_output(&package_output, mode, out)?;
                emitted += 1;
            }
        }
        if emitted == 0 {
            tracing::info!("nothing to generate");
        }
    }

    for name in generator.type_filter().unmatched(&seen) {
        tracing::warn!(type_name = %name, "no output for requested type");
    }

    Ok(EXIT_SUCCESS)
}

/// Print an error as `Error: <stage>: <cause>` to stderr.
pub fn report_error(err: &anyhow::Error) {
    let message = match err.downcast_ref::<GenError>() {
        Some(gen_err) => format!("{}: {}", gen_err.stage(), gen_err),
        None => err.to_string(),
    };
    eprintln!("{} {}", "Error:".red().bold(), message);
    for cause in err.chain().skip(1) {
        eprintln!("  caused by: {}", cause);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_aliases() {
        let cli = Cli::try_parse_from(["structgen", "getset", "pkg", "--types", "Point", "-w"]).unwrap();
        match cli.command {
            Commands::Accessors(args) => {
                assert_eq!(args.common.dir, PathBuf::from("pkg"));
                assert_eq!(args.common.types.as_deref(), Some("Point"));
                assert!(args.write);
            }
            _ => panic!("expected accessors"),
        }

        let cli = Cli::try_parse_from(["structgen", "-v", "extract-interface", "--suffix", "API"]).unwrap();
        assert!(cli.verbose);
        match cli.command {
            Commands::Interface(args) => {
                assert_eq!(args.common.dir, PathBuf::from("."));
                assert_eq!(args.suffix.as_deref(), Some("API"));
                assert_eq!(args.common.format, OutputFormat::Go);
            }
            _ => panic!("expected interface"),
        }
    }

    #[test]
    fn test_cli_value_enums() {
        let cli = Cli::try_parse_from([
            "structgen", "accessors", "--format", "json", "--formatter", "gofmt",
        ])
        .unwrap();
        match cli.command {
            Commands::Accessors(args) => {
                assert_eq!(args.common.format, OutputFormat::Json);
                assert_eq!(args.common.formatter, Some(FormatterKind::Gofmt));
            }
            _ => panic!("expected accessors"),
        }
        assert!(Cli::try_parse_from(["structgen", "accessors", "--format", "xml"]).is_err());
    }

    #[test]
    fn test_missing_dir_is_config_error() {
        let cli = Cli::try_parse_from(["structgen", "interface", "/nonexistent/structgen/dir"]).unwrap();
        let Commands::Interface(args) = cli.command else {
            panic!("expected interface");
        };
        let mut out = Vec::new();
        let err = run_interface_to(&args, &mut out).unwrap_err();
        let gen_err = err.downcast_ref::<GenError>().unwrap();
        assert_eq!(gen_err.stage(), "config");
        assert!(out.is_empty());
    }
}
