//! simplate CLI
//!
//! Usage:
//!   simplate render [OPTIONS] [TEMPLATE]
//!   simplate check [OPTIONS] [TEMPLATE]
//!   simplate migrate [FILE] [-o OUT]
//!   simplate list
//!   simplate show NAME
//!
//! TEMPLATE is a file path or `builtin:NAME`; stdin is read when omitted.

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process;

use clap::{Args, Parser, Subcommand};
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

use simplate::{
    lint, migrate, render_template, MarkerSyntax, NumberFormat, ParameterSet, ParamsFile,
    RenderConfig, Template, TemplateDefinition, TemplateError, TemplateRegistry,
};

const BUILTIN_PREFIX: &str = "builtin:";

#[derive(Parser)]
#[command(name = "simplate")]
#[command(about = "Render model, script and report templates for motor eccentricity studies")]
struct Cli {
    /// Log debug information to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Substitute parameters into a template
    Render {
        #[command(flatten)]
        input: TemplateInput,

        #[command(flatten)]
        params: ParamArgs,

        /// Default number format: shortest, .N, .Nf, .Ne or e
        #[arg(long)]
        float_format: Option<NumberFormat>,

        /// Fail when a parameter is not referenced by the template
        #[arg(long)]
        deny_unused: bool,

        /// Output file (writes to stdout if not provided)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List placeholders and compare them with the supplied parameters
    Check {
        #[command(flatten)]
        input: TemplateInput,

        #[command(flatten)]
        params: ParamArgs,
    },

    /// Rewrite a legacy %name% / <name> template in brace syntax
    Migrate {
        /// Legacy template file (reads from stdin if not provided)
        input: Option<PathBuf>,

        /// Output file (writes to stdout if not provided)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List the builtin templates
    List,

    /// Print the source of a builtin template
    Show {
        /// Builtin template name
        name: String,
    },
}

#[derive(Args)]
struct TemplateInput {
    /// Template file or builtin:NAME (reads from stdin if not provided)
    template: Option<String>,

    /// Marker syntax of a file or stdin template
    #[arg(long, default_value = "brace")]
    syntax: MarkerSyntax,
}

#[derive(Args)]
struct ParamArgs {
    /// Parameter file (TOML); repeat to layer files, later ones win
    #[arg(short, long = "params", value_name = "FILE")]
    params_files: Vec<PathBuf>,

    /// Set a parameter, typed as integer, float or text
    #[arg(short, long = "set", value_name = "KEY=VALUE")]
    set: Vec<String>,

    /// Set a parameter that is always text
    #[arg(long = "text", value_name = "KEY=VALUE")]
    text: Vec<String>,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let status = match cli.command {
        Command::Render {
            input,
            params,
            float_format,
            deny_unused,
            output,
        } => run_render(&input, &params, float_format, deny_unused, output.as_deref()),
        Command::Check { input, params } => run_check(&input, &params),
        Command::Migrate { input, output } => run_migrate(input.as_deref(), output.as_deref()),
        Command::List => {
            print_list();
            Ok(())
        }
        Command::Show { name } => run_show(&name),
    };

    if let Err(message) = status {
        eprintln!("{}", message);
        process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn run_render(
    input: &TemplateInput,
    args: &ParamArgs,
    float_format: Option<NumberFormat>,
    deny_unused: bool,
    output: Option<&Path>,
) -> Result<(), String> {
    let template = load_template(input)?;
    let (params, mut config) = load_params(args)?;

    if let Some(format) = float_format {
        config = config.with_float_format(format);
    }
    if deny_unused {
        config = config.with_deny_unused(true);
    }

    let artifact = render_template(&template, &params, &config)
        .map_err(|e| report(&e, &template))?;

    for warning in &artifact.warnings {
        warn!("{}", warning);
    }

    write_output(output, &artifact.text)
}

fn run_check(input: &TemplateInput, args: &ParamArgs) -> Result<(), String> {
    let template = load_template(input)?;
    let (params, _) = load_params(args)?;

    let placeholders = template.placeholders();
    println!(
        "{} ({} syntax): {} placeholder(s)",
        template.name,
        template.syntax,
        placeholders.len()
    );

    let mut missing = Vec::new();
    for name in &placeholders {
        match params.get(name.as_str()) {
            Some(value) => println!("  {:<28} = {}", name.as_str(), value),
            None => {
                println!("  {:<28}   (missing)", name.as_str());
                missing.push(name.as_str());
            }
        }
    }

    for warning in lint::check(&template, &params) {
        println!("warning: {}", warning);
    }

    if missing.is_empty() {
        Ok(())
    } else {
        Err(format!("Error: missing parameters: {}", missing.join(", ")))
    }
}

fn run_migrate(input: Option<&Path>, output: Option<&Path>) -> Result<(), String> {
    let source = read_source(input)?;
    write_output(output, &migrate(&source))
}

fn run_show(name: &str) -> Result<(), String> {
    let registry = TemplateRegistry::with_builtins();
    let def = registry.get(name).map_err(|e| format!("Error: {}", e))?;
    print!("{}", def.source);
    Ok(())
}

fn print_list() {
    let registry = TemplateRegistry::with_builtins();
    for def in registry.definitions() {
        println!(
            "{:<22} {:<7} {}",
            def.name,
            def.syntax,
            def.description.as_deref().unwrap_or("")
        );
    }
}

fn load_template(input: &TemplateInput) -> Result<Template, String> {
    let reference = input.template.as_deref();
    let def = match reference.map(|r| (r, r.strip_prefix(BUILTIN_PREFIX))) {
        Some((_, Some(name))) => {
            let registry = TemplateRegistry::with_builtins();
            registry
                .get(name)
                .map_err(|e| format!("Error: {}", e))?
                .clone()
        }
        Some((path, None)) => {
            let mut registry = TemplateRegistry::new();
            registry
                .load_file(path, Path::new(path), input.syntax)
                .map_err(|e| format!("Error: {}", e))?
                .clone()
        }
        None => TemplateDefinition::new("<stdin>", read_source(None)?, input.syntax),
    };

    debug!(template = %def.name, syntax = %def.syntax, "loading template");
    def.parse().map_err(|e| e.format(&def.source, &def.name))
}

fn load_params(args: &ParamArgs) -> Result<(ParameterSet, RenderConfig), String> {
    let mut params = ParameterSet::new();
    let mut config = RenderConfig::new();

    for path in &args.params_files {
        let file = ParamsFile::from_file(path)
            .map_err(|e| format!("Error loading parameters '{}': {}", path.display(), e))?;
        debug!(
            path = %path.display(),
            name = file.name.as_deref().unwrap_or(""),
            count = file.parameters.len(),
            "loaded parameter file"
        );
        config = config.with_params_file(&file);
        params.merge(file.parameters);
    }

    for assignment in &args.set {
        params
            .assign(assignment)
            .map_err(|e| format!("Error: {}", e))?;
    }
    for assignment in &args.text {
        params
            .assign_text(assignment)
            .map_err(|e| format!("Error: {}", e))?;
    }

    Ok((params, config))
}

fn report(err: &TemplateError, template: &Template) -> String {
    err.format(&template.source, &template.name)
}

fn read_source(path: Option<&Path>) -> Result<String, String> {
    match path {
        Some(path) => fs::read_to_string(path)
            .map_err(|e| format!("Error reading file '{}': {}", path.display(), e)),
        None => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .map_err(|e| format!("Error reading from stdin: {}", e))?;
            Ok(buffer)
        }
    }
}

fn write_output(path: Option<&Path>, text: &str) -> Result<(), String> {
    match path {
        Some(path) => fs::write(path, text)
            .map_err(|e| format!("Error writing file '{}': {}", path.display(), e)),
        None => {
            print!("{}", text);
            Ok(())
        }
    }
}
