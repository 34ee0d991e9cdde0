//! Logicnet - command-line front end
//!
//! Lists the built-in registries, evaluates operators over literal inputs
//! and converts operators to and from their persisted text form.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use logicnet::core::{EngineConfig, Localizer};
use logicnet::evaluate::{CurriedOperator, Operator, Variable};
use logicnet::Registries;

#[derive(Parser, Debug)]
#[command(name = "logicnet", about = "Evaluate and persist logic network operators")]
struct Cli {
    /// Engine configuration file (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List registered value types
    Types,
    /// Print the operator catalog
    Operators {
        /// Include category and unique name in tooltips
        #[arg(long)]
        verbose: bool,
    },
    /// Evaluate an operator over `<type>:<value>` inputs
    Eval {
        operator: String,
        inputs: Vec<String>,
    },
    /// Print the persisted form of an operator curried with one input
    Curry { operator: String, applied: String },
    /// Read a persisted operator, describe it and optionally evaluate it
    Load {
        persisted: String,
        #[arg(long = "arg")]
        args: Vec<String>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => match EngineConfig::load(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Failed to load {}: {}", path.display(), e);
                return ExitCode::FAILURE;
            }
        },
        None => EngineConfig::default(),
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match run(cli.command, config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("{}", message);
            ExitCode::FAILURE
        }
    }
}

fn run(command: Command, config: EngineConfig) -> Result<(), String> {
    let loaded = if config.locale == "en_us" {
        Localizer::english()
    } else {
        Localizer::load(std::path::Path::new("lang"), &config.locale)
    };
    let l10n = loaded.map_err(|e| e.to_string())?;

    let registries = Registries::with_builtins(config).map_err(|e| e.to_string())?;

    match command {
        Command::Types => {
            let mut types: Vec<_> = registries.value_types().value_types().collect();
            types.sort_by(|a, b| a.type_name().cmp(b.type_name()));
            for value_type in types {
                let kind = if value_type.is_category() { " (category)" } else { "" };
                println!(
                    "{:<10} {}{}",
                    value_type.type_name(),
                    l10n.render(&value_type.display_name()),
                    kind
                );
            }
        }
        Command::Operators { verbose } => {
            for entry in registries.catalog(&l10n) {
                println!("{:<28} {:<5} {}", entry.unique_name, entry.symbol, entry.name);
                let shown = if verbose { entry.tooltip.len() } else { 1 };
                for line in entry.tooltip.iter().skip(1).take(shown) {
                    println!("    {}", line);
                }
            }
        }
        Command::Eval { operator, inputs } => {
            let operator = registries
                .operators()
                .get_operator(&operator)
                .map_err(|e| l10n.render(&e.message()))?;
            let inputs = parse_inputs(&registries, &inputs)?;
            evaluate(operator.as_ref(), &inputs, &l10n)?;
        }
        Command::Curry { operator, applied } => {
            let base = registries
                .operators()
                .get_operator(&operator)
                .map_err(|e| l10n.render(&e.message()))?;
            let applied = parse_input(&registries, &applied)?;
            let curried = CurriedOperator::curry(base, applied).map_err(|e| e.to_string())?;
            let text = registries
                .serialize_operator(curried.as_ref())
                .map_err(|e| l10n.render(&e.message()))?;
            println!("{}", text);
        }
        Command::Load { persisted, args } => {
            let operator = registries
                .deserialize_operator(&persisted)
                .map_err(|e| l10n.render(&e.message()))?;
            println!("{} ({})", operator.localized_name_full(&l10n), operator.symbol());
            let mut lines = Vec::new();
            operator.load_tooltip(&l10n, &mut lines, false);
            for line in lines {
                println!("    {}", line);
            }
            if !args.is_empty() || operator.required_input_length() == 0 {
                let inputs = parse_inputs(&registries, &args)?;
                evaluate(operator.as_ref(), &inputs, &l10n)?;
            }
        }
    }
    Ok(())
}

fn evaluate(operator: &dyn Operator, inputs: &[Variable], l10n: &Localizer) -> Result<(), String> {
    let value = operator
        .evaluate(inputs)
        .map_err(|e| l10n.render(&e.message()))?;
    println!("{} = {}", value.value_type(), value);
    Ok(())
}

fn parse_inputs(registries: &Registries, inputs: &[String]) -> Result<Vec<Variable>, String> {
    inputs
        .iter()
        .map(|input| parse_input(registries, input))
        .collect()
}

/// Parse `<type>:<value>` into a captured variable
fn parse_input(registries: &Registries, input: &str) -> Result<Variable, String> {
    let (type_name, text) = input
        .split_once(':')
        .ok_or_else(|| format!("expected <type>:<value>, got '{}'", input))?;
    let value_type = registries
        .value_types()
        .get_value_type(type_name)
        .map_err(|e| e.to_string())?;
    let value = value_type
        .deserialize_value(text)
        .map_err(|e| e.to_string())?;
    Ok(Variable::captured(value))
}
