// SPDX-License-Identifier: MIT

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use dotenv::dotenv;
use dynexpr::expression::{tokenize, Expression};
use dynexpr::ruleset::{ParamsLoader, RuleSetLoader};
use serde_json::{Map, Value};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Evaluate a single condition
    Eval {
        /// The condition to evaluate
        #[arg(short, long)]
        expr: String,

        /// YAML or JSON file with parameter values
        #[arg(short, long)]
        params: Option<String>,

        /// Parameter override as key=value (repeatable)
        #[arg(short, long = "set", value_parser = ParamsLoader::parse_assignment)]
        set: Vec<(String, Value)>,
    },
    /// Print the tokens of a condition, one per line
    Tokens {
        /// The condition to tokenize
        #[arg(short, long)]
        expr: String,
    },
    /// Evaluate every rule of a rule file
    Check {
        /// Path to the rule file
        #[arg(short, long)]
        rules: String,

        /// YAML or JSON file with parameter values
        #[arg(short, long)]
        params: Option<String>,

        /// Parameter override as key=value (repeatable)
        #[arg(short, long = "set", value_parser = ParamsLoader::parse_assignment)]
        set: Vec<(String, Value)>,
    },
}

/// Merge the params file (or DYNEXPR_PARAMS) with command-line overrides
fn load_params(
    path: Option<String>,
    overrides: &[(String, Value)],
) -> anyhow::Result<Map<String, Value>> {
    let path = ParamsLoader::params_path(path);
    ParamsLoader::load_with_overrides(path.as_deref(), overrides).with_context(|| {
        format!(
            "Failed to load parameters from {}",
            path.as_deref().unwrap_or("<none>")
        )
    })
}

fn main() -> anyhow::Result<()> {
    dotenv().ok();
    env_logger::init();

    let args = Args::parse();

    match args.command {
        Commands::Eval { expr, params, set } => {
            let params = load_params(params, &set)?;
            let expression = Expression::parse(&expr)
                .with_context(|| format!("Failed to parse condition: {}", expr))?;
            println!("{}", expression.execute_with(&params));
        }
        Commands::Tokens { expr } => {
            for token in tokenize(&expr) {
                println!("{}", token);
            }
        }
        Commands::Check { rules, params, set } => {
            let params = load_params(params, &set)?;
            let rule_set = RuleSetLoader::new()
                .load(&rules)
                .with_context(|| format!("Failed to load rules from {}", rules))?;
            if rule_set.rules.is_empty() {
                bail!("Rule file {} contains no rules", rules);
            }
            let compiled = rule_set.compile()?;

            log::info!(
                "Checking {} rules from {}",
                compiled.rules().len(),
                compiled.name().unwrap_or(&rules)
            );
            for outcome in compiled.evaluate(&params) {
                println!("{}: {}", outcome.name, outcome.matched);
            }
        }
    }

    Ok(())
}
