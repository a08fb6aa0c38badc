use crate::error::Result;
use clap::Args;
use console::style;
use enginebench::{EngineId, EngineTemplate, SuiteRegistry};

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Only show this suite
    pub suite: Option<String>,

    /// Print the SQL each engine runs
    #[arg(long)]
    pub sql: bool,
}

pub fn run(args: ListArgs) -> Result<()> {
    let registry = SuiteRegistry::builtin()?;
    let suites = match &args.suite {
        Some(name) => vec![registry.get(name)?],
        None => registry.iter().collect(),
    };

    for suite in suites {
        let variants: Vec<String> = suite.variants().iter().map(|v| v.to_string()).collect();
        println!(
            "{} - {} ({} functions; variants: {})",
            style(suite.name()).bold(),
            suite.description(),
            suite.functions().len(),
            variants.join(", ")
        );

        for function in suite.functions() {
            let unsupported: Vec<&str> = EngineId::ALL
                .iter()
                .filter(|e| matches!(function.template(**e), Some(EngineTemplate::Unsupported)))
                .map(|e| e.display_name())
                .collect();
            if unsupported.is_empty() {
                println!("  {}", function.name());
            } else {
                println!(
                    "  {} {}",
                    function.name(),
                    style(format!("(unsupported on {})", unsupported.join(", "))).dim()
                );
            }

            if args.sql {
                for engine in EngineId::ALL {
                    if let Some(sql) = suite.render_statement(function, engine)? {
                        println!("    {:<10} {}", engine.as_str(), sql);
                    }
                }
            }
        }
        println!();
    }

    Ok(())
}
