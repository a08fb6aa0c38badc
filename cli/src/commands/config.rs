use crate::error::{CliError, Result};
use clap::Args;
use enginebench::Config;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct ConfigArgs {
    /// Where to write the sample configuration
    #[arg(short, long, default_value = "enginebench.toml")]
    pub output: PathBuf,

    /// Overwrite an existing file
    #[arg(long)]
    pub force: bool,
}

pub fn run(args: ConfigArgs) -> Result<()> {
    if args.output.exists() && !args.force {
        return Err(CliError::Usage(format!(
            "{} already exists; pass --force to overwrite",
            args.output.display()
        )));
    }

    let config = Config::default();
    config.save_to_file(&args.output)?;
    println!("Wrote sample configuration to {}", args.output.display());
    Ok(())
}
