use std::env;

use anyhow::{Context, Result};
use colored::Colorize;

use super::super::{args::ExtractCommand, exit_status::ExitStatus, report};
use crate::{
    config::{CONFIG_FILE_NAME, ConfigLoadResult, load_config},
    core::{ExtractOptions, Extractor},
};

pub fn extract(cmd: ExtractCommand) -> Result<ExitStatus> {
    let args = cmd.args;
    let cwd = env::current_dir().context("Failed to read current directory")?;

    let ConfigLoadResult {
        mut config,
        from_file,
    } = load_config(&cwd)?;
    if !from_file && args.verbose {
        eprintln!(
            "{} No {} found, using defaults",
            "note:".bold().cyan(),
            CONFIG_FILE_NAME
        );
    }
    args.overrides.apply(&mut config);

    let extractor = Extractor::new(
        config,
        ExtractOptions {
            dry_run: args.dry_run,
            verbose: args.verbose,
        },
    )?;

    let summary = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?
        .block_on(extractor.run())?;

    report::print_summary(&summary, args.verbose);

    Ok(ExitStatus::Success)
}
