//! cardcopy CLI: ingest a card, list its dates, or reconcile orphaned CR3 files.

use anyhow::Result;
use cardcopy::engine::arg_parser::Cli;
use cardcopy::engine::handle_run;
use clap::Parser;
use std::time::Instant;

fn main() -> Result<()> {
    let start_time = Instant::now();
    let cli = Cli::parse();
    handle_run(&cli)?;
    log::debug!("Total time: {:?}", start_time.elapsed());
    Ok(())
}
