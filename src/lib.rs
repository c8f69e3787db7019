//! modtree — module trees for infrastructure projects.
//!
//! Loads a project's module calls into a tree of module instances, addresses
//! counted and keyed instances by name, and collects non-fatal warnings such
//! as missing input variables without aborting the load.

pub mod cli;
pub mod core;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "modtree",
    version,
    about = "Module tree loader for infrastructure projects — instance addressing, warnings"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: cli::Commands,
}
