//! MT-011: CLI subcommands — tree, warnings, validate, completions.

use crate::core::loader::{self, LoaderOptions};
use crate::core::{parser, vars, ModuleTree};
use clap::{Args, CommandFactory, Subcommand};
use std::path::{Path, PathBuf};

/// Flags shared by every command that loads a project.
#[derive(Args, Debug, Clone, Default)]
pub struct LoadArgs {
    /// Project root directory
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Load variable values from a YAML var file, relative to the project root
    /// unless absolute (repeatable)
    #[arg(long = "terraform-var-file", value_name = "FILE")]
    pub var_files: Vec<PathBuf>,

    /// Set a variable value, NAME=VALUE (repeatable)
    #[arg(long = "terraform-var", value_name = "NAME=VALUE")]
    pub vars: Vec<String>,

    /// Suffix recorded on the root module
    #[arg(long)]
    pub module_suffix: Option<String>,
}

impl LoadArgs {
    fn options(&self, changed_paths: Vec<PathBuf>) -> Result<LoaderOptions, String> {
        let vars = self
            .vars
            .iter()
            .map(|arg| vars::parse_var_arg(arg).map_err(|e| e.to_string()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(LoaderOptions {
            var_files: self.var_files.clone(),
            vars,
            module_suffix: self.module_suffix.clone(),
            changed_paths,
        })
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the module instance tree
    Tree {
        #[command(flatten)]
        load: LoadArgs,

        /// Mark the modules owning these paths as changed; relative paths are
        /// taken from the project root (repeatable)
        #[arg(long, value_name = "PATH")]
        changed: Vec<PathBuf>,
    },

    /// Print warnings raised while loading the project
    Warnings {
        #[command(flatten)]
        load: LoadArgs,

        /// Output as JSON
        #[arg(long)]
        json: bool,

        /// Exit non-zero when any warning is raised (for CI)
        #[arg(long)]
        strict: bool,
    },

    /// Validate block files of a single module directory without following calls
    Validate {
        /// Module directory
        #[arg(default_value = ".")]
        path: PathBuf,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: clap_complete::Shell,
    },
}

/// Dispatch a CLI command.
pub fn dispatch(cmd: Commands) -> Result<(), String> {
    match cmd {
        Commands::Tree { load, changed } => cmd_tree(&load, changed),
        Commands::Warnings { load, json, strict } => cmd_warnings(&load, json, strict),
        Commands::Validate { path } => cmd_validate(&path),
        Commands::Completions { shell } => {
            cmd_completions(shell);
            Ok(())
        }
    }
}

fn load(load: &LoadArgs, changed: Vec<PathBuf>) -> Result<ModuleTree, String> {
    let options = load.options(changed)?;
    loader::load_tree(&load.path, options).map_err(|e| e.to_string())
}

fn cmd_tree(args: &LoadArgs, changed: Vec<PathBuf>) -> Result<(), String> {
    let tree = load(args, changed)?;
    print!("{}", crate::core::report::render_tree(&tree));
    Ok(())
}

fn cmd_warnings(args: &LoadArgs, json: bool, strict: bool) -> Result<(), String> {
    let tree = load(args, Vec::new())?;
    let count = tree.warnings().count();

    if json {
        let out = crate::core::report::warnings_json(&tree)
            .map_err(|e| format!("JSON serialization error: {}", e))?;
        println!("{}", out);
    } else if count == 0 {
        println!("No warnings ({} modules).", tree.len());
    } else {
        print!("{}", crate::core::report::render_warnings(&tree));
        println!();
        println!("{} warning(s) across {} modules.", count, tree.len());
    }

    if strict && count > 0 {
        return Err(format!("{} warning(s)", count));
    }
    Ok(())
}

fn cmd_validate(path: &Path) -> Result<(), String> {
    let files = parser::block_files(path).map_err(|e| e.to_string())?;
    if files.is_empty() {
        return Err(format!(
            "no *{} files in {}",
            parser::BLOCK_FILE_SUFFIX,
            path.display()
        ));
    }

    let mut blocks = Vec::new();
    for file in &files {
        blocks.extend(parser::parse_block_file(file).map_err(|e| e.to_string())?);
    }

    let errors = parser::validate_blocks(&blocks);
    if errors.is_empty() {
        let calls = blocks.iter().filter(|b| b.is_module()).count();
        let variables = blocks.iter().filter(|b| b.is_variable()).count();
        println!(
            "OK: {} ({} files, {} blocks, {} module calls, {} variables)",
            path.display(),
            files.len(),
            blocks.len(),
            calls,
            variables
        );
        Ok(())
    } else {
        for e in &errors {
            eprintln!("  ERROR: {}", e);
        }
        Err(format!("{} validation error(s)", errors.len()))
    }
}

fn cmd_completions(shell: clap_complete::Shell) {
    let mut cmd = crate::Cli::command();
    clap_complete::generate(shell, &mut cmd, "modtree", &mut std::io::stdout());
}
