//! CLI argument parsing with clap

use camino::Utf8PathBuf;
use clap::Parser;

/// craftgen - scaffold a new Craft CMS website
///
/// Asks for the site name, domain, production TLD, staging domain and
/// license acceptance, then downloads Craft and the Parsedown plugin,
/// removes the stock files and writes the project templates.
#[derive(Parser, Debug)]
#[command(name = "craftgen")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress output
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Project directory (defaults to the current directory)
    #[arg(short = 'C', long, value_name = "DIR")]
    pub dest: Option<Utf8PathBuf>,

    /// Scaffold settings file (archives, prune list, template manifest)
    #[arg(long, env = "CRAFTGEN_SETTINGS", value_name = "FILE")]
    pub settings: Option<Utf8PathBuf>,

    /// Read templates from this directory instead of the built-in set
    #[arg(long, value_name = "DIR")]
    pub templates: Option<Utf8PathBuf>,

    /// Answer the prompts from a YAML file
    #[arg(long, value_name = "FILE")]
    pub answers: Option<Utf8PathBuf>,

    /// Do not run the dependency installer (npm install)
    #[arg(long)]
    pub skip_install: bool,

    /// Print the steps that would run and exit
    #[arg(long)]
    pub dry_run: bool,
}
