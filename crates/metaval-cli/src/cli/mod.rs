//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums.  No business logic lives here.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "metaval",
    bin_name = "metaval",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "Validate JSON data against per-class rule files",
    long_about = "metaval checks JSON documents against declarative rules \
                  (required, unique, immutable, min/max, lengths, options, \
                  typed formats and patterns) kept in TOML rule files.",
    after_help = "EXAMPLES:\n\
        \x20 metaval validate user.json --class User --rules ./rules\n\
        \x20 metaval validate users.json --class User --existing db.json --new\n\
        \x20 metaval rules list\n\
        \x20 metaval completions bash > /usr/share/bash-completion/completions/metaval",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

/// All available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Validate JSON data against the rules of a class.
    #[command(
        visible_alias = "v",
        about = "Validate JSON data",
        after_help = "EXAMPLES:\n\
            \x20 metaval validate user.json --class User\n\
            \x20 cat user.json | metaval validate - --class User --rules user.toml\n\
            \x20 metaval validate user.json --class User --existing users.json --persisted"
    )]
    Validate(ValidateArgs),

    /// Inspect rule files.
    #[command(
        about = "Rule file management",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 metaval rules list\n\
            \x20 metaval rules check --rules ./rules"
    )]
    Rules(RulesCommands),

    /// Initialise a metaval configuration file.
    #[command(
        about = "Initialise configuration",
        after_help = "EXAMPLES:\n\
            \x20 metaval init           # global config\n\
            \x20 metaval init --local   # .metaval.toml in CWD"
    )]
    Init(InitArgs),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 metaval completions bash > ~/.local/share/bash-completion/completions/metaval\n\
            \x20 metaval completions zsh  > ~/.zfunc/_metaval\n\
            \x20 metaval completions fish > ~/.config/fish/completions/metaval.fish"
    )]
    Completions(CompletionsArgs),

    /// Inspect the metaval configuration.
    #[command(
        about = "Configuration management",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 metaval config get rules.path\n\
            \x20 metaval config list"
    )]
    Config(ConfigCommands),
}

// ── validate ──────────────────────────────────────────────────────────────────

/// Arguments for `metaval validate`.
#[derive(Debug, Args)]
pub struct ValidateArgs {
    /// JSON file holding one object or an array of objects; `-` reads stdin.
    #[arg(value_name = "DATA", help = "JSON file to validate ('-' for stdin)")]
    pub data: PathBuf,

    /// Class whose rules apply.
    #[arg(
        short = 'C',
        long = "class",
        value_name = "NAME",
        help = "Class whose rules apply"
    )]
    pub class: String,

    /// Rule file or directory, overriding `rules.path`.
    #[arg(
        short = 'r',
        long = "rules",
        value_name = "PATH",
        help = "Rule file or directory (default: rules.path)"
    )]
    pub rules: Option<PathBuf>,

    /// Previously stored records, used for `unique` checks.
    #[arg(
        short = 'e',
        long = "existing",
        value_name = "RECORDS",
        help = "JSON array of stored records for uniqueness checks"
    )]
    pub existing: Option<PathBuf>,

    /// Treat the data as records that were never stored.
    #[arg(long = "new", conflicts_with = "persisted", help = "Data are new records")]
    pub new: bool,

    /// Treat the data as already-stored records.
    #[arg(long = "persisted", help = "Data are already-stored records")]
    pub persisted: bool,
}

impl ValidateArgs {
    /// The persistence state to attach, if one was given.
    pub fn new_record(&self) -> Option<bool> {
        match (self.new, self.persisted) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        }
    }
}

// ── rules subcommands ─────────────────────────────────────────────────────────

/// Subcommands for `metaval rules`.
#[derive(Debug, Subcommand)]
pub enum RulesCommands {
    /// List the classes found in the rule files.
    #[command(visible_alias = "ls")]
    List(RulesArgs),
    /// Load every rule file strictly and report the first problem.
    Check(RulesArgs),
}

/// Shared arguments of the `rules` subcommands.
#[derive(Debug, Args)]
pub struct RulesArgs {
    /// Rule file or directory, overriding `rules.path`.
    #[arg(short = 'r', long = "rules", value_name = "PATH")]
    pub rules: Option<PathBuf>,
}

// ── init ──────────────────────────────────────────────────────────────────────

/// Arguments for `metaval init`.
#[derive(Debug, Args)]
pub struct InitArgs {
    /// Write to `.metaval.toml` in the current directory.
    #[arg(
        long = "local",
        help = "Create local configuration in current directory"
    )]
    pub local: bool,

    /// Overwrite an existing config file.
    #[arg(short = 'f', long = "force", help = "Overwrite existing configuration")]
    pub force: bool,
}

// ── completions ───────────────────────────────────────────────────────────────

/// Arguments for `metaval completions`.
#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── config subcommands ────────────────────────────────────────────────────────

/// Subcommands for `metaval config`.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the value of a configuration key.
    Get {
        /// Dotted key path, e.g. `rules.path`.
        key: String,
    },
    /// Print all configuration values.
    List,
    /// Print the path to the global configuration file.
    Path,
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli_structure() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_validate_command() {
        let cli = Cli::parse_from([
            "metaval", "validate", "user.json", "--class", "User", "--rules", "rules",
        ]);
        let Commands::Validate(args) = cli.command else {
            panic!("expected Validate command");
        };
        assert_eq!(args.class, "User");
        assert_eq!(args.rules, Some(PathBuf::from("rules")));
        assert_eq!(args.new_record(), None);
    }

    #[test]
    fn new_and_persisted_map_to_record_state() {
        let cli = Cli::parse_from(["metaval", "v", "-", "-C", "User", "--new"]);
        let Commands::Validate(args) = cli.command else {
            panic!("expected Validate command");
        };
        assert_eq!(args.new_record(), Some(true));

        let cli = Cli::parse_from(["metaval", "v", "-", "-C", "User", "--persisted"]);
        let Commands::Validate(args) = cli.command else {
            panic!("expected Validate command");
        };
        assert_eq!(args.new_record(), Some(false));
    }

    #[test]
    fn new_and_persisted_conflict() {
        let result =
            Cli::try_parse_from(["metaval", "validate", "-", "-C", "User", "--new", "--persisted"]);
        assert!(result.is_err());
    }

    #[test]
    fn validate_requires_class() {
        assert!(Cli::try_parse_from(["metaval", "validate", "user.json"]).is_err());
    }

    #[test]
    fn parse_rules_subcommands() {
        let cli = Cli::parse_from(["metaval", "rules", "ls", "-r", "r.toml"]);
        assert!(matches!(cli.command, Commands::Rules(RulesCommands::List(_))));

        let cli = Cli::parse_from(["metaval", "rules", "check"]);
        assert!(matches!(
            cli.command,
            Commands::Rules(RulesCommands::Check(RulesArgs { rules: None }))
        ));
    }

    #[test]
    fn quiet_and_verbose_conflict() {
        let result = Cli::try_parse_from(["metaval", "--quiet", "--verbose", "rules", "list"]);
        assert!(result.is_err());
    }
}
