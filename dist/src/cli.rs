//! CLI argument definitions for the plugin dist builder.
//!
//! This module defines the command-line interface using clap. The tool's own
//! flags are recognised wherever they appear; every other token is collected
//! in order and forwarded verbatim to `cargo build`.

use crate::builder::BuildPlan;
use camino::Utf8PathBuf;
use clap::Parser;
use clap::error::ErrorKind;
use std::ffi::OsString;

/// Flags that take their value from the next token or after `=`.
const VALUE_FLAGS: &[&str] = &["--profile", "--target", "--project-dir", "-C"];

/// Flags that take no value.
const SWITCH_FLAGS: &[&str] = &[
    "--release",
    "--package",
    "--dry-run",
    "--quiet",
    "-q",
    "--help",
    "-h",
    "--version",
    "-V",
];

/// Build a WebAssembly plugin and assemble its distribution directory.
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "plugin-dist")]
#[command(version, about)]
#[command(long_about = concat!(
    "Build a WebAssembly plugin and assemble its distribution directory.\n\n",
    "Runs `cargo build` for the project, locates the compiled module, and copies it ",
    "into dist/ together with manifest.json and the icon and additional files the ",
    "manifest declares. With --package, dist/ is then compressed into ",
    "<name>.abp.\n\n",
    "Arguments the tool does not recognise are forwarded to `cargo build` ",
    "unchanged and in order. The tool's own flags may appear anywhere; ",
    "everything after `--` is forwarded.",
))]
#[command(override_usage = "plugin-dist [OPTIONS] [CARGO_ARGS]...")]
#[command(after_help = concat!(
    "EXAMPLES:\n",
    "  Debug build into dist/:\n",
    "    $ plugin-dist\n\n",
    "  Release build for WASI, packaged as an archive:\n",
    "    $ plugin-dist --release --target wasm32-wasip1 --package\n\n",
    "  Forward extra flags to cargo:\n",
    "    $ plugin-dist --features extra --release --locked\n\n",
    "  Preview without building:\n",
    "    $ plugin-dist --dry-run --package",
))]
pub struct Cli {
    /// Build with the release profile.
    #[arg(long)]
    pub release: bool,

    /// Build with a named cargo profile (overrides --release).
    #[arg(long, value_name = "NAME")]
    pub profile: Option<String>,

    /// Cross-compile for the given target triple.
    #[arg(long, value_name = "TRIPLE")]
    pub target: Option<String>,

    /// Compress dist/ into <name>.abp.
    #[arg(long)]
    pub package: bool,

    /// Project directory containing Cargo.toml and manifest.json [default: current directory].
    #[arg(short = 'C', long, value_name = "DIR")]
    pub project_dir: Option<Utf8PathBuf>,

    /// Show what would be done and exit without building.
    #[arg(long)]
    pub dry_run: bool,

    /// Suppress progress output (warnings and errors still shown).
    #[arg(short, long)]
    pub quiet: bool,

    /// Arguments forwarded verbatim to `cargo build`.
    #[arg(skip)]
    pub cargo_args: Vec<String>,
}

impl Cli {
    /// Parse `args`, separating the tool's flags from tokens meant for cargo.
    ///
    /// The first item is the program name. Recognised flags are handed to
    /// clap in any position, including `--flag=value` forms; all other tokens
    /// become [`Cli::cargo_args`] in their given order.
    ///
    /// # Errors
    ///
    /// Returns a clap error for invalid or incomplete flags, or for a token
    /// that is not valid UTF-8.
    ///
    /// # Examples
    ///
    /// ```
    /// use plugin_dist::cli::Cli;
    ///
    /// let cli = Cli::try_parse_args(["plugin-dist", "--locked", "--release"])
    ///     .expect("valid arguments");
    /// assert!(cli.release);
    /// assert_eq!(cli.cargo_args, ["--locked"]);
    /// ```
    pub fn try_parse_args<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        let args = args
            .into_iter()
            .map(|arg| {
                arg.into().into_string().map_err(|raw| {
                    clap::Error::raw(
                        ErrorKind::InvalidUtf8,
                        format!("argument is not valid UTF-8: {}\n", raw.to_string_lossy()),
                    )
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let split = split_args(args);
        let mut cli = Self::try_parse_from(split.own)?;
        cli.cargo_args = split.forwarded;
        Ok(cli)
    }

    /// Like [`Cli::try_parse_args`], but prints the error and exits on
    /// failure, as clap's own `parse` does.
    #[must_use]
    pub fn parse_args<I, T>(args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        Self::try_parse_args(args).unwrap_or_else(|err| err.exit())
    }

    /// Resolve the build plan described by the profile, target and
    /// forwarded arguments.
    ///
    /// # Examples
    ///
    /// ```
    /// use plugin_dist::cli::Cli;
    ///
    /// let cli = Cli::parse_args(["plugin-dist", "--locked", "--release"]);
    /// let plan = cli.build_plan();
    /// assert_eq!(plan.cargo_args(), ["--release", "--locked"]);
    /// ```
    #[must_use]
    pub fn build_plan(&self) -> BuildPlan {
        BuildPlan::new(
            self.release,
            self.profile.as_deref(),
            self.target.as_deref(),
            &self.cargo_args,
        )
    }
}

/// Command-line tokens divided between the tool and cargo.
#[derive(Debug, Default, PartialEq, Eq)]
struct SplitArgs {
    own: Vec<String>,
    forwarded: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token {
    /// A value-less flag of this tool.
    Switch,
    /// A flag of this tool whose value is the next token.
    Value,
    /// A flag of this tool carrying its value inline (`--target=T`, `-Cdir`).
    InlineValue,
    /// Anything else.
    Forwarded,
}

fn split_args(args: Vec<String>) -> SplitArgs {
    let mut split = SplitArgs::default();
    let mut tokens = args.into_iter();
    split.own.extend(tokens.next());

    while let Some(token) = tokens.next() {
        if token == "--" {
            split.forwarded.extend(tokens.by_ref());
            break;
        }
        match classify(&token) {
            Token::Switch | Token::InlineValue => split.own.push(token),
            Token::Value => {
                split.own.push(token);
                // A missing value is left for clap to report.
                split.own.extend(tokens.next());
            }
            Token::Forwarded => split.forwarded.push(token),
        }
    }
    split
}

fn classify(token: &str) -> Token {
    if SWITCH_FLAGS.contains(&token) {
        return Token::Switch;
    }
    if VALUE_FLAGS.contains(&token) {
        return Token::Value;
    }
    let inline = VALUE_FLAGS.iter().any(|flag| match token.strip_prefix(flag) {
        Some(rest) if flag.starts_with("--") => rest.starts_with('='),
        Some(rest) => !rest.is_empty(),
        None => false,
    });
    if inline {
        Token::InlineValue
    } else {
        Token::Forwarded
    }
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
