// src/bin/reword.rs

//! Driver program _reword_ drives the [_rewordlib_].
//!
//! Reads the text of one file or STDIN, rewrites it with a
//! [`RewriteSession`], and writes the rewritten text to STDOUT or a file.
//! Rules are taken from a YAML rule file, inline YAML text, or the
//! defaults.
//!
//! [_rewordlib_]: rewordlib
//! [`RewriteSession`]: rewordlib::session::RewriteSession

#![allow(non_camel_case_types)]

use std::io::{Read, Write};
use std::process::ExitCode;

use ::anyhow::{Context, Result};
use ::clap::Parser;
use ::const_format::concatcp;
use ::rand::SeedableRng;
use ::rewordlib::common::{FPath, Path, SessionRng};
use ::rewordlib::debug::printers::{e_err, e_wrn};
use ::rewordlib::rules::RuleSet;
use ::rewordlib::session::RewriteSession;
#[allow(unused_imports)]
use ::si_trace_print::{defn, defo, defx, defñ, stack::stack_offset_set};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// command-line parsing
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// argument value meaning STDIN
const CLI_STDIN: &str = "-";

const CLI_HELP_AFTER: &str = concatcp!(
    r#"
Rules are YAML, for example:

    rewrite_on_each_generate: false
    rewrite_word: false
    rewrite_datetime: yes, 1, 3
    unchanged_lines: 1, eof

Without rules every recognized entity is rewritten.

---

Version: "#, env!("CARGO_PKG_VERSION"), r#"
MSRV: "#, env!("CARGO_PKG_RUST_VERSION"), r#"
License: "#, env!("CARGO_PKG_LICENSE"), r#"
"#,
);

/// clap command-line arguments build-time definitions.
//
// Note:
// * the `about` is taken from `Cargo.toml:[package]:description`.
#[derive(Parser, Debug)]
#[clap(
    about = env!("CARGO_PKG_DESCRIPTION"),
    author = env!("CARGO_PKG_AUTHORS"),
    name = "reword",
    version = concatcp!(
        "Version: ",
        env!("CARGO_PKG_VERSION_MAJOR"), ".",
        env!("CARGO_PKG_VERSION_MINOR"), ".",
        env!("CARGO_PKG_VERSION_PATCH"), "\n",
        "MSRV: ", env!("CARGO_PKG_RUST_VERSION"), "\n",
        "License: ", env!("CARGO_PKG_LICENSE"), "\n",
    ),
    after_help = CLI_HELP_AFTER,
    verbatim_doc_comment,
)]
struct CLI_Args {
    /// Path of the text to rewrite.
    /// Pass "-" or nothing to read STDIN.
    #[clap(verbatim_doc_comment)]
    input: Option<FPath>,

    /// YAML rule file.
    #[clap(
        short = 'r',
        long,
        conflicts_with = "rules_text",
    )]
    rules: Option<FPath>,

    /// Inline YAML rules, e.g. "rewrite_word: false".
    #[clap(
        short = 'R',
        long = "rules-text",
    )]
    rules_text: Option<String>,

    /// Write the rewritten text to this file instead of STDOUT.
    #[clap(
        short = 'o',
        long,
    )]
    output: Option<FPath>,

    /// Seed the random number generator for a reproducible run.
    #[clap(long)]
    seed: Option<u64>,

    /// After rewriting, print the effective rules to STDERR.
    #[clap(long = "show-rules")]
    show_rules: bool,

    /// After rewriting, write the effective rules to this file.
    #[clap(long = "save-rules")]
    save_rules: Option<FPath>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// processing
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

fn read_input(input: Option<&str>) -> Result<String> {
    defñ!("{:?}", input);
    match input {
        None | Some(CLI_STDIN) => {
            let mut text = String::new();
            std::io::stdin()
                .lock()
                .read_to_string(&mut text)
                .context("failed to read STDIN")?;
            Ok(text)
        }
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read input file {:?}", path)),
    }
}

fn load_rules(args: &CLI_Args) -> Result<RuleSet> {
    if let Some(path) = args.rules.as_ref() {
        return RuleSet::from_yaml_file(Path::new(path))
            .with_context(|| format!("failed to load rule file {:?}", path));
    }
    if let Some(text) = args.rules_text.as_ref() {
        return RuleSet::from_yaml_str(text).context("failed to load rules text");
    }

    Ok(RuleSet::default())
}

fn run(args: &CLI_Args) -> Result<()> {
    defn!();
    let rules = load_rules(args)?;
    let mut session = match args.seed {
        Some(seed) => RewriteSession::with_rng(rules, SessionRng::seed_from_u64(seed)),
        None => RewriteSession::new(rules),
    };
    let text = read_input(args.input.as_deref())?;
    if text.is_empty() {
        e_wrn!("input is empty");
    }
    let rewritten = session.generate(&text).rewritten;
    match args.output.as_ref() {
        Some(path) => std::fs::write(path, rewritten.as_bytes())
            .with_context(|| format!("failed to write output file {:?}", path))?,
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(rewritten.as_bytes())
                .and_then(|_| stdout.flush())
                .context("failed to write STDOUT")?;
        }
    }
    if args.show_rules {
        eprintln!("{}", session.rules().text_with_rule_docs());
    }
    if let Some(path) = args.save_rules.as_ref() {
        let mut rules_text = session.rules().text_with_rule_docs();
        rules_text.push('\n');
        std::fs::write(path, rules_text.as_bytes())
            .with_context(|| format!("failed to write rule file {:?}", path))?;
    }
    defx!();

    Ok(())
}

/// Process the user-passed command-line arguments, rewrite, and determine
/// a process return code.
pub fn main() -> ExitCode {
    if cfg!(debug_assertions) {
        stack_offset_set(Some(0));
    }
    defn!();
    let args = CLI_Args::parse();
    defo!("{:?}", args);

    let exitcode = match run(&args) {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            e_err!("{:#}", err);
            ExitCode::FAILURE
        }
    };
    defx!("exitcode {:?}", exitcode);

    exitcode
}
