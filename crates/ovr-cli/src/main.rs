//! `ovr` command line adapter
//!
//! Reads one input from stdin (or `--input`), applies a chain of actions,
//! and prints the breadcrumb and the result.

use anyhow::{Context, Result};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use ovr_core::{Action, ActionRegistry, Config};
use session::Session;
use std::io::{Read, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod session;

const DEFAULT_LOG_LEVEL: &str = "warn";

fn cli() -> Command {
    Command::new("ovr")
        .version(ovr_core::VERSION)
        .about("Apply chains of typed, undoable transformations to stdin")
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("TOML configuration file"),
        )
        .arg(
            Arg::new("log-level")
                .long("log-level")
                .global(true)
                .help("Log filter, overrides RUST_LOG (default: warn)"),
        )
        .arg(
            Arg::new("input")
                .long("input")
                .short('i')
                .global(true)
                .help("Use this text instead of reading stdin"),
        )
        .subcommand_required(true)
        .subcommand(
            Command::new("apply")
                .about("Apply a comma separated chain of actions, e.g. comma,index:1,upper")
                .arg(Arg::new("chain").required(true).help("Actions to apply, arguments after ':'"))
                .arg(
                    Arg::new("undo")
                        .long("undo")
                        .default_value("0")
                        .value_parser(value_parser!(usize))
                        .help("Undo this many steps after applying the chain"),
                )
                .arg(
                    Arg::new("raw")
                        .long("raw")
                        .action(ArgAction::SetTrue)
                        .help("Print only the result, without the breadcrumb"),
                ),
        )
        .subcommand(
            Command::new("list")
                .about("List actions applicable after an optional chain")
                .arg(Arg::new("chain").default_value("").help("Actions to apply first")),
        )
}

fn main() -> Result<()> {
    let matches = cli().get_matches();
    init_tracing(matches.get_one::<String>("log-level").map(String::as_str));

    let registry = build_registry(matches.get_one::<PathBuf>("config"))?;
    let input = read_input(matches.get_one::<String>("input"))?;
    let mut session = Session::new(registry, input).context("failed to load input")?;

    let mut out = std::io::stdout().lock();
    match matches.subcommand() {
        Some(("apply", args)) => apply(&mut session, args, &mut out)?,
        Some(("list", args)) => {
            let chain = args.get_one::<String>("chain").map_or("", String::as_str);
            session.apply_chain(chain)?;
            for action in session.applicable() {
                writeln!(out, "{}", describe(&action))?;
            }
        }
        _ => unreachable!("subcommand is required"),
    }
    Ok(())
}

fn apply(session: &mut Session, args: &ArgMatches, out: &mut impl Write) -> Result<()> {
    let chain = args.get_one::<String>("chain").map_or("", String::as_str);
    session
        .apply_chain(chain)
        .with_context(|| format!("after [{}]", session.data().stack_string()))?;

    let undo = args.get_one::<usize>("undo").copied().unwrap_or_default();
    if undo > 0 {
        let popped = session.undo(undo).context("undo failed")?;
        tracing::info!(count = popped.len(), "steps undone");
    }

    let data = session.data();
    if !args.get_flag("raw") {
        writeln!(out, "{} [{}]", data.stack_string(), data.format())?;
        writeln!(out, "---")?;
    }
    writeln!(out, "{data}")?;
    Ok(())
}

/// One line per action: key, shapes, parameters, doc
fn describe(action: &Action) -> String {
    let params: Vec<String> = action
        .parameters()
        .iter()
        .map(|p| format!("<{}: {}>", p.kind, p.doc))
        .collect();
    let effect = if action.has_side_effect() { " (side effect)" } else { "" };
    format!(
        "{:<16} {} -> {} {}{} {}",
        action.key(),
        action.input_format(),
        action.output_format(),
        params.join(" "),
        effect,
        action.doc()
    )
}

fn init_tracing(level: Option<&str>) {
    let filter = match level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_LEVEL)),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn build_registry(path: Option<&PathBuf>) -> Result<ActionRegistry> {
    let config = match path {
        Some(path) => Config::load(path).with_context(|| format!("loading {}", path.display()))?,
        None => Config::default(),
    };
    let registry_config = config.registry.from_env_overrides()?;
    Ok(ActionRegistry::with_config(&registry_config))
}

fn read_input(input: Option<&String>) -> Result<Vec<u8>> {
    if let Some(text) = input {
        return Ok(text.clone().into_bytes());
    }
    let mut buf = Vec::new();
    std::io::stdin()
        .read_to_end(&mut buf)
        .context("failed to read stdin")?;
    Ok(buf)
}
