//! `hwtree`: inspect, query and merge hardware tree markup

mod commands;

use anyhow::{anyhow, Result};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use commands::{read_config, Session};
use hwtree_node::{registry, Registry, TreeConfig};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

fn file_arg(name: &'static str, help: &'static str) -> Arg {
    Arg::new(name)
        .required(true)
        .value_parser(value_parser!(PathBuf))
        .help(help)
}

fn class_arg() -> Arg {
    Arg::new("class")
        .long("class")
        .short('c')
        .default_value("Object")
        .help("Class tag the target must have")
}

fn cli() -> Command {
    Command::new("hwtree")
        .version(hwtree_node::VERSION)
        .about("Inspect, query and merge hardware tree markup")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("TOML file with loading options"),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Log at debug level unless RUST_LOG is set"),
        )
        .subcommand(
            Command::new("print")
                .about("Print the file as normalized markup")
                .arg(file_arg("file", "Markup file")),
        )
        .subcommand(
            Command::new("json")
                .about("Print the file as a JSON snapshot")
                .arg(file_arg("file", "Markup file")),
        )
        .subcommand(
            Command::new("find")
                .about("Print the node at a '/'-separated name path")
                .arg(file_arg("file", "Markup file"))
                .arg(Arg::new("path").required(true).help("Name path below the root"))
                .arg(class_arg()),
        )
        .subcommand(
            Command::new("scan")
                .about("Locate the first descendant with a name")
                .arg(file_arg("file", "Markup file"))
                .arg(Arg::new("name").required(true).help("Node name"))
                .arg(class_arg()),
        )
        .subcommand(
            Command::new("list")
                .about("List nodes in pre-order")
                .arg(file_arg("file", "Markup file"))
                .arg(
                    Arg::new("class")
                        .long("class")
                        .short('c')
                        .help("Only list nodes with this class tag"),
                ),
        )
        .subcommand(
            Command::new("merge")
                .about("Merge a configuration file into a live tree and print the result")
                .arg(file_arg("live", "Markup file to update"))
                .arg(file_arg("source", "Markup file providing the state")),
        )
        .subcommand(Command::new("classes").about("List registered class tags"))
}

fn init_logging(verbose: bool) {
    let fallback = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn path<'a>(args: &'a ArgMatches, name: &str) -> Result<&'a PathBuf> {
    args.get_one::<PathBuf>(name)
        .ok_or_else(|| anyhow!("missing argument '{name}'"))
}

fn text<'a>(args: &'a ArgMatches, name: &str) -> Result<&'a str> {
    args.get_one::<String>(name)
        .map(String::as_str)
        .ok_or_else(|| anyhow!("missing argument '{name}'"))
}

fn run(matches: &ArgMatches) -> Result<String> {
    let config = match matches.get_one::<PathBuf>("config") {
        Some(path) => read_config(path)?,
        None => TreeConfig::default(),
    };
    let registry = registry::install(Registry::with_builtins())?;
    tracing::debug!("loaded {} classes", registry.len());
    let session = Session::new(registry, config);

    match matches.subcommand() {
        Some(("print", args)) => session.print(path(args, "file")?),
        Some(("json", args)) => session.json(path(args, "file")?),
        Some(("find", args)) => {
            session.find(path(args, "file")?, text(args, "path")?, text(args, "class")?)
        }
        Some(("scan", args)) => {
            session.scan(path(args, "file")?, text(args, "name")?, text(args, "class")?)
        }
        Some(("list", args)) => session.list(
            path(args, "file")?,
            args.get_one::<String>("class").map(String::as_str),
        ),
        Some(("merge", args)) => session.merge(path(args, "live")?, path(args, "source")?),
        Some(("classes", _)) => Ok(session.classes()),
        Some((name, _)) => Err(anyhow!("unknown command '{name}'")),
        None => Err(anyhow!("no command given")),
    }
}

fn main() -> Result<()> {
    let matches = cli().get_matches();
    init_logging(matches.get_flag("verbose"));

    let output = run(&matches)?;
    print!("{output}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_is_consistent() {
        cli().debug_assert();
    }

    #[test]
    fn find_defaults_to_object_class() {
        let matches = cli()
            .try_get_matches_from(["hwtree", "find", "console.bml", "Controller Port 1"])
            .unwrap();
        let (_, args) = matches.subcommand().unwrap();
        assert_eq!(text(args, "class").unwrap(), "Object");
        assert_eq!(path(args, "file").unwrap(), &PathBuf::from("console.bml"));
    }

    #[test]
    fn global_flags_after_subcommand() {
        let matches = cli()
            .try_get_matches_from(["hwtree", "list", "console.bml", "-v", "--config", "tree.toml"])
            .unwrap();
        assert!(matches.get_flag("verbose"));
        assert!(matches.get_one::<PathBuf>("config").is_some());
    }
}
