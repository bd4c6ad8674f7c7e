//! `portia` command-line tool for the spider editor

use anyhow::{Context, Result};
use clap::{Arg, ArgMatches, Command};
use portia_model::Spider;
use portia_workflow::{
    validate_spider_name, EditorConfig, HttpTransport, RenameConfirmation, RenameCoordinator,
    TracingNotifier,
};
use serde_json::Value;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Command::new("portia")
        .version(portia_workflow::VERSION)
        .about("Portia spider editor tools")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("validate-name")
                .about("Check a spider name against the naming rule")
                .arg(Arg::new("name").required(true).help("Candidate spider name")),
        )
        .subcommand(
            Command::new("serialize")
                .about("Print the save payload of a spider JSON file")
                .arg(
                    Arg::new("file")
                        .required(true)
                        .value_parser(clap::value_parser!(PathBuf))
                        .help("Spider as returned by the server"),
                ),
        )
        .subcommand(
            Command::new("rename")
                .about("Rename a spider on a running Portia server")
                .arg(
                    Arg::new("config")
                        .long("config")
                        .value_parser(clap::value_parser!(PathBuf))
                        .help("Editor config file (TOML)"),
                )
                .arg(
                    Arg::new("project")
                        .long("project")
                        .required(true)
                        .help("Project id"),
                )
                .arg(
                    Arg::new("spider")
                        .long("spider")
                        .required(true)
                        .help("Current spider id"),
                )
                .arg(
                    Arg::new("name")
                        .long("name")
                        .required(true)
                        .help("New spider name"),
                ),
        );

    let matches = cli.get_matches();

    match matches.subcommand() {
        Some(("validate-name", args)) => validate_name(args),
        Some(("serialize", args)) => serialize(args),
        Some(("rename", args)) => rename(args).await,
        _ => Ok(ExitCode::FAILURE),
    }
}

fn required<'a>(args: &'a ArgMatches, id: &str) -> Result<&'a String> {
    args.get_one::<String>(id)
        .with_context(|| format!("missing --{id}"))
}

fn validate_name(args: &ArgMatches) -> Result<ExitCode> {
    let name = required(args, "name")?;
    match validate_spider_name(name) {
        Ok(()) => {
            println!("{name}: ok");
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            println!("{name}: {err}");
            Ok(ExitCode::FAILURE)
        }
    }
}

fn serialize(args: &ArgMatches) -> Result<ExitCode> {
    let path = args
        .get_one::<PathBuf>("file")
        .context("missing spider file")?;
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let wire: Value = serde_json::from_str(&text)
        .with_context(|| format!("parsing {}", path.display()))?;

    let spider = Spider::from_wire(wire)?;
    println!("{}", serde_json::to_string_pretty(&spider)?);
    Ok(ExitCode::SUCCESS)
}

async fn rename(args: &ArgMatches) -> Result<ExitCode> {
    let config = match args.get_one::<PathBuf>("config") {
        Some(path) => EditorConfig::load(path)?,
        None => EditorConfig::default(),
    };
    let project = required(args, "project")?;
    let spider_id = required(args, "spider")?;
    let name = required(args, "name")?;

    let transport = HttpTransport::new(&config.base_url);
    let coordinator = RenameCoordinator::new(transport, TracingNotifier, config.rename);

    let mut spider = Spider::new()
        .with_id(spider_id.as_str())
        .with_project(project.as_str());
    spider.set_name(name.as_str());

    let outcome = coordinator
        .rename(&mut spider, |confirmation: RenameConfirmation| {
            println!(
                "renamed {}/{} to {}",
                confirmation.project_id, confirmation.old_id, confirmation.new_name
            );
        })
        .await;

    Ok(if outcome.is_committed() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
