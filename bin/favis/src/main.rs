use std::{error::Error, path::PathBuf, process::ExitCode};

use automata_viz::prelude::*;

use tracing::{debug, info, trace};
use tracing_subscriber::{filter, prelude::*};

use clap::{Arg, ArgAction, ArgMatches, Command};

fn cli() -> clap::Command {
    Command::new("favis")
    .about("Draws the diagram of a finite automaton given as JSON, trying to read it as a DFA first and as an NFA otherwise")
    .arg(
        Arg::new("verbosity")
        .short('v')
        .long("verbosity")
        .num_args(0..=1)
        .require_equals(true)
        .value_parser(["info", "debug", "trace"])
        .default_missing_value("info")
    )
    .arg(
        Arg::new("file")
        .required(true)
        .value_parser(clap::value_parser!(PathBuf))
        .help("path of the JSON file describing the automaton")
    )
    .arg(
        Arg::new("output")
        .short('o')
        .long("output")
        .help("name of the output file (without extension)")
    )
    .arg(
        Arg::new("format")
        .short('f')
        .long("format")
        .default_value("png")
        .help("output format, anything graphviz understands")
    )
    .arg(
        Arg::new("directory")
        .short('d')
        .long("directory")
        .value_parser(clap::value_parser!(PathBuf))
        .help("directory in which the output file is placed")
    )
    .arg(
        Arg::new("vertical")
        .long("vertical")
        .action(ArgAction::SetTrue)
        .help("lay out states from top to bottom")
    )
    .arg(
        Arg::new("reverse")
        .long("reverse")
        .action(ArgAction::SetTrue)
        .help("reverse the orientation of the layout")
    )
    .arg(
        Arg::new("keep-source")
        .long("keep-source")
        .action(ArgAction::SetTrue)
        .help("keep the DOT source next to the output file")
    )
    .arg(
        Arg::new("no-view")
        .long("no-view")
        .action(ArgAction::SetTrue)
        .help("do not open the diagram in an image viewer")
    )
    .arg(
        Arg::new("dot")
        .long("dot")
        .action(ArgAction::SetTrue)
        .help("print the DOT representation to stdout")
    )
    .arg(
        Arg::new("table")
        .long("table")
        .action(ArgAction::SetTrue)
        .help("print the transition table to stdout")
    )
}

fn setup_logging(matches: &ArgMatches) {
    let level = match matches
        .try_get_one::<String>("verbosity")
        .ok()
        .flatten()
        .map(|m| m.as_str())
    {
        Some("trace") => filter::LevelFilter::TRACE,
        Some("debug") => filter::LevelFilter::DEBUG,
        Some("info") => filter::LevelFilter::INFO,
        _ => filter::LevelFilter::WARN,
    };

    let stdout_log = tracing_subscriber::fmt::layer()
        .pretty()
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(stdout_log.with_filter(level))
        .init();

    trace!("setup {level} logging");
}

fn layout(matches: &ArgMatches) -> LayoutOptions {
    LayoutOptions {
        horizontal: !matches.get_flag("vertical"),
        reverse_orientation: matches.get_flag("reverse"),
        cleanup: !matches.get_flag("keep-source"),
        ..Default::default()
    }
}

fn export(matches: &ArgMatches) -> Option<Export> {
    let filename = matches.get_one::<String>("output")?;
    let mut export = Export::new(filename.as_str());
    if let Some(format) = matches.get_one::<String>("format") {
        export = export.with_format(format.as_str());
    }
    if let Some(directory) = matches.get_one::<PathBuf>("directory") {
        export = export.in_directory(directory);
    }
    Some(export)
}

fn run(matches: &ArgMatches) -> Result<(), Box<dyn Error>> {
    let path = matches
        .get_one::<PathBuf>("file")
        .ok_or("no input file given")?;

    let automaton = load(path)?;
    debug!("loaded {} from {}", automaton.kind(), path.display());

    if matches.get_flag("table") {
        println!("{}", automaton.transition_table());
    }

    let visual = automaton.visualize(layout(matches));
    if matches.get_flag("dot") {
        println!("{}", visual.dot_representation()?);
    }

    let export = export(matches);
    if matches.get_flag("no-view") {
        if let Some(export) = &export {
            let written = visual.render_to_file(export)?;
            info!("wrote diagram to {}", written.display());
        }
    } else {
        visual.show_diagram(export.as_ref())?;
    }
    Ok(())
}

pub fn main() -> ExitCode {
    let matches = cli().get_matches();

    setup_logging(&matches);

    match run(&matches) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            let mut source = e.source();
            while let Some(cause) = source {
                eprintln!("  caused by: {cause}");
                source = cause.source();
            }
            ExitCode::FAILURE
        }
    }
}
