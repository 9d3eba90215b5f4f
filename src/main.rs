use std::path::Path;

use anyhow::{Context, Result, anyhow};
use log::{debug, info, warn};
use serde::Serialize;

use pnd::analysis::analyze;
use pnd::config::PndConfig;
use pnd::layout::{Canvas, ForceLayout};
use pnd::net::io::{to_json_string, write_value};
use pnd::net::{Marking, load_net};
use pnd::options::{Options, PndCommand};

#[derive(Debug, Serialize)]
struct FireStep {
    transition: String,
    fired: bool,
}

#[derive(Debug, Serialize)]
struct FireTrace {
    steps: Vec<FireStep>,
    marking: Marking,
}

fn main() {
    if std::env::var("PND_LOG").is_ok() {
        let e = env_logger::Env::new()
            .filter("PND_LOG")
            .write_style("PND_LOG_STYLE");
        env_logger::init_from_env(e);
    }

    if let Err(err) = run() {
        eprintln!("error: {err:?}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let mut flags = shellwords::split(&std::env::var("PND_FLAGS").unwrap_or_default())
        .context("PND_FLAGS is not a valid shell word list")?;
    flags.extend(std::env::args().skip(1));

    let options = match Options::parse_from_args(&flags) {
        Ok(options) => options,
        Err(err) => match err.downcast_ref::<clap::Error>() {
            Some(clap_err) => clap_err.exit(),
            None => return Err(anyhow!("{err}")),
        },
    };
    debug!("pnd options: {:?}", options);

    let config = match &options.config {
        Some(path) => PndConfig::load_from_file(path)?,
        None => PndConfig::default(),
    };
    let mut net = load_net(&options.input)
        .with_context(|| format!("Failed to load net from {:?}", options.input))?;
    let output = options.output.as_deref();

    match options.command {
        PndCommand::Analyze => {
            let bad_only = options.bad_handles || config.analysis.bad_handles_only;
            let report = analyze(&net, bad_only);
            info!("\n{report}");
            emit(output, &report)
        }
        PndCommand::Layout => {
            let mut layout_config = config.layout.clone();
            if options.seed.is_some() {
                layout_config.seed = options.seed;
            }
            let layout = ForceLayout::new(layout_config)
                .arrange(&net, Canvas::new(options.width, options.height))?;
            emit(output, &layout)
        }
        PndCommand::Fire => {
            let mut steps = Vec::with_capacity(options.transitions.len());
            for transition in &options.transitions {
                let fired = net
                    .fire(transition)
                    .with_context(|| format!("Cannot fire {transition}"))?
                    .is_fired();
                if !fired {
                    warn!("transition {transition} is not enabled");
                }
                steps.push(FireStep {
                    transition: transition.clone(),
                    fired,
                });
            }
            emit(
                output,
                &FireTrace {
                    steps,
                    marking: net.marking().clone(),
                },
            )
        }
        _ => Err(anyhow!("unsupported command {:?}", options.command)),
    }
}

fn emit<T: Serialize>(output: Option<&Path>, value: &T) -> Result<()> {
    match output {
        Some(path) => {
            write_value(path, value).with_context(|| format!("Failed to write {:?}", path))?;
            info!("result written to {}", path.display());
        }
        None => println!("{}", to_json_string(value)?),
    }
    Ok(())
}
