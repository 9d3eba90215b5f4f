//! Parsing Options.
//! `--command {analyze, layout, fire}` or `-c`, followed by the net description file.

use clap::{Arg, ArgAction, Command, value_parser};
use std::error::Error;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum PndCommand {
    Analyze,
    Layout,
    Fire,
}

fn make_options_parser() -> clap::Command {
    Command::new("pnd")
        .no_binary_name(true)
        .version("v0.1.0")
        .about("Structural analysis and force-directed layout of Petri nets")
        .arg(
            Arg::new("command")
                .short('c')
                .long("command")
                .help("What to do with the net")
                .default_value("analyze")
                .value_parser(["analyze", "layout", "fire"]),
        )
        .arg(
            Arg::new("input")
                .value_name("NET")
                .help("Net description (.json or .ron)")
                .required(true)
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("bad-handles")
                .long("bad-handles")
                .help("Only report PT and TP handles")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("width")
                .long("width")
                .help("Canvas width for layout")
                .default_value("800")
                .value_parser(value_parser!(f64)),
        )
        .arg(
            Arg::new("height")
                .long("height")
                .help("Canvas height for layout")
                .default_value("600")
                .value_parser(value_parser!(f64)),
        )
        .arg(
            Arg::new("seed")
                .long("seed")
                .help("Seed for the initial random placement")
                .value_parser(value_parser!(u64)),
        )
        .arg(
            Arg::new("transition")
                .short('t')
                .long("transition")
                .value_name("ID")
                .help("Transition to fire, in order; may be repeated")
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("FILE")
                .help("TOML configuration file")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("FILE")
                .help("Where to write the result (.json or .ron); stdout when absent")
                .value_parser(value_parser!(PathBuf)),
        )
}

#[derive(Debug, Clone, PartialEq)]
pub struct Options {
    pub command: PndCommand,
    pub input: PathBuf,
    pub bad_handles: bool,
    pub width: f64,
    pub height: f64,
    pub seed: Option<u64>,
    pub transitions: Vec<String>,
    pub config: Option<PathBuf>,
    pub output: Option<PathBuf>,
}

impl Options {
    pub fn parse_from_str(s: &str) -> Result<Self, Box<dyn Error>> {
        let flags = shellwords::split(s)?;
        Self::parse_from_args(&flags)
    }

    pub fn parse_from_args(flags: &[String]) -> Result<Self, Box<dyn Error>> {
        let app = make_options_parser();
        let matches = app.try_get_matches_from(flags.iter())?;
        let command = match matches.get_one::<String>("command").map(String::as_str) {
            Some("analyze") => PndCommand::Analyze,
            Some("layout") => PndCommand::Layout,
            Some("fire") => PndCommand::Fire,
            _ => return Err("UnsupportedCommand")?,
        };

        let input = matches
            .get_one::<PathBuf>("input")
            .cloned()
            .ok_or("MissingInput")?;
        let width = *matches.get_one::<f64>("width").ok_or("MissingWidth")?;
        let height = *matches.get_one::<f64>("height").ok_or("MissingHeight")?;
        let transitions = matches
            .get_many::<String>("transition")
            .map(|values| values.cloned().collect())
            .unwrap_or_default();

        Ok(Options {
            command,
            input,
            bad_handles: matches.get_flag("bad-handles"),
            width,
            height,
            seed: matches.get_one::<u64>("seed").copied(),
            transitions,
            config: matches.get_one::<PathBuf>("config").cloned(),
            output: matches.get_one::<PathBuf>("output").cloned(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_defaults() {
        let options = Options::parse_from_str("net.json").unwrap();
        assert_eq!(options.command, PndCommand::Analyze);
        assert_eq!(options.input, PathBuf::from("net.json"));
        assert_eq!((options.width, options.height), (800.0, 600.0));
        assert!(!options.bad_handles);
        assert!(options.transitions.is_empty());
        assert_eq!(options.output, None);
    }

    #[test]
    fn test_parse_fire_sequence() {
        let options =
            Options::parse_from_str("-c fire -t T1 --transition T2 'my net.ron' -o out.ron")
                .unwrap();
        assert_eq!(options.command, PndCommand::Fire);
        assert_eq!(options.transitions, ["T1", "T2"]);
        assert_eq!(options.input, PathBuf::from("my net.ron"));
        assert_eq!(options.output, Some(PathBuf::from("out.ron")));
    }

    #[test]
    fn test_parse_layout_flags() {
        let options = Options::parse_from_args(&[
            "--command".to_owned(),
            "layout".to_owned(),
            "--width".to_owned(),
            "400".to_owned(),
            "--seed".to_owned(),
            "9".to_owned(),
            "net.json".to_owned(),
        ])
        .unwrap();
        assert_eq!(options.command, PndCommand::Layout);
        assert_eq!(options.width, 400.0);
        assert_eq!(options.seed, Some(9));
    }

    #[test]
    fn test_parse_from_str_err() {
        assert!(Options::parse_from_str("-c unknown net.json").is_err());
        assert!(Options::parse_from_str("--bad-handles").is_err());
        assert!(Options::parse_from_str("--width wide net.json").is_err());
    }
}
