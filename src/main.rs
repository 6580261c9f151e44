mod app;
mod command;
mod config;
mod consts;
mod game;
mod highscore;
mod screen;
mod sound;
mod util;
use crate::app::App;
use crate::config::Config;
use anyhow::Context;
use crossterm::{
    event::{DisableFocusChange, EnableFocusChange},
    execute,
};
use lexopt::{Arg, Parser};
use ratatui::DefaultTerminal;
use std::io::{self, ErrorKind};
use std::path::PathBuf;
use std::process::ExitCode;

const USAGE: &str = "\
Usage: gridsnake [--config FILE]

Options:
  -c, --config FILE   Read configuration from FILE
  -h, --help          Show this message and exit
  -V, --version       Show the program version and exit
";

#[derive(Clone, Debug, Eq, PartialEq)]
enum Arguments {
    Run { config: Option<PathBuf> },
    Help,
    Version,
}

impl Arguments {
    fn from_parser(mut parser: Parser) -> Result<Arguments, lexopt::Error> {
        let mut config = None;
        while let Some(arg) = parser.next()? {
            match arg {
                Arg::Short('c') | Arg::Long("config") => {
                    config = Some(PathBuf::from(parser.value()?));
                }
                Arg::Short('h') | Arg::Long("help") => return Ok(Arguments::Help),
                Arg::Short('V') | Arg::Long("version") => return Ok(Arguments::Version),
                _ => return Err(arg.unexpected()),
            }
        }
        Ok(Arguments::Run { config })
    }
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e)
            if e.downcast_ref::<io::Error>()
                .is_some_and(|e| e.kind() == ErrorKind::BrokenPipe) =>
        {
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("gridsnake: {e:?}");
            ExitCode::from(2)
        }
    }
}

fn run() -> anyhow::Result<()> {
    let config_path = match Arguments::from_parser(Parser::from_env())? {
        Arguments::Run { config } => config,
        Arguments::Help => {
            print!("{USAGE}");
            return Ok(());
        }
        Arguments::Version => {
            println!("gridsnake {}", env!("CARGO_PKG_VERSION"));
            return Ok(());
        }
    };
    let config = match config_path {
        Some(path) => Config::load(&path, false),
        None => Config::load(&Config::default_path()?, true),
    }
    .context("failed to load configuration")?;
    init_logging(&config);
    let rules = config.game.rules()?;
    let app = App::new(rules, config.high_score_store(), config.sound);

    let terminal = ratatui::init();
    log::info!("Starting gridsnake {}", env!("CARGO_PKG_VERSION"));
    let r = play(app, terminal);
    let _ = execute!(io::stdout(), DisableFocusChange);
    ratatui::restore();
    log::info!("Exiting");
    r.map_err(Into::into)
}

/// Run the game on an initialized terminal.  The caller restores the
/// terminal whatever the outcome.
fn play(app: App, mut terminal: DefaultTerminal) -> io::Result<()> {
    execute!(terminal.backend_mut(), EnableFocusChange)?;
    app.run(terminal)
}

/// Send log messages to a file, since the terminal is taken up by the game.
/// Problems setting this up are reported on stderr and otherwise ignored.
fn init_logging(config: &Config) {
    if config.log.level == log::LevelFilter::Off {
        return;
    }
    let Some(path) = config.log_file() else {
        eprintln!("gridsnake: could not determine log file location; logging disabled");
        return;
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        if let Err(e) = fs_err::create_dir_all(parent) {
            eprintln!("gridsnake: {e}; logging disabled");
            return;
        }
    }
    let file = match fs_err::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
    {
        Ok(file) => file,
        Err(e) => {
            eprintln!("gridsnake: {e}; logging disabled");
            return;
        }
    };
    if let Err(e) = simplelog::WriteLogger::init(
        config.log.level,
        simplelog::Config::default(),
        file,
    ) {
        eprintln!("gridsnake: failed to initialize logging: {e}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsString;

    fn parse(args: &[&str]) -> Result<Arguments, lexopt::Error> {
        Arguments::from_parser(Parser::from_iter(
            std::iter::once("gridsnake")
                .chain(args.iter().copied())
                .map(OsString::from),
        ))
    }

    #[test]
    fn no_args() {
        assert_eq!(
            parse(&[]).expect("parse should succeed"),
            Arguments::Run { config: None }
        );
    }

    #[test]
    fn config_arg() {
        assert_eq!(
            parse(&["--config", "snake.toml"]).expect("parse should succeed"),
            Arguments::Run {
                config: Some(PathBuf::from("snake.toml"))
            }
        );
        assert_eq!(
            parse(&["-c", "other.toml"]).expect("parse should succeed"),
            Arguments::Run {
                config: Some(PathBuf::from("other.toml"))
            }
        );
    }

    #[test]
    fn help_and_version() {
        assert_eq!(parse(&["--help"]).expect("parse should succeed"), Arguments::Help);
        assert_eq!(parse(&["-V"]).expect("parse should succeed"), Arguments::Version);
    }

    #[test]
    fn bad_args() {
        assert!(parse(&["--speed", "9"]).is_err());
        assert!(parse(&["extra"]).is_err());
        assert!(parse(&["--config"]).is_err());
    }
}
