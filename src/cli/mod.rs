use crate::backend::Envon;
use crate::cli::args::Cli;
use crate::venv::selector::Selector;
use anyhow::Result;
use clap::{CommandFactory, Parser};
use std::ffi::OsString;
use std::io::{BufRead, Write};

pub mod activate;
pub mod args;
pub mod bootstrap;

/// `envon help` asks for usage only as the very first argument. After `--`, or after
/// any option, `help` is an ordinary target such as a project directory.
pub fn is_help_request(argv: &[OsString]) -> bool {
    argv.get(1).is_some_and(|arg| arg == "help")
}

pub fn run(argv: Vec<OsString>) -> Result<()> {
    if is_help_request(&argv) {
        Cli::command().print_help()?;
        return Ok(());
    }

    let args = Cli::parse_from(argv);
    let envon = Envon::new()?;
    let mut selector = Selector::stdio();
    let mut stdout = anstream::stdout();
    dispatch(&envon, &args, &mut selector, &mut stdout)
}

/// Refreshes the managed bootstrap, then performs the one mode `args` selects.
pub fn dispatch<R: BufRead, W: Write>(
    envon: &Envon,
    args: &Cli,
    selector: &mut Selector<R, W>,
    out: &mut impl Write,
) -> Result<()> {
    envon.self_heal(args.emit);

    if let Some(shell) = args.bootstrap {
        return bootstrap::bootstrap(shell, out);
    }
    if let Some(shell) = args.install {
        return bootstrap::install(envon, shell, out);
    }
    activate::activate(envon, args, selector, out)
}
