use crate::backend::Envon;
use crate::cli::args::Cli;
use crate::venv::selector::Selector;
use anyhow::Result;
use std::io::{BufRead, Write};

/// Resolves the target environment and prints its activation command, or only its
/// path with `--print-path`.
pub fn activate<R: BufRead, W: Write>(
    envon: &Envon,
    args: &Cli,
    selector: &mut Selector<R, W>,
    out: &mut impl Write,
) -> Result<()> {
    let target = args.target.as_deref();

    if args.print_path {
        let venv = envon.resolve(target, selector)?;
        writeln!(out, "{}", venv.display())?;
        return Ok(());
    }

    let command = envon.activation(target, args.emit, selector)?;
    writeln!(out, "{command}")?;
    Ok(())
}
