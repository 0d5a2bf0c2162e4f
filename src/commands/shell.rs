//! The interactive shell: reads one command per line and runs it against a session.
//!
//! Lines are split with shell quoting rules, so `set description "Pembelian ATK Kantor"` sets a
//! single field. A failing command reports its error and the shell carries on; only a broken
//! terminal ends the session early.

use crate::args::{ItemCommand, ShellCommand, ShellLine};
use crate::commands::{self, Out};
use crate::error::{fail, ErrorType, IntoResult, Res};
use crate::session::Session;
use crate::Result;
use anyhow::Context;
use clap::error::ErrorKind;
use clap::Parser;
use std::io::{BufRead, Write};
use tracing::{debug, trace, warn};

const PROMPT: &str = "niaga> ";

enum Step {
    Continue,
    Quit,
}

/// Runs commands read from `input` until `quit` or end of input. Output and prompts go to
/// `output`; a delete confirmation reads its answer from the next line of `input`.
pub fn shell<I, W>(session: &mut Session, mut input: I, mut output: W) -> Result<Out<()>>
where
    I: BufRead,
    W: Write,
{
    let mut count = 0usize;
    loop {
        prompt(&mut output, PROMPT).pub_result(ErrorType::Io)?;
        let mut line = String::new();
        let read = input
            .read_line(&mut line)
            .context("Unable to read a command")
            .pub_result(ErrorType::Io)?;
        if read == 0 {
            debug!("End of input");
            break;
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        trace!("Shell command: {line}");
        count += 1;
        match execute(session, line, &mut input, &mut output) {
            Ok(Step::Continue) => {}
            Ok(Step::Quit) => break,
            Err(e) if e.error_type() == ErrorType::Io => return Err(e),
            Err(e) => {
                let label = if e.is_warning() {
                    warn!("{e}");
                    "Warning"
                } else {
                    debug!("Command failed: {e}");
                    "Error"
                };
                writeln!(output, "{label}: {e}")
                    .context("Unable to write to the terminal")
                    .pub_result(ErrorType::Io)?;
            }
        }
    }
    if let Some(kind) = session.active() {
        debug!("Discarding the open {kind} form");
    }
    Ok(format!("Shell closed after {count} commands").into())
}

fn execute<I, W>(session: &mut Session, line: &str, input: &mut I, output: &mut W) -> Result<Step>
where
    I: BufRead,
    W: Write,
{
    let words = match shell_words::split(line) {
        Ok(words) => words,
        Err(e) => fail!(ErrorType::Input, "Unable to read '{line}': {e}"),
    };
    let parsed = match ShellLine::try_parse_from(words) {
        Ok(parsed) => parsed,
        Err(e) => match e.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
                write!(output, "{}", e.render()).pub_result_io()?;
                return Ok(Step::Continue);
            }
            _ => fail!(ErrorType::Input, "{}", e.render().to_string().trim_end()),
        },
    };

    let written = match parsed.command() {
        ShellCommand::List(args) => commands::list(session, args)?.write(output),
        ShellCommand::Page { resource, page } => {
            commands::page(session, *resource, *page).write(output)
        }
        ShellCommand::New { resource } => commands::new(session, *resource)?.write(output),
        ShellCommand::Edit { resource, id } => {
            commands::edit(session, *resource, *id)?.write(output)
        }
        ShellCommand::View { resource, id } => {
            commands::view(session, *resource, *id)?.write(output)
        }
        ShellCommand::Set { field, value } => {
            commands::set_field(session, field, value)?.write(output)
        }
        ShellCommand::Item(ItemCommand::Add) => commands::add_item(session)?.write(output),
        ShellCommand::Item(ItemCommand::Rm { id }) => {
            commands::remove_item(session, *id)?.write(output)
        }
        ShellCommand::Item(ItemCommand::Set { id, field, value }) => {
            commands::set_item_field(session, *id, field, value)?.write(output)
        }
        ShellCommand::Draft => commands::draft(session)?.write(output),
        ShellCommand::Save => commands::save(session)?.write(output),
        ShellCommand::Cancel => commands::cancel(session).write(output),
        ShellCommand::Delete(args) => {
            let mut ask = |question: &str| confirm(question, &mut *input, &mut *output);
            let out = commands::delete(session, args, &mut ask)?;
            out.write(output)
        }
        ShellCommand::Stats => commands::stats(session).write(output),
        ShellCommand::Quit => return Ok(Step::Quit),
    };
    written.pub_result_io()?;
    Ok(Step::Continue)
}

/// Asks `question` and reads a yes/no answer. Anything but `y` or `yes` is a no.
fn confirm<I, W>(question: &str, input: &mut I, output: &mut W) -> bool
where
    I: BufRead,
    W: Write,
{
    if prompt(output, &format!("{question} [y/N] ")).is_err() {
        return false;
    }
    let mut answer = String::new();
    match input.read_line(&mut answer) {
        Ok(0) | Err(_) => false,
        Ok(_) => matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"),
    }
}

fn prompt<W: Write>(output: &mut W, text: &str) -> Res<()> {
    write!(output, "{text}")
        .and_then(|_| output.flush())
        .context("Unable to write to the terminal")
}

trait IoResult {
    fn pub_result_io(self) -> Result<()>;
}

impl IoResult for std::io::Result<()> {
    fn pub_result_io(self) -> Result<()> {
        self.context("Unable to write to the terminal")
            .pub_result(ErrorType::Io)
    }
}
