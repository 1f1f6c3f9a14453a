use std::io::{self, BufRead, Write};

use anyhow::Context;
use sunrise_core::config::AppConfig;
use sunrise_core::Session;

use crate::bootstrap::open_session;
use crate::commands::CommandResult;
use crate::script::{execute, parse_line, Reply, ScriptCommand};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ShellSummary {
    pub commands: usize,
    pub rejected: usize,
}

pub fn run(config: &AppConfig) -> CommandResult {
    let mut session = match open_session(config) {
        Ok(session) => session,
        Err(error) => return CommandResult::failure("shell", "bootstrap", error.to_string(), 3),
    };

    let stdin = io::stdin();
    let stdout = io::stdout();
    match run_with_io(config, &mut session, stdin.lock(), stdout.lock()) {
        Ok(summary) => {
            tracing::info!(
                event_name = "cli.shell.closed",
                commands = summary.commands,
                rejected = summary.rejected,
                "shell session closed"
            );
            CommandResult::plain(0, String::new())
        }
        Err(error) => CommandResult::failure("shell", "terminal_io", format!("{error:#}"), 4),
    }
}

/// Drives an interactive session until `quit` or end of input.
pub fn run_with_io<R: BufRead, W: Write>(
    config: &AppConfig,
    session: &mut Session,
    mut input: R,
    mut output: W,
) -> anyhow::Result<ShellSummary> {
    writeln!(output, "{} (type `help` for commands)", config.shop.name)?;
    write_numbered(&mut output, &session.catalog().render_lines())?;

    let mut summary = ShellSummary::default();
    let mut buffer = String::new();

    loop {
        write!(output, "> ")?;
        output.flush()?;

        buffer.clear();
        let read = input.read_line(&mut buffer).context("failed to read command")?;
        if read == 0 {
            writeln!(output)?;
            break;
        }

        let command = match parse_line(&buffer) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(error) => {
                summary.rejected += 1;
                writeln!(output, "error: {error}")?;
                continue;
            }
        };

        summary.commands += 1;
        let reply = execute(session, &command);
        if !reply.is_ok() {
            summary.rejected += 1;
        }
        write_reply(&mut output, &reply)?;

        if command == ScriptCommand::Quit {
            break;
        }
    }

    output.flush()?;
    Ok(summary)
}

fn write_reply<W: Write>(output: &mut W, reply: &Reply) -> io::Result<()> {
    if reply.is_ok() {
        writeln!(output, "{}", reply.message)?;
    } else {
        writeln!(output, "error: {}", reply.message)?;
    }
    write_numbered(output, &reply.lines)
}

fn write_numbered<W: Write>(output: &mut W, lines: &[String]) -> io::Result<()> {
    for (index, line) in lines.iter().enumerate() {
        writeln!(output, "{:>3}. {line}", index + 1)?;
    }
    Ok(())
}
