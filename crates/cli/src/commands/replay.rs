use std::fs;
use std::path::Path;

use serde::Serialize;
use sunrise_core::config::AppConfig;
use sunrise_core::domain::money::format_price;
use sunrise_core::Session;

use crate::bootstrap::open_session;
use crate::commands::CommandResult;
use crate::script::{execute, parse_line, Reply, ScriptCommand};

#[derive(Debug, Serialize)]
struct StepRecord<'a> {
    line: usize,
    command: &'a str,
    #[serde(flatten)]
    reply: &'a Reply,
}

#[derive(Debug, Default, PartialEq, Eq)]
struct ReplayTally {
    steps: usize,
    rejected: usize,
}

pub fn run(config: &AppConfig, path: &Path, strict: bool) -> CommandResult {
    let script = match fs::read_to_string(path) {
        Ok(script) => script,
        Err(error) => {
            return CommandResult::failure(
                "replay",
                "script_io",
                format!("could not read script `{}`: {error}", path.display()),
                4,
            );
        }
    };

    let mut session = match open_session(config) {
        Ok(session) => session,
        Err(error) => return CommandResult::failure("replay", "bootstrap", error.to_string(), 3),
    };

    let (records, tally) = replay_script(&mut session, &script);
    let message = format!(
        "{}: replayed {} step(s), {} rejected; open order total {}",
        config.shop.name,
        tally.steps,
        tally.rejected,
        format_price(session.order_total())
    );

    tracing::info!(
        event_name = "cli.replay.finished",
        script = %path.display(),
        steps = tally.steps,
        rejected = tally.rejected,
        strict,
        "script replay finished"
    );

    let outcome = if strict && tally.rejected > 0 {
        CommandResult::failure("replay", "rejected_steps", message, 5)
    } else {
        CommandResult::success("replay", message)
    };
    outcome.with_preamble(records)
}

fn replay_script(session: &mut Session, script: &str) -> (Vec<String>, ReplayTally) {
    let mut records = Vec::new();
    let mut tally = ReplayTally::default();

    for (index, raw) in script.lines().enumerate() {
        let (command, reply) = match parse_line(raw) {
            Ok(None) => continue,
            Ok(Some(command)) => {
                let reply = execute(session, &command);
                (Some(command), reply)
            }
            Err(error) => (None, Reply::syntax(&error)),
        };

        tally.steps += 1;
        if !reply.is_ok() {
            tally.rejected += 1;
        }

        let verb = command.as_ref().map(ScriptCommand::verb).unwrap_or("invalid");
        let record = StepRecord { line: index + 1, command: verb, reply: &reply };
        records.push(serialize_step(&record));

        if command == Some(ScriptCommand::Quit) {
            break;
        }
    }

    (records, tally)
}

fn serialize_step(record: &StepRecord<'_>) -> String {
    serde_json::to_string(record).unwrap_or_else(|error| {
        format!(
            "{{\"line\":{},\"status\":\"rejected\",\"error_class\":\"serialization\",\"message\":\"{}\"}}",
            record.line,
            error.to_string().replace('\\', "\\\\").replace('"', "\\\"")
        )
    })
}
