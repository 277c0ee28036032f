use anyhow::{anyhow, Context};
use common_utils::load_settings_from_env;
use orchestrator::{Orchestrator, SampleForecasts};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use serde_json::Value;
use std::sync::Arc;

#[derive(Debug, PartialEq)]
enum CliCommand {
    Exit,
    Domains,
    Advise { domain: String, request: Value },
    Empty,
}

/// `<domain> <json>`, `domains`, or `exit`.
fn parse_line(line: &str) -> Result<CliCommand, anyhow::Error> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(CliCommand::Empty);
    }
    if line.eq_ignore_ascii_case("exit") || line.eq_ignore_ascii_case("quit") {
        return Ok(CliCommand::Exit);
    }
    if line.eq_ignore_ascii_case("domains") {
        return Ok(CliCommand::Domains);
    }

    let (domain, body) = line
        .split_once(char::is_whitespace)
        .ok_or_else(|| anyhow!("expected '<domain> <json>', got '{line}'"))?;
    let request = serde_json::from_str(body.trim()).context("request is not valid JSON")?;

    Ok(CliCommand::Advise { domain: domain.to_string(), request })
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    dotenv::dotenv().ok();
    // Logs go to stderr so advice on stdout stays readable.
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let settings = load_settings_from_env();
    let orchestrator = Orchestrator::from_config(settings.advisory, Arc::new(SampleForecasts::new()));

    println!("Kisan advisory CLI");
    println!("Type '<domain> <json>' for advice, 'domains' to list domains, 'exit' to quit.");

    let mut editor = DefaultEditor::new()?;
    loop {
        let line = match editor.readline("> ") {
            Ok(line) => line,
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
            Err(e) => return Err(e.into()),
        };
        let _ = editor.add_history_entry(line.as_str());

        match parse_line(&line) {
            Ok(CliCommand::Empty) => continue,
            Ok(CliCommand::Exit) => break,
            Ok(CliCommand::Domains) => {
                for domain in orchestrator.domains() {
                    println!("  {domain}");
                }
            }
            Ok(CliCommand::Advise { domain, request }) => match orchestrator.dispatch(&domain, &request).await {
                Ok(advice) => println!("{}", serde_json::to_string_pretty(&advice)?),
                Err(e) => eprintln!("[Error]: {e}. Type 'domains' to see what is available."),
            },
            Err(e) => eprintln!("[Error]: {e:#}"),
        }
    }

    println!("Goodbye!");
    Ok(())
}
