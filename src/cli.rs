//! Terminal client: stdin/stdout form for a single onboarding session.

use std::path::PathBuf;
use std::sync::Arc;

use futures::{StreamExt, stream};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::error::{DocumentError, Error, OnboardingError};
use crate::onboarding::view;
use crate::onboarding::{DocumentSlot, FormField, SessionController, SessionState};

const HELP: &str = "\
Commands:
  set <field> <value>    fullName, dob, phone, address, collegeName, passYear
  graduated <yes|no>     graduation status (changes the last document's label)
  attach <slot> <path>   resume, photo, aadhaar, pan, sscMemo, interMemo, degreeDoc
  detach <slot>          remove an attached document
  show                   print the form
  submit                 send everything
  quit";

/// One line of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliCommand {
    Set { field: FormField, value: String },
    Graduated(bool),
    Attach { slot: DocumentSlot, path: PathBuf },
    Detach(DocumentSlot),
    Show,
    Submit,
    Help,
    Quit,
}

impl std::str::FromStr for CliCommand {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (verb, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let rest = rest.trim();

        match verb.to_ascii_lowercase().as_str() {
            "set" => {
                let (field, value) = rest
                    .split_once(char::is_whitespace)
                    .unwrap_or((rest, ""));
                Ok(Self::Set {
                    field: field.parse()?,
                    value: value.trim().to_string(),
                })
            }
            "graduated" => match rest.to_ascii_lowercase().as_str() {
                "yes" | "true" | "completed" => Ok(Self::Graduated(true)),
                "no" | "false" | "pursuing" => Ok(Self::Graduated(false)),
                other => Err(format!("Expected yes or no, got {other:?}")),
            },
            "attach" => {
                let (slot, path) = rest
                    .split_once(char::is_whitespace)
                    .ok_or_else(|| "Usage: attach <slot> <path>".to_string())?;
                Ok(Self::Attach {
                    slot: slot.parse::<DocumentSlot>().map_err(|e: DocumentError| e.to_string())?,
                    path: PathBuf::from(path.trim()),
                })
            }
            "detach" => Ok(Self::Detach(
                rest.parse::<DocumentSlot>().map_err(|e: DocumentError| e.to_string())?,
            )),
            "show" => Ok(Self::Show),
            "submit" => Ok(Self::Submit),
            "help" | "?" => Ok(Self::Help),
            "quit" | "exit" => Ok(Self::Quit),
            other => Err(format!("Unknown command: {other}. Type 'help' for commands.")),
        }
    }
}

/// What the loop should do after a command.
enum Flow {
    Continue,
    Done,
}

/// Activate the session and, if the link is valid, run the form on stdin
/// until the submission is accepted or the user quits.
pub async fn run(controller: Arc<SessionController>, activation_link: &str) -> Result<SessionState, Error> {
    eprintln!("{}", view::VERIFYING_MESSAGE);
    if let Err(e) = controller.activate(activation_link).await {
        tracing::warn!(error = %e, "Onboarding link not usable");
    }

    println!("\n{}\n", view::render(&controller.status().await));
    let state = controller.state().await;
    let session_id = controller.session_id().await;
    if state != SessionState::Ready {
        tracing::info!(%session_id, %state, "Onboarding form not available");
        return Ok(state);
    }
    tracing::info!(%session_id, "Onboarding form opened");
    eprintln!("{HELP}\n");

    let (tx, rx) = tokio::sync::mpsc::unbounded_channel::<String>();
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => {
                    if tx.send(line).is_err() {
                        break;
                    }
                }
                Ok(None) => break, // EOF
                Err(e) => {
                    tracing::error!("Error reading stdin: {}", e);
                    break;
                }
            }
        }
    });
    let mut input = stream::unfold(rx, |mut rx| async move { rx.recv().await.map(|l| (l, rx)) }).boxed();

    eprint!("> ");
    while let Some(line) = input.next().await {
        if line.trim().is_empty() {
            eprint!("> ");
            continue;
        }
        let flow = match line.parse::<CliCommand>() {
            Ok(command) => execute(&controller, command).await,
            Err(message) => {
                eprintln!("{message}");
                Flow::Continue
            }
        };
        if let Flow::Done = flow {
            break;
        }
        eprint!("> ");
    }

    Ok(controller.state().await)
}

async fn execute(controller: &SessionController, command: CliCommand) -> Flow {
    let result = match command {
        CliCommand::Set { field, value } => controller.update_field(field, value).await.map(|_| ()),
        CliCommand::Graduated(graduated) => controller.set_graduated(graduated).await.map(|_| ()),
        CliCommand::Attach { slot, path } => controller.attach_path(slot, &path).await.map(|_| ()),
        CliCommand::Detach(slot) => controller.clear_document(slot).await.map(|_| ()),
        CliCommand::Show => {
            println!("\n{}\n", view::render(&controller.status().await));
            Ok(())
        }
        CliCommand::Help => {
            eprintln!("{HELP}");
            Ok(())
        }
        CliCommand::Quit => return Flow::Done,
        CliCommand::Submit => return submit(controller).await,
    };

    if let Err(e) = result {
        eprintln!("{e}");
    }
    Flow::Continue
}

async fn submit(controller: &SessionController) -> Flow {
    let before = controller.status().await;
    if before.missing_fields.is_empty() && before.missing_documents.is_empty() {
        eprintln!("{}", view::UPLOADING_MESSAGE);
    }
    match controller.submit().await {
        Ok(()) => {
            println!("\n{}\n", view::render(&controller.status().await));
            Flow::Done
        }
        Err(OnboardingError::ValidationIncomplete { missing }) => {
            eprintln!("{}", view::validation_message(&missing));
            Flow::Continue
        }
        Err(e) => {
            let status = controller.status().await;
            match status.message {
                Some(message) => eprintln!("{message}"),
                None => eprintln!("{e}"),
            }
            Flow::Continue
        }
    }
}
