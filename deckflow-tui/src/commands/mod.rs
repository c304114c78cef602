// File: deckflow-tui/src/commands/mod.rs

use deckflow_core::services::{ApproveOutcome, DeckSession, SendOutcome};

use crate::render;

mod edit;

const HELP: &str = "\
Type a request in plain words to start, e.g.
  Generate a PowerPoint for the Open House Event on August 11, 2025 in Dubai
  featuring salesperson Jane Doe and slides on the products: A, B, and C.

Commands:
  /approve               generate the presentation from the content shown
  /reject                discard the content
  /edit <n>              start editing product n
  /set <field> <value>   change the product being edited
                         fields: overview, specs, integration, infrastructure,
                                 images (items separated by '|'), layout
  /save | /cancel        finish editing
  /show [n]              show the pending content, or product n in full
  /log                   print the whole conversation
  /help
  /quit
";

/// Handles one input line. Returns whether to quit, plus text to print.
pub async fn dispatch(line: &str, session: &mut DeckSession) -> (bool, Option<String>) {
    let Some(command) = line.strip_prefix('/') else {
        return (false, Some(send(line, session).await));
    };

    let parts: Vec<&str> = command.split_whitespace().collect();
    let cmd = parts.first().copied().unwrap_or("").to_lowercase();
    let args = parts.get(1..).unwrap_or(&[]);

    match cmd.as_str() {
        "help" => (false, Some(HELP.to_string())),
        "quit" | "exit" => (true, None),
        "approve" => (false, Some(approve(session).await)),
        "reject" => match session.reject() {
            Ok(id) => (false, Some(describe(session, id))),
            Err(e) => (false, Some(format!("Cannot reject: {}", e))),
        },
        "edit" | "set" | "save" | "cancel" => {
            (false, Some(edit::handle_edit_command(&cmd, args, session)))
        }
        "show" => (false, Some(show(args, session))),
        "log" => {
            let text = session
                .entries()
                .iter()
                .map(render::entry)
                .collect::<Vec<_>>()
                .join("\n");
            (false, Some(text))
        }
        _ => (false, Some(format!("Unknown command '/{}'. Type /help.", cmd))),
    }
}

async fn send(line: &str, session: &mut DeckSession) -> String {
    match session.send_prompt(line).await {
        Ok(SendOutcome::AwaitingApproval(id))
        | Ok(SendOutcome::MessageTooLong(id))
        | Ok(SendOutcome::ExtractionFailed(id))
        | Ok(SendOutcome::MissingDetails { entry: id, .. }) => describe(session, id),
        Err(e) => format!("Not sent: {}", e),
    }
}

async fn approve(session: &mut DeckSession) -> String {
    match session.approve().await {
        Ok(ApproveOutcome::Generating { entry, .. }) | Ok(ApproveOutcome::SubmissionFailed(entry)) => {
            describe(session, entry)
        }
        Err(e) => format!("Cannot approve: {}", e),
    }
}

fn show(args: &[&str], session: &DeckSession) -> String {
    let Some(pending) = session.pending() else {
        return "Nothing is awaiting approval.".to_string();
    };
    match args.first() {
        None => pending
            .result
            .products()
            .iter()
            .enumerate()
            .map(|(i, p)| render::product_summary(i, p))
            .collect::<Vec<_>>()
            .join("\n"),
        Some(raw) => match raw.parse::<usize>().ok().and_then(|i| pending.result.product(i)) {
            Some(product) => render::product_detail(product),
            None => format!("No product '{}'.", raw),
        },
    }
}

fn describe(session: &DeckSession, id: deckflow_common::models::EntryId) -> String {
    session
        .entry(id)
        .map(render::entry)
        .unwrap_or_default()
}
