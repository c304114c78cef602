// File: deckflow-tui/src/commands/edit.rs

use deckflow_common::models::ImageLayout;
use deckflow_core::services::DeckSession;

use crate::render;

pub fn handle_edit_command(cmd: &str, args: &[&str], session: &mut DeckSession) -> String {
    match cmd {
        "edit" => {
            let Some(index) = args.first().and_then(|a| a.parse::<usize>().ok()) else {
                return "Usage: /edit <n>".to_string();
            };
            match session.begin_edit(index) {
                Ok(product) => format!("Editing:\n{}", render::product_detail(product)),
                Err(e) => format!("Cannot edit: {}", e),
            }
        }
        "set" => {
            if args.len() < 2 {
                return "Usage: /set <field> <value>".to_string();
            }
            let value = args[1..].join(" ");
            match set_field(session, args[0], &value) {
                Ok(()) => format!("Updated {}.", args[0]),
                Err(msg) => msg,
            }
        }
        "save" => match session.save_draft() {
            Ok(()) => "Saved.".to_string(),
            Err(e) => format!("Cannot save: {}", e),
        },
        "cancel" => match session.cancel_edit() {
            Ok(()) => "Edit discarded.".to_string(),
            Err(e) => format!("Cannot cancel: {}", e),
        },
        _ => format!("Unknown edit command '{}'", cmd),
    }
}

fn set_field(session: &mut DeckSession, field: &str, value: &str) -> Result<(), String> {
    let draft = session.draft_mut().map_err(|e| format!("Cannot set: {}", e))?;
    match field.to_lowercase().as_str() {
        "overview" => draft.overview = value.to_string(),
        "specs" | "specifications" => draft.specifications = split_items(value),
        "integration" => draft.content_integration = split_items(value),
        "infrastructure" => draft.infrastructure_requirements = split_items(value),
        "images" => draft.images = split_items(value),
        "layout" => draft.image_layout = parse_layout(value)?,
        other => return Err(format!("Unknown field '{}'", other)),
    }
    Ok(())
}

fn split_items(value: &str) -> Vec<String> {
    value
        .split('|')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_layout(value: &str) -> Result<ImageLayout, String> {
    match value.trim().to_lowercase().as_str() {
        "single" => Ok(ImageLayout::Single),
        "side_by_side" | "side-by-side" => Ok(ImageLayout::SideBySide),
        "grid" => Ok(ImageLayout::Grid),
        other => Err(format!("Unknown layout '{}': use single, side_by_side or grid", other)),
    }
}
