// File: deckflow-tui/src/render.rs

use deckflow_common::models::{Attachment, ConversationEntry, ProductContent, Sender};

pub fn entry(entry: &ConversationEntry) -> String {
    let who = match entry.sender {
        Sender::User => "you",
        Sender::System => "deckflow",
    };
    let mut out = format!(
        "[{} {}] {}: {}",
        entry.id,
        entry.timestamp.format("%H:%M:%S"),
        who,
        entry.body
    );
    for attachment in &entry.attachments {
        match attachment {
            Attachment::Extraction(result) => {
                for (index, product) in result.products().iter().enumerate() {
                    out.push('\n');
                    out.push_str(&product_summary(index, product));
                }
            }
            Attachment::GenerationInProgress { job_id } => {
                out.push_str(&format!("\n  (job {} in progress)", job_id));
            }
            Attachment::Download { artifact } => {
                out.push_str(&format!("\n  Download: {}", artifact));
            }
            Attachment::ApprovalRequest => {
                out.push_str("\n  Type /approve, /reject or /edit <n>.");
            }
        }
    }
    out
}

pub fn product_summary(index: usize, product: &ProductContent) -> String {
    format!(
        "  {}. {} [{}, {} image(s)]",
        index,
        product.product_name(),
        product.image_layout.as_str(),
        product.images.len()
    )
}

pub fn product_detail(product: &ProductContent) -> String {
    let mut out = format!("{}\n  overview: {}", product.product_name(), product.overview);
    let sections = [
        ("specs", &product.specifications),
        ("integration", &product.content_integration),
        ("infrastructure", &product.infrastructure_requirements),
        ("images", &product.images),
    ];
    for (label, items) in sections {
        out.push_str(&format!("\n  {}:", label));
        for item in items {
            out.push_str(&format!("\n    - {}", item));
        }
    }
    out.push_str(&format!("\n  layout: {}", product.image_layout.as_str()));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use deckflow_common::models::ImageLayout;

    #[test]
    fn detail_lists_every_section() {
        let mut product = ProductContent::new("Holo Fan", ImageLayout::Grid);
        product.specifications = vec!["65cm".into()];
        let text = product_detail(&product);
        assert!(text.starts_with("Holo Fan"));
        assert!(text.contains("specs:\n    - 65cm"));
        assert!(text.ends_with("layout: grid"));
    }
}
