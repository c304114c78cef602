//! Locally synthesised product content, used whenever the extraction
//! service cannot be reached.

use deckflow_common::models::{ExtractionResult, ExtractionStatus, ImageLayout, ProductContent};

const PLACEHOLDER_IMAGE_DIR: &str = "/static/placeholders";

/// Builds one placeholder [`ProductContent`] per name, in order.
///
/// Pure and infallible: the same names always produce the same result.
pub fn simulate_products(product_names: &[String]) -> ExtractionResult {
    let products = product_names
        .iter()
        .enumerate()
        .map(|(index, name)| simulate_product(index, name))
        .collect();
    ExtractionResult::new(products, ExtractionStatus::Simulated)
}

fn simulate_product(index: usize, name: &str) -> ProductContent {
    let layout = ImageLayout::for_position(index);
    let mut content = ProductContent::new(name, layout);
    content.overview = format!(
        "{} is an advanced interactive technology solution designed to engage event visitors.",
        name
    );
    content.specifications = vec![
        "High-resolution display".to_string(),
        "Advanced interactive technology".to_string(),
    ];
    content.content_integration = vec![
        "Content management system integration".to_string(),
        "Real-time content updates".to_string(),
    ];
    content.infrastructure_requirements = vec![
        "Stable internet connection required".to_string(),
        "Dedicated power supply needed".to_string(),
    ];
    content.images = (1..=image_count(layout))
        .map(|n| format!("{}/product-{}.png", PLACEHOLDER_IMAGE_DIR, n))
        .collect();
    content
}

fn image_count(layout: ImageLayout) -> usize {
    match layout {
        ImageLayout::Single => 1,
        ImageLayout::SideBySide => 2,
        ImageLayout::Grid => 4,
    }
}
