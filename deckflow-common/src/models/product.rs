// File: deckflow-common/src/models/product.rs

use serde::{Deserialize, Serialize};

/// How a product's images are arranged on its slide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageLayout {
    Single,
    SideBySide,
    Grid,
}

impl ImageLayout {
    const CYCLE: [ImageLayout; 3] = [ImageLayout::Single, ImageLayout::SideBySide, ImageLayout::Grid];

    /// Layout used for the product at `index` when nothing better is known.
    pub fn for_position(index: usize) -> Self {
        Self::CYCLE[index % Self::CYCLE.len()]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ImageLayout::Single => "single",
            ImageLayout::SideBySide => "side_by_side",
            ImageLayout::Grid => "grid",
        }
    }
}

/// Marketing content for one product.
///
/// The product name is fixed when the content is extracted; every other field
/// may be replaced wholesale while the content is awaiting approval.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductContent {
    product_name: String,
    pub overview: String,
    #[serde(default)]
    pub specifications: Vec<String>,
    #[serde(default)]
    pub content_integration: Vec<String>,
    #[serde(default)]
    pub infrastructure_requirements: Vec<String>,
    #[serde(default)]
    pub images: Vec<String>,
    pub image_layout: ImageLayout,
}

impl ProductContent {
    pub fn new(product_name: impl Into<String>, image_layout: ImageLayout) -> Self {
        Self {
            product_name: product_name.into(),
            overview: String::new(),
            specifications: Vec::new(),
            content_integration: Vec::new(),
            infrastructure_requirements: Vec::new(),
            images: Vec::new(),
            image_layout,
        }
    }

    pub fn product_name(&self) -> &str {
        &self.product_name
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionStatus {
    /// Content came from the live extraction service.
    Success,
    /// Content was synthesised locally because the service was unreachable.
    Simulated,
}

/// Extracted content for every requested product, in request order.
///
/// There is intentionally no way to insert, remove or reorder products once
/// the result exists: edits address products by index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "StoredExtraction")]
pub struct ExtractionResult {
    products: Vec<ProductContent>,
    count: usize,
    status: ExtractionStatus,
}

/// Deserialized form; `count` is always recomputed from `products`.
#[derive(Deserialize)]
struct StoredExtraction {
    products: Vec<ProductContent>,
    status: ExtractionStatus,
}

impl From<StoredExtraction> for ExtractionResult {
    fn from(stored: StoredExtraction) -> Self {
        Self::new(stored.products, stored.status)
    }
}

impl ExtractionResult {
    pub fn new(products: Vec<ProductContent>, status: ExtractionStatus) -> Self {
        let count = products.len();
        Self { products, count, status }
    }

    pub fn products(&self) -> &[ProductContent] {
        &self.products
    }

    pub fn product(&self, index: usize) -> Option<&ProductContent> {
        self.products.get(index)
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn status(&self) -> ExtractionStatus {
        self.status
    }

    pub fn is_simulated(&self) -> bool {
        self.status == ExtractionStatus::Simulated
    }

    /// Overwrite the product at `index`, returning the previous content.
    /// Returns `None` (and changes nothing) if `index` is out of range.
    pub fn replace(&mut self, index: usize, content: ProductContent) -> Option<ProductContent> {
        let slot = self.products.get_mut(index)?;
        Some(std::mem::replace(slot, content))
    }

    pub fn into_products(self) -> Vec<ProductContent> {
        self.products
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentSection {
    Specifications,
    ContentIntegration,
    InfrastructureRequirements,
}

/// Summarisation budget sent along with every extraction request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionConfig {
    pub overview_lines: u32,
    pub points_per_section: u32,
    pub sections: Vec<ContentSection>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            overview_lines: 2,
            points_per_section: 2,
            sections: vec![
                ContentSection::Specifications,
                ContentSection::ContentIntegration,
                ContentSection::InfrastructureRequirements,
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_cycles_every_three_positions() {
        let layouts: Vec<_> = (0..6).map(ImageLayout::for_position).collect();
        assert_eq!(
            layouts,
            vec![
                ImageLayout::Single,
                ImageLayout::SideBySide,
                ImageLayout::Grid,
                ImageLayout::Single,
                ImageLayout::SideBySide,
                ImageLayout::Grid,
            ]
        );
    }

    #[test]
    fn replace_out_of_range_is_a_no_op() {
        let mut result = ExtractionResult::new(
            vec![ProductContent::new("Kiosk", ImageLayout::Single)],
            ExtractionStatus::Success,
        );
        let before = result.clone();
        assert!(result.replace(3, ProductContent::new("Other", ImageLayout::Grid)).is_none());
        assert_eq!(result, before);
    }

    #[test]
    fn stored_count_is_recomputed_from_products() {
        let json = serde_json::json!({
            "products": [{"product_name": "Kiosk", "overview": "", "image_layout": "single"}],
            "count": 5,
            "status": "success"
        });
        let result: ExtractionResult = serde_json::from_value(json).unwrap();
        assert_eq!(result.count(), 1);
        assert_eq!(result.products().len(), 1);
        assert_eq!(result.status(), ExtractionStatus::Success);
    }

    #[test]
    fn product_content_wire_format_uses_snake_case() {
        let mut content = ProductContent::new("AI Photobooth", ImageLayout::SideBySide);
        content.specifications = vec!["4K display".into()];
        let json = serde_json::to_value(&content).unwrap();
        assert_eq!(json["product_name"], "AI Photobooth");
        assert_eq!(json["image_layout"], "side_by_side");
        assert_eq!(json["specifications"][0], "4K display");
    }

    #[test]
    fn default_config_matches_summarisation_budget() {
        let json = serde_json::to_value(ExtractionConfig::default()).unwrap();
        assert_eq!(json["overview_lines"], 2);
        assert_eq!(json["points_per_section"], 2);
        assert_eq!(
            json["sections"],
            serde_json::json!(["specifications", "content_integration", "infrastructure_requirements"])
        );
    }
}
