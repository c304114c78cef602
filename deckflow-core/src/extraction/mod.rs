pub mod client;
pub mod fallback;

pub use client::ContentExtractionClient;
pub use fallback::simulate_products;
