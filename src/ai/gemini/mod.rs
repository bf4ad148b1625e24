pub mod client;
pub mod image;
pub mod types;

pub use client::GeminiHttpClient;
pub use image::{extract_image, GeminiImageClient, GenerationRequest};
