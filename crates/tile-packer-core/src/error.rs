use thiserror::Error;

#[derive(Debug, Error)]
pub enum TilePackError {
    #[error("Invalid configuration: {0}")]
    Configuration(String),
    #[error("Shape extraction failed for image {image}: {reason}")]
    ShapeExtraction { image: String, reason: String },
    #[error(
        "Image {image} ({width}x{height} px footprint) does not fit a {page_size}x{page_size} page"
    )]
    Placement {
        image: String,
        width: u32,
        height: u32,
        page_size: u32,
    },
}

impl TilePackError {
    pub(crate) fn shape(image: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ShapeExtraction {
            image: image.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, TilePackError>;
