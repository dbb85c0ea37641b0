//! Text-to-image generation against a hosted SDXL model.
//!
//! ```no_run
//! use sdxl_endpoint::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let endpoint = SageMakerEndpoint::from_env("my-sdxl-endpoint").await;
//!     let request = GenerationRequest::new("A duck writing Rust")?;
//!     generate_image(&request, &endpoint, "output/result.png").await?;
//!     return Ok(());
//! }
//! ```

use bytes::Bytes;
use endpoint::Endpoint;
use error::Result;
use image::{generate::GenerationRequest, DecodedImage};
use std::{borrow::Cow, path::Path};

pub(crate) type Str<'a> = Cow<'a, str>;

pub mod config;
pub mod endpoint;
pub mod error;
pub mod image;

pub mod prelude {
    use super::*;

    pub use super::generate_image;
    pub use config::Config;
    pub use endpoint::{AnyEndpoint, Endpoint, HttpEndpoint, SageMakerEndpoint};
    pub use error::{Error, Result};
    pub use image::generate::{GenerateBuilder, GenerationRequest};
    pub use image::{DecodedImage, OUTPUT_PATH};
}

/// Sends `request` to `endpoint`, decodes the returned image and writes it to `output`.
///
/// Nothing is written unless the response was successfully decoded.
pub async fn generate_image<E: Endpoint>(
    request: &GenerationRequest<'_>,
    endpoint: &E,
    output: impl AsRef<Path>,
) -> Result<DecodedImage> {
    let body = Bytes::from(request.to_body()?);
    tracing::info!(endpoint = endpoint.name(), "Requesting image generation");

    let resp = endpoint.invoke(body).await?;
    let image = DecodedImage::from_response(&resp)?;
    image.save(output).await?;

    return Ok(image);
}
