use crate::error::{Error, Result};
use base64::Engine;
use bytes::Bytes;
use serde_json::{Map, Value};
use std::{ops::Deref, path::Path};
use tokio::io::AsyncWriteExt;

pub mod generate;

/// Path the generated image is written to, relative to the working directory
pub const OUTPUT_PATH: &str = "output/result.png";

/// Key of the base64 image inside the endpoint's response
pub const IMAGE_FIELD: &str = "generated_image";

/// Raw image bytes, as returned by the endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    data: Bytes,
}

impl DecodedImage {
    /// Parses an endpoint response body and decodes its base64 image.
    ///
    /// The body must be a JSON object holding a string under [`IMAGE_FIELD`].
    /// No check is made on the decoded bytes themselves.
    pub fn from_response(body: &[u8]) -> Result<Self> {
        let json = serde_json::from_slice::<Map<String, Value>>(body)?;
        let image = match json.get(IMAGE_FIELD) {
            Some(Value::String(x)) => x,
            _ => return Err(Error::MissingField(IMAGE_FIELD)),
        };

        return Self::from_base64(image);
    }

    /// Decodes standard base64, ignoring ASCII whitespace such as line wrapping.
    pub fn from_base64(encoded: impl AsRef<[u8]>) -> Result<Self> {
        let encoded = encoded
            .as_ref()
            .iter()
            .copied()
            .filter(|x| !x.is_ascii_whitespace())
            .collect::<Vec<u8>>();
        let data = base64::engine::general_purpose::STANDARD.decode(encoded)?;
        return Ok(Self {
            data: Bytes::from(data),
        });
    }

    #[inline]
    pub fn into_bytes(self) -> Bytes {
        self.data
    }

    /// Writes the whole image to `path`, creating or truncating the file.
    ///
    /// The parent directory must already exist. A failed write may leave a partial file behind.
    pub async fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Err(e) = self.write_to(path).await {
            tracing::error!("Failed to save: {e}");
            return Err(Error::Storage(e));
        }

        tracing::info!(path = %path.display(), bytes = self.data.len(), "Image saved");
        return Ok(());
    }

    async fn write_to(&self, path: &Path) -> std::io::Result<()> {
        let mut file = tokio::fs::File::create(path).await?;
        file.write_all(&self.data).await?;
        file.flush().await?;
        return Ok(());
    }
}

impl Deref for DecodedImage {
    type Target = [u8];

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.data
    }
}

impl AsRef<[u8]> for DecodedImage {
    #[inline]
    fn as_ref(&self) -> &[u8] {
        &self.data
    }
}
