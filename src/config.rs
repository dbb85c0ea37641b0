use crate::endpoint::{AnyEndpoint, HttpEndpoint, SageMakerEndpoint};
use std::path::PathBuf;

pub const ENDPOINT_NAME_VAR: &str = "SDXL_ENDPOINT_NAME";
pub const ENDPOINT_URL_VAR: &str = "SDXL_ENDPOINT_URL";
pub const DEFAULT_ENDPOINT_NAME: &str = "neuro-dev-sdxl-6szd-endpoint";

/// Runtime settings, read from the environment (and a `.env` file, if present)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub endpoint_name: String,
    pub endpoint_url: Option<String>,
    pub output_path: PathBuf,
}

impl Config {
    pub fn from_env() -> Self {
        let _ = dotenv::dotenv();
        return Self::from_vars(|key| dotenv::var(key).ok());
    }

    /// Builds the configuration from an arbitrary variable lookup. Blank values count as unset.
    pub fn from_vars(mut var: impl FnMut(&str) -> Option<String>) -> Self {
        let mut lookup = |key: &str| var(key).filter(|x| !x.trim().is_empty());

        return Self {
            endpoint_name: lookup(ENDPOINT_NAME_VAR)
                .unwrap_or_else(|| DEFAULT_ENDPOINT_NAME.to_string()),
            endpoint_url: lookup(ENDPOINT_URL_VAR),
            output_path: PathBuf::from(crate::image::OUTPUT_PATH),
        };
    }

    /// Creates the configured endpoint client without invoking it.
    ///
    /// Resolving the AWS region may still query the instance metadata service.
    pub async fn endpoint(&self) -> AnyEndpoint {
        if let Some(url) = self.endpoint_url.as_deref() {
            tracing::debug!(url, "Using HTTP inference endpoint");
            return AnyEndpoint::Http(HttpEndpoint::new(url));
        }

        tracing::debug!(endpoint = %self.endpoint_name, "Using SageMaker endpoint");
        let endpoint = SageMakerEndpoint::from_env(self.endpoint_name.as_str()).await;
        return AnyEndpoint::SageMaker(endpoint);
    }
}
