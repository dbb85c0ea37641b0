//! Remote inference endpoints.
//!
//! An [`Endpoint`] takes an already serialized JSON request and hands back the raw response
//! body. Failures are surfaced as [`Error::Transport`] with the underlying error left untouched.

use crate::error::{Error, Result};
use aws_sdk_sagemakerruntime::primitives::Blob;
use bytes::Bytes;
use std::{future::Future, sync::Arc};

pub const JSON_CONTENT_TYPE: &str = "application/json";

pub trait Endpoint {
    /// Sends `body` to the endpoint and waits for its response body.
    fn invoke(&self, body: Bytes) -> impl Future<Output = Result<Bytes>> + Send;

    /// Name used to identify the endpoint in logs
    fn name(&self) -> &str;
}

/// A model deployed as a SageMaker real-time inference endpoint
#[derive(Debug, Clone)]
pub struct SageMakerEndpoint {
    client: aws_sdk_sagemakerruntime::Client,
    endpoint_name: Arc<str>,
}

impl SageMakerEndpoint {
    #[inline]
    pub fn new(
        client: aws_sdk_sagemakerruntime::Client,
        endpoint_name: impl Into<Arc<str>>,
    ) -> Self {
        return Self {
            client,
            endpoint_name: endpoint_name.into(),
        };
    }

    /// Builds a client from the default AWS credential and region chain
    pub async fn from_env(endpoint_name: impl Into<Arc<str>>) -> Self {
        let config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        return Self::new(aws_sdk_sagemakerruntime::Client::new(&config), endpoint_name);
    }
}

impl Endpoint for SageMakerEndpoint {
    async fn invoke(&self, body: Bytes) -> Result<Bytes> {
        tracing::debug!(
            endpoint = %self.endpoint_name,
            bytes = body.len(),
            "Invoking SageMaker endpoint"
        );

        let resp = self
            .client
            .invoke_endpoint()
            .endpoint_name(&*self.endpoint_name)
            .content_type(JSON_CONTENT_TYPE)
            .accept(JSON_CONTENT_TYPE)
            .body(Blob::new(body.to_vec()))
            .send()
            .await
            .map_err(|e| Error::transport(aws_sdk_sagemakerruntime::Error::from(e)))?;

        let body = resp.body.map(Blob::into_inner).unwrap_or_default();
        tracing::info!(endpoint = %self.endpoint_name, bytes = body.len(), "Prediction received");
        return Ok(Bytes::from(body));
    }

    #[inline]
    fn name(&self) -> &str {
        &self.endpoint_name
    }
}

/// A SageMaker-compatible inference container reached over plain HTTP (e.g. `/invocations`)
#[derive(Debug, Clone)]
pub struct HttpEndpoint {
    client: reqwest::Client,
    url: Arc<str>,
}

impl HttpEndpoint {
    #[inline]
    pub fn new(url: impl Into<Arc<str>>) -> Self {
        return Self::with_client(reqwest::Client::new(), url);
    }

    #[inline]
    pub fn with_client(client: reqwest::Client, url: impl Into<Arc<str>>) -> Self {
        return Self {
            client,
            url: url.into(),
        };
    }
}

impl Endpoint for HttpEndpoint {
    async fn invoke(&self, body: Bytes) -> Result<Bytes> {
        tracing::debug!(url = %self.url, bytes = body.len(), "Posting to inference endpoint");

        let resp = self
            .client
            .post(&*self.url)
            .header(reqwest::header::CONTENT_TYPE, JSON_CONTENT_TYPE)
            .header(reqwest::header::ACCEPT, JSON_CONTENT_TYPE)
            .body(body)
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;

        tracing::info!(url = %self.url, bytes = resp.len(), "Prediction received");
        return Ok(resp);
    }

    #[inline]
    fn name(&self) -> &str {
        &self.url
    }
}

/// Either of the supported transports, picked at runtime from the configuration
#[derive(Debug, Clone)]
pub enum AnyEndpoint {
    SageMaker(SageMakerEndpoint),
    Http(HttpEndpoint),
}

impl Endpoint for AnyEndpoint {
    async fn invoke(&self, body: Bytes) -> Result<Bytes> {
        return match self {
            Self::SageMaker(x) => x.invoke(body).await,
            Self::Http(x) => x.invoke(body).await,
        };
    }

    #[inline]
    fn name(&self) -> &str {
        match self {
            Self::SageMaker(x) => x.name(),
            Self::Http(x) => x.name(),
        }
    }
}
