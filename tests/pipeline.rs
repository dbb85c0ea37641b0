use base64::Engine;
use bytes::Bytes;
use sdxl_endpoint::prelude::*;
use std::{
    path::PathBuf,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Mutex,
    },
};

/// Endpoint answering every call with the same canned body
struct MockEndpoint {
    response: Bytes,
    calls: AtomicUsize,
    last_body: Mutex<Option<Bytes>>,
}

impl MockEndpoint {
    fn new(response: impl Into<Bytes>) -> Self {
        return Self {
            response: response.into(),
            calls: AtomicUsize::new(0),
            last_body: Mutex::new(None),
        };
    }

    fn with_image(image: &[u8]) -> Self {
        let encoded = base64::engine::general_purpose::STANDARD.encode(image);
        return Self::new(serde_json::json!({ "generated_image": encoded }).to_string());
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Endpoint for MockEndpoint {
    async fn invoke(&self, body: Bytes) -> Result<Bytes> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_body.lock().unwrap() = Some(body);
        return Ok(self.response.clone());
    }

    fn name(&self) -> &str {
        "mock"
    }
}

/// Endpoint that always fails, as a broken network would
struct FailingEndpoint;

impl Endpoint for FailingEndpoint {
    async fn invoke(&self, _body: Bytes) -> Result<Bytes> {
        let err = std::io::Error::new(std::io::ErrorKind::ConnectionReset, "connection reset");
        return Err(Error::transport(err));
    }

    fn name(&self) -> &str {
        "failing"
    }
}

/// Temporary working directory with an `output/` folder in it
fn workspace() -> anyhow::Result<(tempfile::TempDir, PathBuf)> {
    let dir = tempfile::tempdir()?;
    std::fs::create_dir(dir.path().join("output"))?;
    let output = dir.path().join(OUTPUT_PATH);
    return Ok((dir, output));
}

#[tokio::test]
async fn writes_decoded_image() -> anyhow::Result<()> {
    let (_dir, output) = workspace()?;
    let png = (0..=255u8).cycle().take(4096).collect::<Vec<_>>();
    let endpoint = MockEndpoint::with_image(&png);

    let request = GenerationRequest::new("a rubber duck debugging")?;
    let image = generate_image(&request, &endpoint, &output).await?;

    assert_eq!(endpoint.calls(), 1);
    assert_eq!(&*image, png.as_slice());
    assert_eq!(std::fs::read(&output)?, png);
    return Ok(());
}

#[tokio::test]
async fn sends_serialized_request() -> anyhow::Result<()> {
    let (_dir, output) = workspace()?;
    let endpoint = MockEndpoint::with_image(b"hello");

    let request = GenerationRequest::new("quack")?;
    generate_image(&request, &endpoint, &output).await?;

    let body = endpoint.last_body.lock().unwrap().clone().expect("request body");
    let json: serde_json::Value = serde_json::from_slice(&body)?;
    assert_eq!(json["text_prompts"][0]["text"], "quack");
    assert_eq!(json["sampler"], "DPMPP2MSampler");
    assert_eq!(json["seed"], 123);
    return Ok(());
}

#[tokio::test]
async fn overwrites_existing_output() -> anyhow::Result<()> {
    let (_dir, output) = workspace()?;
    std::fs::write(&output, vec![0xAA; 1024])?;

    let endpoint = MockEndpoint::new(r#"{"generated_image": "aGVsbG8="}"#);
    generate_image(&GenerationRequest::new("duck")?, &endpoint, &output).await?;

    assert_eq!(std::fs::read(&output)?, b"hello");
    return Ok(());
}

#[tokio::test]
async fn invalid_json_skips_write() -> anyhow::Result<()> {
    let (_dir, output) = workspace()?;
    let endpoint = MockEndpoint::new("not-json");

    let result = generate_image(&GenerationRequest::new("duck")?, &endpoint, &output).await;

    assert!(matches!(result, Err(Error::Parse(_))));
    assert!(!output.exists());
    return Ok(());
}

#[tokio::test]
async fn missing_field_skips_write() -> anyhow::Result<()> {
    let (_dir, output) = workspace()?;
    let endpoint = MockEndpoint::new("{}");

    let result = generate_image(&GenerationRequest::new("duck")?, &endpoint, &output).await;

    assert!(matches!(result, Err(Error::MissingField("generated_image"))));
    assert!(!output.exists());
    return Ok(());
}

#[tokio::test]
async fn bad_base64_skips_write() -> anyhow::Result<()> {
    let (_dir, output) = workspace()?;
    let endpoint = MockEndpoint::new(r#"{"generated_image": "%%%"}"#);

    let result = generate_image(&GenerationRequest::new("duck")?, &endpoint, &output).await;

    assert!(matches!(result, Err(Error::Decode(_))));
    assert!(!output.exists());
    return Ok(());
}

#[tokio::test]
async fn transport_error_is_passed_through() -> anyhow::Result<()> {
    let (_dir, output) = workspace()?;

    let result = generate_image(&GenerationRequest::new("duck")?, &FailingEndpoint, &output).await;

    match result {
        Err(Error::Transport(e)) => assert_eq!(e.to_string(), "connection reset"),
        other => panic!("expected transport error, got {other:?}"),
    }
    assert!(!output.exists());
    return Ok(());
}

#[tokio::test]
async fn missing_output_directory_is_storage_error() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let output = dir.path().join(OUTPUT_PATH);
    let endpoint = MockEndpoint::with_image(b"hello");

    let err = generate_image(&GenerationRequest::new("duck")?, &endpoint, &output)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Storage(_)));
    assert_eq!(err.status(), Some(500));
    assert!(!dir.path().join("output").exists());
    return Ok(());
}
