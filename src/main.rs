use anyhow::Context;
use sdxl_endpoint::prelude::*;
use tracing_subscriber::EnvFilter;

/// Takes the prompt out of the process arguments (program name first)
fn prompt_from_args(mut args: impl Iterator<Item = String>) -> anyhow::Result<String> {
    return args.nth(1).context("missing prompt as first argument");
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let prompt = prompt_from_args(std::env::args())?;
    let request = GenerationRequest::new(prompt)?;

    let config = Config::from_env();
    let endpoint = config.endpoint().await;

    generate_image(&request, &endpoint, &config.output_path).await?;
    println!("Image saved");
    return Ok(());
}
