use crate::{
    error::{BuilderError, Error, Result},
    Str,
};
use serde::Serialize;
use std::ops::RangeInclusive;

pub const DEFAULT_SIZE: u32 = 1024;
pub const DEFAULT_SAMPLER: &str = "DPMPP2MSampler";
pub const DEFAULT_CFG_SCALE: f32 = 7.0;
pub const DEFAULT_STEPS: u32 = 50;
pub const DEFAULT_SEED: u64 = 123;
pub const DEFAULT_REFINER_STEPS: u32 = 40;
pub const DEFAULT_REFINER_STRENGTH: f32 = 0.2;

/// A single text prompt, as sent to the endpoint
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextPrompt<'a> {
    pub text: Str<'a>,
}

/// Payload of an SDXL text-to-image request.
///
/// Values are only obtainable through [`GenerationRequest::new`] or a [`GenerateBuilder`],
/// so a constructed request always satisfies the endpoint's field constraints.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationRequest<'a> {
    #[serde(rename = "text_prompts")]
    prompts: Vec<TextPrompt<'a>>,
    width: u32,
    height: u32,
    sampler: Str<'a>,
    cfg_scale: f32,
    steps: u32,
    seed: u64,
    use_refiner: bool,
    refiner_steps: u32,
    refiner_strength: f32,
}

#[derive(Debug, Clone)]
pub struct GenerateBuilder<'a> {
    inner: GenerationRequest<'a>,
}

impl<'a> GenerationRequest<'a> {
    /// Creates a request for `prompt` using the default generation parameters.
    #[inline]
    pub fn new(prompt: impl Into<Str<'a>>) -> Result<Self> {
        return Self::builder(prompt).build();
    }

    #[inline]
    pub fn builder(prompt: impl Into<Str<'a>>) -> GenerateBuilder<'a> {
        return GenerateBuilder::new(prompt);
    }

    #[inline]
    pub fn prompts(&self) -> &[TextPrompt<'a>] {
        &self.prompts
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn sampler(&self) -> &str {
        &self.sampler
    }

    #[inline]
    pub fn cfg_scale(&self) -> f32 {
        self.cfg_scale
    }

    #[inline]
    pub fn steps(&self) -> u32 {
        self.steps
    }

    #[inline]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    #[inline]
    pub fn use_refiner(&self) -> bool {
        self.use_refiner
    }

    #[inline]
    pub fn refiner_steps(&self) -> u32 {
        self.refiner_steps
    }

    #[inline]
    pub fn refiner_strength(&self) -> f32 {
        self.refiner_strength
    }

    /// Serializes the request with the endpoint's field names
    #[inline]
    pub fn to_body(&self) -> Result<Vec<u8>> {
        return encode_body(self);
    }
}

impl<'a> GenerateBuilder<'a> {
    #[inline]
    pub fn new(prompt: impl Into<Str<'a>>) -> Self {
        return Self {
            inner: GenerationRequest {
                prompts: vec![TextPrompt {
                    text: prompt.into(),
                }],
                width: DEFAULT_SIZE,
                height: DEFAULT_SIZE,
                sampler: Str::Borrowed(DEFAULT_SAMPLER),
                cfg_scale: DEFAULT_CFG_SCALE,
                steps: DEFAULT_STEPS,
                seed: DEFAULT_SEED,
                use_refiner: true,
                refiner_steps: DEFAULT_REFINER_STEPS,
                refiner_strength: DEFAULT_REFINER_STRENGTH,
            },
        };
    }

    /// Width of the generated image. Must be a multiple of 8 between 8 and 2048.
    #[inline]
    pub fn width(mut self, width: u32) -> Result<Self, BuilderError<Self>> {
        return match check_dimension(width) {
            Ok(()) => {
                self.inner.width = width;
                Ok(self)
            }
            Err(msg) => Err(BuilderError::msg(self, format!("width {msg}"))),
        };
    }

    /// Height of the generated image. Must be a multiple of 8 between 8 and 2048.
    #[inline]
    pub fn height(mut self, height: u32) -> Result<Self, BuilderError<Self>> {
        return match check_dimension(height) {
            Ok(()) => {
                self.inner.height = height;
                Ok(self)
            }
            Err(msg) => Err(BuilderError::msg(self, format!("height {msg}"))),
        };
    }

    #[inline]
    pub fn sampler(mut self, sampler: impl Into<Str<'a>>) -> Self {
        self.inner.sampler = sampler.into();
        self
    }

    /// How strictly the image follows the prompt. Must be positive.
    #[inline]
    pub fn cfg_scale(mut self, cfg_scale: f32) -> Result<Self, BuilderError<Self>> {
        return match cfg_scale.is_finite() && cfg_scale > 0.0 {
            true => {
                self.inner.cfg_scale = cfg_scale;
                Ok(self)
            }
            false => Err(BuilderError::msg(
                self,
                format!("cfg_scale must be positive, got {cfg_scale}"),
            )),
        };
    }

    #[inline]
    pub fn steps(mut self, steps: u32) -> Result<Self, BuilderError<Self>> {
        if steps == 0 {
            return Err(BuilderError::msg(self, "steps must be at least 1"));
        }
        self.inner.steps = steps;
        return Ok(self);
    }

    #[inline]
    pub fn seed(mut self, seed: u64) -> Self {
        self.inner.seed = seed;
        self
    }

    #[inline]
    pub fn use_refiner(mut self, use_refiner: bool) -> Self {
        self.inner.use_refiner = use_refiner;
        self
    }

    #[inline]
    pub fn refiner_steps(mut self, refiner_steps: u32) -> Result<Self, BuilderError<Self>> {
        if refiner_steps == 0 {
            return Err(BuilderError::msg(self, "refiner_steps must be at least 1"));
        }
        self.inner.refiner_steps = refiner_steps;
        return Ok(self);
    }

    /// Strength of the refiner pass, between 0 and 1.
    #[inline]
    pub fn refiner_strength(mut self, strength: f32) -> Result<Self, BuilderError<Self>> {
        const RANGE: RangeInclusive<f32> = 0.0..=1.0;
        return match RANGE.contains(&strength) {
            true => {
                self.inner.refiner_strength = strength;
                Ok(self)
            }
            false => Err(BuilderError::msg(
                self,
                format!("refiner_strength out of range ({RANGE:?})"),
            )),
        };
    }

    pub fn build(self) -> Result<GenerationRequest<'a>> {
        let prompts = &self.inner.prompts;
        if prompts.is_empty() || prompts.iter().any(|p| p.text.trim().is_empty()) {
            return Err(Error::validation("prompt must not be empty"));
        }
        if self.inner.sampler.trim().is_empty() {
            return Err(Error::validation("sampler must not be empty"));
        }

        return Ok(self.inner);
    }
}

/// Request bodies that fail to serialize are malformed requests, not malformed responses
fn encode_body<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>> {
    return serde_json::to_vec(value).map_err(Error::validation);
}

fn check_dimension(value: u32) -> ::core::result::Result<(), String> {
    const RANGE: RangeInclusive<u32> = 8..=2048;
    if !RANGE.contains(&value) {
        return Err(format!("out of range ({RANGE:?})"));
    }
    if value % 8 != 0 {
        return Err(format!("must be a multiple of 8, got {value}"));
    }
    return Ok(());
}
