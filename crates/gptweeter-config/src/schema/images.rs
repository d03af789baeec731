//! Image generation settings.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Image backends. DALL-E models answer synchronously; `flux-schnell`
/// runs as a job that has to be polled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ImageBackendKind {
    #[serde(rename = "dall-e-2")]
    DallE2,
    #[default]
    #[serde(rename = "dall-e-3")]
    DallE3,
    #[serde(rename = "flux-schnell")]
    FluxSchnell,
}

impl ImageBackendKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ImageBackendKind::DallE2 => "dall-e-2",
            ImageBackendKind::DallE3 => "dall-e-3",
            ImageBackendKind::FluxSchnell => "flux-schnell",
        }
    }

    /// Whether results arrive through a submitted job rather than in the response.
    pub fn is_async(self) -> bool {
        matches!(self, ImageBackendKind::FluxSchnell)
    }
}

impl fmt::Display for ImageBackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ImageBackendKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "dall-e-2" => Ok(ImageBackendKind::DallE2),
            "dall-e-3" => Ok(ImageBackendKind::DallE3),
            "flux-schnell" | "flux" => Ok(ImageBackendKind::FluxSchnell),
            other => Err(format!("unknown image backend '{other}'")),
        }
    }
}

/// Output dimensions in pixels, written as `WIDTHxHEIGHT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ImageSize {
    pub width: u32,
    pub height: u32,
}

impl ImageSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl Default for ImageSize {
    fn default() -> Self {
        Self::new(1024, 1024)
    }
}

impl fmt::Display for ImageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl FromStr for ImageSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (w, h) = s
            .trim()
            .split_once(['x', 'X'])
            .ok_or_else(|| format!("invalid image size '{s}', expected WIDTHxHEIGHT"))?;
        let width = w
            .parse::<u32>()
            .map_err(|e| format!("invalid image width '{w}': {e}"))?;
        let height = h
            .parse::<u32>()
            .map_err(|e| format!("invalid image height '{h}': {e}"))?;
        if width == 0 || height == 0 {
            return Err(format!("image size '{s}' has a zero dimension"));
        }
        Ok(Self { width, height })
    }
}

impl TryFrom<String> for ImageSize {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ImageSize> for String {
    fn from(size: ImageSize) -> Self {
        size.to_string()
    }
}

/// Image generation configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ImagesConfig {
    pub default_backend: ImageBackendKind,
    pub default_size: ImageSize,
    /// Seconds between job status polls (valid range: 1-60).
    pub poll_interval_secs: u64,
    /// Polls before a pending job is abandoned (valid range: 1-100).
    pub max_polls: u32,
    /// Timeout for a single provider call in seconds (valid range: 5-600).
    pub request_timeout_secs: u64,
    /// Generated images remembered by the avatar cache (valid range: 1-10000).
    pub cache_capacity: usize,
}

impl Default for ImagesConfig {
    fn default() -> Self {
        Self {
            default_backend: ImageBackendKind::DallE3,
            default_size: ImageSize::default(),
            poll_interval_secs: 1,
            max_polls: 10,
            request_timeout_secs: 60,
            cache_capacity: 120,
        }
    }
}
