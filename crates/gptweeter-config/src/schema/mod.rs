//! Configuration schema types for GPTweeter.
//!
//! All structs use `serde(default)` so partial configs work correctly.
//! Missing fields are filled with the defaults the service has always used.

mod chat;
mod endpoints;
mod images;
mod models;
mod system;

pub use chat::*;
pub use endpoints::*;
pub use images::*;
pub use models::*;
pub use system::*;

use serde::{Deserialize, Serialize};

/// Current config schema version.
pub const CONFIG_SCHEMA_VERSION: u32 = 1;

/// Root configuration for GPTweeter.
///
/// Only override what you want to change.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct GptweeterConfig {
    pub chat: ChatConfig,
    pub images: ImagesConfig,
    pub endpoints: EndpointsConfig,
    pub logging: LoggingConfig,
    /// Extra chat models on top of the built-in table. An entry with a
    /// built-in id replaces that entry.
    pub models: Vec<ModelEntry>,
}
