use std::path::PathBuf;

use clap::{Parser, Subcommand};
use gptweeter_config::{ImageBackendKind, ImageSize};

use crate::tweets::TWEET_MODEL;

pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful assistant.";

/// GPTweeter: synthetic tweets and images from LLM providers.
#[derive(Parser, Debug)]
#[command(name = "gptweeter", version, about)]
pub struct Args {
    /// Config file path override.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log level override (debug, info, warn, error).
    #[arg(long)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Line-oriented chat on stdin/stdout. `/export` prints the transcript.
    Chat {
        /// Model id; the configured default when omitted.
        #[arg(long)]
        model: Option<String>,

        #[arg(long, default_value = DEFAULT_SYSTEM_PROMPT)]
        system: String,
    },

    /// Print a feed of generated tweets as JSON.
    Tweets {
        /// Topic to tweet about; random when omitted or "random".
        topic: Option<String>,

        #[arg(long, default_value = TWEET_MODEL)]
        model: String,
    },

    /// Generate an image.
    Image(ImageArgs),
}

#[derive(clap::Args, Debug)]
pub struct ImageArgs {
    pub prompt: String,

    /// dall-e-2, dall-e-3 or flux-schnell.
    #[arg(long)]
    pub backend: Option<ImageBackendKind>,

    /// WIDTHxHEIGHT, e.g. 1024x1024.
    #[arg(long)]
    pub size: Option<ImageSize>,

    #[arg(long, default_value_t = 1)]
    pub count: u32,

    /// Ask synchronous backends for base64 instead of URLs.
    #[arg(long)]
    pub b64: bool,

    /// Print the first image as a data: URI.
    #[arg(long)]
    pub data_uri: bool,
}

pub fn parse() -> Args {
    Args::parse()
}
