//! Default TOML config template with inline documentation comments.

/// Generate the default TOML config content with comments.
pub(crate) fn default_config_toml() -> String {
    r##"# GPTweeter Configuration
# Schema version 1
# Only override what you want to change -- missing fields use defaults.
# API keys are NOT stored here: set OPENAI_KEY, GROQ_KEY, ANTHROPIC_API_KEY,
# REPLICATE_API_TOKEN or write them to ~/.openai_key, ~/.groq_apikey,
# ~/.anthropic_key, ~/.replicate_key.

[chat]
# default_model = "gpt-4-turbo-preview"
# retry_attempts = 5          # 1-10, first try included
# retry_delay_ms = 2000       # 0-60000
# request_timeout_secs = 120  # 5-600

[images]
# default_backend = "dall-e-3"   # dall-e-2, dall-e-3, flux-schnell
# default_size = "1024x1024"
# poll_interval_secs = 1         # 1-60
# max_polls = 10                 # 1-100
# request_timeout_secs = 60      # 5-600
# cache_capacity = 120           # 1-10000

[endpoints]
# openai = "https://api.openai.com/v1"
# groq = "https://api.groq.com/openai/v1"
# anthropic = "https://api.anthropic.com/v1"
# replicate = "https://api.replicate.com/v1"

[logging]
# level = "INFO"         # DEBUG, INFO, WARNING, ERROR

# Extra chat models. Built-in: gpt-3.5-turbo, gpt-4-turbo-preview,
# mixtral-8x7b-32768, claude-3-haiku-20240307.
# [[models]]
# id = "llama3-70b-8192"
# provider = "groq"      # openai, groq, anthropic
# max_tokens = 8000
"##
    .to_string()
}
