use anyhow::{Context, Result};

const DEFAULT_COMPLETION_URL: &str = "https://api.groq.com/openai/v1/chat/completions";
const DEFAULT_COMPLETION_MODEL: &str = "llama-3.3-70b-versatile";

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub completion_api_key: String,
    pub completion_api_url: String,
    pub completion_model: String,
    pub completion_temperature: f32,
    pub completion_max_tokens: u32,
    pub admin_username: String,
    pub admin_password: String,
    pub max_upload_bytes: usize,
    pub port: u16,
    pub rust_log: String,
}

/// Read-only settings for the completion endpoint, fixed at process start.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionSettings {
    pub api_key: String,
    pub api_url: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            completion_api_key: require_env("GROQ_API_KEY")?,
            completion_api_url: env_or("COMPLETION_API_URL", DEFAULT_COMPLETION_URL),
            completion_model: env_or("COMPLETION_MODEL", DEFAULT_COMPLETION_MODEL),
            completion_temperature: env_or("COMPLETION_TEMPERATURE", "0.3")
                .parse::<f32>()
                .context("COMPLETION_TEMPERATURE must be a number")?,
            completion_max_tokens: env_or("COMPLETION_MAX_TOKENS", "1200")
                .parse::<u32>()
                .context("COMPLETION_MAX_TOKENS must be a positive integer")?,
            admin_username: env_or("ADMIN_USERNAME", "admin"),
            admin_password: env_or("ADMIN_PASSWORD", "password"),
            max_upload_bytes: env_or("MAX_UPLOAD_BYTES", "10485760")
                .parse::<usize>()
                .context("MAX_UPLOAD_BYTES must be a byte count")?,
            port: env_or("PORT", "8080")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: env_or("RUST_LOG", "info"),
        })
    }

    pub fn completion_settings(&self) -> CompletionSettings {
        CompletionSettings {
            api_key: self.completion_api_key.clone(),
            api_url: self.completion_api_url.clone(),
            model: self.completion_model.clone(),
            temperature: self.completion_temperature,
            max_tokens: self.completion_max_tokens,
        }
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

#[cfg(test)]
pub(crate) fn test_config() -> Config {
    Config {
        database_url: "postgres://localhost/ats_test".to_string(),
        completion_api_key: "test-key".to_string(),
        completion_api_url: "http://127.0.0.1:1/v1/chat/completions".to_string(),
        completion_model: DEFAULT_COMPLETION_MODEL.to_string(),
        completion_temperature: 0.3,
        completion_max_tokens: 1200,
        admin_username: "admin".to_string(),
        admin_password: "hunter2".to_string(),
        max_upload_bytes: 1024 * 1024,
        port: 8080,
        rust_log: "debug".to_string(),
    }
}
