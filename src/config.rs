use crate::errors::ConfigError;
use std::env;

pub const DEFAULT_API_BASE: &str = "https://www.googleapis.com/youtube/v3";
pub const DEFAULT_CONCURRENCY: usize = 8;
pub const DEFAULT_PORT: u16 = 8080;

const DEFAULT_CHANNEL_IDS: [&str; 5] = [
    "UCnz-ZXXER4jOvuED5trXfEA",
    "UCLLw7jmFsvfIVaUFsLs8mlQ",
    "UCVgHeVqf7aIlqXQtB83v4sw",
    "UCv9bWHC0DIn-Xb7ALNoOGWQ",
    "UCiT9RITQ9PW6BhXK0y2jaeg",
];

/// Settings for the YouTube Data API client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub api_key: String,
    pub base_url: String,
    /// Upper bound on in-flight video detail requests per playlist.
    pub concurrency: usize,
}

impl ApiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_API_BASE.to_string(),
            concurrency: DEFAULT_CONCURRENCY,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub port: u16,
    pub channel_ids: Vec<String>,
    pub api: ApiConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let api_key = lookup("YOUTUBE_API_KEY")
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .ok_or(ConfigError::Missing("YOUTUBE_API_KEY"))?;

        let base_url = lookup("YOUTUBE_API_BASE")
            .map(|value| value.trim().trim_end_matches('/').to_string())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string());

        let concurrency = match lookup("YOUTUBE_FETCH_CONCURRENCY") {
            Some(value) => match value.trim().parse::<usize>() {
                Ok(limit) if limit > 0 => limit,
                _ => {
                    return Err(ConfigError::Invalid {
                        name: "YOUTUBE_FETCH_CONCURRENCY",
                        value,
                    });
                }
            },
            None => DEFAULT_CONCURRENCY,
        };

        let channel_ids = match lookup("YOUTUBE_CHANNEL_IDS") {
            Some(value) => parse_channel_ids(&value),
            None => DEFAULT_CHANNEL_IDS.iter().map(|id| id.to_string()).collect(),
        };
        if channel_ids.is_empty() {
            return Err(ConfigError::Missing("YOUTUBE_CHANNEL_IDS"));
        }

        let port = lookup("PORT")
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(DEFAULT_PORT);

        Ok(Self {
            port,
            channel_ids,
            api: ApiConfig {
                api_key,
                base_url,
                concurrency,
            },
        })
    }
}

fn parse_channel_ids(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .collect()
}
