use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub chat: ChatConfig,
    pub session: SessionConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Base URL for the external search-link fallback appended to
    /// clarification and procedure answers.
    pub search_base_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    pub max_sessions: usize,
}

impl Settings {
    /// Load settings from environment variables
    pub fn from_env() -> Result<Self> {
        let search_base_url = std::env::var("SEARCH_BASE_URL")
            .unwrap_or_else(|_| "https://www.google.com/search".to_string());

        let max_sessions = std::env::var("MAX_SESSIONS")
            .unwrap_or_else(|_| "64".to_string())
            .parse()
            .map_err(|_| Error::Config("Invalid MAX_SESSIONS value".to_string()))?;

        Ok(Settings {
            chat: ChatConfig { search_base_url },
            session: SessionConfig { max_sessions },
        })
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if !self.chat.search_base_url.starts_with("http://")
            && !self.chat.search_base_url.starts_with("https://")
        {
            return Err(Error::Config(
                "SEARCH_BASE_URL must be an http(s) URL".to_string(),
            ));
        }

        if self.session.max_sessions == 0 {
            return Err(Error::Config("MAX_SESSIONS must be non-zero".to_string()));
        }

        Ok(())
    }
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            chat: ChatConfig {
                search_base_url: "https://www.google.com/search".to_string(),
            },
            session: SessionConfig { max_sessions: 64 },
        }
    }
}
