//! Widget Configuration
//!
//! There is no CLI or environment lookup: the widget is configured by a typed
//! struct whose fields all have defaults, so a partial JSON document is enough
//! to override one setting.

use serde::{Deserialize, Serialize};

use crate::map::MapConfig;

/// Text appended as an error-marked bot message when a chat request fails
pub const DEFAULT_APOLOGY: &str =
    "Lo siento, hubo un error al procesar tu solicitud. Por favor, intenta de nuevo.";

/// Yes/no prompt shown before the transcript is cleared
pub const DEFAULT_CLEAR_PROMPT: &str = "¿Estás seguro de que quieres borrar todo el historial?";

/// Top-level widget configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GuideConfig {
    /// Base URL of the chat backend (`/chat` is appended)
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Key of the persisted transcript entry
    #[serde(default = "default_storage_key")]
    pub storage_key: String,

    /// Confirmation prompt for clearing history
    #[serde(default = "default_clear_prompt")]
    pub clear_prompt: String,

    /// Text of the error-marked bot message
    #[serde(default = "default_apology")]
    pub apology: String,

    /// Map display settings
    #[serde(default)]
    pub map: MapConfig,
}

fn default_api_base_url() -> String { "http://localhost:8000".into() }
fn default_storage_key() -> String { "chatHistory".into() }
fn default_clear_prompt() -> String { DEFAULT_CLEAR_PROMPT.into() }
fn default_apology() -> String { DEFAULT_APOLOGY.into() }

impl Default for GuideConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            storage_key: default_storage_key(),
            clear_prompt: default_clear_prompt(),
            apology: default_apology(),
            map: MapConfig::default(),
        }
    }
}

impl GuideConfig {
    /// Full URL of the chat endpoint
    pub fn chat_endpoint(&self) -> String {
        format!("{}/chat", self.api_base_url.trim_end_matches('/'))
    }
}
