// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Settings management
//!
//! Handles loading and saving settings from ~/.moat-tutor/settings.json.
//! The API key is taken from the environment first so it never has to be
//! written to disk.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::Result;

/// Environment variable consulted for the backend API key
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Main settings structure, stored in ~/.moat-tutor/settings.json
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    /// Model backend configuration
    #[serde(default)]
    pub backend: BackendConfig,

    /// Default settings for new requests
    #[serde(default)]
    pub defaults: DefaultsConfig,
}

/// Configuration for the model backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Chat completions endpoint URL
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Model identifier
    #[serde(default = "default_model")]
    pub model: String,

    /// API key; the environment variable takes precedence
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Maximum tokens per response
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
            api_key: None,
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
        }
    }
}

/// Default settings for new requests
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DefaultsConfig {
    /// Expertise level applied when a request does not specify one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expertise_level: Option<String>,
}

fn default_base_url() -> String {
    "https://api.openai.com/v1/chat/completions".to_string()
}

fn default_model() -> String {
    "gpt-5-nano".to_string()
}

fn default_max_tokens() -> u32 {
    4096
}

fn default_temperature() -> f32 {
    0.7
}

impl Settings {
    /// Application home directory (~/.moat-tutor)
    pub fn home() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".moat-tutor")
    }

    /// Path to the settings file
    pub fn settings_path() -> PathBuf {
        Self::home().join("settings.json")
    }

    /// Ensure the application directories exist
    pub fn ensure_directories() -> Result<()> {
        std::fs::create_dir_all(Self::home())?;
        Ok(())
    }

    /// Load settings from the default path, falling back to defaults when
    /// no file exists yet
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::settings_path())
    }

    /// Load settings from an explicit path
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            Ok(serde_json::from_str(&content)?)
        } else {
            Ok(Self::default())
        }
    }

    /// Save settings to the default path
    pub fn save(&self) -> Result<()> {
        Self::ensure_directories()?;
        self.save_to(&Self::settings_path())
    }

    /// Save settings to an explicit path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Resolve the API key: environment first, settings file second
    pub fn api_key(&self) -> Option<String> {
        std::env::var(API_KEY_ENV)
            .ok()
            .filter(|key| !key.is_empty())
            .or_else(|| self.backend.api_key.clone())
    }
}
