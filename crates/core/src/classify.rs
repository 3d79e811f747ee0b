//! Request classification.
//!
//! Rules are evaluated in order and the first match wins:
//!
//! 1. **Shell**: same origin as the application and the path matches a
//!    registry entry.
//! 2. **RemoteSearch**: host is the cocktail API host and the path contains
//!    the search endpoint segment.
//! 3. **Unmanaged**: everything else; left to default network handling.

use crate::assets::{AssetRegistry, MatchMode};
use crate::config::AppConfig;
use crate::{Error, InterceptedRequest};
use serde::{Deserialize, Serialize};
use url::{Origin, Url};

/// Fulfillment strategy chosen for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Cache-only: served from the store, never from the network.
    Shell,
    /// Network-first with the static fallback payload.
    RemoteSearch,
    /// Not handled; passes through to the network untouched.
    Unmanaged,
}

impl Strategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::Shell => "shell",
            Strategy::RemoteSearch => "remote_search",
            Strategy::Unmanaged => "unmanaged",
        }
    }
}

/// Pure request classifier.
#[derive(Debug, Clone)]
pub struct Classifier {
    app_origin: Origin,
    registry: AssetRegistry,
    api_host: String,
    search_segment: String,
    match_mode: MatchMode,
}

impl Classifier {
    pub fn new(
        app_origin: &Url, registry: AssetRegistry, api_host: impl Into<String>, search_segment: impl Into<String>,
        match_mode: MatchMode,
    ) -> Self {
        Self {
            app_origin: app_origin.origin(),
            registry,
            api_host: api_host.into().to_ascii_lowercase(),
            search_segment: search_segment.into(),
            match_mode,
        }
    }

    /// Build a classifier from loaded configuration.
    pub fn from_config(config: &AppConfig) -> Result<Self, Error> {
        let origin = config.app_origin_url().map_err(|e| Error::Config(e.to_string()))?;
        Ok(Self::new(
            &origin,
            config.registry(),
            config.api_host.clone(),
            config.search_segment.clone(),
            config.match_mode,
        ))
    }

    pub fn registry(&self) -> &AssetRegistry {
        &self.registry
    }

    /// Decide which strategy applies to `request`.
    pub fn classify(&self, request: &InterceptedRequest) -> Strategy {
        if request.origin() == self.app_origin && self.registry.find_match(request.path(), self.match_mode).is_some() {
            return Strategy::Shell;
        }

        if request.host().as_deref() == Some(self.api_host.as_str()) && request.path().contains(&self.search_segment)
        {
            return Strategy::RemoteSearch;
        }

        Strategy::Unmanaged
    }
}
