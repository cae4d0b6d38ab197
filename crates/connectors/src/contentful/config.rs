use crate::error::SourceError;
use std::{collections::HashMap, fmt};

pub const SPACE_ID_VAR: &str = "CTF_SPACE_ID";
pub const DELIVERY_TOKEN_VAR: &str = "CTF_CDA_ACCESS_TOKEN";
pub const PREVIEW_TOKEN_VAR: &str = "CTF_PREW_ACCESS_TOKEN";
pub const PREVIEW_VAR: &str = "CTF_PREVIEW";
pub const ENVIRONMENT_VAR: &str = "CTF_ENVIRONMENT";

pub const DELIVERY_HOST: &str = "cdn.contentful.com";
pub const PREVIEW_HOST: &str = "preview.contentful.com";
pub const DEFAULT_ENVIRONMENT: &str = "master";

/// Connection settings for the Contentful delivery/preview API.
#[derive(Clone)]
pub struct ContentfulConfig {
    pub space_id: String,
    pub access_token: String,
    pub environment: String,
    pub preview: bool,
    base_url: String,
}

impl ContentfulConfig {
    pub fn new(space_id: impl Into<String>, access_token: impl Into<String>, preview: bool) -> Self {
        let host = if preview { PREVIEW_HOST } else { DELIVERY_HOST };
        ContentfulConfig {
            space_id: space_id.into(),
            access_token: access_token.into(),
            environment: DEFAULT_ENVIRONMENT.to_string(),
            preview,
            base_url: format!("https://{host}"),
        }
    }

    /// Reads the configuration from a snapshot of environment variables.
    ///
    /// Any non-empty `CTF_PREVIEW` switches to the preview host and the
    /// preview token. Empty values count as unset.
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, SourceError> {
        let get = |key: &str| {
            vars.get(key)
                .map(|v| v.trim())
                .filter(|v| !v.is_empty())
        };
        let require = |key: &str| {
            get(key)
                .map(str::to_string)
                .ok_or_else(|| SourceError::MissingVariable(key.to_string()))
        };

        let preview = get(PREVIEW_VAR).is_some();
        let space_id = require(SPACE_ID_VAR)?;
        let access_token = if preview {
            require(PREVIEW_TOKEN_VAR)?
        } else {
            require(DELIVERY_TOKEN_VAR)?
        };

        let mut config = ContentfulConfig::new(space_id, access_token, preview);
        if let Some(environment) = get(ENVIRONMENT_VAR) {
            config.environment = environment.to_string();
        }
        Ok(config)
    }

    /// Points the client at another API root (scheme and host, no trailing
    /// slash), e.g. a local proxy.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Result<Self, SourceError> {
        let base_url = base_url.into();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(SourceError::InvalidConfig(format!(
                "base url must start with http:// or https://, got '{base_url}'"
            )));
        }
        self.base_url = base_url.trim_end_matches('/').to_string();
        Ok(self)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn entries_url(&self) -> String {
        format!(
            "{}/spaces/{}/environments/{}/entries",
            self.base_url, self.space_id, self.environment
        )
    }
}

impl fmt::Debug for ContentfulConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContentfulConfig")
            .field("space_id", &self.space_id)
            .field("access_token", &"***")
            .field("environment", &self.environment)
            .field("preview", &self.preview)
            .field("base_url", &self.base_url)
            .finish()
    }
}
