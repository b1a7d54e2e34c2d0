//! Site configuration.

use serde::{Deserialize, Serialize};

/// Public site settings used when building absolute URLs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlogConfig {
    /// Base URI of the public site, with a trailing slash.
    #[serde(default = "default_base_uri")]
    pub base_uri: String,
}

impl Default for BlogConfig {
    fn default() -> Self {
        Self {
            base_uri: default_base_uri(),
        }
    }
}

impl BlogConfig {
    /// Base URI guaranteed to end with `/`.
    pub fn normalized_base_uri(&self) -> String {
        if self.base_uri.ends_with('/') {
            self.base_uri.clone()
        } else {
            format!("{}/", self.base_uri)
        }
    }
}

fn default_base_uri() -> String {
    "http://localhost:5000/".to_string()
}
