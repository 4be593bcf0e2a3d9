use crate::queue::DEFAULT_PREFIX;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct NamingConfig {
    /// Prefix for automatically named queues
    #[serde(default = "default_prefix")]
    pub prefix: String,
}

impl Default for NamingConfig {
    fn default() -> Self {
        Self {
            prefix: default_prefix(),
        }
    }
}

fn default_prefix() -> String {
    DEFAULT_PREFIX.to_string()
}
