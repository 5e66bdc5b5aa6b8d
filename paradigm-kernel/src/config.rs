use serde::{Deserialize, Serialize};

use crate::window::WINDOW_RADIUS;

/// Quiet period after the last keystroke before the typing indicator drops.
pub const DEFAULT_QUIET_PERIOD_MS: u64 = 1000;

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8787";

/// Fully-resolved settings. Layers (files, env, flags) are parsed into
/// [`ConfigLayer`] and folded onto the defaults.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Endpoint the editor posts resolution requests to.
    pub gateway_url: String,
    /// Characters of surrounding document kept on each side of a trigger.
    pub window_radius: usize,
    pub quiet_period_ms: u64,
    /// Address the gateway service listens on.
    pub bind_addr: String,
    /// Plain completion model used by the gateway.
    pub upstream_model: String,
    /// Search-augmented model tried first by the gateway.
    pub upstream_search_model: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            gateway_url: format!("http://{DEFAULT_BIND_ADDR}/complete"),
            window_radius: WINDOW_RADIUS,
            quiet_period_ms: DEFAULT_QUIET_PERIOD_MS,
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            upstream_model: "gpt-4o-mini".to_string(),
            upstream_search_model: "gpt-4o-mini-search-preview".to_string(),
        }
    }
}

/// One configuration source. Every field is optional; absent fields leave
/// the lower layer alone.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigLayer {
    pub gateway_url: Option<String>,
    pub window_radius: Option<usize>,
    pub quiet_period_ms: Option<u64>,
    pub bind_addr: Option<String>,
    pub upstream_model: Option<String>,
    pub upstream_search_model: Option<String>,
}

impl ConfigLayer {
    pub fn is_empty(&self) -> bool {
        self == &ConfigLayer::default()
    }
}

impl Config {
    pub fn apply_layer(&mut self, layer: &ConfigLayer) {
        if let Some(url) = layer.gateway_url.as_ref() {
            self.gateway_url = url.clone();
        }

        if let Some(radius) = layer.window_radius {
            self.window_radius = radius;
        }

        if let Some(quiet) = layer.quiet_period_ms {
            self.quiet_period_ms = quiet;
        }

        if let Some(addr) = layer.bind_addr.as_ref() {
            self.bind_addr = addr.clone();
        }

        if let Some(model) = layer.upstream_model.as_ref() {
            self.upstream_model = model.clone();
        }

        if let Some(model) = layer.upstream_search_model.as_ref() {
            self.upstream_search_model = model.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layer_overrides_only_present_fields() {
        let mut config = Config::default();
        let layer = ConfigLayer {
            gateway_url: Some("http://gateway.internal/complete".to_string()),
            quiet_period_ms: Some(250),
            ..Default::default()
        };

        config.apply_layer(&layer);
        assert_eq!(config.gateway_url, "http://gateway.internal/complete");
        assert_eq!(config.quiet_period_ms, 250);
        assert_eq!(config.window_radius, WINDOW_RADIUS);
    }

    #[test]
    fn test_empty_layer_is_a_noop() {
        let mut config = Config::default();
        let layer = ConfigLayer::default();
        assert!(layer.is_empty());

        config.apply_layer(&layer);
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_layer_parses_from_json() {
        let layer: ConfigLayer =
            serde_json::from_str(r#"{"upstream_model": "gpt-4.1-mini", "window_radius": 42}"#)
                .unwrap();
        assert_eq!(layer.upstream_model.as_deref(), Some("gpt-4.1-mini"));
        assert_eq!(layer.window_radius, Some(42));
    }

    #[test]
    fn test_layer_rejects_unknown_fields() {
        let parsed: Result<ConfigLayer, _> = serde_json::from_str(r#"{"gateway": "typo"}"#);
        assert!(parsed.is_err());
    }
}
