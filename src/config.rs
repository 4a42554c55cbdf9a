use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::env;

use crate::retriever::RetrieverConfig;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CanvasApiConfig {
    pub base_url: String,
    pub course_id: Option<u64>,
    pub token: Option<String>,
    pub timeout_secs: u64,
}

impl Default for CanvasApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://canvas.instructure.com".to_string(),
            course_id: None,
            token: None,
            timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub log_level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub retrieval: RetrieverConfig,
    pub canvas_api: CanvasApiConfig,
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let retrieval = RetrieverConfig {
            max_depth: env::var("GRAPH_MAX_DEPTH")
                .unwrap_or_else(|_| "1".to_string())
                .parse()
                .unwrap_or(1),
        };

        let defaults = CanvasApiConfig::default();
        let canvas_api = CanvasApiConfig {
            base_url: env::var("CANVAS_BASE_URL").unwrap_or(defaults.base_url),
            course_id: env::var("CANVAS_COURSE_ID")
                .ok()
                .and_then(|id| id.trim().parse().ok()),
            token: env::var("CANVAS_API_TOKEN").ok().filter(|t| !t.is_empty()),
            timeout_secs: env::var("CANVAS_API_TIMEOUT_SECS")
                .unwrap_or_else(|_| defaults.timeout_secs.to_string())
                .parse()
                .unwrap_or(defaults.timeout_secs),
        };

        let logging = LoggingConfig {
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        };

        Ok(Self {
            retrieval,
            canvas_api,
            logging,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scopeguard::guard;
    use std::env;

    fn clean_env() {
        env::remove_var("GRAPH_MAX_DEPTH");
        env::remove_var("CANVAS_BASE_URL");
        env::remove_var("CANVAS_COURSE_ID");
        env::remove_var("CANVAS_API_TOKEN");
        env::remove_var("CANVAS_API_TIMEOUT_SECS");
        env::remove_var("LOG_LEVEL");
    }

    #[test]
    #[serial_test::serial]
    fn test_default_config() {
        clean_env();
        let _guard = guard((), |_| clean_env());

        let config = Config::from_env().unwrap();

        assert_eq!(config.retrieval.max_depth, 1, "wrong default max depth");
        assert_eq!(
            config.canvas_api.base_url, "https://canvas.instructure.com",
            "wrong default base url"
        );
        assert!(config.canvas_api.course_id.is_none());
        assert!(config.canvas_api.token.is_none());
        assert_eq!(config.canvas_api.timeout_secs, 30, "wrong default timeout");
        assert_eq!(config.logging.log_level, "info", "wrong default log level");
    }

    #[test]
    #[serial_test::serial]
    fn test_custom_config() {
        clean_env();
        let _guard = guard((), |_| clean_env());

        env::set_var("GRAPH_MAX_DEPTH", "4");
        env::set_var("CANVAS_BASE_URL", "https://canvas.example.edu");
        env::set_var("CANVAS_COURSE_ID", "1234");
        env::set_var("CANVAS_API_TOKEN", "secret");
        env::set_var("LOG_LEVEL", "debug");

        let config = Config::from_env().unwrap();

        assert_eq!(config.retrieval.max_depth, 4, "max depth mismatch");
        assert_eq!(
            config.canvas_api.base_url, "https://canvas.example.edu",
            "base url mismatch"
        );
        assert_eq!(config.canvas_api.course_id, Some(1234));
        assert_eq!(config.canvas_api.token.as_deref(), Some("secret"));
        assert_eq!(config.logging.log_level, "debug", "log level mismatch");
    }

    #[test]
    #[serial_test::serial]
    fn test_invalid_numbers_fall_back() {
        clean_env();
        let _guard = guard((), |_| clean_env());

        env::set_var("GRAPH_MAX_DEPTH", "deep");
        env::set_var("CANVAS_COURSE_ID", "abc");
        env::set_var("CANVAS_API_TIMEOUT_SECS", "-1");

        let config = Config::from_env().unwrap();

        assert_eq!(config.retrieval.max_depth, 1);
        assert!(config.canvas_api.course_id.is_none());
        assert_eq!(config.canvas_api.timeout_secs, 30);
    }
}
