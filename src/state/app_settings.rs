use cricket_api::client::DEFAULT_BASE_URL;
use log::LevelFilter;
use std::time::Duration;

const DEFAULT_POLL_SECS: u64 = 5;
const DEFAULT_TIMEOUT_SECS: u64 = 15;

#[derive(Debug, Clone)]
pub struct AppSettings {
    pub full_screen: bool,
    pub log_level: Option<LevelFilter>,
    pub api_base_url: String,
    /// How often the watched innings' live status is re-fetched.
    pub poll_interval: Duration,
    pub request_timeout: Duration,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            full_screen: false,
            log_level: None,
            api_base_url: DEFAULT_BASE_URL.to_string(),
            poll_interval: Duration::from_secs(DEFAULT_POLL_SECS),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl AppSettings {
    /// Defaults, overridden by `CREASE_*` environment variables.
    pub fn load() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut settings = Self::default();
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        if let Some(url) = get("CREASE_API_URL") {
            settings.api_base_url = url;
        }
        if let Some(secs) = get("CREASE_POLL_SECS").and_then(|v| v.parse::<u64>().ok())
            && secs > 0
        {
            settings.poll_interval = Duration::from_secs(secs);
        }
        if let Some(secs) = get("CREASE_TIMEOUT_SECS").and_then(|v| v.parse::<u64>().ok())
            && secs > 0
        {
            settings.request_timeout = Duration::from_secs(secs);
        }
        settings.log_level = get("CREASE_LOG").and_then(|v| v.parse::<LevelFilter>().ok());
        settings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings_from(pairs: &[(&str, &str)]) -> AppSettings {
        let env: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        AppSettings::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn defaults_point_at_the_hosted_api() {
        let settings = settings_from(&[]);
        assert_eq!(settings.api_base_url, DEFAULT_BASE_URL);
        assert_eq!(settings.poll_interval, Duration::from_secs(5));
        assert_eq!(settings.log_level, None);
    }

    #[test]
    fn environment_overrides_are_applied() {
        let settings = settings_from(&[
            ("CREASE_API_URL", "http://localhost:4000/api"),
            ("CREASE_POLL_SECS", "2"),
            ("CREASE_TIMEOUT_SECS", "30"),
            ("CREASE_LOG", "debug"),
        ]);
        assert_eq!(settings.api_base_url, "http://localhost:4000/api");
        assert_eq!(settings.poll_interval, Duration::from_secs(2));
        assert_eq!(settings.request_timeout, Duration::from_secs(30));
        assert_eq!(settings.log_level, Some(LevelFilter::Debug));
    }

    #[test]
    fn bad_values_fall_back_to_defaults() {
        let settings = settings_from(&[
            ("CREASE_API_URL", "   "),
            ("CREASE_POLL_SECS", "0"),
            ("CREASE_LOG", "loud"),
        ]);
        assert_eq!(settings.api_base_url, DEFAULT_BASE_URL);
        assert_eq!(settings.poll_interval, Duration::from_secs(5));
        assert_eq!(settings.log_level, None);
    }
}
