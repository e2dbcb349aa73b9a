use url::Url;

use crate::error::ConfigError;

/// Validate an HTTP/HTTPS URL, used for the probe target and webhook endpoints.
pub fn validate_http_endpoint(field: &'static str, target: &str) -> Result<Url, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidUrl {
        field,
        value: target.to_string(),
        reason,
    };

    if target.trim().is_empty() {
        return Err(invalid("URL cannot be empty".to_string()));
    }

    match Url::parse(target.trim()) {
        Ok(url) => {
            let scheme = url.scheme();
            if scheme != "http" && scheme != "https" {
                return Err(invalid(format!("invalid scheme '{scheme}', must be http or https")));
            }

            if url.host_str().is_none() {
                return Err(invalid("URL must have a valid host".to_string()));
            }

            Ok(url)
        }
        Err(e) => {
            // If it fails to parse, check if it's missing a scheme
            if !target.contains("://") {
                Err(invalid("URL must include scheme (http:// or https://)".to_string()))
            } else {
                Err(invalid(format!("invalid URL: {e}")))
            }
        }
    }
}
