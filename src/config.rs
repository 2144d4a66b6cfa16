use std::fmt;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.mercadopago.com";
pub const DEFAULT_PAYER_EMAIL: &str = "user@example.com";

/// Immutable connection settings for the Mercado Pago client.
///
/// Built once at startup and shared by every request.
#[derive(Clone)]
pub struct GatewayConfig {
    pub base_url: String,
    pub access_token: String,
    pub timeout: Duration,
}

impl GatewayConfig {
    pub fn new(base_url: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            access_token: access_token.into(),
            timeout: Duration::from_secs(30),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("base_url", &self.base_url)
            .field("access_token", &"[REDACTED]")
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[derive(Clone)]
pub struct Config {
    pub port: u16,
    pub gateway: GatewayConfig,
    /// Deadline for the whole validate → tokenize → charge pipeline.
    pub request_timeout: Duration,
    pub default_payer_email: String,
    /// Enables `x-signature` verification on webhooks when set.
    pub webhook_secret: Option<String>,
    pub rate_limit_per_second: u64,
    pub rate_limit_burst: u32,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("port", &self.port)
            .field("gateway", &self.gateway)
            .field("request_timeout", &self.request_timeout)
            .field("default_payer_email", &self.default_payer_email)
            .field(
                "webhook_secret",
                &self.webhook_secret.as_ref().map(|_| "[REDACTED]"),
            )
            .field("rate_limit_per_second", &self.rate_limit_per_second)
            .field("rate_limit_burst", &self.rate_limit_burst)
            .finish()
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let access_token = std::env::var("MERCADOPAGO_ACCESS_TOKEN")
            .map_err(|_| {
                anyhow::anyhow!("MERCADOPAGO_ACCESS_TOKEN environment variable is required")
            })
            .and_then(|token| {
                if token.trim().is_empty() {
                    anyhow::bail!("MERCADOPAGO_ACCESS_TOKEN cannot be empty");
                }
                Ok(token)
            })?;

        let base_url = std::env::var("MERCADOPAGO_BASE_URL")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let base_url = validate_base_url(&base_url)?;

        let upstream_timeout = parse_secs("UPSTREAM_TIMEOUT_SECS", 30)?;

        let config = Self {
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number between 1-65535"))?,
            gateway: GatewayConfig::new(base_url, access_token).with_timeout(upstream_timeout),
            request_timeout: parse_secs("REQUEST_TIMEOUT_SECS", 65)?,
            default_payer_email: std::env::var("DEFAULT_PAYER_EMAIL")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_PAYER_EMAIL.to_string()),
            webhook_secret: std::env::var("MERCADOPAGO_WEBHOOK_SECRET")
                .ok()
                .filter(|s| !s.trim().is_empty()),
            rate_limit_per_second: parse_number("RATE_LIMIT_PER_SECOND", 10)?,
            rate_limit_burst: parse_number("RATE_LIMIT_BURST", 20)?,
        };

        // Log successful configuration load (without sensitive values)
        tracing::debug!("Mercado Pago base URL: {}", config.gateway.base_url);
        tracing::debug!("Upstream timeout: {:?}", config.gateway.timeout);
        tracing::debug!("Server Port: {}", config.port);
        if config.webhook_secret.is_none() {
            tracing::warn!(
                "MERCADOPAGO_WEBHOOK_SECRET not set, webhook signatures will not be verified"
            );
        }

        Ok(config)
    }
}

fn validate_base_url(raw: &str) -> anyhow::Result<String> {
    let parsed = url::Url::parse(raw)
        .map_err(|e| anyhow::anyhow!("MERCADOPAGO_BASE_URL is not a valid URL: {}", e))?;
    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        anyhow::bail!("MERCADOPAGO_BASE_URL must start with http:// or https://");
    }
    Ok(raw.trim_end_matches('/').to_string())
}

fn parse_secs(key: &str, default: u64) -> anyhow::Result<Duration> {
    let secs: u64 = parse_number(key, default)?;
    if secs == 0 {
        anyhow::bail!("{} must be at least 1", key);
    }
    Ok(Duration::from_secs(secs))
}

fn parse_number<T: std::str::FromStr>(key: &str, default: T) -> anyhow::Result<T> {
    match std::env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map_err(|_| anyhow::anyhow!("{} must be a positive number", key)),
        _ => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_validation() {
        assert_eq!(
            validate_base_url("https://api.mercadopago.com/").unwrap(),
            "https://api.mercadopago.com"
        );
        assert!(validate_base_url("ftp://api.mercadopago.com").is_err());
        assert!(validate_base_url("not a url").is_err());
    }

    #[test]
    fn test_gateway_config_debug_redacts_token() {
        let cfg = GatewayConfig::new("http://localhost:1234/", "APP_USR-secret");
        let rendered = format!("{:?}", cfg);
        assert!(!rendered.contains("APP_USR-secret"));
        assert_eq!(cfg.base_url, "http://localhost:1234");
        assert_eq!(cfg.timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_config_debug_redacts_secrets() {
        let cfg = Config {
            port: 8080,
            gateway: GatewayConfig::new("http://localhost:1234", "APP_USR-secret"),
            request_timeout: Duration::from_secs(65),
            default_payer_email: "user@example.com".to_string(),
            webhook_secret: Some("whsec-top-secret".to_string()),
            rate_limit_per_second: 10,
            rate_limit_burst: 20,
        };
        let rendered = format!("{:?}", cfg);
        assert!(!rendered.contains("whsec-top-secret"));
        assert!(!rendered.contains("APP_USR-secret"));
        assert!(rendered.contains("[REDACTED]"));
        assert!(rendered.contains("user@example.com"));
    }
}
