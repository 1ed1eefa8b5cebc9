use crate::core::rate::CurrencyPair;
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use std::{fs, path::PathBuf};
use tracing::debug;

pub const DEFAULT_YAHOO_URL: &str = "https://query1.finance.yahoo.com";
pub const DEFAULT_EXCHANGE_RATE_URL: &str = "https://api.exchangerate-api.com";
pub const DEFAULT_PORT: u16 = 10000;
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// A ticker shown on the dashboard under a fixed display name.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Holding {
    pub ticker: String,
    pub name: String,
}

impl Holding {
    pub fn new(ticker: &str, name: &str) -> Self {
        Holding {
            ticker: ticker.to_string(),
            name: name.to_string(),
        }
    }
}

/// Fixed composition of the dashboard: three ticker groups and the
/// currency pairs to quote.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct PortfolioConfig {
    pub korean_stocks: Vec<Holding>,
    pub us_stocks: Vec<Holding>,
    pub chinese_stocks: Vec<Holding>,
    pub exchange_rates: Vec<CurrencyPair>,
}

impl Default for PortfolioConfig {
    fn default() -> Self {
        PortfolioConfig {
            korean_stocks: vec![
                Holding::new("005930.KS", "Samsung"),
                Holding::new("000660.KS", "SK Hynix"),
            ],
            us_stocks: vec![
                Holding::new("AAPL", "Apple"),
                Holding::new("GOOGL", "Google"),
                Holding::new("TSLA", "Tesla"),
            ],
            chinese_stocks: vec![],
            exchange_rates: vec![
                CurrencyPair::new("USD", "KRW"),
                CurrencyPair::new("CNY", "KRW"),
                CurrencyPair::new("USD", "CNY"),
            ],
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct YahooProviderConfig {
    pub base_url: String,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ExchangeRateProviderConfig {
    pub base_url: String,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ProvidersConfig {
    pub yahoo: Option<YahooProviderConfig>,
    pub exchange_rate: Option<ExchangeRateProviderConfig>,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        ProvidersConfig {
            yahoo: Some(YahooProviderConfig {
                base_url: DEFAULT_YAHOO_URL.to_string(),
            }),
            exchange_rate: Some(ExchangeRateProviderConfig {
                base_url: DEFAULT_EXCHANGE_RATE_URL.to_string(),
            }),
        }
    }
}

impl ProvidersConfig {
    pub fn yahoo_base_url(&self) -> &str {
        self.yahoo
            .as_ref()
            .map_or(DEFAULT_YAHOO_URL, |p| &p.base_url)
    }

    pub fn exchange_rate_base_url(&self) -> &str {
        self.exchange_rate
            .as_ref()
            .map_or(DEFAULT_EXCHANGE_RATE_URL, |p| &p.base_url)
    }
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub portfolio: PortfolioConfig,
    #[serde(default)]
    pub providers: ProvidersConfig,
    /// Applied to every upstream request.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    pub port: Option<u16>,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            portfolio: PortfolioConfig::default(),
            providers: ProvidersConfig::default(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            port: None,
        }
    }
}

impl AppConfig {
    /// Loads the config from `path` when given, otherwise from the default
    /// location. Only the default location is allowed to be missing.
    pub fn resolve(path: Option<&str>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from_path(path),
            None => Self::load(),
        }
    }

    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        if !config_path.exists() {
            debug!(
                "No config file at {}, using built-in defaults",
                config_path.display()
            );
            return Ok(Self::default());
        }
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("dev", "myfolio", "myfolio")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Picks the listening port: explicit flag, then the `PORT` environment
    /// value, then the config file, then 10000.
    pub fn listen_port(&self, flag: Option<u16>, env_port: Option<String>) -> Result<u16> {
        if let Some(port) = flag {
            return Ok(port);
        }
        if let Some(raw) = env_port {
            return raw
                .trim()
                .parse()
                .with_context(|| format!("Invalid PORT value: {raw}"));
        }
        Ok(self.port.unwrap_or(DEFAULT_PORT))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_portfolio_composition() {
        let config = AppConfig::default();
        let portfolio = &config.portfolio;

        let korean: Vec<_> = portfolio.korean_stocks.iter().map(|h| h.ticker.as_str()).collect();
        assert_eq!(korean, vec!["005930.KS", "000660.KS"]);
        let us: Vec<_> = portfolio.us_stocks.iter().map(|h| h.name.as_str()).collect();
        assert_eq!(us, vec!["Apple", "Google", "Tesla"]);
        assert!(portfolio.chinese_stocks.is_empty());

        let labels: Vec<_> = portfolio.exchange_rates.iter().map(|p| p.label()).collect();
        assert_eq!(labels, vec!["USD_KRW", "CNY_KRW", "USD_CNY"]);

        assert_eq!(config.timeout(), Duration::from_secs(10));
        assert_eq!(config.providers.yahoo_base_url(), DEFAULT_YAHOO_URL);
        assert_eq!(
            config.providers.exchange_rate_base_url(),
            DEFAULT_EXCHANGE_RATE_URL
        );
    }

    #[test]
    fn test_config_deserialization() {
        let yaml_str = r#"
portfolio:
  us_stocks:
    - ticker: "MSFT"
      name: "Microsoft"
  chinese_stocks:
    - ticker: "0700.HK"
      name: "Tencent"
providers:
  yahoo:
    base_url: "http://example.com/yahoo"
  exchange_rate:
    base_url: "http://example.com/fx"
timeout_secs: 3
port: 8080
"#;

        let config: AppConfig = serde_yaml::from_str(yaml_str).expect("Failed to deserialize");
        assert_eq!(config.portfolio.us_stocks, vec![Holding::new("MSFT", "Microsoft")]);
        assert_eq!(
            config.portfolio.chinese_stocks,
            vec![Holding::new("0700.HK", "Tencent")]
        );
        // Groups left out keep their defaults
        assert_eq!(config.portfolio.korean_stocks.len(), 2);
        assert_eq!(config.portfolio.exchange_rates.len(), 3);

        assert_eq!(config.providers.yahoo_base_url(), "http://example.com/yahoo");
        assert_eq!(
            config.providers.exchange_rate_base_url(),
            "http://example.com/fx"
        );
        assert_eq!(config.timeout(), Duration::from_secs(3));
        assert_eq!(config.port, Some(8080));
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: AppConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_listen_port_precedence() {
        let mut config = AppConfig::default();
        assert_eq!(config.listen_port(None, None).unwrap(), 10000);

        config.port = Some(9000);
        assert_eq!(config.listen_port(None, None).unwrap(), 9000);
        assert_eq!(
            config.listen_port(None, Some("8081".to_string())).unwrap(),
            8081
        );
        assert_eq!(
            config
                .listen_port(Some(7000), Some("8081".to_string()))
                .unwrap(),
            7000
        );
    }

    #[test]
    fn test_listen_port_rejects_garbage() {
        let config = AppConfig::default();
        let err = config
            .listen_port(None, Some("not-a-port".to_string()))
            .unwrap_err();
        assert!(err.to_string().contains("Invalid PORT value: not-a-port"));
    }

    #[test]
    fn test_load_from_missing_path_fails() {
        let result = AppConfig::resolve(Some("/definitely/not/here/config.yaml"));
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Failed to read config file")
        );
    }

    #[test]
    fn test_load_from_path() -> Result<()> {
        let file = tempfile::NamedTempFile::new()?;
        fs::write(file.path(), "timeout_secs: 5\n")?;
        let config = AppConfig::load_from_path(file.path())?;
        assert_eq!(config.timeout_secs, 5);
        assert_eq!(config.portfolio, PortfolioConfig::default());
        Ok(())
    }
}
