use alloy::primitives::U256;
use alloy::primitives::Address;
use config::{Config, ConfigError, Environment, File, Map};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use crate::adapters::jager_pool::{TxSettings, DEFAULT_GAS_LIMIT, JAGER_POOL_BSC};
use crate::domain::{normalize_address, TokenScale};
use crate::error::{JagerError, Result};

/// Main configuration structure
///
/// The signing key is deliberately absent: it only comes from the
/// environment (see `signing::Wallet::from_env`).
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub contract: ContractConfig,
    pub claimer: ClaimerSettings,
    #[serde(default)]
    pub token: TokenConfig,
    #[serde(default)]
    pub tx: TxConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ContractConfig {
    /// Pool contract address
    #[serde(default = "default_contract_address")]
    pub address: String,
    /// Node JSON-RPC endpoint (HTTP or HTTPS)
    pub rpc_url: String,
}

fn default_contract_address() -> String {
    JAGER_POOL_BSC.to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClaimerSettings {
    /// Account whose pending reward is watched
    pub account: String,
    /// Claim threshold in display units (e.g. 13784 with display_exponent 6 = 13784M)
    #[serde(default)]
    pub threshold: Option<String>,
    /// Claim threshold in raw token units; overrides `threshold`
    #[serde(default)]
    pub threshold_raw: Option<String>,
    /// Seconds between pending reward checks
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
    /// Submit claims; false only reports
    #[serde(default = "default_auto_claim")]
    pub auto_claim: bool,
}

fn default_poll_interval_secs() -> u64 {
    60
}

fn default_auto_claim() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
pub struct TokenConfig {
    /// Reward token decimals
    #[serde(default = "default_decimals")]
    pub decimals: u8,
    /// Powers of ten per display unit on top of `decimals` (6 = "M")
    #[serde(default = "default_display_exponent")]
    pub display_exponent: u8,
}

fn default_decimals() -> u8 {
    18
}

fn default_display_exponent() -> u8 {
    6
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            decimals: default_decimals(),
            display_exponent: default_display_exponent(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TxConfig {
    #[serde(default = "default_gas_limit")]
    pub gas_limit: u64,
    #[serde(default = "default_confirmation_timeout_secs")]
    pub confirmation_timeout_secs: u64,
    #[serde(default = "default_receipt_poll_interval_ms")]
    pub receipt_poll_interval_ms: u64,
}

fn default_gas_limit() -> u64 {
    DEFAULT_GAS_LIMIT
}

fn default_confirmation_timeout_secs() -> u64 {
    120
}

fn default_receipt_poll_interval_ms() -> u64 {
    3000
}

impl Default for TxConfig {
    fn default() -> Self {
        Self {
            gas_limit: default_gas_limit(),
            confirmation_timeout_secs: default_confirmation_timeout_secs(),
            receipt_poll_interval_ms: default_receipt_poll_interval_ms(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

/// `JAGER_*` variables that are not configuration keys
const NON_CONFIG_ENV_VARS: [&str; 3] = ["JAGER_PRIVATE_KEY", "JAGER_ENV", "JAGER_LOG_DIR"];

/// Environment variables eligible as config overrides; the signing key never
/// enters the config map.
fn config_env_vars<I>(vars: I) -> Map<String, String>
where
    I: IntoIterator<Item = (String, String)>,
{
    vars.into_iter()
        .filter(|(name, _)| {
            let upper = name.to_ascii_uppercase();
            upper.starts_with("JAGER_") && !NON_CONFIG_ENV_VARS.contains(&upper.as_str())
        })
        .collect()
}

// `JAGER_CONTRACT__RPC_URL` -> `contract.rpc_url`. Values stay strings: a raw
// threshold parsed eagerly would overflow i64 and land in an f64.
fn env_source_from<I>(vars: I) -> Environment
where
    I: IntoIterator<Item = (String, String)>,
{
    Environment::with_prefix("JAGER")
        .prefix_separator("_")
        .separator("__")
        .try_parsing(false)
        .ignore_empty(true)
        .source(Some(config_env_vars(vars)))
}

fn env_source() -> Environment {
    env_source_from(std::env::vars())
}

impl AppConfig {
    /// Load configuration from files and environment
    pub fn load() -> std::result::Result<Self, ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from a specific directory
    pub fn load_from<P: AsRef<Path>>(config_dir: P) -> std::result::Result<Self, ConfigError> {
        let config_dir = config_dir.as_ref();

        let builder = Config::builder()
            // Start with default values
            .set_default("logging.level", "info")?
            .set_default("claimer.poll_interval_secs", 60)?
            // Load default config file
            .add_source(File::from(config_dir.join("default.toml")).required(false))
            // Load environment-specific config (e.g., config/production.toml)
            .add_source(
                File::from(config_dir.join(
                    std::env::var("JAGER_ENV").unwrap_or_else(|_| "development".to_string()),
                ))
                .required(false),
            )
            // Override with environment variables (JAGER_CONTRACT__RPC_URL, etc.)
            .add_source(env_source());

        builder.build()?.try_deserialize()
    }

    /// Load a single config file, then environment overrides
    pub fn load_file<P: AsRef<Path>>(path: P) -> std::result::Result<Self, ConfigError> {
        Self::load_file_with_env(path, env_source())
    }

    fn load_file_with_env<P: AsRef<Path>>(
        path: P,
        env: Environment,
    ) -> std::result::Result<Self, ConfigError> {
        Config::builder()
            .set_default("logging.level", "info")?
            .add_source(File::from(path.as_ref().to_path_buf()))
            .add_source(env)
            .build()?
            .try_deserialize()
    }

    /// The watched account; the zero address is rejected
    pub fn account(&self) -> Result<Address> {
        let account = normalize_address(&self.claimer.account)?;
        if account == Address::ZERO {
            return Err(JagerError::Validation(
                "claimer.account is the zero address; set the account to watch".to_string(),
            ));
        }
        Ok(account)
    }

    pub fn token_scale(&self) -> Result<TokenScale> {
        TokenScale::new(self.token.decimals, self.token.display_exponent)
    }

    /// Claim threshold in raw units
    ///
    /// `threshold_raw` wins when both are set. The display form is converted
    /// exactly; a value the token cannot represent is rejected.
    pub fn threshold(&self) -> Result<U256> {
        if let Some(raw) = self.claimer.threshold_raw.as_deref() {
            let raw = raw.trim().replace('_', "");
            return U256::from_str(&raw).map_err(|e| {
                JagerError::Validation(format!("Invalid claimer.threshold_raw '{}': {}", raw, e))
            });
        }

        let display = self.claimer.threshold.as_deref().ok_or_else(|| {
            JagerError::Validation(
                "claimer.threshold or claimer.threshold_raw must be set".to_string(),
            )
        })?;
        let display = Decimal::from_str(display.trim()).map_err(|e| {
            JagerError::Validation(format!("Invalid claimer.threshold '{}': {}", display, e))
        })?;

        self.token_scale()?.to_raw(display)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.claimer.poll_interval_secs.max(1))
    }

    pub fn tx_settings(&self) -> TxSettings {
        TxSettings {
            gas_limit: self.tx.gas_limit,
            confirmation_timeout: Duration::from_secs(self.tx.confirmation_timeout_secs),
            receipt_poll_interval: Duration::from_millis(self.tx.receipt_poll_interval_ms.max(100)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::checksum;
    use std::io::Write;

    /// Config file in its own temp directory, removed on drop
    struct TempConfig {
        dir: std::path::PathBuf,
        path: std::path::PathBuf,
    }

    impl TempConfig {
        fn new(name: &str, body: &str) -> Self {
            let dir = std::env::temp_dir().join(format!(
                "jager-claimer-config-{}-{}",
                std::process::id(),
                name
            ));
            std::fs::create_dir_all(&dir).unwrap();
            let path = dir.join("default.toml");
            let mut file = std::fs::File::create(&path).unwrap();
            file.write_all(body.as_bytes()).unwrap();
            Self { dir, path }
        }
    }

    impl Drop for TempConfig {
        fn drop(&mut self) {
            let _ = std::fs::remove_dir_all(&self.dir);
        }
    }

    const MINIMAL: &str = r#"
[contract]
rpc_url = "https://bsc-dataseed.bnbchain.org"

[claimer]
account = "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266"
threshold = "13784"
"#;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn config_with_claimer(claimer: ClaimerSettings) -> AppConfig {
        AppConfig {
            contract: ContractConfig {
                address: default_contract_address(),
                rpc_url: "http://localhost:8545".to_string(),
            },
            claimer,
            token: TokenConfig::default(),
            tx: TxConfig::default(),
            logging: LoggingConfig::default(),
        }
    }

    fn claimer(threshold: Option<&str>, threshold_raw: Option<&str>) -> ClaimerSettings {
        ClaimerSettings {
            account: "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266".to_string(),
            threshold: threshold.map(String::from),
            threshold_raw: threshold_raw.map(String::from),
            poll_interval_secs: 60,
            auto_claim: true,
        }
    }

    #[test]
    fn test_load_file_applies_defaults() {
        let file = TempConfig::new("defaults", MINIMAL);

        let config = AppConfig::load_file_with_env(&file.path, env_source_from(vec![])).unwrap();
        assert_eq!(config.contract.address, JAGER_POOL_BSC);
        assert_eq!(config.claimer.poll_interval_secs, 60);
        assert!(config.claimer.auto_claim);
        assert_eq!(config.token.decimals, 18);
        assert_eq!(config.token.display_exponent, 6);
        assert_eq!(config.tx.gas_limit, 2_000_000);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_env_overrides_file_values() {
        let file = TempConfig::new("env-override", MINIMAL);
        let env = env_source_from(vars(&[
            ("JAGER_CONTRACT__RPC_URL", "https://env.example"),
            ("JAGER_CLAIMER__THRESHOLD_RAW", "115792089237316195423570985008687907853269984665640564039457584007913129639935"),
            ("JAGER_CLAIMER__AUTO_CLAIM", "false"),
            ("OTHER_CONTRACT__RPC_URL", "https://ignored.example"),
        ]));

        let config = AppConfig::load_file_with_env(&file.path, env).unwrap();
        assert_eq!(config.contract.rpc_url, "https://env.example");
        assert!(!config.claimer.auto_claim);
        assert_eq!(config.threshold().unwrap(), U256::MAX);
    }

    #[test]
    fn test_non_config_vars_stay_out_of_the_config_map() {
        let map = config_env_vars(vars(&[
            ("JAGER_PRIVATE_KEY", "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80"),
            ("JAGER_ENV", "production"),
            ("JAGER_LOG_DIR", "/var/log/jager"),
            ("PRIVATE_KEY", "0x01"),
            ("JAGER_LOGGING__LEVEL", "warn"),
        ]));

        assert_eq!(map.len(), 1);
        assert_eq!(map.get("JAGER_LOGGING__LEVEL").map(String::as_str), Some("warn"));
    }

    #[test]
    fn test_zero_account_is_rejected() {
        let mut settings = claimer(Some("1"), None);
        settings.account = "0x0000000000000000000000000000000000000000".to_string();
        let config = config_with_claimer(settings);
        assert!(matches!(config.account(), Err(JagerError::Validation(_))));

        let config = config_with_claimer(claimer(Some("1"), None));
        assert_eq!(
            checksum(&config.account().unwrap()),
            "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266"
        );
    }

    #[test]
    fn test_display_threshold_is_scaled_exactly() {
        let config = config_with_claimer(claimer(Some("13784"), None));
        let expected = U256::from(13784u64) * U256::from(10u64).pow(U256::from(24u64));
        assert_eq!(config.threshold().unwrap(), expected);
    }

    #[test]
    fn test_raw_threshold_wins() {
        let config = config_with_claimer(claimer(Some("13784"), Some("13_784_000_000")));
        assert_eq!(config.threshold().unwrap(), U256::from(13_784_000_000u64));
    }

    #[test]
    fn test_missing_threshold_is_rejected() {
        let config = config_with_claimer(claimer(None, None));
        assert!(matches!(
            config.threshold(),
            Err(JagerError::Validation(_))
        ));
    }

    #[test]
    fn test_garbage_threshold_is_rejected() {
        let config = config_with_claimer(claimer(Some("lots"), None));
        assert!(config.threshold().is_err());

        let config = config_with_claimer(claimer(None, Some("-5")));
        assert!(config.threshold().is_err());
    }

    #[test]
    fn test_poll_interval_never_zero() {
        let mut settings = claimer(Some("1"), None);
        settings.poll_interval_secs = 0;
        let config = config_with_claimer(settings);
        assert_eq!(config.poll_interval(), Duration::from_secs(1));
    }
}
