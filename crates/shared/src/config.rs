//! Application configuration management.

use rust_decimal::Decimal;
use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Lending business rule configuration.
    #[serde(default)]
    pub lending: LendingConfig,
    /// Maintenance sweeper configuration.
    #[serde(default)]
    pub sweeper: SweeperConfig,
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

/// How a loan decides it has been paid off after an installment payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletionRule {
    /// Paid off once every installment is paid.
    #[default]
    AllPaid,
    /// Paid off once all but one installment are paid (legacy reading).
    OneBeforeLast,
}

/// Lending business rule configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LendingConfig {
    /// IANA name of the calendar zone used for due dates.
    #[serde(default = "default_timezone")]
    pub timezone: String,
    /// Day of month every installment falls due.
    #[serde(default = "default_due_day")]
    pub due_day: u32,
    /// Flat late fee charged per late day.
    #[serde(default = "default_late_fee_per_day")]
    pub late_fee_per_day: Decimal,
    /// Share of the credit limit usable by `Warning` tier borrowers, in percent.
    #[serde(default = "default_warning_limit_percent")]
    pub warning_limit_percent: Decimal,
    /// Loan completion rule.
    #[serde(default)]
    pub completion_rule: CompletionRule,
}

fn default_timezone() -> String {
    "Asia/Jakarta".to_string()
}

fn default_due_day() -> u32 {
    25
}

fn default_late_fee_per_day() -> Decimal {
    Decimal::from(5000)
}

fn default_warning_limit_percent() -> Decimal {
    Decimal::from(80)
}

impl Default for LendingConfig {
    fn default() -> Self {
        Self {
            timezone: default_timezone(),
            due_day: default_due_day(),
            late_fee_per_day: default_late_fee_per_day(),
            warning_limit_percent: default_warning_limit_percent(),
            completion_rule: CompletionRule::default(),
        }
    }
}

/// Maintenance sweeper configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct SweeperConfig {
    /// Seconds between two expired-voucher purges.
    #[serde(default = "default_sweep_interval")]
    pub interval_secs: u64,
}

fn default_sweep_interval() -> u64 {
    3600 // 1 hour
}

impl Default for SweeperConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_sweep_interval(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("TENOR").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_lending_defaults() {
        let lending = LendingConfig::default();
        assert_eq!(lending.timezone, "Asia/Jakarta");
        assert_eq!(lending.due_day, 25);
        assert_eq!(lending.late_fee_per_day, dec!(5000));
        assert_eq!(lending.warning_limit_percent, dec!(80));
        assert_eq!(lending.completion_rule, CompletionRule::AllPaid);
    }

    #[test]
    fn test_load_from_environment() {
        temp_env::with_vars(
            [
                ("TENOR__DATABASE__URL", Some("postgres://localhost/tenor_test")),
                ("TENOR__LENDING__DUE_DAY", Some("20")),
                ("TENOR__LENDING__COMPLETION_RULE", Some("one_before_last")),
                ("RUN_MODE", Some("test-nonexistent")),
            ],
            || {
                let config = AppConfig::load().expect("config should load");
                assert_eq!(config.database.url, "postgres://localhost/tenor_test");
                assert_eq!(config.database.max_connections, 10);
                assert_eq!(config.lending.due_day, 20);
                assert_eq!(
                    config.lending.completion_rule,
                    CompletionRule::OneBeforeLast
                );
                assert_eq!(config.lending.late_fee_per_day, dec!(5000));
                assert_eq!(config.sweeper.interval_secs, 3600);
            },
        );
    }

    #[test]
    fn test_load_requires_database_url() {
        temp_env::with_vars(
            [
                ("TENOR__DATABASE__URL", None::<&str>),
                ("RUN_MODE", Some("test-nonexistent")),
            ],
            || {
                assert!(AppConfig::load().is_err());
            },
        );
    }
}
