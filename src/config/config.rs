use dotenv::dotenv;
use std::net::IpAddr;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{name} has an invalid value: {value}")]
    InvalidValue { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: Option<String>,
    pub database_ca_file: Option<String>,
    pub server_host: String,
    pub server_port: u16,
    pub trusted_reverse_proxy_ip: IpAddr,
    pub rate_limit_per_second: u64,
    pub rate_limit_burst: u32,
    pub log_config_file: String,
    pub team_id_prefix: String,
    pub email: EmailConfig,
    pub folders: DocumentFolders,
}

#[derive(Debug, Clone)]
pub struct EmailConfig {
    pub enabled: bool,
    pub sender: String,
    pub aws_region: String,
    pub confirmed_template: String,
    pub rejected_template: String,
}

/// Object-storage folder ids that uploaded documents are filed under.
#[derive(Debug, Clone, Default)]
pub struct DocumentFolders {
    pub pastor_letter: Option<String>,
    pub payment_receipt: Option<String>,
    pub player_id_proof: Option<String>,
    pub player_consent: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            database_url: None,
            database_ca_file: None,
            server_host: "127.0.0.1".to_string(),
            server_port: 8080,
            trusted_reverse_proxy_ip: IpAddr::from([127, 0, 0, 1]),
            rate_limit_per_second: 10,
            rate_limit_burst: 5,
            log_config_file: "./log-config.yml".to_string(),
            team_id_prefix: "TEAM".to_string(),
            email: EmailConfig {
                enabled: false,
                sender: "Tournament Desk <tournament@example.org>".to_string(),
                aws_region: "eu-north-1".to_string(),
                confirmed_template: "Registration_Confirmed_Template".to_string(),
                rejected_template: "Registration_Rejected_Template".to_string(),
            },
            folders: DocumentFolders::default(),
        }
    }
}

impl Config {
    pub fn init() -> Result<Config, ConfigError> {
        dotenv().ok();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds a config from any key lookup, starting from the defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Config, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        Ok(Config {
            database_url: var("DATABASE_URL"),
            database_ca_file: var("DATABASE_CA_FILE"),
            server_host: var("SERVER_HOST").unwrap_or(defaults.server_host),
            server_port: parse_or("SERVER_PORT", var("SERVER_PORT"), defaults.server_port)?,
            trusted_reverse_proxy_ip: parse_or(
                "TRUSTED_PROXY_IP",
                var("TRUSTED_PROXY_IP"),
                defaults.trusted_reverse_proxy_ip,
            )?,
            rate_limit_per_second: parse_or(
                "RATE_LIMIT_PER_SECOND",
                var("RATE_LIMIT_PER_SECOND"),
                defaults.rate_limit_per_second,
            )?,
            rate_limit_burst: parse_or(
                "RATE_LIMIT_BURST",
                var("RATE_LIMIT_BURST"),
                defaults.rate_limit_burst,
            )?,
            log_config_file: var("LOG_CONFIG_FILE").unwrap_or(defaults.log_config_file),
            team_id_prefix: var("TEAM_ID_PREFIX").unwrap_or(defaults.team_id_prefix),
            email: EmailConfig {
                enabled: parse_or("EMAIL_ENABLED", var("EMAIL_ENABLED"), defaults.email.enabled)?,
                sender: var("EMAIL_SENDER").unwrap_or(defaults.email.sender),
                aws_region: var("AWS_REGION").unwrap_or(defaults.email.aws_region),
                confirmed_template: var("EMAIL_CONFIRMED_TEMPLATE")
                    .unwrap_or(defaults.email.confirmed_template),
                rejected_template: var("EMAIL_REJECTED_TEMPLATE")
                    .unwrap_or(defaults.email.rejected_template),
            },
            folders: DocumentFolders {
                pastor_letter: var("PASTOR_LETTER_FOLDER_ID"),
                payment_receipt: var("PAYMENT_RECEIPT_FOLDER_ID"),
                player_id_proof: var("PLAYER_ID_PROOF_FOLDER_ID"),
                player_consent: var("PLAYER_CONSENT_FOLDER_ID"),
            },
        })
    }

    pub fn bind_address(&self) -> (String, u16) {
        (self.server_host.clone(), self.server_port)
    }
}

fn parse_or<T: FromStr>(name: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError> {
    match raw {
        Some(value) => value
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::InvalidValue { name, value }),
        None => Ok(default),
    }
}
