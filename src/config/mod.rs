use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

/// Top-level application configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    pub github: GithubConfig,
    pub kintone: KintoneConfig,
}

/// GitHub API configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GithubConfig {
    pub owner: String,

    pub repo: String,

    /// Personal access token with `repo` scope (traffic data needs push access).
    pub token: String,

    #[serde(default = "default_api_base")]
    pub api_base: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

/// kintone app configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct KintoneConfig {
    /// e.g. "subdomain.cybozu.com"
    pub domain: String,

    pub app_id: String,

    pub api_token: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

// ── Defaults ─────────────────────────────────────────────────────────────────

fn default_api_base() -> String {
    "https://api.github.com".to_string()
}
fn default_timeout_secs() -> u64 {
    30
}
fn default_user_agent() -> String {
    "traffic-sync/0.1 (github traffic to kintone sync)".to_string()
}

// ── Loader ───────────────────────────────────────────────────────────────────

impl AppConfig {
    /// Load configuration from file + environment overrides.
    ///
    /// Precedence: `config/default.toml` < `config/local.toml` < environment
    /// (`TRAFFIC__GITHUB__TOKEN`, `TRAFFIC__KINTONE__API_TOKEN`, …).
    pub fn load() -> Result<Self> {
        dotenv::dotenv().ok();

        let cfg = config::Config::builder()
            .add_source(
                config::File::with_name("config/default")
                    .required(false)
                    .format(config::FileFormat::Toml),
            )
            .add_source(
                config::File::with_name("config/local")
                    .required(false)
                    .format(config::FileFormat::Toml),
            )
            .add_source(config::Environment::with_prefix("TRAFFIC").separator("__"))
            .build()?;

        let app_cfg: AppConfig = cfg.try_deserialize()?;
        app_cfg.validate()?;
        Ok(app_cfg)
    }

    /// The kintone partition key for this repository.
    pub fn project(&self) -> String {
        format!("{}/{}", self.github.owner, self.github.repo)
    }

    fn validate(&self) -> Result<()> {
        let required = [
            ("github.owner", &self.github.owner),
            ("github.repo", &self.github.repo),
            ("github.token", &self.github.token),
            ("kintone.domain", &self.kintone.domain),
            ("kintone.app_id", &self.kintone.app_id),
            ("kintone.api_token", &self.kintone.api_token),
        ];
        for (name, value) in required {
            if value.trim().is_empty() {
                bail!("Missing required config value: {}", name);
            }
        }
        Ok(())
    }
}
