use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::core::DEFAULT_MAX_HOPS;

/// 默认配置文件名（不存在时忽略）
pub const DEFAULT_CONFIG_FILE: &str = "equilibrium-spy.toml";
/// 环境变量前缀，例如 EQSPY_OUTPUT__DATA_DIR
pub const ENV_PREFIX: &str = "EQSPY";

// 默认监控的资产（CoinGecko ID）
pub mod default_assets {
    pub const BITCOIN: &str = "bitcoin";
    pub const ETHEREUM: &str = "ethereum";
    pub const BINANCECOIN: &str = "binancecoin";
    pub const CARDANO: &str = "cardano";
    pub const SOLANA: &str = "solana";
    pub const RIPPLE: &str = "ripple";

    pub const ALL: [&str; 6] = [BITCOIN, ETHEREUM, BINANCECOIN, CARDANO, SOLANA, RIPPLE];
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub quote: QuoteConfig,
    pub scanner: ScannerConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteConfig {
    pub api_url: String,
    pub vs_currency: String,
    pub assets: Vec<String>,
    pub timeout_seconds: Option<u64>,
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScannerConfig {
    pub max_hops: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub data_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            quote: QuoteConfig {
                api_url: "https://api.coingecko.com/api/v3".to_string(),
                vs_currency: "usd".to_string(),
                assets: default_assets::ALL.iter().map(|id| id.to_string()).collect(),
                timeout_seconds: None,
                api_key: None,
            },
            scanner: ScannerConfig {
                max_hops: DEFAULT_MAX_HOPS,
            },
            output: OutputConfig {
                data_dir: PathBuf::from("data"),
            },
        }
    }
}

impl Config {
    /// 按 默认值 -> 配置文件 -> 环境变量 的顺序加载配置
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let defaults = Self::default();

        let mut builder = ::config::Config::builder()
            .set_default("quote.api_url", defaults.quote.api_url.clone())?
            .set_default("quote.vs_currency", defaults.quote.vs_currency.clone())?
            .set_default("quote.assets", defaults.quote.assets.clone())?
            .set_default("scanner.max_hops", defaults.scanner.max_hops as i64)?
            .set_default(
                "output.data_dir",
                defaults.output.data_dir.to_string_lossy().to_string(),
            )?;

        builder = match path {
            // 显式指定的配置文件必须存在
            Some(path) => builder.add_source(::config::File::from(path).required(true)),
            None => builder.add_source(::config::File::with_name(DEFAULT_CONFIG_FILE).required(false)),
        };

        // 前缀与键之间用单下划线，层级之间用双下划线；资产列表以逗号分隔
        let environment = ::config::Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .list_separator(",")
            .with_list_parse_key("quote.assets")
            .try_parsing(true);

        let settings = builder
            .add_source(environment)
            .build()
            .context("构建配置失败")?;

        let mut config: Config = settings.try_deserialize().context("解析配置失败")?;

        if config.quote.api_key.is_none() {
            config.quote.api_key = std::env::var("COINGECKO_API_KEY").ok();
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let mut distinct: Vec<&String> = Vec::new();
        for asset in &self.quote.assets {
            if !distinct.contains(&asset) {
                distinct.push(asset);
            }
        }
        if distinct.len() < 2 {
            bail!("至少需要两个不同的资产，当前: {:?}", self.quote.assets);
        }
        if distinct.len() != self.quote.assets.len() {
            bail!("资产列表包含重复项: {:?}", self.quote.assets);
        }
        if self.quote.vs_currency.trim().is_empty() {
            bail!("计价货币不能为空");
        }
        if self.scanner.max_hops == 0 {
            bail!("scanner.max_hops 必须至少为 1");
        }
        Ok(())
    }
}
