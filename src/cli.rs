use anyhow::{Context, Result};
use clap::{value_parser, Arg, ArgMatches, Command};
use log::info;
use std::path::PathBuf;

use crate::config::Config;
use crate::monitor::{ArbitrageMonitor, RunSummary};

// 命令行参数常量
pub const CONFIG_ARG: &str = "config";
pub const OUTPUT_DIR_ARG: &str = "output-dir";
pub const MAX_HOPS_ARG: &str = "max-hops";
pub const VERBOSE_ARG: &str = "verbose";

/// CLI应用程序结构
pub struct CliApp {
    config: Config,
}

impl CliApp {
    /// 加载配置并应用命令行覆盖项
    pub fn new(matches: &ArgMatches) -> Result<Self> {
        let config_path = matches.get_one::<PathBuf>(CONFIG_ARG);
        let mut config = Config::load(config_path.map(PathBuf::as_path))
            .context("加载配置失败")?;

        if let Some(dir) = matches.get_one::<PathBuf>(OUTPUT_DIR_ARG) {
            config.output.data_dir = dir.clone();
        }
        if let Some(max_hops) = matches.get_one::<usize>(MAX_HOPS_ARG) {
            config.scanner.max_hops = *max_hops;
        }
        config.validate()?;
        info!("配置加载完成");

        Ok(Self { config })
    }

    /// 构建命令行参数解析器
    pub fn build_cli() -> Command {
        Command::new("equilibrium-spy")
            .version(env!("CARGO_PKG_VERSION"))
            .about("汇率图均衡扫描：检测往返定价不一致的路径")
            .arg(
                Arg::new(CONFIG_ARG)
                    .long(CONFIG_ARG)
                    .help("配置文件路径 (默认: equilibrium-spy.toml，可不存在)")
                    .value_name("FILE")
                    .value_parser(value_parser!(PathBuf)),
            )
            .arg(
                Arg::new(OUTPUT_DIR_ARG)
                    .long(OUTPUT_DIR_ARG)
                    .short('o')
                    .help("交易记录输出目录 (默认: data)")
                    .value_name("DIR")
                    .value_parser(value_parser!(PathBuf)),
            )
            .arg(
                Arg::new(MAX_HOPS_ARG)
                    .long(MAX_HOPS_ARG)
                    .help("路径最大跳数")
                    .value_name("N")
                    .value_parser(value_parser!(usize)),
            )
            .arg(
                Arg::new(VERBOSE_ARG)
                    .long(VERBOSE_ARG)
                    .short('v')
                    .help("输出调试日志")
                    .action(clap::ArgAction::SetTrue),
            )
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// 运行一轮 拉取 -> 构建 -> 扫描 -> 记录
    pub async fn run(&self) -> Result<RunSummary> {
        let monitor = ArbitrageMonitor::new(self.config.clone()).context("初始化监控器失败")?;
        let summary = monitor.run_once().await.context("扫描失败")?;
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let matches = CliApp::build_cli().get_matches_from(["equilibrium-spy"]);
        assert!(!matches.get_flag(VERBOSE_ARG));
        assert!(matches.get_one::<PathBuf>(CONFIG_ARG).is_none());
        assert!(matches.get_one::<usize>(MAX_HOPS_ARG).is_none());
    }

    #[test]
    fn test_cli_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("trades");
        let matches = CliApp::build_cli().get_matches_from([
            "equilibrium-spy",
            "--output-dir",
            out.to_str().unwrap(),
            "--max-hops",
            "3",
            "-v",
        ]);

        let app = CliApp::new(&matches).unwrap();
        assert_eq!(app.config().output.data_dir, out);
        assert_eq!(app.config().scanner.max_hops, 3);
        assert!(matches.get_flag(VERBOSE_ARG));
    }

    #[test]
    fn test_cli_rejects_non_numeric_hops() {
        let result = CliApp::build_cli().try_get_matches_from(["equilibrium-spy", "--max-hops", "many"]);
        assert!(result.is_err());
    }
}
