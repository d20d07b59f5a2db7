use log::{info, warn};
use std::path::PathBuf;

use crate::config::Config;
use crate::core::{EquilibriumScanner, ExchangeGraph, ScanReport};
use crate::error::SpyResult;
use crate::quote_fetcher::{CoinGeckoClient, PriceSource};
use crate::table_display;
use crate::trade_logger::TradeLogger;

/// 单轮扫描的结果
#[derive(Debug)]
pub struct RunSummary {
    pub graph: ExchangeGraph,
    pub report: ScanReport,
    pub files_written: Vec<PathBuf>,
}

impl RunSummary {
    fn empty() -> Self {
        Self {
            graph: ExchangeGraph::new(),
            report: ScanReport::default(),
            files_written: Vec::new(),
        }
    }

    pub fn flagged_count(&self) -> usize {
        self.report.flagged_count()
    }
}

/// 套利监控器：拉取报价 -> 构建汇率图 -> 扫描 -> 记录
pub struct ArbitrageMonitor {
    config: Config,
    source: Box<dyn PriceSource + Send + Sync>,
    scanner: EquilibriumScanner,
    trade_logger: TradeLogger,
    display: bool,
}

impl ArbitrageMonitor {
    /// 使用 CoinGecko 作为报价来源
    pub fn new(config: Config) -> SpyResult<Self> {
        let source = CoinGeckoClient::new(&config.quote)?;
        Self::with_source(config, Box::new(source))
    }

    pub fn with_source(config: Config, source: Box<dyn PriceSource + Send + Sync>) -> SpyResult<Self> {
        let trade_logger = TradeLogger::new(&config.output.data_dir)?;
        let scanner = EquilibriumScanner::new(config.scanner.max_hops);

        Ok(Self {
            config,
            source,
            scanner,
            trade_logger,
            display: true,
        })
    }

    /// 是否在终端打印表格
    pub fn with_display(mut self, display: bool) -> Self {
        self.display = display;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// 执行一轮完整扫描
    pub async fn run_once(&self) -> SpyResult<RunSummary> {
        let assets = &self.config.quote.assets;
        let vs_currency = &self.config.quote.vs_currency;

        info!("开始扫描，资产: [{}], 计价货币: {}", assets.join(", "), vs_currency);
        let quote = self.source.fetch_prices(assets, vs_currency).await?;

        if quote.is_empty() {
            warn!("未获取到价格数据，跳过本轮扫描");
            return Ok(RunSummary::empty());
        }

        let graph = ExchangeGraph::build_from_quote(assets, &quote);
        if self.display {
            table_display::display_graph(&graph);
        }

        let report = self.scanner.scan(&graph);
        let files_written = self.trade_logger.record_flagged(&report)?;

        if self.display {
            table_display::display_flagged(report.flagged());
        }
        info!(
            "本轮完成: 节点 {}, 路径 {}, 失衡 {}, 写入文件 {}",
            graph.tokens.len(),
            report.records.len(),
            report.flagged_count(),
            files_written.len()
        );

        Ok(RunSummary {
            graph,
            report,
            files_written,
        })
    }
}
