//! Equilibrium Spy - 汇率图均衡扫描
//!
//! 从 CoinGecko 拉取一组资产的报价，构建两两汇率图，
//! 对每个节点对枚举全部简单路径并计算正反向乘积（均衡因子），
//! 偏离 1.0 超过固定容差的路径写入以分钟命名的 CSV 文件。

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod log_adapter;
pub mod monitor;
pub mod quote_fetcher;
pub mod table_display;
pub mod trade_logger;

// 重新导出常用类型
pub use crate::config::Config;
pub use crate::core::{EquilibriumScanner, ExchangeEdge, ExchangeGraph, PathRecord, PriceQuote, ScanReport};
pub use crate::error::{SpyError, SpyResult};
pub use crate::monitor::{ArbitrageMonitor, RunSummary};
pub use crate::quote_fetcher::{CoinGeckoClient, PriceSource};
pub use crate::trade_logger::TradeLogger;
