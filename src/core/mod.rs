pub mod exchange_graph;
pub mod equilibrium;
pub mod types;

// 重新导出核心类型，方便外部使用
pub use exchange_graph::{ExchangeEdge, ExchangeGraph};
pub use equilibrium::{EquilibriumScanner, ScanReport, DEFAULT_MAX_HOPS};
pub use types::*;
