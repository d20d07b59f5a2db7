use itertools::Itertools;
use log::{debug, info, warn};
use crate::core::exchange_graph::ExchangeGraph;
use crate::core::types::PathRecord;
use crate::error::{SpyError, SpyResult};

/// 默认最大跳数，六个资产的最长简单路径为 5 跳
pub const DEFAULT_MAX_HOPS: usize = 8;

/// 一次扫描的结果
#[derive(Debug, Clone, Default)]
pub struct ScanReport {
    pub pairs_examined: usize,
    pub records: Vec<PathRecord>,
}

impl ScanReport {
    pub fn flagged(&self) -> impl Iterator<Item = &PathRecord> + '_ {
        self.records.iter().filter(|record| record.is_flagged())
    }

    pub fn flagged_count(&self) -> usize {
        self.flagged().count()
    }
}

/// 均衡扫描器：对每个无序节点对枚举全部简单路径，计算正反向乘积
pub struct EquilibriumScanner {
    max_hops: usize,
}

impl Default for EquilibriumScanner {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_HOPS)
    }
}

impl EquilibriumScanner {
    pub fn new(max_hops: usize) -> Self {
        Self {
            max_hops: max_hops.max(1),
        }
    }

    /// 获取最大跳数
    pub fn max_hops(&self) -> usize {
        self.max_hops
    }

    pub fn scan(&self, graph: &ExchangeGraph) -> ScanReport {
        let mut report = ScanReport::default();

        for (source, target) in graph.tokens.iter().tuple_combinations() {
            report.pairs_examined += 1;

            let paths = self.all_simple_paths(graph, source, target);
            if paths.is_empty() {
                debug!("{} 与 {} 之间没有路径，跳过", source, target);
                continue;
            }

            for path in paths {
                match Self::evaluate_path(graph, path) {
                    Ok(record) => {
                        info!(
                            "均衡因子: {} ({})",
                            record.factor,
                            record.path.join(" -> ")
                        );
                        report.records.push(record);
                    }
                    Err(e) => warn!("跳过无法反向遍历的路径: {}", e),
                }
            }
        }

        info!(
            "扫描完成，检查节点对: {}, 路径数: {}, 失衡路径: {}",
            report.pairs_examined,
            report.records.len(),
            report.flagged_count()
        );
        report
    }

    /// 计算一条路径的正向乘积、反向乘积和均衡因子
    pub fn evaluate_path(graph: &ExchangeGraph, path: Vec<String>) -> SpyResult<PathRecord> {
        let forward = Self::path_weight(graph, path.iter())?;
        let reverse = Self::path_weight(graph, path.iter().rev())?;
        Ok(PathRecord::new(path, forward, reverse))
    }

    fn path_weight<'a>(
        graph: &ExchangeGraph,
        nodes: impl Iterator<Item = &'a String>,
    ) -> SpyResult<f64> {
        nodes.tuple_windows().try_fold(1.0, |acc, (from, to)| {
            graph
                .weight(from, to)
                .map(|weight| acc * weight)
                .ok_or_else(|| SpyError::MissingEdge {
                    from: from.clone(),
                    to: to.clone(),
                })
        })
    }

    /// 按边插入顺序深度优先枚举 source 到 target 的全部简单路径
    pub fn all_simple_paths(
        &self,
        graph: &ExchangeGraph,
        source: &str,
        target: &str,
    ) -> Vec<Vec<String>> {
        let mut paths = Vec::new();
        if source == target || !graph.contains_token(source) || !graph.contains_token(target) {
            return paths;
        }

        let mut current_path = vec![source.to_string()];
        self.dfs_search(graph, source, target, &mut current_path, &mut paths);
        paths
    }

    fn dfs_search(
        &self,
        graph: &ExchangeGraph,
        current_token: &str,
        target: &str,
        current_path: &mut Vec<String>,
        paths: &mut Vec<Vec<String>>,
    ) {
        // 达到最大跳数，停止搜索
        if current_path.len() > self.max_hops {
            return;
        }

        let edges = match graph.get_edges_from(current_token) {
            Some(edges) => edges,
            None => return,
        };

        for edge in edges {
            if current_path.contains(&edge.to_token) {
                continue;
            }

            if edge.to_token == target {
                let mut path = current_path.clone();
                path.push(edge.to_token.clone());
                paths.push(path);
                continue;
            }

            current_path.push(edge.to_token.clone());
            self.dfs_search(graph, &edge.to_token, target, current_path, paths);
            // 回溯
            current_path.pop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::exchange_graph::ExchangeEdge;
    use crate::core::types::PriceQuote;
    use assert_approx_eq::assert_approx_eq;

    fn edge(from: &str, to: &str, rate: f64) -> ExchangeEdge {
        ExchangeEdge {
            from_token: from.to_string(),
            to_token: to.to_string(),
            exchange_rate: rate,
        }
    }

    fn triangle() -> ExchangeGraph {
        let quote = PriceQuote::new("usd")
            .with_price("A", 100.0)
            .with_price("B", 10.0)
            .with_price("C", 4.0);
        let assets = vec!["A".to_string(), "B".to_string(), "C".to_string()];
        ExchangeGraph::build_from_quote(&assets, &quote)
    }

    #[test]
    fn test_scanner_creation() {
        assert_eq!(EquilibriumScanner::default().max_hops(), DEFAULT_MAX_HOPS);
        assert_eq!(EquilibriumScanner::new(0).max_hops(), 1);
    }

    #[test]
    fn test_simple_paths_in_insertion_order() {
        let graph = triangle();
        let scanner = EquilibriumScanner::default();
        let paths = scanner.all_simple_paths(&graph, "A", "C");

        assert_eq!(
            paths,
            vec![
                vec!["A".to_string(), "B".to_string(), "C".to_string()],
                vec!["A".to_string(), "C".to_string()],
            ]
        );
    }

    #[test]
    fn test_max_hops_bounds_paths() {
        let graph = triangle();
        let scanner = EquilibriumScanner::new(1);
        let paths = scanner.all_simple_paths(&graph, "A", "C");
        assert_eq!(paths, vec![vec!["A".to_string(), "C".to_string()]]);
    }

    #[test]
    fn test_consistent_graph_has_no_flags() {
        let report = EquilibriumScanner::default().scan(&triangle());

        assert_eq!(report.pairs_examined, 3);
        // 每个节点对两条路径：直连与经第三个节点
        assert_eq!(report.records.len(), 6);
        assert_eq!(report.flagged_count(), 0);
        for record in &report.records {
            assert_approx_eq!(record.factor, 1.0, 1e-12);
        }
    }

    #[test]
    fn test_inconsistent_graph_is_flagged() {
        let mut graph = ExchangeGraph::new();
        graph.add_edge(edge("A", "B", 2.0));
        graph.add_edge(edge("B", "A", 0.6));

        let report = EquilibriumScanner::default().scan(&graph);
        assert_eq!(report.records.len(), 1);

        let record = &report.records[0];
        assert_eq!(record.forward_product, 2.0);
        assert_eq!(record.reverse_product, 0.6);
        assert_eq!(record.factor, record.forward_product * record.reverse_product);
        assert_eq!(report.flagged_count(), 1);
    }

    #[test]
    fn test_missing_reverse_edge_is_skipped() {
        let mut graph = ExchangeGraph::new();
        graph.add_edge(edge("A", "B", 2.0));

        let report = EquilibriumScanner::default().scan(&graph);
        assert_eq!(report.pairs_examined, 1);
        assert!(report.records.is_empty());

        let err = EquilibriumScanner::evaluate_path(&graph, vec!["A".to_string(), "B".to_string()])
            .unwrap_err();
        assert!(matches!(err, SpyError::MissingEdge { .. }));
    }

    #[test]
    fn test_disconnected_pair_contributes_nothing() {
        let mut graph = ExchangeGraph::new();
        graph.add_edge(edge("A", "B", 2.0));
        graph.add_edge(edge("B", "A", 0.5));
        graph.add_edge(edge("C", "D", 1.0));
        graph.add_edge(edge("D", "C", 1.0));

        let report = EquilibriumScanner::default().scan(&graph);
        assert_eq!(report.pairs_examined, 6);
        assert_eq!(report.records.len(), 2);
    }
}
