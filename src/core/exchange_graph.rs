use std::collections::HashMap;
use itertools::Itertools;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use tabled::Tabled;
use crate::core::types::PriceQuote;

/// 图中的边，表示一个有向兑换关系
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Tabled)]
pub struct ExchangeEdge {
    #[tabled(rename = "源资产")]
    pub from_token: String,    // 源资产
    #[tabled(rename = "目标资产")]
    pub to_token: String,      // 目标资产
    #[tabled(rename = "汇率")]
    pub exchange_rate: f64,    // price(from) / price(to)
}

/// 汇率图：每个有序资产对至多一条边
#[derive(Debug, Clone)]
pub struct ExchangeGraph {
    /// 邻接表：token -> [edge]，按插入顺序
    pub adjacency_list: HashMap<String, Vec<ExchangeEdge>>,
    /// 所有节点，按插入顺序
    pub tokens: Vec<String>,
}

impl Default for ExchangeGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl ExchangeGraph {
    pub fn new() -> Self {
        Self {
            adjacency_list: HashMap::new(),
            tokens: Vec::new(),
        }
    }

    /// 从报价构建完整的两两汇率图
    ///
    /// 按 `assets` 的顺序遍历每个无序资产对，两端都有可用价格时同时加入正反两条边；
    /// 任意一端缺价的资产对直接跳过。
    pub fn build_from_quote(assets: &[String], quote: &PriceQuote) -> Self {
        info!("开始构建汇率图，资产数量: {}, 报价数量: {}", assets.len(), quote.len());

        let mut graph = Self::new();
        let mut edge_count = 0;

        for (from, to) in assets.iter().tuple_combinations() {
            let (from_price, to_price) = match (quote.price_of(from), quote.price_of(to)) {
                (Some(a), Some(b)) => (a, b),
                _ => {
                    debug!("跳过缺少价格的资产对: {}/{}", from, to);
                    continue;
                }
            };

            graph.add_edge(ExchangeEdge {
                from_token: from.clone(),
                to_token: to.clone(),
                exchange_rate: from_price / to_price,
            });
            graph.add_edge(ExchangeEdge {
                from_token: to.clone(),
                to_token: from.clone(),
                exchange_rate: to_price / from_price,
            });
            edge_count += 2;
        }

        info!("汇率图构建完成，节点数量: {}, 边数量: {}", graph.tokens.len(), edge_count);
        info!("图节点: [{}]", graph.tokens.join(", "));
        for edge in graph.edges() {
            debug!("图边: {} -> {} ({})", edge.from_token, edge.to_token, edge.exchange_rate);
        }

        graph
    }

    /// 加入一条边；同一有序资产对已存在时覆盖其汇率
    pub fn add_edge(&mut self, edge: ExchangeEdge) {
        self.insert_token(&edge.from_token);
        self.insert_token(&edge.to_token);

        let edges = self
            .adjacency_list
            .entry(edge.from_token.clone())
            .or_insert_with(Vec::new);

        match edges.iter().position(|existing| existing.to_token == edge.to_token) {
            Some(index) => edges[index].exchange_rate = edge.exchange_rate,
            None => edges.push(edge),
        }
    }

    fn insert_token(&mut self, token: &str) {
        if !self.tokens.iter().any(|t| t == token) {
            self.tokens.push(token.to_string());
        }
    }

    /// 获取指定资产的所有出边
    pub fn get_edges_from(&self, token: &str) -> Option<&Vec<ExchangeEdge>> {
        self.adjacency_list.get(token)
    }

    pub fn get_edge(&self, from_token: &str, to_token: &str) -> Option<&ExchangeEdge> {
        self.adjacency_list
            .get(from_token)
            .and_then(|edges| edges.iter().find(|edge| edge.to_token == to_token))
    }

    pub fn weight(&self, from_token: &str, to_token: &str) -> Option<f64> {
        self.get_edge(from_token, to_token).map(|edge| edge.exchange_rate)
    }

    /// 检查两个资产之间是否存在直接连接
    pub fn has_direct_path(&self, from_token: &str, to_token: &str) -> bool {
        self.get_edge(from_token, to_token).is_some()
    }

    pub fn contains_token(&self, token: &str) -> bool {
        self.tokens.iter().any(|t| t == token)
    }

    /// 按节点插入顺序列出所有边
    pub fn edges(&self) -> impl Iterator<Item = &ExchangeEdge> + '_ {
        self.tokens
            .iter()
            .filter_map(|token| self.adjacency_list.get(token))
            .flatten()
    }

    /// 获取图的统计信息 (节点数, 边数)
    pub fn get_stats(&self) -> (usize, usize) {
        let token_count = self.tokens.len();
        let edge_count = self.adjacency_list.values().map(|edges| edges.len()).sum();
        (token_count, edge_count)
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    fn assets(ids: &[&str]) -> Vec<String> {
        ids.iter().map(|id| id.to_string()).collect()
    }

    #[test]
    fn test_graph_creation() {
        let graph = ExchangeGraph::new();
        assert!(graph.is_empty());
        assert_eq!(graph.get_stats(), (0, 0));
    }

    #[test]
    fn test_two_asset_rates() {
        let quote = PriceQuote::new("usd")
            .with_price("bitcoin", 50000.0)
            .with_price("ethereum", 2500.0);
        let graph = ExchangeGraph::build_from_quote(&assets(&["bitcoin", "ethereum"]), &quote);

        assert_eq!(graph.weight("bitcoin", "ethereum"), Some(20.0));
        assert_eq!(graph.weight("ethereum", "bitcoin"), Some(0.05));
        assert_eq!(graph.get_stats(), (2, 2));
    }

    #[test]
    fn test_missing_price_drops_node() {
        let quote = PriceQuote::new("usd")
            .with_price("bitcoin", 50000.0)
            .with_price("ethereum", 2500.0);
        let graph = ExchangeGraph::build_from_quote(
            &assets(&["bitcoin", "ethereum", "cardano"]),
            &quote,
        );

        assert!(!graph.contains_token("cardano"));
        assert_eq!(graph.tokens, assets(&["bitcoin", "ethereum"]));
    }

    #[test]
    fn test_reciprocal_edges() {
        let quote = PriceQuote::new("usd")
            .with_price("bitcoin", 61234.5)
            .with_price("ethereum", 2987.12)
            .with_price("solana", 143.7);
        let ids = assets(&["bitcoin", "ethereum", "solana"]);
        let graph = ExchangeGraph::build_from_quote(&ids, &quote);

        for (a, b) in ids.iter().tuple_combinations() {
            let forward = graph.weight(a, b).unwrap();
            let backward = graph.weight(b, a).unwrap();
            assert_approx_eq!(forward * backward, 1.0, 1e-12);
        }
    }

    #[test]
    fn test_add_edge_replaces_weight() {
        let mut graph = ExchangeGraph::new();
        graph.add_edge(ExchangeEdge {
            from_token: "A".to_string(),
            to_token: "B".to_string(),
            exchange_rate: 2.0,
        });
        graph.add_edge(ExchangeEdge {
            from_token: "A".to_string(),
            to_token: "B".to_string(),
            exchange_rate: 3.0,
        });

        assert_eq!(graph.get_stats(), (2, 1));
        assert_eq!(graph.weight("A", "B"), Some(3.0));
        assert!(graph.has_direct_path("A", "B"));
        assert!(!graph.has_direct_path("B", "A"));
    }
}
