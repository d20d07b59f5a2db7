use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tabled::Tabled;

/// 均衡因子上限，超过即视为套利信号
pub const FACTOR_UPPER_BOUND: f64 = 1.01;
/// 均衡因子下限，低于即视为套利信号
pub const FACTOR_LOWER_BOUND: f64 = 0.99;

fn display_path(path: &[String]) -> String {
    path.join(" -> ")
}

fn display_rate(rate: &f64) -> String {
    format!("{:.6}", rate)
}

/// 一次报价请求的结果：资产 -> 以计价货币表示的价格
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceQuote {
    pub vs_currency: String,
    pub prices: HashMap<String, f64>,
}

impl PriceQuote {
    pub fn new(vs_currency: impl Into<String>) -> Self {
        Self {
            vs_currency: vs_currency.into(),
            prices: HashMap::new(),
        }
    }

    pub fn with_price(mut self, asset: impl Into<String>, price: f64) -> Self {
        self.prices.insert(asset.into(), price);
        self
    }

    /// 可用价格：有限且非零，零价格视同缺失
    pub fn price_of(&self, asset: &str) -> Option<f64> {
        self.prices
            .get(asset)
            .copied()
            .filter(|price| price.is_finite() && *price != 0.0)
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }
}

/// 一条简单路径的扫描结果
#[derive(Debug, Clone, Serialize, Deserialize, Tabled)]
pub struct PathRecord {
    #[tabled(rename = "路径", display_with = "display_path")]
    pub path: Vec<String>,
    #[tabled(rename = "正向乘积", display_with = "display_rate")]
    pub forward_product: f64,
    #[tabled(rename = "反向乘积", display_with = "display_rate")]
    pub reverse_product: f64,
    #[tabled(rename = "均衡因子", display_with = "display_rate")]
    pub factor: f64,
}

impl PathRecord {
    pub fn new(path: Vec<String>, forward_product: f64, reverse_product: f64) -> Self {
        Self {
            path,
            forward_product,
            reverse_product,
            factor: forward_product * reverse_product,
        }
    }

    pub fn source(&self) -> &str {
        self.path.first().map(String::as_str).unwrap_or_default()
    }

    pub fn target(&self) -> &str {
        self.path.last().map(String::as_str).unwrap_or_default()
    }

    pub fn hops(&self) -> usize {
        self.path.len().saturating_sub(1)
    }

    /// 因子偏离 1.0 超出固定容差带
    pub fn is_flagged(&self) -> bool {
        is_out_of_equilibrium(self.factor)
    }
}

pub fn is_out_of_equilibrium(factor: f64) -> bool {
    factor > FACTOR_UPPER_BOUND || factor < FACTOR_LOWER_BOUND
}
