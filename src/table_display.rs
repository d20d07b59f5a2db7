use tabled::{settings::Style, Table};

use crate::core::{ExchangeGraph, PathRecord};

/// 渲染汇率图的边表
pub fn render_edges(graph: &ExchangeGraph) -> String {
    Table::new(graph.edges()).with(Style::rounded()).to_string()
}

/// 渲染路径记录表
pub fn render_paths<'a>(records: impl IntoIterator<Item = &'a PathRecord>) -> String {
    Table::new(records).with(Style::rounded()).to_string()
}

/// 以表格形式显示汇率图
pub fn display_graph(graph: &ExchangeGraph) {
    println!("\n📈 图节点: [{}]", graph.tokens.join(", "));
    println!("{}", "=".repeat(80));
    println!("{}", render_edges(graph));
    println!("{}", "=".repeat(80));
    println!();
}

/// 以表格形式显示失衡路径
pub fn display_flagged<'a>(records: impl IntoIterator<Item = &'a PathRecord>) {
    let records: Vec<&PathRecord> = records.into_iter().collect();
    if records.is_empty() {
        println!("\n✅ 未发现失衡路径\n");
        return;
    }

    println!("\n🔍 发现的失衡路径: {}", records.len());
    println!("{}", "=".repeat(80));
    println!("{}", render_paths(records));
    println!("{}", "=".repeat(80));
    println!();
}
