use chrono::{DateTime, Local};
use log::info;
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::{PathRecord, ScanReport};
use crate::error::SpyResult;

/// CSV 表头，顺序固定；行尾为 CRLF
pub const TRADE_HEADER: [&str; 3] = ["currency_from", "currency_to", "exchange_rate"];
/// 文件名中的时间戳精确到分钟
pub const FILE_TIMESTAMP_FORMAT: &str = "%Y.%m.%d:%H.%M";

/// 模拟交易记录器：每条失衡路径写一个以分钟命名的 CSV 文件
pub struct TradeLogger {
    data_dir: PathBuf,
}

impl TradeLogger {
    /// 创建记录器，输出目录不存在时自动创建
    pub fn new(data_dir: impl Into<PathBuf>) -> SpyResult<Self> {
        let data_dir = data_dir.into();
        fs::create_dir_all(&data_dir)?;
        Ok(Self { data_dir })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// 给定时间对应的输出文件路径
    pub fn file_path_at(&self, timestamp: &DateTime<Local>) -> PathBuf {
        self.data_dir.join(format!(
            "currency_pair_{}.txt",
            timestamp.format(FILE_TIMESTAMP_FORMAT)
        ))
    }

    /// 记录一次模拟交易，同一分钟内的记录会覆盖之前的文件
    pub fn record(&self, currency_from: &str, currency_to: &str, exchange_rate: f64) -> SpyResult<PathBuf> {
        self.record_at(currency_from, currency_to, exchange_rate, &Local::now())
    }

    pub fn record_at(
        &self,
        currency_from: &str,
        currency_to: &str,
        exchange_rate: f64,
        timestamp: &DateTime<Local>,
    ) -> SpyResult<PathBuf> {
        let path = self.file_path_at(timestamp);

        let rate = format_rate(exchange_rate);
        let mut writer = csv::WriterBuilder::new()
            .terminator(csv::Terminator::CRLF)
            .from_path(&path)?;
        writer.write_record(TRADE_HEADER)?;
        writer.write_record([currency_from, currency_to, rate.as_str()])?;
        writer.flush()?;

        info!("记录交易请求: {} -> {} ({}) 到 {}", currency_from, currency_to, exchange_rate, path.display());
        Ok(path)
    }

    /// 记录一条失衡路径：端点取反向序列的首尾
    pub fn record_path(&self, record: &PathRecord) -> SpyResult<PathBuf> {
        self.record(record.target(), record.source(), record.factor)
    }

    /// 记录扫描结果中的全部失衡路径，返回写入的文件
    pub fn record_flagged(&self, report: &ScanReport) -> SpyResult<Vec<PathBuf>> {
        let mut written: Vec<PathBuf> = Vec::new();
        for record in report.flagged() {
            let path = self.record_path(record)?;
            if !written.contains(&path) {
                written.push(path);
            }
        }
        Ok(written)
    }
}

/// 最短往返十进制表示，至少保留一位小数（2.0 而不是 2）
pub fn format_rate(rate: f64) -> String {
    format!("{:?}", rate)
}
