use log::LevelFilter;

/// 日志适配器，封装 env_logger 的初始化
pub struct LogAdapter;

impl LogAdapter {
    /// 默认日志级别
    pub fn default_level(verbose: bool) -> LevelFilter {
        if verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        }
    }

    /// 初始化日志系统，RUST_LOG 优先于默认级别
    pub fn init(verbose: bool) {
        let mut builder = env_logger::Builder::new();
        builder
            .filter_level(Self::default_level(verbose))
            .parse_default_env()
            .format_timestamp_secs();

        // 测试中可能重复初始化，忽略错误
        builder.try_init().ok();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_level() {
        assert_eq!(LogAdapter::default_level(false), LevelFilter::Info);
        assert_eq!(LogAdapter::default_level(true), LevelFilter::Debug);
    }

    #[test]
    fn test_init_twice_is_harmless() {
        LogAdapter::init(false);
        LogAdapter::init(true);
    }
}
