use anyhow::Result;
use log::info;

use equilibrium_spy::cli::{CliApp, VERBOSE_ARG};
use equilibrium_spy::log_adapter::LogAdapter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // 加载 .env 文件
    dotenv::dotenv().ok();

    let matches = CliApp::build_cli().get_matches();

    // 初始化日志系统
    LogAdapter::init(matches.get_flag(VERBOSE_ARG));

    info!("启动汇率均衡扫描...");
    let app = CliApp::new(&matches)?;
    let summary = app.run().await?;

    info!(
        "扫描结束，失衡路径 {} 条，写入文件 {} 个",
        summary.flagged_count(),
        summary.files_written.len()
    );
    Ok(())
}
