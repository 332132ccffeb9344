pub mod context;
pub mod pipeline;
pub mod prompts;

pub use context::AgentContext;
pub use pipeline::ResearchPipeline;

use anyhow::Result;
use tokio_stream::StreamExt;

use crate::config::Config;

/// 以CLI模式执行一次研究查询
///
/// 启动时检查模型连接，随后把流水线的进度更新逐条打印到终端，最终
/// 报告在流结束时输出。
pub async fn run_query(config: &Config, query: &str) -> Result<()> {
    let context = AgentContext::new(config.clone())?;

    // 启动时检查模型连接
    context.llm_client.check_connection().await?;

    let pipeline = ResearchPipeline::new(context)?;
    let mut stream = pipeline.process_query(query.to_string());

    while let Some(update) = stream.next().await {
        if update.is_final {
            println!("\n{}", update.message);
        } else {
            println!("{}", update.message);
        }
    }

    Ok(())
}
