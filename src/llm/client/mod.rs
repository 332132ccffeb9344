//! LLM客户端 - 提供统一的LLM服务接口

use anyhow::Result;
use std::future::Future;

use crate::{config::Config, llm::client::utils::evaluate_befitting_model};

mod providers;
pub mod utils;

use providers::ProviderClient;

/// LLM客户端 - 提供统一的LLM服务接口
#[derive(Clone)]
pub struct LLMClient {
    config: Config,
    client: ProviderClient,
}

impl LLMClient {
    /// 创建新的LLM客户端
    pub fn new(config: Config) -> Result<Self> {
        let client = ProviderClient::new(&config.llm)?;
        Ok(Self { client, config })
    }

    /// 检查模型连接和功能是否正常
    pub async fn check_connection(&self) -> Result<()> {
        println!("🔄 正在检查模型连接...");
        match self
            .prompt("You are a helpful assistant.", "Hello")
            .await
        {
            Ok(_) => {
                println!("✅ 模型连接正常");
                Ok(())
            }
            Err(e) => {
                eprintln!("❌ 模型连接失败: {}", e);
                Err(e)
            }
        }
    }

    /// 通用重试逻辑，用于处理异步操作的重试机制
    async fn retry_with_backoff<T, F, Fut>(&self, operation: F) -> Result<T>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, anyhow::Error>>,
    {
        let llm_config = &self.config.llm;
        let max_retries = llm_config.retry_attempts;
        let retry_delay_ms = llm_config.retry_delay_ms;
        let mut retries = 0;

        loop {
            match operation().await {
                Ok(result) => return Ok(result),
                Err(err) => {
                    retries += 1;
                    eprintln!(
                        "❌ 调用模型服务出错，重试中 (第 {} / {}次尝试): {}",
                        retries, max_retries, err
                    );
                    if retries >= max_retries {
                        return Err(err);
                    }
                    tokio::time::sleep(std::time::Duration::from_millis(retry_delay_ms)).await;
                }
            }
        }
    }

    /// 单轮对话方法
    ///
    /// 按提示词体量自动选择模型，efficient模型重试仍失败时切换到
    /// powerful模型兜底。
    pub async fn prompt(&self, system_prompt: &str, user_prompt: &str) -> Result<String> {
        let (befitting_model, fallover_model) =
            evaluate_befitting_model(&self.config.llm, system_prompt, user_prompt);

        self.prompt_inner(system_prompt, user_prompt, befitting_model, fallover_model)
            .await
    }

    async fn prompt_inner(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        befitting_model: String,
        fallover_model: Option<String>,
    ) -> Result<String> {
        let llm_config = &self.config.llm;
        let agent = self
            .client
            .create_agent(&befitting_model, system_prompt, llm_config);

        match self
            .retry_with_backoff(|| async { agent.prompt(user_prompt).await })
            .await
        {
            Ok(response) => Ok(response),
            Err(e) => match fallover_model {
                Some(ref model) => {
                    eprintln!(
                        "❌ 模型 {} 尝试 {} 次均失败，切换备选模型 {}...{}",
                        befitting_model, llm_config.retry_attempts, model, e
                    );
                    Box::pin(self.prompt_inner(system_prompt, user_prompt, model.clone(), None))
                        .await
                }
                None => Err(e),
            },
        }
    }
}
