use std::sync::Arc;

use anyhow::Result;
use tokio::sync::RwLock;

use crate::{
    cache::CacheManager,
    config::Config,
    llm::client::LLMClient,
    types::query::ConversationTurn,
};

/// Agent运行上下文
///
/// 在CLI与Web两种入口之间共享：LLM客户端、配置、LLM响应缓存，以及跨
/// 查询的对话历史。单次查询内的步骤产物走每次运行新建的`Memory`。
#[derive(Clone)]
pub struct AgentContext {
    /// LLM调用器，用于与AI通信。
    pub llm_client: LLMClient,
    /// 配置
    pub config: Config,
    /// LLM响应缓存
    pub cache: Arc<RwLock<CacheManager>>,
    /// 对话历史，保留最近若干轮
    pub history: Arc<RwLock<Vec<ConversationTurn>>>,
}

impl AgentContext {
    /// 创建新的Agent上下文
    pub fn new(config: Config) -> Result<Self> {
        let llm_client = LLMClient::new(config.clone())?;
        let cache = Arc::new(RwLock::new(CacheManager::new(config.cache.clone())));

        Ok(Self {
            llm_client,
            config,
            cache,
            history: Arc::new(RwLock::new(Vec::new())),
        })
    }

    /// 读取对话历史快照
    pub async fn history_snapshot(&self) -> Vec<ConversationTurn> {
        self.history.read().await.clone()
    }

    /// 追加一轮对话，超出上限时丢弃最旧的记录
    pub async fn push_turn(&self, turn: ConversationTurn) {
        let mut history = self.history.write().await;
        history.push(turn);
        let max = self.config.search.max_conversation_history;
        if history.len() > max {
            let excess = history.len() - max;
            history.drain(0..excess);
        }
    }

    /// 带缓存的LLM调用
    ///
    /// 以系统提示词+用户提示词整体做缓存键，命中时不再请求模型服务。
    pub async fn cached_prompt(
        &self,
        category: &str,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<String> {
        let cache_key = format!("{}\n\n{}", system_prompt, user_prompt);

        {
            let cache = self.cache.read().await;
            if let Some(cached) = cache.get::<String>(category, &cache_key).await? {
                println!("   📦 命中缓存 [{}]", category);
                return Ok(cached);
            }
        }

        let response = self.llm_client.prompt(system_prompt, user_prompt).await?;

        {
            let cache = self.cache.read().await;
            cache.store(category, &cache_key, &response).await?;
        }

        Ok(response)
    }
}
