use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::PathBuf;

use crate::i18n::TargetLanguage;

/// LLM Provider类型
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub enum LLMProvider {
    #[serde(rename = "openrouter")]
    #[default]
    OpenRouter,
    #[serde(rename = "openai")]
    OpenAI,
    #[serde(rename = "anthropic")]
    Anthropic,
    #[serde(rename = "deepseek")]
    DeepSeek,
    #[serde(rename = "ollama")]
    Ollama,
}

impl std::fmt::Display for LLMProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LLMProvider::OpenRouter => write!(f, "openrouter"),
            LLMProvider::OpenAI => write!(f, "openai"),
            LLMProvider::Anthropic => write!(f, "anthropic"),
            LLMProvider::DeepSeek => write!(f, "deepseek"),
            LLMProvider::Ollama => write!(f, "ollama"),
        }
    }
}

impl std::str::FromStr for LLMProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "openrouter" => Ok(LLMProvider::OpenRouter),
            "openai" => Ok(LLMProvider::OpenAI),
            "anthropic" => Ok(LLMProvider::Anthropic),
            "deepseek" => Ok(LLMProvider::DeepSeek),
            "ollama" => Ok(LLMProvider::Ollama),
            _ => Err(format!("Unknown provider: {}", s)),
        }
    }
}

/// 应用程序配置
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct Config {
    /// LLM模型配置
    #[serde(default)]
    pub llm: LLMConfig,

    /// 多源检索配置
    #[serde(default)]
    pub search: SearchConfig,

    /// Web服务配置
    #[serde(default)]
    pub server: ServerConfig,

    /// 缓存配置
    #[serde(default)]
    pub cache: CacheConfig,

    /// 研究报告的回答语言
    #[serde(default)]
    pub answer_language: TargetLanguage,

    /// 是否启用详细日志
    #[serde(default)]
    pub verbose: bool,
}

/// LLM模型配置
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LLMConfig {
    /// LLM Provider类型
    pub provider: LLMProvider,

    /// LLM API KEY
    pub api_key: String,

    /// LLM API基地址
    pub api_base_url: String,

    /// 高能效模型，优先用于常规推理任务
    pub model_efficient: String,

    /// 高质量模型，用于长上下文的论文分析任务，以及作为efficient失效情况下的兜底
    pub model_powerful: String,

    /// 最大tokens
    pub max_tokens: u32,

    /// 温度
    pub temperature: f64,

    /// 重试次数
    pub retry_attempts: u32,

    /// 重试间隔（毫秒）
    pub retry_delay_ms: u64,

    /// 超时时间（秒）
    pub timeout_seconds: u64,
}

/// 多源检索配置
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SearchConfig {
    /// Serper.dev API KEY，未配置时跳过该来源
    pub serper_api_key: Option<String>,

    /// Semantic Scholar API KEY，可选，仅用于提升配额
    pub semantic_scholar_api_key: Option<String>,

    /// 聚合后保留的论文总数上限
    pub max_results: usize,

    /// 每个来源的检索数量上限
    pub per_source_limit: usize,

    /// 标题相似度去重阈值，超过该值的两条记录视为重复
    pub dedup_threshold: f64,

    /// 单次API请求超时（秒）
    pub request_timeout_secs: u64,

    /// 同一来源连续请求之间的限速间隔（毫秒）
    pub rate_limit_delay_ms: u64,

    /// 提取可视化内容的论文数量上限
    pub max_visual_extractions: usize,

    /// 每篇论文保留的可视化内容数量上限
    pub max_visuals_per_paper: usize,

    /// 送入LLM分析的论文数量上限
    pub max_papers_for_analysis: usize,

    /// 保留的对话历史轮数
    pub max_conversation_history: usize,
}

/// Web服务配置
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// 缓存配置
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CacheConfig {
    /// 是否启用缓存
    pub enabled: bool,

    /// 缓存目录
    pub cache_dir: PathBuf,

    /// 缓存过期时间（小时）
    pub expire_hours: u64,
}

impl Config {
    /// 从文件加载配置
    pub fn from_file(path: &PathBuf) -> Result<Self> {
        let mut file =
            File::open(path).context(format!("Failed to open config file: {:?}", path))?;
        let mut content = String::new();
        file.read_to_string(&mut content)
            .context("Failed to read config file")?;

        let config: Config = toml::from_str(&content).context("Failed to parse config file")?;
        Ok(config)
    }

    /// 校验必需配置，缺失时在启动阶段直接报错
    pub fn validate(&self) -> Result<()> {
        if self.llm.provider != LLMProvider::Ollama
            && (self.llm.api_key.is_empty() || self.llm.api_key.starts_with("your-"))
        {
            bail!(
                "OPENROUTER_API_KEY is required. Please set it in environment variables or scholar.toml (llm.api_key)"
            );
        }
        if self.search.max_results == 0 {
            bail!("search.max_results must be greater than zero");
        }
        if !(0.0..=1.0).contains(&self.search.dedup_threshold) {
            bail!("search.dedup_threshold must be within [0.0, 1.0]");
        }
        Ok(())
    }
}

impl Default for LLMConfig {
    fn default() -> Self {
        Self {
            provider: LLMProvider::default(),
            api_key: std::env::var("OPENROUTER_API_KEY").unwrap_or_default(),
            api_base_url: String::from("https://openrouter.ai/api/v1"),
            model_efficient: String::from("anthropic/claude-3.5-haiku"),
            model_powerful: String::from("anthropic/claude-sonnet-4"),
            max_tokens: 5000,
            temperature: 0.3,
            retry_attempts: 3,
            retry_delay_ms: 2000,
            timeout_seconds: 30,
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            serper_api_key: std::env::var("SERPER_API_KEY").ok().filter(|k| !k.is_empty()),
            semantic_scholar_api_key: std::env::var("SEMANTIC_SCHOLAR_API_KEY")
                .ok()
                .filter(|k| !k.is_empty()),
            max_results: 20,
            per_source_limit: 10,
            dedup_threshold: 0.85,
            request_timeout_secs: 15,
            rate_limit_delay_ms: 1000,
            max_visual_extractions: 3,
            max_visuals_per_paper: 3,
            max_papers_for_analysis: 3,
            max_conversation_history: 5,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: String::from("0.0.0.0"),
            port: 7861,
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            cache_dir: PathBuf::from(".deepscholar/cache"),
            expire_hours: 168,
        }
    }
}
