use crate::config::{Config, LLMProvider};
use crate::i18n::TargetLanguage;
use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

/// DeepScholar-RS - 由Rust与AI驱动的学术研究Agent
#[derive(Parser, Debug, Default)]
#[command(name = "deepscholar-rs")]
#[command(
    about = "Autonomous academic research agent. It searches ArXiv, Semantic Scholar, CrossRef and Google Scholar (via Serper.dev), extracts tables and figures from paper PDFs, and uses LLMs to analyze and synthesize the findings."
)]
#[command(version)]
pub struct Args {
    /// 一次性研究查询，省略时启动Web UI
    #[arg(short, long)]
    pub query: Option<String>,

    /// 配置文件路径
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Web服务监听地址
    #[arg(long)]
    pub host: Option<String>,

    /// Web服务端口
    #[arg(short, long)]
    pub port: Option<u16>,

    /// 聚合后保留的论文总数上限
    #[arg(long)]
    pub max_results: Option<usize>,

    /// 每个来源的检索数量上限
    #[arg(long)]
    pub per_source_limit: Option<usize>,

    /// LLM Provider (openrouter, openai, anthropic, deepseek, ollama)
    #[arg(long)]
    pub llm_provider: Option<String>,

    /// LLM API基地址
    #[arg(long)]
    pub llm_api_base_url: Option<String>,

    /// LLM API KEY
    #[arg(long)]
    pub llm_api_key: Option<String>,

    /// 高能效模型，优先用于常规推理任务
    #[arg(long)]
    pub model_efficient: Option<String>,

    /// 高质量模型，用于长上下文的论文分析任务
    #[arg(long)]
    pub model_powerful: Option<String>,

    /// 最大tokens数
    #[arg(long)]
    pub max_tokens: Option<u32>,

    /// 温度参数
    #[arg(long)]
    pub temperature: Option<f64>,

    /// 回答语言 (en, zh, ja, ko, de, fr, ru)
    #[arg(long)]
    pub answer_language: Option<String>,

    /// 是否禁用缓存
    #[arg(long)]
    pub no_cache: bool,

    /// 是否启用详细日志
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// 将CLI参数转换为配置
    pub fn into_config(self) -> Result<Config> {
        let mut config = if let Some(config_path) = &self.config {
            // 如果显式指定了配置文件路径，从该路径加载
            Config::from_file(config_path)
                .context(format!("无法读取配置文件 {:?}", config_path))?
        } else {
            // 如果没有显式指定配置文件，尝试从默认位置加载
            let default_config_path = std::env::current_dir()
                .unwrap_or_else(|_| PathBuf::from("."))
                .join("scholar.toml");

            if default_config_path.exists() {
                Config::from_file(&default_config_path)
                    .context(format!("无法读取默认配置文件 {:?}", default_config_path))?
            } else {
                Config::default()
            }
        };

        // 覆盖LLM配置
        if let Some(provider_str) = self.llm_provider {
            if let Ok(provider) = provider_str.parse::<LLMProvider>() {
                config.llm.provider = provider;
            } else {
                eprintln!("⚠️ 警告: 未知的provider: {}，使用默认provider", provider_str);
            }
        }
        if let Some(llm_api_base_url) = self.llm_api_base_url {
            config.llm.api_base_url = llm_api_base_url;
        }
        if let Some(llm_api_key) = self.llm_api_key {
            config.llm.api_key = llm_api_key;
        }
        if let Some(model_efficient) = self.model_efficient {
            config.llm.model_efficient = model_efficient;
        }
        if let Some(model_powerful) = self.model_powerful {
            config.llm.model_powerful = model_powerful;
        }
        if let Some(max_tokens) = self.max_tokens {
            config.llm.max_tokens = max_tokens;
        }
        if let Some(temperature) = self.temperature {
            config.llm.temperature = temperature;
        }

        // 检索配置
        if let Some(max_results) = self.max_results {
            config.search.max_results = max_results;
        }
        if let Some(per_source_limit) = self.per_source_limit {
            config.search.per_source_limit = per_source_limit;
        }

        // Web服务配置
        if let Some(host) = self.host {
            config.server.host = host;
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }

        // 回答语言配置
        if let Some(answer_language_str) = self.answer_language {
            if let Ok(answer_language) = answer_language_str.parse::<TargetLanguage>() {
                config.answer_language = answer_language;
            } else {
                eprintln!(
                    "⚠️ 警告: 未知的回答语言: {}，使用默认语言 (English)",
                    answer_language_str
                );
            }
        }

        // 缓存配置
        if self.no_cache {
            config.cache.enabled = false;
        }

        config.verbose = self.verbose;

        Ok(config)
    }
}
