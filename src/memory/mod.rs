use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// 单次流水线运行内的统一内存
///
/// 各步骤的产物（查询分析、论文列表、分析文本等）以`作用域:键`的形式
/// 存放，供后续步骤读取。每次查询运行都从空内存开始。
#[derive(Debug, Default)]
pub struct Memory {
    data: HashMap<String, Value>,
}

impl Memory {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
        }
    }

    /// 存储数据到指定作用域和键
    pub fn store<T>(&mut self, scope: &str, key: &str, data: T) -> Result<()>
    where
        T: Serialize,
    {
        let full_key = format!("{}:{}", scope, key);
        let serialized = serde_json::to_value(data)?;
        self.data.insert(full_key, serialized);
        Ok(())
    }

    /// 从指定作用域和键获取数据
    pub fn get<T>(&self, scope: &str, key: &str) -> Option<T>
    where
        T: for<'a> Deserialize<'a>,
    {
        let full_key = format!("{}:{}", scope, key);
        self.data
            .get(&full_key)
            .and_then(|value| serde_json::from_value(value.clone()).ok())
    }

    /// 检查是否存在指定数据
    pub fn has_data(&self, scope: &str, key: &str) -> bool {
        let full_key = format!("{}:{}", scope, key);
        self.data.contains_key(&full_key)
    }

    /// 列出指定作用域的所有键
    pub fn list_keys(&self, scope: &str) -> Vec<String> {
        let prefix = format!("{}:", scope);
        self.data
            .keys()
            .filter(|key| key.starts_with(&prefix))
            .map(|key| key[prefix.len()..].to_string())
            .collect()
    }
}

/// 流水线内存作用域
pub struct MemoryScope;

impl MemoryScope {
    pub const PIPELINE: &'static str = "pipeline";
}

/// 流水线内存键
pub struct ScopedKeys;

impl ScopedKeys {
    pub const QUERY: &'static str = "query";
    pub const CONTEXTUALIZED_QUERY: &'static str = "contextualized_query";
    pub const QUERY_ANALYSIS: &'static str = "query_analysis";
    pub const PAPERS: &'static str = "papers";
    pub const PAPER_ANALYSIS: &'static str = "paper_analysis";
    pub const FINAL_RESPONSE: &'static str = "final_response";
}

// Include tests
#[cfg(test)]
mod tests;
