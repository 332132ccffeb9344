use serde::{Deserialize, Serialize};

/// 流水线步骤类型
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
pub enum TaskType {
    #[serde(rename = "analyze_query")]
    AnalyzeQuery,
    #[serde(rename = "search_papers")]
    SearchPapers,
    #[serde(rename = "extract_visuals")]
    ExtractVisuals,
    #[serde(rename = "analyze_papers")]
    AnalyzePapers,
    #[serde(rename = "synthesize")]
    Synthesize,
}

/// 步骤执行状态
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
pub enum StepStatus {
    #[default]
    Pending,
    Running,
    Completed,
    Failed,
}

impl StepStatus {
    /// 步骤板展示用的状态标签
    pub fn label(&self) -> &'static str {
        match self {
            StepStatus::Pending => "⏳ Pending",
            StepStatus::Running => "🔄 Running",
            StepStatus::Completed => "✅ Completed",
            StepStatus::Failed => "❌ Failed",
        }
    }
}

/// 流水线中的单个执行步骤
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AgentStep {
    pub id: u32,
    pub name: String,
    pub description: String,
    pub task_type: TaskType,
    pub status: StepStatus,
    pub result: String,
    /// 规划该步骤的理由，随步骤板一并展示
    pub reasoning: String,
    /// 执行耗时（秒）
    pub execution_time: f64,
}

impl AgentStep {
    pub fn new(id: u32, name: &str, description: &str, task_type: TaskType, reasoning: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
            description: description.to_string(),
            task_type,
            status: StepStatus::Pending,
            result: String::new(),
            reasoning: reasoning.to_string(),
            execution_time: 0.0,
        }
    }
}

/// 推送给UI的一次进度更新
///
/// 最后一条更新的`is_final`为true，`message`即最终研究报告（或错误说明）。
/// 不做持久化。
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct PipelineUpdate {
    pub message: String,
    /// 步骤板的markdown渲染结果
    pub step_board: String,
    pub is_final: bool,
}

impl PipelineUpdate {
    pub fn progress(message: impl Into<String>, step_board: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            step_board: step_board.into(),
            is_final: false,
        }
    }

    pub fn finished(message: impl Into<String>, step_board: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            step_board: step_board.into(),
            is_final: true,
        }
    }
}
