use crate::config::LLMConfig;

/// 按提示词体量选择模型
///
/// 短提示词走高能效模型并保留高质量模型兜底；超长提示词（论文全文分析）
/// 直接使用高质量模型，不再兜底。
pub fn evaluate_befitting_model(
    llm_config: &LLMConfig,
    system_prompt: &str,
    user_prompt: &str,
) -> (String, Option<String>) {
    if system_prompt.len() + user_prompt.len() <= 32 * 1024 {
        return (
            llm_config.model_efficient.clone(),
            Some(llm_config.model_powerful.clone()),
        );
    }
    (llm_config.model_powerful.clone(), None)
}
