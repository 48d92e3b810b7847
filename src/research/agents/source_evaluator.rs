use anyhow::Result;

use crate::research::context::ResearchContext;
use crate::research::types::SourceAssessment;

/// 来源评估员 - 评估单个域名针对特定调研主题的可信度
pub struct SourceEvaluator;

const EVALUATOR_SYSTEM_PROMPT: &str = r#"你是一个严谨的信息来源可信度评估员。

你的任务是评估给定域名作为调研信息来源的可信度：
1. 识别域名背后的机构类型与背景
2. 结合调研主题判断其内容的专业性与相关性
3. 给出0到1之间的可信度评分和简要的评分理由

评分参考：
- 0.9以上：一手资料、官方文档、经同行评审的学术来源
- 0.7到0.89：声誉良好的行业媒体与专业机构
- 0.5到0.69：内容质量中等、需要交叉印证的来源
- 0.3到0.49：可靠性有限的来源
- 0.3以下：低可靠性来源

请以结构化的JSON格式返回评估结果。"#;

impl SourceEvaluator {
    /// 评估单个域名。仅在模型协作者失败时返回错误，内部不做重试，
    /// 无法容忍单点失败的调用方需要自行隔离
    pub async fn evaluate(
        context: &ResearchContext,
        domain: &str,
        topic_context: &str,
    ) -> Result<SourceAssessment> {
        let mut user_prompt = format!(
            "## 待评估域名\n{}\n\n## 调研主题\n{}\n",
            domain, topic_context
        );
        if let Some(preferences) = &context.config.research.source_preferences {
            user_prompt.push_str(&format!("\n## 来源偏好\n{}\n", preferences));
        }

        let (output, usage) = context
            .model
            .assess_source(EVALUATOR_SYSTEM_PROMPT, &user_prompt)
            .await?;
        context.budget.record(&usage);

        Ok(SourceAssessment {
            domain: domain.to_string(),
            score: output.score.clamp(0.0, 1.0),
            reasoning: output.reasoning,
        })
    }
}
