use std::time::Duration;

use anyhow::Result;

use crate::research::context::ResearchContext;
use crate::research::types::{Learning, ResearchDirection, ResearchQuery, SourceMetadata};

/// 提炼调用的超时上限，超过即视为本次加工整体失败
pub const SYNTHESIS_TIMEOUT: Duration = Duration::from_secs(60);

/// 单篇文档送入提炼的内容长度上限（字符）
const MAX_CONTENT_CHARS: usize = 25_000;

/// 学习提炼员 - 从可信度标注的检索内容中提炼研究发现与后续问题
pub struct LearningSynthesizer;

const SYNTHESIZER_SYSTEM_PROMPT: &str = r#"你是一个专业的调研内容分析师。

你的任务是从检索到的网络内容中提炼研究发现：
1. 每条发现必须是信息密度高的独立事实陈述，尽量包含具体的实体、数据与结论
2. 为每条发现给出0到1之间的置信度，反映内容本身的确定性
3. 提出值得继续深入的后续研究问题，并为每个问题给出1到5的优先级
4. 检索内容已按来源可信度从高到低排列，优先采信排序靠前的内容

请以结构化的JSON格式返回提炼结果。"#;

impl LearningSynthesizer {
    /// 提炼研究发现与后续问题。
    /// 模型超量返回时做硬截断，置信度与优先级收敛到有效区间
    pub async fn synthesize(
        context: &ResearchContext,
        query: &ResearchQuery,
        ranked_contents: &[(SourceMetadata, String)],
        num_learnings: usize,
        num_follow_ups: usize,
    ) -> Result<(Vec<Learning>, Vec<String>, Vec<u8>)> {
        let user_prompt =
            Self::build_user_prompt(query, ranked_contents, num_learnings, num_follow_ups);

        let (output, usage) = context
            .model
            .synthesize_learnings(SYNTHESIZER_SYSTEM_PROMPT, &user_prompt, SYNTHESIS_TIMEOUT)
            .await?;
        context.budget.record(&usage);

        let learnings: Vec<Learning> = output
            .learnings
            .into_iter()
            .take(num_learnings)
            .map(|learning| Learning {
                content: learning.content,
                reliability: learning.reliability.clamp(0.0, 1.0),
            })
            .collect();

        let mut follow_up_questions = Vec::new();
        let mut follow_up_priorities = Vec::new();
        for follow_up in output.follow_up_questions.into_iter().take(num_follow_ups) {
            follow_up_questions.push(follow_up.question);
            follow_up_priorities.push(
                follow_up
                    .priority
                    .unwrap_or(ResearchDirection::DEFAULT_PRIORITY)
                    .clamp(1, 5),
            );
        }

        Ok((learnings, follow_up_questions, follow_up_priorities))
    }

    fn build_user_prompt(
        query: &ResearchQuery,
        ranked_contents: &[(SourceMetadata, String)],
        num_learnings: usize,
        num_follow_ups: usize,
    ) -> String {
        let mut prompt = format!(
            "## 搜索查询\n{}\n\n## 研究目标\n{}\n\n## 提炼要求\n最多提炼{}条研究发现和{}个后续问题。\n\n## 检索内容（已按来源可信度从高到低排序）\n",
            query.text, query.research_goal, num_learnings, num_follow_ups
        );

        for (index, (metadata, content)) in ranked_contents.iter().enumerate() {
            let title = metadata.title.as_deref().unwrap_or("无标题");
            let truncated: String = content.chars().take(MAX_CONTENT_CHARS).collect();
            prompt.push_str(&format!(
                "\n### 来源{}：{}（可信度 {:.2}）\n标题：{}\n{}\n",
                index + 1,
                metadata.url,
                metadata.reliability_score,
                title,
                truncated
            ));
        }

        prompt
    }
}
