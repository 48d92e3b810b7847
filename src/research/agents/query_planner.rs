use anyhow::Result;

use crate::research::context::ResearchContext;
use crate::research::types::{Learning, ResearchDirection, ResearchQuery};

/// 查询规划员 - 将调研主题、已有研究发现与待跟进方向转化为下一轮搜索查询
pub struct QueryPlanner;

const PLANNER_SYSTEM_PROMPT: &str = r#"你是一个专业的调研查询规划师。

你的任务是基于调研主题和已有的研究进展，规划下一轮网络搜索查询：
1. 每条查询必须指向一个独立的研究切入点，查询之间不能是同义改写
2. 为每条查询撰写明确的研究目标，说明期望从结果中获得什么
3. 对置信度不低于0.7的已有发现，规划进一步深挖的查询
4. 对置信度较低的已有发现，规划验证型查询（is_verification设为true）做交叉印证，
   并为其设置更高的来源可靠性阈值
5. 存在待跟进方向时，优先回应优先级更高的方向

请以结构化的JSON格式返回规划结果。"#;

impl QueryPlanner {
    /// 规划至多max_queries条查询，主题足够窄时可以更少。
    /// 模型返回的越界阈值会被收敛到[0,1]
    pub async fn plan(
        context: &ResearchContext,
        topic: &str,
        prior_learnings: &[Learning],
        prior_directions: &[ResearchDirection],
        max_queries: usize,
    ) -> Result<Vec<ResearchQuery>> {
        let user_prompt =
            Self::build_user_prompt(context, topic, prior_learnings, prior_directions, max_queries);

        let (output, usage) = context
            .model
            .plan_queries(PLANNER_SYSTEM_PROMPT, &user_prompt)
            .await?;
        context.budget.record(&usage);

        let research_config = &context.config.research;
        let queries = output
            .queries
            .into_iter()
            .take(max_queries)
            .map(|planned| {
                let is_verification = planned.is_verification.unwrap_or(false);
                let fallback_threshold = if is_verification {
                    research_config.verification_reliability_threshold
                } else {
                    research_config.default_reliability_threshold
                };
                ResearchQuery {
                    text: planned.query,
                    research_goal: planned.research_goal,
                    reliability_threshold: planned
                        .reliability_threshold
                        .unwrap_or(fallback_threshold)
                        .clamp(0.0, 1.0),
                    is_verification,
                    related_direction: planned.related_direction,
                }
            })
            .collect();

        Ok(queries)
    }

    fn build_user_prompt(
        context: &ResearchContext,
        topic: &str,
        prior_learnings: &[Learning],
        prior_directions: &[ResearchDirection],
        max_queries: usize,
    ) -> String {
        let research_config = &context.config.research;
        let mut prompt = format!(
            "## 调研主题\n{}\n\n## 规划要求\n最多规划{}条查询，主题足够聚焦时可以更少。\n常规查询的来源可靠性阈值默认为{}，验证型查询建议不低于{}。\n",
            topic,
            max_queries,
            research_config.default_reliability_threshold,
            research_config.verification_reliability_threshold
        );

        if !prior_learnings.is_empty() {
            prompt.push_str("\n## 已有研究发现\n");
            for learning in prior_learnings {
                prompt.push_str(&format!(
                    "- [置信度 {:.2}] {}\n",
                    learning.reliability, learning.content
                ));
            }
        }

        if !prior_directions.is_empty() {
            // 方向按优先级从高到低呈现，引导模型先补最重要的缺口
            let mut directions = prior_directions.to_vec();
            directions.sort_by(|a, b| b.priority.cmp(&a.priority));

            prompt.push_str("\n## 待跟进的研究方向（按优先级从高到低）\n");
            for direction in &directions {
                prompt.push_str(&format!(
                    "- [优先级 {}] {}",
                    direction.priority, direction.question
                ));
                if let Some(goal) = &direction.parent_goal {
                    prompt.push_str(&format!("（源自研究目标：{}）", goal));
                }
                prompt.push('\n');
            }
        }

        prompt
    }
}
