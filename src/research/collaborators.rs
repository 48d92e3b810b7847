//! 研究引擎消费的外部协作者接口。
//! 模型服务与搜索服务都以trait对象注入，便于在测试中替换

use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::llm::client::types::TokenUsage;
use crate::llm::client::utils::estimate_token_usage;
use crate::llm::client::LLMClient;
use crate::search::{SearchClient, SearchDocument, SearchOptions};

/// 查询规划的结构化输出
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct QueryPlanOutput {
    /// 规划出的搜索查询列表
    pub queries: Vec<PlannedQuery>,
}

/// 模型规划出的单条查询
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct PlannedQuery {
    /// 搜索查询文本
    pub query: String,

    /// 该查询要达成的研究目标
    pub research_goal: String,

    /// 来源可靠性过滤阈值，0到1之间
    #[serde(default)]
    pub reliability_threshold: Option<f64>,

    /// 是否为验证型查询
    #[serde(default)]
    pub is_verification: Option<bool>,

    /// 该查询回应的研究方向
    #[serde(default)]
    pub related_direction: Option<String>,
}

/// 来源可信度评估的结构化输出
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct AssessmentOutput {
    /// 可信度评分，0到1之间
    pub score: f64,

    /// 评分理由
    pub reasoning: String,
}

/// 学习提炼的结构化输出
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SynthesisOutput {
    /// 提炼出的研究发现列表
    pub learnings: Vec<SynthesizedLearning>,

    /// 后续研究问题列表
    #[serde(default)]
    pub follow_up_questions: Vec<FollowUpQuestion>,
}

/// 单条提炼出的研究发现
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SynthesizedLearning {
    /// 发现内容，应当是信息密度高的独立事实陈述
    pub content: String,

    /// 模型对该发现的置信度，0到1之间
    pub reliability: f64,
}

/// 模型建议的后续研究问题
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct FollowUpQuestion {
    /// 问题内容
    pub question: String,

    /// 优先级，1到5，数值越大越优先
    #[serde(default)]
    pub priority: Option<u8>,
}

/// 模型服务接口，研究引擎消费的结构化生成能力。
/// 每个方法返回类型化结果和本次调用的Token用量
#[async_trait]
pub trait ModelService: Send + Sync {
    /// 启动前的连通性检查
    async fn check_connection(&self) -> Result<()>;

    /// 规划下一轮搜索查询
    async fn plan_queries(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<(QueryPlanOutput, TokenUsage)>;

    /// 评估单个域名的可信度
    async fn assess_source(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<(AssessmentOutput, TokenUsage)>;

    /// 从检索内容中提炼研究发现，超出timeout视为失败
    async fn synthesize_learnings(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        timeout: Duration,
    ) -> Result<(SynthesisOutput, TokenUsage)>;

    /// 合成最终调研报告
    async fn compose_report(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<(String, TokenUsage)>;
}

/// 搜索服务接口
#[async_trait]
pub trait SearchService: Send + Sync {
    /// 执行一次网络搜索
    async fn search(&self, query: &str, options: &SearchOptions) -> Result<Vec<SearchDocument>>;
}

fn extraction_usage<T: Serialize>(system_prompt: &str, user_prompt: &str, output: &T) -> TokenUsage {
    let rendered = serde_json::to_string(output).unwrap_or_default();
    estimate_token_usage(&format!("{}\n{}", system_prompt, user_prompt), &rendered)
}

#[async_trait]
impl ModelService for LLMClient {
    async fn check_connection(&self) -> Result<()> {
        LLMClient::check_connection(self).await
    }

    async fn plan_queries(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<(QueryPlanOutput, TokenUsage)> {
        let output: QueryPlanOutput = self.extract(system_prompt, user_prompt).await?;
        let usage = extraction_usage(system_prompt, user_prompt, &output);
        Ok((output, usage))
    }

    async fn assess_source(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<(AssessmentOutput, TokenUsage)> {
        let output: AssessmentOutput = self.extract(system_prompt, user_prompt).await?;
        let usage = extraction_usage(system_prompt, user_prompt, &output);
        Ok((output, usage))
    }

    async fn synthesize_learnings(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        timeout: Duration,
    ) -> Result<(SynthesisOutput, TokenUsage)> {
        let output: SynthesisOutput =
            tokio::time::timeout(timeout, self.extract(system_prompt, user_prompt))
                .await
                .map_err(|_| anyhow::anyhow!("学习提炼超时（{}秒）", timeout.as_secs()))??;
        let usage = extraction_usage(system_prompt, user_prompt, &output);
        Ok((output, usage))
    }

    async fn compose_report(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<(String, TokenUsage)> {
        let report = self.prompt(system_prompt, user_prompt).await?;
        let usage = estimate_token_usage(
            &format!("{}\n{}", system_prompt, user_prompt),
            &report,
        );
        Ok((report, usage))
    }
}

#[async_trait]
impl SearchService for SearchClient {
    async fn search(&self, query: &str, options: &SearchOptions) -> Result<Vec<SearchDocument>> {
        Ok(SearchClient::search(self, query, options).await?)
    }
}
