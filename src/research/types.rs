//! 研究引擎核心数据模型

use serde::{Deserialize, Serialize};

use super::budget::BudgetStatus;

/// 规划产出的单条搜索查询
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResearchQuery {
    /// 搜索查询文本
    pub text: String,

    /// 该查询要达成的研究目标
    pub research_goal: String,

    /// 来源可靠性过滤阈值，始终处于[0,1]
    pub reliability_threshold: f64,

    /// 是否为验证型查询。验证型查询用于交叉印证低置信度的研究发现
    pub is_verification: bool,

    /// 该查询回应的研究方向
    pub related_direction: Option<String>,
}

/// 域名可信度评估结果
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SourceAssessment {
    pub domain: String,

    /// 可信度评分，[0,1]
    pub score: f64,

    /// 评分理由
    pub reasoning: String,
}

/// 单篇检索文档的来源元数据，按URL去重
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SourceMetadata {
    pub url: String,
    pub domain: String,
    pub title: Option<String>,

    /// 所属域名的可信度评分
    pub reliability_score: f64,

    /// 评分理由
    pub reliability_reasoning: String,
}

/// 带置信度的研究发现。置信度由提炼模型报告，
/// 与来源可信度是两个独立维度，引擎不做数值上的合并
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Learning {
    pub content: String,

    /// 模型报告的置信度，[0,1]
    pub reliability: f64,
}

/// 后续研究方向，从上一层递归流入下一层的查询规划
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResearchDirection {
    /// 待解答的问题
    pub question: String,

    /// 优先级，1到5，数值越大越优先
    pub priority: u8,

    /// 产生该方向的父级研究目标
    pub parent_goal: Option<String>,
}

impl ResearchDirection {
    /// 未报告优先级时的默认值
    pub const DEFAULT_PRIORITY: u8 = 3;
}

/// 结果加工阶段的产物
#[derive(Debug, Clone, Default)]
pub struct ProcessedResults {
    /// 提炼出的研究发现内容
    pub learnings: Vec<String>,

    /// 后续研究问题
    pub follow_up_questions: Vec<String>,

    /// 各后续问题的优先级，与follow_up_questions一一对应
    pub follow_up_priorities: Vec<u8>,

    /// 本轮保留文档的来源元数据
    pub source_metadata: Vec<SourceMetadata>,

    /// 带置信度的研究发现
    pub weighted_learnings: Vec<Learning>,
}

/// 单个研究分支的结果，每次递归调用的返回单元。
/// 失败分支以Default的全空值参与合并
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct BranchResult {
    /// 研究发现内容
    pub learnings: Vec<String>,

    /// 各研究发现的置信度，与learnings一一对应
    pub learning_reliabilities: Vec<f64>,

    /// 已访问的URL
    pub visited_urls: Vec<String>,

    /// 来源元数据，按URL去重
    pub source_metadata: Vec<SourceMetadata>,

    /// 带置信度的研究发现
    pub weighted_learnings: Vec<Learning>,
}

impl BranchResult {
    /// 是否没有任何研究发现
    pub fn is_empty(&self) -> bool {
        self.learnings.is_empty()
            && self.visited_urls.is_empty()
            && self.source_metadata.is_empty()
            && self.weighted_learnings.is_empty()
    }
}

/// 整个研究树执行完毕后的总结果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResearchOutcome {
    /// 合并去重后的研究发现
    pub findings: BranchResult,

    /// Token预算使用情况
    pub budget: BudgetStatus,
}
