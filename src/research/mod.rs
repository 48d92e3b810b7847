//! 递归式主题调研引擎
//!
//! 给定一个调研问题，引擎规划搜索查询、检索并评估网络内容、
//! 提炼带置信度的研究发现，并沿后续问题递归深入更窄的子问题，
//! 最终跨分支聚合为去重后的结果集。
//!
//! 递归树的每一层：QueryPlanner规划至多breadth条查询，
//! 每条查询在全局并发限制下检索并由ResultProcessor加工，
//! 宽度逐层减半、深度逐层递减，分支结果由Aggregator合并上返

use anyhow::Result;

use crate::research::context::ResearchContext;
use crate::research::orchestrator::{AccumulatedState, ResearchOrchestrator};
use crate::research::types::ResearchOutcome;

pub mod agents;
pub mod aggregator;
pub mod budget;
pub mod collaborators;
pub mod context;
pub mod orchestrator;
pub mod processor;
pub mod progress;
pub mod types;

/// 深度与宽度的有效区间
const DIMENSION_RANGE: (u8, u8) = (1, 5);

/// 超过该值时给出规模膨胀警告
const DIMENSION_SOFT_LIMIT: u8 = 3;

/// 深度/宽度收敛到有效区间
pub(crate) fn clamp_dimension(value: u8) -> u8 {
    value.clamp(DIMENSION_RANGE.0, DIMENSION_RANGE.1)
}

fn sanitize_dimension(value: u8, name: &str) -> u8 {
    let clamped = clamp_dimension(value);
    if clamped != value {
        eprintln!(
            "⚠️ {} {} 超出有效范围[{}, {}]，已调整为 {}",
            name, value, DIMENSION_RANGE.0, DIMENSION_RANGE.1, clamped
        );
    }
    if clamped > DIMENSION_SOFT_LIMIT {
        eprintln!(
            "⚠️ {} {} 大于{}，研究树规模会迅速膨胀，建议不超过{}",
            name, clamped, DIMENSION_SOFT_LIMIT, DIMENSION_SOFT_LIMIT
        );
    }
    clamped
}

/// 执行整个调研流程，返回合并去重后的研究发现与预算状态。
/// 单分支失败不会上抛，全部失败时返回全空结果，调用方应视为"没有发现"
pub async fn execute(context: &ResearchContext) -> Result<ResearchOutcome> {
    let research_config = &context.config.research;

    let depth = sanitize_dimension(research_config.depth, "深度");
    let breadth = sanitize_dimension(research_config.breadth, "宽度");

    println!("🚀 开始执行Argus深度调研流程...");
    println!("   主题: {}", context.config.query);
    println!(
        "   深度: {}，宽度: {}，并发上限: {}",
        depth, breadth, research_config.max_parallels
    );

    let findings = ResearchOrchestrator::research(
        context,
        &context.config.query,
        depth,
        breadth,
        AccumulatedState::default(),
        None,
    )
    .await;

    let budget = context.budget.status();
    if budget.reached {
        println!(
            "⏸️ Token预算已触达（约 {} tokens），研究树提前收束",
            budget.used_tokens
        );
    }

    println!(
        "✓ 调研流程执行完毕，共获得 {} 条研究发现，访问 {} 个来源",
        findings.learnings.len(),
        findings.visited_urls.len()
    );

    Ok(ResearchOutcome { findings, budget })
}
