//! 研究树编排

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use anyhow::Result;
use futures::future::join_all;

use crate::research::agents::query_planner::QueryPlanner;
use crate::research::aggregator::Aggregator;
use crate::research::clamp_dimension;
use crate::research::context::ResearchContext;
use crate::research::processor::ResultProcessor;
use crate::research::progress::ResearchProgress;
use crate::research::types::{BranchResult, ResearchDirection, ResearchQuery};
use crate::search::SearchOptions;

/// 沿递归向下传递的累计研究状态。
/// 跨分支只通过返回不可变值通信，合并始终由父层完成
#[derive(Debug, Clone, Default)]
pub struct AccumulatedState {
    /// 祖先层累计的研究结果
    pub findings: BranchResult,

    /// 供本层规划参考的研究方向
    pub directions: Vec<ResearchDirection>,
}

/// 研究树编排器 - 驱动规划、受限并发分发、加工、递归与合并
pub struct ResearchOrchestrator;

impl ResearchOrchestrator {
    /// 执行一层研究并返回该层合并后的结果。
    /// 单个查询单元的任何失败（检索、加工、递归，含超时）都在该单元内
    /// 被隔离为空结果，本方法自身永不失败
    pub async fn research(
        context: &ResearchContext,
        query: &str,
        depth: u8,
        breadth: u8,
        accumulated: AccumulatedState,
        parent_query: Option<String>,
    ) -> BranchResult {
        // 规划阶段
        let queries = match QueryPlanner::plan(
            context,
            query,
            &accumulated.findings.weighted_learnings,
            &accumulated.directions,
            breadth as usize,
        )
        .await
        {
            Ok(queries) => queries,
            Err(e) => {
                eprintln!("⚠️ 查询规划失败，当前分支终止: {}", e);
                return accumulated.findings;
            }
        };

        if queries.is_empty() {
            return accumulated.findings;
        }

        if context.config.verbose {
            println!("📋 [剩余深度 {}] 规划出 {} 条查询", depth, queries.len());
        }

        // 分发阶段：每条查询是一个独立的失败隔离单元
        let completed = Arc::new(AtomicUsize::new(0));
        let total_queries = queries.len();

        let units = queries.iter().map(|planned| {
            let completed = completed.clone();
            let accumulated = accumulated.clone();
            let parent_query = parent_query.clone();
            async move {
                let _ = context.reporter.report(&Self::progress(
                    context,
                    depth,
                    breadth,
                    completed.load(Ordering::SeqCst),
                    total_queries,
                    Some(planned.text.clone()),
                    parent_query.clone(),
                ));

                let outcome =
                    Self::run_query_unit(context, planned, depth, breadth, &accumulated).await;

                let done = completed.fetch_add(1, Ordering::SeqCst) + 1;
                let _ = context.reporter.report(&Self::progress(
                    context,
                    depth,
                    breadth,
                    done,
                    total_queries,
                    Some(planned.text.clone()),
                    parent_query,
                ));

                match outcome {
                    Ok(branch) => branch,
                    Err(e) => {
                        eprintln!("⚠️ 查询单元执行失败，已隔离: {} ({})", planned.text, e);
                        BranchResult::default()
                    }
                }
            }
        });

        let branches = join_all(units).await;
        Aggregator::merge(branches)
    }

    /// 执行单条查询单元：检索、加工、按需递归。
    /// 全局并发许可只覆盖检索与加工段，向子层展开前即释放，
    /// 避免深层递归互相等待许可造成死锁
    async fn run_query_unit(
        context: &ResearchContext,
        planned: &ResearchQuery,
        depth: u8,
        breadth: u8,
        accumulated: &AccumulatedState,
    ) -> Result<BranchResult> {
        let research_config = &context.config.research;

        let processed = {
            let _permit = context.limiter.acquire().await?;

            let options = if planned.is_verification {
                SearchOptions::verification(&context.config.search)
            } else {
                SearchOptions::standard(&context.config.search)
            };

            let documents = context.search.search(&planned.text, &options).await?;

            ResultProcessor::process(
                context,
                planned,
                documents,
                research_config.num_learnings,
                research_config.num_follow_ups,
            )
            .await?
        };

        // 将本单元的产出折叠进累计状态
        let mut folded = accumulated.findings.clone();
        folded
            .learning_reliabilities
            .extend(processed.weighted_learnings.iter().map(|l| l.reliability));
        folded.learnings.extend(processed.learnings);
        folded
            .visited_urls
            .extend(processed.source_metadata.iter().map(|m| m.url.clone()));
        folded.weighted_learnings.extend(processed.weighted_learnings);
        folded.source_metadata.extend(processed.source_metadata);

        let next_depth = depth.saturating_sub(1);
        if next_depth == 0 {
            return Ok(folded);
        }
        if context.budget.reached() {
            if context.config.verbose {
                println!("⏸️ Token预算已触达，停止向更深层展开: {}", planned.text);
            }
            return Ok(folded);
        }

        // 子层查询折叠父级研究目标与新产生的后续问题，宽度逐层减半
        let child_query =
            Self::build_child_query(&planned.research_goal, &processed.follow_up_questions);

        let directions = processed
            .follow_up_questions
            .iter()
            .zip(processed.follow_up_priorities.iter())
            .map(|(question, priority)| ResearchDirection {
                question: question.clone(),
                priority: *priority,
                parent_goal: Some(planned.research_goal.clone()),
            })
            .collect();

        let child_accumulated = AccumulatedState {
            findings: folded,
            directions,
        };

        let child = Box::pin(Self::research(
            context,
            &child_query,
            next_depth,
            breadth.div_ceil(2),
            child_accumulated,
            Some(planned.text.clone()),
        ))
        .await;

        Ok(child)
    }

    fn build_child_query(research_goal: &str, follow_ups: &[String]) -> String {
        if follow_ups.is_empty() {
            return format!(
                "上一轮研究目标：{}\n请继续深入这一目标下尚未覆盖的方面。",
                research_goal
            );
        }
        format!(
            "上一轮研究目标：{}\n需要继续深入的后续问题：\n{}",
            research_goal,
            follow_ups
                .iter()
                .map(|question| format!("- {}", question))
                .collect::<Vec<_>>()
                .join("\n")
        )
    }

    fn progress(
        context: &ResearchContext,
        depth: u8,
        breadth: u8,
        completed_queries: usize,
        total_queries: usize,
        current_query: Option<String>,
        parent_query: Option<String>,
    ) -> ResearchProgress {
        let total_depth = clamp_dimension(context.config.research.depth);
        let total_breadth = clamp_dimension(context.config.research.breadth);

        ResearchProgress {
            current_depth: total_depth.saturating_sub(depth) + 1,
            total_depth,
            current_breadth: breadth,
            total_breadth,
            completed_queries,
            total_queries,
            current_query,
            parent_query,
        }
    }
}
