//! 研究进度观测

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// 研究进度快照，仅用于观测与展示，绝不参与控制决策
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResearchProgress {
    /// 当前所在深度（从1开始计数）
    pub current_depth: u8,

    /// 研究树总深度
    pub total_depth: u8,

    /// 当前层的查询宽度
    pub current_breadth: u8,

    /// 首层查询宽度
    pub total_breadth: u8,

    /// 当前层已完成的查询数
    pub completed_queries: usize,

    /// 当前层的查询总数
    pub total_queries: usize,

    /// 正在执行的查询文本
    pub current_query: Option<String>,

    /// 父级查询文本
    pub parent_query: Option<String>,
}

/// 进度上报接口。调用方以fire-and-forget方式使用，
/// 上报失败由调用侧直接丢弃，不得传导进研究流程
pub trait ProgressReporter: Send + Sync {
    fn report(&self, progress: &ResearchProgress) -> Result<()>;
}

/// 控制台进度报告器
pub struct ConsoleReporter {
    verbose: bool,
}

impl ConsoleReporter {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }
}

impl ProgressReporter for ConsoleReporter {
    fn report(&self, progress: &ResearchProgress) -> Result<()> {
        if !self.verbose {
            return Ok(());
        }

        let query = progress.current_query.as_deref().unwrap_or("-");
        println!(
            "🔍 [深度 {}/{}] [本层进度 {}/{}] {}",
            progress.current_depth,
            progress.total_depth,
            progress.completed_queries,
            progress.total_queries,
            query
        );
        Ok(())
    }
}
