//! 研究引擎运行上下文

use std::sync::Arc;

use anyhow::Result;
use tokio::sync::Semaphore;

use crate::config::Config;
use crate::llm::client::LLMClient;
use crate::research::budget::TokenBudget;
use crate::research::collaborators::{ModelService, SearchService};
use crate::research::progress::{ConsoleReporter, ProgressReporter};
use crate::search::SearchClient;

/// 研究引擎运行上下文。
/// 全局并发限制器与Token预算随上下文显式注入整棵研究树，
/// 不使用模块级单例
#[derive(Clone)]
pub struct ResearchContext {
    /// 配置
    pub config: Config,

    /// 模型服务
    pub model: Arc<dyn ModelService>,

    /// 搜索服务
    pub search: Arc<dyn SearchService>,

    /// 进度上报
    pub reporter: Arc<dyn ProgressReporter>,

    /// 全局并发限制器，约束全树同时处于检索与加工阶段的查询单元数
    pub limiter: Arc<Semaphore>,

    /// Token软预算
    pub budget: Arc<TokenBudget>,
}

impl ResearchContext {
    /// 基于配置创建生产环境上下文
    pub fn new(config: Config) -> Result<Self> {
        let model = LLMClient::new(config.clone())?;
        let search = SearchClient::new(config.search.clone())?;
        let reporter = ConsoleReporter::new(config.verbose);
        let limiter = Arc::new(Semaphore::new(config.research.max_parallels.max(1)));
        let budget = Arc::new(TokenBudget::new(config.research.token_budget));

        Ok(Self {
            model: Arc::new(model),
            search: Arc::new(search),
            reporter: Arc::new(reporter),
            limiter,
            budget,
            config,
        })
    }

    /// 使用注入的协作者创建上下文，用于测试替身
    pub fn with_collaborators(
        config: Config,
        model: Arc<dyn ModelService>,
        search: Arc<dyn SearchService>,
        reporter: Arc<dyn ProgressReporter>,
    ) -> Self {
        let limiter = Arc::new(Semaphore::new(config.research.max_parallels.max(1)));
        let budget = Arc::new(TokenBudget::new(config.research.token_budget));

        Self {
            config,
            model,
            search,
            reporter,
            limiter,
            budget,
        }
    }
}
