//! Token软预算跟踪

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

use crate::llm::client::types::TokenUsage;

/// 研究树共享的Token软预算。
/// 预算只在递归决策点检查：超出后不再展开新的子层，
/// 进行中的工作照常完成，报告合成阶段不计入
pub struct TokenBudget {
    /// 预算上限，0表示不限制
    cap: u64,
    used: AtomicU64,
}

impl TokenBudget {
    pub fn new(cap: u64) -> Self {
        Self {
            cap,
            used: AtomicU64::new(0),
        }
    }

    /// 记录一次模型调用的用量
    pub fn record(&self, usage: &TokenUsage) {
        self.used.fetch_add(usage.total() as u64, Ordering::Relaxed);
    }

    /// 预算是否已触达。用量等于上限时即视为触达
    pub fn reached(&self) -> bool {
        self.cap != 0 && self.used.load(Ordering::Relaxed) >= self.cap
    }

    /// 当前累计用量
    pub fn used_tokens(&self) -> u64 {
        self.used.load(Ordering::Relaxed)
    }

    /// 生成当前预算状态快照
    pub fn status(&self) -> BudgetStatus {
        BudgetStatus {
            used_tokens: self.used_tokens(),
            budget_tokens: (self.cap != 0).then_some(self.cap),
            reached: self.reached(),
        }
    }
}

/// 预算状态快照，随研究总结果返回给调用方
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct BudgetStatus {
    /// 累计使用的Token数（估算值）
    pub used_tokens: u64,

    /// 预算上限，无限制时为None
    pub budget_tokens: Option<u64>,

    /// 预算是否已触达
    pub reached: bool,
}
