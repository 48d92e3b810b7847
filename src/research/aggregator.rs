//! 跨分支结果聚合

use std::collections::{HashMap, HashSet};

use crate::research::types::BranchResult;

/// 聚合器 - 合并兄弟分支与递归层级的研究结果并去重。
/// 纯内存计算，没有自身的失败模式
pub struct Aggregator;

impl Aggregator {
    /// 合并多个分支结果。
    ///
    /// learnings、visited_urls、weighted_learnings按值去重，保留首次出现的顺序；
    /// source_metadata按URL去重，同一URL后出现的条目整体覆盖先出现的条目
    /// （last-write-wins，不做字段级合并）
    pub fn merge(branches: Vec<BranchResult>) -> BranchResult {
        let mut merged = BranchResult::default();

        let mut seen_learnings: HashSet<String> = HashSet::new();
        let mut seen_urls: HashSet<String> = HashSet::new();
        let mut seen_weighted: HashSet<(String, u64)> = HashSet::new();
        let mut metadata_slots: HashMap<String, usize> = HashMap::new();

        for branch in branches {
            for (content, reliability) in branch
                .learnings
                .into_iter()
                .zip(branch.learning_reliabilities)
            {
                if seen_learnings.insert(content.clone()) {
                    merged.learnings.push(content);
                    merged.learning_reliabilities.push(reliability);
                }
            }

            for url in branch.visited_urls {
                if seen_urls.insert(url.clone()) {
                    merged.visited_urls.push(url);
                }
            }

            for learning in branch.weighted_learnings {
                let key = (learning.content.clone(), learning.reliability.to_bits());
                if seen_weighted.insert(key) {
                    merged.weighted_learnings.push(learning);
                }
            }

            for metadata in branch.source_metadata {
                match metadata_slots.get(&metadata.url) {
                    Some(&slot) => {
                        // 同一URL后到的条目覆盖先到的
                        merged.source_metadata[slot] = metadata;
                    }
                    None => {
                        metadata_slots.insert(metadata.url.clone(), merged.source_metadata.len());
                        merged.source_metadata.push(metadata);
                    }
                }
            }
        }

        merged
    }
}
