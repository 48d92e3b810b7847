//! 检索结果加工

use std::collections::HashMap;

use anyhow::Result;

use crate::research::agents::learning_synthesizer::LearningSynthesizer;
use crate::research::agents::source_evaluator::SourceEvaluator;
use crate::research::context::ResearchContext;
use crate::research::types::{ProcessedResults, ResearchQuery, SourceMetadata};
use crate::search::SearchDocument;
use crate::utils::threads::do_parallel_with_limit;

/// 结果加工器 - 评估来源可信度、排序过滤，再提炼研究发现与后续问题
pub struct ResultProcessor;

impl ResultProcessor {
    /// 将一次检索的原始文档加工为研究发现。
    /// 单个域名评估失败只丢弃对应文档；提炼失败或超时则整体失败，由上层隔离
    pub async fn process(
        context: &ResearchContext,
        query: &ResearchQuery,
        raw_documents: Vec<SearchDocument>,
        num_learnings: usize,
        num_follow_ups: usize,
    ) -> Result<ProcessedResults> {
        // URL无法解析的文档直接跳过
        let documents: Vec<(SearchDocument, String)> = raw_documents
            .into_iter()
            .filter_map(|document| {
                let domain = Self::derive_domain(&document.url)?;
                Some((document, domain))
            })
            .collect();

        if documents.is_empty() {
            return Ok(ProcessedResults::default());
        }

        // 同批文档中每个唯一域名只评估一次，评估结果不跨调用缓存
        let mut unique_domains: Vec<String> = Vec::new();
        for (_, domain) in &documents {
            if !unique_domains.contains(domain) {
                unique_domains.push(domain.clone());
            }
        }

        let evaluations = do_parallel_with_limit(
            unique_domains
                .iter()
                .map(|domain| SourceEvaluator::evaluate(context, domain, &query.text))
                .collect(),
            context.config.research.max_parallels,
        )
        .await;

        let mut assessments = HashMap::new();
        for (domain, evaluation) in unique_domains.iter().zip(evaluations) {
            match evaluation {
                Ok(assessment) => {
                    assessments.insert(domain.clone(), assessment);
                }
                Err(e) => {
                    // 评估失败只丢弃该域名的文档，同批其他文档不受影响
                    eprintln!("⚠️ 来源评估失败，跳过域名 {}: {}", domain, e);
                }
            }
        }

        let mut annotated: Vec<(SearchDocument, SourceMetadata)> = documents
            .into_iter()
            .filter_map(|(document, domain)| {
                let assessment = assessments.get(&domain)?;
                let metadata = SourceMetadata {
                    url: document.url.clone(),
                    domain,
                    title: document.title.clone(),
                    reliability_score: assessment.score,
                    reliability_reasoning: assessment.reasoning.clone(),
                };
                Some((document, metadata))
            })
            .collect();

        // 先按可信度从高到低排序，再应用阈值过滤。
        // 高可信度内容必须排在前面，作为下游提炼的软性优先信号
        annotated.sort_by(|a, b| {
            b.1.reliability_score
                .partial_cmp(&a.1.reliability_score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let source_metadata: Vec<SourceMetadata> =
            annotated.iter().map(|(_, metadata)| metadata.clone()).collect();

        let ranked_contents: Vec<(SourceMetadata, String)> = annotated
            .into_iter()
            .filter(|(_, metadata)| metadata.reliability_score >= query.reliability_threshold)
            .filter_map(|(document, metadata)| {
                // 没有正文的文档无法参与提炼
                let content = document.content?;
                Some((metadata, content))
            })
            .collect();

        if ranked_contents.is_empty() {
            // 没有内容通过可信度过滤，仍返回来源元数据供上层记录
            return Ok(ProcessedResults {
                source_metadata,
                ..Default::default()
            });
        }

        let (weighted_learnings, follow_up_questions, follow_up_priorities) =
            LearningSynthesizer::synthesize(
                context,
                query,
                &ranked_contents,
                num_learnings,
                num_follow_ups,
            )
            .await?;

        Ok(ProcessedResults {
            learnings: weighted_learnings
                .iter()
                .map(|learning| learning.content.clone())
                .collect(),
            follow_up_questions,
            follow_up_priorities,
            source_metadata,
            weighted_learnings,
        })
    }

    /// 从URL解析域名
    fn derive_domain(url: &str) -> Option<String> {
        reqwest::Url::parse(url)
            .ok()
            .and_then(|parsed| parsed.host_str().map(|host| host.to_string()))
    }
}
