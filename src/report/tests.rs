#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use anyhow::Result;
    use async_trait::async_trait;
    use tempfile::TempDir;

    use crate::config::Config;
    use crate::i18n::TargetLanguage;
    use crate::llm::client::types::TokenUsage;
    use crate::report::{
        DiskOutlet, DocTree, Outlet, DOC_LEARNINGS, DOC_REPORT, DOC_SOURCES, build_composer_prompt,
        compose, render_learnings, render_sources,
    };
    use crate::research::collaborators::{
        AssessmentOutput, ModelService, QueryPlanOutput, SearchService, SynthesisOutput,
    };
    use crate::research::context::ResearchContext;
    use crate::research::progress::{ProgressReporter, ResearchProgress};
    use crate::research::types::{
        BranchResult, Learning, ResearchOutcome, SourceMetadata,
    };
    use crate::search::{SearchDocument, SearchOptions};

    /// 只服务于报告组装的模型替身
    struct ComposerModel {
        captured_prompts: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl ModelService for ComposerModel {
        async fn check_connection(&self) -> Result<()> {
            Ok(())
        }

        async fn plan_queries(
            &self,
            _system_prompt: &str,
            _user_prompt: &str,
        ) -> Result<(QueryPlanOutput, TokenUsage)> {
            Ok((
                QueryPlanOutput {
                    queries: Vec::new(),
                },
                TokenUsage::new(0, 0),
            ))
        }

        async fn assess_source(
            &self,
            _system_prompt: &str,
            _user_prompt: &str,
        ) -> Result<(AssessmentOutput, TokenUsage)> {
            Ok((
                AssessmentOutput {
                    score: 0.5,
                    reasoning: String::new(),
                },
                TokenUsage::new(0, 0),
            ))
        }

        async fn synthesize_learnings(
            &self,
            _system_prompt: &str,
            _user_prompt: &str,
            _timeout: Duration,
        ) -> Result<(SynthesisOutput, TokenUsage)> {
            Ok((
                SynthesisOutput {
                    learnings: Vec::new(),
                    follow_up_questions: Vec::new(),
                },
                TokenUsage::new(0, 0),
            ))
        }

        async fn compose_report(
            &self,
            _system_prompt: &str,
            user_prompt: &str,
        ) -> Result<(String, TokenUsage)> {
            self.captured_prompts
                .lock()
                .unwrap()
                .push(user_prompt.to_string());
            Ok(("# 调研报告\n\n结论正文".to_string(), TokenUsage::new(100, 200)))
        }
    }

    struct EmptySearch;

    #[async_trait]
    impl SearchService for EmptySearch {
        async fn search(
            &self,
            _query: &str,
            _options: &SearchOptions,
        ) -> Result<Vec<SearchDocument>> {
            Ok(Vec::new())
        }
    }

    struct NullReporter;

    impl ProgressReporter for NullReporter {
        fn report(&self, _progress: &ResearchProgress) -> Result<()> {
            Ok(())
        }
    }

    fn test_config() -> Config {
        let mut config = Config::default();
        config.query = "向量数据库的索引策略对比".to_string();
        config
    }

    fn make_context(config: Config, model: Arc<ComposerModel>) -> ResearchContext {
        ResearchContext::with_collaborators(
            config,
            model,
            Arc::new(EmptySearch),
            Arc::new(NullReporter),
        )
    }

    fn sample_outcome() -> ResearchOutcome {
        ResearchOutcome {
            findings: BranchResult {
                learnings: vec!["低置信度发现".to_string(), "高置信度发现".to_string()],
                learning_reliabilities: vec![0.4, 0.9],
                visited_urls: vec!["https://a.example/doc".to_string()],
                source_metadata: vec![SourceMetadata {
                    url: "https://a.example/doc".to_string(),
                    domain: "a.example".to_string(),
                    title: Some("示例来源".to_string()),
                    reliability_score: 0.75,
                    reliability_reasoning: "领域内常被引用的技术博客".to_string(),
                }],
                weighted_learnings: vec![
                    Learning {
                        content: "低置信度发现".to_string(),
                        reliability: 0.4,
                    },
                    Learning {
                        content: "高置信度发现".to_string(),
                        reliability: 0.9,
                    },
                ],
            },
            budget: Default::default(),
        }
    }

    #[test]
    fn test_composer_prompt_orders_learnings_by_descending_reliability() {
        let model = Arc::new(ComposerModel {
            captured_prompts: Mutex::new(Vec::new()),
        });
        let context = make_context(test_config(), model);

        let prompt = build_composer_prompt(&context, &sample_outcome());

        let high_position = prompt.find("高置信度发现").unwrap();
        let low_position = prompt.find("低置信度发现").unwrap();
        assert!(high_position < low_position);
        assert!(prompt.contains("向量数据库的索引策略对比"));
        assert!(prompt.contains("请使用中文撰写调研报告"));
    }

    #[tokio::test]
    async fn test_compose_returns_model_report() {
        let model = Arc::new(ComposerModel {
            captured_prompts: Mutex::new(Vec::new()),
        });
        let context = make_context(test_config(), model.clone());

        let report = compose(&context, &sample_outcome()).await.unwrap();

        assert!(report.contains("调研报告"));
        assert_eq!(model.captured_prompts.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_render_learnings_lists_reliability_annotations() {
        let content = render_learnings(&test_config(), &sample_outcome());

        assert!(content.contains("# 研究发现"));
        assert!(content.contains("[置信度 0.90]"));
        assert!(content.contains("高置信度发现"));
        assert!(content.contains("共 2 条"));
    }

    #[test]
    fn test_render_learnings_handles_empty_outcome() {
        let outcome = ResearchOutcome {
            findings: BranchResult::default(),
            budget: Default::default(),
        };

        let content = render_learnings(&test_config(), &outcome);

        assert!(content.contains("未能产出任何研究发现"));
    }

    #[test]
    fn test_render_sources_includes_scores_and_reasoning() {
        let content = render_sources(&test_config(), &sample_outcome());

        assert!(content.contains("# 信息来源"));
        assert!(content.contains("## 示例来源"));
        assert!(content.contains("https://a.example/doc"));
        assert!(content.contains("可信度: 0.75"));
        assert!(content.contains("领域内常被引用的技术博客"));
    }

    #[test]
    fn test_render_sources_falls_back_to_url_when_title_missing() {
        let mut outcome = sample_outcome();
        outcome.findings.source_metadata[0].title = None;

        let content = render_sources(&test_config(), &outcome);

        assert!(content.contains("## https://a.example/doc"));
    }

    #[test]
    fn test_doc_tree_maps_localized_filenames() {
        let chinese = DocTree::new(&TargetLanguage::Chinese);
        assert_eq!(
            chinese.structure.get(DOC_REPORT),
            Some(&"1、调研报告.md".to_string())
        );

        let english = DocTree::new(&TargetLanguage::English);
        assert_eq!(
            english.structure.get(DOC_LEARNINGS),
            Some(&"2.Learnings.md".to_string())
        );
        assert_eq!(
            english.structure.get(DOC_SOURCES),
            Some(&"3.Sources.md".to_string())
        );
    }

    #[tokio::test]
    async fn test_disk_outlet_writes_documents() {
        let temp_dir = TempDir::new().unwrap();
        let output_dir = temp_dir.path().join("output");
        let outlet = DiskOutlet::new(DocTree::new(&TargetLanguage::English), output_dir.clone());

        let documents = HashMap::from([
            (DOC_REPORT.to_string(), "报告内容".to_string()),
            (DOC_LEARNINGS.to_string(), "发现内容".to_string()),
            (DOC_SOURCES.to_string(), "来源内容".to_string()),
        ]);

        outlet.save(&documents).await.unwrap();

        let report = std::fs::read_to_string(output_dir.join("1.Research-Report.md")).unwrap();
        assert_eq!(report, "报告内容");
        assert!(output_dir.join("2.Learnings.md").exists());
        assert!(output_dir.join("3.Sources.md").exists());
    }

    #[tokio::test]
    async fn test_disk_outlet_saves_partial_document_set() {
        let temp_dir = TempDir::new().unwrap();
        let output_dir = temp_dir.path().join("output");
        let outlet = DiskOutlet::new(DocTree::new(&TargetLanguage::English), output_dir.clone());

        // 跳过报告组装时文档集只含原始材料
        let documents = HashMap::from([(DOC_SOURCES.to_string(), "来源内容".to_string())]);

        outlet.save(&documents).await.unwrap();

        assert!(output_dir.join("3.Sources.md").exists());
        assert!(!output_dir.join("1.Research-Report.md").exists());
    }

    #[tokio::test]
    async fn test_disk_outlet_skips_unregistered_document_key() {
        let temp_dir = TempDir::new().unwrap();
        let output_dir = temp_dir.path().join("output");
        let outlet = DiskOutlet::new(DocTree::new(&TargetLanguage::English), output_dir.clone());

        let documents = HashMap::from([
            (DOC_REPORT.to_string(), "报告内容".to_string()),
            ("scratch".to_string(), "未注册的文档".to_string()),
        ]);

        outlet.save(&documents).await.unwrap();

        assert!(output_dir.join("1.Research-Report.md").exists());
        let entries: Vec<_> = std::fs::read_dir(&output_dir).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[tokio::test]
    async fn test_disk_outlet_rebuilds_existing_output_dir() {
        let temp_dir = TempDir::new().unwrap();
        let output_dir = temp_dir.path().join("output");
        std::fs::create_dir_all(&output_dir).unwrap();
        std::fs::write(output_dir.join("stale.md"), "上次运行的残留").unwrap();

        let outlet = DiskOutlet::new(DocTree::new(&TargetLanguage::English), output_dir.clone());
        let documents = HashMap::from([(DOC_REPORT.to_string(), "报告内容".to_string())]);

        outlet.save(&documents).await.unwrap();

        assert!(!output_dir.join("stale.md").exists());
        assert!(output_dir.join("1.Research-Report.md").exists());
    }
}
