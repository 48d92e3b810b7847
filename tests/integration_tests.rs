use std::fs;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use tempfile::TempDir;

use deepdive_rs::config::Config;
use deepdive_rs::i18n::TargetLanguage;
use deepdive_rs::llm::client::types::TokenUsage;
use deepdive_rs::research::collaborators::{
    AssessmentOutput, ModelService, PlannedQuery, QueryPlanOutput, SearchService, SynthesisOutput,
    SynthesizedLearning,
};
use deepdive_rs::research::context::ResearchContext;
use deepdive_rs::research::progress::{ProgressReporter, ResearchProgress};
use deepdive_rs::search::{SearchDocument, SearchOptions};
use deepdive_rs::workflow;

/// 端到端测试用的模型替身
struct MockModel {
    fail_connection: bool,
    compose_calls: AtomicUsize,
}

impl MockModel {
    fn new() -> Self {
        Self {
            fail_connection: false,
            compose_calls: AtomicUsize::new(0),
        }
    }

    fn with_failing_connection() -> Self {
        Self {
            fail_connection: true,
            compose_calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl ModelService for MockModel {
    async fn check_connection(&self) -> Result<()> {
        if self.fail_connection {
            anyhow::bail!("模型服务不可达");
        }
        Ok(())
    }

    async fn plan_queries(
        &self,
        _system_prompt: &str,
        _user_prompt: &str,
    ) -> Result<(QueryPlanOutput, TokenUsage)> {
        Ok((
            QueryPlanOutput {
                queries: vec![
                    PlannedQuery {
                        query: "WebAssembly组件模型 规范".to_string(),
                        research_goal: "梳理组件模型的核心概念".to_string(),
                        reliability_threshold: None,
                        is_verification: Some(false),
                        related_direction: None,
                    },
                    PlannedQuery {
                        query: "WebAssembly组件模型 工具链".to_string(),
                        research_goal: "了解现有工具链支持程度".to_string(),
                        reliability_threshold: None,
                        is_verification: Some(false),
                        related_direction: None,
                    },
                ],
            },
            TokenUsage::new(200, 100),
        ))
    }

    async fn assess_source(
        &self,
        _system_prompt: &str,
        _user_prompt: &str,
    ) -> Result<(AssessmentOutput, TokenUsage)> {
        Ok((
            AssessmentOutput {
                score: 0.9,
                reasoning: "官方规范仓库".to_string(),
            },
            TokenUsage::new(80, 40),
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
                learnings: vec![SynthesizedLearning {
                    content: "组件模型以WIT接口描述语言定义跨语言边界".to_string(),
                    reliability: 0.9,
                }],
                follow_up_questions: Vec::new(),
            },
            TokenUsage::new(300, 150),
        ))
    }

    async fn compose_report(
        &self,
        _system_prompt: &str,
        _user_prompt: &str,
    ) -> Result<(String, TokenUsage)> {
        self.compose_calls.fetch_add(1, Ordering::SeqCst);
        Ok((
            "# 调研报告\n\n组件模型调研结论正文".to_string(),
            TokenUsage::new(500, 800),
        ))
    }
}

struct MockSearch;

#[async_trait]
impl SearchService for MockSearch {
    async fn search(&self, _query: &str, _options: &SearchOptions) -> Result<Vec<SearchDocument>> {
        Ok(vec![SearchDocument {
            url: "https://component-model.example/spec".to_string(),
            title: Some("组件模型规范".to_string()),
            content: Some("WIT接口描述语言的设计文档".to_string()),
        }])
    }
}

struct NullReporter;

impl ProgressReporter for NullReporter {
    fn report(&self, _progress: &ResearchProgress) -> Result<()> {
        Ok(())
    }
}

fn test_config(temp_dir: &TempDir) -> Config {
    let mut config = Config::default();
    config.query = "WebAssembly组件模型的现状".to_string();
    config.output_path = temp_dir.path().join("output");
    config.target_language = TargetLanguage::English;
    config.research.depth = 1;
    config.research.breadth = 2;
    config
}

fn make_context(config: Config, model: Arc<MockModel>) -> ResearchContext {
    ResearchContext::with_collaborators(config, model, Arc::new(MockSearch), Arc::new(NullReporter))
}

#[tokio::test]
async fn test_full_workflow_with_mock_services() {
    let temp_dir = TempDir::new().unwrap();
    let config = test_config(&temp_dir);
    let output_path = config.output_path.clone();
    let model = Arc::new(MockModel::new());
    let context = make_context(config, model.clone());

    let result = workflow::run(&context).await;

    assert!(result.is_ok(), "工作流应当成功完成: {:?}", result.err());
    assert!(output_path.exists());

    let report = fs::read_to_string(output_path.join("1.Research-Report.md")).unwrap();
    assert!(report.contains("组件模型调研结论正文"));

    let learnings = fs::read_to_string(output_path.join("2.Learnings.md")).unwrap();
    assert!(learnings.contains("WIT接口描述语言"));
    assert!(learnings.contains("[置信度 0.90]"));

    let sources = fs::read_to_string(output_path.join("3.Sources.md")).unwrap();
    assert!(sources.contains("https://component-model.example/spec"));
    assert!(sources.contains("官方规范仓库"));

    assert_eq!(model.compose_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_skip_report_outputs_raw_materials_only() {
    let temp_dir = TempDir::new().unwrap();
    let mut config = test_config(&temp_dir);
    config.skip_report = true;
    let output_path = config.output_path.clone();
    let model = Arc::new(MockModel::new());
    let context = make_context(config, model.clone());

    let result = workflow::run(&context).await;

    assert!(result.is_ok());
    assert!(!output_path.join("1.Research-Report.md").exists());
    assert!(output_path.join("2.Learnings.md").exists());
    assert!(output_path.join("3.Sources.md").exists());
    assert_eq!(model.compose_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_workflow_fails_fast_when_model_unreachable() {
    let temp_dir = TempDir::new().unwrap();
    let config = test_config(&temp_dir);
    let output_path = config.output_path.clone();
    let context = make_context(config, Arc::new(MockModel::with_failing_connection()));

    let result = workflow::run(&context).await;

    assert!(result.is_err());
    assert!(!output_path.exists());
}

#[tokio::test]
async fn test_localized_output_filenames_follow_target_language() {
    let temp_dir = TempDir::new().unwrap();
    let mut config = test_config(&temp_dir);
    config.target_language = TargetLanguage::Chinese;
    let output_path = config.output_path.clone();
    let context = make_context(config, Arc::new(MockModel::new()));

    workflow::run(&context).await.unwrap();

    assert!(output_path.join("1、调研报告.md").exists());
    assert!(output_path.join("2、研究发现.md").exists());
    assert!(output_path.join("3、信息来源.md").exists());
}

#[test]
fn test_config_loads_from_toml_file() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("argus.toml");

    let toml_content = r#"query = "量子纠错码的工程进展"
output_path = "./custom.report"
target_language = "en"
skip_report = false
verbose = true

[research]
depth = 3
breadth = 5
max_parallels = 4
num_learnings = 4
num_follow_ups = 2
default_reliability_threshold = 0.6
verification_reliability_threshold = 0.85
token_budget = 500000

[llm]
provider = "openai"
api_key = "test-key"
api_base_url = "https://api.example.com/v1"
model_efficient = "efficient-model"
model_powerful = "powerful-model"
max_tokens = 65536
temperature = 0.2
retry_attempts = 3
retry_delay_ms = 1000
timeout_seconds = 120

[search]
provider = "tavily"
api_key = "search-key"
api_base_url = "https://api.tavily.com"
timeout_seconds = 20
result_limit = 6
verification_result_limit = 10
formats = ["markdown"]
"#;
    fs::write(&config_path, toml_content).unwrap();

    let config = Config::from_file(&config_path).unwrap();

    assert_eq!(config.query, "量子纠错码的工程进展");
    assert_eq!(config.research.depth, 3);
    assert_eq!(config.research.breadth, 5);
    assert_eq!(config.research.token_budget, 500_000);
    assert_eq!(config.llm.model_efficient, "efficient-model");
    assert_eq!(config.search.result_limit, 6);
    assert_eq!(config.target_language, TargetLanguage::English);
    assert!(config.verbose);
    assert!(config.validate().is_ok());
}

#[test]
fn test_config_file_missing_returns_error() {
    let temp_dir = TempDir::new().unwrap();
    let missing_path = temp_dir.path().join("nonexistent.toml");

    let result = Config::from_file(&missing_path);

    assert!(result.is_err());
}
