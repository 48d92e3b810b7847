use crate::config::{Config, LLMProvider, SearchProvider};
use crate::i18n::TargetLanguage;
use clap::Parser;
use std::path::PathBuf;

/// DeepDive-RS - 由Rust与AI驱动的递归式深度调研引擎
#[derive(Parser, Debug)]
#[command(name = "Argus (deepdive-rs)")]
#[command(
    about = "AI-based recursive deep research engine. Given a research question, it plans search queries, scores web sources by reliability, extracts weighted learnings, recurses into follow-up directions, and synthesizes a final research report."
)]
#[command(author = "Sopaco")]
#[command(version)]
pub struct Args {
    /// 调研问题
    pub query: Option<String>,

    /// 配置文件路径
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// 输出路径
    #[arg(short, long)]
    pub output_path: Option<PathBuf>,

    /// 研究树递归深度（1-5）
    #[arg(short, long)]
    pub depth: Option<u8>,

    /// 首层规划的搜索查询数量（1-5）
    #[arg(short, long)]
    pub breadth: Option<u8>,

    /// 全局并发上限
    #[arg(long)]
    pub max_parallels: Option<usize>,

    /// Token软预算，0表示不限制
    #[arg(long)]
    pub token_budget: Option<u64>,

    /// 默认的来源可靠性过滤阈值（0-1）
    #[arg(long)]
    pub reliability_threshold: Option<f64>,

    /// 来源偏好，用于引导来源可靠性评估
    #[arg(long)]
    pub source_preferences: Option<String>,

    /// 是否启用详细日志
    #[arg(short, long)]
    pub verbose: bool,

    /// 跳过最终报告生成，仅输出原始研究发现
    #[arg(long)]
    pub skip_report: bool,

    /// 高能效模型，优先用于Argus引擎的常规推理任务
    #[arg(long)]
    pub model_efficient: Option<String>,

    /// 高质量模型，优先用于Argus引擎的复杂推理任务，以及作为efficient失效情况下的兜底
    #[arg(long)]
    pub model_powerful: Option<String>,

    /// LLM API基地址
    #[arg(long)]
    pub llm_api_base_url: Option<String>,

    /// LLM API KEY
    #[arg(long)]
    pub llm_api_key: Option<String>,

    /// 最大tokens数
    #[arg(long)]
    pub max_tokens: Option<u32>,

    /// 温度参数
    #[arg(long)]
    pub temperature: Option<f64>,

    /// LLM Provider (openai, moonshot, deepseek, mistral, openrouter, anthropic, gemini, ollama)
    #[arg(long)]
    pub llm_provider: Option<String>,

    /// 搜索服务Provider (searxng, tavily, firecrawl)
    #[arg(long)]
    pub search_provider: Option<String>,

    /// 搜索服务API基地址
    #[arg(long)]
    pub search_api_base_url: Option<String>,

    /// 搜索服务API KEY
    #[arg(long)]
    pub search_api_key: Option<String>,

    /// 目标语言 (zh, en, ja, ko, de, fr, ru)
    #[arg(long)]
    pub target_language: Option<String>,
}

impl Args {
    /// 将CLI参数转换为配置
    pub fn into_config(self) -> Config {
        let mut config = if let Some(config_path) = &self.config {
            // 如果显式指定了配置文件路径，从该路径加载
            Config::from_file(config_path).unwrap_or_else(|_| {
                panic!("⚠️ 警告: 无法读取配置文件 {:?}", config_path)
            })
        } else {
            // 如果没有显式指定配置文件，尝试从默认位置加载
            let default_config_path = std::env::current_dir()
                .unwrap_or_else(|_| std::path::PathBuf::from("."))
                .join("argus.toml");

            if default_config_path.exists() {
                Config::from_file(&default_config_path).unwrap_or_else(|_| {
                    panic!(
                        "⚠️ 警告: 无法读取默认配置文件 {:?}",
                        default_config_path
                    )
                })
            } else {
                // 默认配置文件不存在，使用默认值
                Config::default()
            }
        };

        // 调研问题：CLI参数优先级最高
        if let Some(query) = self.query {
            config.query = query;
        }
        if let Some(output_path) = self.output_path {
            config.output_path = output_path;
        }

        // 覆盖研究引擎配置
        if let Some(depth) = self.depth {
            config.research.depth = depth;
        }
        if let Some(breadth) = self.breadth {
            config.research.breadth = breadth;
        }
        if let Some(max_parallels) = self.max_parallels {
            config.research.max_parallels = max_parallels;
        }
        if let Some(token_budget) = self.token_budget {
            config.research.token_budget = token_budget;
        }
        if let Some(reliability_threshold) = self.reliability_threshold {
            config.research.default_reliability_threshold = reliability_threshold.clamp(0.0, 1.0);
        }
        if let Some(source_preferences) = self.source_preferences {
            config.research.source_preferences = Some(source_preferences);
        }

        // 覆盖LLM配置
        if let Some(provider_str) = self.llm_provider {
            if let Ok(provider) = provider_str.parse::<LLMProvider>() {
                config.llm.provider = provider;
            } else {
                eprintln!(
                    "⚠️ 警告: 未知的provider: {}，使用默认provider",
                    provider_str
                );
            }
        }
        if let Some(llm_api_base_url) = self.llm_api_base_url {
            config.llm.api_base_url = llm_api_base_url;
        }
        if let Some(llm_api_key) = self.llm_api_key {
            config.llm.api_key = llm_api_key;
        }
        if let Some(model_efficient) = self.model_efficient {
            config.llm.model_efficient = model_efficient;
        }
        if let Some(model_powerful) = self.model_powerful {
            config.llm.model_powerful = model_powerful;
        }
        if let Some(max_tokens) = self.max_tokens {
            config.llm.max_tokens = max_tokens;
        }
        if let Some(temperature) = self.temperature {
            config.llm.temperature = temperature;
        }

        // 覆盖搜索服务配置
        if let Some(provider_str) = self.search_provider {
            if let Ok(provider) = provider_str.parse::<SearchProvider>() {
                config.search.provider = provider;
            } else {
                eprintln!(
                    "⚠️ 警告: 未知的搜索provider: {}，使用默认provider",
                    provider_str
                );
            }
        }
        if let Some(search_api_base_url) = self.search_api_base_url {
            config.search.api_base_url = search_api_base_url;
        }
        if let Some(search_api_key) = self.search_api_key {
            config.search.api_key = search_api_key;
        }

        // 目标语言配置
        if let Some(target_language_str) = self.target_language {
            if let Ok(target_language) = target_language_str.parse::<TargetLanguage>() {
                config.target_language = target_language;
            } else {
                eprintln!(
                    "⚠️ 警告: 未知的目标语言: {}，使用默认语言",
                    target_language_str
                );
            }
        }

        // 其他配置
        if self.skip_report {
            config.skip_report = true;
        }
        if self.verbose {
            config.verbose = true;
        }

        config
    }
}
