use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::PathBuf;

use crate::i18n::TargetLanguage;

/// LLM Provider类型
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub enum LLMProvider {
    #[serde(rename = "openai")]
    #[default]
    OpenAI,
    #[serde(rename = "moonshot")]
    Moonshot,
    #[serde(rename = "deepseek")]
    DeepSeek,
    #[serde(rename = "mistral")]
    Mistral,
    #[serde(rename = "openrouter")]
    OpenRouter,
    #[serde(rename = "anthropic")]
    Anthropic,
    #[serde(rename = "gemini")]
    Gemini,
    #[serde(rename = "ollama")]
    Ollama,
}

impl std::fmt::Display for LLMProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LLMProvider::OpenAI => write!(f, "openai"),
            LLMProvider::Moonshot => write!(f, "moonshot"),
            LLMProvider::DeepSeek => write!(f, "deepseek"),
            LLMProvider::Mistral => write!(f, "mistral"),
            LLMProvider::OpenRouter => write!(f, "openrouter"),
            LLMProvider::Anthropic => write!(f, "anthropic"),
            LLMProvider::Gemini => write!(f, "gemini"),
            LLMProvider::Ollama => write!(f, "ollama"),
        }
    }
}

impl std::str::FromStr for LLMProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "openai" => Ok(LLMProvider::OpenAI),
            "moonshot" => Ok(LLMProvider::Moonshot),
            "deepseek" => Ok(LLMProvider::DeepSeek),
            "mistral" => Ok(LLMProvider::Mistral),
            "openrouter" => Ok(LLMProvider::OpenRouter),
            "anthropic" => Ok(LLMProvider::Anthropic),
            "gemini" => Ok(LLMProvider::Gemini),
            "ollama" => Ok(LLMProvider::Ollama),
            _ => Err(format!("Unknown provider: {}", s)),
        }
    }
}

/// 搜索服务Provider类型
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub enum SearchProvider {
    #[serde(rename = "searxng")]
    #[default]
    SearxNG,
    #[serde(rename = "tavily")]
    Tavily,
    #[serde(rename = "firecrawl")]
    Firecrawl,
}

impl std::fmt::Display for SearchProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SearchProvider::SearxNG => write!(f, "searxng"),
            SearchProvider::Tavily => write!(f, "tavily"),
            SearchProvider::Firecrawl => write!(f, "firecrawl"),
        }
    }
}

impl std::str::FromStr for SearchProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "searxng" => Ok(SearchProvider::SearxNG),
            "tavily" => Ok(SearchProvider::Tavily),
            "firecrawl" => Ok(SearchProvider::Firecrawl),
            _ => Err(format!("Unknown search provider: {}", s)),
        }
    }
}

/// 应用程序配置
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Config {
    /// 调研问题
    pub query: String,

    /// 输出路径
    pub output_path: PathBuf,

    /// 目标语言
    pub target_language: TargetLanguage,

    /// 研究引擎配置
    pub research: ResearchConfig,

    /// LLM模型配置
    pub llm: LLMConfig,

    /// 搜索服务配置
    pub search: SearchConfig,

    /// 跳过最终报告生成，仅输出原始研究发现
    pub skip_report: bool,

    /// 是否启用详细日志
    pub verbose: bool,
}

/// 研究引擎配置
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ResearchConfig {
    /// 研究树递归深度（1-5）
    pub depth: u8,

    /// 首层规划的搜索查询数量（1-5），每递归一层减半
    pub breadth: u8,

    /// 全局并发上限，限制同时处于检索与加工阶段的查询单元数
    pub max_parallels: usize,

    /// 每个节点提炼的最大研究发现数
    pub num_learnings: usize,

    /// 每个节点生成的最大后续问题数
    pub num_follow_ups: usize,

    /// 默认的来源可靠性过滤阈值
    pub default_reliability_threshold: f64,

    /// 验证型查询的来源可靠性过滤阈值
    pub verification_reliability_threshold: f64,

    /// Token软预算，0表示不限制。超出后停止继续递归，不中断进行中的工作
    pub token_budget: u64,

    /// 来源偏好，用于引导来源可靠性评估
    pub source_preferences: Option<String>,
}

/// LLM模型配置
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LLMConfig {
    /// LLM Provider类型
    pub provider: LLMProvider,

    /// LLM API KEY
    pub api_key: String,

    /// LLM API基地址
    pub api_base_url: String,

    /// 高能效模型，优先用于Argus引擎的常规推理任务
    pub model_efficient: String,

    /// 高质量模型，优先用于Argus引擎的复杂推理任务，以及作为efficient失效情况下的兜底
    pub model_powerful: String,

    /// 最大tokens
    pub max_tokens: u32,

    /// 温度
    pub temperature: f64,

    /// 重试次数
    pub retry_attempts: u32,

    /// 重试间隔（毫秒）
    pub retry_delay_ms: u64,

    /// 超时时间（秒）
    pub timeout_seconds: u64,
}

/// 搜索服务配置
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SearchConfig {
    /// 搜索服务Provider类型
    pub provider: SearchProvider,

    /// 搜索服务API KEY（SearxNG无需配置）
    pub api_key: String,

    /// 搜索服务API基地址
    pub api_base_url: String,

    /// 单次搜索超时时间（秒）
    pub timeout_seconds: u64,

    /// 常规查询返回的结果数量
    pub result_limit: usize,

    /// 验证型查询返回的结果数量
    pub verification_result_limit: usize,

    /// 期望的内容格式，目前仅Firecrawl支持
    pub formats: Vec<String>,
}

impl Config {
    /// 从文件加载配置
    pub fn from_file(path: &PathBuf) -> Result<Self> {
        let mut file =
            File::open(path).context(format!("Failed to open config file: {:?}", path))?;
        let mut content = String::new();
        file.read_to_string(&mut content)
            .context("Failed to read config file")?;

        let config: Config = toml::from_str(&content).context("Failed to parse config file")?;
        Ok(config)
    }

    /// 启动前的配置校验，配置缺失直接失败，不进入研究流程
    pub fn validate(&self) -> Result<()> {
        if self.query.trim().is_empty() {
            anyhow::bail!("未指定调研问题，请通过命令行参数或配置文件提供");
        }

        if self.llm.api_key.trim().is_empty() && self.llm.provider != LLMProvider::Ollama {
            anyhow::bail!(
                "LLM API KEY未配置，请设置环境变量ARGUS_LLM_API_KEY或在配置文件中指定（provider: {}）",
                self.llm.provider
            );
        }

        match self.search.provider {
            SearchProvider::SearxNG => {}
            SearchProvider::Tavily | SearchProvider::Firecrawl => {
                if self.search.api_key.trim().is_empty() {
                    anyhow::bail!(
                        "搜索服务API KEY未配置，请设置环境变量ARGUS_SEARCH_API_KEY或在配置文件中指定（provider: {}）",
                        self.search.provider
                    );
                }
            }
        }

        if self.search.api_base_url.trim().is_empty() {
            anyhow::bail!("搜索服务API基地址未配置");
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            query: String::new(),
            output_path: PathBuf::from("./argus.report"),
            target_language: TargetLanguage::default(),
            research: ResearchConfig::default(),
            llm: LLMConfig::default(),
            search: SearchConfig::default(),
            skip_report: false,
            verbose: false,
        }
    }
}

impl Default for ResearchConfig {
    fn default() -> Self {
        Self {
            depth: 2,
            breadth: 4,
            max_parallels: 3,
            num_learnings: 3,
            num_follow_ups: 3,
            default_reliability_threshold: 0.5,
            verification_reliability_threshold: 0.8,
            token_budget: 0,
            source_preferences: None,
        }
    }
}

impl Default for LLMConfig {
    fn default() -> Self {
        Self {
            provider: LLMProvider::default(),
            api_key: std::env::var("ARGUS_LLM_API_KEY").unwrap_or_default(),
            api_base_url: String::from("https://api-inference.modelscope.cn/v1"),
            model_efficient: String::from("Qwen/Qwen3-Next-80B-A3B-Instruct"),
            model_powerful: String::from("Qwen/Qwen3-235B-A22B-Instruct-2507"),
            max_tokens: 131072,
            temperature: 0.1,
            retry_attempts: 5,
            retry_delay_ms: 5000,
            timeout_seconds: 300,
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            provider: SearchProvider::default(),
            api_key: std::env::var("ARGUS_SEARCH_API_KEY").unwrap_or_default(),
            api_base_url: String::from("http://localhost:8080"),
            timeout_seconds: 15,
            result_limit: 5,
            verification_result_limit: 8,
            formats: vec!["markdown".to_string()],
        }
    }
}

// Include tests
#[cfg(test)]
mod tests;
