//! 搜索服务客户端 - 提供统一的网络搜索接口

use std::time::Duration;

use anyhow::Result;

use crate::config::{SearchConfig, SearchProvider};

mod providers;

/// 单次搜索请求的选项
#[derive(Debug, Clone)]
pub struct SearchOptions {
    /// 本次搜索返回的最大结果数
    pub result_limit: usize,

    /// 期望抓取的内容格式，仅部分Provider支持
    pub formats: Vec<String>,
}

impl SearchOptions {
    /// 从搜索配置构建常规查询的选项
    pub fn standard(config: &SearchConfig) -> Self {
        Self {
            result_limit: config.result_limit,
            formats: config.formats.clone(),
        }
    }

    /// 从搜索配置构建验证型查询的选项，验证型查询需要更宽的结果窗口
    pub fn verification(config: &SearchConfig) -> Self {
        Self {
            result_limit: config.verification_result_limit,
            formats: config.formats.clone(),
        }
    }
}

/// 搜索返回的单篇文档
#[derive(Debug, Clone, PartialEq)]
pub struct SearchDocument {
    /// 文档URL
    pub url: String,

    /// 文档标题
    pub title: Option<String>,

    /// 文档内容摘录
    pub content: Option<String>,
}

/// 搜索服务错误
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// 网络请求失败
    #[error("搜索请求失败: {0}")]
    Http(#[from] reqwest::Error),

    /// 搜索服务返回非成功状态码
    #[error("搜索服务返回异常状态 {status}: {body}")]
    Status { status: u16, body: String },

    /// 响应体解析失败
    #[error("搜索结果解析失败: {0}")]
    Decode(#[from] serde_json::Error),
}

/// 搜索客户端，按配置分发到具体的搜索Provider
#[derive(Clone)]
pub struct SearchClient {
    config: SearchConfig,
    http: reqwest::Client,
}

impl SearchClient {
    /// 创建新的搜索客户端
    pub fn new(config: SearchConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;
        Ok(Self { config, http })
    }

    /// 执行一次网络搜索，返回结构化文档列表
    pub async fn search(
        &self,
        query: &str,
        options: &SearchOptions,
    ) -> Result<Vec<SearchDocument>, SearchError> {
        match self.config.provider {
            SearchProvider::SearxNG => {
                providers::search_searxng(&self.http, &self.config, query, options).await
            }
            SearchProvider::Tavily => {
                providers::search_tavily(&self.http, &self.config, query, options).await
            }
            SearchProvider::Firecrawl => {
                providers::search_firecrawl(&self.http, &self.config, query, options).await
            }
        }
    }
}
