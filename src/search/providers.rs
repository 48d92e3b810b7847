//! 搜索Provider支持模块

use serde::{Deserialize, Serialize};

use super::{SearchDocument, SearchError, SearchOptions};
use crate::config::SearchConfig;

/// SearxNG搜索响应
#[derive(Debug, Deserialize)]
pub(crate) struct SearxngResponse {
    #[serde(default)]
    pub results: Vec<SearxngResult>,
}

/// SearxNG单条结果
#[derive(Debug, Deserialize)]
pub(crate) struct SearxngResult {
    pub url: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

/// Tavily搜索请求体
#[derive(Debug, Serialize)]
pub(crate) struct TavilySearchRequest {
    pub query: String,
    pub max_results: usize,
    pub search_depth: String,
    pub include_raw_content: bool,
}

/// Tavily搜索响应
#[derive(Debug, Deserialize)]
pub(crate) struct TavilySearchResponse {
    #[serde(default)]
    pub results: Vec<TavilyResult>,
}

/// Tavily单条结果
#[derive(Debug, Deserialize)]
pub(crate) struct TavilyResult {
    pub url: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

/// Firecrawl搜索请求体
#[derive(Debug, Serialize)]
pub(crate) struct FirecrawlSearchRequest {
    pub query: String,
    pub limit: usize,
    #[serde(rename = "scrapeOptions")]
    pub scrape_options: FirecrawlScrapeOptions,
}

/// Firecrawl抓取选项
#[derive(Debug, Serialize)]
pub(crate) struct FirecrawlScrapeOptions {
    pub formats: Vec<String>,
}

/// Firecrawl搜索响应
#[derive(Debug, Deserialize)]
pub(crate) struct FirecrawlSearchResponse {
    #[serde(default)]
    pub data: Vec<FirecrawlSearchItem>,
}

/// Firecrawl单条结果
#[derive(Debug, Deserialize)]
pub(crate) struct FirecrawlSearchItem {
    pub url: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub markdown: Option<String>,
}

/// 读取响应体，非成功状态码转换为错误
async fn read_success_body(response: reqwest::Response) -> Result<String, SearchError> {
    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
        return Err(SearchError::Status {
            status: status.as_u16(),
            body,
        });
    }
    Ok(body)
}

/// 空白字符串归一化为None
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

fn endpoint(base_url: &str, path: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), path)
}

/// 调用SearxNG实例检索
pub(crate) async fn search_searxng(
    http: &reqwest::Client,
    config: &SearchConfig,
    query: &str,
    options: &SearchOptions,
) -> Result<Vec<SearchDocument>, SearchError> {
    let response = http
        .get(endpoint(&config.api_base_url, "/search"))
        .query(&[("q", query), ("format", "json")])
        .send()
        .await?;

    let body = read_success_body(response).await?;
    parse_searxng(&body, options.result_limit)
}

/// 解析SearxNG响应。SearxNG不接受结果条数参数，在客户端侧截断
pub(crate) fn parse_searxng(
    body: &str,
    result_limit: usize,
) -> Result<Vec<SearchDocument>, SearchError> {
    let response: SearxngResponse = serde_json::from_str(body)?;
    Ok(response
        .results
        .into_iter()
        .filter(|r| !r.url.trim().is_empty())
        .take(result_limit)
        .map(|r| SearchDocument {
            url: r.url,
            title: non_empty(r.title),
            content: non_empty(r.content),
        })
        .collect())
}

/// 调用Tavily检索
pub(crate) async fn search_tavily(
    http: &reqwest::Client,
    config: &SearchConfig,
    query: &str,
    options: &SearchOptions,
) -> Result<Vec<SearchDocument>, SearchError> {
    let request = TavilySearchRequest {
        query: query.to_string(),
        max_results: options.result_limit,
        search_depth: "basic".to_string(),
        include_raw_content: false,
    };

    let response = http
        .post(endpoint(&config.api_base_url, "/search"))
        .bearer_auth(&config.api_key)
        .json(&request)
        .send()
        .await?;

    let body = read_success_body(response).await?;
    parse_tavily(&body)
}

/// 解析Tavily响应
pub(crate) fn parse_tavily(body: &str) -> Result<Vec<SearchDocument>, SearchError> {
    let response: TavilySearchResponse = serde_json::from_str(body)?;
    Ok(response
        .results
        .into_iter()
        .filter(|r| !r.url.trim().is_empty())
        .map(|r| SearchDocument {
            url: r.url,
            title: non_empty(r.title),
            content: non_empty(r.content),
        })
        .collect())
}

/// 调用Firecrawl检索，formats选项仅该Provider支持
pub(crate) async fn search_firecrawl(
    http: &reqwest::Client,
    config: &SearchConfig,
    query: &str,
    options: &SearchOptions,
) -> Result<Vec<SearchDocument>, SearchError> {
    let request = FirecrawlSearchRequest {
        query: query.to_string(),
        limit: options.result_limit,
        scrape_options: FirecrawlScrapeOptions {
            formats: options.formats.clone(),
        },
    };

    let response = http
        .post(endpoint(&config.api_base_url, "/v1/search"))
        .bearer_auth(&config.api_key)
        .json(&request)
        .send()
        .await?;

    let body = read_success_body(response).await?;
    parse_firecrawl(&body)
}

/// 解析Firecrawl响应，内容优先取markdown，缺失时回退到摘要
pub(crate) fn parse_firecrawl(body: &str) -> Result<Vec<SearchDocument>, SearchError> {
    let response: FirecrawlSearchResponse = serde_json::from_str(body)?;
    Ok(response
        .data
        .into_iter()
        .filter(|r| !r.url.trim().is_empty())
        .map(|r| {
            let content = non_empty(r.markdown).or_else(|| non_empty(r.description));
            SearchDocument {
                url: r.url,
                title: non_empty(r.title),
                content,
            }
        })
        .collect())
}
