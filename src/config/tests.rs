#[cfg(test)]
mod tests {
    use crate::config::{Config, LLMConfig, LLMProvider, ResearchConfig, SearchConfig, SearchProvider};
    use crate::i18n::TargetLanguage;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[test]
    fn test_config_default() {
        let config = Config::default();

        assert!(config.query.is_empty());
        assert_eq!(config.output_path, PathBuf::from("./argus.report"));
        assert_eq!(config.target_language, TargetLanguage::Chinese);
        assert!(!config.skip_report);
        assert!(!config.verbose);
    }

    #[test]
    fn test_research_config_default() {
        let config = ResearchConfig::default();

        assert_eq!(config.depth, 2);
        assert_eq!(config.breadth, 4);
        assert_eq!(config.max_parallels, 3);
        assert_eq!(config.num_learnings, 3);
        assert_eq!(config.num_follow_ups, 3);
        assert_eq!(config.default_reliability_threshold, 0.5);
        assert_eq!(config.verification_reliability_threshold, 0.8);
        assert_eq!(config.token_budget, 0);
        assert!(config.source_preferences.is_none());
    }

    #[test]
    fn test_llm_provider_default() {
        let provider = LLMProvider::default();
        assert_eq!(provider, LLMProvider::OpenAI);
    }

    #[test]
    fn test_llm_provider_from_str() {
        assert_eq!(
            "openai".parse::<LLMProvider>().unwrap(),
            LLMProvider::OpenAI
        );
        assert_eq!(
            "moonshot".parse::<LLMProvider>().unwrap(),
            LLMProvider::Moonshot
        );
        assert_eq!(
            "deepseek".parse::<LLMProvider>().unwrap(),
            LLMProvider::DeepSeek
        );
        assert_eq!(
            "mistral".parse::<LLMProvider>().unwrap(),
            LLMProvider::Mistral
        );
        assert_eq!(
            "openrouter".parse::<LLMProvider>().unwrap(),
            LLMProvider::OpenRouter
        );
        assert_eq!(
            "anthropic".parse::<LLMProvider>().unwrap(),
            LLMProvider::Anthropic
        );
        assert_eq!(
            "gemini".parse::<LLMProvider>().unwrap(),
            LLMProvider::Gemini
        );
        assert_eq!(
            "ollama".parse::<LLMProvider>().unwrap(),
            LLMProvider::Ollama
        );

        assert!("invalid".parse::<LLMProvider>().is_err());
    }

    #[test]
    fn test_search_provider_from_str() {
        assert_eq!(
            "searxng".parse::<SearchProvider>().unwrap(),
            SearchProvider::SearxNG
        );
        assert_eq!(
            "tavily".parse::<SearchProvider>().unwrap(),
            SearchProvider::Tavily
        );
        assert_eq!(
            "firecrawl".parse::<SearchProvider>().unwrap(),
            SearchProvider::Firecrawl
        );

        assert!("bing".parse::<SearchProvider>().is_err());
    }

    #[test]
    fn test_search_provider_display() {
        assert_eq!(SearchProvider::SearxNG.to_string(), "searxng");
        assert_eq!(SearchProvider::Tavily.to_string(), "tavily");
        assert_eq!(SearchProvider::Firecrawl.to_string(), "firecrawl");
    }

    #[test]
    fn test_llm_config_default() {
        let config = LLMConfig::default();

        assert_eq!(config.provider, LLMProvider::OpenAI);
        // api_key may be empty if env var is not set
        assert!(!config.api_base_url.is_empty());
        assert!(!config.model_efficient.is_empty());
        assert!(!config.model_powerful.is_empty());
        assert_eq!(config.max_tokens, 131072);
        assert_eq!(config.temperature, 0.1);
        assert_eq!(config.retry_attempts, 5);
        assert_eq!(config.retry_delay_ms, 5000);
        assert_eq!(config.timeout_seconds, 300);
    }

    #[test]
    fn test_search_config_default() {
        let config = SearchConfig::default();

        assert_eq!(config.provider, SearchProvider::SearxNG);
        assert_eq!(config.api_base_url, "http://localhost:8080");
        assert_eq!(config.timeout_seconds, 15);
        assert_eq!(config.result_limit, 5);
        assert_eq!(config.verification_result_limit, 8);
        assert_eq!(config.formats, vec!["markdown".to_string()]);
    }

    #[test]
    fn test_config_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("argus.toml");

        let config_content = r#"query = "Rust异步运行时的调度原理"
output_path = "./out"
target_language = "en"
skip_report = false
verbose = true

[research]
depth = 3
breadth = 5
max_parallels = 2
num_learnings = 4
num_follow_ups = 2
default_reliability_threshold = 0.6
verification_reliability_threshold = 0.9
token_budget = 200000

[llm]
provider = "deepseek"
api_key = "sk-test"
api_base_url = "https://api.deepseek.com/v1"
model_efficient = "deepseek-chat"
model_powerful = "deepseek-reasoner"
max_tokens = 8192
temperature = 0.2
retry_attempts = 3
retry_delay_ms = 1000
timeout_seconds = 120

[search]
provider = "tavily"
api_key = "tvly-test"
api_base_url = "https://api.tavily.com"
timeout_seconds = 10
result_limit = 4
verification_result_limit = 6
formats = ["markdown"]
"#;

        std::fs::write(&config_path, config_content).unwrap();

        let config = Config::from_file(&config_path).unwrap();

        assert_eq!(config.query, "Rust异步运行时的调度原理");
        assert_eq!(config.output_path, PathBuf::from("./out"));
        assert_eq!(config.target_language, TargetLanguage::English);
        assert!(config.verbose);
        assert_eq!(config.research.depth, 3);
        assert_eq!(config.research.breadth, 5);
        assert_eq!(config.research.token_budget, 200000);
        assert_eq!(config.llm.provider, LLMProvider::DeepSeek);
        assert_eq!(config.llm.model_efficient, "deepseek-chat");
        assert_eq!(config.search.provider, SearchProvider::Tavily);
        assert_eq!(config.search.result_limit, 4);
    }

    #[test]
    fn test_config_from_missing_file() {
        let path = PathBuf::from("/nonexistent/argus.toml");
        assert!(Config::from_file(&path).is_err());
    }

    #[test]
    fn test_validate_requires_query() {
        let mut config = Config::default();
        config.llm.api_key = "sk-test".to_string();

        assert!(config.validate().is_err());

        config.query = "什么是量子计算".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_requires_llm_api_key() {
        let mut config = Config::default();
        config.query = "test".to_string();
        config.llm.api_key = String::new();

        assert!(config.validate().is_err());

        // Ollama runs locally and needs no key
        config.llm.provider = LLMProvider::Ollama;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_requires_search_api_key_for_hosted_providers() {
        let mut config = Config::default();
        config.query = "test".to_string();
        config.llm.api_key = "sk-test".to_string();
        config.search.api_key = String::new();

        // SearxNG is a local backend, no key needed
        config.search.provider = SearchProvider::SearxNG;
        assert!(config.validate().is_ok());

        config.search.provider = SearchProvider::Tavily;
        assert!(config.validate().is_err());

        config.search.api_key = "tvly-test".to_string();
        assert!(config.validate().is_ok());
    }
}
