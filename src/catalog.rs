use serde::Serialize;
use serde_json::{Value, json};

/// Model used when an agent or the crew manager leaves the model unset.
pub const DEFAULT_MODEL: &str = "gpt-4-0125-preview";

/// Model selection value that defers to a free-form custom model name.
pub const CUSTOM_MODEL: &str = "custom";

/// Tool type that is emitted as a generic function tool instead of a library class.
pub const CUSTOM_TOOL: &str = "CustomTool";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    OpenAi,
    Anthropic,
    Google,
    Mistral,
    Custom,
}

impl Provider {
    /// Infer the provider from a model id prefix.
    pub fn from_model(model: Option<&str>) -> Self {
        match model {
            Some(m) if m.starts_with("gpt-") => Provider::OpenAi,
            Some(m) if m.starts_with("claude-") => Provider::Anthropic,
            Some(m) if m.starts_with("gemini-") => Provider::Google,
            Some(m) if m.starts_with("mistral-") => Provider::Mistral,
            _ => Provider::Custom,
        }
    }

    pub fn env_var(self) -> &'static str {
        match self {
            Provider::OpenAi => "OPENAI_API_KEY",
            Provider::Anthropic => "ANTHROPIC_API_KEY",
            Provider::Google => "GOOGLE_API_KEY",
            Provider::Mistral => "MISTRAL_API_KEY",
            Provider::Custom => "CUSTOM_API_KEY",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ModelInfo {
    pub id: &'static str,
    pub label: &'static str,
    pub provider: Provider,
}

const fn model(id: &'static str, label: &'static str, provider: Provider) -> ModelInfo {
    ModelInfo {
        id,
        label,
        provider,
    }
}

/// Models offered by the editor's model pickers.
pub const MODELS: &[ModelInfo] = &[
    model("gpt-4-0125-preview", "GPT-4 Turbo (Preview)", Provider::OpenAi),
    model("gpt-4", "GPT-4", Provider::OpenAi),
    model("gpt-3.5-turbo-0125", "GPT-3.5 Turbo", Provider::OpenAi),
    model("claude-3-opus", "Claude 3 Opus", Provider::Anthropic),
    model("claude-3-sonnet", "Claude 3 Sonnet", Provider::Anthropic),
    model("claude-3-haiku", "Claude 3 Haiku", Provider::Anthropic),
    model("claude-2.1", "Claude 2.1", Provider::Anthropic),
    model("gemini-1.0-pro", "Gemini 1.0 Pro", Provider::Google),
    model("gemini-1.0-ultra", "Gemini 1.0 Ultra", Provider::Google),
    model("mistral-large", "Mistral Large", Provider::Mistral),
    model("mistral-medium", "Mistral Medium", Provider::Mistral),
    model("mistral-small", "Mistral Small", Provider::Mistral),
    model(CUSTOM_MODEL, "Custom Model", Provider::Custom),
];

/// A built-in tool class the generated script can import from `crewai_tools`.
#[derive(Debug, Clone, Serialize)]
pub struct ToolSpec {
    pub tool_type: &'static str,
    pub label: &'static str,
    pub description: &'static str,
    pub config_fields: &'static [&'static str],
}

impl ToolSpec {
    /// The configuration the editor pre-fills when this tool type is picked.
    pub fn default_config(&self) -> Value {
        match self.tool_type {
            "BrowserbaseLoadTool" => json!({ "timeout": 30, "headers": {} }),
            "CodeDocsSearchTool" => json!({ "index_path": "", "search_type": "semantic" }),
            "CodeInterpreterTool" => json!({ "timeout": 30, "memory_limit": "512M" }),
            "FileReadTool" => json!({ "file_path": "", "encoding": "utf-8" }),
            "DirectoryReadTool" => json!({ "dir_path": "", "recursive": true }),
            "CSVSearchTool" => json!({ "file_path": "", "delimiter": "," }),
            "DOCXSearchTool" => json!({ "file_path": "" }),
            "JSONSearchTool" => json!({ "file_path": "", "jq_query": "." }),
            "PDFSearchTool" => json!({ "file_path": "", "ocr_enabled": false }),
            "FirecrawlSearchTool" => json!({ "max_results": 10, "timeout": 30 }),
            "FirecrawlCrawlWebsiteTool" => json!({ "max_depth": 3, "timeout": 60 }),
            "FirecrawlScrapeWebsiteTool" => json!({ "selectors": [], "timeout": 30 }),
            "GithubSearchTool" => json!({ "repo": "", "path": "", "branch": "main" }),
            "PGSearchTool" => json!({ "connection_string": "", "query": "" }),
            "DALLETool" => {
                json!({ "model": "dall-e-3", "size": "1024x1024", "quality": "standard" })
            }
            "VisionTool" => json!({ "model": "gpt-4-vision-preview", "max_tokens": 1000 }),
            "YoutubeChannelSearchTool" => json!({ "channel_id": "", "max_results": 50 }),
            "YoutubeVideoSearchTool" => json!({ "video_id": "", "language": "en" }),
            _ => json!({}),
        }
    }
}

const fn tool(
    tool_type: &'static str,
    label: &'static str,
    description: &'static str,
    config_fields: &'static [&'static str],
) -> ToolSpec {
    ToolSpec {
        tool_type,
        label,
        description,
        config_fields,
    }
}

pub const TOOLS: &[ToolSpec] = &[
    tool(
        "BrowserbaseLoadTool",
        "Browser Load Tool",
        "Interact with and extract data from web browsers",
        &["timeout", "headers"],
    ),
    tool(
        "CodeDocsSearchTool",
        "Code Docs Search Tool",
        "Search through code documentation and technical documents",
        &["index_path", "search_type"],
    ),
    tool(
        "CodeInterpreterTool",
        "Code Interpreter Tool",
        "Interpret and execute Python code",
        &["timeout", "memory_limit"],
    ),
    tool(
        "FileReadTool",
        "File Read Tool",
        "Read and extract data from files",
        &["file_path", "encoding"],
    ),
    tool(
        "DirectoryReadTool",
        "Directory Read Tool",
        "Read and process directory structures",
        &["dir_path", "recursive"],
    ),
    tool(
        "CSVSearchTool",
        "CSV Search Tool",
        "Search within CSV files",
        &["file_path", "delimiter"],
    ),
    tool(
        "DOCXSearchTool",
        "DOCX Search Tool",
        "Search within DOCX documents",
        &["file_path"],
    ),
    tool(
        "JSONSearchTool",
        "JSON Search Tool",
        "Search within JSON files",
        &["file_path", "jq_query"],
    ),
    tool(
        "PDFSearchTool",
        "PDF Search Tool",
        "Search within PDF documents",
        &["file_path", "ocr_enabled"],
    ),
    tool(
        "FirecrawlSearchTool",
        "Firecrawl Search Tool",
        "Search webpages using Firecrawl",
        &["max_results", "timeout"],
    ),
    tool(
        "FirecrawlCrawlWebsiteTool",
        "Firecrawl Website Tool",
        "Crawl websites using Firecrawl",
        &["max_depth", "timeout"],
    ),
    tool(
        "FirecrawlScrapeWebsiteTool",
        "Firecrawl Scrape Tool",
        "Scrape websites using Firecrawl",
        &["selectors", "timeout"],
    ),
    tool(
        "GithubSearchTool",
        "GitHub Search Tool",
        "Search within GitHub repositories",
        &["repo", "path", "branch"],
    ),
    tool(
        "PGSearchTool",
        "PostgreSQL Search Tool",
        "Search within PostgreSQL databases",
        &["connection_string", "query"],
    ),
    tool(
        "DALLETool",
        "DALL-E Tool",
        "Generate images using DALL-E",
        &["model", "size", "quality"],
    ),
    tool(
        "VisionTool",
        "Vision Tool",
        "Process and analyze images",
        &["model", "max_tokens"],
    ),
    tool(
        "YoutubeChannelSearchTool",
        "YouTube Channel Search Tool",
        "Search within YouTube channels",
        &["channel_id", "max_results"],
    ),
    tool(
        "YoutubeVideoSearchTool",
        "YouTube Video Search Tool",
        "Search within YouTube videos",
        &["video_id", "language"],
    ),
];

pub fn find_tool(tool_type: &str) -> Option<&'static ToolSpec> {
    TOOLS.iter().find(|spec| spec.tool_type == tool_type)
}

pub fn find_model(id: &str) -> Option<&'static ModelInfo> {
    MODELS.iter().find(|info| info.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_follows_model_prefix() {
        assert_eq!(Provider::from_model(Some("gpt-4")), Provider::OpenAi);
        assert_eq!(Provider::from_model(Some("claude-3-haiku")), Provider::Anthropic);
        assert_eq!(Provider::from_model(Some("gemini-1.0-pro")), Provider::Google);
        assert_eq!(Provider::from_model(Some("mistral-small")), Provider::Mistral);
        assert_eq!(Provider::from_model(Some("llama-3")), Provider::Custom);
        assert_eq!(Provider::from_model(None), Provider::Custom);
    }

    #[test]
    fn catalog_models_agree_with_prefix_inference() {
        for info in MODELS {
            assert_eq!(Provider::from_model(Some(info.id)), info.provider, "{}", info.id);
        }
    }

    #[test]
    fn every_catalog_tool_has_config_for_its_fields() {
        for spec in TOOLS {
            let config = spec.default_config();
            for field in spec.config_fields {
                assert!(config.get(field).is_some(), "{} missing {field}", spec.tool_type);
            }
        }
    }
}
