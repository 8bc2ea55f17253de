//! Gemini article generator.
//!
//! Calls the Google Generative Language REST API and parses the model's JSON
//! answer into a [`BlogPost`]. The model is instructed to emit a single JSON
//! object; stray Markdown code fences around it are stripped before parsing.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{BlogPost, ContentGenerator, GeneratorError};

/// Default generation model.
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";

/// Minimum acceptable article body length in words.
pub const MIN_BODY_WORDS: u32 = 400;

/// Generative Language API base URL.
const BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// The blog-post prompt. `{{KEYWORD}}` is replaced per request.
const BLOG_POST_PROMPT: &str = r#"You are an expert blog post writer and SEO specialist. Your task is to create a high-quality, well-researched, and engaging blog post based on the given keyword. The final output must be suitable for direct copy-pasting into a WordPress editor.

**Keyword:** {{KEYWORD}}

**Instructions:**

1. **Minimum Body Length:** The 'body' of the blog post must be at least 400 words. This is crucial for SEO and for providing genuine value to the reader. The TL;DR section does not count towards this word count.
2. **Deep Research:** Before writing, conduct thorough research on the keyword to understand the user's intent and the key sub-topics. Do not just rephrase the keyword; provide fresh, insightful, and factual information.
3. **WordPress Formatting (Markdown):** The 'body' of the post must be formatted in clean, standard Markdown.
    * Use H2 headings (`## Subheading`) for main sections and H3 headings (`### Deeper Dive`) for sub-sections to structure the content logically.
    * Use bullet points (`* `) or numbered lists (`1. `) for lists to make them easy to read.
    * Use bold text (`**text**`) to emphasize key phrases.
    * Ensure paragraphs are well-separated by a blank line for clean formatting.
4. **Structure:**
    * **Title:** Create a catchy, descriptive, and SEO-friendly title.
    * **TLDR:** Write a concise 2-3 sentence summary for the 'tldr' field. **DO NOT** include this in the 'body' field.
    * **Body:**
        * Start the 'body' with a compelling introduction that grabs the reader's attention. Do not add a "TLDR" or "Summary" section at the start of the body.
        * Develop the main points in the body, using the formatting rules above.
        * End with a strong conclusion or key takeaways that summarize the main points.

Output the result as a single, valid JSON object with the following structure:
{
  "title": "Your SEO-friendly title here",
  "tldr": "Your 2-3 sentence summary here",
  "body": "Your 400+ word markdown-formatted blog post body here"
}"#;

/// Gemini API client.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl GeminiClient {
    /// Create a new Gemini client.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be built.
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            base_url: BASE_URL.to_string(),
            api_key: api_key.into(),
            model: model.into(),
        }
    }

    /// Override the API base URL (tests).
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }
}

#[async_trait]
impl ContentGenerator for GeminiClient {
    fn approach(&self) -> &str {
        &self.model
    }

    async fn generate(&self, keyword: &str) -> Result<BlogPost, GeneratorError> {
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        );

        let prompt = BLOG_POST_PROMPT.replace("{{KEYWORD}}", keyword);
        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
        };

        let response = self.client.post(&url).json(&request).send().await?;
        let status = response.status();

        if !status.is_success() {
            let message = response
                .json::<GeminiErrorResponse>()
                .await
                .map_or_else(|_| format!("HTTP {status}"), |e| e.error.message);

            return Err(GeneratorError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: GenerateContentResponse = response.json().await?;
        let text = body
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| p.text)
            .ok_or_else(|| GeneratorError::MalformedResponse("no candidates returned".into()))?;

        parse_blog_post(&text)
    }
}

/// Parse the model's answer into a validated [`BlogPost`].
pub(crate) fn parse_blog_post(text: &str) -> Result<BlogPost, GeneratorError> {
    let cleaned = text
        .trim()
        .trim_start_matches("```json")
        .trim_start_matches("```")
        .trim_end_matches("```")
        .trim();

    let post: BlogPost = serde_json::from_str(cleaned)
        .map_err(|e| GeneratorError::MalformedResponse(e.to_string()))?;

    if post.title.is_empty() || post.tldr.is_empty() || post.body.is_empty() {
        return Err(GeneratorError::MalformedResponse(
            "missing title, tldr, or body".into(),
        ));
    }

    let words = post.word_count();
    if words < MIN_BODY_WORDS {
        return Err(GeneratorError::TooShort { words });
    }

    Ok(post)
}

// Request/response wire types

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Content,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorResponse {
    error: GeminiErrorBody,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorBody {
    message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn long_body() -> String {
        "insightful content ".repeat(250).trim_end().to_string()
    }

    fn article_json(body: &str) -> String {
        serde_json::json!({
            "title": "A Complete Guide",
            "tldr": "Two sentences. Maybe three.",
            "body": body
        })
        .to_string()
    }

    #[test]
    fn parse_accepts_plain_json() {
        let post = parse_blog_post(&article_json(&long_body())).unwrap();
        assert_eq!(post.title, "A Complete Guide");
        assert!(post.word_count() >= MIN_BODY_WORDS);
    }

    #[test]
    fn parse_strips_code_fences() {
        let fenced = format!("```json\n{}\n```", article_json(&long_body()));
        let post = parse_blog_post(&fenced).unwrap();
        assert_eq!(post.title, "A Complete Guide");
    }

    #[test]
    fn parse_rejects_non_json() {
        let err = parse_blog_post("Sure! Here's your blog post:").unwrap_err();
        assert!(matches!(err, GeneratorError::MalformedResponse(_)));
    }

    #[test]
    fn parse_rejects_missing_fields() {
        let err = parse_blog_post(r#"{"title": "x", "tldr": "", "body": "y"}"#).unwrap_err();
        assert!(matches!(err, GeneratorError::MalformedResponse(_)));
    }

    #[test]
    fn parse_rejects_short_bodies() {
        let err = parse_blog_post(&article_json("too short")).unwrap_err();
        assert!(matches!(err, GeneratorError::TooShort { words: 2 }));
    }

    #[tokio::test]
    async fn generate_parses_candidate_text() {
        let server = MockServer::start().await;

        let answer = serde_json::json!({
            "candidates": [{
                "content": {
                    "parts": [{ "text": article_json(&long_body()) }]
                }
            }]
        });

        Mock::given(method("POST"))
            .and(path(format!("/models/{DEFAULT_MODEL}:generateContent")))
            .respond_with(ResponseTemplate::new(200).set_body_json(answer))
            .mount(&server)
            .await;

        let client = GeminiClient::new("test-key", DEFAULT_MODEL).with_base_url(server.uri());
        let post = client.generate("rust web frameworks").await.unwrap();

        assert_eq!(post.title, "A Complete Guide");
        assert_eq!(client.approach(), DEFAULT_MODEL);
    }

    #[tokio::test]
    async fn generate_surfaces_provider_errors() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_json(serde_json::json!({
                "error": { "message": "Resource has been exhausted" }
            })))
            .mount(&server)
            .await;

        let client = GeminiClient::new("test-key", DEFAULT_MODEL).with_base_url(server.uri());
        let err = client.generate("rust web frameworks").await.unwrap_err();

        match err {
            GeneratorError::Api { status, message } => {
                assert_eq!(status, 429);
                assert_eq!(message, "Resource has been exhausted");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn generate_rejects_empty_candidates() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "candidates": [] })),
            )
            .mount(&server)
            .await;

        let client = GeminiClient::new("test-key", DEFAULT_MODEL).with_base_url(server.uri());
        let err = client.generate("rust web frameworks").await.unwrap_err();
        assert!(matches!(err, GeneratorError::MalformedResponse(_)));
    }
}
