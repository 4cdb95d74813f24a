//! Writing assistant backed by a text-completion API
//!
//! Every operation is best effort: a disabled assistant, a failed request,
//! or a reply that does not have the expected shape all yield `None`.

mod client;

pub use client::{AssistantError, ChatClient, CompletionClient};

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::config::AssistantConfig;
use crate::content::{Platform, Post, SocialDraft};

const SYSTEM_PROMPT: &str =
    "You are a friendly writing coach helping the author of a personal blog.";

/// Number of daily writing prompts requested
const DAILY_PROMPTS: usize = 3;

/// Per-platform social copy for one post
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentPlan {
    pub twitter: String,
    pub linkedin: String,
    pub instagram: String,
    pub facebook: String,
}

impl ContentPlan {
    pub fn get(&self, platform: Platform) -> &str {
        match platform {
            Platform::Twitter => &self.twitter,
            Platform::Linkedin => &self.linkedin,
            Platform::Instagram => &self.instagram,
            Platform::Facebook => &self.facebook,
        }
    }

    /// One draft per platform with non-empty copy
    pub fn into_drafts(self, post_id: Option<uuid::Uuid>, now: DateTime<Utc>) -> Vec<SocialDraft> {
        Platform::ALL
            .iter()
            .filter_map(|&platform| {
                let content = self.get(platform).trim();
                (!content.is_empty())
                    .then(|| SocialDraft::new(platform, content.to_string(), post_id, now))
            })
            .collect()
    }
}

/// The writing assistant
#[derive(Clone)]
pub struct Assistant {
    client: Option<Arc<dyn CompletionClient>>,
}

impl Assistant {
    /// Build from configuration; disabled when no API key is set
    pub fn from_config(config: &AssistantConfig) -> Self {
        if !config.enabled() {
            tracing::debug!("Assistant disabled: no API key configured");
            return Self::disabled();
        }
        match ChatClient::new(config) {
            Ok(client) => Self::with_client(Arc::new(client)),
            Err(e) => {
                tracing::warn!("Assistant disabled: {}", e);
                Self::disabled()
            }
        }
    }

    pub fn with_client(client: Arc<dyn CompletionClient>) -> Self {
        Self {
            client: Some(client),
        }
    }

    pub fn disabled() -> Self {
        Self { client: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.client.is_some()
    }

    /// Short writing prompts for today
    pub async fn daily_prompts(&self) -> Option<Vec<String>> {
        let prompt = format!(
            "Suggest {} short, specific blog writing prompts for today. \
             Reply with a JSON array of strings only.",
            DAILY_PROMPTS
        );
        let reply = self.ask(&prompt).await?;
        let prompts: Vec<String> = parse_json(&reply)?;
        let prompts: Vec<String> = prompts
            .into_iter()
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty())
            .collect();
        (!prompts.is_empty()).then_some(prompts)
    }

    /// Ideas for a new post, optionally around `topic`
    pub async fn content_inspiration(&self, topic: Option<&str>) -> Option<String> {
        let prompt = match topic.map(str::trim).filter(|t| !t.is_empty()) {
            Some(topic) => format!("Give me three fresh angles for a blog post about {}.", topic),
            None => "Give me three fresh ideas for my next blog post.".to_string(),
        };
        self.ask(&prompt).await
    }

    /// Suggested rewrite of a draft
    pub async fn improve_content(&self, content: &str) -> Option<String> {
        if content.trim().is_empty() {
            return None;
        }
        let prompt = format!(
            "Improve the clarity and flow of this blog post draft. \
             Keep the author's voice and markdown formatting. \
             Reply with the revised text only.\n\n{}",
            content
        );
        self.ask(&prompt).await
    }

    /// A short encouraging note for the author
    pub async fn motivational_message(&self) -> Option<String> {
        self.ask("Write one or two sentences encouraging me to keep writing today.")
            .await
    }

    /// Social copy promoting `post` on every platform
    pub async fn content_plan(&self, post: &Post) -> Option<ContentPlan> {
        let prompt = format!(
            "Write social media posts promoting this blog post.\n\
             Title: {}\nExcerpt: {}\n\n\
             Reply with a JSON object with the string keys \
             \"twitter\", \"linkedin\", \"instagram\" and \"facebook\" only.",
            post.title, post.excerpt
        );
        let reply = self.ask(&prompt).await?;
        parse_json(&reply)
    }

    async fn ask(&self, prompt: &str) -> Option<String> {
        let client = self.client.as_ref()?;
        match client.complete(SYSTEM_PROMPT, prompt).await {
            Ok(text) => Some(text),
            Err(e) => {
                tracing::warn!("Assistant request failed: {}", e);
                None
            }
        }
    }
}

/// Remove a surrounding markdown code fence, if any
pub fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string (e.g. "json") on the opening fence line.
    let body = match rest.find('\n') {
        Some(idx) => &rest[idx + 1..],
        None => rest,
    };
    body.trim_end().trim_end_matches("```").trim()
}

fn parse_json<T: DeserializeOwned>(reply: &str) -> Option<T> {
    match serde_json::from_str(strip_code_fences(reply)) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!("Ignoring malformed assistant reply: {}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Replies with a canned answer and records prompts
    struct FakeClient {
        reply: Result<String, ()>,
        prompts: Mutex<Vec<String>>,
    }

    impl FakeClient {
        fn replying(reply: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: Ok(reply.to_string()),
                prompts: Mutex::new(Vec::new()),
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                reply: Err(()),
                prompts: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl CompletionClient for FakeClient {
        async fn complete(&self, _system: &str, prompt: &str) -> Result<String, AssistantError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            self.reply.clone().map_err(|_| AssistantError::EmptyResponse)
        }
    }

    fn post() -> Post {
        crate::store::fallback_posts().remove(0)
    }

    #[test]
    fn test_strip_code_fences() {
        assert_eq!(strip_code_fences("```json\n[\"a\"]\n```"), "[\"a\"]");
        assert_eq!(strip_code_fences("```\n{}\n```\n"), "{}");
        assert_eq!(strip_code_fences("  plain  "), "plain");
    }

    #[tokio::test]
    async fn test_disabled_assistant_yields_none() {
        let assistant = Assistant::from_config(&AssistantConfig::default());
        assert!(!assistant.is_enabled());
        assert_eq!(assistant.daily_prompts().await, None);
        assert_eq!(assistant.motivational_message().await, None);
        assert_eq!(assistant.content_plan(&post()).await, None);
    }

    #[tokio::test]
    async fn test_daily_prompts_parse_fenced_json() {
        let client = FakeClient::replying("```json\n[\"Write about mornings\", \" \", \"A tool you love\"]\n```");
        let assistant = Assistant::with_client(client);
        assert_eq!(
            assistant.daily_prompts().await,
            Some(vec![
                "Write about mornings".to_string(),
                "A tool you love".to_string()
            ])
        );
    }

    #[tokio::test]
    async fn test_malformed_plan_yields_none() {
        let assistant = Assistant::with_client(FakeClient::replying("Sure! Here are some posts"));
        assert_eq!(assistant.content_plan(&post()).await, None);

        let assistant = Assistant::with_client(FakeClient::replying(r#"{"twitter": "hi"}"#));
        assert_eq!(assistant.content_plan(&post()).await, None);
    }

    #[tokio::test]
    async fn test_content_plan_into_drafts() {
        let client = FakeClient::replying(
            r#"{"twitter":"New post!","linkedin":"I wrote about starting a blog.","instagram":"","facebook":"Read it"}"#,
        );
        let assistant = Assistant::with_client(client.clone());
        let post = post();
        let plan = assistant.content_plan(&post).await.unwrap();
        assert!(client.prompts.lock().unwrap()[0].contains(&post.title));

        let drafts = plan.into_drafts(Some(post.id), Utc::now());
        let platforms: Vec<Platform> = drafts.iter().map(|d| d.platform).collect();
        assert_eq!(
            platforms,
            vec![Platform::Twitter, Platform::Linkedin, Platform::Facebook]
        );
        assert!(drafts.iter().all(|d| d.post_id == Some(post.id)));
    }

    #[tokio::test]
    async fn test_failed_request_yields_none() {
        let assistant = Assistant::with_client(FakeClient::failing());
        assert_eq!(assistant.content_inspiration(Some("travel")).await, None);
        assert_eq!(assistant.improve_content("draft").await, None);
    }

    #[tokio::test]
    async fn test_improve_skips_empty_input() {
        let client = FakeClient::replying("better");
        let assistant = Assistant::with_client(client.clone());
        assert_eq!(assistant.improve_content("   ").await, None);
        assert!(client.prompts.lock().unwrap().is_empty());
        assert_eq!(assistant.improve_content("ok").await, Some("better".to_string()));
    }
}
