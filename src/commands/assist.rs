//! Writing assistant commands

use anyhow::Result;
use chrono::Utc;
use std::fs;
use std::path::Path;

use super::post::resolve;
use crate::assistant::Assistant;
use crate::content::SocialDraft;
use crate::store::ContentStore;

/// What to ask the assistant for
#[derive(Debug, Clone)]
pub enum AssistRequest {
    Prompts,
    Inspire { topic: Option<String> },
    Improve { file: std::path::PathBuf },
    Motivate,
    /// Content plan for a post, saved as drafts
    Social { post: String },
}

/// Run an assistant request and print the result
pub async fn run(assistant: &Assistant, store: &ContentStore, request: AssistRequest) -> Result<()> {
    if !assistant.is_enabled() {
        anyhow::bail!(
            "Assistant is disabled: set assistant.api_key or BLOGDESK_ASSISTANT_KEY"
        );
    }

    let printed = match request {
        AssistRequest::Prompts => assistant.daily_prompts().await.map(|prompts| {
            prompts
                .iter()
                .enumerate()
                .map(|(i, p)| format!("{}. {}", i + 1, p))
                .collect::<Vec<_>>()
                .join("\n")
        }),
        AssistRequest::Inspire { topic } => assistant.content_inspiration(topic.as_deref()).await,
        AssistRequest::Improve { file } => improve_file(assistant, &file).await?,
        AssistRequest::Motivate => assistant.motivational_message().await,
        AssistRequest::Social { post } => {
            let drafts = social_drafts(assistant, store, &post).await?;
            drafts.map(|drafts| {
                drafts
                    .iter()
                    .map(|d| format!("[{}] {}", d.platform, d.content))
                    .collect::<Vec<_>>()
                    .join("\n\n")
            })
        }
    };

    match printed {
        Some(text) => println!("{}", text),
        None => println!("The assistant returned nothing usable. Try again later."),
    }
    Ok(())
}

async fn improve_file(assistant: &Assistant, file: &Path) -> Result<Option<String>> {
    let content = fs::read_to_string(file)?;
    Ok(assistant.improve_content(&content).await)
}

/// Generate and save drafts promoting the post `key`
pub async fn social_drafts(
    assistant: &Assistant,
    store: &ContentStore,
    key: &str,
) -> Result<Option<Vec<SocialDraft>>> {
    let post = resolve(store, key).await?;
    let Some(plan) = assistant.content_plan(&post).await else {
        return Ok(None);
    };

    let mut saved = Vec::new();
    for draft in plan.into_drafts(Some(post.id), Utc::now()) {
        saved.push(store.save_draft(draft).await?);
    }
    tracing::info!("Saved {} social drafts for {}", saved.len(), post.slug);
    Ok(Some(saved))
}
