//! List and delete saved social drafts

use anyhow::Result;
use uuid::Uuid;

use crate::content::SocialDraft;
use crate::helpers::Helpers;
use crate::store::ContentStore;

pub async fn list(store: &ContentStore, helpers: &Helpers) -> Result<()> {
    let drafts = store.drafts().await;
    println!("Drafts ({}):", drafts.len());
    for draft in &drafts {
        println!("{}", format_draft(draft, helpers));
    }
    Ok(())
}

pub async fn delete(store: &ContentStore, id: &str) -> Result<()> {
    let id = Uuid::parse_str(id)?;
    store.delete_draft(id).await?;
    println!("Deleted draft: {}", id);
    Ok(())
}

fn format_draft(draft: &SocialDraft, helpers: &Helpers) -> String {
    let content = draft
        .content
        .lines()
        .map(|line| format!("    {}", line))
        .collect::<Vec<_>>()
        .join("\n");
    format!(
        "  {} [{}] {}\n{}",
        helpers.date(&draft.created_at, Some("YYYY-MM-DD HH:mm")),
        draft.platform,
        draft.id,
        content
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use crate::content::Platform;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_format_draft() {
        let helpers = Helpers::new(SiteConfig::default());
        let created = Utc.with_ymd_and_hms(2024, 5, 1, 8, 30, 0).unwrap();
        let draft = SocialDraft::new(Platform::Twitter, "Line one\nLine two".to_string(), None, created);
        assert_eq!(
            format_draft(&draft, &helpers),
            format!(
                "  2024-05-01 08:30 [twitter] {}\n    Line one\n    Line two",
                draft.id
            )
        );
    }
}
