//! Delete local snapshots

use anyhow::Result;

use crate::store::LocalSnapshot;
use crate::Blogdesk;

/// Remove the post and draft snapshots
///
/// The next start reloads from the remote store, or the built-in posts.
pub fn run(desk: &Blogdesk) -> Result<()> {
    let posts = LocalSnapshot::new(&desk.data_dir, &desk.config.storage_key);
    let drafts = posts.sibling("drafts");

    for snapshot in [posts, drafts] {
        if !snapshot.clear()? {
            tracing::debug!("No snapshot at {:?}", snapshot.path());
        }
    }

    Ok(())
}
