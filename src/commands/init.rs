//! Initialize a new blogdesk site

use anyhow::Result;
use std::fs;
use std::path::Path;

use crate::config::CONFIG_FILE;
use crate::Blogdesk;

const DEFAULT_CONFIG: &str = r#"# blogdesk configuration

# Site
title: My Blog
subtitle: ''
description: ''
author: John Doe
language: en
timezone: ''

# URL
url: http://localhost:4000
root: /

# Display
date_format: MMM D, YYYY
per_page: 10

# Writing
default_category: lifestyle

# Storage
data_dir: data
storage_key: blog-posts
remote:
  # url: https://your-project.example.com
  # api_key: set BLOGDESK_REMOTE_KEY instead
  timeout_secs: 5
  retries: 1

# Writing assistant (disabled without an API key)
assistant:
  # api_key: set BLOGDESK_ASSISTANT_KEY instead
  endpoint: https://api.openai.com/v1/chat/completions
  model: gpt-4o-mini
  timeout_secs: 30

# Server
server:
  ip: 127.0.0.1
  port: 4000
"#;

const SAMPLE_POST: &str = r#"---
title: Hello World
category: lifestyle
---

Welcome to **blogdesk**! This is your very first post.

## Quick Start

1. Write markdown files in `posts/`
2. Run `blogdesk import posts`
3. Run `blogdesk serve`

More info in the [README](https://example.com/blogdesk).
"#;

/// Initialize a new site in the given directory
pub fn init_site(target_dir: &Path) -> Result<()> {
    let config_path = target_dir.join(CONFIG_FILE);
    if config_path.exists() {
        anyhow::bail!("Already initialized: {:?}", config_path);
    }

    fs::create_dir_all(target_dir.join("data"))?;
    fs::create_dir_all(target_dir.join("posts"))?;

    fs::write(&config_path, DEFAULT_CONFIG)?;
    fs::write(target_dir.join("posts/hello-world.md"), SAMPLE_POST)?;

    Ok(())
}

/// Run the init command with an existing instance
pub fn run(desk: &Blogdesk) -> Result<()> {
    init_site(&desk.base_dir)
}
