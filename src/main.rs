//! CLI entry point for blogdesk

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use blogdesk::commands;
use blogdesk::commands::assist::AssistRequest;
use blogdesk::commands::render::RenderFormat;
use blogdesk::content::{Category, PostPatch, Visibility};
use blogdesk::Blogdesk;

#[derive(Parser)]
#[command(name = "blogdesk")]
#[command(author = "Yukang Chen")]
#[command(version)]
#[command(about = "A personal blog and content desk", long_about = None)]
struct Cli {
    /// Set the base directory (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new site
    Init {
        /// Directory to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        folder: PathBuf,
    },

    /// List posts
    #[command(alias = "ls")]
    List {
        /// Which posts to list (all, published, featured, unpublished)
        #[arg(default_value = "all")]
        r#type: String,
    },

    /// Show a post by slug or id
    Show {
        post: String,

        /// Print rendered HTML instead of the markdown source
        #[arg(long)]
        html: bool,
    },

    /// Create a new post
    New {
        /// Title of the new post (defaults to the file's front-matter title)
        title: Option<String>,

        /// Read content (and front-matter) from a markdown file
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Inline content
        #[arg(long)]
        content: Option<String>,

        #[arg(long)]
        slug: Option<String>,

        #[arg(long)]
        excerpt: Option<String>,

        #[arg(short = 'C', long)]
        category: Option<Category>,

        /// Publish immediately
        #[arg(short, long)]
        publish: bool,

        #[arg(long)]
        featured: bool,

        /// Protect the post with a password
        #[arg(long)]
        password: Option<String>,
    },

    /// Edit a post by slug or id
    Edit {
        post: String,

        #[arg(long)]
        title: Option<String>,

        /// Replace content with a markdown file's body
        #[arg(short, long)]
        file: Option<PathBuf>,

        #[arg(long)]
        content: Option<String>,

        #[arg(long)]
        slug: Option<String>,

        #[arg(long)]
        excerpt: Option<String>,

        #[arg(short = 'C', long)]
        category: Option<Category>,

        /// Protect the post with a password
        #[arg(long, conflicts_with = "public")]
        password: Option<String>,

        /// Remove password protection
        #[arg(long)]
        public: bool,
    },

    /// Delete a post by slug or id
    Delete { post: String },

    /// Publish a post (or unpublish with --undo)
    Publish {
        post: String,

        #[arg(long)]
        undo: bool,
    },

    /// Feature a post (or unfeature with --undo)
    Feature {
        post: String,

        #[arg(long)]
        undo: bool,
    },

    /// Import markdown files from a directory
    Import {
        #[arg(default_value = "posts")]
        dir: PathBuf,
    },

    /// Render a markdown file to HTML
    Render {
        file: PathBuf,

        /// Print the display-node tree as JSON
        #[arg(long)]
        json: bool,
    },

    /// List saved social drafts
    Drafts {
        /// Delete the draft with this id
        #[arg(long)]
        delete: Option<String>,
    },

    /// Ask the writing assistant
    Assist {
        #[command(subcommand)]
        action: AssistAction,
    },

    /// Start the server
    #[command(alias = "s")]
    Serve {
        /// Port to listen on (defaults to server.port)
        #[arg(short, long)]
        port: Option<u16>,

        /// IP address to bind to (defaults to server.ip)
        #[arg(short, long)]
        ip: Option<String>,
    },

    /// Delete local snapshots
    Clean,

    /// Display version information
    Version,
}

#[derive(Subcommand)]
enum AssistAction {
    /// Writing prompts for today
    Prompts,

    /// Ideas for a new post
    Inspire { topic: Option<String> },

    /// Suggest a rewrite of a markdown file
    Improve { file: PathBuf },

    /// A short encouraging note
    Motivate,

    /// Draft social posts for a post and save them
    Social { post: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "blogdesk=debug,info"
    } else {
        "blogdesk=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine base directory
    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };

    match cli.command {
        Commands::Init { folder } => {
            let target_dir = if folder.is_absolute() {
                folder
            } else {
                base_dir.join(folder)
            };
            tracing::info!("Initializing site in {:?}", target_dir);
            commands::init::init_site(&target_dir)?;
            println!("Initialized blogdesk site in {:?}", target_dir);
        }

        Commands::List { r#type } => {
            let desk = Blogdesk::new(&base_dir)?;
            let store = desk.open_store().await?;
            commands::list::run(&store, &desk.helpers(), &r#type).await?;
        }

        Commands::Show { post, html } => {
            let desk = Blogdesk::new(&base_dir)?;
            let store = desk.open_store().await?;
            commands::post::show(&store, &desk.helpers(), &post, html).await?;
        }

        Commands::New {
            title,
            file,
            content,
            slug,
            excerpt,
            category,
            publish,
            featured,
            password,
        } => {
            let desk = Blogdesk::new(&base_dir)?;
            let mut fields = commands::new::base_fields(file.as_deref())?;
            if file.is_none() {
                // Front-matter defaults only apply to imported files.
                fields.published = false;
            }

            if let Some(title) = title {
                fields.title = title;
            }
            if let Some(content) = commands::new::read_body(content, None)? {
                fields.content = content;
            }
            fields.slug = slug.or(fields.slug);
            fields.excerpt = excerpt.or(fields.excerpt);
            fields.category = category.or(fields.category);
            fields.published |= publish;
            fields.featured |= featured;
            if password.is_some() {
                fields.visibility = Visibility::Password;
                fields.password = password;
            }

            let store = desk.open_store().await?;
            commands::new::create_post(&store, fields).await?;
        }

        Commands::Edit {
            post,
            title,
            file,
            content,
            slug,
            excerpt,
            category,
            password,
            public,
        } => {
            let desk = Blogdesk::new(&base_dir)?;
            let mut patch = PostPatch {
                title,
                slug,
                excerpt,
                category,
                content: commands::new::read_body(content, file.as_deref())?,
                ..Default::default()
            };
            if password.is_some() {
                patch.visibility = Some(Visibility::Password);
                patch.password = password;
            } else if public {
                patch.visibility = Some(Visibility::Public);
            }

            let store = desk.open_store().await?;
            commands::post::edit(&store, &post, patch).await?;
        }

        Commands::Delete { post } => {
            let desk = Blogdesk::new(&base_dir)?;
            let store = desk.open_store().await?;
            commands::post::delete(&store, &post).await?;
        }

        Commands::Publish { post, undo } => {
            let desk = Blogdesk::new(&base_dir)?;
            let store = desk.open_store().await?;
            commands::post::set_published(&store, &post, !undo).await?;
        }

        Commands::Feature { post, undo } => {
            let desk = Blogdesk::new(&base_dir)?;
            let store = desk.open_store().await?;
            commands::post::set_featured(&store, &post, !undo).await?;
        }

        Commands::Import { dir } => {
            let desk = Blogdesk::new(&base_dir)?;
            tracing::info!("Importing posts from {:?}", dir);
            desk.import(&dir).await?;
        }

        Commands::Render { file, json } => {
            let format = if json {
                RenderFormat::Json
            } else {
                RenderFormat::Html
            };
            commands::render::run(&file, format)?;
        }

        Commands::Drafts { delete } => {
            let desk = Blogdesk::new(&base_dir)?;
            let store = desk.open_store().await?;
            match delete {
                Some(id) => commands::drafts::delete(&store, &id).await?,
                None => commands::drafts::list(&store, &desk.helpers()).await?,
            }
        }

        Commands::Assist { action } => {
            let desk = Blogdesk::new(&base_dir)?;
            let request = match action {
                AssistAction::Prompts => AssistRequest::Prompts,
                AssistAction::Inspire { topic } => AssistRequest::Inspire { topic },
                AssistAction::Improve { file } => AssistRequest::Improve { file },
                AssistAction::Motivate => AssistRequest::Motivate,
                AssistAction::Social { post } => AssistRequest::Social { post },
            };
            let store = desk.open_store().await?;
            commands::assist::run(&desk.assistant(), &store, request).await?;
        }

        Commands::Serve { port, ip } => {
            let desk = Blogdesk::new(&base_dir)?;
            let ip = ip.unwrap_or_else(|| desk.config.server.ip.clone());
            let port = port.unwrap_or(desk.config.server.port);

            tracing::info!("Starting server at http://{}:{}", ip, port);
            blogdesk::server::start(&desk, &ip, port).await?;
        }

        Commands::Clean => {
            let desk = Blogdesk::new(&base_dir)?;
            tracing::info!("Deleting local snapshots...");
            desk.clean()?;
            println!("Cleaned successfully!");
        }

        Commands::Version => {
            println!("blogdesk version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
