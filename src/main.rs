//! CLI entry point for devlog

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "devlog")]
#[command(version)]
#[command(about = "Index, query and serve the posts of a markdown/MDX blog", long_about = None)]
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
    /// Serve the JSON API
    #[command(alias = "s")]
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "4000")]
        port: u16,

        /// IP address to bind to
        #[arg(short, long, default_value = "localhost")]
        ip: String,
    },

    /// Write sitemap.xml, robots.txt and search.json
    #[command(alias = "g")]
    Generate,

    /// List site information
    List {
        /// Type of content to list (post, tag, author)
        #[arg(default_value = "post")]
        r#type: String,
    },

    /// Search post titles and descriptions
    Search {
        /// Text to look for
        query: String,
    },

    /// Print the table of contents of a post
    Toc {
        /// Slug of the post
        slug: String,
    },

    /// Create a new post
    New {
        /// Title of the new post
        title: String,

        /// Author (defaults to the site author)
        #[arg(short, long)]
        author: Option<String>,

        /// Tags, comma separated or repeated
        #[arg(short, long, value_delimiter = ',')]
        tags: Vec<String>,
    },

    /// Remove the public folder
    Clean,

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "devlog=debug,info"
    } else {
        "devlog=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };

    match cli.command {
        Commands::Serve { port, ip } => {
            let blog = devlog::Blog::new(&base_dir)?;
            tracing::info!("Starting server at http://{}:{}", ip, port);
            devlog::server::start(&blog, &ip, port).await?;
        }

        Commands::Generate => {
            let blog = devlog::Blog::new(&base_dir)?;
            tracing::info!("Generating site files...");
            blog.generate()?;
            println!("Generated successfully!");
        }

        Commands::List { r#type } => {
            let blog = devlog::Blog::new(&base_dir)?;
            devlog::commands::list::run(&blog, &r#type)?;
        }

        Commands::Search { query } => {
            let blog = devlog::Blog::new(&base_dir)?;
            devlog::commands::search::run(&blog, &query)?;
        }

        Commands::Toc { slug } => {
            let blog = devlog::Blog::new(&base_dir)?;
            devlog::commands::toc::run(&blog, &slug)?;
        }

        Commands::New {
            title,
            author,
            tags,
        } => {
            let blog = devlog::Blog::new(&base_dir)?;
            tracing::info!("Creating new post with title: {}", title);
            let path = devlog::commands::new::create_post(&blog, &title, author.as_deref(), &tags)?;
            println!("Created {:?}", path);
        }

        Commands::Clean => {
            let blog = devlog::Blog::new(&base_dir)?;
            tracing::info!("Cleaning public folder...");
            blog.clean()?;
            println!("Cleaned successfully!");
        }

        Commands::Version => {
            println!("devlog version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
