//! unnotion CLI - render Notion pages to HTML

mod serve;

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use colored::Colorize;

use unnotion::render::DEFAULT_MAX_DEPTH;
use unnotion::source::DEFAULT_BASE_URL;
use unnotion::{
    normalize_id, render_index, render_page, tag_counts, ClientOptions, IndexOptions,
    NotionClient, PostSummary, RenderOptions,
};

use serve::AppState;

#[derive(Parser)]
#[command(name = "unnotion")]
#[command(version)]
#[command(about = "Render Notion pages to HTML and serve them as a blog", long_about = None)]
struct Cli {
    /// Notion integration token
    #[arg(long, env = "NOTION_API_KEY", hide_env_values = true, global = true)]
    api_key: Option<String>,

    /// Notion API base URL
    #[arg(long, env = "NOTION_BASE_URL", default_value = DEFAULT_BASE_URL, global = true)]
    base_url: String,

    /// Database holding the posts (id or URL)
    #[arg(long, env = "NOTION_DATABASE_ID", global = true)]
    database_id: Option<String>,

    /// Title property name (default: first title property)
    #[arg(long, global = true)]
    title_property: Option<String>,

    /// Date property name (default: first date property)
    #[arg(long, global = true)]
    date_property: Option<String>,

    /// Tags property name (default: first multi-select property)
    #[arg(long, global = true)]
    tags_property: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a page to HTML
    Render {
        /// Page id or Notion page URL
        #[arg(value_name = "PAGE")]
        page: String,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Maximum nesting depth
        #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
        max_depth: usize,

        /// Render sibling blocks in parallel
        #[arg(long)]
        parallel: bool,
    },

    /// List the posts of the database
    #[command(alias = "ls")]
    Posts {
        /// Output JSON
        #[arg(long)]
        json: bool,

        /// Output compact JSON
        #[arg(long, requires = "json")]
        compact: bool,

        /// Only posts with this tag
        #[arg(long)]
        tag: Option<String>,
    },

    /// Serve the post list, rendered posts and a static front-end over HTTP
    Serve {
        /// Port to listen on
        #[arg(short, long, env = "PORT", default_value_t = 8080)]
        port: u16,

        /// Directory of static front-end files
        #[arg(long, value_name = "DIR", default_value = "public")]
        static_dir: PathBuf,

        /// Render sibling blocks in parallel
        #[arg(long)]
        parallel: bool,
    },

    /// Show version information
    Version,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match &cli.command {
        Commands::Render {
            page,
            output,
            max_depth,
            parallel,
        } => cmd_render(&cli, page, output.as_deref(), *max_depth, *parallel),
        Commands::Posts { json, compact, tag } => cmd_posts(&cli, *json, *compact, tag.as_deref()),
        Commands::Serve {
            port,
            static_dir,
            parallel,
        } => cmd_serve(&cli, *port, static_dir, *parallel),
        Commands::Version => {
            cmd_version();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn client(cli: &Cli) -> Result<NotionClient, Box<dyn std::error::Error>> {
    let api_key = cli
        .api_key
        .clone()
        .ok_or("Missing API key: pass --api-key or set NOTION_API_KEY")?;
    let options = ClientOptions::new(api_key).with_base_url(cli.base_url.clone());
    Ok(NotionClient::new(options)?)
}

fn database_id(cli: &Cli) -> Result<String, Box<dyn std::error::Error>> {
    let id = cli
        .database_id
        .as_deref()
        .ok_or("Missing database id: pass --database-id or set NOTION_DATABASE_ID")?;
    Ok(normalize_id(id)?)
}

fn index_options(cli: &Cli) -> IndexOptions {
    IndexOptions {
        title_property: cli.title_property.clone(),
        date_property: cli.date_property.clone(),
        tags_property: cli.tags_property.clone(),
    }
}

fn cmd_render(
    cli: &Cli,
    page: &str,
    output: Option<&Path>,
    max_depth: usize,
    parallel: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let client = client(cli)?;
    let options = RenderOptions::new()
        .with_max_depth(max_depth)
        .with_parallel(parallel);

    let html = render_page(&client, page, &options)?;

    if let Some(path) = output {
        fs::write(path, &html)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", html);
    }

    Ok(())
}

fn cmd_posts(
    cli: &Cli,
    json: bool,
    compact: bool,
    tag: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let client = client(cli)?;
    let database_id = database_id(cli)?;

    let mut posts = render_index(&client, &database_id, &index_options(cli))?;
    if let Some(tag) = tag {
        posts.retain(|p| p.has_tag(tag));
    }

    if json {
        let output = if compact {
            serde_json::to_string(&posts)?
        } else {
            serde_json::to_string_pretty(&posts)?
        };
        println!("{}", output);
        return Ok(());
    }

    print_posts(&posts);
    Ok(())
}

fn print_posts(posts: &[PostSummary]) {
    println!("{} ({})", "Posts".cyan().bold(), posts.len());
    println!("{}", "─".repeat(40).dimmed());

    for post in posts {
        let date = post
            .date
            .map(|d| d.to_string())
            .unwrap_or_else(|| "----------".to_string());
        print!("{}  {}", date.dimmed(), post.title.bold());
        if !post.tags.is_empty() {
            print!("  [{}]", post.tags.join(", ").yellow());
        }
        println!();
        println!("            {}", post.id.dimmed());
    }

    let counts = tag_counts(posts);
    if !counts.is_empty() {
        println!();
        println!("{}", "Tags".cyan().bold());
        println!("{}", "─".repeat(40).dimmed());
        for (tag, count) in &counts {
            println!("  {} ({})", tag, count);
        }
    }
}

fn cmd_serve(
    cli: &Cli,
    port: u16,
    static_dir: &Path,
    parallel: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let client = Arc::new(client(cli)?);
    let database_id = match cli.database_id.as_deref() {
        Some(id) => Some(normalize_id(id)?),
        None => {
            log::warn!("No database id configured; /posts will be empty");
            None
        }
    };

    let state = AppState {
        blocks: client.clone(),
        posts: client,
        database_id,
        render_options: RenderOptions::new().with_parallel(parallel),
        index_options: index_options(cli),
    };

    println!(
        "{} http://localhost:{} (static files from {})",
        "Listening on".green().bold(),
        port,
        static_dir.display()
    );
    serve::run(state, port, static_dir.to_path_buf())?;
    Ok(())
}

fn cmd_version() {
    println!("{} {}", "unnotion".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Notion page to HTML renderer");
    println!();
    println!("License: MIT");
}
