//! blog-post - Turn raw notes into a WordPress.com post

use std::io::Read;

use clap::Parser;
use libblogcast::logging::{LogFormat, LoggingConfig};
use libblogcast::summary::simple_draft;
use libblogcast::{
    BlogcastError, Config, ContentNormalizer, PostDraft, PostPublisher, PostStatus, PublishedPost,
    Result, TokenStore,
};

#[derive(Parser, Debug)]
#[command(name = "blog-post")]
#[command(version, about = "Turn raw notes into a WordPress.com post")]
#[command(long_about = r#"Turn raw notes into a structured blog post and publish it.

By default the text is rewritten by Gemini into a tutorial-style post (title,
excerpt, HTML body, tags, categories, slug). With --simple the post is built
directly from the text without any generative service.

EXAMPLES:
    # Draft from an argument
    blog-post "Notes on tokio task cancellation"

    # Publish from a file
    cat notes.md | blog-post --status publish

    # Inspect the draft without publishing
    blog-post --dry-run < notes.md

    # No AI, explicit classification
    blog-post --simple --tags rust,async --categories Development < notes.md

    # Scripting
    blog-post --format json < notes.md | jq -r .URL

EXIT CODES:
    0 - Success
    1 - Configuration, content or platform error
    2 - Authorization error (token rejected)
    3 - Invalid input (empty content)
"#)]
struct Cli {
    /// Content to post (reads from stdin if not provided)
    content: Option<String>,

    /// Post status: draft, publish or future
    #[arg(short, long, value_name = "STATUS")]
    status: Option<PostStatus>,

    /// Build the post from the text directly, without Gemini
    #[arg(long)]
    simple: bool,

    /// Comma-separated tags (replace generated tags)
    #[arg(long, value_name = "TAGS")]
    tags: Option<String>,

    /// Comma-separated categories (replace generated categories)
    #[arg(long, value_name = "CATEGORIES")]
    categories: Option<String>,

    /// Post slug (replaces the generated slug)
    #[arg(long)]
    slug: Option<String>,

    /// Print the draft as JSON instead of publishing it
    #[arg(long)]
    dry_run: bool,

    /// Output format (text or json)
    #[arg(short, long, default_value = "text", value_parser = ["text", "json"])]
    format: String,

    /// Log format: text, json or pretty
    #[arg(long, value_name = "FORMAT")]
    log_format: Option<LogFormat>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    LoggingConfig::from_env(cli.log_format, cli.verbose).init();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(e.exit_code());
    }
}

async fn run(cli: Cli) -> Result<()> {
    let content = read_content(cli.content.as_deref())?;
    let config = Config::load()?;

    let tags = cli.tags.as_deref().map(split_list);
    let categories = cli.categories.as_deref().map(split_list);

    let draft = if cli.simple {
        tracing::debug!("Building draft without the generative backend");
        simple_draft(
            &content,
            tags.unwrap_or_default(),
            categories.unwrap_or_default(),
            cli.slug,
        )
    } else {
        let normalizer = ContentNormalizer::gemini(&config.gemini)?;
        let mut draft = normalizer.normalize(&content).await?;
        apply_overrides(&mut draft, tags, categories, cli.slug);
        draft
    };
    tracing::info!("Draft ready: {}", draft.title);

    if cli.dry_run {
        println!("{}", serde_json::to_string_pretty(&draft)?);
        return Ok(());
    }

    let status = cli.status.unwrap_or(config.publish.default_status);
    let token = TokenStore::new(config.token_path()).load()?;
    let publisher = PostPublisher::from_config(&config)?;

    let post = publisher.publish(&draft, &token, status).await?;
    tracing::info!("Published post {} as {}", post.id, post.status);

    print_result(&post, &cli.format)
}

/// Content from the argument, or stdin when piped
fn read_content(arg: Option<&str>) -> Result<String> {
    let content = match arg {
        Some(text) => text.to_string(),
        None if !atty::is(atty::Stream::Stdin) => {
            let mut buffer = String::new();
            std::io::stdin().read_to_string(&mut buffer).map_err(|e| {
                BlogcastError::InvalidInput(format!("Failed to read from stdin: {}", e))
            })?;
            buffer
        }
        None => {
            return Err(BlogcastError::InvalidInput(
                "No content provided. Pass it as an argument or pipe it via stdin".to_string(),
            ))
        }
    };

    if content.trim().is_empty() {
        return Err(BlogcastError::InvalidInput("Content cannot be empty".to_string()));
    }

    Ok(content)
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

fn apply_overrides(
    draft: &mut PostDraft,
    tags: Option<Vec<String>>,
    categories: Option<Vec<String>>,
    slug: Option<String>,
) {
    if let Some(tags) = tags {
        draft.tags = tags;
    }
    if let Some(categories) = categories {
        draft.categories = categories;
    }
    if let Some(slug) = slug {
        draft.slug = slug;
    }
}

fn print_result(post: &PublishedPost, format: &str) -> Result<()> {
    match format {
        "json" => println!("{}", serde_json::to_string_pretty(post)?),
        _ => {
            println!("Post created: {} ({})", post.url, post.status);
            println!("ID: {}", post.id);
        }
    }
    Ok(())
}
