use anyhow::{Context, Result};
use clap::Parser;
use shared::{
    build_prompt, collect_comments, list_top_stories, save_summary, CommentFormat, Config,
    HackerNewsClient, Item, SummarizerCommand, TraversalLimits, TOP_STORY_LIMIT,
};
use std::io::{self as stdio, BufRead, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "hn-summarize")]
#[command(about = "Summarize the discussion on one of the current top Hacker News stories")]
struct Args {
    /// Model passed to the llm tool
    #[arg(short, long)]
    model: Option<String>,

    /// Where to save the summary (overwritten on every run)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Strip HTML from comments before summarizing
    #[arg(long)]
    plain_text: bool,

    /// Don't open a preview of the saved summary
    #[arg(long)]
    no_preview: bool,

    /// Log each request and subprocess to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn init_tracing(verbose: bool) -> Result<()> {
    let mut filter = EnvFilter::from_default_env();
    if verbose {
        filter = filter
            .add_directive("shared=debug".parse().context("could not parse env filter")?)
            .add_directive("hn_summarize=debug".parse().context("could not parse env filter")?);
    }
    tracing_subscriber::fmt()
        .with_writer(stdio::stderr)
        .with_env_filter(filter)
        .init();
    Ok(())
}

/// Ask which story to process until the answer is a number in `1..=count`.
///
/// Returns the zero-based index of the chosen story.
fn prompt_selection<R, W>(input: &mut R, output: &mut W, count: usize) -> Result<usize>
where
    R: BufRead,
    W: Write,
{
    loop {
        write!(output, "\nWhich story would you like to process? (1-{}): ", count)?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            anyhow::bail!("No story selected (end of input)");
        }

        match line.trim().parse::<usize>() {
            Ok(n) if (1..=count).contains(&n) => return Ok(n - 1),
            Ok(_) => writeln!(output, "Please enter a number between 1 and {}", count)?,
            Err(_) => writeln!(output, "Please enter a valid number")?,
        }
    }
}

fn print_stories(stories: &[Item]) {
    for (i, story) in stories.iter().enumerate() {
        println!(
            "{}. {} ({} points)",
            i + 1,
            story.title.as_deref().unwrap_or_default(),
            story.score()
        );
        println!("{}", story.display_url());
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose)?;
    let config = Config::from_env()?;

    let model = args.model.unwrap_or(config.model);
    let summary_path = args.output.unwrap_or(config.summary_path);
    let format = if args.plain_text {
        CommentFormat::PlainText
    } else {
        CommentFormat::Raw
    };

    let client = HackerNewsClient::new(config.api_base)?;

    println!("📚 Loading stories...");
    let stories = list_top_stories(&client, TOP_STORY_LIMIT)
        .await
        .context("Failed to load top stories")?;

    if stories.is_empty() {
        println!("No stories found.");
        return Ok(());
    }

    print_stories(&stories);

    let selection =
        prompt_selection(&mut stdio::stdin().lock(), &mut stdio::stdout(), stories.len())?;
    let selected = &stories[selection];
    println!(
        "\n✓ You selected: {} (ID: {})",
        selected.title.as_deref().unwrap_or_default(),
        selected.id
    );

    println!("\n💬 Fetching comments...");
    let comments = collect_comments(&client, selected.id, TraversalLimits::default(), format)
        .await
        .context("Failed to fetch comments")?;
    println!(
        "\n🤖 Processing {} words from comments...",
        comments.split_whitespace().count()
    );

    let summarizer = SummarizerCommand::new(config.llm_command, model);
    println!("\nSummary (streaming):");
    let output = summarizer
        .summarize(&build_prompt(&comments), &mut stdio::stdout())
        .await?;
    tracing::debug!(success = output.success, bytes = output.text.len(), "summarizer finished");

    let saved = save_summary(&summary_path, &output.text)?;
    println!("\n✅ Summary saved to: {}", saved.display());

    if !args.no_preview {
        config.preview.open(&saved).await;
    }

    Ok(())
}
