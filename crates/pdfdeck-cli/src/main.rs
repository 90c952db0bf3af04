use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};

use pdfdeck_core::{
    Command, Completion, Config, Document, HttpGateway, Layer, RemoteGateway, Stage, Workflow,
};

mod render;

use render::Painter;

/// Turn a PDF into a slide deck using the slide service.
#[derive(Parser, Debug)]
#[command(name = "pdfdeck")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the PDF file
    pdf_path: PathBuf,

    /// Base URL of the slide service
    #[arg(long)]
    backend_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Config file (default: the platform config dir)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Append a topic before generating, as "Title::Description" (repeatable)
    #[arg(long = "add-topic", value_name = "TITLE::DESCRIPTION", value_parser = parse_topic_spec)]
    add_topics: Vec<(String, String)>,

    /// Remove an extracted topic by id before generating (repeatable)
    #[arg(long = "drop-topic", value_name = "ID")]
    drop_topics: Vec<String>,

    /// Stop after extraction and print the outline
    #[arg(long)]
    outline_only: bool,

    /// Print JSON instead of text
    #[arg(long)]
    json: bool,

    /// Write the deck as JSON to this file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn parse_topic_spec(spec: &str) -> Result<(String, String), String> {
    match spec.split_once("::") {
        Some((title, description)) => Ok((title.to_string(), description.to_string())),
        None => Err(format!("expected TITLE::DESCRIPTION, got {spec:?}")),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    // Initialize logging
    let default_filter = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let painter = Painter::new(!args.no_color);

    // Resolve config from CLI flags > env vars > config file > defaults
    let config = Config::load(
        Layer {
            backend_url: args.backend_url.clone(),
            request_timeout_secs: args.timeout,
        },
        args.config.as_deref(),
    )?;
    log::info!("using service at {}", config.backend_url);
    let gateway = HttpGateway::new(&config).context("failed to build HTTP client")?;

    let document = Document::from_path(&args.pdf_path)
        .with_context(|| format!("failed to read {}", args.pdf_path.display()))?;

    let mut workflow = Workflow::new();

    // 1. Upload and extract
    let command = workflow.select_file(document);
    let label = format!("Extracting topics from {}", args.pdf_path.display());
    let completion = run_with_spinner(command, &gateway, label).await?;
    workflow.apply(completion);
    if workflow.stage() == Stage::UploadFailed {
        let message = workflow.state().upload_error().unwrap_or_default();
        anyhow::bail!("{}", painter.error(message));
    }

    // 2. Curate
    for id in &args.drop_topics {
        match workflow.remove_topic(id)? {
            Some(topic) => log::info!("dropped topic {id} ({})", topic.title),
            None => eprintln!("{}", painter.dim(&format!("no topic with id {id}; skipped"))),
        }
    }
    for (title, description) in &args.add_topics {
        workflow
            .add_topic(title, description)
            .with_context(|| format!("cannot add topic {title:?}"))?;
    }

    let topics = workflow.state().topics();
    if args.outline_only {
        if args.json {
            println!("{}", render::outline_json(topics)?);
        } else {
            print!("{}", render::outline_text(topics, painter));
        }
        return Ok(());
    }
    if !args.json {
        println!("{}", painter.heading("Outline"));
        print!("{}", render::outline_text(topics, painter));
        println!();
    }

    // 3. Generate
    let command = workflow.generate()?;
    let label = format!("Generating slides for {} topics", workflow.state().topics().len());
    let completion = run_with_spinner(command, &gateway, label).await?;
    workflow.apply(completion);
    if workflow.stage() == Stage::GenerateFailed {
        let message = workflow.state().generate_error().unwrap_or_default();
        anyhow::bail!("{}", painter.error(message));
    }

    // 4. Present
    let slides = workflow.state().deck().slides();
    if let Some(path) = &args.output {
        std::fs::write(path, render::deck_json(slides)?)
            .with_context(|| format!("failed to write {}", path.display()))?;
        eprintln!(
            "{}",
            painter.ok(&format!("Wrote {} slides to {}", slides.len(), path.display()))
        );
    }
    if args.json {
        println!("{}", render::deck_json(slides)?);
    } else if args.output.is_none() {
        if slides.is_empty() {
            println!("{}", painter.dim("The service returned no slides."));
        }
        for (i, slide) in slides.iter().enumerate() {
            println!(
                "{}",
                render::slide_text(slide, i, slides.len(), &config.backend_url, painter)
            );
        }
    }

    Ok(())
}

/// Run one command behind a spinner. Ctrl+C abandons it.
async fn run_with_spinner(
    command: Command,
    gateway: &dyn RemoteGateway,
    label: String,
) -> anyhow::Result<Completion> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::with_template("{spinner:.cyan} {msg} {elapsed:.dim}")?);
    spinner.set_message(label);
    spinner.enable_steady_tick(Duration::from_millis(100));

    let completion = tokio::select! {
        completion = command.run(gateway) => completion,
        _ = tokio::signal::ctrl_c() => {
            spinner.abandon_with_message("interrupted");
            anyhow::bail!("interrupted");
        }
    };
    spinner.finish_and_clear();
    Ok(completion)
}
