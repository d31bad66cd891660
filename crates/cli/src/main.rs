use anyhow::{Context, Result};
use arboard::Clipboard;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use memeforge_core::{init, ui, Config, MemeForge, MemeStyle};
use std::path::PathBuf;
use std::time::Duration;
use termimad::crossterm::style::Color;
use termimad::MadSkin;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Image file to meme-ify (preloaded into the studio, required with --headless)
    image: Option<PathBuf>,

    /// Caption style: sarcastic, wholesome, dark or dad_joke
    #[arg(short, long, default_value = "sarcastic")]
    style: String,

    /// Optional free-text context to bias the captions
    #[arg(short, long, default_value = "")]
    context: String,

    /// Override the service endpoint defined in .env
    #[arg(short, long)]
    endpoint: Option<String>,

    /// Generate without opening the studio window
    #[arg(long, default_value_t = false)]
    headless: bool,

    /// Copy the generated captions to clipboard automatically (headless only)
    #[arg(long, default_value_t = false)]
    copy: bool,

    /// List available meme styles and exit
    #[arg(long)]
    list_styles: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Setup
    init();
    simple_logger::init_with_env().context("Failed to initialize logging")?;
    let args = Args::parse();

    // Handle --list-styles
    if args.list_styles {
        println!("Available styles:");
        for style in MemeStyle::ALL {
            println!("  {:<10} {}", style.as_str(), style.label());
        }
        return Ok(());
    }

    // Load config and override endpoint if specified via CLI
    let config = match &args.endpoint {
        Some(endpoint) => Config::with_endpoint(endpoint),
        None => Config::load(),
    }
    .context("Failed to load configuration")?;

    let app = MemeForge::with_config(config);

    if args.headless {
        run_headless(&app, &args).await
    } else {
        ui::run_studio(app.config().clone(), args.image).context("Failed to run studio")?;
        Ok(())
    }
}

/// One-shot generation without a window: load, request, print.
async fn run_headless(app: &MemeForge, args: &Args) -> Result<()> {
    let image = args
        .image
        .as_deref()
        .context("--headless requires an image file argument")?;
    let style = MemeStyle::parse(&args.style)?;

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ ")
            .template("{spinner:.green} {msg}")?,
    );
    spinner.set_message(format!("Generating {} meme...", style));
    spinner.enable_steady_tick(Duration::from_millis(100));

    let result = app.generate_from_file(image, style, &args.context).await;

    spinner.finish_and_clear();

    let meme = result.context("Meme generation failed")?;

    let similar = if meme.similar.is_empty() {
        "_none_".to_string()
    } else {
        meme.similar.join(", ")
    };
    let markdown = format!(
        "# Your AI Meme\n\n\
         **{top}**\n\n\
         **{bottom}**\n\n\
         *{percent}% Viral Potential* (style: {style})\n\n\
         Similar viral memes: {similar}\n\n\
         Suggested filename: `{filename}`\n",
        top = meme.top_text,
        bottom = meme.bottom_text,
        percent = meme.confidence_percent(),
        style = meme.style,
        similar = similar,
        filename = meme.download_filename(),
    );
    print_markdown(&markdown);

    // Copy captions to clipboard if requested
    if args.copy {
        let captions = format!("{}\n{}", meme.top_text, meme.bottom_text);
        match Clipboard::new() {
            Ok(mut clipboard) => {
                if let Err(e) = clipboard.set_text(captions) {
                    eprintln!("Warning: Failed to copy to clipboard: {}", e);
                } else {
                    println!("(Copied to clipboard)");
                }
            }
            Err(e) => eprintln!("Warning: Could not access clipboard: {}", e),
        }
    }

    Ok(())
}

/// Helper to print markdown
fn print_markdown(text: &str) {
    let mut skin = MadSkin::default();
    skin.bold.set_fg(Color::Yellow);
    skin.italic.set_fg(Color::Green);
    skin.inline_code.set_bg(Color::Rgb { r: 40, g: 40, b: 40 });

    skin.print_text(text);
}
