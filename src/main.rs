use ai_image_generator::ai::GeminiImageClient;
use ai_image_generator::image::decode_source;
use ai_image_generator::models::Config;
use ai_image_generator::ui::Projector;
use anyhow::Result;
use clap::Parser;
use std::io::Write;
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "ai-image-generator")]
#[command(about = "Generate an image from a text description")]
struct CliArgs {
    /// Description of the image. Reads one prompt per line from stdin when omitted.
    #[arg(value_name = "PROMPT")]
    prompt: Option<String>,

    /// Gemini model ID (overrides GEMINI_IMAGE_MODEL).
    #[arg(long)]
    model: Option<String>,

    /// Directory the generated image is saved into.
    #[arg(long, value_name = "DIR", default_value = ".")]
    output_dir: PathBuf,

    /// Do not save generated images.
    #[arg(long)]
    no_save: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ai_image_generator=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = CliArgs::parse();

    let mut config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };
    if let Some(model) = args.model.clone() {
        config.model = model;
    }

    let client = GeminiImageClient::new(config.api_key.clone(), config.model.clone())
        .with_base_url(config.base_url.clone())
        .with_timeout(config.timeout);
    info!("Image provider: Gemini (model: {})", client.model());

    let mut projector = Projector::new(Box::new(client));

    match args.prompt.as_deref() {
        Some(prompt) => {
            submit(&mut projector, prompt).await;
            render(&mut projector, &args).await;
        }
        None => {
            let mut stdin = BufReader::new(tokio::io::stdin());
            let mut buf = Vec::new();
            print_prompt_marker()?;
            loop {
                buf.clear();
                match stdin.read_until(b'\n', &mut buf).await {
                    Ok(0) => break,
                    Ok(_) => match std::str::from_utf8(&buf) {
                        Ok(line) => {
                            submit(&mut projector, line).await;
                            render(&mut projector, &args).await;
                        }
                        Err(e) => {
                            error!("Skipping input line that is not valid UTF-8: {}", e);
                            println!("Error: Input must be valid UTF-8 text.");
                        }
                    },
                    Err(e) => {
                        error!("Failed to read from stdin: {}", e);
                        break;
                    }
                }
                print_prompt_marker()?;
            }
        }
    }

    Ok(())
}

/// Run one trigger through the projector; the progress line only shows once
/// the prompt has been accepted.
async fn submit(projector: &mut Projector, raw: &str) {
    if let Ok(prompt) = projector.begin(raw) {
        println!("Loading....");
        projector.dispatch(prompt).await;
    }
}

fn print_prompt_marker() -> std::io::Result<()> {
    print!("Describe what you want to see> ");
    std::io::stdout().flush()
}

/// Display the current state: load the image, report errors, offer the
/// download.
async fn render(projector: &mut Projector, args: &CliArgs) {
    let loaded = decode_source(&projector.state().current_image).await;
    if let Err(e) = &loaded {
        error!("Image failed to load: {}", e);
        projector.image_load_failed();
    }

    let state = projector.state();
    if let Some(message) = &state.last_error {
        println!("Error: {}", message);
    }

    if state.current_image.is_placeholder() {
        println!("Image: {}", state.current_image_source());
        return;
    }

    if let Ok(loaded) = loaded {
        println!("Image: {}x{} generated image", loaded.width, loaded.height);
    }

    if let Some(download) = projector.download() {
        if args.no_save {
            println!("Download available as {}", download.filename);
        } else {
            match download.save_to(&args.output_dir).await {
                Ok(path) => println!("Saved: {}", path.display()),
                Err(e) => {
                    error!("Failed to save {}: {}", download.filename, e);
                    println!(
                        "Error: Could not save {} to {}.",
                        download.filename,
                        args.output_dir.display()
                    );
                }
            }
        }
    }
}
