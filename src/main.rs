//! Markdown Styler command line client.
//!
//! # Usage
//!
//! ```bash
//! # Render one preview into a standalone HTML page
//! markdown-styler preview notes.md --out notes.html
//!
//! # Export a PDF into the downloads directory and open it
//! markdown-styler --theme theme.json export notes.md --open
//! ```

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};

use markdown_styler::app::controllers::export::ExportOutcome;
use markdown_styler::app::controllers::preview::PreviewOutcome;
use markdown_styler::app::infrastructure::surface::LoadingOverlay;
use markdown_styler::app::services::download::DirectoryDownloads;
use markdown_styler::app::services::render_client::{FileToken, HttpRenderClient, NoToken, StaticToken, TokenSource};
use markdown_styler::app::{AppError, ClientSettings, EditorSession, InMemoryControls, SessionServices, ThemeDefaults};
use markdown_styler::ui::console::ConsoleSurface;
use markdown_styler::ui::preview_page::PreviewPage;

#[derive(Parser)]
#[command(name = "markdown-styler")]
#[command(about = "Styled previews and PDF exports of Markdown documents")]
#[command(version)]
struct Cli {
    /// Render service base URL (overrides the settings file)
    #[arg(long, global = true, env = "MARKDOWN_STYLER_SERVER")]
    server: Option<String>,

    /// Anti-forgery token sent with every request
    #[arg(long, global = true, env = "MARKDOWN_STYLER_CSRF_TOKEN", conflicts_with = "csrf_token_file")]
    csrf_token: Option<String>,

    /// File holding the anti-forgery token, re-read before every request
    #[arg(long, global = true)]
    csrf_token_file: Option<PathBuf>,

    /// JSON file with the default theme
    #[arg(long, global = true)]
    theme: Option<PathBuf>,

    /// Only print errors and results
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a preview into a standalone HTML file
    Preview {
        /// Markdown source
        markdown: PathBuf,

        /// Where to write the HTML page
        #[arg(short, long, default_value = "preview.html")]
        out: PathBuf,
    },

    /// Export a PDF
    Export {
        /// Markdown source
        markdown: PathBuf,

        /// Directory the PDF is saved in (defaults to the downloads directory)
        #[arg(short, long)]
        dir: Option<PathBuf>,

        /// Open the PDF once saved
        #[arg(long)]
        open: bool,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode, AppError> {
    let mut settings = ClientSettings::load();
    if let Some(server) = cli.server {
        settings.server_url = server;
    }

    let token: Arc<dyn TokenSource> = match (cli.csrf_token, cli.csrf_token_file) {
        (Some(token), _) => Arc::new(StaticToken(token)),
        (None, Some(path)) => Arc::new(FileToken(path)),
        (None, None) => Arc::new(NoToken),
    };
    let renderer = Arc::new(HttpRenderClient::new(&settings, token)?);

    let defaults = match &cli.theme {
        Some(path) => ThemeDefaults::parse(&fs::read_to_string(path)?),
        None => ThemeDefaults::default(),
    };
    let console = Arc::new(ConsoleSurface::new(cli.quiet));

    match cli.command {
        Commands::Preview { markdown, out } => {
            let text = fs::read_to_string(&markdown)?;
            let page = Arc::new(PreviewPage::new(out));
            let session = EditorSession::new(
                defaults,
                Box::new(InMemoryControls::new()),
                text,
                SessionServices {
                    renderer,
                    preview_surface: page.clone(),
                    export_surface: console.clone(),
                    overlay: Arc::new(LoadingOverlay::new(console.clone())),
                    downloads: Arc::new(DirectoryDownloads::new(settings.resolved_download_dir())),
                    debounce: settings.debounce(),
                },
            );

            match session.preview_now().outcome().await {
                PreviewOutcome::Applied => {
                    println!("{}", page.path().display());
                    Ok(ExitCode::SUCCESS)
                }
                PreviewOutcome::Failed(message) => {
                    eprintln!("Error: {}", message);
                    Ok(ExitCode::FAILURE)
                }
                PreviewOutcome::Discarded => Ok(ExitCode::FAILURE),
            }
        }
        Commands::Export { markdown, dir, open } => {
            let text = fs::read_to_string(&markdown)?;
            let dir = dir.unwrap_or_else(|| settings.resolved_download_dir());
            let session = EditorSession::new(
                defaults,
                Box::new(InMemoryControls::new()),
                text,
                SessionServices {
                    renderer,
                    preview_surface: console.clone(),
                    export_surface: console.clone(),
                    overlay: Arc::new(LoadingOverlay::new(console.clone())),
                    downloads: Arc::new(DirectoryDownloads::new(dir)),
                    debounce: settings.debounce(),
                },
            );

            match session.export().await {
                ExportOutcome::Saved(path) => {
                    println!("{}", path.display());
                    if open || settings.open_after_export {
                        if let Err(e) = open::that(&path) {
                            log::warn!("Failed to open {}: {}", path.display(), e);
                        }
                    }
                    Ok(ExitCode::SUCCESS)
                }
                // Already reported through the console alert
                ExportOutcome::Failed(_) | ExportOutcome::Busy => Ok(ExitCode::FAILURE),
            }
        }
    }
}
