use std::path::PathBuf;

use clap::{Parser, Subcommand};

use scrib::commands::{BuildImageCommand, Command, TranscribeCommand};
use scrib::context::AppContext;
use scrib::context::config::ScribConfig;
use scrib::display::{self, Level};
use scrib::error::ScribError;

#[derive(Parser)]
#[command(name = "scrib")]
#[command(author, version, about = "Transcribe audio with Whisper in a container", long_about = None)]
struct Cli {
    /// Container tool to use (podman or docker)
    #[arg(long, global = true)]
    container_tool: Option<String>,

    /// Tag for the Whisper container image
    #[arg(long, global = true)]
    image_tag: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Transcribe an audio or video file
    Transcribe {
        /// Audio or video file to transcribe
        audio_file: PathBuf,

        /// Whisper model (tiny, base, small, medium, large, large-v2, large-v3)
        #[arg(short, long, default_value = "base")]
        model: String,

        /// Language of the audio ("auto" for automatic detection)
        #[arg(short, long, default_value = "auto")]
        language: String,

        /// Output directory (default: same directory as the audio file)
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
    },
    /// Build the Whisper container image
    BuildImage {
        /// Rebuild even when the image already exists
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = ScribConfig::resolve(cli.container_tool, cli.image_tag);
    let ctx = AppContext::builder().with_config(config).build();

    let command: Box<dyn Command> = match cli.command {
        Commands::Transcribe {
            audio_file,
            model,
            language,
            output_dir,
        } => Box::new(TranscribeCommand {
            audio_file,
            model,
            language,
            output_dir,
        }),
        Commands::BuildImage { force } => Box::new(BuildImageCommand { force }),
    };

    if let Err(e) = command.execute(&ctx).await {
        display::status(Level::Error, &e.to_string());
        let code = e
            .downcast_ref::<ScribError>()
            .map(ScribError::exit_code)
            .unwrap_or(1);
        std::process::exit(code);
    }
}
