//! File uploader client

mod config;
mod constants;
mod delete;
mod download;
mod logger;
mod response;
mod upload;

use clap::{Parser, Subcommand};
use constants::{DEFAULT_SERVER_URL, SERVER_URL_ENV};
use std::path::PathBuf;
use upload::FileUploader;

#[derive(Parser)]
#[command(name = "fileuploader")]
#[command(about = "Upload, fetch and delete files through the file uploader gateway")]
struct Cli {
    /// Server URL
    #[arg(short, long, global = true, env = SERVER_URL_ENV, default_value = DEFAULT_SERVER_URL)]
    server: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Upload a file into a folder
    Upload {
        /// Destination folder
        #[arg(short, long)]
        folder: String,
        /// File to upload
        file: PathBuf,
    },
    /// Upload several files into a folder in one request
    UploadMulti {
        /// Destination folder
        #[arg(short, long)]
        folder: String,
        /// Files to upload
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Download a file by render URL or token
    Download {
        /// Render URL or bare token
        target: String,
        /// Output file or directory (default: server-provided name in the current directory)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Delete a file by render URL or token
    Delete {
        /// Render URL or bare token
        target: String,
    },
}

fn main() -> anyhow::Result<()> {
    logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Upload { folder, file } => {
            FileUploader::new(&cli.server, folder).upload(&file)?;
        }
        Commands::UploadMulti { folder, files } => {
            FileUploader::new(&cli.server, folder).upload_multi(&files)?;
        }
        Commands::Download { target, output } => {
            download::download_file(&cli.server, &target, output.as_deref())?;
        }
        Commands::Delete { target } => {
            delete::delete_file(&cli.server, &target)?;
        }
    }

    Ok(())
}
