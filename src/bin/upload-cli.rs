use std::path::PathBuf;

use clap::{Parser, Subcommand};
use reqwest::multipart::{Form, Part};
use serde_json::Value;

#[derive(Parser)]
#[command(name = "upload-cli")]
#[command(about = "Command-line client for the folder upload service", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:9000")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check service health
    Health,
    /// Upload one or more files
    Upload {
        /// Folder name (single-folder scheme)
        #[arg(long)]
        folder: Option<String>,
        /// Company name (hierarchical scheme)
        #[arg(long)]
        company: Option<String>,
        /// Project name (hierarchical scheme)
        #[arg(long)]
        project: Option<String>,
        /// Title name (hierarchical scheme)
        #[arg(long)]
        title: Option<String>,
        /// Files to upload
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    match cli.command {
        Commands::Health => {
            let res = client.get(format!("{}/health", cli.url)).send().await?;
            print_response(res).await?;
        }
        Commands::Upload {
            folder,
            company,
            project,
            title,
            files,
        } => {
            let mut form = Form::new();
            for (name, value) in [
                ("folderName", folder),
                ("companyName", company),
                ("projectName", project),
                ("titleName", title),
            ] {
                if let Some(value) = value {
                    form = form.text(name, value);
                }
            }

            for path in files {
                let file_name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .ok_or_else(|| format!("not a file path: {}", path.display()))?;
                let bytes = tokio::fs::read(&path).await?;
                form = form.part("files", Part::bytes(bytes).file_name(file_name));
            }

            let res = client
                .post(format!("{}/upload", cli.url))
                .multipart(form)
                .send()
                .await?;
            print_response(res).await?;
        }
    }

    Ok(())
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let text = res.text().await?;

    match serde_json::from_str::<Value>(&text) {
        Ok(json) if status.is_success() => println!("{}", serde_json::to_string_pretty(&json)?),
        Ok(json) => {
            eprintln!("Error: upload service returned status {}", status);
            eprintln!("{}", serde_json::to_string_pretty(&json)?);
        }
        Err(_) => {
            eprintln!("Error: upload service returned status {}", status);
            eprintln!("Response: {}", text);
        }
    }
    Ok(())
}
