use anyhow::Result;
use ats_optimizer::app::App;
use ats_optimizer::document::{UploadedDocument, DOCX_MIME, DOC_MIME, PDF_MIME};
use clap::Parser;
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "ats-optimizer")]
#[command(about = "Analyze a resume against a job description")]
struct CliArgs {
    /// Resume file (.pdf, .docx, or .doc).
    #[arg(value_name = "RESUME")]
    resume: PathBuf,

    /// Job description text, or a path to a file containing it.
    #[arg(long, value_name = "TEXT_OR_PATH")]
    job: String,

    /// Also generate recruiter outreach messages.
    #[arg(long)]
    outreach: bool,

    /// User ID to record the analysis under.
    #[arg(long, default_value = "local")]
    user: String,
}

fn mime_for_path(path: &PathBuf) -> std::result::Result<&'static str, String> {
    match path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("pdf") => Ok(PDF_MIME),
        Some("docx") => Ok(DOCX_MIME),
        Some("doc") => Ok(DOC_MIME),
        other => Err(format!(
            "Unsupported resume extension '{}'. Expected .pdf, .docx, or .doc",
            other.unwrap_or("")
        )),
    }
}

fn job_description(arg: &str) -> Result<String> {
    let path = PathBuf::from(arg);
    if path.is_file() {
        Ok(std::fs::read_to_string(path)?)
    } else {
        Ok(arg.to_string())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ats_optimizer=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = CliArgs::parse();

    let mime_type = match mime_for_path(&args.resume) {
        Ok(mime) => mime,
        Err(message) => {
            error!("{}", message);
            std::process::exit(1);
        }
    };

    let bytes = std::fs::read(&args.resume)?;
    let file_name = args
        .resume
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("resume")
        .to_string();
    let document = UploadedDocument::new(file_name, mime_type, bytes);
    let job = job_description(&args.job)?;

    let app = match App::new() {
        Ok(app) => app,
        Err(e) => {
            error!("Failed to initialize application: {}", e);
            std::process::exit(1);
        }
    };

    match app.run_analysis(&document, &job).await {
        Ok(result) => {
            println!("{}", serde_json::to_string_pretty(&result)?);
            app.record_analysis(&args.user, &job, result).await?;
            info!("Analysis recorded for user {}", args.user);
        }
        Err(e) => {
            error!("Analysis failed: {} ({})", e.user_message(), e);
            std::process::exit(1);
        }
    }

    if args.outreach {
        match app.run_outreach(&document, &job).await {
            Ok(content) => println!("{}", serde_json::to_string_pretty(&content)?),
            Err(e) => {
                error!("Outreach generation failed: {} ({})", e.user_message(), e);
                std::process::exit(1);
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::mime_for_path;
    use std::path::PathBuf;

    #[test]
    fn test_mime_for_path_known_extensions() {
        assert_eq!(
            mime_for_path(&PathBuf::from("resume.PDF")).unwrap(),
            "application/pdf"
        );
        assert!(mime_for_path(&PathBuf::from("resume.docx"))
            .unwrap()
            .contains("wordprocessingml"));
    }

    #[test]
    fn test_mime_for_path_rejects_unknown_extensions() {
        let err = mime_for_path(&PathBuf::from("resume.txt")).unwrap_err();
        assert!(err.contains(".pdf"));
    }
}
