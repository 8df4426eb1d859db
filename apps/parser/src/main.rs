use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use serde_json::json;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use resume_parser::intake::{validate_upload, UploadLimits};
use resume_parser::runtime::parse_with_timeout;
use resume_parser::{Config, DocumentKind, ResumeParser};

const USAGE: &str = "usage: resume-parser <file> [mime-type]";

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let config = Config::from_env()?;

    // Logs go to stderr; stdout carries the JSON result only.
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("resume_parser={}", &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("Starting resume-parser v{}", env!("CARGO_PKG_VERSION"));

    let mut args = std::env::args().skip(1);
    let Some(path) = args.next().map(PathBuf::from) else {
        eprintln!("{USAGE}");
        return Ok(ExitCode::from(2));
    };

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    let Some(declared_type) = declared_type_for(&file_name, args.next()) else {
        eprintln!("cannot infer a document type from '{file_name}'; pass a MIME type\n{USAGE}");
        return Ok(ExitCode::from(2));
    };

    let bytes = tokio::fs::read(&path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let limits = UploadLimits {
        max_bytes: config.max_file_bytes,
    };
    if let Err(err) = validate_upload(bytes.len(), &declared_type, &limits) {
        println!("{}", err.to_body());
        return Ok(ExitCode::FAILURE);
    }

    let parser = Arc::new(ResumeParser::new(config.parser));
    info!(parser = ?parser.config(), file_type = %declared_type, "Parsing {file_name}");
    match parse_with_timeout(parser, bytes, file_name, declared_type, config.parse_timeout).await {
        Ok(doc) => {
            let body = json!({ "success": true, "data": doc.summary() });
            println!("{}", serde_json::to_string_pretty(&body)?);
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            error!(code = err.code(), "Parse failed: {err}");
            println!("{}", err.to_body());
            Ok(ExitCode::FAILURE)
        }
    }
}

/// An explicit MIME argument wins; otherwise the type is inferred from the
/// file extension. `None` when neither is available.
fn declared_type_for(file_name: &str, explicit: Option<String>) -> Option<String> {
    explicit.or_else(|| DocumentKind::from_extension(file_name).map(|kind| kind.mime().to_string()))
}
