mod codec;
mod error;
mod generator;
mod models;
mod transform;
mod utils;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use codec::{parse_lines, CompactRecordParser, FullRecordParser};
use generator::{source_for, GeneratorConfig, OfferGenerator, TsvOfferGenerator};
use jsonwebtoken::Algorithm;
use models::dto::{UpdateOffer, Validate};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde_json::json;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;
use transform::{transform_object, PathRewriter};
use utils::{
    create_error_object, create_jwt, create_sha256, get_error_message, get_full_server_path,
    transform_errors, ServiceError,
};

#[derive(Parser)]
#[command(name = "six-cities-mock", version, about = "Mock rental offer generator and import tooling")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Write `count` generated offers, one tab separated line each
    Generate {
        count: usize,
        output: PathBuf,
        /// Mock server URL or JSON file with the value pools (built-in sample if omitted)
        #[arg(long)]
        source: Option<String>,
        /// Seed for reproducible output
        #[arg(long)]
        seed: Option<u64>,
        /// JSON file overriding the generator ranges
        #[arg(long)]
        config: Option<PathBuf>,
        /// Write the compact layout, with this id in place of the embedded user
        #[arg(long)]
        user_id: Option<String>,
    },
    /// Decode a tab separated offer file into JSON
    Import {
        input: PathBuf,
        /// Input uses the compact layout (user id instead of embedded user)
        #[arg(long)]
        compact: bool,
        /// Hash seed user passwords with this salt
        #[arg(long)]
        salt: Option<String>,
        #[arg(long, default_value = "imported_offers.json")]
        output: PathBuf,
    },
    /// Prefix image paths in a JSON document with the server's asset paths
    RewritePaths {
        input: PathBuf,
        #[arg(long = "property", required = true)]
        properties: Vec<String>,
        #[arg(long, default_value = "localhost")]
        host: String,
        #[arg(long, default_value_t = 4000)]
        port: u16,
        #[arg(long, default_value = "static")]
        static_dir: String,
        #[arg(long, default_value = "upload")]
        upload_dir: String,
        /// Image names served from the static directory (defaults to the bundled list)
        #[arg(long = "static-image")]
        static_images: Vec<String>,
    },
    /// Check an offer update payload against the offer constraints
    ValidateUpdate { input: PathBuf },
    /// HMAC-SHA256 a value the way stored passwords are hashed
    Hash {
        line: String,
        #[arg(long)]
        salt: String,
    },
    /// Sign a token for a user
    Token {
        #[arg(long)]
        secret: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        id: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    if let Err(err) = run(cli.command).await {
        error!("{}", get_error_message(&err));
        std::process::exit(1);
    }
}

async fn run(command: Command) -> Result<()> {
    match command {
        Command::Generate {
            count,
            output,
            source,
            seed,
            config,
            user_id,
        } => {
            let options = GenerateOptions {
                source: source.as_deref(),
                seed,
                config_path: config.as_deref(),
                user_id: user_id.as_deref(),
            };
            generate(count, &output, options).await
        }
        Command::Import {
            input,
            compact,
            salt,
            output,
        } => import(&input, compact, salt.as_deref(), &output).await,
        Command::RewritePaths {
            input,
            properties,
            host,
            port,
            static_dir,
            upload_dir,
            static_images,
        } => {
            let raw = tokio::fs::read_to_string(&input)
                .await
                .with_context(|| format!("Failed to read {}", input.display()))?;
            let mut data: serde_json::Value = serde_json::from_str(&raw)
                .with_context(|| format!("Failed to parse {}", input.display()))?;

            let server = get_full_server_path(&host, port);
            let static_base = format!("{server}/{static_dir}");
            let upload_base = format!("{server}/{upload_dir}");
            if static_images.is_empty() {
                transform_object(properties.as_slice(), &static_base, &upload_base, &mut data);
            } else {
                PathRewriter::new(static_base, upload_base)
                    .with_static_images(static_images)
                    .transform_object(properties.as_slice(), &mut data);
            }

            println!("{}", serde_json::to_string_pretty(&data)?);
            Ok(())
        }
        Command::ValidateUpdate { input } => {
            let raw = tokio::fs::read_to_string(&input)
                .await
                .with_context(|| format!("Failed to read {}", input.display()))?;
            let update: UpdateOffer = serde_json::from_str(&raw)
                .with_context(|| format!("Failed to parse offer update in {}", input.display()))?;

            let errors = update.validate();
            if errors.is_empty() {
                info!("✅ Offer update is valid");
                return Ok(());
            }

            let report = create_error_object(
                ServiceError::ValidationError,
                format!("Validation error: {}", input.display()),
                transform_errors(&errors),
            );
            println!("{}", serde_json::to_string_pretty(&report)?);
            anyhow::bail!("{} invalid field(s)", errors.len())
        }
        Command::Hash { line, salt } => {
            println!("{}", create_sha256(&line, &salt)?);
            Ok(())
        }
        Command::Token { secret, email, id } => {
            let token = create_jwt(Algorithm::HS256, &secret, &json!({ "email": email, "id": id }))?;
            println!("{token}");
            Ok(())
        }
    }
}

struct GenerateOptions<'a> {
    source: Option<&'a str>,
    seed: Option<u64>,
    config_path: Option<&'a Path>,
    user_id: Option<&'a str>,
}

async fn generate(count: usize, output: &Path, options: GenerateOptions<'_>) -> Result<()> {
    let source = source_for(options.source)?;
    info!("Loading mock data from {}", source.source_name());
    let mock_data = source.load().await?;

    let config = match options.config_path {
        Some(path) => {
            let raw = tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("Failed to read {}", path.display()))?;
            serde_json::from_str::<GeneratorConfig>(&raw)
                .with_context(|| format!("Failed to parse generator config in {}", path.display()))?
        }
        None => GeneratorConfig::default(),
    };
    config.validate()?;

    let rng = match options.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut generator = TsvOfferGenerator::with_rng(mock_data, config, rng);

    let mut content = String::new();
    for _ in 0..count {
        let line = match options.user_id {
            Some(user_id) => CompactRecordParser::encode(&generator.generate_offer()?, user_id),
            None => generator.generate()?,
        };
        content.push_str(&line);
        content.push('\n');
    }

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(output, content)
        .await
        .with_context(|| format!("Failed to write {}", output.display()))?;

    info!("💾 Wrote {} offers to {}", count, output.display());
    Ok(())
}

async fn import(input: &Path, compact: bool, salt: Option<&str>, output: &Path) -> Result<()> {
    let content = tokio::fs::read_to_string(input)
        .await
        .with_context(|| format!("Failed to read {}", input.display()))?;

    let json = if compact {
        let records = parse_lines::<CompactRecordParser>(&content);
        if salt.is_some() {
            warn!("Compact records carry no password, --salt ignored");
        }
        report_invalid(&records);
        info!("Decoded {} compact offers", records.len());
        serde_json::to_string_pretty(&records)?
    } else {
        let mut records = parse_lines::<FullRecordParser>(&content);
        if let Some(salt) = salt {
            for record in &mut records {
                record.user.password = create_sha256(&record.user.password, salt)?;
            }
        }
        report_invalid(&records);
        info!("Decoded {} full offers", records.len());
        serde_json::to_string_pretty(&records)?
    };

    tokio::fs::write(output, json)
        .await
        .with_context(|| format!("Failed to write {}", output.display()))?;
    info!("💾 Saved offers to {}", output.display());
    Ok(())
}

/// Log one error object per record that breaks the offer constraints
fn report_invalid<T: Validate>(records: &[T]) {
    for (line, record) in records.iter().enumerate() {
        let errors = record.validate();
        if errors.is_empty() {
            continue;
        }

        let report = create_error_object(
            ServiceError::ValidationError,
            format!("Record {} is invalid", line + 1),
            transform_errors(&errors),
        );
        warn!("{}", serde_json::to_string(&report).unwrap_or_default());
    }
}
