use std::{
	fs,
	path::{Path, PathBuf},
	sync::Arc,
};

use clap::{
	Parser, Subcommand,
	builder::{
		Styles,
		styling::{AnsiColor, Effects},
	},
};
use color_eyre::eyre::WrapErr;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use mailsift_service::{ClassifyRequest, DuplicateMatch, MailSiftService, ParsedEmail};
use mailsift_storage::db::Db;

pub const VERSION: &str = concat!(
	env!("CARGO_PKG_VERSION"),
	"-",
	env!("VERGEN_GIT_SHA"),
	"-",
	env!("VERGEN_CARGO_TARGET_TRIPLE"),
);

#[derive(Debug, Parser)]
#[command(
	version = VERSION,
	rename_all = "kebab",
	styles = styles(),
)]
pub struct Args {
	#[arg(long, short = 'c', value_name = "FILE")]
	pub config: PathBuf,
	#[command(subcommand)]
	pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
	/// Report whether an email body duplicates a stored email.
	CheckDuplicate {
		#[arg(long, value_name = "FILE")]
		body_file: PathBuf,
		#[arg(long)]
		has_attachment: bool,
	},
	/// Store a parsed email unless it is a duplicate.
	Ingest {
		#[arg(long, value_name = "FILE")]
		input: PathBuf,
	},
	/// Extract, categorize and persist the category of a parsed email.
	Classify {
		#[arg(long, value_name = "FILE")]
		input: PathBuf,
	},
	/// Print a stored email.
	Show {
		#[arg(long)]
		email_id: i64,
	},
}

#[derive(Debug, Serialize)]
struct DuplicateCheck {
	is_duplicate: bool,
	#[serde(skip_serializing_if = "Option::is_none")]
	duplicate: Option<DuplicateMatch>,
}

pub fn styles() -> Styles {
	Styles::styled()
		.header(AnsiColor::Cyan.on_default() | Effects::BOLD)
		.usage(AnsiColor::Cyan.on_default() | Effects::BOLD)
		.literal(AnsiColor::Blue.on_default() | Effects::BOLD)
		.placeholder(AnsiColor::Green.on_default())
}

pub async fn run(args: Args) -> color_eyre::Result<()> {
	let config = mailsift_config::load(&args.config)?;
	let filter = EnvFilter::try_new(&config.service.log_level)
		.unwrap_or_else(|_| EnvFilter::new("info"));

	// Stdout carries the JSON result.
	tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

	let db = Db::connect(&config.storage.postgres).await?;

	db.ensure_schema().await?;

	tracing::info!(version = VERSION, config = %args.config.display(), "Email store ready.");

	let service = MailSiftService::new(config, Arc::new(db));

	match args.command {
		Command::CheckDuplicate { body_file, has_attachment } => {
			let body = fs::read_to_string(&body_file)
				.wrap_err_with(|| format!("Failed to read {}.", body_file.display()))?;
			let duplicate = service.find_duplicate(&body, has_attachment).await;

			print_json(&DuplicateCheck { is_duplicate: duplicate.is_some(), duplicate })
		},
		Command::Ingest { input } => {
			let email: ParsedEmail = read_json(&input)?;
			let outcome = service.store_email(&email).await?;

			print_json(&outcome)
		},
		Command::Classify { input } => {
			let request: ClassifyRequest = read_json(&input)?;
			let result = service.classify_request(&request).await;

			print_json(&result)
		},
		Command::Show { email_id } => {
			let email = service.email(email_id).await?;

			print_json(&email)
		},
	}
}

fn read_json<T>(path: &Path) -> color_eyre::Result<T>
where
	T: serde::de::DeserializeOwned,
{
	let raw = fs::read_to_string(path)
		.wrap_err_with(|| format!("Failed to read {}.", path.display()))?;

	serde_json::from_str(&raw).wrap_err_with(|| format!("Failed to parse {}.", path.display()))
}

fn print_json<T>(value: &T) -> color_eyre::Result<()>
where
	T: Serialize,
{
	println!("{}", serde_json::to_string_pretty(value)?);

	Ok(())
}
