use std::{
	sync::{Arc, atomic::Ordering},
	time::Duration,
};

use mailsift_service::{Error, SUMMARY_FALLBACK};

use super::{MemoryStore, ScriptedGenerator, TableEmbedding};

const TEXT: &str = "Acme Inc report on the term loan repayment.";

fn service_with(
	cfg: mailsift_config::Config,
	generator: Arc<ScriptedGenerator>,
) -> mailsift_service::MailSiftService {
	super::build_service(
		cfg,
		Arc::new(MemoryStore::default()),
		Arc::new(TableEmbedding::new(&[])),
		generator,
	)
}

#[tokio::test]
async fn entities_below_the_confidence_floor_are_discarded() {
	let generator = Arc::new(ScriptedGenerator::new(|_, _| {
		Ok("Entity: Acme Corp, Type: ORG, Confidence Score: 0.79".to_string())
	}));
	let service = service_with(super::test_config(), generator);
	let entities = service.extract_named_entities(TEXT).await.expect("Extraction failed.");

	assert!(entities.is_empty());
}

#[tokio::test]
async fn entities_above_the_confidence_floor_are_kept() {
	let generator = Arc::new(ScriptedGenerator::new(|_, _| {
		Ok("**Entity: Acme Corp, Type: ORG, Confidence Score: 0.81**\n\
		    Entity: Bad Line, Type: ORG, Confidence Score: high\n\
		    Entity: USD 5,000,000, Type: AMOUNT, Confidence Score: 0.95"
			.to_string())
	}));
	let service = service_with(super::test_config(), generator.clone());
	let entities = service.extract_named_entities(TEXT).await.expect("Extraction failed.");

	assert_eq!(entities.len(), 2);
	assert_eq!(entities[0].entity, "Acme Corp");
	assert_eq!(entities[0].label, "ORG");
	assert_eq!(entities[1].entity, "USD 5,000,000");
	assert_eq!(generator.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn key_phrase_prompt_carries_merged_entity_names() {
	let generator = Arc::new(ScriptedGenerator::new(|_, _| {
		Ok("ACME INC, Q3 2024 results, term loan, , REPAYMENT".to_string())
	}));
	let service = service_with(super::test_config(), generator.clone());
	let phrases = service.extract_key_phrases("Acme Inc report").await.expect("Extraction failed.");

	assert_eq!(phrases, vec!["ACME INC", "term loan", "REPAYMENT"]);

	let prompts = generator.prompts.lock().expect("prompts lock poisoned");

	assert!(prompts[0].ends_with("ACME INC REPORT"));
}

#[test]
fn configured_merge_terms_replace_the_default_vocabulary() {
	let mut cfg = super::test_config();

	cfg.extraction.merge_terms = Some(vec!["WIDGETS".to_string()]);

	let service = service_with(cfg, Arc::new(ScriptedGenerator::new(|_, _| Ok(String::new()))));
	let vocab = service.merge_vocabulary();
	let words = vocab.tokenize("Acme widgets Inc");

	assert!(vocab.contains("WIDGETS"));
	assert!(!vocab.contains("INC"));
	assert_eq!(vocab.merge(&words), vec!["ACME WIDGETS", "INC"]);
}

#[tokio::test]
async fn summary_falls_back_after_exhausting_retries() {
	let generator = Arc::new(ScriptedGenerator::new(|_, _| Err("connection reset".to_string())));
	let service = service_with(super::test_config(), generator.clone());
	let summary = service.generate_summary(TEXT).await.expect("Summary failed.");

	assert_eq!(summary, SUMMARY_FALLBACK);
	assert_eq!(generator.calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn empty_reply_is_retried() {
	let generator = Arc::new(ScriptedGenerator::new(|_, index| match index {
		0 => Ok("  ".to_string()),
		_ => Ok(" Acme asks to reschedule the repayment. ".to_string()),
	}));
	let service = service_with(super::test_config(), generator.clone());
	let summary = service.generate_summary(TEXT).await.expect("Summary failed.");

	assert_eq!(summary, "Acme asks to reschedule the repayment.");
	assert_eq!(generator.calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn extraction_stages_use_the_extraction_temperature() {
	let generator = Arc::new(ScriptedGenerator::new(|_, _| Ok("Summary.".to_string())));
	let service = service_with(super::test_config(), generator.clone());

	service.generate_summary(TEXT).await.expect("Summary failed.");

	assert_eq!(generator.temperatures.lock().expect("temperatures lock poisoned")[0], 0.2);
}

#[tokio::test]
async fn exhausted_entity_and_phrase_stages_return_empty_lists() {
	let generator = Arc::new(ScriptedGenerator::new(|_, _| Err("overloaded".to_string())));
	let service = service_with(super::test_config(), generator.clone());

	assert!(service.extract_named_entities(TEXT).await.expect("Extraction failed.").is_empty());
	assert!(service.extract_key_phrases(TEXT).await.expect("Extraction failed.").is_empty());
	assert_eq!(generator.calls.load(Ordering::SeqCst), 6);
}

#[tokio::test]
async fn blank_text_is_rejected_before_any_call() {
	let generator = Arc::new(ScriptedGenerator::new(|_, _| Ok("unused".to_string())));
	let service = service_with(super::test_config(), generator.clone());
	let err = service.extract_named_entities("   ").await.expect_err("Expected invalid input.");

	assert!(matches!(err, Error::InvalidInput { .. }));
	assert_eq!(err.to_string(), "Invalid input: Text must be a non-empty string.");
	assert!(service.generate_summary("").await.is_err());
	assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test(start_paused = true)]
async fn backoff_doubles_between_attempts() {
	let mut cfg = super::test_config();

	cfg.extraction.backoff_base_ms = 1_000;

	let generator = Arc::new(ScriptedGenerator::new(|_, _| Err("timeout".to_string())));
	let service = service_with(cfg, generator.clone());
	let started = tokio::time::Instant::now();
	let summary = service.generate_summary(TEXT).await.expect("Summary failed.");
	let elapsed = started.elapsed();

	assert_eq!(summary, SUMMARY_FALLBACK);
	assert_eq!(generator.calls.load(Ordering::SeqCst), 3);
	// 1s after the first failure, 2s after the second, nothing after the last.
	assert!(elapsed >= Duration::from_secs(3));
	assert!(elapsed < Duration::from_millis(3_100));
}
