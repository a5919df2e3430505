use std::sync::{Arc, atomic::Ordering};

use mailsift_service::{
	AttachmentText, CATEGORY_FALLBACK, ClassifyRequest, ExtractionOutput, NamedEntity,
	SUMMARY_FALLBACK,
};

use super::{MemoryStore, ScriptedGenerator, TableEmbedding};

const TEXT: &str = "Acme Inc requests a drawdown of the revolving facility.";
const ENTITIES: &str = "Entity: Acme Inc, Type: ORG, Confidence Score: 0.93\n\
	Entity: revolving facility, Type: PRODUCT, Confidence Score: 0.55";
const CATEGORY: &str = "Request Type: Commitment Change\nSub Type: Drawdown\nConfidence: 0.9";

fn service_with(
	store: Arc<MemoryStore>,
	generator: Arc<ScriptedGenerator>,
) -> mailsift_service::MailSiftService {
	super::build_service(super::test_config(), store, Arc::new(TableEmbedding::new(&[])), generator)
}

#[tokio::test]
async fn classify_writes_the_category_back() {
	let store = Arc::new(MemoryStore::with_digests(&[(TEXT, false)]));
	let generator = Arc::new(ScriptedGenerator::new(|prompt, _| {
		super::stage_reply(
			prompt,
			ENTITIES,
			"ACME INC, drawdown",
			"Acme asks for a drawdown.",
			CATEGORY,
		)
	}));
	let service = service_with(store.clone(), generator.clone());
	let result = service.classify(TEXT, Some(1), Some("loan_servicing")).await;

	assert_eq!(result.category, CATEGORY);
	assert!(result.persisted);
	assert_eq!(
		result.extraction,
		ExtractionOutput::Extracted {
			named_entities: vec![NamedEntity {
				entity: "Acme Inc".to_string(),
				label: "ORG".to_string(),
			}],
			key_phrases: vec!["ACME INC".to_string(), "drawdown".to_string()],
			summary: "Acme asks for a drawdown.".to_string(),
		}
	);
	assert_eq!(generator.calls.load(Ordering::SeqCst), 4);

	let updates = store.updates.lock().expect("updates lock poisoned");

	assert_eq!(
		updates.as_slice(),
		&[(1, Some("loan_servicing".to_string()), CATEGORY.to_string())]
	);
}

#[tokio::test]
async fn categorizer_prompt_lists_entities_without_confidence() {
	let store = Arc::new(MemoryStore::default());
	let generator = Arc::new(ScriptedGenerator::new(|prompt, _| {
		super::stage_reply(prompt, ENTITIES, "drawdown", "Summary.", CATEGORY)
	}));
	let service = service_with(store, generator.clone());

	service.classify(TEXT, None, None).await;

	let prompts = generator.prompts.lock().expect("prompts lock poisoned");
	let categorization = prompts
		.iter()
		.find(|prompt| prompt.starts_with("Categorize"))
		.expect("Expected a categorization prompt.");

	assert!(categorization.contains("\"Entity\": \"Acme Inc\""));
	assert!(categorization.contains("\"Type\": \"ORG\""));
	assert!(categorization.contains("\"key_phrases\""));
	assert!(!categorization.contains("0.93"));
}

#[tokio::test]
async fn partial_extraction_failure_still_serializes() {
	let store = Arc::new(MemoryStore::default());
	let generator = Arc::new(ScriptedGenerator::new(|prompt, _| {
		if prompt.starts_with("Extract financial entities") || prompt.starts_with("Summarize") {
			return Err("provider outage".to_string());
		}

		super::stage_reply(prompt, "", "drawdown, facility", "", CATEGORY)
	}));
	let service = service_with(store, generator);
	let result = service.classify(TEXT, None, None).await;
	let value = serde_json::to_value(&result).expect("Result must serialize.");

	assert_eq!(value["extraction"]["named_entities"], serde_json::json!([]));
	assert_eq!(value["extraction"]["key_phrases"], serde_json::json!(["drawdown", "facility"]));
	assert_eq!(value["extraction"]["summary"], SUMMARY_FALLBACK);
	assert_eq!(value["category"], CATEGORY);
	assert_eq!(value["persisted"], false);
}

#[tokio::test]
async fn invalid_text_is_reported_inside_the_result() {
	let store = Arc::new(MemoryStore::default());
	let generator = Arc::new(ScriptedGenerator::new(|prompt, _| {
		super::stage_reply(prompt, ENTITIES, "drawdown", "Summary.", CATEGORY)
	}));
	let service = service_with(store, generator.clone());
	let result = service.classify("  ", None, None).await;

	assert_eq!(
		result.extraction,
		ExtractionOutput::Failed {
			error: "Invalid input: Text must be a non-empty string.".to_string(),
		}
	);

	let value = serde_json::to_value(&result.extraction).expect("Extraction must serialize.");

	assert_eq!(
		value,
		serde_json::json!({ "error": "Invalid input: Text must be a non-empty string." })
	);
	// Only the categorizer runs, on the error payload.
	assert_eq!(generator.calls.load(Ordering::SeqCst), 1);
	assert!(generator.prompts.lock().expect("prompts lock poisoned")[0].contains("\"error\""));
}

#[tokio::test]
async fn exhausted_categorizer_skips_persistence() {
	let store = Arc::new(MemoryStore::with_digests(&[(TEXT, false)]));
	let generator = Arc::new(ScriptedGenerator::new(|prompt, _| {
		if prompt.starts_with("Categorize") {
			return Err("provider outage".to_string());
		}

		super::stage_reply(prompt, ENTITIES, "drawdown", "Summary.", "")
	}));
	let service = service_with(store.clone(), generator.clone());
	let result = service.classify(TEXT, Some(1), Some("loan_servicing")).await;

	assert_eq!(result.category, CATEGORY_FALLBACK);
	assert!(!result.persisted);
	assert!(store.updates.lock().expect("updates lock poisoned").is_empty());
	// Three extraction stages succeed once; the categorizer uses all three attempts.
	assert_eq!(generator.calls.load(Ordering::SeqCst), 6);
}

#[tokio::test]
async fn unknown_email_id_is_logged_not_raised() {
	let store = Arc::new(MemoryStore::default());
	let generator = Arc::new(ScriptedGenerator::new(|prompt, _| {
		super::stage_reply(prompt, ENTITIES, "drawdown", "Summary.", CATEGORY)
	}));
	let service = service_with(store, generator);
	let result = service.classify(TEXT, Some(42), None).await;

	assert_eq!(result.category, CATEGORY);
	assert!(!result.persisted);
}

#[tokio::test]
async fn request_merges_body_and_attachment_text() {
	let request = ClassifyRequest {
		body: Some("  Please see the attached notice.".to_string()),
		attachments: vec![
			AttachmentText { extracted_text: Some("Drawdown notice for Acme Inc.".to_string()) },
			AttachmentText { extracted_text: None },
			AttachmentText { extracted_text: Some("Amount: USD 2,000,000 ".to_string()) },
		],
		email_id: None,
		category_type: None,
	};

	assert_eq!(
		request.merged_text(),
		"Please see the attached notice. Drawdown notice for Acme Inc. Amount: USD 2,000,000"
	);

	let generator = Arc::new(ScriptedGenerator::new(|prompt, _| {
		super::stage_reply(prompt, ENTITIES, "drawdown", "Summary.", CATEGORY)
	}));
	let service = service_with(Arc::new(MemoryStore::default()), generator.clone());
	let result = service.classify_request(&request).await;

	assert_eq!(result.category, CATEGORY);
	assert!(
		generator.prompts.lock().expect("prompts lock poisoned")[0]
			.ends_with("Drawdown notice for Acme Inc. Amount: USD 2,000,000")
	);
}

#[test]
fn classify_request_deserializes_from_ingestion_payload() {
	let request: ClassifyRequest = serde_json::from_value(serde_json::json!({
		"body": "Hello",
		"attachments": [{ "extracted_text": "World" }],
		"email_id": 7,
		"category_type": "servicing"
	}))
	.expect("Payload must deserialize.");

	assert_eq!(request.merged_text(), "Hello World");
	assert_eq!(request.email_id, Some(7));
}
