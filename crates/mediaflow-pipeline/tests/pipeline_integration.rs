//! End-to-end pipeline integration tests.

use std::io::Write;

use mediaflow_models::MediaStatus;
use mediaflow_pipeline::{MediaService, PipelineConfig, PipelineError, ProcessingContext};

async fn live_service() -> MediaService {
    dotenvy::dotenv().ok();
    let ctx = ProcessingContext::new(PipelineConfig::from_env())
        .await
        .expect("Failed to create processing context");
    MediaService::new(ctx)
}

/// Full pipeline run: create, process, verify the ready-state invariant.
#[tokio::test]
#[ignore = "requires storage, Firestore, speech and LLM credentials"]
async fn test_create_and_process() {
    let service = live_service().await;
    let owner_id = "test_user_pipeline";

    let mut file = tempfile::Builder::new().suffix(".mp3").tempfile().unwrap();
    file.write_all(&vec![0u8; 32_000]).unwrap();
    let (_, path) = file.keep().unwrap();

    let created = service
        .create_media_item(&path, Some("pipeline test".to_string()), owner_id)
        .await
        .expect("Creation failed");

    service
        .process_media_item(owner_id, &created.id)
        .await
        .expect("Processing invocation failed");

    let detail = service
        .get_media_item(owner_id, &created.id)
        .await
        .expect("Fetch failed");

    match detail.item.status {
        MediaStatus::Ready => {
            assert!(detail.item.ready_invariant_holds());
            assert!(detail.transcript_text.is_some());
            assert!(detail.summary_text.is_some());
            assert!(!detail.tag_names.is_empty());
        }
        MediaStatus::Error => {
            // A zero-filled file may legitimately fail transcription;
            // the error state must still leave refs unset
            assert!(detail.item.transcript_ref.is_none());
            assert!(detail.item.summary_ref.is_none());
        }
        other => panic!("item left in non-terminal state {}", other),
    }

    service
        .delete_media_item(owner_id, &created.id)
        .await
        .expect("Delete failed");
}

/// Derived features must be rejected without a transcript.
#[tokio::test]
#[ignore = "requires storage, Firestore, speech and LLM credentials"]
async fn test_derived_features_require_transcript() {
    let service = live_service().await;
    let owner_id = "test_user_pipeline";

    let mut file = tempfile::Builder::new().suffix(".mp3").tempfile().unwrap();
    file.write_all(&vec![0u8; 16_000]).unwrap();
    let (_, path) = file.keep().unwrap();

    let created = service
        .create_media_item(&path, None, owner_id)
        .await
        .expect("Creation failed");

    // No processing has run, so the item has no transcript yet
    let err = service
        .generate_action_items(owner_id, &created.id)
        .await
        .unwrap_err();
    assert!(matches!(err, PipelineError::MissingTranscript(_)));

    let err = service
        .generate_illustration(owner_id, &created.id)
        .await
        .unwrap_err();
    assert!(matches!(err, PipelineError::MissingTranscript(_)));

    service
        .delete_media_item(owner_id, &created.id)
        .await
        .expect("Delete failed");
}
