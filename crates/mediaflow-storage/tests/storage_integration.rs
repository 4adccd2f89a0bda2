//! Object storage integration tests.

use std::io::Write;

use mediaflow_storage::StorageClient;

/// Test storage connectivity.
#[tokio::test]
#[ignore = "requires storage credentials"]
async fn test_storage_connectivity() {
    dotenvy::dotenv().ok();

    let client = StorageClient::from_env()
        .await
        .expect("Failed to create storage client");

    client
        .check_connectivity()
        .await
        .expect("Storage connectivity check failed");
}

/// Test the upload contract: public URL returned, local file deleted.
#[tokio::test]
#[ignore = "requires storage credentials"]
async fn test_upload_and_delete() {
    dotenvy::dotenv().ok();

    let client = StorageClient::from_env()
        .await
        .expect("Failed to create storage client");

    let mut file = tempfile::Builder::new().suffix(".mp3").tempfile().unwrap();
    file.write_all(&vec![0u8; 1024]).unwrap();
    let (_, path) = file.keep().unwrap();

    let uploaded = client
        .upload_media(&path, "audio/mpeg")
        .await
        .expect("Upload failed");

    assert!(uploaded.url.contains("media/audio/"));
    assert!(!path.exists(), "local temp file should be deleted");
    assert!(client.exists(&uploaded.key).await.unwrap());

    client
        .delete_object(&uploaded.key)
        .await
        .expect("Delete failed");
    assert!(!client.exists(&uploaded.key).await.unwrap());
}
