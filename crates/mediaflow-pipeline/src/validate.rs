//! Upload validation.
//!
//! Rejections here happen before any pipeline step runs: unsupported
//! file types and missing or oversized files never reach the prober or
//! the storage client.

use std::path::Path;

use crate::error::{PipelineError, PipelineResult};

/// Validated upload: content type and size of the local file.
#[derive(Debug, Clone)]
pub struct UploadInfo {
    pub content_type: &'static str,
    pub size_bytes: u64,
}

/// Check the local file and resolve its content type.
pub async fn validate_upload(
    path: impl AsRef<Path>,
    max_upload_bytes: u64,
) -> PipelineResult<UploadInfo> {
    let path = path.as_ref();

    let content_type = content_type_for(path).ok_or_else(|| {
        PipelineError::validation(format!(
            "only audio and video files are allowed: {}",
            path.display()
        ))
    })?;

    let meta = tokio::fs::metadata(path).await.map_err(|_| {
        PipelineError::validation(format!("uploaded file not found: {}", path.display()))
    })?;

    if meta.len() > max_upload_bytes {
        return Err(PipelineError::validation(format!(
            "file exceeds the {} byte upload limit ({} bytes)",
            max_upload_bytes,
            meta.len()
        )));
    }

    Ok(UploadInfo {
        content_type,
        size_bytes: meta.len(),
    })
}

/// Content type for a file extension; `None` for non-media files.
fn content_type_for(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_lowercase();
    match ext.as_str() {
        "mp3" => Some("audio/mpeg"),
        "wav" => Some("audio/wav"),
        "m4a" => Some("audio/mp4"),
        "aac" => Some("audio/aac"),
        "ogg" => Some("audio/ogg"),
        "flac" => Some("audio/flac"),
        "webm" => Some("video/webm"),
        "mp4" => Some("video/mp4"),
        "mov" => Some("video/quicktime"),
        "mkv" => Some("video/x-matroska"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_content_type_mapping() {
        assert_eq!(
            content_type_for(Path::new("a.mp3")),
            Some("audio/mpeg")
        );
        assert_eq!(
            content_type_for(Path::new("A.MP4")),
            Some("video/mp4")
        );
        assert_eq!(content_type_for(Path::new("notes.txt")), None);
        assert_eq!(content_type_for(Path::new("no_extension")), None);
    }

    #[tokio::test]
    async fn test_validate_rejects_missing_file() {
        let err = validate_upload("/nonexistent/a.mp3", 1024).await.unwrap_err();
        assert!(matches!(err, PipelineError::Validation(_)));
    }

    #[tokio::test]
    async fn test_validate_rejects_oversized_file() {
        let mut file = tempfile::Builder::new().suffix(".mp3").tempfile().unwrap();
        file.write_all(&vec![0u8; 2048]).unwrap();

        let err = validate_upload(file.path(), 1024).await.unwrap_err();
        assert!(matches!(err, PipelineError::Validation(_)));
    }

    #[tokio::test]
    async fn test_validate_accepts_small_audio_file() {
        let mut file = tempfile::Builder::new().suffix(".wav").tempfile().unwrap();
        file.write_all(&vec![0u8; 512]).unwrap();

        let info = validate_upload(file.path(), 1024).await.unwrap();
        assert_eq!(info.content_type, "audio/wav");
        assert_eq!(info.size_bytes, 512);
    }
}
