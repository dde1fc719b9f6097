//! Poster storage against a real temporary directory

use media::{MAX_POSTER_BYTES, PosterStore, PosterUpload, UploadError};

fn png(size: usize) -> PosterUpload {
    PosterUpload {
        file_name: Some("poster.png".to_string()),
        content_type: Some("image/png".to_string()),
        data: vec![7; size],
    }
}

#[tokio::test]
async fn stores_under_a_unique_name_and_returns_public_path() {
    let dir = tempfile::tempdir().unwrap();
    let store = PosterStore::new(dir.path());

    let first = store.store(&png(16)).await.unwrap();
    let second = store.store(&png(16)).await.unwrap();

    assert!(first.starts_with("/uploads/"));
    assert!(first.ends_with(".png"));
    assert_ne!(first, second);

    let name = first.trim_start_matches("/uploads/");
    let written = std::fs::read(dir.path().join(name)).unwrap();
    assert_eq!(written, vec![7; 16]);
}

#[tokio::test]
async fn creates_missing_upload_directory() {
    let dir = tempfile::tempdir().unwrap();
    let nested = dir.path().join("a").join("b");
    let store = PosterStore::new(&nested);

    store.store(&png(1)).await.unwrap();

    assert!(nested.is_dir());
}

#[tokio::test]
async fn refused_uploads_leave_no_file_behind() {
    let dir = tempfile::tempdir().unwrap();
    let store = PosterStore::new(dir.path());

    let oversized = store.store(&png(MAX_POSTER_BYTES + 1)).await.unwrap_err();
    assert!(matches!(oversized, UploadError::TooLarge { .. }));

    let pdf = PosterUpload {
        file_name: Some("doc.pdf".to_string()),
        content_type: Some("application/pdf".to_string()),
        data: vec![1; 8],
    };
    let wrong_type = store.store(&pdf).await.unwrap_err();
    assert!(matches!(wrong_type, UploadError::UnsupportedType(_)));

    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn remove_deletes_stored_poster_and_tolerates_missing_files() {
    let dir = tempfile::tempdir().unwrap();
    let store = PosterStore::new(dir.path());

    let path = store.store(&png(4)).await.unwrap();
    store.remove(&path).await.unwrap();
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);

    store.remove(&path).await.unwrap();
    store.remove("/uploads/../outside.png").await.unwrap();
}
