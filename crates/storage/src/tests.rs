use crate::{LocalObjectStore, ObjectStore, StorageError, StorageResult};
use futures_util::StreamExt;
use tempfile::tempdir;

async fn collect(mut stream: crate::ObjectBody) -> StorageResult<Vec<u8>> {
    let mut out = Vec::new();
    while let Some(chunk) = stream.next().await {
        out.extend_from_slice(&chunk?);
    }
    Ok(out)
}

async fn seed(dir: &std::path::Path, container: &str, key: &str, data: &[u8]) {
    let path = dir.join(container).join(key);
    tokio::fs::create_dir_all(path.parent().unwrap())
        .await
        .unwrap();
    tokio::fs::write(path, data).await.unwrap();
}

#[tokio::test]
async fn test_local_store_open_and_read() {
    let temp_dir = tempdir().unwrap();
    let store = LocalObjectStore::new(temp_dir.path().to_path_buf());

    let test_data = b"Hello, world!";
    seed(temp_dir.path(), "photos", "greeting.txt", test_data).await;

    let object = store.open_read("photos", "greeting.txt").await.unwrap();
    assert_eq!(object.metadata.size, Some(test_data.len() as u64));

    let body = collect(object.body).await.unwrap();
    assert_eq!(body, test_data);
}

#[tokio::test]
async fn test_local_store_streams_large_objects_in_chunks() {
    let temp_dir = tempdir().unwrap();
    let store = LocalObjectStore::new(temp_dir.path().to_path_buf());

    // Larger than one read chunk, so the body arrives in several pieces.
    let test_data = vec![0xA5u8; 300 * 1024];
    seed(temp_dir.path(), "blobs", "big.bin", &test_data).await;

    let object = store.open_read("blobs", "big.bin").await.unwrap();
    let mut body = object.body;
    let mut chunks = 0usize;
    let mut total = Vec::new();
    while let Some(chunk) = body.next().await {
        chunks += 1;
        total.extend_from_slice(&chunk.unwrap());
    }

    assert!(chunks > 1, "expected chunked delivery, got {chunks} chunk(s)");
    assert_eq!(total, test_data);
}

#[tokio::test]
async fn test_local_store_path_validation() {
    let temp_dir = tempdir().unwrap();
    let store = LocalObjectStore::new(temp_dir.path().to_path_buf());

    // Directory traversal protection.
    let result = store.open_read("photos", "../outside.txt").await;
    assert!(matches!(result, Err(StorageError::InvalidPath(_))));

    let result = store.open_read("photos", "./nested/../outside.txt").await;
    assert!(matches!(result, Err(StorageError::InvalidPath(_))));

    // Container keys cannot escape either.
    let result = store.open_read("a/b", "file.txt").await;
    assert!(matches!(result, Err(StorageError::InvalidPath(_))));

    let result = store.open_read("photos", "").await;
    assert!(matches!(result, Err(StorageError::InvalidPath(_))));
}

#[tokio::test]
async fn test_local_store_content_type_detection() {
    let temp_dir = tempdir().unwrap();
    let store = LocalObjectStore::new(temp_dir.path().to_path_buf());

    let cases = [
        ("image.jpg", "image/jpeg"),
        ("image.png", "image/png"),
        ("vector.svg", "image/svg+xml"),
        ("clip.mp4", "video/mp4"),
        ("unknown.xyz", "application/octet-stream"),
    ];

    for (key, expected) in cases {
        seed(temp_dir.path(), "media", key, b"test").await;
        let object = store.open_read("media", key).await.unwrap();
        assert_eq!(object.metadata.content_type.as_deref(), Some(expected));
    }
}

#[tokio::test]
async fn test_local_store_open_nonexistent() {
    let temp_dir = tempdir().unwrap();
    let store = LocalObjectStore::new(temp_dir.path().to_path_buf());

    let result = store.open_read("photos", "nonexistent.png").await;
    assert!(matches!(result, Err(StorageError::NotFound(_))));
}

#[tokio::test]
async fn test_local_store_concurrent_reads() {
    let temp_dir = tempdir().unwrap();
    let store = std::sync::Arc::new(LocalObjectStore::new(temp_dir.path().to_path_buf()));

    for i in 0..10 {
        seed(
            temp_dir.path(),
            "concurrent",
            &format!("file_{i}.txt"),
            format!("test data {i}").as_bytes(),
        )
        .await;
    }

    let mut handles = vec![];
    for i in 0..10 {
        let store = store.clone();
        handles.push(tokio::spawn(async move {
            let object = store
                .open_read("concurrent", &format!("file_{i}.txt"))
                .await
                .unwrap();
            let body = collect(object.body).await.unwrap();
            assert_eq!(body, format!("test data {i}").as_bytes());
        }));
    }

    for handle in handles {
        handle.await.unwrap();
    }
}

#[test]
fn test_storage_config_default_is_local() {
    let config = crate::StorageConfig::default();
    assert!(matches!(
        config.storage_type,
        crate::StorageType::Local { .. }
    ));
}

#[tokio::test]
async fn test_storage_config_create_local_store() {
    let temp_dir = tempdir().unwrap();
    let config = crate::StorageConfig {
        storage_type: crate::StorageType::Local {
            path: temp_dir.path().to_path_buf(),
        },
    };

    // Just test that we can create the store without errors.
    let _store = config.create_store().unwrap();
}
