//! Tests for the object storage backends and the media fetcher.

use mockito::Matcher;
use object_storage::{HttpMediaFetcher, HttpObjectStorage, LocalObjectStorage};
use playground_core::{MediaFetcher, ObjectStorage, StorageError};

/// **Test: Local storage writes the file (creating the directory) and returns its public URL.**
#[tokio::test]
async fn local_put_writes_file() {
    let dir = tempfile::tempdir().unwrap();
    let storage = LocalObjectStorage::new(dir.path().join("rendered"), "http://localhost:5000/rendered/");

    let url = storage
        .put("abc.png", vec![1, 2, 3], "image/png")
        .await
        .unwrap();

    assert_eq!(url, "http://localhost:5000/rendered/abc.png");
    assert_eq!(
        std::fs::read(dir.path().join("rendered/abc.png")).unwrap(),
        vec![1, 2, 3]
    );
}

/// **Test: Names with path separators never leave the storage directory.**
#[tokio::test]
async fn local_put_rejects_path_names() {
    let dir = tempfile::tempdir().unwrap();
    let storage = LocalObjectStorage::new(dir.path(), "http://localhost/rendered");

    for name in ["../escape.png", "a/b.png", "", ".hidden"] {
        assert!(storage.put(name, vec![0], "image/png").await.is_err(), "{name:?}");
    }
}

/// **Test: HTTP storage PUTs bytes with content type and bearer token.**
#[tokio::test]
async fn http_put_uploads_with_token() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("PUT", "/bucket/abc.jpg")
        .match_header("content-type", "image/jpeg")
        .match_header("authorization", "Bearer s3cret")
        .match_body(Matcher::Exact("jpegbytes".into()))
        .with_status(200)
        .create_async()
        .await;
    let storage = HttpObjectStorage::new(
        format!("{}/bucket", server.url()),
        "https://cdn.example/pictures".into(),
        Some("s3cret".into()),
    );

    let url = storage
        .put("abc.jpg", b"jpegbytes".to_vec(), "image/jpeg")
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(url, "https://cdn.example/pictures/abc.jpg");
}

/// **Test: A rejected upload reports the status.**
#[tokio::test]
async fn http_put_rejected() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("PUT", "/abc.png")
        .with_status(403)
        .with_body("denied")
        .create_async()
        .await;
    let storage = HttpObjectStorage::new(server.url(), "https://cdn.example".into(), None);

    let err = storage.put("abc.png", vec![1], "image/png").await.unwrap_err();

    assert!(matches!(err, StorageError::Rejected { status: 403, ref message } if message == "denied"));
}

/// **Test: Fetching returns bytes and content type, sending a browser user agent.**
#[tokio::test]
async fn fetch_returns_bytes_and_type() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/Media/ME1")
        .match_header("user-agent", "Mozilla/5.0")
        .with_status(200)
        .with_header("content-type", "image/jpeg")
        .with_body(vec![0xFF, 0xD8, 0xFF])
        .create_async()
        .await;

    let media = HttpMediaFetcher::new()
        .unwrap()
        .fetch(&format!("{}/Media/ME1", server.url()))
        .await
        .unwrap();

    assert_eq!(media.bytes, vec![0xFF, 0xD8, 0xFF]);
    assert_eq!(media.content_type.as_deref(), Some("image/jpeg"));
}

/// **Test: A missing media item is an error.**
#[tokio::test]
async fn fetch_not_found() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/Media/gone")
        .with_status(404)
        .create_async()
        .await;

    let result = HttpMediaFetcher::new()
        .unwrap()
        .fetch(&format!("{}/Media/gone", server.url()))
        .await;

    assert!(matches!(result, Err(StorageError::Http(_))));
}
