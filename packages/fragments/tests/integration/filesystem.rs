use ::common::StorageError;
use fragments::{FragmentError, FragmentList};
use tempfile::TempDir;

use crate::common::{OWNER, TestApp};

#[tokio::test]
async fn fragments_survive_reopening_the_store() {
    let dir = TempDir::new().unwrap();

    let fragment = {
        let app = TestApp::spawn_on_disk(dir.path()).await;
        app.create("text/markdown", b"# Persisted").await
    };

    let app = TestApp::spawn_on_disk(dir.path()).await;
    let stored = app.service.read_metadata(OWNER, fragment.id()).await.unwrap();
    assert_eq!(stored, fragment);

    let html = app.read(fragment.id(), Some("html")).await;
    assert_eq!(html.data, b"<h1>Persisted</h1>\n");

    let FragmentList::Ids(ids) = app.service.list(OWNER, false).await.unwrap() else {
        panic!("expected ids");
    };
    assert_eq!(ids, vec![fragment.id().to_string()]);
}

#[tokio::test]
async fn update_and_delete_on_disk() {
    let dir = TempDir::new().unwrap();
    let app = TestApp::spawn_on_disk(dir.path()).await;
    let fragment = app.create("application/json", b"[]").await;

    app.service
        .update(OWNER, fragment.id(), "application/json", b"[1]")
        .await
        .unwrap();
    assert_eq!(app.read(fragment.id(), Some("txt")).await.data, b"[\n  1\n]");

    app.service.delete(OWNER, fragment.id()).await.unwrap();
    assert!(matches!(
        app.service.read(OWNER, fragment.id(), None).await,
        Err(FragmentError::NotFound { .. })
    ));
    assert!(matches!(
        app.service.delete(OWNER, fragment.id()).await,
        Err(FragmentError::NotFound { .. })
    ));
}

#[tokio::test]
async fn oversized_create_leaves_nothing_behind() {
    let dir = TempDir::new().unwrap();
    let app = TestApp::spawn_on_disk(dir.path()).await;
    let big = vec![b'a'; 1024 * 1024 + 1];

    let err = app.service.create(OWNER, "text/plain", &big).await.unwrap_err();
    assert!(matches!(
        err,
        FragmentError::Storage(StorageError::SizeLimitExceeded { .. })
    ));
    assert!(app.service.list(OWNER, false).await.unwrap().is_empty());
    assert!(app.service.list(OWNER, true).await.unwrap().is_empty());
}

#[tokio::test]
async fn oversized_update_keeps_previous_state() {
    let dir = TempDir::new().unwrap();
    let app = TestApp::spawn_on_disk(dir.path()).await;
    let fragment = app.create("text/plain", b"small").await;
    let big = vec![b'a'; 1024 * 1024 + 1];

    let err = app
        .service
        .update(OWNER, fragment.id(), "text/plain", &big)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        FragmentError::Storage(StorageError::SizeLimitExceeded { .. })
    ));

    let stored = app.service.read_metadata(OWNER, fragment.id()).await.unwrap();
    assert_eq!(stored.size(), 5);
    assert_eq!(stored, fragment);
    assert_eq!(app.read(fragment.id(), None).await.data, b"small");

    let FragmentList::Expanded(listed) = app.service.list(OWNER, true).await.unwrap() else {
        panic!("expected fragments");
    };
    assert_eq!(listed, vec![fragment]);
}
