use fragments::{FragmentError, FragmentList, IngestionError};

use crate::common::{OTHER_OWNER, OWNER, TestApp};

mod create {
    use super::*;

    #[tokio::test]
    async fn text_fragment_has_expected_metadata() {
        let app = TestApp::spawn();
        let fragment = app.create("text/plain", b"Fragment Data").await;

        assert_eq!(fragment.owner_id(), OWNER);
        assert_eq!(fragment.size(), 13);
        assert_eq!(fragment.content_type(), "text/plain");
        assert_eq!(fragment.formats(), vec!["text/plain"]);

        let stored = app.service.read_metadata(OWNER, fragment.id()).await.unwrap();
        assert_eq!(stored, fragment);
    }

    #[tokio::test]
    async fn content_type_parameters_are_kept() {
        let app = TestApp::spawn();
        let fragment = app
            .create("text/html; charset=utf-8", b"<p>hello</p>")
            .await;

        assert_eq!(fragment.content_type(), "text/html; charset=utf-8");
        assert_eq!(fragment.mime_type(), "text/html");

        let content = app.read(fragment.id(), None).await;
        assert_eq!(content.content_type, "text/html; charset=utf-8");
    }

    #[tokio::test]
    async fn unsupported_type_is_rejected() {
        let app = TestApp::spawn();
        let err = app
            .service
            .create(OWNER, "application/msword", b"doc")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            FragmentError::Ingestion(IngestionError::UnsupportedType(_))
        ));
        assert!(app.service.list(OWNER, false).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn malformed_json_is_rejected() {
        let app = TestApp::spawn();
        let err = app
            .service
            .create(OWNER, "application/json", b"{not json")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            FragmentError::Ingestion(IngestionError::InvalidJson(_))
        ));
    }

    #[tokio::test]
    async fn non_image_body_is_rejected_for_image_type() {
        let app = TestApp::spawn();
        let err = app
            .service
            .create(OWNER, "image/png", b"definitely not a png")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            FragmentError::Ingestion(IngestionError::InvalidImage { .. })
        ));
    }

    #[tokio::test]
    async fn empty_body_is_rejected() {
        let app = TestApp::spawn();
        let err = app.service.create(OWNER, "text/plain", b"").await.unwrap_err();
        assert!(matches!(err, FragmentError::Validation(_)));
    }
}

mod read {
    use super::*;

    #[tokio::test]
    async fn missing_fragment_is_not_found() {
        let app = TestApp::spawn();
        let err = app.service.read(OWNER, "nope", None).await.unwrap_err();
        assert!(matches!(err, FragmentError::NotFound { id } if id == "nope"));
    }

    #[tokio::test]
    async fn fragments_are_scoped_to_their_owner() {
        let app = TestApp::spawn();
        let fragment = app.create("text/plain", b"mine").await;

        assert!(matches!(
            app.service.read(OTHER_OWNER, fragment.id(), None).await,
            Err(FragmentError::NotFound { .. })
        ));
        assert!(matches!(
            app.service.delete(OTHER_OWNER, fragment.id()).await,
            Err(FragmentError::NotFound { .. })
        ));
        assert!(app.service.list(OTHER_OWNER, false).await.unwrap().is_empty());

        assert_eq!(app.read(fragment.id(), None).await.data, b"mine");
    }

    #[tokio::test]
    async fn metadata_without_data_is_reported() {
        let app = TestApp::spawn();
        let mut fragment = fragments::Fragment::new(OWNER, "text/plain").unwrap();
        fragment.save(app.service.store()).await.unwrap();

        let err = app
            .service
            .read(OWNER, fragment.id(), None)
            .await
            .unwrap_err();
        assert!(matches!(err, FragmentError::MissingData { .. }));
    }

    #[tokio::test]
    async fn metadata_lookup_ignores_extension() {
        let app = TestApp::spawn();
        let fragment = app.create("text/markdown", b"# Title").await;

        let path = format!("{}.html", fragment.id());
        let found = app.service.read_metadata(OWNER, &path).await.unwrap();
        assert_eq!(found.id(), fragment.id());
        assert_eq!(
            found.formats(),
            vec!["text/markdown", "text/html", "text/plain"]
        );
    }
}

mod list {
    use super::*;

    #[tokio::test]
    async fn lists_ids_or_expanded_metadata() {
        let app = TestApp::spawn();
        let a = app.create("text/plain", b"a").await;
        let b = app.create("application/json", b"[1, 2]").await;
        app.service
            .create(OTHER_OWNER, "text/plain", b"other")
            .await
            .unwrap();

        let FragmentList::Ids(mut ids) = app.service.list(OWNER, false).await.unwrap() else {
            panic!("expected ids");
        };
        ids.sort();
        let mut expected = vec![a.id().to_string(), b.id().to_string()];
        expected.sort();
        assert_eq!(ids, expected);

        let FragmentList::Expanded(expanded) = app.service.list(OWNER, true).await.unwrap() else {
            panic!("expected fragments");
        };
        assert_eq!(expanded.len(), 2);
        assert!(expanded.contains(&a));
        assert!(expanded.contains(&b));
    }

    #[tokio::test]
    async fn serializes_as_plain_arrays() {
        let app = TestApp::spawn();
        let fragment = app.create("text/plain", b"x").await;

        let ids = serde_json::to_value(app.service.list(OWNER, false).await.unwrap()).unwrap();
        assert_eq!(ids, serde_json::json!([fragment.id()]));

        let expanded = serde_json::to_value(app.service.list(OWNER, true).await.unwrap()).unwrap();
        assert_eq!(expanded[0]["id"], fragment.id());
        assert_eq!(expanded[0]["type"], "text/plain");
        assert_eq!(expanded[0]["size"], 1);
    }
}

mod update {
    use super::*;

    #[tokio::test]
    async fn replaces_data_and_refreshes_timestamp() {
        let app = TestApp::spawn();
        let fragment = app.create("text/plain", b"first").await;

        let updated = app
            .service
            .update(OWNER, fragment.id(), "text/plain; charset=utf-8", b"second version")
            .await
            .unwrap();

        assert_eq!(updated.id(), fragment.id());
        assert_eq!(updated.size(), 14);
        assert_eq!(updated.created(), fragment.created());
        assert!(updated.updated() > fragment.updated());
        assert_eq!(updated.content_type(), "text/plain");
        assert_eq!(app.read(fragment.id(), None).await.data, b"second version");
    }

    #[tokio::test]
    async fn type_change_is_rejected_and_leaves_fragment_intact() {
        let app = TestApp::spawn();
        let fragment = app.create("text/plain", b"Fragment Data").await;

        let err = app
            .service
            .update(OWNER, fragment.id(), "application/json", b"{\"a\":1}")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            FragmentError::TypeImmutable { ref stored, ref declared, .. }
                if stored == "text/plain" && declared == "application/json"
        ));

        let stored = app.service.read_metadata(OWNER, fragment.id()).await.unwrap();
        assert_eq!(stored, fragment);
        assert_eq!(app.read(fragment.id(), None).await.data, b"Fragment Data");
    }

    #[tokio::test]
    async fn missing_fragment_is_not_found() {
        let app = TestApp::spawn();
        let err = app
            .service
            .update(OWNER, "missing", "text/plain", b"data")
            .await
            .unwrap_err();
        assert!(matches!(err, FragmentError::NotFound { .. }));
    }

    #[tokio::test]
    async fn invalid_body_is_rejected_before_lookup() {
        let app = TestApp::spawn();
        let fragment = app.create("application/json", b"{}").await;
        let err = app
            .service
            .update(OWNER, fragment.id(), "application/json", b"{")
            .await
            .unwrap_err();
        assert!(matches!(err, FragmentError::Ingestion(_)));
        assert_eq!(app.read(fragment.id(), None).await.data, b"{}");
    }
}

mod delete {
    use super::*;

    #[tokio::test]
    async fn removes_metadata_and_data() {
        let app = TestApp::spawn();
        let fragment = app.create("text/plain", b"bye").await;

        app.service.delete(OWNER, fragment.id()).await.unwrap();

        assert!(matches!(
            app.service.read(OWNER, fragment.id(), None).await,
            Err(FragmentError::NotFound { .. })
        ));
        assert!(app.service.list(OWNER, false).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn missing_fragment_is_not_found() {
        let app = TestApp::spawn();
        let err = app.service.delete(OWNER, "ghost").await.unwrap_err();
        assert!(matches!(err, FragmentError::NotFound { .. }));
        assert!(matches!(
            app.service.read(OWNER, "ghost", None).await,
            Err(FragmentError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn extension_suffix_is_ignored() {
        let app = TestApp::spawn();
        let fragment = app.create("text/plain", b"x").await;
        app.service
            .delete(OWNER, &format!("{}.txt", fragment.id()))
            .await
            .unwrap();
        assert!(app.service.list(OWNER, false).await.unwrap().is_empty());
    }
}
