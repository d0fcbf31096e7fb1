use crate::engine::distribute::{Distributor, Mirror};
use crate::engine::extract::dir_extractor::DirExtractor;
use crate::engine::extract::publish::{PublishMode, publish};
use tempfile::tempdir;

#[tokio::test]
async fn fingerprint_publish_end_to_end() {
    let source = tempdir().unwrap();
    std::fs::create_dir_all(source.path().join("img")).unwrap();
    std::fs::write(source.path().join("img/test.png"), b"abcd").unwrap();

    let docroot = tempdir().unwrap();
    let extractor = DirExtractor::new(source.path(), "folder");
    let mut dist = Distributor::open(vec![Mirror::new("cdn1", docroot.path())], "content")
        .await
        .unwrap();

    let report = publish(&extractor, &mut dist, &PublishMode::Fingerprint)
        .await
        .unwrap();
    assert_eq!(report.written, 1);
    assert_eq!(report.reused, 0);

    let index = dist.close().await.unwrap();
    assert_eq!(
        index.lookup("img/test.png").unwrap().fingerprinted_path(),
        "e2f/c714c4727ee9395f324cd2e7f331f/folder/test.png"
    );
    assert!(
        docroot
            .path()
            .join("e2f/c714c4727ee9395f324cd2e7f331f/folder/test.png")
            .is_file()
    );
}

#[tokio::test]
async fn republish_of_unchanged_tree_reuses_everything() {
    let source = tempdir().unwrap();
    std::fs::write(source.path().join("a.css"), b"body{}").unwrap();
    std::fs::write(source.path().join("b.js"), b"x=1").unwrap();

    let docroot = tempdir().unwrap();
    let extractor = DirExtractor::new(source.path(), "web");
    let mirrors = vec![Mirror::new("cdn1", docroot.path())];

    let mut dist = Distributor::open(mirrors.clone(), "content").await.unwrap();
    let first = publish(&extractor, &mut dist, &PublishMode::Fingerprint)
        .await
        .unwrap();
    dist.close().await.unwrap();
    assert_eq!(first.written, 2);

    let mut dist = Distributor::open(mirrors, "content").await.unwrap();
    let second = publish(&extractor, &mut dist, &PublishMode::Fingerprint)
        .await
        .unwrap();
    dist.close().await.unwrap();
    assert_eq!(second.written, 0);
    assert_eq!(second.reused, 2);
}

#[tokio::test]
async fn stable_mode_keeps_original_paths() {
    let source = tempdir().unwrap();
    std::fs::write(source.path().join("tool.zip"), b"zip bytes").unwrap();

    let docroot = tempdir().unwrap();
    let extractor = DirExtractor::new(source.path(), "downloads");
    let mut dist = Distributor::open(vec![Mirror::new("cdn1", docroot.path())], "content")
        .await
        .unwrap();

    publish(
        &extractor,
        &mut dist,
        &PublishMode::Stable {
            path_prefix: "static/".to_string(),
        },
    )
    .await
    .unwrap();
    let index = dist.close().await.unwrap();

    assert_eq!(
        index.lookup("tool.zip").unwrap().fingerprinted_path(),
        "static/tool.zip"
    );
    assert!(docroot.path().join("static/tool.zip").is_file());
}
