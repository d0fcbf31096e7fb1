use crate::engine::extract::dir_extractor::DirExtractor;
use crate::engine::extract::resource::Extractor;
use std::collections::BTreeMap;
use tempfile::tempdir;

#[test]
fn yields_every_file_once_with_relative_paths() {
    let temp = tempdir().unwrap();
    std::fs::create_dir_all(temp.path().join("img/icons")).unwrap();
    std::fs::write(temp.path().join("img/test.png"), b"abcd").unwrap();
    std::fs::write(temp.path().join("img/icons/star.gif"), b"gif").unwrap();
    std::fs::write(temp.path().join("main.css"), b"body{}").unwrap();

    let extractor = DirExtractor::new(temp.path(), "web");
    let mut seen = BTreeMap::new();
    for resource in extractor.iterate().unwrap() {
        let resource = resource.unwrap();
        assert_eq!(resource.folder, "web");
        let bytes = resource.bytes().unwrap().into_owned();
        assert_eq!(bytes.len() as u64, resource.len);
        seen.insert(resource.path.clone(), bytes);
    }

    assert_eq!(seen.len(), 3);
    assert_eq!(seen["img/test.png"], b"abcd");
    assert_eq!(seen["img/icons/star.gif"], b"gif");
    assert_eq!(seen["main.css"], b"body{}");
}

#[test]
fn iteration_is_restartable() {
    let temp = tempdir().unwrap();
    std::fs::write(temp.path().join("a.txt"), b"a").unwrap();

    let extractor = DirExtractor::new(temp.path(), "web");
    assert_eq!(extractor.iterate().unwrap().count(), 1);
    assert_eq!(extractor.iterate().unwrap().count(), 1);
}

#[test]
fn empty_root_yields_nothing() {
    let temp = tempdir().unwrap();
    let extractor = DirExtractor::new(temp.path(), "web");
    assert_eq!(extractor.iterate().unwrap().count(), 0);
}
