use crate::engine::index::errors::IndexError;
use crate::engine::index::label::Label;
use crate::engine::index::resource_index::ResourceIndex;

#[test]
fn add_then_lookup() {
    let mut index = ResourceIndex::new();
    let label = Label::fingerprinted("img/test.png", "folder", b"abcd").unwrap();

    assert!(index.add(&label).unwrap());
    let found = index.lookup("img/test.png").unwrap();
    assert_eq!(
        found.fingerprinted_path(),
        "e2f/c714c4727ee9395f324cd2e7f331f/folder/test.png"
    );
    assert!(index.lookup("img/other.png").is_none());
}

#[test]
fn duplicate_identical_add_is_idempotent() {
    let mut index = ResourceIndex::new();
    let label = Label::fingerprinted("img/test.png", "folder", b"abcd").unwrap();

    assert!(index.add(&label).unwrap());
    assert!(!index.add(&label).unwrap());
    assert_eq!(index.len(), 1);
}

#[test]
fn conflicting_add_fails() {
    let mut index = ResourceIndex::new();
    let first = Label::fingerprinted("img/test.png", "folder", b"abcd").unwrap();
    let second = Label::fingerprinted("img/test.png", "folder", b"other content").unwrap();

    index.add(&first).unwrap();
    let err = index.add(&second).unwrap_err();
    assert!(matches!(err, IndexError::Conflict { .. }));
    // The original mapping must survive untouched.
    assert_eq!(index.lookup("img/test.png").unwrap(), &first);
}

#[test]
fn text_round_trip_preserves_semantics() {
    let mut index = ResourceIndex::new();
    index
        .add(&Label::fingerprinted("img/test.png", "folder", b"abcd").unwrap())
        .unwrap();
    index
        .add(&Label::fingerprinted("css/main.css", "web", b"body{}").unwrap())
        .unwrap();
    index
        .add(&Label::fingerprinted("js/spaced name.js", "web", b"x").unwrap())
        .unwrap();

    let text = index.to_text();
    let reloaded = ResourceIndex::from_text(&text).unwrap();
    assert_eq!(reloaded, index);
    // Deterministic rendering: saving again yields the same bytes.
    assert_eq!(reloaded.to_text(), text);
}

#[test]
fn load_rejects_bad_hash() {
    let err = ResourceIndex::from_text("img/a.png=x/y/a.png:nothex\n").unwrap_err();
    assert!(matches!(err, IndexError::Corrupt { line: 1, .. }));
}

#[test]
fn load_rejects_missing_value_delimiter() {
    let err = ResourceIndex::from_text("img/a.png=justapath\n").unwrap_err();
    assert!(matches!(err, IndexError::Corrupt { line: 1, .. }));
}
