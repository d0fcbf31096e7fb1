use crate::engine::index::errors::IndexError;
use crate::engine::index::label::Label;
use crate::shared::hash::content_hash;

#[test]
fn fingerprinted_path_layout() {
    let label = Label::fingerprinted("img/test.png", "folder", b"abcd").unwrap();
    assert_eq!(
        label.fingerprinted_path(),
        "e2f/c714c4727ee9395f324cd2e7f331f/folder/test.png"
    );
    assert_eq!(label.original_path(), "img/test.png");
    assert_eq!(label.content_hash(), &content_hash(b"abcd"));
}

#[test]
fn stable_path_keeps_original() {
    let label = Label::stable("downloads/tool.zip", "static/", b"payload").unwrap();
    assert_eq!(label.fingerprinted_path(), "static/downloads/tool.zip");
    // Hash is still recorded even though the path does not embed it.
    assert_eq!(label.content_hash(), &content_hash(b"payload"));
}

#[test]
fn rejects_slash_delimited_paths() {
    assert!(matches!(
        Label::new("/img/a.png", "x/y", content_hash(b"a")),
        Err(IndexError::InvalidPath(_))
    ));
    assert!(matches!(
        Label::new("img/a.png", "x/y/", content_hash(b"a")),
        Err(IndexError::InvalidPath(_))
    ));
    assert!(matches!(
        Label::new("", "x/y", content_hash(b"a")),
        Err(IndexError::InvalidPath(_))
    ));
}

#[test]
fn rejects_reserved_delimiter_in_fingerprinted_path() {
    assert!(matches!(
        Label::new("img/a.png", "x:y/a.png", content_hash(b"a")),
        Err(IndexError::ReservedDelimiter(_))
    ));
}
