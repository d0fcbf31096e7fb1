use crate::engine::index::all_index::AllIndex;
use crate::engine::index::errors::IndexError;
use crate::shared::hash::content_hash;

#[test]
fn reference_counting_drops_at_zero() {
    let mut all = AllIndex::new();
    let hash = content_hash(b"abcd");

    assert_eq!(all.add_reference("e2f/c714/f/a.png", &hash).unwrap(), 1);
    assert_eq!(all.add_reference("e2f/c714/f/a.png", &hash).unwrap(), 2);
    assert_eq!(all.ref_count("e2f/c714/f/a.png"), 2);

    all.remove_reference_opt("e2f/c714/f/a.png");
    assert!(all.tracks("e2f/c714/f/a.png"));

    all.remove_reference_opt("e2f/c714/f/a.png");
    assert!(!all.tracks("e2f/c714/f/a.png"));
    assert_eq!(all.ref_count("e2f/c714/f/a.png"), 0);
}

#[test]
fn removing_unknown_reference_is_a_no_op() {
    let mut all = AllIndex::new();
    all.remove_reference_opt("never/published");
    assert!(all.is_empty());
}

#[test]
fn contains_requires_matching_hash() {
    let mut all = AllIndex::new();
    let hash = content_hash(b"abcd");
    all.add_reference("e2f/c714/f/a.png", &hash).unwrap();

    assert!(all.contains("e2f/c714/f/a.png", &hash));
    assert!(!all.contains("e2f/c714/f/a.png", &content_hash(b"other")));
    assert!(!all.contains("unknown", &hash));
}

#[test]
fn hash_mismatch_on_add_is_a_conflict() {
    let mut all = AllIndex::new();
    all.add_reference("e2f/c714/f/a.png", &content_hash(b"abcd"))
        .unwrap();
    let err = all
        .add_reference("e2f/c714/f/a.png", &content_hash(b"other"))
        .unwrap_err();
    assert!(matches!(err, IndexError::Conflict { .. }));
}

#[test]
fn text_round_trip() {
    let mut all = AllIndex::new();
    let hash = content_hash(b"abcd");
    all.add_reference("e2f/c714/f/a.png", &hash).unwrap();
    all.add_reference("e2f/c714/f/a.png", &hash).unwrap();
    all.add_reference("111/222/f/b.css", &content_hash(b"b"))
        .unwrap();

    let text = all.to_text();
    assert!(text.contains("=2\\:"));
    let reloaded = AllIndex::from_text(&text).unwrap();
    assert_eq!(reloaded, all);
}

#[test]
fn load_rejects_zero_count() {
    let err = AllIndex::from_text("x/y=0:e2fc714c4727ee9395f324cd2e7f331f\n").unwrap_err();
    assert!(matches!(err, IndexError::Corrupt { line: 1, .. }));
}

#[test]
fn load_rejects_bad_count() {
    let err = AllIndex::from_text("x/y=many:e2fc714c4727ee9395f324cd2e7f331f\n").unwrap_err();
    assert!(matches!(err, IndexError::Corrupt { line: 1, .. }));
}
