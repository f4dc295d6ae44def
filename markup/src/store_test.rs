use super::*;
use crate::annotation::{AnnotationKind, Extent};
use crate::mapper::Point;

fn make(kind: AnnotationKind, x: f64) -> Annotation {
    Annotation::new(kind, Point::new(x, x), Extent::new(10.0, 10.0), Some(format!("at {x}")))
}

#[test]
fn new_store_is_empty() {
    let store = AnnotationStore::new();
    assert!(store.is_empty());
    assert_eq!(store.len(), 0);
    assert!(store.snapshot().is_empty());
}

#[test]
fn append_preserves_insertion_order() {
    let mut store = AnnotationStore::new();
    let a = make(AnnotationKind::Circle, 1.0);
    let b = make(AnnotationKind::Arrow, 2.0);
    let c = make(AnnotationKind::Highlight, 3.0);
    store.append(a.clone());
    store.append(b.clone());
    store.append(c.clone());
    assert_eq!(store.snapshot(), &[a, b, c]);
}

#[test]
fn undo_removes_most_recent() {
    let mut store = AnnotationStore::new();
    let a = make(AnnotationKind::Circle, 1.0);
    let b = make(AnnotationKind::Arrow, 2.0);
    store.append(a.clone());
    store.append(b.clone());
    assert_eq!(store.undo_last(), Some(b));
    assert_eq!(store.snapshot(), &[a]);
}

#[test]
fn undo_after_append_matches_single_append() {
    let a = make(AnnotationKind::Circle, 1.0);
    let b = make(AnnotationKind::Text, 2.0);

    let mut with_undo = AnnotationStore::new();
    with_undo.append(a.clone());
    with_undo.append(b);
    with_undo.undo_last();

    let mut plain = AnnotationStore::new();
    plain.append(a);

    assert_eq!(with_undo, plain);
}

#[test]
fn undo_on_empty_is_noop() {
    let mut store = AnnotationStore::new();
    assert_eq!(store.undo_last(), None);
    assert!(store.is_empty());
}

#[test]
fn seeded_store_keeps_order_and_undoes_seed() {
    let a = make(AnnotationKind::Circle, 1.0);
    let b = make(AnnotationKind::Highlight, 2.0);
    let mut store = AnnotationStore::seeded(vec![a.clone(), b.clone()]);
    assert_eq!(store.len(), 2);
    assert_eq!(store.undo_last(), Some(b));
    assert_eq!(store.into_annotations(), vec![a]);
}

#[test]
fn default_label_counts_committed_annotations() {
    let mut store = AnnotationStore::new();
    assert_eq!(store.next_default_label(), "Issue 1");
    store.append(make(AnnotationKind::Circle, 1.0));
    store.append(make(AnnotationKind::Text, 2.0));
    assert_eq!(store.next_default_label(), "Issue 3");
    store.undo_last();
    assert_eq!(store.next_default_label(), "Issue 2");
}
