use pairstore::{Cursor, PairStore};

fn sample() -> PairStore<&'static str, i32> {
    PairStore::from([("a", 1), ("b", 2), ("c", 3)])
}

#[test]
fn test_cursor_walks_forward_to_end() {
    let store = sample();
    let mut cursor = store.cursor_front();

    let mut seen = Vec::new();
    while let Some((key, _)) = cursor.pair() {
        seen.push(*key);
        cursor.move_next();
    }

    assert_eq!(seen, vec!["a", "b", "c"]);
    assert!(cursor.is_end());
    assert_eq!(cursor.position(), 3);
    assert_eq!(cursor, store.cursor_end());

    cursor.move_next();
    assert!(cursor.is_end());
}

#[test]
fn test_cursor_walks_backward() {
    let store = sample();
    let mut cursor = store.cursor_end();

    cursor.move_prev();
    assert_eq!(cursor.key(), Some(&"c"));
    cursor.move_prev();
    cursor.move_prev();
    assert_eq!(cursor.key(), Some(&"a"));

    // Stepping before the first pair parks on the end position
    cursor.move_prev();
    assert!(cursor.is_end());
    assert_eq!(cursor.value(), None);
}

#[test]
fn test_cursor_back_and_clamping() {
    let store = sample();

    assert_eq!(store.cursor_back().position(), 2);
    assert_eq!(store.cursor_at(50).position(), 3);
    assert!(store.cursor_at(50).is_end());

    let empty: PairStore<&str, i32> = PairStore::new();
    assert!(empty.cursor_back().is_end());
    assert!(empty.cursor_front().is_end());
}

#[test]
fn test_cursors_compare_by_store_and_position() {
    let store = sample();
    let other = sample();

    assert_eq!(store.cursor_at(1), store.cursor_at(1));
    assert_ne!(store.cursor_at(1), store.cursor_at(2));
    assert_ne!(store.cursor_at(1), other.cursor_at(1));
}

#[test]
fn test_cursor_mut_edits_in_place() {
    let mut store = sample();

    let mut cursor = store.cursor_front_mut();
    cursor.move_next();
    if let Some(value) = cursor.value_mut() {
        *value = 20;
    }
    if let Some(key) = cursor.key_mut() {
        *key = "B";
    }
    assert_eq!(cursor.pair(), Some((&"B", &20)));
    assert_eq!(cursor.as_cursor().position(), 1);

    assert_eq!(store.as_slice(), &[("a", 1), ("B", 20), ("c", 3)]);
}

#[test]
fn test_cursor_mut_widens_to_cursor() {
    let mut store = sample();

    let mut cursor_mut = store.cursor_back_mut();
    if let Some(value) = cursor_mut.value_mut() {
        *value += 1;
    }
    let mut cursor: Cursor<'_, _, _> = Cursor::from(cursor_mut);
    assert_eq!(cursor.value(), Some(&4));

    cursor.move_prev();
    assert_eq!(cursor.key(), Some(&"b"));
}

#[test]
fn test_cursor_mut_at_end_has_nothing_to_edit() {
    let mut store = sample();
    let mut cursor = store.cursor_at_mut(3);

    assert!(cursor.is_end());
    assert!(cursor.value_mut().is_none());
    assert!(cursor.key_mut().is_none());

    cursor.move_prev();
    assert_eq!(cursor.position(), 2);
}
