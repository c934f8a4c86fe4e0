use std::cell::Cell;
use std::rc::Rc;

use pairstore::PairStore;

/// Value that counts how many times it has been dropped.
#[derive(Debug)]
struct Tracked {
    id: usize,
    drops: Rc<Cell<usize>>,
}

impl Tracked {
    fn new(id: usize, drops: &Rc<Cell<usize>>) -> Self {
        Self {
            id,
            drops: Rc::clone(drops),
        }
    }
}

impl Clone for Tracked {
    fn clone(&self) -> Self {
        Self::new(self.id, &self.drops)
    }
}

impl Drop for Tracked {
    fn drop(&mut self) {
        self.drops.set(self.drops.get() + 1);
    }
}

fn filled(count: usize, drops: &Rc<Cell<usize>>) -> PairStore<String, Tracked, 4> {
    (0..count)
        .map(|i| (format!("k{i}"), Tracked::new(i, drops)))
        .collect()
}

#[test]
fn test_dropping_store_drops_every_pair_once() {
    let drops = Rc::new(Cell::new(0));
    let store = filled(10, &drops);

    drop(store);

    assert_eq!(drops.get(), 10);
}

#[test]
fn test_growth_does_not_drop_pairs() {
    let drops = Rc::new(Cell::new(0));
    let mut store = filled(3, &drops);

    for i in 3..20 {
        store.push_front(format!("k{i}"), Tracked::new(i, &drops)).unwrap();
    }
    store.shrink().unwrap();
    store.reserve(64).unwrap();

    assert_eq!(drops.get(), 0);
    assert_eq!(store.len(), 20);
    drop(store);
    assert_eq!(drops.get(), 20);
}

#[test]
fn test_erase_hands_ownership_out() {
    let drops = Rc::new(Cell::new(0));
    let mut store = filled(5, &drops);

    let (key, value) = store.erase(2).unwrap();
    assert_eq!(key, "k2");
    assert_eq!(value.id, 2);
    assert_eq!(drops.get(), 0);

    drop(value);
    assert_eq!(drops.get(), 1);

    let ids: Vec<usize> = store.values().map(|t| t.id).collect();
    assert_eq!(ids, vec![0, 1, 3, 4]);
}

#[test]
fn test_clear_and_erase_all_drop_removed_pairs() {
    let drops = Rc::new(Cell::new(0));
    let mut store = filled(6, &drops);
    store.push_back(String::from("k1"), Tracked::new(99, &drops)).unwrap();

    assert_eq!(store.erase_all(&String::from("k1")), 2);
    assert_eq!(drops.get(), 2);

    store.clear();
    assert_eq!(drops.get(), 7);
    assert!(store.is_empty());
}

#[test]
fn test_move_and_swap_do_not_drop() {
    let drops = Rc::new(Cell::new(0));
    let mut store = filled(6, &drops);

    store.move_to(0, 5);
    store.move_to(4, 1);
    store.swap(0, 3);
    store.set_key(2, String::from("renamed")).unwrap();

    assert_eq!(drops.get(), 0);
    let mut ids: Vec<usize> = store.values().map(|t| t.id).collect();
    ids.sort_unstable();
    assert_eq!(ids, vec![0, 1, 2, 3, 4, 5]);
}

#[test]
fn test_partially_consumed_into_iter_drops_rest() {
    let drops = Rc::new(Cell::new(0));
    let store = filled(5, &drops);

    let mut iter = store.into_iter();
    let first = iter.next().unwrap();
    let last = iter.next_back().unwrap();
    drop(iter);

    assert_eq!(drops.get(), 3);
    drop((first, last));
    assert_eq!(drops.get(), 5);
}

#[test]
fn test_clone_owns_its_pairs() {
    let drops = Rc::new(Cell::new(0));
    let store = filled(4, &drops);
    let copy = store.clone();

    drop(store);
    assert_eq!(drops.get(), 4);
    assert_eq!(copy.len(), 4);
    drop(copy);
    assert_eq!(drops.get(), 8);
}

#[test]
fn test_set_value_returns_old_without_dropping() {
    let drops = Rc::new(Cell::new(0));
    let mut store = filled(2, &drops);

    let old = store.set_value(1, Tracked::new(10, &drops)).unwrap();
    assert_eq!(old.id, 1);
    assert_eq!(drops.get(), 0);
    drop(old);
    assert_eq!(drops.get(), 1);
}
