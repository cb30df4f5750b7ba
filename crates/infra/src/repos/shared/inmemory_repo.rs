use std::sync::{Mutex, MutexGuard};
use tickler_domain::Entity;

/// Useful functions for creating inmemory repositories

fn lock<T>(collection: &Mutex<Vec<T>>) -> MutexGuard<'_, Vec<T>> {
    collection
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Inserts `val` unless `exists` matches an item already in the collection.
/// Returns whether it was inserted.
pub fn insert_unless<T: Clone, F: Fn(&T) -> bool>(
    val: &T,
    collection: &Mutex<Vec<T>>,
    exists: F,
) -> bool {
    let mut collection = lock(collection);
    if collection.iter().any(exists) {
        return false;
    }
    collection.push(val.clone());
    true
}

/// Creates and inserts a value with the next free id unless `exists`
/// matches an item already in the collection. Returns the id of the new value.
pub fn insert_new<T: Entity, F: Fn(&T) -> bool, C: FnOnce(i64) -> T>(
    collection: &Mutex<Vec<T>>,
    exists: F,
    create: C,
) -> Option<i64> {
    let mut collection = lock(collection);
    if collection.iter().any(exists) {
        return None;
    }
    let id = collection.iter().map(|e| e.id()).max().unwrap_or(0) + 1;
    collection.push(create(id));
    Some(id)
}

pub fn find<T: Clone + Entity>(val_id: i64, collection: &Mutex<Vec<T>>) -> Option<T> {
    lock(collection).iter().find(|e| e.id() == val_id).cloned()
}

pub fn find_by<T: Clone, F: FnMut(&T) -> bool>(collection: &Mutex<Vec<T>>, mut compare: F) -> Vec<T> {
    lock(collection)
        .iter()
        .filter(|item| compare(item))
        .cloned()
        .collect()
}

pub fn delete_by<T, F: Fn(&T) -> bool>(collection: &Mutex<Vec<T>>, compare: F) -> usize {
    let mut collection = lock(collection);
    let before = collection.len();
    collection.retain(|item| !compare(item));
    before - collection.len()
}

/// Removes every matching item and appends `items` in one step
pub fn replace_by<T, F: Fn(&T) -> bool>(collection: &Mutex<Vec<T>>, compare: F, items: Vec<T>) {
    let mut collection = lock(collection);
    collection.retain(|item| !compare(item));
    collection.extend(items);
}

/// Applies `update` to every matching item and returns how many matched
pub fn update_many<T, F: Fn(&T) -> bool, U: Fn(&mut T)>(
    collection: &Mutex<Vec<T>>,
    compare: F,
    update: U,
) -> usize {
    let mut collection = lock(collection);
    let mut updated = 0;
    for item in collection.iter_mut().filter(|item| compare(item)) {
        update(item);
        updated += 1;
    }
    updated
}
