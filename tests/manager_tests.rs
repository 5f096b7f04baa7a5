use std::thread::sleep;
use std::time::Duration;

use tempfile::TempDir;

use taskpad::manager::{TaskError, TaskManager};
use taskpad::models::Task;
use taskpad::store::Store;

fn test_manager(dir: &TempDir) -> TaskManager {
    TaskManager::new(Store::at(dir.path().join("todo.items.v1.json")))
}

fn stored_task(id: u64, title: &str, created_at: i64) -> Task {
    Task {
        id,
        title: title.into(),
        description: String::new(),
        done: false,
        created_at,
        updated_at: created_at,
    }
}

#[test]
fn test_add_trims_fields() {
    let dir = TempDir::new().unwrap();
    let mut mgr = test_manager(&dir);

    let t = mgr.add("  Buy milk  ", "  two pints ").unwrap();
    assert_eq!(t.title, "Buy milk");
    assert_eq!(t.description, "two pints");
    assert!(!t.done);
    assert_eq!(t.created_at, t.updated_at);
    assert!(t.id > 0);
}

#[test]
fn test_add_empty_title_rejected() {
    let dir = TempDir::new().unwrap();
    let mut mgr = test_manager(&dir);

    let err = mgr.add("", "").unwrap_err();
    assert!(matches!(err, TaskError::TitleRequired));
    assert!(mgr.list_ordered().is_empty());

    // Whitespace-only counts as empty.
    let err = mgr.add("   ", "").unwrap_err();
    assert!(matches!(err, TaskError::TitleRequired));
    assert!(mgr.list_ordered().is_empty());
}

#[test]
fn test_add_overlong_fields_rejected() {
    let dir = TempDir::new().unwrap();
    let mut mgr = test_manager(&dir);

    let err = mgr.add(&"a".repeat(121), "").unwrap_err();
    assert!(matches!(err, TaskError::TitleTooLong));

    let err = mgr.add("ok", &"b".repeat(1001)).unwrap_err();
    assert!(matches!(err, TaskError::DescriptionTooLong));

    assert!(mgr.list_ordered().is_empty());

    // Boundary lengths are accepted.
    mgr.add(&"a".repeat(120), &"b".repeat(1000)).unwrap();
    assert_eq!(mgr.list_ordered().len(), 1);
}

#[test]
fn test_title_error_wins_over_description() {
    // First failing check wins: an empty title is reported even when the
    // description is also out of bounds.
    let err = TaskManager::validate("", &"b".repeat(1001)).unwrap();
    assert!(matches!(err, TaskError::TitleRequired));
}

#[test]
fn test_list_ordered_newest_first() {
    let dir = TempDir::new().unwrap();
    let mut mgr = test_manager(&dir);

    let t1 = mgr.add("first", "").unwrap();
    sleep(Duration::from_millis(2));
    let t2 = mgr.add("second", "").unwrap();

    let ordered = mgr.list_ordered();
    assert_eq!(ordered.len(), 2);
    assert_eq!(ordered[0].id, t2.id);
    assert_eq!(ordered[1].id, t1.id);
}

#[test]
fn test_list_ordered_keeps_tie_order_and_stored_order() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("todo.items.v1.json");
    let store = Store::at(&path);
    store
        .save(&[
            stored_task(1, "tie a", 2000),
            stored_task(2, "tie b", 2000),
            stored_task(3, "older", 1000),
        ])
        .unwrap();

    let mut mgr = TaskManager::new(Store::at(&path));

    // Equal created_at keeps the loaded relative order.
    let first = mgr.list_ordered();
    let titles: Vec<&str> = first.iter().map(|t| t.title.as_str()).collect();
    assert_eq!(titles, ["tie a", "tie b", "older"]);

    // The derived view must not reorder the stored collection: repeated
    // calls agree, and a save triggered by an unrelated mutation persists
    // the ties in the same order.
    assert_eq!(mgr.list_ordered(), first);
    mgr.toggle_done(3).unwrap();

    let reloaded = TaskManager::new(Store::at(&path)).list_ordered();
    let titles: Vec<&str> = reloaded.iter().map(|t| t.title.as_str()).collect();
    assert_eq!(titles, ["tie a", "tie b", "older"]);
}

#[test]
fn test_mutation_surfaces_storage_error() {
    // A save that cannot complete must reach the caller instead of
    // reporting the add as persisted.
    let dir = TempDir::new().unwrap();
    let mut mgr = TaskManager::new(Store::at(dir.path().join("no/such/dir/todo.items.v1.json")));

    let err = mgr.add("t", "").unwrap_err();
    assert!(matches!(err, TaskError::Storage(_)));
    assert!(!err.is_validation());
}

#[test]
fn test_add_does_not_panic_at_max_id() {
    // Ids only reach this range through hand-edited files; adding must
    // still not overflow.
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("todo.items.v1.json");
    Store::at(&path)
        .save(&[stored_task(u64::MAX, "ceiling", 1000)])
        .unwrap();

    let mut mgr = TaskManager::new(Store::at(&path));
    let t = mgr.add("one more", "").unwrap();
    assert_eq!(t.id, u64::MAX);
}

#[test]
fn test_update_replaces_fields_only() {
    let dir = TempDir::new().unwrap();
    let mut mgr = test_manager(&dir);

    let t = mgr.add("draft", "old").unwrap();
    mgr.toggle_done(t.id).unwrap();
    sleep(Duration::from_millis(2));

    let updated = mgr.update(t.id, " final ", " new ").unwrap();
    assert_eq!(updated.title, "final");
    assert_eq!(updated.description, "new");
    assert_eq!(updated.created_at, t.created_at);
    assert!(updated.done, "update must not touch the done flag");
    assert!(updated.updated_at > t.updated_at);
}

#[test]
fn test_update_validates_before_lookup() {
    let dir = TempDir::new().unwrap();
    let mut mgr = test_manager(&dir);

    let t = mgr.add("keep me", "details").unwrap();
    let err = mgr.update(t.id, "", "details").unwrap_err();
    assert!(matches!(err, TaskError::TitleRequired));

    let unchanged = mgr.list_ordered();
    assert_eq!(unchanged[0].title, "keep me");
}

#[test]
fn test_update_unknown_id() {
    let dir = TempDir::new().unwrap();
    let mut mgr = test_manager(&dir);

    let err = mgr.update(42, "title", "").unwrap_err();
    assert!(matches!(err, TaskError::NotFound(42)));
}

#[test]
fn test_toggle_twice_restores_done_and_bumps_updated_at() {
    let dir = TempDir::new().unwrap();
    let mut mgr = test_manager(&dir);

    let t = mgr.add("flip me", "").unwrap();

    sleep(Duration::from_millis(2));
    let once = mgr.toggle_done(t.id).unwrap();
    assert!(once.done);
    assert!(once.updated_at > t.updated_at);

    sleep(Duration::from_millis(2));
    let twice = mgr.toggle_done(t.id).unwrap();
    assert!(!twice.done);
    assert!(twice.updated_at > once.updated_at);
    assert_eq!(twice.created_at, t.created_at);
}

#[test]
fn test_toggle_unknown_id() {
    let dir = TempDir::new().unwrap();
    let mut mgr = test_manager(&dir);

    let err = mgr.toggle_done(7).unwrap_err();
    assert!(matches!(err, TaskError::NotFound(7)));
}

#[test]
fn test_remove_unknown_id_is_noop() {
    let dir = TempDir::new().unwrap();
    let mut mgr = test_manager(&dir);

    mgr.add("survivor", "").unwrap();
    mgr.remove(999).unwrap();

    let tasks = mgr.list_ordered();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].title, "survivor");
}

#[test]
fn test_ids_unique_after_removal() {
    let dir = TempDir::new().unwrap();
    let mut mgr = test_manager(&dir);

    let a = mgr.add("a", "").unwrap();
    let b = mgr.add("b", "").unwrap();
    assert_ne!(a.id, b.id);

    mgr.remove(a.id).unwrap();
    let c = mgr.add("c", "").unwrap();
    assert_ne!(c.id, b.id);
}

#[test]
fn test_persistence_across_sessions() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("todo.items.v1.json");

    let first_session = {
        let mut mgr = TaskManager::new(Store::at(&path));
        mgr.add("remember me", "across restarts").unwrap();
        sleep(Duration::from_millis(2));
        mgr.add("me too", "").unwrap();
        mgr.list_ordered()
    };

    let mgr = TaskManager::new(Store::at(&path));
    assert_eq!(mgr.list_ordered(), first_session);
}

#[test]
fn test_end_to_end_lifecycle() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("todo.items.v1.json");
    let mut mgr = TaskManager::new(Store::at(&path));
    assert!(mgr.is_empty());

    let t = mgr.add("Buy milk", "").unwrap();
    let listed = mgr.list_ordered();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].title, "Buy milk");
    assert!(!listed[0].done);

    mgr.toggle_done(t.id).unwrap();
    assert!(mgr.list_ordered()[0].done);

    mgr.remove(t.id).unwrap();
    assert!(mgr.list_ordered().is_empty());

    // The write-through means the file already reflects the empty state.
    assert!(Store::at(&path).load().is_empty());
}
