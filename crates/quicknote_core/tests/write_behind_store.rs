use quicknote_core::db::open_db;
use quicknote_core::{Note, NoteStore, SqliteKvStore, WriteBehindStore};
use std::path::Path;

fn write_behind_at(path: &Path) -> WriteBehindStore<SqliteKvStore> {
    let sqlite = SqliteKvStore::try_new(open_db(path).unwrap()).unwrap();
    WriteBehindStore::spawn(sqlite).unwrap()
}

#[test]
fn mutations_are_visible_immediately_and_land_after_flush() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notes.db");

    let mut store = NoteStore::init(write_behind_at(&path));
    for round in 0..50 {
        store.add(format!("note {round}"), "");
    }
    store.delete(0);
    assert_eq!(store.len(), 49);
    assert_eq!(store.notes()[0], Note::new("note 1", ""));

    store.store().flush();
    assert_eq!(store.store().pending_len(), 0);

    let expected = store.notes().to_vec();
    drop(store);

    let reopened = NoteStore::init(SqliteKvStore::try_new(open_db(&path).unwrap()).unwrap());
    assert_eq!(reopened.notes(), expected.as_slice());
}

#[test]
fn dropping_the_store_drains_last_write() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notes.db");

    {
        let mut store = NoteStore::init(write_behind_at(&path));
        store.add("kept", "after drop");
    }

    let reopened = NoteStore::init(write_behind_at(&path));
    assert_eq!(reopened.notes(), &[Note::new("kept", "after drop")]);
}
