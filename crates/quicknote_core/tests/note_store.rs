use quicknote_core::db::{open_db, open_db_in_memory};
use quicknote_core::{
    load_note_list, save_note_list, KvStore, Note, NoteAction, NotePatch, NoteStore, RepoError,
    RepoResult, SqliteKvStore, NOTES_KEY,
};

fn memory_store() -> SqliteKvStore {
    SqliteKvStore::try_new(open_db_in_memory().unwrap()).unwrap()
}

fn seeded(notes: &[Note]) -> NoteStore<SqliteKvStore> {
    let kv = memory_store();
    save_note_list(&kv, notes).unwrap();
    NoteStore::init(kv)
}

fn persisted(store: &NoteStore<SqliteKvStore>) -> Vec<Note> {
    load_note_list(store.store()).unwrap().unwrap()
}

struct ReadOnlyStore {
    value: Option<String>,
}

impl KvStore for ReadOnlyStore {
    fn get(&self, _key: &str) -> RepoResult<Option<String>> {
        Ok(self.value.clone())
    }

    fn set(&self, _key: &str, _value: &str) -> RepoResult<()> {
        Err(RepoError::Unavailable("read-only"))
    }
}

struct UnreadableStore;

impl KvStore for UnreadableStore {
    fn get(&self, _key: &str) -> RepoResult<Option<String>> {
        Err(RepoError::Unavailable("device locked"))
    }

    fn set(&self, _key: &str, _value: &str) -> RepoResult<()> {
        Ok(())
    }
}

#[test]
fn init_on_fresh_store_is_empty() {
    let store = NoteStore::init(memory_store());
    assert!(store.is_empty());
}

#[test]
fn init_recovers_from_corrupt_value() {
    for raw in ["{not json", "null", "{\"title\":\"x\"}", "[1, 2]"] {
        let kv = memory_store();
        kv.set(NOTES_KEY, raw).unwrap();
        let store = NoteStore::init(kv);
        assert!(store.is_empty(), "value {raw:?} should recover to empty");
    }
}

#[test]
fn init_recovers_from_read_failure() {
    let store = NoteStore::init(UnreadableStore);
    assert!(store.is_empty());
}

#[test]
fn add_appends_and_persists() {
    let mut store = NoteStore::init(memory_store());
    assert!(store.add("Shopping", "Milk, eggs"));
    assert!(store.add("  padded  ", ""));

    assert_eq!(store.len(), 2);
    assert_eq!(store.notes()[1], Note::new("  padded  ", ""));
    assert_eq!(persisted(&store), store.notes());
}

#[test]
fn whitespace_only_add_leaves_list_and_storage_unchanged() {
    let mut store = NoteStore::init(memory_store());
    assert!(!store.add("", ""));
    assert!(!store.add(" \n", "\t "));
    assert!(store.is_empty());
    assert_eq!(load_note_list(store.store()).unwrap(), None);
}

#[test]
fn delete_in_bounds_removes_exactly_that_note() {
    let mut store = seeded(&[
        Note::new("a", "1"),
        Note::new("b", "2"),
        Note::new("c", "3"),
    ]);
    let remaining = store.delete(1).to_vec();
    assert_eq!(remaining, vec![Note::new("a", "1"), Note::new("c", "3")]);
    assert_eq!(persisted(&store), remaining);
}

#[test]
fn out_of_bounds_delete_and_edit_leave_persisted_bytes_unchanged() {
    let notes = vec![Note::new("a", "1"), Note::new("b", "2")];
    let mut store = seeded(&notes);
    let before = store.store().get(NOTES_KEY).unwrap();

    store.delete(2);
    store.edit(5, NotePatch::title("X"));

    assert_eq!(store.notes(), notes.as_slice());
    assert_eq!(store.store().get(NOTES_KEY).unwrap(), before);
}

#[test]
fn edit_title_only_keeps_content() {
    let mut store = seeded(&[Note::new("a", "keep me"), Note::new("b", "2")]);
    store.edit(0, NotePatch::title("X"));

    assert_eq!(store.notes()[0], Note::new("X", "keep me"));
    assert_eq!(store.notes()[1], Note::new("b", "2"));
    assert_eq!(persisted(&store)[0], Note::new("X", "keep me"));
}

#[test]
fn edit_with_both_fields_replaces_both() {
    let mut store = seeded(&[Note::new("a", "1")]);
    store.edit(
        0,
        NotePatch {
            title: Some("t".to_string()),
            content: Some(String::new()),
        },
    );
    assert_eq!(store.notes(), &[Note::new("t", "")]);
}

#[test]
fn dispatch_add_skips_blank_guard() {
    let mut store = NoteStore::init(memory_store());
    store.dispatch(NoteAction::Add(Note::default()));
    assert_eq!(store.notes(), &[Note::default()]);
}

#[test]
fn persist_then_init_round_trips_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notes.db");

    let written = {
        let mut store = NoteStore::init(SqliteKvStore::try_new(open_db(&path).unwrap()).unwrap());
        store.add("Shopping", "Milk, eggs");
        store.add("Ünïcode ✓", "line one\nline two");
        store.add("", "content only");
        store.notes().to_vec()
    };

    let reopened = NoteStore::init(SqliteKvStore::try_new(open_db(&path).unwrap()).unwrap());
    assert_eq!(reopened.notes(), written.as_slice());
}

#[test]
fn write_failure_keeps_in_memory_state() {
    let mut store = NoteStore::init(ReadOnlyStore {
        value: Some(r#"[{"title":"seed","content":""}]"#.to_string()),
    });
    assert!(store.add("new", "note"));
    store.edit(0, NotePatch::content("changed"));

    assert_eq!(
        store.notes(),
        &[Note::new("seed", "changed"), Note::new("new", "note")]
    );
}

#[test]
fn shopping_todo_scenario() {
    let mut store = NoteStore::init(memory_store());

    store.add("Shopping", "Milk, eggs");
    assert_eq!(store.notes(), &[Note::new("Shopping", "Milk, eggs")]);

    store.add("Todo", "");
    assert_eq!(
        store.notes(),
        &[Note::new("Shopping", "Milk, eggs"), Note::new("Todo", "")]
    );

    store.delete(0);
    assert_eq!(store.notes(), &[Note::new("Todo", "")]);
    assert_eq!(persisted(&store), vec![Note::new("Todo", "")]);
}

#[test]
fn persisted_value_is_json_array_of_title_content_objects() {
    let mut store = NoteStore::init(memory_store());
    store.add("a", "b");
    let raw = store.store().get(NOTES_KEY).unwrap().unwrap();
    assert_eq!(raw, r#"[{"title":"a","content":"b"}]"#);
}
