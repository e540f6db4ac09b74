use chirpy_db::{Chirp, Document, Error, Store, User};
use std::collections::BTreeMap;

fn temp_path(name: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!("chirpy_db_format_{}.json", name))
}

#[test]
fn open_creates_an_empty_file() {
    let path = temp_path("creates_file");
    let _ = std::fs::remove_file(&path);
    let _db = Store::open(&path).unwrap();
    assert_eq!(std::fs::read(&path).unwrap(), Vec::<u8>::new());
    let _ = std::fs::remove_file(&path);
}

#[test]
fn pre_existing_empty_file_lists_nothing() {
    let path = temp_path("empty_file");
    std::fs::write(&path, b"").unwrap();
    let db = Store::open(&path).unwrap();
    assert!(db.chirps().unwrap().is_empty());
    assert!(db.users().unwrap().is_empty());
    let _ = std::fs::remove_file(&path);
}

#[test]
fn open_leaves_existing_content_alone() {
    let path = temp_path("untouched");
    std::fs::write(&path, b"garbage").unwrap();
    let _db = Store::open(&path).unwrap();
    assert_eq!(std::fs::read(&path).unwrap(), b"garbage");
    let _ = std::fs::remove_file(&path);
}

#[test]
fn malformed_file_fails_on_first_load() {
    let path = temp_path("corrupt");
    std::fs::write(&path, b"{\"chirps\": [").unwrap();
    let db = Store::open(&path).unwrap();

    let err = db.chirps().unwrap_err();
    assert!(matches!(err, Error::Corrupt(_)), "{err:?}");
    assert!(!err.is_client_error());
    assert!(matches!(
        db.create_chirp(br#"{"body":"hi"}"#),
        Err(Error::Corrupt(_))
    ));
    // the failed create must not have rewritten the file
    assert_eq!(std::fs::read(&path).unwrap(), b"{\"chirps\": [");
    let _ = std::fs::remove_file(&path);
}

#[test]
fn on_disk_layout_uses_string_keys() {
    let path = temp_path("layout");
    let _ = std::fs::remove_file(&path);
    let db = Store::open(&path).unwrap();
    db.create_chirp(br#"{"body":"hello"}"#).unwrap();
    db.create_user(br#"{"email":"a@b.com"}"#).unwrap();

    let raw: serde_json::Value =
        serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
    assert_eq!(
        raw,
        serde_json::json!({
            "chirps": { "1": { "body": "hello", "id": 1 } },
            "users": { "1": { "email": "a@b.com", "id": 1 } },
        })
    );
    let _ = std::fs::remove_file(&path);
}

#[test]
fn null_and_missing_collections_load_as_empty() {
    let path = temp_path("null_users");
    std::fs::write(
        &path,
        br#"{"chirps":{"1":{"body":"hi","id":1}},"users":null}"#,
    )
    .unwrap();
    let db = Store::open(&path).unwrap();
    assert!(db.users().unwrap().is_empty());
    assert_eq!(db.create_user(br#"{"email":"a@b.com"}"#).unwrap().id, 1);
    assert_eq!(db.chirps().unwrap().len(), 1);

    std::fs::write(&path, br#"{}"#).unwrap();
    assert!(db.chirps().unwrap().is_empty());
    let _ = std::fs::remove_file(&path);
}

#[test]
fn next_id_follows_gaps_in_hand_edited_files() {
    let path = temp_path("gaps");
    std::fs::write(
        &path,
        br#"{"chirps":{"7":{"body":"b","id":7},"2":{"body":"a","id":2}},"users":{}}"#,
    )
    .unwrap();
    let db = Store::open(&path).unwrap();

    let listed = db.chirps().unwrap();
    assert_eq!(listed.iter().map(|c| c.id).collect::<Vec<_>>(), vec![2, 7]);
    assert_eq!(db.create_chirp(br#"{"body":"c"}"#).unwrap().id, 8);
    assert!(matches!(db.chirp(3), Err(Error::NotFound { .. })));
    let _ = std::fs::remove_file(&path);
}

#[test]
fn removing_the_top_record_out_of_band_reuses_its_id() {
    let path = temp_path("reuse");
    let _ = std::fs::remove_file(&path);
    let db = Store::open(&path).unwrap();
    db.create_chirp(br#"{"body":"one"}"#).unwrap();
    db.create_chirp(br#"{"body":"two"}"#).unwrap();

    std::fs::write(&path, br#"{"chirps":{"1":{"body":"one","id":1}},"users":{}}"#).unwrap();
    assert_eq!(db.create_chirp(br#"{"body":"again"}"#).unwrap().id, 2);
    let _ = std::fs::remove_file(&path);
}

#[test]
fn document_roundtrips_through_disk() {
    let path = temp_path("roundtrip");
    let _ = std::fs::remove_file(&path);
    let db = Store::builder(&path).pretty(true).build().unwrap();
    db.create_chirp(br#"{"body":"quote \" and \\ slash"}"#).unwrap();
    db.create_chirp(r#"{"body":"ünïcödé"}"#.as_bytes()).unwrap();
    db.create_user(br#"{"email":"a@b.com"}"#).unwrap();

    let raw = std::fs::read(&path).unwrap();
    assert!(raw.contains(&b'\n'));
    let doc: Document = serde_json::from_slice(&raw).unwrap();

    let mut chirps = BTreeMap::new();
    chirps.insert(
        1,
        Chirp {
            body: "quote \" and \\ slash".into(),
            id: 1,
        },
    );
    chirps.insert(
        2,
        Chirp {
            body: "ünïcödé".into(),
            id: 2,
        },
    );
    let mut users = BTreeMap::new();
    users.insert(
        1,
        User {
            email: "a@b.com".into(),
            id: 1,
        },
    );
    assert_eq!(doc, Document { chirps, users });
    let _ = std::fs::remove_file(&path);
}

#[test]
fn compact_output_is_one_line() {
    let path = temp_path("compact");
    let _ = std::fs::remove_file(&path);
    let db = Store::open(&path).unwrap();
    db.create_chirp(br#"{"body":"hello"}"#).unwrap();
    let raw = std::fs::read_to_string(&path).unwrap();
    assert!(!raw.contains('\n'));
    let _ = std::fs::remove_file(&path);
}

#[test]
fn create_fails_cleanly_when_ids_run_out() {
    let path = temp_path("id_exhausted");
    let full = br#"{"chirps":{"18446744073709551615":{"body":"x","id":18446744073709551615}}}"#;
    std::fs::write(&path, full).unwrap();
    let db = Store::open(&path).unwrap();

    let err = db.create_chirp(br#"{"body":"y"}"#).unwrap_err();
    assert!(matches!(err, Error::Corrupt(_)), "{err:?}");
    assert!(!err.is_client_error());
    assert_eq!(std::fs::read(&path).unwrap(), full);
    assert_eq!(db.chirps().unwrap().len(), 1);

    // users have their own id space and are unaffected
    assert_eq!(db.create_user(br#"{"email":"a@b.com"}"#).unwrap().id, 1);
    let _ = std::fs::remove_file(&path);
}

#[test]
fn next_id_stops_at_the_top_of_the_id_space() {
    let mut table = BTreeMap::new();
    assert_eq!(Document::next_id(&table), Some(1));
    table.insert(u64::MAX - 1, ());
    assert_eq!(Document::next_id(&table), Some(u64::MAX));
    table.insert(u64::MAX, ());
    assert_eq!(Document::next_id(&table), None);
}

#[test]
fn key_that_disagrees_with_record_id_is_corrupt() {
    let path = temp_path("key_mismatch");
    let raw = br#"{"chirps":{"1":{"body":"x","id":5}},"users":{}}"#;
    std::fs::write(&path, raw).unwrap();
    let db = Store::open(&path).unwrap();

    let err = db.chirp(1).unwrap_err();
    assert!(matches!(err, Error::Corrupt(ref msg) if msg.contains("key 1")), "{err:?}");
    assert!(matches!(db.chirps(), Err(Error::Corrupt(_))));
    assert!(matches!(
        db.create_chirp(br#"{"body":"y"}"#),
        Err(Error::Corrupt(_))
    ));
    assert_eq!(std::fs::read(&path).unwrap(), raw);

    std::fs::write(&path, br#"{"users":{"2":{"email":"a@b.com","id":3}}}"#).unwrap();
    assert!(matches!(db.users(), Err(Error::Corrupt(_))));
    let _ = std::fs::remove_file(&path);
}
