use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use serde_json::{json, Value};

use configs::DEFAULT_STORAGE_KEY;
use models::SequenceIds;
use service::{JsonFileStorage, KeyValueStorage, MemoryStorage, PassengerStore, ServiceError};

/// Memory storage that counts writes.
#[derive(Default)]
struct CountingStorage {
    inner: MemoryStorage,
    writes: AtomicUsize,
}

impl CountingStorage {
    fn seeded(value: &Value) -> Self {
        Self {
            inner: MemoryStorage::with_entry(DEFAULT_STORAGE_KEY, value.to_string()),
            writes: AtomicUsize::new(0),
        }
    }

    fn writes(&self) -> usize { self.writes.load(Ordering::SeqCst) }

    fn stored(&self) -> Value {
        let text = self.inner.get(DEFAULT_STORAGE_KEY).unwrap_or_default();
        serde_json::from_str(&text).unwrap_or(Value::Null)
    }
}

impl KeyValueStorage for CountingStorage {
    fn get(&self, key: &str) -> Option<String> { self.inner.get(key) }

    fn set(&self, key: &str, value: &str) -> Result<(), ServiceError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.inner.set(key, value)
    }
}

/// Storage whose writes always fail.
struct ReadOnlyStorage(MemoryStorage);

impl KeyValueStorage for ReadOnlyStorage {
    fn get(&self, key: &str) -> Option<String> { self.0.get(key) }

    fn set(&self, _key: &str, _value: &str) -> Result<(), ServiceError> {
        Err(ServiceError::Storage("quota exceeded".into()))
    }
}

fn store(storage: Arc<CountingStorage>) -> PassengerStore<Arc<CountingStorage>> {
    PassengerStore::new(storage).with_ids(Arc::new(SequenceIds::new("gen")))
}

fn legacy_list() -> Value {
    json!([
        { "id": "L1", "name": "Иванов Иван Иванович", "document": "Паспорт 1234 567890", "benefit": "", "loyalty": "", "childTicket": false },
        { "name": "Петрова Анна", "document": "1234567890", "benefit": "student", "loyalty": "RZD-1", "childTicket": true },
        { "id": "L3", "name": "", "document": "" }
    ])
}

#[test]
fn migration_writes_once() {
    let storage = Arc::new(CountingStorage::seeded(&legacy_list()));
    let store = store(storage.clone());

    let first = store.load();
    assert_eq!(storage.writes(), 1);
    assert_eq!(first.len(), 3);
    assert_eq!(first[1].id, "gen-1");
    assert_eq!(first[1].last_name, "Петрова");
    assert_eq!(first[1].first_name, "Анна");
    assert_eq!(first[1].doc_type, "");
    assert_eq!(first[1].doc_number, "1234567890");
    assert_eq!(first[1].benefit_type, "student");
    assert!(first[1].child_ticket);
    assert_eq!(first[2].display_name(), "Пассажир");
    assert_eq!(first[2].document_line(), "");

    let second = store.load();
    assert_eq!(storage.writes(), 1, "second load must not write");
    assert_eq!(second, first, "generated ids survive the rewrite");
}

#[test]
fn stored_list_matches_wire_shape_after_migration() {
    let storage = Arc::new(CountingStorage::seeded(&legacy_list()));
    store(storage.clone()).load();

    let stored = storage.stored();
    let items = stored.as_array().expect("array");
    for item in items {
        let obj = item.as_object().expect("object");
        assert_eq!(obj.len(), 11);
        assert!(obj["childTicket"].is_boolean());
        for key in ["id", "lastName", "firstName", "middleName", "gender", "birthDate", "docType", "docNumber", "benefitType", "loyaltyNumber"] {
            assert!(obj[key].is_string(), "{key} should be a string");
        }
        assert!(!obj.contains_key("name"));
        assert!(!obj.contains_key("document"));
    }
}

#[test]
fn current_list_loads_without_writing() {
    let current = json!([{
        "id": "a", "lastName": "Иванов", "firstName": "Иван", "middleName": "",
        "gender": "", "birthDate": "", "docType": "", "docNumber": "X",
        "benefitType": "", "loyaltyNumber": "", "childTicket": false
    }]);
    let storage = Arc::new(CountingStorage::seeded(&current));
    let loaded = store(storage.clone()).load();
    assert_eq!(loaded.len(), 1);
    assert_eq!(storage.writes(), 0);
}

#[test]
fn partial_current_record_is_completed_once() {
    let storage = Arc::new(CountingStorage::seeded(&json!([{ "lastName": "Иванов", "docType": "" }])));
    let store = store(storage.clone());
    let first = store.load();
    let second = store.load();
    assert_eq!(storage.writes(), 1);
    assert_eq!(first, second);
    assert_eq!(second[0].id, "gen-1");
}

#[test]
fn upserts_never_duplicate_ids() -> Result<(), ServiceError> {
    let storage = Arc::new(CountingStorage::default());
    let store = store(storage.clone());

    let inputs = [
        json!({ "id": "a", "lastName": "1" }),
        json!({ "lastName": "2" }),
        json!({ "id": "a", "lastName": "3" }),
        json!({ "id": "b", "lastName": "4" }),
        json!({ "id": "gen-1", "lastName": "5" }),
        json!({ "name": "6" }),
        json!({ "id": "b", "name": "7" }),
    ];
    for input in &inputs {
        store.upsert(input)?;
    }

    let list = store.load();
    let mut ids: Vec<_> = list.iter().map(|p| p.id.clone()).collect();
    let total = ids.len();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), total);
    assert_eq!(total, 4);

    let by_id = |id: &str| list.iter().find(|p| p.id == id).map(|p| p.last_name.clone());
    assert_eq!(by_id("a").as_deref(), Some("3"));
    assert_eq!(by_id("b").as_deref(), Some("7"));
    assert_eq!(by_id("gen-1").as_deref(), Some("5"));
    Ok(())
}

#[test]
fn same_content_different_ids_are_kept_apart() -> Result<(), ServiceError> {
    let storage = Arc::new(CountingStorage::default());
    let store = store(storage);
    store.upsert(&json!({ "lastName": "Иванов" }))?;
    store.upsert(&json!({ "lastName": "Иванов" }))?;
    assert_eq!(store.load().len(), 2);
    Ok(())
}

#[test]
fn removing_unknown_id_keeps_content() -> Result<(), ServiceError> {
    let storage = Arc::new(CountingStorage::default());
    let store = store(storage.clone());
    store.upsert(&json!({ "id": "a", "lastName": "A" }))?;
    let before = storage.stored();

    assert!(!store.remove("nope")?);
    assert_eq!(storage.stored(), before);
    Ok(())
}

#[test]
fn corrupt_storage_reads_empty_and_is_replaced_on_write() -> Result<(), ServiceError> {
    let storage = Arc::new(CountingStorage {
        inner: MemoryStorage::with_entry(DEFAULT_STORAGE_KEY, "[{\"id\":"),
        writes: AtomicUsize::new(0),
    });
    let store = store(storage.clone());
    assert!(store.load().is_empty());
    assert_eq!(storage.writes(), 0);

    store.upsert(&json!({ "id": "a" }))?;
    assert_eq!(storage.stored().as_array().map(Vec::len), Some(1));
    Ok(())
}

#[test]
fn failed_write_back_still_returns_migrated_list() {
    let inner = MemoryStorage::with_entry(DEFAULT_STORAGE_KEY, legacy_list().to_string());
    let store = PassengerStore::new(ReadOnlyStorage(inner)).with_ids(Arc::new(SequenceIds::new("ro")));
    let list = store.load();
    assert_eq!(list.len(), 3);
    assert_eq!(list[0].last_name, "Иванов");
    assert!(matches!(store.upsert(&json!({ "id": "x" })), Err(ServiceError::Storage(_))));
}

#[test]
fn select_options_follow_stored_order() -> Result<(), ServiceError> {
    let storage = Arc::new(CountingStorage::seeded(&legacy_list()));
    let store = store(storage);
    let opts = store.select_options(Some("L3"));
    let pairs: Vec<_> = opts.iter().map(|o| (o.label.as_str(), o.value.as_str(), o.selected)).collect();
    assert_eq!(
        pairs,
        vec![
            ("Новый пассажир", "", false),
            ("Иванов Иван Иванович", "L1", false),
            ("Петрова Анна", "gen-1", false),
            ("Пассажир", "L3", true),
        ]
    );
    Ok(())
}

#[test]
fn file_backed_store_survives_reopen() -> Result<(), anyhow::Error> {
    let tmp = std::env::temp_dir().join(format!("passenger_store_{}.json", uuid::Uuid::new_v4()));
    {
        let file = JsonFileStorage::open(&tmp)?;
        file.set(DEFAULT_STORAGE_KEY, &legacy_list().to_string())?;
        let store = PassengerStore::new(file);
        assert_eq!(store.load().len(), 3);
        store.upsert(&json!({ "id": "new", "lastName": "Новиков" }))?;
    }

    let reopened = PassengerStore::new(JsonFileStorage::open(&tmp)?);
    let raw = reopened.load_raw_list();
    assert_eq!(raw.len(), 4);
    assert!(raw.iter().all(|r| r.get("lastName").is_some()));
    assert_eq!(reopened.get_by_id("new").map(|p| p.last_name), Some("Новиков".to_string()));

    let _ = std::fs::remove_file(&tmp);
    Ok(())
}
