use anyhow::Result;
use chrono::{Local, TimeZone, Utc};
use dailies::{
    Commission, CommissionId, CommissionStore, DailiesError, JsonFileBackend, TimeReference,
};
use std::sync::Arc;
use tempfile::TempDir;

fn local_ms(y: i32, m: u32, d: u32, h: u32, min: u32) -> i64 {
    Local
        .with_ymd_and_hms(y, m, d, h, min, 0)
        .earliest()
        .unwrap()
        .timestamp_millis()
}

fn utc_ms(y: i32, m: u32, d: u32, h: u32, min: u32) -> i64 {
    Utc.with_ymd_and_hms(y, m, d, h, min, 0)
        .unwrap()
        .timestamp_millis()
}

fn open_store(temp_dir: &TempDir, reference: TimeReference) -> CommissionStore<JsonFileBackend> {
    let path = temp_dir.path().join("commissions.json");
    CommissionStore::open(JsonFileBackend::open(path, reference).unwrap())
}

/// 建立、完成、刪除的完整流程（本地時間）
#[test]
fn test_deliver_ore_scenario() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let store = open_store(&temp_dir, TimeReference::Local);

    let created = store.create_at(
        "Deliver 5 ore",
        "Bastion",
        r#"{"gold":100,"xp":50}"#,
        local_ms(2024, 5, 1, 10, 0),
    )?;
    assert!(!created.completed);

    let late_same_day = store.load_for_date(local_ms(2024, 5, 1, 23, 59))?;
    assert_eq!(late_same_day, vec![created.clone()]);

    let next_day = store.load_for_date(local_ms(2024, 5, 2, 0, 0))?;
    assert!(next_day.is_empty());

    store.complete(created.id)?;
    store.delete(created.id)?;
    assert!(store.load_for_date(local_ms(2024, 5, 1, 10, 0))?.is_empty());

    store.close()?;
    Ok(())
}

#[test]
fn test_same_day_timestamps_give_identical_results() {
    let temp_dir = TempDir::new().unwrap();
    let store = open_store(&temp_dir, TimeReference::Utc);

    store
        .create_at("Morning", "Bastion", "{}", utc_ms(2024, 6, 10, 0, 0))
        .unwrap();
    store
        .create_at("Evening", "Realm of Duty", "[]", utc_ms(2024, 6, 10, 23, 59))
        .unwrap();
    store
        .create_at("Tomorrow", "Bastion", "{}", utc_ms(2024, 6, 11, 0, 0))
        .unwrap();

    let at_midnight = store.load_for_date(utc_ms(2024, 6, 10, 0, 0)).unwrap();
    let at_noon = store.load_for_date(utc_ms(2024, 6, 10, 12, 30)).unwrap();
    let at_close = store.load_for_date(utc_ms(2024, 6, 10, 23, 59)).unwrap();

    assert_eq!(at_midnight.len(), 2);
    assert_eq!(at_midnight, at_noon);
    assert_eq!(at_noon, at_close);

    let descriptions: Vec<&str> = at_noon.iter().map(|c| c.description.as_str()).collect();
    assert_eq!(descriptions, vec!["Morning", "Evening"]);
}

#[test]
fn test_not_found_leaves_store_unchanged() {
    let temp_dir = TempDir::new().unwrap();
    let store = open_store(&temp_dir, TimeReference::Utc);
    let day = utc_ms(2024, 6, 10, 9, 0);
    let existing = store.create_at("Patrol", "Bastion", "{}", day).unwrap();

    let before = std::fs::read_to_string(temp_dir.path().join("commissions.json")).unwrap();

    let err = store.complete(CommissionId(999)).unwrap_err();
    assert!(matches!(err, DailiesError::NotFoundError { id } if id == CommissionId(999)));
    let err = store.delete(CommissionId(999)).unwrap_err();
    assert!(matches!(err, DailiesError::NotFoundError { .. }));

    let after = std::fs::read_to_string(temp_dir.path().join("commissions.json")).unwrap();
    assert_eq!(before, after);
    assert_eq!(store.load_for_date(day).unwrap(), vec![existing]);
}

#[test]
fn test_completion_and_deletion_survive_reopen() {
    let temp_dir = TempDir::new().unwrap();
    let day = utc_ms(2024, 7, 4, 15, 0);

    let (kept, removed) = {
        let store = open_store(&temp_dir, TimeReference::Utc);
        let kept = store.create_at("Kept", "Bastion", r#"{"xp":5}"#, day).unwrap();
        let removed = store.create_at("Removed", "Bastion", "{}", day).unwrap();
        store.complete(kept.id).unwrap();
        store.delete(removed.id).unwrap();
        store.close().unwrap();
        (kept, removed)
    };

    let store = open_store(&temp_dir, TimeReference::Utc);
    let loaded = store.load_for_date(day).unwrap();
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].id, kept.id);
    assert!(loaded[0].completed);

    // 刪除過的 id 重開後也不會再被配發
    let fresh = store.create_at("Fresh", "Bastion", "{}", day).unwrap();
    assert!(fresh.id > removed.id);
    assert!(store.complete(removed.id).is_err());
}

#[test]
fn test_rewards_round_trip_semantically() {
    let temp_dir = TempDir::new().unwrap();
    let day = utc_ms(2024, 7, 4, 15, 0);
    let payload = r#"[ {"type": "primos", "count": 400}, {"type": "arexp", "count": 200} ]"#;

    {
        let store = open_store(&temp_dir, TimeReference::Utc);
        store.create_at("Spiral Abyss", "Teyvat", payload, day).unwrap();
        store.close().unwrap();
    }

    let store = open_store(&temp_dir, TimeReference::Utc);
    let loaded: Vec<Commission> = store.load_for_date(day).unwrap();

    let reemitted: serde_json::Value =
        serde_json::from_str(&loaded[0].rewards.to_payload()).unwrap();
    let original: serde_json::Value = serde_json::from_str(payload).unwrap();
    assert_eq!(reemitted, original);
    assert_eq!(loaded[0].rewards.summary(), "primos x400, arexp x200");
}

#[test]
fn test_invalid_rewards_commit_nothing() {
    let temp_dir = TempDir::new().unwrap();
    let store = open_store(&temp_dir, TimeReference::Utc);
    let day = utc_ms(2024, 8, 1, 8, 0);

    let err = store
        .create_at("Broken", "Bastion", r#"{"gold": 100"#, day)
        .unwrap_err();
    assert!(matches!(err, DailiesError::ValidationError { ref field, .. } if field == "rewards"));
    assert!(store.load_for_date(day).unwrap().is_empty());

    let first = store.create_at("Valid", "Bastion", "{}", day).unwrap();
    assert_eq!(first.id, CommissionId(1));
}

#[test]
fn test_concurrent_creates_get_distinct_ids() {
    let temp_dir = TempDir::new().unwrap();
    let store = Arc::new(open_store(&temp_dir, TimeReference::Utc));
    let day = utc_ms(2024, 9, 1, 12, 0);

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let store = Arc::clone(&store);
            std::thread::spawn(move || {
                store
                    .create_at(&format!("Task {}", i), "Bastion", "{}", day)
                    .unwrap()
                    .id
            })
        })
        .collect();

    let mut ids: Vec<CommissionId> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 8);

    let loaded = store.load_for_date(day).unwrap();
    assert_eq!(loaded.len(), 8);
    assert!(loaded.windows(2).all(|w| w[0].id < w[1].id));
}
