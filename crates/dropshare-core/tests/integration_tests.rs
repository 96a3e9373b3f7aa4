//! 集成测试 - 登录与上传的完整流程
//!
//! 使用文件存储验证数据在重新打开后仍然保留，并与浏览器端的 JSON 格式兼容。

use chrono::{TimeZone, Utc};
use dropshare_core::storage::{UPLOADED_FILES_KEY, USER_DATA_KEY};
use dropshare_core::{
    AuthError, CredentialGate, FileHandle, FileStore, FixedIncrement, KeyValueStore, ManualClock,
    SessionStore, SimpleUploadCallback, UploadConfig, UploadEvent, UploadSimulator, UploadStatus,
    UserRecord,
};
use std::time::Duration;

/// 两个文件一批上传，直到全部完成
#[test]
fn test_two_file_batch_scenario() {
    let dir = tempfile::tempdir().unwrap();
    let session = SessionStore::new(FileStore::new(dir.path()));
    let (callback, mut rx) = SimpleUploadCallback::new();

    let mut sim = UploadSimulator::with_parts(
        session.clone(),
        UploadConfig::default(),
        FixedIncrement(7.5),
        ManualClock::new(Utc.timestamp_millis_opt(1_700_000_000_000).unwrap()),
    )
    .with_callback(callback);

    // 1. 提交两个文件
    sim.submit([
        FileHandle::new("a.txt", "text/plain", 10),
        FileHandle::new("b.txt", "text/plain", 20),
    ]);
    assert_eq!(sim.files().len(), 2);
    assert!(
        sim.files()
            .iter()
            .all(|f| f.status == UploadStatus::Uploading)
    );

    // 2. 7.5 * 14 = 105，第 14 次刷新时两者都到 100
    sim.advance(Duration::from_millis(200 * 13));
    assert!(!sim.all_uploaded());
    assert!(session.read_uploaded_files().is_empty());

    sim.advance(Duration::from_millis(200));
    assert!(sim.files().iter().all(|f| f.progress == 100.0));
    assert_eq!(sim.aggregate_progress(), 100.0);
    assert!(sim.all_uploaded());

    // 3. 存储中新增两条记录
    let records = session.read_uploaded_files();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].name, "a.txt");
    assert_eq!(records[0].size, 10);
    assert_eq!(records[1].name, "b.txt");
    assert_eq!(records[1].size, 20);
    assert!(records.iter().all(|r| !r.is_folder));

    let completed: Vec<String> = std::iter::from_fn(|| rx.try_recv().ok())
        .filter_map(|event| match event {
            UploadEvent::Complete(record) => Some(record.name),
            _ => None,
        })
        .collect();
    assert_eq!(completed, ["a.txt", "b.txt"]);

    // 4. 两秒后从列表移除，记录保留
    sim.advance(Duration::from_millis(2000));
    assert!(sim.files().is_empty());
    assert_eq!(sim.aggregate_progress(), 0.0);
    assert!(!sim.all_uploaded());

    let reopened = SessionStore::new(FileStore::new(dir.path()));
    assert_eq!(reopened.read_uploaded_files(), records);
}

/// 大批量同时完成时事件通道会丢消息，完成数量以存储为准
#[test]
fn test_large_batch_count_comes_from_store() {
    let dir = tempfile::tempdir().unwrap();
    let session = SessionStore::new(FileStore::new(dir.path()));
    let (callback, mut rx) = SimpleUploadCallback::new();

    let mut sim = UploadSimulator::with_parts(
        session.clone(),
        UploadConfig::default(),
        FixedIncrement(100.0),
        ManualClock::new(Utc.timestamp_millis_opt(1_700_000_000_000).unwrap()),
    )
    .with_callback(callback);

    let before = session.read_uploaded_files().len();
    sim.submit((0..300).map(|i| FileHandle::new(format!("f{}.bin", i), "", i)));
    sim.advance(Duration::from_millis(200));

    let complete_events = std::iter::from_fn(|| rx.try_recv().ok())
        .filter(|event| matches!(event, UploadEvent::Complete(_)))
        .count();
    assert!(complete_events < 300);
    assert_eq!(session.read_uploaded_files().len() - before, 300);
    assert!(sim.all_uploaded());
}

/// 注册、登录，登录状态写回文件
#[test]
fn test_login_persists_flag() {
    let dir = tempfile::tempdir().unwrap();
    let gate = CredentialGate::new(SessionStore::new(FileStore::new(dir.path())));

    assert!(matches!(
        gate.login("alice@example.com", "hunter2"),
        Err(AuthError::InvalidCredentials)
    ));

    gate.register("Alice", "alice@example.com", "hunter2").unwrap();
    gate.login("alice@example.com", "hunter2").unwrap();

    let raw = FileStore::new(dir.path()).get(USER_DATA_KEY).unwrap().unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(value["isLoggedIn"], true);
    assert_eq!(value["email"], "alice@example.com");
    assert_eq!(value["name"], "Alice");
}

/// 读取浏览器端写入的数据，并在其后追加
#[test]
fn test_browser_written_data_compatibility() {
    let dir = tempfile::tempdir().unwrap();
    let backend = FileStore::new(dir.path());
    backend
        .set(
            USER_DATA_KEY,
            r#"{"name":"Dana","email":"dana@example.com","password":"pw","isLoggedIn":false}"#,
        )
        .unwrap();
    backend
        .set(
            UPLOADED_FILES_KEY,
            r#"[{"id":"old.pdf-1690000000000","name":"old.pdf","type":"application/pdf","size":512,"modifiedAt":"2023-07-22T04:26:40.000Z","isFolder":false}]"#,
        )
        .unwrap();

    let session = SessionStore::new(backend);
    assert_eq!(
        session.read_user(),
        Some(UserRecord::new("Dana", "dana@example.com", "pw"))
    );

    let mut sim = UploadSimulator::with_parts(
        session.clone(),
        UploadConfig::default(),
        FixedIncrement(100.0),
        ManualClock::new(Utc.timestamp_millis_opt(1_700_000_000_000).unwrap()),
    );
    sim.submit([FileHandle::new("new.bin", "", 0)]);
    sim.advance(Duration::from_millis(200));

    let records = session.read_uploaded_files();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].name, "old.pdf");
    assert_eq!(records[1].id, "new.bin-1700000000000");
    assert_eq!(records[1].mime_type, "");
}

/// 本地文件的元数据
#[test]
fn test_file_handle_from_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("report.json");
    std::fs::write(&path, b"{\"ok\":true}").unwrap();

    let handle = FileHandle::from_path(&path).unwrap();
    assert_eq!(handle.name, "report.json");
    assert_eq!(handle.mime_type, "application/json");
    assert_eq!(handle.size, 11);

    let unknown = dir.path().join("blob.zzzunknown");
    std::fs::write(&unknown, b"x").unwrap();
    assert_eq!(FileHandle::from_path(&unknown).unwrap().mime_type, "");

    assert!(FileHandle::from_path(dir.path()).is_err());
    assert!(FileHandle::from_path(&dir.path().join("missing.txt")).is_err());
}
