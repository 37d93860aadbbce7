use restock_core::RoleRegistry;

fn temp_dir(tag: &str) -> std::path::PathBuf {
    let mut dir = std::env::temp_dir();
    dir.push(format!(
        "restock_{tag}_{}",
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ));
    dir
}

#[tokio::test]
async fn set_then_reload_round_trips() {
    let dir = temp_dir("roundtrip");
    let path = dir.join("fruit_roles.json");

    let registry = RoleRegistry::load_from(&path).await;
    registry.set("Dragon", "123456789").await.unwrap();

    let reloaded = RoleRegistry::load_from(&path).await;
    assert_eq!(reloaded.get("Dragon").await.as_deref(), Some("123456789"));

    let _ = tokio::fs::remove_dir_all(&dir).await;
}

#[tokio::test]
async fn remove_absent_key_returns_false_and_leaves_store() {
    let dir = temp_dir("remove_absent");
    let path = dir.join("fruit_roles.json");

    let registry = RoleRegistry::load_from(&path).await;
    registry.set("Dragon", "1").await.unwrap();
    assert!(!registry.remove("Leopard").await.unwrap());

    let reloaded = RoleRegistry::load_from(&path).await;
    assert_eq!(reloaded.get("Dragon").await.as_deref(), Some("1"));
    assert_eq!(reloaded.list().await.len(), 1);

    let _ = tokio::fs::remove_dir_all(&dir).await;
}

#[tokio::test]
async fn remove_existing_key_persists() {
    let dir = temp_dir("remove");
    let path = dir.join("fruit_roles.json");

    let registry = RoleRegistry::load_from(&path).await;
    registry.set("Dragon", "1").await.unwrap();
    registry.set("Leopard", "2").await.unwrap();
    assert!(registry.remove("Dragon").await.unwrap());

    let reloaded = RoleRegistry::load_from(&path).await;
    assert_eq!(reloaded.get("Dragon").await, None);
    assert_eq!(reloaded.get("Leopard").await.as_deref(), Some("2"));

    let _ = tokio::fs::remove_dir_all(&dir).await;
}

#[tokio::test]
async fn list_preserves_insertion_order_across_reload() {
    let dir = temp_dir("order");
    let path = dir.join("fruit_roles.json");

    let registry = RoleRegistry::load_from(&path).await;
    registry.set("Kitsune", "3").await.unwrap();
    registry.set("Dragon", "1").await.unwrap();
    registry.set("Buddha", "2").await.unwrap();
    // Updating an existing key keeps its position.
    registry.set("Kitsune", "30").await.unwrap();

    let reloaded = RoleRegistry::load_from(&path).await;
    let names: Vec<String> = reloaded
        .list()
        .await
        .into_iter()
        .map(|binding| binding.fruit)
        .collect();
    assert_eq!(names, vec!["Kitsune", "Dragon", "Buddha"]);
    assert_eq!(reloaded.get("Kitsune").await.as_deref(), Some("30"));

    let _ = tokio::fs::remove_dir_all(&dir).await;
}

#[tokio::test]
async fn load_recovers_from_tmp_when_main_is_corrupted() {
    let dir = temp_dir("corrupt");
    tokio::fs::create_dir_all(&dir).await.unwrap();
    let path = dir.join("fruit_roles.json");

    tokio::fs::write(&path, b"{ this is not json ").await.unwrap();
    tokio::fs::write(dir.join("fruit_roles.json.tmp"), br#"{"Dragon": "42"}"#)
        .await
        .unwrap();

    let registry = RoleRegistry::load_from(&path).await;
    assert_eq!(registry.get("Dragon").await.as_deref(), Some("42"));

    let _ = tokio::fs::remove_dir_all(&dir).await;
}

#[tokio::test]
async fn load_accepts_numeric_role_ids_from_older_files() {
    let dir = temp_dir("numeric");
    tokio::fs::create_dir_all(&dir).await.unwrap();
    let path = dir.join("fruit_roles.json");
    tokio::fs::write(&path, br#"{"Dragon": 123456789}"#).await.unwrap();

    let registry = RoleRegistry::load_from(&path).await;
    assert_eq!(registry.get("Dragon").await.as_deref(), Some("123456789"));

    let _ = tokio::fs::remove_dir_all(&dir).await;
}

#[tokio::test]
async fn missing_file_loads_empty() {
    let dir = temp_dir("missing");
    let registry = RoleRegistry::load_from(dir.join("fruit_roles.json")).await;
    assert!(registry.list().await.is_empty());
}

#[tokio::test]
async fn failed_persist_rolls_back_memory() {
    let dir = temp_dir("rollback");
    tokio::fs::create_dir_all(&dir).await.unwrap();
    // A regular file where the registry expects its parent directory makes
    // every write fail.
    let blocked = dir.join("blocked");
    tokio::fs::write(&blocked, b"").await.unwrap();
    let path = blocked.join("fruit_roles.json");

    let registry = RoleRegistry::load_from(&path).await;
    assert!(registry.set("Dragon", "1").await.is_err());
    assert_eq!(registry.get("Dragon").await, None);
    assert!(registry.list().await.is_empty());

    let _ = tokio::fs::remove_dir_all(&dir).await;
}

#[tokio::test]
async fn empty_role_id_is_rejected() {
    let registry = RoleRegistry::in_memory();
    assert!(registry.set("Dragon", "").await.is_err());
    assert!(registry.list().await.is_empty());
}

#[tokio::test]
async fn in_memory_registry_works_without_persistence() {
    let registry = RoleRegistry::in_memory();
    registry.set("Dragon", "1").await.unwrap();
    assert_eq!(registry.get("Dragon").await.as_deref(), Some("1"));
    assert!(registry.remove("Dragon").await.unwrap());
    assert_eq!(registry.get("Dragon").await, None);
}
