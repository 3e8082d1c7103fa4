//! Load network files from disk and run requests against them.

use logistics_core::id::{ProviderId, RequesterId};
use logistics_core::log::{ItemMessage, RecordingLog};
use logistics_data::{load_network, load_network_dir, DataLoadError};
use logistics_request::{RequestManager, RequestOutcome};
use std::fs;
use std::path::PathBuf;

fn make_test_dir(suffix: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "logistics_data_it_{suffix}_{}",
        std::process::id()
    ));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
}

const WORKSHOP_TOML: &str = r#"
[[items]]
name = "log"
kind = 17

[[items]]
name = "planks"
kind = 5

[[items]]
name = "chest"
kind = 54

[[suppliers]]
id = 1
stock = [["log", 4]]

[[crafters]]
id = 9

[[crafters.recipes]]
output = ["planks", 4]
ingredients = [["log", 1]]

[[crafters.recipes]]
output = ["chest", 1]
ingredients = [["planks", 8]]

[resolver]
max_depth = 8
"#;

#[test]
fn toml_workshop_fulfills_chest() {
    let dir = make_test_dir("toml_workshop");
    fs::write(dir.join("network.toml"), WORKSHOP_TOML).unwrap();

    let mut loaded = load_network_dir(&dir).unwrap();
    assert_eq!(loaded.resolver.max_depth, 8);
    assert!(loaded.resolver.allow_crafting);

    let chest = loaded.item("chest").unwrap();
    let log_item = loaded.item("log").unwrap();
    let manager = RequestManager::new(loaded.resolver);
    let mut log = RecordingLog::new();
    let outcome = manager
        .request(&mut loaded.network, chest.stack(1), RequesterId(7), &mut log)
        .unwrap();

    assert!(outcome.is_fulfilled());
    assert_eq!(loaded.network.stock_of(ProviderId(1), log_item), 2);
    assert_eq!(
        log.last_successful().unwrap(),
        &[ItemMessage::new(log_item.stack(2))][..]
    );

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn ron_network_with_stock_only_resolver() {
    let dir = make_test_dir("ron_stock_only");
    let path = dir.join("network.ron");
    fs::write(
        &path,
        r#"(
            items: [(name: "cobblestone", kind: 4), (name: "furnace", kind: 61)],
            suppliers: [(id: 1, stock: [("cobblestone", 64)])],
            crafters: [(id: 2, recipes: [(output: ("furnace", 1), ingredients: [("cobblestone", 8)])])],
            resolver: Some((allow_crafting: false, use_extras: false)),
        )"#,
    )
    .unwrap();

    let mut loaded = load_network(&path).unwrap();
    let furnace = loaded.item("furnace").unwrap();
    let mut log = RecordingLog::new();
    let outcome = RequestManager::new(loaded.resolver)
        .request(&mut loaded.network, furnace.stack(1), RequesterId(0), &mut log)
        .unwrap();

    assert_eq!(
        outcome,
        RequestOutcome::Missing {
            missing: vec![ItemMessage::new(furnace.stack(1))]
        }
    );

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn missing_network_file_is_an_error() {
    let dir = make_test_dir("missing_file");
    assert!(matches!(
        load_network_dir(&dir),
        Err(DataLoadError::MissingRequired { .. })
    ));
    let _ = fs::remove_dir_all(&dir);
}
