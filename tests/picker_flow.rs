//! End-to-end picker flow: fetch the dataset over HTTP, search, page through
//! results, curate the popular list and read it back from a fresh store.
//!
//! The HTTP side is served by wiremock; storage is a SQLite file in a
//! per-test temp directory.

use emoji_picker::app::{App, AppEvent, AppOptions, LoadState, Mode};
use emoji_picker::dataset::{DatasetOrigin, DatasetSource, LoadPolicy};
use emoji_picker::popular::SelectionState;
use emoji_picker::storage::Database;
use pretty_assertions::assert_eq;
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::mpsc;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// 150 animals plus a handful of smileys.
fn dataset_json() -> String {
    let animals: Vec<String> = (0..150)
        .map(|i| format!(r#"{{ "emoji": "a{i}", "name": "animal number {i}" }}"#))
        .collect();
    format!(
        r#"{{
            "@version": "15.1",
            "emojis": {{
                "Smileys & Emotion": {{
                    "face-smiling": [
                        {{ "emoji": "😀", "name": "grinning face" }},
                        {{ "emoji": "😂", "name": "face with tears of joy" }}
                    ]
                }},
                "Animals & Nature": {{
                    "animal-mammal": [{}]
                }}
            }}
        }}"#,
        animals.join(",")
    )
}

fn temp_db_path(name: &str) -> (PathBuf, String) {
    let dir = std::env::temp_dir().join(format!("emoji_picker_flow_{}", name));
    std::fs::remove_dir_all(&dir).ok();
    std::fs::create_dir_all(&dir).unwrap();
    let db_path = dir.join("picker.db").display().to_string();
    (dir, db_path)
}

async fn serve_dataset(status: u16, body: String) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/categories.min.json"))
        .respond_with(ResponseTemplate::new(status).set_body_string(body))
        .mount(&server)
        .await;
    server
}

fn options(mode: Mode, server: &MockServer, policy: LoadPolicy) -> AppOptions {
    AppOptions {
        mode,
        source: DatasetSource::parse(&format!("{}/categories.min.json", server.uri())).unwrap(),
        load_policy: policy,
        fetch_timeout: Duration::from_secs(5),
        search_debounce: Duration::ZERO,
        popular_key: "popularEmojis".to_string(),
    }
}

async fn load(app: &mut App) {
    let (tx, mut rx) = mpsc::channel(4);
    app.begin_load(&tx);
    match rx.recv().await.unwrap() {
        AppEvent::DatasetLoaded { generation, result } => {
            assert!(app.finish_load(generation, result));
        }
        other => panic!("unexpected event {:?}", other),
    }
}

#[tokio::test]
async fn test_search_page_and_curate() {
    let server = serve_dataset(200, dataset_json()).await;
    let (dir, db_path) = temp_db_path("curate");

    let db = Database::open(&db_path).await.unwrap();
    let mut app = App::new(db, options(Mode::Curate, &server, LoadPolicy::FailVisible)).unwrap();
    app.load_popular().await;
    load(&mut app).await;

    assert_eq!(app.load_state, LoadState::Ready);
    assert_eq!(app.dataset.origin(), DatasetOrigin::Source);
    assert_eq!(app.dataset.len(), 152);

    // First page, then the rest
    assert_eq!(app.visible().items.len(), 100);
    assert!(app.visible().has_more);
    assert!(app.load_more());
    assert_eq!(app.visible().items.len(), 152);
    assert!(!app.load_more());

    // Narrow to the animal category; paging restarts
    app.cycle_category(true);
    app.cycle_category(true);
    app.cycle_category(true);
    assert_eq!(app.category_filter(), Some("animals-nature"));
    assert_eq!(app.filtered.len(), 150);
    assert_eq!(app.cursor.current_page(), 1);

    // Search across all categories
    app.cycle_category(false);
    app.cycle_category(false);
    app.cycle_category(false);
    app.search_input = "TEARS".to_string();
    app.commit_search();
    assert_eq!(app.filtered.len(), 1);
    assert_eq!(app.filtered[0].glyph, "😂");

    assert_eq!(app.toggle_selected(), Some(SelectionState::Added));
    app.clear_search();
    assert_eq!(app.toggle_selected(), Some(SelectionState::Added));
    assert_eq!(app.popular.glyphs(), ["😂", "😀"]);

    app.save_popular().await;
    assert!(!app.popular.is_dirty());
    drop(app);

    // A fresh store over the same file sees the saved order
    let db = Database::open(&db_path).await.unwrap();
    let mut app = App::new(db, options(Mode::Curate, &server, LoadPolicy::FailVisible)).unwrap();
    app.load_popular().await;
    assert_eq!(app.popular.glyphs(), ["😂", "😀"]);

    drop(app);
    std::fs::remove_dir_all(&dir).ok();
}

#[tokio::test]
async fn test_exit_save_persists_unsaved_changes() {
    let server = serve_dataset(200, dataset_json()).await;
    let (dir, db_path) = temp_db_path("exit_save");

    let db = Database::open(&db_path).await.unwrap();
    let mut app = App::new(db, options(Mode::Curate, &server, LoadPolicy::FailVisible)).unwrap();
    load(&mut app).await;
    app.toggle_selected();
    app.save_popular_on_exit().await;
    drop(app);

    let db = Database::open(&db_path).await.unwrap();
    assert_eq!(db.load_popular("popularEmojis").await, vec!["😀"]);

    std::fs::remove_dir_all(&dir).ok();
}

#[tokio::test]
async fn test_server_error_browse_falls_back() {
    let server = serve_dataset(503, String::new()).await;
    let db = Database::open(":memory:").await.unwrap();
    let policy = Mode::Browse.default_load_policy();
    let mut app = App::new(db, options(Mode::Browse, &server, policy)).unwrap();
    load(&mut app).await;

    assert_eq!(app.load_state, LoadState::Ready);
    assert_eq!(app.dataset.origin(), DatasetOrigin::Fallback);
    assert_eq!(app.filtered.len(), 10);
}

#[tokio::test]
async fn test_server_error_curate_fails_visibly() {
    let server = serve_dataset(503, String::new()).await;
    let db = Database::open(":memory:").await.unwrap();
    let policy = Mode::Curate.default_load_policy();
    let mut app = App::new(db, options(Mode::Curate, &server, policy)).unwrap();
    load(&mut app).await;

    assert!(matches!(app.load_state, LoadState::Failed(_)));
    assert!(app.dataset.is_empty());
    assert!(app.visible().items.is_empty());
    assert_eq!(app.toggle_selected(), None);
}
