//! Integration tests for the CLI route table

use clap::Parser;
use curio::cli::{Cli, RunContext};
use curio::ApiError;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// One run context per test, fed with parsed command lines
struct Harness {
    context: RunContext,
}

impl Harness {
    fn open(root: &Path) -> Self {
        let cli = Cli::try_parse_from(["curio", "--project", root.to_str().unwrap(), "page", "list"])
            .unwrap();
        let context = RunContext::new(cli.project, cli.config).unwrap();
        Self { context }
    }

    fn run(&self, args: &[&str]) -> Result<String, ApiError> {
        let mut argv = vec!["curio"];
        argv.extend_from_slice(args);
        let cli = Cli::try_parse_from(argv).unwrap();
        self.context.execute(&cli.command)
    }

    fn create_page(&self) -> String {
        let output = self.run(&["page", "create"]).unwrap();
        let page: serde_json::Value = serde_json::from_str(&output).unwrap();
        page["id"].as_str().unwrap().to_string()
    }
}

#[test]
fn test_page_commands_round_trip() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    let cli = Harness::open(root);
    let page_id = cli.create_page();

    let edit = root.join("edit.json");
    fs::write(
        &edit,
        r#"{
            "widgets": [
                {"type": "TEXT", "id": "intro-text", "heading": "Hello"},
                {"type": "UNKNOWN_WIDGET", "id": "ignored-widget"}
            ]
        }"#,
    )
    .unwrap();

    let saved = cli.run(&["page", "save", &page_id, edit.to_str().unwrap()]).unwrap();
    assert!(saved.contains("intro-text"));
    assert!(!saved.contains("ignored-widget"));
    assert_eq!(cli.run(&["page", "state", &page_id]).unwrap(), "work-in-progress");

    cli.run(&["page", "publish", &page_id]).unwrap();
    assert_eq!(cli.run(&["page", "state", &page_id]).unwrap(), "published");

    cli.run(&["page", "alias", &page_id, "welcome"]).unwrap();
    let shown = cli.run(&["page", "show", "welcome", "--locale", "de"]).unwrap();
    let shown: serde_json::Value = serde_json::from_str(&shown).unwrap();
    assert_eq!(shown["widgets"][0]["heading"]["translatedValue"], "Hello");

    let listed = cli.run(&["page", "list", "--format", "json"]).unwrap();
    let listed: serde_json::Value = serde_json::from_str(&listed).unwrap();
    assert_eq!(listed[0]["alias"], "welcome");
    assert_eq!(listed[0]["version"], 1);

    let table = cli.run(&["page", "list"]).unwrap();
    assert!(table.contains("welcome"));

    cli.run(&["page", "delete", "welcome"]).unwrap();
    assert!(matches!(
        cli.run(&["page", "state", &page_id]),
        Err(ApiError::NotFound(_))
    ));
}

#[test]
fn test_file_commands() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    let cli = Harness::open(root);
    let page_id = cli.create_page();

    let edit = root.join("edit.json");
    fs::write(
        &edit,
        r#"{"widgets": [{"type": "IMAGE_GALLERY", "id": "gallery-1", "images": []}]}"#,
    )
    .unwrap();
    cli.run(&["page", "save", &page_id, edit.to_str().unwrap()]).unwrap();

    let upload = root.join("photo.png");
    fs::write(&upload, b"not really a png").unwrap();
    let stored = cli
        .run(&["file", "add", &page_id, "gallery-1", upload.to_str().unwrap()])
        .unwrap();
    assert_eq!(stored, "photo.png");

    let read = cli.run(&["file", "get", "gallery-1", "photo.png", "--wip"]).unwrap();
    assert_eq!(read, "16 bytes");
    assert!(matches!(
        cli.run(&["file", "get", "gallery-1", "photo.png"]),
        Err(ApiError::NotFound(_))
    ));
    assert!(matches!(
        cli.run(&["file", "get", "gallery-1", "photo.png", "--size", "huge"]),
        Err(ApiError::InvalidRequest(_))
    ));

    let after = cli.run(&["file", "rm", &page_id, "gallery-1", "photo.png"]).unwrap();
    let after: serde_json::Value = serde_json::from_str(&after).unwrap();
    assert_eq!(after["widgets"][0]["images"], serde_json::json!([]));
}

#[test]
fn test_menu_commands_restrict_show() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    let cli = Harness::open(root);
    let page_id = cli.create_page();

    let menus = root.join("menus.json");
    fs::write(
        &menus,
        format!(
            r#"[{{"id": "members", "targetPageId": "{}", "restrictions": ["ROLE_USER"]}}]"#,
            page_id
        ),
    )
    .unwrap();
    assert_eq!(
        cli.run(&["menu", "set", menus.to_str().unwrap()]).unwrap(),
        "Saved 1 menus"
    );
    assert!(cli.run(&["menu", "show"]).unwrap().contains("members"));

    assert!(matches!(
        cli.run(&["page", "show", &page_id]),
        Err(ApiError::PermissionDenied(_))
    ));
    assert!(cli.run(&["page", "show", &page_id, "--roles", "ROLE_USER"]).is_ok());
}

#[test]
fn test_show_without_page_uses_index_page() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    let index_page_id = "c8f3b1a2-0000-4000-8000-000000000001";
    fs::create_dir_all(root.join("config")).unwrap();
    fs::write(
        root.join("config/config.toml"),
        format!("index_page_id = \"{}\"\n", index_page_id),
    )
    .unwrap();
    let cli = Harness::open(root);

    assert!(matches!(
        cli.run(&["page", "show"]),
        Err(ApiError::NotFound(_))
    ));

    // Saving to an unknown page ID imports the content as that page
    let edit = root.join("index.json");
    fs::write(
        &edit,
        r#"{"widgets": [{"type": "PAGE_TITLE", "id": "title-widget", "title": "Start"}]}"#,
    )
    .unwrap();
    cli.run(&["page", "save", index_page_id, edit.to_str().unwrap()])
        .unwrap();

    let shown = cli.run(&["page", "show"]).unwrap();
    assert!(shown.contains("title-widget"));
    assert_eq!(
        cli.context.api().load_index_page().unwrap().unwrap().id,
        index_page_id
    );
}
