//! Draft/publish lifecycle of pages and their widget files

use curio::assets::ImageSize;
use curio::reconcile::PageState;
use curio::types::{CallerContext, RoleSet};
use curio::ApiError;
use std::fs;

use crate::integration::{content, gallery, png_bytes, text, TestProject};

const W1: &str = "w1-gallery";
const W2: &str = "w2-gallery";

#[test]
fn test_save_publish_reset_with_file() {
    let project = TestProject::new();
    let api = &project.api;
    let admin = CallerContext::admin();

    let page = api.create_page(RoleSet::new()).unwrap();
    assert_eq!(page.version, 0);
    assert!(page.wip_content.widgets.is_empty());

    api.save_content(&page.id, &admin, content(vec![gallery(W1, &[])]))
        .unwrap();
    let stored = api
        .save_widget_file(&page.id, W1, "a.png", &mut &b"png"[..])
        .unwrap();
    assert_eq!(stored, "a.png");

    let saved = api.find_page(&page.id).unwrap();
    assert_eq!(saved.version, 1);
    assert_eq!(saved.wip_content.widget_ids(), vec![W1]);
    assert_eq!(saved.wip_content.widgets[0].used_files(), vec!["a.png"]);
    assert!(project.wip_file(W1, "a.png").exists());
    assert!(!project.widget_file(W1, "a.png").exists());

    let published = api.publish_wip_content(&page.id).unwrap();
    assert_eq!(published.widget_ids(), vec![W1]);
    assert!(project.widget_file(W1, "a.png").exists());
    assert!(project.wip_file(W1, "a.png").exists());
    assert_eq!(api.page_state(&page.id).unwrap(), PageState::Published);

    let reset = api.reset_wip_content(&page.id).unwrap();
    let page = api.find_page(&page.id).unwrap();
    assert!(reset.same_content(&page.content));
    assert!(page.wip_content.same_content(&page.content));
    assert!(project.wip_file(W1, "a.png").exists());
}

#[test]
fn test_dropping_unpublished_widget_removes_its_directory() {
    let project = TestProject::new();
    let api = &project.api;
    let admin = CallerContext::admin();
    let page = api.create_page(RoleSet::new()).unwrap();

    api.save_content(&page.id, &admin, content(vec![gallery(W1, &[])]))
        .unwrap();
    api.save_widget_file(&page.id, W1, "a.png", &mut &b"png"[..])
        .unwrap();
    let widget_dir = api.assets().widget_dir(W1).unwrap();
    assert!(widget_dir.exists());

    api.save_content(&page.id, &admin, content(vec![])).unwrap();

    assert!(!widget_dir.exists());
    assert_eq!(api.find_page(&page.id).unwrap().version, 2);
}

#[test]
fn test_dropping_published_widget_cleans_only_draft_files() {
    let project = TestProject::new();
    let api = &project.api;
    let admin = CallerContext::admin();
    let page = api.create_page(RoleSet::new()).unwrap();

    api.save_content(&page.id, &admin, content(vec![gallery(W1, &[])]))
        .unwrap();
    api.save_widget_file(&page.id, W1, "a.png", &mut &b"png"[..])
        .unwrap();
    api.publish_wip_content(&page.id).unwrap();

    api.save_content(&page.id, &admin, content(vec![])).unwrap();

    let page = api.find_page(&page.id).unwrap();
    assert_eq!(page.content.widget_ids(), vec![W1]);
    assert!(page.wip_content.widgets.is_empty());
    assert!(project.widget_file(W1, "a.png").exists());
    assert!(!project.wip_file(W1, "a.png").exists());
    assert!(api.assets().wip_dir(W1).unwrap().is_dir());
    assert_eq!(api.page_state(&page.id).unwrap(), PageState::WorkInProgress);
}

#[test]
fn test_publish_removes_widgets_missing_from_draft() {
    let project = TestProject::new();
    let api = &project.api;
    let admin = CallerContext::admin();
    let page = api.create_page(RoleSet::new()).unwrap();

    api.save_content(&page.id, &admin, content(vec![gallery(W1, &[])]))
        .unwrap();
    api.save_widget_file(&page.id, W1, "a.png", &mut &b"png"[..])
        .unwrap();
    api.publish_wip_content(&page.id).unwrap();

    api.save_content(&page.id, &admin, content(vec![gallery(W2, &[])]))
        .unwrap();
    api.publish_wip_content(&page.id).unwrap();

    assert!(!api.assets().widget_dir(W1).unwrap().exists());
    assert_eq!(api.find_page(&page.id).unwrap().content.widget_ids(), vec![W2]);
}

#[test]
fn test_reset_restores_published_files() {
    let project = TestProject::new();
    let api = &project.api;
    let admin = CallerContext::admin();
    let page = api.create_page(RoleSet::new()).unwrap();

    api.save_content(&page.id, &admin, content(vec![gallery(W1, &[])]))
        .unwrap();
    api.save_widget_file(&page.id, W1, "a.png", &mut &b"png"[..])
        .unwrap();
    api.publish_wip_content(&page.id).unwrap();

    api.delete_widget_file(&page.id, W1, "a.png").unwrap();
    api.save_widget_file(&page.id, W1, "b.png", &mut &b"png"[..])
        .unwrap();
    assert!(!project.wip_file(W1, "a.png").exists());

    api.reset_wip_content(&page.id).unwrap();

    assert!(project.wip_file(W1, "a.png").exists());
    assert!(!project.wip_file(W1, "b.png").exists());
    let page = api.find_page(&page.id).unwrap();
    assert_eq!(page.wip_content.widgets[0].used_files(), vec!["a.png"]);
}

#[test]
fn test_replacing_a_file_purges_unreferenced_draft_files() {
    let project = TestProject::new();
    let api = &project.api;
    let page = api.create_page(RoleSet::new()).unwrap();
    api.save_content(
        &page.id,
        &CallerContext::admin(),
        content(vec![gallery(W1, &[])]),
    )
    .unwrap();

    api.save_widget_file(&page.id, W1, "a.png", &mut &b"png"[..])
        .unwrap();
    fs::write(project.wip_file(W1, "stray.png"), b"stray").unwrap();
    api.save_widget_file(&page.id, W1, "b.png", &mut &b"png"[..])
        .unwrap();

    assert!(project.wip_file(W1, "a.png").exists());
    assert!(project.wip_file(W1, "b.png").exists());
    assert!(!project.wip_file(W1, "stray.png").exists());
}

#[test]
fn test_load_wip_content_seeds_missing_draft_directory() {
    let project = TestProject::new();
    let api = &project.api;
    let admin = CallerContext::admin();
    let page = api.create_page(RoleSet::new()).unwrap();

    api.save_content(&page.id, &admin, content(vec![gallery(W1, &[])]))
        .unwrap();
    api.save_widget_file(&page.id, W1, "a.png", &mut &b"png"[..])
        .unwrap();
    api.publish_wip_content(&page.id).unwrap();
    fs::remove_dir_all(api.assets().wip_dir(W1).unwrap()).unwrap();

    let wip = api.load_wip_content(&page.id, &admin).unwrap();

    assert_eq!(wip.widget_ids(), vec![W1]);
    assert!(project.wip_file(W1, "a.png").exists());
}

#[test]
fn test_scaled_image_is_created_on_first_request() {
    let project = TestProject::new();
    let api = &project.api;
    let page = api.create_page(RoleSet::new()).unwrap();
    api.save_content(
        &page.id,
        &CallerContext::admin(),
        content(vec![gallery(W1, &[])]),
    )
    .unwrap();
    let original = png_bytes(1000, 20);
    api.save_widget_file(&page.id, W1, "wide.png", &mut original.as_slice())
        .unwrap();
    api.publish_wip_content(&page.id).unwrap();

    let unscaled = api.load_widget_file(W1, "wide.png", None, false).unwrap();
    assert_eq!(unscaled, original);

    let detail = api
        .load_widget_file(W1, "wide.png", Some(ImageSize::Detail), false)
        .unwrap();
    assert!(project.widget_file(W1, "DETAIL-wide.png").exists());
    let scaled = image::load_from_memory(&detail).unwrap();
    assert_eq!(scaled.width(), 800);

    let card = api
        .load_widget_file(W1, "wide.png", Some(ImageSize::ItemCard), true)
        .unwrap();
    assert_eq!(image::load_from_memory(&card).unwrap().width(), 400);
    assert!(project.wip_file(W1, "ITEM_CARD-wide.png").exists());

    let missing = api.load_widget_file(W1, "missing.png", None, false);
    assert!(matches!(missing, Err(ApiError::NotFound(_))));
}

#[test]
fn test_delete_page_removes_draft_and_published_widgets() {
    let project = TestProject::new();
    let api = &project.api;
    let admin = CallerContext::admin();
    let page = api.create_page(RoleSet::new()).unwrap();

    api.save_content(&page.id, &admin, content(vec![gallery(W1, &[])]))
        .unwrap();
    api.save_widget_file(&page.id, W1, "a.png", &mut &b"png"[..])
        .unwrap();
    api.publish_wip_content(&page.id).unwrap();
    api.save_content(
        &page.id,
        &admin,
        content(vec![gallery(W1, &["a.png"]), gallery(W2, &[])]),
    )
    .unwrap();
    api.save_widget_file(&page.id, W2, "b.png", &mut &b"png"[..])
        .unwrap();

    api.delete_page(&page.id).unwrap();

    assert!(!api.assets().widget_dir(W1).unwrap().exists());
    assert!(!api.assets().widget_dir(W2).unwrap().exists());
    assert!(matches!(api.find_page(&page.id), Err(ApiError::NotFound(_))));
}

#[test]
fn test_save_through_alias() {
    let project = TestProject::new();
    let api = &project.api;
    let page = api.create_page(RoleSet::new()).unwrap();
    api.update_page_alias(&page.id, Some("about-us")).unwrap();

    api.save_content(
        "about-us",
        &CallerContext::admin(),
        content(vec![text("intro-text", "Intro", &[])]),
    )
    .unwrap();

    let stored = api.find_page(&page.id).unwrap();
    assert_eq!(stored.alias.as_deref(), Some("about-us"));
    assert_eq!(stored.wip_content.widget_ids(), vec!["intro-text"]);
    assert_eq!(api.list_pages().unwrap().len(), 1);
}
