//! Caller-specific projection of rendered pages

use curio::page::{Menu, PageContent};
use curio::types::{roles, CallerContext, RoleSet, ROLE_ADMIN, ROLE_USER};
use curio::widget::{ButtonConfig, ButtonsWidget, TranslatableString, Widget, WidgetBase};
use curio::ApiError;

use crate::integration::{content, text, TestProject};

fn buttons(id: &str) -> Widget {
    Widget::Buttons(ButtonsWidget {
        base: WidgetBase::with_id(id),
        buttons: vec![
            ButtonConfig {
                label: TranslatableString::new("Contact").with_translation("de", "Kontakt"),
                ..Default::default()
            },
            ButtonConfig {
                restrictions: roles([ROLE_ADMIN]),
                label: TranslatableString::new("Edit"),
                ..Default::default()
            },
        ],
    })
}

fn publish(project: &TestProject, widgets: Vec<Widget>) -> String {
    let api = &project.api;
    let page = api.create_page(RoleSet::new()).unwrap();
    api.save_content(&page.id, &CallerContext::admin(), content(widgets))
        .unwrap();
    api.publish_wip_content(&page.id).unwrap();
    page.id
}

fn labels(content: &PageContent) -> Vec<String> {
    content
        .widgets
        .iter()
        .filter_map(|widget| match widget {
            Widget::Buttons(w) => Some(w.buttons.iter().map(|b| {
                b.label.translated_value.clone().unwrap_or_default()
            })),
            _ => None,
        })
        .flatten()
        .collect()
}

#[test]
fn test_nested_restrictions_inside_widgets() {
    let project = TestProject::new();
    let page_id = publish(&project, vec![buttons("button-row")]);

    let visitor = project
        .api
        .load_content(&page_id, &CallerContext::anonymous().in_locale("de_DE"))
        .unwrap();
    assert_eq!(labels(&visitor), vec!["Kontakt"]);

    let admin = project
        .api
        .load_content(&page_id, &CallerContext::admin())
        .unwrap();
    assert_eq!(labels(&admin), vec!["Contact", "Edit"]);
}

#[test]
fn test_missing_translation_falls_back_to_value() {
    let project = TestProject::new();
    let page_id = publish(&project, vec![text("intro-text", "Welcome", &[])]);

    let content = project
        .api
        .load_content(&page_id, &CallerContext::anonymous().in_locale("ja"))
        .unwrap();
    match &content.widgets[0] {
        Widget::Text(w) => assert_eq!(w.heading.translated_value.as_deref(), Some("Welcome")),
        other => panic!("Unexpected widget {:?}", other),
    }
}

#[test]
fn test_projection_does_not_touch_stored_content() {
    let project = TestProject::new();
    let page_id = publish(
        &project,
        vec![
            text("public-text", "Public", &[]),
            text("member-text", "Members", &[ROLE_USER]),
        ],
    );

    let visitor = project
        .api
        .load_content(&page_id, &CallerContext::anonymous())
        .unwrap();
    assert_eq!(visitor.widget_ids(), vec!["public-text"]);

    let stored = project.api.find_page(&page_id).unwrap();
    assert_eq!(stored.content.widget_ids(), vec!["public-text", "member-text"]);
    match &stored.content.widgets[0] {
        Widget::Text(w) => assert!(w.heading.translated_value.is_none()),
        other => panic!("Unexpected widget {:?}", other),
    }
}

#[test]
fn test_menu_entry_inherits_parent_restrictions() {
    let project = TestProject::new();
    let page_id = publish(&project, vec![text("intro-text", "Intro", &[])]);
    project
        .api
        .save_menus(&[Menu {
            id: "main-menu".to_string(),
            target_page_id: None,
            restrictions: roles([ROLE_USER]),
            menu_entries: vec![Menu {
                id: "entry".to_string(),
                target_page_id: Some(page_id.clone()),
                restrictions: RoleSet::new(),
                menu_entries: Vec::new(),
            }],
        }])
        .unwrap();

    let result = project
        .api
        .load_content(&page_id, &CallerContext::anonymous());
    assert!(matches!(result, Err(ApiError::PermissionDenied(_))));

    let member = project
        .api
        .load_wip_content(&page_id, &CallerContext::with_roles([ROLE_USER]))
        .unwrap();
    assert_eq!(member.restrictions, roles([ROLE_USER]));
    assert!(member.editable);
}
