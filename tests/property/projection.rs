//! Properties of the restriction and translation walks

use curio::page::PageContent;
use curio::types::{RoleSet, ROLE_ADMIN, ROLE_USER};
use curio::visibility::{restrict, translate};
use curio::widget::{
    ButtonConfig, ButtonsWidget, TextWidget, TranslatableString, Widget, WidgetBase,
};
use proptest::prelude::*;

fn role_set() -> impl Strategy<Value = RoleSet> {
    prop::collection::btree_set(
        prop::sample::select(vec![
            ROLE_ADMIN.to_string(),
            ROLE_USER.to_string(),
            "ROLE_EDITOR".to_string(),
        ]),
        0..3,
    )
}

fn translatable() -> impl Strategy<Value = TranslatableString> {
    (
        "[A-Za-z ]{0,12}",
        prop::collection::btree_map("(de|en|fr|de_CH|en_GB)", "[A-Za-z]{1,8}", 0..4),
    )
        .prop_map(|(value, translations)| TranslatableString {
            value,
            translations,
            ..Default::default()
        })
}

fn widget() -> impl Strategy<Value = Widget> {
    prop_oneof![
        ("[a-z]{6,10}", role_set(), translatable()).prop_map(|(id, restrictions, heading)| {
            Widget::Text(TextWidget {
                base: WidgetBase {
                    id,
                    restrictions,
                    ..Default::default()
                },
                heading,
                ..Default::default()
            })
        }),
        (
            "[a-z]{6,10}",
            role_set(),
            prop::collection::vec((role_set(), translatable()), 0..4),
        )
            .prop_map(|(id, restrictions, buttons)| {
                Widget::Buttons(ButtonsWidget {
                    base: WidgetBase {
                        id,
                        restrictions,
                        ..Default::default()
                    },
                    buttons: buttons
                        .into_iter()
                        .map(|(restrictions, label)| ButtonConfig {
                            restrictions,
                            label,
                            ..Default::default()
                        })
                        .collect(),
                })
            }),
    ]
}

fn page_content() -> impl Strategy<Value = PageContent> {
    (role_set(), prop::collection::vec(widget(), 0..6)).prop_map(|(restrictions, widgets)| {
        PageContent {
            id: "page-123456".to_string(),
            restrictions,
            widgets,
            ..Default::default()
        }
    })
}

proptest! {
    #[test]
    fn restrict_is_idempotent(content in page_content(), roles in role_set()) {
        let once = restrict(content, &roles);
        let twice = once.clone().and_then(|content| restrict(content, &roles));
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn restrict_keeps_only_visible_widgets(content in page_content(), roles in role_set()) {
        if let Some(restricted) = restrict(content, &roles) {
            for widget in &restricted.widgets {
                let restrictions = widget.restrictions();
                prop_assert!(restrictions.is_empty() || !restrictions.is_disjoint(&roles));
            }
        }
    }

    #[test]
    fn translate_falls_back_to_value(
        mut text in translatable(),
        locale in prop::option::of("(de|de_DE|en-US|fr|ja)"),
    ) {
        let expected = text.resolve(locale.as_deref()).to_string();
        text.translate(locale.as_deref());
        let resolved = text.translated_value.clone().unwrap_or_default();
        prop_assert_eq!(&resolved, &expected);
        prop_assert!(resolved == text.value || text.translations.values().any(|v| *v == resolved));
    }

    #[test]
    fn translate_never_drops_nodes(mut content in page_content(), locale in "(de|en_GB|ja)") {
        let before = content.widget_ids();
        translate(&mut content, Some(&locale));
        prop_assert_eq!(content.widget_ids(), before);
    }
}

/// A locale without any matching key resolves to the default value
#[test]
fn test_unknown_locale_resolves_default() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(&translatable(), |mut text| {
            text.translations.remove("ja");
            text.translate(Some("ja_JP"));
            assert_eq!(text.translated_value.as_deref(), Some(text.value.as_str()));
            Ok(())
        })
        .unwrap();
}
