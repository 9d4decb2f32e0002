//! Publish followed by reset leaves the draft equal to the published content

use curio::config::CurioConfig;
use curio::page::PageContent;
use curio::types::{CallerContext, RoleSet};
use curio::widget::{ImageGalleryWidget, TextWidget, Widget, WidgetBase};
use curio::PageApi;
use proptest::prelude::*;
use tempfile::TempDir;

/// (widget id suffix, is gallery, uploaded file names)
type WidgetSpec = (u8, bool, Vec<String>);

fn widget_specs() -> impl Strategy<Value = Vec<WidgetSpec>> {
    prop::collection::vec(
        (0u8..6, any::<bool>(), prop::collection::vec("[a-c]\\.png", 0..3)),
        0..5,
    )
}

fn build(specs: &[WidgetSpec]) -> PageContent {
    let mut widgets: Vec<Widget> = Vec::new();
    for (suffix, is_gallery, _) in specs {
        let id = format!("widget-{}", suffix);
        if widgets.iter().any(|w| w.id() == id) {
            continue;
        }
        let widget = if *is_gallery {
            Widget::ImageGallery(ImageGalleryWidget {
                base: WidgetBase::with_id(id),
                ..Default::default()
            })
        } else {
            Widget::Text(TextWidget {
                base: WidgetBase::with_id(id),
                ..Default::default()
            })
        };
        widgets.push(widget);
    }
    PageContent {
        widgets,
        ..Default::default()
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn reset_after_publish_restores_published(first in widget_specs(), second in widget_specs()) {
        let temp_dir = TempDir::new().unwrap();
        let config = CurioConfig {
            project_root: Some(temp_dir.path().to_path_buf()),
            ..Default::default()
        };
        let api = PageApi::open(&config).unwrap();
        let admin = CallerContext::admin();
        let page = api.create_page(RoleSet::new()).unwrap();

        for specs in [&first, &second] {
            api.save_content(&page.id, &admin, build(specs)).unwrap();
            for (suffix, _, files) in specs.iter() {
                let widget_id = format!("widget-{}", suffix);
                for file_name in files {
                    let result =
                        api.save_widget_file(&page.id, &widget_id, file_name, &mut &b"x"[..]);
                    prop_assert!(result.is_ok());
                }
            }
            api.publish_wip_content(&page.id).unwrap();
        }

        api.reset_wip_content(&page.id).unwrap();

        let stored = api.find_page(&page.id).unwrap();
        prop_assert!(stored.wip_content.same_content(&stored.content));
        for widget in &stored.content.widgets {
            for file_name in widget.used_files() {
                let wip_file = api.assets().wip_dir(widget.id()).unwrap().join(&file_name);
                let published_file = api.assets().widget_dir(widget.id()).unwrap().join(&file_name);
                prop_assert!(wip_file.exists());
                prop_assert!(published_file.exists());
            }
        }
    }
}
