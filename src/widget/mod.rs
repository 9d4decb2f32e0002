//! Widget model
//!
//! Widgets are typed content blocks placed on a page. The set of variants is
//! closed: every operation over widgets is an exhaustive `match`, so adding a
//! variant forces every behavior (used files, translation, ID generation) to
//! be decided for it at compile time.

pub mod translatable;

pub use translatable::TranslatableString;

use crate::types::{new_id, RoleSet, WidgetId};
use crate::visibility::{forbidden_for, Visible};
use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;

/// How a file reference on a widget changes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOperation {
    Add,
    Remove,
}

/// Attributes shared by all widget variants
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WidgetBase {
    pub id: WidgetId,
    pub restrictions: RoleSet,
    pub navigation_title: TranslatableString,
}

impl WidgetBase {
    pub fn with_id(id: impl Into<WidgetId>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AvatarWidget {
    #[serde(flatten)]
    pub base: WidgetBase,
    pub avatar_image: Option<String>,
    pub avatar_subtext: TranslatableString,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PageTitleWidget {
    #[serde(flatten)]
    pub base: WidgetBase,
    pub title: TranslatableString,
    pub background_image: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InfoBoxWidget {
    #[serde(flatten)]
    pub base: WidgetBase,
    pub heading: TranslatableString,
    pub content: TranslatableString,
    pub box_type: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TextWidget {
    #[serde(flatten)]
    pub base: WidgetBase,
    pub heading: TranslatableString,
    pub content: TranslatableString,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ImageTextWidget {
    #[serde(flatten)]
    pub base: WidgetBase,
    pub image: Option<String>,
    pub text: TranslatableString,
}

/// Image gallery with heading and text
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ImageGalleryWidget {
    #[serde(flatten)]
    pub base: WidgetBase,
    pub heading: TranslatableString,
    pub content: TranslatableString,
    pub images: Vec<String>,
    pub fullscreen_allowed: bool,
    /// TOP, LEFT or RIGHT
    pub text_position: Option<String>,
    pub icon_mode: bool,
    pub hide_border: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ItemSearchWidget {
    #[serde(flatten)]
    pub base: WidgetBase,
    pub heading: TranslatableString,
    pub content: TranslatableString,
    pub search_term: String,
    pub page_size: u32,
    pub max_results: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SpaceWidget {
    #[serde(flatten)]
    pub base: WidgetBase,
    pub size: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ButtonStyle {
    #[default]
    Filled,
    Outline,
    Flat,
}

/// A single button; buttons can be restricted independently of their widget
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ButtonConfig {
    pub restrictions: RoleSet,
    pub label: TranslatableString,
    pub target_url: Option<String>,
    pub icon: Option<String>,
    pub style: ButtonStyle,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ButtonsWidget {
    #[serde(flatten)]
    pub base: WidgetBase,
    pub buttons: Vec<ButtonConfig>,
}

/// A content block on a page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Widget {
    Avatar(AvatarWidget),
    PageTitle(PageTitleWidget),
    InfoBox(InfoBoxWidget),
    Text(TextWidget),
    ImageText(ImageTextWidget),
    ImageGallery(ImageGalleryWidget),
    ItemSearch(ItemSearchWidget),
    Space(SpaceWidget),
    Buttons(ButtonsWidget),
}

impl Widget {
    pub fn base(&self) -> &WidgetBase {
        match self {
            Widget::Avatar(w) => &w.base,
            Widget::PageTitle(w) => &w.base,
            Widget::InfoBox(w) => &w.base,
            Widget::Text(w) => &w.base,
            Widget::ImageText(w) => &w.base,
            Widget::ImageGallery(w) => &w.base,
            Widget::ItemSearch(w) => &w.base,
            Widget::Space(w) => &w.base,
            Widget::Buttons(w) => &w.base,
        }
    }

    pub fn base_mut(&mut self) -> &mut WidgetBase {
        match self {
            Widget::Avatar(w) => &mut w.base,
            Widget::PageTitle(w) => &mut w.base,
            Widget::InfoBox(w) => &mut w.base,
            Widget::Text(w) => &mut w.base,
            Widget::ImageText(w) => &mut w.base,
            Widget::ImageGallery(w) => &mut w.base,
            Widget::ItemSearch(w) => &mut w.base,
            Widget::Space(w) => &mut w.base,
            Widget::Buttons(w) => &mut w.base,
        }
    }

    pub fn id(&self) -> &str {
        &self.base().id
    }

    pub fn restrictions(&self) -> &RoleSet {
        &self.base().restrictions
    }

    /// Wire name of the variant
    pub fn widget_type(&self) -> &'static str {
        match self {
            Widget::Avatar(_) => "AVATAR",
            Widget::PageTitle(_) => "PAGE_TITLE",
            Widget::InfoBox(_) => "INFO_BOX",
            Widget::Text(_) => "TEXT",
            Widget::ImageText(_) => "IMAGE_TEXT",
            Widget::ImageGallery(_) => "IMAGE_GALLERY",
            Widget::ItemSearch(_) => "ITEM_SEARCH",
            Widget::Space(_) => "SPACE",
            Widget::Buttons(_) => "BUTTONS",
        }
    }

    /// Whether this variant can reference uploaded files at all
    pub fn attaches_files(&self) -> bool {
        match self {
            Widget::Avatar(_)
            | Widget::PageTitle(_)
            | Widget::ImageText(_)
            | Widget::ImageGallery(_) => true,
            Widget::InfoBox(_)
            | Widget::Text(_)
            | Widget::ItemSearch(_)
            | Widget::Space(_)
            | Widget::Buttons(_) => false,
        }
    }

    /// File names this widget currently references
    pub fn used_files(&self) -> Vec<String> {
        match self {
            Widget::Avatar(w) => single_file(&w.avatar_image),
            Widget::PageTitle(w) => single_file(&w.background_image),
            Widget::ImageText(w) => single_file(&w.image),
            Widget::ImageGallery(w) => w.images.clone(),
            Widget::InfoBox(_)
            | Widget::Text(_)
            | Widget::ItemSearch(_)
            | Widget::Space(_)
            | Widget::Buttons(_) => Vec::new(),
        }
    }

    /// Add or remove a file reference.
    ///
    /// Single-file variants replace their file on `Add`; galleries append
    /// names they do not hold yet.
    /// Returns whether the widget changed.
    pub fn process_file(&mut self, file_name: &str, operation: FileOperation) -> bool {
        match self {
            Widget::Avatar(w) => process_single_file(&mut w.avatar_image, file_name, operation),
            Widget::PageTitle(w) => {
                process_single_file(&mut w.background_image, file_name, operation)
            }
            Widget::ImageText(w) => process_single_file(&mut w.image, file_name, operation),
            Widget::ImageGallery(w) => match operation {
                FileOperation::Add => {
                    if w.images.iter().any(|image| image == file_name) {
                        return false;
                    }
                    w.images.push(file_name.to_string());
                    true
                }
                FileOperation::Remove => {
                    let before = w.images.len();
                    w.images.retain(|image| image != file_name);
                    before != w.images.len()
                }
            },
            Widget::InfoBox(_)
            | Widget::Text(_)
            | Widget::ItemSearch(_)
            | Widget::Space(_)
            | Widget::Buttons(_) => false,
        }
    }

    /// Every translatable text carried by the widget, including the navigation title
    pub fn translatables_mut(&mut self) -> Vec<&mut TranslatableString> {
        match self {
            Widget::Avatar(w) => vec![&mut w.base.navigation_title, &mut w.avatar_subtext],
            Widget::PageTitle(w) => vec![&mut w.base.navigation_title, &mut w.title],
            Widget::InfoBox(w) => {
                vec![&mut w.base.navigation_title, &mut w.heading, &mut w.content]
            }
            Widget::Text(w) => vec![&mut w.base.navigation_title, &mut w.heading, &mut w.content],
            Widget::ImageText(w) => vec![&mut w.base.navigation_title, &mut w.text],
            Widget::ImageGallery(w) => {
                vec![&mut w.base.navigation_title, &mut w.heading, &mut w.content]
            }
            Widget::ItemSearch(w) => {
                vec![&mut w.base.navigation_title, &mut w.heading, &mut w.content]
            }
            Widget::Space(w) => vec![&mut w.base.navigation_title],
            Widget::Buttons(w) => {
                let mut texts = vec![&mut w.base.navigation_title];
                texts.extend(w.buttons.iter_mut().map(|button| &mut button.label));
                texts
            }
        }
    }

    /// Give a fresh identifier to the widget and its texts where none is set yet.
    ///
    /// Existing identifiers are never changed.
    pub fn assign_missing_ids(&mut self) {
        if self.base().id.trim().is_empty() {
            self.base_mut().id = new_id();
        }
        for text in self.translatables_mut() {
            if text.id.trim().is_empty() {
                text.id = new_id();
            }
        }
    }
}

fn single_file(file: &Option<String>) -> Vec<String> {
    file.iter()
        .filter(|name| !name.trim().is_empty())
        .cloned()
        .collect()
}

fn process_single_file(slot: &mut Option<String>, file_name: &str, operation: FileOperation) -> bool {
    match operation {
        FileOperation::Add => {
            *slot = Some(file_name.to_string());
            true
        }
        FileOperation::Remove if slot.as_deref() == Some(file_name) => {
            *slot = None;
            true
        }
        FileOperation::Remove => false,
    }
}

impl Visible for Widget {
    fn is_forbidden(&self, roles: &RoleSet) -> bool {
        forbidden_for(self.restrictions(), roles)
    }

    fn accept_restriction(&mut self, roles: &RoleSet) {
        if let Widget::Buttons(w) = self {
            w.buttons.accept_restriction(roles);
        }
    }

    fn accept_translation(&mut self, locale: Option<&str>) {
        for text in self.translatables_mut() {
            text.accept_translation(locale);
        }
    }
}

impl Visible for ButtonConfig {
    fn is_forbidden(&self, roles: &RoleSet) -> bool {
        forbidden_for(&self.restrictions, roles)
    }

    fn accept_restriction(&mut self, roles: &RoleSet) {
        self.style.accept_restriction(roles);
    }

    fn accept_translation(&mut self, locale: Option<&str>) {
        self.label.accept_translation(locale);
    }
}

impl Visible for ButtonStyle {}

/// Deserialize a widget list, skipping `null` entries and widgets of unknown
/// type instead of failing the whole page.
pub fn deserialize_widgets<'de, D>(deserializer: D) -> Result<Vec<Widget>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<Vec<serde_json::Value>> = Option::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .filter(|value| !value.is_null())
        .filter_map(|value| {
            let widget_type = value
                .get("type")
                .and_then(|t| t.as_str())
                .unwrap_or("<missing>")
                .to_string();
            match serde_json::from_value::<Widget>(value) {
                Ok(widget) => Some(widget),
                Err(e) => {
                    warn!(widget_type, error = %e, "Ignoring widget that could not be read");
                    None
                }
            }
        })
        .collect())
}
