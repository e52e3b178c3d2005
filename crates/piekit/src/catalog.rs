use crate::icon::IconName;
use crate::item::{ItemConfig, ItemName, ItemTypeId};
use serde_json::json;
use std::str::FromStr;
use strum::{AsRefStr, Display as StrumDisplay, EnumIter, EnumString, IntoEnumIterator};
use thiserror::Error;

/// Actions run something when selected, menus hold children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, StrumDisplay)]
pub enum ItemClass {
    Action,
    Menu,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, EnumIter, StrumDisplay, AsRefStr,
)]
pub enum ItemKind {
    CustomMenu,
    RunningApps,
    Command,
    File,
    Uri,
    Shortcut,
    Text,
}

impl ItemKind {
    pub fn class(self) -> ItemClass {
        match self {
            Self::CustomMenu | Self::RunningApps => ItemClass::Menu,
            Self::Command | Self::File | Self::Uri | Self::Shortcut | Self::Text => {
                ItemClass::Action
            }
        }
    }

    /// Only custom menus keep user-configured children; other menus build theirs
    /// when opened.
    pub fn accepts_children(self) -> bool {
        matches!(self, Self::CustomMenu)
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::CustomMenu => "Custom Menu",
            Self::RunningApps => "Running Apps",
            Self::Command => "Launch Application",
            Self::File => "Open File",
            Self::Uri => "Open URI",
            Self::Shortcut => "Activate Shortcut",
            Self::Text => "Insert Text",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Self::CustomMenu => "view-more-symbolic",
            Self::RunningApps => "preferences-system-windows",
            Self::Command => "utilities-terminal",
            Self::File => "text-x-generic",
            Self::Uri => "web-browser",
            Self::Shortcut => "preferences-desktop-keyboard-shortcuts",
            Self::Text => "edit-paste",
        }
    }

    pub fn subtitle(self) -> &'static str {
        match self {
            Self::CustomMenu => "Contains other menus and actions.",
            Self::RunningApps => "Shows the currently running applications.",
            Self::Command => "Runs any shell command.",
            Self::File => "Opens a file with the default application.",
            Self::Uri => "Opens a URI with the default application.",
            Self::Shortcut => "Simulates a hotkey.",
            Self::Text => "Types the given text.",
        }
    }

    /// Payload used for newly created items of this kind.
    pub fn default_data(self) -> serde_json::Value {
        match self {
            Self::CustomMenu => serde_json::Value::Null,
            Self::RunningApps => json!({
                "active_workspace_only": false,
                "app_grouping": true,
                "hover_peeking": true,
                "name_regex": "",
            }),
            Self::Command => json!({ "command": "" }),
            Self::File => json!({ "file": "" }),
            Self::Uri => json!({ "uri": "" }),
            Self::Shortcut => json!({ "shortcut": "" }),
            Self::Text => json!({ "text": "" }),
        }
    }

    pub fn type_id(self) -> ItemTypeId {
        ItemTypeId::new(self.as_ref())
    }

    pub fn new_config(self) -> ItemConfig {
        let mut config = ItemConfig::new(
            self.type_id(),
            ItemName::new(self.label()),
            IconName::new(self.icon()),
        );
        config.data = self.default_data();
        config
    }
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Unknown item type '{0}'")]
    UnknownType(ItemTypeId),
}

pub fn lookup(kind: &ItemTypeId) -> Result<ItemKind, CatalogError> {
    ItemKind::from_str(kind.as_str()).map_err(|_| CatalogError::UnknownType(kind.clone()))
}

/// The narrow view the editor has on item kinds.
pub trait ItemCatalog {
    fn class_of(&self, kind: &ItemTypeId) -> ItemClass;

    fn is_container(&self, config: &ItemConfig) -> bool {
        self.is_container_type(&config.kind)
    }

    fn is_container_type(&self, kind: &ItemTypeId) -> bool;

    /// Menus may live at the top level, actions may not.
    fn is_menu_type(&self, kind: &ItemTypeId) -> bool {
        self.class_of(kind) == ItemClass::Menu
    }

    /// Builds an action for text or a URI dropped from outside the editor.
    fn item_for_data(&self, text: &str) -> ItemConfig {
        let text = text.trim();
        let kind = if text.starts_with("file://") {
            ItemKind::File
        } else if text.contains("://") {
            ItemKind::Uri
        } else {
            ItemKind::Text
        };

        let name = text
            .rsplit('/')
            .find(|part| !part.is_empty())
            .unwrap_or(text);

        let mut config = kind.new_config();
        config.name = ItemName::new(name);
        config.data = match kind {
            ItemKind::File => json!({ "file": text.trim_start_matches("file://") }),
            ItemKind::Uri => json!({ "uri": text }),
            _ => json!({ "text": text }),
        };
        config
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinCatalog;

impl BuiltinCatalog {
    pub fn kinds(&self) -> impl Iterator<Item = ItemKind> {
        ItemKind::iter()
    }
}

impl ItemCatalog for BuiltinCatalog {
    fn class_of(&self, kind: &ItemTypeId) -> ItemClass {
        // unknown kinds are treated as plain actions
        lookup(kind)
            .map(ItemKind::class)
            .unwrap_or(ItemClass::Action)
    }

    fn is_container_type(&self, kind: &ItemTypeId) -> bool {
        lookup(kind).is_ok_and(ItemKind::accepts_children)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_container_kinds() {
        let catalog = BuiltinCatalog;
        assert!(catalog.is_container(&ItemKind::CustomMenu.new_config()));
        assert!(!catalog.is_container(&ItemKind::RunningApps.new_config()));
        assert!(!catalog.is_container(&ItemKind::Command.new_config()));
        assert!(!catalog.is_container_type(&ItemTypeId::new("NoSuchThing")));

        assert!(catalog.is_menu_type(&ItemKind::RunningApps.type_id()));
        assert!(!catalog.is_menu_type(&ItemKind::Uri.type_id()));
    }

    #[test]
    fn test_lookup_unknown_type() {
        let err = lookup(&ItemTypeId::new("Teleport")).unwrap_err();
        assert_eq!(err.to_string(), "Unknown item type 'Teleport'");
    }

    #[test]
    fn test_type_id_roundtrips_through_lookup() {
        for kind in BuiltinCatalog.kinds() {
            assert_eq!(lookup(&kind.type_id()).unwrap(), kind);
        }
    }

    #[test]
    fn test_item_for_dropped_data() {
        let catalog = BuiltinCatalog;

        let file = catalog.item_for_data("file:///home/me/notes.txt\r");
        assert_eq!(file.kind, ItemKind::File.type_id());
        assert_eq!(file.name.as_str(), "notes.txt");
        assert_eq!(file.data["file"], "/home/me/notes.txt");

        let uri = catalog.item_for_data("https://example.org/");
        assert_eq!(uri.kind, ItemKind::Uri.type_id());
        assert_eq!(uri.name.as_str(), "example.org");

        let text = catalog.item_for_data("hello");
        assert_eq!(text.kind, ItemKind::Text.type_id());
        assert_eq!(text.data["text"], "hello");
    }
}
