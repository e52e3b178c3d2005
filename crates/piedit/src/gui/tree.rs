use crate::editor::EditorEvent;
use piekit::item::PayloadError;
use piekit::{ItemCatalog, ItemConfig};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TreeError {
    #[error(transparent)]
    Payload(#[from] PayloadError),
    #[error("No item at index {index}, the level holds {len}")]
    OutOfRange { index: usize, len: usize },
    #[error("Item {0} cannot hold other items")]
    NotAContainer(usize),
}

/// How the shown level changed.
#[derive(Debug, Clone, PartialEq)]
pub enum TreeChange {
    Unchanged,
    Inserted { index: usize, config: ItemConfig },
    Removed(usize),
    /// Children were added to the container at this index.
    Nested(usize),
    Entered(usize),
}

/// The menus being edited plus the path to the level currently on screen.
#[derive(Debug, Clone, Default)]
pub struct MenuTree {
    menus: Vec<ItemConfig>,
    path: Vec<usize>,
}

impl MenuTree {
    pub fn new(menus: Vec<ItemConfig>) -> Self {
        Self {
            menus,
            path: Vec::new(),
        }
    }

    pub fn menus(&self) -> &[ItemConfig] {
        &self.menus
    }

    pub fn is_root(&self) -> bool {
        self.path.is_empty()
    }

    pub fn level(&self) -> &[ItemConfig] {
        let mut level = &self.menus;
        for &i in &self.path {
            level = &level[i].children;
        }
        level
    }

    fn level_mut(&mut self) -> &mut Vec<ItemConfig> {
        let mut level = &mut self.menus;
        for &i in &self.path {
            level = &mut level[i].children;
        }
        level
    }

    /// The menu whose children are shown, `None` at the top level.
    pub fn parent(&self) -> Option<&ItemConfig> {
        let (&last, ancestors) = self.path.split_last()?;
        let mut level = &self.menus;
        for &i in ancestors {
            level = &level[i].children;
        }
        level.get(last)
    }

    pub fn title(&self) -> String {
        let mut names = vec!["Menus"];
        let mut level = &self.menus;
        for &i in &self.path {
            names.push(level[i].name.as_str());
            level = &level[i].children;
        }
        names.join(" / ")
    }

    fn check(&self, index: usize, len: usize) -> Result<(), TreeError> {
        if index < len {
            Ok(())
        } else {
            Err(TreeError::OutOfRange { index, len })
        }
    }

    pub fn enter(&mut self, index: usize, catalog: &dyn ItemCatalog) -> Result<(), TreeError> {
        let level = self.level();
        self.check(index, level.len())?;
        if !catalog.is_container(&level[index]) {
            return Err(TreeError::NotAContainer(index));
        }
        self.path.push(index);
        Ok(())
    }

    /// Leaves the current submenu, returning its index in the level above.
    pub fn back(&mut self) -> Option<usize> {
        self.path.pop()
    }

    pub fn insert(&mut self, index: usize, config: ItemConfig) -> Result<(), TreeError> {
        let level = self.level_mut();
        if index > level.len() {
            return Err(TreeError::OutOfRange {
                index,
                len: level.len(),
            });
        }
        level.insert(index, config);
        Ok(())
    }

    pub fn remove(&mut self, index: usize) -> Result<ItemConfig, TreeError> {
        let len = self.level().len();
        self.check(index, len)?;
        Ok(self.level_mut().remove(index))
    }

    /// Appends `config` to the children of the container at `target`.
    pub fn nest(
        &mut self,
        target: usize,
        config: ItemConfig,
        catalog: &dyn ItemCatalog,
    ) -> Result<(), TreeError> {
        let len = self.level().len();
        self.check(target, len)?;
        let container = &mut self.level_mut()[target];
        if !catalog.is_container(container) {
            return Err(TreeError::NotAContainer(target));
        }
        container.children.push(config);
        Ok(())
    }

    /// Carries out what the editor surface asked for.
    pub fn apply(
        &mut self,
        event: &EditorEvent,
        catalog: &dyn ItemCatalog,
    ) -> Result<TreeChange, TreeError> {
        match event {
            EditorEvent::Edit(index) => {
                self.enter(*index, catalog)?;
                Ok(TreeChange::Entered(*index))
            }
            EditorEvent::Remove(index) => {
                self.remove(*index)?;
                Ok(TreeChange::Removed(*index))
            }
            EditorEvent::DropItem { payload, index } => {
                let config = ItemConfig::from_payload(payload)?;
                self.insert(*index, config.clone())?;
                Ok(TreeChange::Inserted {
                    index: *index,
                    config,
                })
            }
            EditorEvent::DropData { text, index } => {
                let config = catalog.item_for_data(text);
                self.insert(*index, config.clone())?;
                Ok(TreeChange::Inserted {
                    index: *index,
                    config,
                })
            }
            EditorEvent::DropItemInto { payload, target } => {
                let config = ItemConfig::from_payload(payload)?;
                self.nest(*target, config, catalog)?;
                Ok(TreeChange::Nested(*target))
            }
            EditorEvent::DropDataInto { text, target } => {
                self.nest(*target, catalog.item_for_data(text), catalog)?;
                Ok(TreeChange::Nested(*target))
            }
            EditorEvent::Select(_) | EditorEvent::RequestAdd(_) | EditorEvent::Notification(_) => {
                Ok(TreeChange::Unchanged)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use piekit::item::ItemName;
    use piekit::{BuiltinCatalog, ItemKind};

    fn named(kind: ItemKind, name: &str) -> ItemConfig {
        let mut config = kind.new_config();
        config.name = ItemName::new(name);
        config
    }

    fn tree() -> MenuTree {
        let inner = named(ItemKind::CustomMenu, "inner")
            .with_children(vec![named(ItemKind::Text, "deep")]);
        MenuTree::new(vec![
            named(ItemKind::CustomMenu, "first").with_children(vec![
                named(ItemKind::Command, "term"),
                inner,
            ]),
            named(ItemKind::RunningApps, "apps"),
        ])
    }

    fn names(configs: &[ItemConfig]) -> Vec<&str> {
        configs.iter().map(|c| c.name.as_str()).collect()
    }

    #[test]
    fn test_navigation() {
        let mut tree = tree();
        assert!(tree.is_root());
        assert!(tree.parent().is_none());

        tree.enter(0, &BuiltinCatalog).unwrap();
        tree.enter(1, &BuiltinCatalog).unwrap();
        assert_eq!(names(tree.level()), vec!["deep"]);
        assert_eq!(tree.parent().map(|p| p.name.as_str()), Some("inner"));
        assert_eq!(tree.title(), "Menus / first / inner");

        assert_eq!(tree.back(), Some(1));
        assert_eq!(tree.back(), Some(0));
        assert_eq!(tree.back(), None);
        assert_eq!(tree.title(), "Menus");
    }

    #[test]
    fn test_enter_rejects_non_containers() {
        let mut tree = tree();
        assert!(matches!(
            tree.enter(1, &BuiltinCatalog),
            Err(TreeError::NotAContainer(1))
        ));
        assert!(matches!(
            tree.enter(9, &BuiltinCatalog),
            Err(TreeError::OutOfRange { index: 9, len: 2 })
        ));
        assert!(tree.is_root());
    }

    #[test]
    fn test_move_within_level() {
        let mut tree = tree();
        let payload = tree.menus()[0].to_payload().unwrap();

        let change = tree
            .apply(&EditorEvent::DropItem { payload, index: 2 }, &BuiltinCatalog)
            .unwrap();
        assert!(matches!(change, TreeChange::Inserted { index: 2, .. }));
        tree.apply(&EditorEvent::Remove(0), &BuiltinCatalog).unwrap();

        assert_eq!(names(tree.menus()), vec!["apps", "first"]);
        assert_eq!(tree.menus()[1].children.len(), 2);
    }

    #[test]
    fn test_dropped_data_becomes_actions() {
        let mut tree = tree();
        tree.enter(0, &BuiltinCatalog).unwrap();

        let event = EditorEvent::DropData {
            text: "https://example.org/docs".into(),
            index: 0,
        };
        let change = tree.apply(&event, &BuiltinCatalog).unwrap();
        let TreeChange::Inserted { config, .. } = change else {
            panic!("unexpected {:?}", change);
        };
        assert_eq!(config.kind, ItemKind::Uri.type_id());
        assert_eq!(names(tree.level()), vec!["docs", "term", "inner"]);

        let event = EditorEvent::DropDataInto {
            text: "file:///tmp/a.txt".into(),
            target: 2,
        };
        assert_eq!(
            tree.apply(&event, &BuiltinCatalog).unwrap(),
            TreeChange::Nested(2)
        );
        assert_eq!(names(&tree.level()[2].children), vec!["deep", "a.txt"]);
    }

    #[test]
    fn test_nest_requires_container() {
        let mut tree = tree();
        let payload = named(ItemKind::Text, "x").to_payload().unwrap();

        let result = tree.apply(
            &EditorEvent::DropItemInto {
                payload: payload.clone(),
                target: 1,
            },
            &BuiltinCatalog,
        );
        assert!(matches!(result, Err(TreeError::NotAContainer(1))));

        tree.apply(&EditorEvent::DropItemInto { payload, target: 0 }, &BuiltinCatalog)
            .unwrap();
        assert_eq!(names(&tree.menus()[0].children), vec!["term", "inner", "x"]);
    }

    #[test]
    fn test_bad_payload_and_indices() {
        let mut tree = tree();
        let result = tree.apply(
            &EditorEvent::DropItem {
                payload: "not json".into(),
                index: 0,
            },
            &BuiltinCatalog,
        );
        assert!(matches!(result, Err(TreeError::Payload(_))));

        assert!(tree.insert(3, named(ItemKind::Text, "x")).is_err());
        assert!(tree.remove(2).is_err());
        assert_eq!(tree.menus().len(), 2);
    }

    #[test]
    fn test_passive_events_change_nothing() {
        let mut tree = tree();
        let event = EditorEvent::Select(crate::editor::ItemSlot::Center);
        assert_eq!(
            tree.apply(&event, &BuiltinCatalog).unwrap(),
            TreeChange::Unchanged
        );
    }
}
