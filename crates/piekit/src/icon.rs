use derive_more::{AsRef, Deref, Display, From, Into};
use freedesktop_icons::lookup;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

#[derive(
    Debug,
    Clone,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    Deref,
    From,
    Into,
    AsRef,
)]
#[serde(transparent)]
pub struct IconName(String);

crate::impl_string_newtype!(IconName);

const ICON_LOOKUP_SIZE: u16 = 256;

static RESOLVED: OnceLock<RwLock<HashMap<IconName, Option<PathBuf>>>> = OnceLock::new();

/// Resolves an icon name to a file. Absolute paths are used as they are, everything
/// else goes through the icon theme and then the user's `icons` data directory.
pub fn find_icon_path(icon_name: &IconName) -> Option<PathBuf> {
    if icon_name.is_empty() {
        return None;
    }

    let cache = RESOLVED.get_or_init(|| RwLock::new(HashMap::new()));
    if let Some(hit) = cache.read().get(icon_name) {
        return hit.clone();
    }

    let resolved = resolve(icon_name);
    if resolved.is_none() {
        log::debug!("No icon found for '{}'", icon_name);
    }
    cache.write().insert(icon_name.clone(), resolved.clone());
    resolved
}

fn resolve(icon_name: &IconName) -> Option<PathBuf> {
    let path = Path::new(icon_name.as_str());
    if path.is_absolute() {
        return path.exists().then(|| path.to_path_buf());
    }

    lookup(icon_name.as_str())
        .with_size(ICON_LOOKUP_SIZE)
        .with_scale(1)
        .find()
        .or_else(|| user_icon(icon_name))
}

fn user_icon(icon_name: &IconName) -> Option<PathBuf> {
    let icons = xdg::BaseDirectories::new().get_data_home()?.join("icons");
    ["png", "svg"]
        .iter()
        .map(|ext| icons.join(format!("{}.{}", icon_name, ext)))
        .find(|candidate| candidate.exists())
}

pub fn clear_cache() {
    if let Some(cache) = RESOLVED.get() {
        cache.write().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_name_has_no_icon() {
        assert!(find_icon_path(&IconName::default()).is_none());
    }

    #[test]
    fn test_missing_absolute_path_is_not_resolved() {
        let name = IconName::new("/definitely/not/here/icon.png");
        assert!(find_icon_path(&name).is_none());
    }
}
