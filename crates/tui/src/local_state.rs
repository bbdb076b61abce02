use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::{error::Result, wishlist::same_place};

const MAX_RECENT_SEARCHES: usize = 8;

/// Client-side preferences that survive restarts.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct LocalState {
    pub last_wishlist: Option<String>,
    pub recent_searches: Vec<String>,
}

impl LocalState {
    pub fn load(path: &str) -> Result<Self> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Self::default());
            }
            Err(err) => return Err(err.into()),
        };
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save(&self, path: &str) -> Result<()> {
        let parent = Path::new(path).parent();
        if let Some(parent) = parent {
            fs::create_dir_all(parent)?;
        }
        let payload = serde_json::to_string_pretty(self)?;
        fs::write(path, payload)?;
        Ok(())
    }

    /// Most recent first, without duplicates.
    pub fn remember_search(&mut self, input: &str) {
        let input = input.trim();
        if input.is_empty() {
            return;
        }
        self.recent_searches.retain(|existing| existing != input);
        self.recent_searches.insert(0, input.to_string());
        self.recent_searches.truncate(MAX_RECENT_SEARCHES);
    }

    pub fn remember_wishlist(&mut self, name: &str) {
        self.last_wishlist = Some(name.to_string());
    }

    pub fn forget_wishlist(&mut self, name: &str) {
        if self
            .last_wishlist
            .as_deref()
            .is_some_and(|last| same_place(last, name))
        {
            self.last_wishlist = None;
        }
    }

    /// Index of the remembered wishlist inside `names`, if still present.
    pub fn preferred_index(&self, names: &[String]) -> Option<usize> {
        let last = self.last_wishlist.as_deref()?;
        names.iter().position(|name| name == last)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recent_searches_are_deduplicated_and_bounded() {
        let mut state = LocalState::default();
        for i in 0..10 {
            state.remember_search(&format!("photos/{i}.jpg"));
        }
        state.remember_search(" photos/5.jpg ");
        assert_eq!(state.recent_searches.len(), MAX_RECENT_SEARCHES);
        assert_eq!(state.recent_searches[0], "photos/5.jpg");
        assert_eq!(
            state
                .recent_searches
                .iter()
                .filter(|s| s.as_str() == "photos/5.jpg")
                .count(),
            1
        );
    }

    #[test]
    fn preferred_index_tracks_remembered_wishlist() {
        let mut state = LocalState::default();
        let names = vec!["Asia".to_string(), "Europe Trip".to_string()];
        assert_eq!(state.preferred_index(&names), None);
        state.remember_wishlist("Europe Trip");
        assert_eq!(state.preferred_index(&names), Some(1));
        state.forget_wishlist("europe trip");
        assert_eq!(state.last_wishlist, None);
    }

    #[test]
    fn missing_file_loads_defaults() {
        let state = LocalState::load("definitely/not/here/state.json").unwrap();
        assert_eq!(state, LocalState::default());
    }

    #[test]
    fn save_then_load_keeps_preferences() {
        let dir = std::env::temp_dir().join(format!("triply_tui_state_{}", std::process::id()));
        let path = dir.join("state.json");
        let path = path.to_string_lossy().into_owned();

        let mut state = LocalState::default();
        state.remember_wishlist("Europe Trip");
        state.remember_search("https://example.com/tower.jpg");
        state.save(&path).unwrap();

        assert_eq!(LocalState::load(&path).unwrap(), state);
        let _ = fs::remove_dir_all(dir);
    }
}
