//! The curated "popular emojis" list.
//!
//! An ordered list of glyphs edited in memory by toggle/remove/clear and
//! persisted only on an explicit save (or the best-effort save at exit).

use thiserror::Error;

use crate::storage::Database;

/// Outcome of [`PopularSelection::toggle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionState {
    Added,
    Removed,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectionError {
    #[error("Index {index} out of range for selection of length {len}")]
    IndexOutOfRange { index: usize, len: usize },
}

/// Ordered, duplicate-free (under toggle) list of popular glyphs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PopularSelection {
    glyphs: Vec<String>,
    /// Changed since the last load or save.
    dirty: bool,
}

impl PopularSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_glyphs(glyphs: Vec<String>) -> Self {
        Self {
            glyphs,
            dirty: false,
        }
    }

    /// Load the selection stored under `key`. Never fails; see
    /// [`Database::load_popular`].
    pub async fn load(db: &Database, key: &str) -> Self {
        Self::from_glyphs(db.load_popular(key).await)
    }

    /// Persist the selection under `key` and clear the dirty flag.
    pub async fn save(&mut self, db: &Database, key: &str) -> anyhow::Result<()> {
        db.save_popular(key, &self.glyphs).await?;
        self.dirty = false;
        Ok(())
    }

    /// Remove the first occurrence of `glyph`, or append it if absent.
    pub fn toggle(&mut self, glyph: &str) -> SelectionState {
        self.dirty = true;
        match self.glyphs.iter().position(|g| g == glyph) {
            Some(index) => {
                self.glyphs.remove(index);
                SelectionState::Removed
            }
            None => {
                self.glyphs.push(glyph.to_string());
                SelectionState::Added
            }
        }
    }

    /// Remove the glyph at `index`, returning it.
    pub fn remove(&mut self, index: usize) -> Result<String, SelectionError> {
        if index >= self.glyphs.len() {
            tracing::warn!(index, len = self.glyphs.len(), "Popular remove out of range");
            return Err(SelectionError::IndexOutOfRange {
                index,
                len: self.glyphs.len(),
            });
        }
        self.dirty = true;
        Ok(self.glyphs.remove(index))
    }

    /// Empty the selection, returning how many glyphs were removed.
    ///
    /// Confirmation is the caller's job.
    pub fn clear(&mut self) -> usize {
        let removed = self.glyphs.len();
        if removed > 0 {
            self.glyphs.clear();
            self.dirty = true;
        }
        removed
    }

    pub fn is_selected(&self, glyph: &str) -> bool {
        self.glyphs.iter().any(|g| g == glyph)
    }

    pub fn glyphs(&self) -> &[String] {
        &self.glyphs
    }

    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }
}
