use anyhow::{Context, Result};

use super::schema::Database;

impl Database {
    // ========================================================================
    // Popular Selection
    // ========================================================================

    /// Load the popular glyph list stored under `key`.
    ///
    /// Never fails: a missing key, a value that is not a JSON array of
    /// strings, or a read error all yield an empty list.
    pub async fn load_popular(&self, key: &str) -> Vec<String> {
        let raw = match self.get_value(key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Failed to read popular selection");
                return Vec::new();
            }
        };

        match serde_json::from_str::<Vec<String>>(&raw) {
            Ok(glyphs) => glyphs,
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Malformed popular selection, starting empty");
                Vec::new()
            }
        }
    }

    /// Store `glyphs` under `key` as a JSON array.
    pub async fn save_popular(&self, key: &str, glyphs: &[String]) -> Result<()> {
        let json = serde_json::to_string(glyphs).context("Failed to encode popular selection")?;
        self.set_value(key, &json)
            .await
            .context("Failed to save popular selection")
    }
}
