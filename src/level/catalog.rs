//! Ordered level lists, loaded from and saved to JSON.

use crate::level::LevelData;
use crate::{CascadeError, CascadeResult};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// An ordered list of levels with a cursor on the current one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCatalog")]
pub struct LevelCatalog {
    levels: Vec<LevelData>,
    current_index: usize,
}

/// Unchecked catalog as it appears on disk.
#[derive(Deserialize)]
struct RawCatalog {
    levels: Vec<LevelData>,
    #[serde(default)]
    current_index: usize,
}

impl TryFrom<RawCatalog> for LevelCatalog {
    type Error = CascadeError;

    fn try_from(raw: RawCatalog) -> CascadeResult<Self> {
        for level in &raw.levels {
            level.validate()?;
        }
        let mut catalog = Self::new(raw.levels);
        if raw.current_index >= catalog.len() {
            return Err(CascadeError::InvalidConfig(format!(
                "catalog cursor {} is past the last of {} levels",
                raw.current_index,
                catalog.len()
            )));
        }
        catalog.current_index = raw.current_index;
        Ok(catalog)
    }
}

impl LevelCatalog {
    /// Creates a catalog. An empty list gets the test level.
    ///
    /// # Examples
    ///
    /// ```
    /// use cascade::LevelCatalog;
    ///
    /// let catalog = LevelCatalog::new(Vec::new());
    /// assert_eq!(catalog.len(), 1);
    /// assert_eq!(catalog.current().name, "Test Level");
    /// ```
    pub fn new(mut levels: Vec<LevelData>) -> Self {
        if levels.is_empty() {
            info!("no levels configured, using the test level");
            levels.push(LevelData::test_level());
        }
        Self {
            levels,
            current_index: 0,
        }
    }

    /// Parses a JSON array of levels and validates each one.
    pub fn from_json(json: &str) -> CascadeResult<Self> {
        let levels: Vec<LevelData> = serde_json::from_str(json)?;
        for level in &levels {
            level.validate()?;
        }
        Ok(Self::new(levels))
    }

    pub fn to_json(&self) -> CascadeResult<String> {
        Ok(serde_json::to_string_pretty(&self.levels)?)
    }

    /// Reads a JSON level file.
    pub fn load_file<P: AsRef<Path>>(path: P) -> CascadeResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let catalog = Self::from_json(&json)?;
        info!("loaded {} levels from {}", catalog.len(), path.display());
        Ok(catalog)
    }

    /// Writes the levels as a JSON file.
    pub fn save_file<P: AsRef<Path>>(&self, path: P) -> CascadeResult<()> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn levels(&self) -> &[LevelData] {
        &self.levels
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    /// The level under the cursor.
    pub fn current(&self) -> &LevelData {
        &self.levels[self.current_index]
    }

    /// Moves the cursor to `index` and returns that level.
    pub fn load(&mut self, index: usize) -> CascadeResult<&LevelData> {
        if index >= self.levels.len() {
            return Err(CascadeError::LevelNotFound(index as u32));
        }
        self.current_index = index;
        Ok(&self.levels[index])
    }

    /// Advances to the next level, or None after the last one.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Option<&LevelData> {
        let next = self.current_index + 1;
        if next < self.levels.len() {
            self.current_index = next;
            Some(&self.levels[next])
        } else {
            info!("all levels completed");
            None
        }
    }

    /// The current level again, for a restart.
    pub fn restart(&self) -> &LevelData {
        self.current()
    }

    /// Moves the cursor to the level with `level_number`.
    pub fn load_by_number(&mut self, level_number: u32) -> CascadeResult<&LevelData> {
        match self
            .levels
            .iter()
            .position(|level| level.level_number == level_number)
        {
            Some(index) => self.load(index),
            None => {
                warn!("no level numbered {}", level_number);
                Err(CascadeError::LevelNotFound(level_number))
            }
        }
    }
}

impl Default for LevelCatalog {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}
