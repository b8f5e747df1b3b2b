//! Where maze text comes from.
use std::path::Path;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
#[error("Could not read maze '{p}': {e}")]
pub struct SourceUnavailable {
    pub p: PathBuf,
    #[source]
    pub e: std::io::Error,
}

/// Provides the text of a maze.
pub trait MazeSource {
    fn read_maze(&self) -> Result<String, SourceUnavailable>;
}

impl MazeSource for Path {
    fn read_maze(&self) -> Result<String, SourceUnavailable> {
        log::debug!("Reading maze from {self:?}");
        std::fs::read_to_string(self).map_err(|e| SourceUnavailable {
            p: self.to_path_buf(),
            e,
        })
    }
}

impl MazeSource for PathBuf {
    fn read_maze(&self) -> Result<String, SourceUnavailable> {
        self.as_path().read_maze()
    }
}

/// Maze text that is already in memory.
#[derive(Copy, Clone, Debug)]
pub struct InlineMaze<'a>(pub &'a str);

impl MazeSource for InlineMaze<'_> {
    fn read_maze(&self) -> Result<String, SourceUnavailable> {
        Ok(self.0.to_owned())
    }
}
