//! Policy loader - reading policy text from files

use super::parser;
use super::types::Graph;
use crate::error::{PolicyError, VerdictError};
use std::fs;
use std::path::Path;

/// Loads policy text from disk
pub struct PolicyLoader;

impl PolicyLoader {
    pub fn new() -> Self {
        Self
    }

    /// Read raw policy text from a file
    pub fn load_policy<P: AsRef<Path>>(&self, path: P) -> Result<String, VerdictError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(PolicyError::FileNotFound(path.display().to_string()).into());
        }
        Ok(fs::read_to_string(path)?)
    }

    /// Read and parse a policy file
    pub fn load_graph<P: AsRef<Path>>(&self, path: P) -> Result<Graph, VerdictError> {
        let text = self.load_policy(path)?;
        Ok(Self::parse_policy(&text)?)
    }

    /// Parse policy text into a graph
    pub fn parse_policy(content: &str) -> Result<Graph, PolicyError> {
        parser::parse(content)
    }
}

impl Default for PolicyLoader {
    fn default() -> Self {
        Self::new()
    }
}
