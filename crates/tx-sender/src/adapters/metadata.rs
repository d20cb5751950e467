//! Static metadata table

use std::collections::HashMap;

use crate::domain::ModuleErrorIndex;
use crate::ports::outbound::{MetadataRegistry, ModuleErrorMeta};

/// In-memory `(module_index, error_index) -> name` table.
#[derive(Debug, Clone, Default)]
pub struct StaticMetadata {
    errors: HashMap<ModuleErrorIndex, ModuleErrorMeta>,
}

impl StaticMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`StaticMetadata::insert`].
    pub fn with_error(mut self, index: u8, error: u8, module: &str, name: &str) -> Self {
        self.insert(index, error, module, name);
        self
    }

    pub fn insert(&mut self, index: u8, error: u8, module: &str, name: &str) {
        self.errors.insert(
            ModuleErrorIndex::new(index, error),
            ModuleErrorMeta {
                module: module.to_string(),
                name: name.to_string(),
                docs: Vec::new(),
            },
        );
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }
}

impl MetadataRegistry for StaticMetadata {
    fn find_module_error(&self, index: ModuleErrorIndex) -> Option<ModuleErrorMeta> {
        self.errors.get(&index).cloned()
    }
}
