use snafu::Snafu;
use tracing::debug;

use crate::filesystem::{Directory, TreeNode};

/// Tracks the user's position inside a built tree.
///
/// `current` is always a directory; `history` holds every directory left by
/// a successful `chdir`, so it is exactly the chain of ancestors of `current`.
#[derive(Debug, Clone)]
pub struct Navigator<'a> {
    root: &'a Directory,
    current: &'a Directory,
    history: Vec<&'a Directory>,
}

impl<'a> Navigator<'a> {
    pub fn new(root: &'a Directory) -> Self {
        Self {
            root,
            current: root,
            history: Vec::new(),
        }
    }

    pub fn root(&self) -> &'a Directory {
        self.root
    }

    pub fn current(&self) -> &'a Directory {
        self.current
    }

    /// Number of successful descents not yet undone by `up`.
    pub fn depth(&self) -> usize {
        self.history.len()
    }

    /// Names of the immediate children, space separated.
    pub fn list(&self) -> String {
        self.current
            .children()
            .iter()
            .map(TreeNode::name)
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Indented rendering of the whole subtree under the current directory.
    pub fn list_all(&self) -> String {
        self.current.render()
    }

    pub fn chdir(&mut self, name: &str) -> Result<(), NavigationError> {
        let Some(target) = self.current.find_subdirectory(name) else {
            return DirectoryNotFoundSnafu { name }.fail();
        };

        debug!("Descending from '{}' into '{}'", self.current.name(), name);
        self.history.push(self.current);
        self.current = target;
        Ok(())
    }

    /// Returns to the previous directory. Returns `false` when already at the
    /// top, in which case nothing changes.
    pub fn up(&mut self) -> bool {
        match self.history.pop() {
            Some(previous) => {
                debug!("Ascending from '{}' to '{}'", self.current.name(), previous.name());
                self.current = previous;
                true
            }
            None => false,
        }
    }

    pub fn count_current(&self) -> usize {
        self.current.count_files()
    }

    pub fn count_all(&self) -> usize {
        self.current.count_files_recursive()
    }

    pub fn find(&self, name: &str) -> Vec<String> {
        self.current.find_paths(name)
    }

    pub fn pwd(&self) -> String {
        self.history
            .iter()
            .chain(std::iter::once(&self.current))
            .map(|directory| directory.name())
            .collect::<Vec<_>>()
            .join("/")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Snafu)]
pub enum NavigationError {
    #[snafu(display("Directory not found"))]
    DirectoryNotFound { name: String },
}
