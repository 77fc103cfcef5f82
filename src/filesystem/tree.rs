use std::fmt::Write as _;

/// Number of columns one nesting level occupies, both when parsing a
/// description and when rendering one.
pub const INDENT_WIDTH: usize = 3;

/// Marker that turns a description line into a directory declaration.
pub const DIRECTORY_MARKER: char = ':';

/// A single entry of the synthetic tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeNode {
    Directory(Directory),
    File { name: String },
}

impl TreeNode {
    pub fn file(name: impl Into<String>) -> Self {
        TreeNode::File { name: name.into() }
    }

    pub fn name(&self) -> &str {
        match self {
            TreeNode::Directory(directory) => directory.name(),
            TreeNode::File { name } => name,
        }
    }

    pub fn as_directory(&self) -> Option<&Directory> {
        match self {
            TreeNode::Directory(directory) => Some(directory),
            TreeNode::File { .. } => None,
        }
    }

    pub fn is_file(&self) -> bool {
        matches!(self, TreeNode::File { .. })
    }

    fn render_into(&self, out: &mut String, indent: usize) {
        match self {
            TreeNode::Directory(directory) => directory.render_into(out, indent),
            TreeNode::File { name } => {
                let _ = writeln!(out, "{:indent$}{}", "", name, indent = indent);
            }
        }
    }
}

impl From<Directory> for TreeNode {
    fn from(directory: Directory) -> Self {
        TreeNode::Directory(directory)
    }
}

/// A directory exclusively owning its children in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directory {
    name: String,
    children: Vec<TreeNode>,
}

impl Directory {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            children: Vec::new(),
        }
    }

    #[cfg(test)]
    pub fn with_child(mut self, child: impl Into<TreeNode>) -> Self {
        self.add(child);
        self
    }

    pub fn add(&mut self, child: impl Into<TreeNode>) {
        self.children.push(child.into());
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn children(&self) -> &[TreeNode] {
        &self.children
    }

    pub fn subdirectories(&self) -> impl Iterator<Item = &Directory> {
        self.children.iter().filter_map(TreeNode::as_directory)
    }

    /// First child directory named exactly `name`.
    pub fn find_subdirectory(&self, name: &str) -> Option<&Directory> {
        self.subdirectories().find(|directory| directory.name == name)
    }

    pub fn subdirectory_at_mut(&mut self, index: usize) -> Option<&mut Directory> {
        match self.children.get_mut(index)? {
            TreeNode::Directory(directory) => Some(directory),
            TreeNode::File { .. } => None,
        }
    }

    /// Files directly inside this directory.
    pub fn count_files(&self) -> usize {
        self.children.iter().filter(|child| child.is_file()).count()
    }

    /// Files anywhere below this directory. Directories themselves are not counted.
    pub fn count_files_recursive(&self) -> usize {
        self.children
            .iter()
            .map(|child| match child {
                TreeNode::File { .. } => 1,
                TreeNode::Directory(directory) => directory.count_files_recursive(),
            })
            .sum()
    }

    /// Renders the subtree in the description format, so the result can be
    /// fed back to the tree builder.
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.render_into(&mut out, 0);
        out
    }

    fn render_into(&self, out: &mut String, indent: usize) {
        let _ = writeln!(
            out,
            "{:indent$}{}{}",
            "",
            self.name,
            DIRECTORY_MARKER,
            indent = indent
        );
        for child in &self.children {
            child.render_into(out, indent + INDENT_WIDTH);
        }
    }

    /// Slash-separated paths, relative to this directory, of every descendant
    /// named `name`, in depth-first order.
    pub fn find_paths(&self, name: &str) -> Vec<String> {
        let mut found = Vec::new();
        self.collect_paths(name, "", &mut found);
        found
    }

    fn collect_paths(&self, name: &str, prefix: &str, found: &mut Vec<String>) {
        for child in &self.children {
            let path = if prefix.is_empty() {
                child.name().to_string()
            } else {
                format!("{prefix}/{}", child.name())
            };

            if child.name() == name {
                found.push(path.clone());
            }
            if let TreeNode::Directory(directory) = child {
                directory.collect_paths(name, &path, found);
            }
        }
    }
}
