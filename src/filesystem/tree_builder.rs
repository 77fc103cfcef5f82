use std::path::{Path, PathBuf};

use compio::fs;
use derive_more::Display;
use snafu::prelude::*;
use tracing::{debug, info, warn};

use crate::filesystem::tree::{DIRECTORY_MARKER, Directory, INDENT_WIDTH, TreeNode};

/// How indentation that is not a whole number of levels is treated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display)]
pub enum IndentPolicy {
    /// Truncate to the nearest lower depth
    #[default]
    #[display("lenient")]
    Lenient,
    /// Skip the line and report it
    #[display("strict")]
    Strict,
}

/// Result of building a tree: the root, if any, and every line that had to be skipped.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TreeBuild {
    pub root: Option<Directory>,
    pub anomalies: Vec<ParseAnomaly>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TreeBuilder {
    policy: IndentPolicy,
}

enum LineKind {
    Directory,
    File,
}

struct Line<'a> {
    number: usize,
    depth: usize,
    kind: LineKind,
    name: &'a str,
}

impl TreeBuilder {
    pub fn new(policy: IndentPolicy) -> Self {
        Self { policy }
    }

    pub async fn from_path(&self, path: &Path) -> Result<TreeBuild, TreeLoadError> {
        debug!("Opening description file: {}", path.display());
        let bytes = fs::read(path).await.context(ReadSnafu {
            file_path: path.to_path_buf(),
        })?;
        debug!("Successfully read description file: {} bytes", bytes.len());

        let contents = String::from_utf8(bytes).context(EncodingSnafu {
            file_path: path.to_path_buf(),
        })?;
        Ok(self.build(contents.lines()))
    }

    pub fn build<'a>(&self, lines: impl IntoIterator<Item = &'a str>) -> TreeBuild {
        debug!("Building tree with {} indentation", self.policy);

        let mut open = OpenPath::default();
        let mut anomalies = Vec::new();

        for (index, raw) in lines.into_iter().enumerate() {
            let line = match self.classify(index + 1, raw) {
                Ok(Some(line)) => line,
                Ok(None) => continue,
                Err(anomaly) => {
                    warn!("{anomaly}");
                    anomalies.push(anomaly);
                    continue;
                }
            };

            if let Err(anomaly) = open.attach(line) {
                warn!("{anomaly}");
                anomalies.push(anomaly);
            }
        }

        let root = open.root;
        match &root {
            Some(root) => info!(
                "Built tree rooted at '{}' with {} files",
                root.name(),
                root.count_files_recursive()
            ),
            None => warn!("Description does not declare a root directory"),
        }

        TreeBuild { root, anomalies }
    }

    fn classify<'a>(&self, number: usize, raw: &'a str) -> Result<Option<Line<'a>>, ParseAnomaly> {
        let content = raw.trim_end();
        if content.is_empty() {
            return Ok(None);
        }

        let trimmed = content.trim_start();
        let indent = content.chars().count() - trimmed.chars().count();
        if self.policy == IndentPolicy::Strict && indent % INDENT_WIDTH != 0 {
            return MisalignedIndentSnafu {
                line: number,
                indent,
            }
            .fail();
        }

        let (kind, name) = match trimmed.strip_suffix(DIRECTORY_MARKER) {
            Some(name) => (LineKind::Directory, name.trim()),
            None => (LineKind::File, trimmed),
        };

        Ok(Some(Line {
            number,
            depth: indent / INDENT_WIDTH,
            kind,
            name,
        }))
    }
}

/// The root under construction plus the last directory declared at each depth.
///
/// `path[i]` is the child index, inside the directory at depth `i`, of the
/// last directory declared at depth `i + 1`. Directories are inserted into
/// their parent as soon as they are declared, so child order always follows
/// declaration order.
#[derive(Debug, Default)]
struct OpenPath {
    root: Option<Directory>,
    path: Vec<usize>,
}

impl OpenPath {
    /// Deepest depth a new line may be attached at.
    fn reachable_depth(&self) -> usize {
        match self.root {
            Some(_) => self.path.len() + 1,
            None => 0,
        }
    }

    fn attach(&mut self, line: Line<'_>) -> Result<(), ParseAnomaly> {
        match line.kind {
            LineKind::Directory if line.depth == 0 => {
                if let Some(previous) = self.root.replace(Directory::new(line.name)) {
                    warn!(
                        "Line {}: root '{}' replaces previously declared root '{}'",
                        line.number,
                        line.name,
                        previous.name()
                    );
                }
                self.path.clear();
            }
            LineKind::Directory => {
                self.ensure_ancestor(&line)?;
                // Deeper directories can no longer receive children
                self.path.truncate(line.depth - 1);
                if let Some(parent) = self.parent_mut(line.depth) {
                    let index = parent.children().len();
                    parent.add(Directory::new(line.name));
                    self.path.push(index);
                }
            }
            LineKind::File => {
                if line.depth == 0 {
                    return FileWithoutDirectorySnafu {
                        line: line.number,
                        name: line.name,
                    }
                    .fail();
                }
                self.ensure_ancestor(&line)?;
                if let Some(parent) = self.parent_mut(line.depth) {
                    parent.add(TreeNode::file(line.name));
                }
            }
        }
        Ok(())
    }

    fn ensure_ancestor(&self, line: &Line<'_>) -> Result<(), ParseAnomaly> {
        if self.reachable_depth() < line.depth {
            return MissingAncestorSnafu {
                line: line.number,
                name: line.name,
                depth: line.depth,
            }
            .fail();
        }
        Ok(())
    }

    /// The last directory declared at `depth - 1`.
    fn parent_mut(&mut self, depth: usize) -> Option<&mut Directory> {
        let mut parent = self.root.as_mut()?;
        for &index in self.path.get(..depth - 1)? {
            parent = parent.subdirectory_at_mut(index)?;
        }
        Some(parent)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Snafu)]
pub enum ParseAnomaly {
    #[snafu(display("Line {line}: file '{name}' found without a directory"))]
    FileWithoutDirectory { line: usize, name: String },
    #[snafu(display("Line {line}: '{name}' at depth {depth} has no enclosing directory"))]
    MissingAncestor {
        line: usize,
        name: String,
        depth: usize,
    },
    #[snafu(display(
        "Line {line}: indentation of {indent} is not a multiple of {}",
        INDENT_WIDTH
    ))]
    MisalignedIndent { line: usize, indent: usize },
}

#[derive(Debug, Snafu)]
pub enum TreeLoadError {
    #[snafu(display("Failed to read the description file: {}", file_path.display()))]
    ReadError {
        file_path: PathBuf,
        source: std::io::Error,
    },
    #[snafu(display("Description file {} is not valid UTF-8", file_path.display()))]
    EncodingError {
        file_path: PathBuf,
        source: std::string::FromUtf8Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SAMPLE: &str = "root:
   docs:
      readme.txt
   src:
      main.go
      utils:
         helper.go
";

    fn build(text: &str) -> TreeBuild {
        TreeBuilder::default().build(text.lines())
    }

    fn names(directory: &Directory) -> Vec<&str> {
        directory.children().iter().map(TreeNode::name).collect()
    }

    #[test]
    fn builds_nested_structure_in_declaration_order() {
        let build = build(SAMPLE);
        assert!(build.anomalies.is_empty());

        let root = build.root.expect("root is declared");
        assert_eq!(root.name(), "root");
        assert_eq!(names(&root), vec!["docs", "src"]);

        let src = root.find_subdirectory("src").expect("src exists");
        assert_eq!(names(src), vec!["main.go", "utils"]);
        let utils = src.find_subdirectory("utils").expect("utils exists");
        assert_eq!(names(utils), vec!["helper.go"]);
    }

    #[rstest]
    #[case("")]
    #[case("\n\n   \n")]
    fn empty_input_has_no_root(#[case] text: &str) {
        let build = build(text);
        assert_eq!(build.root, None);
        assert!(build.anomalies.is_empty());
    }

    #[test]
    fn blank_lines_do_not_affect_structure() {
        let spaced = "root:\n\n   a:\n\n      x\n   \n   y\n";
        let compact = "root:\n   a:\n      x\n   y\n";
        assert_eq!(build(spaced).root, build(compact).root);
    }

    #[test]
    fn file_at_depth_zero_is_reported_and_skipped() {
        let build = build("stray.txt\nroot:\n   kept.txt\n");

        assert_eq!(
            build.anomalies,
            vec![ParseAnomaly::FileWithoutDirectory {
                line: 1,
                name: "stray.txt".into(),
            }]
        );
        let root = build.root.expect("root is declared");
        assert_eq!(names(&root), vec!["kept.txt"]);
    }

    #[test]
    fn skipped_directory_takes_its_children_with_it() {
        let build = build("root:\n         deep:\n            inner.txt\n   ok.txt\n");

        assert_eq!(build.anomalies.len(), 2);
        assert!(matches!(
            build.anomalies[0],
            ParseAnomaly::MissingAncestor { line: 2, depth: 3, .. }
        ));
        let root = build.root.expect("root is declared");
        assert_eq!(names(&root), vec!["ok.txt"]);
    }

    #[test]
    fn shallower_directory_closes_deeper_ancestors() {
        let text = "root:\n   a:\n      b:\n         deep.txt\n   c:\n      shallow.txt\n";
        let root = build(text).root.expect("root is declared");

        assert_eq!(names(&root), vec!["a", "c"]);
        let c = root.find_subdirectory("c").expect("c exists");
        assert_eq!(names(c), vec!["shallow.txt"]);
        let b = root
            .find_subdirectory("a")
            .and_then(|a| a.find_subdirectory("b"))
            .expect("a/b exists");
        assert_eq!(names(b), vec!["deep.txt"]);
    }

    #[test]
    fn file_keeps_deeper_directory_open_for_later_lines() {
        let build = build("root:\n   a:\n      x\n   f\n      y\n");

        assert!(build.anomalies.is_empty());
        let root = build.root.expect("root is declared");
        assert_eq!(names(&root), vec!["a", "f"]);
        let a = root.find_subdirectory("a").expect("a exists");
        assert_eq!(names(a), vec!["x", "y"]);
    }

    #[test]
    fn file_after_nested_subtree_leaves_grandchild_reachable() {
        let build = build("root:\n   a:\n      b:\n   x.txt\n         z.txt\n");

        assert!(build.anomalies.is_empty());
        let root = build.root.expect("root is declared");
        assert_eq!(names(&root), vec!["a", "x.txt"]);
        let b = root
            .find_subdirectory("a")
            .and_then(|a| a.find_subdirectory("b"))
            .expect("a/b exists");
        assert_eq!(names(b), vec!["z.txt"]);
    }

    #[test]
    fn shallower_directory_invalidates_deeper_entries() {
        let build = build("root:\n   a:\n      b:\n   c:\n         z.txt\n");

        assert!(matches!(
            &build.anomalies[..],
            [ParseAnomaly::MissingAncestor { line: 5, depth: 3, .. }]
        ));
        let b = build
            .root
            .as_ref()
            .and_then(|root| root.find_subdirectory("a"))
            .and_then(|a| a.find_subdirectory("b"))
            .expect("a/b exists");
        assert!(b.children().is_empty());
    }

    #[test]
    fn second_root_replaces_the_first() {
        let root = build("first:\n   a.txt\nsecond:\n   b.txt\n")
            .root
            .expect("root is declared");
        assert_eq!(root.name(), "second");
        assert_eq!(names(&root), vec!["b.txt"]);
    }

    #[rstest]
    #[case(4, 1)]
    #[case(5, 1)]
    #[case(6, 2)]
    #[case(8, 2)]
    fn lenient_indent_truncates_to_lower_depth(#[case] indent: usize, #[case] depth: usize) {
        let text = format!("root:\n   a:\n{:indent$}x.txt\n", "", indent = indent);
        let root = build(&text).root.expect("root is declared");

        let x_parent = if depth == 1 {
            &root
        } else {
            root.find_subdirectory("a").expect("a exists")
        };
        assert!(x_parent.children().iter().any(|c| c.name() == "x.txt"));
    }

    #[rstest]
    #[case(1)]
    #[case(4)]
    #[case(5)]
    fn strict_indent_rejects_misaligned_lines(#[case] indent: usize) {
        let text = format!("root:\n{:indent$}x.txt\n   y.txt\n", "", indent = indent);
        let build = TreeBuilder::new(IndentPolicy::Strict).build(text.lines());

        assert_eq!(
            build.anomalies,
            vec![ParseAnomaly::MisalignedIndent { line: 2, indent }]
        );
        let root = build.root.expect("root is declared");
        assert_eq!(names(&root), vec!["y.txt"]);
    }

    #[test]
    fn directory_names_are_trimmed_and_lose_one_marker() {
        let root = build("root:\n   spaced  :\n   odd::\n   trailing.txt   \n")
            .root
            .expect("root is declared");
        assert_eq!(names(&root), vec!["spaced", "odd:", "trailing.txt"]);
    }

    #[test]
    fn tabs_count_as_single_columns() {
        let root = build("root:\n\t\t\ttabbed.txt\n").root.expect("root is declared");
        assert_eq!(names(&root), vec!["tabbed.txt"]);
    }

    #[rstest]
    #[case::sample(SAMPLE)]
    #[case::deep_nesting("r:\n   a:\n      b:\n         c:\n            d:\n               leaf\n")]
    #[case::empty_directories("top:\n   empty:\n   also_empty:\n      nested_empty:\n")]
    #[case::duplicate_names("top:\n   dup:\n      a\n   dup:\n      b\n   dup\n")]
    #[case::file_after_nested_subtree("root:\n   a:\n      x\n   f\n      y\n")]
    #[case::grandchild_after_shallow_file("root:\n   a:\n      b:\n   x.txt\n         z.txt\n")]
    #[case::names_ending_in_marker("root:\n   odd::\n      inner.txt\n")]
    fn render_round_trips_through_builder(#[case] text: &str) {
        let original = build(text).root.expect("root is declared");
        let reparsed = build(&original.render());

        assert!(reparsed.anomalies.is_empty());
        assert_eq!(reparsed.root, Some(original));
    }

    #[compio::test]
    async fn from_path_reads_description_file() {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        write!(file, "{SAMPLE}").expect("Failed to write to temp file");

        let build = TreeBuilder::default()
            .from_path(file.path())
            .await
            .expect("Failed to load description");

        assert_eq!(build.root.map(|root| root.count_files_recursive()), Some(3));
    }

    #[compio::test]
    async fn from_path_fails_for_missing_file() {
        let result = TreeBuilder::default()
            .from_path(Path::new("/this/path/does/not/exist.dat"))
            .await;

        assert!(matches!(result, Err(TreeLoadError::ReadError { .. })));
    }

    #[compio::test]
    async fn from_path_rejects_invalid_utf8() {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        file.write_all(&[0x72, 0x6f, 0xff, 0x3a])
            .expect("Failed to write to temp file");

        let result = TreeBuilder::default().from_path(file.path()).await;

        assert!(matches!(result, Err(TreeLoadError::EncodingError { .. })));
    }

    #[test]
    fn load_error_display_mentions_path() {
        let error = TreeLoadError::ReadError {
            file_path: PathBuf::from("/tmp/missing.dat"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "file not found"),
        };
        assert!(error.to_string().contains("/tmp/missing.dat"));
    }
}
