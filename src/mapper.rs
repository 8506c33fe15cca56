//! The mapping pipeline: rules, walk, trim, write, visualize

use std::path::{Component, Path, PathBuf};

use crate::error::MapError;
use crate::gitignore::{IgnoreRuleSet, gitignore_path};
use crate::output::{OutputFormat, write_structure};
use crate::tree::{ExcludePatterns, SkippedPath, TreeWalker, trim};
use crate::visualize;

/// Input of one mapping run.
#[derive(Debug, Clone)]
pub struct MapOptions {
    pub directory: PathBuf,
    pub format: OutputFormat,
    /// Trim with these patterns after the walk.
    pub trim: Option<ExcludePatterns>,
    /// Write the visualization page (JSON output only).
    pub visualize: bool,
}

impl MapOptions {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            format: OutputFormat::default(),
            trim: None,
            visualize: false,
        }
    }

    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_trim(mut self, patterns: ExcludePatterns) -> Self {
        self.trim = Some(patterns);
        self
    }

    pub fn with_visualize(mut self, visualize: bool) -> Self {
        self.visualize = visualize;
        self
    }
}

/// What a successful run produced.
#[derive(Debug)]
pub struct MapOutcome {
    pub root: PathBuf,
    pub structure_path: PathBuf,
    /// Set when the visualization page was written.
    pub visualization: Option<PathBuf>,
    /// Number of directories recorded.
    pub directories: usize,
    pub skipped: Vec<SkippedPath>,
}

/// Map `options.directory` and write `structure.<ext>` into it.
pub fn create_map(options: &MapOptions) -> Result<MapOutcome, MapError> {
    let root = resolve_root(&options.directory)?;

    tracing::info!("Starting directory mapping for {}...", root.display());

    let rules = IgnoreRuleSet::from_file(&root, &gitignore_path(&root))?;
    let walk = TreeWalker::new(&rules).walk(&root)?;

    let structure = match &options.trim {
        Some(patterns) => trim(walk.structure, patterns),
        None => walk.structure,
    };

    tracing::info!("Saving output...");
    let structure_path = write_structure(&root, &structure, options.format)?;
    tracing::info!(
        "Process completed. Directory structure saved at {}",
        structure_path.display()
    );

    let visualization = if options.visualize && options.format == OutputFormat::Json {
        match visualize::install(&root) {
            Ok(path) => {
                tracing::info!("Visualization ready at {}", path.display());
                Some(path)
            }
            Err(e) => {
                tracing::warn!("Failed to set up visualization: {}", e);
                None
            }
        }
    } else {
        None
    };

    if !walk.skipped.is_empty() {
        tracing::warn!("{} paths could not be read and were skipped", walk.skipped.len());
    }

    Ok(MapOutcome {
        root,
        structure_path,
        visualization,
        directories: structure.len(),
        skipped: walk.skipped,
    })
}

/// Make `directory` absolute and normalized without resolving symlinks.
fn resolve_root(directory: &Path) -> Result<PathBuf, MapError> {
    let absolute = std::path::absolute(directory).map_err(|source| MapError::RootUnreadable {
        path: directory.to_path_buf(),
        source,
    })?;
    let root = normalize(&absolute);
    match root.metadata() {
        Ok(metadata) if metadata.is_dir() => Ok(root),
        Ok(_) => Err(MapError::NotADirectory(root)),
        Err(source) => Err(MapError::RootUnreadable { path: root, source }),
    }
}

/// Fold `.` and `..` lexically and drop trailing separators.
fn normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other),
        }
    }
    normalized
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::TestTree;
    use crate::tree::StructureMap;
    use std::fs;

    fn read_json(path: &Path) -> StructureMap {
        serde_json::from_slice(&fs::read(path).unwrap()).unwrap()
    }

    fn key(tree: &TestTree, relative: &str) -> String {
        tree.path().join(relative).to_string_lossy().into_owned()
    }

    #[test]
    fn test_create_map_respects_gitignore() {
        let tree = TestTree::new();
        tree.add_file(".gitignore", ".git/\n");
        tree.add_file("a/b.txt", "");
        tree.add_file("a/.git/config", "");

        let outcome = create_map(&MapOptions::new(tree.path())).unwrap();
        assert_eq!(outcome.structure_path, tree.path().join("structure.json"));

        let map = read_json(&outcome.structure_path);
        let a = map.get(&key(&tree, "a")).unwrap();
        assert_eq!(a.files.iter().collect::<Vec<_>>(), vec!["b.txt"]);
        assert!(a.dirs.is_empty());
        assert!(!map.contains(&key(&tree, "a/.git")));
    }

    #[test]
    fn test_create_map_without_gitignore_keeps_everything() {
        let tree = TestTree::new();
        tree.add_file("x/one.txt", "");
        tree.add_file("x/y/two.txt", "");
        tree.add_file(".hidden/three.txt", "");

        let outcome = create_map(&MapOptions::new(tree.path())).unwrap();
        let map = read_json(&outcome.structure_path);
        assert!(map.contains(&key(&tree, "x")));
        assert!(map.contains(&key(&tree, "x/y")));
        assert!(map.contains(&key(&tree, ".hidden")));
        assert_eq!(outcome.directories, map.len());
    }

    #[test]
    fn test_create_map_trims_with_patterns() {
        let tree = TestTree::new();
        tree.add_file("build/out.o", "");
        tree.add_file("src/main.c", "");
        tree.add_file("src/build/gen.c", "");
        tree.add_file("src/lib/util.c", "");

        let options = MapOptions::new(tree.path()).with_trim(ExcludePatterns::new(["build"]));
        let outcome = create_map(&options).unwrap();
        let map = read_json(&outcome.structure_path);

        assert!(!map.contains(&key(&tree, "build")));
        assert!(!map.contains(&key(&tree, "src/build")));
        let src = map.get(&key(&tree, "src")).unwrap();
        assert_eq!(src.dirs.iter().collect::<Vec<_>>(), vec!["lib"]);
    }

    #[test]
    fn test_create_map_writes_selected_format() {
        let tree = TestTree::new();
        tree.add_file("f.txt", "");

        let outcome =
            create_map(&MapOptions::new(tree.path()).with_format(OutputFormat::Xml)).unwrap();
        assert_eq!(outcome.structure_path, tree.path().join("structure.xml"));
        let xml = fs::read_to_string(&outcome.structure_path).unwrap();
        assert!(xml.contains("<file>f.txt</file>"));
    }

    #[test]
    fn test_visualization_only_for_json() {
        let tree = TestTree::new();
        tree.add_file("f.txt", "");

        let json = create_map(&MapOptions::new(tree.path()).with_visualize(true)).unwrap();
        let page = json.visualization.unwrap();
        assert!(page.exists());

        let yaml = create_map(
            &MapOptions::new(tree.path())
                .with_format(OutputFormat::Yaml)
                .with_visualize(true),
        )
        .unwrap();
        assert!(yaml.visualization.is_none());
    }

    #[test]
    fn test_missing_directory_fails_before_writing() {
        let tree = TestTree::new();
        let err = create_map(&MapOptions::new(tree.path().join("nope"))).unwrap_err();
        assert!(matches!(err, MapError::RootUnreadable { .. }));
    }

    #[test]
    fn test_relative_directory_is_made_absolute() {
        let root = resolve_root(Path::new(".")).unwrap();
        assert!(root.is_absolute());
    }

    #[test]
    fn test_normalize_folds_dots_and_trailing_separators() {
        assert_eq!(normalize(Path::new("/a/b/../c/./")), PathBuf::from("/a/c"));
        assert_eq!(normalize(Path::new("/a/b/")), PathBuf::from("/a/b"));
        assert_eq!(normalize(Path::new("/..")), PathBuf::from("/"));
    }

    #[test]
    fn test_parent_components_are_folded_into_keys() {
        let tree = TestTree::new();
        tree.add_file("sub/a/f.txt", "");

        let outcome = create_map(&MapOptions::new(tree.path().join("sub/a/.."))).unwrap();
        assert_eq!(outcome.root, tree.path().join("sub"));

        let map = read_json(&outcome.structure_path);
        let keys: Vec<_> = map.paths().collect();
        assert_eq!(keys, vec![key(&tree, "sub"), key(&tree, "sub/a")]);
    }

    #[test]
    fn test_trailing_separator_is_dropped_from_root_key() {
        let tree = TestTree::new();
        tree.add_file("sub/f.txt", "");

        let outcome = create_map(&MapOptions::new(tree.path().join("sub/"))).unwrap();
        let map = read_json(&outcome.structure_path);
        assert!(map.contains(&key(&tree, "sub")));
        assert!(map.paths().all(|path| !path.ends_with('/')));
    }
}
