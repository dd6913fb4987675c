//! Model resolution
//!
//! The placement solver and the registry only need to know whether an
//! archetype has a renderable model on disk; loading geometry is the render
//! backend's business. [`ModelLibrary`] implements the on-disk lookup the
//! viewer uses, [`StaticResolver`] serves tests.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Maps an archetype name to a model file, if one exists
pub trait ModelResolver {
    /// Resolve an archetype to a model path, or `None` if unplaceable
    fn resolve(&self, kind: &str) -> Option<PathBuf>;
}

impl<T: ModelResolver + ?Sized> ModelResolver for Box<T> {
    fn resolve(&self, kind: &str) -> Option<PathBuf> {
        (**self).resolve(kind)
    }
}

/// Model file extensions, in priority order
const MODEL_EXTENSIONS: [&str; 8] = ["fbx", "obj", "gltf", "glb", "3ds", "dae", "ply", "stl"];

/// Resolver backed by a directory of model files
///
/// Lookup order per extension: exact `kind.ext` match, then case-insensitive
/// scan of the directory, then subdirectories whose name matches the kind
/// (looking for `kind.ext` or `subdir.ext` inside).
pub struct ModelLibrary {
    root: PathBuf,
}

impl ModelLibrary {
    /// Create a library rooted at a models directory
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The library's root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn find_in_dir(dir: &Path, stem: &str) -> Option<PathBuf> {
        for ext in MODEL_EXTENSIONS {
            let candidate = dir.join(format!("{stem}.{ext}"));
            if candidate.is_file() {
                return Some(candidate);
            }
        }
        // Case-insensitive fallback over the directory listing
        let entries = fs::read_dir(dir).ok()?;
        let wanted: Vec<String> = MODEL_EXTENSIONS
            .iter()
            .map(|ext| format!("{stem}.{ext}").to_ascii_lowercase())
            .collect();
        for entry in entries.flatten() {
            let name = entry.file_name().to_string_lossy().to_ascii_lowercase();
            if wanted.iter().any(|w| *w == name) && entry.path().is_file() {
                return Some(entry.path());
            }
        }
        None
    }
}

impl ModelResolver for ModelLibrary {
    fn resolve(&self, kind: &str) -> Option<PathBuf> {
        if let Some(path) = Self::find_in_dir(&self.root, kind) {
            log::debug!("resolved model for {kind:?}: {path:?}");
            return Some(path);
        }

        // Subdirectory search: a directory named like the kind may hold the
        // model under either the kind's name or its own.
        let kind_lower = kind.to_ascii_lowercase();
        let entries = fs::read_dir(&self.root).ok()?;
        for entry in entries.flatten() {
            let path = entry.path();
            if !path.is_dir() {
                continue;
            }
            let dir_name = entry.file_name().to_string_lossy().to_ascii_lowercase();
            if dir_name == kind_lower || dir_name.contains(&kind_lower) {
                if let Some(found) = Self::find_in_dir(&path, kind) {
                    log::debug!("resolved model for {kind:?} in subdirectory: {found:?}");
                    return Some(found);
                }
                if let Some(found) = Self::find_in_dir(&path, &dir_name) {
                    log::debug!("resolved model for {kind:?} via subdirectory name: {found:?}");
                    return Some(found);
                }
            }
        }

        log::info!("no model found for archetype {kind:?}");
        None
    }
}

/// Resolver over a fixed set of known archetypes
///
/// Returns a synthetic path for every known kind; handy for tests and for
/// running the engine without a models directory on disk.
pub struct StaticResolver {
    known: HashSet<String>,
}

impl StaticResolver {
    /// Create a resolver recognizing the given archetype names
    pub fn new<I, S>(kinds: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            known: kinds.into_iter().map(Into::into).collect(),
        }
    }

    /// Resolver for the built-in primitive archetypes
    pub fn primitives() -> Self {
        Self::new(["cube", "box", "sphere", "ball", "chair", "table", "teapot"])
    }
}

impl ModelResolver for StaticResolver {
    fn resolve(&self, kind: &str) -> Option<PathBuf> {
        if self.known.contains(kind) {
            Some(PathBuf::from(format!("primitives/{kind}.obj")))
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_resolver() {
        let resolver = StaticResolver::primitives();
        assert!(resolver.resolve("cube").is_some());
        assert!(resolver.resolve("unicorn").is_none());
    }

    #[test]
    fn test_model_library_missing_root() {
        let library = ModelLibrary::new("/definitely/not/a/real/path");
        assert!(library.resolve("cube").is_none());
    }
}
