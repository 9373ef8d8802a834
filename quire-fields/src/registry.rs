//! CollectionsContext — loads collection definitions from disk.
//!
//! Reads one YAML file per collection under a root directory and keeps an
//! in-memory index by slug. Editing definitions is done on disk.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::debug;
use ulid::Ulid;

use crate::definition::ContentTypeDefinition;
use crate::error::{FieldsError, Result};

/// Collection definitions to seed into an empty or partial directory.
pub struct CollectionDefaults {
    collections: Vec<ContentTypeDefinition>,
}

impl CollectionDefaults {
    pub fn new() -> Self {
        Self {
            collections: Vec::new(),
        }
    }

    /// Add a default collection definition.
    pub fn collection(mut self, def: ContentTypeDefinition) -> Self {
        self.collections.push(def);
        self
    }
}

impl Default for CollectionDefaults {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for `CollectionsContext`. Created by `CollectionsContext::open()`.
pub struct CollectionsContextBuilder {
    root: PathBuf,
    defaults: Option<CollectionDefaults>,
}

impl CollectionsContextBuilder {
    /// Provide default collections. Seeded on open; existing files are preserved.
    pub fn with_defaults(mut self, defaults: CollectionDefaults) -> Self {
        self.defaults = Some(defaults);
        self
    }

    /// Build the context: create the directory, seed defaults, load from disk.
    pub async fn build(self) -> Result<CollectionsContext> {
        let root = self.root;
        fs::create_dir_all(&root).await?;

        if let Some(defaults) = self.defaults {
            seed_defaults(&root, &defaults).await?;
        }

        let mut ctx = CollectionsContext {
            root,
            collections: Vec::new(),
            slug_index: HashMap::new(),
        };
        ctx.load_collections().await?;

        debug!(
            collections = ctx.collections.len(),
            root = %ctx.root.display(),
            "collections context opened"
        );

        Ok(ctx)
    }
}

/// Seed default definitions whose file doesn't exist yet (matched by slug).
async fn seed_defaults(root: &Path, defaults: &CollectionDefaults) -> Result<()> {
    for def in &defaults.collections {
        let path = collection_path(root, &def.slug);
        if !path.exists() {
            let yaml = serde_yaml_ng::to_string(def)?;
            atomic_write(&path, yaml.as_bytes()).await?;
            debug!(slug = %def.slug, "seeded default collection");
        }
    }
    Ok(())
}

fn collection_path(root: &Path, slug: &str) -> PathBuf {
    root.join(format!("{slug}.yaml"))
}

/// Collection definitions stored as `{root}/{slug}.yaml`.
pub struct CollectionsContext {
    root: PathBuf,
    collections: Vec<ContentTypeDefinition>,
    slug_index: HashMap<String, usize>,
}

impl CollectionsContext {
    /// Open or create a collections directory.
    ///
    /// ```rust,ignore
    /// let ctx = CollectionsContext::open(path)
    ///     .with_defaults(my_defaults())
    ///     .build()
    ///     .await?;
    /// ```
    pub fn open(root: impl Into<PathBuf>) -> CollectionsContextBuilder {
        CollectionsContextBuilder {
            root: root.into(),
            defaults: None,
        }
    }

    /// Get a collection by slug.
    pub fn get(&self, slug: &str) -> Option<&ContentTypeDefinition> {
        self.slug_index.get(slug).map(|&i| &self.collections[i])
    }

    /// Get a collection by slug, or fail with `CollectionNotFound`.
    pub fn require(&self, slug: &str) -> Result<&ContentTypeDefinition> {
        self.get(slug).ok_or_else(|| FieldsError::CollectionNotFound {
            slug: slug.to_string(),
        })
    }

    /// All collections, in load order.
    pub fn all(&self) -> &[ContentTypeDefinition] {
        &self.collections
    }

    /// The root directory path.
    pub fn root(&self) -> &Path {
        &self.root
    }

    async fn load_collections(&mut self) -> Result<()> {
        if !self.root.is_dir() {
            return Err(FieldsError::NotInitialized {
                path: self.root.clone(),
            });
        }
        let mut paths = Vec::new();
        let mut entries = fs::read_dir(&self.root).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) == Some("yaml") {
                paths.push(path);
            }
        }
        // Directory order is platform dependent.
        paths.sort();

        for path in paths {
            let content = fs::read_to_string(&path).await?;
            match serde_yaml_ng::from_str::<ContentTypeDefinition>(&content) {
                Ok(def) if self.slug_index.contains_key(&def.slug) => {
                    tracing::warn!(?path, slug = %def.slug, "skipping duplicate collection slug");
                }
                Ok(def) => {
                    let idx = self.collections.len();
                    self.slug_index.insert(def.slug.clone(), idx);
                    self.collections.push(def);
                }
                Err(e) => {
                    tracing::warn!(?path, %e, "skipping invalid collection definition");
                }
            }
        }
        Ok(())
    }
}

/// Write to a temp file then rename for atomic persistence.
async fn atomic_write(path: &Path, data: &[u8]) -> Result<()> {
    let dir = path
        .parent()
        .ok_or_else(|| std::io::Error::new(std::io::ErrorKind::InvalidInput, "no parent dir"))?;
    // Leading dot and extension keep temp files out of the `.yaml` scan.
    let tmp = dir.join(format!(".tmp_{}", Ulid::new()));
    fs::write(&tmp, data).await?;
    fs::rename(&tmp, path).await?;
    Ok(())
}
