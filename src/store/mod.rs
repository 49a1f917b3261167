use std::io;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::debug;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{Product, ProductInput, ProductPatch};

/// Product id → record, in insertion order.
pub type Catalog = IndexMap<String, Product>;

/// Flat-file product store.
///
/// The file is the only source of truth: every operation reads it from disk,
/// and mutations write the whole mapping back. Mutations are serialized by
/// `write_lock` and land on disk through a temp file + rename, so a reader
/// sees either the old or the new catalog, never a torn one.
pub struct ProductStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl ProductStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    // ── Products ──────────────────────────────────────────────────────────────

    /// Stores a new record under a freshly generated id, keeping every
    /// existing entry.
    pub async fn insert(&self, input: ProductInput) -> AppResult<Product> {
        let _guard = self.write_lock.lock().await;
        let mut catalog = self.load().await?.unwrap_or_default();

        let mut id = Uuid::new_v4().to_string();
        while catalog.contains_key(&id) {
            id = Uuid::new_v4().to_string();
        }

        let product = Product::new(id.clone(), input);
        catalog.insert(id, product.clone());
        self.save(&catalog).await?;

        Ok(product)
    }

    pub async fn fetch(&self, id: &str) -> AppResult<Product> {
        self.load()
            .await?
            .and_then(|catalog| catalog.get(id).cloned())
            .ok_or_else(|| product_not_found(id))
    }

    /// Replaces every field of an existing record.
    pub async fn replace(&self, id: &str, input: ProductInput) -> AppResult<Product> {
        let _guard = self.write_lock.lock().await;
        let mut catalog = self.load().await?.unwrap_or_default();

        let product = catalog.get_mut(id).ok_or_else(|| product_not_found(id))?;
        product.replace(input);
        let product = product.clone();

        self.save(&catalog).await?;
        Ok(product)
    }

    /// Merges the fields present in `patch` into an existing record.
    pub async fn patch(&self, id: &str, patch: ProductPatch) -> AppResult<Product> {
        let _guard = self.write_lock.lock().await;
        let mut catalog = self
            .load()
            .await?
            .ok_or_else(|| AppError::NotFound("Data not found".to_string()))?;

        let product = catalog.get_mut(id).ok_or_else(|| product_not_found(id))?;
        product.apply(patch);
        let product = product.clone();

        self.save(&catalog).await?;
        Ok(product)
    }

    /// Removes a record and returns it. Remaining entries keep their order.
    pub async fn remove(&self, id: &str) -> AppResult<Product> {
        let _guard = self.write_lock.lock().await;
        let mut catalog = self
            .load()
            .await?
            .ok_or_else(|| AppError::NotFound("data file not found".to_string()))?;

        let product = catalog
            .shift_remove(id)
            .ok_or_else(|| product_not_found(id))?;

        self.save(&catalog).await?;
        Ok(product)
    }

    // ── File I/O ──────────────────────────────────────────────────────────────

    /// `None` when the store file does not exist yet. An empty file reads as
    /// an empty catalog. Records stored without an id take their map key.
    async fn load(&self) -> AppResult<Option<Catalog>> {
        let mut catalog: Catalog = match tokio::fs::read(&self.path).await {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => Catalog::new(),
            Ok(bytes) => serde_json::from_slice(&bytes)?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        for (key, product) in catalog.iter_mut() {
            if product.id.is_empty() {
                product.id = key.clone();
            }
        }

        Ok(Some(catalog))
    }

    async fn save(&self, catalog: &Catalog) -> AppResult<()> {
        let bytes = encode(catalog)?;

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        tokio::fs::write(&tmp, &bytes).await?;
        tokio::fs::rename(&tmp, &self.path).await?;

        debug!(path = %self.path.display(), count = catalog.len(), "Saved product store");
        Ok(())
    }
}

fn product_not_found(id: &str) -> AppError {
    AppError::NotFound(format!("Product with {} not found", id))
}

/// Pretty JSON with four-space indentation.
fn encode(catalog: &Catalog) -> AppResult<Vec<u8>> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    catalog.serialize(&mut ser)?;
    Ok(buf)
}
