use super::calculators::SizeTag;
use super::metrics::Metrics;
use crate::Probability;
use crate::gameplay::Action;
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::RwLock;
use std::time::SystemTime;

/// Version stamp shared by every entry of one artifact.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TableMeta {
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub policy_hash: Option<String>,
}

/// One node of a precomputed mixed strategy.
///
/// `weights` are normalized to sum to one. An all-zero row becomes a pure
/// strategy on its first action. `raw_weights` keeps the artifact's values.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct PolicyEntry {
    pub node_key: String,
    pub actions: Vec<Action>,
    pub weights: Vec<Probability>,
    pub raw_weights: Vec<Probability>,
    pub size_tags: Vec<Option<SizeTag>>,
    pub meta: Value,
    pub table_meta: TableMeta,
}

impl PolicyEntry {
    pub fn new(
        node_key: String,
        actions: Vec<Action>,
        raw_weights: Vec<Probability>,
        size_tags: Vec<Option<SizeTag>>,
        meta: Value,
        table_meta: TableMeta,
    ) -> Self {
        Self {
            weights: normalize(&raw_weights),
            node_key,
            actions,
            raw_weights,
            size_tags,
            meta,
            table_meta,
        }
    }
}

fn normalize(raw: &[Probability]) -> Vec<Probability> {
    let clean = raw.iter().map(|w| w.max(0.)).collect::<Vec<_>>();
    let total = clean.iter().sum::<Probability>();
    match total {
        t if t > 0. => clean.iter().map(|w| w / t).collect(),
        _ => (0..raw.len()).map(|i| if i == 0 { 1. } else { 0. }).collect(),
    }
}

/// Parallel arrays as written by the offline solver.
#[derive(Debug, Default, serde::Deserialize)]
struct Artifact {
    #[serde(default)]
    node_keys: Vec<String>,
    #[serde(default)]
    actions: Vec<Vec<String>>,
    #[serde(default)]
    weights: Vec<Vec<Probability>>,
    #[serde(default)]
    size_tags: Vec<Vec<Option<String>>>,
    #[serde(default)]
    meta: Vec<Value>,
    #[serde(default)]
    table_meta: TableMeta,
}

impl Artifact {
    fn entries(self, source: &Path) -> anyhow::Result<Vec<PolicyEntry>> {
        let n = self.node_keys.len();
        if self.actions.len() != n || self.weights.len() != n {
            return Err(anyhow::anyhow!(
                "{}: {} keys but {} action rows and {} weight rows",
                source.display(),
                n,
                self.actions.len(),
                self.weights.len()
            ));
        }
        let mut entries = Vec::with_capacity(n);
        for (i, key) in self.node_keys.into_iter().enumerate() {
            let actions = self.actions[i]
                .iter()
                .map(|a| Action::try_from(a.as_str()))
                .collect::<Result<Vec<_>, _>>()
                .map_err(|e| anyhow::anyhow!("{}: row {}: {}", source.display(), key, e))?;
            let weights = self.weights[i].clone();
            if weights.len() != actions.len() {
                return Err(anyhow::anyhow!("{}: row {} has mismatched weights", source.display(), key));
            }
            let tags = self
                .size_tags
                .get(i)
                .map(|row| row.iter().map(|t| t.as_deref().and_then(parse_tag)).collect())
                .unwrap_or_else(|| vec![None; actions.len()]);
            let meta = self.meta.get(i).cloned().unwrap_or(Value::Null);
            entries.push(PolicyEntry::new(key, actions, weights, tags, meta, self.table_meta.clone()));
        }
        Ok(entries)
    }
}

/// `none`, `na` and `n/a` mean no size.
fn parse_tag(tag: &str) -> Option<SizeTag> {
    match tag.trim().to_lowercase().as_str() {
        "" | "none" | "na" | "n/a" => None,
        other => SizeTag::try_from(other).ok(),
    }
}

type Table = BTreeMap<String, Arc<PolicyEntry>>;
type Stamp = Vec<(PathBuf, Option<SystemTime>, u64)>;

/// Lazily loaded policy table with hot reload.
///
/// Every lookup compares the `(mtime, size)` of the source files with the
/// last successful load. On change the whole table is rebuilt and swapped
/// in. A failed rebuild keeps serving the previous table and is retried on
/// the next lookup.
pub struct PolicyLoader {
    path: PathBuf,
    table: RwLock<Arc<Table>>,
    stamp: RwLock<Option<Stamp>>,
    metrics: Arc<dyn Metrics>,
}

impl PolicyLoader {
    pub fn new(path: PathBuf, metrics: Arc<dyn Metrics>) -> Self {
        Self {
            path,
            table: RwLock::new(Arc::new(Table::new())),
            stamp: RwLock::new(None),
            metrics,
        }
    }
    pub fn path(&self) -> &Path {
        &self.path
    }
    pub fn lookup(&self, key: &str) -> Option<Arc<PolicyEntry>> {
        self.refresh();
        let hit = self.table.read().ok().and_then(|t| t.get(key).cloned());
        match hit {
            Some(entry) => {
                self.metrics.increment("policy_lookup_hit", &[]);
                Some(entry)
            }
            None => {
                self.metrics.increment("policy_lookup_miss", &[("node_key", key)]);
                log::info!("policy lookup miss {}", key);
                None
            }
        }
    }
    pub fn len(&self) -> usize {
        self.refresh();
        self.table.read().map(|t| t.len()).unwrap_or(0)
    }
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
    fn refresh(&self) {
        let stamp = match self.sources().map(|files| stamp(&files)) {
            Ok(stamp) => stamp,
            Err(e) => {
                log::warn!("policy sources unavailable: {}", e);
                return;
            }
        };
        if self.stamp.read().ok().is_some_and(|s| s.as_ref() == Some(&stamp)) {
            return;
        }
        match self.read(&stamp) {
            Ok(table) => {
                log::debug!("loaded {} policy entries from {}", table.len(), self.path.display());
                if let Ok(mut slot) = self.table.write() {
                    *slot = Arc::new(table);
                }
                if let Ok(mut slot) = self.stamp.write() {
                    *slot = Some(stamp);
                }
            }
            Err(e) => log::warn!("policy reload failed, keeping previous table: {}", e),
        }
    }
    fn sources(&self) -> anyhow::Result<Vec<PathBuf>> {
        if self.path.is_dir() {
            let mut files = std::fs::read_dir(&self.path)
                .map_err(|e| anyhow::anyhow!("list {}: {}", self.path.display(), e))?
                .filter_map(|e| e.ok().map(|e| e.path()))
                .filter(|p| p.extension().is_some_and(|x| x == "json"))
                .collect::<Vec<_>>();
            files.sort();
            Ok(files)
        } else if self.path.is_file() {
            Ok(vec![self.path.clone()])
        } else {
            Err(anyhow::anyhow!("{} does not exist", self.path.display()))
        }
    }
    fn read(&self, stamp: &Stamp) -> anyhow::Result<Table> {
        let mut table = Table::new();
        for (file, _, _) in stamp {
            let text = std::fs::read_to_string(file).map_err(|e| anyhow::anyhow!("read {}: {}", file.display(), e))?;
            let artifact = serde_json::from_str::<Artifact>(&text)
                .map_err(|e| anyhow::anyhow!("parse {}: {}", file.display(), e))?;
            for entry in artifact.entries(file)? {
                table.insert(entry.node_key.clone(), Arc::new(entry));
            }
        }
        Ok(table)
    }
}

fn stamp(files: &[PathBuf]) -> Stamp {
    files
        .iter()
        .map(|f| {
            let meta = std::fs::metadata(f).ok();
            let mtime = meta.as_ref().and_then(|m| m.modified().ok());
            let size = meta.map(|m| m.len()).unwrap_or(0);
            (f.clone(), mtime, size)
        })
        .collect()
}

/// One loader per artifact path, shared across requests.
pub struct PolicyLoaderFactory {
    metrics: Arc<dyn Metrics>,
    loaders: RwLock<BTreeMap<PathBuf, Arc<PolicyLoader>>>,
}

impl PolicyLoaderFactory {
    pub fn new(metrics: Arc<dyn Metrics>) -> Self {
        Self {
            metrics,
            loaders: RwLock::new(BTreeMap::new()),
        }
    }
    pub fn get(&self, path: &Path) -> Arc<PolicyLoader> {
        if let Some(loader) = self.loaders.read().ok().and_then(|m| m.get(path).cloned()) {
            return loader;
        }
        let loader = Arc::new(PolicyLoader::new(path.to_path_buf(), self.metrics.clone()));
        if let Ok(mut map) = self.loaders.write() {
            return map.entry(path.to_path_buf()).or_insert(loader).clone();
        }
        loader
    }
    /// Forgets every loader so the next request reads from scratch.
    pub fn invalidate(&self) {
        if let Ok(mut map) = self.loaders.write() {
            map.clear();
        }
    }
}
