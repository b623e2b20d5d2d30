//! Bundle loader: populates a [`ModuleRegistry`] from ordered bundles.
//!
//! Bundles are processed strictly in order; earlier bundles win every
//! first-wins conflict. Each bundle goes through two phases:
//!
//! 1. **Index**: string leaves of the index document become aliases
//!    (key → target id), nested maps are descended into.
//! 2. **Scan**: every file becomes a module. YAML documents with an `id`
//!    register as `<id>/<version>`; everything else registers as
//!    `<bundle name>/<relative path>` with type `RESOURCE`, version `1.0`.
//!
//! After the last bundle the registry is validated; a dangling alias aborts
//! the load.

use std::path::Path;

use dcl_core::{ConfigurationError, DEFAULT_MODULE_TYPE, DEFAULT_MODULE_VERSION, Module};
use serde::Serialize;
use serde_yaml::Value;
use tracing::{debug, info, warn};

use crate::decode::{DocumentDecoder, YamlDecoder, scalar_field};
use crate::registry::{ModuleRegistry, Registration};
use crate::source::{ContentSource, DEFAULT_INDEX_FILE, DirectorySource, SourceEntry};

/// Index key whose mapping, when present, holds the alias tree.
const ALIASES_KEY: &str = "aliases";

/// Per-bundle load statistics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BundleReport {
    pub name: String,
    /// False when the bundle could not be found and was skipped.
    pub found: bool,
    pub modules_inserted: usize,
    pub modules_skipped: usize,
    pub aliases_inserted: usize,
    pub aliases_skipped: usize,
}

/// Statistics for a whole load, one entry per bundle in precedence order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    pub bundles: Vec<BundleReport>,
}

impl LoadReport {
    pub fn modules_inserted(&self) -> usize {
        self.bundles.iter().map(|b| b.modules_inserted).sum()
    }

    pub fn aliases_inserted(&self) -> usize {
        self.bundles.iter().map(|b| b.aliases_inserted).sum()
    }

    /// Registrations dropped by first-wins.
    pub fn duplicates_skipped(&self) -> usize {
        self.bundles
            .iter()
            .map(|b| b.modules_skipped + b.aliases_skipped)
            .sum()
    }
}

/// Loads bundles into a registry.
#[derive(Debug, Clone)]
pub struct BundleLoader<D = YamlDecoder> {
    decoder: D,
    index_file: String,
}

impl BundleLoader<YamlDecoder> {
    pub fn new() -> Self {
        Self {
            decoder: YamlDecoder,
            index_file: DEFAULT_INDEX_FILE.into(),
        }
    }
}

impl Default for BundleLoader<YamlDecoder> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: DocumentDecoder> BundleLoader<D> {
    /// Use a different document decoder for the scan phase.
    pub fn with_decoder<E: DocumentDecoder>(self, decoder: E) -> BundleLoader<E> {
        BundleLoader {
            decoder,
            index_file: self.index_file,
        }
    }

    /// Index document name used for directory bundles.
    pub fn with_index_file(mut self, index_file: impl Into<String>) -> Self {
        self.index_file = index_file.into();
        self
    }

    /// Load directory bundles in precedence order and validate the result.
    pub fn load_bundles<P: AsRef<Path>>(
        &self,
        roots: &[P],
    ) -> Result<(ModuleRegistry, LoadReport), ConfigurationError> {
        let sources: Vec<DirectorySource> = roots
            .iter()
            .map(|root| DirectorySource::new(root.as_ref()).with_index_file(&self.index_file))
            .collect();
        let refs: Vec<&dyn ContentSource> = sources.iter().map(|s| s as &dyn ContentSource).collect();
        self.load(&refs)
    }

    /// Load arbitrary sources in precedence order and validate the result.
    pub fn load(
        &self,
        sources: &[&dyn ContentSource],
    ) -> Result<(ModuleRegistry, LoadReport), ConfigurationError> {
        let mut registry = ModuleRegistry::new();
        let mut report = LoadReport::default();

        for source in sources {
            report.bundles.push(self.load_bundle(&mut registry, *source));
        }

        registry.validate()?;

        info!(
            bundles = report.bundles.len(),
            modules = registry.len(),
            aliases = registry.alias_count(),
            duplicates = report.duplicates_skipped(),
            "Registry loaded and validated"
        );
        Ok((registry, report))
    }

    /// Run the index and scan phases of one bundle against `registry`.
    ///
    /// Does not validate; call [`ModuleRegistry::validate`] once every bundle is in.
    pub fn load_bundle(&self, registry: &mut ModuleRegistry, source: &dyn ContentSource) -> BundleReport {
        let mut report = BundleReport {
            name: source.name().to_string(),
            ..BundleReport::default()
        };

        if !source.available() {
            warn!(bundle = %report.name, "Bundle does not exist, skipping");
            return report;
        }
        report.found = true;

        self.index_phase(registry, source, &mut report);
        self.scan_phase(registry, source, &mut report);

        debug!(
            bundle = %report.name,
            modules = report.modules_inserted,
            aliases = report.aliases_inserted,
            "Bundle loaded"
        );
        report
    }

    fn index_phase(&self, registry: &mut ModuleRegistry, source: &dyn ContentSource, report: &mut BundleReport) {
        let text = match source.index_document() {
            Ok(Some(text)) => text,
            Ok(None) => return,
            Err(e) => {
                warn!(bundle = %report.name, error = %e, "Failed to read index document");
                return;
            }
        };

        let doc: Value = match serde_yaml::from_str(&text) {
            Ok(doc) => doc,
            Err(e) => {
                warn!(bundle = %report.name, error = %e, "Failed to decode index document");
                return;
            }
        };

        for (name, target) in collect_aliases(&doc) {
            match registry.register_alias(name, target) {
                Registration::Inserted => report.aliases_inserted += 1,
                Registration::AlreadyExists => {
                    warn!(bundle = %report.name, alias = %name, "Alias already exists, keeping original");
                    report.aliases_skipped += 1;
                }
            }
        }
    }

    fn scan_phase(&self, registry: &mut ModuleRegistry, source: &dyn ContentSource, report: &mut BundleReport) {
        let entries = match source.entries() {
            Ok(entries) => entries,
            Err(e) => {
                warn!(bundle = %report.name, error = %e, "Failed to scan bundle");
                return;
            }
        };

        for entry in entries {
            let module = self.build_module(source.name(), entry);
            let id = module.id.clone();
            match registry.register(module) {
                Registration::Inserted => report.modules_inserted += 1,
                Registration::AlreadyExists => {
                    warn!(bundle = %report.name, module_id = %id, "Module ID already exists, keeping original");
                    report.modules_skipped += 1;
                }
            }
        }
    }

    /// Build a module from a file: explicit id from a decoded document, or a
    /// path-based fallback.
    fn build_module(&self, bundle_name: &str, entry: SourceEntry) -> Module {
        let SourceEntry {
            relative_path,
            content,
            path,
        } = entry;

        let mut module = None;
        if self.decoder.accepts(&relative_path) {
            match self.decoder.decode(&content) {
                Ok(map) => {
                    if let Some(id) = scalar_field(&map, "id") {
                        let version = scalar_field(&map, "version").unwrap_or_else(|| DEFAULT_MODULE_VERSION.into());
                        let module_type = scalar_field(&map, "type").unwrap_or_else(|| DEFAULT_MODULE_TYPE.into());
                        module = Some(
                            Module::new(format!("{id}/{version}"), version, module_type, content.clone())
                                .with_metadata(map),
                        );
                    }
                }
                Err(e) => {
                    debug!(bundle = %bundle_name, file = %relative_path, error = %e, "Not a structured document, loading raw");
                }
            }
        }

        let module = module.unwrap_or_else(|| {
            Module::new(
                format!("{bundle_name}/{relative_path}"),
                DEFAULT_MODULE_VERSION,
                DEFAULT_MODULE_TYPE,
                content,
            )
        });

        match path {
            Some(path) => module.with_source_path(path),
            None => module,
        }
    }
}

/// Walk an index document and collect `(alias, target)` pairs.
///
/// If the document has a top-level `aliases` mapping only that subtree is
/// walked. Entries come out depth-first in document order. The walk uses an
/// explicit stack, so nesting depth is bounded by the heap.
fn collect_aliases(doc: &Value) -> Vec<(&str, &str)> {
    let root = match doc.get(ALIASES_KEY) {
        Some(subtree) if subtree.is_mapping() => subtree,
        _ => doc,
    };
    let Value::Mapping(root) = root else {
        return Vec::new();
    };

    let mut pairs = Vec::new();
    // Entries are pushed in reverse so the next one in document order is on top
    let mut stack: Vec<(&Value, &Value)> = root.iter().collect::<Vec<_>>().into_iter().rev().collect();

    while let Some((key, value)) = stack.pop() {
        match value {
            Value::String(target) => match key.as_str() {
                Some(name) => pairs.push((name, target.as_str())),
                None => debug!(?key, "Ignoring alias with non-string key"),
            },
            Value::Mapping(map) => stack.extend(map.iter().collect::<Vec<_>>().into_iter().rev()),
            _ => {}
        }
    }

    pairs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::StaticSource;
    use tempfile::TempDir;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
    }

    fn bundle(temp: &TempDir, name: &str, index: Option<&str>, files: &[(&str, &str)]) -> std::path::PathBuf {
        let root = temp.path().join(name);
        std::fs::create_dir_all(&root).unwrap();
        if let Some(index) = index {
            write(&root, "index.yaml", index);
        }
        for (rel, content) in files {
            write(&root, rel, content);
        }
        root
    }

    #[test]
    fn load_directory() {
        let temp = TempDir::new().unwrap();
        let root = bundle(
            &temp,
            "b",
            None,
            &[
                ("mod1.yaml", "id: sys/ops/write\nversion: 1.0\ntype: OPERATOR\ncontent: abc"),
                ("sub/mod2.yaml", "id: domain/lens/tone\nversion: 2.1\ntype: MODIFIER\ncontent: xyz"),
                (".hidden.yaml", "id: hidden\ntype: TEST"),
            ],
        );

        let (registry, _) = BundleLoader::new().load_bundles(&[root]).unwrap();
        assert_eq!(registry.len(), 2);
        let write_op = registry.get("sys/ops/write/1.0").unwrap();
        assert_eq!(write_op.module_type, "OPERATOR");
        assert_eq!(write_op.metadata["content"], "abc");
        assert!(write_op.content.starts_with("id: sys/ops/write"));
        assert!(write_op.source_path.as_ref().unwrap().ends_with("mod1.yaml"));
        assert!(registry.get("domain/lens/tone/2.1").is_some());
        assert!(registry.get("hidden").is_none());
    }

    #[test]
    fn raw_resource_fallback_id() {
        let temp = TempDir::new().unwrap();
        let root = bundle(&temp, "my_bundle", None, &[("data/note.txt", "Just some text")]);

        let (registry, _) = BundleLoader::new().load_bundles(&[root]).unwrap();
        let module = registry.get("my_bundle/data/note.txt").unwrap();
        assert_eq!(module.module_type, "RESOURCE");
        assert_eq!(module.version, "1.0");
        assert_eq!(module.content, "Just some text");
        assert!(module.metadata.is_empty());
    }

    #[test]
    fn unknown_extension_loaded_raw() {
        let temp = TempDir::new().unwrap();
        let root = bundle(&temp, "permissive", None, &[("script.lua", "print('lua')")]);

        let (registry, _) = BundleLoader::new().load_bundles(&[root]).unwrap();
        assert!(registry.get("permissive/script.lua").unwrap().content.contains("lua"));
    }

    #[test]
    fn yaml_looking_text_file_is_raw() {
        let temp = TempDir::new().unwrap();
        let root = bundle(&temp, "b", None, &[("noid.txt", "type: TEST\ncontent: foo")]);

        let (registry, _) = BundleLoader::new().load_bundles(&[root]).unwrap();
        let module = registry.get("b/noid.txt").unwrap();
        assert_eq!(module.module_type, "RESOURCE");
    }

    #[test]
    fn yaml_without_id_falls_back() {
        let temp = TempDir::new().unwrap();
        let root = bundle(&temp, "b", None, &[("cfg.yaml", "type: OPERATOR\nversion: 3")]);

        let (registry, _) = BundleLoader::new().load_bundles(&[root]).unwrap();
        let module = registry.get("b/cfg.yaml").unwrap();
        assert_eq!(module.module_type, "RESOURCE");
        assert_eq!(module.version, "1.0");
    }

    #[test]
    fn yaml_defaults_version_and_type() {
        let source = StaticSource::new("s").with_file("m.yaml", "id: bare");
        let (registry, _) = BundleLoader::new().load(&[&source]).unwrap();
        let module = registry.get("bare/1.0").unwrap();
        assert_eq!(module.module_type, "RESOURCE");
        assert_eq!(module.version, "1.0");
    }

    #[test]
    fn simple_alias() {
        let source = StaticSource::new("bundle1")
            .with_index("aliases:\n  MyAlias: mod/1/1.0\n  operators: {}\n  entities: {}\n")
            .with_file("m.yaml", "id: mod/1\nversion: 1.0\ntype: test\ncontent: content");

        let (registry, report) = BundleLoader::new().load(&[&source]).unwrap();
        assert_eq!(registry.get("MyAlias"), registry.get("mod/1/1.0"));
        assert!(registry.get("MyAlias").is_some());
        assert_eq!(report.aliases_inserted(), 1);
    }

    #[test]
    fn nested_alias_groups() {
        let source = StaticSource::new("b")
            .with_index("aliases:\n  operators:\n    WRITE: b/w.txt\n  entities:\n    deep:\n      NOTE: b/n.txt\n    count: 3\n")
            .with_file("w.txt", "write")
            .with_file("n.txt", "note");

        let (registry, _) = BundleLoader::new().load(&[&source]).unwrap();
        assert_eq!(registry.get("WRITE").unwrap().content, "write");
        assert_eq!(registry.get("NOTE").unwrap().content, "note");
        assert!(registry.alias_target("count").is_none());
    }

    #[test]
    fn top_level_index_without_aliases_key() {
        let source = StaticSource::new("b_alias")
            .with_index("MY_NOTE: b_alias/note.txt\n")
            .with_file("note.txt", "Aliased Content");

        let (registry, _) = BundleLoader::new().load(&[&source]).unwrap();
        let resolved = registry.get("MY_NOTE").unwrap();
        assert_eq!(resolved.content, "Aliased Content");
        assert_eq!(resolved.id, "b_alias/note.txt");
    }

    #[test]
    fn alias_first_wins_follows_bundle_order() {
        let b1 = StaticSource::new("b1")
            .with_index("aliases:\n  A: m/1/1.0\n")
            .with_file("m1.yaml", "id: m/1\nversion: 1.0\ntype: t");
        let b2 = StaticSource::new("b2")
            .with_index("aliases:\n  A: m/2/1.0\n")
            .with_file("m2.yaml", "id: m/2\nversion: 1.0\ntype: t");

        let (registry, report) = BundleLoader::new().load(&[&b1, &b2]).unwrap();
        assert_eq!(registry.get("A").unwrap().id, "m/1/1.0");
        assert_eq!(report.bundles[1].aliases_skipped, 1);

        let (registry, _) = BundleLoader::new().load(&[&b2, &b1]).unwrap();
        assert_eq!(registry.get("A").unwrap().id, "m/2/1.0");
    }

    #[test]
    fn module_first_wins_follows_bundle_order() {
        let b1 = StaticSource::new("b1").with_file("m.yaml", "id: m\nversion: 1\ntype: t\nmeta: v1");
        let b2 = StaticSource::new("b2").with_file("m.yaml", "id: m\nversion: 1\ntype: t\nmeta: v2");

        let (registry, report) = BundleLoader::new().load(&[&b1, &b2]).unwrap();
        assert_eq!(registry.get("m/1").unwrap().metadata["meta"], "v1");
        assert_eq!(report.bundles[1].modules_skipped, 1);
    }

    #[test]
    fn loading_same_bundle_twice_is_idempotent() {
        let temp = TempDir::new().unwrap();
        let root = bundle(
            &temp,
            "b",
            Some("aliases:\n  W: w/1.0\n"),
            &[("w.yaml", "id: w\ntype: OPERATOR"), ("notes/a.md", "# A")],
        );

        let (once, _) = BundleLoader::new().load_bundles(&[&root]).unwrap();
        let (twice, report) = BundleLoader::new().load_bundles(&[&root, &root]).unwrap();

        assert_eq!(once.list(), twice.list());
        assert_eq!(once.aliases().collect::<Vec<_>>(), twice.aliases().collect::<Vec<_>>());
        for id in once.list() {
            assert_eq!(once.get(id), twice.get(id));
        }
        assert_eq!(report.bundles[1].modules_inserted, 0);
        assert_eq!(report.bundles[1].aliases_inserted, 0);
        assert_eq!(report.duplicates_skipped(), 3);
    }

    #[test]
    fn dangling_alias_fails_load() {
        let source = StaticSource::new("b_broken").with_index("aliases:\n  Bad: non_existent\n");
        let err = BundleLoader::new().load(&[&source]).unwrap_err();
        assert_eq!(
            err,
            ConfigurationError::InvalidAlias {
                alias: "Bad".into(),
                target: "non_existent".into(),
            }
        );
    }

    #[test]
    fn alias_may_target_module_from_later_bundle() {
        let b1 = StaticSource::new("b1").with_index("LATE: b2/late.txt");
        let b2 = StaticSource::new("b2").with_file("late.txt", "from b2");

        let (registry, _) = BundleLoader::new().load(&[&b1, &b2]).unwrap();
        assert_eq!(registry.get("LATE").unwrap().content, "from b2");
    }

    #[test]
    fn missing_bundle_is_skipped() {
        let temp = TempDir::new().unwrap();
        let root = bundle(&temp, "real", None, &[("a.txt", "a")]);
        let missing = temp.path().join("missing");

        let (registry, report) = BundleLoader::new().load_bundles(&[missing, root]).unwrap();
        assert!(!report.bundles[0].found);
        assert!(report.bundles[1].found);
        assert!(registry.get("real/a.txt").is_some());
    }

    #[test]
    fn malformed_index_still_scans() {
        let source = StaticSource::new("b")
            .with_index("aliases: [unclosed")
            .with_file("a.txt", "a");

        let (registry, report) = BundleLoader::new().load(&[&source]).unwrap();
        assert_eq!(registry.alias_count(), 0);
        assert_eq!(report.modules_inserted(), 1);
    }

    #[test]
    fn custom_index_file_name() {
        let temp = TempDir::new().unwrap();
        let root = bundle(&temp, "b", None, &[("aliases.yml", "N: b/n.txt"), ("n.txt", "n")]);

        let (registry, _) = BundleLoader::new()
            .with_index_file("aliases.yml")
            .load_bundles(&[root])
            .unwrap();
        assert_eq!(registry.get("N").unwrap().content, "n");
        assert!(registry.get("b/aliases.yml").is_none());
    }

    #[test]
    fn deeply_nested_index() {
        let mut leaf = serde_yaml::Mapping::new();
        leaf.insert("DEEP".into(), "b/x.txt".into());
        let mut doc = Value::Mapping(leaf);
        for depth in 0..500 {
            let mut parent = serde_yaml::Mapping::new();
            parent.insert(format!("level{depth}").into(), doc);
            doc = Value::Mapping(parent);
        }

        assert_eq!(collect_aliases(&doc), vec![("DEEP", "b/x.txt")]);
    }

    #[test]
    fn aliases_follow_document_order() {
        let doc: Value =
            serde_yaml::from_str("first: a\ngroup:\n  inner: b\n  deeper:\n    leaf: c\nlast: d\n").unwrap();
        assert_eq!(
            collect_aliases(&doc),
            vec![("first", "a"), ("inner", "b"), ("leaf", "c"), ("last", "d")]
        );
    }

    #[test]
    fn nested_alias_registered_before_later_shallow_duplicate() {
        let source = StaticSource::new("b")
            .with_index("aliases:\n  group:\n    A: b/x.txt\n  A: b/y.txt\n")
            .with_file("x.txt", "x")
            .with_file("y.txt", "y");

        let (registry, report) = BundleLoader::new().load(&[&source]).unwrap();
        assert_eq!(registry.alias_target("A"), Some("b/x.txt"));
        assert_eq!(report.bundles[0].aliases_skipped, 1);
    }
}
