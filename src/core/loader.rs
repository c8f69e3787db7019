//! MT-009: Module loader — builds a [`ModuleTree`] from a project directory.
//!
//! Loading is synchronous and recursive. For each module the loader:
//! 1. resolves the module's declared variables from the inputs it was given,
//!    raising a missing-vars warning for any without a value,
//! 2. expands its raw blocks into `blocks` with those values,
//! 3. expands every `module` block into instances and loads each one as a
//!    child, passing the call's attributes as the child's inputs.
//!
//! Raw blocks are read once per module directory and shared by every
//! instance of that directory. Remote sources are recorded, not fetched.

use super::diagnostics::Warning;
use super::error::LoadError;
use super::expander::{self, Scope};
use super::module::{Module, ModuleCall, ModuleId, ModuleTree};
use super::parser;
use super::types::BlockRef;
use super::vars::{self, VarValues};
use rustc_hash::FxHashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Loader configuration, usually built from CLI flags.
#[derive(Debug, Clone, Default)]
pub struct LoaderOptions {
    /// Extra var files, relative to the project root unless absolute.
    pub var_files: Vec<PathBuf>,
    /// `NAME=VALUE` overrides, applied after every var file.
    pub vars: Vec<(String, String)>,
    /// Suffix recorded on the root module.
    pub module_suffix: Option<String>,
    /// Paths whose containing modules get `has_changes` set, relative to the
    /// project root unless absolute.
    pub changed_paths: Vec<PathBuf>,
}

/// Name given to the root module.
pub const ROOT_MODULE_NAME: &str = "root";

pub struct ModuleLoader {
    options: LoaderOptions,
    /// Raw blocks per module directory, valid for a single `load`.
    raw_cache: FxHashMap<PathBuf, Arc<[BlockRef]>>,
}

impl ModuleLoader {
    pub fn new(options: LoaderOptions) -> Self {
        Self {
            options,
            raw_cache: FxHashMap::default(),
        }
    }

    /// Load the module tree rooted at `root_path`. Block files are re-read on
    /// every call.
    pub fn load(&mut self, root_path: &Path) -> Result<ModuleTree, LoadError> {
        self.raw_cache.clear();
        let root_path = canonical_dir(root_path)?;
        debug!(path = %root_path.display(), "loading root module");

        let raw = self.raw_blocks(&root_path)?;
        let mut root = Module::new(ROOT_MODULE_NAME, ".", raw, &root_path, &root_path);
        root.module_suffix = self.options.module_suffix.clone();

        let (inputs, var_paths) = self.root_inputs(&root_path)?;
        root.terraform_vars_paths = var_paths;

        let (mut tree, root_id) = ModuleTree::new_root(root);
        let mut ancestors = vec![root_path.clone()];
        self.evaluate(&mut tree, root_id, &inputs, &mut ancestors)?;

        if !self.options.changed_paths.is_empty() {
            let changed: Vec<PathBuf> = self
                .options
                .changed_paths
                .iter()
                .map(|p| absolutize(&root_path, p))
                .collect();
            let marked = tree.mark_changed(&changed);
            debug!(marked, "marked changed modules");
        }

        info!(
            modules = tree.len(),
            warnings = tree.warnings().count(),
            "module tree loaded"
        );
        Ok(tree)
    }

    /// Values supplied to the root module: var files in discovery order, then
    /// explicit var files, then `NAME=VALUE` overrides. Later values win.
    fn root_inputs(&self, root_path: &Path) -> Result<(VarValues, Vec<PathBuf>), LoadError> {
        let mut paths = vars::discover_var_files(root_path);
        for file in &self.options.var_files {
            let file = absolutize(root_path, file);
            if !paths.contains(&file) {
                paths.push(file);
            }
        }

        let mut inputs = VarValues::new();
        for path in &paths {
            debug!(path = %path.display(), "reading var file");
            inputs.extend(vars::load_var_file(path)?);
        }
        for (name, value) in &self.options.vars {
            inputs.insert(name.clone(), serde_yaml_ng::Value::String(value.clone()));
        }
        Ok((inputs, paths))
    }

    fn raw_blocks(&mut self, dir: &Path) -> Result<Arc<[BlockRef]>, LoadError> {
        if let Some(raw) = self.raw_cache.get(dir) {
            return Ok(Arc::clone(raw));
        }
        let raw = parser::load_module_blocks(dir)?;
        self.raw_cache.insert(dir.to_path_buf(), Arc::clone(&raw));
        Ok(raw)
    }

    fn evaluate(
        &mut self,
        tree: &mut ModuleTree,
        id: ModuleId,
        provided: &VarValues,
        ancestors: &mut Vec<PathBuf>,
    ) -> Result<(), LoadError> {
        let declared =
            vars::declared_variables(tree.get(id).raw_blocks().iter().map(Arc::as_ref));
        let (values, missing) = vars::resolve_inputs(&declared, provided);
        if !missing.is_empty() {
            debug!(
                module = %tree.address(id),
                missing = ?missing,
                "input values missing"
            );
            tree.get_mut(id).push_warning(Warning::missing_vars(missing));
        }

        let blocks =
            expander::expand_blocks(tree.get(id).raw_blocks(), &Scope::with_vars(values));
        tree.get_mut(id).blocks = blocks.clone();

        let module_path = tree.get(id).module_path.clone();
        let root_path = tree.get(id).root_path.clone();

        for block in blocks.iter().filter(|b| b.is_module()) {
            let call_name = block.name().unwrap_or_default();
            let source = block.attr_str("source").unwrap_or_default().to_string();

            let local_dir = if is_local_source(&source) {
                let dir = resolve_local(&module_path, &source).ok_or_else(|| {
                    LoadError::ModuleNotFound {
                        call: call_name.to_string(),
                        source_path: source.clone(),
                        resolved: module_path.join(&source),
                    }
                })?;
                if ancestors.contains(&dir) {
                    return Err(LoadError::ModuleCycle {
                        call: call_name.to_string(),
                        path: dir,
                    });
                }
                Some(dir)
            } else {
                None
            };

            for instance in expander::expand_call(block)? {
                let call_block = expander::expand_block(block, &instance.scope);
                let inputs = vars::call_inputs(&call_block);

                let (child, call_path) = match local_dir {
                    Some(ref dir) => {
                        debug!(module = %instance.name, path = %dir.display(), "loading module");
                        let raw = self.raw_blocks(dir)?;
                        let child = Module::new(&instance.name, &source, raw, &root_path, dir);
                        (child, dir.clone())
                    }
                    None => {
                        warn!(
                            module = %instance.name,
                            source = %source,
                            "remote module source not fetched"
                        );
                        let mut child = Module::new(
                            &instance.name,
                            &source,
                            Arc::from(Vec::new()),
                            &root_path,
                            PathBuf::new(),
                        );
                        child.source_url = Some(source.clone());
                        (child, PathBuf::new())
                    }
                };

                let call = ModuleCall::new(&instance.name, call_path, Arc::clone(block));
                let child_id = tree.attach(id, call, child)?;

                if let Some(ref dir) = local_dir {
                    ancestors.push(dir.clone());
                    self.evaluate(tree, child_id, &inputs, ancestors)?;
                    ancestors.pop();
                }
            }
        }

        Ok(())
    }
}

/// Load the module tree at `root_path` with `options`.
pub fn load_tree(root_path: &Path, options: LoaderOptions) -> Result<ModuleTree, LoadError> {
    ModuleLoader::new(options).load(root_path)
}

/// Local module sources start with `./` or `../`; anything else is remote.
pub fn is_local_source(source: &str) -> bool {
    source == "."
        || source == ".."
        || source.starts_with("./")
        || source.starts_with("../")
        || source.starts_with(".\\")
        || source.starts_with("..\\")
}

fn resolve_local(module_path: &Path, source: &str) -> Option<PathBuf> {
    let dir = module_path.join(source).canonicalize().ok()?;
    dir.is_dir().then_some(dir)
}

fn canonical_dir(path: &Path) -> Result<PathBuf, LoadError> {
    let dir = path.canonicalize().map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    if !dir.is_dir() {
        return Err(LoadError::Io {
            path: dir,
            source: std::io::Error::new(std::io::ErrorKind::InvalidInput, "not a directory"),
        });
    }
    Ok(dir)
}

fn absolutize(root: &Path, path: &Path) -> PathBuf {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    };
    joined.canonicalize().unwrap_or(joined)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::diagnostics::{WarningCode, WarningData};

    fn write(dir: &Path, rel: &str, content: &str) {
        let path = dir.join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
    }

    const VPC_MODULE: &str = r#"
blocks:
  - type: variable
    labels: [cidr]
  - type: variable
    labels: [name]
    attributes:
      default: main
  - type: resource
    labels: [aws_vpc, this]
    attributes:
      cidr_block: "{{var.cidr}}"
      tags:
        Name: "{{var.name}}"
"#;

    fn counted_project() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "main.tf.yaml",
            r#"
blocks:
  - type: module
    labels: [vpc]
    attributes:
      source: ./modules/vpc
      count: 2
      cidr: "10.{{count.index}}.0.0/16"
"#,
        );
        write(dir.path(), "modules/vpc/main.tf.yaml", VPC_MODULE);
        dir
    }

    #[test]
    fn test_mt009_counted_instances() {
        let dir = counted_project();
        let tree = load_tree(dir.path(), LoaderOptions::default()).unwrap();
        let root = tree.root();

        assert_eq!(tree.get(root).name(), "root");
        assert!(tree.get(root).is_root());
        let children: Vec<_> = tree.children(root).collect();
        assert_eq!(children.len(), 2);

        let (id0, vpc0) = children[0];
        let (id1, vpc1) = children[1];
        assert_eq!(vpc0.name(), "vpc[0]");
        assert_eq!(vpc1.name(), "vpc[1]");
        assert_eq!(vpc0.index(), Some(0));
        assert_eq!(vpc1.index(), Some(1));
        assert_eq!(vpc0.key(), None);
        assert_eq!(vpc0.parent(), Some(root));
        assert_eq!(vpc1.parent(), Some(root));

        assert!(Arc::ptr_eq(vpc0.raw_blocks(), vpc1.raw_blocks()));
        assert_eq!(
            vpc0.raw_blocks()[2].attr_str("cidr_block"),
            Some("{{var.cidr}}")
        );
        assert_eq!(vpc0.blocks[2].attr_str("cidr_block"), Some("10.0.0.0/16"));
        assert_eq!(vpc1.blocks[2].attr_str("cidr_block"), Some("10.1.0.0/16"));

        let calls = tree.get(root).calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].name, "vpc[0]");
        assert_eq!(calls[0].module, Some(id0));
        assert_eq!(calls[1].module, Some(id1));
        assert!(Arc::ptr_eq(&calls[0].definition, &calls[1].definition));
        assert!(Arc::ptr_eq(&calls[0].definition, &tree.get(root).blocks[0]));
        assert!(tree.warnings().next().is_none());
    }

    #[test]
    fn test_mt009_for_each_instances() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "main.tf.yaml",
            r#"
blocks:
  - type: module
    labels: [vpc]
    attributes:
      source: ./modules/vpc
      for_each:
        west: 10.1.0.0/16
        east: 10.0.0.0/16
      cidr: "{{each.value}}"
      name: "{{each.key}}"
"#,
        );
        write(dir.path(), "modules/vpc/main.tf.yaml", VPC_MODULE);

        let tree = load_tree(dir.path(), LoaderOptions::default()).unwrap();
        let east = tree.child_named(tree.root(), r#"vpc["east"]"#).unwrap();
        let m = tree.get(east);
        assert_eq!(m.key().as_deref(), Some("east"));
        assert_eq!(m.index(), None);
        assert_eq!(m.blocks[2].attr_str("cidr_block"), Some("10.0.0.0/16"));
        let tags = &m.blocks[2].attributes["tags"];
        assert_eq!(tags["Name"], serde_yaml_ng::Value::from("east"));
    }

    #[test]
    fn test_mt009_missing_vars_warning_on_owner_only() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "main.tf.yaml",
            r#"
blocks:
  - type: variable
    labels: [region]
  - type: variable
    labels: [zone]
  - type: module
    labels: [vpc]
    attributes:
      source: ./modules/vpc
"#,
        );
        write(dir.path(), "modules/vpc/main.tf.yaml", VPC_MODULE);

        let tree = load_tree(dir.path(), LoaderOptions::default()).unwrap();
        let root = tree.get(tree.root());
        assert_eq!(root.warnings().len(), 1);
        let w = &root.warnings()[0];
        assert_eq!(w.code(), WarningCode::MissingVars);
        assert_eq!(
            w.data(),
            &WarningData::MissingVars(vec!["region".into(), "zone".into()])
        );

        let vpc = tree.child_named(tree.root(), "vpc").unwrap();
        let vpc_warnings = tree.get(vpc).warnings();
        assert_eq!(vpc_warnings.len(), 1);
        assert_eq!(
            vpc_warnings[0].data(),
            &WarningData::MissingVars(vec!["cidr".into()])
        );
        assert_eq!(tree.warnings().count(), 2);
        assert_eq!(
            tree.get(vpc).blocks[2].attr_str("cidr_block"),
            Some("{{var.cidr}}")
        );
    }

    #[test]
    fn test_mt009_var_files_and_overrides() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "main.tf.yaml",
            r#"
blocks:
  - type: variable
    labels: [a]
  - type: variable
    labels: [b]
  - type: variable
    labels: [c]
  - type: output
    labels: [summary]
    attributes:
      value: "{{var.a}}/{{var.b}}/{{var.c}}"
"#,
        );
        write(dir.path(), "terraform.tfvars.yaml", "a: file\nb: file\nc: file\n");
        write(dir.path(), "x.auto.tfvars.yaml", "b: auto\n");
        write(dir.path(), "env/prod.tfvars.yaml", "c: explicit\n");

        let options = LoaderOptions {
            var_files: vec![PathBuf::from("env/prod.tfvars.yaml")],
            vars: vec![("a".into(), "cli".into())],
            ..LoaderOptions::default()
        };
        let tree = load_tree(dir.path(), options).unwrap();
        let root = tree.get(tree.root());
        assert!(root.warnings().is_empty());
        assert_eq!(root.blocks[3].attr_str("value"), Some("cli/auto/explicit"));
        assert_eq!(root.terraform_vars_paths.len(), 3);
        assert!(root.terraform_vars_paths[0].ends_with("terraform.tfvars.yaml"));
        assert!(root.terraform_vars_paths[2].ends_with("env/prod.tfvars.yaml"));
    }

    #[test]
    fn test_mt009_remote_source_recorded() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "main.tf.yaml",
            r#"
blocks:
  - type: module
    labels: [eks]
    attributes:
      source: terraform-aws-modules/eks/aws
      version: "19.0"
"#,
        );
        let tree = load_tree(dir.path(), LoaderOptions::default()).unwrap();
        let eks = tree.child_named(tree.root(), "eks").unwrap();
        let m = tree.get(eks);
        assert!(m.is_remote());
        assert_eq!(m.source_url.as_deref(), Some("terraform-aws-modules/eks/aws"));
        assert!(m.blocks.is_empty());
        assert!(m.modules().is_empty());
    }

    #[test]
    fn test_mt009_module_not_found() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "main.tf.yaml",
            concat!(
                "blocks:\n",
                "  - type: module\n",
                "    labels: [ghost]\n",
                "    attributes:\n",
                "      source: ./nope\n",
            ),
        );
        let err = load_tree(dir.path(), LoaderOptions::default()).unwrap_err();
        assert!(matches!(err, LoadError::ModuleNotFound { .. }));
    }

    #[test]
    fn test_mt009_cycle_rejected() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "a/main.tf.yaml",
            "blocks:\n  - type: module\n    labels: [b]\n    attributes:\n      source: ../b\n",
        );
        write(
            dir.path(),
            "b/main.tf.yaml",
            "blocks:\n  - type: module\n    labels: [a]\n    attributes:\n      source: ../a\n",
        );
        write(
            dir.path(),
            "main.tf.yaml",
            "blocks:\n  - type: module\n    labels: [a]\n    attributes:\n      source: ./a\n",
        );
        let err = load_tree(dir.path(), LoaderOptions::default()).unwrap_err();
        assert!(matches!(err, LoadError::ModuleCycle { .. }));
    }

    #[test]
    fn test_mt009_same_module_reused_by_two_calls() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "main.tf.yaml",
            r#"
blocks:
  - type: module
    labels: [primary]
    attributes:
      source: ./modules/vpc
      cidr: 10.0.0.0/16
  - type: module
    labels: [secondary]
    attributes:
      source: ./modules/vpc
      cidr: 10.9.0.0/16
"#,
        );
        write(dir.path(), "modules/vpc/main.tf.yaml", VPC_MODULE);
        let tree = load_tree(dir.path(), LoaderOptions::default()).unwrap();
        let p = tree.get(tree.child_named(tree.root(), "primary").unwrap());
        let s = tree.get(tree.child_named(tree.root(), "secondary").unwrap());
        assert!(Arc::ptr_eq(p.raw_blocks(), s.raw_blocks()));
        assert_eq!(s.blocks[2].attr_str("cidr_block"), Some("10.9.0.0/16"));
    }

    #[test]
    fn test_mt009_nested_counted_modules() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "main.tf.yaml",
            concat!(
                "blocks:\n",
                "  - type: module\n",
                "    labels: [net]\n",
                "    attributes:\n",
                "      source: ./net\n",
                "      count: 2\n",
            ),
        );
        write(
            dir.path(),
            "net/main.tf.yaml",
            concat!(
                "blocks:\n",
                "  - type: module\n",
                "    labels: [subnet]\n",
                "    attributes:\n",
                "      source: ./subnet\n",
                "      count: 3\n",
            ),
        );
        write(dir.path(), "net/subnet/main.tf.yaml", "blocks: []\n");

        let tree = load_tree(dir.path(), LoaderOptions::default()).unwrap();
        assert_eq!(tree.len(), 1 + 2 + 6);
        for id in tree.walk() {
            for (child, m) in tree.children(id) {
                assert_eq!(m.parent(), Some(id));
                let parent = tree.parent_of(child).unwrap();
                assert_eq!(parent.name(), tree.get(id).name());
                assert!(parent.modules().contains(&child));
            }
        }
        let net1 = tree.child_named(tree.root(), "net[1]").unwrap();
        let sub2 = tree.child_named(net1, "subnet[2]").unwrap();
        assert_eq!(tree.address(sub2), "module.net[1].module.subnet[2]");
        assert_eq!(tree.depth(sub2), 2);
    }

    #[test]
    fn test_mt009_module_suffix_and_changes() {
        let dir = counted_project();
        let options = LoaderOptions {
            module_suffix: Some("dev".into()),
            changed_paths: vec![PathBuf::from("modules/vpc/main.tf.yaml")],
            ..LoaderOptions::default()
        };
        let tree = load_tree(dir.path(), options).unwrap();
        let root = tree.get(tree.root());
        assert_eq!(root.module_suffix.as_deref(), Some("dev"));
        assert!(!root.has_changes);
        for (_, child) in tree.children(tree.root()) {
            assert!(child.has_changes);
            assert_eq!(child.module_suffix, None);
        }
    }

    const COUNT_FROM_VAR: &str = r#"
blocks:
  - type: variable
    labels: [n]
  - type: module
    labels: [vpc]
    attributes:
      source: ./modules/vpc
      count: "{{var.n}}"
      cidr: "10.{{count.index}}.0.0/16"
"#;

    #[test]
    fn test_mt009_count_from_var() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "main.tf.yaml", COUNT_FROM_VAR);
        write(dir.path(), "modules/vpc/main.tf.yaml", VPC_MODULE);

        let options = LoaderOptions {
            vars: vec![("n".into(), "2".into())],
            ..LoaderOptions::default()
        };
        let tree = load_tree(dir.path(), options).unwrap();
        let names: Vec<_> = tree.children(tree.root()).map(|(_, m)| m.name()).collect();
        assert_eq!(names, vec!["vpc[0]", "vpc[1]"]);
        assert!(tree.warnings().next().is_none());

        write(dir.path(), "terraform.tfvars.yaml", "n: 3\n");
        let tree = load_tree(dir.path(), LoaderOptions::default()).unwrap();
        assert_eq!(tree.children(tree.root()).count(), 3);
        let vpc2 = tree.child_named(tree.root(), "vpc[2]").unwrap();
        assert_eq!(
            tree.get(vpc2).blocks[2].attr_str("cidr_block"),
            Some("10.2.0.0/16")
        );
    }

    #[test]
    fn test_mt009_count_from_missing_var() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "main.tf.yaml", COUNT_FROM_VAR);
        write(dir.path(), "modules/vpc/main.tf.yaml", VPC_MODULE);

        let tree = load_tree(dir.path(), LoaderOptions::default()).unwrap();
        let root = tree.get(tree.root());
        assert_eq!(root.warnings().len(), 1);
        assert_eq!(
            root.warnings()[0].data(),
            &WarningData::MissingVars(vec!["n".into()])
        );

        let children: Vec<_> = tree.children(tree.root()).collect();
        assert_eq!(children.len(), 1);
        let (_, vpc) = children[0];
        assert_eq!(vpc.name(), "vpc");
        assert_eq!(vpc.index(), None);
        assert_eq!(tree.warnings().count(), 1);
    }

    #[test]
    fn test_mt009_for_each_from_var() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "main.tf.yaml",
            r#"
blocks:
  - type: variable
    labels: [regions]
  - type: module
    labels: [vpc]
    attributes:
      source: ./modules/vpc
      for_each: "{{var.regions}}"
      cidr: "{{each.value}}"
"#,
        );
        write(dir.path(), "modules/vpc/main.tf.yaml", VPC_MODULE);

        let tree = load_tree(dir.path(), LoaderOptions::default()).unwrap();
        let children: Vec<_> = tree.children(tree.root()).map(|(_, m)| m).collect();
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].name(), "vpc");
        assert_eq!(children[0].key(), None);
        assert_eq!(
            tree.get(tree.root()).warnings()[0].data(),
            &WarningData::MissingVars(vec!["regions".into()])
        );

        write(dir.path(), "terraform.tfvars.yaml", "regions: [west, east]\n");
        let tree = load_tree(dir.path(), LoaderOptions::default()).unwrap();
        let names: Vec<_> = tree.children(tree.root()).map(|(_, m)| m.name()).collect();
        assert_eq!(names, vec![r#"vpc["east"]"#, r#"vpc["west"]"#]);
        assert!(tree.warnings().next().is_none());
    }

    #[test]
    fn test_mt009_for_each_key_with_quote_reads_back() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "main.tf.yaml",
            r#"
blocks:
  - type: module
    labels: [vpc]
    attributes:
      source: ./modules/vpc
      for_each: ['a"b', 'c\d']
      cidr: "{{each.key}}"
"#,
        );
        write(dir.path(), "modules/vpc/main.tf.yaml", VPC_MODULE);

        let tree = load_tree(dir.path(), LoaderOptions::default()).unwrap();
        let keys: Vec<String> = tree
            .children(tree.root())
            .map(|(_, m)| m.key().unwrap().into_owned())
            .collect();
        assert_eq!(keys, vec![r#"a"b"#.to_string(), r"c\d".to_string()]);
        let quoted = tree.child_named(tree.root(), r#"vpc["a\"b"]"#).unwrap();
        assert_eq!(
            tree.get(quoted).blocks[2].attr_str("cidr_block"),
            Some(r#"a"b"#)
        );
    }

    #[test]
    fn test_mt009_reused_loader_rereads_blocks() {
        let dir = counted_project();
        let mut loader = ModuleLoader::new(LoaderOptions::default());
        let first = loader.load(dir.path()).unwrap();
        let (_, vpc) = first.children(first.root()).next().unwrap();
        assert_eq!(vpc.raw_blocks().len(), 3);

        write(dir.path(), "modules/vpc/main.tf.yaml", "blocks: []\n");
        let second = loader.load(dir.path()).unwrap();
        let (_, vpc) = second.children(second.root()).next().unwrap();
        assert!(vpc.raw_blocks().is_empty());
    }

    #[test]
    fn test_mt009_missing_root_dir() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_tree(&dir.path().join("absent"), LoaderOptions::default()).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }

    #[test]
    fn test_mt009_is_local_source() {
        assert!(is_local_source("./vpc"));
        assert!(is_local_source("../shared/vpc"));
        assert!(!is_local_source("terraform-aws-modules/vpc/aws"));
        assert!(!is_local_source("git::https://example.com/vpc.git"));
    }
}
