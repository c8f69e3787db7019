//! MT-004: Module tree — modules, module calls, parent/child wiring.
//!
//! [`ModuleTree`] is an arena that owns every [`Module`]. Children are held as
//! [`ModuleId`]s by their parent; the parent link is a plain id and never
//! owns anything, so ownership only flows root → leaves. Links are created
//! exclusively through [`ModuleTree::attach`], which keeps `modules` and
//! `parent` consistent in both directions.

use super::diagnostics::Warning;
use super::error::LoadError;
use super::identity;
use super::types::{BlockRef, Blocks};
use std::borrow::Cow;
use std::path::PathBuf;
use std::sync::Arc;

/// Index of a module within its [`ModuleTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModuleId(usize);

impl ModuleId {
    pub fn as_usize(self) -> usize {
        self.0
    }
}

/// A call to a module definition by a parent module.
#[derive(Debug, Clone)]
pub struct ModuleCall {
    /// Instance name of the call (`vpc`, `vpc[0]`, `vpc["a"]`).
    pub name: String,
    /// Local directory containing the called module's blocks.
    pub path: PathBuf,
    /// The `module` block in the parent where the call is declared.
    pub definition: BlockRef,
    /// The module this call resolved to. Set by [`ModuleTree::attach`].
    pub module: Option<ModuleId>,
}

impl ModuleCall {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>, definition: BlockRef) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            definition,
            module: None,
        }
    }
}

/// All the blocks that make up one module instance.
#[derive(Debug, Clone)]
pub struct Module {
    /// Unique among siblings; fixed once the module is attached.
    name: String,
    pub source: String,

    /// Blocks after instance-specific expansion.
    pub blocks: Blocks,
    /// Blocks as loaded from the filesystem, before expansion. Shared between
    /// sibling instances of the same definition and never modified.
    raw_blocks: Arc<[BlockRef]>,

    pub root_path: PathBuf,
    pub module_path: PathBuf,

    modules: Vec<ModuleId>,
    parent: Option<ModuleId>,
    calls: Vec<ModuleCall>,
    warnings: Vec<Warning>,

    pub has_changes: bool,
    pub terraform_vars_paths: Vec<PathBuf>,

    /// Optional disambiguator appended to the project name. Root modules only.
    pub module_suffix: Option<String>,

    /// Discovered remote URL. Only set for remote modules.
    pub source_url: Option<String>,
}

impl Module {
    /// Create a detached module. `blocks` starts as a copy of `raw_blocks`.
    pub fn new(
        name: impl Into<String>,
        source: impl Into<String>,
        raw_blocks: Arc<[BlockRef]>,
        root_path: impl Into<PathBuf>,
        module_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            name: name.into(),
            source: source.into(),
            blocks: raw_blocks.to_vec(),
            raw_blocks,
            root_path: root_path.into(),
            module_path: module_path.into(),
            modules: Vec::new(),
            parent: None,
            calls: Vec::new(),
            warnings: Vec::new(),
            has_changes: false,
            terraform_vars_paths: Vec::new(),
            module_suffix: None,
            source_url: None,
        }
    }

    /// Instance name (`vpc`, `vpc[0]`, `vpc["a"]`).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Count index of this instance, or `None` if it was not created by `count`.
    pub fn index(&self) -> Option<i64> {
        identity::instance_index(&self.name)
    }

    /// `for_each` key of this instance, or `None` if it was not created by `for_each`.
    pub fn key(&self) -> Option<Cow<'_, str>> {
        identity::instance_key(&self.name)
    }

    pub fn raw_blocks(&self) -> &Arc<[BlockRef]> {
        &self.raw_blocks
    }

    /// Child modules, in attach order.
    pub fn modules(&self) -> &[ModuleId] {
        &self.modules
    }

    pub fn parent(&self) -> Option<ModuleId> {
        self.parent
    }

    pub fn calls(&self) -> &[ModuleCall] {
        &self.calls
    }

    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    pub fn push_warning(&mut self, warning: Warning) {
        self.warnings.push(warning);
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    pub fn is_remote(&self) -> bool {
        self.source_url.is_some()
    }
}

/// Arena owning a module tree.
#[derive(Debug, Clone)]
pub struct ModuleTree {
    modules: Vec<Module>,
}

impl ModuleTree {
    /// Start a tree with `root` as its root module.
    pub fn new_root(mut root: Module) -> (Self, ModuleId) {
        root.parent = None;
        root.modules.clear();
        root.calls.clear();
        (Self { modules: vec![root] }, ModuleId(0))
    }

    pub fn root(&self) -> ModuleId {
        ModuleId(0)
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Module by id.
    ///
    /// # Panics
    /// If `id` was not produced by this tree.
    pub fn get(&self, id: ModuleId) -> &Module {
        &self.modules[id.0]
    }

    pub fn get_mut(&mut self, id: ModuleId) -> &mut Module {
        &mut self.modules[id.0]
    }

    pub fn parent_of(&self, id: ModuleId) -> Option<&Module> {
        self.get(id).parent.map(|p| self.get(p))
    }

    pub fn children(&self, id: ModuleId) -> impl Iterator<Item = (ModuleId, &Module)> + '_ {
        self.get(id).modules.iter().map(move |&c| (c, self.get(c)))
    }

    /// Child of `parent` with instance name `name`.
    pub fn child_named(&self, parent: ModuleId, name: &str) -> Option<ModuleId> {
        self.children(parent)
            .find(|(_, m)| m.name == name)
            .map(|(id, _)| id)
    }

    /// Link `child` under `parent` through `call`.
    ///
    /// Sets `call.module`, `child.parent`, and records both the call and the
    /// child on the parent. Fails if the parent already has a child with the
    /// same name.
    pub fn attach(
        &mut self,
        parent: ModuleId,
        mut call: ModuleCall,
        mut child: Module,
    ) -> Result<ModuleId, LoadError> {
        if self.child_named(parent, &child.name).is_some() {
            return Err(LoadError::DuplicateModule {
                parent: self.get(parent).name.clone(),
                name: child.name,
            });
        }

        let id = ModuleId(self.modules.len());
        child.parent = Some(parent);
        child.modules.clear();
        child.calls.clear();
        call.module = Some(id);
        self.modules.push(child);

        let p = self.get_mut(parent);
        p.modules.push(id);
        p.calls.push(call);
        Ok(id)
    }

    /// Depth-first pre-order over all modules, starting at the root.
    pub fn walk(&self) -> Vec<ModuleId> {
        let mut order = Vec::with_capacity(self.modules.len());
        let mut stack = vec![self.root()];
        while let Some(id) = stack.pop() {
            order.push(id);
            stack.extend(self.get(id).modules.iter().rev().copied());
        }
        order
    }

    /// Depth of `id` below the root (root = 0).
    pub fn depth(&self, id: ModuleId) -> usize {
        let mut depth = 0;
        let mut current = self.get(id).parent;
        while let Some(p) = current {
            depth += 1;
            current = self.get(p).parent;
        }
        depth
    }

    /// Address of `id`, e.g. `module.vpc[0].module.subnet`. Empty for the root.
    pub fn address(&self, id: ModuleId) -> String {
        let mut parts = Vec::new();
        let mut current = Some(id);
        while let Some(c) = current {
            let m = self.get(c);
            if m.parent.is_some() {
                parts.push(format!("module.{}", m.name));
            }
            current = m.parent;
        }
        parts.reverse();
        parts.join(".")
    }

    /// All warnings in the tree, depth-first, tagged with their module.
    pub fn warnings(&self) -> impl Iterator<Item = (ModuleId, &Warning)> + '_ {
        self.walk()
            .into_iter()
            .flat_map(move |id| self.get(id).warnings.iter().map(move |w| (id, w)))
    }

    /// Set `has_changes` on the modules that own one of `paths`: those whose
    /// directory is the closest one containing the path. Returns the number of
    /// modules marked.
    pub fn mark_changed(&mut self, paths: &[PathBuf]) -> usize {
        let mut owners: Vec<PathBuf> = Vec::new();
        for path in paths {
            let owner = self
                .modules
                .iter()
                .filter(|m| !m.is_remote() && path.starts_with(&m.module_path))
                .map(|m| &m.module_path)
                .max_by_key(|dir| dir.components().count());
            if let Some(dir) = owner {
                owners.push(dir.clone());
            }
        }

        let mut marked = 0;
        for m in &mut self.modules {
            if !m.is_remote() && owners.contains(&m.module_path) {
                m.has_changes = true;
                marked += 1;
            }
        }
        marked
    }
}
