use std::path::{Path, PathBuf};
use std::sync::Arc;

use elm::{Declaration, ExposedItem, Module};
use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use tower_lsp::lsp_types::Url;

use crate::error::DiagnosticsError;

/// What a module makes visible to its importers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModuleInterface {
    pub name: String,
    pub values: Vec<String>,
    /// Exposed type name -> constructors exposed along with it (empty for opaque types).
    pub types: FxHashMap<String, Vec<String>>,
}

impl ModuleInterface {
    pub fn from_module(module: &Module) -> Self {
        let mut interface = ModuleInterface {
            name: module.name().to_string(),
            ..ModuleInterface::default()
        };
        let exposes_all = module.exposes_all();
        let exposed = module
            .header
            .as_ref()
            .map(|header| header.exposing.items())
            .unwrap_or_default();
        let find = |name: &str| exposed.iter().find(|item| item.name().name == name);

        for decl in &module.declarations {
            match decl {
                Declaration::Value(value) => {
                    if exposes_all
                        || matches!(find(&value.name.name), Some(ExposedItem::Value(_)))
                    {
                        interface.values.push(value.name.name.clone());
                    }
                }
                Declaration::Port(port) => {
                    if exposes_all || matches!(find(&port.name.name), Some(ExposedItem::Value(_))) {
                        interface.values.push(port.name.name.clone());
                    }
                }
                Declaration::TypeAlias(alias) => {
                    if exposes_all || find(&alias.name.name).is_some() {
                        interface.types.insert(alias.name.name.clone(), Vec::new());
                    }
                }
                Declaration::CustomType(custom) => {
                    let constructors = || {
                        custom
                            .constructors
                            .iter()
                            .map(|ctor| ctor.name.name.clone())
                            .collect()
                    };
                    if exposes_all {
                        interface.types.insert(custom.name.name.clone(), constructors());
                    } else if let Some(ExposedItem::Type { constructors: open, .. }) =
                        find(&custom.name.name)
                    {
                        let ctors = if open.is_some() { constructors() } else { Vec::new() };
                        interface.types.insert(custom.name.name.clone(), ctors);
                    }
                }
                Declaration::Infix(_) => {}
            }
        }
        interface
    }

    /// Constructors exposed with `Type(..)`, or `None` when this module has no such type.
    pub fn constructors_of(&self, type_name: &str) -> Option<&[String]> {
        self.types.get(type_name).map(Vec::as_slice)
    }
}

/// Read-only view of one workspace folder, handed into every analysis call.
pub trait WorkspaceSnapshot: Send + Sync {
    fn root(&self) -> &Path;
    fn tree(&self, uri: &Url) -> Option<Arc<Module>>;
    fn module_interface(&self, module_name: &str) -> Option<&ModuleInterface>;
    /// Every file with a tree, sorted.
    fn files(&self) -> Vec<Url>;
}

#[derive(Debug, Clone, Default)]
pub struct WorkspaceIndex {
    root: PathBuf,
    modules: FxHashMap<Url, Arc<Module>>,
    interfaces: FxHashMap<String, ModuleInterface>,
}

impl WorkspaceIndex {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Self::default()
        }
    }

    pub fn insert(&mut self, uri: Url, module: Arc<Module>) {
        if let Some(previous) = self.modules.get(&uri) {
            self.interfaces.remove(previous.name());
        }
        self.interfaces.insert(
            module.name().to_string(),
            ModuleInterface::from_module(&module),
        );
        self.modules.insert(uri, module);
    }

    pub fn remove(&mut self, uri: &Url) -> Option<Arc<Module>> {
        let module = self.modules.remove(uri)?;
        self.interfaces.remove(module.name());
        Some(module)
    }

    /// Registers a module that has no tree in this workspace, e.g. an installed package.
    pub fn insert_interface(&mut self, interface: ModuleInterface) {
        self.interfaces.insert(interface.name.clone(), interface);
    }

    pub fn contains(&self, path: &Path) -> bool {
        path.starts_with(&self.root)
    }
}

impl WorkspaceSnapshot for WorkspaceIndex {
    fn root(&self) -> &Path {
        &self.root
    }

    fn tree(&self, uri: &Url) -> Option<Arc<Module>> {
        self.modules.get(uri).cloned()
    }

    fn module_interface(&self, module_name: &str) -> Option<&ModuleInterface> {
        self.interfaces.get(module_name)
    }

    fn files(&self) -> Vec<Url> {
        let mut files: Vec<Url> = self.modules.keys().cloned().collect();
        files.sort();
        files
    }
}

/// Maps files to the workspace folder that owns them.
pub trait WorkspaceProvider: Send + Sync {
    fn snapshot_for(&self, uri: &Url) -> Result<Arc<dyn WorkspaceSnapshot>, DiagnosticsError>;
    /// Every file of every folder.
    fn tracked_files(&self) -> Vec<Url>;
}

/// The workspace folders of the session. Snapshots are copy-on-write: a tree swap never
/// mutates an index someone is still analysing.
#[derive(Default)]
pub struct Workspaces {
    folders: RwLock<Vec<Arc<WorkspaceIndex>>>,
}

impl Workspaces {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_folder(&self, root: impl Into<PathBuf>) {
        let root = root.into();
        let mut folders = self.folders.write();
        if folders.iter().any(|folder| folder.root == root) {
            return;
        }
        folders.push(Arc::new(WorkspaceIndex::new(root)));
    }

    pub fn set_tree(&self, uri: &Url, module: Module) -> Result<(), DiagnosticsError> {
        let mut folders = self.folders.write();
        let index = Self::owning_folder(&folders, uri)
            .ok_or_else(|| DiagnosticsError::NoWorkspace(uri.clone()))?;
        Arc::make_mut(&mut folders[index]).insert(uri.clone(), Arc::new(module));
        Ok(())
    }

    pub fn remove_tree(&self, uri: &Url) {
        let mut folders = self.folders.write();
        if let Some(index) = Self::owning_folder(&folders, uri) {
            Arc::make_mut(&mut folders[index]).remove(uri);
        }
    }

    /// Index of the innermost folder containing `uri`, so nested folders win over parents.
    fn owning_folder(folders: &[Arc<WorkspaceIndex>], uri: &Url) -> Option<usize> {
        let path = uri.to_file_path().ok()?;
        folders
            .iter()
            .enumerate()
            .filter(|(_, folder)| folder.contains(&path))
            .max_by_key(|(_, folder)| folder.root.components().count())
            .map(|(index, _)| index)
    }
}

impl WorkspaceProvider for Workspaces {
    fn snapshot_for(&self, uri: &Url) -> Result<Arc<dyn WorkspaceSnapshot>, DiagnosticsError> {
        let folders = self.folders.read();
        let index = Self::owning_folder(&folders, uri)
            .ok_or_else(|| DiagnosticsError::NoWorkspace(uri.clone()))?;
        let snapshot: Arc<dyn WorkspaceSnapshot> = folders[index].clone();
        Ok(snapshot)
    }

    fn tracked_files(&self) -> Vec<Url> {
        self.folders
            .read()
            .iter()
            .flat_map(|folder| folder.files())
            .collect()
    }
}
