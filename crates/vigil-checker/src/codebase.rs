//! Class and method storage.
//!
//! Lookups are case-insensitive: class keys and method keys are stored
//! lower-cased, while the storage keeps the declared spelling for messages.

use dashmap::DashMap;
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::trace;
use vigil_common::Span;
use vigil_solver::Union;

use crate::ast::NodeId;
use crate::call::MethodId;

/// Name of the magic method that makes any missing method callable.
pub const MAGIC_CALL: &str = "__call";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Visibility {
    #[default]
    Public,
    Protected,
    Private,
}

impl Visibility {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Visibility::Public => "public",
            Visibility::Protected => "protected",
            Visibility::Private => "private",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParamStorage {
    pub name: String,
    pub ty: Option<Union>,
    pub is_optional: bool,
    pub is_variadic: bool,
}

impl ParamStorage {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: None,
            is_optional: false,
            is_variadic: false,
        }
    }

    #[must_use]
    pub fn optional(mut self) -> Self {
        self.is_optional = true;
        self
    }

    #[must_use]
    pub fn variadic(mut self) -> Self {
        self.is_variadic = true;
        self
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MethodStorage {
    /// Declared spelling.
    pub cased_name: String,
    pub params: Vec<ParamStorage>,
    /// `None` when the method has no declared return type.
    pub return_type: Option<Union>,
    pub returns_by_ref: bool,
    pub visibility: Visibility,
}

impl MethodStorage {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            cased_name: name.into(),
            params: Vec::new(),
            return_type: None,
            returns_by_ref: false,
            visibility: Visibility::Public,
        }
    }

    #[must_use]
    pub fn returning(mut self, return_type: Union) -> Self {
        self.return_type = Some(return_type);
        self
    }

    #[must_use]
    pub fn with_param(mut self, param: ParamStorage) -> Self {
        self.params.push(param);
        self
    }

    #[must_use]
    pub fn by_ref(mut self) -> Self {
        self.returns_by_ref = true;
        self
    }

    #[must_use]
    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }
}

/// A class or interface.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ClassLikeStorage {
    pub name: String,
    pub is_interface: bool,
    pub parent_class: Option<String>,
    pub interfaces: Vec<String>,
    /// Lower-cased method name to storage.
    pub methods: FxHashMap<String, MethodStorage>,
    /// `@method` annotations.
    pub pseudo_methods: FxHashMap<String, MethodStorage>,
    /// Only declared and pseudo methods may be called, even with `__call`.
    pub sealed_methods: bool,
}

impl ClassLikeStorage {
    #[must_use]
    pub fn class(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn interface(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_interface: true,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn extends(mut self, parent: impl Into<String>) -> Self {
        self.parent_class = Some(parent.into());
        self
    }

    #[must_use]
    pub fn implements(mut self, interface: impl Into<String>) -> Self {
        self.interfaces.push(interface.into());
        self
    }

    #[must_use]
    pub fn with_method(mut self, method: MethodStorage) -> Self {
        self.methods
            .insert(method.cased_name.to_ascii_lowercase(), method);
        self
    }

    #[must_use]
    pub fn with_pseudo_method(mut self, method: MethodStorage) -> Self {
        self.pseudo_methods
            .insert(method.cased_name.to_ascii_lowercase(), method);
        self
    }

    #[must_use]
    pub fn sealed(mut self) -> Self {
        self.sealed_methods = true;
        self
    }
}

/// A method found by [`Codebase::get_declaring_method`].
#[derive(Clone, Copy, Debug)]
pub struct DeclaringMethod<'a> {
    pub class: &'a ClassLikeStorage,
    pub method: &'a MethodStorage,
}

/// Expression type recorded for editor hover/lookup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordedNodeType {
    pub span: Span,
    pub type_id: String,
    pub node: NodeId,
}

/// Per-file store of recorded expression types.
///
/// Shared between analyzers working on different files, hence the
/// concurrent map.
#[derive(Debug, Default)]
pub struct NodeTypeStore {
    by_file: DashMap<String, Vec<RecordedNodeType>>,
}

impl NodeTypeStore {
    pub fn add(&self, file: &str, record: RecordedNodeType) {
        self.by_file.entry(file.to_string()).or_default().push(record);
    }

    #[must_use]
    pub fn for_file(&self, file: &str) -> Vec<RecordedNodeType> {
        self.by_file
            .get(file)
            .map(|records| records.value().clone())
            .unwrap_or_default()
    }

    /// Type id of the innermost recorded span containing `offset`.
    #[must_use]
    pub fn type_at(&self, file: &str, offset: u32) -> Option<String> {
        let records = self.by_file.get(file)?;
        records
            .iter()
            .filter(|record| record.span.start <= offset && offset < record.span.end)
            .min_by_key(|record| record.span.len())
            .map(|record| record.type_id.clone())
    }

    pub fn clear_file(&self, file: &str) {
        self.by_file.remove(file);
    }
}

/// Everything known about the classes of the program under analysis.
#[derive(Debug, Default)]
pub struct Codebase {
    classlikes: FxHashMap<String, ClassLikeStorage>,
    mock_classes: FxHashSet<String>,
    /// Record method-call result types into [`Codebase::node_types`].
    pub store_node_types: bool,
    node_types: NodeTypeStore,
}

impl Codebase {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_classlike(&mut self, storage: ClassLikeStorage) {
        self.classlikes
            .insert(storage.name.to_ascii_lowercase(), storage);
    }

    #[must_use]
    pub fn with_classlike(mut self, storage: ClassLikeStorage) -> Self {
        self.add_classlike(storage);
        self
    }

    /// Treat `class` as a test double: any method may be called on it.
    pub fn add_mock_class(&mut self, class: &str) {
        self.mock_classes.insert(class.to_ascii_lowercase());
    }

    #[must_use]
    pub fn is_mock(&self, class: &str) -> bool {
        self.mock_classes.contains(&class.to_ascii_lowercase())
    }

    #[must_use]
    pub fn classlike(&self, name: &str) -> Option<&ClassLikeStorage> {
        self.classlikes.get(&name.to_ascii_lowercase())
    }

    #[must_use]
    pub fn class_exists(&self, name: &str) -> bool {
        self.classlike(name).is_some_and(|storage| !storage.is_interface)
    }

    #[must_use]
    pub fn interface_exists(&self, name: &str) -> bool {
        self.classlike(name).is_some_and(|storage| storage.is_interface)
    }

    /// Whether `child` is `ancestor` or inherits from it.
    #[must_use]
    pub fn class_extends_or_is(&self, child: &str, ancestor: &str) -> bool {
        let mut seen = FxHashSet::default();
        let mut current = self.classlike(child);
        while let Some(storage) = current {
            if storage.name.eq_ignore_ascii_case(ancestor) {
                return true;
            }
            if !seen.insert(storage.name.to_ascii_lowercase()) {
                return false;
            }
            current = storage
                .parent_class
                .as_deref()
                .and_then(|parent| self.classlike(parent));
        }
        false
    }

    /// Find `method_name` on `class`, its parents, or its interfaces.
    ///
    /// Own methods win over inherited ones; parents are searched before
    /// interfaces.
    #[must_use]
    pub fn get_declaring_method(&self, class: &str, method_name: &str) -> Option<DeclaringMethod<'_>> {
        let key = method_name.to_ascii_lowercase();
        let mut seen = FxHashSet::default();
        self.find_method(class, &key, &mut seen)
    }

    fn find_method<'s>(
        &'s self,
        class: &str,
        key: &str,
        seen: &mut FxHashSet<String>,
    ) -> Option<DeclaringMethod<'s>> {
        let storage = self.classlike(class)?;
        if !seen.insert(storage.name.to_ascii_lowercase()) {
            trace!(class = %storage.name, "inheritance cycle");
            return None;
        }
        if let Some(method) = storage.methods.get(key) {
            return Some(DeclaringMethod {
                class: storage,
                method,
            });
        }
        if let Some(parent) = &storage.parent_class
            && let Some(found) = self.find_method(parent, key, seen)
        {
            return Some(found);
        }
        storage
            .interfaces
            .iter()
            .find_map(|interface| self.find_method(interface, key, seen))
    }

    /// `@method` annotation for `method_name` on `class` or its parents.
    #[must_use]
    pub fn get_pseudo_method(&self, class: &str, method_name: &str) -> Option<&MethodStorage> {
        let key = method_name.to_ascii_lowercase();
        let mut seen = FxHashSet::default();
        let mut current = self.classlike(class);
        while let Some(storage) = current {
            if let Some(method) = storage.pseudo_methods.get(&key) {
                return Some(method);
            }
            if !seen.insert(storage.name.to_ascii_lowercase()) {
                return None;
            }
            current = storage
                .parent_class
                .as_deref()
                .and_then(|parent| self.classlike(parent));
        }
        None
    }

    /// Storage for `method_id`, declared or annotated.
    #[must_use]
    pub fn get_method(&self, method_id: &MethodId) -> Option<&MethodStorage> {
        self.get_declaring_method(&method_id.fq_class_name, &method_id.method_name)
            .map(|declaring| declaring.method)
            .or_else(|| self.get_pseudo_method(&method_id.fq_class_name, &method_id.method_name))
    }

    #[must_use]
    pub fn method_exists(&self, method_id: &MethodId) -> bool {
        self.get_method(method_id).is_some()
    }

    #[must_use]
    pub fn node_types(&self) -> &NodeTypeStore {
        &self.node_types
    }

    pub fn add_node_type(&self, file: &str, span: Span, type_id: String, node: NodeId) {
        self.node_types.add(
            file,
            RecordedNodeType {
                span,
                type_id,
                node,
            },
        );
    }
}
