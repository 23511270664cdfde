//! In-memory class registry.
//!
//! The `ClassRegistry` is the reference [`TypeMetadataProvider`]: classes and
//! fields are registered up front (directly, or from a
//! [`SchemaDescriptor`](crate::SchemaDescriptor)) and then only read.
//!
//! # Design
//!
//! - Two arenas: classes by `ClassId`, fields by `FieldId`
//! - Dual name index: qualified name for exact lookup, simple name for convenience
//! - Field types are stored as parsed [`TypeExpr`]s scoped to the declaring class

use rustc_hash::FxHashMap;

use crate::parse::parse_type;
use crate::{
    ClassId, FieldId, Name, SchemaError, StringInterner, TypeExpr, TypeMetadataProvider,
};

/// A registered class.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ClassDef {
    /// Simple class name.
    pub name: Name,

    /// Dotted namespace (package), `None` for primitive-like classes.
    pub namespace: Option<Name>,

    /// Generic type parameters in declaration order (e.g., `K`, `V` in `Map<K, V>`).
    pub type_params: Vec<Name>,

    /// Fields declared directly on this class, in declaration order.
    pub fields: Vec<FieldId>,
}

/// A registered field.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FieldDef {
    /// Field name.
    pub name: Name,

    /// The class that declares this field.
    pub declaring_class: ClassId,

    /// Declared type, scoped to the declaring class's type parameters.
    pub ty: TypeExpr,
}

/// Registry of classes and fields.
#[derive(Clone, Debug, Default)]
pub struct ClassRegistry {
    interner: StringInterner,

    classes: Vec<ClassDef>,

    fields: Vec<FieldDef>,

    /// Qualified name (`java.util.Map`) -> class.
    by_qualified_name: FxHashMap<String, ClassId>,

    /// Simple name (`Map`) -> every class with that simple name.
    by_simple_name: FxHashMap<Name, Vec<ClassId>>,
}

impl ClassRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry pre-populated with common platform classes.
    ///
    /// Registers `java.lang.{Object, String, Integer, Long, Boolean, Double}`
    /// and the generic `java.util.{List<E>, Set<E>, Optional<T>, Map<K, V>}`.
    pub fn with_jdk_prelude() -> Self {
        const PRELUDE: &[(&str, &str, &[&str])] = &[
            ("java.lang", "Object", &[]),
            ("java.lang", "String", &[]),
            ("java.lang", "Integer", &[]),
            ("java.lang", "Long", &[]),
            ("java.lang", "Boolean", &[]),
            ("java.lang", "Double", &[]),
            ("java.util", "List", &["E"]),
            ("java.util", "Set", &["E"]),
            ("java.util", "Optional", &["T"]),
            ("java.util", "Map", &["K", "V"]),
        ];

        let mut registry = Self::new();
        for (namespace, name, params) in PRELUDE {
            // Fresh registry: names are unique by construction.
            let _ = registry.register_class(namespace, name, params);
        }
        registry
    }

    /// Intern a name in this registry's interner.
    pub fn intern(&mut self, s: &str) -> Name {
        self.interner.intern(s)
    }

    /// Look up an already-interned name.
    pub fn lookup_name(&self, s: &str) -> Option<Name> {
        self.interner.lookup(s)
    }

    /// The registry's interner.
    pub fn interner(&self) -> &StringInterner {
        &self.interner
    }

    /// Register a class.
    ///
    /// An empty `namespace` registers a primitive-like class with no namespace.
    pub fn register_class(
        &mut self,
        namespace: &str,
        name: &str,
        type_params: &[&str],
    ) -> Result<ClassId, SchemaError> {
        let qualified = if namespace.is_empty() {
            name.to_owned()
        } else {
            format!("{namespace}.{name}")
        };
        if self.by_qualified_name.contains_key(&qualified) {
            return Err(SchemaError::DuplicateClass { name: qualified });
        }

        let id = ClassId::new(u32::try_from(self.classes.len()).unwrap_or(u32::MAX));
        let simple = self.interner.intern(name);
        let namespace = (!namespace.is_empty()).then(|| self.interner.intern(namespace));
        let type_params = type_params.iter().map(|p| self.interner.intern(p)).collect();

        self.classes.push(ClassDef {
            name: simple,
            namespace,
            type_params,
            fields: Vec::new(),
        });
        self.by_qualified_name.insert(qualified, id);
        self.by_simple_name.entry(simple).or_default().push(id);
        Ok(id)
    }

    /// Declare a field on `class` with an already-built type.
    ///
    /// Every class `ty` mentions must be registered, and generic arity is
    /// checked for every parameterized type in it.
    pub fn add_field(
        &mut self,
        class: ClassId,
        name: &str,
        ty: TypeExpr,
    ) -> Result<FieldId, SchemaError> {
        self.check_type(&ty)?;

        let field_name = self.interner.intern(name);
        let duplicate = self
            .class_def(class)?
            .fields
            .iter()
            .any(|f| self.fields[f.index()].name == field_name);
        if duplicate {
            return Err(SchemaError::DuplicateField {
                class: self.class_name(class),
                field: name.to_owned(),
            });
        }

        let id = FieldId::new(u32::try_from(self.fields.len()).unwrap_or(u32::MAX));
        self.fields.push(FieldDef {
            name: field_name,
            declaring_class: class,
            ty,
        });
        if let Some(def) = self.classes.get_mut(class.index()) {
            def.fields.push(id);
        }
        Ok(id)
    }

    /// Declare a field on `class`, parsing its type in the class's scope.
    ///
    /// ```text
    /// registry.add_field_str(outer, "index", "Map<K, List<V>>")?;
    /// ```
    pub fn add_field_str(
        &mut self,
        class: ClassId,
        name: &str,
        ty: &str,
    ) -> Result<FieldId, SchemaError> {
        let ty = self.parse_type(Some(class), ty)?;
        self.add_field(class, name, ty)
    }

    /// Parse a type expression.
    ///
    /// Identifiers that name a type parameter of `owner` become variables;
    /// every other identifier must name a registered class.
    pub fn parse_type(&self, owner: Option<ClassId>, src: &str) -> Result<TypeExpr, SchemaError> {
        if let Some(owner) = owner {
            self.class_def(owner)?;
        }
        parse_type(self, owner, src)
    }

    /// Find a class by qualified name, or by simple name when it is unique.
    pub fn class_by_name(&self, name: &str) -> Result<ClassId, SchemaError> {
        if let Some(&id) = self.by_qualified_name.get(name) {
            return Ok(id);
        }
        let candidates = self
            .interner
            .lookup(name)
            .and_then(|simple| self.by_simple_name.get(&simple))
            .map_or(&[][..], Vec::as_slice);
        match candidates {
            [id] => Ok(*id),
            [] => Err(SchemaError::UnknownClass {
                name: name.to_owned(),
            }),
            many => Err(SchemaError::AmbiguousClass {
                name: name.to_owned(),
                candidates: many.iter().map(|&id| self.class_name(id)).collect(),
            }),
        }
    }

    /// Find a field declared directly on `class` by name.
    pub fn field_by_name(&self, class: ClassId, name: &str) -> Option<FieldId> {
        let name = self.interner.lookup(name)?;
        self.classes
            .get(class.index())?
            .fields
            .iter()
            .copied()
            .find(|f| self.fields[f.index()].name == name)
    }

    /// Number of registered classes.
    pub fn class_count(&self) -> usize {
        self.classes.len()
    }

    /// Iterate all class ids in registration order.
    pub fn class_ids(&self) -> impl Iterator<Item = ClassId> + '_ {
        (0..self.classes.len()).map(|i| ClassId::new(u32::try_from(i).unwrap_or(u32::MAX)))
    }

    fn check_type(&self, ty: &TypeExpr) -> Result<(), SchemaError> {
        match ty {
            TypeExpr::Class(class) => self.class_def(*class).map(|_| ()),
            TypeExpr::Var(_) | TypeExpr::Wildcard { bound: None } => Ok(()),
            TypeExpr::Parameterized { raw, args } => {
                let expected = self.class_def(*raw)?.type_params.len();
                if expected != args.len() {
                    return Err(SchemaError::TypeArgumentCount {
                        class: self.class_name(*raw),
                        expected,
                        found: args.len(),
                    });
                }
                args.iter().try_for_each(|arg| self.check_type(arg))
            }
            TypeExpr::Wildcard { bound: Some(inner) } | TypeExpr::Array(inner) => {
                self.check_type(inner)
            }
        }
    }

    /// The definition behind `id`, or `UnknownClass` for an id this registry
    /// never issued.
    fn class_def(&self, id: ClassId) -> Result<&ClassDef, SchemaError> {
        self.classes
            .get(id.index())
            .ok_or_else(|| SchemaError::UnknownClass {
                name: format!("{id:?}"),
            })
    }
}

impl TypeMetadataProvider for ClassRegistry {
    fn class(&self, id: ClassId) -> &ClassDef {
        &self.classes[id.index()]
    }

    fn field(&self, id: FieldId) -> &FieldDef {
        &self.fields[id.index()]
    }

    fn resolve_name(&self, name: Name) -> &str {
        self.interner.resolve(name)
    }
}
