//! Registry of compiled types.
//!
//! The `TypeUniverse` stores everything the engine needs to know about a
//! declared class or interface: its package, its enclosing type, its
//! supertypes and its member tables.
//!
//! # Design
//!
//! - Types live in a `Vec` indexed by `TypeId`; handles are never invalidated
//! - `FxHashMap<Name, TypeId>` keyed by qualified name (`pkg.Outer$Inner`)
//! - A type can be declared *pending* before its members are known, so a
//!   batch of mutually-referential declarations can name each other

use jive_ir::{
    CtorRef, DeclKind, FieldRef, MemberDecl, MethodRef, Modifiers, Name, SharedInterner, Ty,
    TypeDecl, TypeId,
};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

/// Parameter list storage; most members take few parameters.
pub type Params = SmallVec<[Ty; 4]>;

/// Load state of a registered type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DeclState {
    Finalized,
    /// Named by the current batch but not yet defined.
    Pending,
    /// Loading failed; any use of the type is an engine-level error.
    Failed(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldInfo {
    pub name: Name,
    pub ty: Ty,
    pub modifiers: Modifiers,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MethodInfo {
    pub name: Name,
    pub params: Params,
    pub ret: Ty,
    pub modifiers: Modifiers,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CtorInfo {
    pub params: Params,
    pub modifiers: Modifiers,
}

/// A registered class or interface.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeInfo {
    pub id: TypeId,
    /// Simple name.
    pub name: Name,
    /// Qualified name (`pkg.Outer$Inner`).
    pub qualified: Name,
    pub package: Name,
    pub kind: DeclKind,
    pub modifiers: Modifiers,
    pub outer: Option<TypeId>,
    pub superclass: Option<TypeId>,
    pub interfaces: SmallVec<[TypeId; 2]>,
    pub fields: Vec<FieldInfo>,
    pub methods: Vec<MethodInfo>,
    pub ctors: Vec<CtorInfo>,
    pub member_types: Vec<TypeId>,
    pub state: DeclState,
}

impl TypeInfo {
    pub fn is_interface(&self) -> bool {
        self.kind == DeclKind::Interface
    }

    /// Whether instances are linked to an instance of the enclosing type.
    pub fn has_enclosing_instance(&self) -> bool {
        self.outer.is_some() && self.kind == DeclKind::Class && !self.modifiers.is_static()
    }

    /// Whether allocation must supply the enclosing instance (non-static
    /// member classes).
    ///
    /// Synthesized types receive their outer instance as an ordinary
    /// constructor argument, so they are excluded.
    pub fn needs_outer_instance(&self) -> bool {
        self.has_enclosing_instance() && !self.modifiers.contains(Modifiers::SYNTHETIC)
    }
}

/// Well-known types every universe starts with.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CoreTypes {
    pub object: TypeId,
    pub string: TypeId,
    /// Interface used for captured-locals maps.
    pub map: TypeId,
}

/// Description of a type to register.
#[derive(Clone, Debug)]
pub struct TypeBuilder {
    name: Name,
    package: Name,
    kind: DeclKind,
    modifiers: Modifiers,
    outer: Option<TypeId>,
    superclass: Option<TypeId>,
    interfaces: SmallVec<[TypeId; 2]>,
    fields: Vec<FieldInfo>,
    methods: Vec<MethodInfo>,
    ctors: Vec<CtorInfo>,
}

impl TypeBuilder {
    pub fn class(name: Name) -> Self {
        Self::new(name, DeclKind::Class)
    }

    pub fn interface(name: Name) -> Self {
        Self::new(name, DeclKind::Interface)
    }

    fn new(name: Name, kind: DeclKind) -> Self {
        TypeBuilder {
            name,
            package: Name::EMPTY,
            kind,
            modifiers: Modifiers::PUBLIC,
            outer: None,
            superclass: None,
            interfaces: SmallVec::new(),
            fields: Vec::new(),
            methods: Vec::new(),
            ctors: Vec::new(),
        }
    }

    /// Package of a top-level type. Nested types inherit their outer's package.
    #[must_use]
    pub fn package(mut self, package: Name) -> Self {
        self.package = package;
        self
    }

    #[must_use]
    pub fn modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    #[must_use]
    pub fn outer(mut self, outer: TypeId) -> Self {
        self.outer = Some(outer);
        self
    }

    #[must_use]
    pub fn superclass(mut self, superclass: TypeId) -> Self {
        self.superclass = Some(superclass);
        self
    }

    #[must_use]
    pub fn interface_impl(mut self, interface: TypeId) -> Self {
        self.interfaces.push(interface);
        self
    }

    #[must_use]
    pub fn field(mut self, name: Name, ty: Ty, modifiers: Modifiers) -> Self {
        self.fields.push(FieldInfo {
            name,
            ty,
            modifiers,
        });
        self
    }

    #[must_use]
    pub fn method(mut self, name: Name, params: &[Ty], ret: Ty, modifiers: Modifiers) -> Self {
        self.methods.push(MethodInfo {
            name,
            params: params.iter().cloned().collect(),
            ret,
            modifiers,
        });
        self
    }

    #[must_use]
    pub fn ctor(mut self, params: &[Ty], modifiers: Modifiers) -> Self {
        self.ctors.push(CtorInfo {
            params: params.iter().cloned().collect(),
            modifiers,
        });
        self
    }
}

/// Registry of all compiled types of a session.
#[derive(Clone, Debug)]
pub struct TypeUniverse {
    interner: SharedInterner,
    types: Vec<TypeInfo>,
    by_qualified: FxHashMap<Name, TypeId>,
    /// Packages searched for simple names after the context package.
    imports: Vec<Name>,
    core: CoreTypes,
}

impl TypeUniverse {
    /// Create a universe holding only the core types.
    pub fn new(interner: SharedInterner) -> Self {
        let lang = interner.intern("lang");
        let util = interner.intern("util");
        let object_name = interner.intern("Object");
        let string_name = interner.intern("String");
        let map_name = interner.intern("Map");

        let placeholder = CoreTypes {
            object: TypeId::from_raw(0),
            string: TypeId::from_raw(0),
            map: TypeId::from_raw(0),
        };
        let mut universe = TypeUniverse {
            interner,
            types: Vec::new(),
            by_qualified: FxHashMap::default(),
            imports: vec![lang],
            core: placeholder,
        };

        let object = universe.insert(TypeBuilder::class(object_name).package(lang));
        let string = universe.insert(
            TypeBuilder::class(string_name)
                .package(lang)
                .modifiers(Modifiers::PUBLIC | Modifiers::FINAL),
        );
        let map = universe.insert(TypeBuilder::interface(map_name).package(util));
        universe.core = CoreTypes {
            object,
            string,
            map,
        };
        universe
    }

    pub fn interner(&self) -> &SharedInterner {
        &self.interner
    }

    pub fn core(&self) -> CoreTypes {
        self.core
    }

    /// Make a package's types nameable by simple name.
    pub fn add_import(&mut self, package: Name) {
        if !self.imports.contains(&package) {
            self.imports.push(package);
        }
    }

    pub(crate) fn imports(&self) -> &[Name] {
        &self.imports
    }

    /// Register a type, completing a pending declaration of the same name.
    pub fn insert(&mut self, builder: TypeBuilder) -> TypeId {
        let package = builder
            .outer
            .map_or(builder.package, |outer| self.get(outer).package);
        let qualified = self.qualify(builder.outer, package, builder.name);

        let id = match self.by_qualified.get(&qualified) {
            Some(&existing) if self.get(existing).state == DeclState::Pending => existing,
            _ => TypeId::from_raw(u32::try_from(self.types.len()).unwrap_or(u32::MAX)),
        };

        // Interfaces and the root class have no superclass.
        let superclass = match (builder.kind, builder.superclass) {
            (DeclKind::Class, None) if !self.types.is_empty() => Some(self.core.object),
            (_, superclass) => superclass,
        };

        let mut ctors = builder.ctors;
        if builder.kind == DeclKind::Class && ctors.is_empty() {
            ctors.push(CtorInfo {
                params: Params::new(),
                modifiers: builder.modifiers
                    & (Modifiers::PUBLIC | Modifiers::PROTECTED | Modifiers::PRIVATE),
            });
        }

        let info = TypeInfo {
            id,
            name: builder.name,
            qualified,
            package,
            kind: builder.kind,
            modifiers: builder.modifiers,
            outer: builder.outer,
            superclass,
            interfaces: builder.interfaces,
            fields: builder.fields,
            methods: builder.methods,
            ctors,
            member_types: Vec::new(),
            state: DeclState::Finalized,
        };

        if id.index() == self.types.len() {
            self.types.push(info);
            self.by_qualified.insert(qualified, id);
            if let Some(outer) = builder.outer {
                self.types[outer.index()].member_types.push(id);
            }
        } else {
            let member_types = std::mem::take(&mut self.types[id.index()].member_types);
            self.types[id.index()] = TypeInfo {
                member_types,
                ..info
            };
        }

        tracing::trace!(qualified = self.interner.lookup(qualified), ?id, "registered type");
        id
    }

    /// Register a type that is named by the current batch but not yet defined.
    pub fn declare_pending(&mut self, builder: TypeBuilder) -> TypeId {
        let id = self.insert(TypeBuilder {
            fields: Vec::new(),
            methods: Vec::new(),
            ctors: Vec::new(),
            ..builder
        });
        self.types[id.index()].state = DeclState::Pending;
        id
    }

    /// Record that loading a type failed.
    pub fn mark_failed(&mut self, id: TypeId, reason: impl Into<String>) {
        self.types[id.index()].state = DeclState::Failed(reason.into());
    }

    /// Register a declaration tree and, recursively, its member types.
    pub fn insert_decl(&mut self, decl: &TypeDecl, package: Name) -> TypeId {
        let mut builder = match decl.kind {
            DeclKind::Class => TypeBuilder::class(decl.name),
            DeclKind::Interface => TypeBuilder::interface(decl.name),
        }
        .package(package)
        .modifiers(decl.modifiers);
        if let Some(outer) = decl.outer {
            builder = builder.outer(outer);
        }
        if let Some(superclass) = decl.superclass {
            builder = builder.superclass(superclass);
        }
        for &interface in &decl.interfaces {
            builder = builder.interface_impl(interface);
        }

        let mut nested = Vec::new();
        for member in &decl.members {
            builder = match member {
                MemberDecl::Field(f) => builder.field(f.name, f.ty.clone(), f.modifiers),
                MemberDecl::Method(m) => {
                    let params: Params = m.params.iter().map(|p| p.ty.clone()).collect();
                    builder.method(m.name, &params, m.ret.clone(), m.modifiers)
                }
                MemberDecl::Ctor(c) => {
                    let params: Params = c.params.iter().map(|p| p.ty.clone()).collect();
                    builder.ctor(&params, c.modifiers)
                }
                MemberDecl::Type(t) => {
                    nested.push(t);
                    builder
                }
            };
        }

        let id = self.insert(builder);
        for inner in nested {
            let inner = TypeDecl {
                outer: Some(id),
                ..inner.clone()
            };
            self.insert_decl(&inner, package);
        }
        id
    }

    fn qualify(&self, outer: Option<TypeId>, package: Name, name: Name) -> Name {
        let simple = self.interner.lookup(name);
        match outer {
            Some(outer) => {
                let outer = self.interner.lookup(self.get(outer).qualified);
                self.interner.intern(&format!("{outer}${simple}"))
            }
            None if package.is_empty() => name,
            None => {
                let package = self.interner.lookup(package);
                self.interner.intern(&format!("{package}.{simple}"))
            }
        }
    }

    #[inline]
    pub fn get(&self, id: TypeId) -> &TypeInfo {
        &self.types[id.index()]
    }

    pub fn try_get(&self, id: TypeId) -> Option<&TypeInfo> {
        self.types.get(id.index())
    }

    pub fn by_qualified(&self, qualified: Name) -> Option<TypeId> {
        self.by_qualified.get(&qualified).copied()
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Qualified name for diagnostics.
    pub fn display(&self, id: TypeId) -> &'static str {
        self.interner.lookup(self.get(id).qualified)
    }

    /// Source-style rendering of a static type.
    pub fn display_ty(&self, ty: &Ty) -> String {
        match ty {
            Ty::Void => "void".to_owned(),
            Ty::Null => "null".to_owned(),
            Ty::Prim(prim) => prim.keyword().to_owned(),
            Ty::Ref(id) => self.display(*id).to_owned(),
            Ty::Array(elem) => format!("{}[]", self.display_ty(elem)),
        }
    }

    pub fn field_info(&self, field: FieldRef) -> &FieldInfo {
        &self.get(field.owner).fields[field.index as usize]
    }

    pub fn method_info(&self, method: MethodRef) -> &MethodInfo {
        &self.get(method.owner).methods[method.index as usize]
    }

    pub fn ctor_info(&self, ctor: CtorRef) -> &CtorInfo {
        &self.get(ctor.owner).ctors[ctor.index as usize]
    }

    /// Enclosing types of `id`, innermost first (excluding `id`).
    pub fn enclosing(&self, id: TypeId) -> impl Iterator<Item = TypeId> + '_ {
        std::iter::successors(self.get(id).outer, move |t| self.get(*t).outer)
    }

    /// Whether `inner` is `outer` or lexically nested (transitively) inside it.
    pub fn is_nested_within(&self, inner: TypeId, outer: TypeId) -> bool {
        inner == outer || self.enclosing(inner).any(|t| t == outer)
    }

    /// Outermost enclosing type (the type itself when top-level).
    pub fn top_level(&self, id: TypeId) -> TypeId {
        self.enclosing(id).last().unwrap_or(id)
    }

    /// Direct supertypes: superclass first, then interfaces.
    pub fn supertypes(&self, id: TypeId) -> impl Iterator<Item = TypeId> + '_ {
        let info = self.get(id);
        info.superclass
            .into_iter()
            .chain(info.interfaces.iter().copied())
    }
}
