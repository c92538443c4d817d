//! The compilation context: the full entity arena the core receives from
//! the front-end and augments in place.
//!
//! Grounded on `tir/context.rs::TirContext`, which owns every arena
//! (`modules`, `types`, `scopes`, …) the rest of the compiler borrows from;
//! this `Context` plays the same central role but for already-bound
//! program data rather than in-progress type resolution.

use std::collections::HashMap;

use crate::arena::{Arena, ClassId, ConstantId, EnumId, ExpressionId, FieldId, MethodId, NamespaceId, PropertyId, StructId, TypeRefId};
use crate::model::class::Class;
use crate::model::compilation_unit::CompilationUnit;
use crate::model::constant::Constant;
use crate::model::enum_::EnumDef;
use crate::model::expression::{Expression, ResolvedInfo};
use crate::model::field::Field;
use crate::model::method::{Method, MethodCdecl};
use crate::model::namespace::Namespace;
use crate::model::property::Property;
use crate::model::statement::{Statement, StatementId};
use crate::model::struct_::StructDef;
use crate::model::type_ref::{PrimitiveType, TypeRef, TypeSymbol};

#[derive(Debug, Default)]
pub struct Context {
    pub compilation_units: Vec<CompilationUnit>,
    pub namespaces: Arena<NamespaceId, Namespace>,
    pub classes: Arena<ClassId, Class>,
    pub structs: Arena<StructId, StructDef>,
    pub enums: Arena<EnumId, EnumDef>,
    pub methods: Arena<MethodId, Method>,
    pub fields: Arena<FieldId, Field>,
    pub properties: Arena<PropertyId, Property>,
    pub constants: Arena<ConstantId, Constant>,
    pub type_refs: Arena<TypeRefId, TypeRef>,
    pub expressions: Arena<ExpressionId, Expression>,
    pub statements: Arena<StatementId, Statement>,

    /// Side table for Type Resolver output, keyed by `ExpressionId`, per
    /// §3.1. `None` until [`crate::resolver`] visits the expression.
    resolved: Vec<Option<ResolvedInfo>>,
    /// Side table for Declaration Emitter Pass 1 output, keyed by
    /// `MethodId`.
    method_cdecl: Vec<Option<MethodCdecl>>,

    pub root_namespace: NamespaceId,
    primitive_symbols: HashMap<&'static str, TypeSymbol>,
}

impl Context {
    /// Builds an empty context with a registered root namespace and the
    /// built-in primitives (`int`, `bool`, `string`, `void`), grounded on
    /// `tir::build_primitive_types` registering primitives into the root
    /// module before any user declarations are processed.
    pub fn new() -> Self {
        let mut namespaces = Arena::new();
        let root_namespace = namespaces.push(Namespace {
            name: String::new(),
            lower_prefix: String::new(),
            upper_prefix: String::new(),
            classes: Default::default(),
            structs: Default::default(),
            enums: Default::default(),
            free_methods: Default::default(),
            fields: Default::default(),
            import: false,
            include_filename: None,
            parent: None,
        });

        let mut primitive_symbols = HashMap::new();
        for primitive in [PrimitiveType::Int, PrimitiveType::Bool, PrimitiveType::String, PrimitiveType::Void] {
            primitive_symbols.insert(primitive.name(), TypeSymbol::Primitive(primitive));
        }

        Self {
            compilation_units: Vec::new(),
            namespaces,
            classes: Arena::new(),
            structs: Arena::new(),
            enums: Arena::new(),
            methods: Arena::new(),
            fields: Arena::new(),
            properties: Arena::new(),
            constants: Arena::new(),
            type_refs: Arena::new(),
            expressions: Arena::new(),
            statements: Arena::new(),
            resolved: Vec::new(),
            method_cdecl: Vec::new(),
            root_namespace,
            primitive_symbols,
        }
    }

    pub fn primitive_symbol(&self, name: &str) -> Option<TypeSymbol> {
        self.primitive_symbols.get(name).copied()
    }

    pub fn push_expression(&mut self, expression: Expression) -> ExpressionId {
        let id = self.expressions.push(expression);
        debug_assert_eq!(id.0, self.resolved.len());
        self.resolved.push(None);
        id
    }

    pub fn resolved_info(&self, id: ExpressionId) -> Option<&ResolvedInfo> {
        self.resolved[id.0].as_ref()
    }

    /// Records the Type Resolver's output for `id`. Idempotent: a second
    /// call with an already-resolved id is a no-op, matching invariant 5.
    pub fn set_resolved_info(&mut self, id: ExpressionId, info: ResolvedInfo) {
        if self.resolved[id.0].is_none() {
            self.resolved[id.0] = Some(info);
        }
    }

    pub fn push_method(&mut self, method: Method) -> MethodId {
        let id = self.methods.push(method);
        debug_assert_eq!(id.0, self.method_cdecl.len());
        self.method_cdecl.push(None);
        id
    }

    pub fn method_cdecl(&self, id: MethodId) -> Option<&MethodCdecl> {
        self.method_cdecl[id.0].as_ref()
    }

    /// Assigns Pass 1 output to a method. Panics if called twice for the
    /// same method: `cname`/`cparameters`/`cdecl1` are written exactly
    /// once (invariant 4), so a second write is a core bug, not a
    /// recoverable condition.
    pub fn set_method_cdecl(&mut self, id: MethodId, cdecl: MethodCdecl) {
        assert!(self.method_cdecl[id.0].is_none(), "method cdecl assigned twice for {id:?}");
        self.method_cdecl[id.0] = Some(cdecl);
    }

    pub fn namespace(&self, id: NamespaceId) -> &Namespace {
        self.namespaces.get(id)
    }

    pub fn class(&self, id: ClassId) -> &Class {
        self.classes.get(id)
    }

    pub fn class_mut(&mut self, id: ClassId) -> &mut Class {
        self.classes.get_mut(id)
    }

    pub fn struct_def(&self, id: StructId) -> &StructDef {
        self.structs.get(id)
    }

    pub fn enum_def(&self, id: EnumId) -> &EnumDef {
        self.enums.get(id)
    }

    pub fn method(&self, id: MethodId) -> &Method {
        self.methods.get(id)
    }

    pub fn field(&self, id: FieldId) -> &Field {
        self.fields.get(id)
    }

    pub fn property(&self, id: PropertyId) -> &Property {
        self.properties.get(id)
    }

    pub fn constant(&self, id: ConstantId) -> &Constant {
        self.constants.get(id)
    }

    pub fn type_ref(&self, id: TypeRefId) -> &TypeRef {
        self.type_refs.get(id)
    }

    pub fn expression(&self, id: ExpressionId) -> &Expression {
        self.expressions.get(id)
    }

    pub fn statement(&self, id: StatementId) -> &Statement {
        self.statements.get(id)
    }

    /// Walks `class`'s base-class chain, innermost first, yielding `class`
    /// itself before any ancestor. Backs §4.1.1.
    pub fn class_chain(&self, class: ClassId) -> impl Iterator<Item = ClassId> + '_ {
        let mut current = Some(class);
        std::iter::from_fn(move || {
            let this = current?;
            current = self.class(this).base;
            Some(this)
        })
    }

    /// The namespace that declares `class`, found by scanning the namespace
    /// arena. Classes don't carry an owning-namespace back-pointer of their
    /// own (the front-end hands namespaces their member maps, not the
    /// reverse), so C-name derivation looks it up here instead of storing a
    /// second copy of the relationship.
    pub fn namespace_of_class(&self, class: ClassId) -> NamespaceId {
        self.namespaces
            .iter_with_ids()
            .find(|(_, namespace)| namespace.classes.values().any(|id| *id == class))
            .map(|(id, _)| id)
            .unwrap_or(self.root_namespace)
    }

    pub fn namespace_of_struct(&self, target: StructId) -> NamespaceId {
        self.namespaces
            .iter_with_ids()
            .find(|(_, namespace)| namespace.structs.values().any(|id| *id == target))
            .map(|(id, _)| id)
            .unwrap_or(self.root_namespace)
    }

    pub fn namespace_of_enum(&self, target: EnumId) -> NamespaceId {
        self.namespaces
            .iter_with_ids()
            .find(|(_, namespace)| namespace.enums.values().any(|id| *id == target))
            .map(|(id, _)| id)
            .unwrap_or(self.root_namespace)
    }

    /// The class that declares `field`, if any. `Field` is also usable as a
    /// namespace-level declaration (§4.2), so unlike the `namespace_of_*`
    /// lookups above this one can legitimately come back empty.
    pub fn owning_class_of_field(&self, field: FieldId) -> Option<ClassId> {
        self.classes
            .iter_with_ids()
            .find(|(_, class)| class.fields.values().any(|id| *id == field))
            .map(|(id, _)| id)
    }

    /// The namespace that declares `field` directly (not through a class).
    pub fn namespace_of_field(&self, field: FieldId) -> Option<NamespaceId> {
        self.namespaces
            .iter_with_ids()
            .find(|(_, namespace)| namespace.fields.values().any(|id| *id == field))
            .map(|(id, _)| id)
    }
}
