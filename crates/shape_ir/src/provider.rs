//! The metadata capability consumed by the resolver.

use crate::{ClassDef, ClassId, FieldDef, FieldId, Name, TypeExpr, TypeShape};

/// Read-only access to class, field, and generic-signature metadata.
///
/// The resolver never writes through this trait and never performs I/O; any
/// schema source (an in-memory [`ClassRegistry`](crate::ClassRegistry), a
/// generated table, a loaded descriptor) can back it.
pub trait TypeMetadataProvider {
    /// The definition of a class.
    fn class(&self, id: ClassId) -> &ClassDef;

    /// The definition of a field.
    fn field(&self, id: FieldId) -> &FieldDef;

    /// The string behind an interned name.
    fn resolve_name(&self, name: Name) -> &str;

    /// Fields declared directly on `class`, in declaration order.
    fn declared_fields(&self, class: ClassId) -> &[FieldId] {
        &self.class(class).fields
    }

    /// Type parameters declared on `class`, in declaration order.
    fn declared_type_params(&self, class: ClassId) -> &[Name] {
        &self.class(class).type_params
    }

    /// Classify a type expression.
    fn classify<'t>(&self, ty: &'t TypeExpr) -> TypeShape<'t> {
        ty.shape()
    }

    /// Qualified class name, e.g. `java.util.Map`.
    fn class_name(&self, id: ClassId) -> String {
        let class = self.class(id);
        match class.namespace {
            Some(ns) => format!("{}.{}", self.resolve_name(ns), self.resolve_name(class.name)),
            None => self.resolve_name(class.name).to_owned(),
        }
    }

    /// Render a type expression as written, e.g. `java.util.Map<K, java.lang.Long>`.
    ///
    /// Type variables render as their bare name.
    fn type_name(&self, ty: &TypeExpr) -> String {
        let mut out = String::new();
        write_type(self, ty, &mut out);
        out
    }
}

fn write_type<P: TypeMetadataProvider + ?Sized>(provider: &P, ty: &TypeExpr, out: &mut String) {
    match ty {
        TypeExpr::Class(id) => out.push_str(&provider.class_name(*id)),
        TypeExpr::Var(name) => out.push_str(provider.resolve_name(*name)),
        TypeExpr::Parameterized { raw, args } => {
            out.push_str(&provider.class_name(*raw));
            out.push('<');
            for (i, arg) in args.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_type(provider, arg, out);
            }
            out.push('>');
        }
        TypeExpr::Wildcard { bound: None } => out.push('?'),
        TypeExpr::Wildcard { bound: Some(bound) } => {
            out.push_str("? extends ");
            write_type(provider, bound, out);
        }
        TypeExpr::Array(component) => {
            write_type(provider, component, out);
            out.push_str("[]");
        }
    }
}
