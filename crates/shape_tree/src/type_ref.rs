//! Parameterized type bindings remembered during resolution.

use shape_ir::{ClassId, TypeExpr};

/// A raw class together with the type arguments it was used with.
///
/// Recorded whenever a type-variable map binds a parameter to a
/// parameterized type, so children that inherit that binding reuse the exact
/// arguments instead of re-deriving them. Equal iff the raw class and the
/// arguments are pairwise equal in order.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TypeRef {
    raw: ClassId,
    args: Vec<TypeExpr>,
}

impl TypeRef {
    /// Create a type reference.
    pub fn new(raw: ClassId, args: Vec<TypeExpr>) -> Self {
        Self { raw, args }
    }

    /// The generic class.
    #[inline]
    pub fn raw(&self) -> ClassId {
        self.raw
    }

    /// The type arguments, in declaration order.
    #[inline]
    pub fn args(&self) -> &[TypeExpr] {
        &self.args
    }

    /// The full parameterized type this reference stands for.
    pub fn to_type_expr(&self) -> TypeExpr {
        TypeExpr::parameterized(self.raw, self.args.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shape_ir::Name;

    #[test]
    fn test_equality_is_positional() {
        let map = ClassId::new(1);
        let k = TypeExpr::Var(Name::from_raw(1));
        let long = TypeExpr::Class(ClassId::new(2));

        let a = TypeRef::new(map, vec![k.clone(), long.clone()]);
        let b = TypeRef::new(map, vec![k.clone(), long.clone()]);
        let swapped = TypeRef::new(map, vec![long, k]);

        assert_eq!(a, b);
        assert_ne!(a, swapped);
    }

    #[test]
    fn test_to_type_expr() {
        let list = ClassId::new(4);
        let r = TypeRef::new(list, vec![TypeExpr::Class(ClassId::new(2))]);
        assert_eq!(
            r.to_type_expr(),
            TypeExpr::parameterized(list, vec![TypeExpr::Class(ClassId::new(2))])
        );
        assert_eq!(r.raw(), list);
        assert_eq!(r.args().len(), 1);
    }
}
