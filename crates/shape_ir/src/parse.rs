//! Parser for written type expressions.
//!
//! Accepts the type syntax found in field declarations:
//!
//! ```text
//! type     := base ("[" "]")*
//! base     := "?" ("extends" type)?
//!           | ident ("<" type ("," type)* ">")?
//! ident    := [A-Za-z_$][A-Za-z0-9_$.]*
//! ```
//!
//! Identifiers are resolved while parsing: a bare identifier that names a type
//! parameter of the owner class becomes [`TypeExpr::Var`], anything else must
//! name a registered class.

use crate::{ClassId, ClassRegistry, SchemaError, TypeExpr, TypeMetadataProvider};

pub(crate) fn parse_type(
    registry: &ClassRegistry,
    owner: Option<ClassId>,
    src: &str,
) -> Result<TypeExpr, SchemaError> {
    let mut parser = Parser {
        registry,
        owner,
        src,
        pos: 0,
    };
    let ty = parser.parse_type()?;
    parser.skip_whitespace();
    if parser.pos < src.len() {
        return Err(parser.error("unexpected trailing input"));
    }
    Ok(ty)
}

struct Parser<'a> {
    registry: &'a ClassRegistry,
    owner: Option<ClassId>,
    src: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn parse_type(&mut self) -> Result<TypeExpr, SchemaError> {
        let mut ty = self.parse_base()?;
        while self.eat(b'[') {
            self.expect(b']')?;
            ty = TypeExpr::array(ty);
        }
        Ok(ty)
    }

    fn parse_base(&mut self) -> Result<TypeExpr, SchemaError> {
        if self.eat(b'?') {
            let checkpoint = self.pos;
            if self.parse_ident().is_some_and(|word| word == "extends") {
                let bound = self.parse_type()?;
                return Ok(TypeExpr::Wildcard {
                    bound: Some(Box::new(bound)),
                });
            }
            self.pos = checkpoint;
            return Ok(TypeExpr::wildcard());
        }

        self.skip_whitespace();
        let start = self.pos;
        let Some(ident) = self.parse_ident() else {
            return Err(self.error("expected a type name"));
        };

        if self.eat(b'<') {
            let mut args = vec![self.parse_type()?];
            while self.eat(b',') {
                args.push(self.parse_type()?);
            }
            self.expect(b'>')?;
            let raw = self.class(ident, start)?;
            return Ok(TypeExpr::parameterized(raw, args));
        }

        if let Some(var) = self.type_param(ident) {
            return Ok(var);
        }
        Ok(TypeExpr::Class(self.class(ident, start)?))
    }

    fn type_param(&self, ident: &str) -> Option<TypeExpr> {
        let owner = self.owner?;
        let name = self.registry.lookup_name(ident)?;
        self.registry
            .declared_type_params(owner)
            .contains(&name)
            .then_some(TypeExpr::Var(name))
    }

    fn class(&self, ident: &str, start: usize) -> Result<ClassId, SchemaError> {
        self.registry.class_by_name(ident).map_err(|err| match err {
            SchemaError::UnknownClass { .. } => SchemaError::Syntax {
                input: self.src.to_owned(),
                position: start,
                message: format!("unknown class `{ident}`"),
            },
            other => other,
        })
    }

    fn parse_ident(&mut self) -> Option<&'a str> {
        self.skip_whitespace();
        let src: &'a str = self.src;
        let bytes = src.as_bytes();
        let start = self.pos;
        match bytes.get(start) {
            Some(b) if b.is_ascii_alphabetic() || *b == b'_' || *b == b'$' => {}
            _ => return None,
        }
        let mut end = start + 1;
        while let Some(b) = bytes.get(end) {
            if b.is_ascii_alphanumeric() || matches!(b, b'_' | b'$' | b'.') {
                end += 1;
            } else {
                break;
            }
        }
        self.pos = end;
        Some(&src[start..end])
    }

    fn eat(&mut self, byte: u8) -> bool {
        self.skip_whitespace();
        if self.src.as_bytes().get(self.pos) == Some(&byte) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, byte: u8) -> Result<(), SchemaError> {
        if self.eat(byte) {
            Ok(())
        } else {
            Err(self.error(&format!("expected `{}`", char::from(byte))))
        }
    }

    fn skip_whitespace(&mut self) {
        while self
            .src
            .as_bytes()
            .get(self.pos)
            .is_some_and(u8::is_ascii_whitespace)
        {
            self.pos += 1;
        }
    }

    fn error(&self, message: &str) -> SchemaError {
        SchemaError::Syntax {
            input: self.src.to_owned(),
            position: self.pos,
            message: message.to_owned(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, reason = "tests panic on unexpected state")]
mod tests;
