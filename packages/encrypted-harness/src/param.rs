use crate::literal::Literal;
use bytes::BytesMut;
use postgres_types::{to_sql_checked, FromSql, Format, IsNull, Kind, ToSql, Type};
use serde_json::Value;
use std::{
    error::Error,
    fmt::{self, Debug, Display, Formatter},
};

///
/// A value that can be sent in every execution mode:
///     bound in the extended protocol
///     declared with its own type when nothing was described
///     rendered as a literal when nothing is bound at all
///
pub trait Param: Debug + Send + Sync {
    fn as_sql(&self) -> &(dyn ToSql + Sync);

    fn literal(&self) -> Literal;

    /// Type declared for the parameter when the statement was not described first
    fn type_hint(&self) -> Type;
}

macro_rules! impl_param {
    ($ty:ty, $pg:expr, |$v:ident| $literal:expr) => {
        impl Param for $ty {
            fn as_sql(&self) -> &(dyn ToSql + Sync) {
                self
            }

            fn literal(&self) -> Literal {
                let $v = self;
                $literal
            }

            fn type_hint(&self) -> Type {
                $pg
            }
        }
    };
}

impl_param!(bool, Type::BOOL, |v| Literal::Bool(*v));
impl_param!(i16, Type::INT2, |v| Literal::Integer(i64::from(*v)));
impl_param!(i32, Type::INT4, |v| Literal::Integer(i64::from(*v)));
impl_param!(i64, Type::INT8, |v| Literal::Integer(*v));
impl_param!(f64, Type::FLOAT8, |v| Literal::Float(*v));
impl_param!(String, Type::TEXT, |v| Literal::Text(v.to_owned()));
impl_param!(&str, Type::TEXT, |v| Literal::Text(v.to_string()));
impl_param!(Value, Type::JSONB, |v| Literal::Text(v.to_string()));

///
/// A JSON document or JSON path used as the right hand side of a JSONB operator or function.
///
/// Always sent as text so the server can coerce it to whatever the operator expects
/// (`jsonb`, `jsonpath`, or an encrypted type).
///
#[derive(Debug, Clone, PartialEq)]
pub struct Selector(String);

impl Selector {
    pub fn new(selector: &str) -> Self {
        Selector(selector.to_string())
    }

    pub fn json(value: &Value) -> Self {
        Selector(value.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Selector {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl ToSql for Selector {
    fn to_sql(
        &self,
        _ty: &Type,
        out: &mut BytesMut,
    ) -> Result<IsNull, Box<dyn Error + Sync + Send>> {
        out.extend_from_slice(self.0.as_bytes());
        Ok(IsNull::No)
    }

    fn accepts(_ty: &Type) -> bool {
        true
    }

    /// Text encoding is valid for every type the selector may be coerced to
    fn encode_format(&self, _ty: &Type) -> Format {
        Format::Text
    }

    to_sql_checked!();
}

impl Param for Selector {
    fn as_sql(&self) -> &(dyn ToSql + Sync) {
        self
    }

    fn literal(&self) -> Literal {
        Literal::Text(self.0.to_owned())
    }

    fn type_hint(&self) -> Type {
        Type::UNKNOWN
    }
}

///
/// Value of the `domain_type_with_check` domain.
///
/// The domain's OID is assigned when the schema is created, so the type is matched by shape:
/// any text type, or a domain over one.
///
#[derive(Debug, Clone, PartialEq)]
pub struct Domain(pub String);

impl Domain {
    pub const NAME: &'static str = "domain_type_with_check";

    fn accepts_text(ty: &Type) -> bool {
        <String as ToSql>::accepts(ty)
    }
}

impl ToSql for Domain {
    fn to_sql(
        &self,
        ty: &Type,
        out: &mut BytesMut,
    ) -> Result<IsNull, Box<dyn Error + Sync + Send>> {
        match ty.kind() {
            Kind::Domain(inner) => self.0.to_sql(inner, out),
            _ => self.0.to_sql(ty, out),
        }
    }

    fn accepts(ty: &Type) -> bool {
        match ty.kind() {
            Kind::Domain(inner) => Domain::accepts_text(inner),
            _ => Domain::accepts_text(ty),
        }
    }

    to_sql_checked!();
}

impl<'a> FromSql<'a> for Domain {
    fn from_sql(ty: &Type, raw: &'a [u8]) -> Result<Self, Box<dyn Error + Sync + Send>> {
        let s = match ty.kind() {
            Kind::Domain(inner) => String::from_sql(inner, raw)?,
            _ => String::from_sql(ty, raw)?,
        };
        Ok(Domain(s))
    }

    fn accepts(ty: &Type) -> bool {
        match ty.kind() {
            Kind::Domain(inner) => <String as FromSql>::accepts(inner),
            _ => <String as FromSql>::accepts(ty),
        }
    }
}

impl Param for Domain {
    fn as_sql(&self) -> &(dyn ToSql + Sync) {
        self
    }

    fn literal(&self) -> Literal {
        Literal::Text(self.0.to_owned())
    }

    fn type_hint(&self) -> Type {
        Type::UNKNOWN
    }
}

impl Display for Domain {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
