use num_bigint::BigInt;
use num_traits::Zero;
use serde::{Deserialize, Serialize};

/// Index of a variable in its function's arena.
///
/// Two operands refer to the same produced value iff their `VarId`s are equal.
/// This is the only notion of identity the matcher uses; comparing the
/// [`Variable`]s behind two ids is value equality and says nothing about
/// whether they came from the same operation.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct VarId(pub u32);

impl VarId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for VarId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "%{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Variable {
    NamedLocal {
        name: String,
    },
    Literal {
        value: Constant,
    },
    Temporary {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        ty: Option<String>,
    },
}

impl Variable {
    pub fn local(name: impl Into<String>) -> Self {
        Variable::NamedLocal { name: name.into() }
    }

    pub fn literal(value: impl Into<Constant>) -> Self {
        Variable::Literal {
            value: value.into(),
        }
    }

    pub fn temporary() -> Self {
        Variable::Temporary { ty: None }
    }

    pub fn local_name(&self) -> Option<&str> {
        match self {
            Variable::NamedLocal { name } => Some(name),
            _ => None,
        }
    }

    pub fn as_literal(&self) -> Option<&Constant> {
        match self {
            Variable::Literal { value } => Some(value),
            _ => None,
        }
    }

    pub fn is_temporary(&self) -> bool {
        matches!(self, Variable::Temporary { .. })
    }
}

impl std::fmt::Display for Variable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Variable::NamedLocal { name } => write!(f, "{}", name),
            Variable::Literal { value } => write!(f, "{}", value),
            Variable::Temporary { ty: Some(ty) } => write!(f, "tmp:{}", ty),
            Variable::Temporary { ty: None } => write!(f, "tmp"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Constant {
    Int(#[serde(with = "decimal")] BigInt),
    Bool(bool),
    String(String),
}

impl Constant {
    pub fn zero() -> Self {
        Constant::Int(BigInt::from(0))
    }

    pub fn is_zero(&self) -> bool {
        matches!(self, Constant::Int(value) if value.is_zero())
    }
}

impl From<i64> for Constant {
    fn from(value: i64) -> Self {
        Constant::Int(BigInt::from(value))
    }
}

impl From<i32> for Constant {
    fn from(value: i32) -> Self {
        Constant::Int(BigInt::from(value))
    }
}

impl From<BigInt> for Constant {
    fn from(value: BigInt) -> Self {
        Constant::Int(value)
    }
}

impl From<bool> for Constant {
    fn from(value: bool) -> Self {
        Constant::Bool(value)
    }
}

impl From<&str> for Constant {
    fn from(value: &str) -> Self {
        Constant::String(value.to_string())
    }
}

impl std::fmt::Display for Constant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Constant::Int(value) => write!(f, "{}", value),
            Constant::Bool(b) => write!(f, "{}", b),
            Constant::String(s) => write!(f, "\"{}\"", s),
        }
    }
}

/// Integers travel as decimal strings so 256-bit literals survive JSON.
/// Plain JSON numbers are accepted on input.
mod decimal {
    use num_bigint::BigInt;
    use serde::de::{self, Visitor};
    use serde::{Deserializer, Serializer};
    use std::fmt;
    use std::str::FromStr;

    pub fn serialize<S: Serializer>(value: &BigInt, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<BigInt, D::Error> {
        deserializer.deserialize_any(DecimalVisitor)
    }

    struct DecimalVisitor;

    impl<'de> Visitor<'de> for DecimalVisitor {
        type Value = BigInt;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("an integer or a decimal string")
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<BigInt, E> {
            Ok(BigInt::from(v))
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<BigInt, E> {
            Ok(BigInt::from(v))
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<BigInt, E> {
            BigInt::from_str(v.trim()).map_err(|_| E::custom(format!("invalid integer: {}", v)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_accepts_string_and_number() {
        let from_str: Constant = serde_json::from_str(r#"{"int": "0"}"#).unwrap();
        let from_num: Constant = serde_json::from_str(r#"{"int": 0}"#).unwrap();
        assert_eq!(from_str, from_num);
        assert!(from_str.is_zero());
    }

    #[test]
    fn test_constant_keeps_wide_integers() {
        let max = "115792089237316195423570985008687907853269984665640564039457584007913129639935";
        let constant: Constant =
            serde_json::from_str(&format!(r#"{{"int": "{}"}}"#, max)).unwrap();
        assert_eq!(constant.to_string(), max);
        assert_eq!(
            serde_json::to_string(&constant).unwrap(),
            format!(r#"{{"int":"{}"}}"#, max)
        );
    }

    #[test]
    fn test_value_equality_is_not_identity() {
        let a = Variable::literal(0);
        let b = Variable::literal(0);
        assert_eq!(a, b);
        assert_ne!(VarId(1), VarId(2));
    }
}
