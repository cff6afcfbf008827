//! Filter operator grammar.
//!
//! Operators are fixed tokens like `==`, `!=`, `>=`, or `@=*`. Matching is
//! longest-token-first so that `!=null` is never read as `!=` followed by a
//! value of `null`, and `@=*` is never read as `@=` with a trailing `*`.

use std::fmt;
use std::str::FromStr;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

/// Comparison semantics an operator token resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Comparison {
    Equal,
    NotEqual,
    GreaterThan,
    GreaterOrEqual,
    LessThan,
    LessOrEqual,
    IsNull,
    IsNotNull,
    Contains,
    StartsWith,
    EndsWith,
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            Comparison::Equal => "equal",
            Comparison::NotEqual => "notEqual",
            Comparison::GreaterThan => "greaterThan",
            Comparison::GreaterOrEqual => "greaterOrEqual",
            Comparison::LessThan => "lessThan",
            Comparison::LessOrEqual => "lessOrEqual",
            Comparison::IsNull => "isNull",
            Comparison::IsNotNull => "isNotNull",
            Comparison::Contains => "contains",
            Comparison::StartsWith => "startsWith",
            Comparison::EndsWith => "endsWith",
        })
    }
}

/// A recognized filter operator token.
///
/// The `*`-suffixed spellings (`@=*`, `_=*`) are kept as distinct variants
/// so a parsed query serializes back to exactly what was written, but they
/// carry the same semantics as the plain spellings: the whole
/// contains/starts-with/ends-with family is case-insensitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    /// `!=null`
    IsNotNull,
    /// `==null`
    IsNull,
    /// `!_-=`
    NotEndsWith,
    /// `_-=`
    EndsWith,
    /// `!@=`
    NotContains,
    /// `@=*`
    ContainsCi,
    /// `@=`
    Contains,
    /// `!_=`
    NotStartsWith,
    /// `_=*`
    StartsWithCi,
    /// `_=`
    StartsWith,
    /// `!=`
    NotEquals,
    /// `==`
    Equals,
    /// `>=`
    GreaterOrEqual,
    /// `<=`
    LessOrEqual,
    /// `>`
    GreaterThan,
    /// `<`
    LessThan,
}

/// Every operator in match order. Wherever two tokens share a prefix the
/// longer one comes first, so a linear scan is longest-match.
const MATCH_ORDER: [Operator; 16] = [
    Operator::IsNotNull,
    Operator::IsNull,
    Operator::NotEndsWith,
    Operator::EndsWith,
    Operator::NotContains,
    Operator::ContainsCi,
    Operator::Contains,
    Operator::NotStartsWith,
    Operator::StartsWithCi,
    Operator::StartsWith,
    Operator::NotEquals,
    Operator::Equals,
    Operator::GreaterOrEqual,
    Operator::LessOrEqual,
    Operator::GreaterThan,
    Operator::LessThan,
];

impl Operator {
    /// All operators in match order.
    pub fn all() -> &'static [Operator] {
        &MATCH_ORDER
    }

    /// The token exactly as it appears in a query string.
    pub fn token(&self) -> &'static str {
        match self {
            Operator::IsNotNull => "!=null",
            Operator::IsNull => "==null",
            Operator::NotEndsWith => "!_-=",
            Operator::EndsWith => "_-=",
            Operator::NotContains => "!@=",
            Operator::ContainsCi => "@=*",
            Operator::Contains => "@=",
            Operator::NotStartsWith => "!_=",
            Operator::StartsWithCi => "_=*",
            Operator::StartsWith => "_=",
            Operator::NotEquals => "!=",
            Operator::Equals => "==",
            Operator::GreaterOrEqual => ">=",
            Operator::LessOrEqual => "<=",
            Operator::GreaterThan => ">",
            Operator::LessThan => "<",
        }
    }

    /// The comparison this token asks for.
    pub fn comparison(&self) -> Comparison {
        match self {
            Operator::Equals => Comparison::Equal,
            Operator::NotEquals => Comparison::NotEqual,
            Operator::GreaterThan => Comparison::GreaterThan,
            Operator::GreaterOrEqual => Comparison::GreaterOrEqual,
            Operator::LessThan => Comparison::LessThan,
            Operator::LessOrEqual => Comparison::LessOrEqual,
            Operator::IsNull => Comparison::IsNull,
            Operator::IsNotNull => Comparison::IsNotNull,
            Operator::Contains | Operator::ContainsCi | Operator::NotContains => {
                Comparison::Contains
            }
            Operator::StartsWith | Operator::StartsWithCi | Operator::NotStartsWith => {
                Comparison::StartsWith
            }
            Operator::EndsWith | Operator::NotEndsWith => Comparison::EndsWith,
        }
    }

    /// True for tokens spelled with a leading `!`, including `!=` and
    /// `!=null`.
    pub fn is_negated(&self) -> bool {
        self.token().starts_with('!')
    }

    /// True for the contains/starts-with/ends-with family, regardless of
    /// spelling.
    pub fn is_case_insensitive(&self) -> bool {
        matches!(
            self.comparison(),
            Comparison::Contains | Comparison::StartsWith | Comparison::EndsWith
        )
    }

    /// True for `==null` and `!=null`, whose clauses always carry a null
    /// value.
    pub fn is_null_comparison(&self) -> bool {
        matches!(self, Operator::IsNull | Operator::IsNotNull)
    }

    /// The longest operator token starting at byte `pos` of `expr`, if any.
    pub(crate) fn match_at(expr: &str, pos: usize) -> Option<Operator> {
        let rest = &expr[pos..];
        MATCH_ORDER
            .iter()
            .copied()
            .find(|op| rest.starts_with(op.token()))
    }

    /// The leftmost position in `expr` where any operator token matches,
    /// together with the (longest) matching token.
    pub(crate) fn find_in(expr: &str) -> Option<(usize, Operator)> {
        expr.char_indices()
            .find_map(|(pos, _)| Self::match_at(expr, pos).map(|op| (pos, op)))
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.token())
    }
}

/// Error for operator tokens outside the grammar.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognized operator token '{0}'")]
pub struct UnknownOperator(pub String);

impl FromStr for Operator {
    type Err = UnknownOperator;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        MATCH_ORDER
            .iter()
            .copied()
            .find(|op| op.token() == s)
            .ok_or_else(|| UnknownOperator(s.to_string()))
    }
}

impl Serialize for Operator {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.token())
    }
}

impl<'de> Deserialize<'de> for Operator {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let token = String::deserialize(deserializer)?;
        token.parse().map_err(de::Error::custom)
    }
}
