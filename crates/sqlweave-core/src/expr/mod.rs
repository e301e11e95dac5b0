//! Typed expression trees.
//!
//! [`Expr`] is a closed AST for the bodies of single-parameter predicate
//! and projection lambdas. It can represent more than the translator
//! accepts (logical operators, arithmetic, method calls, conditionals);
//! those nodes exist so that rejecting them is an explicit, exhaustive
//! match in [`translate`].
//!
//! ```rust
//! use sqlweave_core::expr::{lambda, translate};
//! use sqlweave_core::PostgresDialect;
//!
//! let predicate = lambda("u", |u| u.member("Active").eq(true));
//! let rendered = translate(&predicate).unwrap().render(&PostgresDialect);
//! assert_eq!(rendered.sql, r#"("u"."Active" = $1)"#);
//! ```

mod translate;

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::value::{SqlValue, ToSqlValue};

pub use translate::translate;

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    /// `=`
    Equal,
    /// `<>`
    NotEqual,
    /// `>`
    GreaterThan,
    /// `>=`
    GreaterThanOrEqual,
    /// `<`
    LessThan,
    /// `<=`
    LessThanOrEqual,
    /// Short-circuit logical and.
    AndAlso,
    /// Short-circuit logical or.
    OrElse,
    /// `+`
    Add,
    /// `-`
    Subtract,
    /// `*`
    Multiply,
    /// `/`
    Divide,
    /// Null coalescing.
    Coalesce,
}

impl BinaryOp {
    /// Returns the node kind name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Equal => "Equal",
            Self::NotEqual => "NotEqual",
            Self::GreaterThan => "GreaterThan",
            Self::GreaterThanOrEqual => "GreaterThanOrEqual",
            Self::LessThan => "LessThan",
            Self::LessThanOrEqual => "LessThanOrEqual",
            Self::AndAlso => "AndAlso",
            Self::OrElse => "OrElse",
            Self::Add => "Add",
            Self::Subtract => "Subtract",
            Self::Multiply => "Multiply",
            Self::Divide => "Divide",
            Self::Coalesce => "Coalesce",
        }
    }

    /// Returns the SQL operator for comparisons, `None` for everything else.
    #[must_use]
    pub const fn comparison(self) -> Option<&'static str> {
        match self {
            Self::Equal => Some("="),
            Self::NotEqual => Some("<>"),
            Self::GreaterThan => Some(">"),
            Self::GreaterThanOrEqual => Some(">="),
            Self::LessThan => Some("<"),
            Self::LessThanOrEqual => Some("<="),
            Self::AndAlso
            | Self::OrElse
            | Self::Add
            | Self::Subtract
            | Self::Multiply
            | Self::Divide
            | Self::Coalesce => None,
        }
    }
}

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    /// Logical negation.
    Not,
    /// Arithmetic negation.
    Negate,
    /// Type conversion.
    Convert,
}

impl UnaryOp {
    /// Returns the node kind name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Not => "Not",
            Self::Negate => "Negate",
            Self::Convert => "Convert",
        }
    }
}

/// A captured closure environment.
///
/// Member access on a capture is evaluated during translation and becomes
/// a bound parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct Captured {
    name: String,
    fields: BTreeMap<String, SqlValue>,
}

impl Captured {
    /// Creates an empty capture.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: BTreeMap::new(),
        }
    }

    /// Adds a captured field.
    #[must_use]
    pub fn field(mut self, name: impl Into<String>, value: impl ToSqlValue) -> Self {
        self.fields.insert(name.into(), value.to_sql_value());
        self
    }

    /// Returns the capture's name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Looks up a captured field.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&SqlValue> {
        self.fields.get(field)
    }
}

/// An expression node.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Single-parameter lambda.
    Lambda {
        /// Parameter name; also the table alias.
        parameter: String,
        /// Lambda body.
        body: Box<Expr>,
    },
    /// Reference to the lambda parameter.
    Parameter(String),
    /// Field or property access.
    Member {
        /// The accessed object.
        receiver: Box<Expr>,
        /// Member name.
        member: String,
    },
    /// A constant value.
    Constant(SqlValue),
    /// A captured closure environment.
    Captured(Captured),
    /// Binary operation.
    Binary {
        /// Operator.
        op: BinaryOp,
        /// Left operand.
        left: Box<Expr>,
        /// Right operand.
        right: Box<Expr>,
    },
    /// Unary operation.
    Unary {
        /// Operator.
        op: UnaryOp,
        /// Operand.
        operand: Box<Expr>,
    },
    /// Method call.
    Call {
        /// Method name.
        method: String,
        /// Receiver, `None` for static calls.
        receiver: Option<Box<Expr>>,
        /// Call arguments.
        arguments: Vec<Expr>,
    },
    /// Object construction with member assignments, in declaration order.
    MemberInit {
        /// `(member, value)` pairs.
        bindings: Vec<(String, Expr)>,
    },
    /// `test ? if_true : if_false`.
    Conditional {
        /// Condition.
        test: Box<Expr>,
        /// Value when true.
        if_true: Box<Expr>,
        /// Value when false.
        if_false: Box<Expr>,
    },
}

impl Expr {
    /// Returns the textual node kind reported by translation errors.
    ///
    /// Binary and unary nodes report their operator (`AndAlso`, `Not`).
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Lambda { .. } => "Lambda",
            Self::Parameter(_) => "Parameter",
            Self::Member { .. } => "Member",
            Self::Constant(_) => "Constant",
            Self::Captured(_) => "Captured",
            Self::Binary { op, .. } => op.name(),
            Self::Unary { op, .. } => op.name(),
            Self::Call { .. } => "Call",
            Self::MemberInit { .. } => "MemberInit",
            Self::Conditional { .. } => "Conditional",
        }
    }

    /// Accesses `member` on this expression.
    #[must_use]
    pub fn member(self, member: impl Into<String>) -> Self {
        Self::Member {
            receiver: Box::new(self),
            member: member.into(),
        }
    }

    /// Builds a binary node with `self` on the left.
    #[must_use]
    pub fn binary(self, op: BinaryOp, right: impl Into<Self>) -> Self {
        Self::Binary {
            op,
            left: Box::new(self),
            right: Box::new(right.into()),
        }
    }

    /// Equal to (`=`).
    #[must_use]
    pub fn eq(self, right: impl Into<Self>) -> Self {
        self.binary(BinaryOp::Equal, right)
    }

    /// Not equal to (`<>`).
    #[must_use]
    pub fn not_eq(self, right: impl Into<Self>) -> Self {
        self.binary(BinaryOp::NotEqual, right)
    }

    /// Greater than (`>`).
    #[must_use]
    pub fn gt(self, right: impl Into<Self>) -> Self {
        self.binary(BinaryOp::GreaterThan, right)
    }

    /// Greater than or equal (`>=`).
    #[must_use]
    pub fn gt_eq(self, right: impl Into<Self>) -> Self {
        self.binary(BinaryOp::GreaterThanOrEqual, right)
    }

    /// Less than (`<`).
    #[must_use]
    pub fn lt(self, right: impl Into<Self>) -> Self {
        self.binary(BinaryOp::LessThan, right)
    }

    /// Less than or equal (`<=`).
    #[must_use]
    pub fn lt_eq(self, right: impl Into<Self>) -> Self {
        self.binary(BinaryOp::LessThanOrEqual, right)
    }

    /// Logical and.
    #[must_use]
    pub fn and(self, right: impl Into<Self>) -> Self {
        self.binary(BinaryOp::AndAlso, right)
    }

    /// Logical or.
    #[must_use]
    pub fn or(self, right: impl Into<Self>) -> Self {
        self.binary(BinaryOp::OrElse, right)
    }

    /// Logical negation.
    #[must_use]
    #[allow(clippy::should_implement_trait)]
    pub fn not(self) -> Self {
        Self::Unary {
            op: UnaryOp::Not,
            operand: Box::new(self),
        }
    }

    /// Calls `method` on this expression.
    #[must_use]
    pub fn call(self, method: impl Into<String>, arguments: Vec<Self>) -> Self {
        Self::Call {
            method: method.into(),
            receiver: Some(Box::new(self)),
            arguments,
        }
    }
}

/// Builds a lambda; `body` receives the parameter node.
pub fn lambda(parameter: impl Into<String>, body: impl FnOnce(Expr) -> Expr) -> Expr {
    let parameter = parameter.into();
    let body = body(Expr::Parameter(parameter.clone()));
    Expr::Lambda {
        parameter,
        body: Box::new(body),
    }
}

/// A parameter reference.
#[must_use]
pub fn param(name: impl Into<String>) -> Expr {
    Expr::Parameter(name.into())
}

/// A constant.
#[must_use]
pub fn constant(value: impl ToSqlValue) -> Expr {
    Expr::Constant(value.to_sql_value())
}

/// A captured environment.
#[must_use]
pub fn captured(captured: Captured) -> Expr {
    Expr::Captured(captured)
}

/// Accesses `member` on `receiver`.
#[must_use]
pub fn member(receiver: Expr, member: impl Into<String>) -> Expr {
    receiver.member(member)
}

/// Object construction from `(member, value)` bindings.
#[must_use]
pub fn init<I, S>(bindings: I) -> Expr
where
    I: IntoIterator<Item = (S, Expr)>,
    S: Into<String>,
{
    Expr::MemberInit {
        bindings: bindings
            .into_iter()
            .map(|(name, value)| (name.into(), value))
            .collect(),
    }
}

/// `test ? if_true : if_false`.
#[must_use]
pub fn conditional(test: Expr, if_true: impl Into<Expr>, if_false: impl Into<Expr>) -> Expr {
    Expr::Conditional {
        test: Box::new(test),
        if_true: Box::new(if_true.into()),
        if_false: Box::new(if_false.into()),
    }
}

impl From<SqlValue> for Expr {
    fn from(value: SqlValue) -> Self {
        Self::Constant(value)
    }
}

impl From<Captured> for Expr {
    fn from(value: Captured) -> Self {
        Self::Captured(value)
    }
}

impl<T: ToSqlValue> From<Option<T>> for Expr {
    fn from(value: Option<T>) -> Self {
        Self::Constant(value.to_sql_value())
    }
}

macro_rules! impl_constant_expr {
    ($($ty:ty),+) => {
        $(
            impl From<$ty> for Expr {
                fn from(value: $ty) -> Self {
                    Self::Constant(value.to_sql_value())
                }
            }
        )+
    };
}

impl_constant_expr!(
    bool,
    i64,
    i32,
    i16,
    i8,
    u32,
    u16,
    u8,
    f64,
    f32,
    String,
    &str,
    Vec<u8>,
    DateTime<Utc>
);
