//! Composable SQL fragments.
//!
//! A [`SqlFragment`] is a template with positional holes (`{0}`, `{1}`, ...)
//! plus one [`Argument`] per hole. Fragments are immutable; larger
//! statements are built by nesting fragments as arguments or by joining
//! them. Nothing is quoted or parameterized until the fragment is rendered
//! for a concrete [`Dialect`](crate::Dialect).
//!
//! ```rust
//! use sqlweave_core::{sql, PostgresDialect, SqlFragment};
//!
//! let users = SqlFragment::qualified("public", "users");
//! let query = sql!("SELECT * FROM {0} WHERE {1} = {2}", users, SqlFragment::identifier("id"), 7);
//!
//! let rendered = query.render(&PostgresDialect);
//! assert_eq!(rendered.sql, r#"SELECT * FROM "public"."users" WHERE "id" = $1"#);
//! ```

use std::fmt;

use chrono::{DateTime, Utc};

use crate::error::FragmentError;
use crate::value::{SqlValue, ToSqlValue};

/// A table or column name, quoted as a delimited identifier at render time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identifier {
    prefix: Option<String>,
    value: String,
}

impl Identifier {
    /// Creates an unqualified identifier.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            prefix: None,
            value: value.into(),
        }
    }

    /// Creates an identifier qualified by a schema or table alias.
    #[must_use]
    pub fn qualified(prefix: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            prefix: Some(prefix.into()),
            value: value.into(),
        }
    }

    /// Returns the qualifier, if any.
    #[must_use]
    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    /// Returns the name itself.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// `*` renders unquoted.
    #[must_use]
    pub fn is_wildcard(&self) -> bool {
        self.value == "*"
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.prefix {
            Some(prefix) => write!(f, "{prefix}.{}", self.value),
            None => f.write_str(&self.value),
        }
    }
}

/// Text embedded as a quoted string literal rather than a bound parameter.
///
/// Some DDL forms only accept names as literals. Like [`Identifier`], this
/// is reserved for trusted metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Literal {
    value: String,
}

impl Literal {
    /// Creates a literal.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }

    /// Returns the unquoted text.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }
}

/// One argument of a fragment.
#[derive(Debug, Clone, PartialEq)]
pub enum Argument {
    /// Quoted identifier, never a parameter.
    Identifier(Identifier),
    /// Quoted string literal, never a parameter.
    Literal(Literal),
    /// A sub-fragment whose arguments join the parent's parameter stream.
    Nested(SqlFragment),
    /// An ordinary value, bound as a parameter.
    Scalar(SqlValue),
}

impl From<Identifier> for Argument {
    fn from(value: Identifier) -> Self {
        Self::Identifier(value)
    }
}

impl From<Literal> for Argument {
    fn from(value: Literal) -> Self {
        Self::Literal(value)
    }
}

impl From<SqlFragment> for Argument {
    fn from(value: SqlFragment) -> Self {
        Self::Nested(value)
    }
}

impl From<SqlValue> for Argument {
    fn from(value: SqlValue) -> Self {
        Self::Scalar(value)
    }
}

impl<T: ToSqlValue> From<Option<T>> for Argument {
    fn from(value: Option<T>) -> Self {
        Self::Scalar(value.to_sql_value())
    }
}

macro_rules! impl_scalar_argument {
    ($($ty:ty),+) => {
        $(
            impl From<$ty> for Argument {
                fn from(value: $ty) -> Self {
                    Self::Scalar(value.to_sql_value())
                }
            }
        )+
    };
}

impl_scalar_argument!(
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
    &[u8],
    DateTime<Utc>
);

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Segment {
    Text(String),
    Hole,
}

/// An immutable SQL template plus its arguments.
///
/// Holes are kept in argument order, so the `n`th hole always belongs to
/// the `n`th argument.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SqlFragment {
    segments: Vec<Segment>,
    arguments: Vec<Argument>,
}

impl SqlFragment {
    /// The empty fragment.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            segments: Vec::new(),
            arguments: Vec::new(),
        }
    }

    /// Verbatim SQL with no arguments. Braces are not interpreted.
    ///
    /// **Warning**: Only use this for SQL that doesn't contain user input.
    #[must_use]
    pub fn raw(text: impl Into<String>) -> Self {
        let text = text.into();
        if text.is_empty() {
            return Self::empty();
        }
        Self {
            segments: vec![Segment::Text(text)],
            arguments: Vec::new(),
        }
    }

    /// Builds a fragment from a `{0}`-style template, validating it.
    ///
    /// Placeholders must be numbered `{0}, {1}, ...` in order of appearance,
    /// one per argument. `{{` and `}}` produce literal braces.
    pub fn try_new(
        format: &str,
        arguments: impl IntoIterator<Item = Argument>,
    ) -> Result<Self, FragmentError> {
        let segments = parse_template(format)?;
        let arguments: Vec<Argument> = arguments.into_iter().collect();
        let placeholders = segments.iter().filter(|s| **s == Segment::Hole).count();
        if placeholders != arguments.len() {
            return Err(FragmentError::ArgumentCountMismatch {
                placeholders,
                arguments: arguments.len(),
            });
        }
        Ok(Self {
            segments,
            arguments,
        })
    }

    /// Builds a fragment from a template and its arguments.
    ///
    /// # Panics
    ///
    /// Panics if the template is malformed or its placeholders don't match
    /// `arguments`; see [`SqlFragment::try_new`] for the checked form.
    #[must_use]
    #[track_caller]
    pub fn interpolate(format: &str, arguments: impl IntoIterator<Item = Argument>) -> Self {
        match Self::try_new(format, arguments) {
            Ok(fragment) => fragment,
            Err(err) => panic!("malformed SQL fragment {format:?}: {err}"),
        }
    }

    fn single(argument: Argument) -> Self {
        Self {
            segments: vec![Segment::Hole],
            arguments: vec![argument],
        }
    }

    /// A single bound parameter.
    #[must_use]
    pub fn scalar(value: impl ToSqlValue) -> Self {
        Self::single(Argument::Scalar(value.to_sql_value()))
    }

    /// A single quoted identifier.
    #[must_use]
    pub fn identifier(name: impl Into<String>) -> Self {
        Self::single(Argument::Identifier(Identifier::new(name)))
    }

    /// A single identifier qualified by `prefix` (`"prefix"."name"`).
    #[must_use]
    pub fn qualified(prefix: impl Into<String>, name: impl Into<String>) -> Self {
        Self::single(Argument::Identifier(Identifier::qualified(prefix, name)))
    }

    /// Comma-separated quoted identifiers, e.g. `"a", "b"`.
    ///
    /// Each name is an [`Argument::Identifier`] rather than a string
    /// literal, so the list fits DDL column lists. Use [`Self::literal`]
    /// with [`Self::join`] where names must be string literals.
    #[must_use]
    pub fn identifier_list<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::join(", ", names.into_iter().map(Self::identifier))
    }

    /// A single quoted string literal.
    #[must_use]
    pub fn literal(value: impl Into<String>) -> Self {
        Self::single(Argument::Literal(Literal::new(value)))
    }

    /// Concatenates fragments with `separator` between them.
    ///
    /// Placeholders are renumbered so the result is a single flat template.
    #[must_use]
    pub fn join(separator: &str, fragments: impl IntoIterator<Item = Self>) -> Self {
        let mut joined = Self::empty();
        for (i, fragment) in fragments.into_iter().enumerate() {
            if i > 0 {
                joined.push_text(separator);
            }
            joined.extend(fragment);
        }
        joined
    }

    /// Appends `other` after this fragment.
    #[must_use]
    pub fn append(mut self, other: Self) -> Self {
        self.extend(other);
        self
    }

    fn push_text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        if let Some(Segment::Text(last)) = self.segments.last_mut() {
            last.push_str(text);
        } else {
            self.segments.push(Segment::Text(String::from(text)));
        }
    }

    fn extend(&mut self, other: Self) {
        for segment in other.segments {
            match segment {
                Segment::Text(text) => self.push_text(&text),
                Segment::Hole => self.segments.push(Segment::Hole),
            }
        }
        self.arguments.extend(other.arguments);
    }

    /// Returns `true` if the fragment has no text and no arguments.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Returns the arguments in placeholder order.
    #[must_use]
    pub fn arguments(&self) -> &[Argument] {
        &self.arguments
    }

    /// Returns the template text with `{n}` placeholders.
    #[must_use]
    pub fn format(&self) -> String {
        let mut out = String::new();
        let mut index = 0;
        for segment in &self.segments {
            match segment {
                Segment::Text(text) => {
                    for c in text.chars() {
                        match c {
                            '{' => out.push_str("{{"),
                            '}' => out.push_str("}}"),
                            _ => out.push(c),
                        }
                    }
                }
                Segment::Hole => {
                    out.push_str(&format!("{{{index}}}"));
                    index += 1;
                }
            }
        }
        out
    }

    /// Walks segments, pairing each hole with its argument.
    pub(crate) fn pieces(&self) -> impl Iterator<Item = Piece<'_>> {
        let mut arguments = self.arguments.iter();
        self.segments.iter().filter_map(move |segment| match segment {
            Segment::Text(text) => Some(Piece::Text(text)),
            Segment::Hole => arguments.next().map(Piece::Argument),
        })
    }

    /// Renders without parameterization, for logs and debugging.
    ///
    /// Identifiers and literals appear as raw text and scalars in their
    /// display form. **Never** execute the result: nothing is escaped.
    #[must_use]
    pub fn preview(&self) -> String {
        self.to_string()
    }
}

pub(crate) enum Piece<'a> {
    Text(&'a str),
    Argument(&'a Argument),
}

impl fmt::Display for SqlFragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for piece in self.pieces() {
            match piece {
                Piece::Text(text) => f.write_str(text)?,
                Piece::Argument(Argument::Identifier(ident)) => write!(f, "{ident}")?,
                Piece::Argument(Argument::Literal(literal)) => f.write_str(literal.value())?,
                Piece::Argument(Argument::Nested(nested)) => write!(f, "{nested}")?,
                Piece::Argument(Argument::Scalar(value)) => write!(f, "{value}")?,
            }
        }
        Ok(())
    }
}

fn parse_template(format: &str) -> Result<Vec<Segment>, FragmentError> {
    let mut segments = Vec::new();
    let mut text = String::new();
    let mut expected = 0;
    let mut chars = format.char_indices().peekable();

    while let Some((position, c)) = chars.next() {
        match c {
            '{' if chars.next_if(|&(_, next)| next == '{').is_some() => text.push('{'),
            '}' if chars.next_if(|&(_, next)| next == '}').is_some() => text.push('}'),
            '{' => {
                let start = position + 1;
                let Some(len) = format[start..].find('}') else {
                    return Err(FragmentError::UnbalancedBrace { position });
                };
                let inner = &format[start..start + len];
                if inner.is_empty() || !inner.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(FragmentError::InvalidPlaceholder {
                        position,
                        text: String::from(inner),
                    });
                }
                let found = inner
                    .parse::<usize>()
                    .map_err(|_| FragmentError::InvalidPlaceholder {
                        position,
                        text: String::from(inner),
                    })?;
                if found != expected {
                    return Err(FragmentError::OutOfOrder { expected, found });
                }
                expected += 1;

                if !text.is_empty() {
                    segments.push(Segment::Text(std::mem::take(&mut text)));
                }
                segments.push(Segment::Hole);

                let close = start + len;
                for (i, _) in chars.by_ref() {
                    if i == close {
                        break;
                    }
                }
            }
            '}' => return Err(FragmentError::UnbalancedBrace { position }),
            _ => text.push(c),
        }
    }

    if !text.is_empty() {
        segments.push(Segment::Text(text));
    }
    Ok(segments)
}

/// Builds a [`SqlFragment`] from a `{0}`-style template and arguments.
///
/// Each argument is converted with `Argument::from`, so scalars, fragments,
/// identifiers and literals can be mixed freely.
///
/// ```rust
/// use sqlweave_core::{sql, SqlFragment};
///
/// let f = sql!("{0} > {1}", SqlFragment::identifier("age"), 18);
/// assert_eq!(f.format(), "{0} > {1}");
/// ```
#[macro_export]
macro_rules! sql {
    ($format:expr $(, $arg:expr)* $(,)?) => {
        $crate::SqlFragment::interpolate(
            $format,
            ::std::vec![$($crate::Argument::from($arg)),*],
        )
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_has_no_arguments() {
        let f = SqlFragment::raw("select 1");
        assert!(f.arguments().is_empty());
        assert_eq!(f.format(), "select 1");
    }

    #[test]
    fn raw_escapes_braces_in_format() {
        let f = SqlFragment::raw("select '{}'");
        assert_eq!(f.format(), "select '{{}}'");
        assert_eq!(f.preview(), "select '{}'");
    }

    #[test]
    fn empty_fragment() {
        assert!(SqlFragment::empty().is_empty());
        assert!(SqlFragment::raw("").is_empty());
        assert_eq!(SqlFragment::empty().preview(), "");
    }

    #[test]
    fn try_new_accepts_ordered_placeholders() {
        let f = SqlFragment::try_new(
            "{0} = {1}",
            [Argument::from(Identifier::new("a")), Argument::from(1)],
        )
        .unwrap();
        assert_eq!(f.format(), "{0} = {1}");
        assert_eq!(f.arguments().len(), 2);
    }

    #[test]
    fn try_new_handles_escaped_braces() {
        let f = SqlFragment::try_new("'{{' || {0} || '}}'", [Argument::from("x")]).unwrap();
        assert_eq!(f.format(), "'{{' || {0} || '}}'");
        assert_eq!(f.preview(), "'{' || 'x' || '}'");
    }

    #[test]
    fn try_new_rejects_count_mismatch() {
        let err = SqlFragment::try_new("{0} = {1}", [Argument::from(1)]).unwrap_err();
        assert_eq!(
            err,
            FragmentError::ArgumentCountMismatch {
                placeholders: 2,
                arguments: 1,
            }
        );

        let err = SqlFragment::try_new("select 1", [Argument::from(1)]).unwrap_err();
        assert!(matches!(err, FragmentError::ArgumentCountMismatch { .. }));
    }

    #[test]
    fn try_new_rejects_reordered_placeholders() {
        let err = SqlFragment::try_new("{1} {0}", [Argument::from(1), Argument::from(2)])
            .unwrap_err();
        assert_eq!(
            err,
            FragmentError::OutOfOrder {
                expected: 0,
                found: 1,
            }
        );

        let err = SqlFragment::try_new("{0} {0}", [Argument::from(1), Argument::from(2)])
            .unwrap_err();
        assert!(matches!(err, FragmentError::OutOfOrder { .. }));
    }

    #[test]
    fn try_new_rejects_bad_braces() {
        assert!(matches!(
            SqlFragment::try_new("{0", [Argument::from(1)]),
            Err(FragmentError::UnbalancedBrace { position: 0 })
        ));
        assert!(matches!(
            SqlFragment::try_new("a } b", Vec::<Argument>::new()),
            Err(FragmentError::UnbalancedBrace { position: 2 })
        ));
        assert!(matches!(
            SqlFragment::try_new("{x}", [Argument::from(1)]),
            Err(FragmentError::InvalidPlaceholder { .. })
        ));
        assert!(matches!(
            SqlFragment::try_new("{+0}", [Argument::from(1)]),
            Err(FragmentError::InvalidPlaceholder { .. })
        ));
    }

    #[test]
    #[should_panic(expected = "malformed SQL fragment")]
    fn interpolate_panics_on_mismatch() {
        let _ = SqlFragment::interpolate("{0}", Vec::<Argument>::new());
    }

    #[test]
    fn join_renumbers_placeholders() {
        let f = SqlFragment::join(
            ", ",
            [
                SqlFragment::identifier("a"),
                SqlFragment::scalar(1),
                SqlFragment::raw("now()"),
                SqlFragment::scalar("b"),
            ],
        );
        assert_eq!(f.format(), "{0}, {1}, now(), {2}");
        assert_eq!(f.arguments().len(), 3);
    }

    #[test]
    fn join_of_nothing_is_empty() {
        assert!(SqlFragment::join(", ", Vec::<SqlFragment>::new()).is_empty());
    }

    #[test]
    fn identifier_list_joins_identifiers() {
        let f = SqlFragment::identifier_list(["id", "name"]);
        assert_eq!(f.format(), "{0}, {1}");
        assert!(f
            .arguments()
            .iter()
            .all(|a| matches!(a, Argument::Identifier(_))));
    }

    #[test]
    fn preview_shows_raw_text() {
        let f = sql!(
            "SELECT {0} FROM {1} WHERE {2} = {3} AND note = {4}",
            SqlFragment::qualified("u", "*"),
            Identifier::qualified("public", "users"),
            SqlFragment::qualified("u", "name"),
            "O'Brien",
            Literal::new("raw")
        );
        assert_eq!(
            f.preview(),
            "SELECT u.* FROM public.users WHERE u.name = 'O''Brien' AND note = raw"
        );
    }

    #[test]
    fn macro_accepts_trailing_comma_and_options() {
        let f = sql!("{0}, {1}", Some(3), None::<i32>,);
        assert_eq!(
            f.arguments(),
            &[
                Argument::Scalar(SqlValue::Int(3)),
                Argument::Scalar(SqlValue::Null)
            ]
        );
    }

    #[test]
    fn append_concatenates() {
        let f = SqlFragment::raw("WHERE ").append(SqlFragment::scalar(1));
        assert_eq!(f.format(), "WHERE {0}");
    }
}
