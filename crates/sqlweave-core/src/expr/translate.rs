//! Expression to SQL translation.

use super::Expr;
use crate::error::TranslateError;
use crate::fragment::{Argument, Identifier, SqlFragment};

/// Translates a lambda or lambda body into a fragment.
///
/// Supported nodes: lambdas, parameter references, member access on the
/// parameter (a qualified column) or on a captured value (an inlined
/// parameter), constants, the six comparisons, and member-initialization
/// projections. Everything else fails with
/// [`TranslateError::Unsupported`].
///
/// Inside a lambda every parameter reference must name the lambda's own
/// parameter; a bare body accepts any parameter name.
pub fn translate(expr: &Expr) -> Result<SqlFragment, TranslateError> {
    translate_in(expr, None)
}

fn check_bound(parameter: &str, scope: Option<&str>) -> Result<(), TranslateError> {
    match scope {
        Some(expected) if expected != parameter => Err(TranslateError::UnboundParameter {
            parameter: String::from(parameter),
            expected: String::from(expected),
        }),
        _ => Ok(()),
    }
}

fn translate_in(expr: &Expr, scope: Option<&str>) -> Result<SqlFragment, TranslateError> {
    match expr {
        Expr::Lambda { parameter, body } => translate_in(body, Some(parameter.as_str())),
        Expr::Parameter(parameter) => {
            check_bound(parameter, scope)?;
            Ok(SqlFragment::empty())
        }
        Expr::Member { receiver, member } => translate_member(receiver, member, scope),
        Expr::Constant(value) => Ok(SqlFragment::scalar(value.clone())),
        Expr::Binary { op, left, right } => {
            let operator = op
                .comparison()
                .ok_or_else(|| TranslateError::unsupported(op.name()))?;
            let left = translate_in(left, scope)?;
            let right = translate_in(right, scope)?;
            Ok(SqlFragment::interpolate(
                &format!("({{0}} {operator} {{1}})"),
                [Argument::Nested(left), Argument::Nested(right)],
            ))
        }
        Expr::MemberInit { bindings } => {
            let assignments = bindings
                .iter()
                .map(|(member, value)| {
                    Ok(crate::sql!(
                        "{0} = {1}",
                        Identifier::new(member),
                        translate_in(value, scope)?
                    ))
                })
                .collect::<Result<Vec<_>, TranslateError>>()?;
            Ok(SqlFragment::join(", ", assignments))
        }
        Expr::Captured(_)
        | Expr::Unary { .. }
        | Expr::Call { .. }
        | Expr::Conditional { .. } => Err(TranslateError::unsupported(expr.kind())),
    }
}

fn translate_member(
    receiver: &Expr,
    member: &str,
    scope: Option<&str>,
) -> Result<SqlFragment, TranslateError> {
    match receiver {
        Expr::Parameter(alias) => {
            check_bound(alias, scope)?;
            Ok(SqlFragment::qualified(alias, member))
        }
        Expr::Captured(captured) => captured
            .get(member)
            .map(|value| SqlFragment::scalar(value.clone()))
            .ok_or_else(|| TranslateError::UnknownCapture {
                capture: String::from(captured.name()),
                member: String::from(member),
            }),
        _ => Err(TranslateError::unsupported("Member")),
    }
}
