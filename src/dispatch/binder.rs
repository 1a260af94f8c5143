//! Binding of segmented tokens onto a descriptor's typed arguments.

use super::model::{ArgumentType, CommandDescriptor, ParamValue, Parameters, ParsedParameter};
use crate::error::BindError;
use chrono::{DateTime, NaiveDate, Utc};

/// Date pattern accepted by [`ArgumentType::Date`] arguments (`dd/MM/yyyy`).
pub const DATE_FORMAT: &str = "%d/%m/%Y";

/// Maps tokens to one [`ParsedParameter`] per declared argument.
///
/// Implementations never fail on a bad value; they mark the parameter invalid
/// and leave the decision to the handler. Only a token count that cannot be
/// reconciled with the declaration is an error.
pub trait ParameterBinder: Send + Sync {
    fn bind(&self, descriptor: &CommandDescriptor, tokens: &[String])
    -> Result<Parameters, BindError>;
}

/// The standard binder: count reconciliation with optional slack, then per-type
/// coercion.
#[derive(Debug, Clone, Copy)]
pub struct TypedBinder {
    clock: fn() -> DateTime<Utc>,
}

impl TypedBinder {
    pub fn new() -> Self {
        Self { clock: Utc::now }
    }

    /// Use `clock` for the timestamp given to unparsable dates.
    pub fn with_clock(clock: fn() -> DateTime<Utc>) -> Self {
        Self { clock }
    }

    fn coerce(&self, kind: ArgumentType, token: &str) -> (ParamValue, bool) {
        match kind {
            ArgumentType::SingleToken | ArgumentType::FreeText => {
                (ParamValue::Text(token.to_string()), true)
            }
            ArgumentType::Boolean => (ParamValue::Boolean(token.eq_ignore_ascii_case("true")), true),
            ArgumentType::Date => match parse_date(token) {
                Some(date) => (ParamValue::Date(date), true),
                None => (ParamValue::Date((self.clock)()), false),
            },
            ArgumentType::Integer => match token.parse::<i32>() {
                Ok(n) => (ParamValue::Integer(n), true),
                Err(_) => (ParamValue::Integer(-1), false),
            },
        }
    }
}

impl Default for TypedBinder {
    fn default() -> Self {
        Self::new()
    }
}

impl ParameterBinder for TypedBinder {
    fn bind(
        &self,
        descriptor: &CommandDescriptor,
        tokens: &[String],
    ) -> Result<Parameters, BindError> {
        check_count(descriptor, tokens.len())?;

        let params = descriptor
            .arguments
            .iter()
            .enumerate()
            .map(|(index, argument)| match tokens.get(index) {
                Some(token) => {
                    let (value, valid) = self.coerce(argument.kind, token);
                    ParsedParameter::new(argument.key.clone(), value, valid)
                }
                None => {
                    let mut param =
                        ParsedParameter::new(argument.key.clone(), ParamValue::zero(argument.kind), true);
                    param.set_optional(true);
                    param
                }
            })
            .collect();

        Ok(Parameters::new(params))
    }
}

/// Accept `given` tokens if they match the declared count exactly, or fall
/// short by exactly the number of optional arguments.
pub fn check_count(descriptor: &CommandDescriptor, given: usize) -> Result<(), BindError> {
    let required = descriptor.arguments.len();
    let optional = descriptor.optional_count();

    if given == required || (optional > 0 && required == given + optional) {
        return Ok(());
    }

    Err(BindError::ArgumentCountMismatch {
        expected: required,
        optional,
        given,
    })
}

/// Parse a `dd/MM/yyyy` date as midnight UTC.
pub fn parse_date(token: &str) -> Option<DateTime<Utc>> {
    NaiveDate::parse_from_str(token, DATE_FORMAT)
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
