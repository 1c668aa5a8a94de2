// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Errors of step registration and step execution.

use std::fmt;

use derive_more::{Display, Error};
use itertools::Itertools as _;

use crate::{
    step::{Collection, Definition, Kind, Step, Value},
    ParamType,
};

/// Error of registering a step [`Definition`].
///
/// Returned at setup time, leaving previous registrations intact.
///
/// [`Definition`]: crate::step::Definition
#[derive(Clone, Debug, Display, Error, Eq, PartialEq)]
pub enum RegistrationError {
    /// A [`Definition`] with the same pattern is already registered, whatever
    /// its [`Kind`].
    ///
    /// [`Definition`]: crate::step::Definition
    #[display(
        fmt = "Step definition `{}` is already registered as a {} step",
        pattern,
        existing
    )]
    DuplicatePattern {
        /// Rejected pattern.
        pattern: String,

        /// [`Kind`] of the already registered [`Definition`].
        ///
        /// [`Definition`]: crate::step::Definition
        existing: Kind,
    },

    /// The handler's shape cannot be called with step arguments.
    #[display(fmt = "Invalid handler for `{}`: {}", pattern, reason)]
    InvalidHandlerKind {
        /// Pattern the handler was registered for.
        pattern: String,

        /// What's wrong with the handler.
        reason: String,
    },
}

/// Error of running a single [`Step`].
#[derive(Clone, Debug, Display, Error, Eq, PartialEq)]
pub enum StepError {
    /// No [`Definition`] matches the [`Step`].
    ///
    /// [`Definition`]: crate::step::Definition
    #[display(fmt = "{}", _0)]
    Undefined(UndefinedStep),

    /// Number of bound arguments differs from the declared arity.
    #[display(
        fmt = "Argument count mismatch: expected {}, got {}",
        expected,
        actual
    )]
    ArityMismatch {
        /// Declared arity.
        expected: usize,

        /// Number of bound arguments.
        actual: usize,
    },

    /// A bound argument doesn't convert into the declared parameter.
    #[display(
        fmt = "Argument {} can't be converted into {}, got {}",
        position,
        expected,
        found
    )]
    ArgumentType {
        /// Zero-based position of the argument.
        position: usize,

        /// Declared [`ParamType`].
        expected: ParamType,

        /// Name of the bound [`Value`] variant.
        found: &'static str,
    },

    /// Handler returned an error.
    #[display(fmt = "Step failed: {}", _0)]
    Failed(#[error(not(source))] String),

    /// Handler panicked.
    #[display(fmt = "Step panicked: {}", _0)]
    Panicked(#[error(not(source))] String),
}

impl From<UndefinedStep> for StepError {
    fn from(e: UndefinedStep) -> Self {
        Self::Undefined(e)
    }
}

/// [`Step`] without a matching [`Definition`].
///
/// Renders a snippet of the registration call implementing it, unless a
/// [`Definition`] is already registered under the same pattern. In that case
/// the [`Kind`] or parameters don't fit, and registering it again would only
/// fail with a [`RegistrationError::DuplicatePattern`].
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub struct UndefinedStep {
    /// [`Kind`] of the [`Step`].
    pub kind: Kind,

    /// Literal text of the [`Step`].
    pub text: String,

    /// Parameter types a handler would need to match the [`Step`].
    pub params: Vec<ParamType>,

    /// [`Definition`] already registered under the [`Step`]'s text.
    pub registered: Option<Registered>,
}

/// Signature of a [`Definition`] sharing the pattern of an
/// [`UndefinedStep`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Registered {
    /// [`Kind`] the [`Definition`] is registered for.
    pub kind: Kind,

    /// Declared parameter types of the [`Definition`]'s handler.
    pub params: Vec<ParamType>,
}

impl From<&Definition> for Registered {
    fn from(def: &Definition) -> Self {
        Self { kind: def.kind(), params: def.params().to_vec() }
    }
}

impl UndefinedStep {
    /// Describes the given undefined [`Step`].
    #[must_use]
    pub fn new(step: &Step) -> Self {
        let params = step
            .args
            .iter()
            .map(|arg| match Value::coerce(arg) {
                Value::Int(_) => ParamType::Int,
                Value::Str(_) | Value::Table(_) => ParamType::Str,
            })
            .chain(step.table.iter().map(|_| ParamType::Table))
            .collect();

        Self {
            kind: step.kind,
            text: step.text.clone(),
            params,
            registered: None,
        }
    }

    /// Describes the given [`Step`] left undefined by the [`Collection`],
    /// noting the [`Definition`] registered under the same pattern, if any.
    #[must_use]
    pub fn in_collection(step: &Step, steps: &Collection) -> Self {
        Self {
            registered: steps.get(&step.text).map(Registered::from),
            ..Self::new(step)
        }
    }

    /// Explains how to define this [`UndefinedStep`].
    ///
    /// Either a [`snippet()`] to register, or the mismatch against the
    /// [`Definition`] already registered under the same pattern.
    ///
    /// [`snippet()`]: Self::snippet
    #[must_use]
    pub fn hint(&self) -> String {
        match &self.registered {
            None => format!("You can implement it with:\n{}", self.snippet()),
            Some(reg) => format!(
                "Step definition `{}` is registered as a {} step taking {}, \
                 but this {} step supplies {}",
                self.text,
                reg.kind,
                describe_params(&reg.params),
                self.kind,
                describe_params(&self.params),
            ),
        }
    }

    /// Snippet of a registration call implementing this [`UndefinedStep`].
    ///
    /// ```rust
    /// # use stepbind::{step::Kind, Step, UndefinedStep};
    /// let undefined = UndefinedStep::new(
    ///     &Step::new(Kind::Then, "I have {{s}} widgets").with_args(["6"]),
    /// );
    ///
    /// assert_eq!(
    ///     undefined.snippet(),
    ///     "suite.then(\"I have {{s}} widgets\", |arg0: i64| {\n    \
    ///          // Your code here\n\
    ///      })?;",
    /// );
    /// ```
    #[must_use]
    pub fn snippet(&self) -> String {
        let params = self
            .params
            .iter()
            .enumerate()
            .map(|(i, p)| match p {
                ParamType::Int => format!("arg{i}: i64"),
                ParamType::Str => format!("arg{i}: String"),
                ParamType::Table => "table: DataTable".to_owned(),
                ParamType::Any => format!("arg{i}: Value"),
            })
            .join(", ");

        format!(
            "suite.{}({:?}, |{params}| {{\n    // Your code here\n}})?;",
            self.kind.method_name(),
            self.text,
        )
    }
}

impl fmt::Display for UndefinedStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Undefined step: {} {}\n{}",
            self.kind,
            self.text,
            self.hint(),
        )
    }
}

fn describe_params(params: &[ParamType]) -> String {
    if params.is_empty() {
        "no arguments".to_owned()
    } else {
        format!("({})", params.iter().join(", "))
    }
}

#[cfg(test)]
mod tests {
    use crate::{step::Handler, DataTable};

    use super::*;

    #[test]
    fn snippet_without_args() {
        let undefined = UndefinedStep::new(&Step::new(Kind::Given, "setup"));

        assert_eq!(
            undefined.snippet(),
            "suite.given(\"setup\", || {\n    // Your code here\n})?;",
        );
    }

    #[test]
    fn snippet_guesses_param_types() {
        let step = Step::new(Kind::When, "I move {{s}} by {{s}}")
            .with_args(["box", "3"])
            .with_table(DataTable::from(vec![vec!["a"]]));

        let snippet = UndefinedStep::new(&step).snippet();

        assert!(snippet.starts_with(
            "suite.when(\"I move {{s}} by {{s}}\", \
             |arg0: String, arg1: i64, table: DataTable| {",
        ));
    }

    #[test]
    fn snippet_escapes_quotes() {
        let undefined =
            UndefinedStep::new(&Step::new(Kind::Then, r#"say "hi""#));

        assert!(undefined.snippet().contains(r#""say \"hi\"""#));
    }

    #[test]
    fn display_mentions_kind_and_text() {
        let err = StepError::from(UndefinedStep::new(&Step::new(
            Kind::Then,
            "I have 6 widgets",
        )));
        let msg = err.to_string();

        assert!(msg.starts_with("Undefined step: Then I have 6 widgets\n"));
        assert!(msg.contains("suite.then(\"I have 6 widgets\", || {"));
    }

    fn widgets() -> Collection {
        let mut steps = Collection::new();
        steps
            .register(
                Kind::Given,
                "I have {{s}} widgets",
                Handler::dynamic([ParamType::Int], |_| Ok(())),
            )
            .unwrap();
        steps
    }

    #[test]
    fn hints_kind_mismatch_instead_of_snippet() {
        let step =
            Step::new(Kind::When, "I have {{s}} widgets").with_args(["6"]);

        let undefined = UndefinedStep::in_collection(&step, &widgets());

        assert_eq!(
            undefined.registered,
            Some(Registered {
                kind: Kind::Given,
                params: vec![ParamType::Int],
            }),
        );
        assert_eq!(
            undefined.hint(),
            "Step definition `I have {{s}} widgets` is registered as a Given \
             step taking (integer), but this When step supplies (integer)",
        );
        assert!(!undefined.to_string().contains("suite.when("));
    }

    #[test]
    fn hints_param_type_mismatch_instead_of_snippet() {
        let step =
            Step::new(Kind::Given, "I have {{s}} widgets").with_args(["many"]);

        let msg = UndefinedStep::in_collection(&step, &widgets()).to_string();

        assert!(
            msg.starts_with("Undefined step: Given I have {{s}} widgets\n"),
            "{msg}",
        );
        assert!(
            msg.ends_with(
                "registered as a Given step taking (integer), \
                 but this Given step supplies (string)",
            ),
            "{msg}",
        );
        assert!(!msg.contains("You can implement it with"));
    }

    #[test]
    fn hints_snippet_for_unknown_pattern() {
        let step = Step::new(Kind::Then, "nothing here");

        let undefined = UndefinedStep::in_collection(&step, &widgets());

        assert_eq!(undefined.registered, None);
        assert!(undefined.hint().starts_with("You can implement it with:\n"));
        assert!(undefined.hint().ends_with(&undefined.snippet()));
    }

    #[test]
    fn hints_missing_args_as_no_arguments() {
        let step = Step::new(Kind::Given, "I have {{s}} widgets");

        let hint = UndefinedStep::in_collection(&step, &widgets()).hint();

        assert!(hint.ends_with("this Given step supplies no arguments"));
    }

    #[test]
    fn registration_errors_display() {
        let err = RegistrationError::DuplicatePattern {
            pattern: "foo".to_owned(),
            existing: Kind::Given,
        };

        assert_eq!(
            err.to_string(),
            "Step definition `foo` is already registered as a Given step",
        );
    }
}
