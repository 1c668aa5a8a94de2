// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Steps, step definitions and the machinery binding the former to the
//! latter.
//!
//! - [`collection`]: registry of [`Definition`]s
//! - [`matcher`]: deciding whether a [`Step`] resolves to a [`Definition`]
//! - [`binder`]: turning [`Step`] arguments into call [`Value`]s
//! - [`handler`]: uniform [`Handler`]s built out of typed closures
//! - [`value`]: argument [`Value`]s and declared [`ParamType`]s

pub mod binder;
pub mod collection;
pub mod handler;
pub mod matcher;
pub mod value;

use derive_more::Display;

use crate::DataTable;

#[doc(inline)]
pub use self::{
    collection::{Collection, Definition},
    handler::{Handler, IntoHandler, IntoStepResult},
    value::{FromValue, ParamType, Value},
};

/// Literal placeholder standing in a [`Step::text`] for every quoted
/// argument extracted out of it.
pub const ARG_PLACEHOLDER: &str = "{{s}}";

/// Kind of a [`Step`] and of a [`Definition`].
///
/// `And` and `But` steps are resolved to the kind of the preceding step while
/// parsing.
#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq)]
pub enum Kind {
    /// [Given] step.
    ///
    /// [Given]: https://cucumber.io/docs/gherkin/reference#given
    #[display(fmt = "Given")]
    Given,

    /// [When] step.
    ///
    /// [When]: https://cucumber.io/docs/gherkin/reference#when
    #[display(fmt = "When")]
    When,

    /// [Then] step.
    ///
    /// [Then]: https://cucumber.io/docs/gherkin/reference#then
    #[display(fmt = "Then")]
    Then,
}

impl Kind {
    /// Name of the [`Suite`] method registering a [`Definition`] of this
    /// [`Kind`].
    ///
    /// [`Suite`]: crate::Suite
    #[must_use]
    pub const fn method_name(self) -> &'static str {
        match self {
            Self::Given => "given",
            Self::When => "when",
            Self::Then => "then",
        }
    }
}

impl From<gherkin::StepType> for Kind {
    fn from(ty: gherkin::StepType) -> Self {
        match ty {
            gherkin::StepType::Given => Self::Given,
            gherkin::StepType::When => Self::When,
            gherkin::StepType::Then => Self::Then,
        }
    }
}

/// Single `Given`/`When`/`Then` line of a scenario.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Step {
    /// [`Kind`] of this [`Step`].
    pub kind: Kind,

    /// Keyword as written in the source (`And`, `But`, `*` included).
    pub keyword: String,

    /// Literal text of this [`Step`], with every quoted argument replaced by
    /// [`ARG_PLACEHOLDER`].
    pub text: String,

    /// Positional arguments, in order of appearance.
    pub args: Vec<String>,

    /// [`DataTable`] attached to this [`Step`], if any.
    pub table: Option<DataTable>,
}

impl Step {
    /// Creates a new [`Step`] without arguments and table.
    #[must_use]
    pub fn new(kind: Kind, text: impl Into<String>) -> Self {
        Self {
            kind,
            keyword: kind.to_string(),
            text: text.into(),
            args: Vec::new(),
            table: None,
        }
    }

    /// Sets positional arguments of this [`Step`].
    #[must_use]
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Attaches the given [`DataTable`] to this [`Step`].
    #[must_use]
    pub fn with_table(mut self, table: impl Into<DataTable>) -> Self {
        self.table = Some(table.into());
        self
    }

    /// Number of call arguments this [`Step`] supplies: its positional
    /// arguments plus one for an attached table.
    #[must_use]
    pub fn arity(&self) -> usize {
        self.args.len() + usize::from(self.table.is_some())
    }

    /// Renders [`Step::text`] with its arguments put back in place of
    /// [`ARG_PLACEHOLDER`]s, quoted as in the source.
    #[must_use]
    pub fn display_text(&self) -> String {
        let mut args = self.args.iter();
        let mut parts = self.text.split(ARG_PLACEHOLDER);
        let mut out = parts.next().unwrap_or_default().to_owned();
        for part in parts {
            match args.next() {
                Some(arg) => {
                    out.push('"');
                    out.push_str(arg);
                    out.push('"');
                }
                None => out.push_str(ARG_PLACEHOLDER),
            }
            out.push_str(part);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arity_counts_table() {
        let step = Step::new(Kind::When, "I do {{s}}").with_args(["it"]);
        assert_eq!(step.arity(), 1);

        let step = step.with_table(vec![vec!["a"]]);
        assert_eq!(step.arity(), 2);
    }

    #[test]
    fn display_text_restores_quoted_args() {
        let step = Step::new(Kind::Given, "I move {{s}} to {{s}}")
            .with_args(["box", "shelf"]);

        assert_eq!(step.display_text(), r#"I move "box" to "shelf""#);
    }

    #[test]
    fn display_text_keeps_unfilled_placeholders() {
        let step = Step::new(Kind::Then, "{{s}} and {{s}}").with_args(["one"]);

        assert_eq!(step.display_text(), r#""one" and {{s}}"#);
    }

    #[test]
    fn kind_from_gherkin() {
        assert_eq!(Kind::from(gherkin::StepType::Then), Kind::Then);
        assert_eq!(Kind::When.method_name(), "when");
        assert_eq!(Kind::Given.to_string(), "Given");
    }
}
