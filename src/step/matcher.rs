// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Resolution of a [`Step`] against a [`Definition`].
//!
//! A [`Step`] matches a [`Definition`] when all of the following hold:
//! 1. their [`Kind`]s are equal;
//! 2. [`Step::text`] is literally equal to [`Definition::pattern()`], so
//!    `{{s}}` or `<n>` inside a pattern mean nothing special;
//! 3. [`Step::arity()`] equals [`Definition::arity()`];
//! 4. every positional argument, once coerced into a [`Value`], is accepted
//!    by the declared [`ParamType`] at its position, and an attached table is
//!    accepted by the last declared one.
//!
//! [`Kind`]: super::Kind
//! [`ParamType`]: crate::ParamType

use super::{value::Value, Definition, Step};

/// Checks whether the given [`Step`] resolves to the given [`Definition`].
#[must_use]
pub fn matches(step: &Step, definition: &Definition) -> bool {
    step.kind == definition.kind()
        && step.text == definition.pattern()
        && arity_matches(step, definition)
        && types_match(step, definition)
}

/// Checks the [`Step::arity()`] against the declared one.
#[must_use]
pub fn arity_matches(step: &Step, definition: &Definition) -> bool {
    step.arity() == definition.arity()
}

/// Checks every argument of the [`Step`] against the declared parameter
/// types.
///
/// Expects [`arity_matches()`] to hold.
#[must_use]
pub fn types_match(step: &Step, definition: &Definition) -> bool {
    let params = definition.params();

    let args_fit = step
        .args
        .iter()
        .zip(params)
        .all(|(arg, param)| param.accepts(&Value::coerce(arg)));

    let table_fits = step.table.is_none()
        || params.last().map_or(false, |p| p.accepts_table());

    args_fit && table_fits
}

#[cfg(test)]
mod tests {
    use crate::{
        step::{Collection, Handler, Kind},
        ParamType,
    };

    use super::*;

    fn single(kind: Kind, pattern: &str, params: &[ParamType]) -> Collection {
        let mut steps = Collection::new();
        steps
            .register(kind, pattern, Handler::dynamic(params, |_| Ok(())))
            .unwrap();
        steps
    }

    fn def(steps: &Collection) -> &Definition {
        steps.iter().next().unwrap()
    }

    #[test]
    fn requires_same_kind() {
        let steps = single(Kind::Given, "x", &[]);

        assert!(matches(&Step::new(Kind::Given, "x"), def(&steps)));
        assert!(!matches(&Step::new(Kind::Then, "x"), def(&steps)));
    }

    #[test]
    fn compares_text_literally() {
        let steps = single(Kind::Given, "I have <n> widgets", &[]);

        assert!(matches(
            &Step::new(Kind::Given, "I have <n> widgets"),
            def(&steps),
        ));
        assert!(!matches(
            &Step::new(Kind::Given, "I have 5 widgets"),
            def(&steps),
        ));
        assert!(!matches(
            &Step::new(Kind::Given, "I have <n> widgets "),
            def(&steps),
        ));
    }

    #[test]
    fn arity_gate() {
        let steps = single(Kind::When, "w", &[ParamType::Any, ParamType::Any]);
        let step = |args: &[&str], table: bool| {
            let s = Step::new(Kind::When, "w").with_args(args.iter().copied());
            if table {
                s.with_table(vec![vec!["h"]])
            } else {
                s
            }
        };

        assert!(matches(&step(&["1", "a"], false), def(&steps)));
        assert!(matches(&step(&["1"], true), def(&steps)));
        assert!(!matches(&step(&["1"], false), def(&steps)));
        assert!(!matches(&step(&[], false), def(&steps)));
        assert!(!matches(&step(&["1", "a"], true), def(&steps)));
        assert!(!matches(&step(&[], true), def(&steps)));
    }

    #[test]
    fn checks_coerced_argument_types() {
        let steps = single(Kind::Given, "g", &[ParamType::Int, ParamType::Str]);

        let good = Step::new(Kind::Given, "g").with_args(["3", "abc"]);
        let swapped = Step::new(Kind::Given, "g").with_args(["abc", "3"]);
        let both_ints = Step::new(Kind::Given, "g").with_args(["3", "4"]);

        assert!(matches(&good, def(&steps)));
        assert!(!matches(&swapped, def(&steps)));
        assert!(!matches(&both_ints, def(&steps)));
    }

    #[test]
    fn table_needs_table_param_last() {
        let with_table = Step::new(Kind::Then, "t").with_table(vec![vec!["a"]]);

        let steps = single(Kind::Then, "t", &[ParamType::Table]);
        assert!(matches(&with_table, def(&steps)));

        let steps = single(Kind::Then, "t", &[ParamType::Any]);
        assert!(matches(&with_table, def(&steps)));

        let steps = single(Kind::Then, "t", &[ParamType::Str]);
        assert!(!matches(&with_table, def(&steps)));
    }

    #[test]
    fn positional_arg_never_fits_table_param() {
        let steps = single(Kind::Then, "t {{s}}", &[ParamType::Table]);
        let step = Step::new(Kind::Then, "t {{s}}").with_args(["x"]);

        assert!(arity_matches(&step, def(&steps)));
        assert!(!matches(&step, def(&steps)));
    }
}
