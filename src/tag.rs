// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! [Tag expressions][1] filtering.
//!
//! [1]: https://cucumber.io/docs/cucumber/api#tag-expressions

use gherkin::tagexpr::TagOperation;
use sealed::sealed;

use crate::feature::{ConcreteScenario, Feature};

/// Extension of a [`TagOperation`] allowing to evaluate it.
#[sealed]
pub trait Ext {
    /// Evaluates this [`TagOperation`] against the given `tags`, specified
    /// without the leading `@`.
    #[must_use]
    fn eval<S: AsRef<str>>(&self, tags: &[S]) -> bool;

    /// Evaluates this [`TagOperation`] against tags of a [`Feature`] merged
    /// with the ones of its [`ConcreteScenario`] (which carries the tags of
    /// its `Examples` too).
    #[must_use]
    fn matches(&self, feature: &Feature, scenario: &ConcreteScenario) -> bool {
        let tags = feature
            .tags
            .iter()
            .chain(&scenario.tags)
            .map(String::as_str)
            .collect::<Vec<_>>();
        self.eval(&tags)
    }
}

#[sealed]
impl Ext for TagOperation {
    fn eval<S: AsRef<str>>(&self, tags: &[S]) -> bool {
        match self {
            Self::And(l, r) => l.eval(tags) && r.eval(tags),
            Self::Or(l, r) => l.eval(tags) || r.eval(tags),
            Self::Not(op) => !op.eval(tags),
            Self::Tag(t) => tags.iter().any(|tag| tag.as_ref() == t),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn op(expr: &str) -> TagOperation {
        expr.parse().unwrap()
    }

    #[test]
    fn evaluates_expressions() {
        let tags = ["fast", "db"];

        assert!(op("@fast").eval(&tags));
        assert!(!op("@slow").eval(&tags));
        assert!(op("@fast and @db").eval(&tags));
        assert!(op("@slow or @db").eval(&tags));
        assert!(op("not @slow").eval(&tags));
        assert!(!op("@fast and not @db").eval(&tags));
    }

    #[test]
    fn merges_feature_and_scenario_tags() {
        let feature = Feature::new("f").with_tags(["db"]);
        let scenario = ConcreteScenario {
            name: "s".to_owned(),
            tags: vec!["fast".to_owned()],
            steps: vec![],
            row: None,
        };

        assert!(op("@db and @fast").matches(&feature, &scenario));
        assert!(!op("@db and @slow").matches(&feature, &scenario));
    }
}
