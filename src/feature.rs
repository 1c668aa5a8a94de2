// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Parsed [`Feature`] tree consumed by the [`Runner`].
//!
//! [`Runner`]: crate::Runner

use std::{path::PathBuf, slice};

use derive_more::{Display, Error};
use lazy_regex::{regex, Lazy};
use regex::Regex;

use crate::{DataTable, Step};

/// Ordered set of [`Feature`]s forming a single run.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct FeatureSet {
    /// [`Feature`]s in source order.
    pub features: Vec<Feature>,
}

impl FeatureSet {
    /// Creates a new [`FeatureSet`].
    #[must_use]
    pub const fn new(features: Vec<Feature>) -> Self {
        Self { features }
    }

    /// Iterates over the [`Feature`]s.
    pub fn iter(&self) -> slice::Iter<'_, Feature> {
        self.features.iter()
    }

    /// Number of [`Feature`]s.
    #[must_use]
    pub fn len(&self) -> usize {
        self.features.len()
    }

    /// Indicates whether there are no [`Feature`]s.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Counts [`Scenario`]s of all the [`Feature`]s, outlines counted once.
    #[must_use]
    pub fn count_scenarios(&self) -> usize {
        self.features.iter().map(|f| f.scenarios.len()).sum()
    }
}

impl FromIterator<Feature> for FeatureSet {
    fn from_iter<I: IntoIterator<Item = Feature>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl Extend<Feature> for FeatureSet {
    fn extend<I: IntoIterator<Item = Feature>>(&mut self, iter: I) {
        self.features.extend(iter);
    }
}

impl<'f> IntoIterator for &'f FeatureSet {
    type Item = &'f Feature;
    type IntoIter = slice::Iter<'f, Feature>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// [Feature]: a named group of [`Scenario`]s sharing a [`Background`].
///
/// [Feature]: https://cucumber.io/docs/gherkin/reference#feature
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Feature {
    /// Name of this [`Feature`].
    pub name: String,

    /// Tags, without the leading `@`.
    pub tags: Vec<String>,

    /// Path of the `.feature` file, if parsed from one.
    pub path: Option<PathBuf>,

    /// [`Background`] prepended to every [`Scenario`].
    pub background: Option<Background>,

    /// [`Scenario`]s in source order.
    pub scenarios: Vec<Scenario>,
}

impl Feature {
    /// Creates a new empty [`Feature`].
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), ..Self::default() }
    }

    /// Sets the [`Background`] steps.
    #[must_use]
    pub fn with_background(
        mut self,
        steps: impl IntoIterator<Item = Step>,
    ) -> Self {
        self.background = Some(Background::new(steps));
        self
    }

    /// Appends a [`Scenario`].
    #[must_use]
    pub fn with_scenario(mut self, scenario: Scenario) -> Self {
        self.scenarios.push(scenario);
        self
    }

    /// Sets the tags.
    #[must_use]
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// [`Background`] steps, empty if there's no [`Background`].
    #[must_use]
    pub fn background_steps(&self) -> &[Step] {
        self.background.as_ref().map_or(&[][..], |b| b.steps.as_slice())
    }
}

/// [Background]: steps run before every [`Scenario`] of a [`Feature`].
///
/// [Background]: https://cucumber.io/docs/gherkin/reference#background
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Background {
    /// [`Step`]s in source order.
    pub steps: Vec<Step>,
}

impl Background {
    /// Creates a new [`Background`].
    #[must_use]
    pub fn new(steps: impl IntoIterator<Item = Step>) -> Self {
        Self { steps: steps.into_iter().collect() }
    }
}

/// [Scenario] or [Scenario Outline].
///
/// [Scenario]: https://cucumber.io/docs/gherkin/reference#example
/// [Scenario Outline]: https://cucumber.io/docs/gherkin/reference#scenario-outline
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Scenario {
    /// Name of this [`Scenario`], may contain `<column>` placeholders.
    pub name: String,

    /// Tags, without the leading `@`.
    pub tags: Vec<String>,

    /// [`Step`]s in source order.
    pub steps: Vec<Step>,

    /// [`Examples`] making this [`Scenario`] an outline, if not empty.
    pub examples: Vec<Examples>,
}

impl Scenario {
    /// Creates a new [`Scenario`] out of its steps.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        steps: impl IntoIterator<Item = Step>,
    ) -> Self {
        Self {
            name: name.into(),
            steps: steps.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Appends an [`Examples`] block.
    #[must_use]
    pub fn with_examples(mut self, examples: Examples) -> Self {
        self.examples.push(examples);
        self
    }

    /// Sets the tags.
    #[must_use]
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Indicates whether this [`Scenario`] is an outline.
    #[must_use]
    pub fn is_outline(&self) -> bool {
        !self.examples.is_empty()
    }

    /// Enumerates [`ConcreteScenario`]s of this [`Scenario`].
    ///
    /// A plain [`Scenario`] yields itself. An outline yields one
    /// [`ConcreteScenario`] per data row of its [`Examples`], with `<column>`
    /// placeholders substituted in the name, step texts, step arguments and
    /// table cells. So this one:
    /// ```gherkin
    /// Scenario Outline: eating
    ///   Given there are <start> cucumbers
    ///   When I eat "<eat>" cucumbers
    ///
    ///   Examples:
    ///     | start | eat |
    ///     |    12 |   5 |
    ///     |    20 |   4 |
    /// ```
    /// yields `there are 12 cucumbers` with argument `5`, and then `there are
    /// 20 cucumbers` with argument `4`.
    ///
    /// Expansion happens lazily and the enumeration may be restarted by
    /// calling this method again.
    pub fn concrete(&self) -> Concrete<'_> {
        Concrete { scenario: self, examples: 0, row: 0, ordinal: 0, done: false }
    }

    /// Substitutes the given row of `values` into this outline.
    fn expand(
        &self,
        header: &[String],
        values: &[String],
        examples: &Examples,
        ordinal: usize,
    ) -> Result<ConcreteScenario, ExpandExamplesError> {
        /// [`Regex`] matching placeholders [`Examples`] expand into.
        static TEMPLATE_REGEX: &Lazy<Regex> = regex!(r"<([^>\s]+)>");

        let tags = self
            .tags
            .iter()
            .chain(&examples.tags)
            .cloned()
            .collect::<Vec<_>>();

        let replace = |s: &str| {
            let mut err = None;
            let replaced = TEMPLATE_REGEX
                .replace_all(s, |cap: &regex::Captures<'_>| {
                    let name = &cap[1];
                    header
                        .iter()
                        .zip(values)
                        .find_map(|(k, v)| (k == name).then_some(v.as_str()))
                        .unwrap_or_else(|| {
                            err = Some(ExpandExamplesError {
                                name: name.to_owned(),
                                scenario: self.name.clone(),
                                tags: tags.clone(),
                                row: ordinal,
                            });
                            ""
                        })
                })
                .into_owned();
            err.map_or(Ok(replaced), Err)
        };

        let steps = self
            .steps
            .iter()
            .map(|s| {
                Ok::<_, ExpandExamplesError>(Step {
                    kind: s.kind,
                    keyword: s.keyword.clone(),
                    text: replace(&s.text)?,
                    args: s
                        .args
                        .iter()
                        .map(|a| replace(a.as_str()))
                        .collect::<Result<_, _>>()?,
                    table: s
                        .table
                        .as_ref()
                        .map(|t| t.try_map_cells(replace))
                        .transpose()?,
                })
            })
            .collect::<Result<_, _>>()?;

        let name = replace(&self.name)?;

        Ok(ConcreteScenario {
            name,
            tags,
            steps,
            row: Some(ordinal),
        })
    }
}

/// [Examples] of a [Scenario Outline].
///
/// [Examples]: https://cucumber.io/docs/gherkin/reference#examples
/// [Scenario Outline]: https://cucumber.io/docs/gherkin/reference#scenario-outline
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Examples {
    /// Name of this [`Examples`] block, if any.
    pub name: Option<String>,

    /// Tags, without the leading `@`.
    pub tags: Vec<String>,

    /// Header row of column names followed by data rows.
    pub table: DataTable,
}

impl Examples {
    /// Creates a new [`Examples`] block out of its table.
    #[must_use]
    pub fn new(table: impl Into<DataTable>) -> Self {
        Self { table: table.into(), ..Self::default() }
    }

    /// Sets the tags.
    #[must_use]
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }
}

/// Fully resolved, runnable instance of a [`Scenario`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ConcreteScenario {
    /// Name, with placeholders substituted.
    pub name: String,

    /// Tags of the [`Scenario`] and of the [`Examples`] block.
    pub tags: Vec<String>,

    /// [`Step`]s, not including [`Background`] ones.
    pub steps: Vec<Step>,

    /// Zero-based ordinal of the [`Examples`] data row this one is expanded
    /// from, counted across all the [`Examples`] blocks.
    pub row: Option<usize>,
}

/// Lazy iterator over [`ConcreteScenario`]s of a [`Scenario`].
///
/// Created by [`Scenario::concrete()`].
#[derive(Clone, Debug)]
pub struct Concrete<'s> {
    scenario: &'s Scenario,
    examples: usize,
    row: usize,
    ordinal: usize,
    done: bool,
}

impl Iterator for Concrete<'_> {
    type Item = Result<ConcreteScenario, ExpandExamplesError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let sc = self.scenario;
        if !sc.is_outline() {
            self.done = true;
            return Some(Ok(ConcreteScenario {
                name: sc.name.clone(),
                tags: sc.tags.clone(),
                steps: sc.steps.clone(),
                row: None,
            }));
        }

        while let Some(examples) = sc.examples.get(self.examples) {
            let (Some(header), Some(values)) = (
                examples.table.headers(),
                examples.table.rows().get(self.row),
            ) else {
                self.examples += 1;
                self.row = 0;
                continue;
            };

            self.row += 1;
            let ordinal = self.ordinal;
            self.ordinal += 1;
            return Some(sc.expand(header, values, examples, ordinal));
        }

        self.done = true;
        None
    }
}

/// Error of a [Scenario Outline] expansion encountering an unknown
/// placeholder.
///
/// [Scenario Outline]: https://cucumber.io/docs/gherkin/reference#scenario-outline
#[derive(Clone, Debug, Display, Error, Eq, PartialEq)]
#[display(
    fmt = "Failed to resolve <{}> in scenario `{}`, examples row {}",
    name,
    scenario,
    row
)]
pub struct ExpandExamplesError {
    /// Name of the unknown placeholder.
    pub name: String,

    /// Name of the outline.
    pub scenario: String,

    /// Tags of the outline followed by the ones of the [`Examples`] block
    /// the row belongs to.
    pub tags: Vec<String>,

    /// Zero-based ordinal of the examples row.
    pub row: usize,
}

#[cfg(test)]
mod tests {
    use crate::step::Kind;

    use super::*;

    fn outline() -> Scenario {
        Scenario::new(
            "eating <eat>",
            [
                Step::new(Kind::Given, "there are <start> cucumbers"),
                Step::new(Kind::When, "I eat {{s}} cucumbers").with_args(["<eat>"]),
                Step::new(Kind::Then, "left")
                    .with_table(vec![vec!["left"], vec!["<left>"]]),
            ],
        )
        .with_tags(["outline"])
        .with_examples(
            Examples::new(vec![
                vec!["start", "eat", "left"],
                vec!["12", "5", "7"],
                vec!["20", "4", "16"],
            ])
            .with_tags(["first"]),
        )
        .with_examples(Examples::new(vec![vec!["start", "eat", "left"]]))
        .with_examples(Examples::new(vec![
            vec!["start", "eat", "left"],
            vec!["1", "1", "0"],
        ]))
    }

    #[test]
    fn plain_scenario_yields_itself_once() {
        let sc = Scenario::new("plain", [Step::new(Kind::Given, "x")]);

        let all = sc.concrete().collect::<Result<Vec<_>, _>>().unwrap();

        assert_eq!(all.len(), 1);
        assert_eq!(all[0].name, "plain");
        assert_eq!(all[0].steps, sc.steps);
        assert_eq!(all[0].row, None);
    }

    #[test]
    fn outline_yields_row_per_example() {
        let all = outline().concrete().collect::<Result<Vec<_>, _>>().unwrap();

        assert_eq!(all.len(), 3);
        assert_eq!(
            all.iter().map(|c| c.name.as_str()).collect::<Vec<_>>(),
            ["eating 5", "eating 4", "eating 1"],
        );
        assert_eq!(
            all.iter().map(|c| c.row).collect::<Vec<_>>(),
            [Some(0), Some(1), Some(2)],
        );
        assert_eq!(all[0].tags, ["outline", "first"]);
        assert_eq!(all[2].tags, ["outline"]);
    }

    #[test]
    fn substitutes_text_args_and_table() {
        let first = outline().concrete().next().unwrap().unwrap();

        assert_eq!(first.steps[0].text, "there are 12 cucumbers");
        assert_eq!(first.steps[1].text, "I eat {{s}} cucumbers");
        assert_eq!(first.steps[1].args, ["5"]);
        assert_eq!(
            first.steps[2].table,
            Some(DataTable::from(vec![vec!["left"], vec!["7"]])),
        );
    }

    #[test]
    fn enumeration_is_restartable() {
        let sc = outline();

        let first = sc.concrete().count();
        let second = sc.concrete().count();

        assert_eq!(first, 3);
        assert_eq!(first, second);
    }

    #[test]
    fn unknown_placeholder_errors() {
        let sc = Scenario::new("bad", [Step::new(Kind::Given, "<nope>")])
            .with_examples(Examples::new(vec![vec!["yes"], vec!["1"]]));

        let err = sc.concrete().next().unwrap().unwrap_err();

        assert_eq!(
            err,
            ExpandExamplesError {
                name: "nope".to_owned(),
                scenario: "bad".to_owned(),
                tags: vec![],
                row: 0,
            },
        );
    }

    #[test]
    fn unknown_placeholder_error_carries_examples_tags() {
        let sc = Scenario::new("bad", [Step::new(Kind::Given, "<nope>")])
            .with_tags(["outline"])
            .with_examples(
                Examples::new(vec![vec!["yes"], vec!["1"]]).with_tags(["ci"]),
            );

        let err = sc.concrete().next().unwrap().unwrap_err();

        assert_eq!(err.tags, ["outline", "ci"]);
    }

    #[test]
    fn outline_without_rows_yields_nothing() {
        let sc = Scenario::new("empty", [Step::new(Kind::Given, "<a>")])
            .with_examples(Examples::new(vec![vec!["a"]]));

        assert!(sc.is_outline());
        assert_eq!(sc.concrete().count(), 0);
    }

    #[test]
    fn background_steps_default_to_empty() {
        let feature = Feature::new("f");
        assert!(feature.background_steps().is_empty());

        let feature = feature.with_background([Step::new(Kind::Given, "bg")]);
        assert_eq!(feature.background_steps().len(), 1);
    }
}
