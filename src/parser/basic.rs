// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Default [`Parser`] implementation.

use std::path::{Path, PathBuf};

use lazy_regex::{regex, Lazy, Regex};

use crate::{
    feature::{Background, Examples, Feature, FeatureSet, Scenario},
    step::{Kind, ARG_PLACEHOLDER},
    DataTable, Step,
};

use super::{Error, Parser, Result};

/// Default [`Parser`] built on top of the [`gherkin`] crate.
///
/// Parses either [Gherkin] text ([`Parser`]`<&str>`) or a path
/// ([`Parser`]`<&Path>`): a single `.feature` file, or a directory searched
/// recursively for `*.feature` files, parsed in sorted path order.
///
/// Every double-quoted substring of a step becomes its positional argument,
/// and is replaced with [`ARG_PLACEHOLDER`] in the step text. So this one:
/// ```gherkin
/// When I move "box" to "shelf"
/// ```
/// is matched by the `I move {{s}} to {{s}}` pattern, with `box` and `shelf`
/// arguments.
///
/// Scenarios of `Rule:` blocks are flattened into their [`Feature`], after
/// its own scenarios, with the `Rule` background steps and tags prepended.
/// Docstrings are ignored.
///
/// [Gherkin]: https://cucumber.io/docs/gherkin/reference
#[derive(Clone, Copy, Debug, Default)]
pub struct Basic;

impl Basic {
    /// Creates a new [`Basic`] [`Parser`].
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Parses a single [`Feature`] out of the given text.
    ///
    /// # Errors
    ///
    /// If the text isn't a valid [Gherkin] feature.
    ///
    /// [Gherkin]: https://cucumber.io/docs/gherkin/reference
    pub fn parse_text(&self, text: &str) -> Result<FeatureSet> {
        let feature =
            gherkin::Feature::parse(text, gherkin::GherkinEnv::default())?;
        Ok(FeatureSet::new(vec![convert_feature(feature)]))
    }

    /// Parses a `.feature` file, or all `*.feature` files of a directory.
    ///
    /// # Errors
    ///
    /// If the path cannot be read, or any of the files isn't a valid
    /// [Gherkin] feature.
    ///
    /// [Gherkin]: https://cucumber.io/docs/gherkin/reference
    pub fn parse_path(&self, path: impl AsRef<Path>) -> Result<FeatureSet> {
        let path = path.as_ref();
        let walk_err = |reason: String| Error::Walk {
            path: path.to_path_buf(),
            reason,
        };

        let path = path.canonicalize().map_err(|e| walk_err(e.to_string()))?;

        let files = if path.is_file() {
            vec![path]
        } else {
            let walker = globwalk::GlobWalkerBuilder::new(&path, "*.feature")
                .case_insensitive(true)
                .build()
                .map_err(|e| walk_err(e.to_string()))?;
            let mut files = walker
                .map(|entry| {
                    entry
                        .map(|e| e.path().to_path_buf())
                        .map_err(|e| walk_err(e.to_string()))
                })
                .collect::<Result<Vec<PathBuf>>>()?;
            files.sort();
            files
        };

        files
            .into_iter()
            .map(|file| {
                tracing::debug!(file = %file.display(), "parsing feature");
                let env = gherkin::GherkinEnv::default();
                let feature = gherkin::Feature::parse_path(file, env)?;
                Ok::<_, Error>(convert_feature(feature))
            })
            .collect()
    }
}

impl Parser<&str> for Basic {
    fn parse(&self, input: &str) -> Result<FeatureSet> {
        self.parse_text(input)
    }
}

impl Parser<&Path> for Basic {
    fn parse(&self, input: &Path) -> Result<FeatureSet> {
        self.parse_path(input)
    }
}

fn convert_feature(feature: gherkin::Feature) -> Feature {
    let background = feature.background.map(|bg| convert_background(bg.steps));

    let ruled = feature.rules.into_iter().flat_map(|rule| {
        let bg = rule
            .background
            .map(|bg| convert_background(bg.steps).steps)
            .unwrap_or_default();
        let tags = rule.tags;
        rule.scenarios.into_iter().map(move |sc| {
            let mut sc = convert_scenario(sc);
            sc.steps.splice(0..0, bg.iter().cloned());
            sc.tags.splice(0..0, tags.iter().cloned());
            sc
        })
    });

    Feature {
        name: feature.name,
        tags: feature.tags,
        path: feature.path,
        background,
        scenarios: feature
            .scenarios
            .into_iter()
            .map(convert_scenario)
            .chain(ruled)
            .collect(),
    }
}

fn convert_background(steps: Vec<gherkin::Step>) -> Background {
    Background::new(steps.into_iter().map(convert_step))
}

fn convert_scenario(scenario: gherkin::Scenario) -> Scenario {
    Scenario {
        name: scenario.name,
        tags: scenario.tags,
        steps: scenario.steps.into_iter().map(convert_step).collect(),
        examples: scenario
            .examples
            .into_iter()
            .map(|ex| Examples {
                name: ex.name,
                tags: ex.tags,
                table: ex.table.map(DataTable::from).unwrap_or_default(),
            })
            .collect(),
    }
}

fn convert_step(step: gherkin::Step) -> Step {
    /// [`Regex`] matching double-quoted step arguments.
    static QUOTED_REGEX: &Lazy<Regex> = regex!(r#""([^"]*)""#);

    let args = QUOTED_REGEX
        .captures_iter(&step.value)
        .map(|cap| cap[1].to_owned())
        .collect();
    let text = QUOTED_REGEX
        .replace_all(&step.value, regex::NoExpand(ARG_PLACEHOLDER))
        .into_owned();

    Step {
        kind: Kind::from(step.ty),
        keyword: step.keyword.trim().to_owned(),
        text,
        args,
        table: step.table.map(DataTable::from),
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    const WIDGETS: &str = r#"
@widgets
Feature: Widgets

  Background:
    Given a clean shelf

  Scenario: moving
    When I move "box" to "shelf"
    And I count "3" widgets
    Then the shelf has:
      | name | count |
      | box  | 3     |

  @outline
  Scenario Outline: eating
    Given there are <start> cucumbers
    When I eat "<eat>" cucumbers

    @first
    Examples:
      | start | eat |
      | 12    | 5   |

  Rule: restocking
    Background:
      Given a delivery

    @rule
    Scenario: restock
      Then the shelf is full
"#;

    #[test]
    fn extracts_quoted_args() {
        let set = Basic.parse_text(WIDGETS).unwrap();
        let feature = &set.features[0];

        let moving = &feature.scenarios[0];
        assert_eq!(moving.steps[0].kind, Kind::When);
        assert_eq!(moving.steps[0].text, "I move {{s}} to {{s}}");
        assert_eq!(moving.steps[0].args, ["box", "shelf"]);
        assert_eq!(moving.steps[1].kind, Kind::When);
        assert_eq!(moving.steps[1].keyword, "And");
        assert_eq!(moving.steps[1].args, ["3"]);
    }

    #[test]
    fn keeps_tables_and_tags() {
        let set = Basic.parse_text(WIDGETS).unwrap();
        let feature = &set.features[0];

        assert_eq!(feature.name, "Widgets");
        assert_eq!(feature.tags, ["widgets"]);
        assert_eq!(feature.background_steps()[0].text, "a clean shelf");

        let table = feature.scenarios[0].steps[2].table.as_ref().unwrap();
        assert_eq!(table.raw(), [vec!["name", "count"], vec!["box", "3"]]);

        let outline = &feature.scenarios[1];
        assert_eq!(outline.tags, ["outline"]);
        assert_eq!(outline.examples[0].tags, ["first"]);
        assert_eq!(outline.steps[1].args, ["<eat>"]);

        let concrete = outline.concrete().next().unwrap().unwrap();
        assert_eq!(concrete.steps[0].text, "there are 12 cucumbers");
        assert_eq!(concrete.steps[1].args, ["5"]);
    }

    #[test]
    fn flattens_rules() {
        let set = Basic.parse_text(WIDGETS).unwrap();
        let feature = &set.features[0];

        assert_eq!(feature.scenarios.len(), 3);
        let restock = &feature.scenarios[2];
        assert_eq!(restock.name, "restock");
        assert_eq!(restock.tags, ["rule"]);
        assert_eq!(
            restock.steps.iter().map(|s| s.text.as_str()).collect::<Vec<_>>(),
            ["a delivery", "the shelf is full"],
        );
    }

    #[test]
    fn rejects_invalid_text() {
        let err = Basic.parse_text("Scenario without a feature").unwrap_err();

        assert!(matches!(err, Error::Parsing(_)));
        assert!(err.to_string().starts_with("Failed to parse feature"));
    }

    #[test]
    fn walks_directories_in_sorted_order() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::write(
            dir.path().join("nested/b.feature"),
            "Feature: B\n  Scenario: b\n    Given b\n",
        )
        .unwrap();
        fs::write(
            dir.path().join("a.FEATURE"),
            "Feature: A\n  Scenario: a\n    Given a\n",
        )
        .unwrap();
        fs::write(dir.path().join("notes.txt"), "Feature: nope").unwrap();

        let set = Basic.parse_path(dir.path()).unwrap();

        assert_eq!(
            set.iter().map(|f| f.name.as_str()).collect::<Vec<_>>(),
            ["A", "B"],
        );
        assert!(set.features[0].path.is_some());
    }

    #[test]
    fn parses_single_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("single.feature");
        fs::write(&file, "Feature: Single\n  Scenario: s\n    Given s\n")
            .unwrap();

        let set = Parser::parse(&Basic, file.as_path()).unwrap();

        assert_eq!(set.len(), 1);
        assert_eq!(set.features[0].name, "Single");
    }

    #[test]
    fn missing_path_is_walk_error() {
        let err = Basic.parse_path("/definitely/not/here").unwrap_err();

        assert!(matches!(err, Error::Walk { .. }));
    }
}
