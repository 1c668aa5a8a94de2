// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Default [`Writer`] implementation.

use std::{fmt::Display, io};

use console::Term;
use itertools::Itertools as _;

use crate::{
    event,
    feature::{self, ConcreteScenario, ExpandExamplesError},
    runner::Summary,
    Step, StepError, UndefinedStep, Writer,
};

use super::out::{Coloring, Styles, WriteStrExt as _};

/// Default [`Writer`] implementation outputting human-readable lines.
///
/// Every [`Step`] is printed once its outcome is known, so the output
/// doesn't depend on terminal capabilities.
#[derive(Clone, Debug)]
pub struct Basic<Out: io::Write = Term> {
    /// [`io::Write`] implementor to write the output into.
    output: Out,

    /// [`Styles`] for terminal output.
    styles: Styles,
}

impl Default for Basic {
    fn default() -> Self {
        Self::stdout()
    }
}

impl Basic {
    /// Creates a new [`Basic`] [`Writer`] outputting into [`Term::stdout()`]
    /// with [`Coloring::Auto`].
    #[must_use]
    pub fn stdout() -> Self {
        Self::new(Term::stdout(), Coloring::Auto)
    }
}

impl<Out: io::Write> Basic<Out> {
    /// Creates a new [`Basic`] [`Writer`] outputting into the given `output`.
    #[must_use]
    pub fn new(output: Out, coloring: Coloring) -> Self {
        Self { output, styles: Styles::new(coloring) }
    }

    /// Changes the [`Coloring`] of this [`Basic`] [`Writer`].
    #[must_use]
    pub fn with_coloring(mut self, coloring: Coloring) -> Self {
        self.styles = Styles::new(coloring);
        self
    }

    /// Returns the wrapped output.
    pub fn into_inner(self) -> Out {
        self.output
    }

    fn line(&mut self, line: impl AsRef<str>) {
        self.output
            .write_line(line)
            .unwrap_or_else(|e| panic!("Failed to write into output: {e}"));
    }

    fn feature_started(&mut self, feature: &feature::Feature) {
        let line = self.styles.ok(format!("Feature: {}", feature.name));
        self.line(self.styles.bold(line));
    }

    fn expansion_failed(
        &mut self,
        scenario: &feature::Scenario,
        err: &ExpandExamplesError,
    ) {
        let line = self.styles.err(format!(
            "  \u{2718}  Scenario Outline: {}\n      {err}",
            scenario.name,
        ));
        self.line(line);
    }

    fn scenario(&mut self, scenario: &ConcreteScenario, ev: event::Scenario<'_>) {
        match ev {
            event::Scenario::Started => {
                let line = match scenario.row {
                    Some(row) => {
                        format!("  Scenario: {} (row {row})", scenario.name)
                    }
                    None => format!("  Scenario: {}", scenario.name),
                };
                self.line(self.styles.ok(line));
            }
            event::Scenario::Background(step, ev) => self.step(step, ev, ">"),
            event::Scenario::Step(step, ev) => self.step(step, ev, " "),
            event::Scenario::Finished { .. } => {}
        }
    }

    fn step(&mut self, step: &Step, ev: event::Step<'_>, marker: &str) {
        let text = format!("{} {}", step.keyword.trim(), step.display_text());

        match ev {
            event::Step::Started => {}
            event::Step::Passed => {
                //       ✔
                let line = format!("    \u{2714}{marker} {text}");
                self.line(self.styles.ok(line));
                if let Some(table) = &step.table {
                    self.line(self.styles.ok(indent(table, 8)));
                }
            }
            event::Step::Skipped => {
                let line = format!("    ?{marker} {text} (skipped)");
                self.line(self.styles.skipped(line));
            }
            event::Step::Failed(err) => self.step_failed(&text, marker, err),
            event::Step::Undefined(undefined) => {
                self.step_undefined(&text, marker, undefined);
            }
        }
    }

    fn step_failed(&mut self, text: &str, marker: &str, err: &StepError) {
        let line = self.styles.err(format!(
            //       ✘
            "    \u{2718}{marker} {text}\n{}",
            indent(err, 7),
        ));
        self.line(line);
    }

    fn step_undefined(
        &mut self,
        text: &str,
        marker: &str,
        undefined: &UndefinedStep,
    ) {
        let line = self.styles.skipped(format!(
            "    ?{marker} {text} (undefined)\n{}",
            indent(undefined.hint(), 7),
        ));
        self.line(line);
    }

    fn summary(&mut self, summary: &Summary) {
        let status = if summary.is_failed() {
            self.styles.err("[Summary]")
        } else {
            self.styles.ok("[Summary]")
        };
        let header = self.styles.bold(status);
        self.line(header);
        self.line(summary.to_string());

        for failed in &summary.failed_scenarios {
            let line = self.styles.err(format!("  \u{2718} {failed}"));
            self.line(line);
        }
    }
}

impl<Out: io::Write> Writer for Basic<Out> {
    fn handle_event(&mut self, ev: event::Cucumber<'_>) {
        match ev {
            event::Cucumber::Started => {}
            event::Cucumber::Feature(f, ev) => match ev {
                event::Feature::Started => self.feature_started(f),
                event::Feature::Scenario(sc, ev) => self.scenario(sc, ev),
                event::Feature::ExpansionFailed(sc, err) => {
                    self.expansion_failed(sc, err);
                }
                event::Feature::Finished => self.line(""),
            },
            event::Cucumber::Finished(summary) => self.summary(summary),
        }
    }
}

/// Indents every line of the given `value` with `spaces`.
fn indent(value: impl Display, spaces: usize) -> String {
    let pad = " ".repeat(spaces);
    value
        .to_string()
        .lines()
        .map(|line| format!("{pad}{line}"))
        .join("\n")
}
