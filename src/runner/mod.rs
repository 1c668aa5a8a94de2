// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Sequential execution of [`Feature`]s.
//!
//! [`Runner`] goes over [`Feature`]s, their [`Scenario`]s and the
//! [`ConcreteScenario`]s those expand into, strictly in order, running each
//! [`ConcreteScenario`] in two phases (see [`scenario`]) and wrapping the
//! whole run and every [`ConcreteScenario`] with [`Hooks`].

pub mod scenario;

use std::fmt;

use itertools::Itertools as _;

use crate::{
    event,
    feature::{ConcreteScenario, Feature, FeatureSet, Scenario},
    hook::{HookType, Hooks},
    step::Collection,
    Writer,
};

/// Predicate deciding whether a [`ConcreteScenario`] of a [`Feature`] should
/// be run.
pub type Filter = dyn Fn(&Feature, &ConcreteScenario) -> bool;

/// Executor of [`FeatureSet`]s against a step [`Collection`].
///
/// Borrows everything it needs, so it can only be built once registration is
/// over.
pub struct Runner<'s> {
    /// Registered step [`Definition`]s.
    ///
    /// [`Definition`]: crate::step::Definition
    steps: &'s Collection,

    /// Lifecycle [`Hooks`].
    hooks: &'s Hooks,

    /// Optional [`Filter`] of [`ConcreteScenario`]s to run.
    filter: Option<&'s Filter>,

    /// Whether a failed [`ConcreteScenario`] of an outline stops the rest of
    /// that outline.
    outline_fail_fast: bool,
}

// Implemented manually as `dyn Fn` is not `Debug`.
impl fmt::Debug for Runner<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runner")
            .field("steps", &self.steps)
            .field("hooks", &self.hooks)
            .field("filter", &self.filter.map(|_| ".."))
            .field("outline_fail_fast", &self.outline_fail_fast)
            .finish()
    }
}

impl<'s> Runner<'s> {
    /// Creates a new [`Runner`] running every [`ConcreteScenario`].
    #[must_use]
    pub const fn new(steps: &'s Collection, hooks: &'s Hooks) -> Self {
        Self { steps, hooks, filter: None, outline_fail_fast: true }
    }

    /// Runs only [`ConcreteScenario`]s the given [`Filter`] accepts.
    ///
    /// Rejected ones are neither run nor counted.
    #[must_use]
    pub fn with_filter(mut self, filter: Option<&'s Filter>) -> Self {
        self.filter = filter;
        self
    }

    /// Sets whether the first failed [`ConcreteScenario`] of a
    /// [Scenario Outline] stops enumeration of its remaining ones (the
    /// default), or the remaining ones run anyway.
    ///
    /// [Scenario Outline]: https://cucumber.io/docs/gherkin/reference#scenario-outline
    #[must_use]
    pub fn outline_fail_fast(mut self, enabled: bool) -> Self {
        self.outline_fail_fast = enabled;
        self
    }

    /// Runs the given [`FeatureSet`], reporting events to the given
    /// [`Writer`].
    ///
    /// [`HookType::BeforeSuite`] and [`HookType::AfterSuite`] hooks run
    /// exactly once, even if there's nothing to run or something failed.
    ///
    /// # Panics
    ///
    /// If any [`Hook`] panics.
    ///
    /// [`Hook`]: crate::hook::Hook
    pub fn run<W: Writer + ?Sized>(
        &self,
        features: &FeatureSet,
        writer: &mut W,
    ) -> Summary {
        let mut summary = Summary::default();

        writer.handle_event(event::Cucumber::Started);
        self.hooks.run(HookType::BeforeSuite);

        for feature in features {
            let span = tracing::info_span!("feature", name = %feature.name);
            let _guard = span.enter();

            let mut started = false;
            for scenario in &feature.scenarios {
                self.run_scenario(
                    feature,
                    scenario,
                    &mut started,
                    writer,
                    &mut summary,
                );
            }

            if started {
                summary.features += 1;
                writer.handle_event(event::Cucumber::Feature(
                    feature,
                    event::Feature::Finished,
                ));
            }
        }

        self.hooks.run(HookType::AfterSuite);

        if summary.is_failed() {
            tracing::error!(
                failed = summary.failed_scenarios.len(),
                passed = summary.passed_scenarios,
                "run failed",
            );
        } else {
            tracing::info!(passed = summary.passed_scenarios, "run passed");
        }
        writer.handle_event(event::Cucumber::Finished(&summary));

        summary
    }

    /// Runs all the [`ConcreteScenario`]s of the given [`Scenario`].
    fn run_scenario<W: Writer + ?Sized>(
        &self,
        feature: &Feature,
        scenario: &Scenario,
        feature_started: &mut bool,
        writer: &mut W,
        summary: &mut Summary,
    ) {
        for concrete in scenario.concrete() {
            let passed = match concrete {
                Ok(concrete) => {
                    if !self.is_selected(feature, &concrete) {
                        continue;
                    }
                    start_feature(feature, feature_started, writer);

                    self.run_concrete(feature, &concrete, writer, summary)
                }
                Err(err) => {
                    let unexpanded = ConcreteScenario {
                        name: scenario.name.clone(),
                        tags: err.tags.clone(),
                        steps: Vec::new(),
                        row: Some(err.row),
                    };
                    if !self.is_selected(feature, &unexpanded) {
                        continue;
                    }
                    start_feature(feature, feature_started, writer);

                    tracing::error!(%err, "failed to expand scenario");
                    writer.handle_event(event::Cucumber::Feature(
                        feature,
                        event::Feature::ExpansionFailed(scenario, &err),
                    ));
                    summary.failed_scenarios.push(format!(
                        "{}: {} (examples row {})",
                        feature.name, scenario.name, err.row,
                    ));
                    false
                }
            };

            if !passed && self.outline_fail_fast {
                break;
            }
        }
    }

    /// Runs a single [`ConcreteScenario`] surrounded by scenario [`Hooks`],
    /// returning whether it passed.
    fn run_concrete<W: Writer + ?Sized>(
        &self,
        feature: &Feature,
        concrete: &ConcreteScenario,
        writer: &mut W,
        summary: &mut Summary,
    ) -> bool {
        let span = tracing::info_span!(
            "scenario",
            name = %concrete.name,
            row = concrete.row,
        );
        let _guard = span.enter();

        self.hooks.run(HookType::BeforeScenario);

        let result = scenario::run(self.steps, feature, concrete, writer);
        summary.steps += result.steps;
        summary.undefined_steps += result.undefined;

        match result.outcome {
            Ok(()) => {
                tracing::info!("scenario passed");
                summary.passed_scenarios += 1;
                self.hooks.run(HookType::AfterScenario);
                true
            }
            Err(failure) => {
                tracing::error!(%failure, "scenario failed");
                summary
                    .failed_scenarios
                    .push(format!("{}: {}", feature.name, concrete.name));
                false
            }
        }
    }

    fn is_selected(&self, feature: &Feature, concrete: &ConcreteScenario) -> bool {
        self.filter.map_or(true, |f| f(feature, concrete))
    }
}

/// Emits [`event::Feature::Started`] once per [`Feature`].
fn start_feature<W: Writer + ?Sized>(
    feature: &Feature,
    started: &mut bool,
    writer: &mut W,
) {
    if !*started {
        *started = true;
        writer.handle_event(event::Cucumber::Feature(
            feature,
            event::Feature::Started,
        ));
    }
}

/// Execution statistics of [`Step`]s.
///
/// [`Step`]: crate::Step
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Stats {
    /// Number of passed [`Step`]s.
    ///
    /// [`Step`]: crate::Step
    pub passed: usize,

    /// Number of [`Step`]s that weren't run.
    ///
    /// [`Step`]: crate::Step
    pub skipped: usize,

    /// Number of failed [`Step`]s, undefined ones included.
    ///
    /// [`Step`]: crate::Step
    pub failed: usize,
}

impl Stats {
    /// Returns total number of [`Step`]s these [`Stats`] have been collected
    /// for.
    ///
    /// [`Step`]: crate::Step
    #[must_use]
    pub const fn total(&self) -> usize {
        self.passed + self.skipped + self.failed
    }
}

impl std::ops::AddAssign for Stats {
    fn add_assign(&mut self, rhs: Self) {
        self.passed += rhs.passed;
        self.skipped += rhs.skipped;
        self.failed += rhs.failed;
    }
}

/// Outcome of a whole run.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Summary {
    /// Number of [`Feature`]s having at least one [`ConcreteScenario`] run.
    pub features: usize,

    /// Number of passed [`ConcreteScenario`]s.
    pub passed_scenarios: usize,

    /// `Feature: Scenario` labels of failed [`ConcreteScenario`]s, in order
    /// of execution.
    pub failed_scenarios: Vec<String>,

    /// [`Stats`] of all the [`Step`]s.
    ///
    /// [`Step`]: crate::Step
    pub steps: Stats,

    /// Number of undefined [`Step`]s.
    ///
    /// [`Step`]: crate::Step
    pub undefined_steps: usize,
}

impl Summary {
    /// Indicates whether at least one [`ConcreteScenario`] failed.
    #[must_use]
    pub fn is_failed(&self) -> bool {
        !self.failed_scenarios.is_empty()
    }

    /// Number of run [`ConcreteScenario`]s.
    #[must_use]
    pub fn scenarios(&self) -> usize {
        self.passed_scenarios + self.failed_scenarios.len()
    }

    /// Message describing the failure of this [`Summary`], if any.
    #[must_use]
    pub fn failure_message(&self) -> Option<String> {
        self.is_failed().then(|| {
            format!(
                "{} failed:\n{}",
                plural(self.failed_scenarios.len(), "scenario"),
                self.failed_scenarios
                    .iter()
                    .map(|s| format!("  {s}"))
                    .join("\n"),
            )
        })
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", plural(self.features, "feature"))?;
        writeln!(
            f,
            "{} ({} passed, {} failed)",
            plural(self.scenarios(), "scenario"),
            self.passed_scenarios,
            self.failed_scenarios.len(),
        )?;
        write!(
            f,
            "{} ({} passed, {} skipped, {} failed)",
            plural(self.steps.total(), "step"),
            self.steps.passed,
            self.steps.skipped,
            self.steps.failed,
        )
    }
}

fn plural(n: usize, singular: &str) -> String {
    if n == 1 {
        format!("{n} {singular}")
    } else {
        format!("{n} {singular}s")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_display() {
        let summary = Summary {
            features: 1,
            passed_scenarios: 2,
            failed_scenarios: vec!["Widgets: counting".to_owned()],
            steps: Stats { passed: 5, skipped: 1, failed: 1 },
            undefined_steps: 0,
        };

        assert_eq!(
            summary.to_string(),
            "1 feature\n\
             3 scenarios (2 passed, 1 failed)\n\
             7 steps (5 passed, 1 skipped, 1 failed)",
        );
        assert!(summary.is_failed());
        assert_eq!(
            summary.failure_message().as_deref(),
            Some("1 scenario failed:\n  Widgets: counting"),
        );
    }

    #[test]
    fn empty_summary_passes() {
        let summary = Summary::default();

        assert!(!summary.is_failed());
        assert_eq!(summary.failure_message(), None);
        assert_eq!(summary.scenarios(), 0);
    }
}
