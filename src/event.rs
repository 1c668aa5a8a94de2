// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Key occurrences in the lifecycle of a run.
//!
//! The top-level enum here is [`Cucumber`].
//!
//! Each event enum contains variants indicating what stage of execution
//! [`Runner`] is at, and variants with detailed content about the precise
//! sub-event. Events borrow everything they describe, so they're only valid
//! while being handled by a [`Writer`].
//!
//! [`Runner`]: crate::Runner
//! [`Writer`]: crate::Writer

use crate::{
    feature::{self, ConcreteScenario, ExpandExamplesError},
    runner::Summary,
    StepError, UndefinedStep,
};

/// Top-level run event.
#[derive(Clone, Copy, Debug)]
pub enum Cucumber<'e> {
    /// Run started.
    Started,

    /// [`Feature`] event.
    ///
    /// [`Feature`]: feature::Feature
    Feature(&'e feature::Feature, Feature<'e>),

    /// Run finished.
    Finished(&'e Summary),
}

impl<'e> Cucumber<'e> {
    /// Constructs an event of a [`Scenario`] of the given [`Feature`].
    ///
    /// [`Feature`]: feature::Feature
    #[must_use]
    pub const fn scenario(
        feature: &'e feature::Feature,
        scenario: &'e ConcreteScenario,
        event: Scenario<'e>,
    ) -> Self {
        Self::Feature(feature, Feature::Scenario(scenario, event))
    }
}

/// Event specific to a particular [Feature].
///
/// [Feature]: https://cucumber.io/docs/gherkin/reference#feature
#[derive(Clone, Copy, Debug)]
pub enum Feature<'e> {
    /// [`Feature`] execution started.
    ///
    /// Emitted right before its first selected [`Scenario`].
    ///
    /// [`Feature`]: feature::Feature
    Started,

    /// [`Scenario`] event.
    Scenario(&'e ConcreteScenario, Scenario<'e>),

    /// A [Scenario Outline] failed to expand into a [`ConcreteScenario`].
    ///
    /// [Scenario Outline]: https://cucumber.io/docs/gherkin/reference#scenario-outline
    ExpansionFailed(&'e feature::Scenario, &'e ExpandExamplesError),

    /// [`Feature`] execution finished.
    ///
    /// [`Feature`]: feature::Feature
    Finished,
}

/// Event specific to a particular [`ConcreteScenario`].
#[derive(Clone, Copy, Debug)]
pub enum Scenario<'e> {
    /// [`ConcreteScenario`] execution started.
    Started,

    /// [`Background`] [`Step`] event.
    ///
    /// [`Background`]: feature::Background
    /// [`Step`]: crate::Step
    Background(&'e crate::Step, Step<'e>),

    /// [`Step`] event.
    ///
    /// [`Step`]: crate::Step
    Step(&'e crate::Step, Step<'e>),

    /// [`ConcreteScenario`] execution finished.
    Finished {
        /// Whether all the steps passed.
        passed: bool,
    },
}

impl<'e> Scenario<'e> {
    /// Constructs an event of either a [`Background`] or a regular [`Step`].
    ///
    /// [`Background`]: feature::Background
    /// [`Step`]: crate::Step
    #[must_use]
    pub const fn step(
        background: bool,
        step: &'e crate::Step,
        event: Step<'e>,
    ) -> Self {
        if background {
            Self::Background(step, event)
        } else {
            Self::Step(step, event)
        }
    }
}

/// Event specific to a particular [Step].
///
/// [Step]: https://cucumber.io/docs/gherkin/reference#steps
#[derive(Clone, Copy, Debug)]
pub enum Step<'e> {
    /// [`Step`] execution started.
    ///
    /// [`Step`]: crate::Step
    Started,

    /// [`Step`] passed.
    ///
    /// [`Step`]: crate::Step
    Passed,

    /// [`Step`] wasn't run, either because some other one is undefined or
    /// because a previous one failed.
    ///
    /// [`Step`]: crate::Step
    Skipped,

    /// [`Step`] failed.
    ///
    /// [`Step`]: crate::Step
    Failed(&'e StepError),

    /// No [`Definition`] matches the [`Step`].
    ///
    /// Emitted while validating a scenario, before any of its steps run.
    ///
    /// [`Definition`]: crate::step::Definition
    /// [`Step`]: crate::Step
    Undefined(&'e UndefinedStep),
}
