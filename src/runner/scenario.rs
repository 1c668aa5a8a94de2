// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Two-phase execution of a single [`ConcreteScenario`].
//!
//! 1. __Validate__: every [`Step`] ([`Background`] ones first) is resolved
//!    against the [`Collection`]. Each unresolved one is reported as
//!    [`event::Step::Undefined`] right away, and if there is any, nothing is
//!    invoked at all.
//! 2. __Execute__: [`Step`]s are resolved again, bound and invoked strictly in
//!    order. The first failure fails the scenario, and the rest of
//!    [`Step`]s are reported as [`event::Step::Skipped`].
//!
//! [`Background`]: crate::feature::Background

use std::{
    any::Any,
    panic::{self, AssertUnwindSafe},
};

use derive_more::Display;

use crate::{
    event,
    feature::{ConcreteScenario, Feature},
    step::{binder, Collection},
    Step, StepError, UndefinedStep, Writer,
};

use super::Stats;

/// Reason of a [`ConcreteScenario`] failure.
#[derive(Clone, Debug, Display, Eq, PartialEq)]
pub enum Failure {
    /// Validation found undefined [`Step`]s.
    #[display(fmt = "{} undefined step(s)", _0)]
    Undefined(usize),

    /// A [`Step`] failed during execution.
    #[display(fmt = "step `{}` failed: {}", step, error)]
    Step {
        /// Text of the failed [`Step`], with arguments in place.
        step: String,

        /// Error the [`Step`] failed with.
        error: StepError,
    },
}

/// Result of running a single [`ConcreteScenario`].
#[derive(Clone, Debug)]
pub struct Run {
    /// Whether the [`ConcreteScenario`] passed.
    pub outcome: Result<(), Failure>,

    /// [`Stats`] of its [`Step`]s.
    pub steps: Stats,

    /// Number of its undefined [`Step`]s.
    pub undefined: usize,
}

/// Runs the given [`ConcreteScenario`] of the given [`Feature`], reporting
/// events to the given [`Writer`].
///
/// Doesn't run any hooks.
pub fn run<W: Writer + ?Sized>(
    steps: &Collection,
    feature: &Feature,
    scenario: &ConcreteScenario,
    writer: &mut W,
) -> Run {
    let all = feature
        .background_steps()
        .iter()
        .map(|s| (true, s))
        .chain(scenario.steps.iter().map(|s| (false, s)))
        .collect::<Vec<_>>();

    let mut out = Reporter { writer, feature, scenario };
    out.emit(event::Scenario::Started);

    let run = match validate(steps, &all) {
        Ok(()) => execute(steps, &all, &mut out),
        Err(undefined) => {
            report_undefined(&all, &undefined, &mut out);
            Run {
                outcome: Err(Failure::Undefined(undefined.len())),
                steps: Stats {
                    passed: 0,
                    skipped: all.len() - undefined.len(),
                    failed: undefined.len(),
                },
                undefined: undefined.len(),
            }
        }
    };

    out.emit(event::Scenario::Finished { passed: run.outcome.is_ok() });
    run
}

/// Emitter of [`event::Scenario`]s of a single [`ConcreteScenario`].
struct Reporter<'r, W: ?Sized> {
    writer: &'r mut W,
    feature: &'r Feature,
    scenario: &'r ConcreteScenario,
}

impl<W: Writer + ?Sized> Reporter<'_, W> {
    fn emit(&mut self, ev: event::Scenario<'_>) {
        self.writer.handle_event(event::Cucumber::scenario(
            self.feature,
            self.scenario,
            ev,
        ));
    }

    fn step(&mut self, background: bool, step: &Step, ev: event::Step<'_>) {
        self.emit(event::Scenario::step(background, step, ev));
    }
}

/// Resolves every [`Step`], returning the undefined ones along with their
/// positions.
fn validate(
    steps: &Collection,
    all: &[(bool, &Step)],
) -> Result<(), Vec<(usize, UndefinedStep)>> {
    let undefined = all
        .iter()
        .enumerate()
        .filter(|(_, (_, step))| steps.find(step).is_none())
        .map(|(i, (_, step))| {
            (i, UndefinedStep::in_collection(step, steps))
        })
        .collect::<Vec<_>>();

    if undefined.is_empty() {
        Ok(())
    } else {
        Err(undefined)
    }
}

fn report_undefined<W: Writer + ?Sized>(
    all: &[(bool, &Step)],
    undefined: &[(usize, UndefinedStep)],
    out: &mut Reporter<'_, W>,
) {
    for (i, (background, step)) in all.iter().enumerate() {
        let ev = match undefined.iter().find(|(pos, _)| *pos == i) {
            Some((_, u)) => {
                tracing::warn!(
                    kind = %u.kind,
                    text = %u.text,
                    hint = %u.hint(),
                    "undefined step",
                );
                event::Step::Undefined(u)
            }
            None => event::Step::Skipped,
        };
        out.step(*background, step, ev);
    }
}

fn execute<W: Writer + ?Sized>(
    steps: &Collection,
    all: &[(bool, &Step)],
    out: &mut Reporter<'_, W>,
) -> Run {
    let mut stats = Stats::default();
    let mut failure = None;

    for &(background, step) in all {
        if failure.is_some() {
            stats.skipped += 1;
            out.step(background, step, event::Step::Skipped);
            continue;
        }

        out.step(background, step, event::Step::Started);
        match invoke(steps, step) {
            Ok(()) => {
                stats.passed += 1;
                out.step(background, step, event::Step::Passed);
            }
            Err(error) => {
                stats.failed += 1;
                out.step(background, step, event::Step::Failed(&error));
                failure = Some(Failure::Step {
                    step: step.display_text(),
                    error,
                });
            }
        }
    }

    Run { outcome: failure.map_or(Ok(()), Err), steps: stats, undefined: 0 }
}

/// Resolves, binds and invokes a single [`Step`].
fn invoke(steps: &Collection, step: &Step) -> Result<(), StepError> {
    let definition = steps
        .find(step)
        .ok_or_else(|| UndefinedStep::in_collection(step, steps))?;

    let args = binder::bind(step);
    if args.len() != definition.arity() {
        return Err(StepError::ArityMismatch {
            expected: definition.arity(),
            actual: args.len(),
        });
    }

    panic::catch_unwind(AssertUnwindSafe(|| definition.handler().call(args)))
        .unwrap_or_else(|info| Err(StepError::Panicked(coerce_panic(&*info))))
}

fn coerce_panic(info: &(dyn Any + Send)) -> String {
    if let Some(string) = info.downcast_ref::<String>() {
        string.clone()
    } else if let Some(&string) = info.downcast_ref::<&str>() {
        string.to_owned()
    } else {
        "(Could not resolve panic payload)".to_owned()
    }
}
