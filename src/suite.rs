// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Top-level [`Suite`] facade.

use std::{fmt, path::Path};

use crate::{
    cli,
    feature::{ConcreteScenario, Feature, FeatureSet},
    hook::{HookType, Hooks},
    parser::{self, Parser},
    runner::{Filter, Runner, Summary},
    step::{Collection, IntoHandler, Kind},
    writer, RegistrationError, Writer,
};

/// Top-level entry point: owns step [`Definition`]s and [`Hooks`], and runs
/// [`Feature`]s against them.
///
/// # Example
///
/// ```rust
/// use stepbind::{writer, Suite};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut suite = Suite::new();
/// suite
///     .with_writer(writer::Discard)
///     .given("I have {{s}} widgets", |n: i64| assert_eq!(n, 5))?
///     .when("I buy one", || {})?;
///
/// let summary = suite.run_feature_text(
///     r#"
/// Feature: Widgets
///   Scenario: buying
///     Given I have "5" widgets
///     When I buy one
/// "#,
/// )?;
/// assert!(!summary.is_failed());
/// # Ok(())
/// # }
/// ```
///
/// [`Definition`]: crate::step::Definition
pub struct Suite {
    /// Registered step [`Definition`]s.
    ///
    /// [`Definition`]: crate::step::Definition
    steps: Collection,

    /// Lifecycle [`Hooks`].
    hooks: Hooks,

    /// [`Writer`] to report events into.
    writer: Box<dyn Writer>,

    /// Optional [`Filter`] of scenarios to run.
    filter: Option<Box<Filter>>,

    /// Whether a failed row of a [Scenario Outline] stops the rest of it.
    ///
    /// [Scenario Outline]: https://cucumber.io/docs/gherkin/reference#scenario-outline
    outline_fail_fast: bool,
}

// Implemented manually as `dyn Writer` and `dyn Fn` are not `Debug`.
impl fmt::Debug for Suite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Suite")
            .field("steps", &self.steps)
            .field("hooks", &self.hooks)
            .field("filter", &self.filter.as_ref().map(|_| ".."))
            .field("outline_fail_fast", &self.outline_fail_fast)
            .finish_non_exhaustive()
    }
}

impl Default for Suite {
    fn default() -> Self {
        Self {
            steps: Collection::new(),
            hooks: Hooks::new(),
            writer: Box::new(writer::Basic::stdout()),
            filter: None,
            outline_fail_fast: true,
        }
    }
}

impl Suite {
    /// Creates a new empty [`Suite`] printing its output with
    /// [`writer::Basic`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a [`Kind::Given`] step.
    ///
    /// # Errors
    ///
    /// See [`Suite::step()`].
    pub fn given<A>(
        &mut self,
        pattern: impl Into<String>,
        handler: impl IntoHandler<A>,
    ) -> Result<&mut Self, RegistrationError> {
        self.step(Kind::Given, pattern, handler)
    }

    /// Registers a [`Kind::When`] step.
    ///
    /// # Errors
    ///
    /// See [`Suite::step()`].
    pub fn when<A>(
        &mut self,
        pattern: impl Into<String>,
        handler: impl IntoHandler<A>,
    ) -> Result<&mut Self, RegistrationError> {
        self.step(Kind::When, pattern, handler)
    }

    /// Registers a [`Kind::Then`] step.
    ///
    /// # Errors
    ///
    /// See [`Suite::step()`].
    pub fn then<A>(
        &mut self,
        pattern: impl Into<String>,
        handler: impl IntoHandler<A>,
    ) -> Result<&mut Self, RegistrationError> {
        self.step(Kind::Then, pattern, handler)
    }

    /// Registers a step of the given [`Kind`], matched by the literal
    /// `pattern`.
    ///
    /// # Errors
    ///
    /// - [`RegistrationError::DuplicatePattern`] if the `pattern` is already
    ///   registered for a step of any [`Kind`].
    /// - [`RegistrationError::InvalidHandlerKind`] if the `handler` takes a
    ///   [`DataTable`] anywhere but as its last parameter.
    ///
    /// [`DataTable`]: crate::DataTable
    pub fn step<A>(
        &mut self,
        kind: Kind,
        pattern: impl Into<String>,
        handler: impl IntoHandler<A>,
    ) -> Result<&mut Self, RegistrationError> {
        self.steps.register(kind, pattern, handler.into_handler())?;
        Ok(self)
    }

    /// Registers a hook run once before all the scenarios.
    pub fn before_suite(&mut self, hook: impl Fn() + 'static) -> &mut Self {
        self.hooks.add(HookType::BeforeSuite, hook);
        self
    }

    /// Registers a hook run once after all the scenarios, whatever their
    /// outcome.
    pub fn after_suite(&mut self, hook: impl Fn() + 'static) -> &mut Self {
        self.hooks.add(HookType::AfterSuite, hook);
        self
    }

    /// Registers a hook run before every concrete scenario.
    pub fn before_scenario(&mut self, hook: impl Fn() + 'static) -> &mut Self {
        self.hooks.add(HookType::BeforeScenario, hook);
        self
    }

    /// Registers a hook run after every passed concrete scenario.
    pub fn after_scenario(&mut self, hook: impl Fn() + 'static) -> &mut Self {
        self.hooks.add(HookType::AfterScenario, hook);
        self
    }

    /// Replaces the [`Writer`] events are reported into.
    pub fn with_writer(&mut self, writer: impl Writer + 'static) -> &mut Self {
        self.writer = Box::new(writer);
        self
    }

    /// Runs only the scenarios accepted by the given `filter`.
    pub fn with_filter<F>(&mut self, filter: F) -> &mut Self
    where
        F: Fn(&Feature, &ConcreteScenario) -> bool + 'static,
    {
        self.filter = Some(Box::new(filter));
        self
    }

    /// Sets whether the first failed row of a [Scenario Outline] stops the
    /// rest of its rows (`true` by default).
    ///
    /// [Scenario Outline]: https://cucumber.io/docs/gherkin/reference#scenario-outline
    pub fn outline_fail_fast(&mut self, enabled: bool) -> &mut Self {
        self.outline_fail_fast = enabled;
        self
    }

    /// Applies the given [`cli::Opts`]: scenario filter, coloring of a
    /// [`writer::Basic`] writing into `stdout`, and [`Suite::outline_fail_fast()`].
    ///
    /// A filter set by [`Suite::with_filter()`] is kept, and a scenario has to
    /// pass both it and the `--name`/`--tags` one (if any) to be run.
    pub fn with_cli(&mut self, opts: cli::Opts) -> &mut Self {
        self.filter = match (self.filter.take(), opts.filter()) {
            (Some(own), Some(opt)) => {
                let both: Box<Filter> =
                    Box::new(move |f: &Feature, sc: &ConcreteScenario| {
                        own(f, sc) && opt(f, sc)
                    });
                Some(both)
            }
            (own, opt) => own.or(opt),
        };
        self.outline_fail_fast = !opts.run_all_examples;
        self.with_writer(writer::Basic::stdout().with_coloring(opts.color))
    }

    /// Registered step [`Definition`]s.
    ///
    /// [`Definition`]: crate::step::Definition
    #[must_use]
    pub const fn steps(&self) -> &Collection {
        &self.steps
    }

    /// Runs the given [`FeatureSet`].
    ///
    /// # Panics
    ///
    /// If any hook panics.
    pub fn run(&mut self, features: &FeatureSet) -> Summary {
        tracing::info!(
            features = features.len(),
            steps = self.steps.len(),
            "running suite",
        );
        Runner::new(&self.steps, &self.hooks)
            .with_filter(self.filter.as_deref())
            .outline_fail_fast(self.outline_fail_fast)
            .run(features, &mut *self.writer)
    }

    /// Parses the given `input` with the given [`Parser`] and runs it.
    ///
    /// # Errors
    ///
    /// If the `input` cannot be parsed. Nothing is run then.
    pub fn run_with<I, P: Parser<I>>(
        &mut self,
        parser: &P,
        input: I,
    ) -> parser::Result<Summary> {
        let features = parser.parse(input)?;
        Ok(self.run(&features))
    }

    /// Parses the given [Gherkin] text and runs it.
    ///
    /// # Errors
    ///
    /// If the text isn't a valid feature. Nothing is run then.
    ///
    /// [Gherkin]: https://cucumber.io/docs/gherkin/reference
    pub fn run_feature_text(&mut self, text: &str) -> parser::Result<Summary> {
        self.run_with(&parser::Basic, text)
    }

    /// Parses a `.feature` file, or all `*.feature` files of a directory, and
    /// runs them.
    ///
    /// # Errors
    ///
    /// If the path cannot be read or parsed. Nothing is run then.
    pub fn run_path(
        &mut self,
        path: impl AsRef<Path>,
    ) -> parser::Result<Summary> {
        self.run_with(&parser::Basic, path.as_ref())
    }

    /// Runs a `.feature` file, or all `*.feature` files of a directory, and
    /// panics if anything failed, so the process exits with a non-zero code.
    ///
    /// # Panics
    ///
    /// If the path cannot be read or parsed, or at least one concrete
    /// scenario failed.
    pub fn run_and_exit(&mut self, path: impl AsRef<Path>) {
        let summary = self
            .run_path(path)
            .unwrap_or_else(|e| panic!("{e}"));

        if let Some(msg) = summary.failure_message() {
            panic!("{msg}");
        }
    }
}
