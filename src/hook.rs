// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Lifecycle hooks run around the whole suite and around each scenario.

use std::fmt;

use derive_more::Display;

/// Zero-argument lifecycle callback.
pub type Hook = Box<dyn Fn()>;

/// Point of the run lifecycle a [`Hook`] is attached to.
#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq)]
pub enum HookType {
    /// Once, before the first scenario of the run.
    #[display(fmt = "BeforeSuite")]
    BeforeSuite,

    /// Once, after the last scenario of the run, whatever its outcome.
    #[display(fmt = "AfterSuite")]
    AfterSuite,

    /// Before each concrete scenario.
    #[display(fmt = "BeforeScenario")]
    BeforeScenario,

    /// After each concrete scenario that passed.
    #[display(fmt = "AfterScenario")]
    AfterScenario,
}

/// Ordered [`Hook`] lists, one per [`HookType`].
///
/// [`Hook`]s are run in registration order. A panicking [`Hook`] is not
/// caught and aborts the whole run.
#[derive(Default)]
pub struct Hooks {
    before_suite: Vec<Hook>,
    after_suite: Vec<Hook>,
    before_scenario: Vec<Hook>,
    after_scenario: Vec<Hook>,
}

// Implemented manually as `Box<dyn Fn>` is not `Debug`.
impl fmt::Debug for Hooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hooks")
            .field("before_suite", &self.before_suite.len())
            .field("after_suite", &self.after_suite.len())
            .field("before_scenario", &self.before_scenario.len())
            .field("after_scenario", &self.after_scenario.len())
            .finish()
    }
}

impl Hooks {
    /// Creates an empty set of [`Hooks`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a [`Hook`] of the given [`HookType`].
    pub fn add(&mut self, ty: HookType, hook: impl Fn() + 'static) {
        self.list_mut(ty).push(Box::new(hook));
    }

    /// Runs all the [`Hook`]s of the given [`HookType`], in registration
    /// order.
    pub fn run(&self, ty: HookType) {
        let hooks = self.list(ty);
        if !hooks.is_empty() {
            tracing::debug!(hook = %ty, count = hooks.len(), "running hooks");
        }
        for hook in hooks {
            hook();
        }
    }

    /// Number of [`Hook`]s of the given [`HookType`].
    #[must_use]
    pub fn len(&self, ty: HookType) -> usize {
        self.list(ty).len()
    }

    /// Indicates whether there are no [`Hook`]s of any [`HookType`].
    #[must_use]
    pub fn is_empty(&self) -> bool {
        [
            HookType::BeforeSuite,
            HookType::AfterSuite,
            HookType::BeforeScenario,
            HookType::AfterScenario,
        ]
        .into_iter()
        .all(|ty| self.list(ty).is_empty())
    }

    fn list(&self, ty: HookType) -> &[Hook] {
        match ty {
            HookType::BeforeSuite => &self.before_suite,
            HookType::AfterSuite => &self.after_suite,
            HookType::BeforeScenario => &self.before_scenario,
            HookType::AfterScenario => &self.after_scenario,
        }
    }

    fn list_mut(&mut self, ty: HookType) -> &mut Vec<Hook> {
        match ty {
            HookType::BeforeSuite => &mut self.before_suite,
            HookType::AfterSuite => &mut self.after_suite,
            HookType::BeforeScenario => &mut self.before_scenario,
            HookType::AfterScenario => &mut self.after_scenario,
        }
    }
}
