// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Registry of step [`Definition`]s.

use std::slice;

use crate::{ParamType, RegistrationError};

use super::{handler::Handler, matcher, Kind, Step};

/// Registered binding of a literal step pattern to a [`Handler`].
#[derive(Debug)]
pub struct Definition {
    /// [`Kind`] of [`Step`]s this [`Definition`] matches.
    kind: Kind,

    /// Literal text [`Step`]s have to be equal to.
    pattern: String,

    /// [`Handler`] invoked for the matched [`Step`]s.
    handler: Handler,
}

impl Definition {
    /// [`Kind`] of [`Step`]s this [`Definition`] matches.
    #[must_use]
    pub const fn kind(&self) -> Kind {
        self.kind
    }

    /// Literal pattern of this [`Definition`].
    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Declared [`ParamType`]s of the [`Handler`].
    #[must_use]
    pub fn params(&self) -> &[ParamType] {
        self.handler.params()
    }

    /// Declared arity of the [`Handler`].
    #[must_use]
    pub fn arity(&self) -> usize {
        self.handler.arity()
    }

    /// [`Handler`] of this [`Definition`].
    #[must_use]
    pub const fn handler(&self) -> &Handler {
        &self.handler
    }
}

/// Collection of step [`Definition`]s, in registration order.
///
/// Patterns are unique across all [`Kind`]s, so a [`Step`] never resolves to
/// more than one [`Definition`].
///
/// Lookup is a linear scan over all the [`Definition`]s. Suites rarely have
/// more than a few hundred of them, so no index is maintained.
#[derive(Debug, Default)]
pub struct Collection {
    definitions: Vec<Definition>,
}

impl Collection {
    /// Creates a new empty [`Collection`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new [`Definition`].
    ///
    /// # Errors
    ///
    /// - [`RegistrationError::InvalidHandlerKind`] if the [`Handler`] declares
    ///   a [`ParamType::Table`] anywhere but in the last position.
    /// - [`RegistrationError::DuplicatePattern`] if a [`Definition`] of any
    ///   [`Kind`] is already registered with the same `pattern`.
    pub fn register(
        &mut self,
        kind: Kind,
        pattern: impl Into<String>,
        handler: Handler,
    ) -> Result<(), RegistrationError> {
        let pattern = pattern.into();

        let params = handler.params();
        if let Some(pos) = params.iter().position(|p| *p == ParamType::Table) {
            if pos + 1 != params.len() {
                return Err(RegistrationError::InvalidHandlerKind {
                    pattern,
                    reason: format!(
                        "table parameter at position {pos} of {}, while it \
                         may only be the last one",
                        params.len(),
                    ),
                });
            }
        }

        if let Some(existing) = self.get(&pattern) {
            return Err(RegistrationError::DuplicatePattern {
                pattern,
                existing: existing.kind,
            });
        }

        tracing::debug!(
            %kind,
            %pattern,
            arity = handler.arity(),
            "registered step definition",
        );
        self.definitions.push(Definition { kind, pattern, handler });
        Ok(())
    }

    /// Returns the first registered [`Definition`] matching the given
    /// [`Step`], if any.
    #[must_use]
    pub fn find(&self, step: &Step) -> Option<&Definition> {
        self.definitions.iter().find(|d| matcher::matches(step, d))
    }

    /// Returns the [`Definition`] registered with the given `pattern`,
    /// whatever its [`Kind`] and parameters.
    #[must_use]
    pub fn get(&self, pattern: &str) -> Option<&Definition> {
        self.definitions.iter().find(|d| d.pattern == pattern)
    }

    /// Iterates over [`Definition`]s in registration order.
    pub fn iter(&self) -> slice::Iter<'_, Definition> {
        self.definitions.iter()
    }

    /// Number of registered [`Definition`]s.
    #[must_use]
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    /// Indicates whether no [`Definition`]s are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

impl<'c> IntoIterator for &'c Collection {
    type Item = &'c Definition;
    type IntoIter = slice::Iter<'c, Definition>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
