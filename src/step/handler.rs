// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Uniform step [`Handler`]s.
//!
//! Every step function is stored as a [`Handler`]: a closure over an ordered
//! sequence of [`Value`]s, together with the [`ParamType`]s it declared at
//! registration. Typed closures are turned into [`Handler`]s by
//! [`IntoHandler`], so no runtime inspection of the callable is ever needed.

use std::fmt;

use crate::StepError;

use super::value::{FromValue, ParamType, Value};

/// Type-erased step function.
pub type HandlerFn = dyn Fn(Vec<Value>) -> Result<(), StepError>;

/// Step function along with its declared parameters.
pub struct Handler {
    /// Declared [`ParamType`]s, in call order.
    params: Vec<ParamType>,

    /// Type-erased step function.
    func: Box<HandlerFn>,
}

// Implemented manually as `Box<dyn Fn>` is not `Debug`.
impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handler")
            .field("params", &self.params)
            .field("func", &format_args!("{:p}", self.func))
            .finish()
    }
}

impl Handler {
    /// Creates a [`Handler`] out of an untyped function, declaring its
    /// parameters explicitly.
    ///
    /// The function receives exactly `params.len()` [`Value`]s, each one
    /// accepted by the corresponding [`ParamType`].
    ///
    /// ```rust
    /// use stepbind::{step::Handler, ParamType, Value};
    ///
    /// let handler = Handler::dynamic([ParamType::Int, ParamType::Any], |args| {
    ///     assert!(matches!(args[0], Value::Int(_)));
    ///     Ok(())
    /// });
    /// assert_eq!(handler.arity(), 2);
    /// ```
    #[must_use]
    pub fn dynamic<F>(params: impl Into<Vec<ParamType>>, func: F) -> Self
    where
        F: Fn(Vec<Value>) -> Result<(), StepError> + 'static,
    {
        Self { params: params.into(), func: Box::new(func) }
    }

    /// Declared [`ParamType`]s of this [`Handler`].
    #[must_use]
    pub fn params(&self) -> &[ParamType] {
        &self.params
    }

    /// Number of declared parameters.
    #[must_use]
    pub fn arity(&self) -> usize {
        self.params.len()
    }

    /// Invokes this [`Handler`] with the given arguments.
    ///
    /// # Errors
    ///
    /// If the arguments count differs from [`Handler::arity()`], or the
    /// function itself fails.
    pub fn call(&self, args: Vec<Value>) -> Result<(), StepError> {
        if args.len() != self.arity() {
            return Err(StepError::ArityMismatch {
                expected: self.arity(),
                actual: args.len(),
            });
        }
        (self.func)(args)
    }
}

/// Outcome of a step function convertible into a step result.
pub trait IntoStepResult {
    /// Converts this outcome.
    ///
    /// # Errors
    ///
    /// If this outcome represents a failure.
    fn into_step_result(self) -> Result<(), StepError>;
}

impl IntoStepResult for () {
    fn into_step_result(self) -> Result<(), StepError> {
        Ok(())
    }
}

impl<E: fmt::Display> IntoStepResult for Result<(), E> {
    fn into_step_result(self) -> Result<(), StepError> {
        self.map_err(|e| StepError::Failed(e.to_string()))
    }
}

/// Conversion of a closure into a [`Handler`].
///
/// Implemented for [`Handler`] itself and for closures of up to 6 parameters,
/// each implementing [`FromValue`], returning either `()` or a
/// [`Result`]`<(), E: Display>`.
///
/// `Args` is a marker distinguishing the implementations, it's never named
/// by callers.
pub trait IntoHandler<Args> {
    /// Converts this value into a [`Handler`].
    fn into_handler(self) -> Handler;
}

impl IntoHandler<Handler> for Handler {
    fn into_handler(self) -> Handler {
        self
    }
}

macro_rules! impl_into_handler {
    ($($arg:ident $var:ident),*) => {
        impl<F, R, $($arg),*> IntoHandler<($($arg,)*)> for F
        where
            F: Fn($($arg),*) -> R + 'static,
            R: IntoStepResult,
            $($arg: FromValue,)*
        {
            #[allow(unused_mut, unused_variables)]
            fn into_handler(self) -> Handler {
                let params: Vec<ParamType> =
                    vec![$(<$arg as FromValue>::PARAM),*];
                let expected = params.len();
                Handler::dynamic(params, move |args: Vec<Value>| {
                    let actual = args.len();
                    let mut args = args.into_iter().enumerate();
                    $(
                        let $var = {
                            let (position, value) = args
                                .next()
                                .ok_or(StepError::ArityMismatch { expected, actual })?;
                            let found = value.type_name();
                            <$arg as FromValue>::from_value(value).ok_or(
                                StepError::ArgumentType {
                                    position,
                                    expected: <$arg as FromValue>::PARAM,
                                    found,
                                },
                            )?
                        };
                    )*
                    (self)($($var),*).into_step_result()
                })
            }
        }
    };
}

impl_into_handler!();
impl_into_handler!(A a);
impl_into_handler!(A a, B b);
impl_into_handler!(A a, B b, C c);
impl_into_handler!(A a, B b, C c, D d);
impl_into_handler!(A a, B b, C c, D d, E e);
impl_into_handler!(A a, B b, C c, D d, E e, G g);
