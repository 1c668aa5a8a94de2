// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Binding of [`Step`] arguments into call [`Value`]s.

use super::{value::Value, Step};

/// Binds arguments of the given [`Step`] into the exact sequence of
/// [`Value`]s its handler is called with.
///
/// Every positional argument is coerced with [`Value::coerce()`]. A
/// non-empty table is appended last, as is. Nothing else is converted.
#[must_use]
pub fn bind(step: &Step) -> Vec<Value> {
    step.args
        .iter()
        .map(|arg| Value::coerce(arg))
        .chain(
            step.table
                .iter()
                .filter(|t| !t.is_empty())
                .cloned()
                .map(Value::Table),
        )
        .collect()
}
