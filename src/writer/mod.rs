// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Tools for outputting [`Cucumber`] events.
//!
//! [`Cucumber`]: crate::event::Cucumber

pub mod basic;
pub mod out;

use crate::event;

#[doc(inline)]
pub use self::{
    basic::Basic,
    out::{Coloring, Styles, WritableString},
};

/// Writer of [`Cucumber`] events to some output.
///
/// [`Cucumber`]: crate::event::Cucumber
pub trait Writer {
    /// Handles the given [`Cucumber`] event.
    ///
    /// [`Cucumber`]: crate::event::Cucumber
    fn handle_event(&mut self, ev: event::Cucumber<'_>);
}

impl<W: Writer + ?Sized> Writer for &mut W {
    fn handle_event(&mut self, ev: event::Cucumber<'_>) {
        (**self).handle_event(ev);
    }
}

impl<W: Writer + ?Sized> Writer for Box<W> {
    fn handle_event(&mut self, ev: event::Cucumber<'_>) {
        (**self).handle_event(ev);
    }
}

/// [`Writer`] ignoring all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct Discard;

impl Writer for Discard {
    fn handle_event(&mut self, _: event::Cucumber<'_>) {}
}
