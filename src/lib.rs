// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Step execution engine for [Gherkin] scenarios.
//!
//! Steps of [Gherkin] features are bound to handlers registered on a
//! [`Suite`] by their literal text, with every double-quoted substring of a
//! step becoming a positional argument of its handler:
//!
//! ```rust
//! use stepbind::{writer, DataTable, Suite};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut suite = Suite::new();
//! suite
//!     .with_writer(writer::Discard)
//!     .given("there are {{s}} cucumbers", |n: i64| assert!(n > 0))?
//!     .when("I eat {{s}} cucumbers", |_: i64| {})?
//!     .then("the basket holds:", |t: DataTable| assert_eq!(t.rows().len(), 1))?;
//!
//! let summary = suite.run_feature_text(
//!     r#"
//! Feature: Eating
//!   Scenario: eat some
//!     Given there are "12" cucumbers
//!     When I eat "5" cucumbers
//!     Then the basket holds:
//!       | cucumbers |
//!       | 7         |
//! "#,
//! )?;
//! assert!(!summary.is_failed());
//! # Ok(())
//! # }
//! ```
//!
//! Every concrete scenario is run in two phases: all of its steps are
//! resolved against the registered [`Definition`]s first, and only if every
//! one of them is defined they are executed in order, the first failure
//! skipping the rest.
//!
//! [`Definition`]: step::Definition
//! [Gherkin]: https://cucumber.io/docs/gherkin/reference

#![deny(nonstandard_style, trivial_casts, trivial_numeric_casts)]
#![forbid(non_ascii_idents, unsafe_code)]
#![warn(
    clippy::pedantic,
    clippy::str_to_string,
    clippy::unwrap_used,
    missing_debug_implementations,
    missing_docs,
    unused_import_braces,
    unused_qualifications
)]

pub mod cli;
pub mod data_table;
pub mod error;
pub mod event;
pub mod feature;
pub mod hook;
pub mod parser;
pub mod runner;
pub mod step;
pub mod suite;
pub mod tag;
pub mod writer;

#[doc(no_inline)]
pub use gherkin;

#[doc(inline)]
pub use self::{
    data_table::DataTable,
    error::{Registered, RegistrationError, StepError, UndefinedStep},
    feature::{ConcreteScenario, Feature, FeatureSet},
    hook::HookType,
    parser::Parser,
    runner::{Runner, Summary},
    step::{Handler, Kind, ParamType, Step, Value},
    suite::Suite,
    writer::Writer,
};
