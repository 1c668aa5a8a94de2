// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Tools for parsing [Gherkin] files.
//!
//! [Gherkin]: https://cucumber.io/docs/gherkin/reference

pub mod basic;

use std::{path::PathBuf, sync::Arc};

use derive_more::{Display, Error};

use crate::feature::FeatureSet;

#[doc(inline)]
pub use self::basic::Basic;

/// Source of parsed [`FeatureSet`]s.
pub trait Parser<I> {
    /// Parses the given `input` into a [`FeatureSet`].
    ///
    /// # Errors
    ///
    /// If the `input` is not valid [Gherkin] or cannot be read.
    ///
    /// [Gherkin]: https://cucumber.io/docs/gherkin/reference
    fn parse(&self, input: I) -> Result<FeatureSet>;
}

/// Result of parsing [Gherkin] files.
///
/// [Gherkin]: https://cucumber.io/docs/gherkin/reference
pub type Result<T> = std::result::Result<T, Error>;

/// [`Parser`] error.
#[derive(Clone, Debug, Display, Error)]
pub enum Error {
    /// Failed to parse a [`Feature`] out of text.
    ///
    /// [`Feature`]: gherkin::Feature
    #[display(fmt = "Failed to parse feature: {}", _0)]
    Parsing(Arc<gherkin::ParseError>),

    /// Failed to parse a [`Feature`] file.
    ///
    /// [`Feature`]: gherkin::Feature
    #[display(fmt = "Failed to parse feature file: {}", _0)]
    ParsingFile(Arc<gherkin::ParseFileError>),

    /// Failed to look up `.feature` files.
    #[display(fmt = "Failed to read `{}`: {}", "path.display()", reason)]
    Walk {
        /// Path being looked up.
        path: PathBuf,

        /// Description of the failure.
        reason: String,
    },
}

impl From<gherkin::ParseError> for Error {
    fn from(e: gherkin::ParseError) -> Self {
        Self::Parsing(Arc::new(e))
    }
}

impl From<gherkin::ParseFileError> for Error {
    fn from(e: gherkin::ParseFileError) -> Self {
        Self::ParsingFile(Arc::new(e))
    }
}
