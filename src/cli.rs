// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! CLI options of a test binary.
//!
//! [`Opts`] provide filtering of scenarios based on a [`Regex`] or a
//! [tag expression][1], output coloring and verbosity of [`tracing`] logs.
//!
//! [1]: https://cucumber.io/docs/cucumber/api#tag-expressions

use std::error::Error as StdError;

use gherkin::tagexpr::TagOperation;
use regex::Regex;

use crate::{
    feature::{ConcreteScenario, Feature},
    runner::Filter,
    tag::Ext as _,
    writer::Coloring,
};

pub use clap::Parser;

/// Root CLI (command line interface) of a test binary.
///
/// # Example
///
/// ```rust,no_run
/// use stepbind::{cli, Suite};
///
/// let opts = cli::Opts::parsed();
/// let _ = opts.init_tracing();
///
/// let mut suite = Suite::new();
/// suite.with_cli(opts).run_and_exit("tests/features");
/// ```
#[derive(clap::Parser, Clone, Debug, Default)]
#[command(name = "stepbind", about = "Run the Gherkin scenarios")]
pub struct Opts {
    /// Regex to filter scenarios by their name.
    #[arg(
        id = "name",
        long = "name",
        short = 'n',
        value_name = "regex",
        visible_alias = "scenario-name"
    )]
    pub re_filter: Option<Regex>,

    /// Tag expression to filter scenarios by.
    ///
    /// Note: Tags from Feature, Scenario and Examples are merged together on
    /// filtering, so be careful about conflicting tags on different levels.
    #[arg(
        id = "tags",
        long = "tags",
        short = 't',
        value_name = "tagexpr",
        conflicts_with = "name"
    )]
    pub tags_filter: Option<TagOperation>,

    /// Coloring policy for a console output.
    #[arg(long, value_name = "auto|always|never", default_value = "auto")]
    pub color: Coloring,

    /// Run all the rows of a Scenario Outline even after one of them failed.
    #[arg(long)]
    pub run_all_examples: bool,

    /// Increases verbosity of logs (`-v` for info, `-vv` for debug, `-vvv`
    /// for trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Opts {
    /// Shortcut for [`clap::Parser::parse()`], which doesn't require the trait
    /// being imported.
    #[must_use]
    pub fn parsed() -> Self {
        <Self as clap::Parser>::parse()
    }

    /// Builds a scenario [`Filter`] out of `--name` or `--tags`, if any of
    /// them is specified.
    #[must_use]
    pub fn filter(&self) -> Option<Box<Filter>> {
        if let Some(re) = self.re_filter.clone() {
            return Some(Box::new(move |_: &Feature, sc: &ConcreteScenario| {
                re.is_match(&sc.name)
            }));
        }
        self.tags_filter.clone().map(|op| -> Box<Filter> {
            Box::new(move |f: &Feature, sc: &ConcreteScenario| op.matches(f, sc))
        })
    }

    /// Maximum [`tracing::Level`] selected by `-v` flags.
    #[must_use]
    pub const fn log_level(&self) -> tracing::Level {
        match self.verbose {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        }
    }

    /// Installs a global [`tracing_subscriber::fmt`] subscriber writing into
    /// `stderr` at the [`Opts::log_level()`].
    ///
    /// # Errors
    ///
    /// If a global subscriber is installed already.
    pub fn init_tracing(&self) -> Result<(), Box<dyn StdError + Send + Sync>> {
        tracing_subscriber::fmt()
            .with_max_level(self.log_level())
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init()
    }
}
