// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Run configuration.
//!
//! Every supported option is an explicit, typed field of [`Config`], which
//! may be deserialized with [`serde`] and overlaid with [`Cli`] options.
//!
//! # Example
//!
//! ```rust
//! # use clap::Parser as _;
//! # use storybatch::config::{Cli, Config};
//! #
//! #[derive(clap::Parser)]
//! struct Opts {
//!     #[command(flatten)]
//!     run: Cli,
//! }
//!
//! let config: Config = serde_json::from_str(r#"{
//!     "threads": 2,
//!     "batches": [{"name": "smoke", "include_patterns": ["smoke/*.story"]}]
//! }"#)?;
//! let opts = Opts::parse_from(["runner", "--threads", "4", "--skip"]);
//!
//! let config = config.overlay(&opts.run);
//! assert_eq!(config.threads, 4);
//! assert!(config.skip);
//! assert!(config.validate().is_ok());
//! # Ok::<_, serde_json::Error>(())
//! ```

use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
};

use serde::Deserialize;
use smart_default::SmartDefault;

use crate::{
    batch::{BatchScheduler, EmbedderControls, ResourceBatch, StaticControls, StoryRunner},
    context::RunContext,
    error::{ConfigError, ConfigResult, TableResult},
    table::{ExamplesTable, TableProperties},
    variable::{DefaultVariablesFactory, RunVariables, SystemProperties, Variables},
};

/// Configuration of a run.
#[derive(Clone, Debug, Deserialize, PartialEq, SmartDefault)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Default number of worker threads of a batch.
    #[default(1)]
    pub threads: usize,

    /// Skips execution of every batch.
    pub skip: bool,

    /// Keeps story failures out of the run's result.
    pub ignore_failure_in_stories: bool,

    /// Runs batches even if previous ones recorded failures.
    pub ignore_failure_in_batches: bool,

    /// Batches, in execution order.
    pub batches: Vec<ResourceBatch>,

    /// Read-only `GLOBAL` variables.
    pub global_variables: Variables,

    /// Properties consulted before the process environment.
    pub properties: HashMap<String, String>,

    /// Default properties of examples tables.
    pub table: TableProperties,
}

impl Config {
    /// Checks this [`Config`] for consistency.
    ///
    /// # Errors
    ///
    /// - With [`ConfigError::InvalidThreads`] if the default or some batch's
    ///   thread count is zero.
    /// - With [`ConfigError::DuplicateBatch`] if batch names clash.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.threads == 0 {
            return Err(ConfigError::invalid_threads("default", self.threads));
        }
        let mut names = HashSet::with_capacity(self.batches.len());
        for (position, batch) in self.batches.iter().enumerate() {
            let name = batch.name_at(position);
            if batch.threads == Some(0) {
                return Err(ConfigError::invalid_threads(name, 0));
            }
            if !names.insert(name.clone()) {
                return Err(ConfigError::duplicate_batch(name));
            }
        }
        Ok(())
    }

    /// Overlays the given [`Cli`] options onto this [`Config`].
    #[must_use]
    pub fn overlay(mut self, cli: &Cli) -> Self {
        if let Some(threads) = cli.threads {
            self.threads = threads;
        }
        self.skip |= cli.skip;
        self.ignore_failure_in_batches |= cli.ignore_failure_in_batches;
        self.ignore_failure_in_stories |= cli.ignore_failure_in_stories;
        self
    }

    /// Returns the default [`EmbedderControls`] of this [`Config`].
    #[must_use]
    pub fn controls(&self) -> EmbedderControls {
        EmbedderControls {
            threads: self.threads,
            skip: self.skip,
            ignore_failure_in_stories: self.ignore_failure_in_stories,
        }
    }

    /// Creates a fresh [`RunContext`] seeded with the configured variables
    /// and properties.
    #[must_use]
    pub fn run_context(&self) -> Arc<RunContext> {
        Arc::new(RunContext::new(Arc::new(RunVariables::new(
            Arc::new(DefaultVariablesFactory::new(self.global_variables.clone())),
            Arc::new(SystemProperties::new(self.properties.clone())),
        ))))
    }

    /// Validates this [`Config`] and creates a [`BatchScheduler`] running
    /// stories with the given `runner`.
    ///
    /// # Errors
    ///
    /// If this [`Config`] is invalid.
    pub fn scheduler(&self, runner: Arc<dyn StoryRunner>) -> ConfigResult<BatchScheduler> {
        self.validate()?;
        Ok(BatchScheduler::new(runner, self.run_context())
            .with_controls(Arc::new(StaticControls(self.controls())))
            .ignore_failure_in_batches(self.ignore_failure_in_batches))
    }

    /// Decodes an [`ExamplesTable`] with the configured default properties.
    ///
    /// # Errors
    ///
    /// If the table is malformed.
    pub fn examples_table(&self, text: &str) -> TableResult<ExamplesTable> {
        ExamplesTable::parse(text, &self.table)
    }
}

/// CLI options overlaying a [`Config`].
#[derive(Clone, Debug, Default, clap::Args)]
#[group(skip)]
pub struct Cli {
    /// Number of stories of a batch to run concurrently. If not specified,
    /// uses the configured value, or 1 by default.
    #[arg(long, short, value_name = "int", global = true)]
    pub threads: Option<usize>,

    /// Skip execution of every batch, reporting stories as skipped.
    #[arg(long, global = true)]
    pub skip: bool,

    /// Run batches even if previous ones had failed stories.
    #[arg(long, global = true)]
    pub ignore_failure_in_batches: bool,

    /// Do not fail the run because of failed stories.
    #[arg(long, global = true)]
    pub ignore_failure_in_stories: bool,
}

#[cfg(test)]
mod tests {
    use clap::Parser as _;

    use super::*;
    use crate::{table::properties::VALUE_SEPARATOR, variable::Value};

    #[derive(clap::Parser)]
    struct Opts {
        #[command(flatten)]
        run: Cli,
    }

    fn batch(name: Option<&str>) -> ResourceBatch {
        ResourceBatch { name: name.map(str::to_owned), ..ResourceBatch::default() }
    }

    #[test]
    fn deserializes_with_defaults() {
        let config: Config = serde_json::from_str(
            r#"{
                "ignore_failure_in_batches": true,
                "batches": [{"location": "stories", "threads": 3}],
                "global_variables": {"env": "qa"},
                "table": {"valueSeparator": "!"}
            }"#,
        )
        .unwrap();

        assert_eq!(config.threads, 1);
        assert!(config.ignore_failure_in_batches);
        assert_eq!(config.batches[0].threads, Some(3));
        assert_eq!(config.batches[0].include_patterns, ["**/*.story"]);
        assert_eq!(config.global_variables["env"], Value::from("qa"));
        assert_eq!(config.table.value_separator(), "!");
    }

    #[test]
    fn rejects_unknown_options() {
        let res = serde_json::from_str::<Config>(r#"{"thread": 2}"#);

        assert!(res.is_err());
    }

    #[test]
    fn validation() {
        assert!(Config::default().validate().is_ok());

        let config = Config { threads: 0, ..Config::default() };
        assert_eq!(
            config.validate().unwrap_err().to_string(),
            "Batch `default` must run with at least one thread, got 0",
        );

        let config = Config {
            batches: vec![batch(Some("batch-2")), batch(None)],
            ..Config::default()
        };
        assert_eq!(
            config.validate().unwrap_err().to_string(),
            "Batch `batch-2` is declared more than once",
        );

        let config = Config {
            batches: vec![ResourceBatch { threads: Some(0), ..batch(Some("smoke")) }],
            ..Config::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::InvalidThreads { .. })));
    }

    #[test]
    fn cli_overlays_config() {
        let opts = Opts::parse_from([
            "runner",
            "-t",
            "8",
            "--ignore-failure-in-batches",
            "--ignore-failure-in-stories",
        ]);

        let config = Config::default().overlay(&opts.run);

        assert_eq!(config.threads, 8);
        assert!(!config.skip);
        assert!(config.ignore_failure_in_batches);
        assert_eq!(
            config.controls(),
            EmbedderControls { threads: 8, skip: false, ignore_failure_in_stories: true },
        );
    }

    #[test]
    fn cli_keeps_config_without_options() {
        let opts = Opts::parse_from(["runner"]);
        let config = Config { threads: 3, skip: true, ..Config::default() };

        let config = config.overlay(&opts.run);

        assert_eq!(config.threads, 3);
        assert!(config.skip);
    }

    #[test]
    fn run_context_sees_configured_variables() {
        let mut config = Config::default();
        _ = config.global_variables.insert("env".to_owned(), Value::from("qa"));
        _ = config.properties.insert("browser".to_owned(), "firefox".to_owned());

        let context = crate::context::StoryContext::new(config.run_context());

        assert_eq!(context.variables().get("env"), Some(Value::from("qa")));
        assert_eq!(context.variables().get("browser"), Some(Value::from("firefox")));
    }

    #[test]
    fn examples_table_uses_default_properties() {
        let mut config = Config::default();
        config.table.set(VALUE_SEPARATOR, "!");

        let table = config.examples_table("|step|\n!When I a|b!").unwrap();

        assert_eq!(table.column("step"), Some(vec!["When I a|b"]));
    }
}
