// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Scoped variable resolution.
//!
//! Variables are split by ownership: [`VariableScope::Step`] and
//! [`VariableScope::Scenario`] belong to a single story execution and live in
//! its [`VariableContext`], while [`VariableScope::Story`],
//! [`VariableScope::NextBatches`] and [`VariableScope::Global`] are shared by
//! every story of a run through [`RunVariables`]. Concurrent writers of the
//! shared scopes are last-write-wins.

use std::{
    collections::BTreeSet,
    fmt,
    sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use once_cell::sync::OnceCell;
use serde_json::Value;

use super::{key, PropertySource, VariableScope, VariablesFactory, VariablesSnapshot};
use crate::error::{ConfigError, ConfigResult};

/// Run-wide variable state.
///
/// The shared [`VariablesSnapshot`] is created through the
/// [`VariablesFactory`] on first access and lives as long as the run.
pub struct RunVariables {
    factory: Arc<dyn VariablesFactory>,
    properties: Arc<dyn PropertySource>,
    shared: OnceCell<RwLock<VariablesSnapshot>>,
}

impl fmt::Debug for RunVariables {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RunVariables")
            .field("initialized", &self.shared.get().is_some())
            .finish_non_exhaustive()
    }
}

impl RunVariables {
    /// Creates new [`RunVariables`]. Nothing is created until first access.
    #[must_use]
    pub fn new(
        factory: Arc<dyn VariablesFactory>,
        properties: Arc<dyn PropertySource>,
    ) -> Self {
        Self { factory, properties, shared: OnceCell::new() }
    }

    /// Returns whether the shared snapshot has been created already.
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.shared.get().is_some()
    }

    /// Exposes `NEXT_BATCHES` variables staged so far to the batch about to
    /// start.
    pub fn begin_batch(&self) {
        let committed = self.factory.commit_next_batches();
        if self.is_initialized() {
            *self.write().scope_mut(VariableScope::NextBatches) = committed;
        }
    }

    fn snapshot(&self) -> &RwLock<VariablesSnapshot> {
        self.shared
            .get_or_init(|| RwLock::new(self.factory.create_variables()))
    }

    fn read(&self) -> RwLockReadGuard<'_, VariablesSnapshot> {
        self.snapshot().read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, VariablesSnapshot> {
        self.snapshot().write().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Variable store of a single story execution.
#[derive(Debug)]
pub struct VariableContext {
    local: VariablesSnapshot,
    run: Arc<RunVariables>,
}

impl VariableContext {
    /// Creates a new [`VariableContext`] with empty story-local scopes.
    #[must_use]
    pub fn new(run: Arc<RunVariables>) -> Self {
        Self { local: VariablesSnapshot::new(), run }
    }

    /// Forces creation of the run-wide snapshot.
    pub fn init_variables(&self) {
        _ = self.run.snapshot();
    }

    /// Resolves `key` against every scope in precedence order, falling back
    /// to the [`PropertySource`] by exact key.
    ///
    /// Returns the first non-null value. A miss is not an error.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<Value> {
        let shared = self.run.read();
        VariableScope::PRECEDENCE
            .into_iter()
            .find_map(|scope| {
                let variables = if scope.is_story_local() {
                    self.local.scope(scope)
                } else {
                    shared.scope(scope)
                };
                key::resolve(variables, key).cloned()
            })
            .or_else(|| self.run.properties.property(key).map(Value::String))
    }

    /// Stores a variable into the given `scope`.
    ///
    /// `NEXT_BATCHES` values are staged through the [`VariablesFactory`] and
    /// become visible only to batches starting afterwards.
    ///
    /// # Errors
    ///
    /// If `scope` is [`VariableScope::Global`].
    pub fn put(
        &mut self,
        scope: VariableScope,
        key: impl Into<String>,
        value: impl Into<Value>,
    ) -> ConfigResult<()> {
        let key = key.into();
        if scope == VariableScope::Global {
            return Err(ConfigError::forbidden_scope(scope, key));
        }
        let value = value.into();
        tracing::info!(%scope, %key, %value, "Saving a value into a variable");

        match scope {
            VariableScope::NextBatches => {
                self.run.factory.add_next_batches_variable(key, value);
            }
            VariableScope::Step | VariableScope::Scenario => {
                _ = self.local.scope_mut(scope).insert(key, value);
            }
            VariableScope::Story | VariableScope::Global => {
                _ = self.run.write().scope_mut(scope).insert(key, value);
            }
        }
        Ok(())
    }

    /// Stores a variable into every scope of `scopes`.
    ///
    /// # Errors
    ///
    /// If `scopes` contain [`VariableScope::Global`]. Nothing is stored then.
    pub fn put_all(
        &mut self,
        scopes: impl IntoIterator<Item = VariableScope>,
        key: &str,
        value: &Value,
    ) -> ConfigResult<()> {
        let scopes = scopes.into_iter().collect::<BTreeSet<_>>();
        if scopes.contains(&VariableScope::Global) {
            return Err(ConfigError::forbidden_scope(VariableScope::Global, key));
        }
        scopes
            .into_iter()
            .try_for_each(|scope| self.put(scope, key, value.clone()))
    }

    /// Empties the given `scope`.
    pub fn clear(&mut self, scope: VariableScope) {
        if scope.is_story_local() {
            self.local.clear(scope);
        } else {
            self.run.write().clear(scope);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{
        collections::HashMap,
        io,
        sync::Mutex,
    };

    use serde_json::json;

    use super::*;
    use crate::variable::{DefaultVariablesFactory, SystemProperties, Variables};

    fn run_variables(global: Variables) -> Arc<RunVariables> {
        Arc::new(RunVariables::new(
            Arc::new(DefaultVariablesFactory::new(global)),
            Arc::new(SystemProperties::new(HashMap::from([(
                "prop.only".to_owned(),
                "from properties".to_owned(),
            )]))),
        ))
    }

    #[test]
    fn put_then_get_for_every_writable_scope() {
        for scope in [VariableScope::Step, VariableScope::Scenario, VariableScope::Story] {
            let mut ctx = VariableContext::new(run_variables(Variables::new()));
            ctx.put(scope, "key", "value").expect("writable scope");
            assert_eq!(ctx.get("key"), Some(json!("value")), "{scope}");
        }
    }

    #[test]
    fn next_batches_put_is_visible_after_batch_begins() {
        let run = run_variables(Variables::new());
        let mut ctx = VariableContext::new(Arc::clone(&run));
        ctx.init_variables();

        ctx.put(VariableScope::NextBatches, "key", "value").expect("writable scope");
        assert_eq!(ctx.get("key"), None);

        run.begin_batch();
        assert_eq!(ctx.get("key"), Some(json!("value")));
    }

    #[test]
    fn global_put_is_forbidden() {
        let mut ctx = VariableContext::new(run_variables(Variables::new()));

        let err = ctx.put(VariableScope::Global, "key", "value").unwrap_err();

        assert!(err.is_forbidden_scope());
        assert_eq!(ctx.get("key"), None);
    }

    #[test]
    fn step_shadows_global() {
        let global = Variables::from([("key".to_owned(), json!("global"))]);
        let mut ctx = VariableContext::new(run_variables(global));
        assert_eq!(ctx.get("key"), Some(json!("global")));

        ctx.put(VariableScope::Step, "key", "step").expect("writable scope");

        assert_eq!(ctx.get("key"), Some(json!("step")));
    }

    #[test]
    fn precedence_across_all_writable_scopes() {
        let mut ctx = VariableContext::new(run_variables(Variables::new()));
        ctx.put(VariableScope::Story, "key", "story").expect("writable scope");
        ctx.put(VariableScope::Scenario, "key", "scenario").expect("writable scope");
        assert_eq!(ctx.get("key"), Some(json!("scenario")));

        ctx.clear(VariableScope::Scenario);
        assert_eq!(ctx.get("key"), Some(json!("story")));
    }

    #[test]
    fn story_shadows_next_batches_shadowing_global() {
        let global = Variables::from([("key".to_owned(), json!("global"))]);
        let run = run_variables(global);
        let mut ctx = VariableContext::new(Arc::clone(&run));
        ctx.init_variables();
        assert_eq!(ctx.get("key"), Some(json!("global")));

        ctx.put(VariableScope::NextBatches, "key", "next").expect("writable scope");
        run.begin_batch();
        assert_eq!(ctx.get("key"), Some(json!("next")));

        ctx.put(VariableScope::Story, "key", "story").expect("writable scope");
        assert_eq!(ctx.get("key"), Some(json!("story")));

        ctx.clear(VariableScope::Story);
        assert_eq!(ctx.get("key"), Some(json!("next")));
    }

    #[test]
    fn path_expression_applies_per_scope() {
        let mut ctx = VariableContext::new(run_variables(Variables::new()));
        ctx.put(VariableScope::Scenario, "user", json!([{"name": "a"}, {"name": "b"}]))
            .expect("writable scope");
        ctx.put(VariableScope::Story, "user", json!([{"name": "story"}]))
            .expect("writable scope");

        assert_eq!(ctx.get("user[1].name"), Some(json!("b")));
        assert_eq!(ctx.get("user[5].name"), None);
    }

    #[test]
    fn falls_back_to_properties_by_exact_key() {
        let ctx = VariableContext::new(run_variables(Variables::new()));

        assert_eq!(ctx.get("prop.only"), Some(json!("from properties")));
        assert_eq!(ctx.get("prop.other"), None);
    }

    #[test]
    fn put_all_writes_each_scope_or_nothing() {
        let mut ctx = VariableContext::new(run_variables(Variables::new()));

        ctx.put_all([VariableScope::Scenario, VariableScope::Story], "k", &json!(1))
            .expect("writable scopes");
        ctx.clear(VariableScope::Scenario);
        assert_eq!(ctx.get("k"), Some(json!(1)));

        let err = ctx
            .put_all([VariableScope::Step, VariableScope::Global], "other", &json!(2))
            .unwrap_err();
        assert!(err.is_forbidden_scope());
        assert_eq!(ctx.get("other"), None);
    }

    #[test]
    fn story_local_scopes_are_private() {
        let run = run_variables(Variables::new());
        let mut first = VariableContext::new(Arc::clone(&run));
        let second = VariableContext::new(Arc::clone(&run));

        first.put(VariableScope::Scenario, "private", 1).expect("writable scope");
        first.put(VariableScope::Story, "shared", 2).expect("writable scope");

        assert_eq!(second.get("private"), None);
        assert_eq!(second.get("shared"), Some(json!(2)));
    }

    #[test]
    fn snapshot_is_created_lazily() {
        let run = run_variables(Variables::new());
        let ctx = VariableContext::new(Arc::clone(&run));
        assert!(!run.is_initialized());

        _ = ctx.get("anything");

        assert!(run.is_initialized());
    }

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn put_emits_audit_record() {
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            let mut ctx = VariableContext::new(run_variables(Variables::new()));
            ctx.put(VariableScope::Scenario, "login", "admin").expect("writable scope");
            _ = ctx.put(VariableScope::Global, "denied", "x");
        });

        let output = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
        assert!(output.contains("scope=SCENARIO"), "{output}");
        assert!(output.contains("key=login"), "{output}");
        assert!(output.contains("value=\"admin\""), "{output}");
        assert!(!output.contains("denied"), "{output}");
    }
}
