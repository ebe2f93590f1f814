// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Story labels of a root story and its nested given stories.

use derive_more::with_trait::Display;

/// Label attached to a story, like `feature=Login` or `severity=critical`.
#[derive(Clone, Debug, Display, Eq, Hash, PartialEq)]
#[display("{name}={value}")]
pub struct Label {
    /// Label name.
    pub name: String,

    /// Label value.
    pub value: String,
}

impl Label {
    /// Creates a new [`Label`].
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self { name: name.into(), value: value.into() }
    }
}

/// Label lists of the currently executing root story and a stack of the
/// given stories nested into it.
///
/// The innermost given story is the last pushed one and is consulted first.
#[derive(Clone, Debug, Default)]
pub struct StoryLabels {
    root: Option<Vec<Label>>,
    given: Vec<Vec<Label>>,
}

impl StoryLabels {
    /// Creates an empty [`StoryLabels`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates a fresh label list: pushes it onto the given story stack if
    /// `given_story`, or replaces the root labels otherwise.
    pub fn create_new_story_labels(&mut self, given_story: bool) -> &mut Vec<Label> {
        if !given_story {
            return self.root.insert(Vec::new());
        }
        self.given.push(Vec::new());
        let innermost = self.given.len() - 1;
        &mut self.given[innermost]
    }

    /// Returns labels of the innermost given story, or the root labels if no
    /// given story is being executed.
    pub fn current_story_labels(&mut self) -> &mut Vec<Label> {
        match self.given.last_mut() {
            Some(labels) => labels,
            None => self.root.get_or_insert_with(Vec::new),
        }
    }

    /// Returns the root labels, creating an empty list on first access.
    pub fn root_story_labels(&mut self) -> &mut Vec<Label> {
        self.root.get_or_insert_with(Vec::new)
    }

    /// Pops the innermost given story labels if `given_story`, or drops the
    /// root labels otherwise.
    pub fn reset_current_story_labels(&mut self, given_story: bool) {
        if given_story {
            _ = self.given.pop();
        } else {
            self.root = None;
        }
    }

    /// Number of given stories currently nested.
    #[must_use]
    pub fn given_story_depth(&self) -> usize {
        self.given.len()
    }
}
