// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! [`tracing`] integration.

use tracing_subscriber::{
    filter::LevelFilter,
    fmt,
    layer::SubscriberExt as _,
    util::{SubscriberInitExt as _, TryInitError},
    Layer as _,
};

/// Initializes a global [`tracing::Subscriber`] writing events up to the
/// given `level` in the default [`fmt`] format, tagged with their target
/// and the thread they were emitted on.
///
/// # Errors
///
/// If a global [`tracing::Subscriber`] has been set already.
///
/// # Example
///
/// ```rust
/// # use tracing_subscriber::filter::LevelFilter;
/// #
/// storybatch::logging::init_tracing(LevelFilter::INFO)?;
/// tracing::info!(batch = "smoke", "Running batch");
/// # Ok::<_, tracing_subscriber::util::TryInitError>(())
/// ```
pub fn init_tracing(level: LevelFilter) -> Result<(), TryInitError> {
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(true)
                .with_thread_names(true)
                .with_filter(level),
        )
        .try_init()
}
