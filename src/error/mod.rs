// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Error types of the crate, organized by domain.
//!
//! # Modules
//!
//! - [`core`] - top-level [`Error`] type
//! - [`config`] - configuration errors, failing fast at the calling operation
//! - [`step`] - step invocation failures
//! - [`table`] - examples table encoding/decoding errors
//! - [`utilities`] - panic payload coercion and error chain formatting
//!
//! Resolution misses (unknown variable, out-of-range index, absent map key)
//! are never errors: they surface as [`None`].
//!
//! # Example
//!
//! ```rust
//! use storybatch::error::{ConfigError, Error, Result};
//!
//! fn configure(threads: usize) -> Result<()> {
//!     if threads == 0 {
//!         Err(ConfigError::invalid_threads("default", threads))?;
//!     }
//!     Ok(())
//! }
//!
//! assert!(matches!(configure(0), Err(Error::Config(_))));
//! ```

pub mod config;
pub mod core;
pub mod step;
pub mod table;
pub mod utilities;

pub use config::{ConfigError, ConfigResult};
pub use core::{Error, Result};
pub use step::{StepError, StepResult};
pub use table::{TableError, TableResult};
pub use utilities::{format_error_chain, PanicPayloadExt};
