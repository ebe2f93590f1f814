// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Panic payload coercion and error chain formatting.

use std::any::Any;

/// Converts a panic payload caught by [`catch_unwind()`] into readable text.
///
/// [`catch_unwind()`]: std::panic::catch_unwind
pub trait PanicPayloadExt {
    /// Converts panic payload to a readable string.
    fn to_readable_string(&self) -> String;
}

impl PanicPayloadExt for Box<dyn Any + Send + 'static> {
    fn to_readable_string(&self) -> String {
        if let Some(s) = self.downcast_ref::<String>() {
            s.clone()
        } else if let Some(s) = self.downcast_ref::<&str>() {
            (*s).to_owned()
        } else {
            "Unknown panic payload".to_owned()
        }
    }
}

/// Formats an error and its [`source()`] chain into a single line.
///
/// [`source()`]: std::error::Error::source
#[must_use]
pub fn format_error_chain(error: &dyn std::error::Error) -> String {
    let mut chain = vec![error.to_string()];
    let mut current = error.source();
    while let Some(err) = current {
        chain.push(err.to_string());
        current = err.source();
    }

    match chain.split_first() {
        Some((head, [])) => head.clone(),
        Some((head, rest)) => format!("{head} (caused by: {})", rest.join(" -> ")),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use std::io;

    use super::*;

    #[test]
    fn test_panic_payload_ext() {
        let payload: Box<dyn Any + Send> = Box::new("string panic".to_owned());
        assert_eq!(payload.to_readable_string(), "string panic");

        let payload: Box<dyn Any + Send> = Box::new("str panic");
        assert_eq!(payload.to_readable_string(), "str panic");

        let payload: Box<dyn Any + Send> = Box::new(42_i32);
        assert_eq!(payload.to_readable_string(), "Unknown panic payload");
    }

    #[test]
    fn test_format_single_error() {
        let err = io::Error::new(io::ErrorKind::Other, "root cause");
        assert_eq!(format_error_chain(&err), "root cause");
    }
}
