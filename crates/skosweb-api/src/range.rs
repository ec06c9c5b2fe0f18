//! `Range: items=<start>-<finish>` parsing and paging directives.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use skosweb_core::defaults::RANGE_UNIT;

static RANGE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^items=([0-9]+)-([0-9]+)$").expect("valid range pattern"));

/// An inclusive window over a result list. `finish >= start` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PagingDirective {
    pub start: usize,
    pub finish: usize,
    pub number: usize,
}

impl PagingDirective {
    /// The window covering a whole list of `count` items.
    pub fn whole(count: usize) -> Self {
        Self {
            start: 0,
            finish: count.saturating_sub(1),
            number: count,
        }
    }

    /// Items of `items` inside the window; out-of-range windows are empty or
    /// truncated.
    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let end = self.finish.saturating_add(1).min(items.len());
        let start = self.start.min(end);
        &items[start..end]
    }

    /// `Content-Range` value for a list of `count` items.
    pub fn content_range(&self, count: usize) -> String {
        format!("{} {}-{}/{}", RANGE_UNIT, self.start, self.finish, count)
    }
}

/// Parse a `Range` header value. Anything but `items=<digits>-<digits>`
/// yields `None`; a finish before the start is clamped to the start.
pub fn parse_range_header(value: &str) -> Option<PagingDirective> {
    let Some(captures) = RANGE_PATTERN.captures(value) else {
        debug!(
            subsystem = "api",
            component = "listing",
            op = "parse_range",
            range = %value,
            "Ignoring malformed Range header"
        );
        return None;
    };

    let start: usize = captures[1].parse().ok()?;
    let finish: usize = captures[2].parse().ok()?;
    let finish = finish.max(start);

    Some(PagingDirective {
        start,
        finish,
        number: finish - start + 1,
    })
}
