//! Date pattern handling
//!
//! Patterns are accepted in the `yyyy-MM-dd HH:mm:ss` style used by data-frame
//! tooling, or directly as chrono `strftime` strings when they contain `%`.
//! Either way they are compiled to strftime once, up front.

use crate::error::{Error, Result};
use chrono::format::{Item, ParseErrorKind, StrftimeItems};
use chrono::{NaiveDate, NaiveDateTime};
use std::fmt::Write as _;

/// A compiled date/time pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatePattern {
    /// Pattern as configured
    source: String,
    /// Equivalent chrono strftime string
    strftime: String,
}

impl DatePattern {
    /// Compile a pattern, rejecting anything chrono cannot handle
    pub fn new(pattern: &str) -> Result<Self> {
        if pattern.is_empty() {
            return Err(Error::date_pattern(pattern, "pattern is empty"));
        }

        let strftime = if pattern.contains('%') {
            pattern.to_string()
        } else {
            to_strftime(pattern)?
        };

        if StrftimeItems::new(&strftime).any(|item| matches!(item, Item::Error)) {
            return Err(Error::date_pattern(pattern, "invalid strftime specifier"));
        }

        // Formatting fails (rather than erroring) on specifiers a naive
        // timestamp cannot satisfy, such as `%z`, so probe once here.
        let probe = NaiveDate::from_ymd_opt(2000, 1, 1)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .ok_or_else(|| Error::date_pattern(pattern, "probe timestamp out of range"))?;
        let mut buf = String::new();
        if write!(buf, "{}", probe.format(&strftime)).is_err() {
            return Err(Error::date_pattern(
                pattern,
                "pattern needs information a local timestamp does not carry",
            ));
        }

        Ok(Self {
            source: pattern.to_string(),
            strftime,
        })
    }

    /// Pattern as configured
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Compiled strftime string
    pub fn strftime(&self) -> &str {
        &self.strftime
    }

    /// Parse a value, returning `None` when it does not match
    ///
    /// Date-only patterns resolve to midnight.
    pub fn parse(&self, value: &str) -> Option<NaiveDateTime> {
        match NaiveDateTime::parse_from_str(value, &self.strftime) {
            Ok(dt) => Some(dt),
            Err(e) if e.kind() == ParseErrorKind::NotEnough => {
                NaiveDate::parse_from_str(value, &self.strftime)
                    .ok()
                    .and_then(|d| d.and_hms_opt(0, 0, 0))
            }
            Err(_) => None,
        }
    }

    /// Render a timestamp with this pattern
    pub fn format(&self, value: &NaiveDateTime) -> Option<String> {
        let mut out = String::new();
        write!(out, "{}", value.format(&self.strftime)).ok()?;
        Some(out)
    }

    /// Parse `value` with this pattern and render it with `output`
    pub fn reformat(&self, value: &str, output: &DatePattern) -> Option<String> {
        self.parse(value).and_then(|dt| output.format(&dt))
    }
}

/// Translate a letter pattern (`dd/MM/yyyy HH:mm:ss`) into strftime
fn to_strftime(pattern: &str) -> Result<String> {
    let chars: Vec<char> = pattern.chars().collect();
    let mut out = String::with_capacity(pattern.len() * 2);
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];

        if c == '\'' {
            // Quoted literal; '' is an escaped quote
            if chars.get(i + 1) == Some(&'\'') {
                out.push('\'');
                i += 2;
                continue;
            }
            let mut j = i + 1;
            loop {
                match chars.get(j) {
                    None => {
                        return Err(Error::date_pattern(pattern, "unterminated quoted literal"))
                    }
                    Some('\'') if chars.get(j + 1) == Some(&'\'') => {
                        out.push('\'');
                        j += 2;
                    }
                    Some('\'') => break,
                    Some('%') => {
                        out.push_str("%%");
                        j += 1;
                    }
                    Some(&other) => {
                        out.push(other);
                        j += 1;
                    }
                }
            }
            i = j + 1;
            continue;
        }

        if !c.is_ascii_alphabetic() {
            out.push(c);
            i += 1;
            continue;
        }

        let run = chars[i..].iter().take_while(|&&x| x == c).count();
        let token = match (c, run) {
            ('y', 2) => "%y",
            ('y', _) => "%Y",
            ('M', 1) => "%-m",
            ('M', 2) => "%m",
            ('M', 3) => "%b",
            ('M', _) => "%B",
            ('d', 1) => "%-d",
            ('d', 2) => "%d",
            ('H', 1) => "%-H",
            ('H', 2) => "%H",
            ('h', 1) => "%-I",
            ('h', 2) => "%I",
            ('m', 1) => "%-M",
            ('m', 2) => "%M",
            ('s', 1) => "%-S",
            ('s', 2) => "%S",
            ('S', 3) => "%3f",
            ('S', 6) => "%6f",
            ('S', 9) => "%9f",
            ('a', 1) => "%p",
            ('E', 1..=3) => "%a",
            ('E', _) => "%A",
            _ => {
                return Err(Error::date_pattern(
                    pattern,
                    format!("unsupported field '{}'", c.to_string().repeat(run)),
                ))
            }
        };
        out.push_str(token);
        i += run;
    }

    Ok(out)
}
