//! Tolerant access to the whitespace-separated fields of an apt.dat row.
//!
//! Rows frequently omit trailing fields; missing fields read as empty
//! strings and failed number parses fall back to the type default
//! instead of raising an error.

use std::str::FromStr;

/// One pre-split input line.
#[derive(Debug)]
pub struct Fields<'a> {
    parts: Vec<&'a str>,
}

impl<'a> Fields<'a> {
    pub fn split(line: &'a str) -> Self {
        Self {
            parts: line.split_whitespace().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Field at `index`, empty string when missing.
    pub fn at(&self, index: usize) -> &'a str {
        self.parts.get(index).copied().unwrap_or("")
    }

    /// Field at `index` parsed as a number, type default when missing
    /// or unparseable.
    pub fn num<T: FromStr + Default>(&self, index: usize) -> T {
        self.at(index).parse().unwrap_or_default()
    }

    /// All fields from `index` on, joined with single spaces. Used for
    /// free-text names at the end of a row.
    pub fn tail(&self, index: usize) -> String {
        if index >= self.parts.len() {
            return String::new();
        }
        self.parts[index..].join(" ")
    }
}
