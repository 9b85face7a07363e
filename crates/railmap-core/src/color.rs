//! Line colour handling.
//!
//! Rail diagram documents describe a line colour as a tuple
//! `[city, line code, background, foreground]`. The tuple doubles as the
//! grouping key deciding which line an edge belongs to, while the background
//! entry is the colour the line is drawn in.
//!
//! [`Color`] wraps the `DynamicColor` type from the color crate and is used to
//! validate and normalise the background entry.

use std::{fmt, str::FromStr};

use color::DynamicColor;

/// Wrapper around the `DynamicColor` type from the color crate
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Color {
    color: DynamicColor,
}

impl Color {
    /// Create a new `Color` from a CSS colour string such as `"#e4002b"` or `"red"`
    ///
    /// # Examples
    ///
    /// ```
    /// use railmap_core::color::Color;
    ///
    /// let red = Color::new("#ff0000").unwrap();
    /// assert!(Color::new("not-a-color").is_err());
    /// ```
    pub fn new(color_str: &str) -> Result<Self, String> {
        match DynamicColor::from_str(color_str) {
            Ok(color) => Ok(Self { color }),
            Err(err) => Err(format!("invalid color `{color_str}`: {err}")),
        }
    }
}

/// The colour attribute attached to diagram edges and line badges.
///
/// Two edges belong to the same line iff their colour attributes are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LineColor {
    parts: Vec<String>,
}

impl LineColor {
    /// Index of the background colour inside the attribute tuple.
    const BACKGROUND: usize = 2;
    /// Index of the foreground colour inside the attribute tuple.
    const FOREGROUND: usize = 3;

    /// Creates a colour attribute from its raw entries.
    ///
    /// Returns `None` for an empty tuple.
    pub fn from_parts(parts: Vec<String>) -> Option<Self> {
        if parts.is_empty() {
            return None;
        }
        Some(Self { parts })
    }

    /// Returns the raw attribute entries
    pub fn parts(&self) -> &[String] {
        &self.parts
    }

    /// Returns the key edges are grouped by.
    pub fn group_key(&self) -> String {
        self.parts.join("|")
    }

    /// Returns the key identifying the line drawn in this colour.
    ///
    /// Only `[city, line, background]` take part, so a badge with a different
    /// text colour still belongs to the line.
    pub fn line_key(&self) -> String {
        let end = self.parts.len().min(Self::FOREGROUND);
        self.parts[..end].join("|")
    }

    /// Returns the background entry.
    ///
    /// Short tuples fall back to their last entry, so a bare `["#ff0000"]`
    /// still names a colour.
    pub fn background(&self) -> &str {
        self.parts
            .get(Self::BACKGROUND)
            .or_else(|| self.parts.last())
            .map(String::as_str)
            .unwrap_or_default()
    }

    /// Returns the foreground entry, if present
    pub fn foreground(&self) -> Option<&str> {
        self.parts.get(Self::FOREGROUND).map(String::as_str)
    }

    /// Parses the background entry as a CSS colour.
    ///
    /// # Errors
    ///
    /// Returns a message naming the offending value if it is not a valid colour.
    pub fn css(&self) -> Result<Color, String> {
        Color::new(self.background())
    }
}

impl fmt::Display for LineColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.background())
    }
}
