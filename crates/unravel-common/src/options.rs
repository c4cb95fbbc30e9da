//! Options for the rewrite engine and the code generator.
//!
//! Both option structs deserialize from camelCase JSON with every field
//! defaulted, so `{}` is a valid configuration document:
//!
//! ```json
//! { "namePrefix": "_d", "naming": "simplePrefix", "tempPlacement": "nearestBlock" }
//! ```

use serde::{Deserialize, Serialize};

/// How fresh temporary names are chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NamingStrategy {
    /// `prefix + base36(counter)`, skipping any candidate declared or
    /// referenced anywhere in the input program.
    #[default]
    GlobalUnique,
    /// `prefix + base36(counter)` with no collision check. Only safe when the
    /// prefix is reserved for generated code.
    SimplePrefix,
}

/// Where `var` declarations for assignment-form temporaries are placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TempPlacement {
    /// The body of the nearest enclosing function, or the program.
    #[default]
    FunctionScope,
    /// The nearest enclosing block statement, function body, or program.
    NearestBlock,
}

/// Options accepted by `transform`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TransformOptions {
    /// Prefix of every generated temporary name.
    pub name_prefix: String,
    pub naming: NamingStrategy,
    pub temp_placement: TempPlacement,
}

impl Default for TransformOptions {
    fn default() -> Self {
        TransformOptions {
            name_prefix: "$".to_string(),
            naming: NamingStrategy::GlobalUnique,
            temp_placement: TempPlacement::FunctionScope,
        }
    }
}

impl TransformOptions {
    /// Options with a custom prefix and defaults for everything else.
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        TransformOptions {
            name_prefix: prefix.into(),
            ..TransformOptions::default()
        }
    }

    /// Load options from a JSON document.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// True when `name_prefix` can start an identifier and every generated
    /// name `prefix + [0-9a-z]+` is therefore a valid identifier.
    #[must_use]
    pub fn has_valid_name_prefix(&self) -> bool {
        is_valid_name_prefix(&self.name_prefix)
    }
}

/// True for a non-empty `[A-Za-z_$][A-Za-z0-9_$]*` prefix.
#[must_use]
pub fn is_valid_name_prefix(prefix: &str) -> bool {
    let mut chars = prefix.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    (first.is_ascii_alphabetic() || first == '_' || first == '$')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

/// Line terminator used by the printer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NewLineKind {
    #[default]
    LineFeed,
    CarriageReturnLineFeed,
    /// Single-line output: statements separated by one space.
    Space,
}

impl NewLineKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            NewLineKind::LineFeed => "\n",
            NewLineKind::CarriageReturnLineFeed => "\r\n",
            NewLineKind::Space => " ",
        }
    }

    #[must_use]
    pub const fn is_single_line(self) -> bool {
        matches!(self, NewLineKind::Space)
    }
}

/// Options accepted by `generate`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GenerateOptions {
    pub new_line: NewLineKind,
    /// One level of indentation.
    pub indent: String,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        GenerateOptions {
            new_line: NewLineKind::LineFeed,
            indent: "    ".to_string(),
        }
    }
}

impl GenerateOptions {
    /// Everything on one line, no indentation.
    #[must_use]
    pub fn compact() -> Self {
        GenerateOptions {
            new_line: NewLineKind::Space,
            indent: String::new(),
        }
    }

    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

#[cfg(test)]
#[path = "../tests/options.rs"]
mod tests;
