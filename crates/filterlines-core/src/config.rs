//! Settings and the read-only configuration source.
//!
//! Every setting is a zero-sized key type implementing [`Setting`], so a
//! lookup names its key and value type at compile time:
//!
//! ```
//! use filterlines_core::config::{Configuration, GivenConfiguration, LineNumbers};
//!
//! let config = GivenConfiguration::default();
//! assert!(!config.get::<LineNumbers>());
//! ```

use std::path::Path;

use crate::error::Result;

/// A known configuration key.
pub trait Setting {
    type Value: Clone;

    /// Name of the key in settings files.
    const KEY: &'static str;

    fn default_value() -> Self::Value;

    /// Read this key from a resolved [`Settings`].
    fn read(settings: &Settings) -> Self::Value;

    /// Decode a raw TOML value; `None` when it has the wrong type.
    fn from_toml(value: &toml::Value) -> Option<Self::Value>;
}

fn toml_bool(value: &toml::Value) -> Option<bool> {
    value.as_bool()
}

fn toml_usize(value: &toml::Value) -> Option<usize> {
    value.as_integer().and_then(|n| usize::try_from(n).ok())
}

macro_rules! define_settings {
    ($(
        $(#[$meta:meta])*
        $name:ident($field:ident, $key:literal): $ty:ty = $default:expr, $decode:path;
    )*) => {
        /// Resolved value of every setting.
        #[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
        #[serde(default, rename_all = "camelCase")]
        pub struct Settings {
            $( $(#[$meta])* pub $field: $ty, )*
        }

        impl Default for Settings {
            fn default() -> Self {
                Self { $( $field: $default, )* }
            }
        }

        $(
            $(#[$meta])*
            #[derive(Debug, Clone, Copy)]
            pub struct $name;

            impl Setting for $name {
                type Value = $ty;
                const KEY: &'static str = $key;

                fn default_value() -> $ty {
                    $default
                }

                fn read(settings: &Settings) -> $ty {
                    settings.$field
                }

                fn from_toml(value: &toml::Value) -> Option<$ty> {
                    $decode(value)
                }
            }
        )*

        fn resolve_all(config: &impl Configuration) -> Settings {
            Settings { $( $field: config.get::<$name>(), )* }
        }
    };
}

define_settings! {
    /// Match string searches case-sensitively.
    CaseSensitiveStringSearch(case_sensitive_string_search, "caseSensitiveStringSearch"): bool = false, toml_bool;
    /// Match regex searches case-sensitively.
    CaseSensitiveRegexSearch(case_sensitive_regex_search, "caseSensitiveRegexSearch"): bool = true, toml_bool;
    /// Prefill the search prompt with the previous search.
    PreserveSearch(preserve_search, "preserveSearch"): bool = true, toml_bool;
    /// Prefix output lines with their original line number.
    LineNumbers(line_numbers, "lineNumbers"): bool = false, toml_bool;
    /// Write results to a new document instead of editing in place.
    CreateNewTab(create_new_tab, "createNewTab"): bool = true, toml_bool;
    /// Show context as indented blocks under each match.
    IndentContext(indent_context, "indentContext"): bool = false, toml_bool;
    /// Collapse indented context blocks after filtering.
    FoldIndentedContext(fold_indented_context, "foldIndentedContext"): bool = true, toml_bool;
    /// Host indentation width.
    TabSize(tab_size, "tabSize"): usize = 2, toml_usize;
    /// Indent with spaces rather than a tab.
    InsertSpaces(insert_spaces, "insertSpaces"): bool = true, toml_bool;
}

impl Settings {
    /// `tabSize` spaces, or a single tab when spaces are disabled.
    pub fn indentation_unit_of(config: &impl Configuration) -> String {
        if config.get::<InsertSpaces>() {
            " ".repeat(config.get::<TabSize>())
        } else {
            "\t".to_string()
        }
    }

    /// Snapshot every key of `config`.
    pub fn resolve(config: &impl Configuration) -> Settings {
        resolve_all(config)
    }
}

/// Read-only settings lookup.
pub trait Configuration {
    fn get<K: Setting>(&self) -> K::Value;
}

/// Fixed values, typically for tests or already-resolved settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GivenConfiguration {
    settings: Settings,
}

impl GivenConfiguration {
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }
}

impl Configuration for GivenConfiguration {
    fn get<K: Setting>(&self) -> K::Value {
        K::read(&self.settings)
    }
}

/// Values read from a TOML table, with per-key defaults.
///
/// Keys may sit at the top level or under a `[filterlines]` table; the
/// latter wins when both are present.
#[derive(Debug, Clone, Default)]
pub struct TomlConfiguration {
    table: toml::Table,
}

impl TomlConfiguration {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let table = toml::from_str::<toml::Table>(s)?;
        Ok(Self { table })
    }

    /// Load `path`; a missing file yields all defaults.
    pub fn load(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(s) => Self::from_toml_str(&s),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no settings file, using defaults");
                Ok(Self::default())
            }
            Err(e) => Err(e.into()),
        }
    }

    fn raw(&self, key: &str) -> Option<&toml::Value> {
        self.table
            .get("filterlines")
            .and_then(toml::Value::as_table)
            .and_then(|section| section.get(key))
            .or_else(|| self.table.get(key))
    }
}

impl Configuration for TomlConfiguration {
    fn get<K: Setting>(&self) -> K::Value {
        match self.raw(K::KEY) {
            Some(raw) => K::from_toml(raw).unwrap_or_else(|| {
                tracing::warn!(key = K::KEY, value = %raw, "ignoring setting with wrong type");
                K::default_value()
            }),
            None => K::default_value(),
        }
    }
}
