//! Translation keys and the language tables that render them.
//!
//! Every user-facing string in the engine (operator names, tooltips,
//! validation failures, error messages) is an `L10nMessage`: a key plus
//! positional arguments. A `Localizer` renders it against a language table
//! loaded from TOML, where nested tables flatten into dotted keys.

use ahash::AHashMap;
use std::path::Path;

use crate::core::error::{ConfigError, ConfigResult};

const EN_US: &str = include_str!("../../lang/en_us.toml");

/// A translation key with positional arguments
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct L10nMessage {
    pub key: String,
    pub args: Vec<String>,
}

impl L10nMessage {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            args: Vec::new(),
        }
    }

    pub fn with_arg(mut self, arg: impl ToString) -> Self {
        self.args.push(arg.to_string());
        self
    }
}

/// Language table mapping translation keys to `{0}`-style templates
#[derive(Debug, Clone, Default)]
pub struct Localizer {
    templates: AHashMap<String, String>,
}

impl Localizer {
    /// The embedded English table
    pub fn english() -> ConfigResult<Self> {
        Self::from_toml_str(EN_US)
    }

    /// Load a language table for `locale` from `dir/<locale>.toml`
    pub fn load(dir: &Path, locale: &str) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(dir.join(format!("{}.toml", locale)))?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        let root: toml::Value = content.parse()?;
        let table = root
            .as_table()
            .ok_or_else(|| ConfigError::Invalid("language file must be a table".into()))?;

        let mut templates = AHashMap::new();
        flatten_into(&mut templates, "", table)?;
        Ok(Self { templates })
    }

    pub fn contains(&self, key: &str) -> bool {
        self.templates.contains_key(key)
    }

    /// Render a key without arguments
    pub fn localize(&self, key: &str) -> String {
        self.templates
            .get(key)
            .cloned()
            .unwrap_or_else(|| key.to_string())
    }

    pub fn render(&self, message: &L10nMessage) -> String {
        let Some(template) = self.templates.get(&message.key) else {
            return message.key.clone();
        };
        substitute(template, &message.args)
    }
}

/// Replace `{i}` with `args[i]` in one pass over the template, so argument
/// text is never itself scanned for placeholders. Unknown indices and stray
/// braces are kept as written.
fn substitute(template: &str, args: &[String]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let arg = after.find('}').and_then(|close| {
            let index = after[..close].parse::<usize>().ok()?;
            Some((args.get(index)?, close))
        });
        match arg {
            Some((arg, close)) => {
                out.push_str(arg);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

fn flatten_into(
    templates: &mut AHashMap<String, String>,
    prefix: &str,
    table: &toml::value::Table,
) -> ConfigResult<()> {
    for (name, value) in table {
        let key = if prefix.is_empty() {
            name.clone()
        } else {
            format!("{}.{}", prefix, name)
        };
        match value {
            toml::Value::String(s) => {
                templates.insert(key, s.clone());
            }
            toml::Value::Table(inner) => flatten_into(templates, &key, inner)?,
            other => {
                return Err(ConfigError::Invalid(format!(
                    "language key {} must be a string, found {}",
                    key,
                    other.type_str()
                )))
            }
        }
    }
    Ok(())
}
