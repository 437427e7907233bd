//! Placeholders, argument formatting and type-derived key prefixes

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::config::validation::validate_escape_template;
use crate::utils::errors::Result;

/// Marker replaced by the requested key in an escape template
pub const PLACEHOLDER_MARKER: &str = "{0}";

/// Template used to render keys that could not be resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EscapeTemplate {
    template: String,
}

impl EscapeTemplate {
    /// Validate and wrap a template such as `"[{0}]"`
    pub fn new(template: &str) -> Result<Self> {
        validate_escape_template(template)?;
        Ok(Self {
            template: template.to_string(),
        })
    }

    /// Render the placeholder for `key`
    pub fn format(&self, key: &str) -> String {
        self.template.replacen(PLACEHOLDER_MARKER, key, 1)
    }

    pub fn as_str(&self) -> &str {
        &self.template
    }
}

impl Default for EscapeTemplate {
    fn default() -> Self {
        Self {
            template: "???{0}???".to_string(),
        }
    }
}

/// A value substituted into a translation
#[derive(Debug, Clone, PartialEq)]
pub enum Arg {
    Str(String),
    Int(i64),
    Float(f64),
}

impl fmt::Display for Arg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arg::Str(value) => f.write_str(value),
            Arg::Int(value) => write!(f, "{}", value),
            Arg::Float(value) => write!(f, "{}", value),
        }
    }
}

impl From<&str> for Arg {
    fn from(value: &str) -> Self {
        Arg::Str(value.to_string())
    }
}

impl From<String> for Arg {
    fn from(value: String) -> Self {
        Arg::Str(value)
    }
}

impl From<i64> for Arg {
    fn from(value: i64) -> Self {
        Arg::Int(value)
    }
}

impl From<i32> for Arg {
    fn from(value: i32) -> Self {
        Arg::Int(i64::from(value))
    }
}

impl From<u32> for Arg {
    fn from(value: u32) -> Self {
        Arg::Int(i64::from(value))
    }
}

impl From<f64> for Arg {
    fn from(value: f64) -> Self {
        Arg::Float(value)
    }
}

/// Argument substitution style
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArgFormat {
    /// `{0}`, `{1}`, ... with `'{...}'` quoting and `''` for a literal quote
    #[default]
    Positional,
    /// `%s`, `%d`, `%f`, `%.2f`, `%1$s` and `%%`
    Printf,
}

impl ArgFormat {
    /// Substitute `args` into `template`
    ///
    /// The error is a human-readable cause; callers attach the key.
    pub fn format(self, template: &str, args: &[Arg]) -> std::result::Result<String, String> {
        match self {
            ArgFormat::Positional => format_positional(template, args),
            ArgFormat::Printf => format_printf(template, args),
        }
    }
}

fn format_positional(template: &str, args: &[Arg]) -> std::result::Result<String, String> {
    let mut output = String::with_capacity(template.len());
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\'' => match chars.peek() {
                Some('\'') => {
                    chars.next();
                    output.push('\'');
                }
                Some('{') => {
                    // Quoted section: copied verbatim up to the closing quote.
                    for quoted in chars.by_ref() {
                        if quoted == '\'' {
                            break;
                        }
                        output.push(quoted);
                    }
                }
                _ => output.push('\''),
            },
            '{' => {
                let mut token = String::new();
                let mut closed = false;
                for inner in chars.by_ref() {
                    match inner {
                        '}' => {
                            closed = true;
                            break;
                        }
                        '{' => return Err(format!("nested '{{' in argument '{{{}'", token)),
                        other => token.push(other),
                    }
                }
                if !closed {
                    return Err(format!("unterminated argument '{{{}'", token));
                }

                let index_part = token.split(',').next().unwrap_or_default().trim();
                let index: usize = index_part
                    .parse()
                    .map_err(|_| format!("argument index '{}' is not a number", index_part))?;
                match args.get(index) {
                    Some(arg) => output.push_str(&arg.to_string()),
                    None => {
                        output.push('{');
                        output.push_str(&token);
                        output.push('}');
                    }
                }
            }
            other => output.push(other),
        }
    }

    Ok(output)
}

/// Largest precision accepted in a printf conversion
pub const MAX_PRINTF_PRECISION: usize = 64;

static PRINTF_REGEX: OnceLock<std::result::Result<Regex, regex::Error>> = OnceLock::new();

fn printf_regex() -> std::result::Result<&'static Regex, String> {
    PRINTF_REGEX
        .get_or_init(|| Regex::new(r"(?s)%(?:([1-9][0-9]*)\$)?(?:\.([0-9]+))?(.?)"))
        .as_ref()
        .map_err(|e| format!("printf pattern failed to compile: {}", e))
}

fn format_printf(template: &str, args: &[Arg]) -> std::result::Result<String, String> {
    let mut output = String::with_capacity(template.len());
    let mut last = 0;
    let mut next_index = 0;

    for caps in printf_regex()?.captures_iter(template) {
        let Some(whole) = caps.get(0) else { continue };
        output.push_str(&template[last..whole.start()]);
        last = whole.end();

        let conversion = caps.get(3).map_or("", |m| m.as_str());
        if conversion == "%" {
            output.push('%');
            continue;
        }

        let index = match caps.get(1) {
            Some(explicit) => explicit
                .as_str()
                .parse::<usize>()
                .map_err(|e| format!("bad argument index '{}': {}", explicit.as_str(), e))?
                - 1,
            None => {
                let index = next_index;
                next_index += 1;
                index
            }
        };
        let precision = caps
            .get(2)
            .map(|p| p.as_str().parse::<usize>())
            .transpose()
            .map_err(|e| format!("bad precision: {}", e))?;
        if let Some(limit) = precision.filter(|limit| *limit > MAX_PRINTF_PRECISION) {
            return Err(format!(
                "precision {} in '{}' exceeds the maximum of {}",
                limit,
                whole.as_str(),
                MAX_PRINTF_PRECISION
            ));
        }

        let arg = args
            .get(index)
            .ok_or_else(|| format!("missing argument {} for '{}'", index + 1, whole.as_str()))?;

        match (conversion, arg) {
            ("s", arg) => {
                let text = arg.to_string();
                match precision {
                    Some(limit) => output.extend(text.chars().take(limit)),
                    None => output.push_str(&text),
                }
            }
            ("d", Arg::Int(value)) if precision.is_none() => output.push_str(&value.to_string()),
            ("d", _) => {
                return Err(format!("'{}' needs an integer argument, got '{}'", whole.as_str(), arg))
            }
            ("f", Arg::Float(value)) => {
                output.push_str(&format!("{:.*}", precision.unwrap_or(6), value))
            }
            ("f", Arg::Int(value)) => {
                #[allow(clippy::cast_precision_loss)]
                let value = *value as f64;
                output.push_str(&format!("{:.*}", precision.unwrap_or(6), value))
            }
            ("f", _) => {
                return Err(format!("'{}' needs a numeric argument, got '{}'", whole.as_str(), arg))
            }
            ("", _) => return Err("dangling '%' at end of template".to_string()),
            (other, _) => return Err(format!("unknown conversion '%{}'", other)),
        }
    }

    output.push_str(&template[last..]);
    Ok(output)
}

/// How a type name becomes a key prefix
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassPrefix {
    /// `my_app::model::Customer` becomes `Customer`
    #[default]
    Short,
    /// `my_app::model::Customer` becomes `my_app.model.Customer`
    Qualified,
}

impl ClassPrefix {
    /// Derive the key prefix for a type path
    pub fn derive(self, type_name: &str) -> String {
        let path = type_name
            .split('<')
            .next()
            .unwrap_or(type_name)
            .trim()
            .trim_start_matches('&');
        match self {
            ClassPrefix::Short => path.rsplit("::").next().unwrap_or(path).to_string(),
            ClassPrefix::Qualified => path.replace("::", "."),
        }
    }
}
