//! # Synchronization
//!
//! [`synchronize`] mirrors a [`Binding`] onto an [`AttributeTarget`];
//! [`clear`] removes what a previous binding wrote. Both are a single pass over
//! the binding's keys in insertion order.
//!
//! ## Normalization
//!
//! | Value      | Attribute text                                         |
//! |------------|--------------------------------------------------------|
//! | `Empty`    | none (skipped unless `empty` is on, then `""`)         |
//! | `String`   | as is                                                  |
//! | `Number`   | shortest decimal form                                  |
//! | `Bool`     | `1`/`0`, or `true`/`false` when `bools` is on          |
//! | `Sequence` | blank items dropped, the rest joined with one space    |
//! | `Date`     | ISO-8601, e.g. `2020-01-02T03:04:05.000Z`              |
//! | `Record`   | compact JSON with `{`, `}`, `"` stripped, `,` → space  |
//!
//! Record text is a lossy summary: nested records and strings containing
//! commas or braces are ambiguous once flattened.

use crate::binding::Binding;
use crate::error::Result;
use crate::options::Options;
use crate::target::AttributeTarget;
use crate::value::{format_date, format_number, Value};
use tracing::debug;

/// What a call to [`synchronize`] did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// `(attribute name, value)` pairs, in write order.
    pub written: Vec<(String, String)>,

    /// Binding keys left alone by the empty policy.
    pub skipped: Vec<String>,
}

/// Attribute text for `value`, or `None` for the undefined sentinel.
pub fn normalize(value: &Value, options: &Options) -> Option<String> {
    match value {
        Value::Empty => None,
        Value::Bool(b) if !options.bools => Some(if *b { "1" } else { "0" }.to_string()),
        Value::Sequence(items) => Some(join_sequence(items)),
        other => Some(text(other)),
    }
}

/// Write every non-skipped key of `binding` as `{options.name}-{key}`.
pub fn synchronize<T: AttributeTarget + ?Sized>(
    target: &mut T,
    binding: &Binding,
    options: &Options,
) -> Result<SyncReport> {
    let mut report = SyncReport::default();

    for (key, value) in binding.iter() {
        let normalized = normalize(value, options);

        if !options.empty && normalized.as_deref().is_none_or(str::is_empty) {
            debug!(key, "skipping empty value");
            report.skipped.push(key.to_string());
            continue;
        }

        let name = options.attribute_name(key);
        let rendered = normalized.unwrap_or_default();
        target.set_attribute(&name, &rendered)?;
        debug!(attribute = %name, value = %rendered, "attribute written");
        report.written.push((name, rendered));
    }

    Ok(report)
}

/// Remove `{options.name}-{key}` for every key of `previous`.
pub fn clear<T: AttributeTarget + ?Sized>(
    target: &mut T,
    previous: &Binding,
    options: &Options,
) -> Result<()> {
    for key in previous.keys() {
        let name = options.attribute_name(key);
        target.remove_attribute(&name)?;
        debug!(attribute = %name, "attribute removed");
    }
    Ok(())
}

fn join_sequence(items: &[Value]) -> String {
    items
        .iter()
        .filter(|item| !item.is_blank())
        .map(text)
        .collect::<Vec<_>>()
        .join(" ")
}

// Plain text of a value, without the top-level boolean and sequence rules.
// Nested sequences join with commas, the way arrays stringify in a browser.
fn text(value: &Value) -> String {
    match value {
        Value::Empty => String::new(),
        Value::String(s) => s.clone(),
        Value::Number(n) => format_number(n),
        Value::Bool(b) => b.to_string(),
        Value::Date(date) => format_date(date),
        Value::Sequence(items) => items.iter().map(text).collect::<Vec<_>>().join(","),
        Value::Record(_) => flatten_record(value),
    }
}

fn flatten_record(value: &Value) -> String {
    value
        .to_json()
        .to_string()
        .chars()
        .filter(|c| !matches!(c, '{' | '}' | '"'))
        .map(|c| if c == ',' { ' ' } else { c })
        .collect()
}
