use super::codes::Rationale;
use super::config::Locale;
use super::profile::Bundle;
use serde_json::Map;
use serde_json::Value;

/// Text a value renders as inside a sentence.
fn plain(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Applies a numeric spec such as `.2f`, `.0%` or `d`. Unknown specs and
/// non-numeric values render plainly.
fn styled(value: &Value, spec: &str) -> String {
    let Some(x) = value.as_f64() else {
        return plain(value);
    };
    let digits = |s: &str| s.strip_prefix('.').and_then(|d| d.parse::<usize>().ok());
    match spec {
        "" => plain(value),
        "d" => format!("{}", x.round() as i64),
        s if s.ends_with('f') => match digits(&s[..s.len() - 1]) {
            Some(p) => format!("{:.*}", p, x),
            None => plain(value),
        },
        s if s.ends_with('%') => match digits(&s[..s.len() - 1]) {
            Some(p) => format!("{:.*}%", p, x * 100.),
            None => format!("{}%", x * 100.),
        },
        _ => plain(value),
    }
}

/// Fills `{name}` and `{name:spec}` placeholders.
///
/// Names resolve through `scopes` in order. A placeholder no scope knows
/// stays in the text as written, spec included. `{{` and `}}` escape braces.
pub fn format_template(template: &str, scopes: &[&Map<String, Value>]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find(['{', '}']) {
        out.push_str(&rest[..open]);
        let tail = &rest[open..];
        if tail.starts_with("{{") || tail.starts_with("}}") {
            out.push_str(&tail[..1]);
            rest = &tail[2..];
            continue;
        }
        let Some(close) = tail.find('}').filter(|_| tail.starts_with('{')) else {
            out.push_str(&tail[..1]);
            rest = &tail[1..];
            continue;
        };
        let field = &tail[1..close];
        let (name, spec) = field.split_once(':').unwrap_or((field, ""));
        match scopes.iter().find_map(|scope| scope.get(name.trim())) {
            Some(value) => out.push_str(&styled(value, spec.trim())),
            None => out.push_str(&tail[..=close]),
        }
        rest = &tail[close + 1..];
    }
    out.push_str(rest);
    out
}

/// Renders each rationale item into a sentence for the locale.
///
/// The template is the locale's entry for the code, then English, then
/// the item's own message, then the bare code. Placeholders read the
/// item's data first, then the suggestion meta, then `extras`. Empty
/// lines are dropped.
pub fn render_explanations(
    rationale: &[Rationale],
    meta: &Map<String, Value>,
    extras: &Map<String, Value>,
    locale: Locale,
    bundle: &Bundle,
) -> Vec<String> {
    let empty = Map::new();
    rationale
        .iter()
        .map(|item| {
            let code = item.code.as_str();
            let template = bundle
                .template(locale.as_str(), code)
                .map(String::from)
                .or_else(|| Some(item.msg.clone()).filter(|m| !m.is_empty()))
                .unwrap_or_else(|| code.to_string());
            let data = item.data.as_ref().and_then(Value::as_object).unwrap_or(&empty);
            format_template(&template, &[data, meta, extras]).trim().to_string()
        })
        .filter(|line| !line.is_empty())
        .collect()
}
