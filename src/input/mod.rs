mod sections;

use std::path::Path;

use serde_json::Value;

use crate::error::Error;
use crate::model::{
    Category, GenericPayload, ReportDocument, Score, SectionKind, Subject, Subsection,
};

/// Look up the first present alias of a field and coerce it to display text.
/// Null, empty strings, arrays and objects count as absent.
pub(crate) fn text(obj: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|k| obj.get(*k))
        .find_map(scalar_text)
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(if *b { "Yes" } else { "No" }.to_string()),
        _ => None,
    }
}

/// Elements of the first alias holding an array; absent or non-array fields yield nothing.
pub(crate) fn list<'a>(obj: &'a Value, keys: &[&str]) -> &'a [Value] {
    keys.iter()
        .filter_map(|k| obj.get(*k))
        .find_map(|v| v.as_array())
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

pub(crate) fn object<'a>(obj: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|k| obj.get(*k))
        .find(|v| v.is_object())
}

pub fn parse(path: &Path) -> Result<ReportDocument, Error> {
    let data = std::fs::read(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound | std::io::ErrorKind::PermissionDenied => Error::Io(
            std::io::Error::new(e.kind(), format!("{}: {}", e, path.display())),
        ),
        _ => Error::Io(e),
    })?;
    parse_bytes(&data)
}

pub fn parse_bytes(data: &[u8]) -> Result<ReportDocument, Error> {
    let value: Value = serde_json::from_slice(data)?;
    from_value(&value)
}

/// Build a report from parsed JSON. Only a non-object root is rejected; every
/// other missing or malformed field is defaulted.
pub fn from_value(root: &Value) -> Result<ReportDocument, Error> {
    if !root.is_object() {
        return Err(Error::InvalidReport("report root must be a JSON object".into()));
    }

    let subject = object(root, &["subject", "user", "customer"])
        .map(parse_subject)
        .unwrap_or_default();

    let categories = object(root, &["sections", "categories"])
        .and_then(Value::as_object)
        .map(|map| {
            map.iter()
                .map(|(key, value)| parse_category(key, value))
                .collect()
        })
        .unwrap_or_default();

    Ok(ReportDocument {
        id: text(root, &["id", "reportId"])
            .unwrap_or_else(|| crate::model::PLACEHOLDER.to_string()),
        subject,
        completion_date: text(root, &["completionDate", "completion_date", "completedAt"]),
        status: text(root, &["status"]),
        categories,
    })
}

fn parse_subject(obj: &Value) -> Subject {
    let score = ["score", "creditScore"]
        .iter()
        .filter_map(|k| obj.get(*k))
        .find_map(|v| match v {
            Value::Number(n) => n.as_f64().map(Score::Number),
            Value::String(s) if !s.trim().is_empty() => Some(Score::Text(s.trim().to_string())),
            _ => None,
        });
    Subject {
        name: text(obj, &["name", "fullName"]),
        email: text(obj, &["email"]),
        image: text(obj, &["image", "photo", "avatar"]),
        score,
    }
}

fn parse_category(key: &str, value: &Value) -> Category {
    let subsections = object(value, &["subsections", "subSections"])
        .and_then(Value::as_object)
        .map(|map| {
            map.iter()
                .map(|(sub_key, sub)| parse_subsection(sub_key, sub))
                .collect()
        })
        .unwrap_or_default();
    Category {
        key: key.to_string(),
        name: text(value, &["name", "title"]).unwrap_or_else(|| humanize_key(key)),
        status: text(value, &["status"]),
        subsections,
    }
}

fn parse_subsection(key: &str, value: &Value) -> Subsection {
    // Payload lives under `data`/`payload`; a bare object is its own payload.
    let data = value
        .get("data")
        .or_else(|| value.get("payload"))
        .unwrap_or(value);
    let name = text(value, &["name", "title"]).unwrap_or_else(|| humanize_key(key));

    let payload = match SectionKind::from_key(key) {
        Some(kind) => sections::parse_payload(kind, data),
        None => {
            log::debug!("Unrecognised subsection key {key:?}, using generic dump");
            crate::model::SectionPayload::Other(parse_generic(data, value))
        }
    };

    Subsection {
        key: key.to_string(),
        name,
        payload,
    }
}

fn parse_generic(data: &Value, wrapper: &Value) -> GenericPayload {
    match data {
        Value::Object(map) => GenericPayload::Fields(
            map.iter()
                .filter(|(k, _)| {
                    !std::ptr::eq(data, wrapper) || !matches!(k.as_str(), "name" | "title")
                })
                .map(|(k, v)| (humanize_key(k), generic_text(v)))
                .collect(),
        ),
        other => GenericPayload::Text(generic_text(other)),
    }
}

fn generic_text(value: &Value) -> String {
    match value {
        Value::Null => crate::model::PLACEHOLDER.to_string(),
        Value::Array(items) => items.iter().map(generic_text).collect::<Vec<_>>().join(", "),
        Value::Object(_) => value.to_string(),
        other => scalar_text(other).unwrap_or_else(|| crate::model::PLACEHOLDER.to_string()),
    }
}

/// `dateOfBirth` / `date_of_birth` → `Date Of Birth`.
pub(crate) fn humanize_key(key: &str) -> String {
    let mut words: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut prev_lower = false;
    for ch in key.chars() {
        if ch == '_' || ch == '-' || ch == ' ' {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            prev_lower = false;
            continue;
        }
        if ch.is_uppercase() && prev_lower && !current.is_empty() {
            words.push(std::mem::take(&mut current));
        }
        prev_lower = ch.is_lowercase() || ch.is_ascii_digit();
        current.push(ch);
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
        .iter()
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::model::SectionPayload;

    #[test]
    fn coerces_scalars_and_skips_empties() {
        let obj = json!({ "a": "  x ", "b": 42, "c": "", "d": null, "e": true, "f": [1] });
        assert_eq!(text(&obj, &["a"]).as_deref(), Some("x"));
        assert_eq!(text(&obj, &["b"]).as_deref(), Some("42"));
        assert_eq!(text(&obj, &["c", "b"]).as_deref(), Some("42"));
        assert_eq!(text(&obj, &["d"]), None);
        assert_eq!(text(&obj, &["e"]).as_deref(), Some("Yes"));
        assert_eq!(text(&obj, &["f"]), None);
        assert_eq!(text(&obj, &["missing"]), None);
    }

    #[test]
    fn humanizes_keys() {
        assert_eq!(humanize_key("dateOfBirth"), "Date Of Birth");
        assert_eq!(humanize_key("date_of_birth"), "Date Of Birth");
        assert_eq!(humanize_key("BVN"), "BVN");
    }

    #[test]
    fn rejects_non_object_root() {
        assert!(matches!(
            from_value(&json!([1, 2])),
            Err(Error::InvalidReport(_))
        ));
        assert!(matches!(parse_bytes(b"{not json"), Err(Error::InvalidReport(_))));
    }

    #[test]
    fn empty_object_yields_defaults() {
        let doc = from_value(&json!({})).unwrap();
        assert_eq!(doc.id, "N/A");
        assert!(doc.subject.name.is_none());
        assert!(doc.categories.is_empty());
    }

    #[test]
    fn preserves_category_and_subsection_order() {
        let doc = from_value(&json!({
            "sections": {
                "zeta": { "name": "Zeta", "subsections": {
                    "telephoneHistory": { "data": [] },
                    "addressHistory": { "data": [] },
                    "accountSummary": { "data": {} }
                }},
                "alpha": { "name": "Alpha", "subsections": {} }
            }
        }))
        .unwrap();
        let names: Vec<&str> = doc.categories.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["Zeta", "Alpha"]);
        let keys: Vec<&str> = doc.categories[0]
            .subsections
            .iter()
            .map(|s| s.key.as_str())
            .collect();
        assert_eq!(keys, ["telephoneHistory", "addressHistory", "accountSummary"]);
    }

    #[test]
    fn unknown_keys_become_generic_payloads() {
        let doc = from_value(&json!({
            "sections": { "c": { "subsections": {
                "scoreFactors": {
                    "name": "Score Factors",
                    "data": { "topFactor": "Utilisation", "weight": 0.4 }
                },
                "remarks": { "data": "Subject disputes one entry" }
            }}}
        }))
        .unwrap();
        let subs = &doc.categories[0].subsections;
        assert_eq!(subs[0].name, "Score Factors");
        match &subs[0].payload {
            SectionPayload::Other(GenericPayload::Fields(fields)) => {
                assert_eq!(fields[0], ("Top Factor".to_string(), "Utilisation".to_string()));
                assert_eq!(fields[1], ("Weight".to_string(), "0.4".to_string()));
            }
            other => panic!("unexpected payload {other:?}"),
        }
        assert_eq!(subs[1].name, "Remarks");
        assert!(matches!(
            &subs[1].payload,
            SectionPayload::Other(GenericPayload::Text(t)) if t == "Subject disputes one entry"
        ));
    }
}
