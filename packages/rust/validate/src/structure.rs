//! Object-structure checks for one parsed record.
//!
//! Every structural violation is its own message; checks do not
//! short-circuit each other, so a record missing three fields reports all
//! three in one pass. Only a missing or non-object `meta` cuts the pass
//! short, because nothing below it can be inspected.

use serde_json::{Map, Value};

use crate::rules::Ruleset;

const DATA_INFO_KEYS: &[&str] = &[
    "lang",
    "url",
    "source",
    "type",
    "processing_date",
    "delivery_version",
    "title",
    "content",
];

const CONTENT_INFO_KEYS: &[&str] = &["domain", "subdomain"];

fn str_field<'a>(map: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    map.get(key).and_then(Value::as_str)
}

/// Check one record object against the delivery schema. Returns violation
/// messages; an empty vec means the structure is sound.
pub fn check_structure(obj: &Value, rules: &Ruleset) -> Vec<String> {
    let mut out = Vec::new();

    match obj.get("id") {
        Some(Value::String(id)) => {
            if !rules.is_hex_id(id) {
                out.push(format!("id is not a 32/40/64-char hex digest: \"{id}\""));
            }
        }
        Some(_) => out.push("id is not a string".to_string()),
        None => out.push("missing required field: id".to_string()),
    }

    if obj.get("text").is_none() {
        out.push("missing required field: text".to_string());
    }

    let Some(meta) = obj.get("meta") else {
        out.push("missing required field: meta".to_string());
        return out;
    };
    let Some(meta) = meta.as_object() else {
        out.push("meta is not an object".to_string());
        return out;
    };

    match str_field(meta, "collector") {
        Some(c) if c == rules.collector => {}
        Some(c) => out.push(format!(
            "collector must be \"{}\", got \"{c}\"",
            rules.collector
        )),
        None => out.push("missing required field: meta.collector".to_string()),
    }

    match str_field(meta, "collected_time") {
        Some(t) if rules.is_datetime_minute(t) => {}
        Some(t) => out.push(format!(
            "collected_time is not YYYY-MM-DDThh:mm: \"{t}\""
        )),
        None => out.push("missing required field: meta.collected_time".to_string()),
    }

    match meta.get("data_info").and_then(Value::as_object) {
        None => out.push("missing or invalid meta.data_info".to_string()),
        Some(di) => {
            for key in DATA_INFO_KEYS {
                match di.get(*key) {
                    Some(Value::String(_)) => {}
                    Some(_) => out.push(format!("meta.data_info.{key} is not a string")),
                    None => out.push(format!("missing required field: meta.data_info.{key}")),
                }
            }
            if let Some(lang) = str_field(di, "lang") {
                if !rules.allowed_langs.contains(lang) {
                    out.push(format!("lang not in allowed set: \"{lang}\""));
                }
            }
            if let Some(ty) = str_field(di, "type") {
                if !rules.allowed_types.contains(ty) {
                    out.push(format!("type not in allowed set: \"{ty}\""));
                }
            }
            if let Some(date) = str_field(di, "processing_date") {
                if !rules.is_date(date) {
                    out.push(format!("processing_date is not YYYY-MM-DD: \"{date}\""));
                }
            }
            if let Some(dv) = str_field(di, "delivery_version") {
                if dv != rules.delivery_version {
                    out.push(format!(
                        "delivery_version must be \"{}\", got \"{dv}\"",
                        rules.delivery_version
                    ));
                }
            }
        }
    }

    match meta.get("content_info").and_then(Value::as_object) {
        None => out.push("missing or invalid meta.content_info".to_string()),
        Some(ci) => {
            for key in CONTENT_INFO_KEYS {
                if str_field(ci, key).is_none() {
                    out.push(format!("missing required field: meta.content_info.{key}"));
                }
            }
            if let Some(domain) = str_field(ci, "domain") {
                if !rules.allowed_domains.contains(domain) {
                    out.push(format!("domain not in allowed set: \"{domain}\""));
                }
            }
            if let Some(sub) = str_field(ci, "subdomain") {
                if !rules.allowed_subdomains.contains(sub) {
                    out.push(format!("subdomain not in allowed set: \"{sub}\""));
                }
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn valid_record() -> Value {
        json!({
            "id": "a".repeat(64),
            "text": "placeholder",
            "meta": {
                "data_info": {
                    "lang": "en",
                    "url": "https://examplerecipes.com/r/1",
                    "source": "examplerecipes.com",
                    "type": "Recipe/HowTo",
                    "processing_date": "2026-08-30",
                    "delivery_version": "V1.0",
                    "title": "Lemon Tart",
                    "content": "Mix the dough thoroughly."
                },
                "content_info": {
                    "domain": "Cooking",
                    "subdomain": "Recipes"
                },
                "collector": "joy",
                "collected_time": "2026-08-30T14:05"
            }
        })
    }

    #[test]
    fn valid_record_passes() {
        let rules = Ruleset::default();
        assert!(check_structure(&valid_record(), &rules).is_empty());
    }

    #[test]
    fn sixty_three_char_id_rejected() {
        let rules = Ruleset::default();
        let mut rec = valid_record();
        rec["id"] = json!("b".repeat(63));
        let errs = check_structure(&rec, &rules);
        assert_eq!(errs.len(), 1);
        assert!(errs[0].contains("hex digest"));
    }

    #[test]
    fn all_missing_fields_reported_in_one_pass() {
        let rules = Ruleset::default();
        let mut rec = valid_record();
        let di = rec["meta"]["data_info"].as_object_mut().unwrap();
        di.remove("url");
        di.remove("title");
        rec["meta"].as_object_mut().unwrap().remove("collector");
        let errs = check_structure(&rec, &rules);
        assert_eq!(errs.len(), 3);
        assert!(errs.iter().any(|m| m.contains("data_info.url")));
        assert!(errs.iter().any(|m| m.contains("data_info.title")));
        assert!(errs.iter().any(|m| m.contains("collector")));
    }

    #[test]
    fn missing_meta_cuts_the_pass_short() {
        let rules = Ruleset::default();
        let errs = check_structure(&json!({"id": "a".repeat(64), "text": "x"}), &rules);
        assert_eq!(errs, vec!["missing required field: meta".to_string()]);
    }

    #[test]
    fn enum_and_literal_violations() {
        let rules = Ruleset::default();
        let mut rec = valid_record();
        rec["meta"]["data_info"]["lang"] = json!("fr");
        rec["meta"]["data_info"]["delivery_version"] = json!("V2.0");
        rec["meta"]["content_info"]["domain"] = json!("Gardening");
        rec["meta"]["collected_time"] = json!("2026-08-30 14:05");
        let errs = check_structure(&rec, &rules);
        assert_eq!(errs.len(), 4);
    }

    #[test]
    fn non_string_data_info_field_flagged() {
        let rules = Ruleset::default();
        let mut rec = valid_record();
        rec["meta"]["data_info"]["url"] = json!(42);
        let errs = check_structure(&rec, &rules);
        assert_eq!(errs, vec!["meta.data_info.url is not a string".to_string()]);
    }
}
