fn main() {
    // Validate embedded TOML files at compile time.
    validate_toml(
        "src/default_settings.toml",
        include_str!("src/default_settings.toml"),
    );
    validate_rules(
        "src/table/default_rules.toml",
        include_str!("src/table/default_rules.toml"),
    );
}

fn validate_toml(path: &str, content: &str) -> toml::Value {
    match content.parse::<toml::Value>() {
        Ok(value) => value,
        Err(e) => panic!("{path} contains invalid TOML: {e}"),
    }
}

fn validate_rules(path: &str, content: &str) {
    let value = validate_toml(path, content);
    let Some(rules) = value.get("rules").and_then(|r| r.as_array()) else {
        panic!("{path} has no `rules` array");
    };
    for (i, rule) in rules.iter().enumerate() {
        for key in ["from", "to"] {
            let ok = rule
                .get(key)
                .and_then(|v| v.as_str())
                .is_some_and(|s| !s.is_empty());
            if !ok {
                panic!("{path}: rule {i} needs a non-empty `{key}`");
            }
        }
    }
}
