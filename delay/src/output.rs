use anyhow::Result;
use serde_json::Value as JsonValue;
use std::io::{self, Write};

#[derive(Clone, Debug)]
pub enum OutputFormat {
    Yaml,
    Json,
}

pub fn emit_data(fmt: &OutputFormat, data: &JsonValue) -> Result<()> {
    match fmt {
        OutputFormat::Yaml => {
            let s = serde_yaml::to_string(data)?;
            println!("{}", s.trim_end());
        }
        OutputFormat::Json => {
            let s = serde_json::to_string_pretty(data)?;
            println!("{}", s);
        }
    }
    Ok(())
}

/// Renders an error chain to stderr as a YAML map.
pub fn emit_error(err: &anyhow::Error) -> Result<()> {
    let s = serde_yaml::to_string(&error_value(err))?;
    let _ = writeln!(io::stderr(), "{}", s.trim_end());
    Ok(())
}

pub fn error_value(err: &anyhow::Error) -> JsonValue {
    let mut map = serde_json::Map::new();
    map.insert("error".into(), JsonValue::String(err.to_string()));
    let causes: Vec<JsonValue> = err
        .chain()
        .skip(1)
        .map(|c| JsonValue::String(c.to_string()))
        .collect();
    if !causes.is_empty() {
        map.insert("caused_by".into(), JsonValue::Array(causes));
    }
    JsonValue::Object(map)
}
