use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

use super::{is_model_result, series, whole, CASH_FLOW_LINES, INCOME_LINES};

/// Format output as tables using the tabled crate.
pub fn print_table(value: &Value) {
    match value {
        Value::Object(map) => {
            if let Some(result) = map.get("result") {
                print_result(result);
                print_envelope_notes(map);
            } else {
                print_flat_object(map);
            }
        }
        Value::Array(arr) => print_array_table(arr),
        _ => println!("{}", value),
    }
}

fn print_result(result: &Value) {
    match result {
        Value::Object(res) if is_model_result(result) => print_model_tables(result, res),
        Value::Object(res) => {
            print_flat_object(res);
            for (key, val) in res {
                if let Value::Array(rows) = val {
                    if rows.first().is_some_and(Value::is_object) {
                        println!("\n{}:", key);
                        print_array_table(rows);
                    }
                }
            }
        }
        Value::Array(rows) => print_array_table(rows),
        other => println!("{}", format_value(other)),
    }
}

/// Headline metrics, then the statements with one column per year.
fn print_model_tables(result: &Value, res: &Map<String, Value>) {
    if let Some(Value::Object(metrics)) = res.get("metrics") {
        print_flat_object(metrics);
    }

    let years = result
        .get("year_labels")
        .and_then(Value::as_array)
        .map_or(0, |y| y.len());

    let mut builder = Builder::default();
    let mut header = vec!["Line Item".to_string()];
    header.extend((0..=years).map(|y| format!("Year {}", y)));
    builder.push_record(header);

    for (label, group, field) in INCOME_LINES {
        let mut row = vec![label.to_string(), String::new()];
        row.extend(series(result, group, field).into_iter().map(whole));
        builder.push_record(row);
    }
    for (label, group, field) in CASH_FLOW_LINES {
        let mut row = vec![label.to_string()];
        row.extend(series(result, group, field).into_iter().map(whole));
        builder.push_record(row);
    }

    println!("\n{}", Table::from(builder));
}

fn print_envelope_notes(envelope: &Map<String, Value>) {
    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings {
                if let Value::String(s) = w {
                    println!("  - {}", s);
                }
            }
        }
    }

    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}

fn print_flat_object(map: &Map<String, Value>) {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for (key, val) in map {
        if val.is_object() || val.as_array().is_some_and(|a| a.iter().any(Value::is_object)) {
            continue;
        }
        builder.push_record([key.as_str(), &format_value(val)]);
    }
    println!("{}", Table::from(builder));
}

fn print_array_table(arr: &[Value]) {
    if arr.is_empty() {
        println!("(empty)");
        return;
    }

    if let Some(Value::Object(first)) = arr.first() {
        let headers: Vec<String> = first
            .iter()
            .filter(|(_, v)| !v.is_object())
            .map(|(k, _)| k.clone())
            .collect();
        let mut builder = Builder::default();
        builder.push_record(&headers);

        for item in arr {
            if let Value::Object(map) = item {
                let row: Vec<String> = headers
                    .iter()
                    .map(|h| map.get(h.as_str()).map(format_value).unwrap_or_default())
                    .collect();
                builder.push_record(row);
            }
        }

        println!("{}", Table::from(builder));
    } else {
        for item in arr {
            println!("{}", format_value(item));
        }
    }
}

fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        Value::Array(arr) => {
            let items: Vec<String> = arr.iter().map(format_value).collect();
            items.join(", ")
        }
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}
