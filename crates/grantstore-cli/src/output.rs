use anyhow::Result;
use colored::Colorize;
use serde::Serialize;
use serde_json::Value;

use crate::cli::OutputFormat;

pub fn print_value<T: Serialize>(value: &T, format: OutputFormat) -> Result<()> {
    let value = serde_json::to_value(value)?;
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&value)?),
        OutputFormat::Text => print_text(&value, 0),
    }
    Ok(())
}

pub fn print_success(msg: &str) {
    println!("{} {}", "✓".green(), msg);
}

pub fn print_warning(msg: &str) {
    eprintln!("{} {}", "!".yellow(), msg);
}

pub fn print_error(msg: &str) {
    eprintln!("{} {}", "✗".red(), msg);
}

fn print_text(value: &Value, indent: usize) {
    let prefix = " ".repeat(indent);
    let Value::Object(obj) = value else {
        println!("{prefix}{value}");
        return;
    };
    for (key, val) in obj {
        match val {
            Value::Object(_) => {
                println!("{prefix}{}:", key.cyan());
                print_text(val, indent + 2);
            }
            Value::String(s) => println!("{prefix}{}: {s}", key.cyan()),
            other => println!("{prefix}{}: {other}", key.cyan()),
        }
    }
}
