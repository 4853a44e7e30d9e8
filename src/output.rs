use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{ConfGenError, Result};

pub fn output_data<T: Serialize>(data: &T, format: &str) -> std::result::Result<(), Box<dyn std::error::Error>> {
    match format {
        "json" => {
            println!("{}", serde_json::to_string(data)?);
        }
        "yaml" => {
            println!("{}", serde_yaml::to_string(data)?);
        }
        "pretty" | _ => {
            println!("{}", serde_json::to_string_pretty(data)?);
        }
    }
    Ok(())
}

/// Write a rendered fragment to `<dir>/<file_name>` with exactly one trailing newline.
pub fn write_fragment(dir: &Path, file_name: &str, fragment: &str) -> Result<PathBuf> {
    let path = dir.join(file_name);
    let mut contents = fragment.trim_end_matches('\n').to_string();
    contents.push('\n');
    fs::write(&path, contents).map_err(|e| ConfGenError::io(&path, e))?;
    Ok(path)
}

pub fn print_success(message: &str) {
    eprintln!("✅ {}", message);
}

pub fn print_error(message: &str) {
    eprintln!("\x1b[31m❌ Error: {}\x1b[0m", message);
}
