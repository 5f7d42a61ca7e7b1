use std::{
    fs::{self, File},
    io::{self, BufWriter, Write},
    path::Path,
};

use anyhow::Context;
use blockfall_engine::StageTable;
use serde::Serialize;

/// Writes `value` as pretty-printed JSON to `path`, or to stdout.
pub fn write_json<T>(value: &T, path: Option<&Path>) -> anyhow::Result<()>
where
    T: Serialize,
{
    match path {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path.display()))?;
            emit_json(BufWriter::new(file), value)
                .with_context(|| format!("Failed to write JSON to {}", path.display()))
        }
        None => emit_json(io::stdout().lock(), value).context("Failed to write JSON to stdout"),
    }
}

fn emit_json<W, T>(mut writer: W, value: &T) -> io::Result<()>
where
    W: Write,
    T: Serialize,
{
    serde_json::to_writer_pretty(&mut writer, value)?;
    writeln!(writer)?;
    writer.flush()
}

/// Loads a stage table from a JSON file, or the built-in table when no path
/// is given.
pub fn load_stage_table(path: Option<&Path>) -> anyhow::Result<StageTable> {
    let Some(path) = path else {
        return Ok(StageTable::default());
    };
    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read stage table: {}", path.display()))?;
    StageTable::from_json(&json)
        .with_context(|| format!("Invalid stage table: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("blockfall-{}-{name}", std::process::id()))
    }

    #[test]
    fn test_stage_table_file_roundtrip() {
        let path = temp_path("stages.json");
        let table = StageTable::default();
        write_json(&table, Some(&path)).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert!(written.ends_with("]\n"));
        assert_eq!(load_stage_table(Some(&path)).unwrap(), table);
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_load_builtin_stage_table() {
        assert_eq!(load_stage_table(None).unwrap(), StageTable::default());
    }

    #[test]
    fn test_load_stage_table_errors_name_the_file() {
        let missing = temp_path("missing.json");
        let err = load_stage_table(Some(&missing)).unwrap_err();
        assert!(err.to_string().starts_with("Failed to read stage table"));

        let empty = temp_path("empty.json");
        fs::write(&empty, "[]").unwrap();
        let err = load_stage_table(Some(&empty)).unwrap_err();
        assert!(err.to_string().contains("empty.json"));
        assert_eq!(err.root_cause().to_string(), "stage table is empty");
        fs::remove_file(&empty).unwrap();
    }
}
