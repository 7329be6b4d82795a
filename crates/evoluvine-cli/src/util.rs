use std::{
    fs::{self, File},
    io::{self, BufReader, BufWriter, Write},
    path::{Path, PathBuf},
};

use anyhow::Context;
use serde::{Serialize, de::DeserializeOwned};

/// Destination of a JSON artifact: a file, or stdout when no path is given.
///
/// Files are created together with their missing parent directories and
/// replaced if they exist.
pub struct Output {
    target: String,
    writer: Box<dyn Write>,
}

impl Output {
    pub fn save_json<T>(value: &T, path: Option<PathBuf>) -> anyhow::Result<()>
    where
        T: Serialize,
    {
        Self::new(path)?.write_json(value)
    }

    pub fn new(path: Option<PathBuf>) -> anyhow::Result<Self> {
        let Some(path) = path else {
            return Ok(Self {
                target: "stdout".to_owned(),
                writer: Box::new(io::stdout().lock()),
            });
        };

        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
        }
        let file = File::create(&path)
            .with_context(|| format!("Failed to create output file: {}", path.display()))?;
        Ok(Self {
            target: path.display().to_string(),
            writer: Box::new(BufWriter::new(file)),
        })
    }

    /// Writes `value` as pretty JSON followed by a newline, then flushes.
    pub fn write_json<T>(&mut self, value: &T) -> anyhow::Result<()>
    where
        T: Serialize,
    {
        write_pretty(self.writer.as_mut(), value)
            .with_context(|| format!("Failed to write JSON to {}", self.target))
    }
}

fn write_pretty<T>(mut writer: &mut dyn Write, value: &T) -> io::Result<()>
where
    T: Serialize,
{
    serde_json::to_writer_pretty(&mut writer, value)?;
    writer.write_all(b"\n")?;
    writer.flush()
}

pub fn read_json_file<T, P>(file_kind: &str, path: P) -> anyhow::Result<T>
where
    T: DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("Failed to open {file_kind} file: {}", path.display()))?;
    serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse {file_kind} JSON file: {}", path.display()))
}
