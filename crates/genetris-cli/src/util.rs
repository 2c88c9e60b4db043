use std::{
    fs::File,
    io::{self, BufReader, BufWriter, Write},
    path::Path,
};

use anyhow::Context as _;

/// Writes `value` as pretty JSON to `path`, or to stdout when `path` is `None`.
pub fn save_json<T>(value: &T, path: Option<&Path>) -> anyhow::Result<()>
where
    T: serde::Serialize,
{
    let (mut writer, target) = match path {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path.display()))?;
            (
                Box::new(BufWriter::new(file)) as Box<dyn Write>,
                path.display().to_string(),
            )
        }
        None => (
            Box::new(io::stdout().lock()) as Box<dyn Write>,
            "stdout".to_owned(),
        ),
    };

    serde_json::to_writer_pretty(&mut writer, value)
        .with_context(|| format!("Failed to write JSON to {target}"))?;
    writeln!(writer)
        .and_then(|()| writer.flush())
        .with_context(|| format!("Failed to flush output to {target}"))?;
    Ok(())
}

pub fn read_json_file<T, P>(file_kind: &str, path: P) -> anyhow::Result<T>
where
    T: serde::de::DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("Failed to open {file_kind} file: {}", path.display()))?;
    serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse {file_kind} JSON file: {}", path.display()))
}
