use std::{
    fs::File,
    io::{self, BufWriter, Write as _},
    path::Path,
};

use anyhow::Context;

pub fn read_json_file<T, P>(file_kind: &str, path: P) -> anyhow::Result<T>
where
    T: serde::de::DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("Failed to open {} file: {}", file_kind, path.display()))?;

    let reader = io::BufReader::new(file);
    let value = serde_json::from_reader(reader).with_context(|| {
        format!(
            "Failed to parse {} JSON file: {}",
            file_kind,
            path.display()
        )
    })?;

    Ok(value)
}

pub fn write_json_file<T, P>(file_kind: &str, path: P, value: &T) -> anyhow::Result<()>
where
    T: serde::Serialize,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let file = File::create(path)
        .with_context(|| format!("Failed to create {} file: {}", file_kind, path.display()))?;

    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, value)
        .with_context(|| format!("Failed to write {} JSON to {}", file_kind, path.display()))?;
    writeln!(writer)
        .and_then(|()| writer.flush())
        .with_context(|| format!("Failed to flush {} file: {}", file_kind, path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use blockfall_engine::{Engine, GameState, SequencePieceSource};

    use super::*;

    #[test]
    fn test_snapshot_round_trip() {
        let mut engine = Engine::new(
            blockfall_engine::GameConfig::default(),
            "TS".parse::<SequencePieceSource>().unwrap(),
        )
        .unwrap();
        let state = engine.reset();
        let state = engine.apply_command(&state, blockfall_engine::Command::HardDrop);

        let path = std::env::temp_dir().join(format!("blockfall-snapshot-{}.json", std::process::id()));
        write_json_file("snapshot", &path, &state).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        let read: GameState = read_json_file("snapshot", &path).unwrap();
        fs::remove_file(&path).unwrap();

        assert_eq!(read, state);
        // rows are stored as readable strings
        assert!(text.contains("\"....TTT...\""));
    }
}
