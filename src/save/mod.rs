mod snapshot;

pub use snapshot::{SNAPSHOT_VERSION, Snapshot};

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use flate2::Compression;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use tracing::info;

use crate::error::PersistenceError;
use crate::model::World;

pub const SAVE_EXTENSION: &str = "sav";

/// `path` with the save extension appended when it carries a different one
/// (or none).
pub fn save_path(path: &Path) -> PathBuf {
    if path.extension().is_some_and(|e| e == SAVE_EXTENSION) {
        return path.to_path_buf();
    }
    let mut name = path.as_os_str().to_owned();
    name.push(".");
    name.push(SAVE_EXTENSION);
    PathBuf::from(name)
}

/// Gzip-compressed JSON.
pub fn write_to<W: Write>(snapshot: &Snapshot, writer: W) -> Result<(), PersistenceError> {
    let mut encoder = GzEncoder::new(writer, Compression::default());
    serde_json::to_writer(&mut encoder, snapshot)?;
    encoder.finish()?.flush()?;
    Ok(())
}

pub fn read_from<R: Read>(reader: R) -> Result<Snapshot, PersistenceError> {
    let decoder = GzDecoder::new(reader);
    Ok(serde_json::from_reader(decoder)?)
}

/// Write `world` to `path` (with the save extension). Returns the path
/// actually written.
pub fn save_to_path(world: &World, path: &Path) -> Result<PathBuf, PersistenceError> {
    let path = save_path(path);
    let file = File::create(&path)?;
    write_to(&Snapshot::capture(world), BufWriter::new(file))?;
    info!(path = %path.display(), "game saved");
    Ok(path)
}

/// Read and validate a world. Nothing is returned unless the whole file
/// decodes and passes every invariant check.
pub fn load_from_path(path: &Path) -> Result<World, PersistenceError> {
    let path = save_path(path);
    if !path.exists() {
        return Err(PersistenceError::NotFound(path.display().to_string()));
    }
    let file = File::open(&path)?;
    let world = read_from(BufReader::new(file))?.into_world()?;
    info!(path = %path.display(), "game loaded");
    Ok(world)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario::Scenario;

    #[test]
    fn extension_is_appended_once() {
        assert_eq!(save_path(Path::new("game")), PathBuf::from("game.sav"));
        assert_eq!(save_path(Path::new("game.sav")), PathBuf::from("game.sav"));
        assert_eq!(save_path(Path::new("game.json")), PathBuf::from("game.json.sav"));
    }

    #[test]
    fn in_memory_round_trip() {
        let snapshot = Snapshot::capture(&Scenario::founding_of_rome());
        let mut bytes = Vec::new();
        write_to(&snapshot, &mut bytes).unwrap();
        assert_eq!(&bytes[..2], &[0x1f, 0x8b]);
        assert_eq!(read_from(bytes.as_slice()).unwrap(), snapshot);
    }

    #[test]
    fn garbage_fails_to_decode() {
        assert!(read_from(&b"not a save file"[..]).is_err());
    }

    #[test]
    fn missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_from_path(&dir.path().join("nothing")).unwrap_err();
        assert!(matches!(err, PersistenceError::NotFound(_)));
    }
}
