use super::types::PuzzleStats;
use crate::constants::{APP_NAME, STATS_FILE_NAME, STATS_VERSION_MAGIC};
use directories::ProjectDirs;
use sha2::{Digest, Sha256};
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

/// Saves and loads puzzle statistics in a checksummed binary format
pub struct StatsStore {
    path: PathBuf,
}

impl StatsStore {
    /// Creates a store in the platform data directory (via `directories`).
    pub fn new() -> io::Result<Self> {
        let project_dirs = ProjectDirs::from("", "", APP_NAME).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                "Could not determine data directory",
            )
        })?;

        let data_dir = project_dirs.data_dir();
        fs::create_dir_all(data_dir)?;

        Ok(Self {
            path: data_dir.join(STATS_FILE_NAME),
        })
    }

    pub fn at(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Write stats to disk.
    ///
    /// File format:
    /// - Version magic (8 bytes)
    /// - Data length (4 bytes)
    /// - bincode-encoded stats (variable length)
    /// - SHA256 checksum over all of the above (32 bytes)
    pub fn save(&self, stats: &PuzzleStats) -> io::Result<()> {
        let data =
            bincode::serialize(stats).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        let data_len = data.len() as u32;

        let mut hasher = Sha256::new();
        hasher.update(STATS_VERSION_MAGIC.to_le_bytes());
        hasher.update(data_len.to_le_bytes());
        hasher.update(&data);
        let checksum = hasher.finalize();

        let mut file = fs::File::create(&self.path)?;
        file.write_all(&STATS_VERSION_MAGIC.to_le_bytes())?;
        file.write_all(&data_len.to_le_bytes())?;
        file.write_all(&data)?;
        file.write_all(&checksum)?;

        Ok(())
    }

    /// Read stats back, rejecting a wrong magic or a bad checksum.
    pub fn load(&self) -> io::Result<PuzzleStats> {
        let mut file = fs::File::open(&self.path)?;

        let mut version_bytes = [0u8; 8];
        file.read_exact(&mut version_bytes)?;
        let version = u64::from_le_bytes(version_bytes);
        if version != STATS_VERSION_MAGIC {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                "Invalid stats file version",
            ));
        }

        let mut len_bytes = [0u8; 4];
        file.read_exact(&mut len_bytes)?;
        let data_len = u32::from_le_bytes(len_bytes);

        let mut data = vec![0u8; data_len as usize];
        file.read_exact(&mut data)?;

        let mut stored_checksum = [0u8; 32];
        file.read_exact(&mut stored_checksum)?;

        let mut hasher = Sha256::new();
        hasher.update(version_bytes);
        hasher.update(len_bytes);
        hasher.update(&data);
        let computed_checksum = hasher.finalize();
        if stored_checksum != computed_checksum.as_slice() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                "Stats file checksum mismatch",
            ));
        }

        bincode::deserialize(&data).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    /// Load, or start from zero when there is no file yet.
    pub fn load_or_default(&self) -> io::Result<PuzzleStats> {
        match self.load() {
            Ok(stats) => Ok(stats),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(PuzzleStats::default()),
            Err(e) => Err(e),
        }
    }

    #[cfg(test)]
    fn new_for_test() -> io::Result<Self> {
        use std::sync::atomic::{AtomicU64, Ordering};
        static TEST_COUNTER: AtomicU64 = AtomicU64::new(0);

        let test_id = TEST_COUNTER.fetch_add(1, Ordering::SeqCst);
        let temp_dir = std::env::temp_dir().join(format!(
            "mate-trainer-test-{}-{}",
            std::process::id(),
            test_id
        ));
        fs::create_dir_all(&temp_dir)?;
        Ok(Self::at(&temp_dir.join(STATS_FILE_NAME)))
    }
}
