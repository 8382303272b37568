//! Music directory listing service

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;

use shared::{ProcessId, process_debug, process_warn};

use crate::error::{MixerError, MixerResult};
use crate::traits::MediaLibrary;

/// Lists the top level of a directory on disk
#[derive(Debug, Clone)]
pub struct RealMediaLibrary {
    music_dir: PathBuf,
}

impl RealMediaLibrary {
    pub fn new<P: AsRef<Path>>(music_dir: P) -> Self {
        Self {
            music_dir: music_dir.as_ref().to_path_buf(),
        }
    }

    fn dir_error(&self, source: std::io::Error) -> MixerError {
        MixerError::MediaDirectory {
            path: self.music_dir.clone(),
            source,
        }
    }
}

#[async_trait]
impl MediaLibrary for RealMediaLibrary {
    async fn list_songs(&self) -> MixerResult<Vec<String>> {
        let mut entries = fs::read_dir(&self.music_dir).await.map_err(|e| self.dir_error(e))?;
        let mut songs = Vec::new();

        while let Some(entry) = entries.next_entry().await.map_err(|e| self.dir_error(e))? {
            // Anything but a directory is offered, dangling symlinks included
            let is_dir = fs::metadata(entry.path()).await.is_ok_and(|metadata| metadata.is_dir());
            if is_dir {
                continue;
            }
            match entry.file_name().into_string() {
                Ok(name) => songs.push(name),
                Err(raw) => {
                    process_warn!(
                        ProcessId::current(),
                        "Skipping non UTF-8 file name {:?} in {}",
                        raw,
                        self.music_dir.display()
                    );
                }
            }
        }

        songs.sort();
        process_debug!(
            ProcessId::current(),
            "Listed {} songs in {}",
            songs.len(),
            self.music_dir.display()
        );
        Ok(songs)
    }
}
