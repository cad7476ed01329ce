use anyhow::{Result, Context};
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;
use walkdir::WalkDir;

// @module: File and directory utilities

// @const: Image extensions accepted as timeline assets
const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "webp"];

// @const: Video extensions accepted as timeline assets
const VIDEO_EXTENSIONS: &[&str] = &["mp4", "mov", "mkv", "avi", "webm"];

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_file()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.exists() {
            fs::create_dir_all(path)?;
        }
        Ok(())
    }

    // @generates: Sidecar subtitle path from the output video's base name
    // video.mp4 -> video.srt, in the same directory
    pub fn subtitle_path_for_video<P: AsRef<Path>>(video_path: P) -> PathBuf {
        video_path.as_ref().with_extension("srt")
    }

    /// Check whether a path has one of the given extensions (case-insensitive)
    fn has_extension(path: &Path, extensions: &[&str]) -> bool {
        path.extension()
            .map(|ext| {
                let ext = ext.to_string_lossy().to_lowercase();
                extensions.contains(&ext.as_str())
            })
            .unwrap_or(false)
    }

    /// Find image and video assets under a directory, sorted by path for
    /// deterministic timeline order
    pub fn find_assets<P: AsRef<Path>>(dir: P) -> Result<(Vec<PathBuf>, Vec<PathBuf>)> {
        let mut images = Vec::new();
        let mut videos = Vec::new();

        for entry in WalkDir::new(dir.as_ref()).follow_links(true) {
            let entry = entry.context("Failed to read directory entry")?;
            let path = entry.path();

            if !path.is_file() {
                continue;
            }

            if Self::has_extension(path, IMAGE_EXTENSIONS) {
                images.push(path.to_path_buf());
            } else if Self::has_extension(path, VIDEO_EXTENSIONS) {
                videos.push(path.to_path_buf());
            }
        }

        images.sort();
        videos.sort();
        Ok((images, videos))
    }

    /// Read a file to a string
    pub fn read_to_string<P: AsRef<Path>>(path: P) -> Result<String> {
        fs::read_to_string(&path)
            .with_context(|| format!("Failed to read file: {:?}", path.as_ref()))
    }
}

/// Request-scoped working area for intermediate artifacts.
///
/// Every generation request gets a unique run id, so concurrently running
/// pipeline instances cannot collide on temporary file names. The directory
/// is removed when the scope drops, on every exit path.
#[derive(Debug)]
pub struct RunScope {
    /// Unique run identifier
    pub id: String,

    /// Directory holding this request's intermediate artifacts
    pub work_dir: PathBuf,
}

impl RunScope {
    /// Create a fresh scope under the system temp directory
    pub fn create() -> Result<Self> {
        let id = Uuid::new_v4().to_string();
        let work_dir = std::env::temp_dir().join(format!("vidweave-{}", id));
        fs::create_dir_all(&work_dir)
            .with_context(|| format!("Failed to create work dir: {:?}", work_dir))?;

        Ok(RunScope { id, work_dir })
    }

    /// Path of an intermediate artifact inside this scope
    pub fn temp_path(&self, name: &str) -> PathBuf {
        self.work_dir.join(name)
    }
}

impl Drop for RunScope {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.work_dir);
    }
}
