//! On-disk layout for captions and reports.
//!
//! - `frame_dir`: `<root>/<frame:03>`.
//! - `cell_file_name`: `<raster:03>.txt`.
//! - `write_frame`: one text file per captioned cell, newline terminated.
//! - `write_json_file`: pretty-print a serializable value to disk.
use crate::error::{CaptionError, Result};
use crate::frame::FrameCaptions;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

pub fn frame_dir(root: &Path, frame: u32) -> PathBuf {
    root.join(format!("{frame:03}"))
}

pub fn cell_file_name(raster_index: usize) -> String {
    format!("{raster_index:03}.txt")
}

/// Write every cell of `captions` under its frame directory.
///
/// Files are written next to their destination and renamed into place, so a
/// failure leaves earlier cells intact and never a half-written cell file.
/// Returns the paths written, in raster order.
pub fn write_frame(root: &Path, captions: &FrameCaptions) -> Result<Vec<PathBuf>> {
    let dir = frame_dir(root, captions.frame);
    fs::create_dir_all(&dir).map_err(|e| CaptionError::io(&dir, e))?;

    let mut written = Vec::with_capacity(captions.cells.len());
    for (&raster, text) in &captions.cells {
        let path = dir.join(cell_file_name(raster));
        write_atomic(&path, format!("{text}\n").as_bytes())?;
        written.push(path);
    }
    Ok(written)
}

fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".part");
    let tmp = PathBuf::from(tmp);
    fs::write(&tmp, contents).map_err(|e| CaptionError::io(&tmp, e))?;
    fs::rename(&tmp, path).map_err(|e| {
        let _ = fs::remove_file(&tmp);
        CaptionError::io(path, e)
    })
}

/// Serialize a value as pretty JSON to `path`, creating parent directories.
pub fn write_json_file<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    ensure_parent_dir(path)?;
    let json = serde_json::to_string_pretty(value).map_err(|e| {
        CaptionError::io(path, std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    })?;
    fs::write(path, json).map_err(|e| CaptionError::io(path, e))
}

fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| CaptionError::io(parent, e))?;
        }
    }
    Ok(())
}
