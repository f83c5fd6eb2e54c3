//! Small filesystem helpers built on `cap-std` ambient authority.
//!
//! Paths arrive as user-supplied strings (configuration values or CLI flags),
//! so every helper accepts `~/` prefixes and reports failures as plain
//! messages that callers wrap in their own error types.

use camino::Utf8Path;
use cap_std::{ambient_authority, fs_utf8::Dir};

/// Expands a leading `~/` to the current user's home directory.
#[must_use]
pub fn expand_tilde(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/")
        && let Some(home) = std::env::var_os("HOME")
    {
        return format!("{}/{rest}", home.to_string_lossy());
    }
    path.to_owned()
}

/// Reads a UTF-8 file relative to the current directory or from an absolute
/// path.
///
/// # Errors
///
/// Returns the underlying error message when the parent directory cannot be
/// opened or the file cannot be read.
pub fn read_to_string_ambient(path: &str) -> Result<String, String> {
    let (dir_path, file_path) = split_path(Utf8Path::new(path))?;
    let dir =
        Dir::open_ambient_dir(dir_path, ambient_authority()).map_err(|err| err.to_string())?;
    dir.read_to_string(file_path).map_err(|err| err.to_string())
}

/// Writes `contents` to `path`, creating missing parent directories.
///
/// # Errors
///
/// Returns the underlying error message when a directory cannot be created
/// or the file cannot be written.
pub fn write_string_ambient(path: &str, contents: &str) -> Result<(), String> {
    let (dir_path, file_path) = split_path(Utf8Path::new(path))?;
    Dir::create_ambient_dir_all(dir_path, ambient_authority()).map_err(|err| err.to_string())?;
    let dir =
        Dir::open_ambient_dir(dir_path, ambient_authority()).map_err(|err| err.to_string())?;
    dir.write(file_path, contents).map_err(|err| err.to_string())
}

fn split_path(path: &Utf8Path) -> Result<(&Utf8Path, &Utf8Path), String> {
    let file_name = path
        .file_name()
        .ok_or_else(|| format!("path has no file name: {path}"))?;
    let parent = match path.parent() {
        Some(parent) if !parent.as_str().is_empty() => parent,
        _ => Utf8Path::new("."),
    };
    Ok((parent, Utf8Path::new(file_name)))
}
