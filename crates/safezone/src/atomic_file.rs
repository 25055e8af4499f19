use std::{fs, io::Write, path::Path};

/// Replace `path` with `contents` so that readers see either the old or the
/// new file, never a partial write.
pub(crate) fn write_atomic(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    let temp_path = path.with_extension("tmp");

    let mut temp_file = fs::File::create(&temp_path)?;
    temp_file.write_all(contents)?;
    temp_file.sync_all()?;

    fs::rename(&temp_path, path)
}
