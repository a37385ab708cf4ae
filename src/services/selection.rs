use crate::models::ContentEntry;
use rand::Rng;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SelectionError {
    #[error("listing contains no files")]
    NoFiles,

    #[error("file \"{0}\" is not in the listing")]
    NotFound(String),
}

/// Keep only regular files, then pick `requested` by exact name or, when no
/// name is given, one uniformly at random.
pub fn select_script<R: Rng + ?Sized>(
    entries: Vec<ContentEntry>,
    requested: Option<&str>,
    rng: &mut R,
) -> Result<ContentEntry, SelectionError> {
    let mut files: Vec<ContentEntry> = entries.into_iter().filter(|e| e.is_file()).collect();

    if files.is_empty() {
        return Err(SelectionError::NoFiles);
    }

    let idx = match requested {
        Some(name) => files
            .iter()
            .position(|f| f.name == name)
            .ok_or_else(|| SelectionError::NotFound(name.to_string()))?,
        None => rng.gen_range(0..files.len()),
    };

    Ok(files.swap_remove(idx))
}
