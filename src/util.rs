//! Assorted utility functions and structures shared across the emulator core.

use std::{
    cell::RefCell,
    fs::File,
    io::Read,
    rc::Rc,
    sync::{Arc, Mutex},
};

use crate::error::Error;

/// Shared mutable type able to be passed between types, allowing for
/// circular referencing and interior mutability within a single thread.
pub type SharedMut<T> = Rc<RefCell<T>>;

/// Shared thread type able to be passed between threads.
///
/// Carries significant performance overhead compared to [`SharedMut`],
/// reserved for state that genuinely needs to cross thread boundaries
/// (e.g. configuration shared with an audio callback thread).
pub type SharedThread<T> = Arc<Mutex<T>>;

/// Reads the contents of the file at the given path into a vector of bytes.
pub fn read_file(path: &str) -> Result<Vec<u8>, Error> {
    let mut file =
        File::open(path).map_err(|_| Error::CustomError(format!("Failed to open file: {path}")))?;
    let mut data = Vec::new();
    file.read_to_end(&mut data)
        .map_err(|_| Error::CustomError(format!("Failed to read from file: {path}")))?;
    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_file_missing() {
        let result = read_file("/nonexistent/path/to/rom.gb");
        assert!(result.is_err());
    }
}
