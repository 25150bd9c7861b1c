//! Error type shared across the emulator core.

use std::fmt::{self, Display, Formatter};

/// Errors that can be produced while loading or running a Game Boy session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Error {
    /// The provided cartridge data is not a valid Game Boy ROM image.
    InvalidData,

    /// The cartridge data has a size that is not supported (either too
    /// small or not a multiple of the expected ROM bank size).
    RomSize,

    /// The cartridge declares a Memory Bank Controller that is not
    /// implemented by this core.
    UnsupportedMbc,

    /// A parameter provided to a public API call was invalid.
    InvalidParameter(String),

    /// A generic error carrying a free-form description, used for
    /// situations that don't map onto a more specific variant.
    CustomError(String),
}

impl Error {
    pub fn description(&self) -> String {
        match self {
            Error::InvalidData => String::from("Invalid data"),
            Error::RomSize => String::from("Invalid ROM size"),
            Error::UnsupportedMbc => String::from("Unsupported MBC"),
            Error::InvalidParameter(message) => format!("Invalid parameter: {}", message),
            Error::CustomError(message) => message.clone(),
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

impl std::error::Error for Error {}
