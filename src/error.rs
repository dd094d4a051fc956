use std::fmt::{Display, Formatter};
use std::io;

/// Error type for all fallible solver operations.
///
/// An unsatisfiable solve outcome is *not* an error: `solve` returns `false`
/// for UNSAT. Errors are reported synchronously at the offending call and
/// never retried internally.
#[derive(Debug)]
pub enum Error {
    /// Variable name violates the grammar (empty after trimming is not the
    /// issue: names must be entirely printable, with no whitespace).
    InvalidName(String),
    /// Variable name is already bound, including the reserved "True"/"False".
    DuplicateName(String),
    /// Name lookup on an empty or unbound name.
    UnknownName(String),
    /// A literal cursor was advanced past its end.
    IteratorExhausted,
    /// Bitvector operation on operands of incompatible widths, or a constant
    /// not representable in the operand width.
    WidthMismatch { left: usize, right: usize },
    /// Index outside the valid range (bit index, slice bound, or a clause
    /// literal referencing an unallocated variable).
    Range { index: usize, bound: usize },
    /// Model value queried while no satisfying assignment is current.
    NoModel,
    /// Corrupt or inconsistent persisted state.
    Malformed(String),
    /// Underlying I/O failure while saving or loading.
    Io(io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Error::Io(e)
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::InvalidName(name) => {
                write!(f, "Invalid variable name {:?}: names must be non-empty and contain only printable, non-whitespace characters", name)
            }
            Error::DuplicateName(name) => {
                write!(f, "Variable name {:?} is already bound", name)
            }
            Error::UnknownName(name) => {
                write!(f, "No variable is bound to the name {:?}", name)
            }
            Error::IteratorExhausted => {
                write!(f, "Literal cursor advanced past the end")
            }
            Error::WidthMismatch { left, right } => {
                write!(f, "Bitvector width mismatch: {} vs {}", left, right)
            }
            Error::Range { index, bound } => {
                write!(f, "Index {} out of range (bound {})", index, bound)
            }
            Error::NoModel => {
                write!(f, "No satisfying model is current; call solve() first")
            }
            Error::Malformed(msg) => {
                write!(f, "Malformed constraint file: {}", msg)
            }
            Error::Io(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            _ => None,
        }
    }
}
