//! Errors reported by the system resolver.

use std::ffi::CStr;
use std::io;
use futures::sync::oneshot;
use libc::c_int;
use thiserror::Error;


//------------ Error ---------------------------------------------------------

/// An error happened while talking to the system resolver.
#[derive(Debug, Error)]
pub enum Error {
    /// The resolver returned a non-zero `EAI_*` code.
    ///
    /// The message is whatever `gai_strerror()` has to say about the code.
    #[error("{message}")]
    Resolve {
        code: c_int,
        message: String,
    },

    /// A system error, either `EAI_SYSTEM` or a failing `inet_ntop()`.
    #[error("system error: {0}")]
    Io(#[from] io::Error),

    /// The address family is neither `AF_INET` nor `AF_INET6`.
    #[error("unknown address family {0}")]
    UnknownFamily(c_int),

    /// Raw address data too short for its family.
    #[error("address for family {family} needs {expected} bytes, got {found}")]
    AddressLength {
        family: c_int,
        expected: usize,
        found: usize,
    },

    /// A host or service name with an embedded NUL byte.
    #[error("name contains a NUL byte: {0:?}")]
    InvalidName(String),

    /// The worker thread of an asynchronous lookup went away.
    #[error("lookup was canceled")]
    Canceled,
}

impl Error {
    /// Translates a return code of `getaddrinfo()` or `getnameinfo()`.
    ///
    /// `EAI_SYSTEM` means the real cause is in `errno`, so it becomes an
    /// `Error::Io` with the last OS error.
    pub fn from_gai(code: c_int) -> Self {
        if code == libc::EAI_SYSTEM {
            return Error::Io(io::Error::last_os_error())
        }
        // gai_strerror() returns a pointer to a static string.
        let message = unsafe {
            let ptr = libc::gai_strerror(code);
            if ptr.is_null() {
                format!("resolver error {}", code)
            }
            else {
                CStr::from_ptr(ptr).to_string_lossy().into_owned()
            }
        };
        Error::Resolve { code, message }
    }

    /// Returns the raw resolver code if this is a resolver error.
    pub fn gai_code(&self) -> Option<c_int> {
        match *self {
            Error::Resolve { code, .. } => Some(code),
            _ => None
        }
    }

    /// Returns whether the resolver answered that the name does not exist.
    pub fn is_not_found(&self) -> bool {
        self.gai_code() == Some(libc::EAI_NONAME)
    }
}

impl From<oneshot::Canceled> for Error {
    fn from(_: oneshot::Canceled) -> Self {
        Error::Canceled
    }
}


//------------ Result --------------------------------------------------------

pub type Result<T> = ::std::result::Result<T, Error>;


//============ Testing =======================================================

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn gai_message() {
        let err = Error::from_gai(libc::EAI_NONAME);
        assert!(err.is_not_found());
        assert_eq!(err.gai_code(), Some(libc::EAI_NONAME));
        assert!(!err.to_string().is_empty());
    }

    #[test]
    fn other_codes_are_found() {
        let err = Error::from_gai(libc::EAI_SERVICE);
        assert!(!err.is_not_found());
        assert!(Error::UnknownFamily(99).gai_code().is_none());
    }

    #[test]
    fn io_error_converts() {
        let err: Error = io::Error::new(io::ErrorKind::Other, "boom").into();
        assert!(err.to_string().contains("boom"));
        assert!(err.gai_code().is_none());
    }

    #[test]
    fn display() {
        assert_eq!(Error::UnknownFamily(99).to_string(),
                   "unknown address family 99");
        assert_eq!(Error::Canceled.to_string(), "lookup was canceled");
        assert!(Error::InvalidName("a\0b".into()).to_string()
                    .contains("NUL"));
    }
}
