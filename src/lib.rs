//! Typed Access to the System’s Address Resolution Functions
//!
//! This crate wraps the address related functions found in POSIX’s
//! `netdb.h` and `arpa/inet.h`: converting addresses into their
//! presentation format (`inet_ntop()`), reverse lookups of socket
//! addresses (`getnameinfo()`), and forward resolution of host and
//! service names (`getaddrinfo()`). All answers come from the system
//! resolver and thus follow the system’s configuration.
//!
//! The wrappers take care of marshalling buffers and structures in and
//! out of the system calls and translate the system’s error codes into
//! this crate’s [`Error`] type.
//!
//! The functions themselves are synchronous. The [`hosts`] module adds a
//! small host database on top of them with both synchronous functions
//! (prefixed with `get_`) and ones returning futures that run the lookup on
//! a worker thread (starting with `poll_` for want of a better prefix).
//!
//! The crate only supports Unix-y systems.

#![cfg(unix)]

pub use self::addrinfo::{
    for_each_addr_info, get_addr_info, get_addresses, AddrInfo,
    AddrInfoFlags, AddrInfoHints, AddrInfoIter, Protocol, SockType,
};
pub use self::error::{Error, Result};
pub use self::inet::{inet_ntop, ntop, Family, In6Addr, InAddr};
pub use self::nameinfo::{get_name_info, NameInfo, NameInfoFlags};

pub mod addrinfo;
pub mod error;
pub mod hosts;
pub mod inet;
pub mod nameinfo;
pub mod sockaddr;
