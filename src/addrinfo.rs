//! Forward resolution via `getaddrinfo()`.
//!
//! The system returns a linked list of results. `AddrInfoIter` owns that
//! list, walks it entry by entry, and hands it back to `freeaddrinfo()`
//! when dropped. On top of that there are a callback based variant that
//! can stop early and a convenience function that just collects the
//! distinct addresses.

use std::{mem, ops, ptr};
use std::collections::BTreeSet;
use std::ffi::{CStr, CString};
use std::net::SocketAddr;
use libc::{c_char, c_int};
use tracing::{debug, trace};
use super::error::{Error, Result};
use super::inet::Family;
use super::sockaddr;


//------------ AddrInfoFlags -------------------------------------------------

/// The `ai_flags` of the hints for `getaddrinfo()`.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct AddrInfoFlags(c_int);

impl AddrInfoFlags {
    /// The addresses are intended for `bind()`.
    pub const PASSIVE: Self = AddrInfoFlags(libc::AI_PASSIVE);

    /// Ask for the canonical name in the first result.
    pub const CANON_NAME: Self = AddrInfoFlags(libc::AI_CANONNAME);

    /// The host must be a numeric address, no lookups happen.
    pub const NUMERIC_HOST: Self = AddrInfoFlags(libc::AI_NUMERICHOST);

    /// The service must be a port number.
    pub const NUMERIC_SERV: Self = AddrInfoFlags(libc::AI_NUMERICSERV);

    /// Return IPv4-mapped IPv6 addresses if there are no IPv6 addresses.
    pub const V4_MAPPED: Self = AddrInfoFlags(libc::AI_V4MAPPED);

    /// With `V4_MAPPED`, return both IPv6 and IPv4-mapped addresses.
    pub const ALL: Self = AddrInfoFlags(libc::AI_ALL);

    /// Only return families the system has configured addresses for.
    pub const ADDR_CONFIG: Self = AddrInfoFlags(libc::AI_ADDRCONFIG);

    pub fn empty() -> Self {
        AddrInfoFlags(0)
    }

    pub fn from_bits(bits: c_int) -> Self {
        AddrInfoFlags(bits)
    }

    pub fn bits(self) -> c_int {
        self.0
    }

    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl ops::BitOr for AddrInfoFlags {
    type Output = Self;

    fn bitor(self, other: Self) -> Self {
        AddrInfoFlags(self.0 | other.0)
    }
}

impl ops::BitOrAssign for AddrInfoFlags {
    fn bitor_assign(&mut self, other: Self) {
        self.0 |= other.0
    }
}


//------------ SockType ------------------------------------------------------

/// The socket type of a result.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum SockType {
    /// `SOCK_STREAM`
    Stream,

    /// `SOCK_DGRAM`
    Datagram,

    /// `SOCK_RAW`
    Raw,
}

impl SockType {
    pub fn from_raw(raw: c_int) -> Option<Self> {
        match raw {
            libc::SOCK_STREAM => Some(SockType::Stream),
            libc::SOCK_DGRAM => Some(SockType::Datagram),
            libc::SOCK_RAW => Some(SockType::Raw),
            _ => None
        }
    }

    pub fn as_raw(self) -> c_int {
        match self {
            SockType::Stream => libc::SOCK_STREAM,
            SockType::Datagram => libc::SOCK_DGRAM,
            SockType::Raw => libc::SOCK_RAW,
        }
    }
}


//------------ Protocol ------------------------------------------------------

/// The transport protocol of a result.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Protocol {
    Tcp,
    Udp,
}

impl Protocol {
    pub fn from_raw(raw: c_int) -> Option<Self> {
        match raw {
            libc::IPPROTO_TCP => Some(Protocol::Tcp),
            libc::IPPROTO_UDP => Some(Protocol::Udp),
            _ => None
        }
    }

    pub fn as_raw(self) -> c_int {
        match self {
            Protocol::Tcp => libc::IPPROTO_TCP,
            Protocol::Udp => libc::IPPROTO_UDP,
        }
    }
}


//------------ AddrInfoHints -------------------------------------------------

/// Hints restricting the results of `getaddrinfo()`.
///
/// The default value leaves everything unspecified, which is what the
/// system assumes when no hints are given at all.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct AddrInfoHints {
    pub flags: AddrInfoFlags,
    pub family: Option<Family>,
    pub socktype: Option<SockType>,
    pub protocol: Option<Protocol>,
}

impl AddrInfoHints {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn flags(mut self, flags: AddrInfoFlags) -> Self {
        self.flags = flags;
        self
    }

    pub fn family(mut self, family: Family) -> Self {
        self.family = Some(family);
        self
    }

    pub fn socktype(mut self, socktype: SockType) -> Self {
        self.socktype = Some(socktype);
        self
    }

    pub fn protocol(mut self, protocol: Protocol) -> Self {
        self.protocol = Some(protocol);
        self
    }

    /// Returns the hints as the system wants them.
    pub fn to_raw(&self) -> libc::addrinfo {
        let mut res: libc::addrinfo = unsafe { mem::zeroed() };
        res.ai_flags = self.flags.bits();
        res.ai_family = self.family.map(Family::as_raw)
                                   .unwrap_or(libc::AF_UNSPEC);
        res.ai_socktype = self.socktype.map(SockType::as_raw).unwrap_or(0);
        res.ai_protocol = self.protocol.map(Protocol::as_raw).unwrap_or(0);
        res
    }
}


//------------ AddrInfo ------------------------------------------------------

/// A single result of `getaddrinfo()`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AddrInfo {
    pub address: SocketAddr,
    pub family: Family,

    /// The socket type or `None` if the system returned something else.
    pub socktype: Option<SockType>,

    /// The protocol or `None` if it is unspecified or unknown.
    pub protocol: Option<Protocol>,

    /// The canonical name, only ever present on the first result.
    pub canonical_name: Option<String>,
}

impl AddrInfo {
    /// Converts an entry of the system's result list.
    ///
    /// # Safety
    ///
    /// `info` must be an entry of a list returned by `getaddrinfo()` that
    /// has not been freed yet.
    unsafe fn from_raw(info: &libc::addrinfo) -> Result<Self> {
        let storage = sockaddr::from_ptr(info.ai_addr, info.ai_addrlen);
        let address = sockaddr::from_raw(&storage)?;
        let canonical_name = if info.ai_canonname.is_null() {
            None
        }
        else {
            Some(CStr::from_ptr(info.ai_canonname).to_string_lossy()
                                                  .into_owned())
        };
        Ok(AddrInfo {
            address,
            family: Family::from_raw(info.ai_family)?,
            socktype: SockType::from_raw(info.ai_socktype),
            protocol: Protocol::from_raw(info.ai_protocol),
            canonical_name,
        })
    }
}


//------------ AddrInfoIter --------------------------------------------------

/// An iterator over the results of `getaddrinfo()`.
///
/// Entries of families not supported by this crate are returned as
/// `Error::UnknownFamily`. The result list is freed when the iterator is
/// dropped.
pub struct AddrInfoIter {
    head: *mut libc::addrinfo,
    cur: *mut libc::addrinfo,
}

impl Iterator for AddrInfoIter {
    type Item = Result<AddrInfo>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.cur.is_null() {
            return None
        }
        unsafe {
            let info = &*self.cur;
            self.cur = info.ai_next;
            Some(AddrInfo::from_raw(info))
        }
    }
}

impl Drop for AddrInfoIter {
    fn drop(&mut self) {
        if !self.head.is_null() {
            unsafe { libc::freeaddrinfo(self.head) }
        }
    }
}

// The list is exclusively owned and never touched by the system again.
unsafe impl Send for AddrInfoIter { }


//------------ get_addr_info -------------------------------------------------

/// Resolves a host and service into a list of socket addresses.
///
/// Either `host` or `service` may be `None`, in which case a null pointer
/// is passed to the system. Without `hints`, the system uses its defaults.
pub fn get_addr_info(host: Option<&str>, service: Option<&str>,
                     hints: Option<&AddrInfoHints>) -> Result<AddrInfoIter> {
    trace!(?host, ?service, ?hints, "getaddrinfo");
    let c_host = host.map(c_string).transpose()?;
    let c_service = service.map(c_string).transpose()?;
    let raw_hints = hints.map(AddrInfoHints::to_raw);

    let mut res: *mut libc::addrinfo = ptr::null_mut();
    let code = unsafe {
        libc::getaddrinfo(
            c_ptr(&c_host),
            c_ptr(&c_service),
            raw_hints.as_ref().map_or(ptr::null(), |h| h as *const _),
            &mut res
        )
    };
    if code != 0 {
        let err = Error::from_gai(code);
        debug!(?host, ?service, code, error = %err, "getaddrinfo failed");
        return Err(err)
    }
    Ok(AddrInfoIter { head: res, cur: res })
}

/// Calls `op` for each result of `getaddrinfo()` in order.
///
/// Iteration stops as soon as `op` returns `Ok(false)`. If it returns an
/// error, that error is returned. The result list is freed either way.
/// Results of families this crate doesn't know are skipped.
pub fn for_each_addr_info<F>(host: Option<&str>, service: Option<&str>,
                             hints: Option<&AddrInfoHints>, mut op: F)
                             -> Result<()>
where F: FnMut(&AddrInfo) -> Result<bool> {
    for info in get_addr_info(host, service, hints)? {
        if let Some(info) = known_family(info)? {
            if !op(&info)? {
                break
            }
        }
    }
    Ok(())
}

/// Returns the distinct socket addresses for a host and service, sorted.
///
/// Results of families this crate doesn't know are skipped.
pub fn get_addresses(host: Option<&str>, service: Option<&str>,
                     hints: Option<&AddrInfoHints>)
                     -> Result<Vec<SocketAddr>> {
    let mut addrs = BTreeSet::new();
    for info in get_addr_info(host, service, hints)? {
        if let Some(info) = known_family(info)? {
            addrs.insert(info.address);
        }
    }
    Ok(addrs.into_iter().collect())
}


//------------ Helpers -------------------------------------------------------

/// Turns results of families this crate doesn't know into `None`.
fn known_family(info: Result<AddrInfo>) -> Result<Option<AddrInfo>> {
    match info {
        Ok(info) => Ok(Some(info)),
        Err(Error::UnknownFamily(af)) => {
            debug!(family = af, "skipping result of unknown family");
            Ok(None)
        }
        Err(err) => Err(err)
    }
}

fn c_string(s: &str) -> Result<CString> {
    CString::new(s).map_err(|_| Error::InvalidName(s.into()))
}

fn c_ptr(s: &Option<CString>) -> *const c_char {
    s.as_ref().map_or(ptr::null(), |s| s.as_ptr())
}


//============ Testing =======================================================
