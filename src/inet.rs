//! Internet addresses and their presentation format.
//!
//! This module wraps the system's `inet_ntop()` and provides the two raw
//! address structures, `in_addr` and `in6_addr`, with the traits one would
//! expect of them: equality, hashing, and a `Display` impl that asks the
//! system for the textual form.

use std::{fmt, hash};
use std::ffi::CStr;
use std::io;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use libc::{c_char, c_int, c_void, socklen_t};
use super::error::{Error, Result};


/// Buffer size needed for the text of an IPv4 address.
pub const INET_ADDRSTRLEN: usize = 16;

/// Buffer size needed for the text of an IPv6 address.
pub const INET6_ADDRSTRLEN: usize = 46;

extern "C" {
    #[link_name = "inet_ntop"]
    fn sys_inet_ntop(af: c_int, src: *const c_void, dst: *mut c_char,
                     size: socklen_t) -> *const c_char;
}


//------------ Family --------------------------------------------------------

/// The address families this crate knows how to handle.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Family {
    /// IPv4, `AF_INET`.
    Inet,

    /// IPv6, `AF_INET6`.
    Inet6,
}

impl Family {
    /// Converts a raw `AF_*` value.
    pub fn from_raw(af: c_int) -> Result<Self> {
        match af {
            libc::AF_INET => Ok(Family::Inet),
            libc::AF_INET6 => Ok(Family::Inet6),
            _ => Err(Error::UnknownFamily(af))
        }
    }

    /// Returns the raw `AF_*` value.
    pub fn as_raw(self) -> c_int {
        match self {
            Family::Inet => libc::AF_INET,
            Family::Inet6 => libc::AF_INET6,
        }
    }

    /// Returns the family of a std address.
    pub fn of(addr: &IpAddr) -> Self {
        match *addr {
            IpAddr::V4(_) => Family::Inet,
            IpAddr::V6(_) => Family::Inet6,
        }
    }

    /// The size of a buffer holding the presentation format.
    pub fn text_len(self) -> usize {
        match self {
            Family::Inet => INET_ADDRSTRLEN,
            Family::Inet6 => INET6_ADDRSTRLEN,
        }
    }

    /// The length of an address in network byte order.
    pub fn addr_len(self) -> usize {
        match self {
            Family::Inet => 4,
            Family::Inet6 => 16,
        }
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match *self {
            Family::Inet => "AF_INET",
            Family::Inet6 => "AF_INET6",
        })
    }
}


//------------ inet_ntop -----------------------------------------------------

/// Converts an address in network byte order into presentation format.
///
/// The `family` is a raw `AF_INET` or `AF_INET6` value and `src` must hold
/// at least as many bytes as an address of that family has. Any other
/// family results in `Error::UnknownFamily`.
pub fn inet_ntop(family: c_int, src: &[u8]) -> Result<String> {
    let fam = Family::from_raw(family)?;
    if src.len() < fam.addr_len() {
        return Err(Error::AddressLength {
            family,
            expected: fam.addr_len(),
            found: src.len(),
        })
    }
    let mut buf = [0 as c_char; INET6_ADDRSTRLEN];
    let size = fam.text_len();
    let res = unsafe {
        sys_inet_ntop(family, src.as_ptr() as *const c_void,
                      buf.as_mut_ptr(), size as socklen_t)
    };
    if res.is_null() {
        return Err(io::Error::last_os_error().into())
    }
    let text = unsafe { CStr::from_ptr(buf.as_ptr()) };
    Ok(text.to_string_lossy().into_owned())
}

/// Returns the presentation format of a std address via the system.
pub fn ntop(addr: IpAddr) -> String {
    let res = match addr {
        IpAddr::V4(addr) => inet_ntop(libc::AF_INET, &addr.octets()),
        IpAddr::V6(addr) => inet_ntop(libc::AF_INET6, &addr.octets()),
    };
    // Known family, large enough buffer: the system won't fail here.
    res.unwrap_or_else(|_| addr.to_string())
}


//------------ InAddr --------------------------------------------------------

/// An IPv4 address as the system stores it.
#[derive(Clone, Copy)]
pub struct InAddr(libc::in_addr);

impl InAddr {
    pub fn from_raw(addr: libc::in_addr) -> Self {
        InAddr(addr)
    }

    pub fn as_raw(&self) -> &libc::in_addr {
        &self.0
    }

    /// The four octets, most significant first.
    pub fn octets(&self) -> [u8; 4] {
        // s_addr is in network byte order, i.e., its memory layout already
        // is the octet sequence.
        self.0.s_addr.to_ne_bytes()
    }
}

impl From<Ipv4Addr> for InAddr {
    fn from(addr: Ipv4Addr) -> Self {
        InAddr(libc::in_addr { s_addr: u32::from_ne_bytes(addr.octets()) })
    }
}

impl From<InAddr> for Ipv4Addr {
    fn from(addr: InAddr) -> Self {
        Ipv4Addr::from(addr.octets())
    }
}

impl From<libc::in_addr> for InAddr {
    fn from(addr: libc::in_addr) -> Self {
        InAddr(addr)
    }
}

impl From<InAddr> for libc::in_addr {
    fn from(addr: InAddr) -> Self {
        addr.0
    }
}

impl PartialEq for InAddr {
    fn eq(&self, other: &Self) -> bool {
        self.0.s_addr == other.0.s_addr
    }
}

impl Eq for InAddr { }

impl hash::Hash for InAddr {
    fn hash<H: hash::Hasher>(&self, state: &mut H) {
        self.0.s_addr.hash(state)
    }
}

impl fmt::Display for InAddr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let text = inet_ntop(libc::AF_INET, &self.octets())
                        .map_err(|_| fmt::Error)?;
        f.write_str(&text)
    }
}

impl fmt::Debug for InAddr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "InAddr({})", Ipv4Addr::from(*self))
    }
}


//------------ In6Addr -------------------------------------------------------

/// An IPv6 address as the system stores it.
#[derive(Clone, Copy)]
pub struct In6Addr(libc::in6_addr);

impl In6Addr {
    pub fn from_raw(addr: libc::in6_addr) -> Self {
        In6Addr(addr)
    }

    pub fn as_raw(&self) -> &libc::in6_addr {
        &self.0
    }

    pub fn octets(&self) -> [u8; 16] {
        self.0.s6_addr
    }

    /// The eight 16 bit words in host byte order.
    pub fn words(&self) -> [u16; 8] {
        let mut res = [0u16; 8];
        for (word, chunk) in res.iter_mut()
                                .zip(self.0.s6_addr.chunks_exact(2)) {
            *word = u16::from_be_bytes([chunk[0], chunk[1]]);
        }
        res
    }
}

impl From<Ipv6Addr> for In6Addr {
    fn from(addr: Ipv6Addr) -> Self {
        In6Addr(libc::in6_addr { s6_addr: addr.octets() })
    }
}

impl From<In6Addr> for Ipv6Addr {
    fn from(addr: In6Addr) -> Self {
        Ipv6Addr::from(addr.0.s6_addr)
    }
}

impl From<libc::in6_addr> for In6Addr {
    fn from(addr: libc::in6_addr) -> Self {
        In6Addr(addr)
    }
}

impl From<In6Addr> for libc::in6_addr {
    fn from(addr: In6Addr) -> Self {
        addr.0
    }
}

impl PartialEq for In6Addr {
    fn eq(&self, other: &Self) -> bool {
        self.0.s6_addr == other.0.s6_addr
    }
}

impl Eq for In6Addr { }

impl hash::Hash for In6Addr {
    fn hash<H: hash::Hasher>(&self, state: &mut H) {
        self.0.s6_addr.hash(state)
    }
}

impl fmt::Display for In6Addr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let text = inet_ntop(libc::AF_INET6, &self.0.s6_addr)
                        .map_err(|_| fmt::Error)?;
        f.write_str(&text)
    }
}

impl fmt::Debug for In6Addr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "In6Addr({})", Ipv6Addr::from(*self))
    }
}


//============ Testing =======================================================

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn ntop_v4() {
        assert_eq!(inet_ntop(libc::AF_INET, &[192, 0, 2, 1]).unwrap(),
                   "192.0.2.1");
        assert_eq!(ntop("10.1.2.3".parse().unwrap()), "10.1.2.3");
    }

    #[test]
    fn ntop_v6() {
        let addr: Ipv6Addr = "2001:db8::1".parse().unwrap();
        assert_eq!(inet_ntop(libc::AF_INET6, &addr.octets()).unwrap(),
                   "2001:db8::1");
        assert_eq!(ntop(IpAddr::V6(Ipv6Addr::LOCALHOST)), "::1");
    }

    #[test]
    fn ntop_unknown_family() {
        match inet_ntop(libc::AF_UNIX, &[0; 16]) {
            Err(Error::UnknownFamily(af)) => assert_eq!(af, libc::AF_UNIX),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn ntop_short_address() {
        match inet_ntop(libc::AF_INET6, &[0; 4]) {
            Err(Error::AddressLength { expected, found, .. }) => {
                assert_eq!(expected, 16);
                assert_eq!(found, 4);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn family() {
        assert_eq!(Family::from_raw(libc::AF_INET).unwrap(), Family::Inet);
        assert_eq!(Family::Inet6.as_raw(), libc::AF_INET6);
        assert!(Family::from_raw(libc::AF_UNIX).is_err());
        assert_eq!(Family::of(&"::1".parse().unwrap()), Family::Inet6);
    }

    #[test]
    fn in_addr() {
        let addr = InAddr::from(Ipv4Addr::new(127, 0, 0, 1));
        assert_eq!(addr.octets(), [127, 0, 0, 1]);
        assert_eq!(addr.to_string(), "127.0.0.1");
        assert_eq!(Ipv4Addr::from(addr), Ipv4Addr::LOCALHOST);
        assert_eq!(addr, InAddr::from(Ipv4Addr::LOCALHOST));
        assert!(addr != InAddr::from(Ipv4Addr::new(127, 0, 0, 2)));

        let raw = libc::in_addr { s_addr: u32::to_be(0xC000_0201) };
        assert_eq!(InAddr::from_raw(raw).to_string(), "192.0.2.1");
    }

    #[test]
    fn in6_addr() {
        let addr = In6Addr::from("2001:db8::8:1".parse::<Ipv6Addr>()
                                                   .unwrap());
        assert_eq!(addr.words(), [0x2001, 0xdb8, 0, 0, 0, 0, 8, 1]);
        assert_eq!(addr.to_string(), "2001:db8::8:1");
        assert_eq!(addr, In6Addr::from(Ipv6Addr::new(0x2001, 0xdb8,
                                                     0, 0, 0, 0, 8, 1)));
        assert!(addr != In6Addr::from(Ipv6Addr::LOCALHOST));
    }
}
