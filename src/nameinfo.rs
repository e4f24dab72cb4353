//! Reverse lookup of socket addresses via `getnameinfo()`.

use std::ffi::CStr;
use std::net::SocketAddr;
use std::ops;
use libc::{c_char, c_int, socklen_t};
use tracing::{debug, trace};
use super::error::{Error, Result};
use super::sockaddr;


/// Maximum length of a host name returned by the system.
pub const NI_MAXHOST: usize = 1025;

/// Maximum length of a service name returned by the system.
pub const NI_MAXSERV: usize = 32;


//------------ NameInfoFlags -------------------------------------------------

/// The flags argument of `getnameinfo()`.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct NameInfoFlags(c_int);

impl NameInfoFlags {
    /// Return the numeric form of the host address.
    pub const NUMERIC_HOST: Self = NameInfoFlags(libc::NI_NUMERICHOST);

    /// Return the numeric form of the port.
    pub const NUMERIC_SERV: Self = NameInfoFlags(libc::NI_NUMERICSERV);

    /// Return only the host part for local hosts.
    pub const NO_FQDN: Self = NameInfoFlags(libc::NI_NOFQDN);

    /// Fail if the host name cannot be determined.
    pub const NAME_REQD: Self = NameInfoFlags(libc::NI_NAMEREQD);

    /// The service is datagram based.
    pub const DGRAM: Self = NameInfoFlags(libc::NI_DGRAM);

    pub fn empty() -> Self {
        NameInfoFlags(0)
    }

    pub fn from_bits(bits: c_int) -> Self {
        NameInfoFlags(bits)
    }

    pub fn bits(self) -> c_int {
        self.0
    }

    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl ops::BitOr for NameInfoFlags {
    type Output = Self;

    fn bitor(self, other: Self) -> Self {
        NameInfoFlags(self.0 | other.0)
    }
}

impl ops::BitOrAssign for NameInfoFlags {
    fn bitor_assign(&mut self, other: Self) {
        self.0 |= other.0
    }
}


//------------ NameInfo ------------------------------------------------------

/// The host and service names for a socket address.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct NameInfo {
    pub host: String,
    pub service: String,
}


//------------ get_name_info -------------------------------------------------

/// Returns the host and service name for a socket address.
pub fn get_name_info(addr: &SocketAddr, flags: NameInfoFlags)
                     -> Result<NameInfo> {
    trace!(%addr, flags = flags.bits(), "getnameinfo");
    let (storage, len) = sockaddr::to_raw(addr);
    unsafe {
        get_name_info_raw(&storage as *const _ as *const libc::sockaddr, len,
                          flags)
    }
}

/// Returns the host and service name for a raw socket address.
///
/// # Safety
///
/// `addr` must point to a valid socket address of `len` bytes.
pub unsafe fn get_name_info_raw(addr: *const libc::sockaddr, len: socklen_t,
                                flags: NameInfoFlags) -> Result<NameInfo> {
    let mut host = [0 as c_char; NI_MAXHOST];
    let mut service = [0 as c_char; NI_MAXSERV];
    let res = libc::getnameinfo(
        addr, len,
        host.as_mut_ptr(), NI_MAXHOST as _,
        service.as_mut_ptr(), NI_MAXSERV as _,
        flags.bits()
    );
    if res != 0 {
        let err = Error::from_gai(res);
        debug!(code = res, error = %err, "getnameinfo failed");
        return Err(err)
    }
    Ok(NameInfo {
        host: CStr::from_ptr(host.as_ptr()).to_string_lossy().into_owned(),
        service: CStr::from_ptr(service.as_ptr()).to_string_lossy()
                                                 .into_owned(),
    })
}


//============ Testing =======================================================

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn numeric_v4() {
        let addr: SocketAddr = "127.0.0.1:8080".parse().unwrap();
        let info = get_name_info(
            &addr, NameInfoFlags::NUMERIC_HOST | NameInfoFlags::NUMERIC_SERV
        ).unwrap();
        assert_eq!(info.host, "127.0.0.1");
        assert_eq!(info.service, "8080");
    }

    #[test]
    fn numeric_v6() {
        let addr: SocketAddr = "[::1]:443".parse().unwrap();
        let info = get_name_info(
            &addr, NameInfoFlags::NUMERIC_HOST | NameInfoFlags::NUMERIC_SERV
        ).unwrap();
        assert_eq!(info.host, "::1");
        assert_eq!(info.service, "443");
    }

    #[test]
    fn numeric_host_with_service_name() {
        // Port 0 has no service entry, so this is numeric either way.
        let addr: SocketAddr = "192.0.2.1:0".parse().unwrap();
        let info = get_name_info(&addr, NameInfoFlags::NUMERIC_HOST)
                        .unwrap();
        assert_eq!(info.host, "192.0.2.1");
        assert_eq!(info.service, "0");
    }

    #[test]
    fn raw_error() {
        let addr: SocketAddr = "127.0.0.1:80".parse().unwrap();
        let (storage, _) = sockaddr::to_raw(&addr);
        let res = unsafe {
            get_name_info_raw(&storage as *const _ as *const libc::sockaddr,
                              0, NameInfoFlags::NUMERIC_HOST)
        };
        match res {
            Err(ref err @ Error::Resolve { .. }) => {
                assert!(err.gai_code().is_some())
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn flags() {
        let mut flags = NameInfoFlags::empty();
        assert!(!flags.contains(NameInfoFlags::NAME_REQD));
        flags |= NameInfoFlags::NAME_REQD;
        assert!(flags.contains(NameInfoFlags::NAME_REQD));
        assert!(!flags.contains(NameInfoFlags::DGRAM));
        assert_eq!(NameInfoFlags::from_bits(flags.bits()), flags);
        assert_eq!(NameInfoFlags::default(), NameInfoFlags::empty());
    }
}
