//! Conversion between std socket addresses and the system's `sockaddr`.

use std::{mem, ptr};
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr, SocketAddrV4, SocketAddrV6};
use libc::{c_int, sockaddr, sockaddr_in, sockaddr_in6, sockaddr_storage,
           socklen_t};
use super::error::{Error, Result};


/// Converts a socket address into a `sockaddr_storage` and its length.
pub fn to_raw(addr: &SocketAddr) -> (sockaddr_storage, socklen_t) {
    let mut storage: sockaddr_storage = unsafe { mem::zeroed() };
    let len = match *addr {
        SocketAddr::V4(ref addr) => {
            let sin = unsafe {
                &mut *(&mut storage as *mut _ as *mut sockaddr_in)
            };
            sin.sin_family = libc::AF_INET as libc::sa_family_t;
            sin.sin_port = addr.port().to_be();
            sin.sin_addr = libc::in_addr {
                s_addr: u32::from_ne_bytes(addr.ip().octets())
            };
            set_len(sin_len(sin), mem::size_of::<sockaddr_in>());
            mem::size_of::<sockaddr_in>()
        }
        SocketAddr::V6(ref addr) => {
            let sin6 = unsafe {
                &mut *(&mut storage as *mut _ as *mut sockaddr_in6)
            };
            sin6.sin6_family = libc::AF_INET6 as libc::sa_family_t;
            sin6.sin6_port = addr.port().to_be();
            sin6.sin6_flowinfo = addr.flowinfo();
            sin6.sin6_addr = libc::in6_addr { s6_addr: addr.ip().octets() };
            sin6.sin6_scope_id = addr.scope_id();
            set_len(sin6_len(sin6), mem::size_of::<sockaddr_in6>());
            mem::size_of::<sockaddr_in6>()
        }
    };
    (storage, len as socklen_t)
}

/// Converts a `sockaddr_storage` back into a std socket address.
pub fn from_raw(storage: &sockaddr_storage) -> Result<SocketAddr> {
    match storage.ss_family as c_int {
        libc::AF_INET => {
            let sin = unsafe {
                &*(storage as *const _ as *const sockaddr_in)
            };
            Ok(SocketAddr::V4(SocketAddrV4::new(
                Ipv4Addr::from(sin.sin_addr.s_addr.to_ne_bytes()),
                u16::from_be(sin.sin_port),
            )))
        }
        libc::AF_INET6 => {
            let sin6 = unsafe {
                &*(storage as *const _ as *const sockaddr_in6)
            };
            Ok(SocketAddr::V6(SocketAddrV6::new(
                Ipv6Addr::from(sin6.sin6_addr.s6_addr),
                u16::from_be(sin6.sin6_port),
                sin6.sin6_flowinfo,
                sin6.sin6_scope_id,
            )))
        }
        af => Err(Error::UnknownFamily(af))
    }
}

/// Copies a system-owned address into a `sockaddr_storage`.
///
/// At most `size_of::<sockaddr_storage>()` bytes are copied.
///
/// # Safety
///
/// `addr` must point to at least `len` readable bytes.
pub unsafe fn from_ptr(addr: *const sockaddr, len: socklen_t)
                       -> sockaddr_storage {
    let mut storage: sockaddr_storage = mem::zeroed();
    let len = (len as usize).min(mem::size_of::<sockaddr_storage>());
    if !addr.is_null() {
        ptr::copy_nonoverlapping(addr as *const u8,
                                 &mut storage as *mut _ as *mut u8, len);
    }
    storage
}


//------------ Length fields -------------------------------------------------
//
// The BSDs carry the length of the address in the structure itself.

#[cfg(any(target_os = "macos", target_os = "ios", target_os = "freebsd",
          target_os = "openbsd", target_os = "netbsd",
          target_os = "dragonfly"))]
fn sin_len(sin: &mut sockaddr_in) -> Option<&mut u8> {
    Some(&mut sin.sin_len)
}

#[cfg(any(target_os = "macos", target_os = "ios", target_os = "freebsd",
          target_os = "openbsd", target_os = "netbsd",
          target_os = "dragonfly"))]
fn sin6_len(sin6: &mut sockaddr_in6) -> Option<&mut u8> {
    Some(&mut sin6.sin6_len)
}

#[cfg(not(any(target_os = "macos", target_os = "ios", target_os = "freebsd",
              target_os = "openbsd", target_os = "netbsd",
              target_os = "dragonfly")))]
fn sin_len(_sin: &mut sockaddr_in) -> Option<&mut u8> {
    None
}

#[cfg(not(any(target_os = "macos", target_os = "ios", target_os = "freebsd",
              target_os = "openbsd", target_os = "netbsd",
              target_os = "dragonfly")))]
fn sin6_len(_sin6: &mut sockaddr_in6) -> Option<&mut u8> {
    None
}

fn set_len(field: Option<&mut u8>, len: usize) {
    if let Some(field) = field {
        *field = len as u8;
    }
}


//============ Testing =======================================================

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn v4() {
        let addr: SocketAddr = "192.0.2.7:8080".parse().unwrap();
        let (storage, len) = to_raw(&addr);
        assert_eq!(len as usize, mem::size_of::<sockaddr_in>());
        assert_eq!(storage.ss_family as c_int, libc::AF_INET);
        let sin = unsafe { &*(&storage as *const _ as *const sockaddr_in) };
        assert_eq!(sin.sin_port, 8080u16.to_be());
        assert_eq!(sin.sin_addr.s_addr.to_ne_bytes(), [192, 0, 2, 7]);
        assert_eq!(from_raw(&storage).unwrap(), addr);
    }

    #[test]
    fn v6_keeps_scope() {
        let addr = SocketAddr::V6(SocketAddrV6::new(
            "fe80::1".parse().unwrap(), 53, 0, 3
        ));
        let (storage, len) = to_raw(&addr);
        assert_eq!(len as usize, mem::size_of::<sockaddr_in6>());
        assert_eq!(from_raw(&storage).unwrap(), addr);
    }

    #[test]
    fn unknown_family() {
        let mut storage: sockaddr_storage = unsafe { mem::zeroed() };
        storage.ss_family = libc::AF_UNIX as libc::sa_family_t;
        match from_raw(&storage) {
            Err(Error::UnknownFamily(af)) => assert_eq!(af, libc::AF_UNIX),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn copy_from_pointer() {
        let addr: SocketAddr = "127.0.0.1:22".parse().unwrap();
        let (storage, len) = to_raw(&addr);
        let copy = unsafe {
            from_ptr(&storage as *const _ as *const sockaddr, len)
        };
        assert_eq!(from_raw(&copy).unwrap(), addr);
    }
}
