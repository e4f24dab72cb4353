//! The host name and IP address database.
//!
//! This database provides queries for host names and IP addresses associated
//! with network hosts. It allows lookups based on a given host name or a
//! given IP address. All lookups are answered by the system resolver, so
//! they consider whatever sources the system is configured to use.

use std::mem;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use futures::{Async, Future, Poll};
use tracing::debug;
use super::addrinfo::{get_addr_info, AddrInfoFlags, AddrInfoHints, SockType};
use super::error::{Error, Result};
use super::nameinfo::{get_name_info, NameInfoFlags};


//============ Low-level API =================================================
//
// Currently private.

mod system;


//============ High-level API ================================================

/// Returns host information for a given host name.
///
/// The name is either a hostname, an IPv4 or IPv6 address in its standard
/// text notation. In the latter two cases, no lookups are performed and a
/// `HostEnt` is returned with `name` as the canonical name, the parsed
/// address as the sole address, and no aliases.
///
/// Otherwise the name is handed to the system resolver. Upon success, the
/// function returns a `HostEnt` value if a host for the given name was
/// found or `Ok(None)` if the resolver reports that there is no such name.
///
/// # Limitations
///
/// The system resolver does not report aliases, so the aliases list of the
/// returned `HostEnt` is always empty.
pub fn get_host_by_name(name: &str) -> Result<Option<HostEnt>> {
    if let Some(ent) = HostEnt::from_literal(name) {
        return Ok(Some(ent))
    }
    lookup_host_by_name(name)
}

/// Returns host information for a given IP address.
///
/// The IP address can either be an IPv4 or IPv6 address. Upon success, the
/// function returns a `HostEnt` value if a host for the given address was
/// found or `Ok(None)` otherwise.
pub fn get_host_by_addr(addr: IpAddr) -> Result<Option<HostEnt>> {
    let sock = SocketAddr::new(addr, 0);
    match get_name_info(&sock, NameInfoFlags::NAME_REQD) {
        Ok(info) => Ok(Some(HostEnt {
            name: info.host,
            aliases: Vec::new(),
            addrs: vec![addr],
        })),
        Err(ref err) if err.is_not_found() => {
            debug!(%addr, "no host name for address");
            Ok(None)
        }
        Err(err) => Err(err)
    }
}

/// Returns host information for a given host name.
///
/// This is the asynchronous version of `get_host_by_name()`. Literal
/// addresses resolve right away. For all other names, the returned future
/// waits for a worker thread performing the lookup.
pub fn poll_host_by_name(name: &str) -> HostByName {
    HostByName::new(name)
}

/// Returns host information for a given IP address.
///
/// This is the asynchronous version of `get_host_by_addr()`. The returned
/// future waits for a worker thread performing the lookup.
pub fn poll_host_by_addr(addr: IpAddr) -> HostByAddr {
    HostByAddr::new(addr)
}


fn lookup_host_by_name(name: &str) -> Result<Option<HostEnt>> {
    let hints = AddrInfoHints::new().flags(AddrInfoFlags::CANON_NAME)
                                    .socktype(SockType::Stream);
    let iter = match get_addr_info(Some(name), None, Some(&hints)) {
        Ok(iter) => iter,
        Err(ref err) if err.is_not_found() => {
            debug!(host = name, "no such host");
            return Ok(None)
        }
        Err(err) => return Err(err)
    };
    let mut canonical = None;
    let mut addrs = Vec::new();
    for info in iter {
        let info = match info {
            Ok(info) => info,
            Err(Error::UnknownFamily(_)) => continue,
            Err(err) => return Err(err)
        };
        if canonical.is_none() {
            canonical = info.canonical_name;
        }
        let addr = info.address.ip();
        if !addrs.contains(&addr) {
            addrs.push(addr)
        }
    }
    if addrs.is_empty() {
        return Ok(None)
    }
    Ok(Some(HostEnt {
        name: canonical.unwrap_or_else(|| name.into()),
        aliases: Vec::new(),
        addrs,
    }))
}


//------------ HostEnt -------------------------------------------------------

/// The result of a host lookup.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct HostEnt {
    name: String,
    aliases: Vec<String>,
    addrs: Vec<IpAddr>,
}

impl HostEnt {
    /// Returns an entry for a name that is an address literal.
    fn from_literal(name: &str) -> Option<Self> {
        IpAddr::from_str(name).ok().map(|addr| HostEnt {
            name: name.into(),
            aliases: Vec::new(),
            addrs: vec![addr],
        })
    }

    /// The canonical name of the host.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The aliases of the host.
    pub fn aliases(&self) -> &[String] {
        self.aliases.as_ref()
    }

    /// The addresses of the host.
    pub fn addrs(&self) -> &[IpAddr] {
        self.addrs.as_ref()
    }
}


//------------ HostByName ----------------------------------------------------

/// The future returned by `poll_host_by_name()`.
///
/// Resolves into a `HostEnt` value if the lookup is successful or `None` if
/// there is no such name.
pub struct HostByName(ByNameInner);

enum ByNameInner {
    Literal(HostEnt),
    System(system::Blocking<Option<HostEnt>>),
    Error(Error),
    Done,
}

impl HostByName {
    pub fn new(name: &str) -> Self {
        if let Some(ent) = HostEnt::from_literal(name) {
            return HostByName(ByNameInner::Literal(ent))
        }
        let name = name.to_owned();
        HostByName(
            match system::Blocking::spawn("host-by-name", move || {
                lookup_host_by_name(&name)
            }) {
                Ok(lookup) => ByNameInner::System(lookup),
                Err(err) => ByNameInner::Error(err),
            }
        )
    }
}

impl Future for HostByName {
    type Item = Option<HostEnt>;
    type Error = Error;

    fn poll(&mut self) -> Poll<Self::Item, Self::Error> {
        if let ByNameInner::System(ref mut lookup) = self.0 {
            let res = lookup.poll();
            if let Ok(Async::NotReady) = res {
                return res
            }
            self.0 = ByNameInner::Done;
            return res
        }
        match mem::replace(&mut self.0, ByNameInner::Done) {
            ByNameInner::Literal(ent) => Ok(Async::Ready(Some(ent))),
            ByNameInner::Error(err) => Err(err),
            ByNameInner::Done => panic!("polling a resolved HostByName"),
            ByNameInner::System(_) => unreachable!(),
        }
    }
}


//------------ HostByAddr ----------------------------------------------------

/// The future returned by `poll_host_by_addr()`.
///
/// Resolves into a `HostEnt` value if the lookup is successful or `None` if
/// there is no such address.
pub struct HostByAddr(ByAddrInner);

enum ByAddrInner {
    System(system::Blocking<Option<HostEnt>>),
    Error(Error),
    Done,
}

impl HostByAddr {
    pub fn new(addr: IpAddr) -> Self {
        HostByAddr(
            match system::Blocking::spawn("host-by-addr", move || {
                get_host_by_addr(addr)
            }) {
                Ok(lookup) => ByAddrInner::System(lookup),
                Err(err) => ByAddrInner::Error(err),
            }
        )
    }
}

impl Future for HostByAddr {
    type Item = Option<HostEnt>;
    type Error = Error;

    fn poll(&mut self) -> Poll<Self::Item, Self::Error> {
        if let ByAddrInner::System(ref mut lookup) = self.0 {
            let res = lookup.poll();
            if let Ok(Async::NotReady) = res {
                return res
            }
            self.0 = ByAddrInner::Done;
            return res
        }
        match mem::replace(&mut self.0, ByAddrInner::Done) {
            ByAddrInner::Error(err) => Err(err),
            ByAddrInner::Done => panic!("polling a resolved HostByAddr"),
            ByAddrInner::System(_) => unreachable!(),
        }
    }
}


//============ Testing =======================================================

#[cfg(test)]
mod test {
    use super::*;
    use std::net::{Ipv4Addr, Ipv6Addr};

    #[test]
    fn literal_v4() {
        let ent = get_host_by_name("192.0.2.1").unwrap().unwrap();
        assert_eq!(ent.name(), "192.0.2.1");
        assert!(ent.aliases().is_empty());
        assert_eq!(ent.addrs(), &[IpAddr::V4(Ipv4Addr::new(192, 0, 2, 1))]);
    }

    #[test]
    fn literal_v6() {
        let ent = get_host_by_name("::1").unwrap().unwrap();
        assert_eq!(ent.name(), "::1");
        assert_eq!(ent.addrs(), &[IpAddr::V6(Ipv6Addr::LOCALHOST)]);
    }

    #[test]
    fn localhost() {
        let ent = get_host_by_name("localhost").unwrap().unwrap();
        assert!(!ent.name().is_empty());
        assert!(!ent.addrs().is_empty());
        assert!(ent.addrs().iter().all(IpAddr::is_loopback));
        let mut addrs = ent.addrs().to_vec();
        addrs.dedup();
        assert_eq!(addrs.len(), ent.addrs().len());
    }

    #[test]
    fn unknown_name() {
        // .invalid is reserved and never resolves.
        match get_host_by_name("no-such-host.invalid") {
            Ok(None) => { }
            Ok(Some(ent)) => panic!("unexpected host {:?}", ent),
            // Without a working resolver, this may be a temporary failure.
            Err(err) => assert!(err.gai_code().is_some()),
        }
    }

    #[test]
    fn loopback_address() {
        let addr = IpAddr::V4(Ipv4Addr::LOCALHOST);
        let ent = get_host_by_addr(addr).unwrap().unwrap();
        assert!(!ent.name().is_empty());
        assert_eq!(ent.addrs(), &[addr]);
    }

    #[test]
    fn unnamed_address() {
        // 192.0.2.0/24 is reserved for documentation and has no names.
        let addr: IpAddr = "192.0.2.77".parse().unwrap();
        match get_host_by_addr(addr) {
            Ok(None) => { }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn poll_literal() {
        let ent = poll_host_by_name("10.0.0.1").wait().unwrap().unwrap();
        assert_eq!(ent.addrs(), &[IpAddr::V4(Ipv4Addr::new(10, 0, 0, 1))]);
    }

    #[test]
    fn poll_localhost() {
        let ent = poll_host_by_name("localhost").wait().unwrap().unwrap();
        assert!(ent.addrs().iter().all(IpAddr::is_loopback));
    }

    #[test]
    fn poll_loopback_address() {
        let addr = IpAddr::V4(Ipv4Addr::LOCALHOST);
        let sync = get_host_by_addr(addr).unwrap();
        let async_ = poll_host_by_addr(addr).wait().unwrap();
        assert_eq!(sync, async_);
    }
}
