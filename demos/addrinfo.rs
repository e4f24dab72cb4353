use std::env;
use netdb_sys::{for_each_addr_info, AddrInfoFlags, AddrInfoHints, SockType};
use tracing_subscriber::EnvFilter;

fn main() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init();

    let mut args = env::args();
    let cmd = args.next().unwrap_or_else(|| "addrinfo".into());
    let host = match args.next() {
        None => {
            println!("Usage: {} <hostname> [<service>]", cmd);
            return;
        }
        Some(host) => host
    };
    let service = args.next();

    let hints = AddrInfoHints::new().flags(AddrInfoFlags::CANON_NAME)
                                    .socktype(SockType::Stream);
    let res = for_each_addr_info(
        Some(&host), service.as_deref(), Some(&hints),
        |info| {
            if let Some(ref name) = info.canonical_name {
                println!("{}", name);
            }
            println!("  {} ({:?}, {:?})", info.address, info.family,
                     info.protocol);
            Ok(true)
        }
    );
    if let Err(err) = res {
        println!("Error: {}", err);
    }
}
