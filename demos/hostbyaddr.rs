use std::env;
use std::net::IpAddr;
use std::str::FromStr;
use futures::Future;
use netdb_sys::hosts::poll_host_by_addr;
use tracing_subscriber::EnvFilter;

fn main() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init();

    let mut args = env::args();
    let cmd = args.next().unwrap_or_else(|| "hostbyaddr".into());
    let addr = match args.next() {
        None => {
            println!("Usage: {} <addr>", cmd);
            return;
        }
        Some(addr) => addr
    };

    let addr = match IpAddr::from_str(&addr) {
        Ok(addr) => addr,
        Err(err) => {
            println!("Not an address: {}", err);
            return;
        }
    };

    match poll_host_by_addr(addr).wait() {
        Ok(Some(ent)) => {
            println!("{}", addr);
            println!("  {}", ent.name());
            println!("  Addresses:");
            for addr in ent.addrs() {
                println!("     {}", addr);
            }
        }
        Ok(None) => println!("Not found."),
        Err(err) => println!("Error: {}", err),
    }
}
