use std::env;
use netdb_sys::hosts::get_host_by_name;
use tracing_subscriber::EnvFilter;

fn main() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init();

    let mut args = env::args();
    let cmd = args.next().unwrap_or_else(|| "hostbyname".into());
    let name = match args.next() {
        None => {
            println!("Usage: {} <hostname>", cmd);
            return;
        }
        Some(name) => name
    };

    match get_host_by_name(&name) {
        Ok(Some(ent)) => {
            println!("{}", ent.name());
            if !ent.aliases().is_empty() {
                println!("  Aliases:");
                for name in ent.aliases() {
                    println!("     {}", name);
                }
            }
            println!("  Addresses:");
            for addr in ent.addrs() {
                println!("     {}", addr);
            }
        }
        Ok(None) => println!("Not found."),
        Err(err) => println!("Error: {}", err),
    }
}
