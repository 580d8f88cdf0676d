use std::process;
use std::str::FromStr;

use clap::Parser;

use diggy::dns_parser::{Packet, RRData, ResourceRecord};
use diggy::{ClientConfig, Name, Response, UdpClient};
use log::error;

fn print_records(title: &str, records: &[ResourceRecord]) {
    if records.is_empty() {
        return;
    }
    println!(";; {} SECTION:", title);
    for rr in records {
        match rr.data {
            RRData::A(ref addrs) => {
                for ip in addrs {
                    println!("{}.\t{}\t{}\t{}\t{}", rr.name, rr.ttl, rr.cls, rr.typ(), ip);
                }
            }
            ref data => println!("{}.\t{}\t{}\t{}\t{}", rr.name, rr.ttl, rr.cls, rr.typ(), data),
        }
    }
    println!();
}

fn print_packet(packet: &Packet) {
    let head = &packet.header;
    println!(
        ";; ->>HEADER<<- opcode: {:?}, status: {}, id: {}",
        head.opcode, head.response_code, head.id
    );
    let mut flags = Vec::new();
    if !head.query {
        flags.push("qr");
    }
    if head.authoritative {
        flags.push("aa");
    }
    if head.truncated {
        flags.push("tc");
    }
    if head.recursion_desired {
        flags.push("rd");
    }
    if head.recursion_available {
        flags.push("ra");
    }
    println!(
        ";; flags: {}; QUERY: {}, ANSWER: {}, AUTHORITY: {}, ADDITIONAL: {}",
        flags.join(" "),
        head.questions,
        head.answers,
        head.nameservers,
        head.additional
    );
    println!();

    println!(";; QUESTION SECTION:");
    for q in &packet.questions {
        println!(";{}.\t\t{}\t{}", q.qname, q.qclass, q.qtype);
    }
    println!();

    print_records("ANSWER", &packet.answers);
    print_records("AUTHORITY", &packet.nameservers);
    print_records("ADDITIONAL", &packet.additional);
}

/// Sends one A query to a DNS server and prints the response
#[derive(Debug, Parser)]
#[clap(name = "diggy", version)]
struct Opts {
    /// Server to query: address or hostname, optionally with `:port`
    server: String,

    /// Name to look up
    #[clap(value_parser = Name::from_str)]
    qname: Name,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("diggy=info"))
        .init();

    let opts = Opts::parse();

    let config = match ClientConfig::for_server(&opts.server).await {
        Ok(config) => config,
        Err(err) => {
            error!("{}", err);
            process::exit(2);
        }
    };

    println!("; <<>> diggy <<>> @{} {}", config.server, opts.qname);
    let client = match UdpClient::bind(config) {
        Ok(client) => client,
        Err(err) => {
            error!("{}", err);
            process::exit(1);
        }
    };

    match client.query(&opts.qname, &mut rand::thread_rng()).await {
        Ok(response) => {
            print_packet(response.packet());
            if let Response::NoData(_) = response {
                println!(";; no records received, a recursive lookup may be needed");
            }
        }
        Err(err) => {
            error!("lookup failed: {}", err);
            process::exit(1);
        }
    }
}
