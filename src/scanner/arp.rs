//! ARP sweep discovery.
//!
//! Broadcasts one ARP request per address in the scan range over a raw
//! datalink channel and collects replies until a deadline. Requires an
//! elevated process; the privilege gate lives in the session, this module
//! only maps channel-open failures to the capability error.
//!
//! `pnet`'s datalink API is blocking, so the sweep runs on the blocking
//! thread pool and the async trait impl wraps it.

use crate::error::{ScanError, ScanResult};
use crate::scanner::traits::Discoverer;
use crate::types::{dedupe_last_wins, HostRecord, MacAddress, ScanRange};
use async_trait::async_trait;
use pnet::datalink::{self, Channel, Config, NetworkInterface};
use pnet::packet::arp::{ArpHardwareTypes, ArpOperations, ArpPacket, MutableArpPacket};
use pnet::packet::ethernet::{EtherTypes, EthernetPacket, MutableEthernetPacket};
use pnet::packet::{MutablePacket, Packet};
use pnet::util::MacAddr;
use std::net::{IpAddr, Ipv4Addr};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

const ETHERNET_HEADER_LEN: usize = 14;
const ARP_PACKET_LEN: usize = 28;
const CHANNEL_READ_TIMEOUT: Duration = Duration::from_millis(50);

/// ARP sweep implementation of [`Discoverer`].
pub struct ArpDiscoverer {
    reply_wait: Duration,
}

impl ArpDiscoverer {
    /// Create a discoverer that listens for replies for `reply_wait` after
    /// the requests go out.
    pub fn new(reply_wait: Duration) -> Self {
        Self { reply_wait }
    }
}

#[async_trait]
impl Discoverer for ArpDiscoverer {
    async fn discover(&self, range: ScanRange) -> ScanResult<Vec<HostRecord>> {
        let wait = self.reply_wait;
        tokio::task::spawn_blocking(move || sweep(range, wait))
            .await
            .map_err(|e| ScanError::DiscoveryFailed(format!("sweep task panicked: {e}")))?
    }
}

/// Run the blocking sweep: open a channel, flood requests, collect replies.
fn sweep(range: ScanRange, reply_wait: Duration) -> ScanResult<Vec<HostRecord>> {
    let interface = select_interface(&range)?;
    let src_mac = interface
        .mac
        .ok_or_else(|| ScanError::DiscoveryFailed(format!("{} has no MAC address", interface.name)))?;
    let src_ip = interface_ipv4(&interface)
        .ok_or_else(|| ScanError::DiscoveryFailed(format!("{} has no IPv4 address", interface.name)))?;

    let config = Config {
        read_timeout: Some(CHANNEL_READ_TIMEOUT),
        ..Default::default()
    };

    let (mut tx, mut rx) = match datalink::channel(&interface, config) {
        Ok(Channel::Ethernet(tx, rx)) => (tx, rx),
        Ok(_) => {
            return Err(ScanError::CapabilityUnavailable(format!(
                "{} does not provide an ethernet channel",
                interface.name
            )))
        }
        Err(e) => {
            // Channel creation failing (permissions, unsupported platform,
            // missing capture driver) means the mechanism itself is absent.
            return Err(ScanError::CapabilityUnavailable(e.to_string()));
        }
    };

    debug!(interface = %interface.name, %range, "sending ARP requests");
    for target in range.hosts() {
        let packet = build_arp_request(src_mac, src_ip, target)?;
        if let Some(Err(e)) = tx.send_to(&packet, None) {
            warn!(%target, error = %e, "failed to send ARP request");
        }
    }

    let mut found = Vec::new();
    let deadline = Instant::now() + reply_wait;
    while Instant::now() < deadline {
        match rx.next() {
            Ok(frame) => {
                if let Some((ip, mac)) = parse_arp_reply(frame, &range) {
                    found.push(HostRecord::new(ip, mac));
                }
            }
            // Read timeouts just give us a chance to re-check the deadline.
            Err(_) => continue,
        }
    }

    debug!(replies = found.len(), "ARP sweep finished");
    Ok(dedupe_last_wins(found))
}

/// Pick the interface that owns the scan range, or the first usable one.
fn select_interface(range: &ScanRange) -> ScanResult<NetworkInterface> {
    let interfaces = datalink::interfaces();

    let usable = |intf: &NetworkInterface| {
        intf.is_up() && !intf.is_loopback() && intf.mac.is_some() && interface_ipv4(intf).is_some()
    };

    interfaces
        .iter()
        .find(|intf| {
            usable(intf)
                && interface_ipv4(intf).map_or(false, |ip| range.contains(ip))
        })
        .or_else(|| interfaces.iter().find(|intf| usable(intf)))
        .cloned()
        .ok_or_else(|| ScanError::DiscoveryFailed("no usable network interface found".to_string()))
}

fn interface_ipv4(intf: &NetworkInterface) -> Option<Ipv4Addr> {
    intf.ips.iter().find_map(|net| match net.ip() {
        IpAddr::V4(ip) => Some(ip),
        IpAddr::V6(_) => None,
    })
}

/// Build a broadcast ARP request frame for one target address.
fn build_arp_request(src_mac: MacAddr, src_ip: Ipv4Addr, target: Ipv4Addr) -> ScanResult<Vec<u8>> {
    let mut buffer = vec![0u8; ETHERNET_HEADER_LEN + ARP_PACKET_LEN];

    let mut ethernet = MutableEthernetPacket::new(&mut buffer)
        .ok_or_else(|| ScanError::DiscoveryFailed("ethernet frame buffer too small".to_string()))?;
    ethernet.set_destination(MacAddr::broadcast());
    ethernet.set_source(src_mac);
    ethernet.set_ethertype(EtherTypes::Arp);

    let mut arp = MutableArpPacket::new(ethernet.payload_mut())
        .ok_or_else(|| ScanError::DiscoveryFailed("ARP packet buffer too small".to_string()))?;
    arp.set_hardware_type(ArpHardwareTypes::Ethernet);
    arp.set_protocol_type(EtherTypes::Ipv4);
    arp.set_hw_addr_len(6);
    arp.set_proto_addr_len(4);
    arp.set_operation(ArpOperations::Request);
    arp.set_sender_hw_addr(src_mac);
    arp.set_sender_proto_addr(src_ip);
    arp.set_target_hw_addr(MacAddr::zero());
    arp.set_target_proto_addr(target);

    Ok(buffer)
}

/// Extract (sender IP, sender MAC) from a frame if it is an ARP reply from
/// inside the swept range.
fn parse_arp_reply(frame: &[u8], range: &ScanRange) -> Option<(Ipv4Addr, MacAddress)> {
    let ethernet = EthernetPacket::new(frame)?;
    if ethernet.get_ethertype() != EtherTypes::Arp {
        return None;
    }

    let arp = ArpPacket::new(ethernet.payload())?;
    if arp.get_operation() != ArpOperations::Reply {
        return None;
    }

    let sender_ip = arp.get_sender_proto_addr();
    if !range.contains(sender_ip) {
        return None;
    }

    Some((sender_ip, MacAddress::from(arp.get_sender_hw_addr())))
}
