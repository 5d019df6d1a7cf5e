//! OSC 1.0 messages for slot output.

use crate::config::OutputConfig;
use crate::slots::FrameOutput;

/// A single OSC argument.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OscArg {
    Float(f32),
    Int(i32),
}

impl OscArg {
    fn type_tag(&self) -> u8 {
        match self {
            OscArg::Float(_) => b'f',
            OscArg::Int(_) => b'i',
        }
    }
}

/// An addressed tuple of arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct OscMessage {
    pub address: String,
    pub args: Vec<OscArg>,
}

impl OscMessage {
    pub fn new(address: impl Into<String>, args: Vec<OscArg>) -> Self {
        Self {
            address: address.into(),
            args,
        }
    }

    /// Encode as an OSC packet: padded address, padded type tag string,
    /// then big-endian arguments.
    pub fn encode(&self) -> Vec<u8> {
        let mut packet = Vec::with_capacity(self.address.len() + 8 + self.args.len() * 5);

        write_padded_str(&mut packet, self.address.as_bytes());

        let mut tags = Vec::with_capacity(self.args.len() + 1);
        tags.push(b',');
        tags.extend(self.args.iter().map(OscArg::type_tag));
        write_padded_str(&mut packet, &tags);

        for arg in &self.args {
            match *arg {
                OscArg::Float(v) => packet.extend_from_slice(&v.to_be_bytes()),
                OscArg::Int(v) => packet.extend_from_slice(&v.to_be_bytes()),
            }
        }
        packet
    }
}

/// NUL-terminate and pad to a multiple of four bytes.
fn write_padded_str(packet: &mut Vec<u8>, bytes: &[u8]) {
    packet.extend_from_slice(bytes);
    let pad = 4 - bytes.len() % 4;
    packet.extend(std::iter::repeat_n(0u8, pad));
}

/// Messages for one frame: `<base_path>/<n>` with `(x, y, size)` for every
/// slot (1-based), followed by the active count on `count_path`.
pub fn frame_messages(output: &FrameOutput, addressing: &OutputConfig) -> Vec<OscMessage> {
    let mut messages: Vec<OscMessage> = output
        .slots
        .iter()
        .map(|slot| {
            let [x, y, size] = slot.value;
            OscMessage::new(
                addressing.slot_address(slot.index),
                vec![OscArg::Float(x), OscArg::Float(y), OscArg::Float(size)],
            )
        })
        .collect();

    let count = i32::try_from(output.active_count).unwrap_or(i32::MAX);
    messages.push(OscMessage::new(
        addressing.count_path.clone(),
        vec![OscArg::Int(count)],
    ));
    messages
}
