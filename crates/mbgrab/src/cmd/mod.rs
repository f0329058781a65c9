use clap::{Args, Subcommand};
use std::path::PathBuf;

use mbgrab_frame::{CodecConfig, PayloadExtent, DEFAULT_SCRATCH_CAPACITY};

use crate::exit::{CliError, CliResult, USAGE};
use crate::output::OutputFormat;

pub mod decode;
pub mod encode;
pub mod probe;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Encode a request frame and print it.
    Encode(EncodeArgs),
    /// Decode one captured response from a file or stdin.
    Decode(DecodeArgs),
    /// Send one request to a TCP endpoint and capture the response.
    Probe(ProbeArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, codec: &CodecArgs, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Encode(args) => encode::run(args, codec, format),
        Command::Decode(args) => decode::run(args, codec, format),
        Command::Probe(args) => probe::run(args, codec, format),
        Command::Version(args) => version::run(args),
    }
}

/// Frame codec settings shared by every subcommand.
#[derive(Args, Debug)]
pub struct CodecArgs {
    /// Header marker as 8 hex digits.
    #[arg(
        long,
        value_name = "HEX",
        default_value = "13370000",
        env = "MBGRAB_MARKER",
        global = true
    )]
    pub marker: String,
    /// Decode scratch buffer size in bytes.
    #[arg(
        long,
        value_name = "BYTES",
        default_value_t = DEFAULT_SCRATCH_CAPACITY,
        global = true
    )]
    pub scratch: usize,
    /// Stop reading at the declared frame length instead of keeping trailing bytes.
    #[arg(long, global = true)]
    pub declared_only: bool,
}

impl CodecArgs {
    pub fn to_config(&self) -> CliResult<CodecConfig> {
        let marker = parse_hex(&self.marker)?;
        let marker: [u8; 4] = marker.try_into().map_err(|bytes: Vec<u8>| {
            CliError::new(USAGE, format!("marker must be 4 bytes, got {}", bytes.len()))
        })?;

        let payload_extent = if self.declared_only {
            PayloadExtent::Declared
        } else {
            PayloadExtent::Received
        };

        Ok(CodecConfig {
            marker,
            scratch_capacity: self.scratch,
            payload_extent,
        })
    }
}

#[derive(Args, Debug)]
pub struct EncodeArgs {
    /// Function code (decimal or 0x-prefixed hex).
    #[arg(long, short = 'f', value_parser = parse_byte)]
    pub function: u8,
    /// Payload as hex digits.
    #[arg(long, short = 'd', default_value = "")]
    pub data: String,
}

#[derive(Args, Debug)]
pub struct DecodeArgs {
    /// File holding the raw response bytes. Reads stdin when omitted.
    pub file: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct ProbeArgs {
    /// Target address (HOST:PORT).
    pub addr: String,
    /// Function code (decimal or 0x-prefixed hex). Default: encapsulated interface.
    #[arg(long, short = 'f', default_value = "0x2b", value_parser = parse_byte)]
    pub function: u8,
    /// Payload as hex digits. Default: read basic device identification.
    #[arg(long, short = 'd', default_value = "0e0100")]
    pub data: String,
    /// Connect/read/write timeout (e.g. 5s, 500ms).
    #[arg(long, default_value = "5s")]
    pub timeout: String,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}

pub fn parse_byte(input: &str) -> Result<u8, String> {
    let input = input.trim();
    let parsed = match input
        .strip_prefix("0x")
        .or_else(|| input.strip_prefix("0X"))
    {
        Some(digits) => u8::from_str_radix(digits, 16),
        None => input.parse::<u8>(),
    };
    parsed.map_err(|err| format!("invalid byte value {input:?}: {err}"))
}

pub fn parse_hex(input: &str) -> CliResult<Vec<u8>> {
    let cleaned: String = input
        .chars()
        .filter(|c| !c.is_whitespace() && *c != ':')
        .collect();
    hex::decode(&cleaned)
        .map_err(|err| CliError::new(USAGE, format!("invalid hex {input:?}: {err}")))
}
