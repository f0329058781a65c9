use std::io::{IsTerminal, Write};

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use mbgrab_event::{ModbusEvent, TaggedEvent};
use mbgrab_frame::ModbusException;
use serde::Serialize;

use crate::exit::{event_error, CliResult};

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
    Raw,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

#[derive(Serialize)]
struct ExceptionOutput {
    function: u8,
    exception_type: u8,
}

#[derive(Serialize)]
struct CaptureOutput<'a> {
    #[serde(flatten)]
    event: TaggedEvent,
    #[serde(skip_serializing_if = "Option::is_none")]
    exception: Option<ExceptionOutput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    peer: Option<&'a str>,
}

/// Print a captured response.
pub fn print_event(
    event: &ModbusEvent,
    exception: Option<ModbusException>,
    peer: Option<&str>,
    format: OutputFormat,
) -> CliResult<()> {
    match format {
        OutputFormat::Json => {
            let out = CaptureOutput {
                event: TaggedEvent::from_event(event)
                    .map_err(|err| event_error("encode event failed", err))?,
                exception: exception.map(|e| ExceptionOutput {
                    function: e.function.as_u8(),
                    exception_type: e.exception_type.as_u8(),
                }),
                peer,
            };
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["FUNCTION", "EXCEPTION", "SIZE", "PEER", "RESPONSE"])
                .add_row(vec![
                    event.function.to_string(),
                    exception_label(exception),
                    event.response.len().to_string(),
                    peer.unwrap_or("-").to_string(),
                    hex::encode(&event.response),
                ]);
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!(
                "function={} exception={} size={} peer={} response={}",
                event.function,
                exception_label(exception),
                event.response.len(),
                peer.unwrap_or("-"),
                hex::encode(&event.response)
            );
        }
        OutputFormat::Raw => {
            print_raw(&event.response);
        }
    }
    Ok(())
}

/// Print an encoded request frame.
pub fn print_frame(frame: &[u8], format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({ "frame": hex::encode(frame), "size": frame.len() })
            );
        }
        OutputFormat::Table | OutputFormat::Pretty => {
            println!("{}", hex::encode(frame));
        }
        OutputFormat::Raw => print_raw(frame),
    }
}

pub fn print_raw(data: &[u8]) {
    let mut out = std::io::stdout();
    let _ = out.write_all(data);
    let _ = out.flush();
}

fn exception_label(exception: Option<ModbusException>) -> String {
    match exception {
        Some(e) => format!("{} ({})", e.exception_type, e.function),
        None => "-".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use mbgrab_frame::{ExceptionCode, ExceptionFunctionCode};

    use super::*;

    #[test]
    fn exception_label_formats_codes() {
        let exception = ModbusException {
            function: ExceptionFunctionCode(0xAB),
            exception_type: ExceptionCode(0x01),
        };
        assert_eq!(exception_label(Some(exception)), "0x01 (0xab)");
        assert_eq!(exception_label(None), "-");
    }
}
