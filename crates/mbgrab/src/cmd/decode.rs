use std::fs::File;
use std::io::Read;

use mbgrab_event::ModbusEvent;
use mbgrab_frame::{CodecConfig, ModbusException, ResponseReader};

use crate::cmd::{CodecArgs, DecodeArgs};
use crate::exit::{frame_error, io_error, CliResult, SUCCESS};
use crate::output::{print_event, OutputFormat};

pub fn run(args: DecodeArgs, codec: &CodecArgs, format: OutputFormat) -> CliResult<i32> {
    let config = codec.to_config()?;

    let (event, exception) = match &args.file {
        Some(path) => {
            let file = File::open(path)
                .map_err(|err| io_error(&format!("failed opening {}", path.display()), err))?;
            capture(file, config)?
        }
        None => capture(std::io::stdin().lock(), config)?,
    };

    print_event(&event, exception, None, format)?;
    Ok(SUCCESS)
}

type Capture = (ModbusEvent, Option<ModbusException>);

fn capture<R: Read>(stream: R, config: CodecConfig) -> CliResult<Capture> {
    let mut reader = ResponseReader::with_config(stream, config);
    let response = reader
        .read_response()
        .map_err(|err| frame_error("decode failed", err))?;
    let exception = response.exception();
    Ok((ModbusEvent::from(response), exception))
}
