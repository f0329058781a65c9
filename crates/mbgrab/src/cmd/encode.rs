use mbgrab_frame::{FunctionCode, ModbusRequest, RequestWriter};

use crate::cmd::{parse_hex, CodecArgs, EncodeArgs};
use crate::exit::{frame_error, CliResult, SUCCESS};
use crate::output::{print_frame, OutputFormat};

pub fn run(args: EncodeArgs, codec: &CodecArgs, format: OutputFormat) -> CliResult<i32> {
    let frame = encode(&args, codec)?;
    print_frame(&frame, format);
    Ok(SUCCESS)
}

fn encode(args: &EncodeArgs, codec: &CodecArgs) -> CliResult<Vec<u8>> {
    let request = ModbusRequest::new(FunctionCode(args.function), parse_hex(&args.data)?);
    let mut writer = RequestWriter::with_config(Vec::new(), codec.to_config()?);
    writer
        .send(&request)
        .map_err(|err| frame_error("encode failed", err))?;
    Ok(writer.into_inner())
}
