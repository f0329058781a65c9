use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::time::Duration;

use mbgrab_event::ModbusEvent;
use mbgrab_frame::{FunctionCode, ModbusRequest, RequestWriter, ResponseReader};

use crate::cmd::{parse_hex, CodecArgs, ProbeArgs};
use crate::exit::{frame_error, io_error, CliError, CliResult, FAILURE, SUCCESS, USAGE};
use crate::output::{print_event, OutputFormat};

pub fn run(args: ProbeArgs, codec: &CodecArgs, format: OutputFormat) -> CliResult<i32> {
    let timeout = parse_duration(&args.timeout)?;
    let config = codec.to_config()?;
    let request = ModbusRequest::new(FunctionCode(args.function), parse_hex(&args.data)?);

    let addr = resolve(&args.addr)?;
    let stream = TcpStream::connect_timeout(&addr, timeout)
        .map_err(|err| io_error(&format!("connect to {addr} failed"), err))?;
    stream
        .set_read_timeout(Some(timeout))
        .and_then(|()| stream.set_write_timeout(Some(timeout)))
        .map_err(|err| io_error("failed setting socket timeouts", err))?;
    tracing::info!(%addr, function = %request.function, "probing modbus endpoint");

    let mut writer = RequestWriter::with_config(&stream, config.clone());
    writer
        .send(&request)
        .map_err(|err| frame_error("send failed", err))?;

    let mut reader = ResponseReader::with_config(&stream, config);
    let response = reader
        .read_response()
        .map_err(|err| frame_error("receive failed", err))?;

    let exception = response.exception();
    if let Some(exception) = exception {
        tracing::info!(
            function = %exception.function,
            exception_type = %exception.exception_type,
            "endpoint answered with exception"
        );
    }

    let peer = addr.to_string();
    print_event(&ModbusEvent::from(response), exception, Some(&peer), format)?;
    Ok(SUCCESS)
}

fn resolve(addr: &str) -> CliResult<SocketAddr> {
    addr.to_socket_addrs()
        .map_err(|err| CliError::new(USAGE, format!("invalid address {addr}: {err}")))?
        .next()
        .ok_or_else(|| CliError::new(FAILURE, format!("no addresses resolved for {addr}")))
}

fn parse_duration(input: &str) -> CliResult<Duration> {
    let input = input.trim();
    if input.is_empty() {
        return Err(CliError::new(USAGE, "duration must not be empty"));
    }

    let (number, unit) = if let Some(num) = input.strip_suffix("ms") {
        (num, "ms")
    } else if let Some(num) = input.strip_suffix('s') {
        (num, "s")
    } else {
        (input, "s")
    };

    let value: u64 = number
        .parse()
        .map_err(|_| CliError::new(USAGE, format!("invalid duration value: {input}")))?;

    if value == 0 {
        return Err(CliError::new(USAGE, "duration must be greater than zero"));
    }

    Ok(match unit {
        "ms" => Duration::from_millis(value),
        _ => Duration::from_secs(value),
    })
}
