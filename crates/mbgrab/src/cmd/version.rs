use crate::cmd::VersionArgs;
use crate::exit::{CliResult, SUCCESS};

pub fn run(args: VersionArgs) -> CliResult<i32> {
    if !args.extended {
        println!("mbgrab {}", env!("CARGO_PKG_VERSION"));
        return Ok(SUCCESS);
    }

    println!("name: mbgrab");
    println!("version: {}", env!("CARGO_PKG_VERSION"));
    println!(
        "target: {}",
        option_env!("MBGRAB_BUILD_TARGET").unwrap_or("unknown")
    );
    println!(
        "header_marker: {}",
        hex::encode(mbgrab_frame::MODBUS_HEADER_MARKER)
    );
    println!(
        "scratch_capacity: {}",
        mbgrab_frame::DEFAULT_SCRATCH_CAPACITY
    );
    println!("event_type: {}", mbgrab_event::CONNECTION_EVENT_MODBUS);

    Ok(SUCCESS)
}
