//! Loopback capture — a fake device answers one request and the response is
//! printed as a tagged scan event.
//!
//! Run with:
//!   cargo run --example capture

use std::io::Read;
use std::net::{TcpListener, TcpStream};

use mbgrab::event::{ModbusEvent, TaggedEvent};
use mbgrab::frame::{FunctionCode, ModbusRequest, RequestWriter, ResponseReader};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let listener = TcpListener::bind("127.0.0.1:0")?;
    let addr = listener.local_addr()?;

    let device = std::thread::spawn(move || -> std::io::Result<()> {
        let (mut conn, _) = listener.accept()?;
        let mut request = [0u8; 11];
        conn.read_exact(&mut request)?;

        // Answer with "illegal function" for whatever was asked.
        let reply = ModbusRequest::new(FunctionCode(request[7] | 0x80), vec![0x01]);
        RequestWriter::new(&conn)
            .send(&reply)
            .map_err(std::io::Error::other)
    });

    let stream = TcpStream::connect(addr)?;
    let request =
        ModbusRequest::new(FunctionCode::ENCAPSULATED_INTERFACE, vec![0x0E, 0x01, 0x00]);
    RequestWriter::new(&stream).send(&request)?;

    let response = ResponseReader::new(&stream).read_response()?;
    if let Some(exception) = response.exception() {
        eprintln!(
            "exception {} for function {}",
            exception.exception_type, exception.function
        );
    }

    let event = ModbusEvent::from(response);
    let tagged = TaggedEvent::from_event(&event)?;
    println!("{}: {}", tagged.type_name, tagged.data);

    device.join().map_err(|_| "device thread panicked")??;
    Ok(())
}
