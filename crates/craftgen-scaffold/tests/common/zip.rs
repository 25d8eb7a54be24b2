//! Minimal zip writer for test archives
//!
//! Entries are stored uncompressed, which every `unzip` accepts. Names
//! ending in `/` become directory entries.

use flate2::Crc;

const LOCAL_HEADER_SIG: u32 = 0x0403_4b50;
const CENTRAL_HEADER_SIG: u32 = 0x0201_4b50;
const END_OF_CENTRAL_DIR_SIG: u32 = 0x0605_4b50;

/// Version made by: unix host, spec 2.0
const MADE_BY_UNIX: u16 = (3 << 8) | 20;
const VERSION_NEEDED: u16 = 20;

/// Build a stored zip archive from `(name, contents)` pairs
pub fn stored_zip(entries: &[(&str, &str)]) -> Vec<u8> {
    let mut out = Vec::new();
    let mut central = Vec::new();

    for (name, data) in entries {
        let data = data.as_bytes();
        let offset = out.len() as u32;
        let mut crc = Crc::new();
        crc.update(data);
        let crc = crc.sum();
        let size = data.len() as u32;
        let is_dir = name.ends_with('/');
        let mode: u32 = if is_dir { 0o40755 } else { 0o100644 };

        put_u32(&mut out, LOCAL_HEADER_SIG);
        put_u16(&mut out, VERSION_NEEDED);
        put_u16(&mut out, 0); // flags
        put_u16(&mut out, 0); // stored
        put_u16(&mut out, 0); // mod time
        put_u16(&mut out, 0x21); // mod date: 1980-01-01
        put_u32(&mut out, crc);
        put_u32(&mut out, size);
        put_u32(&mut out, size);
        put_u16(&mut out, name.len() as u16);
        put_u16(&mut out, 0);
        out.extend_from_slice(name.as_bytes());
        out.extend_from_slice(data);

        put_u32(&mut central, CENTRAL_HEADER_SIG);
        put_u16(&mut central, MADE_BY_UNIX);
        put_u16(&mut central, VERSION_NEEDED);
        put_u16(&mut central, 0);
        put_u16(&mut central, 0);
        put_u16(&mut central, 0);
        put_u16(&mut central, 0x21);
        put_u32(&mut central, crc);
        put_u32(&mut central, size);
        put_u32(&mut central, size);
        put_u16(&mut central, name.len() as u16);
        put_u16(&mut central, 0); // extra
        put_u16(&mut central, 0); // comment
        put_u16(&mut central, 0); // disk
        put_u16(&mut central, 0); // internal attrs
        put_u32(&mut central, (mode << 16) | if is_dir { 0x10 } else { 0 });
        put_u32(&mut central, offset);
        central.extend_from_slice(name.as_bytes());
    }

    let central_offset = out.len() as u32;
    let central_size = central.len() as u32;
    out.extend_from_slice(&central);

    put_u32(&mut out, END_OF_CENTRAL_DIR_SIG);
    put_u16(&mut out, 0);
    put_u16(&mut out, 0);
    put_u16(&mut out, entries.len() as u16);
    put_u16(&mut out, entries.len() as u16);
    put_u32(&mut out, central_size);
    put_u32(&mut out, central_offset);
    put_u16(&mut out, 0);

    out
}

fn put_u16(buf: &mut Vec<u8>, value: u16) {
    buf.extend_from_slice(&value.to_le_bytes());
}

fn put_u32(buf: &mut Vec<u8>, value: u32) {
    buf.extend_from_slice(&value.to_le_bytes());
}
