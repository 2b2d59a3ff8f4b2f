//! Per-platform console write path (spec.md §4.4).
//!
//! Unix writes the formatted UTF-8 bytes directly to stdout. Windows has
//! no reliable raw UTF-8 console write, so the worker's pre-allocated
//! UTF-16 scratch buffer is used to transcode the line by hand and the
//! transcoded buffer is handed to the system console-write call.

/// Write a formatted line to the console, using `utf16_scratch` as
/// transcoding space on Windows (ignored on other platforms).
///
/// Never allocates: the Windows path truncates with `...` rather than
/// growing `utf16_scratch`, matching the worker buffers' "sized once at
/// construction" contract (spec.md §4.3).
pub fn write_console(bytes: &[u8], utf16_scratch: &mut [u16]) {
    #[cfg(windows)]
    {
        write_console_windows(bytes, utf16_scratch);
    }
    #[cfg(not(windows))]
    {
        let _ = utf16_scratch;
        write_console_unix(bytes);
    }
}

#[cfg(not(windows))]
fn write_console_unix(bytes: &[u8]) {
    use std::io::Write;

    let stdout = std::io::stdout();
    let mut lock = stdout.lock();
    let _ = lock.write_all(bytes);
}

#[cfg(windows)]
fn write_console_windows(bytes: &[u8], scratch: &mut [u16]) {
    let len = encode_utf8_to_utf16_scratch(bytes, scratch);
    unsafe {
        write_utf16_to_console(&scratch[..len]);
    }
}

#[cfg(windows)]
unsafe fn write_utf16_to_console(units: &[u16]) {
    use windows_sys::Win32::System::Console::{ GetStdHandle, WriteConsoleW, STD_OUTPUT_HANDLE };

    let handle = GetStdHandle(STD_OUTPUT_HANDLE);
    let mut written: u32 = 0;
    WriteConsoleW(handle, units.as_ptr() as *const _, units.len() as u32, &mut written, std::ptr::null_mut());
}

const TRUNCATION_MARKER: &[u16] = &[0x2e, 0x2e, 0x2e]; // "..."

/// Manually decode `bytes` as UTF-8 into UTF-16 code units, writing
/// surrogate pairs for code points at or above `0x10000`. If `scratch`
/// fills before the whole line is encoded, stop and overwrite the tail
/// with `TRUNCATION_MARKER` rather than growing the buffer.
///
/// Returns the number of valid code units written into `scratch`.
fn encode_utf8_to_utf16_scratch(bytes: &[u8], scratch: &mut [u16]) -> usize {
    if scratch.is_empty() {
        return 0;
    }

    let mut out = 0usize;
    let reserve_for_marker = TRUNCATION_MARKER.len();

    for ch in decode_utf8_lossy(bytes) {
        let needed = if (ch as u32) >= 0x1_0000 { 2 } else { 1 };
        let budget = scratch.len().saturating_sub(reserve_for_marker);

        if out + needed > budget {
            let marker_len = reserve_for_marker.min(scratch.len() - out);
            scratch[out..out + marker_len].copy_from_slice(&TRUNCATION_MARKER[..marker_len]);
            return out + marker_len;
        }

        if needed == 1 {
            scratch[out] = ch as u16;
            out += 1;
        } else {
            let c = (ch as u32) - 0x1_0000;
            let high = 0xd800 + (c >> 10);
            let low = 0xdc00 + (c & 0x3ff);
            scratch[out] = high as u16;
            scratch[out + 1] = low as u16;
            out += 2;
        }
    }

    out
}

/// Decode `bytes` as UTF-8 code points, substituting the replacement
/// character for invalid sequences rather than panicking. Used instead of
/// `str::from_utf8` because formatted log payloads are not guaranteed
/// valid UTF-8 (truncation can land mid-sequence).
fn decode_utf8_lossy(bytes: &[u8]) -> impl Iterator<Item = char> + '_ {
    let mut i = 0;
    std::iter::from_fn(move || {
        while i < bytes.len() {
            let b0 = bytes[i];
            let (len, min_cp): (usize, u32) = if b0 < 0x80 {
                (1, 0)
            } else if b0 & 0xe0 == 0xc0 {
                (2, 0x80)
            } else if b0 & 0xf0 == 0xe0 {
                (3, 0x800)
            } else if b0 & 0xf8 == 0xf0 {
                (4, 0x1_0000)
            } else {
                i += 1;
                return Some(char::REPLACEMENT_CHARACTER);
            };

            if i + len > bytes.len() {
                i += 1;
                return Some(char::REPLACEMENT_CHARACTER);
            }

            let mut cp: u32 = match len {
                1 => b0 as u32,
                2 => (b0 as u32) & 0x1f,
                3 => (b0 as u32) & 0x0f,
                _ => (b0 as u32) & 0x07,
            };

            let mut valid = true;
            for k in 1..len {
                let b = bytes[i + k];
                if b & 0xc0 != 0x80 {
                    valid = false;
                    break;
                }
                cp = (cp << 6) | ((b as u32) & 0x3f);
            }

            i += len;

            if !valid || cp < min_cp {
                return Some(char::REPLACEMENT_CHARACTER);
            }

            return Some(char::from_u32(cp).unwrap_or(char::REPLACEMENT_CHARACTER));
        }
        None
    })
}
