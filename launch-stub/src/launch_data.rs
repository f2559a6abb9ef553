//! Launch data: the metadata block a build appends to the stub binary.
//!
//! A finalized stub image has this layout:
//!
//! ```text
//! [native code and resources][pairs region][8-byte little-endian length]
//! ```
//!
//! The pairs region is a sequence of `key=value` records, each terminated by
//! a single NUL byte, concatenated in written order. The length field is a
//! little-endian `i64` counting the pairs region only, and is always the
//! last eight bytes of the file. Nothing else indexes the block; the stub
//! finds it by seeking backwards from end-of-file.
//!
//! Record conventions, fixed for this format (there is no version tag):
//! NUL is the record terminator and the first `=` separates key from value.
//! Keys and values therefore cannot contain NUL, and keys cannot contain
//! `=`. A record with no `=` or an empty key is skipped with a warning.
//! When a key is written twice, the last occurrence wins.

use std::collections::HashMap;
use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::Path;

use tracing::{debug, warn};

use crate::error::{LaunchError, Result};

/// Key/value launch information recovered from the stub image.
pub type LaunchInfo = HashMap<String, String>;

/// Record terminator in the pairs region.
const TERMINATOR: u8 = b'\0';

/// Reads the launch data block out of the stub binary at `path`.
///
/// The file handle is scoped to this call: it is closed on every path,
/// success or error, before the caller can spawn a child process.
pub fn read_launch_info(path: &Path) -> Result<LaunchInfo> {
    let mut stub = File::open(path)?;
    let raw = read_pairs_region(&mut stub)?;
    if raw.is_empty() {
        return Err(LaunchError::EmptyLaunchData);
    }
    Ok(decode(&raw))
}

/// Reads the trailing length field, then the pairs region it describes.
///
/// The length is not validated against the file size up front; a length the
/// file cannot satisfy fails the seek or the read and is reported as
/// corrupt. The seek happens before the region buffer is allocated, so a
/// hostile length cannot force a huge allocation.
fn read_pairs_region(stub: &mut File) -> Result<Vec<u8>> {
    let mut field = [0u8; 8];
    stub.seek(SeekFrom::End(-(field.len() as i64)))
        .and_then(|_| stub.read_exact(&mut field))
        .map_err(|err| corrupt(format!("cannot read length field: {err}")))?;
    let data_size = i64::from_le_bytes(field);

    let block_len = data_size
        .checked_add(field.len() as i64)
        .ok_or_else(|| corrupt(format!("unusable data size {data_size}")))?;
    stub.seek(SeekFrom::End(-block_len)).map_err(|err| {
        corrupt(format!(
            "data size {data_size} does not fit the stub image: {err}"
        ))
    })?;

    let len = usize::try_from(data_size)
        .map_err(|_| corrupt(format!("unusable data size {data_size}")))?;
    let mut raw = vec![0u8; len];
    stub.read_exact(&mut raw).map_err(|err| {
        corrupt(format!(
            "data size {data_size} does not fit the stub image: {err}"
        ))
    })?;
    debug!(data_size, "read launch data from stub image");
    Ok(raw)
}

/// Decodes a pairs region. Pure over the raw bytes.
///
/// Leading and repeated terminators are skipped; each record runs to the
/// next terminator or to the end of the buffer and splits at its first `=`.
pub fn decode(raw: &[u8]) -> LaunchInfo {
    let mut info = LaunchInfo::new();
    for record in raw.split(|byte| *byte == TERMINATOR) {
        if record.is_empty() {
            continue;
        }
        let record = String::from_utf8_lossy(record);
        match record.split_once('=') {
            Some((key, value)) if !key.is_empty() => {
                info.insert(key.to_string(), value.to_string());
            }
            _ => warn!(record = %record, "skipping malformed launch data record"),
        }
    }
    info
}

/// Encodes pairs into a block ready to be appended to a stub binary: the
/// pairs region followed by the trailing length field.
pub fn encode<K, V>(pairs: &[(K, V)]) -> Vec<u8>
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut block = Vec::new();
    for (key, value) in pairs {
        block.extend_from_slice(key.as_ref().as_bytes());
        block.push(b'=');
        block.extend_from_slice(value.as_ref().as_bytes());
        block.push(TERMINATOR);
    }
    let data_size = block.len() as i64;
    block.extend_from_slice(&data_size.to_le_bytes());
    block
}

/// Appends an encoded block to the file at `path`.
///
/// Build-time operation; a running stub never mutates its own image.
pub fn append_to<K, V>(path: &Path, pairs: &[(K, V)]) -> Result<()>
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    let block = encode(pairs);
    let mut stub = OpenOptions::new().append(true).open(path)?;
    stub.write_all(&block)?;
    Ok(())
}

fn corrupt(message: String) -> LaunchError {
    LaunchError::CorruptLaunchData(message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn pairs_region(pairs: &[(&str, &str)]) -> Vec<u8> {
        let block = encode(pairs);
        block[..block.len() - 8].to_vec()
    }

    #[test]
    fn encode_then_decode_reproduces_mapping() {
        let region = pairs_region(&[
            ("PYTHON_BIN", "C:\\Py\\python.exe"),
            ("WORKSPACE", "demo"),
        ]);
        let info = decode(&region);
        assert_eq!(info.len(), 2);
        assert_eq!(info["PYTHON_BIN"], "C:\\Py\\python.exe");
        assert_eq!(info["WORKSPACE"], "demo");
    }

    #[test]
    fn duplicate_key_last_write_wins() {
        let region = pairs_region(&[("a", "1"), ("a", "2")]);
        let info = decode(&region);
        assert_eq!(info.len(), 1);
        assert_eq!(info["a"], "2");
    }

    #[test]
    fn record_without_separator_is_skipped() {
        let info = decode(b"FOO=bar\0no separator here\0");
        assert_eq!(info.len(), 1);
        assert_eq!(info["FOO"], "bar");
    }

    #[test]
    fn record_with_empty_key_is_skipped() {
        let info = decode(b"=value\0GOOD=1\0");
        assert_eq!(info.len(), 1);
        assert_eq!(info["GOOD"], "1");
    }

    #[test]
    fn leading_terminators_are_skipped() {
        let info = decode(b"\0\0A=1\0");
        assert_eq!(info["A"], "1");
    }

    #[test]
    fn value_keeps_later_separators() {
        let info = decode(b"FLAGS=-Xmx1g=on\0");
        assert_eq!(info["FLAGS"], "-Xmx1g=on");
    }

    #[test]
    fn value_may_be_empty() {
        let info = decode(b"EMPTY=\0");
        assert_eq!(info["EMPTY"], "");
    }

    #[test]
    fn reads_block_appended_to_arbitrary_image() {
        let dir = tempfile::tempdir().unwrap();
        let stub = dir.path().join("stub");
        std::fs::write(&stub, b"\x7fELF pretend machine code").unwrap();
        append_to(&stub, &[("BASH_BIN", "/bin/bash"), ("X", "y")]).unwrap();

        let info = read_launch_info(&stub).unwrap();
        assert_eq!(info.len(), 2);
        assert_eq!(info["BASH_BIN"], "/bin/bash");
        assert_eq!(info["X"], "y");
    }

    #[test]
    fn empty_pairs_region_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let stub = dir.path().join("stub");
        std::fs::write(&stub, b"code").unwrap();
        append_to::<&str, &str>(&stub, &[]).unwrap();

        let err = read_launch_info(&stub).unwrap_err();
        assert!(matches!(err, LaunchError::EmptyLaunchData));
    }

    #[test]
    fn image_shorter_than_length_field_is_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let stub = dir.path().join("stub");
        std::fs::write(&stub, b"abc").unwrap();

        let err = read_launch_info(&stub).unwrap_err();
        assert!(matches!(err, LaunchError::CorruptLaunchData(_)));
    }

    #[test]
    fn oversized_data_size_is_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let stub = dir.path().join("stub");
        let mut image = b"short".to_vec();
        image.extend_from_slice(&1_000_000i64.to_le_bytes());
        std::fs::write(&stub, &image).unwrap();

        let err = read_launch_info(&stub).unwrap_err();
        assert!(matches!(err, LaunchError::CorruptLaunchData(_)));
    }

    #[test]
    fn negative_data_size_is_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let stub = dir.path().join("stub");
        let mut image = b"code".to_vec();
        image.extend_from_slice(&(-5i64).to_le_bytes());
        std::fs::write(&stub, &image).unwrap();

        let err = read_launch_info(&stub).unwrap_err();
        assert!(matches!(err, LaunchError::CorruptLaunchData(_)));
    }

    #[test]
    fn missing_image_is_io_error() {
        let err = read_launch_info(Path::new("/no/such/stub")).unwrap_err();
        assert!(matches!(err, LaunchError::Io(_)));
    }

    proptest! {
        #[test]
        fn round_trip_reproduces_any_mapping(
            pairs in proptest::collection::hash_map(
                "[A-Z][A-Z0-9_]{0,15}",
                "[ -~]{0,32}",
                0..8,
            )
        ) {
            let vec: Vec<(&str, &str)> = pairs
                .iter()
                .map(|(k, v)| (k.as_str(), v.as_str()))
                .collect();
            let block = encode(&vec);
            let decoded = decode(&block[..block.len() - 8]);
            prop_assert_eq!(decoded, pairs);
        }
    }
}
