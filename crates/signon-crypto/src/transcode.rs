//! ECDSA signature format transcoding.
//!
//! The oracle returns ECDSA signatures DER-encoded (`SEQUENCE { INTEGER r,
//! INTEGER s }`); JWS requires the fixed-length big-endian concatenation
//! `r ‖ s` with each integer left-padded to the curve field size. Both
//! directions are implemented so validation paths can recover `(r, s)`.

use crate::oracle::CryptoError;

/// Converts a DER-encoded ECDSA signature to the fixed-length JOSE form.
///
/// `jose_len` is the total output length: twice the curve field size,
/// 64 bytes for P-256.
///
/// ## Errors
///
/// Returns an error if the DER structure is malformed or either integer
/// does not fit the field size.
pub fn der_to_fixed(der: &[u8], jose_len: usize) -> Result<Vec<u8>, CryptoError> {
    let field_len = jose_len / 2;
    let mut pos = 0;

    if der.get(pos) != Some(&0x30) {
        return Err(malformed("expected SEQUENCE"));
    }
    pos += 1;
    let seq_len = read_length(der, pos)?;
    pos = skip_length(der, pos)?;
    if pos + seq_len != der.len() {
        return Err(malformed("SEQUENCE length mismatch"));
    }

    let (r, next) = read_integer(der, pos)?;
    let (s, next) = read_integer(der, next)?;
    if next != der.len() {
        return Err(malformed("trailing bytes after s"));
    }

    let mut fixed = vec![0u8; jose_len];
    write_padded(r, &mut fixed[..field_len])?;
    write_padded(s, &mut fixed[field_len..])?;
    Ok(fixed)
}

/// Converts a fixed-length JOSE signature (`r ‖ s`) back to DER.
///
/// ## Errors
///
/// Returns an error if the input length is odd or either half is zero.
pub fn fixed_to_der(fixed: &[u8]) -> Result<Vec<u8>, CryptoError> {
    if fixed.is_empty() || fixed.len() % 2 != 0 {
        return Err(malformed("JOSE signature length must be even"));
    }

    let field_len = fixed.len() / 2;
    let r = encode_integer(&fixed[..field_len])?;
    let s = encode_integer(&fixed[field_len..])?;

    let content_len = r.len() + s.len();
    let mut der = Vec::with_capacity(content_len + 4);
    der.push(0x30);
    push_length(&mut der, content_len);
    der.extend_from_slice(&r);
    der.extend_from_slice(&s);
    Ok(der)
}

fn malformed(detail: &str) -> CryptoError {
    CryptoError::InvalidSignature(detail.to_string())
}

/// Reads a DER INTEGER at `pos`, returning its value bytes (leading zero
/// padding stripped) and the position after it.
fn read_integer(data: &[u8], pos: usize) -> Result<(&[u8], usize), CryptoError> {
    if data.get(pos) != Some(&0x02) {
        return Err(malformed("expected INTEGER"));
    }
    let len = read_length(data, pos + 1)?;
    let start = skip_length(data, pos + 1)?;
    let end = start + len;
    if end > data.len() || len == 0 {
        return Err(malformed("INTEGER out of bounds"));
    }

    let mut value = &data[start..end];
    while value.len() > 1 && value[0] == 0 {
        value = &value[1..];
    }
    Ok((value, end))
}

/// Left-pads `value` into `out`, which has the curve field size.
fn write_padded(value: &[u8], out: &mut [u8]) -> Result<(), CryptoError> {
    if value.len() > out.len() {
        return Err(malformed("integer exceeds field size"));
    }
    let offset = out.len() - value.len();
    out[offset..].copy_from_slice(value);
    Ok(())
}

/// Encodes one field element as a minimal DER INTEGER (tag + length +
/// value, with a 0x00 prefix when the high bit is set).
fn encode_integer(field: &[u8]) -> Result<Vec<u8>, CryptoError> {
    let mut value = field;
    while value.len() > 1 && value[0] == 0 {
        value = &value[1..];
    }
    if value == [0] {
        return Err(malformed("integer is zero"));
    }

    let needs_pad = value[0] & 0x80 != 0;
    let len = value.len() + usize::from(needs_pad);

    let mut out = Vec::with_capacity(len + 2);
    out.push(0x02);
    push_length(&mut out, len);
    if needs_pad {
        out.push(0x00);
    }
    out.extend_from_slice(value);
    Ok(out)
}

/// Reads an ASN.1 length field and returns the length value.
fn read_length(data: &[u8], pos: usize) -> Result<usize, CryptoError> {
    let first = *data
        .get(pos)
        .ok_or_else(|| malformed("unexpected end of data"))?;

    if first < 0x80 {
        Ok(first as usize)
    } else {
        let num_bytes = (first & 0x7F) as usize;
        if num_bytes > 4 {
            return Err(malformed("length too large"));
        }
        let mut len = 0usize;
        for i in 0..num_bytes {
            let byte = *data
                .get(pos + 1 + i)
                .ok_or_else(|| malformed("unexpected end of length"))?;
            len = (len << 8) | (byte as usize);
        }
        Ok(len)
    }
}

/// Skips an ASN.1 length field and returns the new position.
fn skip_length(data: &[u8], pos: usize) -> Result<usize, CryptoError> {
    let first = *data
        .get(pos)
        .ok_or_else(|| malformed("unexpected end of data"))?;

    if first < 0x80 {
        Ok(pos + 1)
    } else {
        let num_bytes = (first & 0x7F) as usize;
        Ok(pos + 1 + num_bytes)
    }
}

/// Appends an ASN.1 length field (short or long form).
fn push_length(out: &mut Vec<u8>, len: usize) {
    if len < 0x80 {
        #[allow(clippy::cast_possible_truncation)]
        out.push(len as u8);
    } else {
        let bytes = len.to_be_bytes();
        let skip = bytes.iter().take_while(|&&b| b == 0).count();
        let significant = &bytes[skip..];
        #[allow(clippy::cast_possible_truncation)]
        out.push(0x80 | significant.len() as u8);
        out.extend_from_slice(significant);
    }
}
