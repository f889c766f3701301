/// Parse the `--address-offset` value.
///
/// Accepts decimal (`268435456`) or `0x`-prefixed hex (`0x10000000`), either
/// with a leading `-` for downward relocation. The error type is a plain
/// `String` so this slots straight into clap's `value_parser`.
pub fn parse_address_offset(text: &str) -> Result<i64, String> {
    let (negative, rest) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text),
    };
    // The sign was consumed above; a second one must not sneak into the
    // integer parsers below.
    if rest.starts_with(['+', '-']) {
        return Err(format!("invalid address offset `{text}`"));
    }
    let magnitude = if let Some(hex) = rest.strip_prefix("0x").or_else(|| rest.strip_prefix("0X")) {
        i64::from_str_radix(hex, 16)
    } else {
        rest.parse::<i64>()
    }
    .map_err(|e| format!("invalid address offset `{text}`: {e}"))?;
    Ok(if negative { -magnitude } else { magnitude })
}
