use ropsym::parse_address_offset;

#[test]
fn parses_decimal_offsets() {
    assert_eq!(parse_address_offset("0"), Ok(0));
    assert_eq!(parse_address_offset("268435456"), Ok(0x1000_0000));
    assert_eq!(parse_address_offset("-4"), Ok(-4));
}

#[test]
fn parses_hex_offsets() {
    assert_eq!(parse_address_offset("0x10000000"), Ok(0x1000_0000));
    assert_eq!(parse_address_offset("0X1a30"), Ok(0x1A30));
    assert_eq!(parse_address_offset("-0x100"), Ok(-0x100));
}

#[test]
fn rejects_garbage() {
    assert!(parse_address_offset("").is_err());
    assert!(parse_address_offset("ten").is_err());
    assert!(parse_address_offset("0x").is_err());
    assert!(parse_address_offset("0xZZ").is_err());
    assert!(parse_address_offset("--4").is_err());
}
