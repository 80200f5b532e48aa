//! Raw register bytes to engineering values
//!
//! Both conversions truncate towards zero and saturate into `u16`, so an
//! out-of-range raw value never wraps.

use crate::error::SampleError;

/// Light sensor scale, lux per count
const LUX_PER_COUNT: f64 = 1.8432;

/// Convert a light sensor reading to lux
///
/// The register holds a little-endian 16-bit count.
pub fn light_lux(raw: [u8; 2]) -> u16 {
    let count = u16::from_le_bytes(raw);
    (f64::from(count) * LUX_PER_COUNT) as u16
}

/// Temperature code packed across the two register bytes
///
/// Low nibble of byte 0 is the high nibble of the code, high nibble of
/// byte 1 is the low nibble.
pub fn temperature_code(raw: [u8; 2]) -> u16 {
    (u16::from(raw[0] & 0x0F) << 4) | (u16::from(raw[1] & 0xF0) >> 4)
}

/// Convert a temperature sensor reading to degrees Celsius
///
/// A zero code cannot be converted and is reported as
/// [`SampleError::InvalidRaw`]; negative results saturate to 0.
pub fn temperature_celsius(raw: [u8; 2]) -> Result<u16, SampleError> {
    let code = temperature_code(raw);
    if code == 0 {
        return Err(SampleError::InvalidRaw { raw: code });
    }
    // First quotient is integer division
    let scaled = (2_560_000 / u32::from(code)) as i32 - 18_056;
    let celsius = 30.0 - f64::from(scaled) / 443.7;
    Ok(celsius as u16)
}

/// Convert a gas channel reading (little-endian count, no scaling)
pub fn gas_raw(raw: [u8; 2]) -> u16 {
    u16::from_le_bytes(raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_light_lux_scaling() {
        assert_eq!(light_lux([0x00, 0x00]), 0);
        // 16 counts * 1.8432 = 29.49
        assert_eq!(light_lux([0x10, 0x00]), 29);
        // 256 counts * 1.8432 = 471.86
        assert_eq!(light_lux([0x00, 0x01]), 471);
    }

    #[test]
    fn test_light_lux_saturates() {
        assert_eq!(light_lux([0xFF, 0xFF]), u16::MAX);
    }

    #[test]
    fn test_temperature_code_unpacks_nibbles() {
        assert_eq!(temperature_code([0x06, 0x40]), 100);
        assert_eq!(temperature_code([0xF6, 0x4F]), 100);
        assert_eq!(temperature_code([0x0F, 0xF0]), 255);
    }

    #[test]
    fn test_temperature_celsius() {
        // code 100: 30 - (25600 - 18056) / 443.7 = 12.99
        assert_eq!(temperature_celsius([0x06, 0x40]), Ok(12));
        // code 255: 30 - (10039 - 18056) / 443.7 = 48.07
        assert_eq!(temperature_celsius([0x0F, 0xF0]), Ok(48));
    }

    #[test]
    fn test_temperature_negative_saturates_to_zero() {
        assert_eq!(temperature_celsius([0x00, 0x10]), Ok(0));
    }

    #[test]
    fn test_temperature_zero_code_is_invalid() {
        assert_eq!(
            temperature_celsius([0xF0, 0x0F]),
            Err(SampleError::InvalidRaw { raw: 0 })
        );
    }

    #[test]
    fn test_gas_raw_is_little_endian() {
        assert_eq!(gas_raw([0x34, 0x12]), 0x1234);
    }
}
