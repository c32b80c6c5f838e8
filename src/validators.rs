// piiredact/src/validators.rs
//! Programmatic validation functions for specific sensitive data types.
//!
//! This module provides additional validation logic beyond regular expression
//! matching for detectors that opt in via `programmatic_validation`. These
//! checks reduce false positives by applying structural and checksum rules.
//!
//! License: MIT OR APACHE 2.0

/// Dispatches a matched string to the validator registered for a detector.
///
/// Detectors without a registered validator always pass; the flag on such a
/// detector is a no-op rather than an error.
pub fn run_programmatic_validator(detector_name: &str, matched: &str) -> bool {
    match detector_name {
        "us_ssn" => is_valid_ssn_programmatically(matched),
        "credit_card" => is_valid_credit_card_programmatically(matched),
        _ => true,
    }
}

/// Helper function to validate SSN based on US Social Security Administration rules.
///
/// This implementation aims for a robust programmatic check without external data.
/// It validates the structural components against known invalid patterns.
///
/// # Arguments
///
/// * `ssn` - The SSN string slice to validate. Expected format "XXX-XX-XXXX".
///
/// # Returns
///
/// `true` if the SSN passes basic structural and invalid pattern checks, `false` otherwise.
pub fn is_valid_ssn_programmatically(ssn: &str) -> bool {
    let mut parts = ssn.split('-');

    let (Some(area), Some(group), Some(serial), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return false;
    };

    if area.len() != 3 || group.len() != 2 || serial.len() != 4 {
        return false;
    }

    let Some(area_num) = area.parse::<u16>().ok() else { return false; };
    let Some(group_num) = group.parse::<u8>().ok() else { return false; };
    let Some(serial_num) = serial.parse::<u16>().ok() else { return false; };

    // Check for invalid SSN patterns based on historical and current rules.
    let invalid_area = (area_num == 0) || (area_num == 666) || (area_num >= 900);
    let invalid_group = group_num == 0;
    let invalid_serial = serial_num == 0;

    !(invalid_area || invalid_group || invalid_serial)
}

/// Validates a number using the Luhn algorithm.
///
/// The Luhn algorithm, also known as the Mod 10 algorithm, is a simple checksum
/// formula used to validate a variety of identification numbers, such as
/// credit card numbers.
///
/// # Arguments
///
/// * `num_str` - A string slice containing only digits.
///
/// # Returns
///
/// `true` if the number is valid according to the Luhn algorithm, `false` otherwise.
pub fn is_valid_luhn(num_str: &str) -> bool {
    let mut sum = 0;
    let mut alternate = false;

    for c in num_str.chars().rev() {
        let Some(mut digit) = c.to_digit(10) else { return false; };

        if alternate {
            digit *= 2;
            if digit > 9 {
                digit -= 9;
            }
        }
        sum += digit;
        alternate = !alternate;
    }

    sum % 10 == 0
}

/// Helper function to validate credit card numbers based on the Luhn algorithm.
///
/// This function first strips all non-digit characters from the input string
/// and then applies the Luhn algorithm to the resulting digit string.
pub fn is_valid_credit_card_programmatically(cc_number: &str) -> bool {
    let digits: String = cc_number.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return false;
    }
    is_valid_luhn(&digits)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_ssn() {
        assert!(is_valid_ssn_programmatically("456-78-9012"));
    }

    #[test]
    fn test_invalid_ssn_area() {
        assert!(!is_valid_ssn_programmatically("000-12-3456"));
        assert!(!is_valid_ssn_programmatically("666-12-3456"));
        assert!(!is_valid_ssn_programmatically("901-12-3456"));
    }

    #[test]
    fn test_invalid_ssn_structure() {
        assert!(!is_valid_ssn_programmatically("45-678-9012"));
        assert!(!is_valid_ssn_programmatically("456789012"));
    }

    #[test]
    fn test_luhn_valid_card() {
        assert!(is_valid_credit_card_programmatically("4111 1111 1111 1111"));
        assert!(is_valid_credit_card_programmatically("5500-0000-0000-0004"));
    }

    #[test]
    fn test_luhn_invalid_card() {
        assert!(!is_valid_credit_card_programmatically("4111 1111 1111 1112"));
        assert!(!is_valid_credit_card_programmatically(""));
    }

    #[test]
    fn test_dispatch_unknown_detector_passes() {
        assert!(run_programmatic_validator("email", "anything"));
    }
}
