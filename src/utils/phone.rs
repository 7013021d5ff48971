//! Phone number input handling and contact links.

use crate::types::PHONE_DIGITS;

/// Keep only ASCII digits and cut the result to the subscriber length.
pub fn sanitize_phone(input: &str) -> String {
    input
        .chars()
        .filter(char::is_ascii_digit)
        .take(PHONE_DIGITS)
        .collect()
}

/// True when `phone` is exactly a full subscriber number.
pub fn is_complete_phone(phone: &str) -> bool {
    phone.len() == PHONE_DIGITS && phone.chars().all(|c| c.is_ascii_digit())
}

fn digits(phone: &str) -> String {
    phone.chars().filter(char::is_ascii_digit).collect()
}

/// `tel:` link with every non-digit stripped.
pub fn tel_link(phone: &str) -> String {
    format!("tel:{}", digits(phone))
}

/// International form used for WhatsApp: `+91` is prepended unless the
/// digits already start with `91`.
pub fn whatsapp_number(phone: &str) -> String {
    let digits = digits(phone);
    if digits.starts_with("91") {
        format!("+{digits}")
    } else {
        format!("+91{digits}")
    }
}

/// Deep link into the WhatsApp app.
pub fn whatsapp_link(phone: &str) -> String {
    format!("whatsapp://send?phone={}", whatsapp_number(phone))
}

/// Browser fallback when the app is not installed.
pub fn whatsapp_web_link(phone: &str) -> String {
    format!("https://wa.me/{}", whatsapp_number(phone))
}
