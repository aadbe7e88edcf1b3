/// Builds the WhatsApp chat link for a phone number as written in the content.
///
/// Spaces, `+` and `-` are stripped. No link is produced for an empty number.
pub fn whatsapp_link(phone: &str) -> Option<String> {
    let digits: String = phone
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '+' && *c != '-')
        .collect();
    if digits.is_empty() {
        None
    } else {
        Some(format!("https://wa.me/{digits}"))
    }
}
