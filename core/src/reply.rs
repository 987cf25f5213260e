use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};

// Everything beyond unreserved characters gets encoded, so greetings survive
// both wa.me query strings and mailto bodies.
const QUERY_ENCODE_SET: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'&')
    .add(b'+')
    .add(b',')
    .add(b'/')
    .add(b':')
    .add(b';')
    .add(b'<')
    .add(b'=')
    .add(b'>')
    .add(b'?')
    .add(b'@')
    .add(b'[')
    .add(b'\\')
    .add(b']')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}');

const MAIL_SUBJECT: &str = "Saw your story";

fn greeting_for(display_name: &str) -> String {
    let name = display_name.trim();
    if name.is_empty() {
        "Hi, I just saw your story and wanted to reach out.".to_string()
    } else {
        format!("Hi {name}, I just saw your story and wanted to reach out.")
    }
}

fn encode(value: &str) -> String {
    utf8_percent_encode(value, QUERY_ENCODE_SET).to_string()
}

/// Builds a wa.me deep link with a templated greeting. The number is reduced
/// to its digits (wa.me takes international format without '+' or
/// separators); returns None when no digits remain.
pub fn whatsapp_reply_url(number: &str, display_name: &str) -> Option<String> {
    let digits: String = number.chars().filter(|ch| ch.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }
    let text = encode(&greeting_for(display_name));
    Some(format!("https://wa.me/{digits}?text={text}"))
}

/// Builds a mailto link with templated subject and body. Returns None for
/// addresses without an '@'.
pub fn mailto_reply_url(email: &str, display_name: &str) -> Option<String> {
    let address = email.trim();
    if address.is_empty() || !address.contains('@') {
        return None;
    }
    let subject = encode(MAIL_SUBJECT);
    let body = encode(&greeting_for(display_name));
    Some(format!("mailto:{address}?subject={subject}&body={body}"))
}
