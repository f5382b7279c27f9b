// 💬 Reply composition - "@user <rhyme>" capped at the platform limit

/// Classic tweet limit, used when nothing else is configured
pub const MAX_REPLY_LENGTH: usize = 140;

/// Build the reply addressed to `screen_name`.
///
/// The result is cut to at most `max_len` characters (not bytes), so an
/// accented letter is never split.
pub fn compose_reply(screen_name: &str, rhyme: &str, max_len: usize) -> String {
    let name = screen_name.trim_start_matches('@');
    let reply = format!("@{} {}", name, rhyme);

    match reply.char_indices().nth(max_len) {
        Some((cut, _)) => reply[..cut].to_string(),
        None => reply,
    }
}
