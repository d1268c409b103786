//! Masking of identifying values before they reach the logs.

/// Mask a user id, keeping only its first and last two characters.
///
/// Ids of four characters or fewer are masked completely.
pub fn mask_user_id(user_id: i64) -> String {
    mask_identifier(&user_id.to_string())
}

fn mask_identifier(value: &str) -> String {
    let chars: Vec<char> = value.chars().collect();
    if chars.len() <= 4 {
        return "****".to_string();
    }

    let head: String = chars[..2].iter().collect();
    let tail: String = chars[chars.len() - 2..].iter().collect();
    format!("{}{}{}", head, "*".repeat(chars.len() - 4), tail)
}
