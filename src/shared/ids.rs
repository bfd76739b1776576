use getrandom::getrandom;

const BASE36_ALPHABET: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const SUFFIX_SPACE: u32 = 36 * 36 * 36 * 36;

fn base36_encode_u64(mut value: u64) -> String {
    if value == 0 {
        return "0".to_string();
    }
    let mut chars = Vec::new();
    while value > 0 {
        chars.push(BASE36_ALPHABET[(value % 36) as usize] as char);
        value /= 36;
    }
    chars.iter().rev().collect()
}

fn base36_encode_fixed_u32(mut value: u32, width: usize) -> String {
    let mut chars = vec!['0'; width];
    for idx in (0..width).rev() {
        chars[idx] = BASE36_ALPHABET[(value % 36) as usize] as char;
        value /= 36;
    }
    chars.into_iter().collect()
}

/// Compact id correlating the log lines of one action invocation, e.g. `inv-sa1b2c-0k3z`.
pub fn generate_invocation_id() -> String {
    let now = chrono::Utc::now().timestamp_millis().max(0) as u64;
    let mut bytes = [0_u8; 4];
    let sample = match getrandom(&mut bytes) {
        Ok(()) => u32::from_le_bytes(bytes) % SUFFIX_SPACE,
        Err(_) => (now % u64::from(SUFFIX_SPACE)) as u32,
    };
    format!(
        "inv-{}-{}",
        base36_encode_u64(now),
        base36_encode_fixed_u32(sample, 4)
    )
}
