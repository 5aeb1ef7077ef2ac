use rand::{thread_rng, Rng};

const CHARSET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";
pub const TEAM_CODE_LENGTH: usize = 6;

/// Uppercase code without the easily confused characters 0/O and 1/I.
pub fn generate_random_code(length: usize) -> String {
    let mut rng = thread_rng();
    (0..length)
        .map(|_| CHARSET[rng.gen_range(0..CHARSET.len())] as char)
        .collect()
}

pub fn generate_team_id(prefix: &str) -> String {
    format!("{}-{}", prefix, generate_random_code(TEAM_CODE_LENGTH))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn team_id_has_prefix_and_code() {
        let team_id = generate_team_id("TEAM");
        let (prefix, code) = team_id.split_once('-').unwrap();
        assert_eq!(prefix, "TEAM");
        assert_eq!(code.len(), TEAM_CODE_LENGTH);
        assert!(code.bytes().all(|b| CHARSET.contains(&b)));
    }

    #[test]
    fn codes_avoid_ambiguous_characters() {
        let code = generate_random_code(200);
        assert!(!code.contains(&['0', 'O', '1', 'I'][..]));
    }
}
