pub mod config;
pub mod context;
pub mod errors;

use rand::Rng;
use uuid::Uuid;

pub fn generate_id() -> String {
    Uuid::new_v4().to_hyphenated().to_string()
}

///
/// A 6-digit one-time code. thread_rng is a CSPRNG so these are not guessable beyond
/// the 10^6 space, which the attempt cap and short expiry bound.
///
pub fn generate_one_time_code() -> String {
    let mut rng = rand::thread_rng();
    format!("{:06}", rng.gen_range(0..1_000_000))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_time_codes_are_six_digits() {
        for _ in 0..100 {
            let code = generate_one_time_code();
            assert_eq!(code.len(), 6);
            assert!(code.chars().all(|c| c.is_ascii_digit()));
        }
    }
}
