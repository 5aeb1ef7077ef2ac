pub mod random_string_gen;
pub mod real_ip_key_extractor;
pub mod send_email;
