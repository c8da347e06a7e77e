pub fn default_version() -> u32 {
    1
}

pub fn default_base_url() -> String {
    "http://127.0.0.1:5000".to_string()
}

pub fn default_timeout_sec() -> u64 {
    30
}

pub fn default_first_year() -> i32 {
    2023
}

pub fn default_last_year() -> i32 {
    2027
}

pub fn default_max_attempts() -> u32 {
    3
}

pub fn default_backoff_base_ms() -> u64 {
    250
}
