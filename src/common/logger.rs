pub struct Logger;

impl Logger {
    pub fn warn(msg: &str) {
        eprintln!("[pollmux] WARN: {}", msg);
    }

    pub fn debug(msg: &str) {
        if cfg!(debug_assertions) {
            eprintln!("[pollmux] DEBUG: {}", msg);
        }
    }
}
