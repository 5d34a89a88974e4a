use std::env;

const USAGE: &str = include_str!("./cli-help.txt");

/// Settings that are safe to echo back to an operator. Secrets are deliberately absent from this list.
const PUBLIC_SETTINGS: [&str; 9] = [
    "RUST_LOG",
    "CPS_HOST",
    "CPS_PORT",
    "CPS_DATABASE_URL",
    "CPS_RAZORPAY_KEY_ID",
    "CPS_RAZORPAY_CURRENCY",
    "CPS_RAZORPAY_API_URL",
    "CPS_EMAIL_FROM",
    "CPS_EMAIL_SENDER_NAME",
];

/// The server takes no arguments. Any argument at all prints usage and the current settings, and returns `true` so
/// that `main` exits without starting the server.
pub fn handle_command_line_args() -> bool {
    if env::args().len() <= 1 {
        return false;
    }
    println!("\n{USAGE}\n");
    println!("Current settings (secrets are not shown):");
    for (name, value) in public_settings() {
        println!("  {name:<35} {value}");
    }
    true
}

fn public_settings() -> Vec<(&'static str, String)> {
    PUBLIC_SETTINGS
        .iter()
        .map(|&name| {
            let value = match env::var_os(name) {
                None => "Not set".to_string(),
                Some(v) => v.to_string_lossy().into_owned(),
            };
            (name, value)
        })
        .collect()
}
