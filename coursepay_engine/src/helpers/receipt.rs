use chrono::Utc;

const BASE36: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

fn to_base36(mut value: u64) -> String {
    if value == 0 {
        return "0".to_string();
    }
    let mut digits = Vec::with_capacity(13);
    while value > 0 {
        digits.push(BASE36[(value % 36) as usize]);
        value /= 36;
    }
    digits.reverse();
    String::from_utf8_lossy(&digits).into_owned()
}

/// Generates a receipt reference of the form `order_<base36 millis>_<8 hex chars>`.
///
/// Receipts are only used to correlate records with the gateway dashboard. They are not required to be unique.
pub fn new_receipt() -> String {
    let millis = Utc::now().timestamp_millis().unsigned_abs();
    let suffix: u32 = rand::random();
    format!("order_{}_{suffix:08x}", to_base36(millis))
}
