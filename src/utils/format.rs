/// Formats an amount as whole dollars with comma grouping, e.g. `$1,234,568`.
///
/// Negative amounts keep the sign after the currency symbol (`$-500`).
pub fn format_money(amount: f64) -> String {
    format!("${}", group_thousands(amount))
}

fn group_thousands(amount: f64) -> String {
    let rounded = format!("{:.0}", amount);
    let (sign, digits) = match rounded.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", rounded.as_str()),
    };
    // "-0" after rounding small negatives
    let sign = if digits.chars().all(|c| c == '0') { "" } else { sign };

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("{}{}", sign, grouped)
}
