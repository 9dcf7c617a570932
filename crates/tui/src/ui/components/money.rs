/// Formats `amount` as US dollars with thousands separators, e.g.
/// `$1,234.50`.
#[must_use]
pub fn format_usd(amount: f64, decimals: usize) -> String {
    let sign = if amount < 0.0 { "-" } else { "" };
    let fixed = format!("{:.*}", decimals, amount.abs());
    let (whole, frac) = match fixed.split_once('.') {
        Some((whole, frac)) => (whole, Some(frac)),
        None => (fixed.as_str(), None),
    };

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    match frac {
        Some(frac) => format!("{sign}${grouped}.{frac}"),
        None => format!("{sign}${grouped}"),
    }
}

/// Creates a simple text-based progress bar for inline use.
///
/// Returns a string like `████████░░ 80%`.
#[must_use]
pub fn inline_progress_bar(percent: f64, width: usize) -> String {
    let ratio = (percent / 100.0).clamp(0.0, 1.0);
    let filled = ((ratio * width as f64).round() as usize).min(width);
    let empty = width - filled;
    format!(
        "{}{} {:.0}%",
        "█".repeat(filled),
        "░".repeat(empty),
        ratio * 100.0
    )
}
