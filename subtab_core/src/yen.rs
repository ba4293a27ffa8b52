//! Display formatting for normalized yen amounts.

/// Format a yen amount the way Japanese grant notices print ceilings.
///
/// Whole multiples of 10,000 are shown in 万円 (`50_000_000` → `5,000万円`),
/// anything else in plain 円 with thousands separators.
#[must_use]
pub fn format_yen(amount: u64) -> String {
    if amount >= 10_000 && amount % 10_000 == 0 {
        format!("{}万円", group_thousands(amount / 10_000))
    } else {
        format!("{}円", group_thousands(amount))
    }
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_man_units() {
        assert_eq!(format_yen(50_000_000), "5,000万円");
        assert_eq!(format_yen(1_000_000), "100万円");
        assert_eq!(format_yen(3_000_000), "300万円");
        assert_eq!(format_yen(200_000_000), "20,000万円");
    }

    #[test]
    fn test_format_plain_yen() {
        assert_eq!(format_yen(0), "0円");
        assert_eq!(format_yen(9_999), "9,999円");
        assert_eq!(format_yen(1_234_567), "1,234,567円");
    }
}
