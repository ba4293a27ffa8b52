//! Amount normalization: `上限500万円` → `5_000_000`.
//!
//! Never fails loudly. Anything that cannot be read as a number, or that
//! would overflow, normalizes to `None`.

const OKU: u128 = 100_000_000;
const MAN: u128 = 10_000;

/// The leading numeric token of an amount, separators removed.
#[derive(Debug, PartialEq, Eq)]
struct NumericToken {
    integer: String,
    fraction: String,
}

/// Convert a raw amount expression to an absolute yen value.
///
/// The first run of digits (ASCII or full-width, with `,` / `，` thousands
/// separators and an optional decimal part) is scaled by 億円 when the raw
/// text mentions it, otherwise by 万円 when that appears, otherwise left as is.
#[must_use]
pub fn normalize_amount(raw: &str) -> Option<u64> {
    let token = leading_number(raw)?;

    let scale = if raw.contains("億円") {
        OKU
    } else if raw.contains("万円") {
        MAN
    } else {
        1
    };

    let integer: u128 = token.integer.parse().ok()?;
    let mut total = integer.checked_mul(scale)?;

    if !token.fraction.is_empty() {
        let places = u32::try_from(token.fraction.len()).ok()?;
        let denominator = 10_u128.checked_pow(places)?;
        let fraction: u128 = token.fraction.parse().ok()?;
        total = total.checked_add(fraction.checked_mul(scale)? / denominator)?;
    }

    u64::try_from(total).ok()
}

fn leading_number(raw: &str) -> Option<NumericToken> {
    let mut chars = raw.chars().skip_while(|c| ascii_digit(*c).is_none()).peekable();

    let mut integer = String::new();
    let mut fraction = String::new();
    let mut in_fraction = false;

    while let Some(c) = chars.next() {
        if let Some(d) = ascii_digit(c) {
            if in_fraction {
                fraction.push(d);
            } else {
                integer.push(d);
            }
            continue;
        }

        let next_is_digit = chars.peek().and_then(|n| ascii_digit(*n)).is_some();
        match c {
            ',' | '，' if !in_fraction && next_is_digit => {}
            '.' | '．' if !in_fraction && next_is_digit => in_fraction = true,
            _ => break,
        }
    }

    if integer.is_empty() {
        None
    } else {
        Some(NumericToken { integer, fraction })
    }
}

/// Map ASCII and full-width digits to their ASCII form.
fn ascii_digit(c: char) -> Option<char> {
    match c {
        '0'..='9' => Some(c),
        '０'..='９' => char::from_u32(u32::from(c) - u32::from('０') + u32::from('0')),
        _ => None,
    }
}
