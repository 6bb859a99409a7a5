//! Amounts in words and in figures

use super::RenderError;

const ONES: [&str; 20] = [
    "Zero",
    "One",
    "Two",
    "Three",
    "Four",
    "Five",
    "Six",
    "Seven",
    "Eight",
    "Nine",
    "Ten",
    "Eleven",
    "Twelve",
    "Thirteen",
    "Fourteen",
    "Fifteen",
    "Sixteen",
    "Seventeen",
    "Eighteen",
    "Nineteen",
];

const TENS: [&str; 10] = [
    "", "", "Twenty", "Thirty", "Forty", "Fifty", "Sixty", "Seventy", "Eighty", "Ninety",
];

const SCALES: [&str; 7] = [
    "",
    "Thousand",
    "Million",
    "Billion",
    "Trillion",
    "Quadrillion",
    "Quintillion",
];

/// Words for 1..=999, pushed onto `out`
fn push_hundreds(n: u64, out: &mut Vec<&'static str>) {
    let hundreds = n / 100;
    let rest = n % 100;

    if hundreds > 0 {
        out.push(ONES[hundreds as usize]);
        out.push("Hundred");
    }
    if rest >= 20 {
        out.push(TENS[(rest / 10) as usize]);
        if rest % 10 > 0 {
            out.push(ONES[(rest % 10) as usize]);
        }
    } else if rest > 0 {
        out.push(ONES[rest as usize]);
    }
}

/// Title-cased English words for `n`, e.g. `1234` → "One Thousand Two
/// Hundred Thirty Four"
pub fn number_to_words(n: u64) -> String {
    if n == 0 {
        return ONES[0].to_string();
    }

    let mut groups = Vec::new();
    let mut rest = n;
    while rest > 0 {
        groups.push(rest % 1000);
        rest /= 1000;
    }

    let mut words = Vec::new();
    for (scale, group) in groups.iter().enumerate().rev() {
        if *group == 0 {
            continue;
        }
        push_hundreds(*group, &mut words);
        if scale > 0 {
            words.push(SCALES[scale]);
        }
    }

    words.join(" ")
}

/// Words for a whole amount, followed by "Only"
pub fn amount_to_words(n: u64) -> String {
    format!("{} Only", number_to_words(n))
}

/// Words for a currency amount; fractions are dropped
///
/// Negative, non-finite and out-of-range amounts are rejected.
pub fn amount_in_words(amount: f64) -> Result<String, RenderError> {
    check_amount(amount)?;
    Ok(amount_to_words(amount.trunc() as u64))
}

pub(crate) fn check_amount(amount: f64) -> Result<(), RenderError> {
    if !amount.is_finite() || amount < 0.0 || amount >= u64::MAX as f64 {
        return Err(RenderError::InvalidAmount(amount));
    }
    Ok(())
}

/// Figures with two decimals and Indian digit grouping: `1,23,456.00`
pub fn format_amount(amount: f64) -> String {
    let sign = if amount < 0.0 { "-" } else { "" };
    let paise_total = (amount.abs() * 100.0).round() as u64;
    let rupees = (paise_total / 100).to_string();
    let paise = paise_total % 100;

    let grouped = if rupees.len() <= 3 {
        rupees
    } else {
        let (head, last_three) = rupees.split_at(rupees.len() - 3);
        let mut parts: Vec<&str> = Vec::new();
        let mut end = head.len();
        while end > 2 {
            parts.push(&head[end - 2..end]);
            end -= 2;
        }
        parts.push(&head[..end]);
        parts.reverse();
        format!("{},{}", parts.join(","), last_three)
    };

    format!("{}{}.{:02}", sign, grouped, paise)
}
