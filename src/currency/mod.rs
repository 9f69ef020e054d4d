use serde::{Deserialize, Serialize};

/// How whole-unit amounts are shown to the user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AmountFormat {
    pub label: String,
    pub grouping_separator: char,
}

impl Default for AmountFormat {
    fn default() -> Self {
        Self {
            label: "Rp".into(),
            grouping_separator: '.',
        }
    }
}

/// Formats `amount` as `<label> <grouped digits>`, e.g. `Rp 1.250.000`.
/// Negative balances keep the sign next to the digits: `Rp -20.000`.
pub fn format_amount(amount: i64, format: &AmountFormat) -> String {
    let digits = group_digits(amount.unsigned_abs(), format.grouping_separator);
    let sign = if amount < 0 { "-" } else { "" };
    if format.label.is_empty() {
        format!("{sign}{digits}")
    } else {
        format!("{} {sign}{digits}", format.label)
    }
}

pub fn group_digits(value: u64, separator: char) -> String {
    let raw = value.to_string();
    let mut out = String::with_capacity(raw.len() + raw.len() / 3);
    for (idx, ch) in raw.chars().enumerate() {
        if idx > 0 && (raw.len() - idx) % 3 == 0 {
            out.push(separator);
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_thousands() {
        assert_eq!(group_digits(0, '.'), "0");
        assert_eq!(group_digits(999, '.'), "999");
        assert_eq!(group_digits(1_000, '.'), "1.000");
        assert_eq!(group_digits(1_250_000, ','), "1,250,000");
    }

    #[test]
    fn formats_with_label_and_sign() {
        let format = AmountFormat::default();
        assert_eq!(format_amount(50_000, &format), "Rp 50.000");
        assert_eq!(format_amount(-20_000, &format), "Rp -20.000");
        assert_eq!(format_amount(i64::MIN, &format).len(), 29);
    }

    #[test]
    fn empty_label_prints_digits_only() {
        let format = AmountFormat {
            label: String::new(),
            grouping_separator: ',',
        };
        assert_eq!(format_amount(1_234, &format), "1,234");
    }
}
