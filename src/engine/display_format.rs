// ==========================================
// 制造业 ERP - 展示格式化
// ==========================================
// 数量千分位、百分比、日期
// ==========================================

use chrono::{NaiveDate, NaiveDateTime};

/// 数量格式化：千分位 + 固定小数位
///
/// # 示例
/// - format_quantity(1234567.891, 2) == "1,234,567.89"
pub fn format_quantity(value: f64, decimals: usize) -> String {
    let formatted = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match formatted.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (formatted.as_str(), None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (idx, ch) in int_part.chars().enumerate() {
        if idx > 0 && (int_part.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let negative = value < 0.0 && formatted.chars().any(|c| c != '0' && c != '.');
    let sign = if negative { "-" } else { "" };
    match frac_part {
        Some(frac) => format!("{}{}.{}", sign, grouped, frac),
        None => format!("{}{}", sign, grouped),
    }
}

/// 比例格式化为百分比（0.755 → "75.5%"）
pub fn format_percent(ratio: f64, decimals: usize) -> String {
    format!("{:.*}%", decimals, ratio * 100.0)
}

pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

pub fn format_datetime(ts: NaiveDateTime) -> String {
    ts.format("%Y-%m-%d %H:%M").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_quantity() {
        assert_eq!(format_quantity(1234567.891, 2), "1,234,567.89");
        assert_eq!(format_quantity(999.0, 0), "999");
        assert_eq!(format_quantity(1000.0, 0), "1,000");
        assert_eq!(format_quantity(-2500.5, 1), "-2,500.5");
        assert_eq!(format_quantity(-0.001, 2), "0.00");
        assert_eq!(format_quantity(0.0, 2), "0.00");
    }

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(0.755, 1), "75.5%");
        assert_eq!(format_percent(1.0, 0), "100%");
        assert_eq!(format_percent(0.0, 1), "0.0%");
    }

    #[test]
    fn test_format_dates() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 5).unwrap();
        assert_eq!(format_date(date), "2026-10-05");
        assert_eq!(format_datetime(date.and_hms_opt(7, 3, 9).unwrap()), "2026-10-05 07:03");
    }
}
