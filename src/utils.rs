use chrono::NaiveDateTime;
use std::fs;
use std::io;
use std::path::Path;

/// Brazilian currency text: `R$ 1.234.567,89`.
pub fn format_brl(amount: f64) -> String {
    let cents = (amount * 100.0).round() as i64;
    let sign = if cents < 0 { "-" } else { "" };
    let cents = cents.abs();
    let whole = (cents / 100).to_string();

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    format!("{}R$ {},{:02}", sign, grouped, cents % 100)
}

pub fn format_timestamp(ts: &NaiveDateTime) -> String {
    ts.format("%d/%m/%Y %H:%M").to_string()
}

/// Creates the directory that will hold `file_path`, if it has one.
pub fn ensure_parent_dir(file_path: &str) -> io::Result<()> {
    match Path::new(file_path).parent() {
        Some(dir) if !dir.as_os_str().is_empty() => fs::create_dir_all(dir),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::env;
    use std::path::PathBuf;

    #[test]
    fn creates_missing_parent_directories() {
        let mut root: PathBuf = env::temp_dir();
        root.push(format!("megasena_utils_{}", std::process::id()));
        let _ = fs::remove_dir_all(&root);
        let file = root.join("nested").join("picks.db");

        ensure_parent_dir(file.to_str().unwrap()).unwrap();
        assert!(root.join("nested").is_dir());
        assert!(!file.exists());

        // Already present, and bare file names have no parent to create.
        ensure_parent_dir(file.to_str().unwrap()).unwrap();
        ensure_parent_dir("picks.db").unwrap();

        fs::remove_dir_all(&root).unwrap();
    }

    #[test]
    fn brl_grouping() {
        assert_eq!(format_brl(0.0), "R$ 0,00");
        assert_eq!(format_brl(1034.9), "R$ 1.034,90");
        assert_eq!(format_brl(52345.678), "R$ 52.345,68");
        assert_eq!(format_brl(35_000_000.0), "R$ 35.000.000,00");
        assert_eq!(format_brl(999.999), "R$ 1.000,00");
    }

    #[test]
    fn timestamp_display() {
        let ts = NaiveDate::from_ymd_opt(2025, 9, 3)
            .unwrap()
            .and_hms_opt(8, 5, 0)
            .unwrap();
        assert_eq!(format_timestamp(&ts), "03/09/2025 08:05");
    }
}
