//! Output of the stats page

pub mod html;
pub mod text;

pub use html::render_page;
pub use text::render_text;

/// Shortest decimal form of `value` with commas between thousands in the
/// integer part, e.g. `1234567.5` -> `1,234,567.5`
pub fn format_with_commas(value: f64) -> String {
    // -0 prints as 0
    let text = if value == 0.0 {
        "0".to_string()
    } else {
        value.to_string()
    };
    let (sign, unsigned) = match text.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", text.as_str()),
    };
    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (unsigned, None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    match frac_part {
        Some(frac) => format!("{}{}.{}", sign, grouped, frac),
        None => format!("{}{}", sign, grouped),
    }
}

/// Fixed number of decimal places
pub fn format_fixed(value: f64, decimals: usize) -> String {
    format!("{:.*}", decimals, value)
}

pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_with_commas() {
        assert_eq!(format_with_commas(0.0), "0");
        assert_eq!(format_with_commas(-0.0), "0");
        assert_eq!(format_with_commas(999.0), "999");
        assert_eq!(format_with_commas(1000.0), "1,000");
        assert_eq!(format_with_commas(1234567.0), "1,234,567");
        assert_eq!(format_with_commas(1234567.25), "1,234,567.25");
        assert_eq!(format_with_commas(-98765.5), "-98,765.5");
        assert_eq!(format_with_commas(0.125), "0.125");
    }

    #[test]
    fn test_format_fixed() {
        assert_eq!(format_fixed(0.5, 7), "0.5000000");
        assert_eq!(format_fixed(200.0, 7), "200.0000000");
        assert_eq!(format_fixed(1.0 / 3.0, 7), "0.3333333");
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#39;Jerry&#39;&lt;/a&gt;"
        );
    }
}
