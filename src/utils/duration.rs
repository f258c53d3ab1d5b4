//! Duration strings in the `1h2m3.5s` style.
//!
//! `/health` reports uptime this way and clients parse it back, so
//! `parse_duration(&format_duration(d)) == d` for every `d` below ~584 years.

use std::time::Duration;

const NANOS_PER_MICRO: u128 = 1_000;
const NANOS_PER_MILLI: u128 = 1_000_000;
const NANOS_PER_SEC: u128 = 1_000_000_000;

/// 格式化为 `1m2.345s` 形式；小于一秒时使用 ms/µs/ns
pub fn format_duration(d: Duration) -> String {
    let nanos = d.as_nanos();

    if nanos == 0 {
        return "0s".to_string();
    }
    if nanos < NANOS_PER_MICRO {
        return format!("{}ns", nanos);
    }
    if nanos < NANOS_PER_MILLI {
        return format!("{}µs", fixed_point(nanos, 3));
    }
    if nanos < NANOS_PER_SEC {
        return format!("{}ms", fixed_point(nanos, 6));
    }

    let total_secs = d.as_secs();
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let secs_nanos = u128::from(total_secs % 60) * NANOS_PER_SEC + u128::from(d.subsec_nanos());

    let mut out = String::new();
    if hours > 0 {
        out.push_str(&format!("{}h", hours));
    }
    if hours > 0 || minutes > 0 {
        out.push_str(&format!("{}m", minutes));
    }
    out.push_str(&format!("{}s", fixed_point(secs_nanos, 9)));
    out
}

/// `value / 10^scale` with trailing fractional zeros removed.
fn fixed_point(value: u128, scale: u32) -> String {
    let divisor = 10u128.pow(scale);
    let int = value / divisor;
    let frac = value % divisor;
    if frac == 0 {
        return int.to_string();
    }

    let frac = format!("{:0width$}", frac, width = scale as usize);
    format!("{}.{}", int, frac.trim_end_matches('0'))
}

/// 解析时长字符串，支持单位 ns / us / µs / ms / s / m / h，可组合，可带小数
///
/// 例如 `300ms`、`1.5h`、`2h45m`、`1m2.345s`。单独的 `0` 也是合法输入。
pub fn parse_duration(input: &str) -> Result<Duration, String> {
    let input = input.trim();
    if input.is_empty() {
        return Err("empty duration".to_string());
    }
    if input == "0" {
        return Ok(Duration::ZERO);
    }
    if input.starts_with('-') {
        return Err(format!("negative duration: '{}'", input));
    }

    let mut total: u128 = 0;
    let mut remaining = input.strip_prefix('+').unwrap_or(input);

    while !remaining.is_empty() {
        let num_len = remaining
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(remaining.len());
        let num_str = &remaining[..num_len];
        if num_str.is_empty() || num_str == "." {
            return Err(format!("invalid duration: '{}'", input));
        }
        remaining = &remaining[num_len..];

        let unit_len = remaining
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(remaining.len());
        let unit = &remaining[..unit_len];
        remaining = &remaining[unit_len..];

        let unit_nanos = match unit {
            "ns" => 1,
            "us" | "µs" | "μs" => NANOS_PER_MICRO,
            "ms" => NANOS_PER_MILLI,
            "s" => NANOS_PER_SEC,
            "m" => 60 * NANOS_PER_SEC,
            "h" => 3600 * NANOS_PER_SEC,
            "" => return Err(format!("missing unit in duration: '{}'", input)),
            other => return Err(format!("unknown unit '{}' in duration: '{}'", other, input)),
        };

        total = total
            .checked_add(scale_number(num_str, unit_nanos, input)?)
            .ok_or_else(|| format!("duration out of range: '{}'", input))?;
    }

    let secs = u64::try_from(total / NANOS_PER_SEC)
        .map_err(|_| format!("duration out of range: '{}'", input))?;
    Ok(Duration::new(secs, (total % NANOS_PER_SEC) as u32))
}

/// `num_str` × `unit_nanos` in exact integer arithmetic.
fn scale_number(num_str: &str, unit_nanos: u128, input: &str) -> Result<u128, String> {
    let invalid = || format!("invalid number '{}' in duration: '{}'", num_str, input);
    let overflow = || format!("duration out of range: '{}'", input);

    let (int_part, frac_part) = match num_str.split_once('.') {
        Some((i, f)) => (i, f),
        None => (num_str, ""),
    };
    if frac_part.contains('.') {
        return Err(invalid());
    }

    let int: u128 = if int_part.is_empty() {
        0
    } else {
        int_part.parse().map_err(|_| invalid())?
    };
    let mut nanos = int.checked_mul(unit_nanos).ok_or_else(overflow)?;

    // 小数部分逐位累加，超出纳秒精度的位被截断
    let mut place = unit_nanos;
    for digit in frac_part.chars() {
        let digit = digit.to_digit(10).ok_or_else(invalid)? as u128;
        place /= 10;
        if place == 0 {
            break;
        }
        nanos = nanos.checked_add(digit * place).ok_or_else(overflow)?;
    }
    Ok(nanos)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_like_go() {
        assert_eq!(format_duration(Duration::ZERO), "0s");
        assert_eq!(format_duration(Duration::from_nanos(15)), "15ns");
        assert_eq!(format_duration(Duration::from_nanos(1_500)), "1.5µs");
        assert_eq!(format_duration(Duration::from_micros(2_250)), "2.25ms");
        assert_eq!(format_duration(Duration::from_secs(42)), "42s");
        assert_eq!(format_duration(Duration::from_millis(62_345)), "1m2.345s");
        assert_eq!(format_duration(Duration::from_secs(3600)), "1h0m0s");
        assert_eq!(
            format_duration(Duration::new(3 * 3600 + 7 * 60 + 9, 5)),
            "3h7m9.000000005s"
        );
    }

    #[test]
    fn parses_compound_and_fractional_values() {
        assert_eq!(parse_duration("0").unwrap(), Duration::ZERO);
        assert_eq!(parse_duration("300ms").unwrap(), Duration::from_millis(300));
        assert_eq!(parse_duration("1.5h").unwrap(), Duration::from_secs(5400));
        assert_eq!(parse_duration("2h45m").unwrap(), Duration::from_secs(9900));
        assert_eq!(parse_duration("1m2.345s").unwrap(), Duration::from_millis(62_345));
        assert_eq!(parse_duration("1.5µs").unwrap(), Duration::from_nanos(1_500));
        assert_eq!(parse_duration(".5s").unwrap(), Duration::from_millis(500));
    }

    #[test]
    fn rejects_malformed_input() {
        assert!(parse_duration("").is_err());
        assert!(parse_duration("10").is_err());
        assert!(parse_duration("1d").is_err());
        assert!(parse_duration("-1s").is_err());
        assert!(parse_duration("1.2.3s").is_err());
        assert!(parse_duration("abc").is_err());
    }

    #[test]
    fn formatted_values_parse_back() {
        for nanos in [1u64, 999, 1_000, 123_456, 999_999_999, 1_000_000_000, 62_345_000_000] {
            let d = Duration::from_nanos(nanos);
            assert_eq!(parse_duration(&format_duration(d)).unwrap(), d);
        }
        let long = Duration::new(90_061, 250_000_000);
        assert_eq!(parse_duration(&format_duration(long)).unwrap(), long);
    }
}
