//! 上传文件命名与类型推断

use std::path::Path;

const MAX_NAME_LEN: usize = 100;

/// Reduce a client-supplied filename to `[A-Za-z0-9._-]`, without any
/// directory component or leading dots.
pub fn sanitize_filename(original: &str) -> String {
    // 浏览器可能发送完整路径（Windows 下常见）
    let base = original.rsplit(['/', '\\']).next().unwrap_or(original);

    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim_start_matches('.');

    if cleaned.is_empty() {
        return "upload".to_string();
    }

    // 保留扩展名，截断主体部分
    if cleaned.len() > MAX_NAME_LEN {
        if let Some((stem, ext)) = cleaned.rsplit_once('.')
            && ext.len() < 16
        {
            let keep = MAX_NAME_LEN.saturating_sub(ext.len() + 1);
            return format!("{}.{}", &stem[..keep.min(stem.len())], ext);
        }
        return cleaned[..MAX_NAME_LEN].to_string();
    }
    cleaned.to_string()
}

/// `<unix-seconds>-<8 random hex>-<sanitised name>`
pub fn unique_upload_name(original: &str, unix_secs: i64) -> String {
    format!(
        "{}-{:08x}-{}",
        unix_secs,
        rand::random::<u32>(),
        sanitize_filename(original)
    )
}

/// A request path segment that is safe to join onto the upload directory.
pub fn is_safe_relative_path(path: &str) -> bool {
    !path.is_empty()
        && !path.starts_with('/')
        && !path.contains('\\')
        && Path::new(path)
            .components()
            .all(|c| matches!(c, std::path::Component::Normal(_)))
}

/// 根据文件扩展名确定 Content-Type
pub fn content_type_for(path: &str) -> &'static str {
    let ext = path
        .rsplit('.')
        .next()
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "css" => "text/css; charset=utf-8",
        "js" => "application/javascript",
        "json" => "application/json",
        "html" => "text/html; charset=utf-8",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "ico" => "image/x-icon",
        "woff" => "font/woff",
        "woff2" => "font/woff2",
        "ttf" => "font/ttf",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_strips_paths_and_odd_characters() {
        assert_eq!(sanitize_filename("logo.png"), "logo.png");
        assert_eq!(sanitize_filename("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_filename("C:\\Users\\me\\my icon.png"), "my_icon.png");
        assert_eq!(sanitize_filename(".hidden"), "hidden");
        assert_eq!(sanitize_filename("..."), "upload");
        assert_eq!(sanitize_filename(""), "upload");
    }

    #[test]
    fn sanitize_truncates_but_keeps_extension() {
        let long = format!("{}.png", "a".repeat(300));
        let cleaned = sanitize_filename(&long);
        assert_eq!(cleaned.len(), MAX_NAME_LEN);
        assert!(cleaned.ends_with(".png"));
    }

    #[test]
    fn unique_names_have_time_and_random_parts() {
        let a = unique_upload_name("logo.png", 1_700_000_000);
        let b = unique_upload_name("logo.png", 1_700_000_000);

        assert!(a.starts_with("1700000000-"));
        assert!(a.ends_with("-logo.png"));
        let random = &a["1700000000-".len().."1700000000-".len() + 8];
        assert!(random.chars().all(|c| c.is_ascii_hexdigit()));
        // 同一秒、同名上传也不会冲突（概率 2^-32）
        assert_ne!(a, b);
    }

    #[test]
    fn rejects_traversal() {
        assert!(is_safe_relative_path("1700000000-ab12cd34-logo.png"));
        assert!(!is_safe_relative_path("../db.sqlite3"));
        assert!(!is_safe_relative_path("/etc/passwd"));
        assert!(!is_safe_relative_path("a/../../b"));
        assert!(!is_safe_relative_path("..\\db"));
        assert!(!is_safe_relative_path(""));
    }

    #[test]
    fn content_types_by_extension() {
        assert_eq!(content_type_for("styles.css"), "text/css; charset=utf-8");
        assert_eq!(content_type_for("icon.PNG"), "image/png");
        assert_eq!(content_type_for("noext"), "application/octet-stream");
    }
}
