const MB: f64 = 1024.0 * 1024.0;

pub struct FileSizeUtils;

impl FileSizeUtils {
    pub fn format_size(size: u64) -> String {
        const UNITS: [&str; 6] = ["B", "KB", "MB", "GB", "TB", "PB"];
        let mut size = size as f64;
        let mut unit_index = 0;

        while size >= 1024.0 && unit_index < UNITS.len() - 1 {
            size /= 1024.0;
            unit_index += 1;
        }

        if unit_index == 0 {
            format!("{} {}", size as u64, UNITS[unit_index])
        } else {
            format!("{:.2} {}", size, UNITS[unit_index])
        }
    }

    /// Label sent as the `fileSize` form field and shown on upload rows.
    pub fn upload_label(size: u64) -> String {
        format!("{:.2}MB", size as f64 / MB)
    }

    /// Explorer column text for a size reported by the file service.
    pub fn listing_label(size: i64) -> String {
        format!("{:.2} MB", size.max(0) as f64 / MB)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upload_label_is_megabytes_with_two_decimals() {
        assert_eq!(FileSizeUtils::upload_label(2 * 1024 * 1024), "2.00MB");
        assert_eq!(FileSizeUtils::upload_label(0), "0.00MB");
        assert_eq!(FileSizeUtils::upload_label(1536 * 1024), "1.50MB");
    }

    #[test]
    fn listing_label_has_space_and_clamps_negative() {
        assert_eq!(FileSizeUtils::listing_label(3 * 1024 * 1024), "3.00 MB");
        assert_eq!(FileSizeUtils::listing_label(-5), "0.00 MB");
    }

    #[test]
    fn format_size_picks_unit() {
        assert_eq!(FileSizeUtils::format_size(512), "512 B");
        assert_eq!(FileSizeUtils::format_size(2048), "2.00 KB");
    }
}
