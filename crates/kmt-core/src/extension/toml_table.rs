use crate::datetime;
use std::time::Duration;
use toml::{Table, Value};

/// Extension trait for [`Table`](toml::Table).
pub trait TomlTableExt {
    /// Extracts the boolean value corresponding to the key.
    fn get_bool(&self, key: &str) -> Option<bool>;

    /// Extracts the integer value corresponding to the key and
    /// represents it as `u16` if possible.
    fn get_u16(&self, key: &str) -> Option<u16>;

    /// Extracts the integer value corresponding to the key and
    /// represents it as `usize` if possible.
    fn get_usize(&self, key: &str) -> Option<usize>;

    /// Extracts the string corresponding to the key.
    fn get_str(&self, key: &str) -> Option<&str>;

    /// Extracts the table value corresponding to the key.
    fn get_table(&self, key: &str) -> Option<&Table>;

    /// Extracts the string corresponding to the key
    /// and parses it as `Duration`.
    fn get_duration(&self, key: &str) -> Option<Duration>;
}

impl TomlTableExt for Table {
    #[inline]
    fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(|v| v.as_bool())
    }

    #[inline]
    fn get_u16(&self, key: &str) -> Option<u16> {
        self.get(key)
            .and_then(|v| v.as_integer())
            .and_then(|i| u16::try_from(i).ok())
    }

    #[inline]
    fn get_usize(&self, key: &str) -> Option<usize> {
        self.get(key)
            .and_then(|v| v.as_integer())
            .and_then(|i| usize::try_from(i).ok())
    }

    #[inline]
    fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(|v| v.as_str())
    }

    #[inline]
    fn get_table(&self, key: &str) -> Option<&Table> {
        self.get(key).and_then(|v| v.as_table())
    }

    fn get_duration(&self, key: &str) -> Option<Duration> {
        let value = self.get_str(key)?;
        datetime::parse_duration(value)
            .inspect_err(|err| tracing::warn!("fail to parse the duration `{key}`: {err}"))
            .ok()
    }
}

#[cfg(test)]
mod tests {
    use super::TomlTableExt;
    use std::time::Duration;
    use toml::Table;

    #[test]
    fn it_reads_typed_values() {
        let table = r#"
            port = 8080
            ansi = false
            payment-delay = "2s"
            broken-delay = "two seconds"

            [emailjs]
            service-id = "service_35mr6kh"
        "#
        .parse::<Table>()
        .unwrap();
        assert_eq!(table.get_u16("port"), Some(8080));
        assert_eq!(table.get_bool("ansi"), Some(false));
        assert_eq!(table.get_duration("payment-delay"), Some(Duration::from_secs(2)));
        assert_eq!(table.get_duration("broken-delay"), None);
        assert_eq!(
            table.get_table("emailjs").and_then(|t| t.get_str("service-id")),
            Some("service_35mr6kh")
        );
    }
}
