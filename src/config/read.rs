//! Typed accessors over parsed TOML tables.
//!
//! Each reader looks up `key` either at the top of `table` or inside the
//! sub-table `section`. When a value of the right type is present it is
//! written to `dest` and the reader returns `true`; otherwise `dest` is left
//! untouched and the reader returns `false`. Cascading is nothing more than
//! calling these readers over successive sources in root-to-leaf order.

use toml::{Table, Value};

/// Looks up `key` in `table`, or in `table[section]` when a section is given.
pub fn lookup<'a>(table: &'a Table, section: Option<&str>, key: &str) -> Option<&'a Value> {
    match section {
        Some(section) => table.get(section)?.as_table()?.get(key),
        None => table.get(key),
    }
}

/// Reads a boolean. Integers are accepted for backward compatibility (0 is false).
pub fn read_bool(dest: &mut bool, table: &Table, section: Option<&str>, key: &str) -> bool {
    let value = match lookup(table, section, key) {
        Some(Value::Boolean(b)) => *b,
        Some(Value::Integer(i)) => *i != 0,
        _ => return false,
    };
    *dest = value;
    true
}

pub fn read_int(dest: &mut i64, table: &Table, section: Option<&str>, key: &str) -> bool {
    match lookup(table, section, key) {
        Some(Value::Integer(i)) => {
            *dest = *i;
            true
        }
        _ => false,
    }
}

/// Reads a floating point number. Integer literals are widened.
pub fn read_double(dest: &mut f64, table: &Table, section: Option<&str>, key: &str) -> bool {
    match lookup(table, section, key).and_then(as_number) {
        Some(value) => {
            *dest = value;
            true
        }
        None => false,
    }
}

pub fn read_string(dest: &mut String, table: &Table, section: Option<&str>, key: &str) -> bool {
    match lookup(table, section, key) {
        Some(Value::String(s)) => {
            dest.clone_from(s);
            true
        }
        _ => false,
    }
}

/// Interprets a TOML value as a number, if it is one.
pub fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Float(f) => Some(*f),
        // i64 -> f64 may round for huge magnitudes; config values never get there.
        Value::Integer(i) => Some(*i as f64),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_table(toml_str: &str) -> Table {
        toml::from_str(toml_str).unwrap()
    }

    #[test]
    fn test_bool_accepts_integer_encoding() {
        let table = make_table(
            r#"
            on = 1
            off = 0
            flag = true
            "#,
        );
        let mut dest = false;
        assert!(read_bool(&mut dest, &table, None, "on"));
        assert!(dest);
        assert!(read_bool(&mut dest, &table, None, "off"));
        assert!(!dest);
        assert!(read_bool(&mut dest, &table, None, "flag"));
        assert!(dest);
    }

    #[test]
    fn test_absent_key_leaves_destination() {
        let table = make_table("other = 3");
        let mut b = true;
        let mut i = 42;
        let mut d = 2.5;
        let mut s = String::from("wrspice");

        assert!(!read_bool(&mut b, &table, None, "missing"));
        assert!(!read_int(&mut i, &table, None, "missing"));
        assert!(!read_double(&mut d, &table, None, "missing"));
        assert!(!read_string(&mut s, &table, None, "missing"));

        assert!(b);
        assert_eq!(i, 42);
        assert_eq!(d, 2.5);
        assert_eq!(s, "wrspice");
    }

    #[test]
    fn test_wrong_type_counts_as_absent() {
        let table = make_table(
            r#"
            threads = "many"
            name = 7
            "#,
        );
        let mut threads = 16;
        let mut name = String::from("keep");
        assert!(!read_int(&mut threads, &table, None, "threads"));
        assert!(!read_string(&mut name, &table, None, "name"));
        assert_eq!(threads, 16);
        assert_eq!(name, "keep");
    }

    #[test]
    fn test_section_lookup() {
        let table = make_table(
            r#"
            [envelope]
            dt = 2e-9
            dx = 3
            "#,
        );
        let mut dt = 0.0;
        let mut dx = 0.0;
        assert!(read_double(&mut dt, &table, Some("envelope"), "dt"));
        assert!(read_double(&mut dx, &table, Some("envelope"), "dx"));
        assert_eq!(dt, 2e-9);
        assert_eq!(dx, 3.0);

        let mut untouched = 1.0;
        assert!(!read_double(&mut untouched, &table, Some("nope"), "dt"));
        assert!(!read_double(&mut untouched, &table, None, "dt"));
        assert_eq!(untouched, 1.0);
    }
}
