//! Field rules for device requests, used through `#[garde(custom(...))]`.

use common::garde::{length_between, not_empty_id, required};

pub const MAC_LENGTH_MESSAGE: &str = "MAC address must be between 12 and 17 characters";
pub const NAME_LENGTH_MESSAGE: &str = "Name must be between 3 and 50 characters";
pub const TYPE_LENGTH_MESSAGE: &str = "Type must be between 3 and 20 characters";
pub const HOME_ID_LENGTH_MESSAGE: &str = "Home ID must be between 5 and 30 characters";

fn mac_rules(value: &str) -> garde::Result {
    length_between(value, 12, 17, MAC_LENGTH_MESSAGE)
}

fn name_rules(value: &str) -> garde::Result {
    length_between(value, 3, 50, NAME_LENGTH_MESSAGE)
}

fn type_rules(value: &str) -> garde::Result {
    length_between(value, 3, 20, TYPE_LENGTH_MESSAGE)
}

fn home_id_rules(value: &str) -> garde::Result {
    length_between(value, 5, 30, HOME_ID_LENGTH_MESSAGE)
}

/// Absent and empty optional values are not validated
fn when_present(value: &Option<String>, rules: fn(&str) -> garde::Result) -> garde::Result {
    match value.as_deref() {
        Some(value) if !value.is_empty() => rules(value),
        _ => Ok(()),
    }
}

pub fn validate_device_id(value: &str, _: &()) -> garde::Result {
    not_empty_id(value, "id")
}

pub fn validate_mac(value: &str, _: &()) -> garde::Result {
    required(value, "mac")?;
    mac_rules(value)
}

pub fn validate_name(value: &str, _: &()) -> garde::Result {
    required(value, "name")?;
    name_rules(value)
}

pub fn validate_type(value: &str, _: &()) -> garde::Result {
    required(value, "type")?;
    type_rules(value)
}

pub fn validate_home_id(value: &str, _: &()) -> garde::Result {
    required(value, "homeId")?;
    home_id_rules(value)
}

pub fn validate_optional_mac(value: &Option<String>, _: &()) -> garde::Result {
    when_present(value, mac_rules)
}

pub fn validate_optional_name(value: &Option<String>, _: &()) -> garde::Result {
    when_present(value, name_rules)
}

pub fn validate_optional_type(value: &Option<String>, _: &()) -> garde::Result {
    when_present(value, type_rules)
}

pub fn validate_optional_home_id(value: &Option<String>, _: &()) -> garde::Result {
    when_present(value, home_id_rules)
}
