use super::{AddCafeForm, NewCafe, ValidationError, ValidationResult};

/// Trait for validating input models
pub trait Validate {
    fn validate(&self) -> ValidationResult<()>;
}

/// Column lengths of the `cafe` table
pub const MAX_NAME_LENGTH: usize = 250;
pub const MAX_URL_LENGTH: usize = 500;
pub const MAX_LOCATION_LENGTH: usize = 250;
pub const MAX_SEATS_LENGTH: usize = 250;
pub const MAX_PRICE_LENGTH: usize = 250;

impl Validate for NewCafe {
    fn validate(&self) -> ValidationResult<()> {
        validate_length("name", self.name.as_deref(), MAX_NAME_LENGTH)?;
        validate_length("map_url", self.map_url.as_deref(), MAX_URL_LENGTH)?;
        validate_length("img_url", self.img_url.as_deref(), MAX_URL_LENGTH)?;
        validate_length("location", self.location.as_deref(), MAX_LOCATION_LENGTH)?;
        validate_length("seats", self.seats.as_deref(), MAX_SEATS_LENGTH)?;
        validate_length("coffee_price", self.coffee_price.as_deref(), MAX_PRICE_LENGTH)?;
        Ok(())
    }
}

impl TryFrom<AddCafeForm> for NewCafe {
    type Error = ValidationError;

    fn try_from(form: AddCafeForm) -> ValidationResult<Self> {
        let cafe = NewCafe {
            has_toilet: parse_flag("has_toilet", form.has_toilet.as_deref())?,
            has_wifi: parse_flag("has_wifi", form.has_wifi.as_deref())?,
            has_sockets: parse_flag("has_sockets", form.has_sockets.as_deref())?,
            can_take_calls: parse_flag("can_take_calls", form.can_take_calls.as_deref())?,
            name: form.name,
            map_url: form.map_url,
            img_url: form.img_url,
            location: form.location,
            seats: form.seats,
            coffee_price: form.coffee_price,
        };
        cafe.validate()?;
        Ok(cafe)
    }
}

/// Parse an integer-like amenity flag ("0", "1", ...). Any non-zero integer is `true`.
pub fn parse_flag(field: &str, value: Option<&str>) -> ValidationResult<bool> {
    let raw = value.ok_or_else(|| ValidationError::RequiredField {
        field: field.to_string(),
    })?;

    raw.trim()
        .parse::<i64>()
        .map(|n| n != 0)
        .map_err(|_| ValidationError::InvalidValue {
            field: field.to_string(),
            value: raw.to_string(),
            reason: "expected an integer".to_string(),
        })
}

/// Reject values longer than the backing column; absent values are left to the store
pub fn validate_length(field: &str, value: Option<&str>, max_length: usize) -> ValidationResult<()> {
    if let Some(value) = value {
        let actual_length = value.chars().count();
        if actual_length > max_length {
            return Err(ValidationError::TooLong {
                field: field.to_string(),
                max_length,
                actual_length,
            });
        }
    }
    Ok(())
}
