use cafe_api::models::{
    parse_flag, validate_length, AddCafeForm, NewCafe, ValidationError, MAX_NAME_LENGTH,
    MAX_URL_LENGTH,
};
use proptest::prelude::*;

prop_compose! {
    fn arb_cafe_name()(name in "[a-zA-Z0-9 &'-]{1,250}") -> String {
        name
    }
}

prop_compose! {
    fn arb_flag()(value in any::<i64>(), padded in any::<bool>()) -> (i64, String) {
        let raw = if padded { format!(" {} ", value) } else { value.to_string() };
        (value, raw)
    }
}

prop_compose! {
    fn arb_form()(
        name in arb_cafe_name(),
        location in "[A-Z][a-z]{2,20}",
        flags in prop::array::uniform4(arb_flag()),
        coffee_price in prop::option::of("£[0-9]\\.[0-9]{2}"),
    ) -> AddCafeForm {
        let [toilet, wifi, sockets, calls] = flags;
        AddCafeForm {
            name: Some(name),
            map_url: Some("https://maps.example.com/cafe".to_string()),
            img_url: Some("https://img.example.com/cafe.jpg".to_string()),
            location: Some(location),
            seats: Some("20-30".to_string()),
            has_toilet: Some(toilet.1),
            has_wifi: Some(wifi.1),
            has_sockets: Some(sockets.1),
            can_take_calls: Some(calls.1),
            coffee_price,
        }
    }
}

proptest! {
    #[test]
    fn test_any_integer_flag_parses((value, raw) in arb_flag()) {
        let parsed = parse_flag("has_wifi", Some(&raw)).unwrap();
        prop_assert_eq!(parsed, value != 0);
    }

    #[test]
    fn test_non_integer_flag_is_rejected(raw in "[a-zA-Z]{1,10}") {
        let result = parse_flag("has_wifi", Some(&raw));
        let is_invalid_value = matches!(result, Err(ValidationError::InvalidValue { .. }));
        prop_assert!(is_invalid_value);
    }

    #[test]
    fn test_length_limit_counts_characters(len in 0usize..600) {
        // Multi-byte characters must count once each
        let value = "é".repeat(len);
        let result = validate_length("map_url", Some(&value), MAX_URL_LENGTH);

        if len <= MAX_URL_LENGTH {
            prop_assert!(result.is_ok());
        } else {
            match result {
                Err(ValidationError::TooLong { max_length, actual_length, .. }) => {
                    prop_assert_eq!(max_length, MAX_URL_LENGTH);
                    prop_assert_eq!(actual_length, len);
                }
                other => prop_assert!(false, "expected TooLong, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_valid_form_converts(form in arb_form()) {
        let expected_name = form.name.clone();
        let expected_price = form.coffee_price.clone();

        let cafe = NewCafe::try_from(form).unwrap();

        prop_assert_eq!(cafe.name, expected_name);
        prop_assert_eq!(cafe.coffee_price, expected_price);
    }

    #[test]
    fn test_overlong_name_is_rejected(extra in 1usize..50) {
        let form = AddCafeForm {
            name: Some("x".repeat(MAX_NAME_LENGTH + extra)),
            has_toilet: Some("0".to_string()),
            has_wifi: Some("0".to_string()),
            has_sockets: Some("0".to_string()),
            can_take_calls: Some("0".to_string()),
            ..Default::default()
        };

        let is_too_long = matches!(NewCafe::try_from(form), Err(ValidationError::TooLong { .. }));
        prop_assert!(is_too_long);
    }
}
