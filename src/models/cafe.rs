use serde::{Deserialize, Serialize};

/// A cafe venue and its amenities, as stored in the `cafe` table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Cafe {
    pub id: i64,
    pub name: String,
    pub map_url: String,
    pub img_url: String,
    pub location: String,
    pub seats: String,
    pub has_toilet: bool,
    pub has_wifi: bool,
    pub has_sockets: bool,
    pub can_take_calls: bool,
    pub coffee_price: Option<String>,
}

/// Raw form submission for `POST /add`.
///
/// Every field is optional here: flags are checked while converting into a
/// [`NewCafe`], text presence is left to the store's NOT NULL constraints.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AddCafeForm {
    pub name: Option<String>,
    pub map_url: Option<String>,
    pub img_url: Option<String>,
    pub location: Option<String>,
    pub seats: Option<String>,
    pub has_toilet: Option<String>,
    pub has_wifi: Option<String>,
    pub has_sockets: Option<String>,
    pub can_take_calls: Option<String>,
    pub coffee_price: Option<String>,
}

/// Insert model: flags parsed, text passed through to the store as submitted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCafe {
    pub name: Option<String>,
    pub map_url: Option<String>,
    pub img_url: Option<String>,
    pub location: Option<String>,
    pub seats: Option<String>,
    pub has_toilet: bool,
    pub has_wifi: bool,
    pub has_sockets: bool,
    pub can_take_calls: bool,
    pub coffee_price: Option<String>,
}

/// `{"cafe": {...}}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CafeResponse {
    pub cafe: Cafe,
}

/// `{"cafes": [...]}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CafeListResponse {
    pub cafes: Vec<Cafe>,
}

impl NewCafe {
    /// Name used in logs and error messages when the submission omitted one
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("<missing>")
    }
}

impl From<Cafe> for CafeResponse {
    fn from(cafe: Cafe) -> Self {
        Self { cafe }
    }
}

impl From<Vec<Cafe>> for CafeListResponse {
    fn from(cafes: Vec<Cafe>) -> Self {
        Self { cafes }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn create_test_cafe() -> Cafe {
        Cafe {
            id: 7,
            name: "Science Gallery London".to_string(),
            map_url: "https://g.page/scigallerylon".to_string(),
            img_url: "https://example.com/sci.jpg".to_string(),
            location: "London Bridge".to_string(),
            seats: "50+".to_string(),
            has_toilet: true,
            has_wifi: false,
            has_sockets: true,
            can_take_calls: true,
            coffee_price: Some("£2.40".to_string()),
        }
    }

    #[test]
    fn test_cafe_serializes_as_flat_object() {
        let value = serde_json::to_value(create_test_cafe()).unwrap();

        assert_eq!(
            value,
            json!({
                "id": 7,
                "name": "Science Gallery London",
                "map_url": "https://g.page/scigallerylon",
                "img_url": "https://example.com/sci.jpg",
                "location": "London Bridge",
                "seats": "50+",
                "has_toilet": true,
                "has_wifi": false,
                "has_sockets": true,
                "can_take_calls": true,
                "coffee_price": "£2.40"
            })
        );
    }

    #[test]
    fn test_missing_price_serializes_as_null() {
        let mut cafe = create_test_cafe();
        cafe.coffee_price = None;

        let value = serde_json::to_value(&cafe).unwrap();
        assert!(value["coffee_price"].is_null());
    }

    #[test]
    fn test_envelopes() {
        let single = serde_json::to_value(CafeResponse::from(create_test_cafe())).unwrap();
        assert_eq!(single["cafe"]["id"], 7);

        let list = serde_json::to_value(CafeListResponse::from(vec![create_test_cafe()])).unwrap();
        assert_eq!(list["cafes"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_display_name_falls_back_when_missing() {
        let cafe = NewCafe {
            name: None,
            map_url: None,
            img_url: None,
            location: None,
            seats: None,
            has_toilet: false,
            has_wifi: false,
            has_sockets: false,
            can_take_calls: false,
            coffee_price: None,
        };
        assert_eq!(cafe.display_name(), "<missing>");
    }
}
