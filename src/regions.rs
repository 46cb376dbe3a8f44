//! Allow-list of the administrative regions the CWA county forecast covers.

/// Every county and city name accepted by the named-region endpoint.
pub const VALID_CITIES: [&str; 22] = [
    "臺北市", "新北市", "桃園市", "臺中市", "臺南市", "高雄市", "基隆市", "新竹市", "嘉義市",
    "新竹縣", "苗栗縣", "彰化縣", "南投縣", "雲林縣", "嘉義縣", "屏東縣", "宜蘭縣", "花蓮縣",
    "臺東縣", "澎湖縣", "金門縣", "連江縣",
];

/// Region served by `/api/weather/kaohsiung`.
pub const KAOHSIUNG: &str = "高雄市";

/// Exact membership check; callers are responsible for URL-decoding.
#[must_use]
pub fn is_valid_city(name: &str) -> bool {
    VALID_CITIES.contains(&name)
}

/// The allow-list joined for human-readable messages.
#[must_use]
pub fn valid_cities_list() -> String {
    VALID_CITIES.join(", ")
}
