//! Landmark photo selection for airport detail pages

/// Known cities and their landmark photo, in lookup order
pub const CITY_PHOTOS: &[(&str, &str)] = &[
    ("Kolwezi", "/kolwezi-mining.jpg"),
    ("Lubumbashi", "/lubumbashi-gecamines.jpg"),
    ("Kinshasa", "/kinshasa-boulevard.jpg"),
    ("Paris", "/paris-eiffel.jpg"),
    ("Roissy-en-France", "/paris-eiffel.jpg"),
    ("New York", "/newyork-liberty.jpg"),
    ("Los Angeles", "/newyork-liberty.jpg"),
    ("London", "/london-bigben.jpg"),
    ("Tokyo", "/tokyo-tower.jpg"),
    ("Dubai", "/dubai-burj.jpg"),
];

const FALLBACK_PHOTOS: u64 = 9;

fn exact(city: &str) -> Option<&'static str> {
    CITY_PHOTOS
        .iter()
        .find(|(key, _)| *key == city)
        .map(|(_, photo)| *photo)
}

/// Municipality up to the first '(' and then the first ',', trimmed
fn normalize(municipality: &str) -> &str {
    let head = municipality.split('(').next().unwrap_or(municipality);
    head.split(',').next().unwrap_or(head).trim()
}

/// 64-bit FNV-1a
fn fnv1a(bytes: &[u8]) -> u64 {
    bytes.iter().fold(0xcbf2_9ce4_8422_2325, |hash, byte| {
        (hash ^ u64::from(*byte)).wrapping_mul(0x0100_0000_01b3)
    })
}

/// Leading decimal integer of `value`: optional whitespace, an optional
/// sign, then at least one digit. Anything after the digits is ignored.
fn leading_integer(value: &str) -> Option<i64> {
    let value = value.trim_start();
    let unsigned = value.trim_start_matches(['+', '-']);
    let sign_len = value.len() - unsigned.len();
    if sign_len > 1 {
        return None;
    }
    let digits = unsigned
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(unsigned.len());
    if digits == 0 {
        return None;
    }
    value[..sign_len + digits].parse().ok()
}

/// Fallback picture chosen deterministically from the airport id.
/// Ids starting with an integer use its value, anything else a stable hash.
#[must_use]
pub fn fallback_photo(airport_id: &str) -> String {
    let slot = match leading_integer(airport_id) {
        Some(n) => n.rem_euclid(FALLBACK_PHOTOS as i64) as u64,
        None => fnv1a(airport_id.as_bytes()) % FALLBACK_PHOTOS,
    };
    let extension = if slot == 4 { "webp" } else { "jpg" };
    format!("/africa-{}.{}", slot + 1, extension)
}

/// Photo path for an airport. Tries an exact city match, then the
/// normalized municipality, then case-insensitive containment either way.
#[must_use]
pub fn resolve_photo(municipality: Option<&str>, airport_id: &str) -> String {
    let Some(city) = municipality.filter(|m| !m.trim().is_empty()) else {
        return fallback_photo(airport_id);
    };

    if let Some(photo) = exact(city) {
        return photo.to_string();
    }

    let normalized = normalize(city);
    if let Some(photo) = exact(normalized) {
        return photo.to_string();
    }

    let city_lower = city.to_lowercase();
    let normalized_lower = normalized.to_lowercase();
    let found = CITY_PHOTOS.iter().find(|(key, _)| {
        let key = key.to_lowercase();
        city_lower.contains(&key)
            || normalized_lower.contains(&key)
            || key.contains(&city_lower)
            || (!normalized_lower.is_empty() && key.contains(&normalized_lower))
    });

    match found {
        Some((_, photo)) => (*photo).to_string(),
        None => fallback_photo(airport_id),
    }
}
