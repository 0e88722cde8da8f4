use crate::models::Place;
use serde::{Deserialize, Serialize};

/// Client platform, decides which maps provider a link opens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Ios,
    Android,
    #[default]
    Web,
}

const INSTAGRAM_PREFIX: &str = "https://www.instagram.com/";

/// Maps link for a place
pub fn map_url(place: &Place, platform: Platform) -> String {
    let lat = place.location.latitude;
    let lng = place.location.longitude;
    match platform {
        Platform::Ios => format!(
            "http://maps.apple.com/?ll={},{}&q={}",
            lat,
            lng,
            urlencoding::encode(&place.name)
        ),
        _ => format!("https://www.google.com/maps/search/?api=1&query={},{}", lat, lng),
    }
}

/// Profile link from either `@handle` or a profile URL
///
/// URLs may use http or https, with or without `www.`.
pub fn instagram_url(handle: &str) -> Option<String> {
    let handle = handle.trim();
    let handle = match handle.strip_prefix('@') {
        Some(stripped) => stripped,
        None => strip_profile_host(handle).trim_end_matches('/'),
    };

    if handle.is_empty() {
        return None;
    }
    Some(format!("{}{}", INSTAGRAM_PREFIX, urlencoding::encode(handle)))
}

fn strip_profile_host(handle: &str) -> &str {
    let Some(rest) = handle
        .strip_prefix("https://")
        .or_else(|| handle.strip_prefix("http://"))
    else {
        return handle;
    };
    let rest = rest.strip_prefix("www.").unwrap_or(rest);
    rest.strip_prefix("instagram.com/").unwrap_or(handle)
}

/// Text shared from the place detail screen
///
/// First line is `name - address`; the website, or failing that the map
/// link, follows on a second line.
pub fn share_message(place: &Place, platform: Platform) -> String {
    let headline = format!("{} - {}", place.name, place.address);
    let link = place
        .website
        .clone()
        .filter(|site| !site.is_empty())
        .unwrap_or_else(|| map_url(place, platform));

    format!("{}\n{}", headline, link)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, GeoPoint};

    fn create_place() -> Place {
        Place {
            id: "1".to_string(),
            name: "Nizami & Sons".to_string(),
            description: String::new(),
            address: "Nizami street 10".to_string(),
            location: GeoPoint::new(40.3777, 49.8531),
            rating: 4.2,
            tags: vec![],
            category: Category::Restaurant,
            images: vec![],
            price_range: None,
            hours: None,
            open_now: None,
            phone: None,
            instagram: None,
            website: None,
            menu_url: None,
        }
    }

    #[test]
    fn test_map_urls() {
        let place = create_place();
        assert_eq!(
            map_url(&place, Platform::Ios),
            "http://maps.apple.com/?ll=40.3777,49.8531&q=Nizami%20%26%20Sons"
        );
        assert_eq!(
            map_url(&place, Platform::Android),
            "https://www.google.com/maps/search/?api=1&query=40.3777,49.8531"
        );
    }

    #[test]
    fn test_instagram_handles() {
        assert_eq!(instagram_url("@sahil.baku").as_deref(), Some("https://www.instagram.com/sahil.baku"));
        assert_eq!(
            instagram_url("https://www.instagram.com/sahil.baku/").as_deref(),
            Some("https://www.instagram.com/sahil.baku")
        );
        assert_eq!(instagram_url("  "), None);
    }

    #[test]
    fn test_instagram_url_variants() {
        for url in [
            "https://instagram.com/sahil.baku",
            "http://www.instagram.com/sahil.baku/",
            "http://instagram.com/sahil.baku",
        ] {
            assert_eq!(
                instagram_url(url).as_deref(),
                Some("https://www.instagram.com/sahil.baku"),
                "{}",
                url
            );
        }
        assert_eq!(instagram_url("https://instagram.com/"), None);
    }

    #[test]
    fn test_share_prefers_website() {
        let mut place = create_place();
        assert_eq!(
            share_message(&place, Platform::Web),
            "Nizami & Sons - Nizami street 10\nhttps://www.google.com/maps/search/?api=1&query=40.3777,49.8531"
        );

        place.website = Some("https://nizami.example".to_string());
        assert_eq!(
            share_message(&place, Platform::Web),
            "Nizami & Sons - Nizami street 10\nhttps://nizami.example"
        );
    }
}
