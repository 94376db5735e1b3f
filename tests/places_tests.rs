use outter::address::Coordinates;
use outter::config::ClientOptions;
use outter::places::PlacesClient;
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn places_for(server: &MockServer) -> PlacesClient {
    let options = ClientOptions::default()
        .with_maps_base_url(&server.uri())
        .with_maps_api_key("test_maps_key");
    PlacesClient::new(&options, reqwest::Client::new())
}

#[tokio::test]
async fn test_autocomplete_then_details_labels_restaurant() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/maps/api/place/autocomplete/json"))
        .and(query_param("input", "Pizza Hut"))
        .and(query_param("key", "test_maps_key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "OK",
            "predictions": [{
                "place_id": "ChIJpizza",
                "description": "Pizza Hut, Connaught Place, New Delhi, India",
                "structured_formatting": {
                    "main_text": "Pizza Hut",
                    "secondary_text": "Connaught Place, New Delhi, India"
                },
                "types": ["restaurant", "food", "establishment"]
            }]
        })))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/maps/api/place/details/json"))
        .and(query_param("place_id", "ChIJpizza"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "OK",
            "result": {
                "name": "Pizza Hut",
                "formatted_address": "Block N, Connaught Place, New Delhi, Delhi 110001, India",
                "geometry": { "location": { "lat": 28.6315, "lng": 77.2167 } },
                "rating": 4.1,
                "user_ratings_total": 5321,
                "opening_hours": { "open_now": true },
                "formatted_phone_number": "011 4150 0000",
                "types": ["food", "restaurant", "point_of_interest", "establishment"],
                "business_status": "OPERATIONAL"
            }
        })))
        .mount(&mock_server)
        .await;

    let places = places_for(&mock_server);

    let suggestions = places.autocomplete("Pizza Hut", None).await.unwrap();
    assert_eq!(suggestions.len(), 1);
    assert_eq!(suggestions[0].main_text(), "Pizza Hut");

    let details = places
        .place_details(&suggestions[0].place_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(details.name, "Pizza Hut");
    assert_eq!(details.business_type, "Restaurant");
    assert_eq!(details.open_now, Some(true));
    assert_eq!(details.phone_number.as_deref(), Some("011 4150 0000"));
    assert_eq!(details.geometry, Some(Coordinates::new(28.6315, 77.2167)));
    assert_eq!(details.place_id, "ChIJpizza");
}

#[tokio::test]
async fn test_autocomplete_bias_adds_location_and_radius() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/maps/api/place/autocomplete/json"))
        .and(query_param("location", "28.6139,77.209"))
        .and(query_param("radius", "50000"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "OK",
            "predictions": [{ "place_id": "p1", "description": "Janpath, New Delhi" }]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let places = places_for(&mock_server);
    let suggestions = places
        .autocomplete("Jan", Some(Coordinates::new(28.6139, 77.209)))
        .await
        .unwrap();

    assert_eq!(suggestions[0].main_text(), "Janpath, New Delhi");
}

#[tokio::test]
async fn test_non_ok_status_is_no_result() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/maps/api/place/details/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "INVALID_REQUEST"
        })))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/maps/api/geocode/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "REQUEST_DENIED",
            "error_message": "The provided API key is invalid.",
            "results": []
        })))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/maps/api/place/nearbysearch/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "ZERO_RESULTS",
            "results": []
        })))
        .mount(&mock_server)
        .await;

    let places = places_for(&mock_server);
    let coords = Coordinates::new(28.6139, 77.2090);

    assert_eq!(places.place_details("bogus").await.unwrap(), None);
    assert!(places.reverse_geocode(coords).await.unwrap().is_none());
    assert!(places.find_nearby(coords).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_fetch_details_swallows_transport_errors() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/maps/api/place/details/json"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let places = places_for(&mock_server);

    assert!(places.place_details("p1").await.is_err());
    assert_eq!(places.fetch_details("p1").await, None);
}

#[tokio::test]
async fn test_find_nearby_keeps_businesses_in_service_order() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/maps/api/place/nearbysearch/json"))
        .and(query_param("location", "28.6139,77.209"))
        .and(query_param("radius", "50"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "OK",
            "results": [
                {
                    "place_id": "far",
                    "name": "Cafe Far",
                    "vicinity": "Outer Circle",
                    "types": ["cafe", "establishment"],
                    "geometry": { "location": { "lat": 28.6143, "lng": 77.2094 } }
                },
                {
                    "place_id": "area",
                    "name": "New Delhi",
                    "types": ["locality", "political"]
                },
                {
                    "place_id": "near",
                    "name": "Chemist",
                    "vicinity": "Janpath",
                    "types": ["pharmacy", "store"],
                    "geometry": { "location": { "lat": 28.6139, "lng": 77.2091 } }
                }
            ]
        })))
        .mount(&mock_server)
        .await;

    let places = places_for(&mock_server);
    let found = places.find_nearby(Coordinates::new(28.6139, 77.209)).await.unwrap();

    let ids: Vec<&str> = found.iter().map(|p| p.place_id.as_str()).collect();
    assert_eq!(ids, vec!["far", "near"]);
}
