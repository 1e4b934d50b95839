use chrono::{TimeZone, Utc};
use ad_targeting_core::content::{AdvertisementContent, ContentId, Metadata};
use ad_targeting_core::targeting::PredicateResult;
use ad_targeting_core::types::{
    GeneratedAdvertisement, MarketplaceId, SelectionMetadata, SelectionResult,
};

fn make_content() -> AdvertisementContent {
    let mut metadata = Metadata::new();
    metadata.insert_number("slot", 3);
    metadata.insert_string("campaign", "spring");
    metadata.insert_flag("sponsored", true);

    AdvertisementContent::ingest(
        ContentId::new("ad-spring").unwrap(),
        MarketplaceId::parse("US").unwrap(),
        b"<div>Spring sale</div>".to_vec(),
        metadata,
    )
    .unwrap()
}

#[test]
fn golden_selection_result_serialization() {
    let result = SelectionResult {
        advertisement: GeneratedAdvertisement::Selected {
            content: make_content(),
        },
        selection: SelectionMetadata {
            marketplace_id: Some("US".to_string()),
            contents_considered: 3,
            contents_eligible: 2,
            targeting_groups_evaluated: 4,
            generated_at: Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap(),
        },
    };

    let json_str = serde_json::to_string_pretty(&result).unwrap();

    let ad_start = json_str.find("\"advertisement\":").expect("Missing advertisement key");
    let sel_start = json_str.find("\"selection\":").expect("Missing selection key");
    assert!(ad_start < sel_start, "advertisement should appear before selection metadata");

    const EXPECTED_JSON: &str = r#"{
      "advertisement": {
        "kind": "selected",
        "content": {
          "id": "ad-spring",
          "marketplace_id": "US",
          "version": "sha256:497f3ca4bc2505546087326b60ed8f32c6b96b5557e3b520f6c69813e7abceed",
          "renderable_content": "<div>Spring sale</div>",
          "metadata": {
            "campaign": "spring",
            "slot": 3,
            "sponsored": true
          }
        }
      },
      "selection": {
        "marketplace_id": "US",
        "contents_considered": 3,
        "contents_eligible": 2,
        "targeting_groups_evaluated": 4,
        "generated_at": "2026-03-01T12:00:00Z"
      }
    }"#;

    let normalized_actual: String = json_str.chars().filter(|c| !c.is_whitespace()).collect();
    let normalized_expected: String = EXPECTED_JSON.chars().filter(|c| !c.is_whitespace()).collect();
    assert_eq!(normalized_actual, normalized_expected, "JSON structure mismatch against golden snapshot");

    let deserialized: SelectionResult = serde_json::from_str(&json_str).expect("Deserialization failed");
    assert_eq!(deserialized, result);
}

#[test]
fn golden_empty_advertisement_serialization() {
    let json = serde_json::to_string(&GeneratedAdvertisement::Empty).unwrap();
    assert_eq!(json, r#"{"kind":"empty"}"#);

    let back: GeneratedAdvertisement = serde_json::from_str(&json).unwrap();
    assert!(back.is_empty());
    assert!(back.content().is_none());
}

#[test]
fn golden_predicate_result_serialization() {
    assert_eq!(serde_json::to_string(&PredicateResult::True).unwrap(), r#""TRUE""#);
    assert_eq!(serde_json::to_string(&PredicateResult::False).unwrap(), r#""FALSE""#);
}
