//! GeoJSON rendering of query results.
//!
//! Clusters become point features with `cluster: true`, `cluster_id`,
//! `point_count` and `point_count_abbreviated` properties, the shape map SDK
//! cluster layers consume. Leaves carry their id as the feature id and their
//! payload as properties: object payloads are flattened, any other non-null
//! payload is stored under `payload`.

use crate::error::{ClusterError, Result};
use crate::types::{Cluster, ClusterOrPoint};
use geojson::{Feature, FeatureCollection, Geometry, JsonObject, JsonValue, Value, feature::Id};
use serde::Serialize;
use spatio_cluster_types::GeoPoint;

/// Short label for a cluster badge: `999`, `1.5k`, `12k`.
///
/// # Examples
///
/// ```
/// use spatio_cluster::geojson::abbreviate_count;
///
/// assert_eq!(abbreviate_count(999), "999");
/// assert_eq!(abbreviate_count(1_450), "1.5k");
/// assert_eq!(abbreviate_count(2_000), "2k");
/// assert_eq!(abbreviate_count(12_345), "12k");
/// ```
pub fn abbreviate_count(count: usize) -> String {
    let count = count as f64;
    if count >= 10_000.0 {
        format!("{}k", (count / 1_000.0).round())
    } else if count >= 1_000.0 {
        format!("{}k", (count / 100.0).round() / 10.0)
    } else {
        format!("{}", count)
    }
}

pub fn to_feature<P: Serialize>(item: &ClusterOrPoint<P>) -> Result<Feature> {
    match item {
        ClusterOrPoint::Cluster(cluster) => Ok(cluster_feature(cluster)),
        ClusterOrPoint::Leaf(point) => leaf_feature(point),
    }
}

pub fn to_feature_collection<P: Serialize>(items: &[ClusterOrPoint<P>]) -> Result<FeatureCollection> {
    let features = items.iter().map(to_feature).collect::<Result<Vec<_>>>()?;
    Ok(FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    })
}

/// Serialize query results straight to a GeoJSON string.
pub fn to_geojson_string<P: Serialize>(items: &[ClusterOrPoint<P>]) -> Result<String> {
    let collection = to_feature_collection(items)?;
    serde_json::to_string(&collection).map_err(|e| {
        ClusterError::SerializationErrorWithContext(format!(
            "Failed to serialize feature collection: {}",
            e
        ))
    })
}

fn point_geometry(x: f64, y: f64) -> Geometry {
    Geometry::new(Value::Point(vec![x, y]))
}

fn cluster_feature(cluster: &Cluster) -> Feature {
    let mut properties = JsonObject::new();
    properties.insert("cluster".to_string(), JsonValue::Bool(true));
    properties.insert("cluster_id".to_string(), cluster.id.as_u64().into());
    properties.insert("point_count".to_string(), cluster.point_count.into());
    properties.insert(
        "point_count_abbreviated".to_string(),
        abbreviate_count(cluster.point_count).into(),
    );

    Feature {
        bbox: None,
        geometry: Some(point_geometry(cluster.longitude(), cluster.latitude())),
        id: Some(Id::Number(cluster.id.as_u64().into())),
        properties: Some(properties),
        foreign_members: None,
    }
}

fn leaf_feature<P: Serialize>(point: &GeoPoint<P>) -> Result<Feature> {
    let payload = serde_json::to_value(&point.payload).map_err(|e| {
        ClusterError::SerializationErrorWithContext(format!(
            "Failed to serialize payload of point '{}': {}",
            point.id, e
        ))
    })?;

    let mut properties = JsonObject::new();
    match payload {
        JsonValue::Object(fields) => properties.extend(fields),
        JsonValue::Null => {}
        other => {
            properties.insert("payload".to_string(), other);
        }
    }

    Ok(Feature {
        bbox: None,
        geometry: Some(point_geometry(point.longitude(), point.latitude())),
        id: Some(Id::String(point.id.clone())),
        properties: Some(properties),
        foreign_members: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::ClusterIndex;
    use serde::Serialize;
    use spatio_cluster_types::BoundingBox;

    #[derive(Debug, Clone, Serialize)]
    struct Spot {
        name: &'static str,
        rating: u8,
    }

    #[test]
    fn test_abbreviate_count() {
        assert_eq!(abbreviate_count(2), "2");
        assert_eq!(abbreviate_count(1_000), "1k");
        assert_eq!(abbreviate_count(9_949), "9.9k");
        assert_eq!(abbreviate_count(10_000), "10k");
        assert_eq!(abbreviate_count(125_600), "126k");
    }

    #[test]
    fn test_cluster_feature_properties() {
        let points = vec![
            GeoPoint::from_lat_lon("a", 37.5665, 126.9780, ()),
            GeoPoint::from_lat_lon("b", 37.5666, 126.9781, ()),
        ];
        let index = ClusterIndex::build(points).unwrap();
        let items = index.query_visible(&BoundingBox::world(), 0);
        let collection = to_feature_collection(&items).unwrap();

        assert_eq!(collection.features.len(), 1);
        let feature = &collection.features[0];
        let properties = feature.properties.as_ref().unwrap();
        assert_eq!(properties["cluster"], JsonValue::Bool(true));
        assert_eq!(properties["point_count"], JsonValue::from(2));
        assert_eq!(properties["point_count_abbreviated"], JsonValue::from("2"));
        assert_eq!(
            properties["cluster_id"],
            JsonValue::from(items[0].as_cluster().unwrap().id.as_u64())
        );
    }

    #[test]
    fn test_leaf_feature_flattens_payload() {
        let point = GeoPoint::from_lat_lon(
            "cafe",
            37.5665,
            126.9780,
            Spot {
                name: "Coffee",
                rating: 4,
            },
        );
        let feature = to_feature(&ClusterOrPoint::Leaf(point)).unwrap();

        assert_eq!(feature.id, Some(Id::String("cafe".to_string())));
        let properties = feature.properties.unwrap();
        assert_eq!(properties["name"], JsonValue::from("Coffee"));
        assert_eq!(properties["rating"], JsonValue::from(4));
        match feature.geometry.unwrap().value {
            Value::Point(coords) => assert_eq!(coords, vec![126.9780, 37.5665]),
            other => panic!("unexpected geometry: {other:?}"),
        }
    }

    #[test]
    fn test_scalar_payload_and_string_output() {
        let items = vec![ClusterOrPoint::Leaf(GeoPoint::from_lat_lon(
            "x", 1.0, 2.0, "note",
        ))];
        let json = to_geojson_string(&items).unwrap();
        assert!(json.contains("FeatureCollection"));
        assert!(json.contains(r#""payload":"note""#));
    }
}
