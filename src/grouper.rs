//! Partition missing addresses and delete candidates into locality buckets.
//!
//! Within a bucket, missing addresses come first in diff order, followed by
//! delete candidates in diff order. Buckets themselves are ordered by name.

use std::collections::BTreeMap;

use crate::types::{AddressRecord, BucketRecord, NeedsDeleteRecord};

/// Locality name → ordered `(id, record)` pairs.
pub type LocalityBuckets = BTreeMap<String, Vec<(String, BucketRecord)>>;

/// Group missing addresses and delete candidates by locality name.
///
/// Missing addresses are keyed by their own locality name; delete candidates by
/// the locality they are filed under in the diff. A locality reached only
/// through delete candidates still gets a bucket.
pub fn group_by_locality(
    missing: &[(String, AddressRecord)],
    needs_delete: &[(String, NeedsDeleteRecord)],
) -> LocalityBuckets {
    let mut buckets = LocalityBuckets::new();

    for (id, address) in missing {
        buckets
            .entry(address.locality.name.clone())
            .or_default()
            .push((id.clone(), BucketRecord::Address(address.clone())));
    }

    for (id, entry) in needs_delete {
        let candidate = entry.record.to_delete_candidate(&entry.locality);
        buckets
            .entry(entry.locality.clone())
            .or_default()
            .push((id.clone(), BucketRecord::DeleteCandidate(candidate)));
    }

    buckets
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ForeignRecord, Locality, LocalityKind};

    fn address(locality: &str, lat: f64) -> AddressRecord {
        AddressRecord {
            housenumber: "1".to_string(),
            street: "Test Street".to_string(),
            locality: Locality::new(LocalityKind::Urban, locality),
            lat,
            lng: 174.0,
        }
    }

    fn delete(locality: &str, osm_id: &str) -> NeedsDeleteRecord {
        NeedsDeleteRecord {
            locality: locality.to_string(),
            record: ForeignRecord {
                osm_id: osm_id.to_string(),
                housenumber: None,
                street: None,
                locality: None,
                lat: -41.0,
                lng: 174.0,
            },
        }
    }

    #[test]
    fn test_missing_first_then_deletes() {
        let missing = vec![
            ("1".to_string(), address("Foo", -41.0)),
            ("2".to_string(), address("Foo", -41.1)),
        ];
        let deletes = vec![("3".to_string(), delete("Foo", "n9"))];

        let buckets = group_by_locality(&missing, &deletes);
        let ids: Vec<&str> = buckets["Foo"].iter().map(|(id, _)| id.as_str()).collect();

        assert_eq!(ids, vec!["1", "2", "3"]);
        assert!(!buckets["Foo"][0].1.is_delete());
        assert!(buckets["Foo"][2].1.is_delete());
    }

    #[test]
    fn test_delete_only_locality_gets_bucket() {
        let deletes = vec![("7".to_string(), delete("Bar", "n1"))];
        let buckets = group_by_locality(&[], &deletes);

        assert_eq!(buckets.len(), 1);
        let (_, record) = &buckets["Bar"][0];
        assert_eq!(record.locality(), &Locality::unspecified("Bar"));
    }

    #[test]
    fn test_same_name_single_bucket_regardless_of_source() {
        let missing = vec![("1".to_string(), address("Baz", -41.0))];
        let deletes = vec![
            ("2".to_string(), delete("Baz", "n1")),
            ("3".to_string(), delete("Qux", "n2")),
        ];

        let buckets = group_by_locality(&missing, &deletes);
        assert_eq!(buckets.keys().collect::<Vec<_>>(), vec!["Baz", "Qux"]);
        assert_eq!(buckets["Baz"].len(), 2);
    }

    #[test]
    fn test_source_records_untouched() {
        let deletes = vec![("1".to_string(), delete("Bar", "n1"))];
        let _ = group_by_locality(&[], &deletes);
        assert!(deletes[0].1.record.locality.is_none());
    }
}
