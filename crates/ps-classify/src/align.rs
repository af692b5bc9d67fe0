use ps_core::error::{Result, ScreeningError};
use ps_core::features::FeatureMapping;
use ps_core::schema::{AlignedVector, CanonicalSchema};

/// Select and reorder `mapping` into `schema` order.
///
/// Fields of `mapping` the schema does not reference are dropped. Values are
/// copied unchanged.
///
/// # Errors
/// Returns [`ScreeningError::SchemaMismatch`] listing every schema field
/// absent from `mapping`. Missing fields are never defaulted.
///
/// # Example
/// ```
/// use ps_classify::align::align;
/// use ps_core::features::FeatureMapping;
/// use ps_core::schema::CanonicalSchema;
///
/// let mut m = FeatureMapping::new();
/// m.insert("HNR", 2.0).unwrap();
/// m.insert("NHR", 1.0).unwrap();
/// let row = align(&m, &CanonicalSchema::new(["NHR", "HNR"])).unwrap();
/// assert_eq!(row.values(), &[1.0, 2.0]);
/// ```
pub fn align(mapping: &FeatureMapping, schema: &CanonicalSchema) -> Result<AlignedVector> {
    let mut values = Vec::with_capacity(schema.len());
    let mut missing = Vec::new();

    for name in schema.names() {
        match mapping.get(name) {
            Some(v) => values.push(v),
            None => missing.push(name.clone()),
        }
    }

    if !missing.is_empty() {
        log::error!("Schéma incompatible, champs absents : {missing:?}");
        return Err(ScreeningError::SchemaMismatch { missing });
    }
    Ok(AlignedVector::new(values))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ps_core::features::FEATURE_NAMES;

    fn full_mapping() -> FeatureMapping {
        let mut m = FeatureMapping::new();
        for (i, name) in FEATURE_NAMES.iter().enumerate() {
            m.insert(name, i as f64 * 1.5 - 3.0).unwrap();
        }
        m
    }

    #[test]
    fn output_follows_schema_positions() {
        let m = full_mapping();
        let mut names: Vec<&str> = FEATURE_NAMES.to_vec();
        names.reverse();
        names.truncate(9);
        let schema = CanonicalSchema::new(names.clone());
        let row = align(&m, &schema).unwrap();
        assert_eq!(row.len(), schema.len());
        for (i, name) in names.iter().enumerate() {
            assert_eq!(row.values()[i], m.get(name).unwrap());
        }
    }

    #[test]
    fn extra_fields_are_dropped() {
        let mut m = full_mapping();
        m.insert("unused", 42.0).unwrap();
        let row = align(&m, &CanonicalSchema::new(FEATURE_NAMES)).unwrap();
        assert_eq!(row.len(), 22);
        assert!(!row.values().contains(&42.0));
    }

    #[test]
    fn missing_fields_are_all_named() {
        let m = full_mapping();
        let schema = CanonicalSchema::new(["NHR", "Jitter:PPQ5", "HNR", "Shimmer:APQ11"]);
        match align(&m, &schema) {
            Err(ScreeningError::SchemaMismatch { missing }) => {
                assert_eq!(missing, vec!["Jitter:PPQ5", "Shimmer:APQ11"]);
            }
            other => panic!("attendu SchemaMismatch, reçu {other:?}"),
        }
    }

    #[test]
    fn duplicate_schema_entries_repeat_value() {
        let m = full_mapping();
        let row = align(&m, &CanonicalSchema::new(["NHR", "NHR"])).unwrap();
        assert_eq!(row.values()[0], row.values()[1]);
    }

    #[test]
    fn empty_schema_gives_empty_row() {
        let row = align(&full_mapping(), &CanonicalSchema::new(Vec::<String>::new())).unwrap();
        assert!(row.is_empty());
    }
}
