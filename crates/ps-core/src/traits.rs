//! Seams for the externally owned model artifacts.
//!
//! Both traits are `Send + Sync`: one instance is loaded at start-up and
//! shared read-only across every request.

/// Binary classifier consuming one row in its own field order.
///
/// # Example
/// ```
/// use ps_core::traits::Classifier;
///
/// struct AlwaysOne(Vec<String>);
/// impl Classifier for AlwaysOne {
///     fn feature_names(&self) -> &[String] { &self.0 }
///     fn predict(&self, _row: &[f64]) -> i64 { 1 }
/// }
/// ```
pub trait Classifier: Send + Sync {
    /// Expected input field names, in order.
    fn feature_names(&self) -> &[String];

    /// Predict a raw label for one row of exactly `feature_names().len()` values.
    ///
    /// CONTRAT : appelé uniquement avec une ligne de la bonne largeur.
    fn predict(&self, row: &[f64]) -> i64;
}

/// Per-field affine transform fitted at training time.
///
/// # Example
/// ```
/// use ps_core::traits::Scaler;
///
/// struct Identity(usize);
/// impl Scaler for Identity {
///     fn width(&self) -> usize { self.0 }
///     fn transform(&self, row: &[f64]) -> Vec<f64> { row.to_vec() }
/// }
/// ```
pub trait Scaler: Send + Sync {
    /// Number of fields the transform was fitted on.
    fn width(&self) -> usize;

    /// Transform one row, returning an equally ordered row.
    ///
    /// CONTRAT : ne modifie pas les paramètres partagés.
    fn transform(&self, row: &[f64]) -> Vec<f64>;
}
